//! Canonical EIP-4361 challenge text.
//!
//! The wallet signs the exact bytes produced here and the verifier rebuilds
//! them from the same fields, so formatting is a pure function of its input.

use crate::siwe::config::SIWE_VERSION;
use crate::siwe::nonce::Nonce;
use crate::siwe::time_utils::to_iso8601;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fields that together determine a sign-in challenge.
///
/// The same request must be reproduced field-for-field at verification time;
/// any divergence changes the message and the signature will not match.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use siwe_auth::{Nonce, SignInRequest};
///
/// let nonce = Nonce::new("aAbBcCdD", Utc.with_ymd_and_hms(2021, 10, 10, 12, 34, 56).unwrap());
/// let request = SignInRequest::new(
///     "fancy.xyz",
///     "0x123456789ABCDEF0123456789ABCDEF01234567",
///     "I agree to all the terms and services!",
///     "https://fancy.xyz/login",
///     "1",
///     nonce,
/// )
/// .with_chain_id(4)
/// .with_resources(["https://fancy.xyz/tos"]);
///
/// let message = request.to_message();
/// assert!(message.starts_with("fancy.xyz wants you to sign in with your Ethereum account:\n"));
/// assert!(message.ends_with("Resources:\n- https://fancy.xyz/tos"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Domain requesting the sign-in.
    pub domain: String,
    /// Account expected to sign.
    pub address: String,
    /// Human-readable statement the user agrees to.
    pub statement: String,
    /// URI of the resource performing the sign-in.
    pub uri: String,
    /// Message version.
    pub version: String,
    pub nonce: Nonce,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Resources the user is granting access to, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

impl SignInRequest {
    /// Creates a request with the mandatory fields.
    pub fn new(
        domain: impl Into<String>,
        address: impl Into<String>,
        statement: impl Into<String>,
        uri: impl Into<String>,
        version: impl Into<String>,
        nonce: Nonce,
    ) -> Self {
        Self {
            domain: domain.into(),
            address: address.into(),
            statement: statement.into(),
            uri: uri.into(),
            version: version.into(),
            nonce,
            chain_id: None,
            request_id: None,
            resources: Vec::new(),
        }
    }

    /// Creates a request carrying the EIP-4361 version `1`.
    pub fn v1(
        domain: impl Into<String>,
        address: impl Into<String>,
        statement: impl Into<String>,
        uri: impl Into<String>,
        nonce: Nonce,
    ) -> Self {
        Self::new(domain, address, statement, uri, SIWE_VERSION, nonce)
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    /// Renders the canonical challenge text.
    pub fn to_message(&self) -> String {
        MessageFormatter::format(self)
    }
}

impl fmt::Display for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        MessageFormatter::write(self, f)
    }
}

/// Serializes a [`SignInRequest`] into the text the wallet signs.
///
/// Layout, with bracketed lines present only when the field is set:
///
/// ```text
/// {domain} wants you to sign in with your Ethereum account:
/// {address}
///
/// {statement}
///
/// URI: {uri}
/// Version: {version}
/// Nonce: {nonce}
/// Issued At: {issued_at}
/// [Expiration Time: {expiration_time}]
/// [Not Before: {not_before}]
/// [Chain ID: {chain_id}]
/// [Request ID: {request_id}]
/// [Resources:
/// - {resource}
/// ...]
/// ```
///
/// Timestamps use ISO-8601 with milliseconds and a `Z` suffix. Lines are
/// separated by `\n` and there is no trailing newline.
pub struct MessageFormatter;

impl MessageFormatter {
    pub fn format(request: &SignInRequest) -> String {
        let mut message = String::with_capacity(256);
        // Writing into a String cannot fail.
        let _ = Self::write(request, &mut message);
        message
    }

    fn write<W: fmt::Write>(request: &SignInRequest, out: &mut W) -> fmt::Result {
        let nonce = &request.nonce;

        write!(
            out,
            "{} wants you to sign in with your Ethereum account:\n{}\n\n{}\n\n",
            request.domain, request.address, request.statement
        )?;
        write!(out, "URI: {}", request.uri)?;
        write!(out, "\nVersion: {}", request.version)?;
        write!(out, "\nNonce: {}", nonce.value)?;
        write!(out, "\nIssued At: {}", to_iso8601(&nonce.issued_at))?;

        if let Some(expiration_time) = &nonce.expiration_time {
            write!(out, "\nExpiration Time: {}", to_iso8601(expiration_time))?;
        }
        if let Some(not_before) = &nonce.not_before {
            write!(out, "\nNot Before: {}", to_iso8601(not_before))?;
        }
        if let Some(chain_id) = request.chain_id {
            write!(out, "\nChain ID: {chain_id}")?;
        }
        if let Some(request_id) = request.request_id.as_deref().filter(|id| !id.is_empty()) {
            write!(out, "\nRequest ID: {request_id}")?;
        }
        if !request.resources.is_empty() {
            out.write_str("\nResources:")?;
            for resource in &request.resources {
                write!(out, "\n- {resource}")?;
            }
        }

        Ok(())
    }
}
