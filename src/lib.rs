//! # SIWE Auth
//!
//! Sign-In with Ethereum ([EIP-4361]) challenges and their verification.
//!
//! A backend issues a single-use nonce, renders a canonical challenge that
//! the user's wallet signs with `personal_sign`, and later checks that the
//! returned signature was produced by the claimed account while the nonce
//! was still valid.
//!
//! ## Features
//!
//! - **Secure nonces**: 128 bits from the OS CSPRNG, hex encoded
//! - **Canonical messages**: byte-stable EIP-4361 text, so the verifier checks
//!   exactly what the wallet showed
//! - **Validity windows**: expiration and not-before checks against an
//!   injectable clock, run before any signature work
//! - **Actionable errors**: expired, not-yet-valid, malformed and mismatched
//!   signatures are distinct variants
//! - **Pluggable recovery**: EIP-191/secp256k1 built in, other schemes via
//!   [`SignerRecovery`]
//!
//! ## Quick Start
//!
//! ```rust
//! use siwe_auth::{SignInRequest, VerificationError};
//! use std::time::Duration;
//!
//! # async fn example(signature_from_wallet: &str) -> Result<(), VerificationError> {
//! // Issue a nonce and keep it with the pending sign-in
//! let nonce = siwe_auth::issue_nonce(Some(Duration::from_secs(300)), None);
//!
//! let request = SignInRequest::v1(
//!     "fancy.xyz",
//!     "0xc536CF93bD20eec139A3Bb7EaA132a89738F8604",
//!     "I agree to all the terms and services!",
//!     "https://fancy.xyz/login",
//!     nonce,
//! )
//! .with_chain_id(1);
//!
//! // Show this to the wallet
//! let challenge = siwe_auth::format_message(&request);
//! # let _ = challenge;
//!
//! // Later, with the same request and the wallet's signature
//! match siwe_auth::verify(signature_from_wallet, &request).await {
//!     Ok(address) => println!("signed in as {address}"),
//!     Err(VerificationError::InvalidNonce { reason }) => println!("issue a new challenge: {reason}"),
//!     Err(VerificationError::InvalidSignature { reason }) => println!("rejected: {reason}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Nonce storage
//!
//! This crate never stores nonces. The caller keeps each issued [`Nonce`]
//! with its pending sign-in and must consume it atomically after a
//! successful verification; otherwise the same signature can be replayed
//! until the nonce expires.
//!
//! ## Configuration
//!
//! [`SiweConfig`] carries the default nonce TTL and message version. It can
//! be loaded from `SIWE_AUTH_NONCE_TTL` and `SIWE_AUTH_VERSION`:
//!
//! ```bash
//! export SIWE_AUTH_NONCE_TTL=600
//! ```
//!
//! [EIP-4361]: https://eips.ethereum.org/EIPS/eip-4361

use chrono::{DateTime, Utc};
use std::time::Duration;

pub mod siwe;

// Re-export commonly used types
pub use siwe::{
    ConfigPreset, MessageFormatter, Nonce, NonceInvalidReason, NonceIssuer, NonceValidator,
    RecoveryError, SIWE_VERSION, SignInRequest, SignatureInvalidReason, SignatureVerifier,
    SignerRecovery, SiweConfig, VerificationError,
};

#[cfg(feature = "algo-eip191")]
pub use siwe::Eip191SignerRecovery;

/// Issues a fresh nonce using the system clock.
///
/// A `ttl` of `None` or zero produces a nonce without expiration time;
/// `not_before` is stored as given.
pub fn issue_nonce(ttl: Option<Duration>, not_before: Option<DateTime<Utc>>) -> Nonce {
    NonceIssuer::new().issue(ttl, not_before)
}

/// Renders the canonical challenge text for `request`.
pub fn format_message(request: &SignInRequest) -> String {
    MessageFormatter::format(request)
}

/// Verifies an EIP-191 `personal_sign` signature over the challenge built
/// from `request`, checking the nonce window against the system clock.
///
/// Returns the checksummed address of the signer.
#[cfg(feature = "algo-eip191")]
pub async fn verify(signature: &str, request: &SignInRequest) -> Result<String, VerificationError> {
    SignatureVerifier::default().verify(signature, request).await
}
