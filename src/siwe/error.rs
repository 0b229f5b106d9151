use std::fmt;

use thiserror::Error;

/// Why a nonce failed its temporal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonceInvalidReason {
    /// The expiration time is at or before the current instant.
    Expired,
    /// The not-before time is after the current instant.
    NotYetValid,
}

impl fmt::Display for NonceInvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => f.write_str("nonce expired"),
            Self::NotYetValid => f.write_str("nonce not yet valid"),
        }
    }
}

/// Why a signature was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureInvalidReason {
    /// The signature could not be parsed or no signer could be recovered from it.
    Malformed,
    /// A signer was recovered, but it is not the claimed account.
    Mismatch,
}

impl fmt::Display for SignatureInvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => f.write_str("signature is malformed"),
            Self::Mismatch => f.write_str("signature was produced by another account"),
        }
    }
}

/// Errors returned by sign-in verification.
///
/// The two variants are disjoint and both are recoverable by the caller:
///
/// - **`InvalidNonce`**: the challenge is stale or premature. Issue a fresh
///   nonce and ask the wallet to sign a new message.
/// - **`InvalidSignature`**: the signature does not prove control of the
///   claimed account. Reject the attempt; the claimed address may be logged
///   for audit.
///
/// Verification stops at the first failed check, and nonce checks always run
/// before any signature recovery.
///
/// # Example
///
/// ```rust
/// use siwe_auth::{NonceInvalidReason, SignatureInvalidReason, VerificationError};
///
/// fn describe(err: &VerificationError) -> &'static str {
///     match err {
///         VerificationError::InvalidNonce { reason: NonceInvalidReason::Expired } => "expired",
///         VerificationError::InvalidNonce { reason: NonceInvalidReason::NotYetValid } => "too early",
///         VerificationError::InvalidSignature { reason: SignatureInvalidReason::Malformed } => "garbled",
///         VerificationError::InvalidSignature { reason: SignatureInvalidReason::Mismatch } => "wrong signer",
///     }
/// }
///
/// let err = VerificationError::InvalidNonce { reason: NonceInvalidReason::Expired };
/// assert_eq!(describe(&err), "expired");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The nonce failed its temporal check.
    #[error("Invalid nonce: {reason}")]
    InvalidNonce { reason: NonceInvalidReason },

    /// The signature is malformed or belongs to another account.
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: SignatureInvalidReason },
}

impl VerificationError {
    pub(crate) fn nonce(reason: NonceInvalidReason) -> Self {
        Self::InvalidNonce { reason }
    }

    pub(crate) fn signature(reason: SignatureInvalidReason) -> Self {
        Self::InvalidSignature { reason }
    }

    /// Returns `true` for temporal nonce failures.
    pub fn is_nonce_error(&self) -> bool {
        matches!(self, Self::InvalidNonce { .. })
    }

    /// Returns `true` for signature failures.
    pub fn is_signature_error(&self) -> bool {
        matches!(self, Self::InvalidSignature { .. })
    }
}

/// Low-level failure reported by a [`SignerRecovery`](crate::SignerRecovery) backend.
///
/// The verifier never surfaces this type; it is normalized to
/// [`VerificationError::InvalidSignature`] with
/// [`SignatureInvalidReason::Malformed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Signer recovery failed: {0}")]
pub struct RecoveryError(pub String);

impl RecoveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
