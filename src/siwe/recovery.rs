//! Pluggable signer recovery.
//!
//! The verifier never touches elliptic-curve math itself. It hands the
//! canonical message and the opaque signature to a [`SignerRecovery`]
//! backend and compares the address it gets back. The crate ships an
//! EIP-191 / secp256k1 backend behind the `algo-eip191` feature; other
//! chains or signature schemes plug in by implementing the trait.

use crate::siwe::error::RecoveryError;
use async_trait::async_trait;

/// Recovers the account that signed a message.
///
/// # Implementation Notes
///
/// - Return [`RecoveryError`] for anything unparseable; the verifier maps it
///   to a malformed-signature failure
/// - Implementations must be `Send + Sync` so one verifier can be shared
///   across tasks
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use siwe_auth::{RecoveryError, SignerRecovery};
///
/// /// Treats the signature as `<address>:<message length>`. Test use only.
/// struct Insecure;
///
/// #[async_trait]
/// impl SignerRecovery for Insecure {
///     fn name(&self) -> &'static str {
///         "insecure"
///     }
///
///     async fn recover_signer(&self, message: &str, signature: &str) -> Result<String, RecoveryError> {
///         let (address, len) = signature
///             .split_once(':')
///             .ok_or_else(|| RecoveryError::new("missing separator"))?;
///         if len.parse::<usize>().ok() != Some(message.len()) {
///             return Err(RecoveryError::new("length mismatch"));
///         }
///         Ok(address.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait SignerRecovery: Send + Sync {
    /// Short identifier of the scheme, used in logs.
    fn name(&self) -> &'static str;

    /// Recovers the signer address of `signature` over `message`.
    async fn recover_signer(&self, message: &str, signature: &str)
    -> Result<String, RecoveryError>;
}

#[cfg(feature = "algo-eip191")]
pub mod eip191 {
    //! EIP-191 personal-message recovery over secp256k1.

    use super::SignerRecovery;
    use crate::siwe::error::RecoveryError;
    use alloy_primitives::Signature;
    use async_trait::async_trait;

    /// Length of an `r || s || v` signature.
    pub const SIGNATURE_LENGTH: usize = 65;

    /// Recovers Ethereum addresses from `personal_sign` signatures.
    ///
    /// The message is hashed as
    /// `keccak256("\x19Ethereum Signed Message:\n" || len || message)` and the
    /// public key recovered from the 65-byte signature. `v` may be `27`/`28`
    /// or `0`/`1`. The signature is accepted as hex with or without a `0x`
    /// prefix. Addresses are returned EIP-55 checksummed.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Eip191SignerRecovery;

    impl Eip191SignerRecovery {
        pub fn new() -> Self {
            Self
        }

        fn parse_signature(signature: &str) -> Result<Signature, RecoveryError> {
            let trimmed = signature.trim();
            let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);

            let bytes = hex::decode(hex_part)
                .map_err(|e| RecoveryError::new(format!("Signature is not valid hex: {e}")))?;
            if bytes.len() != SIGNATURE_LENGTH {
                return Err(RecoveryError::new(format!(
                    "Expected {SIGNATURE_LENGTH} signature bytes, got {}",
                    bytes.len()
                )));
            }

            Signature::try_from(bytes.as_slice())
                .map_err(|e| RecoveryError::new(format!("Invalid signature: {e}")))
        }
    }

    #[async_trait]
    impl SignerRecovery for Eip191SignerRecovery {
        fn name(&self) -> &'static str {
            "eip191-secp256k1"
        }

        async fn recover_signer(
            &self,
            message: &str,
            signature: &str,
        ) -> Result<String, RecoveryError> {
            let signature = Self::parse_signature(signature)?;
            let address = signature
                .recover_address_from_msg(message.as_bytes())
                .map_err(|e| RecoveryError::new(format!("Public key recovery failed: {e}")))?;

            Ok(address.to_checksum(None))
        }
    }

}
