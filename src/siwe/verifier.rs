use crate::siwe::error::{SignatureInvalidReason, VerificationError};
use crate::siwe::message::{MessageFormatter, SignInRequest};
use crate::siwe::nonce::TimeProviderFn;
use crate::siwe::recovery::SignerRecovery;
use crate::siwe::time_utils::current_time;
use crate::siwe::validator::NonceValidator;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Verifies signed sign-in challenges.
///
/// Verification runs these steps and stops at the first failure:
///
/// 1. Validate the nonce window (no cryptographic work on stale nonces)
/// 2. Rebuild the canonical message from the request fields
/// 3. Recover the signer through the configured [`SignerRecovery`]
/// 4. Compare the recovered address with the claimed one, ignoring case
///
/// The verifier holds no per-call state and is `Send + Sync`; share it with
/// `Arc<SignatureVerifier>`. It does not remember nonces: the caller must
/// atomically consume the nonce in its own store after a successful call.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use siwe_auth::{
///     NonceIssuer, RecoveryError, SignInRequest, SignatureVerifier, SignerRecovery,
/// };
/// use std::sync::Arc;
///
/// struct Fixed(&'static str);
///
/// #[async_trait]
/// impl SignerRecovery for Fixed {
///     fn name(&self) -> &'static str {
///         "fixed"
///     }
///     async fn recover_signer(&self, _: &str, _: &str) -> Result<String, RecoveryError> {
///         Ok(self.0.to_string())
///     }
/// }
///
/// # async fn example() -> Result<(), siwe_auth::VerificationError> {
/// let address = "0xc536CF93bD20eec139A3Bb7EaA132a89738F8604";
/// let request = SignInRequest::v1(
///     "fancy.xyz",
///     address,
///     "I agree to all the terms and services!",
///     "https://fancy.xyz/login",
///     NonceIssuer::new().issue(None, None),
/// );
///
/// let verifier = SignatureVerifier::new(Arc::new(Fixed(address)));
/// let signer = verifier.verify("0xsignature", &request).await?;
/// assert_eq!(signer, address);
/// # Ok(())
/// # }
/// ```
pub struct SignatureVerifier {
    recovery: Arc<dyn SignerRecovery>,
    time_provider: TimeProviderFn,
}

#[cfg(feature = "algo-eip191")]
impl Default for SignatureVerifier {
    /// EIP-191 recovery and the system clock.
    fn default() -> Self {
        Self::new(Arc::new(crate::siwe::recovery::eip191::Eip191SignerRecovery::new()))
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("recovery", &self.recovery.name())
            .finish_non_exhaustive()
    }
}

impl SignatureVerifier {
    /// Creates a verifier using `recovery` and the system clock.
    pub fn new(recovery: Arc<dyn SignerRecovery>) -> Self {
        Self {
            recovery,
            time_provider: Box::new(current_time),
        }
    }

    /// Sets a custom time provider function.
    pub fn with_time_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.time_provider = Box::new(provider);
        self
    }

    /// Verifies `signature` over the challenge built from `request`, using
    /// the configured clock.
    ///
    /// Returns the recovered signer address on success.
    pub async fn verify(
        &self,
        signature: &str,
        request: &SignInRequest,
    ) -> Result<String, VerificationError> {
        self.verify_at(signature, request, (self.time_provider)())
            .await
    }

    /// Verifies `signature` over the challenge built from `request` as of `now`.
    pub async fn verify_at(
        &self,
        signature: &str,
        request: &SignInRequest,
        now: DateTime<Utc>,
    ) -> Result<String, VerificationError> {
        // 1. Nonce window, before any recovery work
        if let Err(err) = NonceValidator::validate(&request.nonce, now) {
            tracing::warn!(
                address = %request.address,
                domain = %request.domain,
                error = %err,
                "Rejected sign-in nonce"
            );
            return Err(err);
        }

        // 2. Rebuild the exact bytes the wallet was shown
        let message = MessageFormatter::format(request);

        // 3. Recover the signer
        let recovered = match self.recovery.recover_signer(&message, signature).await {
            Ok(recovered) => recovered,
            Err(err) => {
                tracing::warn!(
                    address = %request.address,
                    domain = %request.domain,
                    scheme = self.recovery.name(),
                    error = %err,
                    "Malformed sign-in signature"
                );
                return Err(VerificationError::signature(
                    SignatureInvalidReason::Malformed,
                ));
            }
        };

        // 4. Compare with the claimed account
        if !recovered.eq_ignore_ascii_case(&request.address) {
            tracing::warn!(
                address = %request.address,
                recovered = %recovered,
                domain = %request.domain,
                "Sign-in signature produced by another account"
            );
            return Err(VerificationError::signature(
                SignatureInvalidReason::Mismatch,
            ));
        }

        tracing::debug!(
            address = %recovered,
            domain = %request.domain,
            scheme = self.recovery.name(),
            "Verified sign-in signature"
        );
        Ok(recovered)
    }
}
