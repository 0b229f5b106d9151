// Core components
mod config;
mod error;
mod message;
mod nonce;
mod time_utils;
mod validator;
mod verifier;

// Signer recovery backends
pub mod recovery;

// Core components exports
pub use config::{ConfigPreset, SIWE_VERSION, SiweConfig};
pub use error::{NonceInvalidReason, RecoveryError, SignatureInvalidReason, VerificationError};
pub use message::{MessageFormatter, SignInRequest};
pub use nonce::{NONCE_BYTES, Nonce, NonceIssuer, TimeProviderFn};
pub use validator::NonceValidator;
pub use verifier::SignatureVerifier;

// Signer recovery exports
#[cfg(feature = "algo-eip191")]
pub use recovery::eip191::Eip191SignerRecovery;
pub use recovery::SignerRecovery;
