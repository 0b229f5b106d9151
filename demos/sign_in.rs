//! Walks through a complete sign-in with a throwaway key.
//!
//! Run with: cargo run --example sign_in

use alloy_primitives::{Address, Signature, eip191_hash_message};
use k256::ecdsa::SigningKey;
use siwe_auth::{ConfigPreset, NonceIssuer, SignInRequest, SignatureVerifier, SiweConfig};
use std::collections::HashMap;
use std::error::Error;

/// Stand-in for the server's pending sign-in store.
#[derive(Default)]
struct PendingSignIns {
    by_nonce: HashMap<String, SignInRequest>,
}

impl PendingSignIns {
    fn insert(&mut self, request: SignInRequest) {
        self.by_nonce.insert(request.nonce.value.clone(), request);
    }

    /// Removes the request so its nonce cannot be used again.
    fn take(&mut self, nonce: &str) -> Option<SignInRequest> {
        self.by_nonce.remove(nonce)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = SiweConfig::from(ConfigPreset::Production);
    println!("{}", config.summary());

    // Wallet side
    let key = SigningKey::from_slice(&[0x5a; 32])?;
    let address = Address::from_private_key(&key).to_checksum(None);

    // Server issues the challenge
    let issuer = NonceIssuer::from_config(&config);
    let request = SignInRequest::new(
        "fancy.xyz",
        address.as_str(),
        "I agree to all the terms and services!",
        "https://fancy.xyz/login",
        config.version.as_str(),
        issuer.issue_default(),
    )
    .with_chain_id(1)
    .with_resources(["https://fancy.xyz/tos"]);

    let mut pending = PendingSignIns::default();
    pending.insert(request.clone());

    let challenge = request.to_message();
    println!("\n--- challenge ---\n{challenge}\n-----------------\n");

    // Wallet signs with personal_sign
    let hash = eip191_hash_message(&challenge);
    let (sig, recid) = key.sign_prehash_recoverable(hash.as_slice())?;
    let signature = format!(
        "0x{}",
        hex::encode(Signature::from_signature_and_parity(sig, recid.is_y_odd()).as_bytes())
    );

    // Server verifies and consumes the nonce
    let verifier = SignatureVerifier::default();
    let Some(stored) = pending.take(&request.nonce.value) else {
        return Err("unknown nonce".into());
    };
    let signer = verifier.verify(&signature, &stored).await?;
    println!("Signed in as {signer}");

    // Replaying the same signature finds no pending sign-in
    assert!(pending.take(&request.nonce.value).is_none());
    println!("Replay rejected: nonce already consumed");

    Ok(())
}
