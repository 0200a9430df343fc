use std::fmt;

use ed25519_dalek::SigningKey;

use crate::error::{Result, WalletError};
use crate::mnemonic::{self, Mnemonic, PBKDF_ITERATIONS, WORD_COUNT};

const DEFAULT_SEED_SALT: &[u8] = b"TON default seed";

/// Ed25519 key pair. `secret_key` is the 32-byte signing seed.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    public_key: [u8; 32],
    secret_key: [u8; 32],
}

impl KeyPair {
    pub fn from_secret_key(secret_key: [u8; 32]) -> Self {
        let public_key = SigningKey::from_bytes(&secret_key).verifying_key().to_bytes();
        Self { public_key, secret_key }
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    pub fn secret_key(&self) -> &[u8; 32] {
        &self.secret_key
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }

    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.secret_key)
    }

    pub fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.secret_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Derive the wallet key pair of a phrase.
///
/// PBKDF2-HMAC-SHA512 stretches the phrase entropy with the `TON default seed`
/// salt over 100k rounds; the first 32 bytes seed the Ed25519 key.
pub fn derive(mnemonic: &Mnemonic) -> Result<KeyPair> {
    let words = mnemonic.words();
    if words.len() != WORD_COUNT {
        return Err(WalletError::Derivation(format!(
            "expected {} words, got {}",
            WORD_COUNT,
            words.len()
        )));
    }
    if let Some(word) = words.iter().find(|word| mnemonic::lookup(word).is_none()) {
        return Err(WalletError::Derivation(format!("word '{}' is not in the word list", word)));
    }

    let entropy = mnemonic::entropy(words)?;
    let seed = mnemonic::stretch(&entropy, DEFAULT_SEED_SALT, PBKDF_ITERATIONS);

    let mut secret_key = [0u8; 32];
    secret_key.copy_from_slice(&seed[..32]);
    Ok(KeyPair::from_secret_key(secret_key))
}
