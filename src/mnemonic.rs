//! TON seed phrases.
//!
//! A phrase is 24 words from the BIP39 English list. Unlike BIP39 there is no
//! embedded checksum word: a phrase is valid when the PBKDF2 stretch of its
//! HMAC entropy starts with a zero byte. Generation draws random phrases until
//! one satisfies that condition.

use std::fmt;

use bip39::Language;
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};
use sha2::Sha512;

use crate::error::{Result, WalletError};

/// Number of words in a TON mnemonic.
pub const WORD_COUNT: usize = 24;

/// PBKDF2 rounds used for the wallet key seed.
pub(crate) const PBKDF_ITERATIONS: u32 = 100_000;

const BASIC_SEED_SALT: &[u8] = b"TON seed version";
const BASIC_SEED_ITERATIONS: u32 = PBKDF_ITERATIONS / 256;

/// Draws before generation gives up. Roughly one random phrase in 256 passes
/// the seed check.
const MAX_CANDIDATES: usize = 256 * 64;

/// A validated 24-word phrase.
///
/// Only [`generate`], [`generate_with`] and [`Mnemonic::from_phrase`] produce
/// values of this type, and all of them validate first.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    words: Vec<&'static str>,
}

impl Mnemonic {
    /// Parse and validate a space separated phrase. Case and surrounding
    /// whitespace are normalized.
    pub fn from_phrase(phrase: &str) -> Result<Self> {
        let normalized: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
        if normalized.len() != WORD_COUNT {
            return Err(WalletError::InvalidMnemonic(format!(
                "expected {} words, got {}",
                WORD_COUNT,
                normalized.len()
            )));
        }

        let words = normalized
            .iter()
            .map(|word| {
                lookup(word)
                    .ok_or_else(|| WalletError::InvalidMnemonic(format!("unknown word '{}'", word)))
            })
            .collect::<Result<Vec<_>>>()?;

        if !is_basic_seed(&entropy(&words)?) {
            return Err(WalletError::InvalidMnemonic("seed check failed".to_string()));
        }

        Ok(Self { words })
    }

    pub fn words(&self) -> &[&'static str] {
        &self.words
    }

    /// Words joined by single spaces.
    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic([{} words])", self.words.len())
    }
}

/// Generate a fresh phrase from the operating system RNG.
pub fn generate() -> Result<Mnemonic> {
    generate_with(&mut OsRng)
}

/// Generate a fresh phrase from the supplied RNG.
///
/// Candidates are drawn until one passes the seed check. The accepted phrase is
/// then run through [`validate`] again. Both running out of draws and a
/// mismatch on that second check are reported as
/// [`WalletError::ChecksumFailure`], without retrying.
pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Mnemonic> {
    let list = Language::English.word_list();

    let mut words = None;
    for _ in 0..MAX_CANDIDATES {
        let candidate: Vec<&'static str> = (0..WORD_COUNT)
            .map(|_| list[rng.gen_range(0..list.len())])
            .collect();

        if is_basic_seed(&entropy(&candidate)?) {
            words = Some(candidate);
            break;
        }
    }
    let words = words.ok_or(WalletError::ChecksumFailure)?;

    if !validate(&words) {
        return Err(WalletError::ChecksumFailure);
    }

    Ok(Mnemonic { words })
}

/// Check word count, word list membership and the seed condition.
pub fn validate<S: AsRef<str>>(words: &[S]) -> bool {
    if words.len() != WORD_COUNT {
        return false;
    }
    if words.iter().any(|word| lookup(word.as_ref()).is_none()) {
        return false;
    }

    entropy(words)
        .map(|entropy| is_basic_seed(&entropy))
        .unwrap_or(false)
}

/// HMAC-SHA512 keyed with the phrase over an empty password.
pub(crate) fn entropy<S: AsRef<str>>(words: &[S]) -> Result<[u8; 64]> {
    let phrase = words.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");

    let mut mac = Hmac::<Sha512>::new_from_slice(phrase.as_bytes())
        .map_err(|e| WalletError::Derivation(e.to_string()))?;
    mac.update(b"");

    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

pub(crate) fn stretch(entropy: &[u8; 64], salt: &[u8], rounds: u32) -> [u8; 64] {
    let mut seed = [0u8; 64];
    pbkdf2_hmac::<Sha512>(entropy, salt, rounds, &mut seed);
    seed
}

pub(crate) fn lookup(word: &str) -> Option<&'static str> {
    Language::English
        .find_word(word)
        .map(|index| Language::English.word_list()[usize::from(index)])
}

fn is_basic_seed(entropy: &[u8; 64]) -> bool {
    stretch(entropy, BASIC_SEED_SALT, BASIC_SEED_ITERATIONS)[0] == 0
}
