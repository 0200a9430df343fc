use std::io;

use crate::generator::WalletBatch;

/// Errors raised while deriving a single wallet.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// A freshly generated mnemonic did not pass validation. Points at a broken
    /// RNG or checksum implementation, never retried.
    #[error("generated mnemonic failed checksum validation")]
    ChecksumFailure,

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("unsupported wallet version '{0}'")]
    UnsupportedVersion(String),

    #[error("workchain {0} is outside the valid range -128..=127")]
    InvalidWorkchain(i32),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid bag of cells: {0}")]
    InvalidBoc(String),

    #[error("cell overflow: {0}")]
    CellOverflow(String),

    #[error("invalid wallet record: {0}")]
    InvalidRecord(String),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors raised by the batch orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// One iteration failed; the whole batch is discarded.
    #[error("wallet {index} failed: {source}")]
    Wallet {
        index: usize,
        #[source]
        source: WalletError,
    },

    /// The batch was generated but could not be written. The records are kept so
    /// the caller can still surface them.
    #[error("failed to persist batch to {file_name}: {source}")]
    Persistence {
        file_name: String,
        batch: Box<WalletBatch>,
        #[source]
        source: io::Error,
    },

    #[error("batch cancelled after {completed} wallets")]
    Cancelled { completed: usize },

    #[error("failed to serialize batch: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = WalletError> = std::result::Result<T, E>;
