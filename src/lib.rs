pub mod address;
pub mod boc;
pub mod cell;
pub mod cli;
pub mod contract;
pub mod error;
pub mod generator;
pub mod keys;
pub mod mnemonic;
pub mod store;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_vectors;

pub use address::{AddressFlags, ContractAddress, FriendlyAddress, Network};
pub use cli::{Args, OutputFormat};
pub use contract::{resolve, resolve_named, WalletVersion};
pub use error::{BatchError, WalletError};
pub use generator::{normalize_count, BatchEvent, BatchFormat, BatchGenerator, PersistedBatch, WalletBatch};
pub use keys::KeyPair;
pub use mnemonic::Mnemonic;
pub use store::{Clock, FsStore, RecordStore, SystemClock};
pub use wallet::{derive_wallet, DerivedWallet, WalletOptions, WalletRecord};
