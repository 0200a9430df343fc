use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use rayon::prelude::*;

use crate::address::Network;
use crate::contract::WalletVersion;
use crate::error::BatchError;
use crate::store::{Clock, RecordStore};
use crate::wallet::{self, WalletOptions, WalletRecord};

/// Records of one batch, in index order starting at 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletBatch {
    records: Vec<WalletRecord>,
}

impl WalletBatch {
    pub fn records(&self) -> &[WalletRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<WalletRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One `index|address|mnemonic` line per record, no trailing newline.
    pub fn to_lines(&self) -> String {
        self.records
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// On-disk representation of a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchFormat {
    #[default]
    Lines,
    Json,
}

impl BatchFormat {
    pub fn extension(self) -> &'static str {
        match self {
            BatchFormat::Lines => "txt",
            BatchFormat::Json => "json",
        }
    }

    pub fn render(self, batch: &WalletBatch) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            BatchFormat::Lines => Ok(batch.to_lines().into_bytes()),
            BatchFormat::Json => serde_json::to_vec_pretty(batch.records()),
        }
    }
}

/// Progress notifications. The generator never prints; callers render these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Wallet `index` finished. Arrives in completion order, not index order.
    WalletDerived { index: usize, total: usize },
    Persisted { path: PathBuf, count: usize },
}

/// A batch together with the file it was written to.
#[derive(Debug, Clone)]
pub struct PersistedBatch {
    pub batch: WalletBatch,
    pub path: PathBuf,
}

/// Requested counts below 1 become 1.
pub fn normalize_count(requested: i64) -> usize {
    if requested < 1 {
        1
    } else {
        usize::try_from(requested).unwrap_or(usize::MAX)
    }
}

/// `wallets_<YYYY-MM-DD>_<HH-mm-ss>.<ext>`
pub fn batch_file_name(timestamp: NaiveDateTime, format: BatchFormat) -> String {
    format!("wallets_{}.{}", timestamp.format("%Y-%m-%d_%H-%M-%S"), format.extension())
}

/// Drives N independent wallet derivations and persists the result once.
pub struct BatchGenerator<S, C> {
    store: S,
    clock: C,
    workchain: i32,
    network: Network,
    format: BatchFormat,
    cancel: Option<Arc<AtomicBool>>,
}

impl<S: RecordStore, C: Clock> BatchGenerator<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            workchain: 0,
            network: Network::Mainnet,
            format: BatchFormat::Lines,
            cancel: None,
        }
    }

    pub fn workchain(mut self, workchain: i32) -> Self {
        self.workchain = workchain;
        self
    }

    pub fn network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn format(mut self, format: BatchFormat) -> Self {
        self.format = format;
        self
    }

    /// Setting the flag stops the batch; nothing is written.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn generate(&self, count: i64, version: WalletVersion) -> Result<PersistedBatch, BatchError> {
        self.generate_with_progress(count, version, |_| {})
    }

    /// Derive `count` wallets (at least one) and write them as one file.
    ///
    /// Any failed derivation aborts the batch before anything is written. A
    /// failed write returns the batch inside [`BatchError::Persistence`].
    pub fn generate_with_progress<F>(
        &self,
        count: i64,
        version: WalletVersion,
        on_event: F,
    ) -> Result<PersistedBatch, BatchError>
    where
        F: Fn(BatchEvent) + Sync,
    {
        let batch = self.derive_batch(count, version, &on_event)?;
        let persisted = self.persist(batch)?;
        on_event(BatchEvent::Persisted { path: persisted.path.clone(), count: persisted.batch.len() });
        Ok(persisted)
    }

    /// Derive the records without persisting them.
    pub fn derive_batch<F>(&self, count: i64, version: WalletVersion, on_event: &F) -> Result<WalletBatch, BatchError>
    where
        F: Fn(BatchEvent) + Sync,
    {
        let total = normalize_count(count);
        let options = WalletOptions { version, workchain: self.workchain, network: self.network };
        let completed = AtomicUsize::new(0);

        // Each worker draws from the OS RNG on its own; collect keeps index order.
        let records = (1..=total)
            .into_par_iter()
            .map(|index| {
                if self.is_cancelled() {
                    return Err(BatchError::Cancelled { completed: completed.load(Ordering::Relaxed) });
                }

                let wallet = wallet::derive_wallet(&options).map_err(|source| BatchError::Wallet { index, source })?;
                completed.fetch_add(1, Ordering::Relaxed);
                on_event(BatchEvent::WalletDerived { index, total });

                Ok(wallet.into_record(index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if self.is_cancelled() {
            return Err(BatchError::Cancelled { completed: records.len() });
        }

        Ok(WalletBatch { records })
    }

    fn persist(&self, batch: WalletBatch) -> Result<PersistedBatch, BatchError> {
        let file_name = batch_file_name(self.clock.now(), self.format);
        let contents = self.format.render(&batch)?;

        match self.store.write(&file_name, &contents) {
            Ok(path) => Ok(PersistedBatch { batch, path }),
            Err(source) => Err(BatchError::Persistence { file_name, batch: Box::new(batch), source }),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn counts_below_one_normalize() {
        assert_eq!(normalize_count(-5), 1);
        assert_eq!(normalize_count(0), 1);
        assert_eq!(normalize_count(1), 1);
        assert_eq!(normalize_count(250), 250);
    }

    #[test]
    fn file_name_uses_hyphenated_time() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(7, 5, 1).unwrap();
        assert_eq!(batch_file_name(at, BatchFormat::Lines), "wallets_2024-03-09_07-05-01.txt");
        assert_eq!(batch_file_name(at, BatchFormat::Json), "wallets_2024-03-09_07-05-01.json");
    }

    #[test]
    fn lines_have_no_trailing_newline() {
        let batch = WalletBatch {
            records: vec![
                WalletRecord { index: 1, address: "A".into(), mnemonic: "x y".into() },
                WalletRecord { index: 2, address: "B".into(), mnemonic: "z w".into() },
            ],
        };
        assert_eq!(batch.to_lines(), "1|A|x y\n2|B|z w");
        assert_eq!(BatchFormat::Lines.render(&batch).unwrap(), b"1|A|x y\n2|B|z w".to_vec());
    }

    #[test]
    fn json_render_lists_records() {
        let batch = WalletBatch {
            records: vec![WalletRecord { index: 1, address: "A".into(), mnemonic: "x y".into() }],
        };
        let rendered = BatchFormat::Json.render(&batch).unwrap();
        let parsed: Vec<WalletRecord> = serde_json::from_slice(&rendered).unwrap();
        assert_eq!(parsed, batch.into_records());
    }
}
