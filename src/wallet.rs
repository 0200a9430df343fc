use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::address::{check_workchain, AddressFlags, ContractAddress, Network};
use crate::contract::{self, WalletVersion};
use crate::error::{Result, WalletError};
use crate::keys::{self, KeyPair};
use crate::mnemonic::{self, Mnemonic};

/// One persisted wallet: `index|address|mnemonic`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WalletRecord {
    pub index: usize,
    pub address: String,
    pub mnemonic: String,
}

impl fmt::Display for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.index, self.address, self.mnemonic)
    }
}

impl FromStr for WalletRecord {
    type Err = WalletError;

    fn from_str(line: &str) -> Result<Self> {
        let mut fields = line.splitn(3, '|');
        let (Some(index), Some(address), Some(mnemonic)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(WalletError::InvalidRecord(format!("expected 3 fields in '{}'", line)));
        };

        let index: usize = index
            .parse()
            .map_err(|_| WalletError::InvalidRecord(format!("bad index '{}'", index)))?;
        if index == 0 {
            return Err(WalletError::InvalidRecord("indices start at 1".to_string()));
        }
        if address.is_empty() || mnemonic.is_empty() {
            return Err(WalletError::InvalidRecord(format!("empty field in '{}'", line)));
        }

        Ok(Self { index, address: address.to_string(), mnemonic: mnemonic.to_string() })
    }
}

/// What to derive: contract version, workchain and target network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalletOptions {
    pub version: WalletVersion,
    pub workchain: i32,
    pub network: Network,
}

impl Default for WalletOptions {
    fn default() -> Self {
        Self { version: WalletVersion::V4R2, workchain: 0, network: Network::Mainnet }
    }
}

/// Everything derived for one wallet.
#[derive(Debug, Clone)]
pub struct DerivedWallet {
    pub mnemonic: Mnemonic,
    pub keys: KeyPair,
    pub address: ContractAddress,
    pub network: Network,
}

impl DerivedWallet {
    /// URL-safe, bounceable form.
    pub fn friendly_address(&self) -> String {
        self.address.to_friendly(AddressFlags::for_network(self.network))
    }

    pub fn into_record(self, index: usize) -> WalletRecord {
        WalletRecord { index, address: self.friendly_address(), mnemonic: self.mnemonic.phrase() }
    }
}

/// Generate a phrase with the OS RNG and derive its wallet.
pub fn derive_wallet(options: &WalletOptions) -> Result<DerivedWallet> {
    derive_wallet_with(&mut OsRng, options)
}

/// Generate, validate, derive keys, resolve the address. The first failing
/// step ends the attempt.
pub fn derive_wallet_with<R: RngCore + CryptoRng>(rng: &mut R, options: &WalletOptions) -> Result<DerivedWallet> {
    check_workchain(options.workchain)?;
    let mnemonic = mnemonic::generate_with(rng)?;
    wallet_from_mnemonic(mnemonic, options)
}

pub fn wallet_from_mnemonic(mnemonic: Mnemonic, options: &WalletOptions) -> Result<DerivedWallet> {
    let keys = keys::derive(&mnemonic)?;
    let address = contract::resolve(keys.public_key(), options.workchain, options.version)?;
    Ok(DerivedWallet { mnemonic, keys, address, network: options.network })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::FriendlyAddress;
    use crate::test_vectors::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn known_phrase_gives_known_record() {
        let mnemonic = Mnemonic::from_phrase(SECOND_PHRASE).unwrap();
        let wallet = wallet_from_mnemonic(mnemonic, &WalletOptions::default()).unwrap();
        assert_eq!(wallet.keys.public_key_hex(), SECOND_PUBLIC_HEX);

        let record = wallet.into_record(7);
        assert_eq!(record.to_string(), format!("7|{}|{}", SECOND_V4R2_ADDRESS, SECOND_PHRASE));
    }

    #[test]
    fn testnet_sets_test_only_flag() {
        let mnemonic = Mnemonic::from_phrase(FIRST_PHRASE).unwrap();
        let options = WalletOptions { network: Network::Testnet, ..WalletOptions::default() };
        let wallet = wallet_from_mnemonic(mnemonic, &options).unwrap();

        let parsed: FriendlyAddress = wallet.friendly_address().parse().unwrap();
        assert!(parsed.test_only);
        assert!(parsed.bounceable);
        assert_eq!(parsed.address, wallet.address);
    }

    #[test]
    fn seeded_pipeline_is_reproducible() {
        let options = WalletOptions { version: WalletVersion::V3R2, ..WalletOptions::default() };
        let a = derive_wallet_with(&mut StdRng::seed_from_u64(9), &options).unwrap();
        let b = derive_wallet_with(&mut StdRng::seed_from_u64(9), &options).unwrap();
        assert_eq!(a.mnemonic, b.mnemonic);
        assert_eq!(a.keys, b.keys);
        assert_eq!(a.address, b.address);
    }

    #[test]
    fn bad_workchain_fails_before_generation() {
        let options = WalletOptions { workchain: -200, ..WalletOptions::default() };
        assert!(matches!(derive_wallet(&options), Err(WalletError::InvalidWorkchain(-200))));
    }

    #[test]
    fn record_line_round_trip() {
        let record = WalletRecord {
            index: 12,
            address: SECOND_V4R2_ADDRESS.to_string(),
            mnemonic: SECOND_PHRASE.to_string(),
        };
        let parsed: WalletRecord = record.to_string().parse().unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn record_parse_rejects_malformed_lines() {
        for line in ["", "1|addr", "x|addr|words", "0|addr|words", "1||words", "1|addr|"] {
            assert!(line.parse::<WalletRecord>().is_err(), "{line:?}");
        }
    }
}
