//! Wallet contract templates and address resolution.
//!
//! Every supported version has one entry in [`TEMPLATES`]: the published code
//! and the layout of its initial data cell. Resolution looks the version up in
//! that table; a version without an entry is an error, never a fallback.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::address::{check_workchain, ContractAddress};
use crate::boc;
use crate::cell::{Cell, CellBuilder};
use crate::error::{Result, WalletError};

/// Base subwallet id; the workchain is added to it.
pub const DEFAULT_WALLET_ID: u32 = 698_983_191;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletVersion {
    V3R1,
    V3R2,
    V4R2,
}

impl WalletVersion {
    pub const ALL: [WalletVersion; 3] = [WalletVersion::V3R1, WalletVersion::V3R2, WalletVersion::V4R2];

    pub fn as_str(self) -> &'static str {
        match self {
            WalletVersion::V3R1 => "v3r1",
            WalletVersion::V3R2 => "v3r2",
            WalletVersion::V4R2 => "v4r2",
        }
    }
}

impl fmt::Display for WalletVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletVersion {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        WalletVersion::ALL
            .into_iter()
            .find(|version| version.as_str() == name)
            .ok_or_else(|| WalletError::UnsupportedVersion(s.to_string()))
    }
}

type DataLayout = fn(&[u8; 32], u32) -> Result<Cell>;

struct ContractTemplate {
    version: WalletVersion,
    code_boc: &'static str,
    data: DataLayout,
    code: OnceLock<Arc<Cell>>,
}

impl ContractTemplate {
    const fn new(version: WalletVersion, code_boc: &'static str, data: DataLayout) -> Self {
        Self { version, code_boc, data, code: OnceLock::new() }
    }

    fn code(&self) -> Result<Arc<Cell>> {
        if let Some(code) = self.code.get() {
            return Ok(code.clone());
        }
        let bytes = general_purpose::STANDARD.decode(self.code_boc)?;
        let code = boc::deserialize(&bytes)?;
        Ok(self.code.get_or_init(|| code).clone())
    }
}

static TEMPLATES: [ContractTemplate; 3] = [
    ContractTemplate::new(WalletVersion::V3R1, WALLET_V3R1_CODE, v3_data),
    ContractTemplate::new(WalletVersion::V3R2, WALLET_V3R2_CODE, v3_data),
    ContractTemplate::new(WalletVersion::V4R2, WALLET_V4R2_CODE, v4_data),
];

fn template(version: WalletVersion) -> Result<&'static ContractTemplate> {
    TEMPLATES
        .iter()
        .find(|template| template.version == version)
        .ok_or_else(|| WalletError::UnsupportedVersion(version.to_string()))
}

// seqno:u32 wallet_id:u32 public_key:bits256
fn v3_data(public_key: &[u8; 32], wallet_id: u32) -> Result<Cell> {
    let mut builder = CellBuilder::new();
    builder.store_u32(0)?.store_u32(wallet_id)?.store_bytes(public_key)?;
    builder.build()
}

// v3 layout followed by an empty plugin dictionary
fn v4_data(public_key: &[u8; 32], wallet_id: u32) -> Result<Cell> {
    let mut builder = CellBuilder::new();
    builder
        .store_u32(0)?
        .store_u32(wallet_id)?
        .store_bytes(public_key)?
        .store_bit(false)?;
    builder.build()
}

/// Subwallet id used for a workchain.
pub fn wallet_id(workchain: i32) -> u32 {
    DEFAULT_WALLET_ID.wrapping_add_signed(workchain)
}

/// The deserialized code cell of a version.
pub fn code(version: WalletVersion) -> Result<Arc<Cell>> {
    template(version)?.code()
}

/// StateInit cell of a fresh wallet: no split depth, not special, code and data
/// present, no libraries.
pub fn state_init(public_key: &[u8; 32], workchain: i32, version: WalletVersion) -> Result<Cell> {
    let template = template(version)?;
    let code = template.code()?;
    let data = (template.data)(public_key, wallet_id(workchain))?;

    let mut builder = CellBuilder::new();
    builder
        .store_bit(false)?
        .store_bit(false)?
        .store_bit(true)?
        .store_bit(true)?
        .store_bit(false)?
        .store_ref(code)?
        .store_ref(Arc::new(data))?;
    builder.build()
}

/// Compute the address of the wallet contract owned by `public_key`.
pub fn resolve(public_key: &[u8; 32], workchain: i32, version: WalletVersion) -> Result<ContractAddress> {
    check_workchain(workchain)?;
    let init = state_init(public_key, workchain, version)?;
    ContractAddress::new(workchain, *init.hash())
}

/// [`resolve`] with the version given by name (`v3r1`, `v3r2`, `v4r2`).
pub fn resolve_named(public_key: &[u8; 32], workchain: i32, version: &str) -> Result<ContractAddress> {
    resolve(public_key, workchain, version.parse()?)
}

const WALLET_V3R1_CODE: &str = "te6cckEBAQEAYgAAwP8AIN0gggFMl7qXMO1E0NcLH+Ck8mCDCNcYINMf0x/TH/gjE7vyY+1E0NMf0x/T/9FRMrryoVFEuvKiBPkBVBBV+RDyo/gAkyDXSpbTB9QC+wDo0QGkyMsfyx/L/8ntVD++buA=";

const WALLET_V3R2_CODE: &str = "te6cckEBAQEAcQAA3v8AIN0gggFMl7ohggEznLqxn3Gw7UTQ0x/THzHXC//jBOCk8mCDCNcYINMf0x/TH/gjE7vyY+1E0NMf0x/T/9FRMrryoVFEuvKiBPkBVBBV+RDyo/gAkyDXSpbTB9QC+wDo0QGkyMsfyx/L/8ntVBC9ba0=";

const WALLET_V4R2_CODE: &str = "te6cckECFAEAAtQAART/APSkE/S88sgLAQIBIAIDAgFIBAUE+PKDCNcYINMf0x/THwL4I7vyZO1E0NMf0x/T//QE0VFDuvKhUVG68qIF+QFUEGT5EPKj+AAkpMjLH1JAyx9SMMv/UhD0AMntVPgPAdMHIcAAn2xRkyDXSpbTB9QC+wDoMOAhwAHjACHAAuMAAcADkTDjDQOkyMsfEssfy/8QERITAubQAdDTAyFxsJJfBOAi10nBIJJfBOAC0x8hghBwbHVnvSKCEGRzdHK9sJJfBeAD+kAwIPpEAcjKB8v/ydDtRNCBAUDXIfQEMFyBAQj0Cm+hMbOSXwfgBdM/yCWCEHBsdWe6kjgw4w0DghBkc3RyupJfBuMNBgcCASAICQB4AfoA9AQw+CdvIjBQCqEhvvLgUIIQcGx1Z4MesXCAGFAEywUmzxZY+gIZ9ADLaRfLH1Jgyz8gyYBA+wAGAIpQBIEBCPRZMO1E0IEBQNcgyAHPFvQAye1UAXKwjiOCEGRzdHKDHrFwgBhQBcsFUAPPFiP6AhPLassfyz/JgED7AJJfA+ICASAKCwBZvSQrb2omhAgKBrkPoCGEcNQICEekk30pkQzmkD6f+YN4EoAbeBAUiYcVnzGEAgFYDA0AEbjJftRNDXCx+AA9sp37UTQgQFA1yH0BDACyMoHy//J0AGBAQj0Cm+hMYAIBIA4PABmtznaiaEAga5Drhf/AABmvHfaiaEAQa5DrhY/AAG7SB/oA1NQi+QAFyMoHFcv/ydB3dIAYyMsFywIizxZQBfoCFMtrEszMyXP7AMhAFIEBCPRR8qcCAHCBAQjXGPoA0z/IVCBHgQEI9FHyp4IQbm90ZXB0gBjIywXLAlAGzxZQBPoCFMtqEssfyz/Jc/sAAgBsgQEI1xj6ANM/MFIkgQEI9Fnyp4IQZHN0cnB0gBjIywXLAlAFzxZQA/oCE8tqyx8Syz/Jc/sAAAr0AMntVGliJeU=";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressFlags;
    use crate::test_vectors::*;

    fn first_public_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        hex::decode_to_slice(FIRST_PUBLIC_HEX, &mut key).unwrap();
        key
    }

    #[test]
    fn code_matches_published_hashes() {
        let expected = [
            (WalletVersion::V3R1, "b61041a58a7980b946e8fb9e198e3c904d24799ffa36574ea4251c41a566f581", 0),
            (WalletVersion::V3R2, "84dafa449f98a6987789ba232358072bc0f76dc4524002a5d0918b9a75d2d599", 0),
            (WalletVersion::V4R2, "feb5ff6820e2ff0d9483e7e0d62c817d846789fb4ae580c878866d959dabd5c0", 7),
        ];
        for (version, hash, depth) in expected {
            let cell = code(version).unwrap();
            assert_eq!(hex::encode(cell.hash()), hash, "{version}");
            assert_eq!(cell.depth(), depth, "{version}");
        }
    }

    #[test]
    fn resolves_known_addresses() {
        let key = first_public_key();
        for &(name, workchain, friendly, hash) in FIRST_ADDRESSES {
            let address = resolve_named(&key, workchain, name).unwrap();
            assert_eq!(hex::encode(address.hash()), hash, "{name} {workchain}");
            assert_eq!(address.to_friendly(AddressFlags::default()), friendly);
        }
    }

    #[test]
    fn versions_give_distinct_addresses() {
        let key = first_public_key();
        let v3r1 = resolve(&key, 0, WalletVersion::V3R1).unwrap();
        let v3r2 = resolve(&key, 0, WalletVersion::V3R2).unwrap();
        let v4r2 = resolve(&key, 0, WalletVersion::V4R2).unwrap();
        assert_ne!(v3r1, v4r2);
        assert_ne!(v3r1, v3r2);
        assert_ne!(v3r2, v4r2);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let key = first_public_key();
        let err = resolve_named(&key, 0, "unknown-version").unwrap_err();
        assert!(matches!(err, WalletError::UnsupportedVersion(ref name) if name == "unknown-version"));
        assert!("v5r1".parse::<WalletVersion>().is_err());
    }

    #[test]
    fn version_names_round_trip() {
        for version in WalletVersion::ALL {
            assert_eq!(version.as_str().parse::<WalletVersion>().unwrap(), version);
        }
        assert_eq!("V4R2".parse::<WalletVersion>().unwrap(), WalletVersion::V4R2);
    }

    #[test]
    fn invalid_workchain_is_rejected() {
        let key = first_public_key();
        assert!(matches!(
            resolve(&key, 300, WalletVersion::V4R2),
            Err(WalletError::InvalidWorkchain(300))
        ));
    }

    #[test]
    fn wallet_id_follows_workchain() {
        assert_eq!(wallet_id(0), DEFAULT_WALLET_ID);
        assert_eq!(wallet_id(-1), DEFAULT_WALLET_ID - 1);
    }

    #[test]
    fn v4_data_carries_plugin_bit() {
        let key = first_public_key();
        assert_eq!(v3_data(&key, 1).unwrap().bit_len(), 320);
        assert_eq!(v4_data(&key, 1).unwrap().bit_len(), 321);
    }
}
