//! Contract addresses and their user-friendly encoding.
//!
//! The friendly form is 36 bytes, `tag | workchain | hash | crc16`, rendered as
//! 48 base64 characters. The tag carries the bounceable and test-only flags.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose, Engine as _};
use crc::{Crc, CRC_16_XMODEM};

use crate::error::{Result, WalletError};

/// Length of a friendly address string.
pub const FRIENDLY_LEN: usize = 48;

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TEST_ONLY: u8 = 0x80;

/// TON network an address is meant for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Global id of the network.
    pub fn global_id(self) -> i32 {
        match self {
            Network::Mainnet => -239,
            Network::Testnet => -3,
        }
    }
}

/// Encoding options for [`ContractAddress::to_friendly`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressFlags {
    pub bounceable: bool,
    pub test_only: bool,
    pub url_safe: bool,
}

impl Default for AddressFlags {
    fn default() -> Self {
        Self { bounceable: true, test_only: false, url_safe: true }
    }
}

impl AddressFlags {
    /// URL-safe, bounceable, test-only on testnet.
    pub fn for_network(network: Network) -> Self {
        Self { test_only: network == Network::Testnet, ..Self::default() }
    }
}

/// A workchain and the 32-byte state init hash of the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContractAddress {
    workchain: i8,
    hash: [u8; 32],
}

impl ContractAddress {
    pub fn new(workchain: i32, hash: [u8; 32]) -> Result<Self> {
        Ok(Self { workchain: check_workchain(workchain)?, hash })
    }

    pub fn workchain(&self) -> i32 {
        i32::from(self.workchain)
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// `workchain:hex` form.
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    pub fn to_friendly(&self, flags: AddressFlags) -> String {
        let mut tag = if flags.bounceable { TAG_BOUNCEABLE } else { TAG_NON_BOUNCEABLE };
        if flags.test_only {
            tag |= TAG_TEST_ONLY;
        }

        let mut bytes = [0u8; 36];
        bytes[0] = tag;
        bytes[1] = self.workchain as u8;
        bytes[2..34].copy_from_slice(&self.hash);
        let crc = crc16(&bytes[..34]);
        bytes[34..].copy_from_slice(&crc.to_be_bytes());

        if flags.url_safe {
            general_purpose::URL_SAFE.encode(bytes)
        } else {
            general_purpose::STANDARD.encode(bytes)
        }
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_friendly(AddressFlags::default()))
    }
}

/// A decoded friendly address together with its flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FriendlyAddress {
    pub address: ContractAddress,
    pub bounceable: bool,
    pub test_only: bool,
}

impl FromStr for FriendlyAddress {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != FRIENDLY_LEN {
            return Err(WalletError::InvalidAddress(format!(
                "expected {} characters, got {}",
                FRIENDLY_LEN,
                s.len()
            )));
        }

        let bytes = if s.contains(|c| c == '-' || c == '_') {
            general_purpose::URL_SAFE.decode(s)?
        } else {
            general_purpose::STANDARD.decode(s)?
        };
        if bytes.len() != 36 {
            return Err(WalletError::InvalidAddress(format!("decoded to {} bytes", bytes.len())));
        }

        let crc = u16::from_be_bytes([bytes[34], bytes[35]]);
        if crc16(&bytes[..34]) != crc {
            return Err(WalletError::InvalidAddress("checksum mismatch".to_string()));
        }

        let test_only = bytes[0] & TAG_TEST_ONLY != 0;
        let bounceable = match bytes[0] & !TAG_TEST_ONLY {
            TAG_BOUNCEABLE => true,
            TAG_NON_BOUNCEABLE => false,
            other => {
                return Err(WalletError::InvalidAddress(format!("unknown tag 0x{:02x}", other)));
            }
        };

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);

        Ok(Self {
            address: ContractAddress { workchain: bytes[1] as i8, hash },
            bounceable,
            test_only,
        })
    }
}

pub(crate) fn check_workchain(workchain: i32) -> Result<i8> {
    i8::try_from(workchain).map_err(|_| WalletError::InvalidWorkchain(workchain))
}

const XMODEM: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// CRC-16/XMODEM.
pub fn crc16(bytes: &[u8]) -> u16 {
    XMODEM.checksum(bytes)
}
