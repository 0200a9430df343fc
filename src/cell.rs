//! Ordinary TVM cells: up to 1023 data bits and four references, identified by
//! their representation hash.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::{Result, WalletError};

pub const MAX_CELL_BITS: usize = 1023;
pub const MAX_CELL_REFS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
    hash: [u8; 32],
    depth: u16,
}

impl Cell {
    /// Build a cell from `bit_len` bits stored MSB first in `data`. Bits past
    /// `bit_len` in the last byte are cleared.
    pub fn new(mut data: Vec<u8>, bit_len: usize, refs: Vec<Arc<Cell>>) -> Result<Self> {
        if bit_len > MAX_CELL_BITS {
            return Err(WalletError::CellOverflow(format!("{} bits", bit_len)));
        }
        if refs.len() > MAX_CELL_REFS {
            return Err(WalletError::CellOverflow(format!("{} references", refs.len())));
        }
        if data.len() != bit_len.div_ceil(8) {
            return Err(WalletError::CellOverflow(format!(
                "{} data bytes for {} bits",
                data.len(),
                bit_len
            )));
        }

        let tail = bit_len % 8;
        if tail != 0 {
            if let Some(last) = data.last_mut() {
                *last &= 0xff << (8 - tail);
            }
        }

        let depth = refs.iter().map(|r| r.depth + 1).max().unwrap_or(0);
        let hash = representation_hash(&data, bit_len, &refs);

        Ok(Self { data, bit_len, refs, hash, depth })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }
}

// d1 | d2 | data with completion tag | ref depths | ref hashes
fn representation_hash(data: &[u8], bit_len: usize, refs: &[Arc<Cell>]) -> [u8; 32] {
    let d1 = refs.len() as u8;
    let d2 = (bit_len / 8 + bit_len.div_ceil(8)) as u8;

    let mut hasher = Sha256::new();
    hasher.update([d1, d2]);
    hasher.update(&data[..bit_len / 8]);
    if bit_len % 8 != 0 {
        hasher.update([data[bit_len / 8] | (0x80 >> (bit_len % 8))]);
    }
    for r in refs {
        hasher.update(r.depth.to_be_bytes());
    }
    for r in refs {
        hasher.update(r.hash);
    }
    hasher.finalize().into()
}

/// Append-only bit writer producing a [`Cell`].
#[derive(Debug, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self> {
        if self.bit_len == MAX_CELL_BITS {
            return Err(WalletError::CellOverflow(format!("{} bits", MAX_CELL_BITS + 1)));
        }
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
        Ok(self)
    }

    pub fn store_u32(&mut self, value: u32) -> Result<&mut Self> {
        for shift in (0..32).rev() {
            self.store_bit((value >> shift) & 1 == 1)?;
        }
        Ok(self)
    }

    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        for &byte in bytes {
            for shift in (0..8).rev() {
                self.store_bit((byte >> shift) & 1 == 1)?;
            }
        }
        Ok(self)
    }

    pub fn store_ref(&mut self, cell: Arc<Cell>) -> Result<&mut Self> {
        if self.refs.len() == MAX_CELL_REFS {
            return Err(WalletError::CellOverflow(format!("{} references", MAX_CELL_REFS + 1)));
        }
        self.refs.push(cell);
        Ok(self)
    }

    pub fn build(self) -> Result<Cell> {
        Cell::new(self.data, self.bit_len, self.refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha256(bytes: &[u8]) -> [u8; 32] {
        Sha256::digest(bytes).into()
    }

    #[test]
    fn empty_cell_hash() {
        let cell = CellBuilder::new().build().unwrap();
        assert_eq!(cell.hash(), &sha256(&[0, 0]));
        assert_eq!(cell.depth(), 0);
    }

    #[test]
    fn partial_byte_gets_completion_tag() {
        let mut builder = CellBuilder::new();
        builder.store_bit(true).unwrap().store_bit(false).unwrap().store_bit(true).unwrap();
        let cell = builder.build().unwrap();

        assert_eq!(cell.bit_len(), 3);
        assert_eq!(cell.data(), &[0b1010_0000]);
        // d1 = 0, d2 = 0 + 1, data 101 + tag
        assert_eq!(cell.hash(), &sha256(&[0, 1, 0b1011_0000]));
    }

    #[test]
    fn refs_contribute_depth_and_hash() {
        let leaf = Arc::new(CellBuilder::new().build().unwrap());
        let mut builder = CellBuilder::new();
        builder.store_u32(0xdead_beef).unwrap().store_ref(leaf.clone()).unwrap();
        let parent = builder.build().unwrap();

        let mut repr = vec![1, 8, 0xde, 0xad, 0xbe, 0xef, 0, 0];
        repr.extend_from_slice(leaf.hash());
        assert_eq!(parent.hash(), &sha256(&repr));
        assert_eq!(parent.depth(), 1);
    }

    #[test]
    fn new_clears_bits_past_length() {
        let a = Cell::new(vec![0b1111_1111], 4, vec![]).unwrap();
        let b = Cell::new(vec![0b1111_0000], 4, vec![]).unwrap();
        assert_eq!(a.data(), &[0b1111_0000]);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn overflow_is_rejected() {
        let mut builder = CellBuilder::new();
        for _ in 0..MAX_CELL_BITS {
            builder.store_bit(false).unwrap();
        }
        assert!(matches!(builder.store_bit(true), Err(WalletError::CellOverflow(_))));

        let leaf = Arc::new(CellBuilder::new().build().unwrap());
        let mut builder = CellBuilder::new();
        for _ in 0..MAX_CELL_REFS {
            builder.store_ref(leaf.clone()).unwrap();
        }
        assert!(builder.store_ref(leaf).is_err());

        assert!(Cell::new(vec![0, 0], 3, vec![]).is_err());
    }
}
