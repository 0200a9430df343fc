//! Bag-of-cells deserialization, enough to load published contract code.

use std::sync::Arc;

use crc::{Crc, CRC_32_ISCSI};

use crate::cell::{Cell, MAX_CELL_REFS};
use crate::error::{Result, WalletError};

const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];

struct RawCell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<usize>,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| invalid(format!("unexpected end of data at byte {}", self.pos)))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn uint(&mut self, len: usize) -> Result<usize> {
        Ok(self.take(len)?.iter().fold(0usize, |acc, &b| (acc << 8) | usize::from(b)))
    }
}

fn invalid(msg: impl Into<String>) -> WalletError {
    WalletError::InvalidBoc(msg.into())
}

/// Deserialize a single-root bag of cells.
///
/// Accepts the optional offset index and CRC32C trailer. Only ordinary
/// (non-exotic, level 0) cells are supported.
pub fn deserialize(bytes: &[u8]) -> Result<Arc<Cell>> {
    let mut reader = Reader { bytes, pos: 0 };

    if reader.take(4)? != BOC_MAGIC {
        return Err(invalid("bad magic"));
    }

    let flags = reader.byte()?;
    let has_index = flags & 0x80 != 0;
    let has_crc = flags & 0x40 != 0;
    let ref_size = usize::from(flags & 0x07);
    if ref_size == 0 || ref_size > 4 {
        return Err(invalid(format!("reference size {}", ref_size)));
    }

    let offset_size = usize::from(reader.byte()?);
    if offset_size == 0 || offset_size > 8 {
        return Err(invalid(format!("offset size {}", offset_size)));
    }

    let cell_count = reader.uint(ref_size)?;
    let root_count = reader.uint(ref_size)?;
    let _absent = reader.uint(ref_size)?;
    let total_size = reader.uint(offset_size)?;

    if root_count != 1 {
        return Err(invalid(format!("expected a single root, found {}", root_count)));
    }
    let root = reader.uint(ref_size)?;
    if root >= cell_count {
        return Err(invalid(format!("root index {} out of range", root)));
    }

    if has_index {
        reader.take(cell_count * offset_size)?;
    }

    let cells_start = reader.pos;
    let mut raw = Vec::with_capacity(cell_count);
    for index in 0..cell_count {
        raw.push(read_cell(&mut reader, ref_size, index)?);
    }
    if reader.pos - cells_start != total_size {
        return Err(invalid(format!(
            "cell data is {} bytes, header says {}",
            reader.pos - cells_start,
            total_size
        )));
    }

    if has_crc {
        let payload_len = reader.pos;
        let stored = reader.take(4)?;
        let expected = u32::from_le_bytes([stored[0], stored[1], stored[2], stored[3]]);
        if crc32c(&bytes[..payload_len]) != expected {
            return Err(invalid("crc32c mismatch"));
        }
    }
    if reader.pos != bytes.len() {
        return Err(invalid(format!("{} trailing bytes", bytes.len() - reader.pos)));
    }

    // Refs always point forward, so building back to front sees children first.
    let mut built: Vec<Option<Arc<Cell>>> = vec![None; cell_count];
    for (index, cell) in raw.into_iter().enumerate().rev() {
        let refs = cell
            .refs
            .iter()
            .map(|&r| {
                if r <= index {
                    return Err(invalid(format!("cell {} references earlier cell {}", index, r)));
                }
                built
                    .get(r)
                    .cloned()
                    .flatten()
                    .ok_or_else(|| invalid(format!("cell {} references missing cell {}", index, r)))
            })
            .collect::<Result<Vec<_>>>()?;

        built[index] = Some(Arc::new(Cell::new(cell.data, cell.bit_len, refs)?));
    }

    built.swap_remove(root).ok_or_else(|| invalid("root cell missing"))
}

fn read_cell(reader: &mut Reader<'_>, ref_size: usize, index: usize) -> Result<RawCell> {
    let d1 = reader.byte()?;
    let d2 = reader.byte()?;

    if d1 & 0x08 != 0 {
        return Err(invalid(format!("cell {} is exotic", index)));
    }
    if d1 >> 5 != 0 {
        return Err(invalid(format!("cell {} has a non-zero level", index)));
    }
    let ref_count = usize::from(d1 & 0x07);
    if ref_count > MAX_CELL_REFS {
        return Err(invalid(format!("cell {} has {} references", index, ref_count)));
    }

    let mut data = reader.take(usize::from(d2).div_ceil(2))?.to_vec();
    let bit_len = if d2 % 2 == 0 {
        usize::from(d2 / 2) * 8
    } else {
        // odd d2: the last byte ends with a completion tag
        let last = data.last().copied().unwrap_or(0);
        if last == 0 {
            return Err(invalid(format!("cell {} lacks a completion tag", index)));
        }
        data.len() * 8 - last.trailing_zeros() as usize - 1
    };
    if bit_len / 8 + bit_len.div_ceil(8) != usize::from(d2) {
        return Err(invalid(format!("cell {} has {} bits but descriptor {}", index, bit_len, d2)));
    }
    data.truncate(bit_len.div_ceil(8));

    let refs = (0..ref_count)
        .map(|_| reader.uint(ref_size))
        .collect::<Result<Vec<_>>>()?;

    Ok(RawCell { data, bit_len, refs })
}

const CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// CRC-32C, as used by the BoC trailer.
fn crc32c(bytes: &[u8]) -> u32 {
    CASTAGNOLI.checksum(bytes)
}
