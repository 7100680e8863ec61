//! Bounds-checked little-endian field access
//!
//! Every layout field goes through these so a truncated or hostile image
//! fails with [`PatchError::OutOfBounds`] instead of panicking.

use crate::error::{PatchError, Result};

#[inline]
fn field(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(PatchError::OutOfBounds { offset, len })
}

#[inline]
pub fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    let b = field(data, offset, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

#[inline]
pub fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let b = field(data, offset, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

#[inline]
pub fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let b = field(data, offset, 8)?;
    Ok(u64::from_le_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ]))
}

/// Overwrite `src.len()` bytes at `offset`
#[inline]
pub fn write_bytes(data: &mut [u8], offset: usize, src: &[u8]) -> Result<()> {
    let len = src.len();
    let dst = offset
        .checked_add(len)
        .and_then(|end| data.get_mut(offset..end))
        .ok_or(PatchError::OutOfBounds { offset, len })?;
    dst.copy_from_slice(src);
    Ok(())
}
