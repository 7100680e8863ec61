//! Sector alignment and calculation utilities

use crate::types::{SECTOR_SHIFT, SECTOR_SIZE};

/// Calculate number of sectors needed for byte count
pub fn sectors_for_bytes(byte_count: usize) -> usize {
    byte_count.div_ceil(SECTOR_SIZE)
}

/// Convert byte offset to sector number
pub fn byte_to_sector(byte_offset: u64) -> u64 {
    byte_offset >> SECTOR_SHIFT
}

/// Check if value is sector-aligned
pub fn is_sector_aligned(value: u64) -> bool {
    value & (SECTOR_SIZE as u64 - 1) == 0
}
