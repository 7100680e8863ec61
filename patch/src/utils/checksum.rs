//! Whole-image dword checksum
//!
//! The loader sums the image as little-endian `u32` words and expects the
//! total to equal [`LDLINUX_MAGIC`]. A trailing partial word is not summed.

use crate::types::LDLINUX_MAGIC;

/// Wrapping sum of all complete little-endian dwords
pub fn checksum_32(data: &[u8]) -> u32 {
    data.chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .fold(0u32, u32::wrapping_add)
}

/// Value for the checksum field, given an image whose checksum field is zero
pub fn calculate_complement_32(data: &[u8]) -> u32 {
    LDLINUX_MAGIC.wrapping_sub(checksum_32(data))
}

/// Verify an installed image sums to the magic
pub fn verify_image_checksum(data: &[u8]) -> bool {
    checksum_32(data) == LDLINUX_MAGIC
}
