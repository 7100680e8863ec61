//! Patch area layout
//!
//! `ldlinux.sys` carries two fixed-layout headers. The [`PatchArea`] sits at
//! the first 4-byte-aligned occurrence of [`LDLINUX_MAGIC`]; its `epaoffset`
//! field holds the absolute image offset of the [`ExtPatchArea`]. Every
//! offset stored in the extended area is again absolute within the image.
//!
//! Both structures are parsed field by field from offset constants. Nothing
//! here overlays a `#[repr(C)]` type on the image bytes.

pub mod ext_patch_area;
pub mod patch_area;

pub use ext_patch_area::ExtPatchArea;
pub use patch_area::PatchArea;

use crate::error::{PatchError, Result};
use crate::types::LDLINUX_MAGIC;

/// Locate the magic at a 4-byte-aligned offset
pub fn find_magic(image: &[u8]) -> Option<usize> {
    let magic = LDLINUX_MAGIC.to_le_bytes();
    image
        .chunks_exact(4)
        .position(|word| word == magic)
        .map(|index| index * 4)
}

/// Both patch areas of one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Primary patch area
    pub patch_area: PatchArea,

    /// Extended patch area
    pub epa: ExtPatchArea,
}

impl Layout {
    /// Find and parse both patch areas
    pub fn locate(image: &[u8]) -> Result<Self> {
        let magic_offset = find_magic(image).ok_or(PatchError::MagicNotFound)?;
        let patch_area = PatchArea::parse(image, magic_offset)?;
        let epa = ExtPatchArea::parse(image, patch_area.epa_offset as usize)?;

        log::debug!(
            "patch area at 0x{:X}, extended patch area at 0x{:X}",
            magic_offset,
            patch_area.epa_offset
        );

        Ok(Self { patch_area, epa })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_magic_aligned() {
        let mut image = [0u8; 32];
        image[8..12].copy_from_slice(&LDLINUX_MAGIC.to_le_bytes());
        assert_eq!(find_magic(&image), Some(8));
    }

    #[test]
    fn test_find_magic_ignores_unaligned() {
        let mut image = [0u8; 32];
        image[6..10].copy_from_slice(&LDLINUX_MAGIC.to_le_bytes());
        assert_eq!(find_magic(&image), None);
    }

    #[test]
    fn test_find_magic_last_word() {
        let mut image = [0u8; 16];
        image[12..16].copy_from_slice(&LDLINUX_MAGIC.to_le_bytes());
        assert_eq!(find_magic(&image), Some(12));
    }

    #[test]
    fn test_locate_truncated_header() {
        let mut image = [0u8; 16];
        image[8..12].copy_from_slice(&LDLINUX_MAGIC.to_le_bytes());
        assert!(matches!(
            Layout::locate(&image),
            Err(PatchError::OutOfBounds { .. })
        ));
    }
}
