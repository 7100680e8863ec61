//! Physical extents and their flattening into sectors

use syslinux_patch::utils::sector::{byte_to_sector, is_sector_aligned};
use syslinux_patch::{Sector, SECTOR_SIZE};

use crate::error::{ExtractError, Result};

/// Physical location of the extent is not known yet
pub const FIEMAP_EXTENT_UNKNOWN: u32 = 0x0000_0002;
/// Allocation is delayed; implies `UNKNOWN`
pub const FIEMAP_EXTENT_DELALLOC: u32 = 0x0000_0004;
/// Data is compressed or otherwise encoded
pub const FIEMAP_EXTENT_ENCODED: u32 = 0x0000_0008;
/// Offsets are not block aligned
pub const FIEMAP_EXTENT_NOT_ALIGNED: u32 = 0x0000_0100;
/// Data lives inside the metadata block
pub const FIEMAP_EXTENT_DATA_INLINE: u32 = 0x0000_0200;

const UNMAPPABLE: u32 = FIEMAP_EXTENT_UNKNOWN
    | FIEMAP_EXTENT_DELALLOC
    | FIEMAP_EXTENT_ENCODED
    | FIEMAP_EXTENT_NOT_ALIGNED
    | FIEMAP_EXTENT_DATA_INLINE;

/// One extent as reported by the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalExtent {
    /// Byte offset within the file
    pub logical: u64,

    /// Byte offset on the device
    pub physical: u64,

    /// Length in bytes
    pub length: u64,

    /// Raw `FIEMAP_EXTENT_*` flags
    pub flags: u32,
}

impl PhysicalExtent {
    pub fn new(logical: u64, physical: u64, length: u64) -> Self {
        Self {
            logical,
            physical,
            length,
            flags: 0,
        }
    }

    /// Same extent with raw flags attached
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// First sector on the device
    pub fn start_sector(&self) -> Sector {
        byte_to_sector(self.physical)
    }

    /// Sectors covered
    pub fn sector_count(&self) -> u64 {
        self.length / SECTOR_SIZE as u64
    }

    fn check(&self) -> Result<()> {
        if self.flags & UNMAPPABLE != 0 {
            return Err(ExtractError::Unmappable {
                logical: self.logical,
            });
        }
        if !is_sector_aligned(self.physical) || !is_sector_aligned(self.length) {
            return Err(ExtractError::Misaligned {
                physical: self.physical,
                length: self.length,
            });
        }
        Ok(())
    }
}

/// Expand extents into individual sectors, extent order preserved
pub fn flatten_extents(extents: &[PhysicalExtent]) -> Result<Vec<Sector>> {
    for ext in extents {
        ext.check()?;
    }

    let total: u64 = extents.iter().map(PhysicalExtent::sector_count).sum();
    let mut sectors = Vec::with_capacity(total as usize);

    for ext in extents {
        let start = ext.start_sector();
        sectors.extend(start..start + ext.sector_count());
    }

    Ok(sectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_in_extent_order() {
        let extents = [
            PhysicalExtent::new(0, 4096 * 512, 3 * 512),
            PhysicalExtent::new(3 * 512, 100 * 512, 2 * 512),
        ];
        assert_eq!(
            flatten_extents(&extents).unwrap(),
            vec![4096, 4097, 4098, 100, 101]
        );
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten_extents(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_misaligned_rejected() {
        let extents = [PhysicalExtent::new(0, 1000, 512)];
        assert!(matches!(
            flatten_extents(&extents),
            Err(ExtractError::Misaligned { physical: 1000, length: 512 })
        ));

        let extents = [PhysicalExtent::new(0, 1024, 700)];
        assert!(matches!(
            flatten_extents(&extents),
            Err(ExtractError::Misaligned { .. })
        ));
    }

    #[test]
    fn test_inline_rejected() {
        let extents = [
            PhysicalExtent::new(0, 0, 512),
            PhysicalExtent::new(512, 0, 512).with_flags(FIEMAP_EXTENT_DATA_INLINE),
        ];
        assert!(matches!(
            flatten_extents(&extents),
            Err(ExtractError::Unmappable { logical: 512 })
        ));
    }

    #[test]
    fn test_last_flag_accepted() {
        // FIEMAP_EXTENT_LAST
        let extents = [PhysicalExtent::new(0, 2048, 1024).with_flags(0x1)];
        assert_eq!(flatten_extents(&extents).unwrap(), vec![4, 5]);
    }
}
