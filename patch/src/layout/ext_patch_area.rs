//! Extended patch area (20 bytes)
//!
//! Each field is a 16-bit absolute image offset (or a length belonging to
//! the preceding offset). Reading a field yields a *target*; the patch goes
//! to that target, never to the field itself.

use crate::error::Result;
use crate::utils::le;

/// Install-time pointers read from the extended patch area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtPatchArea {
    /// Absolute offset of the area itself
    pub offset: usize,

    /// Target of the two 64-bit ADV sector pointers
    pub adv_ptr_offset: u16,

    /// Target of the NUL-terminated install directory
    pub dir_offset: u16,

    /// Size of the directory slot
    pub dir_len: u16,

    /// Target of the NUL-terminated subvolume name
    pub subvol_offset: u16,

    /// Size of the subvolume slot
    pub subvol_len: u16,

    /// Target of the extent table
    pub sec_ptr_offset: u16,

    /// Capacity of the extent table in records
    pub sec_ptr_count: u16,

    /// Target of the low 32 bits of the first sector's LBA
    pub sect1_ptr0: u16,

    /// Target of the high 32 bits of the first sector's LBA
    pub sect1_ptr1: u16,

    /// Target of the RAID-mode opcode
    pub raid_patch: u16,
}

impl ExtPatchArea {
    /// Area size in bytes
    pub const SIZE: usize = 20;

    pub const ADV_PTR_OFFSET: usize = 0;
    pub const DIR_OFFSET: usize = 2;
    pub const DIR_LEN: usize = 4;
    pub const SUBVOL_OFFSET: usize = 6;
    pub const SUBVOL_LEN: usize = 8;
    pub const SEC_PTR_OFFSET: usize = 10;
    pub const SEC_PTR_COUNT: usize = 12;
    pub const SECT1_PTR0: usize = 14;
    pub const SECT1_PTR1: usize = 16;
    pub const RAID_PATCH: usize = 18;

    /// Parse the area at the absolute offset `offset`
    pub fn parse(image: &[u8], offset: usize) -> Result<Self> {
        let at = |field: usize| le::read_u16(image, offset + field);

        Ok(Self {
            offset,
            adv_ptr_offset: at(Self::ADV_PTR_OFFSET)?,
            dir_offset: at(Self::DIR_OFFSET)?,
            dir_len: at(Self::DIR_LEN)?,
            subvol_offset: at(Self::SUBVOL_OFFSET)?,
            subvol_len: at(Self::SUBVOL_LEN)?,
            sec_ptr_offset: at(Self::SEC_PTR_OFFSET)?,
            sec_ptr_count: at(Self::SEC_PTR_COUNT)?,
            sect1_ptr0: at(Self::SECT1_PTR0)?,
            sect1_ptr1: at(Self::SECT1_PTR1)?,
            raid_patch: at(Self::RAID_PATCH)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_offsets() {
        let mut image = [0u8; 64];
        let base = 40;
        image[base + ExtPatchArea::SEC_PTR_OFFSET..base + ExtPatchArea::SEC_PTR_OFFSET + 2]
            .copy_from_slice(&600u16.to_le_bytes());
        image[base + ExtPatchArea::SECT1_PTR1..base + ExtPatchArea::SECT1_PTR1 + 2]
            .copy_from_slice(&18u16.to_le_bytes());

        let epa = ExtPatchArea::parse(&image, base).unwrap();
        assert_eq!(epa.offset, 40);
        assert_eq!(epa.sec_ptr_offset, 600);
        assert_eq!(epa.sect1_ptr1, 18);
        assert_eq!(epa.sect1_ptr0, 0);
    }

    #[test]
    fn test_parse_past_end() {
        let image = [0u8; 30];
        assert!(ExtPatchArea::parse(&image, 20).is_err());
    }
}
