//! Primary patch area (24 bytes)
//!
//! ```text
//! +0   magic        u32
//! +4   instance     u32
//! +8   data_sectors u16
//! +10  adv_sectors  u16
//! +12  dwords       u32
//! +16  checksum     u32
//! +20  maxtransfer  u16
//! +22  epaoffset    u16
//! ```

use crate::error::Result;
use crate::utils::le;

/// Patch area header fields at their magic-relative offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchArea {
    /// Absolute offset of the magic (start of the area)
    pub offset: usize,

    /// Instance identifier
    pub instance: u32,

    /// Data sectors, excluding the ADV
    pub data_sectors: u16,

    /// ADV sectors
    pub adv_sectors: u16,

    /// Number of dwords covered by the checksum
    pub dwords: u32,

    /// Stored checksum
    pub checksum: u32,

    /// Maximum sectors per transfer
    pub max_transfer: u16,

    /// Absolute offset of the extended patch area
    pub epa_offset: u16,
}

impl PatchArea {
    /// Header size in bytes
    pub const SIZE: usize = 24;

    pub const MAGIC: usize = 0;
    pub const INSTANCE: usize = 4;
    pub const DATA_SECTORS: usize = 8;
    pub const ADV_SECTORS: usize = 10;
    pub const DWORDS: usize = 12;
    pub const CHECKSUM: usize = 16;
    pub const MAX_TRANSFER: usize = 20;
    pub const EPA_OFFSET: usize = 22;

    /// Parse the header at `offset`
    pub fn parse(image: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            offset,
            instance: le::read_u32(image, offset + Self::INSTANCE)?,
            data_sectors: le::read_u16(image, offset + Self::DATA_SECTORS)?,
            adv_sectors: le::read_u16(image, offset + Self::ADV_SECTORS)?,
            dwords: le::read_u32(image, offset + Self::DWORDS)?,
            checksum: le::read_u32(image, offset + Self::CHECKSUM)?,
            max_transfer: le::read_u16(image, offset + Self::MAX_TRANSFER)?,
            epa_offset: le::read_u16(image, offset + Self::EPA_OFFSET)?,
        })
    }

    /// Absolute offset of a header field
    pub fn field(&self, relative: usize) -> usize {
        self.offset + relative
    }
}
