//! Sector extent compression
//!
//! The loader copies each extent with one real-mode BIOS read. A single copy
//! has to stay below 64 KiB and inside one 64 KiB segment, so runs are
//! merged greedily while simulating the load address.

use alloc::vec::Vec;

use crate::error::Result;
use crate::layout::Layout;
use crate::types::{Sector, LOAD_ADDRESS, SECTOR_SIZE};
use crate::utils::le;

/// On-disk extent record: 64-bit LBA followed by a 16-bit sector count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyslinuxExtent {
    /// First sector of the run
    pub lba: u64,

    /// Sectors in the run
    pub len: u16,
}

impl SyslinuxExtent {
    /// Packed record size (no padding)
    pub const SIZE: usize = 10;

    /// Create new extent
    pub fn new(lba: u64, len: u16) -> Self {
        Self { lba, len }
    }

    /// Serialize as a packed little-endian record
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..8].copy_from_slice(&self.lba.to_le_bytes());
        out[8..].copy_from_slice(&self.len.to_le_bytes());
        out
    }

    /// Parse a packed record
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let mut lba = [0u8; 8];
        lba.copy_from_slice(&bytes[..8]);
        Self {
            lba: u64::from_le_bytes(lba),
            len: u16::from_le_bytes([bytes[8], bytes[9]]),
        }
    }

    /// End LBA (exclusive)
    pub fn end_lba(&self) -> u64 {
        self.lba + self.len as u64
    }
}

/// Compress a sector list into loader extents
///
/// Output extents partition the input in order.
pub fn generate_extents(sectors: &[Sector]) -> Vec<SyslinuxExtent> {
    let mut extents = Vec::new();
    let mut iter = sectors.iter().copied();

    let Some(first) = iter.next() else {
        return extents;
    };

    let mut base = LOAD_ADDRESS as u64;
    let mut addr = base + SECTOR_SIZE as u64;
    let mut lba = first;
    let mut len: u64 = 1;

    for sect in iter {
        let xbytes = (len + 1) * SECTOR_SIZE as u64;

        let contiguous = lba.checked_add(len) == Some(sect);
        let size_ok = xbytes < 0x1_0000;
        let boundary_ok = (addr ^ (base + xbytes - 1)) & 0xffff_0000 == 0;

        if contiguous && size_ok && boundary_ok {
            len += 1;
        } else {
            extents.push(SyslinuxExtent::new(lba, len as u16));
            base = addr;
            lba = sect;
            len = 1;
        }

        addr += SECTOR_SIZE as u64;
    }

    extents.push(SyslinuxExtent::new(lba, len as u16));

    #[cfg(feature = "trace")]
    for ext in &extents {
        log::trace!("extent lba={} len={}", ext.lba, ext.len);
    }

    extents
}

/// Decode the extent table of a patched image
///
/// Stops at the table capacity or the first zero-length record.
pub fn read_extent_table(image: &[u8]) -> Result<Vec<SyslinuxExtent>> {
    let layout = Layout::locate(image)?;
    let mut extents = Vec::new();
    let mut offset = layout.epa.sec_ptr_offset as usize;

    for _ in 0..layout.epa.sec_ptr_count {
        let ext = SyslinuxExtent::new(
            le::read_u64(image, offset)?,
            le::read_u16(image, offset + 8)?,
        );
        if ext.len == 0 {
            break;
        }
        extents.push(ext);
        offset += SyslinuxExtent::SIZE;
    }

    Ok(extents)
}
