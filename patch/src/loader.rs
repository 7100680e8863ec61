//! Boot load simulation
//!
//! Reads an installed image back from a block device exactly the way the
//! boot sector and the first loader sector do: one sector from the LBA held
//! at the `sect1` pointers, then every extent of the table in order. Used to
//! verify that a patched image really describes its own location.

use alloc::vec;
use alloc::vec::Vec;

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};

use crate::error::{PatchError, Result};
use crate::extent::read_extent_table;
use crate::layout::Layout;
use crate::types::SECTOR_SIZE;
use crate::utils::{checksum, le};

/// LBA of the first installed sector, as recorded in a patched image
pub fn read_first_sector(image: &[u8]) -> Result<u64> {
    let layout = Layout::locate(image)?;
    let lo = le::read_u32(image, layout.epa.sect1_ptr0 as usize)?;
    let hi = le::read_u32(image, layout.epa.sect1_ptr1 as usize)?;
    Ok((hi as u64) << 32 | lo as u64)
}

/// LBAs of the two ADV sectors, as recorded in a patched image
pub fn read_adv_sectors(image: &[u8]) -> Result<[u64; 2]> {
    let layout = Layout::locate(image)?;
    let adv = layout.epa.adv_ptr_offset as usize;
    Ok([le::read_u64(image, adv)?, le::read_u64(image, adv + 8)?])
}

/// Load the installed image from `block_io` using its own pointers
///
/// `image` is the patched image as the caller knows it; only its pointers
/// are used. Returns the loaded bytes trimmed to the checksummed length.
pub fn load_installed_image<B: BlockIo>(block_io: &mut B, image: &[u8]) -> Result<Vec<u8>> {
    if block_io.block_size() != BlockSize::BS_512 {
        return Err(PatchError::InvalidBlockSize);
    }

    let layout = Layout::locate(image)?;
    let data_sectors = layout.patch_area.data_sectors as usize;
    let dwords = layout.patch_area.dwords as usize;

    if data_sectors == 0 {
        return Err(PatchError::IncompleteLoad);
    }

    let first = read_first_sector(image)?;
    let extents = read_extent_table(image)?;

    let mut buffer = vec![0u8; data_sectors * SECTOR_SIZE];

    block_io
        .read_blocks(Lba(first), &mut buffer[..SECTOR_SIZE])
        .map_err(|_| PatchError::IoError)?;
    let mut loaded = 1;

    for ext in &extents {
        let count = (ext.len as usize).min(data_sectors - loaded);
        if count == 0 {
            break;
        }

        let start = loaded * SECTOR_SIZE;
        let end = start + count * SECTOR_SIZE;
        block_io
            .read_blocks(Lba(ext.lba), &mut buffer[start..end])
            .map_err(|_| PatchError::IoError)?;
        loaded += count;
    }

    if loaded < data_sectors {
        log::warn!(
            "extent table covers {} of {} data sectors",
            loaded,
            data_sectors
        );
        return Err(PatchError::IncompleteLoad);
    }

    buffer.truncate(dwords * 4);

    if !checksum::verify_image_checksum(&buffer) {
        return Err(PatchError::ChecksumFailed);
    }

    Ok(buffer)
}
