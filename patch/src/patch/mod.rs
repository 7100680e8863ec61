//! Patch calculation
//!
//! Produces the ordered overwrite list that turns the generic image into the
//! installed one. The order matters: the checksum is computed last, over a
//! scratch copy with every earlier patch applied.

pub mod apply;

pub use apply::apply_patches;

use alloc::format;
use alloc::vec::Vec;

use crate::error::{PatchError, Result};
use crate::extent::{generate_extents, SyslinuxExtent};
use crate::feedback::{FeedbackCategory, FeedbackCollector};
use crate::layout::{Layout, PatchArea};
use crate::types::{PatchOperation, PatchOptions, Sector, ADV_SECTORS, RAID_OPCODE};
use crate::utils::{checksum, le, sector};

/// Result of a patch calculation
#[derive(Debug, Clone)]
pub struct PatchPlan {
    /// Ordered overwrite list, checksum last
    pub patches: Vec<PatchOperation>,

    /// Warnings for every omitted patch
    pub feedback: FeedbackCollector,

    /// Patch areas found in the image
    pub layout: Layout,

    /// Data sectors plus ADV sectors
    pub total_sectors: usize,

    /// Extent records written to the table
    pub extents: Vec<SyslinuxExtent>,
}

impl PatchPlan {
    /// Checksum value written by the final patch
    pub fn checksum(&self) -> Option<u32> {
        self.patches.last().and_then(|p| {
            let bytes: [u8; 4] = p.data.as_slice().try_into().ok()?;
            Some(u32::from_le_bytes(bytes))
        })
    }
}

/// Accumulates patches for one target file
struct PatchList<'a> {
    file: &'a str,
    patches: Vec<PatchOperation>,
}

impl<'a> PatchList<'a> {
    fn new(file: &'a str) -> Self {
        Self {
            file,
            patches: Vec::new(),
        }
    }

    fn push(&mut self, offset: usize, data: &[u8]) {
        self.patches
            .push(PatchOperation::new(self.file, offset, data.to_vec()));
    }
}

/// Encode a path string for a fixed slot: UTF-8 plus a NUL terminator
pub fn encode_slot(value: &str, capacity: usize) -> Result<Vec<u8>> {
    let needed = value.len() + 1;
    if needed > capacity {
        return Err(PatchError::CapacityExceeded { needed, capacity });
    }
    let mut bytes = Vec::with_capacity(needed);
    bytes.extend_from_slice(value.as_bytes());
    bytes.push(0);
    Ok(bytes)
}

/// Calculate the patch list for an installed image
///
/// # Arguments
/// * `file` - Path label carried on every patch
/// * `image` - Generic `ldlinux.sys` bytes
/// * `sectors` - Installed footprint in file order, ADV sectors included
/// * `options` - RAID mode and optional path strings
pub fn calculate_patches(
    file: &str,
    image: &[u8],
    sectors: &[Sector],
    options: &PatchOptions,
) -> Result<Vec<PatchOperation>> {
    plan_patches(file, image, sectors, options).map(|plan| plan.patches)
}

/// Calculate the patch list together with layout details and feedback
pub fn plan_patches(
    file: &str,
    image: &[u8],
    sectors: &[Sector],
    options: &PatchOptions,
) -> Result<PatchPlan> {
    let layout = Layout::locate(image)?;
    let pa = layout.patch_area;
    let epa = layout.epa;

    let mut feedback = FeedbackCollector::new();
    let mut list = PatchList::new(file);

    feedback.debug(
        FeedbackCategory::Layout,
        format!(
            "LDLINUX magic at 0x{:X}, extended patch area at 0x{:X}",
            pa.offset, epa.offset
        ),
    );

    // First sector pointer, split into two dwords
    match sectors.first() {
        Some(&first) => {
            list.push(epa.sect1_ptr0 as usize, &(first as u32).to_le_bytes());
            list.push(epa.sect1_ptr1 as usize, &((first >> 32) as u32).to_le_bytes());
        }
        None => feedback.warning(
            FeedbackCategory::Sectors,
            "empty sector list, first sector pointer not written",
        ),
    }

    if options.raid_mode {
        list.push(epa.raid_patch as usize, &RAID_OPCODE.to_le_bytes());
    }

    // Totals
    let nsect = sector::sectors_for_bytes(image.len()) + ADV_SECTORS;
    let data_sectors =
        u16::try_from(nsect - ADV_SECTORS).map_err(|_| PatchError::ImageTooLarge)?;
    let dwords = u32::try_from(image.len() >> 2).map_err(|_| PatchError::ImageTooLarge)?;

    list.push(pa.field(PatchArea::DATA_SECTORS), &data_sectors.to_le_bytes());
    list.push(pa.field(PatchArea::ADV_SECTORS), &(ADV_SECTORS as u16).to_le_bytes());
    list.push(pa.field(PatchArea::DWORDS), &dwords.to_le_bytes());

    if !sectors.is_empty() && sectors.len() < nsect {
        feedback.warning(
            FeedbackCategory::Sectors,
            format!(
                "footprint has {} sectors, image needs {}",
                sectors.len(),
                nsect
            ),
        );
    }

    let mut written = Vec::new();

    if !sectors.is_empty() {
        // Everything after the first sector, up to the ADV
        let body = &sectors[1..];
        let body = &body[..body.len().min(nsect - 1 - ADV_SECTORS)];

        let extents = generate_extents(body);
        let capacity = epa.sec_ptr_count as usize;
        let mut offset = epa.sec_ptr_offset as usize;

        for ext in extents.iter().take(capacity) {
            list.push(offset, &ext.to_bytes());
            written.push(*ext);
            offset += SyslinuxExtent::SIZE;
        }

        if extents.len() > capacity {
            feedback.warning(
                FeedbackCategory::Extents,
                format!(
                    "extent table holds {} records, dropped {} of {}",
                    capacity,
                    extents.len() - capacity,
                    extents.len()
                ),
            );
        }

        // ADV sector pointers
        let adv = epa.adv_ptr_offset as usize;
        if let Some(&lba) = sectors.get(nsect - 2) {
            list.push(adv, &lba.to_le_bytes());
        }
        if let Some(&lba) = sectors.get(nsect - 1) {
            list.push(adv + 8, &lba.to_le_bytes());
        }
    }

    if let Some(subdir) = options.subdir.as_deref().filter(|s| !s.is_empty()) {
        match encode_slot(subdir, epa.dir_len as usize) {
            Ok(bytes) => list.push(epa.dir_offset as usize, &bytes),
            Err(err) => feedback.warning(
                FeedbackCategory::Strings,
                format!("subdirectory '{}' skipped: {}", subdir, err),
            ),
        }
    }

    if let Some(subvol) = options.subvol.as_deref().filter(|s| !s.is_empty()) {
        match encode_slot(subvol, epa.subvol_len as usize) {
            Ok(bytes) => list.push(epa.subvol_offset as usize, &bytes),
            Err(err) => feedback.warning(
                FeedbackCategory::Strings,
                format!("subvolume '{}' skipped: {}", subvol, err),
            ),
        }
    }

    // Checksum over a scratch copy with every patch so far applied
    let mut scratch = image.to_vec();
    for patch in &list.patches {
        if !patch.fits(scratch.len()) {
            feedback.warning(
                FeedbackCategory::Checksum,
                format!(
                    "patch at 0x{:X} ({} bytes) lies outside the image",
                    patch.offset,
                    patch.data.len()
                ),
            );
        }
    }
    apply_patches(&mut scratch, &list.patches);

    let csum_offset = pa.field(PatchArea::CHECKSUM);
    le::write_bytes(&mut scratch, csum_offset, &[0; 4])?;
    let csum = checksum::calculate_complement_32(&scratch);
    list.push(csum_offset, &csum.to_le_bytes());

    log::debug!(
        "{}: {} patches, {} data sectors, {} extents, checksum 0x{:08X}",
        file,
        list.patches.len(),
        data_sectors,
        written.len(),
        csum
    );

    Ok(PatchPlan {
        patches: list.patches,
        feedback,
        layout,
        total_sectors: nsect,
        extents: written,
    })
}
