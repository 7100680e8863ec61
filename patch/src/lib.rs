//! Syslinux Boot Image Patch Engine
//!
//! A `no_std` engine that adapts a generic `ldlinux.sys` image to the physical
//! sectors it occupies once installed on removable media.
//!
//! # Overview
//!
//! The loader stage runs in 16-bit real mode before any filesystem driver
//! exists, so it reads its own body from raw LBAs. Those LBAs have to be
//! written into the image after it is copied to the target. This crate
//! provides:
//! - Patch area discovery (magic scan, extended patch area indirection)
//! - Extent compression under real-mode copy limits
//! - Patch list calculation, including the whole-image checksum
//! - Patch application and checksum verification
//! - A boot load simulator over any [`gpt_disk_io::BlockIo`] device
//!
//! # Architecture
//!
//! 1. **Layout layer** - Fixed-offset views of the patch areas
//! 2. **Extent layer** - Sector list to 10-byte extent records
//! 3. **Patch layer** - Ordered overwrite operations and checksum
//! 4. **Loader layer** - Reads an installed image back the way the boot sector does
//!
//! # Usage
//!
//! ```ignore
//! use syslinux_patch::{calculate_patches, apply_patches, PatchOptions};
//!
//! // Sectors come from the installed file, ADV sectors included
//! let patches = calculate_patches("ldlinux.sys", &image, &sectors, &PatchOptions::default())?;
//!
//! let mut installed = image.to_vec();
//! apply_patches(&mut installed, &patches);
//! ```
//!
//! The engine never touches media. Writing the patched bytes to the installed
//! file is the caller's job.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod error;
pub mod types;
pub mod layout;
pub mod extent;
pub mod patch;
pub mod loader;
pub mod feedback;
pub mod utils;

pub use error::{PatchError, Result};
pub use types::{PatchOperation, PatchOptions, Sector, LDLINUX_MAGIC, SECTOR_SIZE};
pub use extent::{generate_extents, read_extent_table, SyslinuxExtent};
pub use feedback::{FeedbackCategory, FeedbackCollector, FeedbackLevel, FeedbackMessage};

// High-level API exports
pub use patch::{apply_patches, calculate_patches, plan_patches, PatchPlan};
pub use loader::{load_installed_image, read_adv_sectors, read_first_sector};
pub use utils::checksum::{checksum_32, verify_image_checksum};
