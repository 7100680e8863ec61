//! Installed File Sector Discovery
//!
//! Finds the absolute 512-byte sectors a file occupies on its block device,
//! in file-content order, using the Linux `FS_IOC_FIEMAP` ioctl.
//!
//! # Usage
//!
//! ```ignore
//! use syslinux_sectors::{extract_sectors, plan_install};
//!
//! let sectors = extract_sectors("/mnt/usb/ldlinux.sys")?;
//!
//! // Or in one step, straight to the patch plan
//! let plan = plan_install("/mnt/usb/ldlinux.sys", &image, &options)?;
//! ```
//!
//! The caller must keep the file's layout stable (fully written, no
//! defragmentation) until the resulting patches are applied.

pub mod error;
pub mod extent;
pub mod install;

#[cfg(target_os = "linux")]
mod fiemap;

pub use error::{ExtractError, InstallError, Result};
pub use extent::{flatten_extents, PhysicalExtent};
pub use install::plan_install;
pub use syslinux_patch::Sector;

use std::fs::File;
use std::io;
use std::path::Path;

/// Extraction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Flush dirty data before mapping so delayed allocations get real blocks
    pub sync: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { sync: true }
    }
}

/// Physical sectors of `path` with default options
pub fn extract_sectors(path: impl AsRef<Path>) -> Result<Vec<Sector>> {
    extract_sectors_with(path, &ExtractOptions::default())
}

/// Physical sectors of `path`
pub fn extract_sectors_with(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<Vec<Sector>> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ExtractError::NotFound,
        _ => ExtractError::Io(err),
    })?;

    let extents = query_extents(&file, options)?;
    let sectors = flatten_extents(&extents)?;

    log::debug!(
        "{}: {} extents, {} sectors",
        path.display(),
        extents.len(),
        sectors.len()
    );

    Ok(sectors)
}

#[cfg(target_os = "linux")]
fn query_extents(file: &File, options: &ExtractOptions) -> Result<Vec<PhysicalExtent>> {
    fiemap::query(file, options.sync)
}

#[cfg(not(target_os = "linux"))]
fn query_extents(_file: &File, _options: &ExtractOptions) -> Result<Vec<PhysicalExtent>> {
    Err(ExtractError::Unsupported)
}
