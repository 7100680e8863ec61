//! Common types and constants for the patch engine

use alloc::string::String;
use alloc::vec::Vec;

/// Physical sector size (the boot format is always 512-byte addressed)
pub const SECTOR_SIZE: usize = 512;

/// Sector shift for byte/sector conversion
pub const SECTOR_SHIFT: u32 = 9;

/// Signature at the start of the patch area
pub const LDLINUX_MAGIC: u32 = 0x3eb2_02fe;

/// Sectors reserved after the image for the Auxiliary Data Vector
pub const ADV_SECTORS: usize = 2;

/// Real-mode address where the loader body starts loading
pub const LOAD_ADDRESS: u32 = 0x8000;

/// `int 18h` opcode written over the RAID patch point
pub const RAID_OPCODE: u16 = 0x18CD;

/// Absolute 512-byte sector number on the target device
pub type Sector = u64;

/// Single overwrite instruction
///
/// Applying a list of these in order to the generic image yields the
/// installed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOperation {
    /// Path label of the file this patch targets
    pub file: String,

    /// Absolute byte offset in the image
    pub offset: usize,

    /// Bytes to write at `offset`
    pub data: Vec<u8>,
}

impl PatchOperation {
    /// Create a new patch
    pub fn new(file: &str, offset: usize, data: Vec<u8>) -> Self {
        Self {
            file: file.into(),
            offset,
            data,
        }
    }

    /// End offset (exclusive)
    pub fn end(&self) -> usize {
        self.offset + self.data.len()
    }

    /// Whether the patch fits inside a buffer of `len` bytes
    pub fn fits(&self, len: usize) -> bool {
        self.end() <= len
    }
}

/// Install-time options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOptions {
    /// Fall through to the next boot device on failure (`int 18h`)
    pub raid_mode: bool,

    /// Directory holding ldlinux.sys, relative to the filesystem root
    pub subdir: Option<String>,

    /// Btrfs subvolume holding ldlinux.sys
    pub subvol: Option<String>,
}

impl PatchOptions {
    /// Options with RAID mode toggled
    pub fn with_raid(mut self, raid_mode: bool) -> Self {
        self.raid_mode = raid_mode;
        self
    }

    /// Options with an install subdirectory
    pub fn with_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.subdir = Some(subdir.into());
        self
    }

    /// Options with a subvolume
    pub fn with_subvol(mut self, subvol: impl Into<String>) -> Self {
        self.subvol = Some(subvol.into());
        self
    }
}
