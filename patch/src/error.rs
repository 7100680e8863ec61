//! Error types for boot image patching

use core::fmt;

/// Result type for patch engine operations
pub type Result<T> = core::result::Result<T, PatchError>;

/// Errors that can occur while patching or verifying a boot image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchError {
    /// No `LDLINUX_MAGIC` at any 4-byte-aligned offset
    MagicNotFound,

    /// A patch area field lies outside the image
    OutOfBounds {
        /// Absolute offset of the field
        offset: usize,
        /// Width of the field in bytes
        len: usize,
    },

    /// Image needs more data sectors than the 16-bit header field can hold
    ImageTooLarge,

    /// String does not fit the slot reserved for it
    CapacityExceeded {
        /// Encoded length including the terminator
        needed: usize,
        /// Slot size
        capacity: usize,
    },

    /// I/O error reading from block device
    IoError,

    /// Block device does not use 512-byte blocks
    InvalidBlockSize,

    /// Extent table does not describe every data sector
    IncompleteLoad,

    /// Loaded image does not sum to the magic
    ChecksumFailed,
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MagicNotFound => write!(f, "LDLINUX magic not found in boot image"),
            Self::OutOfBounds { offset, len } => {
                write!(f, "Patch area field at 0x{:X} ({} bytes) outside image", offset, len)
            }
            Self::ImageTooLarge => write!(f, "Boot image exceeds 16-bit sector count"),
            Self::CapacityExceeded { needed, capacity } => {
                write!(f, "String needs {} bytes, slot holds {}", needed, capacity)
            }
            Self::IoError => write!(f, "I/O error reading block device"),
            Self::InvalidBlockSize => write!(f, "Block device is not 512-byte addressed"),
            Self::IncompleteLoad => write!(f, "Extent table does not cover the image"),
            Self::ChecksumFailed => write!(f, "Boot image checksum mismatch"),
        }
    }
}
