//! Error types for sector extraction

use std::fmt;
use std::io;

use syslinux_patch::PatchError;

/// Result type for sector extraction
pub type Result<T> = core::result::Result<T, ExtractError>;

/// Errors that can occur while mapping a file to physical sectors
#[derive(Debug)]
pub enum ExtractError {
    /// File does not exist
    NotFound,

    /// Filesystem or device cannot report extents
    Unsupported,

    /// Extent not aligned to 512-byte sectors
    Misaligned {
        /// Physical byte offset of the extent
        physical: u64,
        /// Length of the extent in bytes
        length: u64,
    },

    /// Extent has no usable physical location (inline, encoded, delayed)
    Unmappable {
        /// Logical byte offset of the extent within the file
        logical: u64,
    },

    /// Any other open or query failure
    Io(io::Error),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "File not found"),
            Self::Unsupported => write!(f, "Filesystem does not support extent mapping"),
            Self::Misaligned { physical, length } => write!(
                f,
                "Extent at byte {} ({} bytes) is not sector aligned",
                physical, length
            ),
            Self::Unmappable { logical } => {
                write!(f, "Extent at file offset {} has no physical location", logical)
            }
            Self::Io(err) => write!(f, "Extent query failed: {}", err),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ExtractError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Errors from the combined extract-and-patch step
#[derive(Debug)]
pub enum InstallError {
    /// Sector discovery failed
    Extract(ExtractError),

    /// Patch calculation failed
    Patch(PatchError),
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract(err) => write!(f, "{}", err),
            Self::Patch(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for InstallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Extract(err) => Some(err),
            Self::Patch(_) => None,
        }
    }
}

impl From<ExtractError> for InstallError {
    fn from(err: ExtractError) -> Self {
        Self::Extract(err)
    }
}

impl From<PatchError> for InstallError {
    fn from(err: PatchError) -> Self {
        Self::Patch(err)
    }
}
