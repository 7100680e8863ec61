//! Patch application

use crate::types::PatchOperation;

/// Apply patches in order to a caller-owned buffer
///
/// A patch that does not fit inside `buf` is skipped. Returns the number of
/// patches applied.
pub fn apply_patches(buf: &mut [u8], patches: &[PatchOperation]) -> usize {
    let mut applied = 0;

    for patch in patches {
        if !patch.fits(buf.len()) {
            continue;
        }
        buf[patch.offset..patch.end()].copy_from_slice(&patch.data);
        applied += 1;
    }

    applied
}
