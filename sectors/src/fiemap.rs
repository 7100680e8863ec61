//! Linux `FS_IOC_FIEMAP` query

use std::fs::File;
use std::io;
use std::mem::size_of;
use std::os::unix::io::AsRawFd;

use crate::error::{ExtractError, Result};
use crate::extent::PhysicalExtent;

/// `_IOWR('f', 11, struct fiemap)`
const FS_IOC_FIEMAP: libc::c_ulong = 0xC020_660B;

/// Flush dirty data before mapping
const FIEMAP_FLAG_SYNC: u32 = 0x0000_0001;

const FIEMAP_MAX_OFFSET: u64 = u64::MAX;

/// `struct fiemap` without its trailing extent array
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FiemapHeader {
    fm_start: u64,
    fm_length: u64,
    fm_flags: u32,
    fm_mapped_extents: u32,
    fm_extent_count: u32,
    fm_reserved: u32,
}

/// `struct fiemap_extent`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FiemapExtent {
    fe_logical: u64,
    fe_physical: u64,
    fe_length: u64,
    fe_reserved64: [u64; 2],
    fe_flags: u32,
    fe_reserved: [u32; 3],
}

const _: () = assert!(size_of::<FiemapHeader>() == 32);
const _: () = assert!(size_of::<FiemapExtent>() == 56);

const HEADER_WORDS: usize = size_of::<FiemapHeader>() / 8;
const EXTENT_WORDS: usize = size_of::<FiemapExtent>() / 8;

/// Header plus room for `capacity` extents, 8-byte aligned
struct FiemapBuffer {
    words: Vec<u64>,
    capacity: u32,
}

impl FiemapBuffer {
    fn new(capacity: u32, flags: u32) -> Self {
        let mut words = vec![0u64; HEADER_WORDS + capacity as usize * EXTENT_WORDS];
        let header = FiemapHeader {
            fm_start: 0,
            fm_length: FIEMAP_MAX_OFFSET,
            fm_flags: flags,
            fm_extent_count: capacity,
            ..Default::default()
        };
        // SAFETY: the buffer is at least HEADER_WORDS long and u64-aligned
        unsafe { (words.as_mut_ptr() as *mut FiemapHeader).write(header) };
        Self { words, capacity }
    }

    fn header(&self) -> FiemapHeader {
        // SAFETY: initialised in `new`, the kernel only rewrites it in place
        unsafe { (self.words.as_ptr() as *const FiemapHeader).read() }
    }

    fn extents(&self) -> &[FiemapExtent] {
        let mapped = self.header().fm_mapped_extents.min(self.capacity) as usize;
        // SAFETY: `mapped` never exceeds the slots allocated after the header
        unsafe {
            std::slice::from_raw_parts(
                self.words.as_ptr().add(HEADER_WORDS) as *const FiemapExtent,
                mapped,
            )
        }
    }

    fn ioctl(&mut self, file: &File) -> Result<()> {
        // SAFETY: the buffer holds a valid `struct fiemap` with `capacity`
        // trailing extents, matching `fm_extent_count`
        let ret = unsafe {
            libc::ioctl(
                file.as_raw_fd(),
                FS_IOC_FIEMAP as _,
                self.words.as_mut_ptr() as *mut libc::c_void,
            )
        };
        if ret < 0 {
            return Err(map_errno(io::Error::last_os_error()));
        }
        Ok(())
    }
}

fn map_errno(err: io::Error) -> ExtractError {
    match err.raw_os_error() {
        Some(libc::ENOENT) => ExtractError::NotFound,
        Some(libc::EOPNOTSUPP) | Some(libc::ENOTTY) => ExtractError::Unsupported,
        _ => ExtractError::Io(err),
    }
}

/// All extents of `file` in logical order
pub(crate) fn query(file: &File, sync: bool) -> Result<Vec<PhysicalExtent>> {
    let flags = if sync { FIEMAP_FLAG_SYNC } else { 0 };

    // Count only
    let mut probe = FiemapBuffer::new(0, flags);
    probe.ioctl(file)?;
    let count = probe.header().fm_mapped_extents;

    if count == 0 {
        log::debug!("no extents mapped");
        return Ok(Vec::new());
    }

    let mut buffer = FiemapBuffer::new(count, flags);
    buffer.ioctl(file)?;

    let mapped = buffer.header().fm_mapped_extents;
    if mapped > count {
        return Err(ExtractError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("kernel mapped {} extents into {} slots", mapped, count),
        )));
    }
    if mapped < count {
        log::debug!("extent count shrank from {} to {}", count, mapped);
    }

    Ok(buffer
        .extents()
        .iter()
        .map(|fe| PhysicalExtent::new(fe.fe_logical, fe.fe_physical, fe.fe_length).with_flags(fe.fe_flags))
        .collect())
}
