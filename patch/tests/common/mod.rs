//! Common test utilities and mock block devices

pub mod builder;
pub use builder::ImageBuilder;

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use std::io;

/// In-memory block device for testing
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub data: Vec<u8>,
    pub block_size: usize,
}

impl MemoryBlockDevice {
    /// Create a zeroed device of `blocks` 512-byte sectors
    pub fn new(blocks: usize) -> Self {
        Self {
            data: vec![0u8; blocks * 512],
            block_size: 512,
        }
    }

    /// Create a device with a different block size
    #[allow(dead_code)]
    pub fn with_block_size(blocks: usize, block_size: usize) -> Self {
        Self {
            data: vec![0u8; blocks * block_size],
            block_size,
        }
    }

    /// Scatter `image` over `sectors`, one 512-byte chunk per sector
    ///
    /// The last chunk is zero padded, as it would be on a real filesystem.
    #[allow(dead_code)]
    pub fn install(&mut self, image: &[u8], sectors: &[u64]) {
        for (chunk, &lba) in image.chunks(512).zip(sectors) {
            let offset = lba as usize * 512;
            self.data[offset..offset + 512].fill(0);
            self.data[offset..offset + chunk.len()].copy_from_slice(chunk);
        }
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size as u32).expect("valid block size")
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok((self.data.len() / self.block_size) as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + dst.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        dst.copy_from_slice(&self.data[offset..offset + dst.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + src.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "write beyond end of device",
            ));
        }
        self.data[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Read back a little-endian u32 from a patch payload
#[allow(dead_code)]
pub fn payload_u32(data: &[u8]) -> u32 {
    u32::from_le_bytes(data.try_into().expect("4-byte payload"))
}

/// Read back a little-endian u64 from a patch payload
#[allow(dead_code)]
pub fn payload_u64(data: &[u8]) -> u64 {
    u64::from_le_bytes(data.try_into().expect("8-byte payload"))
}
