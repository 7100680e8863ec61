//! Synthetic ldlinux.sys images
//!
//! Default layout (all offsets absolute):
//!
//! ```text
//! 0x010  sect1 low dword      0x014  sect1 high dword
//! 0x080  patch area (magic)   0x100  extended patch area
//! 0x120  ADV pointers         0x140  subdir slot (32)
//! 0x160  subvol slot (32)     0x180  extent table (10 records)
//! 0x1F0  RAID patch point     0x200  body (patterned)
//! ```

use syslinux_patch::LDLINUX_MAGIC;

#[derive(Debug, Clone)]
pub struct ImageBuilder {
    pub len: usize,
    pub magic_offset: usize,
    pub epa_offset: u16,
    pub adv_ptr_offset: u16,
    pub dir_offset: u16,
    pub dir_len: u16,
    pub subvol_offset: u16,
    pub subvol_len: u16,
    pub sec_ptr_offset: u16,
    pub sec_ptr_count: u16,
    pub sect1_ptr0: u16,
    pub sect1_ptr1: u16,
    pub raid_patch: u16,
    pub seed: u8,
}

#[allow(dead_code)]
impl ImageBuilder {
    pub const BODY_START: usize = 0x200;

    pub fn new(len: usize) -> Self {
        Self {
            len,
            magic_offset: 0x80,
            epa_offset: 0x100,
            adv_ptr_offset: 0x120,
            dir_offset: 0x140,
            dir_len: 32,
            subvol_offset: 0x160,
            subvol_len: 32,
            sec_ptr_offset: 0x180,
            sec_ptr_count: 10,
            sect1_ptr0: 0x10,
            sect1_ptr1: 0x14,
            raid_patch: 0x1F0,
            seed: 3,
        }
    }

    pub fn sec_ptr_count(mut self, count: u16) -> Self {
        self.sec_ptr_count = count;
        self
    }

    pub fn dir_len(mut self, len: u16) -> Self {
        self.dir_len = len;
        self
    }

    pub fn seed(mut self, seed: u8) -> Self {
        self.seed = seed;
        self
    }

    /// Data sectors plus the two ADV sectors
    pub fn total_sectors(&self) -> usize {
        self.len.div_ceil(512) + 2
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; self.len];

        for (i, byte) in data.iter_mut().enumerate().skip(Self::BODY_START) {
            *byte = (i as u8).wrapping_mul(7).wrapping_add(self.seed);
        }

        let m = self.magic_offset;
        data[m..m + 4].copy_from_slice(&LDLINUX_MAGIC.to_le_bytes());
        data[m + 4..m + 8].copy_from_slice(&0x1234_5678u32.to_le_bytes());
        data[m + 22..m + 24].copy_from_slice(&self.epa_offset.to_le_bytes());

        let e = self.epa_offset as usize;
        let fields = [
            self.adv_ptr_offset,
            self.dir_offset,
            self.dir_len,
            self.subvol_offset,
            self.subvol_len,
            self.sec_ptr_offset,
            self.sec_ptr_count,
            self.sect1_ptr0,
            self.sect1_ptr1,
            self.raid_patch,
        ];
        for (i, value) in fields.iter().enumerate() {
            data[e + i * 2..e + i * 2 + 2].copy_from_slice(&value.to_le_bytes());
        }

        data
    }
}
