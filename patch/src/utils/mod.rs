//! Utility functions

pub mod checksum;
pub mod le;
pub mod sector;
