use std::path::Path;

use crate::error::FsError;

pub trait BlockDevice: Send + Sync {
    /// Returns the number of sectors in the block device.
    fn num_sectors(&self) -> usize;

    /// Reads a sector of data from the block device.
    /// buf.len() must be equal to SECTOR_SIZE.
    fn read_sector(&self, sector_id: u32, buf: &mut [u8]) -> Result<(), FsError>;

    /// Writes a sector of data to the block device.
    /// buf.len() must be equal to SECTOR_SIZE.
    fn write_sector(&self, sector_id: u32, buf: &[u8]) -> Result<(), FsError>;

    /// Flushes any buffered data to the backing store.
    fn flush(&self) -> Result<(), FsError>;
}

/// A block device whose whole contents can be persisted as a flat image file,
/// the concatenation of all sectors in order.
pub trait DiskImage: BlockDevice {
    /// Resets every sector to zero.
    fn initialize(&self) -> Result<(), FsError>;

    /// Replaces the device contents with the image stored at `path`.
    fn load(&self, path: &Path) -> Result<(), FsError>;

    /// Writes the device contents to `path`.
    fn save(&self, path: &Path) -> Result<(), FsError>;
}
