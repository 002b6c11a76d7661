//! Array-backed block device with file persistence.

use std::fs;
use std::path::Path;

use log::debug;
use spin::Mutex;

use crate::block_dev::{BlockDevice, DiskImage};
use crate::config::{NUM_SECTORS, SECTOR_SIZE};
use crate::error::{FsError, Result};

pub struct RamDisk {
    inner: Mutex<Vec<u8>>,
    num_sectors: usize,
}

impl RamDisk {
    /// Creates a zeroed RamDisk of `NUM_SECTORS` sectors.
    pub fn new() -> Self {
        Self::with_sectors(NUM_SECTORS)
    }

    pub fn with_sectors(num_sectors: usize) -> Self {
        RamDisk {
            inner: Mutex::new(vec![0u8; num_sectors * SECTOR_SIZE]),
            num_sectors,
        }
    }

    fn range(&self, sector_id: u32, len: usize) -> Result<core::ops::Range<usize>> {
        if sector_id as usize >= self.num_sectors {
            return Err(FsError::InvalidSectorId(sector_id));
        }
        if len != SECTOR_SIZE {
            return Err(FsError::BadBufferSize(len));
        }
        let start = sector_id as usize * SECTOR_SIZE;
        Ok(start..start + SECTOR_SIZE)
    }
}

impl Default for RamDisk {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockDevice for RamDisk {
    fn num_sectors(&self) -> usize {
        self.num_sectors
    }

    fn read_sector(&self, sector_id: u32, buf: &mut [u8]) -> Result<()> {
        let range = self.range(sector_id, buf.len())?;
        buf.copy_from_slice(&self.inner.lock()[range]);
        Ok(())
    }

    fn write_sector(&self, sector_id: u32, buf: &[u8]) -> Result<()> {
        let range = self.range(sector_id, buf.len())?;
        self.inner.lock()[range].copy_from_slice(buf);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // Data already lives in memory; persistence goes through `save`.
        Ok(())
    }
}

impl DiskImage for RamDisk {
    fn initialize(&self) -> Result<()> {
        self.inner.lock().fill(0);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<()> {
        let bytes = fs::read(path)?;
        let mut data = self.inner.lock();
        if bytes.len() != data.len() {
            return Err(FsError::BadImageSize(bytes.len()));
        }
        data.copy_from_slice(&bytes);
        debug!("loaded {} bytes from {}", bytes.len(), path.display());
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        let data = self.inner.lock();
        fs::write(path, data.as_slice())?;
        debug!("saved {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}
