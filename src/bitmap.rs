//! Management of the inode bitmap and the data block bitmap.
//! Bit set means allocated. Every change is written through to its sector immediately.

use log::debug;
use spin::Mutex;

use crate::config::*;
use crate::error::FsError;
use crate::{BlockDevice, Result};

/// How many bits of each bitmap byte first-fit allocation hands out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Packing {
    /// A byte counts as full once its low nibble is set, matching existing images byte for byte.
    #[default]
    Nibble,
    /// All 8 bits of a byte are used.
    Full,
}

impl Packing {
    fn mask(self) -> u8 {
        match self {
            Packing::Nibble => 0x0F,
            Packing::Full => 0xFF,
        }
    }

    /// Lowest unset bit of `byte`, if the byte still has room under this packing.
    fn first_free_bit(self, byte: u8) -> Option<u32> {
        if byte & self.mask() == self.mask() {
            None
        } else {
            Some(byte.trailing_ones())
        }
    }
}

#[derive(Debug)]
pub struct Bitmap {
    start_sector: u32,
    sectors: u32,
    /// Indices at or beyond this are physically out of range.
    total_items: u32,
    packing: Packing,
    exhausted: FsError,
    lock: Mutex<()>,
}

impl Bitmap {
    /// The inode bitmap, bounded by the inode table capacity.
    pub fn inodes(packing: Packing) -> Self {
        Self {
            start_sector: INODE_BITMAP_SECTOR,
            sectors: 1,
            total_items: NUM_INODES,
            packing,
            exhausted: FsError::OutOfInodes,
            lock: Mutex::new(()),
        }
    }

    /// The data block bitmap; indices are relative to `DATA_START` and must stay on the device.
    pub fn data_blocks(packing: Packing, num_sectors: usize) -> Self {
        Self {
            start_sector: DATA_BITMAP_START,
            sectors: DATA_BITMAP_SECTORS,
            total_items: (num_sectors as u32).saturating_sub(DATA_START),
            packing,
            exhausted: FsError::OutOfSpace,
            lock: Mutex::new(()),
        }
    }

    fn position(&self, index: u32) -> Result<(u32, usize, u8)> {
        let sector = index / SECTOR_BITS as u32;
        if index >= self.total_items || sector >= self.sectors {
            return Err(self.exhausted);
        }
        let byte = (index as usize % SECTOR_BITS) / 8;
        Ok((self.start_sector + sector, byte, 1 << (index % 8)))
    }

    /// Claims the first free index.
    pub fn alloc(&self, device: &impl BlockDevice) -> Result<u32> {
        let _guard = self.lock.lock();
        let mut buf = [0u8; SECTOR_SIZE];

        for i in 0..self.sectors {
            let sector_id = self.start_sector + i;
            device.read_sector(sector_id, &mut buf)?;

            let Some((j, bit)) = buf
                .iter()
                .enumerate()
                .find_map(|(j, &byte)| self.packing.first_free_bit(byte).map(|bit| (j, bit)))
            else {
                continue;
            };

            let index = i * SECTOR_BITS as u32 + j as u32 * 8 + bit;
            if index >= self.total_items {
                return Err(self.exhausted);
            }
            buf[j] |= 1 << bit;
            device.write_sector(sector_id, &buf)?;
            debug!("bitmap@{}: allocated {}", self.start_sector, index);
            return Ok(index);
        }

        Err(self.exhausted)
    }

    /// Claims exactly `index`, failing if it is already taken.
    pub fn reserve(&self, device: &impl BlockDevice, index: u32) -> Result<()> {
        let _guard = self.lock.lock();
        let (sector_id, byte, mask) = self.position(index)?;
        let mut buf = [0u8; SECTOR_SIZE];
        device.read_sector(sector_id, &mut buf)?;
        if buf[byte] & mask != 0 {
            return Err(FsError::AlreadyTaken(index));
        }
        buf[byte] |= mask;
        device.write_sector(sector_id, &buf)?;
        debug!("bitmap@{}: reserved {}", self.start_sector, index);
        Ok(())
    }

    pub fn is_set(&self, device: &impl BlockDevice, index: u32) -> Result<bool> {
        let _guard = self.lock.lock();
        let (sector_id, byte, mask) = self.position(index)?;
        let mut buf = [0u8; SECTOR_SIZE];
        device.read_sector(sector_id, &mut buf)?;
        Ok(buf[byte] & mask != 0)
    }

    /// Gives back a tentatively claimed index.
    pub(crate) fn release(&self, device: &impl BlockDevice, index: u32) -> Result<()> {
        let _guard = self.lock.lock();
        let (sector_id, byte, mask) = self.position(index)?;
        let mut buf = [0u8; SECTOR_SIZE];
        device.read_sector(sector_id, &mut buf)?;
        buf[byte] &= !mask;
        device.write_sector(sector_id, &buf)?;
        debug!("bitmap@{}: released {}", self.start_sector, index);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::RamDisk;

    #[test]
    fn test_first_free_bit() {
        assert_eq!(Packing::Nibble.first_free_bit(0x00), Some(0));
        assert_eq!(Packing::Nibble.first_free_bit(0x07), Some(3));
        assert_eq!(Packing::Nibble.first_free_bit(0x0F), None);
        assert_eq!(Packing::Nibble.first_free_bit(0xF0), Some(0));
        assert_eq!(Packing::Full.first_free_bit(0x0F), Some(4));
        assert_eq!(Packing::Full.first_free_bit(0xFF), None);
    }

    #[test]
    fn test_nibble_allocation_order() {
        let rd = RamDisk::new();
        let bitmap = Bitmap::inodes(Packing::Nibble);
        let ids: Vec<u32> = (0..6).map(|_| bitmap.alloc(&rd).unwrap()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 8, 9]);

        let mut buf = [0u8; SECTOR_SIZE];
        rd.read_sector(INODE_BITMAP_SECTOR, &mut buf).unwrap();
        assert_eq!(buf[0], 0x0F);
        assert_eq!(buf[1], 0x03);
    }

    #[test]
    fn test_full_allocation_order() {
        let rd = RamDisk::new();
        let bitmap = Bitmap::inodes(Packing::Full);
        let ids: Vec<u32> = (0..10).map(|_| bitmap.alloc(&rd).unwrap()).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_reserve() {
        let rd = RamDisk::new();
        let bitmap = Bitmap::inodes(Packing::Nibble);
        bitmap.reserve(&rd, 0).unwrap();
        assert_eq!(bitmap.reserve(&rd, 0), Err(FsError::AlreadyTaken(0)));
        assert!(bitmap.is_set(&rd, 0).unwrap());
        assert!(!bitmap.is_set(&rd, 1).unwrap());
        assert_eq!(bitmap.alloc(&rd).unwrap(), 1);
        assert_eq!(bitmap.reserve(&rd, NUM_INODES), Err(FsError::OutOfInodes));
    }

    #[test]
    fn test_inode_exhaustion() {
        let rd = RamDisk::new();
        let bitmap = Bitmap::inodes(Packing::Nibble);
        let mut seen = std::collections::HashSet::new();
        loop {
            match bitmap.alloc(&rd) {
                Ok(id) => assert!(seen.insert(id), "index {} issued twice", id),
                Err(e) => {
                    assert_eq!(e, FsError::OutOfInodes);
                    break;
                }
            }
        }
        // Half of every byte is usable below the inode table capacity.
        assert_eq!(seen.len(), NUM_INODES as usize / 2);
        assert!(seen.iter().all(|&id| id < NUM_INODES && id % 8 < 4));
    }

    #[test]
    fn test_data_block_exhaustion_on_small_device() {
        let rd = RamDisk::with_sectors(DATA_START as usize + 5);
        let bitmap = Bitmap::data_blocks(Packing::Full, rd.num_sectors());
        for expected in 0..5 {
            assert_eq!(bitmap.alloc(&rd).unwrap(), expected);
        }
        // Bits remain in the bitmap but the region is physically out of range.
        assert_eq!(bitmap.alloc(&rd), Err(FsError::OutOfSpace));
    }

    #[test]
    fn test_release() {
        let rd = RamDisk::new();
        let bitmap = Bitmap::data_blocks(Packing::Nibble, rd.num_sectors());
        assert_eq!(bitmap.alloc(&rd).unwrap(), 0);
        assert_eq!(bitmap.alloc(&rd).unwrap(), 1);
        bitmap.release(&rd, 0).unwrap();
        assert!(!bitmap.is_set(&rd, 0).unwrap());
        assert_eq!(bitmap.alloc(&rd).unwrap(), 0);
    }
}
