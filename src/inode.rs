//! Management of reading and writing to inodes.

use crate::config::*;
use crate::{BlockDevice, Inode, Result};

/// Sector holding the record of `inode_id` and the record's byte offset within it.
/// Records never straddle sectors since `INODE_SIZE` divides `SECTOR_SIZE`.
pub fn locate(inode_id: u32) -> (u32, usize) {
    let byte = inode_id as usize * INODE_SIZE;
    (INODE_TABLE_START + (byte / SECTOR_SIZE) as u32, byte % SECTOR_SIZE)
}

/// No bounds check: allocation never hands out an id beyond the inode table.
pub fn get_inode(device: &impl BlockDevice, inode_id: u32) -> Result<Inode> {
    let (sector_id, offset) = locate(inode_id);
    let mut buf = [0u8; SECTOR_SIZE];
    device.read_sector(sector_id, &mut buf)?;
    Inode::decode(&buf[offset..offset + INODE_SIZE])
}

/// Rewrites the record in place, leaving its sector neighbours untouched.
pub fn write_inode(device: &impl BlockDevice, inode_id: u32, inode: &Inode) -> Result<()> {
    let (sector_id, offset) = locate(inode_id);
    let mut buf = [0u8; SECTOR_SIZE];
    device.read_sector(sector_id, &mut buf)?;
    inode.encode(&mut buf[offset..offset + INODE_SIZE]);
    device.write_sector(sector_id, &buf)?;
    Ok(())
}
