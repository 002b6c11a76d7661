//! Directory entries of a directory live in a single data block, `direct_ptrs[0]`.
//! Entries are packed from the first byte and terminated by the first empty name.

use log::debug;

use crate::bitmap::Bitmap;
use crate::config::*;
use crate::error::{FsError, Result};
use crate::inode::{get_inode, write_inode};
use crate::structs::*;
use crate::BlockDevice;

/// Reads the directory inode and its entry block.
fn dir_block(device: &impl BlockDevice, dir_inode_id: u32) -> Result<(Inode, [u8; SECTOR_SIZE])> {
    let inode = get_inode(device, dir_inode_id)?;
    if inode.ftype != FileType::Directory {
        return Err(FsError::NotDirectory);
    }
    if !Inode::is_valid_ptr(inode.direct_ptrs[0]) {
        return Err(FsError::NoDataBlock);
    }
    let mut buf = [0u8; SECTOR_SIZE];
    device.read_sector(inode.direct_ptrs[0], &mut buf)?;
    Ok((inode, buf))
}

fn entries(block: &[u8; SECTOR_SIZE]) -> impl Iterator<Item = DirEntry> + '_ {
    block
        .chunks_exact(DIR_ENTRY_SIZE)
        .take(MAX_DIR_ENTRIES)
        .map(DirEntry::decode)
        .take_while(|entry| !entry.is_empty())
}

/// Turns `dir_inode_id` into an empty directory holding '.' and '..'.
/// `parent` is `None` for the root, whose '..' points back to itself.
/// Returns the sector of the directory's data block.
pub fn dir_init(
    device: &impl BlockDevice,
    data_bitmap: &Bitmap,
    dir_inode_id: u32,
    parent: Option<u32>,
) -> Result<u32> {
    let block_id = DATA_START + data_bitmap.alloc(device)?;

    let mut buf = [0u8; SECTOR_SIZE];
    DirEntry::new(dir_inode_id, DOT_NAME)?.encode(&mut buf[..DIR_ENTRY_SIZE]);
    DirEntry::new(parent.unwrap_or(dir_inode_id), DOTDOT_NAME)?
        .encode(&mut buf[DIR_ENTRY_SIZE..2 * DIR_ENTRY_SIZE]);
    device.write_sector(block_id, &buf)?;

    let mut inode = Inode::new(FileType::Directory);
    inode.size = 2 * DIR_ENTRY_SIZE as u32;
    inode.direct_ptrs[0] = block_id;
    write_inode(device, dir_inode_id, &inode)?;

    debug!("directory {} initialized in sector {}", dir_inode_id, block_id);
    Ok(block_id)
}

/// Entries of a directory in on-disk (insertion) order.
pub fn read_dir(device: &impl BlockDevice, dir_inode_id: u32) -> Result<Vec<DirEntry>> {
    let (_, block) = dir_block(device, dir_inode_id)?;
    Ok(entries(&block).collect())
}

/// Looks `name` up in a directory.
/// Also returns the number of entries, so callers can enforce the size limit without a second scan.
pub fn dir_lookup(
    device: &impl BlockDevice,
    dir_inode_id: u32,
    name: &str,
) -> Result<(Option<u32>, usize)> {
    let (_, block) = dir_block(device, dir_inode_id)?;
    let mut count = 0;
    let mut found = None;
    for entry in entries(&block) {
        count += 1;
        if found.is_none() && entry.name_eq(name) {
            found = Some(entry.inode_id);
        }
    }
    debug!("lookup {:?} in {}: {:?} ({} entries)", name, dir_inode_id, found, count);
    Ok((found, count))
}

/// Writes `entry` into the first empty slot of the directory.
/// Duplicate names are not checked here; callers look the name up first.
pub fn dir_add_entry(device: &impl BlockDevice, dir_inode_id: u32, entry: &DirEntry) -> Result<()> {
    let (mut inode, mut block) = dir_block(device, dir_inode_id)?;
    let slot = entries(&block).count();
    if slot >= MAX_DIR_ENTRIES {
        return Err(FsError::DirectoryFull);
    }

    let offset = slot * DIR_ENTRY_SIZE;
    entry.encode(&mut block[offset..offset + DIR_ENTRY_SIZE]);
    device.write_sector(inode.direct_ptrs[0], &block)?;

    inode.size = ((slot + 1) * DIR_ENTRY_SIZE) as u32;
    write_inode(device, dir_inode_id, &inode)?;

    debug!("added {:?} -> {} to directory {} at slot {}", entry.name(), entry.inode_id, dir_inode_id, slot);
    Ok(())
}
