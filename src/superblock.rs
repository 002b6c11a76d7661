use log::warn;

use crate::config::*;
use crate::error::FsError;
use crate::BlockDevice;

/// Validates the signature stored at the start of sector 0.
pub fn read_superblock<D: BlockDevice + ?Sized>(device: &D) -> Result<(), FsError> {
    let mut buf = [0u8; SECTOR_SIZE];
    device.read_sector(SUPERBLOCK_SECTOR, &mut buf)?;

    if &buf[..SIGNATURE.len()] != SIGNATURE {
        warn!("superblock signature mismatch: {:?}", &buf[..SIGNATURE.len()]);
        return Err(FsError::CorruptImage);
    }
    Ok(())
}

/// Writes the signature into sector 0; the rest of the sector is zero.
pub fn write_superblock<D: BlockDevice + ?Sized>(device: &D) -> Result<(), FsError> {
    let mut buf = [0u8; SECTOR_SIZE];
    buf[..SIGNATURE.len()].copy_from_slice(SIGNATURE);
    device.write_sector(SUPERBLOCK_SECTOR, &buf)?;
    Ok(())
}
