use std::sync::Arc;

use log::{info, warn};
use spin::Mutex;

use crate::bitmap::{Bitmap, Packing};
use crate::config::*;
use crate::directory::{dir_add_entry, dir_init, dir_lookup, read_dir};
use crate::inode::{get_inode, write_inode};
use crate::path::resolve;
use crate::structs::*;
use crate::superblock::{read_superblock, write_superblock};
use crate::{BlockDevice, Error, Result};

#[derive(Debug)]
pub struct FileSystem<D: BlockDevice> {
    device: Arc<D>,
    inode_bitmap: Bitmap,
    data_bitmap: Bitmap,
    /// Serializes every directory lookup-then-append cycle.
    namespace: Mutex<()>,
}

impl<D: BlockDevice> FileSystem<D> {
    fn with_device(device: Arc<D>, packing: Packing) -> Self {
        let num_sectors = device.num_sectors();
        Self {
            device,
            inode_bitmap: Bitmap::inodes(packing),
            data_bitmap: Bitmap::data_blocks(packing, num_sectors),
            namespace: Mutex::new(()),
        }
    }

    /// Lays a fresh file system on the device: signature, empty bitmaps and the root directory.
    pub fn format(device: Arc<D>, packing: Packing) -> Result<Self> {
        let fs = Self::with_device(device, packing);
        let dev = &*fs.device;

        write_superblock(dev)?;
        let zero = [0u8; SECTOR_SIZE];
        dev.write_sector(INODE_BITMAP_SECTOR, &zero)?;
        for i in 0..DATA_BITMAP_SECTORS {
            dev.write_sector(DATA_BITMAP_START + i, &zero)?;
        }

        fs.inode_bitmap.reserve(dev, ROOT_INODE_ID)?;
        dir_init(dev, &fs.data_bitmap, ROOT_INODE_ID, None)?;
        dev.flush()?;

        info!("formatted {} sectors, data region starts at {}", dev.num_sectors(), DATA_START);
        Ok(fs)
    }

    /// Opens a file system already present on the device.
    pub fn mount(device: Arc<D>, packing: Packing) -> Result<Self> {
        read_superblock(&*device)?;
        info!("mounted {} sectors", device.num_sectors());
        Ok(Self::with_device(device, packing))
    }

    /// Creates an empty regular file. Returns its inode id.
    pub fn create(&self, path: &str) -> Result<u32> {
        let _guard = self.namespace.lock();
        let (parent_id, name) = self.prepare_entry(path)?;
        let dev = &*self.device;

        let inode_id = self.inode_bitmap.alloc(dev)?;
        let committed = write_inode(dev, inode_id, &Inode::new(FileType::Regular))
            .and_then(|_| dir_add_entry(dev, parent_id, &DirEntry::new(inode_id, name)?));
        if let Err(e) = committed {
            warn!("create {:?} failed after allocating inode {}: {}", path, inode_id, e);
            self.inode_bitmap.release(dev, inode_id)?;
            return Err(e);
        }

        info!("created {:?} as inode {}", path, inode_id);
        Ok(inode_id)
    }

    /// Creates an empty directory. Returns its inode id.
    pub fn mkdir(&self, path: &str) -> Result<u32> {
        let _guard = self.namespace.lock();
        let (parent_id, name) = self.prepare_entry(path)?;
        let dev = &*self.device;

        let inode_id = self.inode_bitmap.alloc(dev)?;
        let block_id = match dir_init(dev, &self.data_bitmap, inode_id, Some(parent_id)) {
            Ok(block_id) => block_id,
            Err(e) => {
                warn!("mkdir {:?}: no room for the entry block: {}", path, e);
                self.inode_bitmap.release(dev, inode_id)?;
                return Err(e);
            }
        };
        if let Err(e) = dir_add_entry(dev, parent_id, &DirEntry::new(inode_id, name)?) {
            warn!("mkdir {:?} failed after allocating inode {}: {}", path, inode_id, e);
            self.data_bitmap.release(dev, block_id - DATA_START)?;
            self.inode_bitmap.release(dev, inode_id)?;
            return Err(e);
        }

        info!("created directory {:?} as inode {}", path, inode_id);
        Ok(inode_id)
    }

    /// Resolves the parent of a new entry and checks the name is free and fits.
    /// Caller holds the namespace lock.
    fn prepare_entry<'a>(&self, path: &'a str) -> Result<(u32, &'a str)> {
        let (parent_id, name) = resolve(&*self.device, path)?;
        check_name(name)?;
        let (existing, count) = dir_lookup(&*self.device, parent_id, name)?;
        if existing.is_some() {
            return Err(Error::AlreadyExists);
        }
        if count >= MAX_DIR_ENTRIES {
            warn!("directory {} is full, cannot add {:?}", parent_id, name);
            return Err(Error::DirectoryFull);
        }
        Ok((parent_id, name))
    }

    /// Inode id of the entry at `path`. The root has no entry of its own,
    /// so "/" is `NotFound` here.
    pub fn lookup(&self, path: &str) -> Result<u32> {
        let _guard = self.namespace.lock();
        let (parent_id, name) = resolve(&*self.device, path)?;
        match dir_lookup(&*self.device, parent_id, name) {
            Ok((Some(inode_id), _)) => Ok(inode_id),
            Ok((None, _)) | Err(Error::NotDirectory) => Err(Error::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Entries of the directory at `path`, in insertion order; "/" is the root.
    pub fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let inode_id = if path.starts_with('/') && path.trim_matches('/').is_empty() {
            ROOT_INODE_ID
        } else {
            self.lookup(path)?
        };
        let _guard = self.namespace.lock();
        read_dir(&*self.device, inode_id)
    }

    pub fn get_inode(&self, inode_id: u32) -> Result<Inode> {
        get_inode(&*self.device, inode_id)
    }

    pub fn inode_bitmap(&self) -> &Bitmap {
        &self.inode_bitmap
    }

    pub fn data_bitmap(&self) -> &Bitmap {
        &self.data_bitmap
    }

    pub fn root_inode_id(&self) -> u32 {
        ROOT_INODE_ID
    }

    pub fn device(&self) -> Arc<D> {
        Arc::clone(&self.device)
    }
}
