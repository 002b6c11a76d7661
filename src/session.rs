//! A booted file system together with its backing image path and open-file table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use spin::Mutex;

use crate::bitmap::Packing;
use crate::config::MAX_OPEN_FILES;
use crate::inode::locate;
use crate::{DiskImage, Error, FileSystem, FileType, RamDisk, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub packing: Packing,
}

/// An open inode, identified by where its record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFile {
    pub inode_id: u32,
    pub sector: u32,
    pub offset: usize,
    pub cursor: u32,
}

pub struct Session<D: DiskImage = RamDisk> {
    fs: FileSystem<D>,
    image_path: Option<PathBuf>,
    open_files: Mutex<[Option<OpenFile>; MAX_OPEN_FILES]>,
}

impl Session<RamDisk> {
    /// Boots on a fresh in-memory device backed by the image at `image_path`.
    pub fn boot(image_path: impl AsRef<Path>) -> Result<Self> {
        Self::boot_with(Arc::new(RamDisk::new()), image_path, Options::default())
    }
}

impl<D: DiskImage> Session<D> {
    /// Loads and validates the image if one exists at `image_path`, otherwise formats the device.
    /// The path is remembered for `sync` only once boot succeeded.
    pub fn boot_with(device: Arc<D>, image_path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let image_path = image_path.as_ref();
        info!("booting from {}", image_path.display());
        device.initialize()?;

        let fs = if image_path.exists() {
            device.load(image_path)?;
            FileSystem::mount(device, options.packing)?
        } else {
            FileSystem::format(device, options.packing)?
        };

        Ok(Self::with_fs(fs, Some(image_path.to_path_buf())))
    }

    /// Formats the device without any backing image; `sync` does nothing.
    pub fn in_memory(device: Arc<D>, options: Options) -> Result<Self> {
        device.initialize()?;
        let fs = FileSystem::format(device, options.packing)?;
        Ok(Self::with_fs(fs, None))
    }

    fn with_fs(fs: FileSystem<D>, image_path: Option<PathBuf>) -> Self {
        Self {
            fs,
            image_path,
            open_files: Mutex::new([None; MAX_OPEN_FILES]),
        }
    }

    /// Persists the whole device to the image path.
    pub fn sync(&self) -> Result<()> {
        let Some(path) = &self.image_path else {
            return Ok(());
        };
        let device = self.fs.device();
        device.flush()?;
        device.save(path)?;
        info!("synced to {}", path.display());
        Ok(())
    }

    pub fn create_entry(&self, path: &str) -> Result<u32> {
        self.fs.create(path)
    }

    pub fn create_dir(&self, path: &str) -> Result<u32> {
        self.fs.mkdir(path)
    }

    /// Opens a regular file, returning its handle. An inode can be open only once at a time.
    pub fn open_entry(&self, path: &str) -> Result<usize> {
        let inode_id = self.fs.lookup(path)?;
        if self.fs.get_inode(inode_id)?.ftype != FileType::Regular {
            return Err(Error::NotFile);
        }
        let (sector, offset) = locate(inode_id);

        let mut table = self.open_files.lock();
        if table.iter().flatten().any(|f| f.sector == sector && f.offset == offset) {
            return Err(Error::AlreadyOpen);
        }
        let Some(handle) = table.iter().position(Option::is_none) else {
            return Err(Error::TooManyOpenFiles);
        };
        table[handle] = Some(OpenFile {
            inode_id,
            sector,
            offset,
            cursor: 0,
        });

        debug!("opened {:?} (inode {}) as handle {}", path, inode_id, handle);
        Ok(handle)
    }

    pub fn close(&self, handle: usize) -> Result<()> {
        let mut table = self.open_files.lock();
        match table.get_mut(handle).and_then(Option::take) {
            Some(file) => {
                debug!("closed handle {} (inode {})", handle, file.inode_id);
                Ok(())
            }
            None => Err(Error::BadHandle(handle)),
        }
    }

    pub fn open_file(&self, handle: usize) -> Option<OpenFile> {
        self.open_files.lock().get(handle).copied().flatten()
    }

    pub fn fs(&self) -> &FileSystem<D> {
        &self.fs
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }
}
