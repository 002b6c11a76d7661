//! Quark is a minimal file system over a fixed-size, sector-addressed block device.
//! No permissions, timestamps, indirect blocks or journaling.
//!
//! Quark's linear layout, in sectors:
//! - Superblock (0): the 8-byte signature "##SB##\n\0"
//! - Inode Bitmap (1)
//! - Data Block Bitmap (2..5)
//! - Inode Table (5..133)
//! - Data Blocks (133..)
//!
//! Quark's layers (from bottom to top):
//! 1. Block Device: sector read/write plus image load/save.    | User implemented, `RamDisk` provided
//! 2. Bitmap: first-fit allocation of inodes and data blocks.  | Bitmap lock
//! 3. Inode: fixed-size records addressed by inode id.         |
//! 4. Directory/Path: single-block directories, path walking.  | Namespace lock
//! 5. FileSystem: format, mount, create, mkdir, lookup.        |
//! 6. Session: boot, sync and the open-file table.             | Open-file table lock

mod config;
mod block_dev;
mod ram_disk;
mod structs;
mod bitmap;
mod superblock;
mod inode;
mod directory;
mod path;
mod fs;
mod session;
mod error;

pub use block_dev::{BlockDevice, DiskImage};
pub use ram_disk::RamDisk;
pub use config::*;
pub use superblock::*;
pub use structs::*;
pub use bitmap::{Bitmap, Packing};
pub use inode::*;
pub use path::*;
pub use directory::*;
pub use fs::*;
pub use session::*;
pub use error::FsError as Error;
pub use error::Result;
