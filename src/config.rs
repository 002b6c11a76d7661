pub const SIGNATURE: &[u8; 8] = b"##SB##\n\0";

pub const SECTOR_SIZE: usize = 512;
pub const NUM_SECTORS: usize = 10000;
pub const SECTOR_BITS: usize = SECTOR_SIZE * 8;

pub const SUPERBLOCK_SECTOR: u32 = 0;
pub const INODE_BITMAP_SECTOR: u32 = 1;
pub const DATA_BITMAP_START: u32 = 2;
pub const DATA_BITMAP_SECTORS: u32 = 3;
pub const INODE_TABLE_START: u32 = DATA_BITMAP_START + DATA_BITMAP_SECTORS;
pub const INODE_TABLE_SECTORS: u32 = 128;
pub const DATA_START: u32 = INODE_TABLE_START + INODE_TABLE_SECTORS; // First sector of the data region

pub const ROOT_INODE_ID: u32 = 0;
pub const NUM_DIRECT_PTRS: usize = 30; // Direct pointers only, no indirection
pub const INODE_SIZE: usize = 4 + 4 + NUM_DIRECT_PTRS * 4;
pub const INODES_PER_SECTOR: usize = SECTOR_SIZE / INODE_SIZE;
pub const NUM_INODES: u32 = INODE_TABLE_SECTORS * INODES_PER_SECTOR as u32;

pub const NAME_FIELD_LEN: usize = 16;
pub const MAX_NAME_LEN: usize = NAME_FIELD_LEN - 1; // Room for the NUL terminator
pub const DIR_ENTRY_SIZE: usize = NAME_FIELD_LEN + 4;
pub const NUM_ENTRY_PER_SECTOR: usize = SECTOR_SIZE / DIR_ENTRY_SIZE;
pub const MAX_DIR_ENTRIES: usize = 25;
pub const DOT_NAME: &str = ".";
pub const DOTDOT_NAME: &str = "..";

pub const MAX_OPEN_FILES: usize = 256;

const _: () = assert!(SECTOR_SIZE % INODE_SIZE == 0);
const _: () = assert!(MAX_DIR_ENTRIES <= NUM_ENTRY_PER_SECTOR);
