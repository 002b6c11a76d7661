use crate::config::*;
use crate::Error;
use crate::Result;

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Regular = 0,
    Directory = 1,
}

impl FileType {
    fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            0 => Ok(FileType::Regular),
            1 => Ok(FileType::Directory),
            _ => Err(Error::CorruptImage),
        }
    }
}

/// On-disk inode record, `INODE_SIZE` bytes, little endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inode {
    pub size: u32,
    pub ftype: FileType,
    pub direct_ptrs: [u32; NUM_DIRECT_PTRS], // Absolute sector numbers, 0 if unused
}

impl Inode {
    pub const fn new(ftype: FileType) -> Self {
        Self {
            size: 0,
            ftype,
            direct_ptrs: [0; NUM_DIRECT_PTRS],
        }
    }

    /// Whether `ptr` refers into the data region.
    pub fn is_valid_ptr(ptr: u32) -> bool {
        ptr >= DATA_START
    }

    /// Fails with `CorruptImage` on a type code that is neither file nor directory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let word = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        let mut direct_ptrs = [0; NUM_DIRECT_PTRS];
        for (k, ptr) in direct_ptrs.iter_mut().enumerate() {
            *ptr = word(8 + k * 4);
        }
        Ok(Self {
            size: word(0),
            ftype: FileType::from_raw(word(4))?,
            direct_ptrs,
        })
    }

    pub fn encode(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.size.to_le_bytes());
        out[4..8].copy_from_slice(&(self.ftype as u32).to_le_bytes());
        for (k, ptr) in self.direct_ptrs.iter().enumerate() {
            out[8 + k * 4..12 + k * 4].copy_from_slice(&ptr.to_le_bytes());
        }
    }
}

/// Directory entry, `DIR_ENTRY_SIZE` bytes: a NUL terminated name then the inode id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub name: [u8; NAME_FIELD_LEN],
    pub inode_id: u32,
}

impl DirEntry {
    pub fn new(inode_id: u32, name: &str) -> Result<Self> {
        check_name(name)?;
        let mut arr = [0; NAME_FIELD_LEN];
        arr[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self { name: arr, inode_id })
    }

    /// An entry with an empty name terminates the entry list.
    pub fn is_empty(&self) -> bool {
        self.name[0] == 0
    }

    pub fn name_bytes(&self) -> &[u8] {
        let end = self.name.iter().position(|&c| c == 0).unwrap_or(NAME_FIELD_LEN);
        &self.name[..end]
    }

    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.name_bytes()).into_owned()
    }

    pub fn name_eq(&self, name: &str) -> bool {
        self.name_bytes() == name.as_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Self {
        let mut name = [0; NAME_FIELD_LEN];
        name.copy_from_slice(&bytes[..NAME_FIELD_LEN]);
        let id = &bytes[NAME_FIELD_LEN..DIR_ENTRY_SIZE];
        Self {
            name,
            inode_id: u32::from_le_bytes([id[0], id[1], id[2], id[3]]),
        }
    }

    pub fn encode(&self, out: &mut [u8]) {
        out[..NAME_FIELD_LEN].copy_from_slice(&self.name);
        out[NAME_FIELD_LEN..DIR_ENTRY_SIZE].copy_from_slice(&self.inode_id.to_le_bytes());
    }
}

/// Names must fit the fixed field with its terminator and cannot contain separators.
pub fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN || name.contains(['/', '\0']) {
        return Err(Error::InvalidFileName);
    }
    Ok(())
}
