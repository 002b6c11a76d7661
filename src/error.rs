use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    #[error("i/o error: {0}")]
    Io(std::io::ErrorKind),
    #[error("sector {0} is out of range")]
    InvalidSectorId(u32),
    #[error("buffer length {0} does not match the sector size")]
    BadBufferSize(usize),
    #[error("image is {0} bytes, expected a whole device")]
    BadImageSize(usize),
    #[error("image is corrupted")]
    CorruptImage,
    #[error("no free inode")]
    OutOfInodes,
    #[error("no free data block")]
    OutOfSpace,
    #[error("bitmap index {0} is already taken")]
    AlreadyTaken(u32),
    #[error("entry already exists")]
    AlreadyExists,
    #[error("directory is full")]
    DirectoryFull,
    #[error("no such file or directory")]
    NotFound,
    #[error("not a directory")]
    NotDirectory,
    #[error("directory has no data block")]
    NoDataBlock,
    #[error("not a regular file")]
    NotFile,
    #[error("file is already open")]
    AlreadyOpen,
    #[error("too many open files")]
    TooManyOpenFiles,
    #[error("bad file handle {0}")]
    BadHandle(usize),
    #[error("invalid file name")]
    InvalidFileName,
}

impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        FsError::Io(err.kind())
    }
}

pub type Result<T> = core::result::Result<T, FsError>;
