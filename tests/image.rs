mod common;

use std::fs;
use std::sync::Arc;

use common::names;
use quark::{Error, NUM_SECTORS, Options, Packing, RamDisk, SECTOR_SIZE, Session};
use tempfile::TempDir;

#[test]
fn test_boot_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("disk.img");

    let s = Session::boot(&path).unwrap();
    assert_eq!(s.image_path(), Some(path.as_path()));
    s.create_entry("/file1").unwrap();
    s.create_dir("/dir").unwrap();
    s.create_entry("/dir/inner").unwrap();
    // Nothing reaches the host until sync.
    assert!(!path.exists());
    s.sync().unwrap();
    drop(s);

    let image = fs::read(&path).unwrap();
    assert_eq!(image.len(), SECTOR_SIZE * NUM_SECTORS);
    assert_eq!(&image[..8], b"##SB##\n\0");

    let s = Session::boot(&path).unwrap();
    assert_eq!(names(&s.fs().read_dir("/").unwrap()), vec![".", "..", "file1", "dir"]);
    assert_eq!(names(&s.fs().read_dir("/dir").unwrap()), vec![".", "..", "inner"]);
    assert_eq!(s.fs().lookup("/file1").unwrap(), 1);
    // Allocation continues where the previous session stopped.
    assert_eq!(s.create_entry("/file2").unwrap(), 8);
    assert_eq!(s.create_entry("/file1"), Err(Error::AlreadyExists));
}

#[test]
fn test_corrupt_signature() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("disk.img");
    let s = Session::boot(&path).unwrap();
    s.create_entry("/file1").unwrap();
    s.sync().unwrap();
    drop(s);
    let good = fs::read(&path).unwrap();

    for i in 0..8 {
        let mut bad = good.clone();
        bad[i] ^= 0xFF;
        fs::write(&path, &bad).unwrap();

        match Session::boot(&path) {
            Err(e) => assert_eq!(e, Error::CorruptImage),
            Ok(_) => panic!("boot accepted an image with byte {} flipped", i),
        }
        assert_eq!(fs::read(&path).unwrap(), bad);
    }
}

#[test]
fn test_truncated_image() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("disk.img");
    fs::write(&path, [0u8; 100]).unwrap();
    assert!(matches!(Session::boot(&path), Err(Error::BadImageSize(100))));
}

#[test]
fn test_sync_without_image() {
    let s = Session::in_memory(Arc::new(RamDisk::new()), Options::default()).unwrap();
    s.create_entry("/file1").unwrap();
    assert!(s.image_path().is_none());
    s.sync().unwrap();
}

#[test]
fn test_full_packing_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("disk.img");
    let options = Options { packing: Packing::Full };

    let s = Session::boot_with(Arc::new(RamDisk::new()), &path, options).unwrap();
    let ids: Vec<u32> = (0..5).map(|i| s.create_entry(&format!("/f{}", i)).unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    s.sync().unwrap();
    drop(s);

    let image = fs::read(&path).unwrap();
    // Inode bitmap lives in sector 1.
    assert_eq!(image[SECTOR_SIZE], 0b0011_1111);

    let s = Session::boot_with(Arc::new(RamDisk::new()), &path, options).unwrap();
    assert_eq!(s.create_entry("/f5").unwrap(), 6);
}

#[test]
fn test_nibble_image_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("disk.img");
    let s = Session::boot(&path).unwrap();
    for i in 0..4 {
        s.create_entry(&format!("/f{}", i)).unwrap();
    }
    s.create_dir("/d").unwrap();
    s.sync().unwrap();

    let image = fs::read(&path).unwrap();
    let inode_bitmap = &image[SECTOR_SIZE..2 * SECTOR_SIZE];
    assert_eq!(&inode_bitmap[..3], &[0x0F, 0x03, 0x00]);
    let data_bitmap = &image[2 * SECTOR_SIZE..3 * SECTOR_SIZE];
    assert_eq!(data_bitmap[0], 0b0000_0011);
}
