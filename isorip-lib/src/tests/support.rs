//! On-disk synthetic images and fake sinks for engine tests.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::sink::ExtractSink;

pub const SECTOR: usize = 2048;

pub const ROOT_DIR_SECTOR: u32 = 20;
pub const DOCS_DIR_SECTOR: u32 = 21;
pub const FILE_SIZE: u32 = 3000;
pub const HIDE_SIZE: u32 = 100;
pub const NOTE_SIZE: u32 = 500;
pub const BIG_SIZE: u32 = 70_000;

const SYNC_PATTERN: [u8; 12] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

fn put_u16_le(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32_le(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn path_record(name: &[u8], extent: u32, parent: u16) -> Vec<u8> {
    let mut rec = vec![0u8; 8 + name.len()];
    rec[0] = name.len() as u8;
    put_u32_le(&mut rec, 2, extent);
    put_u16_le(&mut rec, 6, parent);
    rec[8..].copy_from_slice(name);
    if name.len() % 2 == 1 {
        rec.push(0);
    }
    rec
}

fn dir_record(name: &[u8], extent: u32, size: u32, flags: u8) -> Vec<u8> {
    let mut len = 33 + name.len();
    if len % 2 == 1 {
        len += 1;
    }
    let mut rec = vec![0u8; len];
    rec[0] = len as u8;
    put_u32_le(&mut rec, 2, extent);
    put_u32_le(&mut rec, 10, size);
    // 2004-06-17 14:23:08
    rec[18..25].copy_from_slice(&[104, 6, 17, 14, 23, 8, 0]);
    rec[25] = flags;
    put_u16_le(&mut rec, 28, 1);
    rec[32] = name.len() as u8;
    rec[33..33 + name.len()].copy_from_slice(name);
    rec
}

pub fn file_content(seed: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| seed.wrapping_add(i as u8)).collect()
}

pub fn file_extent(index: u32) -> u32 {
    22 + 2 * index
}

/// Build a cooked test volume with `file_count` 3000-byte files in the
/// root, a hidden file, a 70 KB file, and `/DOCS/NOTE.TXT`.
pub fn build_image(file_count: u32) -> Vec<u8> {
    let hide_extent = 22 + 2 * file_count;
    let note_extent = hide_extent + 1;
    let big_extent = note_extent + 1;
    let total_sectors = big_extent + BIG_SIZE.div_ceil(SECTOR as u32);

    let mut image = vec![0u8; total_sectors as usize * SECTOR];

    let mut table = path_record(&[0], ROOT_DIR_SECTOR, 1);
    table.extend(path_record(b"DOCS", DOCS_DIR_SECTOR, 1));

    // Volume descriptor.
    let pvd = &mut image[16 * SECTOR..17 * SECTOR];
    pvd[0] = 1;
    pvd[1..6].copy_from_slice(b"CD001");
    pvd[6] = 1;
    pvd[8..40].fill(b' ');
    pvd[40..72].fill(b' ');
    pvd[40..47].copy_from_slice(b"ENGVOL ");
    put_u32_le(pvd, 80, total_sectors);
    put_u16_le(pvd, 120, 1);
    put_u16_le(pvd, 124, 1);
    put_u16_le(pvd, 128, SECTOR as u16);
    put_u32_le(pvd, 132, table.len() as u32);
    put_u32_le(pvd, 140, 19);
    let root = dir_record(&[0], ROOT_DIR_SECTOR, SECTOR as u32, 0x02);
    pvd[156..156 + 34].copy_from_slice(&root);
    pvd[881] = 1;

    image[17 * SECTOR] = 255;
    image[17 * SECTOR + 1..17 * SECTOR + 6].copy_from_slice(b"CD001");

    image[19 * SECTOR..19 * SECTOR + table.len()].copy_from_slice(&table);

    let mut root_dir = dir_record(&[0], ROOT_DIR_SECTOR, SECTOR as u32, 0x02);
    root_dir.extend(dir_record(&[1], ROOT_DIR_SECTOR, SECTOR as u32, 0x02));
    root_dir.extend(dir_record(b"DOCS", DOCS_DIR_SECTOR, SECTOR as u32, 0x02));
    for i in 0..file_count {
        let name = format!("FILE{i}.TXT;1");
        root_dir.extend(dir_record(name.as_bytes(), file_extent(i), FILE_SIZE, 0x00));
    }
    root_dir.extend(dir_record(b"HIDE.SYS;1", hide_extent, HIDE_SIZE, 0x01));
    root_dir.extend(dir_record(b"BIG.BIN;1", big_extent, BIG_SIZE, 0x00));
    let start = ROOT_DIR_SECTOR as usize * SECTOR;
    image[start..start + root_dir.len()].copy_from_slice(&root_dir);

    let mut docs = dir_record(&[0], DOCS_DIR_SECTOR, SECTOR as u32, 0x02);
    docs.extend(dir_record(&[1], ROOT_DIR_SECTOR, SECTOR as u32, 0x02));
    docs.extend(dir_record(b"NOTE.TXT;1", note_extent, NOTE_SIZE, 0x00));
    let start = DOCS_DIR_SECTOR as usize * SECTOR;
    image[start..start + docs.len()].copy_from_slice(&docs);

    for i in 0..file_count {
        let start = file_extent(i) as usize * SECTOR;
        let content = file_content(i as u8, FILE_SIZE as usize);
        image[start..start + content.len()].copy_from_slice(&content);
    }
    let start = hide_extent as usize * SECTOR;
    image[start..start + HIDE_SIZE as usize]
        .copy_from_slice(&file_content(0xAA, HIDE_SIZE as usize));
    let start = note_extent as usize * SECTOR;
    image[start..start + NOTE_SIZE as usize]
        .copy_from_slice(&file_content(0xBB, NOTE_SIZE as usize));
    let start = big_extent as usize * SECTOR;
    image[start..start + BIG_SIZE as usize]
        .copy_from_slice(&file_content(0xCC, BIG_SIZE as usize));

    image
}

/// Wrap cooked sectors in raw 2352-byte Mode 1 framing.
pub fn wrap_raw_mode1(cooked: &[u8]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(cooked.len() / SECTOR * 2352);
    for chunk in cooked.chunks(SECTOR) {
        let mut sector = vec![0u8; 2352];
        sector[..12].copy_from_slice(&SYNC_PATTERN);
        sector[15] = 1;
        sector[16..16 + chunk.len()].copy_from_slice(chunk);
        raw.extend_from_slice(&sector);
    }
    raw
}

/// Write an image to a temp directory and return it with the path.
pub fn write_temp(name: &str, bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}

/// A sink that performs real directory/file operations while recording
/// the attribute calls the engine makes.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub modified: Vec<PathBuf>,
    pub hidden: HashSet<PathBuf>,
    pub space: Option<u64>,
    pub fat32: bool,
}

impl ExtractSink for RecordingSink {
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn set_modified(&mut self, path: &Path, _when: SystemTime) -> io::Result<()> {
        self.modified.push(path.to_path_buf());
        Ok(())
    }

    fn set_hidden(&mut self, path: &Path, hidden: bool) -> io::Result<()> {
        if hidden {
            self.hidden.insert(path.to_path_buf());
        }
        Ok(())
    }

    fn available_space(&self, _path: &Path) -> Option<u64> {
        self.space
    }

    fn is_fat32(&self, _path: &Path) -> bool {
        self.fat32
    }
}
