//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{Local, NaiveDateTime, TimeZone};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

#[path = "../../src/metadata/fixture.rs"]
mod fixture;

pub use fixture::{Field, TiffBuilder, heif, jpeg, png};

pub const DATE_TIME: u16 = 0x0132;
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const DATE_TIME_DIGITIZED: u16 = 0x9004;

/// Little-endian TIFF block with ASCII tags in IFD0 and the Exif directory
pub fn tiff(ifd0: &[(u16, &str)], exif: &[(u16, &str)]) -> Vec<u8> {
    let builder = ifd0
        .iter()
        .fold(TiffBuilder::little_endian(), |b, (tag, text)| b.ifd0(Field::ascii(*tag, text)));
    exif.iter()
        .fold(builder, |b, (tag, text)| b.exif(Field::ascii(*tag, text)))
        .build()
}

/// Write a file and pin its modification time to a local wall-clock time
pub fn write_with_mtime(path: &Path, contents: &[u8], local: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();

    let naive = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M:%S").unwrap();
    let time: SystemTime = Local.from_local_datetime(&naive).earliest().unwrap().into();
    filetime::set_file_mtime(path, filetime::FileTime::from_system_time(time)).unwrap();
}

/// Every file under `root`, as sorted `/`-separated relative paths
pub fn tree(root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    paths.sort();
    paths
}
