//! Loader unit tests.

use std::io::Write;

use nanoemu_core::sim::loader;

#[test]
fn load_binary_returns_raw_bytes() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0x13, 0x37, 0x00, 0xFF]).unwrap();

    let path = file.path().to_string_lossy().into_owned();
    assert_eq!(loader::load_binary(&path), vec![0x13, 0x37, 0x00, 0xFF]);
}

#[test]
fn load_binary_accepts_empty_files() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let path = file.path().to_string_lossy().into_owned();
    assert_eq!(loader::load_binary(&path), Vec::<u8>::new());
}
