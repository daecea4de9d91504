//! Scratch-directory helpers shared by the CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Two attractions on the equator, ten degrees apart.
pub(super) const EQUATOR_CATALOG: &str = r#"[
  {
    "id": "00000000-0000-0000-0000-00000000000a",
    "name": "West Gate",
    "location": { "x": 0.0, "y": 0.0 }
  },
  {
    "id": "00000000-0000-0000-0000-00000000000b",
    "name": "East Gate",
    "location": { "x": 10.0, "y": 0.0 }
  }
]"#;
