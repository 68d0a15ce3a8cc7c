use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::core::error::ExportError;
use crate::core::resolver::{derive_export_directory, DisplayItem, ExportPathResolver, Writer};
use crate::core::session::{SessionMetadata, SessionStore};
use crate::core::types::{NamingFields, SessionField};

/// Display item that just holds a title
struct TestItem {
    title: RefCell<String>,
}

impl TestItem {
    fn new(title: &str) -> Self {
        Self {
            title: RefCell::new(title.to_string()),
        }
    }
}

impl DisplayItem for TestItem {
    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }
}

/// Writer that writes the item title and counts calls
struct CountingWriter {
    extensions: Vec<String>,
    writes: Cell<usize>,
}

impl CountingWriter {
    fn new(extension: &str) -> Self {
        Self {
            extensions: vec![extension.to_string()],
            writes: Cell::new(0),
        }
    }
}

impl Writer for CountingWriter {
    fn id(&self) -> &str {
        "test-writer"
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn write(&self, item: &dyn DisplayItem, path: &Path) -> std::io::Result<()> {
        self.writes.set(self.writes.get() + 1);
        fs::write(path, item.title())
    }
}

fn session() -> SessionMetadata {
    SessionMetadata::new()
        .with(SessionField::Microscopist, "dmh")
        .with(SessionField::Sample, "S0042")
        .with(SessionField::SampleArea, "edge")
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 9, 15).unwrap()
}

// ============================================================================
// Export directory derivation
// ============================================================================

#[test]
fn test_export_directory_layout() {
    let dir = derive_export_directory(&session(), Path::new("/data/export"), date());
    assert_eq!(dir, Path::new("/data/export/2020_09_15_DMH_S0042_edge"));
}

#[test]
fn test_export_directory_reads_session_live() {
    let session = session();
    let resolver = ExportPathResolver::new("/data/export");

    let first = resolver.derive_export_directory(&session, date());
    session.set_value(SessionField::SampleArea, "centre");
    let second = resolver.derive_export_directory(&session, date());

    assert_ne!(first, second);
    assert_eq!(second, Path::new("/data/export/2020_09_15_DMH_S0042_centre"));
}

#[test]
fn test_export_directory_with_unset_session() {
    let dir = derive_export_directory(&SessionMetadata::new(), Path::new("/base"), date());
    assert_eq!(dir, Path::new("/base/2020_09_15___"));
}

// ============================================================================
// Safe write
// ============================================================================

#[test]
fn test_write_creates_parent_chain() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("a/b/c/001_BF_10nm_x.dm4");
    let resolver = ExportPathResolver::new(temp_dir.path());
    let writer = CountingWriter::new("dm4");
    let item = TestItem::new("001_BF_10nm_x");

    let written = resolver.write_artifact(&target, &item, &writer).unwrap();

    assert_eq!(written, target);
    assert!(target.is_file());
    assert_eq!(writer.writes.get(), 1);
}

#[test]
fn test_write_refused_when_file_exists() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("existing.dm4");
    fs::write(&target, "original").unwrap();

    let resolver = ExportPathResolver::new(temp_dir.path());
    let writer = CountingWriter::new("dm4");
    let item = TestItem::new("replacement");

    for _ in 0..2 {
        let err = resolver.write_artifact(&target, &item, &writer).unwrap_err();
        assert!(err.is_conflict());
        assert!(matches!(err, ExportError::FileExists(ref p) if p == &target));
    }

    assert_eq!(writer.writes.get(), 0, "Writer must never be called");
    assert_eq!(fs::read_to_string(&target).unwrap(), "original");
}

#[test]
fn test_second_write_to_same_target_refused() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("new/one.dm4");
    let resolver = ExportPathResolver::new(temp_dir.path());
    let writer = CountingWriter::new("dm4");
    let item = TestItem::new("one");

    assert!(resolver.write_artifact(&target, &item, &writer).is_ok());
    assert!(resolver.write_artifact(&target, &item, &writer).unwrap_err().is_conflict());
    assert_eq!(writer.writes.get(), 1);
}

// ============================================================================
// Full export action
// ============================================================================

#[test]
fn test_export_item_renames_and_writes() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = ExportPathResolver::new(temp_dir.path());
    let writer = CountingWriter::new("dm3");
    let item = TestItem::new("Untitled");
    let fields = NamingFields::new("3", "", "50", "overview");

    let path = resolver
        .export_item(&fields, "HAADF", temp_dir.path(), &item, &writer)
        .unwrap();

    assert_eq!(item.title(), "003_HAADF_50nm_overview");
    assert_eq!(path, temp_dir.path().join("003_HAADF_50nm_overview.dm3"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "003_HAADF_50nm_overview");
}

#[test]
fn test_refused_export_restores_title() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("003_BF_A_50nm_overview.dm4"), "x").unwrap();

    let resolver = ExportPathResolver::new(temp_dir.path());
    let writer = CountingWriter::new("dm4");
    let item = TestItem::new("Untitled");
    let fields = NamingFields::new("3", "A", "50", "overview");

    let err = resolver
        .export_item(&fields, "BF", temp_dir.path(), &item, &writer)
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(item.title(), "Untitled");
}

#[test]
fn test_invalid_fields_never_rename() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = ExportPathResolver::new(temp_dir.path());
    let writer = CountingWriter::new("dm4");
    let item = TestItem::new("Untitled");
    let fields = NamingFields::new("abc", "", "50", "overview");

    let err = resolver
        .export_item(&fields, "BF", temp_dir.path(), &item, &writer)
        .unwrap_err();

    assert!(matches!(err, ExportError::Naming(_)));
    assert_eq!(item.title(), "Untitled");
    assert_eq!(writer.writes.get(), 0);
}

#[test]
fn test_non_dm_writer_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = ExportPathResolver::new(temp_dir.path());
    let writer = CountingWriter::new("tif");
    let item = TestItem::new("Untitled");
    let fields = NamingFields::new("1", "", "5", "d");

    let err = resolver
        .export_item(&fields, "BF", temp_dir.path(), &item, &writer)
        .unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedExtension(ref e) if e == "tif"));
}
