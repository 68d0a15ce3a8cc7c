use chrono::NaiveDate;
use std::fs;
use std::rc::Rc;

use super::fixtures::{FakeControl, Harness};
use crate::config::store::{keys, PersistentStore, DM_EXPORT_FILTER};
use crate::core::{DisplayItem, ExportError, FieldEdit, NamingField, SessionField, SessionStore};
use crate::panel::controller::{BUTTONS_PER_ROW, FILE_EXISTS_MESSAGE};
use crate::panel::host::ActionControl;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 9, 15).unwrap()
}

fn fill_fields(h: &Harness) {
    h.panel.on_field_edited(FieldEdit::new(NamingField::No, "3"));
    h.panel.on_field_edited(FieldEdit::new(NamingField::Fov, "50"));
    h.panel.on_field_edited(FieldEdit::new(NamingField::Descr, "overview"));
}

fn ready_harness() -> Harness {
    let h = Harness::new();
    fill_fields(&h);
    h.panel.set_export_folder_on(date());
    h.queue.run_pending();
    h
}

// ============================================================================
// Gating
// ============================================================================

#[test]
fn test_controls_start_disabled() {
    let h = Harness::new();
    assert!(!h.panel.is_ready());
    assert!(!h.control.is_enabled());
    assert_eq!(h.control.updates(), 1);
}

#[test]
fn test_blank_fields_never_reach_filesystem() {
    let h = Harness::new();
    h.select("raw");
    h.panel.set_export_folder_on(date());

    let result = h.panel.export(0);
    assert!(matches!(result, Err(ExportError::NotReady(ref missing)) if missing.len() == 3));
    assert!(!h.export_root().exists(), "No directory may be created");
}

#[test]
fn test_sub_is_optional() {
    let h = Harness::new();
    fill_fields(&h);
    h.panel.set_export_folder_on(date());
    assert!(h.panel.is_ready());
}

#[test]
fn test_export_directory_gate_reported_missing() {
    let h = Harness::new();
    fill_fields(&h);
    h.select("raw");

    let result = h.panel.export(0);
    assert!(
        matches!(result, Err(ExportError::NotReady(ref missing)) if missing == &vec!["export directory".to_string()])
    );
}

#[test]
fn test_clearing_field_disables_again() {
    let h = ready_harness();
    assert!(h.control.is_enabled());

    h.panel.on_field_edited(FieldEdit::new(NamingField::Fov, "  "));
    h.queue.run_pending();
    assert!(!h.control.is_enabled());
}

// ============================================================================
// Deferred enablement
// ============================================================================

#[test]
fn test_enablement_is_deferred_to_next_tick() {
    let h = Harness::new();
    fill_fields(&h);
    h.panel.set_export_folder_on(date());

    assert!(h.panel.is_ready());
    assert!(!h.control.is_enabled(), "Controls change only on the UI tick");

    h.queue.run_pending();
    assert!(h.control.is_enabled());
}

#[test]
fn test_updates_coalesce_within_one_tick() {
    let h = Harness::new();
    let before = h.control.updates();

    fill_fields(&h);
    h.panel.set_export_folder_on(date());
    h.panel.on_field_edited(FieldEdit::new(NamingField::Sub, "A"));

    assert_eq!(h.queue.len(), 1);
    h.queue.run_pending();
    assert_eq!(h.control.updates(), before + 1);
    assert!(h.control.is_enabled());
}

#[test]
fn test_late_registered_control_gets_state() {
    let h = ready_harness();
    let late = Rc::new(FakeControl::default());
    h.panel.register_control(late.clone());
    h.queue.run_pending();
    assert!(late.is_enabled());
}

// ============================================================================
// Export directory
// ============================================================================

#[test]
fn test_set_export_folder_persists_directory_and_filter() {
    let h = Harness::new();
    let directory = h.panel.set_export_folder_on(date());

    assert_eq!(directory, h.export_root().join("2020_09_15_DMH_S0042_edge"));
    assert_eq!(
        h.store.get_string(keys::EXPORT_DIRECTORY).as_deref(),
        Some(directory.to_string_lossy().as_ref())
    );
    assert_eq!(h.store.get_string(keys::EXPORT_FILTER).as_deref(), Some(DM_EXPORT_FILTER));
    assert_eq!(h.panel.export_directory_text(), directory.to_string_lossy());
}

#[test]
fn test_set_export_folder_reads_live_session() {
    let h = Harness::new();
    h.panel.set_export_folder_on(date());
    h.session.set_value(SessionField::SampleArea, "centre");

    let directory = h.panel.set_export_folder_on(date());
    assert!(directory.ends_with("2020_09_15_DMH_S0042_centre"));
}

#[test]
fn test_manual_directory_edit() {
    let h = Harness::new();
    fill_fields(&h);
    let manual = h.temp_dir.path().join("manual");

    h.panel.on_export_directory_edited(&manual.to_string_lossy());
    assert!(h.panel.is_ready());
    assert_eq!(
        h.store.get_string(keys::EXPORT_DIRECTORY).as_deref(),
        Some(manual.to_string_lossy().as_ref())
    );

    h.panel.on_export_directory_edited("");
    assert!(!h.panel.is_ready());
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_export_writes_labelled_file() {
    let h = ready_harness();
    let item = h.select("raw");

    let path = h.panel.export(0).unwrap();

    assert_eq!(
        path,
        h.export_root()
            .join("2020_09_15_DMH_S0042_edge")
            .join("003_HAADF_50nm_overview.dm4")
    );
    assert_eq!(fs::read(&path).unwrap(), b"DM4 payload");
    assert_eq!(item.title(), "003_HAADF_50nm_overview");
}

#[test]
fn test_export_named_uses_action() {
    let h = ready_harness();
    h.select("raw");
    let path = h.panel.export_named("Ronchi").unwrap();
    assert!(path.ends_with("003_Ronchi_50nm_overview.dm4"));
}

#[test]
fn test_export_without_selection() {
    let h = ready_harness();
    assert!(matches!(h.panel.export(0), Err(ExportError::NoSelection)));
}

#[test]
fn test_unknown_action_index() {
    let h = ready_harness();
    h.select("raw");
    assert!(matches!(h.panel.export(99), Err(ExportError::UnknownAction(ref a)) if a == "99"));
    assert!(matches!(h.panel.export_named("EDX"), Err(ExportError::UnknownAction(_))));
}

#[test]
fn test_conflict_shows_single_warning() {
    let h = ready_harness();
    let item = h.select("raw");
    let first = h.panel.export(0).unwrap();
    let original = fs::read(&first).unwrap();

    item.set_title("renamed meanwhile");
    assert!(matches!(h.panel.export(0), Err(ExportError::FileExists(_))));
    assert!(matches!(h.panel.export(0), Err(ExportError::FileExists(_))));

    assert_eq!(*h.warnings.messages.borrow(), vec![FILE_EXISTS_MESSAGE.to_string()]);
    assert_eq!(fs::read(&first).unwrap(), original);
    assert_eq!(item.title(), "renamed meanwhile");

    h.warnings.close_all();
    assert!(h.panel.export(0).is_err());
    assert_eq!(h.warnings.messages.borrow().len(), 2);
}

#[test]
fn test_invalid_number_is_reported() {
    let h = Harness::new();
    h.panel.on_field_edited(FieldEdit::new(NamingField::No, "12a"));
    h.panel.on_field_edited(FieldEdit::new(NamingField::Fov, "50"));
    h.panel.on_field_edited(FieldEdit::new(NamingField::Descr, "overview"));
    h.panel.set_export_folder_on(date());
    h.select("raw");

    assert!(matches!(h.panel.export(0), Err(ExportError::Naming(_))));
    assert!(h.warnings.messages.borrow().is_empty());
}

// ============================================================================
// Layout and lifecycle
// ============================================================================

#[test]
fn test_action_rows() {
    let h = Harness::new();
    let rows = h.panel.action_rows();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.len() <= BUTTONS_PER_ROW));
    assert_eq!(rows[0][0], "HAADF");
    assert_eq!(rows[2].last().map(String::as_str), Some("Ronchi"));
}

#[test]
fn test_close_releases_controls() {
    let h = Harness::new();
    h.panel.close();
    fill_fields(&h);
    h.panel.set_export_folder_on(date());
    h.queue.run_pending();
    assert!(!h.control.is_enabled());
}

#[test]
fn test_library_dialog_single_instance() {
    let h = Harness::new();
    let dialog = h.panel.open_library_dialog_on(date());
    assert!(dialog.is_some());
    assert!(h.panel.open_library_dialog_on(date()).is_none());

    drop(dialog);
    assert!(h.panel.open_library_dialog_on(date()).is_some());
}
