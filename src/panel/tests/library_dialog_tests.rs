use chrono::NaiveDate;
use std::fs;

use super::fixtures::Harness;
use crate::core::library::WORKSPACE_FILE_NAME;
use crate::core::{FieldEdit, SessionField, SessionStore};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

#[test]
fn test_prefill_from_session_and_settings() {
    let h = Harness::new();
    h.session.set_value(SessionField::Task, "P-17");

    let dialog = h.panel.open_library_dialog_on(date()).unwrap();

    assert_eq!(dialog.field_value(SessionField::Microscopist), "dmh");
    assert_eq!(dialog.field_value(SessionField::Task), "P-17");
    assert_eq!(dialog.field_value(SessionField::Site), "Daresbury");
    assert_eq!(dialog.field_value(SessionField::Instrument), "SuperSTEM2");
}

#[test]
fn test_session_site_wins_over_settings() {
    let h = Harness::new();
    h.session.set_value(SessionField::Site, "Leeds");
    let dialog = h.panel.open_library_dialog_on(date()).unwrap();
    assert_eq!(dialog.field_value(SessionField::Site), "Leeds");
}

#[test]
fn test_library_name_shown_on_next_tick() {
    let h = Harness::new();
    let dialog = h.panel.open_library_dialog_on(date()).unwrap();

    assert!(dialog.is_ready());
    assert_eq!(dialog.library_name(), "");
    h.queue.run_pending();
    assert_eq!(dialog.library_name(), "2024_03_09_DMH_S0042_edge");
}

#[test]
fn test_edit_writes_session_and_renames() {
    let h = Harness::new();
    let dialog = h.panel.open_library_dialog_on(date()).unwrap();
    h.queue.run_pending();

    dialog.on_field_edited(FieldEdit::new(SessionField::SampleArea, " grain boundary "));
    h.queue.run_pending();

    assert_eq!(
        h.session.get_value(SessionField::SampleArea).as_deref(),
        Some("grain boundary")
    );
    assert_eq!(dialog.library_name(), "2024_03_09_DMH_S0042_grain_boundary");
}

#[test]
fn test_create_without_name_is_noop() {
    let h = Harness::new();
    h.session.set_value(SessionField::Sample, "");
    let dialog = h.panel.open_library_dialog_on(date()).unwrap();
    h.queue.run_pending();

    assert!(!dialog.is_ready());
    assert_eq!(dialog.create_library().unwrap(), None);
    assert!(!dialog.data_base_directory().exists());
    assert!(h.projects.created.borrow().is_empty());
}

#[test]
fn test_create_library_registers_project() {
    let h = Harness::new();
    let dialog = h.panel.open_library_dialog_on(date()).unwrap();
    h.queue.run_pending();

    let reference = dialog.create_library().unwrap().unwrap();

    assert_eq!(reference.name, "2024_03_09_DMH_S0042_edge");
    assert_eq!(reference.workspace_file, reference.directory.join(WORKSPACE_FILE_NAME));
    assert_eq!(fs::read_to_string(&reference.workspace_file).unwrap(), "{}");
    assert_eq!(
        *h.projects.created.borrow(),
        vec![(reference.directory.clone(), reference.name.clone())]
    );
}

#[test]
fn test_second_library_gets_index() {
    let h = Harness::new();
    let first = h.panel.open_library_dialog_on(date()).unwrap();
    h.queue.run_pending();
    first.create_library().unwrap();
    drop(first);

    let second = h.panel.open_library_dialog_on(date()).unwrap();
    h.queue.run_pending();
    assert_eq!(second.library_name(), "2024_03_09_DMH_S0042_edge_1");
}

#[test]
fn test_blanking_required_field_blocks_create() {
    let h = Harness::new();
    let dialog = h.panel.open_library_dialog_on(date()).unwrap();
    h.queue.run_pending();
    assert_eq!(dialog.library_name(), "2024_03_09_DMH_S0042_edge");

    dialog.on_field_edited(FieldEdit::new(SessionField::Sample, ""));

    assert!(!dialog.is_ready());
    assert_eq!(dialog.create_library().unwrap(), None);
    assert!(!dialog.data_base_directory().exists());
    assert!(h.projects.created.borrow().is_empty());

    h.queue.run_pending();
    assert_eq!(dialog.library_name(), "");
}
