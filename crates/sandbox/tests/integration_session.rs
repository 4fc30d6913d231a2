//! Integration tests for a full sandbox session.
//!
//! Tests end-to-end: scenario -> edits -> validation -> score -> persisted record.

use sampling_sandbox::fixtures::*;
use sampling_sandbox::scenario::Scenario;
use sampling_sandbox::scoring::Grade;
use sampling_sandbox::settings::{LabelPolicy, SandboxSettings};
use sampling_sandbox::state::{Operation, Session};
use sampling_sandbox::validation::CheckKind;
use shared::{Judgment, PlacementMethod, Point2D};

fn session() -> Session {
    Session::new(
        Scenario::load(default_scenario()).unwrap(),
        SandboxSettings::default(),
    )
}

fn place_reference(s: &mut Session) {
    for p in reference_layout() {
        s.add_marker(p).unwrap();
    }
}

#[test]
fn test_reference_layout_end_to_end() {
    let mut s = session();
    place_reference(&mut s);

    let report = s.validate();
    assert!(report.passed, "Report: {:?}", report);

    let score = s.calculate(Some(Judgment::Qualified));
    assert_eq!(score.total, 100.0);
    assert_eq!(score.grade, Grade::Excellent);
    assert_eq!(score.breakdown.bonus, 5.0);

    let cmp = s.compare_reference().unwrap();
    assert_eq!(cmp.matched, cmp.total);
}

#[test]
fn test_sloppy_session_loses_operation_points() {
    let mut s = session();
    // rejected: inside the shaft
    assert!(s.add_marker(Point2D::new(25.0, 20.0)).is_err());
    place_reference(&mut s);
    // second marker on S9's spot
    let extra = s.add_marker(Point2D::new(10.0, 30.0)).unwrap();
    s.delete_marker(&extra.id).unwrap();
    s.undo();
    s.redo();

    assert_eq!(s.log().count(Operation::Rejected), 1);
    assert_eq!(s.log().count(Operation::Deleted), 1);
    assert_eq!(s.log().count(Operation::Undone), 1);

    let score = s.calculate(None);
    // 100 - 5 - 3 - 2
    assert_eq!(score.breakdown.operation, 90.0);
    assert!(score.total < 100.0);
    assert_eq!(score.breakdown.bonus, 0.0);
}

#[test]
fn test_too_few_points_fails_validation() {
    let mut s = session();
    for p in reference_layout().into_iter().take(3) {
        s.add_marker(p).unwrap();
    }
    let report = s.validate();
    assert!(!report.passed);
    assert!(!report.item(CheckKind::Count).unwrap().passed);
    assert!(!report.item(CheckKind::Distribution).unwrap().passed);
    assert!(report.item(CheckKind::Position).unwrap().passed);
    assert_eq!(report.suggestions.len(), 2);

    let score = s.calculate(None);
    assert_eq!(score.grade, Grade::Fail);
}

#[test]
fn test_undo_everything_restores_empty_state() {
    let mut s = session();
    place_reference(&mut s);
    let ids: Vec<String> = s.markers().iter().map(|m| m.id.clone()).collect();
    s.move_marker(&ids[0], Point2D::new(10.0, 30.0)).unwrap();
    s.delete_marker(&ids[1]).unwrap();
    s.clear_markers();

    let mut undone = 0;
    while s.undo() {
        undone += 1;
    }
    assert_eq!(undone, 15);
    assert!(s.markers().is_empty());

    while s.redo() {}
    assert!(s.markers().is_empty());
    assert!(s.can_undo());
}

#[test]
fn test_undo_after_move_restores_identical_list() {
    let mut s = session();
    place_reference(&mut s);
    let before = s.markers().to_vec();
    let id = before[3].id.clone();
    s.move_marker(&id, Point2D::new(30.0, 30.0)).unwrap();
    s.undo();
    assert_eq!(s.markers(), &before[..]);
}

#[test]
fn test_labels_with_monotonic_policy() {
    let mut settings = SandboxSettings::default();
    settings.labels.policy = LabelPolicy::Monotonic;
    let mut s = Session::new(Scenario::load(default_scenario()).unwrap(), settings);

    let a = s.add_marker(Point2D::new(10.0, 10.0)).unwrap();
    s.add_marker(Point2D::new(20.0, 10.0)).unwrap();
    s.delete_marker(&a.id).unwrap();
    let c = s.add_marker(Point2D::new(30.0, 10.0)).unwrap();
    assert_eq!(c.label, "S3");
}

#[test]
fn test_method_switch_affects_snapping_only_for_new_markers() {
    let mut s = session();
    s.set_method(PlacementMethod::Random);
    let raw = s.add_marker(Point2D::new(12.5, 13.5)).unwrap();
    assert_eq!(raw.position, Point2D::new(12.5, 13.5));
    assert!(raw.cell.is_none());

    s.set_method(PlacementMethod::Stratified);
    let snapped = s.add_marker(Point2D::new(12.5, 13.5)).unwrap();
    assert_eq!(snapped.position, Point2D::new(10.0, 10.0));
    assert!(snapped.cell.is_some());
    assert_eq!(s.markers()[0].position, Point2D::new(12.5, 13.5));
}

#[test]
fn test_persisted_record_survives_json() {
    let mut a = session();
    place_reference(&mut a);
    let json = a.export_json().unwrap();

    let mut b = session();
    b.import_json(&json).unwrap();
    assert_eq!(b.markers(), a.markers());
    assert!(b.validate().passed);
    // next label goes past the imported set
    let next = b.add_marker(Point2D::new(10.0, 30.0)).unwrap();
    assert_eq!(next.label, "S13");
}

#[test]
fn test_custom_scenario_with_polygon_region() {
    let d = scenario_with(
        vec![polygon_region(
            "wedge",
            &[(0.0, 0.0), (100.0, 0.0), (100.0, 60.0)],
        )],
        vec![],
    );
    let mut s = Session::new(Scenario::load(d).unwrap(), SandboxSettings::default());
    s.set_method(PlacementMethod::Random);

    // above the hypotenuse: on the surface but outside the wedge
    s.add_marker(Point2D::new(10.0, 50.0)).unwrap();
    let report = s.validate();
    assert!(!report.item(CheckKind::Position).unwrap().passed);
    assert_eq!(report.illegal, vec!["S1".to_string()]);
}
