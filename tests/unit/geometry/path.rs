use kurbo::Shape as _;

use super::*;

#[test]
fn path_is_closed_and_bounded_by_rect() {
    let rect = Rect::new(10.0, 20.0, 210.0, 132.5);
    let p = rounded_rect_path(rect, 30.0);
    assert!(matches!(p.elements().last(), Some(kurbo::PathEl::ClosePath)));
    let bb = p.bounding_box();
    assert!((bb.x0 - rect.x0).abs() < 1e-6);
    assert!((bb.y0 - rect.y0).abs() < 1e-6);
    assert!((bb.x1 - rect.x1).abs() < 1e-6);
    assert!((bb.y1 - rect.y1).abs() < 1e-6);
}

#[test]
fn oversized_radius_is_clamped_to_a_stadium() {
    let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
    let clamped = rounded_rect_path(rect, 500.0);
    let exact = rounded_rect_path(rect, 20.0);
    assert_eq!(clamped.elements(), exact.elements());
}

#[test]
fn building_twice_is_identical() {
    let rect = Rect::new(3.5, 7.25, 640.0, 360.0);
    assert_eq!(
        rounded_rect_path(rect, 42.0).elements(),
        rounded_rect_path(rect, 42.0).elements()
    );
}

#[test]
fn empty_rect_yields_empty_path() {
    assert!(rounded_rect_path(Rect::new(5.0, 5.0, 5.0, 50.0), 3.0).is_empty());
}

#[test]
fn cpu_path_preserves_element_count() {
    let p = rounded_rect_path(Rect::new(0.0, 0.0, 64.0, 36.0), 8.0);
    assert_eq!(to_cpu_path(&p).elements().len(), p.elements().len());
}
