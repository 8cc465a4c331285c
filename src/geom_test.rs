#![allow(clippy::float_cmp)]

use super::*;

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn delta_to_is_target_minus_source() {
    let d = Point::new(10.0, 10.0).delta_to(Point::new(15.0, 5.0));
    assert_eq!(d, Delta { dx: 5.0, dy: -5.0 });
}

#[test]
fn delta_to_self_is_zero() {
    let p = Point::new(7.5, -2.0);
    assert_eq!(p.delta_to(p), Delta::default());
}

// --- exceeds ---

#[test]
fn exceeds_is_strict() {
    let origin = Point::new(0.0, 0.0);
    assert!(!origin.exceeds(Point::new(3.0, 0.0), 3.0));
    assert!(origin.exceeds(Point::new(4.0, 0.0), 3.0));
}

#[test]
fn exceeds_checks_either_axis() {
    let origin = Point::new(0.0, 0.0);
    assert!(origin.exceeds(Point::new(0.0, -3.5), 3.0));
    assert!(!origin.exceeds(Point::new(2.9, -2.9), 3.0));
}
