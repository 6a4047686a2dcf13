mod support;

use approx::assert_relative_eq;
use support::{crossings, is_rotationally_symmetric};
use watch_movement::errors::GeometryError;
use watch_movement::float_types::{Real, TAU};
use watch_movement::shapes::{EscapementWheelSpec, escapement_wheel_outline};

#[test]
fn default_escapement_wheel() {
    let spec = EscapementWheelSpec::default();
    let outline = escapement_wheel_outline(&spec).unwrap();

    // base, tip and gap point per tooth, plus closure
    assert_eq!(outline.outer().len(), 3 * 30 + 1);
    assert_eq!(outline.tooth_count(), 30);
    assert_eq!(outline.points_per_tooth(), 3);
    // axle hole and thirteen spoke cut-outs
    assert_eq!(outline.holes().len(), 14);
    assert_eq!(outline.holes()[0].len(), 33);

    assert_relative_eq!(outline.max_radius(), 34.5, epsilon = 1e-12);
    assert_relative_eq!(outline.min_radius(), 27.0, epsilon = 1e-12);
    assert!(outline.validate().is_ok());
}

#[test]
fn teeth_lean_forward_and_repeat() {
    let spec = EscapementWheelSpec::default();
    let outline = escapement_wheel_outline(&spec).unwrap();
    let outer = outline.outer();

    // the first tip sits lift_angle ahead of the first base
    let tip = outer[1];
    assert_relative_eq!(tip.y.atan2(tip.x), spec.lift_angle, epsilon = 1e-12);
    assert_relative_eq!(tip.coords.norm(), spec.radius + spec.tooth_height, epsilon = 1e-12);

    let ring = &outer[..outer.len() - 1];
    assert!(is_rotationally_symmetric(ring, TAU / 30.0, 1e-9));
    assert_eq!(crossings(outer), 0);
}

#[test]
fn smaller_wheels_stay_simple() {
    for (teeth, radius, height) in [(30, 10.0, 3.0), (15, 10.0, 3.0), (20, 5.0, 1.0)] {
        let spec = EscapementWheelSpec {
            tooth_count: teeth,
            radius,
            tooth_height: height,
            axle_hole_radius: 1.0,
            spokes: None,
            ..EscapementWheelSpec::default()
        };
        let outline = escapement_wheel_outline(&spec).unwrap();
        assert_eq!(crossings(outline.outer()), 0);
        assert!(outline.validate().is_ok());
    }
}

#[test]
fn invalid_escapement_wheels_are_rejected() {
    let base = EscapementWheelSpec::default();
    let bad = [
        EscapementWheelSpec {
            tooth_count: 2,
            ..base.clone()
        },
        EscapementWheelSpec {
            tooth_height: 0.0,
            ..base.clone()
        },
        EscapementWheelSpec {
            gap_angle: TAU / 30.0,
            ..base.clone()
        },
        EscapementWheelSpec {
            lift_angle: -0.1,
            ..base.clone()
        },
        EscapementWheelSpec {
            axle_hole_radius: 30.0,
            ..base.clone()
        },
        EscapementWheelSpec {
            radius: Real::NAN,
            ..base.clone()
        },
    ];
    for spec in &bad {
        assert!(
            matches!(
                escapement_wheel_outline(spec),
                Err(GeometryError::InvalidParameter(_))
            ),
            "{spec:?}"
        );
    }
}
