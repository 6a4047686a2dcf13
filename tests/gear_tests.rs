mod support;

use approx::assert_relative_eq;
use support::{approx_eq, capture_warnings, crossings, is_rotationally_symmetric};
use watch_movement::errors::GeometryError;
use watch_movement::float_types::{Real, TAU};
use watch_movement::gear::{
    GearSpec, OutlineCache, SpokeLayout, ToothProfile, generate_gear_outline,
};

fn scenario_gear() -> GearSpec {
    GearSpec::new(3.0, 30)
        .with_generating_teeth(15, 30)
        .with_addendum_factor(1.75)
}

#[test]
fn scenario_gear_is_thirty_fold_symmetric() {
    let spec = scenario_gear();
    assert_eq!(spec.pitch_diameter(), 90.0);

    let outline = generate_gear_outline(&spec).unwrap();
    assert_eq!(outline.tooth_count(), 30);
    assert_eq!((outline.outer().len() - 1) % 30, 0);

    let ring = &outline.outer()[..outline.outer().len() - 1];
    assert!(is_rotationally_symmetric(ring, TAU / 30.0, 1e-6));
    // a slightly different angle must not match
    assert!(!is_rotationally_symmetric(ring, TAU / 31.0, 1e-6));
}

#[test]
fn flanks_reach_addendum_and_dedendum_circles() {
    let spec = scenario_gear();
    let outline = generate_gear_outline(&spec).unwrap();
    assert_relative_eq!(outline.max_radius(), spec.addendum_radius(), epsilon = 1e-9);
    assert_relative_eq!(outline.min_radius(), spec.root_radius(), epsilon = 1e-9);
    // 0.95 * 1.75 modules above and 1.25 modules below the pitch circle
    assert_relative_eq!(spec.addendum_radius(), 45.0 + 3.0 * 0.95 * 1.75, epsilon = 1e-12);
    assert_relative_eq!(spec.root_radius(), 45.0 - 3.0 * 1.25, epsilon = 1e-12);
}

#[test]
fn tooth_is_mirror_symmetric() {
    let tooth = ToothProfile::generate(&scenario_gear()).unwrap();
    let points = tooth.points();
    let n = points.len();
    for i in 0..n {
        let (p, q) = (points[i], points[n - 1 - i]);
        assert!(approx_eq(p.x, q.x, 1e-12));
        assert!(approx_eq(p.y, -q.y, 1e-12));
    }
}

#[test]
fn outlines_are_closed_and_simple() {
    let mut specs = vec![
        scenario_gear(),
        GearSpec::from_pitch_radius(5.0, 8).with_addendum_factor(1.5),
        GearSpec::from_pitch_radius(3.0, 8),
        GearSpec::from_pitch_radius(7.2, 8),
        GearSpec::from_pitch_radius(2.5, 10).with_addendum_factor(1.3),
        GearSpec::from_pitch_radius(26.3, 24).with_addendum_factor(1.3),
        GearSpec::new(1.0, 20).with_backlash(0.1).with_clearance(0.05),
    ];
    for z in 5..=12 {
        for fa in [1.0, 1.75, 2.5] {
            specs.push(GearSpec::new(1.0, z).with_addendum_factor(fa));
        }
    }

    for spec in &specs {
        let outline = generate_gear_outline(spec).unwrap();
        let outer = outline.outer();
        assert_eq!(outer.first(), outer.last(), "{spec:?}");
        for hole in outline.holes() {
            assert_eq!(hole.first(), hole.last(), "{spec:?}");
        }
        assert_eq!(crossings(outer), 0, "{spec:?}");
        assert!(outline.validate().is_ok(), "{spec:?}: {:?}", outline.validate());
    }
}

#[test]
fn regeneration_is_idempotent() {
    let spec = GearSpec::from_pitch_radius(20.5, 64).with_addendum_factor(1.5);
    let a = generate_gear_outline(&spec).unwrap();
    let b = generate_gear_outline(&spec.clone()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn non_meshing_generating_circles_are_rejected() {
    // hypocycloid circle as large as the gear itself
    let spec = GearSpec::new(1.0, 20)
        .with_generating_teeth(20, 1)
        .with_addendum_factor(2.0);
    assert!(matches!(
        generate_gear_outline(&spec),
        Err(GeometryError::InvalidGeometry { .. })
    ));

    // one-tooth epicycloid circle cannot climb a tall addendum
    let spec = GearSpec::new(1.0, 20)
        .with_generating_teeth(10, 1)
        .with_addendum_factor(2.0);
    match generate_gear_outline(&spec) {
        Err(GeometryError::InvalidGeometry { ratio, .. }) => assert!(ratio < -1.0),
        other => panic!("expected InvalidGeometry, got {other:?}"),
    }
}

#[test]
fn tiny_generating_circle_warns_but_still_generates() {
    // one-tooth epicycloid circle still reaches a standard addendum
    let spec = GearSpec::new(1.0, 20).with_generating_teeth(10, 1);
    let (result, logs) = capture_warnings(|| generate_gear_outline(&spec));
    assert!(logs.contains("fewer than 2 teeth"), "{logs}");

    let outline = result.unwrap();
    assert_eq!(outline.tooth_count(), 20);
    assert!(outline.validate().is_ok(), "{:?}", outline.validate());
    assert_relative_eq!(outline.min_radius(), spec.root_radius(), epsilon = 1e-9);
    // pointed teeth are cut at the centre line, below the addendum circle
    assert!(outline.max_radius() <= spec.addendum_radius() + 1e-9);

    let ring = &outline.outer()[..outline.outer().len() - 1];
    assert!(is_rotationally_symmetric(ring, TAU / 20.0, 1e-6));
}

#[test]
fn invalid_parameters_are_rejected() {
    let bad = [
        GearSpec::new(1.0, 3),
        GearSpec::new(0.0, 20),
        GearSpec::new(-1.0, 20),
        GearSpec::new(Real::NAN, 20),
        GearSpec::new(1.0, 20).with_addendum_factor(0.0),
        GearSpec::new(1.0, 20).with_bore_radius(9.0),
        GearSpec::new(1.0, 20).with_bore_radius(0.0),
        GearSpec::new(1.0, 20).with_flank_segments(0),
        GearSpec::new(1.0, 20).with_clearance(Real::INFINITY),
    ];
    for spec in &bad {
        assert!(
            matches!(
                generate_gear_outline(spec),
                Err(GeometryError::InvalidParameter(_))
            ),
            "{spec:?}"
        );
    }
}

#[test]
fn pitch_radius_back_derives_module() {
    let spec = GearSpec::from_pitch_radius(20.5, 64);
    assert_relative_eq!(spec.module(), 41.0 / 64.0, epsilon = 1e-15);
    assert_relative_eq!(spec.pitch_radius(), 20.5, epsilon = 1e-12);
}

#[test]
fn generating_teeth_default_to_half_the_tooth_count() {
    let spec = GearSpec::new(1.0, 15);
    assert_eq!(spec.generating_teeth_hypo(), 7.5);
    assert_eq!(spec.generating_teeth_epi(), 7.5);
    let spec = spec.with_generating_teeth(5, 9);
    assert_eq!(spec.generating_teeth_hypo(), 5.0);
    assert_eq!(spec.generating_teeth_epi(), 9.0);
}

#[test]
fn bore_is_set_back_from_pitch_circle() {
    let spec = GearSpec::new(1.0, 20);
    assert_eq!(spec.bore_radius(), 8.0);
    let outline = generate_gear_outline(&spec).unwrap();
    let bore = &outline.holes()[0];
    assert!(bore.iter().all(|p| approx_eq(p.coords.norm(), 8.0, 1e-12)));

    // too small for the set-back: half the root radius instead
    let small = GearSpec::new(1.0, 4);
    assert_eq!(small.bore_radius(), 0.5 * (2.0 - 1.25));
}

#[test]
fn backlash_thins_the_teeth() {
    let plain = generate_gear_outline(&GearSpec::new(1.0, 30)).unwrap();
    let loose = generate_gear_outline(&GearSpec::new(1.0, 30).with_backlash(0.2)).unwrap();
    assert!(loose.area() < plain.area());
    assert_eq!(loose.outer().len(), plain.outer().len());
}

#[test]
fn spokes_cut_sectors_between_hub_and_rim() {
    let plain = GearSpec::new(1.0, 60).with_bore_radius(3.0);
    let spoked = plain
        .clone()
        .with_spokes(SpokeLayout::new(5, 0.3, 6.0, 3.0));
    let a = generate_gear_outline(&plain).unwrap();
    let b = generate_gear_outline(&spoked).unwrap();

    assert_eq!(a.holes().len(), 1);
    assert_eq!(b.holes().len(), 6);
    assert!(b.validate().is_ok());
    assert!(b.area() < a.area());

    let rim = spoked.root_radius() - 3.0;
    for hole in &b.holes()[1..] {
        let radii: Vec<Real> = hole.iter().map(|p| p.coords.norm()).collect();
        assert!(radii.iter().all(|&r| r > 6.0 - 1e-9 && r < rim + 1e-9));
    }
}

#[test]
fn spokes_that_do_not_fit_are_rejected() {
    // hub inside the bore
    let spec = GearSpec::new(1.0, 60)
        .with_bore_radius(8.0)
        .with_spokes(SpokeLayout::new(5, 0.3, 6.0, 3.0));
    assert!(matches!(
        generate_gear_outline(&spec),
        Err(GeometryError::InvalidParameter(_))
    ));

    // rim swallows the cut-outs
    let spec = GearSpec::new(1.0, 20)
        .with_bore_radius(2.0)
        .with_spokes(SpokeLayout::new(5, 0.3, 4.0, 6.0));
    assert!(matches!(
        generate_gear_outline(&spec),
        Err(GeometryError::InvalidParameter(_))
    ));

    // spokes wider than their share of the circle
    let spec = GearSpec::new(1.0, 60)
        .with_bore_radius(3.0)
        .with_spokes(SpokeLayout::new(40, 1.0, 6.0, 3.0));
    assert!(matches!(
        generate_gear_outline(&spec),
        Err(GeometryError::InvalidParameter(_))
    ));
}

#[test]
fn cache_regenerates_only_on_change() {
    let mut cache = OutlineCache::new();
    let spec = GearSpec::new(1.0, 24);

    let first = cache.get_or_generate(&spec).unwrap().clone();
    let second = cache.get_or_generate(&spec.clone()).unwrap().clone();
    assert_eq!(first, second);
    assert_eq!((cache.misses(), cache.hits(), cache.len()), (1, 1, 1));

    cache.get_or_generate(&spec.clone().with_backlash(0.05)).unwrap();
    assert_eq!((cache.misses(), cache.len()), (2, 2));

    // failures are not remembered
    assert!(cache.get_or_generate(&GearSpec::new(1.0, 2)).is_err());
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}
