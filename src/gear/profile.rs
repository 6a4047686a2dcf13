//! **Cycloidal tooth profile**
//!
//! One tooth is built from two rolling-circle curves meeting on the pitch
//! circle of diameter `d`:
//!
//! ```text
//! epicycloid (tip flank), generating circle d2 rolling outside:
//!   x(t) = (d2 + d)/2 · cos t − d2/2 · cos((d2 + d)·t / d2)
//!   y(t) = (d2 + d)/2 · sin t − d2/2 · sin((d2 + d)·t / d2)
//!
//! hypocycloid (root flank), generating circle d1 rolling inside:
//!   x(t) = (d − d1)/2 · cos t + d1/2 · cos((d − d1)·t / d1)
//!   y(t) = (d − d1)/2 · sin t − d1/2 · sin((d − d1)·t / d1)
//! ```
//!
//! Both start on the pitch circle at `t = 0`. The epicycloid runs out to the
//! addendum circle `da` at `t_outer_end`, the hypocycloid runs (for negative
//! `t`) down to the dedendum circle `di` at `t_inner_end`. Solving
//! `|p(t)| = da/2` (resp. `di/2`) with the law of cosines gives
//!
//! ```text
//! t_outer_end =  d2/d · acos((2d2² − da² + 2d2·d + d²) / (2d2(d2 + d)))
//! t_inner_end = −d1/d · acos((2d1² − di² − 2d1·d + d²) / (2d1(d1 − d)))
//! ```
//!
//! An arc-cosine argument outside `[-1, 1]` means the circle can never reach
//! the requested radius: the parameter combination does not mesh.

use crate::errors::{Flank, GeometryError};
use crate::float_types::{Real, tolerance};
use crate::gear::GearSpec;
use nalgebra::{Point2, Rotation2};

/// Bisection steps used when cutting a flank at a centre line.
const CENTRE_LINE_ITERATIONS: usize = 64;

/// Ordered boundary points of a single tooth, centred on the +X axis.
///
/// Runs counter-clockwise: root of the right-hand flank (negative angle), up
/// to the tip, across, and down the mirrored flank to the next gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ToothProfile {
    points: Vec<Point2<Real>>,
}

impl ToothProfile {
    /// Build one tooth for `spec`, which must already be validated.
    pub fn generate(spec: &GearSpec) -> Result<Self, GeometryError> {
        let m = spec.module();
        let d = spec.pitch_diameter();
        let da = 2.0 * spec.addendum_radius();
        let di = 2.0 * spec.root_radius();
        let d1 = spec.generating_teeth_hypo() * m;
        let d2 = spec.generating_teeth_epi() * m;

        let angular_pitch = spec.angular_pitch();
        // Quarter pitch puts the pitch point half a tooth off the centre line;
        // half the angular backlash thins the tooth on each side.
        let rotation = -angular_pitch / 4.0 + spec.angular_backlash() / 2.0;

        let mut t_inner_end = inner_end(d, d1, di)?;
        let mut t_outer_end = outer_end(d, d2, da)?;

        // Pointed teeth: stop the tip flank on the tooth centre line.
        let tip_angle = |t: Real| polar_angle(epicycloid_xy(d, d2, t)) + rotation;
        if tip_angle(t_outer_end) > 0.0 {
            t_outer_end = bisect(tip_angle, 0.0, t_outer_end);
            tracing::debug!(
                tooth_count = spec.tooth_count(),
                t_outer_end,
                "tip flank cut at tooth centre line"
            );
        }

        // Undercut roots: stop the root flank on the gap centre line.
        let gap_angle = |t: Real| polar_angle(hypocycloid_xy(d, d1, t)) + rotation + angular_pitch / 2.0;
        if gap_angle(t_inner_end) < 0.0 {
            t_inner_end = bisect(|t| -gap_angle(t), 0.0, t_inner_end);
            tracing::debug!(
                tooth_count = spec.tooth_count(),
                t_inner_end,
                "root flank cut at gap centre line"
            );
        }

        let n = spec.flank_segments();
        let mut half = Vec::with_capacity(2 * n + 1);
        // root → pitch point (pitch point itself comes from the tip flank)
        for i in 0..n {
            let t = t_inner_end * (1.0 - i as Real / n as Real);
            half.push(hypocycloid_xy(d, d1, t));
        }
        // pitch point → tip
        for i in 0..=n {
            let t = t_outer_end * i as Real / n as Real;
            half.push(epicycloid_xy(d, d2, t));
        }

        let rot = Rotation2::new(rotation);
        let half: Vec<Point2<Real>> = half.into_iter().map(|p| rot * p).collect();

        let mut points = half.clone();
        points.extend(half.iter().rev().map(|p| Point2::new(p.x, -p.y)));

        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point2<Real>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Point on the epicycloid traced by a circle of diameter `d2` rolling outside
/// a pitch circle of diameter `d`.
#[inline]
pub fn epicycloid_xy(d: Real, d2: Real, t: Real) -> Point2<Real> {
    let k = (d2 + d) / d2;
    Point2::new(
        (d2 + d) * t.cos() / 2.0 - d2 * (k * t).cos() / 2.0,
        (d2 + d) * t.sin() / 2.0 - d2 * (k * t).sin() / 2.0,
    )
}

/// Point on the hypocycloid traced by a circle of diameter `d1` rolling inside
/// a pitch circle of diameter `d`.
#[inline]
pub fn hypocycloid_xy(d: Real, d1: Real, t: Real) -> Point2<Real> {
    let k = (d - d1) / d1;
    Point2::new(
        (d - d1) * t.cos() / 2.0 + d1 * (k * t).cos() / 2.0,
        (d - d1) * t.sin() / 2.0 - d1 * (k * t).sin() / 2.0,
    )
}

/// Parameter (≤ 0) at which the hypocycloid reaches the dedendum circle `di`.
pub fn inner_end(d: Real, d1: Real, di: Real) -> Result<Real, GeometryError> {
    let ratio = (2.0 * d1 * d1 - di * di - 2.0 * d1 * d + d * d) / (2.0 * d1 * (d1 - d));
    Ok(-(d1 * bounded_acos(ratio, Flank::Inner)?) / d)
}

/// Parameter (≥ 0) at which the epicycloid reaches the addendum circle `da`.
pub fn outer_end(d: Real, d2: Real, da: Real) -> Result<Real, GeometryError> {
    let ratio = (2.0 * d2 * d2 - da * da + 2.0 * d2 * d + d * d) / (2.0 * d2 * (d2 + d));
    Ok(d2 * bounded_acos(ratio, Flank::Outer)? / d)
}

/// `acos` that clamps rounding noise but rejects genuinely out-of-range input.
fn bounded_acos(ratio: Real, flank: Flank) -> Result<Real, GeometryError> {
    let slack = tolerance();
    if !ratio.is_finite() || ratio < -1.0 - slack || ratio > 1.0 + slack {
        return Err(GeometryError::InvalidGeometry { flank, ratio });
    }
    Ok(ratio.clamp(-1.0, 1.0).acos())
}

#[inline]
fn polar_angle(p: Point2<Real>) -> Real {
    p.y.atan2(p.x)
}

/// Largest `t` between `inside` (where `f ≤ 0`) and `outside` (where `f > 0`)
/// that still satisfies `f(t) ≤ 0`.
fn bisect<F: Fn(Real) -> Real>(f: F, inside: Real, outside: Real) -> Real {
    let (mut lo, mut hi) = (inside, outside);
    for _ in 0..CENTRE_LINE_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if f(mid) <= 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}
