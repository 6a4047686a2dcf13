//! Non-cycloidal wheel outlines.

use crate::errors::GeometryError;
use crate::float_types::{Real, TAU};
use crate::gear::GearOutline;
use crate::gear::outline::{circle_ring, close_ring, dedup_ring, spoke_holes};
use crate::gear::SpokeLayout;
use nalgebra::Point2;

/// Segments of the escapement wheel's axle hole.
const AXLE_SEGMENTS: usize = 32;

/// Ratchet-toothed escapement wheel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EscapementWheelSpec {
    pub tooth_count: usize,
    /// Rim radius at the base of the teeth
    pub radius: Real,
    /// Radial height of a tooth tip above the rim
    pub tooth_height: Real,
    /// Angle the tip leans forward of its base, radians
    pub lift_angle: Real,
    /// Angle between the back of a tooth and the next tooth's base, radians
    pub gap_angle: Real,
    pub axle_hole_radius: Real,
    pub spokes: Option<SpokeLayout>,
}

impl Default for EscapementWheelSpec {
    fn default() -> Self {
        let radius = 27.0;
        Self {
            tooth_count: 30,
            radius,
            tooth_height: 7.5,
            lift_angle: (7.5 as Real).to_radians(),
            gap_angle: (6.0 as Real).to_radians(),
            axle_hole_radius: 3.0,
            spokes: Some(SpokeLayout::new(13, (10.0 as Real).to_radians(), radius / 3.0, 1.5)),
        }
    }
}

impl EscapementWheelSpec {
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.tooth_count < 3 {
            return Err(GeometryError::InvalidParameter(format!(
                "an escapement wheel needs at least 3 teeth, got {}",
                self.tooth_count
            )));
        }
        if !(self.radius > 0.0 && self.tooth_height > 0.0) {
            return Err(GeometryError::InvalidParameter(format!(
                "radius {} and tooth height {} must be positive",
                self.radius, self.tooth_height
            )));
        }
        let per_tooth = TAU / self.tooth_count as Real;
        for (name, angle) in [("lift", self.lift_angle), ("gap", self.gap_angle)] {
            if !(angle > 0.0 && angle < per_tooth) {
                return Err(GeometryError::InvalidParameter(format!(
                    "{name} angle {angle} must lie in (0, {per_tooth})"
                )));
            }
        }
        if !(self.axle_hole_radius > 0.0 && self.axle_hole_radius < self.radius) {
            return Err(GeometryError::InvalidParameter(format!(
                "axle hole radius {} must lie in (0, {})",
                self.axle_hole_radius, self.radius
            )));
        }
        Ok(())
    }
}

/// Outline of a ratchet-toothed escapement wheel.
///
/// Each tooth runs from its base on the rim out to a tip leaning forward by
/// the lift angle, then back down to the rim `gap_angle` short of the next
/// base.
pub fn escapement_wheel_outline(spec: &EscapementWheelSpec) -> Result<GearOutline, GeometryError> {
    spec.validate()?;

    let per_tooth = TAU / spec.tooth_count as Real;
    let tip_radius = spec.radius + spec.tooth_height;
    let polar = |r: Real, angle: Real| Point2::new(r * angle.cos(), r * angle.sin());

    let mut outer = Vec::with_capacity(3 * spec.tooth_count + 1);
    for i in 0..spec.tooth_count {
        let base = i as Real * per_tooth;
        outer.push(polar(spec.radius, base));
        outer.push(polar(tip_radius, base + spec.lift_angle));
        outer.push(polar(spec.radius, base + per_tooth - spec.gap_angle));
    }
    let outer = close_ring(dedup_ring(outer));

    let mut holes = vec![circle_ring(spec.axle_hole_radius, AXLE_SEGMENTS)];
    if let Some(spokes) = &spec.spokes {
        holes.extend(spoke_holes(spokes, spec.axle_hole_radius, spec.radius)?);
    }

    Ok(GearOutline::new(outer, holes, spec.tooth_count))
}
