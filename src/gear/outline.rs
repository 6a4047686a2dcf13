//! Full gear outlines: replicated tooth ring plus hole polygons.

use crate::errors::GeometryError;
use crate::float_types::{Real, TAU, tolerance};
use crate::gear::{BORE_SEGMENTS, GearSpec, SpokeLayout, ToothProfile};
use geo::{Area, Intersects, Line, LineString, Orient, Polygon as GeoPolygon, orient::Direction};
use nalgebra::{Point2, Rotation2};

/// A closed outer ring and the holes cut out of it, in the XY plane.
///
/// Every ring repeats its first point as its last point. Outlines are built
/// once and handed to a geometry sink; nothing here mutates them afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GearOutline {
    outer: Vec<Point2<Real>>,
    holes: Vec<Vec<Point2<Real>>>,
    tooth_count: usize,
}

impl GearOutline {
    /// Assemble an outline from already closed rings.
    pub fn new(outer: Vec<Point2<Real>>, holes: Vec<Vec<Point2<Real>>>, tooth_count: usize) -> Self {
        Self {
            outer,
            holes,
            tooth_count,
        }
    }

    pub fn outer(&self) -> &[Point2<Real>] {
        &self.outer
    }

    pub fn holes(&self) -> &[Vec<Point2<Real>>] {
        &self.holes
    }

    pub fn tooth_count(&self) -> usize {
        self.tooth_count
    }

    /// Distinct points of the outer ring that make up one tooth.
    pub fn points_per_tooth(&self) -> usize {
        if self.tooth_count == 0 {
            return 0;
        }
        self.outer.len().saturating_sub(1) / self.tooth_count
    }

    /// Largest distance of an outer point from the gear axis.
    pub fn max_radius(&self) -> Real {
        self.outer
            .iter()
            .map(|p| p.coords.norm())
            .fold(0.0, Real::max)
    }

    /// Smallest distance of an outer point from the gear axis.
    pub fn min_radius(&self) -> Real {
        self.outer
            .iter()
            .map(|p| p.coords.norm())
            .fold(Real::INFINITY, Real::min)
    }

    /// Convert to a `geo` polygon, exterior counter-clockwise, holes clockwise.
    pub fn to_geo_polygon(&self) -> GeoPolygon<Real> {
        fn ring(points: &[Point2<Real>]) -> LineString<Real> {
            LineString::from(points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>())
        }
        GeoPolygon::new(
            ring(&self.outer),
            self.holes.iter().map(|h| ring(h)).collect(),
        )
        .orient(Direction::Default)
    }

    /// Face area: outer ring minus holes.
    pub fn area(&self) -> Real {
        self.to_geo_polygon().unsigned_area()
    }

    /// Check that every ring is closed, finite, free of repeated points and
    /// does not cross itself.
    pub fn validate(&self) -> Result<(), GeometryError> {
        validate_ring(&self.outer)?;
        for hole in &self.holes {
            validate_ring(hole)?;
        }
        Ok(())
    }
}

/// Generate the outline of a cycloidal gear.
///
/// Pure and deterministic; identical specs always give identical outlines.
pub fn generate_gear_outline(spec: &GearSpec) -> Result<GearOutline, GeometryError> {
    spec.validate()?;
    spec.warn_unusual();

    let tooth = ToothProfile::generate(spec)?;
    let z = spec.tooth_count();
    let pitch = spec.angular_pitch();

    let mut outer = Vec::with_capacity(tooth.len() * z + 1);
    for k in 0..z {
        let rot = Rotation2::new(k as Real * pitch);
        outer.extend(tooth.points().iter().map(|p| rot * p));
    }
    let outer = close_ring(dedup_ring(outer));

    let bore = spec.bore_radius();
    let mut holes = vec![circle_ring(bore, BORE_SEGMENTS)];
    if let Some(spokes) = spec.spokes() {
        holes.extend(spoke_holes(spokes, bore, spec.root_radius())?);
    }

    tracing::debug!(
        tooth_count = z,
        points = outer.len(),
        holes = holes.len(),
        "generated gear outline"
    );

    Ok(GearOutline::new(outer, holes, z))
}

/// Closed circle of `segments` sides, counter-clockwise from +X.
pub fn circle_ring(radius: Real, segments: usize) -> Vec<Point2<Real>> {
    (0..=segments)
        .map(|i| {
            let angle = if i == segments {
                0.0
            } else {
                TAU * i as Real / segments as Real
            };
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Sector-shaped cut-outs between `bore_radius` and `rim_base - rim_thickness`.
pub fn spoke_holes(
    layout: &SpokeLayout,
    bore_radius: Real,
    rim_base: Real,
) -> Result<Vec<Vec<Point2<Real>>>, GeometryError> {
    let inner = layout.hub_radius;
    let outer = rim_base - layout.rim_thickness;
    if layout.count == 0 || layout.segments == 0 {
        return Err(GeometryError::InvalidParameter(
            "spoke layout needs at least one spoke and one arc segment".to_string(),
        ));
    }
    if !(inner > bore_radius) {
        return Err(GeometryError::InvalidParameter(format!(
            "spoke hub radius {inner} must exceed the bore radius {bore_radius}"
        )));
    }
    if !(outer > inner) {
        return Err(GeometryError::InvalidParameter(format!(
            "spoke cut-outs need room between hub {inner} and rim {outer}"
        )));
    }

    let per_spoke = TAU / layout.count as Real;
    let half_spoke = layout.spoke_angle / 4.5;
    if !(per_spoke - 2.0 * half_spoke > 0.0) {
        return Err(GeometryError::InvalidParameter(format!(
            "{} spokes of {} rad leave no room for cut-outs",
            layout.count, layout.spoke_angle
        )));
    }

    let n = layout.segments;
    let holes = (0..layout.count)
        .map(|i| {
            let start = i as Real * per_spoke + half_spoke;
            let end = (i + 1) as Real * per_spoke - half_spoke;
            let at = |j: usize| start + (end - start) * j as Real / n as Real;

            let mut hole = Vec::with_capacity(2 * n + 3);
            hole.extend((0..=n).map(|j| Point2::new(outer * at(j).cos(), outer * at(j).sin())));
            hole.extend(
                (0..=n)
                    .rev()
                    .map(|j| Point2::new(inner * at(j).cos(), inner * at(j).sin())),
            );
            close_ring(hole)
        })
        .collect();
    Ok(holes)
}

/// Drop consecutive points closer than the tolerance.
pub(crate) fn dedup_ring(points: Vec<Point2<Real>>) -> Vec<Point2<Real>> {
    let eps = tolerance();
    let mut out: Vec<Point2<Real>> = Vec::with_capacity(points.len() + 1);
    for p in points {
        if out.last().is_some_and(|q| (p - q).norm() <= eps) {
            continue;
        }
        out.push(p);
    }
    out
}

/// Make the last point exactly the first, replacing a near-duplicate.
pub(crate) fn close_ring(mut points: Vec<Point2<Real>>) -> Vec<Point2<Real>> {
    let eps = tolerance();
    if points.len() > 1 {
        let first = points[0];
        if points.last().is_some_and(|q| (first - q).norm() <= eps) {
            points.pop();
        }
        points.push(first);
    }
    points
}

fn validate_ring(ring: &[Point2<Real>]) -> Result<(), GeometryError> {
    let origin = Point2::origin();
    let (Some(&first), Some(&last)) = (ring.first(), ring.last()) else {
        return Err(GeometryError::TooFewPoints(origin));
    };
    // a closed triangle is the smallest ring: 3 distinct points + closure
    if ring.len() < 4 {
        return Err(GeometryError::TooFewPoints(first));
    }
    if let Some(p) = ring.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(GeometryError::InvalidCoordinate(*p));
    }
    let eps = tolerance();
    if (first - last).norm() > eps {
        return Err(GeometryError::RingNotClosed { first, last });
    }
    if let Some(w) = ring.windows(2).find(|w| (w[1] - w[0]).norm() <= eps) {
        return Err(GeometryError::RepeatedPoint(w[0]));
    }

    let segments: Vec<Line<Real>> = ring
        .windows(2)
        .map(|w| Line::new((w[0].x, w[0].y), (w[1].x, w[1].y)))
        .collect();
    let count = segments.len();
    for i in 0..count {
        for j in (i + 2)..count {
            // the closing segment touches the first one by construction
            if i == 0 && j == count - 1 {
                continue;
            }
            if segments[i].intersects(&segments[j]) {
                return Err(GeometryError::SelfIntersection(ring[i]));
            }
        }
    }
    Ok(())
}
