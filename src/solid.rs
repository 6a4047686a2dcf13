//! Triangle solids produced by extruding outlines.

use crate::float_types::Real;
use crate::traits::GeometrySink;
use crate::triangulated::Triangulated3D;
use geo::{Coord, LineString, Orient, Polygon as GeoPolygon, TriangulateEarcut, orient::Direction};
use nalgebra::{Point2, Point3, Vector3};

/// A vertex of a triangle, holding position and normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    pub const fn new(position: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex { position, normal }
    }
}

/// A closed triangle soup with outward facing normals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Solid {
    triangles: Vec<[Vertex; 3]>,
}

impl Solid {
    pub fn new(triangles: Vec<[Vertex; 3]>) -> Self {
        Self { triangles }
    }

    pub fn triangles(&self) -> &[[Vertex; 3]] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty solid.
    pub fn bounding_box(&self) -> Option<(Point3<Real>, Point3<Real>)> {
        let mut vertices = self.triangles.iter().flatten().map(|v| v.position);
        let first = vertices.next()?;
        Some(vertices.fold((first, first), |(lo, hi), p| {
            (lo.inf(&p), hi.sup(&p))
        }))
    }

    /// Enclosed volume by the divergence theorem; only meaningful when the
    /// surface is closed and consistently wound.
    pub fn volume(&self) -> Real {
        self.triangles
            .iter()
            .map(|[a, b, c]| {
                a.position
                    .coords
                    .dot(&b.position.coords.cross(&c.position.coords))
            })
            .sum::<Real>()
            / 6.0
    }
}

impl Triangulated3D for Solid {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for tri in &self.triangles {
            f(*tri);
        }
    }
}

/// Straight extrusion along +Z with flat caps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extruder;

impl Extruder {
    pub const fn new() -> Self {
        Extruder
    }
}

impl GeometrySink for Extruder {
    type Solid = Solid;

    fn extrude(
        &mut self,
        outer: &[Point2<Real>],
        holes: &[Vec<Point2<Real>>],
        depth: Real,
    ) -> Solid {
        if !(depth.is_finite() && depth > 0.0) {
            tracing::warn!(depth, "refusing to extrude with a non-positive depth");
            return Solid::default();
        }

        let ring = |points: &[Point2<Real>]| {
            LineString::new(points.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
        };
        // exterior counter-clockwise, holes clockwise
        let polygon = GeoPolygon::new(ring(outer), holes.iter().map(|h| ring(h)).collect())
            .orient(Direction::Default);

        let mut triangles = Vec::new();
        let up = Vector3::z();
        let down = -up;

        // caps
        let raw = polygon.earcut_triangles_raw();
        let at = |i: usize, z: Real| Point3::new(raw.vertices[2 * i], raw.vertices[2 * i + 1], z);
        for tri in raw.triangle_indices.chunks_exact(3) {
            let (a, mut b, mut c) = (tri[0], tri[1], tri[2]);
            let (pa, pb, pc) = (at(a, 0.0), at(b, 0.0), at(c, 0.0));
            let signed = (pb - pa).cross(&(pc - pa)).z;
            if signed.abs() <= Real::EPSILON {
                continue;
            }
            if signed < 0.0 {
                std::mem::swap(&mut b, &mut c);
            }
            triangles.push([
                Vertex::new(at(a, depth), up),
                Vertex::new(at(b, depth), up),
                Vertex::new(at(c, depth), up),
            ]);
            triangles.push([
                Vertex::new(at(a, 0.0), down),
                Vertex::new(at(c, 0.0), down),
                Vertex::new(at(b, 0.0), down),
            ]);
        }

        // walls; walking each oriented ring, the material is on the left
        for boundary in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            for line in boundary.lines() {
                let (s, e) = (line.start, line.end);
                let edge = Vector3::new(e.x - s.x, e.y - s.y, 0.0);
                let Some(normal) = edge.cross(&up).try_normalize(Real::EPSILON) else {
                    continue;
                };
                let a0 = Point3::new(s.x, s.y, 0.0);
                let b0 = Point3::new(e.x, e.y, 0.0);
                let a1 = Point3::new(s.x, s.y, depth);
                let b1 = Point3::new(e.x, e.y, depth);
                triangles.push([
                    Vertex::new(a0, normal),
                    Vertex::new(b0, normal),
                    Vertex::new(b1, normal),
                ]);
                triangles.push([
                    Vertex::new(a0, normal),
                    Vertex::new(b1, normal),
                    Vertex::new(a1, normal),
                ]);
            }
        }

        tracing::trace!(triangles = triangles.len(), depth, "extruded outline");
        Solid::new(triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: Real) -> Vec<Point2<Real>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(side, 0.0),
            Point2::new(side, side),
            Point2::new(0.0, side),
            Point2::new(0.0, 0.0),
        ]
    }

    #[test]
    fn cube_from_square() {
        let solid = Extruder.extrude(&square(2.0), &[], 2.0);
        // 2 triangles per cap, 2 per wall
        assert_eq!(solid.len(), 12);
        assert!((solid.volume() - 8.0).abs() < 1e-9);
        let (lo, hi) = solid.bounding_box().unwrap();
        assert_eq!(lo, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(hi, Point3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn clockwise_input_still_faces_out() {
        let mut ring = square(1.0);
        ring.reverse();
        let solid = Extruder.extrude(&ring, &[], 3.0);
        assert!((solid.volume() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_depth_gives_nothing() {
        assert!(Extruder.extrude(&square(1.0), &[], 0.0).is_empty());
    }
}
