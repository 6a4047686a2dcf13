//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::{Point2, Rotation2};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use watch_movement::float_types::Real;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Distance from `p` to the closest point of `points`.
pub fn nearest_distance(p: &Point2<Real>, points: &[Point2<Real>]) -> Real {
    points
        .iter()
        .map(|q| (p - q).norm())
        .fold(Real::INFINITY, Real::min)
}

/// Every point rotated by `angle` lands (within `eps`) on some point of the ring.
pub fn is_rotationally_symmetric(ring: &[Point2<Real>], angle: Real, eps: Real) -> bool {
    let rot = Rotation2::new(angle);
    ring.iter()
        .all(|p| nearest_distance(&(rot * p), ring) < eps)
}

fn orient(a: &Point2<Real>, b: &Point2<Real>, c: &Point2<Real>) -> Real {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper crossing of segments `p1p2` and `p3p4` (touching does not count).
pub fn segments_cross(
    p1: &Point2<Real>,
    p2: &Point2<Real>,
    p3: &Point2<Real>,
    p4: &Point2<Real>,
) -> bool {
    orient(p1, p2, p3) * orient(p1, p2, p4) < 0.0 && orient(p3, p4, p1) * orient(p3, p4, p2) < 0.0
}

/// Number of non-adjacent segment pairs of a closed ring that cross.
pub fn crossings(ring: &[Point2<Real>]) -> usize {
    let n = ring.len() - 1;
    let mut count = 0;
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_cross(&ring[i], &ring[i + 1], &ring[j], &ring[j + 1]) {
                count += 1;
            }
        }
    }
    count
}

/// In-memory writer for a `tracing_subscriber` formatter.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a warn-level subscriber on this thread and return what it logged.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
