use crate::float_types::Real;
use crate::gear::GearOutline;
use nalgebra::Point2;

/// Anything that can show a part at a rotation about its fixed local axis.
///
/// The kinematics driver only ever writes through this trait; it never sees
/// the concrete scene-graph type behind it. Last write in a frame wins.
pub trait RenderTarget {
    fn set_rotation(&mut self, radians: Real);
}

/// A bare angle is the simplest possible target.
impl RenderTarget for Real {
    fn set_rotation(&mut self, radians: Real) {
        *self = radians;
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    fn set_rotation(&mut self, radians: Real) {
        (**self).set_rotation(radians);
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for Box<T> {
    fn set_rotation(&mut self, radians: Real) {
        (**self).set_rotation(radians);
    }
}

/// Turns a planar outline into a displayable solid.
///
/// The returned solid is opaque to the core: it is only ever handed back to
/// the caller keyed by part.
pub trait GeometrySink {
    type Solid;

    /// Extrude `outer` (with `holes` cut out) along +Z by `depth`.
    ///
    /// Rings may or may not repeat their first point at the end.
    fn extrude(
        &mut self,
        outer: &[Point2<Real>],
        holes: &[Vec<Point2<Real>>],
        depth: Real,
    ) -> Self::Solid;

    /// Extrude a generated gear outline.
    fn extrude_outline(&mut self, outline: &GearOutline, depth: Real) -> Self::Solid {
        self.extrude(outline.outer(), outline.holes(), depth)
    }
}
