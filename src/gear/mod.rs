//! Cycloidal gear geometry.
//!
//! A [`GearSpec`] describes one wheel or pinion; [`generate_gear_outline`]
//! turns it into a closed [`GearOutline`] with a central bore (and optional
//! spoke cut-outs) ready for extrusion. Every wheel of the movement goes
//! through this one generator, only the parameters differ.

use crate::errors::GeometryError;
use crate::float_types::{
    BORE_SETBACK, DEDENDUM_FACTOR, PRACTICAL_ADDENDUM_FACTOR, Real, TAU,
};

pub mod cache;
pub mod outline;
pub mod profile;

pub use cache::OutlineCache;
pub use outline::{GearOutline, generate_gear_outline};
pub use profile::ToothProfile;

/// Samples per tooth flank used unless overridden.
pub const DEFAULT_FLANK_SEGMENTS: usize = 20;
/// Segments of the central bore circle.
pub const BORE_SEGMENTS: usize = 64;

/// Evenly spaced cut-outs between the hub and the rim of a wheel.
///
/// Each cut-out is a sector bounded by an outer arc (`rim_thickness` inside
/// the rim base) and an inner arc on `hub_radius`; the material left between
/// neighbouring sectors forms the spokes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpokeLayout {
    /// Number of spokes (and of cut-outs)
    pub count: usize,
    /// Angular width of one spoke, radians
    pub spoke_angle: Real,
    /// Radius of the solid hub around the bore
    pub hub_radius: Real,
    /// Material kept between the cut-outs and the root of the teeth
    pub rim_thickness: Real,
    /// Segments per arc of each cut-out
    pub segments: usize,
}

impl SpokeLayout {
    pub const fn new(count: usize, spoke_angle: Real, hub_radius: Real, rim_thickness: Real) -> Self {
        Self {
            count,
            spoke_angle,
            hub_radius,
            rim_thickness,
            segments: 16,
        }
    }
}

/// Immutable description of one cycloidal gear.
///
/// ```
/// use watch_movement::gear::{GearSpec, generate_gear_outline};
///
/// let spec = GearSpec::new(3.0, 30)
///     .with_generating_teeth(15, 30)
///     .with_addendum_factor(1.75);
/// assert_eq!(spec.pitch_diameter(), 90.0);
/// let outline = generate_gear_outline(&spec).unwrap();
/// assert_eq!(outline.tooth_count(), 30);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearSpec {
    module: Real,
    tooth_count: usize,
    generating_teeth_hypo: Option<u32>,
    generating_teeth_epi: Option<u32>,
    clearance: Real,
    backlash: Real,
    addendum_factor: Real,
    bore_radius: Option<Real>,
    spokes: Option<SpokeLayout>,
    flank_segments: usize,
}

impl GearSpec {
    /// Gear of the given `module` and `tooth_count`, standard proportions.
    pub const fn new(module: Real, tooth_count: usize) -> Self {
        Self {
            module,
            tooth_count,
            generating_teeth_hypo: None,
            generating_teeth_epi: None,
            clearance: 0.0,
            backlash: 0.0,
            addendum_factor: 1.0,
            bore_radius: None,
            spokes: None,
            flank_segments: DEFAULT_FLANK_SEGMENTS,
        }
    }

    /// Gear sized by its pitch radius; the module is back-derived.
    pub fn from_pitch_radius(pitch_radius: Real, tooth_count: usize) -> Self {
        let module = if tooth_count == 0 {
            0.0
        } else {
            2.0 * pitch_radius / tooth_count as Real
        };
        Self::new(module, tooth_count)
    }

    /// Teeth of the hypocycloid (root) and epicycloid (tip) generating circles.
    pub const fn with_generating_teeth(mut self, hypo: u32, epi: u32) -> Self {
        self.generating_teeth_hypo = Some(hypo);
        self.generating_teeth_epi = Some(epi);
        self
    }

    pub const fn with_addendum_factor(mut self, addendum_factor: Real) -> Self {
        self.addendum_factor = addendum_factor;
        self
    }

    pub const fn with_clearance(mut self, clearance: Real) -> Self {
        self.clearance = clearance;
        self
    }

    pub const fn with_backlash(mut self, backlash: Real) -> Self {
        self.backlash = backlash;
        self
    }

    pub const fn with_bore_radius(mut self, bore_radius: Real) -> Self {
        self.bore_radius = Some(bore_radius);
        self
    }

    pub fn with_spokes(mut self, spokes: SpokeLayout) -> Self {
        self.spokes = Some(spokes);
        self
    }

    pub const fn with_flank_segments(mut self, flank_segments: usize) -> Self {
        self.flank_segments = flank_segments;
        self
    }

    pub const fn module(&self) -> Real {
        self.module
    }

    pub const fn tooth_count(&self) -> usize {
        self.tooth_count
    }

    pub const fn clearance(&self) -> Real {
        self.clearance
    }

    pub const fn backlash(&self) -> Real {
        self.backlash
    }

    pub const fn addendum_factor(&self) -> Real {
        self.addendum_factor
    }

    pub const fn flank_segments(&self) -> usize {
        self.flank_segments
    }

    pub const fn spokes(&self) -> Option<&SpokeLayout> {
        self.spokes.as_ref()
    }

    /// Hypocycloid generating circle, in teeth. Defaults to half the tooth count.
    pub fn generating_teeth_hypo(&self) -> Real {
        self.generating_teeth_hypo
            .map_or(self.tooth_count as Real / 2.0, |z| z as Real)
    }

    /// Epicycloid generating circle, in teeth. Defaults to half the tooth count.
    pub fn generating_teeth_epi(&self) -> Real {
        self.generating_teeth_epi
            .map_or(self.tooth_count as Real / 2.0, |z| z as Real)
    }

    pub fn pitch_diameter(&self) -> Real {
        self.tooth_count as Real * self.module
    }

    pub fn pitch_radius(&self) -> Real {
        0.5 * self.pitch_diameter()
    }

    /// Practical addendum height above the pitch circle.
    pub fn addendum_height(&self) -> Real {
        self.module * PRACTICAL_ADDENDUM_FACTOR * self.addendum_factor
    }

    /// Dedendum depth below the pitch circle, clearance included.
    pub fn dedendum_height(&self) -> Real {
        self.module * DEDENDUM_FACTOR + self.clearance
    }

    pub fn addendum_radius(&self) -> Real {
        self.pitch_radius() + self.addendum_height()
    }

    pub fn root_radius(&self) -> Real {
        self.pitch_radius() - self.dedendum_height()
    }

    /// Angle subtended by one tooth and one gap.
    pub fn angular_pitch(&self) -> Real {
        TAU / self.tooth_count as Real
    }

    /// Backlash expressed as an angle at the pitch circle.
    pub fn angular_backlash(&self) -> Real {
        self.backlash / self.pitch_radius()
    }

    /// Central bore radius.
    ///
    /// Set back `2 * module` from the pitch circle unless given explicitly.
    /// Gears too small for the set-back fall back to half the root radius.
    pub fn bore_radius(&self) -> Real {
        if let Some(bore) = self.bore_radius {
            return bore;
        }
        let set_back = self.pitch_radius() - BORE_SETBACK * self.module;
        if set_back > 0.0 {
            set_back
        } else {
            0.5 * self.root_radius()
        }
    }

    /// Check every invariant the generator relies on.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.tooth_count < 4 {
            return Err(GeometryError::InvalidParameter(format!(
                "a gear needs at least 4 teeth, got {}",
                self.tooth_count
            )));
        }
        let finite = [
            ("module", self.module),
            ("clearance", self.clearance),
            ("backlash", self.backlash),
            ("addendum factor", self.addendum_factor),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(GeometryError::InvalidParameter(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.module <= 0.0 {
            return Err(GeometryError::InvalidParameter(format!(
                "module must be positive, got {}",
                self.module
            )));
        }
        if self.addendum_factor <= 0.0 {
            return Err(GeometryError::InvalidParameter(format!(
                "addendum factor must be positive, got {}",
                self.addendum_factor
            )));
        }
        if self.generating_teeth_hypo() <= 0.0 || self.generating_teeth_epi() <= 0.0 {
            return Err(GeometryError::InvalidParameter(
                "generating circles need at least one tooth".to_string(),
            ));
        }
        if self.flank_segments == 0 {
            return Err(GeometryError::InvalidParameter(
                "a flank needs at least one segment".to_string(),
            ));
        }
        let root = self.root_radius();
        if root <= 0.0 {
            return Err(GeometryError::InvalidParameter(format!(
                "root radius must be positive, got {root}"
            )));
        }
        let bore = self.bore_radius();
        if !(bore > 0.0 && bore < root) {
            return Err(GeometryError::InvalidParameter(format!(
                "bore radius {bore} must lie in (0, root radius {root})"
            )));
        }
        Ok(())
    }

    /// Log parameter combinations that are legal but unusual.
    pub(crate) fn warn_unusual(&self) {
        let (hypo, epi) = (self.generating_teeth_hypo(), self.generating_teeth_epi());
        if hypo < 2.0 || epi < 2.0 {
            tracing::warn!(
                tooth_count = self.tooth_count,
                hypo,
                epi,
                "generating circle has fewer than 2 teeth; tooth flanks will be distorted"
            );
        }
        if hypo >= self.tooth_count as Real {
            tracing::warn!(
                tooth_count = self.tooth_count,
                hypo,
                "hypocycloid generating circle is not smaller than the gear"
            );
        }
    }

    /// Exact identity of every parameter, for memoisation.
    pub fn cache_key(&self) -> SpecKey {
        fn bits(value: Real) -> u64 {
            u64::from(value.to_bits())
        }
        SpecKey {
            module: bits(self.module),
            tooth_count: self.tooth_count,
            generating_teeth: (self.generating_teeth_hypo, self.generating_teeth_epi),
            clearance: bits(self.clearance),
            backlash: bits(self.backlash),
            addendum_factor: bits(self.addendum_factor),
            bore_radius: self.bore_radius.map(bits),
            spokes: self.spokes.as_ref().map(|s| {
                (
                    s.count,
                    bits(s.spoke_angle),
                    bits(s.hub_radius),
                    bits(s.rim_thickness),
                    s.segments,
                )
            }),
            flank_segments: self.flank_segments,
        }
    }
}

/// Bit-exact key of a [`GearSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecKey {
    module: u64,
    tooth_count: usize,
    generating_teeth: (Option<u32>, Option<u32>),
    clearance: u64,
    backlash: u64,
    addendum_factor: u64,
    bore_radius: Option<u64>,
    spokes: Option<(usize, u64, u64, u64, usize)>,
    flank_segments: usize,
}
