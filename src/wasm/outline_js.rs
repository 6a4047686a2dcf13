use crate::float_types::Real;
use crate::gear::{GearSpec, generate_gear_outline};
use crate::shapes::{EscapementWheelSpec, escapement_wheel_outline};
use crate::wasm::{rings_to_object, to_js_error};
use wasm_bindgen::prelude::*;

/// Outline of a cycloidal gear as `{ outer, holes }` flat coordinate arrays,
/// ready for a three.js `Shape`.
#[wasm_bindgen(js_name = gearOutline)]
pub fn gear_outline(
    module: f64,
    tooth_count: u32,
    generating_teeth_hypo: Option<u32>,
    generating_teeth_epi: Option<u32>,
    addendum_factor: Option<f64>,
    clearance: Option<f64>,
    backlash: Option<f64>,
) -> Result<JsValue, JsValue> {
    let mut spec = GearSpec::new(module as Real, tooth_count as usize)
        .with_addendum_factor(addendum_factor.unwrap_or(1.0) as Real)
        .with_clearance(clearance.unwrap_or(0.0) as Real)
        .with_backlash(backlash.unwrap_or(0.0) as Real);
    if let (Some(hypo), Some(epi)) = (generating_teeth_hypo, generating_teeth_epi) {
        spec = spec.with_generating_teeth(hypo, epi);
    }
    let outline = generate_gear_outline(&spec).map_err(to_js_error)?;
    rings_to_object(outline.outer(), outline.holes())
}

/// Outline of the default escapement wheel scaled to `radius`.
#[wasm_bindgen(js_name = escapementWheelOutline)]
pub fn escapement_wheel_outline_js(tooth_count: u32, radius: f64, tooth_height: f64) -> Result<JsValue, JsValue> {
    let defaults = EscapementWheelSpec::default();
    let scale = radius as Real / defaults.radius;
    let spec = EscapementWheelSpec {
        tooth_count: tooth_count as usize,
        radius: radius as Real,
        tooth_height: tooth_height as Real,
        axle_hole_radius: defaults.axle_hole_radius * scale,
        spokes: defaults.spokes.map(|mut spokes| {
            spokes.hub_radius *= scale;
            spokes.rim_thickness *= scale;
            spokes
        }),
        ..defaults
    };
    let outline = escapement_wheel_outline(&spec).map_err(to_js_error)?;
    rings_to_object(outline.outer(), outline.holes())
}
