use crate::float_types::Real;
use js_sys::{Array, Float64Array, Object, Reflect};
use nalgebra::Point2;
use wasm_bindgen::prelude::*;

pub mod movement_js;
pub mod outline_js;

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Flatten a ring to `[x0, y0, x1, y1, ...]`.
fn ring_to_array(ring: &[Point2<Real>]) -> Float64Array {
    let flat: Vec<f64> = ring
        .iter()
        .flat_map(|p| [p.x as f64, p.y as f64])
        .collect();
    Float64Array::from(flat.as_slice())
}

/// `{ outer: Float64Array, holes: Float64Array[] }`
fn rings_to_object(outer: &[Point2<Real>], holes: &[Vec<Point2<Real>>]) -> Result<JsValue, JsValue> {
    let js_holes = Array::new();
    for hole in holes {
        js_holes.push(&ring_to_array(hole));
    }
    let obj = Object::new();
    Reflect::set(&obj, &"outer".into(), &ring_to_array(outer))?;
    Reflect::set(&obj, &"holes".into(), &js_holes)?;
    Ok(obj.into())
}
