use crate::float_types::Real;
use crate::movement::{Movement, MovementConfig};
use crate::solid::Extruder;
use crate::time_of_day::TimeOfDay;
use crate::wasm::to_js_error;
use js_sys::{Array, Float64Array, Object, Reflect};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct MovementJs {
    pub(crate) inner: Movement,
}

#[wasm_bindgen]
impl MovementJs {
    /// The default watch, hands at midnight.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<MovementJs, JsValue> {
        let inner = Movement::new(MovementConfig::default()).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    /// The default watch with its hands set to the given local time.
    #[wasm_bindgen(js_name = atTime)]
    pub fn at_time(hours: u32, minutes: u32, seconds: f64) -> Result<MovementJs, JsValue> {
        let time = TimeOfDay::new(hours, minutes, seconds as Real);
        let inner = Movement::seeded(MovementConfig::default(), &time).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    /// Advance one frame; rotations come back in [`MovementJs::part_ids`] order.
    pub fn advance(&mut self, dt: f64) -> Float64Array {
        let rotations: Vec<f64> = self
            .inner
            .advance(dt as Real)
            .iter()
            .map(|(_, rotation)| rotation as f64)
            .collect();
        Float64Array::from(rotations.as_slice())
    }

    #[wasm_bindgen(js_name = partIds)]
    pub fn part_ids(&self) -> Array {
        self.inner
            .rotations()
            .iter()
            .map(|(id, _)| JsValue::from_str(id.as_str()))
            .collect()
    }

    #[wasm_bindgen(js_name = palletAngle)]
    pub fn pallet_angle(&self) -> f64 {
        self.inner.pallet_angle() as f64
    }

    /// Extruded wheels and pinions as `{ id, positions, normals }` objects,
    /// non-indexed triangles.
    #[wasm_bindgen(js_name = buildParts)]
    pub fn build_parts(&mut self) -> Result<Array, JsValue> {
        let parts = self.inner.build_parts(&mut Extruder).map_err(to_js_error)?;
        let out = Array::new();
        for (id, solid) in parts {
            let mut positions = Vec::with_capacity(solid.len() * 9);
            let mut normals = Vec::with_capacity(solid.len() * 9);
            for vertex in solid.triangles().iter().flatten() {
                let (p, n) = (vertex.position, vertex.normal);
                positions.extend([p.x as f64, p.y as f64, p.z as f64]);
                normals.extend([n.x as f64, n.y as f64, n.z as f64]);
            }
            let obj = Object::new();
            Reflect::set(&obj, &"id".into(), &JsValue::from_str(id.as_str()))?;
            Reflect::set(&obj, &"positions".into(), &Float64Array::from(positions.as_slice()))?;
            Reflect::set(&obj, &"normals".into(), &Float64Array::from(normals.as_slice()))?;
            out.push(&obj);
        }
        Ok(out)
    }
}
