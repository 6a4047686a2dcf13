//! Procedural geometry and kinematics for an animated **mechanical watch movement**:
//! cycloidal gear outlines, an escapement wheel with a tick-and-hold waveform,
//! a pallet fork swinging in step with it, and a gear train carrying the
//! rotation down to the hands.
//!
//! The crate produces plain data. Outlines go to a [`GeometrySink`](traits::GeometrySink)
//! (an [`Extruder`](solid::Extruder) is provided), rotations go to any
//! [`RenderTarget`](traits::RenderTarget), once per frame:
//!
//! ```
//! use watch_movement::movement::{Movement, MovementConfig};
//! use watch_movement::part::PartId;
//!
//! let mut movement = Movement::new(MovementConfig::default()).unwrap();
//! let frame = movement.advance(1.0 / 60.0);
//! assert!(frame.get(&PartId::from("hour")).is_some());
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export of extruded parts
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **serde**: `Serialize`/`Deserialize` for every configuration type
//! - **clock**: read the local wall-clock time with `chrono` to set the hands
//! - **wasm**: `wasm-bindgen` bindings for driving the movement from JavaScript

#![forbid(unsafe_code)]
#![warn(unused)]
#![warn(clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod escapement;
pub mod float_types;
pub mod gear;
pub mod io;
pub mod movement;
pub mod pallet;
pub mod part;
pub mod shapes;
pub mod solid;
pub mod time_of_day;
pub mod traits;
pub mod train;
pub mod triangulated;

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::{GeometryError, MovementError, TrainError};
pub use gear::{GearOutline, GearSpec, generate_gear_outline};
pub use movement::{FrameRotations, Movement, MovementConfig, advance};
pub use part::PartId;
pub use traits::{GeometrySink, RenderTarget};
