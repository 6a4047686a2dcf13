//! This example writes every wheel of the default movement as STL

use std::{fs, path::Path};
use watch_movement::gear::{GearSpec, generate_gear_outline};
use watch_movement::movement::{Movement, MovementConfig};
use watch_movement::solid::{Extruder, Solid};
use watch_movement::traits::GeometrySink;

const PATH: &str = "stl/gears";

fn main() {
    if let Err(e) = fs::create_dir_all(PATH) {
        eprintln!("{PATH}: {e}");
        return;
    }

    let gear = GearSpec::new(3.0, 30)
        .with_generating_teeth(15, 30)
        .with_addendum_factor(1.75);
    match generate_gear_outline(&gear) {
        Ok(outline) => write_example(&Extruder.extrude_outline(&outline, 2.0), "cycloid_30"),
        Err(e) => eprintln!("cycloid_30: {e}"),
    }

    let mut movement = match Movement::new(MovementConfig::default()) {
        Ok(movement) => movement,
        Err(e) => {
            eprintln!("invalid movement: {e}");
            return;
        },
    };
    match movement.build_parts(&mut Extruder) {
        Ok(parts) => {
            for (id, solid) in parts {
                write_example(&solid, &id.as_str().replace('/', "_"));
            }
        },
        Err(e) => eprintln!("movement parts: {e}"),
    }
}

fn write_example(shape: &Solid, name: &str) {
    let bytes = match shape.to_stl_binary() {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{name}: {e}");
            return;
        },
    };
    let path = Path::new(PATH).join(name).with_extension("stl");
    if let Err(e) = fs::write(&path, bytes) {
        eprintln!("{}: {e}", path.display());
    }
}
