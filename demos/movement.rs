//! This example runs the default movement for a few simulated seconds and
//! logs the hand positions.
//!
//! `RUST_LOG=watch_movement=debug cargo run --example movement`

use watch_movement::float_types::Real;
use watch_movement::movement::{Movement, MovementConfig};
use watch_movement::part::PartId;
use watch_movement::time_of_day::TimeOfDay;

const FRAME: Real = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("watch_movement=info".parse().unwrap()),
        )
        .init();

    #[cfg(feature = "clock")]
    let time = TimeOfDay::now();
    #[cfg(not(feature = "clock"))]
    let time = TimeOfDay::new(10, 8, 30.0);

    let mut movement = match Movement::seeded(MovementConfig::default(), &time) {
        Ok(movement) => movement,
        Err(e) => {
            eprintln!("invalid movement: {e}");
            return;
        },
    };
    let hands: Vec<PartId> = ["escapement", "third", "hour"].map(PartId::from).into();

    for frame in 0..=(6.0 / FRAME) as usize {
        let rotations = movement.advance(FRAME);
        if frame % 30 == 0 {
            let degrees: Vec<String> = hands
                .iter()
                .filter_map(|id| rotations.get(id))
                .map(|r| format!("{:8.2}", r.to_degrees()))
                .collect();
            tracing::info!(
                t = frame as Real * FRAME,
                pallet = movement.pallet_angle().to_degrees(),
                "hands {}",
                degrees.join(" ")
            );
        }
    }
}
