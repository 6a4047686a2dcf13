//! The assembled watch movement: escapement, pallet fork and gear train,
//! advanced together once per frame.

use crate::errors::{GeometryError, MovementError, TrainError};
use crate::escapement::{EscapementConfig, EscapementState};
use crate::float_types::Real;
use crate::gear::{GearSpec, OutlineCache};
use crate::pallet::PalletConfig;
use crate::part::PartId;
use crate::shapes::{EscapementWheelSpec, escapement_wheel_outline};
use crate::time_of_day::{HandKind, TimeOfDay};
use crate::traits::{GeometrySink, RenderTarget};
use crate::train::{GearTrain, TrainConfig, TrainNodeConfig};
use hashbrown::HashMap;

/// Part id of the pallet fork.
pub const PALLET_PART: &str = "pallet";

/// Everything needed to build a [`Movement`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementConfig {
    pub escapement: EscapementConfig,
    /// Ratchet wheel carried by the train's root node
    pub escapement_wheel: Option<EscapementWheelSpec>,
    pub escapement_thickness: Real,
    pub pallet: PalletConfig,
    pub train: TrainConfig,
}

impl Default for MovementConfig {
    /// The watch scene: a seconds hand on the escapement, minutes on the third
    /// wheel and hours on the hour wheel, geared so all three keep time.
    fn default() -> Self {
        let train = TrainConfig::new(vec![
            TrainNodeConfig::root("escapement")
                .with_hand(HandKind::Seconds)
                .with_pinion(GearSpec::from_pitch_radius(5.0, 8).with_addendum_factor(1.5))
                .with_thickness(2.0),
            TrainNodeConfig::child("center", "escapement", 8, 64)
                .with_wheel(GearSpec::from_pitch_radius(20.5, 64).with_addendum_factor(1.5))
                .with_pinion(GearSpec::from_pitch_radius(3.0, 8))
                .with_thickness(1.5),
            TrainNodeConfig::child("third", "center", 8, 60)
                .with_hand(HandKind::Minutes)
                .with_wheel(GearSpec::from_pitch_radius(57.6, 60).with_addendum_factor(1.75))
                .with_pinion(GearSpec::from_pitch_radius(7.2, 8))
                .with_thickness(1.5),
            TrainNodeConfig::child("intermediate", "third", 8, 40)
                .with_wheel(GearSpec::from_pitch_radius(10.0, 40).with_addendum_factor(1.5))
                .with_pinion(GearSpec::from_pitch_radius(2.5, 10).with_addendum_factor(1.3))
                .with_thickness(1.5),
            TrainNodeConfig::child("hour", "intermediate", 10, 24)
                .with_hand(HandKind::Hours)
                .with_wheel(GearSpec::from_pitch_radius(26.3, 24).with_addendum_factor(1.3))
                .with_thickness(1.5),
        ]);
        Self {
            escapement: EscapementConfig::default(),
            escapement_wheel: Some(EscapementWheelSpec::default()),
            escapement_thickness: 2.0,
            pallet: PalletConfig::default(),
            train,
        }
    }
}

/// Part rotations for one frame, train nodes in walking order then the
/// pallet fork.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameRotations {
    parts: Vec<(PartId, Real)>,
}

impl FrameRotations {
    pub fn get(&self, id: &PartId) -> Option<Real> {
        self.parts
            .iter()
            .find(|(part, _)| part == id)
            .map(|&(_, rotation)| rotation)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PartId, Real)> {
        self.parts.iter().map(|(id, rotation)| (id, *rotation))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Kinematic state of the whole movement. Owned by the frame loop and
/// advanced with [`Movement::advance`].
#[derive(Debug, Clone)]
pub struct Movement {
    config: MovementConfig,
    escapement: EscapementState,
    train: GearTrain,
    cache: OutlineCache,
    pallet_id: PartId,
}

impl Movement {
    /// Validate `config` and put every part at rest.
    pub fn new(config: MovementConfig) -> Result<Self, MovementError> {
        let escapement = EscapementState::new(config.escapement.clone())?;
        let mut train = GearTrain::assemble(&config.train)?;
        train.propagate(escapement.rotation());
        Ok(Self {
            config,
            escapement,
            train,
            cache: OutlineCache::new(),
            pallet_id: PartId::from(PALLET_PART),
        })
    }

    /// Like [`Movement::new`], with the hands pointing at `time`.
    pub fn seeded(config: MovementConfig, time: &TimeOfDay) -> Result<Self, MovementError> {
        let mut movement = Self::new(config)?;
        movement.seed_hands(time)?;
        Ok(movement)
    }

    /// Turn every node that carries a hand so the hand shows `time`.
    ///
    /// A hand on the root is set through the escapement, so its tick
    /// waveform continues from the new angle.
    pub fn seed_hands(&mut self, time: &TimeOfDay) -> Result<(), TrainError> {
        let seeds: Vec<(PartId, bool, Real)> = self
            .train
            .nodes()
            .iter()
            .filter_map(|node| {
                let hand = node.config().hand?;
                Some((node.id().clone(), node.config().is_root(), hand.seed_angle(time)))
            })
            .collect();

        for (id, is_root, angle) in seeds {
            if is_root {
                let travelled = self.escapement.rotation() - self.escapement.initial_rotation();
                self.escapement.set_initial_rotation(angle - travelled);
            }
            self.train.seed(&id, angle)?;
            tracing::debug!(node = %id, angle, "seeded hand");
        }
        Ok(())
    }

    /// Advance by `dt` seconds and return every part's rotation.
    pub fn advance(&mut self, dt: Real) -> FrameRotations {
        self.escapement.advance(dt);
        self.train.propagate(self.escapement.rotation());
        self.rotations()
    }

    /// Current rotations without advancing.
    pub fn rotations(&self) -> FrameRotations {
        let mut parts: Vec<(PartId, Real)> = self
            .train
            .nodes()
            .iter()
            .map(|node| (node.id().clone(), node.rotation()))
            .collect();
        parts.push((self.pallet_id.clone(), self.pallet_angle()));
        FrameRotations { parts }
    }

    pub fn pallet_angle(&self) -> Real {
        self.config.pallet.angle(&self.escapement)
    }

    /// Rotation of a node, one of its sub-parts (`node/wheel`) or the pallet.
    pub fn part_rotation(&self, id: &PartId) -> Option<Real> {
        if *id == self.pallet_id {
            return Some(self.pallet_angle());
        }
        if let Some(rotation) = self.train.rotation(id) {
            return Some(rotation);
        }
        let (node, _) = id.as_str().rsplit_once('/')?;
        self.train.rotation(&PartId::from(node))
    }

    /// Push the current rotations to registered targets. Returns how many
    /// targets were updated; unknown ids are left alone.
    pub fn sync_targets<T: RenderTarget>(&self, targets: &mut HashMap<PartId, T>) -> usize {
        let mut updated = 0;
        for (id, target) in targets.iter_mut() {
            match self.part_rotation(id) {
                Some(rotation) => {
                    target.set_rotation(rotation);
                    updated += 1;
                },
                None => tracing::trace!(part = %id, "no rotation for render target"),
            }
        }
        updated
    }

    /// Generate and extrude every wheel and pinion.
    ///
    /// Parts are named `<node>/wheel` and `<node>/pinion`. The root's wheel is
    /// the escapement ratchet when one is configured.
    pub fn build_parts<G: GeometrySink>(
        &mut self,
        sink: &mut G,
    ) -> Result<Vec<(PartId, G::Solid)>, GeometryError> {
        let mut parts = Vec::new();
        for node in self.train.nodes() {
            let config = node.config();
            let wheel_id = node.id().child("wheel");
            match (&self.config.escapement_wheel, config.is_root()) {
                (Some(ratchet), true) => {
                    let outline = escapement_wheel_outline(ratchet)?;
                    let solid = sink.extrude_outline(&outline, self.config.escapement_thickness);
                    parts.push((wheel_id, solid));
                },
                _ => {
                    if let Some(wheel) = &config.wheel {
                        let outline = self.cache.get_or_generate(wheel)?;
                        parts.push((wheel_id, sink.extrude_outline(outline, config.thickness)));
                    }
                },
            }
            if let Some(pinion) = &config.pinion {
                let outline = self.cache.get_or_generate(pinion)?;
                parts.push((
                    node.id().child("pinion"),
                    sink.extrude_outline(outline, config.thickness),
                ));
            }
        }
        tracing::debug!(
            parts = parts.len(),
            cached = self.cache.len(),
            "built movement parts"
        );
        Ok(parts)
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn escapement(&self) -> &EscapementState {
        &self.escapement
    }

    pub fn train(&self) -> &GearTrain {
        &self.train
    }

    pub fn cache(&self) -> &OutlineCache {
        &self.cache
    }
}

/// Advance `state` by one frame of `dt` seconds.
pub fn advance(state: &mut Movement, dt: Real) -> FrameRotations {
    state.advance(dt)
}
