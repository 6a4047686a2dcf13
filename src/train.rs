//! Gear train topology and rotation propagation.
//!
//! The train is given as a flat list of nodes, each naming the node that
//! drives it. Assembly checks the list once and fixes a parent-before-child
//! walking order; every frame the root's rotation change is pushed down that
//! order with
//!
//! ```text
//! child_delta = -parent_delta * driving_teeth / driven_teeth
//! ```

use crate::errors::TrainError;
use crate::float_types::Real;
use crate::gear::GearSpec;
use crate::part::PartId;
use crate::time_of_day::HandKind;
use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;

/// One wheel/pinion pair as configured.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainNodeConfig {
    pub id: PartId,
    /// Node whose pinion drives this wheel; `None` for the root
    pub parent: Option<PartId>,
    /// Teeth of the parent's pinion meshing into this wheel
    pub driving_teeth: u32,
    /// Teeth of this node's wheel
    pub driven_teeth: u32,
    pub hand: Option<HandKind>,
    /// Wheel geometry; purely visual
    pub wheel: Option<GearSpec>,
    /// Pinion geometry; purely visual
    pub pinion: Option<GearSpec>,
    /// Extrusion depth of the wheel and pinion
    pub thickness: Real,
}

impl TrainNodeConfig {
    /// The node turned by the escapement. Tooth counts are not used for it.
    pub fn root(id: impl Into<PartId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            driving_teeth: 0,
            driven_teeth: 0,
            hand: None,
            wheel: None,
            pinion: None,
            thickness: 1.0,
        }
    }

    /// A wheel of `driven_teeth` driven by a `driving_teeth` pinion on `parent`.
    pub fn child(
        id: impl Into<PartId>,
        parent: impl Into<PartId>,
        driving_teeth: u32,
        driven_teeth: u32,
    ) -> Self {
        Self {
            id: id.into(),
            parent: Some(parent.into()),
            driving_teeth,
            driven_teeth,
            hand: None,
            wheel: None,
            pinion: None,
            thickness: 1.0,
        }
    }

    pub fn with_hand(mut self, hand: HandKind) -> Self {
        self.hand = Some(hand);
        self
    }

    pub fn with_wheel(mut self, wheel: GearSpec) -> Self {
        self.wheel = Some(wheel);
        self
    }

    pub fn with_pinion(mut self, pinion: GearSpec) -> Self {
        self.pinion = Some(pinion);
        self
    }

    pub fn with_thickness(mut self, thickness: Real) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Flat train description, in any order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainConfig {
    pub nodes: Vec<TrainNodeConfig>,
}

impl TrainConfig {
    pub fn new(nodes: Vec<TrainNodeConfig>) -> Self {
        Self { nodes }
    }
}

/// A node with its accumulated rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainNode {
    config: TrainNodeConfig,
    parent: Option<usize>,
    rotation: Real,
    last_delta: Real,
}

impl TrainNode {
    pub fn id(&self) -> &PartId {
        &self.config.id
    }

    pub fn config(&self) -> &TrainNodeConfig {
        &self.config
    }

    /// Radians, unbounded.
    pub fn rotation(&self) -> Real {
        self.rotation
    }

    /// Rotation change applied by the most recent propagation.
    pub fn last_delta(&self) -> Real {
        self.last_delta
    }

    /// Factor from the parent's rotation change to this node's.
    pub fn ratio(&self) -> Real {
        if self.parent.is_none() {
            return 1.0;
        }
        -(self.config.driving_teeth as Real) / self.config.driven_teeth as Real
    }
}

/// Validated train, stored root first and parents before children.
#[derive(Debug, Clone, PartialEq)]
pub struct GearTrain {
    nodes: Vec<TrainNode>,
    index: HashMap<PartId, usize>,
}

impl GearTrain {
    /// Check the configuration and fix the walking order.
    pub fn assemble(config: &TrainConfig) -> Result<Self, TrainError> {
        if config.nodes.is_empty() {
            return Err(TrainError::EmptyTrain);
        }

        let mut ids = HashSet::with_capacity(config.nodes.len());
        for node in &config.nodes {
            if !ids.insert(&node.id) {
                return Err(TrainError::DuplicateId(node.id.to_string()));
            }
        }

        let mut root = None;
        let mut children: HashMap<&PartId, Vec<usize>> = HashMap::new();
        for (i, node) in config.nodes.iter().enumerate() {
            match &node.parent {
                None => {
                    if let Some(first) = root {
                        let first: &TrainNodeConfig = &config.nodes[first];
                        return Err(TrainError::MultipleRoots(
                            first.id.to_string(),
                            node.id.to_string(),
                        ));
                    }
                    root = Some(i);
                },
                Some(parent) => {
                    if !ids.contains(parent) {
                        return Err(TrainError::MissingParent {
                            node: node.id.to_string(),
                            parent: parent.to_string(),
                        });
                    }
                    if node.driving_teeth == 0 || node.driven_teeth == 0 {
                        return Err(TrainError::ZeroTeeth(node.id.to_string()));
                    }
                    children.entry(parent).or_default().push(i);
                },
            }
        }
        let root = root.ok_or(TrainError::NoRoot)?;

        // breadth-first from the root; anything unreached sits on a cycle
        let mut order: Vec<(usize, Option<usize>)> = Vec::with_capacity(config.nodes.len());
        let mut queue = VecDeque::from([(root, None)]);
        while let Some((i, parent)) = queue.pop_front() {
            let position = order.len();
            order.push((i, parent));
            if let Some(kids) = children.get(&config.nodes[i].id) {
                queue.extend(kids.iter().map(|&k| (k, Some(position))));
            }
        }
        if order.len() < config.nodes.len() {
            let placed: HashSet<usize> = order.iter().map(|&(i, _)| i).collect();
            let stray = (0..config.nodes.len())
                .find(|i| !placed.contains(i))
                .map_or_else(String::new, |i| config.nodes[i].id.to_string());
            return Err(TrainError::Cycle(stray));
        }

        let nodes: Vec<TrainNode> = order
            .into_iter()
            .map(|(i, parent)| TrainNode {
                config: config.nodes[i].clone(),
                parent,
                rotation: 0.0,
                last_delta: 0.0,
            })
            .collect();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.config.id.clone(), i))
            .collect();

        let train = Self { nodes, index };
        train.warn_mismatched_gears();
        tracing::debug!(
            nodes = train.nodes.len(),
            root = %train.nodes[0].config.id,
            "assembled gear train"
        );
        Ok(train)
    }

    fn warn_mismatched_gears(&self) {
        for node in &self.nodes {
            let Some(parent) = node.parent else { continue };
            let config = &node.config;
            if let Some(wheel) = &config.wheel {
                if wheel.tooth_count() != config.driven_teeth as usize {
                    tracing::warn!(
                        node = %config.id,
                        driven_teeth = config.driven_teeth,
                        wheel_teeth = wheel.tooth_count(),
                        "wheel geometry disagrees with the driven tooth count"
                    );
                }
            }
            if let Some(pinion) = &self.nodes[parent].config.pinion {
                if pinion.tooth_count() != config.driving_teeth as usize {
                    tracing::warn!(
                        node = %config.id,
                        driving_teeth = config.driving_teeth,
                        pinion_teeth = pinion.tooth_count(),
                        "parent pinion geometry disagrees with the driving tooth count"
                    );
                }
            }
        }
    }

    /// Set the root to `root_rotation` and carry the change down the train.
    ///
    /// Each node's delta is taken from its parent's delta of this same call.
    pub fn propagate(&mut self, root_rotation: Real) {
        let root = &mut self.nodes[0];
        root.last_delta = root_rotation - root.rotation;
        root.rotation = root_rotation;
        for i in 1..self.nodes.len() {
            let Some(parent) = self.nodes[i].parent else { continue };
            let delta = self.nodes[parent].last_delta * self.nodes[i].ratio();
            let node = &mut self.nodes[i];
            node.last_delta = delta;
            node.rotation += delta;
        }
    }

    /// Put a node at an absolute rotation without moving any other node.
    pub fn seed(&mut self, id: &PartId, rotation: Real) -> Result<(), TrainError> {
        let &i = self
            .index
            .get(id)
            .ok_or_else(|| TrainError::UnknownNode(id.to_string()))?;
        self.nodes[i].rotation = rotation;
        Ok(())
    }

    pub fn root(&self) -> &TrainNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: &PartId) -> Option<&TrainNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn rotation(&self, id: &PartId) -> Option<Real> {
        self.node(id).map(TrainNode::rotation)
    }

    /// Product of the mesh ratios from the root down to `id`.
    pub fn compound_ratio(&self, id: &PartId) -> Option<Real> {
        let mut i = *self.index.get(id)?;
        let mut ratio = 1.0;
        while let Some(parent) = self.nodes[i].parent {
            ratio *= self.nodes[i].ratio();
            i = parent;
        }
        Some(ratio)
    }

    /// Nodes in walking order, root first.
    pub fn nodes(&self) -> &[TrainNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
