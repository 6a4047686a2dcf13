//! Validation errors

use crate::float_types::Real;
use nalgebra::Point2;

/// Which flank of a cycloidal tooth a boundary solve belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flank {
    /// Hypocycloid root flank, ends on the dedendum circle
    Inner,
    /// Epicycloid tip flank, ends on the addendum circle
    Outer,
}

impl std::fmt::Display for Flank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flank::Inner => write!(f, "inner (hypocycloid)"),
            Flank::Outer => write!(f, "outer (epicycloid)"),
        }
    }
}

/// All the possible geometry issues we might encounter while building or checking an outline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// (InvalidGeometry) The arc-cosine argument bounding a flank left [-1, 1]
    #[error(
        "(InvalidGeometry) The {flank} flank boundary argument {ratio} is outside [-1, 1]; \
         generating circle and addendum do not mesh"
    )]
    InvalidGeometry { flank: Flank, ratio: Real },
    /// (InvalidParameter) A gear or shape parameter is out of its valid range
    #[error("(InvalidParameter) {0}")]
    InvalidParameter(String),
    /// (RepeatedPoint) Two consecutive coords are identical
    #[error("(RepeatedPoint) Two consecutive coords are identical at: {0}")]
    RepeatedPoint(Point2<Real>),
    /// (SelfIntersection) A ring self-intersects
    #[error("(SelfIntersection) A ring self-intersects at: {0}")]
    SelfIntersection(Point2<Real>),
    /// (TooFewPoints) A ring has fewer than the minimal #points
    #[error("(TooFewPoints) A ring has fewer than the minimal #points at: {0}")]
    TooFewPoints(Point2<Real>),
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point2<Real>),
    /// (RingNotClosed) The ring's first/last points differ
    #[error("(RingNotClosed) The ring's first({first}) and last({last}) points differ")]
    RingNotClosed {
        first: Point2<Real>,
        last: Point2<Real>,
    },
}

/// Static configuration problems found while assembling a gear train
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainError {
    #[error("gear train has no nodes")]
    EmptyTrain,
    #[error("node id `{0}` is used more than once")]
    DuplicateId(String),
    #[error("node `{node}` names parent `{parent}`, which does not exist")]
    MissingParent { node: String, parent: String },
    #[error("gear train has no root node (every node names a parent)")]
    NoRoot,
    #[error("gear train has more than one root: `{0}` and `{1}`")]
    MultipleRoots(String, String),
    #[error("node `{0}` has a zero tooth count")]
    ZeroTeeth(String),
    #[error("node `{0}` is not reachable from the root (parent chain forms a cycle)")]
    Cycle(String),
    #[error("no node with id `{0}`")]
    UnknownNode(String),
    #[error("invalid escapement timing: {0}")]
    InvalidTiming(String),
}

/// Anything that can go wrong while assembling a [`Movement`](crate::movement::Movement)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MovementError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Train(#[from] TrainError),
}
