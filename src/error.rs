use std::{error, fmt};

/// Errors produced by fallible `Tet`/`Key` construction and navigation.
///
/// Geometric hot paths (containment, ray/AABB tests) never return this type;
/// they treat malformed input as a precondition violation of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TetraError {
    /// Level outside `[0, L_MAX]`.
    LevelOutOfRange(u8),
    /// Type outside `[0, 5]`.
    TypeOutOfRange(u8),
    /// A coordinate was negative before conversion into the unsigned anchor.
    NegativeCoordinate,
    /// A coordinate is `>= 2^L_MAX`.
    CoordinateOutOfBounds,
    /// A coordinate is not aligned to the cell length implied by `level`.
    MisalignedCoordinate,
    /// Level 0 with a non-origin anchor or non-zero type.
    InvalidRootTet,
    /// The stored type does not match the type implied by the coordinate path.
    InconsistentType,
    /// `parent()` called on the root tet.
    NoParent,
    /// `child()` called at `L_MAX`.
    NoChildAtMaxLevel,
    /// Child/morton index outside `[0, 7]`.
    ChildIndexOutOfRange(u8),
    /// Vertex index outside `[0, 3]`.
    VertexIndexOutOfRange(u8),
    /// Two SFC ranges were merged that are neither adjacent nor overlapping.
    RangesNotMergeable,
}

impl fmt::Display for TetraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LevelOutOfRange(level) => write!(f, "level {level} out of range"),
            Self::TypeOutOfRange(kind) => write!(f, "type {kind} out of range"),
            Self::NegativeCoordinate => write!(f, "negative coordinate"),
            Self::CoordinateOutOfBounds => write!(f, "coordinate out of bounds"),
            Self::MisalignedCoordinate => write!(f, "coordinate misaligned to level"),
            Self::InvalidRootTet => write!(f, "root tet must be the origin with type 0"),
            Self::InconsistentType => write!(f, "type inconsistent with coordinate path"),
            Self::NoParent => write!(f, "root tet has no parent"),
            Self::NoChildAtMaxLevel => write!(f, "tet at max level has no children"),
            Self::ChildIndexOutOfRange(idx) => write!(f, "child index {idx} out of range"),
            Self::VertexIndexOutOfRange(idx) => write!(f, "vertex index {idx} out of range"),
            Self::RangesNotMergeable => write!(f, "ranges are not adjacent or overlapping"),
        }
    }
}

impl error::Error for TetraError {}

pub type Result<T> = std::result::Result<T, TetraError>;
