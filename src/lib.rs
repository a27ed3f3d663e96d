//! Hierarchical tetrahedral space-filling-curve index over the positive octant.
//!
//! Every cell of the index is one of six Kuhn/Freudenthal tetrahedra tiling
//! a cube, recursively subdivided by Bey's 8-way refinement. A tet's
//! position is addressed two ways: as a [`Tet`] value (anchor, level, type)
//! or as its [`Key`] (a 128-bit key interleaving coordinate bits with type
//! bits, one 6-bit group per level). The two are freely interconvertible
//! via `Tet::tm_index` and `Tet::from_key`.

mod cache;
mod codec;
mod connectivity;
mod error;
mod key;
mod navigation;
mod predicates;
mod range;
mod tet;
mod types;
mod validate;

pub use cache::LevelCache;
pub use error::{Result, TetraError};
pub use key::{Key, SfcRange};
pub use range::{
    EXTENT_ADAPTIVE_THRESHOLD, VOLUME_ADAPTIVE_THRESHOLD, VOLUME_HIERARCHICAL_SPLIT_THRESHOLD,
    bounded_by, bounding, enclosing, enclosing_bounds, intersecting, ranges_bounded_by,
    ranges_bounding,
};
pub use tet::{Tet, TetType};
pub use types::{FaceNeighbor, L_MAX, Point3f, Ray, RayHit, TouchedAxes, Vector3f, VolumeBounds};
pub use validate::{ValidationFinding, ValidationReport, Validator, is_family};
