use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::connectivity::CONNECTIVITY;
use crate::error::{Result, TetraError};
use crate::types::{L_MAX, Point3f};

/// One of the six tetrahedra tiling a unit cube under the Kuhn/Freudenthal
/// triangulation. Types 1, 3 and 4 are mirrored relative to 0, 2 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TetType {
    S0 = 0,
    S1 = 1,
    S2 = 2,
    S3 = 3,
    S4 = 4,
    S5 = 5,
}

impl TetType {
    #[must_use]
    pub fn is_mirrored(self) -> bool {
        matches!(self, TetType::S1 | TetType::S3 | TetType::S4)
    }

    fn from_u8(v: u8) -> Result<Self> {
        TetType::try_from(v).map_err(|_| TetraError::TypeOutOfRange(v))
    }
}

/// One tetrahedron in the refinement: an anchor vertex, a refinement level,
/// and a type selecting which of the six `S0`-`S5` simplices occupies the
/// grid cell at `anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tet {
    x: u32,
    y: u32,
    z: u32,
    level: u8,
    kind: TetType,
}

impl Tet {
    /// Build a `Tet` without checking any invariant. Callers must already
    /// know the coordinates are aligned, in range, and consistent with the
    /// path from the root; violating that is a logic error, not a recoverable
    /// one, and the hot-path navigation code relies on it holding.
    #[must_use]
    pub fn new_unchecked(x: u32, y: u32, z: u32, level: u8, kind: TetType) -> Self {
        Self {
            x,
            y,
            z,
            level,
            kind,
        }
    }

    /// Build a `Tet` from coordinates that may come from external,
    /// possibly-negative arithmetic (e.g. a ray march or a neighbor offset),
    /// rejecting negative components before delegating to [`Self::new_validated`].
    pub fn new_validated_signed(x: i64, y: i64, z: i64, level: u8, kind_raw: u8) -> Result<Self> {
        if x < 0 || y < 0 || z < 0 {
            return Err(TetraError::NegativeCoordinate);
        }
        let bound = 1i64 << L_MAX;
        if x >= bound || y >= bound || z >= bound {
            return Err(TetraError::CoordinateOutOfBounds);
        }
        Self::new_validated(x as u32, y as u32, z as u32, level, kind_raw)
    }

    /// Build a `Tet`, rejecting any input that violates the data model's
    /// invariants (range, alignment, root shape, or type/path consistency).
    pub fn new_validated(x: u32, y: u32, z: u32, level: u8, kind_raw: u8) -> Result<Self> {
        if level > L_MAX {
            return Err(TetraError::LevelOutOfRange(level));
        }
        let kind = TetType::from_u8(kind_raw)?;
        let bound = 1u32 << L_MAX;
        if x >= bound || y >= bound || z >= bound {
            return Err(TetraError::CoordinateOutOfBounds);
        }
        let length = 1u32 << (L_MAX - level);
        if x % length != 0 || y % length != 0 || z % length != 0 {
            return Err(TetraError::MisalignedCoordinate);
        }
        if level == 0 {
            if x != 0 || y != 0 || z != 0 || kind != TetType::S0 {
                return Err(TetraError::InvalidRootTet);
            }
            return Ok(Self::new_unchecked(0, 0, 0, 0, TetType::S0));
        }

        let candidate = Self::new_unchecked(x, y, z, level, kind);
        if candidate.compute_type(level, None) != kind {
            return Err(TetraError::InconsistentType);
        }
        Ok(candidate)
    }

    #[must_use]
    pub fn x(&self) -> u32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> u32 {
        self.y
    }

    #[must_use]
    pub fn z(&self) -> u32 {
        self.z
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn kind(&self) -> TetType {
        self.kind
    }

    /// Edge length of this tet's bounding cube, in integer grid units.
    #[must_use]
    pub fn length(&self) -> u32 {
        1u32 << (L_MAX - self.level)
    }

    /// 3-bit octant selector of this tet's anchor within its parent's cube.
    #[must_use]
    pub fn cube_id(&self) -> u8 {
        self.cube_id_at(self.level)
    }

    /// Cube-id of the ancestor anchor at `level`, i.e. which of the 8
    /// sub-cubes of the level-`level - 1` cell this tet's anchor falls in.
    #[must_use]
    pub fn cube_id_at(&self, level: u8) -> u8 {
        if level == 0 {
            return 0;
        }
        let shift = L_MAX - level;
        let x_bit = (self.x >> shift) & 1;
        let y_bit = (self.y >> shift) & 1;
        let z_bit = (self.z >> shift) & 1;
        ((z_bit << 2) | (y_bit << 1) | x_bit) as u8
    }

    /// Type of the ancestor at `target_level` (`<= self.level`), found by
    /// walking the cube-id/type chain back up from `self.level`.
    #[must_use]
    pub fn compute_type(&self, target_level: u8, cache: Option<&crate::cache::LevelCache>) -> TetType {
        debug_assert!(target_level <= self.level);
        if let Some(cache) = cache {
            if let Some(cached) = cache.get_ancestor_type(*self, target_level) {
                return cached;
            }
        }
        let mut kind = self.kind;
        let mut level = self.level;
        while level > target_level {
            let cube_id = self.cube_id_at(level);
            kind = TetType::try_from(
                CONNECTIVITY.cube_id_type_to_parent_type[cube_id as usize][kind as u8 as usize],
            )
            .expect("connectivity tables only ever store valid types");
            level -= 1;
        }
        if let Some(cache) = cache {
            cache.put_ancestor_type(*self, target_level, kind);
        }
        kind
    }

    /// The four vertices of this tet under the canonical (t8code) vertex
    /// convention, used for geometric reporting.
    #[must_use]
    pub fn vertices_canonical(&self) -> [Point3f; 4] {
        let h = self.length() as f32;
        let anchor = Point3f::new(self.x as f32, self.y as f32, self.z as f32);
        let kind = self.kind as u8;
        let ei = (kind / 2) as usize;
        let ej = if kind % 2 == 0 {
            (ei + 2) % 3
        } else {
            (ei + 1) % 3
        };
        let axis = |a: usize, amount: f32| -> Point3f {
            let mut v = [0.0f32; 3];
            v[a] = amount;
            Point3f::new(v[0], v[1], v[2])
        };

        let v0 = anchor;
        let v1 = anchor + axis(ei, h);
        let v2 = v1 + axis(ej, h);
        let other1 = (ei + 1) % 3;
        let other2 = (ei + 2) % 3;
        let v3 = anchor + axis(other1, h) + axis(other2, h);
        [v0, v1, v2, v3]
    }

    /// The four vertices of this tet under the `S0`-`S5` subdivision
    /// convention, used for containment and navigation.
    #[must_use]
    pub fn vertices_subdivision(&self) -> [Point3f; 4] {
        let h = self.length() as f32;
        let anchor = Point3f::new(self.x as f32, self.y as f32, self.z as f32);
        let (o1, o2) = s0s5_offsets(self.kind);
        let v0 = anchor;
        let v1 = anchor + Point3f::new(o1[0] as f32, o1[1] as f32, o1[2] as f32) * h;
        let v2 = anchor + Point3f::new(o2[0] as f32, o2[1] as f32, o2[2] as f32) * h;
        let v3 = anchor + Point3f::new(h, h, h);
        [v0, v1, v2, v3]
    }

    /// The `i`-th (0..4) `S0`-`S5` subdivision vertex, individually.
    pub fn vertex(&self, i: u8) -> Result<Point3f> {
        self.vertices_subdivision()
            .get(i as usize)
            .copied()
            .ok_or(TetraError::VertexIndexOutOfRange(i))
    }
}

pub(crate) fn s0s5_offsets(kind: TetType) -> ([i32; 3], [i32; 3]) {
    match kind {
        TetType::S0 => ([1, 0, 0], [1, 1, 0]),
        TetType::S1 => ([0, 1, 0], [1, 1, 0]),
        TetType::S2 => ([0, 0, 1], [1, 0, 1]),
        TetType::S3 => ([0, 0, 1], [0, 1, 1]),
        TetType::S4 => ([1, 0, 0], [1, 0, 1]),
        TetType::S5 => ([0, 1, 0], [0, 1, 1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_origin_type_zero() {
        let root = Tet::new_validated(0, 0, 0, 0, 0).unwrap();
        assert_eq!(root.level(), 0);
        assert_eq!(root.kind(), TetType::S0);
    }

    #[test]
    fn root_rejects_nonorigin() {
        assert!(Tet::new_validated(1, 0, 0, 0, 0).is_err());
    }

    #[test]
    fn misaligned_coordinate_is_rejected() {
        let length_at_1 = 1u32 << (L_MAX - 1);
        assert!(Tet::new_validated(length_at_1 / 2, 0, 0, 1, 0).is_err());
    }

    #[test]
    fn negative_signed_coordinate_is_rejected() {
        assert!(matches!(
            Tet::new_validated_signed(-1, 0, 0, 1, 0),
            Err(TetraError::NegativeCoordinate)
        ));
    }

    #[test]
    fn vertex_index_out_of_range_is_rejected() {
        let root = Tet::new_unchecked(0, 0, 0, 0, TetType::S0);
        assert!(root.vertex(0).is_ok());
        assert!(matches!(
            root.vertex(4),
            Err(TetraError::VertexIndexOutOfRange(4))
        ));
    }

    #[test]
    fn cube_id_extracts_expected_bits() {
        let length_at_1 = 1u32 << (L_MAX - 1);
        let t = Tet::new_unchecked(length_at_1, 0, 0, 1, TetType::S0);
        assert_eq!(t.cube_id(), 1);
    }

    #[test]
    fn canonical_root_vertices_match_axis_order() {
        let root = Tet::new_unchecked(0, 0, 0, 0, TetType::S0);
        let verts = root.vertices_canonical();
        let full = (1u32 << L_MAX) as f32;
        assert_eq!(verts[0], Point3f::new(0.0, 0.0, 0.0));
        assert_eq!(verts[1], Point3f::new(full, 0.0, 0.0));
        assert_eq!(verts[2], Point3f::new(full, full, 0.0));
        assert_eq!(verts[3], Point3f::new(full, full, full));
    }
}
