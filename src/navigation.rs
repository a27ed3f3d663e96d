//! Parent/child/sibling/face-neighbor navigation between tets.

use crate::cache::LevelCache;
use crate::connectivity::{self, CONNECTIVITY};
use crate::error::{Result, TetraError};
use crate::tet::{Tet, TetType};
use crate::types::{FaceNeighbor, L_MAX};

impl Tet {
    /// The tet's parent at `level - 1`. Errors at the root.
    pub fn parent(&self, cache: Option<&LevelCache>) -> Result<Tet> {
        if self.level() == 0 {
            return Err(TetraError::NoParent);
        }
        if let Some(cache) = cache {
            if let Some(parent) = cache.get_parent(*self) {
                return Ok(parent);
            }
        }

        let length = self.length();
        let own_cube_id = self.cube_id();
        let parent_kind_raw =
            CONNECTIVITY.cube_id_type_to_parent_type[own_cube_id as usize][self.kind() as u8 as usize];
        let parent_kind = TetType::try_from(parent_kind_raw)
            .expect("connectivity tables only ever store valid types");
        let parent = Tet::new_unchecked(
            self.x() & !length,
            self.y() & !length,
            self.z() & !length,
            self.level() - 1,
            parent_kind,
        );

        if let Some(cache) = cache {
            cache.put_parent(*self, parent);
        }
        Ok(parent)
    }

    /// The `morton_idx`-th (0..8) Bey child of this tet.
    pub fn child(&self, morton_idx: u8) -> Result<Tet> {
        if morton_idx >= 8 {
            return Err(TetraError::ChildIndexOutOfRange(morton_idx));
        }
        if self.level() == L_MAX {
            return Err(TetraError::NoChildAtMaxLevel);
        }
        let parent_kind = self.kind() as u8;
        let bey_id = connectivity::morton_to_bey_id(parent_kind, morton_idx);
        let child_kind_raw =
            CONNECTIVITY.parent_type_local_index_to_type[parent_kind as usize][bey_id as usize];
        let child_cube_id =
            CONNECTIVITY.parent_type_local_index_to_cube_id[parent_kind as usize][bey_id as usize];
        let child_kind = TetType::try_from(child_kind_raw)
            .expect("connectivity tables only ever store valid types");

        let child_length = self.length() / 2;
        let x = self.x() + ((child_cube_id & 1) as u32) * child_length;
        let y = self.y() + (((child_cube_id >> 1) & 1) as u32) * child_length;
        let z = self.z() + (((child_cube_id >> 2) & 1) as u32) * child_length;

        Ok(Tet::new_unchecked(x, y, z, self.level() + 1, child_kind))
    }

    /// The `i`-th sibling of this tet under its own parent. Undefined at root.
    pub fn sibling(&self, i: u8, cache: Option<&LevelCache>) -> Result<Tet> {
        self.parent(cache)?.child(i)
    }

    #[must_use]
    pub fn first_descendant(&self, target_level: u8) -> Tet {
        let mut t = *self;
        while t.level() < target_level {
            t = t.child(0).expect("target_level must be <= L_MAX");
        }
        t
    }

    #[must_use]
    pub fn last_descendant(&self, target_level: u8) -> Tet {
        let mut t = *self;
        while t.level() < target_level {
            t = t.child(7).expect("target_level must be <= L_MAX");
        }
        t
    }

    /// The morton index (0..8) of `self` under its own parent, the inverse
    /// of `parent().child(i) == self`.
    pub fn child_index_under_parent(&self) -> Result<u8> {
        if self.level() == 0 {
            return Err(TetraError::NoParent);
        }
        let own_type = self.kind() as u8;
        let own_cube_id = self.cube_id();
        let local_idx =
            CONNECTIVITY.type_cube_id_to_local_index[own_type as usize][own_cube_id as usize];
        debug_assert_ne!(local_idx, u8::MAX, "unreachable (type, cube_id) pair");
        let parent_kind = self
            .parent(None)?
            .kind() as u8;
        Ok(connectivity::bey_id_to_morton(parent_kind, local_idx))
    }

    /// The neighbor tet across `face` (0..4), or `None` at the positive
    /// octant boundary. Faces 0/3 cross into the adjacent cube, stepping the
    /// anchor by `length` along the axis `connectivity::face_entry` reports
    /// and changing type to match; faces 1/2 are internal to this tet's own
    /// cube and swap to their partner type in place, without moving the
    /// anchor. The neighbor also reports the face it was entered through,
    /// from its own perspective.
    #[must_use]
    pub fn face_neighbor(&self, face: u8) -> Option<FaceNeighbor<Tet>> {
        debug_assert!(face < 4);
        let entry = connectivity::face_entry(self.kind() as u8, face);
        let length = self.length() as i32;

        let mut x = self.x() as i32;
        let mut y = self.y() as i32;
        let mut z = self.z() as i32;

        if let Some(axis) = entry.axis {
            let delta = i32::from(entry.sign) * length;
            let coords = [&mut x, &mut y, &mut z];
            *coords[axis as usize] += delta;
        }

        if x < 0 || y < 0 || z < 0 {
            return None;
        }

        let neighbor_kind = TetType::try_from(entry.neighbor_type).ok()?;
        let neighbor = Tet::new_unchecked(x as u32, y as u32, z as u32, self.level(), neighbor_kind);
        Some(FaceNeighbor {
            face: entry.neighbor_face,
            tet: neighbor,
        })
    }
}
