//! Static Bey-refinement connectivity tables.
//!
//! The six `S0`-`S5` tetrahedra and their 8-way subdivision are defined by
//! fixed vertex-offset geometry (see [`crate::tet`]); the tables below are
//! *derived* from that geometry once, at process start, rather than
//! transcribed from an external reference this crate has no way to check
//! itself against.

use std::sync::LazyLock;

type Vec3i = [i32; 3];

/// `(v1, v2)` offsets at unit length for each of the six tet types; `v0` is
/// always the origin and `v3` is always `(1,1,1)` scaled by the cell length.
const TYPE_PATTERNS: [(Vec3i, Vec3i); 6] = [
    ([1, 0, 0], [1, 1, 0]),
    ([0, 1, 0], [1, 1, 0]),
    ([0, 0, 1], [1, 0, 1]),
    ([0, 0, 1], [0, 1, 1]),
    ([1, 0, 0], [1, 0, 1]),
    ([0, 1, 0], [0, 1, 1]),
];

fn scale(v: Vec3i, h: i32) -> Vec3i {
    [v[0] * h, v[1] * h, v[2] * h]
}

fn sub(a: Vec3i, b: Vec3i) -> Vec3i {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn mid(a: Vec3i, b: Vec3i) -> Vec3i {
    [(a[0] + b[0]) / 2, (a[1] + b[1]) / 2, (a[2] + b[2]) / 2]
}

fn s0s5_vertices(h: i32, kind: u8) -> [Vec3i; 4] {
    let (o1, o2) = TYPE_PATTERNS[kind as usize];
    [[0, 0, 0], scale(o1, h), scale(o2, h), [h, h, h]]
}

fn anchor_of(points: &[Vec3i; 4]) -> Vec3i {
    let mut out = points[0];
    for p in &points[1..] {
        for axis in 0..3 {
            out[axis] = out[axis].min(p[axis]);
        }
    }
    out
}

fn cube_id_of(rel: Vec3i, h: i32) -> u8 {
    let x = (rel[0] / h) as u8;
    let y = (rel[1] / h) as u8;
    let z = (rel[2] / h) as u8;
    (z << 2) | (y << 1) | x
}

fn classify_type(v1_rel: Vec3i, v2_rel: Vec3i, h: i32) -> u8 {
    for (kind, (p1, p2)) in TYPE_PATTERNS.iter().enumerate() {
        if scale(*p1, h) == v1_rel && scale(*p2, h) == v2_rel {
            return kind as u8;
        }
    }
    unreachable!("child vertex shape matched no known tet type")
}

#[derive(Clone, Copy)]
struct ChildInfo {
    cube_id: u8,
    kind: u8,
    bey_vertex: u8,
}

fn classify_child(points: [Vec3i; 4], parent: [Vec3i; 4], h_child: i32) -> ChildInfo {
    let anchor = anchor_of(&points);
    let mut v1_rel = None;
    let mut v2_rel = None;
    for p in &points {
        let rel = sub(*p, anchor);
        match rel.iter().filter(|c| **c != 0).count() {
            0 => {}
            1 => v1_rel = Some(rel),
            2 => v2_rel = Some(rel),
            3 => debug_assert_eq!(rel, [h_child, h_child, h_child]),
            _ => unreachable!(),
        }
    }
    let kind = classify_type(
        v1_rel.expect("exactly one vertex has one nonzero relative coordinate"),
        v2_rel.expect("exactly one vertex has two nonzero relative coordinates"),
        h_child,
    );
    let cube_id = cube_id_of(sub(anchor, parent[0]), h_child);
    let bey_vertex = (0..4)
        .find(|&j| mid(parent[0], parent[j]) == anchor)
        .expect("child anchor must be the midpoint of the parent anchor and some parent vertex")
        as u8;
    ChildInfo {
        cube_id,
        kind,
        bey_vertex,
    }
}

/// The eight Bey children of a parent of the given type, in construction
/// order: four self-similar corner children (indices 0-3, one per parent
/// vertex), then four children carved from the inner octahedron (indices
/// 4-7), split along the `v0v2`-`v1v3` diagonal — the only one of the three
/// possible diagonals whose four pieces are themselves valid `S0`-`S5`
/// simplices.
fn derive_children(parent_kind: u8) -> [ChildInfo; 8] {
    let h = 2;
    let h_child = 1;
    let v = s0s5_vertices(h, parent_kind);

    std::array::from_fn(|local_idx| {
        if local_idx < 4 {
            let i = local_idx;
            let others: Vec<usize> = (0..4).filter(|&j| j != i).collect();
            let points = [
                v[i],
                mid(v[i], v[others[0]]),
                mid(v[i], v[others[1]]),
                mid(v[i], v[others[2]]),
            ];
            classify_child(points, v, h_child)
        } else {
            let k = local_idx - 4;
            let m01 = mid(v[0], v[1]);
            let m02 = mid(v[0], v[2]);
            let m03 = mid(v[0], v[3]);
            let m12 = mid(v[1], v[2]);
            let m13 = mid(v[1], v[3]);
            let m23 = mid(v[2], v[3]);
            let equatorial = [m01, m03, m23, m12];
            let points = [m02, m13, equatorial[k], equatorial[(k + 1) % 4]];
            classify_child(points, v, h_child)
        }
    })
}

pub struct ConnectivityTables {
    pub parent_type_local_index_to_cube_id: [[u8; 8]; 6],
    pub parent_type_local_index_to_type: [[u8; 8]; 6],
    pub bey_id_to_parent_vertex: [[u8; 8]; 6],
    /// Indexed `[child_type][cube_id]`. The pair `(child_type, cube_id)`
    /// determines the local index independent of which parent type produced
    /// it, because `(cube_id, child_type)` already determines the parent
    /// type (see `cube_id_type_to_parent_type`); `cube_id` alone is not
    /// injective within one parent (siblings may share an octant bit
    /// pattern while differing in type).
    pub type_cube_id_to_local_index: [[u8; 8]; 6],
    /// Indexed `[cube_id][child_type]`, the inverse pairing of
    /// `type_cube_id_to_local_index`.
    pub cube_id_type_to_parent_type: [[u8; 6]; 8],
}

fn build_tables() -> ConnectivityTables {
    let mut parent_type_local_index_to_cube_id = [[0u8; 8]; 6];
    let mut parent_type_local_index_to_type = [[0u8; 8]; 6];
    let mut bey_id_to_parent_vertex = [[0u8; 8]; 6];
    let mut type_cube_id_to_local_index = [[u8::MAX; 8]; 6];
    let mut cube_id_type_to_parent_type = [[u8::MAX; 6]; 8];

    for parent_kind in 0u8..6 {
        let children = derive_children(parent_kind);
        for (local_idx, child) in children.iter().enumerate() {
            parent_type_local_index_to_cube_id[parent_kind as usize][local_idx] = child.cube_id;
            parent_type_local_index_to_type[parent_kind as usize][local_idx] = child.kind;
            bey_id_to_parent_vertex[parent_kind as usize][local_idx] = child.bey_vertex;

            let slot = &mut type_cube_id_to_local_index[child.kind as usize][child.cube_id as usize];
            debug_assert_eq!(*slot, u8::MAX, "(type, cube_id) pair is not unique");
            *slot = local_idx as u8;

            let slot = &mut cube_id_type_to_parent_type[child.cube_id as usize][child.kind as usize];
            debug_assert_eq!(*slot, u8::MAX, "(cube_id, type) pair claimed by two parent types");
            *slot = parent_kind;
        }
    }

    ConnectivityTables {
        parent_type_local_index_to_cube_id,
        parent_type_local_index_to_type,
        bey_id_to_parent_vertex,
        type_cube_id_to_local_index,
        cube_id_type_to_parent_type,
    }
}

pub static CONNECTIVITY: LazyLock<ConnectivityTables> = LazyLock::new(build_tables);

/// One face-neighbor transition for a given `(type, face)` pair. `axis` is
/// `None` for the two faces internal to a cube (1, 2), which swap type in
/// place, and `Some(axis)` for the two faces that cross into the adjacent
/// cube (0, 3), which step the anchor by `sign * length` along `axis`
/// without changing type-independent geometry beyond the lookup itself.
#[derive(Clone, Copy)]
pub struct FaceEntry {
    pub axis: Option<u8>,
    pub sign: i8,
    pub neighbor_type: u8,
    pub neighbor_face: u8,
}

/// Derived by matching each type's four `S0`-`S5` faces against every other
/// type's faces: faces 0 and 3 are axis-aligned (all three vertices share one
/// coordinate), so their partner is whichever type's opposite axis-aligned
/// face has the same shape in the other two coordinates; faces 1 and 2 are
/// the two internal diagonal faces, so their partner is whichever other type
/// has the identical vertex set at the same face index. The geometric
/// matching that produced these entries is reproduced in
/// `tests::face_table_matches_vertex_geometry` below, which recomputes the
/// table from `s0s5_vertices` and checks it against the literals.
const FACE_TABLE: [[FaceEntry; 4]; 6] = [
    [
        FaceEntry { axis: Some(0), sign: 1, neighbor_type: 5, neighbor_face: 3 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 1, neighbor_face: 1 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 4, neighbor_face: 2 },
        FaceEntry { axis: Some(2), sign: -1, neighbor_type: 2, neighbor_face: 0 },
    ],
    [
        FaceEntry { axis: Some(1), sign: 1, neighbor_type: 4, neighbor_face: 3 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 0, neighbor_face: 1 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 5, neighbor_face: 2 },
        FaceEntry { axis: Some(2), sign: -1, neighbor_type: 3, neighbor_face: 0 },
    ],
    [
        FaceEntry { axis: Some(2), sign: 1, neighbor_type: 0, neighbor_face: 3 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 4, neighbor_face: 1 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 3, neighbor_face: 2 },
        FaceEntry { axis: Some(1), sign: -1, neighbor_type: 5, neighbor_face: 0 },
    ],
    [
        FaceEntry { axis: Some(2), sign: 1, neighbor_type: 1, neighbor_face: 3 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 5, neighbor_face: 1 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 2, neighbor_face: 2 },
        FaceEntry { axis: Some(0), sign: -1, neighbor_type: 4, neighbor_face: 0 },
    ],
    [
        FaceEntry { axis: Some(0), sign: 1, neighbor_type: 3, neighbor_face: 3 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 2, neighbor_face: 1 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 0, neighbor_face: 2 },
        FaceEntry { axis: Some(1), sign: -1, neighbor_type: 1, neighbor_face: 0 },
    ],
    [
        FaceEntry { axis: Some(1), sign: 1, neighbor_type: 2, neighbor_face: 3 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 3, neighbor_face: 1 },
        FaceEntry { axis: None, sign: 0, neighbor_type: 1, neighbor_face: 2 },
        FaceEntry { axis: Some(0), sign: -1, neighbor_type: 0, neighbor_face: 0 },
    ],
];

#[must_use]
pub fn face_entry(kind: u8, face: u8) -> FaceEntry {
    FACE_TABLE[kind as usize][face as usize]
}

/// `morton_idx` is defined identical to the Bey/SFC local index (see the
/// crate's design notes on the Bey-id/Morton-index open question), so this
/// map and its inverse are both the identity.
#[must_use]
pub fn morton_to_bey_id(_parent_type: u8, morton_idx: u8) -> u8 {
    morton_idx
}

#[must_use]
pub fn bey_id_to_morton(_parent_type: u8, bey_id: u8) -> u8 {
    bey_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_pairs_are_unique_per_parent() {
        for parent_kind in 0u8..6 {
            let children = derive_children(parent_kind);
            for a in 0..8 {
                for b in (a + 1)..8 {
                    assert!(
                        (children[a].cube_id, children[a].kind)
                            != (children[b].cube_id, children[b].kind),
                        "parent type {parent_kind} children {a} and {b} collide"
                    );
                }
            }
        }
    }

    #[test]
    fn cube_id_type_pairs_determine_a_single_parent() {
        let tables = build_tables();
        let used = tables
            .cube_id_type_to_parent_type
            .iter()
            .flatten()
            .filter(|&&parent| parent != u8::MAX)
            .count();
        assert_eq!(used, 48, "every (cube_id, type) slot should be claimed by exactly one parent");
    }

    #[test]
    fn corner_children_preserve_parent_type() {
        for parent_kind in 0u8..6 {
            let children = derive_children(parent_kind);
            for corner in &children[0..4] {
                assert_eq!(corner.kind, parent_kind);
            }
        }
    }

    fn face_vertices(verts: &[Vec3i; 4], face: usize) -> [Vec3i; 3] {
        let mut out = [[0, 0, 0]; 3];
        let mut idx = 0;
        for (j, v) in verts.iter().enumerate() {
            if j != face {
                out[idx] = *v;
                idx += 1;
            }
        }
        out
    }

    fn constant_axis(face_verts: &[Vec3i; 3]) -> Option<(usize, i32)> {
        (0..3).find_map(|axis| {
            let v0 = face_verts[0][axis];
            face_verts
                .iter()
                .all(|v| v[axis] == v0)
                .then_some((axis, v0))
        })
    }

    fn drop_axis(p: Vec3i, axis: usize) -> (i32, i32) {
        let others: Vec<i32> = (0..3).filter(|&a| a != axis).map(|a| p[a]).collect();
        (others[0], others[1])
    }

    fn planar_shape(face_verts: &[Vec3i; 3], axis: usize) -> std::collections::BTreeSet<(i32, i32)> {
        face_verts.iter().map(|&p| drop_axis(p, axis)).collect()
    }

    /// Recomputes the face-neighbor partner of every `(type, face)` pair
    /// directly from `s0s5_vertices`, independent of `FACE_TABLE`, and
    /// checks the literal table against it. This is the derivation that
    /// produced `FACE_TABLE`'s entries by hand; keeping it as a test guards
    /// against a transcription mistake in the literals.
    #[test]
    fn face_table_matches_vertex_geometry() {
        let h = 2;
        let verts: Vec<[Vec3i; 4]> = (0u8..6).map(|k| s0s5_vertices(h, k)).collect();

        for kind in 0u8..6 {
            let fv_self = [
                face_vertices(&verts[kind as usize], 0),
                face_vertices(&verts[kind as usize], 1),
                face_vertices(&verts[kind as usize], 2),
                face_vertices(&verts[kind as usize], 3),
            ];
            for face in 0usize..4 {
                let entry = face_entry(kind, face as u8);
                let fv = fv_self[face];
                if let Some((axis, value)) = constant_axis(&fv) {
                    let opposite_face = if value == 0 { 0usize } else { 3usize };
                    let shape = planar_shape(&fv, axis);
                    let found = (0u8..6).find(|&t| {
                        let other_fv = face_vertices(&verts[t as usize], opposite_face);
                        planar_shape(&other_fv, axis) == shape
                    });
                    assert_eq!(entry.axis, Some(axis as u8), "type {kind} face {face}");
                    assert_eq!(
                        entry.neighbor_type,
                        found.expect("every boundary face has a geometric partner"),
                        "type {kind} face {face}"
                    );
                    assert_eq!(entry.neighbor_face, opposite_face as u8, "type {kind} face {face}");
                } else {
                    let shape: std::collections::BTreeSet<Vec3i> = fv.iter().copied().collect();
                    let found = (0u8..6).find(|&t| {
                        t != kind && {
                            let other_fv = face_vertices(&verts[t as usize], face);
                            let other_shape: std::collections::BTreeSet<Vec3i> =
                                other_fv.iter().copied().collect();
                            other_shape == shape
                        }
                    });
                    assert_eq!(entry.axis, None, "type {kind} face {face}");
                    assert_eq!(
                        entry.neighbor_type,
                        found.expect("every internal face has a geometric partner"),
                        "type {kind} face {face}"
                    );
                    assert_eq!(entry.neighbor_face, face as u8, "type {kind} face {face}");
                }
            }
        }
    }

    #[test]
    fn face_entries_are_involutive() {
        for kind in 0u8..6 {
            for face in 0u8..4 {
                let entry = face_entry(kind, face);
                let back = face_entry(entry.neighbor_type, entry.neighbor_face);
                assert_eq!(back.neighbor_type, kind, "type {kind} face {face} does not reciprocate");
                assert_eq!(back.neighbor_face, face);
                assert_eq!(back.sign, -entry.sign);
                assert_eq!(back.axis, entry.axis);
            }
        }
    }
}
