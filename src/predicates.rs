//! Containment and intersection tests against a tet's geometry.

use crate::tet::Tet;
use crate::types::{Point3f, Ray, RayHit, Vector3f, VolumeBounds};

const EPSILON: f32 = 1e-6;

impl Tet {
    /// Whether `p` lies inside this tet, using the `S0`-`S5` subdivision
    /// vertices and four signed tetrahedron-volume determinants, one per
    /// face, each opposite one vertex. `p` is inside iff, for every face,
    /// `p` and the excluded vertex lie on the same side of that face (their
    /// signed volumes agree in sign). A zero determinant counts as inside,
    /// so faces shared by two adjacent tets are claimed by at least one of
    /// them.
    #[must_use]
    pub fn contains_point(&self, p: Point3f) -> bool {
        let verts = self.vertices_subdivision();

        // Faces are numbered opposite each vertex: face i excludes verts[i].
        for excluded in 0..4 {
            let mut face = [Point3f::ZERO; 3];
            let mut idx = 0;
            for (j, v) in verts.iter().enumerate() {
                if j != excluded {
                    face[idx] = *v;
                    idx += 1;
                }
            }
            let opposite = verts[excluded];
            let signed = signed_volume(face[0], face[1], face[2], opposite);
            let signed_p = signed_volume(face[0], face[1], face[2], p);
            if signed * signed_p < -EPSILON {
                return false;
            }
        }
        true
    }

    /// Ray/tetrahedron intersection via Möller-Trumbore against each of the
    /// four faces; returns the nearest forward hit within `ray.max_distance`.
    #[must_use]
    pub fn ray_intersect(&self, ray: &Ray) -> Option<RayHit> {
        let verts = self.vertices_subdivision();
        let faces: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

        let mut best: Option<RayHit> = None;
        for (face_idx, face) in faces.iter().enumerate() {
            let a = verts[face[0]];
            let b = verts[face[1]];
            let c = verts[face[2]];
            if let Some((t, normal)) = moller_trumbore(ray, a, b, c) {
                if t > EPSILON && t <= ray.max_distance {
                    let better = match best {
                        None => true,
                        Some(h) => t < h.distance,
                    };
                    if better {
                        best = Some(RayHit {
                            distance: t,
                            face: face_idx as u8,
                            normal,
                        });
                    }
                }
            }
        }
        if best.is_none() && self.contains_point(ray.origin) {
            return Some(RayHit {
                distance: 0.0,
                face: 0,
                normal: Vector3f::ZERO,
            });
        }
        best
    }

    /// Whether this tet's geometry intersects `bounds` (conservative:
    /// touching faces are reported as intersecting rather than risking a
    /// false negative).
    #[must_use]
    pub fn aabb_intersect(&self, bounds: &VolumeBounds) -> bool {
        let verts = self.vertices_subdivision();

        let tet_min = Point3f::new(
            verts.iter().map(|v| v.x).fold(f32::MAX, f32::min),
            verts.iter().map(|v| v.y).fold(f32::MAX, f32::min),
            verts.iter().map(|v| v.z).fold(f32::MAX, f32::min),
        );
        let tet_max = Point3f::new(
            verts.iter().map(|v| v.x).fold(f32::MIN, f32::max),
            verts.iter().map(|v| v.y).fold(f32::MIN, f32::max),
            verts.iter().map(|v| v.z).fold(f32::MIN, f32::max),
        );
        if tet_max.x < bounds.min.x
            || tet_min.x > bounds.max.x
            || tet_max.y < bounds.min.y
            || tet_min.y > bounds.max.y
            || tet_max.z < bounds.min.z
            || tet_min.z > bounds.max.z
        {
            return false;
        }

        if verts.iter().any(|v| bounds.contains_point(*v)) {
            return true;
        }
        let corners = aabb_corners(bounds);
        if corners.iter().any(|c| self.contains_point(*c)) {
            return true;
        }
        let edges: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        for (i, j) in edges {
            if segment_intersects_aabb(verts[i], verts[j], bounds) {
                return true;
            }
        }
        true
    }

    /// Whether every vertex of this tet lies inside `bounds`.
    #[must_use]
    pub fn aabb_contains(&self, bounds: &VolumeBounds) -> bool {
        self.vertices_subdivision()
            .iter()
            .all(|v| bounds.contains_point(*v))
    }
}

fn signed_volume(a: Point3f, b: Point3f, c: Point3f, d: Point3f) -> f32 {
    let ad = a - d;
    let bd = b - d;
    let cd = c - d;
    ad.dot(bd.cross(cd))
}

fn moller_trumbore(ray: &Ray, a: Point3f, b: Point3f, c: Point3f) -> Option<(f32, Vector3f)> {
    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = inv_det * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = inv_det * edge2.dot(q);
    Some((t, edge1.cross(edge2).normalize_or_zero()))
}

fn aabb_corners(bounds: &VolumeBounds) -> [Point3f; 8] {
    let min = bounds.min;
    let max = bounds.max;
    [
        Point3f::new(min.x, min.y, min.z),
        Point3f::new(max.x, min.y, min.z),
        Point3f::new(min.x, max.y, min.z),
        Point3f::new(max.x, max.y, min.z),
        Point3f::new(min.x, min.y, max.z),
        Point3f::new(max.x, min.y, max.z),
        Point3f::new(min.x, max.y, max.z),
        Point3f::new(max.x, max.y, max.z),
    ]
}

/// Slab-method segment/AABB test, parameterized `t in [0,1]` along the segment.
fn segment_intersects_aabb(a: Point3f, b: Point3f, bounds: &VolumeBounds) -> bool {
    let direction = b - a;
    let mut t_min = 0.0f32;
    let mut t_max = 1.0f32;

    for axis in 0..3 {
        let (origin, dir, min, max) = match axis {
            0 => (a.x, direction.x, bounds.min.x, bounds.max.x),
            1 => (a.y, direction.y, bounds.min.y, bounds.max.y),
            _ => (a.z, direction.z, bounds.min.z, bounds.max.z),
        };
        if dir.abs() < EPSILON {
            if origin < min || origin > max {
                return false;
            }
            continue;
        }
        let inv_dir = 1.0 / dir;
        let mut t1 = (min - origin) * inv_dir;
        let mut t2 = (max - origin) * inv_dir;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_min > t_max {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tet::TetType;

    #[test]
    fn center_point_is_contained_by_exactly_one_type() {
        let length = 1u32 << (crate::types::L_MAX - 3);
        let h = length as f32;
        let p = Point3f::new(h * 0.25, h * 0.25, h * 0.25);
        let mut hits = 0;
        for kind in 0u8..6 {
            let kind = TetType::try_from(kind).unwrap();
            let t = Tet::new_unchecked(0, 0, 0, 3, kind);
            if t.contains_point(p) {
                hits += 1;
            }
        }
        assert_eq!(hits, 1);
    }

    #[test]
    fn aabb_contains_requires_all_vertices_inside() {
        let length = 1u32 << (crate::types::L_MAX - 1);
        let t = Tet::new_unchecked(0, 0, 0, 1, TetType::S0);
        let full = Point3f::new(length as f32, length as f32, length as f32);
        let tight = VolumeBounds::new(Point3f::ZERO, full * 0.5);
        assert!(!t.aabb_contains(&tight));
        let loose = VolumeBounds::new(Point3f::ZERO, full);
        assert!(t.aabb_contains(&loose));
    }
}
