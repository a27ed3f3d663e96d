pub use glam::Vec3 as Point3f;
pub use glam::Vec3 as Vector3f;

/// Maximum refinement level. Coordinates live in `[0, 2^L_MAX)`.
pub const L_MAX: u8 = 21;

/// Axis-aligned bounding box used as the common currency for volume queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeBounds {
    pub min: Point3f,
    pub max: Point3f,
}

impl VolumeBounds {
    #[must_use]
    pub fn new(min: Point3f, max: Point3f) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    #[must_use]
    pub fn extent(&self) -> Vector3f {
        self.max - self.min
    }

    #[must_use]
    pub fn max_extent(&self) -> f32 {
        let e = self.extent();
        e.x.max(e.y).max(e.z)
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        let e = self.extent();
        e.x * e.y * e.z
    }

    #[must_use]
    pub fn center(&self) -> Point3f {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn contains_point(&self, p: Point3f) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

/// A ray with a bounded travel distance, the shape callers hand to
/// `Tet::ray_intersect`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
    pub max_distance: f32,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Point3f, direction: Vector3f, max_distance: f32) -> Self {
        Self {
            origin,
            direction,
            max_distance,
        }
    }

    #[must_use]
    pub fn point_at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }
}

/// Result of a successful ray/tetrahedron intersection.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub distance: f32,
    pub face: u8,
    pub normal: Vector3f,
}

/// Which of a tet's 4 faces a neighbor lookup reports on the neighbor's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceNeighbor<T> {
    pub face: u8,
    pub tet: T,
}

bitflags::bitflags! {
    /// Axes an AABB crosses at a given grid level; drives range-enumeration
    /// iteration shape (§4.8: 0/1/2/3 touched axes means point/line/plane/volume).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TouchedAxes: u8 {
        const X = 0b001;
        const Y = 0b010;
        const Z = 0b100;
    }
}
