//! Bounding volumes used for collision tests.
//!
//! Entities carry a [`Collider`] that is either an axis-aligned box or a
//! sphere. Both answer the same intersection question through their
//! enclosing sphere, so callers never need to look at the variant:
//!
//! - a box collider derives its enclosing sphere once, when it is built
//! - after load, colliders are only ever translated, never rebuilt
//!
//! Two volumes intersect when the distance between the sphere centres is at
//! most the sum of the radii.

use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two corners, normalizing them to proper min/max.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box of the given size centered on `center`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow the box so it contains `point`.
    pub fn expand_to(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// The eight corners, used when transforming a box into another space.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Sphere centered on the box with radius equal to half its diagonal.
    pub fn bounding_sphere(&self) -> Sphere {
        Sphere::new(self.center(), self.size().length() * 0.5)
    }

    pub fn translated(&self, delta: Vec3) -> Aabb {
        Aabb {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

/// Bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere-sphere test. Touching spheres count as intersecting.
    pub fn intersects(&self, other: &Sphere) -> bool {
        let radius_sum = self.radius + other.radius;
        self.center.distance_squared(other.center) <= radius_sum * radius_sum
    }

    /// Copy of this sphere with the radius scaled by `factor`.
    pub fn shrunk(&self, factor: f32) -> Sphere {
        Sphere::new(self.center, self.radius * factor)
    }

    pub fn translated(&self, delta: Vec3) -> Sphere {
        Sphere::new(self.center + delta, self.radius)
    }
}

/// Collision volume attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// Box collider together with the sphere that encloses it.
    Box { bounds: Aabb, sphere: Sphere },
    Sphere(Sphere),
}

impl Collider {
    /// Box collider; the enclosing sphere is derived here and kept.
    pub fn from_box(bounds: Aabb) -> Self {
        Collider::Box {
            bounds,
            sphere: bounds.bounding_sphere(),
        }
    }

    pub fn from_sphere(sphere: Sphere) -> Self {
        Collider::Sphere(sphere)
    }

    /// The sphere used for every intersection test.
    pub fn bounding_sphere(&self) -> Sphere {
        match self {
            Collider::Box { sphere, .. } => *sphere,
            Collider::Sphere(sphere) => *sphere,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.bounding_sphere().center
    }

    pub fn intersects(&self, other: &Collider) -> bool {
        self.intersects_sphere(&other.bounding_sphere())
    }

    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        self.bounding_sphere().intersects(sphere)
    }

    /// Move the collider by `delta` without re-deriving it from geometry.
    pub fn translate(&mut self, delta: Vec3) {
        match self {
            Collider::Box { bounds, sphere } => {
                *bounds = bounds.translated(delta);
                *sphere = sphere.translated(delta);
            }
            Collider::Sphere(sphere) => *sphere = sphere.translated(delta),
        }
    }

    /// Copy of the collider moved by `delta`.
    pub fn translated(&self, delta: Vec3) -> Collider {
        let mut moved = *self;
        moved.translate(delta);
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn aabb_normalizes_corners() {
        let b = Aabb::new(Vec3::new(1.0, -1.0, 2.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn unit_box_sphere_has_half_diagonal_radius() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let s = b.bounding_sphere();
        assert_eq!(s.center, Vec3::ZERO);
        assert!(approx_eq(s.radius, 3.0_f32.sqrt() * 0.5));
    }

    #[test]
    fn spheres_touching_intersect() {
        let a = Sphere::new(Vec3::ZERO, 1.0);
        let b = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(a.intersects(&b));
        let c = Sphere::new(Vec3::new(2.001, 0.0, 0.0), 1.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn intersection_is_symmetric_across_variants() {
        let colliders = [
            Collider::from_box(Aabb::from_center_size(Vec3::ZERO, Vec3::ONE)),
            Collider::from_sphere(Sphere::new(Vec3::new(1.2, 0.3, 0.0), 0.4)),
            Collider::from_sphere(Sphere::new(Vec3::new(5.0, 5.0, 0.0), 0.1)),
            Collider::from_box(Aabb::new(Vec3::new(0.5, 0.5, 0.0), Vec3::new(2.0, 1.0, 1.0))),
        ];
        for a in &colliders {
            for b in &colliders {
                assert_eq!(a.intersects(b), b.intersects(a));
            }
        }
    }

    #[test]
    fn translate_moves_box_and_sphere_together() {
        let mut c = Collider::from_box(Aabb::from_center_size(Vec3::ZERO, Vec3::ONE));
        c.translate(Vec3::new(2.0, 0.0, 0.0));
        match c {
            Collider::Box { bounds, sphere } => {
                assert_eq!(bounds.center(), Vec3::new(2.0, 0.0, 0.0));
                assert_eq!(sphere.center, Vec3::new(2.0, 0.0, 0.0));
            }
            Collider::Sphere(_) => panic!("Expected Box variant"),
        }
    }

    #[test]
    fn shrunk_keeps_center() {
        let s = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 2.0).shrunk(0.75);
        assert_eq!(s.center, Vec3::new(1.0, 2.0, 3.0));
        assert!(approx_eq(s.radius, 1.5));
    }
}
