//! Visibility oracle seam.
//!
//! The baker only asks "is anything in the way?". Any acceleration
//! structure can sit behind [`Raycaster`]; [`TriangleRaycaster`] is a
//! straightforward per-triangle reference implementation.

use crate::geom::Geometry;
use crate::util::Vec3;

/// Occlusion query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
    /// Hits at or beyond this distance are ignored.
    pub max_distance: f32,
}

impl Ray {
    /// Ray with no distance limit.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            max_distance: f32::INFINITY,
        }
    }

    /// Ray limited to `max_distance`.
    pub fn bounded(origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            origin,
            direction,
            max_distance,
        }
    }
}

/// Answers occlusion queries against the static scene.
///
/// Shared across worker threads during a bake, hence `Sync`. Closures
/// (boxed or not) implement it directly; pass shared oracles as `&*arc`.
pub trait Raycaster: Sync {
    /// `true` if the ray hits anything in `(0, ray.max_distance)`.
    fn raycast(&self, ray: &Ray) -> bool;
}

impl<F> Raycaster for F
where
    F: Fn(&Ray) -> bool + Sync,
{
    fn raycast(&self, ray: &Ray) -> bool {
        self(ray)
    }
}

/// Empty scene: nothing ever occludes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOcclusion;

impl Raycaster for NoOcclusion {
    fn raycast(&self, _ray: &Ray) -> bool {
        false
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Grow to include a point.
    #[inline]
    pub fn grow_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Slab test. Returns whether the ray overlaps the box within `(0, t_max)`.
    #[inline]
    pub fn intersects(&self, ray: &Ray, t_max: f32) -> bool {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let near = t0.min(t1).max_element().max(0.0);
        let far = t0.max(t1).min_element().min(t_max);
        near <= far
    }
}

/// Triangle prepared for intersection.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    v0: Vec3,
    e1: Vec3,
    e2: Vec3,
}

impl Triangle {
    fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            v0,
            e1: v1 - v0,
            e2: v2 - v0,
        }
    }

    /// Möller–Trumbore, double-sided. Returns the hit distance.
    #[inline]
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        const EPS: f32 = 1e-8;
        let p = ray.direction.cross(self.e2);
        let det = self.e1.dot(p);
        if det.abs() < EPS {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = ray.origin - self.v0;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(self.e1);
        let v = ray.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = self.e2.dot(q) * inv_det;
        (t > EPS).then_some(t)
    }
}

/// Tests every triangle of the scene, after a whole-scene bounds check.
///
/// Cost is linear in triangle count per ray; fine for tests and small
/// scenes, too slow for production content.
#[derive(Debug, Clone)]
pub struct TriangleRaycaster {
    triangles: Vec<Triangle>,
    bounds: Aabb,
}

impl TriangleRaycaster {
    /// Build from all subsets of a geometry (materials are irrelevant to
    /// visibility). Out-of-range indices are skipped.
    pub fn from_geometry(geometry: &Geometry) -> Self {
        let mesh = &geometry.mesh;
        let positions = mesh.vertices();
        let mut bounds = Aabb::EMPTY;
        let mut triangles = Vec::with_capacity(mesh.num_triangles());

        for subset in 0..mesh.num_subsets() {
            for [a, b, c] in mesh.triangles(subset) {
                let (Some(&v0), Some(&v1), Some(&v2)) = (
                    positions.get(a as usize),
                    positions.get(b as usize),
                    positions.get(c as usize),
                ) else {
                    continue;
                };
                bounds.grow_point(v0);
                bounds.grow_point(v1);
                bounds.grow_point(v2);
                triangles.push(Triangle::new(v0, v1, v2));
            }
        }

        tracing::debug!(triangles = triangles.len(), "built triangle raycaster");
        Self { triangles, bounds }
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }
}

impl Raycaster for TriangleRaycaster {
    fn raycast(&self, ray: &Ray) -> bool {
        if self.triangles.is_empty() || !self.bounds.intersects(ray, ray.max_distance) {
            return false;
        }
        self.triangles
            .iter()
            .any(|tri| matches!(tri.intersect(ray), Some(t) if t < ray.max_distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Mesh;

    fn floor_geometry() -> Geometry {
        // 2x2 quad at y = 0, centered on the origin
        let mut mesh = Mesh::new(vec![
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ]);
        mesh.add_subset(vec![0, 1, 2, 0, 2, 3]);
        Geometry::new(mesh, Vec::new())
    }

    #[test]
    fn test_hit_and_miss() {
        let rc = TriangleRaycaster::from_geometry(&floor_geometry());
        assert_eq!(rc.num_triangles(), 2);
        assert!(rc.raycast(&Ray::new(Vec3::new(0.2, 1.0, 0.3), Vec3::NEG_Y)));
        assert!(!rc.raycast(&Ray::new(Vec3::new(0.2, 1.0, 0.3), Vec3::Y)));
        assert!(!rc.raycast(&Ray::new(Vec3::new(3.0, 1.0, 0.0), Vec3::NEG_Y)));
    }

    #[test]
    fn test_max_distance_stops_short() {
        let rc = TriangleRaycaster::from_geometry(&floor_geometry());
        let origin = Vec3::new(0.0, 1.0, 0.0);
        assert!(!rc.raycast(&Ray::bounded(origin, Vec3::NEG_Y, 0.9)));
        assert!(rc.raycast(&Ray::bounded(origin, Vec3::NEG_Y, 1.1)));
    }

    fn query<R: Raycaster + ?Sized>(raycaster: &R) -> bool {
        raycaster.raycast(&Ray::new(Vec3::ZERO, Vec3::X))
    }

    #[test]
    fn test_closure_boxed_and_shared_raycasters() {
        assert!(query(&|_: &Ray| true));
        let boxed: Box<dyn Fn(&Ray) -> bool + Sync> = Box::new(|ray: &Ray| ray.direction.x > 0.0);
        assert!(query(&boxed));
        let shared: std::sync::Arc<dyn Raycaster + Send> = std::sync::Arc::new(NoOcclusion);
        assert!(!query(&*shared));
    }

    #[test]
    fn test_aabb_slab() {
        let mut b = Aabb::EMPTY;
        b.grow_point(Vec3::splat(-1.0));
        b.grow_point(Vec3::splat(1.0));
        assert!(b.intersects(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), f32::INFINITY));
        assert!(!b.intersects(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), 3.0));
        assert!(!b.intersects(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z), f32::INFINITY));
    }
}
