//! Math utilities for camera orientation and gizmo hit testing.

use bevy::math::Ray3d;
use bevy::prelude::*;

/// Threshold for considering vectors as parallel or zero-length.
pub const EPSILON: f32 = 1e-6;

/// Threshold for parallel plane/ray detection.
const PLANE_EPSILON: f32 = 1e-5;

/// Threshold for choosing perpendicular helper vector.
const AXIS_PARALLEL_THRESHOLD: f32 = 0.9;

/// Dot product above which a forward vector counts as parallel to `up`.
const UP_PARALLEL_THRESHOLD: f32 = 0.9999;

/// Canonical camera forward in Bevy (cameras look down -Z).
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// Canonical camera up in camera-local space.
pub const LOCAL_UP: Vec3 = Vec3::Y;

/// Forward vector of an orientation.
pub fn forward_vector(orientation: Quat) -> Vec3 {
    (orientation * FORWARD).normalize_or_zero()
}

/// Pick an up vector usable with `forward`.
///
/// When `forward` runs along `up` (top and bottom views) a helper axis
/// perpendicular to `up` is returned instead, signed so that a view looking
/// down keeps the "back" of the scene at the top of the screen.
pub fn stable_up(forward: Vec3, up: Vec3) -> Vec3 {
    let forward = forward.normalize_or_zero();
    let up = up.normalize_or_zero();
    if up.length_squared() < EPSILON {
        return LOCAL_UP;
    }
    let alignment = forward.dot(up);
    if alignment.abs() < UP_PARALLEL_THRESHOLD {
        return up;
    }

    let helper = if up.abs().dot(Vec3::Z) < AXIS_PARALLEL_THRESHOLD {
        Vec3::Z
    } else {
        Vec3::Y
    };
    if alignment < 0.0 {
        -helper
    } else {
        helper
    }
}

/// Rotation that makes a camera look along `forward` with the given `up`.
///
/// Returns `None` for a zero-length forward vector.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let back = -forward.normalize_or_zero();
    if back.length_squared() < EPSILON {
        return None;
    }
    let up = stable_up(-back, up);
    let right = up.cross(back).normalize_or_zero();
    if right.length_squared() < EPSILON {
        return None;
    }
    let up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize())
}

/// Whether `v` points within `epsilon` radians of one of the six signed axes.
pub fn is_cardinal(v: Vec3, epsilon: f32) -> bool {
    let v = v.normalize_or_zero();
    v.abs().max_element() >= epsilon.cos()
}

/// Whether an orientation is a face-on view of the cube.
///
/// Both the forward and the up vector must sit on a signed axis; any
/// other orientation, including a partial roll, is off-axis.
pub fn is_axis_aligned(orientation: Quat, epsilon: f32) -> bool {
    is_cardinal(orientation * FORWARD, epsilon) && is_cardinal(orientation * LOCAL_UP, epsilon)
}

/// Build a ray through a perspective camera from normalized device coordinates.
///
/// `ndc` is in `[-1, 1]` with +y pointing up.
pub fn ndc_ray(
    ndc: Vec2,
    position: Vec3,
    orientation: Quat,
    fov_y: f32,
    aspect: f32,
) -> Option<Ray3d> {
    let half_height = (fov_y * 0.5).tan();
    let local = Vec3::new(ndc.x * half_height * aspect, ndc.y * half_height, -1.0);
    let direction = Dir3::new(orientation * local).ok()?;
    Some(Ray3d::new(position, direction))
}

/// Solve intersection between a ray and a sphere. Returns distance along the
/// ray if there is an intersection, otherwise `None`.
pub fn ray_sphere_intersection(ray: &Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let m = ray.origin - center;
    let b = m.dot(*ray.direction);
    let c = m.length_squared() - radius * radius;

    // Exit if ray origin is outside sphere (c > 0) and ray is pointing away
    // from sphere (b > 0).
    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discr = b * b - c;
    if discr < 0.0 {
        return None;
    }

    let t = -b - discr.sqrt();
    if t < 0.0 {
        Some(0.0)
    } else {
        Some(t)
    }
}

/// Intersect a ray with a plane. Returns the distance along the ray, if any.
pub fn ray_plane_intersection(ray: &Ray3d, plane_origin: Vec3, plane_normal: Vec3) -> Option<f32> {
    let denom = plane_normal.dot(*ray.direction);
    if denom.abs() < PLANE_EPSILON {
        return None;
    }
    let t = (plane_origin - ray.origin).dot(plane_normal) / denom;
    if t < 0.0 {
        None
    } else {
        Some(t)
    }
}

/// Slab test against an axis-aligned box. Returns the entry distance, or
/// `0.0` when the ray starts inside the box.
pub fn ray_aabb_intersection(ray: &Ray3d, center: Vec3, half_extents: Vec3) -> Option<f32> {
    let min = center - half_extents;
    let max = center + half_extents;
    let dir = *ray.direction;

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let d = dir[axis];
        if d.abs() < EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        None
    } else {
        Some(t_near.max(0.0))
    }
}
