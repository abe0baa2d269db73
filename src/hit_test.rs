//! Ray casting against the gizmo parts and hover highlighting.

use bevy::math::Ray3d;
use bevy::prelude::*;

use crate::arrows::RotationArrowRig;
use crate::cube::{GizmoParts, ARROW_RADIUS, ARROW_THICKNESS, WIREFRAME_NAME};
use crate::math::{
    ndc_ray, ray_aabb_intersection, ray_plane_intersection, ray_sphere_intersection,
};
use crate::types::{CameraState, GizmoPart, PartId, PartShape};

/// Part names that never become the hover target.
pub const EXCLUDED_PART_NAMES: [&str; 2] = [WIREFRAME_NAME, ""];

const GIZMO_BOUNDS_RADIUS: f32 = ARROW_RADIUS + ARROW_THICKNESS;

/// Projection parameters of the gizmo camera.
#[derive(Debug, Clone, Copy)]
pub struct GizmoLens {
    pub fov_y: f32,
    pub aspect: f32,
}

/// Ray through the gizmo camera at a pointer position in NDC.
pub fn pointer_ray(ndc: Vec2, camera: &CameraState, lens: &GizmoLens) -> Option<Ray3d> {
    ndc_ray(ndc, camera.position, camera.orientation, lens.fov_y, lens.aspect)
}

pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_PART_NAMES.contains(&name)
}

/// Distance along `ray` to `part`, if it is hit.
pub fn intersect_part(ray: &Ray3d, part: &GizmoPart, rig: &RotationArrowRig) -> Option<f32> {
    match part.shape {
        PartShape::Box {
            center,
            half_extents,
        } => ray_aabb_intersection(ray, center, half_extents),
        PartShape::Arc {
            radius,
            thickness,
            start,
            end,
        } => {
            let normal = rig.rotation * Vec3::Z;
            let t = ray_plane_intersection(ray, Vec3::ZERO, normal)?;
            let local = rig.rotation.inverse() * ray.get_point(t);
            let r = local.truncate().length();
            if (r - radius).abs() > thickness {
                return None;
            }
            let angle = local.x.atan2(local.y);
            let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
            (lo..=hi).contains(&angle).then_some(t)
        }
    }
}

/// Every visible part hit by `ray`, nearest first.
pub fn cast_ray(ray: &Ray3d, parts: &GizmoParts) -> Vec<(PartId, f32)> {
    // Coarse bounds test: nothing of the gizmo reaches past the arrow ring.
    if ray_sphere_intersection(ray, Vec3::ZERO, GIZMO_BOUNDS_RADIUS).is_none() {
        return Vec::new();
    }
    let mut hits: Vec<_> = parts
        .iter()
        .filter(|part| parts.is_visible(part))
        .filter_map(|part| intersect_part(ray, part, &parts.arrows).map(|t| (part.id, t)))
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits
}

/// Outcome of a hover ray cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverHit {
    /// Nearest part that can be hovered.
    pub nearest: Option<PartId>,
    /// Whether the ray touched the gizmo at all, decorations included.
    pub any: bool,
}

pub fn cast_hover(ray: &Ray3d, parts: &GizmoParts) -> HoverHit {
    let hits = cast_ray(ray, parts);
    let nearest = hits.iter().find_map(|(id, _)| {
        parts
            .get(*id)
            .filter(|part| !is_excluded(&part.name))
            .map(|part| part.id)
    });
    HoverHit {
        nearest,
        any: !hits.is_empty(),
    }
}

/// Color storage the highlight manager works against.
pub trait PartColors {
    /// Current color of a highlightable part. `None` for unknown or
    /// non-highlightable ids.
    fn part_color(&self, id: PartId) -> Option<Color>;
    /// Returns `false` when the id is stale.
    fn set_part_color(&mut self, id: PartId, color: Color) -> bool;
}

/// The highlighted part and the color it had before.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoverState {
    pub hovered: Option<PartId>,
    pub saved_color: Option<Color>,
}

/// Keeps at most one part highlighted.
#[derive(Debug, Clone, Default)]
pub struct HighlightManager {
    state: HoverState,
}

impl HighlightManager {
    pub fn hovered(&self) -> Option<PartId> {
        self.state.hovered
    }

    /// Move the highlight to `part`, restoring the previous part first.
    pub fn apply<C: PartColors + ?Sized>(&mut self, part: Option<PartId>, colors: &mut C, highlight: Color) {
        if self.state.hovered == part {
            return;
        }
        self.restore(colors);

        let Some(id) = part else {
            return;
        };
        let Some(original) = colors.part_color(id) else {
            return;
        };
        if colors.set_part_color(id, highlight) {
            self.state = HoverState {
                hovered: Some(id),
                saved_color: Some(original),
            };
        }
    }

    /// Restore the highlighted part and forget it.
    pub fn clear<C: PartColors + ?Sized>(&mut self, colors: &mut C) {
        self.restore(colors);
    }

    fn restore<C: PartColors + ?Sized>(&mut self, colors: &mut C) {
        let previous = std::mem::take(&mut self.state);
        if let (Some(id), Some(color)) = (previous.hovered, previous.saved_color) {
            if !colors.set_part_color(id, color) {
                debug!(?id, "highlighted gizmo part no longer exists");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InitialFace, ViewGizmoStyle, GIZMO_DISTANCE};

    const HIGHLIGHT: Color = Color::srgb(1.0, 0.0, 0.0);

    fn parts() -> GizmoParts {
        GizmoParts::new(&ViewGizmoStyle::default())
    }

    fn front_camera() -> CameraState {
        InitialFace::Front.camera_state(GIZMO_DISTANCE, Vec3::Y)
    }

    fn lens() -> GizmoLens {
        GizmoLens {
            fov_y: 30f32.to_radians(),
            aspect: 1.0,
        }
    }

    fn name_of(parts: &GizmoParts, id: Option<PartId>) -> Option<&str> {
        id.and_then(|id| parts.get(id)).map(|p| p.name.as_str())
    }

    #[test]
    fn center_ray_hovers_front_face() {
        let parts = parts();
        let ray = pointer_ray(Vec2::ZERO, &front_camera(), &lens()).expect("ray");
        let hit = cast_hover(&ray, &parts);
        assert!(hit.any);
        assert_eq!(name_of(&parts, hit.nearest), Some("Face FRONT"));
    }

    #[test]
    fn corner_of_viewport_misses_everything() {
        let parts = parts();
        let ray = pointer_ray(Vec2::new(0.95, -0.95), &front_camera(), &lens()).expect("ray");
        assert_eq!(cast_hover(&ray, &parts), HoverHit::default());
    }

    #[test]
    fn wireframe_alone_is_not_hoverable() {
        let parts = parts();
        let ray = pointer_ray(Vec2::ZERO, &front_camera(), &lens()).expect("ray");
        let hits = cast_ray(&ray, &parts);
        let wireframe = parts.find(WIREFRAME_NAME).expect("wireframe").id;
        assert!(hits.iter().any(|h| h.0 == wireframe), "shell box is hit");
        let hover = cast_hover(&ray, &parts);
        assert!(hover.nearest.is_some());
        assert_ne!(hover.nearest, Some(wireframe));
    }

    #[test]
    fn arrows_hit_only_when_visible() {
        let mut parts = parts();
        let camera = front_camera();
        // Aim at the middle of the right arrow, in the view plane through the origin.
        let angle = 0.4f32;
        let target = Vec3::new(angle.sin(), angle.cos(), 0.0) * crate::cube::ARROW_RADIUS;
        let ray = Ray3d::new(camera.position, Dir3::new(target - camera.position).expect("dir"));

        assert_eq!(cast_hover(&ray, &parts).nearest, None);
        parts.arrows.visible = true;
        let hit = cast_hover(&ray, &parts);
        assert_eq!(name_of(&parts, hit.nearest), Some("Arrow RIGHT"));
    }

    #[test]
    fn highlight_is_exclusive_and_restores() {
        let mut parts = parts();
        let a = parts.find("Face FRONT").expect("a").id;
        let b = parts.find("Face TOP").expect("b").id;
        let a_color = parts.get(a).expect("a").color;
        let b_color = parts.get(b).expect("b").color;
        let mut manager = HighlightManager::default();

        manager.apply(Some(a), &mut parts, HIGHLIGHT);
        assert_eq!(parts.get(a).expect("a").color, HIGHLIGHT);
        assert_eq!(manager.state.saved_color, Some(a_color));

        manager.apply(Some(b), &mut parts, HIGHLIGHT);
        assert_eq!(parts.get(a).expect("a").color, a_color, "previous part restored");
        assert_eq!(parts.get(b).expect("b").color, HIGHLIGHT);
        assert_eq!(manager.hovered(), Some(b));

        manager.apply(None, &mut parts, HIGHLIGHT);
        assert_eq!(parts.get(b).expect("b").color, b_color);
        assert_eq!(manager.state, HoverState::default());
    }

    #[test]
    fn same_part_twice_keeps_original_color() {
        let mut parts = parts();
        let a = parts.find("Edge TOP FRONT").expect("edge").id;
        let original = parts.get(a).expect("a").color;
        let mut manager = HighlightManager::default();

        manager.apply(Some(a), &mut parts, HIGHLIGHT);
        manager.apply(Some(a), &mut parts, HIGHLIGHT);
        assert_eq!(manager.state.saved_color, Some(original));
        manager.clear(&mut parts);
        assert_eq!(parts.get(a).expect("a").color, original);
    }

    #[test]
    fn stale_ids_are_skipped() {
        let mut parts = parts();
        let a = parts.find("Face FRONT").expect("a").id;
        let mut manager = HighlightManager::default();
        manager.apply(Some(a), &mut parts, HIGHLIGHT);

        parts.clear();
        manager.apply(Some(PartId(3)), &mut parts, HIGHLIGHT);
        assert_eq!(manager.hovered(), None);
        assert_eq!(manager.state.saved_color, None);
    }
}
