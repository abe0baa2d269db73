//! Gizmo rendering systems.
//!
//! Parts are drawn with immediate-mode lines in cube space. Only the gizmo
//! camera renders the [`ViewGizmoLines`] group, so the lines never show up in
//! the main view.

use bevy::prelude::*;

use crate::arrows::RotationArrowRig;
use crate::cube::GizmoParts;
use crate::gizmo_frame::ViewFrame;
use crate::types::{GizmoPart, PartKind, PartShape, ViewGizmoLines};

/// Number of line segments used per arrow arc.
const ARC_SEGMENTS: usize = 24;

/// Length of the arrow head strokes, relative to the ring radius.
const ARROW_HEAD_SCALE: f32 = 0.12;

const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (0, 2),
    (0, 4),
    (1, 3),
    (1, 5),
    (2, 3),
    (2, 6),
    (3, 7),
    (4, 5),
    (4, 6),
    (5, 7),
    (6, 7),
];

fn box_corners(center: Vec3, half: Vec3) -> [Vec3; 8] {
    let mut corners = [Vec3::ZERO; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let sign = |bit: usize| if i & bit == 0 { -1.0 } else { 1.0 };
        *corner = center + half * Vec3::new(sign(4), sign(2), sign(1));
    }
    corners
}

fn draw_box(gizmos: &mut Gizmos<ViewGizmoLines>, center: Vec3, half: Vec3, color: Color) {
    let corners = box_corners(center, half);
    for (i0, i1) in BOX_EDGES {
        gizmos.line(corners[i0], corners[i1], color);
    }
}

/// Outline the sides of a shell piece that face out of the cube.
fn draw_outer_sides(
    gizmos: &mut Gizmos<ViewGizmoLines>,
    center: Vec3,
    half: Vec3,
    outward: Vec3,
    color: Color,
) {
    for axis in 0..3 {
        if outward[axis] == 0.0 {
            continue;
        }
        let sign = outward[axis].signum();
        let normal = Vec3::AXES[axis];
        let u = Vec3::AXES[(axis + 1) % 3] * half[(axis + 1) % 3];
        let v = Vec3::AXES[(axis + 2) % 3] * half[(axis + 2) % 3];
        let c = center + normal * half[axis] * sign;

        let p0 = c - u - v;
        let p1 = c + u - v;
        let p2 = c + u + v;
        let p3 = c - u + v;
        gizmos.line(p0, p1, color);
        gizmos.line(p1, p2, color);
        gizmos.line(p2, p3, color);
        gizmos.line(p3, p0, color);
    }
}

/// Draw one half of the arrow ring, with its head at `end`.
///
/// Angles are measured from the rig's up axis toward its right axis.
fn draw_arrow_arc(
    gizmos: &mut Gizmos<ViewGizmoLines>,
    rig: &RotationArrowRig,
    radius: f32,
    start: f32,
    end: f32,
    color: Color,
) {
    let frame = ViewFrame::from_rotation(Vec3::ZERO, rig.rotation);
    let point = |angle: f32| frame.to_world(Vec3::new(angle.sin(), angle.cos(), 0.0) * radius);

    let steps = ARC_SEGMENTS.max(2);
    let mut prev_point: Option<Vec3> = None;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let p = point(start + (end - start) * t);
        if let Some(prev) = prev_point {
            gizmos.line(prev, p, color);
        }
        prev_point = Some(p);
    }

    // Head: two strokes folding back from the tip along the ring.
    let tip = point(end);
    let back = (point(end - (end - start).signum() * 0.05) - tip).normalize_or_zero();
    let outward = tip.normalize_or_zero();
    let len = radius * ARROW_HEAD_SCALE;
    gizmos.line(tip, tip + (back + outward * 0.6).normalize_or_zero() * len, color);
    gizmos.line(tip, tip + (back - outward * 0.6).normalize_or_zero() * len, color);
}

fn draw_part(gizmos: &mut Gizmos<ViewGizmoLines>, parts: &GizmoParts, part: &GizmoPart) {
    match (part.kind, part.shape) {
        (
            PartKind::Decoration,
            PartShape::Box {
                center,
                half_extents,
            },
        ) => draw_box(gizmos, center, half_extents, part.color),
        (
            _,
            PartShape::Box {
                center,
                half_extents,
            },
        ) => {
            let outward = part.bound_vector.unwrap_or(Vec3::ZERO);
            draw_outer_sides(gizmos, center, half_extents, outward, part.color);
        }
        (
            _,
            PartShape::Arc {
                radius, start, end, ..
            },
        ) => draw_arrow_arc(gizmos, &parts.arrows, radius, start, end, part.color),
    }
}

pub fn draw_view_gizmo(parts: Res<GizmoParts>, mut gizmos: Gizmos<ViewGizmoLines>) {
    for part in parts.iter() {
        if !parts.is_visible(part) {
            continue;
        }
        draw_part(&mut gizmos, &parts, part);
    }
}
