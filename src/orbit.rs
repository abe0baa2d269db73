//! Dragging on the gizmo orbits its camera around the cube.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::gizmo_frame::ViewFrame;
use crate::math::look_rotation;
use crate::types::CameraState;

/// Keeps the orbit camera off the poles.
const POLE_MARGIN: f32 = 0.01;

/// Orbit `gizmo` around the origin by a pointer drag of `delta` logical pixels.
///
/// A drag across the full viewport height turns the camera by
/// `TAU * rotate_speed`. Horizontal drags yaw about `world_up`; vertical drags
/// change the elevation and stop short of the poles.
pub fn orbit_gizmo(
    gizmo: &mut CameraState,
    delta: Vec2,
    viewport_height: f32,
    rotate_speed: f32,
    world_up: Vec3,
) {
    if viewport_height <= 0.0 {
        return;
    }
    let up = world_up.normalize_or_zero();
    if up == Vec3::ZERO {
        return;
    }

    let yaw = -TAU * delta.x / viewport_height * rotate_speed;
    let mut pitch = -TAU * delta.y / viewport_height * rotate_speed;

    let frame = ViewFrame::new(gizmo);
    let offset = gizmo.position;
    let radius = offset.length();
    if radius <= 0.0 {
        return;
    }

    // Polar angle measured from `up`; pitching up moves the camera toward it.
    let polar = (offset.dot(up) / radius).clamp(-1.0, 1.0).acos();
    let target_polar = (polar + pitch).clamp(POLE_MARGIN, std::f32::consts::PI - POLE_MARGIN);
    pitch = target_polar - polar;

    // Pitch along the meridian through the camera, independent of roll.
    let meridian_axis = up.cross(offset).try_normalize().unwrap_or(frame.right);
    let rotation = Quat::from_axis_angle(up, yaw) * Quat::from_axis_angle(meridian_axis, pitch);
    gizmo.position = rotation * offset;
    gizmo.up = rotation * frame.up;

    if let Some(orientation) = look_rotation(-gizmo.position, gizmo.up) {
        gizmo.orientation = orientation;
    }
}
