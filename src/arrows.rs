//! Rotation arrows: when they show, and the 90 degree roll they trigger.

use bevy::prelude::*;

use crate::gizmo_frame::ViewFrame;
use crate::math::{is_axis_aligned, look_rotation};
use crate::types::{ArrowSide, CameraState};

/// Placement of the arrow ring. It faces the gizmo camera, so its rotation
/// follows the gizmo orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationArrowRig {
    /// Orientation of the ring in cube space.
    pub rotation: Quat,
    /// Whether the arrows are drawn and hit tested.
    pub visible: bool,
}

impl Default for RotationArrowRig {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            visible: false,
        }
    }
}

/// Arrows show while the pointer is over the gizmo and the view is not a
/// clean face-on view.
pub fn arrows_visible(hovering_any: bool, gizmo_orientation: Quat, epsilon: f32) -> bool {
    hovering_any && !is_axis_aligned(gizmo_orientation, epsilon)
}

/// Recompute arrow visibility after a hover tick.
pub fn update_arrow_visibility(
    rig: &mut RotationArrowRig,
    hovering_any: bool,
    gizmo_orientation: Quat,
    epsilon: f32,
) {
    let visible = arrows_visible(hovering_any, gizmo_orientation, epsilon);
    if visible && !rig.visible {
        rig.rotation = gizmo_orientation;
    }
    rig.visible = visible;
}

/// Roll the gizmo camera by 90 degrees about its view axis.
pub fn rotation_step(gizmo: &mut CameraState, side: ArrowSide) {
    let frame = ViewFrame::new(gizmo);
    let axis = frame.axis_toward(Vec3::ZERO);
    let roll = Quat::from_axis_angle(axis, side.angle());

    gizmo.position = roll * gizmo.position;
    gizmo.up = roll * frame.up;
    if let Some(rotation) = look_rotation(-gizmo.position, gizmo.up) {
        gizmo.orientation = rotation;
    } else {
        gizmo.orientation = roll * gizmo.orientation;
    }
}
