//! View frame handling.
//!
//! A [`ViewFrame`] is the right/up/forward basis of a camera orientation,
//! anchored at the camera position. The rotation-step controller rolls
//! around its forward axis, the mini-orbit pitches around its right axis and
//! the arrow rig is laid out in its plane.

use bevy::prelude::*;

use crate::math::{forward_vector, LOCAL_UP};
use crate::types::CameraState;

/// Precomputed basis vectors for a camera orientation.
#[derive(Clone, Copy, Debug)]
pub struct ViewFrame {
    pub origin: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl ViewFrame {
    pub fn new(camera: &CameraState) -> Self {
        Self::from_rotation(camera.position, camera.orientation)
    }

    pub fn from_rotation(origin: Vec3, rotation: Quat) -> Self {
        Self {
            origin,
            right: rotation * Vec3::X,
            up: rotation * LOCAL_UP,
            forward: forward_vector(rotation),
        }
    }

    /// Map a point from frame-local coordinates (x right, y up, z back)
    /// into world space.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin + self.right * local.x + self.up * local.y - self.forward * local.z
    }

    /// View axis toward `target`, falling back to the frame forward when the
    /// camera sits on the target.
    pub fn axis_toward(&self, target: Vec3) -> Vec3 {
        let axis = (target - self.origin).normalize_or_zero();
        if axis == Vec3::ZERO {
            self.forward
        } else {
            axis
        }
    }
}
