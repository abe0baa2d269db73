//! Two-way synchronization between the main camera and the gizmo camera.
//!
//! The gizmo camera always sits on a sphere of radius `distance` around the
//! cube, looking at its center with the main camera's orientation. Moving the
//! gizmo moves the main camera around its focus point, either as a free
//! orbit or as a yaw-locked map pan.

use bevy::prelude::*;

use crate::arrows::RotationArrowRig;
use crate::error::SyncError;
use crate::math::{forward_vector, look_rotation, stable_up, EPSILON};
use crate::types::{CameraState, ControlDiscipline, ViewGizmoControls};

/// What the synchronizer needs from the host's camera controls.
pub trait HostControls {
    /// Point the main camera orbits or pans around.
    fn focus_point(&self) -> Option<Vec3>;
    /// How the controls move the camera.
    fn discipline(&self) -> ControlDiscipline;
    /// Refresh any cached state after the camera was moved externally.
    fn update(&mut self, camera: &CameraState);
}

impl HostControls for ViewGizmoControls {
    fn focus_point(&self) -> Option<Vec3> {
        self.focus
    }

    fn discipline(&self) -> ControlDiscipline {
        self.discipline
    }

    fn update(&mut self, camera: &CameraState) {
        let Some(focus) = self.focus else {
            return;
        };
        let offset = camera.position - focus;
        self.radius = offset.length();
        if self.radius > EPSILON {
            self.yaw = offset.x.atan2(offset.z);
            self.pitch = (offset.y / self.radius).clamp(-1.0, 1.0).asin();
        }
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Mirror the main camera into the gizmo camera.
///
/// Orientation and up are copied; the gizmo is placed `distance` behind the
/// cube center along its view direction. An arrow rig, when given, follows
/// the new orientation.
pub fn sync_gizmo_from_main(
    gizmo: &mut CameraState,
    main: &CameraState,
    arrows: Option<&mut RotationArrowRig>,
    distance: f32,
) {
    gizmo.orientation = main.orientation;
    gizmo.up = main.up;
    gizmo.position = forward_vector(gizmo.orientation) * -distance;

    if let Some(rig) = arrows {
        rig.rotation = gizmo.orientation;
    }
}

/// Mirror the gizmo orientation back into the main camera using the
/// discipline reported by `controls`.
pub fn sync_main_from_gizmo<C: HostControls + ?Sized>(
    main: &mut CameraState,
    gizmo: &CameraState,
    controls: &mut C,
    world_up: Vec3,
) -> Result<(), SyncError> {
    let discipline = controls.discipline();
    sync_main_with_discipline(main, gizmo, controls, discipline, world_up)
}

/// Same as [`sync_main_from_gizmo`] with an explicit discipline.
///
/// Rotation steps always take the orbit path regardless of the host controls.
pub fn sync_main_with_discipline<C: HostControls + ?Sized>(
    main: &mut CameraState,
    gizmo: &CameraState,
    controls: &mut C,
    discipline: ControlDiscipline,
    world_up: Vec3,
) -> Result<(), SyncError> {
    let focus = controls.focus_point().ok_or(SyncError::MissingFocus)?;

    match discipline {
        ControlDiscipline::Orbit => sync_orbit(main, gizmo, focus),
        ControlDiscipline::MapPan => sync_map_pan(main, gizmo, focus, world_up)?,
    }

    controls.update(main);
    Ok(())
}

fn sync_orbit(main: &mut CameraState, gizmo: &CameraState, focus: Vec3) {
    let distance = main.position.distance(focus);
    let forward = forward_vector(gizmo.orientation);

    main.up = gizmo.screen_up();
    main.position = focus - forward * distance;
    if distance > EPSILON {
        main.look_at(focus);
    } else {
        main.orientation = gizmo.orientation;
    }
}

fn sync_map_pan(
    main: &mut CameraState,
    gizmo: &CameraState,
    focus: Vec3,
    world_up: Vec3,
) -> Result<(), SyncError> {
    let up = world_up.normalize_or_zero();
    let forward = forward_vector(gizmo.orientation);
    let heading = (forward - up * forward.dot(up)).normalize_or_zero();
    if heading == Vec3::ZERO {
        return Err(SyncError::DegenerateDirection);
    }

    let offset = main.position - focus;
    let height = offset.dot(up);
    let radius = (offset - up * height).length();

    main.position = focus + up * height - heading * radius;
    if radius > EPSILON {
        main.up = up;
        main.look_at(focus);
    } else if let Some(rotation) = look_rotation(focus - main.position, heading) {
        // Straight above or below the focus: yaw shows up as the screen up.
        main.orientation = rotation;
        main.up = heading;
    }
    Ok(())
}

/// Where the main camera ends up when a part with `bound_vector` is clicked:
/// on the ray from `focus` along the part, at the current distance.
pub fn face_align_target(main: &CameraState, focus: Vec3, bound_vector: Vec3) -> Vec3 {
    let distance = main.position.distance(focus);
    focus + bound_vector.normalize_or_zero() * distance
}

/// Place `camera` at `position` looking at `focus`.
///
/// Looking straight along `world_up` swaps in a perpendicular up so the pose
/// stays well defined.
pub fn face_align_pose(camera: &mut CameraState, focus: Vec3, position: Vec3, world_up: Vec3) {
    camera.position = position;
    let up = stable_up(focus - position, world_up);
    if let Some(rotation) = look_rotation(focus - position, up) {
        camera.orientation = rotation;
    }
    camera.up = up;
}
