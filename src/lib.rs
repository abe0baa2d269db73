//! Viewport orientation gizmo for Bevy 0.18.
//!
//! This crate draws a small orientation cube in the top-right corner of the
//! window that mirrors your main 3D camera. Hovering highlights faces, edges
//! and corners; clicking one swings the main camera to look at the scene from
//! that side; dragging on the cube orbits the main camera; and when the view
//! is not face-on, two arrows roll the view by 90 degrees.
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_view_gizmo::{ViewGizmoControls, ViewGizmoPlugin, ViewGizmoTarget};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ViewGizmoPlugin::default())
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn((
//!         Camera3d::default(),
//!         Transform::from_xyz(10.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
//!         ViewGizmoTarget,
//!         ViewGizmoControls::orbit(Vec3::ZERO),
//!     ));
//! }
//! ```
//!
//! # Camera controls
//!
//! The gizmo moves the main camera around the focus point stored in
//! [`ViewGizmoControls`]. With [`ControlDiscipline::Orbit`] the main camera
//! copies the gizmo orientation; with [`ControlDiscipline::MapPan`] it only
//! follows the heading and keeps its height. Host controllers that cache
//! their own spherical coordinates should resync when
//! [`ViewGizmoControls::revision`] changes, or implement [`HostControls`]
//! and drive [`sync_main_from_gizmo`] themselves.
//!
//! # Configuration
//!
//! - [`ViewGizmoConfig`]: thresholds, overlay placement, render layer
//! - [`ViewGizmoStyle`]: colors and line width
//! - [`ViewGizmoEvent`]: messages about clicks, roll steps and alignments
//!
//! Add the plugin after `DefaultPlugins`: drawing needs Bevy's gizmo plugin
//! and is skipped with a warning when it is missing.

#![warn(missing_docs)]

use bevy::gizmos::GizmoPlugin;
use bevy::prelude::*;
use bevy::transform::TransformSystems;

mod animation;
mod arrows;
mod cube;
mod draw;
mod error;
mod gizmo_frame;
mod hit_test;
mod interaction;
mod math;
mod orbit;
mod pointer;
mod sync;
mod throttle;
mod types;

// Re-export all public types
pub use arrows::RotationArrowRig;
pub use error::SyncError;
pub use sync::{
    face_align_pose, face_align_target, sync_gizmo_from_main, sync_main_from_gizmo, HostControls,
};
pub use types::{
    ArrowSide, CameraState, CameraUp, ControlDiscipline, InitialFace, PartId, PartKind,
    ViewGizmoCamera, ViewGizmoConfig, ViewGizmoControls, ViewGizmoEvent, ViewGizmoLines,
    ViewGizmoState, ViewGizmoStyle, ViewGizmoTarget, GIZMO_DISTANCE,
};

use crate::cube::GizmoParts;
use crate::draw::draw_view_gizmo;
use crate::interaction::{
    configure_gizmos, handle_pointer, spawn_gizmo_camera, step_alignment, sync_gizmo_camera,
    teardown_view_gizmo, update_gizmo_viewport,
};

/// Plugin that adds the view gizmo.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_view_gizmo::{InitialFace, ViewGizmoConfig, ViewGizmoPlugin};
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(ViewGizmoPlugin {
///         config: ViewGizmoConfig {
///             initial_face: InitialFace::Top,
///             ..default()
///         },
///         ..default()
///     })
///     .run();
/// ```
#[derive(Default)]
pub struct ViewGizmoPlugin {
    /// Behavior settings.
    pub config: ViewGizmoConfig,
    /// Visual settings.
    pub style: ViewGizmoStyle,
}

impl Plugin for ViewGizmoPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(self.style.clone())
            .insert_resource(ViewGizmoState::new(&self.config))
            .insert_resource(GizmoParts::new(&self.style))
            .add_message::<ViewGizmoEvent>()
            .add_systems(
                Update,
                (
                    spawn_gizmo_camera,
                    update_gizmo_viewport,
                    handle_pointer,
                    step_alignment,
                    teardown_view_gizmo,
                )
                    .chain(),
            )
            .add_systems(
                PostUpdate,
                sync_gizmo_camera.before(TransformSystems::Propagate),
            );

        if app.is_plugin_added::<GizmoPlugin>() {
            app.init_gizmo_group::<ViewGizmoLines>()
                .add_systems(Startup, configure_gizmos)
                .add_systems(PostUpdate, draw_view_gizmo.after(sync_gizmo_camera));
        } else {
            warn!("GizmoPlugin is not added; the view gizmo will not be drawn");
        }
    }
}
