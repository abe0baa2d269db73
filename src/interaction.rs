//! Gizmo interaction and input handling.
//!
//! These systems own the gizmo camera, turn mouse input over the overlay into
//! hover highlights, clicks and drags, step the face-align animation and keep
//! the two cameras in sync. The heavy lifting lives in pure functions; the
//! systems copy camera transforms in and out.

use bevy::camera::visibility::RenderLayers;
use bevy::camera::{ClearColorConfig, Viewport};
use bevy::gizmos::config::GizmoConfigStore;
use bevy::input::mouse::MouseButton;
use bevy::input::ButtonInput;
use bevy::math::Ray3d;
use bevy::prelude::*;
use bevy::time::Real;
use bevy::window::PrimaryWindow;

use crate::animation::{AnimationStep, CameraAnimation};
use crate::arrows::{rotation_step, update_arrow_visibility};
use crate::cube::GizmoParts;
use crate::hit_test::{cast_hover, pointer_ray, GizmoLens};
use crate::orbit::orbit_gizmo;
use crate::pointer::{cursor_to_ndc, resolve_click, ClickAction};
use crate::sync::{
    face_align_target, sync_gizmo_from_main, sync_main_with_discipline, HostControls,
};
use crate::types::{
    CameraState, CameraUp, ControlDiscipline, ViewGizmoCamera, ViewGizmoConfig,
    ViewGizmoControls, ViewGizmoEvent, ViewGizmoLines, ViewGizmoState, ViewGizmoStyle,
    ViewGizmoTarget,
};

/// Near clip plane of the gizmo camera.
const GIZMO_NEAR: f32 = 0.1;
/// Far clip plane of the gizmo camera.
const GIZMO_FAR: f32 = 10.0;

type GizmoCameraQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Transform, &'static mut CameraUp),
    (With<ViewGizmoCamera>, Without<ViewGizmoTarget>),
>;

type MainCameraQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        Option<&'static mut CameraUp>,
        &'static mut ViewGizmoControls,
    ),
    (With<ViewGizmoTarget>, Without<ViewGizmoCamera>),
>;

impl ViewGizmoState {
    /// Run one throttled hover hit test.
    pub(crate) fn hover_tick(
        &mut self,
        ray: Option<&Ray3d>,
        gizmo: &CameraState,
        parts: &mut GizmoParts,
        highlight: Color,
        epsilon: f32,
    ) {
        let hit = ray.map(|ray| cast_hover(ray, parts)).unwrap_or_default();
        self.highlight.apply(hit.nearest, parts, highlight);
        update_arrow_visibility(&mut parts.arrows, hit.any, gizmo.orientation, epsilon);
    }

    /// The cursor left the overlay.
    pub(crate) fn pointer_leave(&mut self, parts: &mut GizmoParts) {
        parts.arrows.visible = false;
        self.highlight.clear(parts);
    }

    /// Drop everything in flight and return to idle.
    pub(crate) fn teardown(&mut self, parts: &mut GizmoParts) {
        self.animator.cancel_all();
        self.pointer.reset();
        self.highlight.clear(parts);
        parts.arrows.visible = false;
        self.last_cursor = None;
        self.cursor_inside = false;
    }
}

/// Logical-pixel rectangle of the overlay in the window's top-right corner.
pub fn overlay_rect(window: &Window, config: &ViewGizmoConfig) -> Rect {
    let size = config.overlay_size;
    let min = Vec2::new(window.width() - size - config.overlay_margin, config.overlay_margin);
    Rect::from_corners(min, min + Vec2::splat(size))
}

fn main_up(up: Option<&CameraUp>, config: &ViewGizmoConfig) -> Vec3 {
    up.map_or(config.up, |up| up.0)
}

/// Configure Bevy's gizmo renderer for the view gizmo line group.
pub fn configure_gizmos(
    mut config_store: ResMut<GizmoConfigStore>,
    style: Res<ViewGizmoStyle>,
    config: Res<ViewGizmoConfig>,
) {
    let (gizmo_config, _) = config_store.config_mut::<ViewGizmoLines>();
    gizmo_config.line.width = style.line_width;
    gizmo_config.depth_bias = style.depth_bias;
    gizmo_config.render_layers = RenderLayers::layer(config.render_layer);
}

/// Spawn the gizmo camera once a main camera shows up.
pub fn spawn_gizmo_camera(
    mut commands: Commands,
    config: Res<ViewGizmoConfig>,
    style: Res<ViewGizmoStyle>,
    mut parts: ResMut<GizmoParts>,
    targets: Query<(), Added<ViewGizmoTarget>>,
    existing: Query<(), With<ViewGizmoCamera>>,
) {
    if targets.is_empty() || !existing.is_empty() {
        return;
    }
    if parts.is_empty() {
        *parts = GizmoParts::new(&style);
    }

    let pose = config
        .initial_face
        .camera_state(config.gizmo_distance, config.up);
    let mut transform = Transform::default();
    pose.write_to(&mut transform);

    commands.spawn((
        Camera3d::default(),
        Camera {
            order: config.camera_order,
            // The main camera already cleared the window.
            clear_color: ClearColorConfig::None,
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: config.fov,
            near: GIZMO_NEAR,
            far: GIZMO_FAR,
            ..default()
        }),
        transform,
        CameraUp(pose.up),
        RenderLayers::layer(config.render_layer),
        ViewGizmoCamera,
        Name::new("view_gizmo_camera"),
    ));
    info!(face = ?config.initial_face, layer = config.render_layer, "view gizmo camera spawned");
}

/// Keep the gizmo viewport pinned to the top-right corner of the window.
pub fn update_gizmo_viewport(
    config: Res<ViewGizmoConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<&mut Camera, With<ViewGizmoCamera>>,
) {
    let Some(window) = windows.iter().next() else {
        return;
    };
    let scale_factor = window.scale_factor();
    let side = (config.overlay_size * scale_factor).round() as u32;
    let margin = (config.overlay_margin * scale_factor).round() as u32;
    let width = window.physical_width();
    let fits = side > 0 && width >= side + margin && window.physical_height() >= side + margin;

    for mut camera in cameras.iter_mut() {
        camera.is_active = fits;
        if !fits {
            continue;
        }
        camera.viewport = Some(Viewport {
            physical_position: UVec2::new(width - side - margin, margin),
            physical_size: UVec2::splat(side),
            ..default()
        });
    }
}

/// Pointer handling over the overlay: hover, click and drag.
///
/// Click timing and hover throttling run on real time, unaffected by a
/// paused or scaled virtual clock.
#[allow(clippy::too_many_arguments)]
pub fn handle_pointer(
    time: Res<Time<Real>>,
    buttons: Res<ButtonInput<MouseButton>>,
    config: Res<ViewGizmoConfig>,
    style: Res<ViewGizmoStyle>,
    mut state: ResMut<ViewGizmoState>,
    mut parts: ResMut<GizmoParts>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut gizmo_cameras: GizmoCameraQuery,
    mut main_cameras: MainCameraQuery,
    mut events: MessageWriter<ViewGizmoEvent>,
) {
    let Some(window) = windows.iter().next() else {
        return;
    };
    let Some((mut gizmo_transform, mut gizmo_up)) = gizmo_cameras.iter_mut().next() else {
        return;
    };
    let state = &mut *state;
    let parts = &mut *parts;

    let now = time.elapsed();
    let rect = overlay_rect(window, &config);
    let cursor = window.cursor_position();
    let inside = cursor.is_some_and(|c| rect.contains(c));
    let lens = GizmoLens {
        fov_y: config.fov,
        aspect: 1.0,
    };
    let mut gizmo = CameraState::from_transform(&gizmo_transform, gizmo_up.0);
    let mut gizmo_moved = false;
    let mut force_orbit = false;

    if state.cursor_inside && !inside {
        state.pointer_leave(parts);
    }
    state.cursor_inside = inside;

    if let Some(position) = cursor {
        if inside && buttons.just_pressed(MouseButton::Left) {
            state.pointer.pointer_down(position, now);
        }
        if state.last_cursor != Some(position) {
            let outcome = state.pointer.pointer_move(position, now);
            if let Some(delta) = outcome.drag_delta {
                state.animator.cancel_all();
                orbit_gizmo(
                    &mut gizmo,
                    delta,
                    rect.height(),
                    config.orbit_rotate_speed,
                    config.up,
                );
                gizmo_moved = true;
            }
            if outcome.hover_tick && inside {
                let ray = cursor_to_ndc(position, rect)
                    .and_then(|ndc| pointer_ray(ndc, &gizmo, &lens));
                state.hover_tick(
                    ray.as_ref(),
                    &gizmo,
                    parts,
                    style.highlight_color,
                    config.axis_epsilon,
                );
            }
        }
    }
    state.last_cursor = cursor;

    if buttons.just_released(MouseButton::Left) {
        let click = match cursor {
            Some(position) => state.pointer.pointer_up(position, now),
            None => {
                state.pointer.reset();
                None
            }
        };

        if let Some(position) = click {
            let table: &GizmoParts = parts;
            let part = cursor_to_ndc(position, rect)
                .and_then(|ndc| pointer_ray(ndc, &gizmo, &lens))
                .and_then(|ray| cast_hover(&ray, table).nearest)
                .and_then(|id| table.get(id));

            if let Some(part) = part {
                debug!(part = %part.name, kind = %part.kind, "view gizmo part clicked");
                events.write(ViewGizmoEvent::PartClicked {
                    name: part.name.clone(),
                    kind: part.kind,
                });
            }

            match resolve_click(part) {
                ClickAction::RotateStep(side) => {
                    state.animator.cancel_all();
                    rotation_step(&mut gizmo, side);
                    gizmo_moved = true;
                    force_orbit = true;
                    events.write(ViewGizmoEvent::RotationStep(side));
                }
                ClickAction::FaceAlign(bound) => {
                    let animation = main_cameras.iter().next().and_then(|(transform, up, controls)| {
                        let focus = controls.focus_point()?;
                        let main = CameraState::from_transform(transform, main_up(up, &config));
                        let target = face_align_target(&main, focus, bound);
                        Some(CameraAnimation::new(
                            main.position,
                            target,
                            focus,
                            now,
                            config.align_duration,
                        ))
                    });
                    match animation {
                        Some(animation) => {
                            let handle = state.animator.start(animation);
                            debug!(?handle, target = ?animation.target, "view gizmo alignment started");
                            events.write(ViewGizmoEvent::AlignStarted {
                                target: animation.target,
                            });
                        }
                        None => debug!("view gizmo click ignored: no main camera with a focus point"),
                    }
                }
                ClickAction::None => {}
            }
        }
    }

    if !gizmo_moved {
        return;
    }
    gizmo.write_to(&mut gizmo_transform);
    gizmo_up.0 = gizmo.up;

    let Some((mut transform, up, mut controls)) = main_cameras.iter_mut().next() else {
        return;
    };
    let mut main = CameraState::from_transform(&transform, main_up(up.as_deref(), &config));
    let discipline = if force_orbit {
        ControlDiscipline::Orbit
    } else {
        controls.discipline()
    };
    match sync_main_with_discipline(&mut main, &gizmo, &mut *controls, discipline, config.up) {
        Ok(()) => {
            main.write_to(&mut transform);
            if let Some(mut up) = up {
                up.0 = main.up;
            }
        }
        Err(err) => debug!(%err, %discipline, "view gizmo skipped main camera sync"),
    }
}

/// Advance the face-align animation by one frame, on real time.
pub fn step_alignment(
    time: Res<Time<Real>>,
    config: Res<ViewGizmoConfig>,
    mut state: ResMut<ViewGizmoState>,
    mut main_cameras: MainCameraQuery,
    mut events: MessageWriter<ViewGizmoEvent>,
) {
    if !state.animator.is_running() {
        return;
    }
    let Some((mut transform, up, mut controls)) = main_cameras.iter_mut().next() else {
        state.animator.cancel_all();
        return;
    };

    let mut main = CameraState::from_transform(&transform, main_up(up.as_deref(), &config));
    let step = state.animator.step(time.elapsed(), &mut main, config.up);
    main.write_to(&mut transform);
    if let Some(mut up) = up {
        up.0 = main.up;
    }
    controls.update(&main);

    if let AnimationStep::Finished(handle) = step {
        debug!(?handle, "view gizmo alignment finished");
        events.write(ViewGizmoEvent::AlignFinished);
    }
}

/// Mirror the main camera into the gizmo camera.
pub fn sync_gizmo_camera(
    config: Res<ViewGizmoConfig>,
    mut parts: ResMut<GizmoParts>,
    main_cameras: Query<(&Transform, Option<&CameraUp>), (With<ViewGizmoTarget>, Without<ViewGizmoCamera>)>,
    mut gizmo_cameras: GizmoCameraQuery,
) {
    let Some((main_transform, up)) = main_cameras.iter().next() else {
        return;
    };
    let Some((mut gizmo_transform, mut gizmo_up)) = gizmo_cameras.iter_mut().next() else {
        return;
    };

    let main = CameraState::from_transform(main_transform, main_up(up, &config));
    let mut gizmo = CameraState::from_transform(&gizmo_transform, gizmo_up.0);
    let rig = if parts.arrows.visible {
        Some(&mut parts.arrows)
    } else {
        None
    };
    sync_gizmo_from_main(&mut gizmo, &main, rig, config.gizmo_distance);

    gizmo.write_to(&mut gizmo_transform);
    gizmo_up.0 = gizmo.up;
}

/// Tear the gizmo down when its main camera or its own camera goes away.
pub fn teardown_view_gizmo(
    mut commands: Commands,
    mut removed_targets: RemovedComponents<ViewGizmoTarget>,
    mut removed_cameras: RemovedComponents<ViewGizmoCamera>,
    mut state: ResMut<ViewGizmoState>,
    mut parts: ResMut<GizmoParts>,
    targets: Query<(), With<ViewGizmoTarget>>,
    gizmo_cameras: Query<Entity, With<ViewGizmoCamera>>,
) {
    let target_gone = removed_targets.read().count() > 0 && targets.is_empty();
    let camera_gone = removed_cameras.read().count() > 0;
    // Despawning the gizmo camera below reports `camera_gone` next frame.
    if (!target_gone && !camera_gone) || parts.is_empty() {
        return;
    }

    state.teardown(&mut parts);
    parts.clear();
    for entity in gizmo_cameras.iter() {
        commands.entity(entity).despawn();
    }
    info!(target_gone, camera_gone, "view gizmo torn down");
}
