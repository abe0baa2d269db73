//! Orbit viewer example.
//!
//! A small scene with a view gizmo in the top-right corner. Right-drag to
//! orbit, click the gizmo to snap to a side, drag on the gizmo to orbit
//! through it. Press M to toggle between orbit and map-pan controls.

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy_view_gizmo::{
    CameraState, ControlDiscipline, HostControls, ViewGizmoControls, ViewGizmoEvent,
    ViewGizmoPlugin, ViewGizmoState, ViewGizmoTarget,
};

#[derive(Component)]
struct Hud;

#[derive(Resource, Default)]
struct LastEvent(String);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(ViewGizmoPlugin::default())
        .init_resource::<LastEvent>()
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (keyboard_controls, orbit_main_camera, record_events, update_hud),
        )
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Main camera driven by the gizmo
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(10.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        ViewGizmoTarget,
        ViewGizmoControls::orbit(Vec3::ZERO),
    ));

    // Light
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 15.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(10.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.2, 0.35, 0.18))),
    ));

    // A few landmarks so each side looks different
    for (position, color) in [
        (Vec3::new(0.0, 0.5, 0.0), Color::srgb(0.2, 0.7, 1.0)),
        (Vec3::new(3.0, 0.5, 0.0), Color::srgb(0.9, 0.2, 0.2)),
        (Vec3::new(0.0, 0.5, 3.0), Color::srgb(0.2, 0.8, 0.2)),
        (Vec3::new(0.0, 2.5, 0.0), Color::srgb(0.9, 0.9, 0.2)),
    ] {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_length(1.0))),
            MeshMaterial3d(materials.add(color)),
            Transform::from_translation(position),
        ));
    }

    // HUD
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|p| {
            p.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Hud,
            ));
        });
}

fn keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut controls: Query<&mut ViewGizmoControls, With<ViewGizmoTarget>>,
) {
    if !keys.just_pressed(KeyCode::KeyM) {
        return;
    }
    let Ok(mut controls) = controls.single_mut() else {
        return;
    };
    controls.discipline = match controls.discipline {
        ControlDiscipline::Orbit => ControlDiscipline::MapPan,
        ControlDiscipline::MapPan => ControlDiscipline::Orbit,
    };
}

/// Minimal host orbit controller working from the cached orbit angles.
fn orbit_main_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    mut gizmo: ResMut<ViewGizmoState>,
    mut cameras: Query<(&mut Transform, &mut ViewGizmoControls), With<ViewGizmoTarget>>,
) {
    if gizmo.is_pointer_captured()
        || !buttons.pressed(MouseButton::Right)
        || motion.delta == Vec2::ZERO
    {
        return;
    }
    // Manual input wins over a running snap
    gizmo.cancel_alignment();

    let Ok((mut transform, mut controls)) = cameras.single_mut() else {
        return;
    };
    let Some(focus) = controls.focus else {
        return;
    };

    controls.update(&CameraState::from_transform(&transform, Vec3::Y));
    let yaw = controls.yaw() - motion.delta.x * 0.005;
    let pitch = (controls.pitch() + motion.delta.y * 0.005).clamp(-1.5, 1.5);
    let radius = controls.radius().max(1.0);

    let offset = Vec3::new(
        radius * pitch.cos() * yaw.sin(),
        radius * pitch.sin(),
        radius * pitch.cos() * yaw.cos(),
    );
    transform.translation = focus + offset;
    transform.look_at(focus, Vec3::Y);
    controls.update(&CameraState::from_transform(&transform, Vec3::Y));
}

fn record_events(mut events: MessageReader<ViewGizmoEvent>, mut last: ResMut<LastEvent>) {
    for event in events.read() {
        last.0 = format!("{event:?}");
    }
}

fn update_hud(
    last: Res<LastEvent>,
    controls: Query<&ViewGizmoControls, With<ViewGizmoTarget>>,
    mut query: Query<&mut Text, With<Hud>>,
) {
    let Ok(mut text) = query.single_mut() else { return };
    let Ok(controls) = controls.single() else { return };

    text.0 = format!(
        "Controls: {}\nLast gizmo event: {}\n\n\
         [Right drag] Orbit  [M] Toggle orbit / map pan",
        controls.discipline, last.0,
    );
}
