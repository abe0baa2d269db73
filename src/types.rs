//! Core types for the view gizmo plugin.
//!
//! This module contains the public components, resources and messages used
//! to attach the gizmo to a host camera and to configure it.

use std::fmt;
use std::time::Duration;

use bevy::prelude::*;

use crate::animation::CameraAnimator;
use crate::hit_test::HighlightManager;
use crate::math::{forward_vector, look_rotation, stable_up, LOCAL_UP};
use crate::pointer::{PointerController, PointerPhase};

/// Distance between the gizmo camera and the cube center.
pub const GIZMO_DISTANCE: f32 = 8.0;

/// Pose of one camera: where it is, where it looks and which way is up.
///
/// The gizmo plugin reads this out of a camera's [`Transform`] and
/// [`CameraUp`], runs its sync math on it and writes it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation. Cameras look down local -Z.
    pub orientation: Quat,
    /// Up vector used when re-orienting with a look-at.
    pub up: Vec3,
}

impl CameraState {
    /// Creates a camera state from its parts.
    pub fn new(position: Vec3, orientation: Quat, up: Vec3) -> Self {
        Self {
            position,
            orientation,
            up,
        }
    }

    /// Creates a camera at `position` looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let mut camera = Self::new(position, Quat::IDENTITY, up);
        camera.look_at(target);
        camera
    }

    /// Reads the pose stored on a camera entity.
    pub fn from_transform(transform: &Transform, up: Vec3) -> Self {
        Self::new(transform.translation, transform.rotation, up)
    }

    /// Writes position and orientation back into a [`Transform`].
    pub fn write_to(&self, transform: &mut Transform) {
        transform.translation = self.position;
        transform.rotation = self.orientation;
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        forward_vector(self.orientation)
    }

    /// Re-orients the camera toward `target` using its own `up`.
    ///
    /// A target at the camera position leaves the orientation unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(rotation) = look_rotation(target - self.position, self.up) {
            self.orientation = rotation;
        }
    }

    /// Up vector of the current orientation, as seen on screen.
    pub fn screen_up(&self) -> Vec3 {
        self.orientation * LOCAL_UP
    }
}

/// The up vector a camera uses for look-at re-orientation.
///
/// Optional on the main camera (the configured world up is assumed when it
/// is missing); always present on the gizmo camera.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CameraUp(pub Vec3);

impl Default for CameraUp {
    fn default() -> Self {
        Self(Vec3::Y)
    }
}

/// How the host's camera controls move the main camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlDiscipline {
    /// Free orbit around the focus point. The gizmo orientation is copied as is.
    #[default]
    Orbit,
    /// Yaw-locked map panning: the camera keeps its height above the focus and
    /// only follows the gizmo heading.
    MapPan,
}

impl fmt::Display for ControlDiscipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlDiscipline::Orbit => f.write_str("Orbit"),
            ControlDiscipline::MapPan => f.write_str("MapPan"),
        }
    }
}

/// Binding between the gizmo and the host's camera controls.
///
/// Insert this next to [`ViewGizmoTarget`] on the main camera. Host
/// controllers that keep their own spherical state should read
/// [`ViewGizmoControls::revision`] and the cached orbit angles after the gizmo
/// moved the camera.
///
/// # Example
///
/// ```ignore
/// commands.spawn((
///     Camera3d::default(),
///     Transform::from_xyz(10.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
///     ViewGizmoTarget,
///     ViewGizmoControls::orbit(Vec3::ZERO),
/// ));
/// ```
#[derive(Component, Debug, Clone, Default)]
pub struct ViewGizmoControls {
    /// Point the camera orbits around. `None` until the host knows it.
    pub focus: Option<Vec3>,
    /// Which control discipline the host uses.
    pub discipline: ControlDiscipline,
    pub(crate) yaw: f32,
    pub(crate) pitch: f32,
    pub(crate) radius: f32,
    pub(crate) revision: u64,
}

impl ViewGizmoControls {
    /// Orbit controls around `focus`.
    pub fn orbit(focus: Vec3) -> Self {
        Self {
            focus: Some(focus),
            ..default()
        }
    }

    /// Map-pan controls around `focus`.
    pub fn map_pan(focus: Vec3) -> Self {
        Self {
            focus: Some(focus),
            discipline: ControlDiscipline::MapPan,
            ..default()
        }
    }

    /// Azimuth of the camera around the focus, in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Elevation of the camera above the focus, in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Distance from the camera to the focus.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Incremented every time the gizmo moves the main camera.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Which cube face the gizmo shows before it first mirrors the main camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialFace {
    /// Looking at the +Z face.
    #[default]
    Front,
    /// Looking at the -Z face.
    Back,
    /// Looking at the +X face.
    Right,
    /// Looking at the -X face.
    Left,
    /// Looking down at the +Y face.
    Top,
    /// Looking up at the -Y face.
    Bottom,
}

impl InitialFace {
    /// Outward normal of the face.
    pub fn direction(self) -> Vec3 {
        match self {
            InitialFace::Front => Vec3::Z,
            InitialFace::Back => Vec3::NEG_Z,
            InitialFace::Right => Vec3::X,
            InitialFace::Left => Vec3::NEG_X,
            InitialFace::Top => Vec3::Y,
            InitialFace::Bottom => Vec3::NEG_Y,
        }
    }

    /// Gizmo camera pose looking straight at this face from `distance`.
    pub fn camera_state(self, distance: f32, up: Vec3) -> CameraState {
        let position = self.direction() * distance;
        let up = stable_up(-position, up);
        CameraState::looking_at(position, Vec3::ZERO, up)
    }
}

/// Index of a part in the gizmo part table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartId(pub usize);

/// What a gizmo part is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// One of the six cube faces.
    Face,
    /// One of the twelve cube edges.
    Edge,
    /// One of the eight cube corners.
    Corner,
    /// A half of the rotation arrow ring.
    RotationArrow,
    /// Non-interactive geometry such as the cube wireframe.
    Decoration,
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartKind::Face => f.write_str("Face"),
            PartKind::Edge => f.write_str("Edge"),
            PartKind::Corner => f.write_str("Corner"),
            PartKind::RotationArrow => f.write_str("RotationArrow"),
            PartKind::Decoration => f.write_str("Decoration"),
        }
    }
}

/// Which half of the rotation arrow ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowSide {
    /// Rolls the view by +90 degrees.
    Left,
    /// Rolls the view by -90 degrees.
    Right,
}

impl ArrowSide {
    /// Signed roll angle for this side.
    pub fn angle(self) -> f32 {
        match self {
            ArrowSide::Left => std::f32::consts::FRAC_PI_2,
            ArrowSide::Right => -std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Hit shape of a part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    /// Axis-aligned box in cube space.
    Box {
        /// Box center.
        center: Vec3,
        /// Half size along each axis.
        half_extents: Vec3,
    },
    /// Arc segment in the arrow rig plane (x right, y up, z toward the viewer).
    ///
    /// Angles are measured from the rig's +Y toward its +X.
    Arc {
        /// Ring radius.
        radius: f32,
        /// Half width of the clickable band around the ring.
        thickness: f32,
        /// Start angle in radians.
        start: f32,
        /// End angle in radians. The arrow head sits here.
        end: f32,
    },
}

/// One named, clickable piece of the gizmo.
#[derive(Debug, Clone)]
pub struct GizmoPart {
    /// Position in the part table.
    pub id: PartId,
    /// Unique name, e.g. `"Face FRONT"` or `"Wireframe"`.
    pub name: String,
    /// What the part is.
    pub kind: PartKind,
    /// Direction from the cube center through the part. Clicking a part with
    /// a bound vector aligns the main camera with it.
    pub bound_vector: Option<Vec3>,
    /// Hit shape.
    pub shape: PartShape,
    /// Current display color.
    pub color: Color,
    /// Whether hovering the part highlights it.
    pub highlightable: bool,
    /// Set on the two rotation arrow halves.
    pub arrow: Option<ArrowSide>,
}

/// Marks the host's main camera.
///
/// The gizmo mirrors this camera's orientation and drives it when the user
/// interacts with the gizmo. Only the first match is used.
#[derive(Component)]
pub struct ViewGizmoTarget;

/// Marker for the gizmo's own camera.
///
/// Spawned by the plugin. Despawn it to tear the gizmo down.
#[derive(Component)]
pub struct ViewGizmoCamera;

/// Gizmo config group for everything the view gizmo draws.
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct ViewGizmoLines;

/// Behavior settings for the view gizmo.
///
/// Pass this to [`crate::ViewGizmoPlugin`]; it is inserted as a resource.
#[derive(Resource, Clone, Debug)]
pub struct ViewGizmoConfig {
    /// World up direction.
    pub up: Vec3,
    /// Face shown before the first sync with the main camera.
    pub initial_face: InitialFace,
    /// Distance from the gizmo camera to the cube center.
    pub gizmo_distance: f32,
    /// Longest press that still counts as a click.
    pub click_threshold: Duration,
    /// Pointer travel in logical pixels beyond which a press becomes a drag.
    pub move_tolerance: f32,
    /// Maximum hover hit tests per second.
    pub hover_rate: f32,
    /// Duration of the face-align animation. Zero jumps instantly.
    pub align_duration: Duration,
    /// Mini-orbit speed when dragging on the gizmo.
    pub orbit_rotate_speed: f32,
    /// Tolerance in radians for classifying a view as axis-aligned.
    pub axis_epsilon: f32,
    /// Vertical field of view of the gizmo camera, in radians.
    pub fov: f32,
    /// Overlay side length in logical pixels.
    pub overlay_size: f32,
    /// Gap between the overlay and the window's top-right corner, in logical pixels.
    pub overlay_margin: f32,
    /// Render layer used by the gizmo camera and its lines.
    pub render_layer: usize,
    /// Camera order of the gizmo camera. Must be above the main camera.
    pub camera_order: isize,
}

impl Default for ViewGizmoConfig {
    fn default() -> Self {
        Self {
            up: Vec3::Y,
            initial_face: InitialFace::Front,
            gizmo_distance: GIZMO_DISTANCE,
            click_threshold: Duration::from_millis(200),
            move_tolerance: 5.0,
            hover_rate: 25.0,
            align_duration: Duration::from_millis(400),
            orbit_rotate_speed: 0.5,
            axis_epsilon: 0.01,
            fov: 30f32.to_radians(),
            overlay_size: 128.0,
            overlay_margin: 8.0,
            render_layer: 31,
            camera_order: 3,
        }
    }
}

/// Visual configuration for the view gizmo.
#[derive(Resource, Clone, Debug)]
pub struct ViewGizmoStyle {
    /// Cube face color.
    pub face_color: Color,
    /// Cube edge color.
    pub edge_color: Color,
    /// Cube corner color.
    pub corner_color: Color,
    /// Rotation arrow color.
    pub arrow_color: Color,
    /// Cube wireframe color.
    pub wireframe_color: Color,
    /// Color of the hovered part.
    pub highlight_color: Color,
    /// Line width of the gizmo lines.
    pub line_width: f32,
    /// Depth bias applied to the gizmo lines.
    pub depth_bias: f32,
}

impl Default for ViewGizmoStyle {
    fn default() -> Self {
        Self {
            face_color: Color::srgb(0.937, 0.953, 0.949),
            edge_color: Color::srgb(0.8, 0.82, 0.81),
            corner_color: Color::srgb(0.8, 0.82, 0.81),
            arrow_color: Color::srgb(0.737, 0.749, 0.745),
            wireframe_color: Color::srgb(0.1, 0.1, 0.1),
            highlight_color: Color::srgb(1.0, 0.85, 0.2),
            line_width: 2.0,
            depth_bias: -0.1,
        }
    }
}

/// Messages emitted by the gizmo for the host application.
#[derive(Message, Clone, Debug)]
pub enum ViewGizmoEvent {
    /// A part was clicked.
    PartClicked {
        /// Name of the clicked part.
        name: String,
        /// Kind of the clicked part.
        kind: PartKind,
    },
    /// The view was rolled by a rotation arrow.
    RotationStep(ArrowSide),
    /// A face-align animation started toward `target`.
    AlignStarted {
        /// Final main camera position.
        target: Vec3,
    },
    /// The face-align animation reached its target.
    AlignFinished,
}

/// Interaction state of the gizmo.
///
/// Holds the pointer state machine, the hover highlight and the camera
/// animator. Reset on teardown.
#[derive(Resource)]
pub struct ViewGizmoState {
    pub(crate) pointer: PointerController,
    pub(crate) highlight: HighlightManager,
    pub(crate) animator: CameraAnimator,
    pub(crate) last_cursor: Option<Vec2>,
    pub(crate) cursor_inside: bool,
}

impl ViewGizmoState {
    /// Creates an idle state using the thresholds in `config`.
    pub fn new(config: &ViewGizmoConfig) -> Self {
        Self {
            pointer: PointerController::new(
                config.click_threshold,
                config.move_tolerance,
                config.hover_rate,
            ),
            highlight: HighlightManager::default(),
            animator: CameraAnimator::default(),
            last_cursor: None,
            cursor_inside: false,
        }
    }

    /// Whether a face-align animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Stop the running face-align animation, leaving the main camera where
    /// it is. Returns `false` when nothing was running.
    pub fn cancel_alignment(&mut self) -> bool {
        self.animator
            .current()
            .is_some_and(|handle| self.animator.cancel(handle))
    }

    /// Id of the highlighted part, if any.
    pub fn hovered_part(&self) -> Option<PartId> {
        self.highlight.hovered()
    }

    /// Whether a press that started over the gizmo is still held. Host
    /// camera controllers should ignore the mouse while this is set.
    pub fn is_pointer_captured(&self) -> bool {
        self.pointer.is_pressed()
    }

    /// Whether the held press turned into a drag.
    pub fn is_dragging(&self) -> bool {
        matches!(self.pointer.phase(), PointerPhase::Dragging(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_faces_look_at_the_cube() {
        for face in [
            InitialFace::Front,
            InitialFace::Back,
            InitialFace::Right,
            InitialFace::Left,
            InitialFace::Top,
            InitialFace::Bottom,
        ] {
            let camera = face.camera_state(GIZMO_DISTANCE, Vec3::Y);
            assert!((camera.position.length() - GIZMO_DISTANCE).abs() < 1e-5);
            assert!(
                (camera.forward() + face.direction()).length() < 1e-5,
                "{face:?} camera should look at the cube center"
            );
        }
    }

    #[test]
    fn front_face_is_the_identity_view() {
        let camera = InitialFace::Front.camera_state(GIZMO_DISTANCE, Vec3::Y);
        assert!(camera.orientation.dot(Quat::IDENTITY).abs() > 1.0 - 1e-6);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, GIZMO_DISTANCE));
    }

    #[test]
    fn cancel_alignment_reports_whether_anything_ran() {
        let mut state = ViewGizmoState::new(&ViewGizmoConfig::default());
        assert!(!state.cancel_alignment());

        state.animator.start(crate::animation::CameraAnimation::new(
            Vec3::Z,
            Vec3::X,
            Vec3::ZERO,
            Duration::ZERO,
            Duration::from_millis(400),
        ));
        assert!(state.is_animating());
        assert!(state.cancel_alignment());
        assert!(!state.is_animating());
    }

    #[test]
    fn pointer_capture_follows_press_and_drag() {
        let mut state = ViewGizmoState::new(&ViewGizmoConfig::default());
        assert!(!state.is_pointer_captured());

        state.pointer.pointer_down(Vec2::ZERO, Duration::ZERO);
        assert!(state.is_pointer_captured());
        assert!(!state.is_dragging());

        state.pointer.pointer_move(Vec2::new(20.0, 0.0), Duration::from_millis(10));
        assert!(state.is_dragging());

        state.pointer.pointer_up(Vec2::new(20.0, 0.0), Duration::from_millis(20));
        assert!(!state.is_pointer_captured());
    }

    #[test]
    fn look_at_own_position_keeps_orientation() {
        let rotation = Quat::from_rotation_x(0.4);
        let mut camera = CameraState::new(Vec3::ONE, rotation, Vec3::Y);
        camera.look_at(Vec3::ONE);
        assert_eq!(camera.orientation, rotation);
    }
}
