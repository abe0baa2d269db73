//! Frame-driven camera animation.
//!
//! The face-align click moves the main camera from where it is to a target
//! position over a fixed duration. The [`CameraAnimator`] owns at most one such
//! animation; a system steps it once per frame.

use std::time::Duration;

use bevy::prelude::*;

use crate::math::EPSILON;
use crate::sync::face_align_pose;
use crate::types::CameraState;

/// Opaque id of an in-flight animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

/// Move a camera from `start` to `target`, looking at `focus` throughout.
#[derive(Debug, Clone, Copy)]
pub struct CameraAnimation {
    pub start: Vec3,
    pub target: Vec3,
    pub focus: Vec3,
    pub started_at: Duration,
    pub duration: Duration,
}

impl CameraAnimation {
    pub fn new(
        start: Vec3,
        target: Vec3,
        focus: Vec3,
        started_at: Duration,
        duration: Duration,
    ) -> Self {
        Self {
            start,
            target,
            focus,
            started_at,
            duration,
        }
    }

    /// Normalized progress in `[0, 1]`. A zero duration is already done.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Position at progress `t`.
    ///
    /// The direction from the focus is slerped and the distance lerped, so
    /// the camera swings around the focus instead of cutting through it.
    pub fn position_at(&self, t: f32) -> Vec3 {
        if t >= 1.0 {
            return self.target;
        }
        let from = self.start - self.focus;
        let to = self.target - self.focus;
        let (from_len, to_len) = (from.length(), to.length());
        if from_len < EPSILON || to_len < EPSILON {
            return self.start.lerp(self.target, t);
        }

        let from_dir = from / from_len;
        let to_dir = to / to_len;
        let arc = Quat::from_rotation_arc(from_dir, to_dir);
        let dir = Quat::IDENTITY.slerp(arc, t) * from_dir;
        self.focus + dir * (from_len + (to_len - from_len) * t)
    }
}

/// Result of stepping the animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationStep {
    /// Nothing to animate.
    Idle,
    /// Moved the camera; more frames follow.
    Running(AnimationHandle),
    /// Moved the camera onto its target; the animation is gone.
    Finished(AnimationHandle),
}

/// Owner of the current camera animation.
///
/// Starting a new animation supersedes the old one. Canceling a handle that is
/// no longer current does nothing.
#[derive(Debug, Default)]
pub struct CameraAnimator {
    next_id: u64,
    current: Option<(AnimationHandle, CameraAnimation)>,
}

impl CameraAnimator {
    pub fn start(&mut self, animation: CameraAnimation) -> AnimationHandle {
        let handle = AnimationHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        if let Some((previous, _)) = self.current.replace((handle, animation)) {
            debug!(?previous, ?handle, "view gizmo animation superseded");
        }
        handle
    }

    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        match self.current {
            Some((current, _)) if current == handle => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<AnimationHandle> {
        self.current.map(|(handle, _)| handle)
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Advance the current animation to `now` and pose `camera` accordingly.
    pub fn step(&mut self, now: Duration, camera: &mut CameraState, world_up: Vec3) -> AnimationStep {
        let Some((handle, animation)) = self.current else {
            return AnimationStep::Idle;
        };

        let t = animation.progress(now);
        let position = animation.position_at(t);
        face_align_pose(camera, animation.focus, position, world_up);

        if t >= 1.0 {
            self.current = None;
            AnimationStep::Finished(handle)
        } else {
            AnimationStep::Running(handle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn camera() -> CameraState {
        CameraState::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y)
    }

    fn to_right(started_at: Duration, duration: Duration) -> CameraAnimation {
        CameraAnimation::new(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::ZERO,
            started_at,
            duration,
        )
    }

    #[test]
    fn runs_until_duration_then_lands_on_target() {
        let mut animator = CameraAnimator::default();
        let mut cam = camera();
        let handle = animator.start(to_right(ms(1000), ms(400)));

        assert_eq!(animator.step(ms(1200), &mut cam, Vec3::Y), AnimationStep::Running(handle));
        assert!(
            (cam.position.length() - 10.0).abs() < 1e-3,
            "camera should keep its distance mid-flight, got {}",
            cam.position.length()
        );
        assert!(cam.position.x > 0.0 && cam.position.z > 0.0);
        let to_focus = -cam.position.normalize();
        assert!((cam.forward() - to_focus).length() < 1e-4, "looks at focus every frame");

        assert_eq!(animator.step(ms(1400), &mut cam, Vec3::Y), AnimationStep::Finished(handle));
        assert_eq!(cam.position, Vec3::new(10.0, 0.0, 0.0));
        assert!(!animator.is_running());
        assert_eq!(animator.step(ms(1500), &mut cam, Vec3::Y), AnimationStep::Idle);
    }

    #[test]
    fn zero_duration_jumps_on_first_step() {
        let mut animator = CameraAnimator::default();
        let mut cam = camera();
        let handle = animator.start(to_right(ms(0), Duration::ZERO));
        assert_eq!(animator.step(ms(0), &mut cam, Vec3::Y), AnimationStep::Finished(handle));
        assert_eq!(cam.position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn new_animation_supersedes_and_stale_cancel_is_noop() {
        let mut animator = CameraAnimator::default();
        let first = animator.start(to_right(ms(0), ms(400)));
        let second = animator.start(to_right(ms(100), ms(400)));
        assert_ne!(first, second);
        assert_eq!(animator.current(), Some(second));

        assert!(!animator.cancel(first), "stale handle must not cancel");
        assert_eq!(animator.current(), Some(second));
        assert!(animator.cancel(second));
        assert_eq!(animator.current(), None);
    }

    #[test]
    fn opposite_target_swings_around_focus() {
        let animation = CameraAnimation::new(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::ZERO,
            ms(0),
            ms(400),
        );
        let mid = animation.position_at(0.5);
        assert!(
            (mid.length() - 10.0).abs() < 1e-3,
            "midpoint should not pass through the focus, got {mid:?}"
        );
    }
}
