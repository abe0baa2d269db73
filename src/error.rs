//! Errors returned by the camera synchronizer.

use thiserror::Error;

/// Reasons a main-camera sync pass was skipped.
///
/// Neither variant mutates the camera; callers log and carry on.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// The host controls have not reported a focus point yet.
    #[error("main camera controls have no focus point")]
    MissingFocus,
    /// The gizmo looks straight along the world up axis, so a yaw-locked
    /// camera has no horizontal heading to follow.
    #[error("gizmo view direction is parallel to the world up axis")]
    DegenerateDirection,
}
