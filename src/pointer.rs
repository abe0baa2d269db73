//! Pointer gesture tracking over the gizmo overlay.
//!
//! Turns raw button and cursor samples into hover ticks, drag deltas for the
//! mini-orbit and clicks. A click is a press released within the click
//! threshold that never travelled beyond the movement tolerance.

use std::time::Duration;

use bevy::prelude::*;

use crate::throttle::RateLimiter;
use crate::types::{ArrowSide, GizmoPart};

/// A press in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickSession {
    pub started_at: Duration,
    pub start_position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerPhase {
    #[default]
    Idle,
    /// Button down, still a click candidate.
    Pressed(ClickSession),
    /// Button down and moved too far to be a click.
    Dragging(ClickSession),
}

/// What a pointer move produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveOutcome {
    /// A hover hit test should run for this move.
    pub hover_tick: bool,
    /// Cursor travel since the previous move while the button is held.
    pub drag_delta: Option<Vec2>,
}

/// What a click on a part asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickAction {
    None,
    RotateStep(ArrowSide),
    FaceAlign(Vec3),
}

/// Whether `position` is farther than `tolerance` from `start`.
pub fn has_moved(start: Vec2, position: Vec2, tolerance: f32) -> bool {
    start.distance_squared(position) > tolerance * tolerance
}

pub fn resolve_click(part: Option<&GizmoPart>) -> ClickAction {
    let Some(part) = part else {
        return ClickAction::None;
    };
    if let Some(side) = part.arrow {
        return ClickAction::RotateStep(side);
    }
    match part.bound_vector {
        Some(vector) => ClickAction::FaceAlign(vector),
        None => ClickAction::None,
    }
}

/// Map a cursor position inside `rect` to normalized device coordinates.
pub fn cursor_to_ndc(cursor: Vec2, rect: Rect) -> Option<Vec2> {
    let size = rect.size();
    if size.x <= 0.0 || size.y <= 0.0 || !rect.contains(cursor) {
        return None;
    }
    let local = cursor - rect.min;
    Some(Vec2::new(
        local.x / size.x * 2.0 - 1.0,
        -(local.y / size.y) * 2.0 + 1.0,
    ))
}

#[derive(Debug, Clone)]
pub struct PointerController {
    phase: PointerPhase,
    last_position: Option<Vec2>,
    hover_limiter: RateLimiter,
    click_threshold: Duration,
    move_tolerance: f32,
}

impl PointerController {
    pub fn new(click_threshold: Duration, move_tolerance: f32, hover_rate: f32) -> Self {
        Self {
            phase: PointerPhase::Idle,
            last_position: None,
            hover_limiter: RateLimiter::per_second(hover_rate),
            click_threshold,
            move_tolerance,
        }
    }

    pub fn phase(&self) -> PointerPhase {
        self.phase
    }

    pub fn is_pressed(&self) -> bool {
        !matches!(self.phase, PointerPhase::Idle)
    }

    pub fn pointer_down(&mut self, position: Vec2, now: Duration) {
        self.phase = PointerPhase::Pressed(ClickSession {
            started_at: now,
            start_position: position,
        });
        self.last_position = Some(position);
    }

    pub fn pointer_move(&mut self, position: Vec2, now: Duration) -> MoveOutcome {
        let previous = self.last_position.replace(position);
        let drag_delta = match self.phase {
            PointerPhase::Idle => None,
            PointerPhase::Pressed(session) => {
                if has_moved(session.start_position, position, self.move_tolerance) {
                    self.phase = PointerPhase::Dragging(session);
                }
                previous.map(|p| position - p)
            }
            PointerPhase::Dragging(_) => previous.map(|p| position - p),
        };

        MoveOutcome {
            hover_tick: self.hover_limiter.try_fire(now),
            drag_delta: drag_delta.filter(|d| *d != Vec2::ZERO),
        }
    }

    /// Finish the gesture. Returns the click position when it was a click.
    pub fn pointer_up(&mut self, position: Vec2, now: Duration) -> Option<Vec2> {
        let phase = std::mem::take(&mut self.phase);
        let PointerPhase::Pressed(session) = phase else {
            return None;
        };
        let elapsed = now.saturating_sub(session.started_at);
        if elapsed < self.click_threshold
            && !has_moved(session.start_position, position, self.move_tolerance)
        {
            Some(position)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.phase = PointerPhase::Idle;
        self.last_position = None;
        self.hover_limiter.reset();
    }
}
