//! Gesture module - drag-to-rotate state machine for the dial
//!
//! The host feeds pointer events in screen space; every transition is a pure
//! function of the current state and one event, so whole drag sequences can be
//! replayed in tests without a window.

use crate::geometry::{angle_from_screen_point, DialPoint};

/// One pointer event from the host input system
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Pointer went down. `center` is the dial's on-screen centre if layout
    /// has been measured yet.
    Start {
        pointer: DialPoint,
        center: Option<DialPoint>,
    },
    Move {
        pointer: DialPoint,
    },
    /// Pointer released or the gesture was cancelled
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging {
        /// Dial centre captured when the drag began
        center: DialPoint,
        start_angle: f64,
        /// Unwrapped: follows the pointer continuously past 0°/360°
        current_angle: f64,
    },
}

/// Rotation of the dial, persisted across drags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    /// Rotation in effect between gestures. Never reduced modulo 360.
    ///
    /// Drags are unwrapped, so a drag across 0° adds its short way round:
    /// 350° to 10° commits -20 rather than +340.
    pub committed: f64,
    pub phase: GesturePhase,
}

impl RotationState {
    pub fn new(initial_rotation: f64) -> Self {
        Self {
            committed: initial_rotation,
            phase: GesturePhase::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    /// Apply one event and return the next state
    pub fn transition(self, event: GestureEvent) -> Self {
        match (self.phase, event) {
            (GesturePhase::Idle, GestureEvent::Start { pointer, center }) => match center {
                Some(center) => {
                    let angle = angle_from_screen_point(pointer, center);
                    Self {
                        phase: GesturePhase::Dragging {
                            center,
                            start_angle: angle,
                            current_angle: angle,
                        },
                        ..self
                    }
                }
                None => {
                    log::debug!("Dial not laid out yet, ignoring drag start");
                    self
                }
            },
            (
                GesturePhase::Dragging {
                    center,
                    start_angle,
                    current_angle,
                },
                GestureEvent::Move { pointer },
            ) => {
                let raw = angle_from_screen_point(pointer, center);
                Self {
                    phase: GesturePhase::Dragging {
                        center,
                        start_angle,
                        current_angle: current_angle + shortest_step(current_angle, raw),
                    },
                    ..self
                }
            }
            (GesturePhase::Dragging { .. }, GestureEvent::End) => Self {
                committed: self.rendered_rotation(),
                phase: GesturePhase::Idle,
            },
            // A second pointer-down mid-drag, or stray moves/ends while idle
            _ => self,
        }
    }

    /// Rotation change contributed by the drag in progress
    pub fn drag_delta(&self) -> f64 {
        match self.phase {
            GesturePhase::Dragging {
                start_angle,
                current_angle,
                ..
            } => start_angle - current_angle,
            GesturePhase::Idle => 0.0,
        }
    }

    /// Rotation to draw this frame, unbounded
    pub fn rendered_rotation(&self) -> f64 {
        self.committed + self.drag_delta()
    }

    /// Rendered rotation reduced into [0, 360) for the visual transform
    pub fn visual_rotation(&self) -> f64 {
        self.rendered_rotation().rem_euclid(360.0)
    }
}

/// Signed step in (-180, 180] taking `from` to an angle equivalent to `to`
fn shortest_step(from: f64, to: f64) -> f64 {
    let step = (to - from).rem_euclid(360.0);
    if step > 180.0 {
        step - 360.0
    } else {
        step
    }
}
