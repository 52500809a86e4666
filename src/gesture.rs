//! Pinch and pan gesture reconciliation
//!
//! Touch input arrives as snapshots of the still-active contact points after
//! each platform event, matching touch-list semantics. The reconciler is an
//! explicit state machine; every transition and clamp lives here. During a
//! gesture only the visual transform changes (the host repaints the existing
//! page element); the durable zoom level moves once, at release, when the
//! accumulated scale is reconciled through the session.

use crate::zoom::Zoom;

/// One active touch contact in container coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Self) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Visual-only transform for the page element during a gesture, with the
/// transform origin at the page's top-left corner. Never triggers a
/// re-render; reset to identity when one completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl VisualTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for VisualTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What the caller should do after feeding one touch event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Nothing changed
    None,
    /// Repaint the page element with the new visual transform
    VisualChanged(VisualTransform),
    /// Pinch released outside the deadband: fold `scale` into the durable
    /// zoom level and re-render once
    Reconcile { scale: f32 },
}

/// Gesture phase with its associated data.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Pinching {
        /// Inter-contact distance when the second finger landed
        start_distance: f32,
        /// Visual scale when the pinch began; the live scale is relative
        /// to it
        start_scale: f32,
    },
    Panning {
        /// Contact position minus the translation at grab time, so the
        /// content follows the finger from wherever it was grabbed
        grab_x: f32,
        grab_y: f32,
    },
}

/// The pinch/pan state machine for one page element.
#[derive(Clone, Debug)]
pub struct GestureReconciler {
    phase: Phase,
    visual: VisualTransform,
}

impl Default for GestureReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureReconciler {
    /// Released pinches whose scale is within this distance of 1.0 are
    /// discarded instead of reconciled.
    pub const DEADBAND: f32 = 0.1;

    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            visual: VisualTransform::IDENTITY,
        }
    }

    /// Current visual transform for the page element
    pub fn visual(&self) -> VisualTransform {
        self.visual
    }

    /// Feeds the active contacts after a touch-start event. `zoom_level` is
    /// the durable zoom; single-contact panning is only allowed when it
    /// exceeds 1.0 (content larger than the container).
    pub fn touch_start(&mut self, points: &[TouchPoint], zoom_level: f32) -> GestureOutcome {
        match points {
            [a, b] => {
                let start_distance = a.distance_to(*b);
                if start_distance > 0.0 {
                    self.phase = Phase::Pinching {
                        start_distance,
                        start_scale: self.visual.scale,
                    };
                }
            }
            [point] if zoom_level > 1.0 => {
                self.phase = Phase::Panning {
                    grab_x: point.x - self.visual.translate_x,
                    grab_y: point.y - self.visual.translate_y,
                };
            }
            _ => {}
        }
        GestureOutcome::None
    }

    /// Feeds the active contacts after a touch-move event.
    pub fn touch_move(&mut self, points: &[TouchPoint]) -> GestureOutcome {
        match (self.phase, points) {
            (
                Phase::Pinching {
                    start_distance,
                    start_scale,
                },
                [a, b],
            ) => {
                let scale = (a.distance_to(*b) / start_distance) * start_scale;
                self.visual.scale = Zoom::clamp_gesture(scale);
                GestureOutcome::VisualChanged(self.visual)
            }
            (Phase::Panning { grab_x, grab_y }, [point]) => {
                self.visual.translate_x = point.x - grab_x;
                self.visual.translate_y = point.y - grab_y;
                GestureOutcome::VisualChanged(self.visual)
            }
            _ => GestureOutcome::None,
        }
    }

    /// Feeds the contacts still active after a touch-end event. Dropping
    /// below two contacts ends a pinch: outside the deadband the
    /// accumulated scale is handed back for reconciliation (the visual
    /// transform keeps showing it until the re-render resets everything);
    /// inside the deadband the pre-gesture scale is restored.
    pub fn touch_end(&mut self, remaining: &[TouchPoint]) -> GestureOutcome {
        let mut outcome = GestureOutcome::None;

        if remaining.len() < 2 {
            if let Phase::Pinching { start_scale, .. } = self.phase {
                self.phase = Phase::Idle;
                let scale = self.visual.scale;
                if (scale - 1.0).abs() > Self::DEADBAND {
                    outcome = GestureOutcome::Reconcile { scale };
                } else {
                    self.visual.scale = start_scale;
                    outcome = GestureOutcome::VisualChanged(self.visual);
                }
            }
        }

        if remaining.is_empty() && matches!(self.phase, Phase::Panning { .. }) {
            // Pan translation persists visually until the next render reset.
            self.phase = Phase::Idle;
        }

        outcome
    }

    /// Called when a render completes: the page element is recreated, so the
    /// visual transform rebinds at identity and any in-flight gesture is
    /// abandoned.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.visual = VisualTransform::IDENTITY;
    }
}
