//! Durable zoom level with button- and gesture-path clamping
//!
//! Two clamp ranges coexist deliberately: button steps stay within
//! `[0.5, 3.0]` while pinch reconciliation is allowed up to `4.0`, the wider
//! range the touch path has always had. A pinch can therefore land above the
//! button ceiling; the next button step clamps back into the button range.

/// Durable zoom level. 1.0 means the page exactly fits the container width;
/// the transient visual scale of an active pinch lives in the gesture
/// reconciler, not here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    level: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { level: 1.0 }
    }
}

impl Zoom {
    /// Multiplier per button step, symmetric in and out
    pub const STEP_RATE: f32 = 1.25;
    /// Minimum level reachable through the zoom buttons
    pub const BUTTON_MIN: f32 = 0.5;
    /// Maximum level reachable through the zoom buttons
    pub const BUTTON_MAX: f32 = 3.0;
    /// Minimum level reachable through pinch reconciliation
    pub const GESTURE_MIN: f32 = 0.5;
    /// Maximum level reachable through pinch reconciliation
    pub const GESTURE_MAX: f32 = 4.0;

    /// Current zoom level
    #[must_use]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Zoom in by one button step
    pub fn step_in(&mut self) {
        self.level = Self::clamp_button(self.level * Self::STEP_RATE);
    }

    /// Zoom out by one button step
    pub fn step_out(&mut self) {
        self.level = Self::clamp_button(self.level / Self::STEP_RATE);
    }

    /// Reconciles a finished pinch by multiplying in the accumulated
    /// gesture scale
    pub fn apply_gesture(&mut self, gesture_scale: f32) {
        self.level = Self::clamp_gesture(self.level * gesture_scale);
    }

    /// Clamp to the button range, handling NaN/Inf
    pub fn clamp_button(level: f32) -> f32 {
        if level.is_finite() {
            level.clamp(Self::BUTTON_MIN, Self::BUTTON_MAX)
        } else {
            1.0
        }
    }

    /// Clamp to the gesture range, handling NaN/Inf
    pub fn clamp_gesture(level: f32) -> f32 {
        if level.is_finite() {
            level.clamp(Self::GESTURE_MIN, Self::GESTURE_MAX)
        } else {
            1.0
        }
    }
}
