//! Level countdown component

use crate::foundation::math::Vec2;

/// Countdown shown on screen; reaching zero ends the level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerComponent {
    remaining: f32,
    position: Vec2,
    expired: bool,
}

impl TimerComponent {
    /// Create a countdown of `duration` seconds drawn at `position`
    pub const fn new(duration: f32, position: Vec2) -> Self {
        Self {
            remaining: duration,
            position,
            expired: false,
        }
    }

    /// Seconds left, never negative
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Where the label is drawn
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Count down; returns true only on the tick the timer reaches zero
    pub fn advance(&mut self, delta_time: f32) -> bool {
        if self.expired {
            return false;
        }
        self.remaining -= delta_time;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.expired = true;
            return true;
        }
        false
    }

    /// Remaining time as `MM:SS`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn label(&self) -> String {
        let whole = self.remaining as u32;
        format!("{:02}:{:02}", whole / 60, whole % 60)
    }
}
