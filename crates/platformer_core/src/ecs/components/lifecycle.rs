//! Respawn component for entities that come back after dying
//!
//! The death system starts the countdown once the death animation has
//! played; the respawn system advances it while the entity is inactive.

use crate::foundation::math::Vec2;

/// Respawn point and countdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespawnComponent {
    position: Vec2,
    delay: f32,
    elapsed: f32,
    respawning: bool,
}

impl RespawnComponent {
    /// Create a respawn point reached `delay` seconds after the countdown starts
    pub const fn new(position: Vec2, delay: f32) -> Self {
        Self {
            position,
            delay,
            elapsed: 0.0,
            respawning: false,
        }
    }

    /// Where the entity reappears
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Configured delay in seconds
    pub const fn delay(&self) -> f32 {
        self.delay
    }

    /// Whether the countdown is running
    pub const fn is_respawning(&self) -> bool {
        self.respawning
    }

    /// Start (or restart) the countdown
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.respawning = true;
    }

    /// Advance the countdown; returns true on the tick it completes
    pub fn advance(&mut self, delta_time: f32) -> bool {
        if !self.respawning {
            return false;
        }
        self.elapsed += delta_time;
        if self.elapsed >= self.delay {
            self.respawning = false;
            return true;
        }
        false
    }
}
