//! Movement component for entities that move in screen space
//!
//! Position is private so every write goes through [`MovementComponent::set_position`],
//! which keeps `last_position` exactly one write behind. Collision resolution
//! relies on that trailing value to tell a landing from a side hit.

use crate::foundation::math::Vec2;

/// Kinematic state of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementComponent {
    position: Vec2,
    last_position: Vec2,

    /// Linear velocity in pixels per second
    pub velocity: Vec2,

    /// Linear acceleration in pixels per second squared
    pub acceleration: Vec2,
}

impl MovementComponent {
    /// Create a resting movement component at `position`
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            last_position: position,
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
        }
    }

    /// Current position (top-left of the sprite)
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Position before the most recent write
    pub const fn last_position(&self) -> Vec2 {
        self.last_position
    }

    /// Store a new position, shifting the current one into `last_position`
    pub fn set_position(&mut self, position: Vec2) {
        self.last_position = self.position;
        self.position = position;
    }

    /// Zero velocity and acceleration
    pub fn stop(&mut self) {
        self.velocity = Vec2::zeros();
        self.acceleration = Vec2::zeros();
    }

    /// Semi-implicit Euler step
    ///
    /// Acceleration feeds velocity first; when `max_horizontal_speed` is given
    /// the horizontal velocity is clamped before it feeds position.
    pub fn integrate(&mut self, delta_time: f32, max_horizontal_speed: Option<f32>) {
        self.velocity += self.acceleration * delta_time;
        if let Some(limit) = max_horizontal_speed {
            self.velocity.x = self.velocity.x.clamp(-limit, limit);
        }
        let next = self.position + self.velocity * delta_time;
        self.set_position(next);
    }
}

impl Default for MovementComponent {
    fn default() -> Self {
        Self::new(Vec2::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_position_lags_one_write() {
        let mut movement = MovementComponent::new(Vec2::new(0.0, 0.0));
        let writes = [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)];
        for (index, &position) in writes.iter().enumerate() {
            movement.set_position(position);
            assert_eq!(movement.position(), position);
            if index > 0 {
                assert_eq!(movement.last_position(), writes[index - 1]);
            }
        }
        assert_ne!(movement.last_position(), movement.position());
    }

    #[test]
    fn test_integrate_clamps_horizontal_speed() {
        let mut movement = MovementComponent::new(Vec2::new(10.0, 10.0));
        movement.velocity = Vec2::new(250.0, 0.0);
        movement.acceleration = Vec2::new(0.0, 100.0);
        movement.integrate(0.5, Some(100.0));

        assert_eq!(movement.velocity, Vec2::new(100.0, 50.0));
        assert_eq!(movement.position(), Vec2::new(60.0, 35.0));
        assert_eq!(movement.last_position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_integrate_without_clamp() {
        let mut movement = MovementComponent::default();
        movement.velocity = Vec2::new(-300.0, 0.0);
        movement.integrate(1.0, None);
        assert_eq!(movement.position(), Vec2::new(-300.0, 0.0));
    }

    #[test]
    fn test_stop_clears_motion() {
        let mut movement = MovementComponent::default();
        movement.velocity = Vec2::new(1.0, 1.0);
        movement.acceleration = Vec2::new(2.0, 2.0);
        movement.stop();
        assert_eq!(movement.velocity, Vec2::zeros());
        assert_eq!(movement.acceleration, Vec2::zeros());
    }
}
