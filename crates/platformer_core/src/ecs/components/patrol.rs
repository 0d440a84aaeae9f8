//! Enemy patrol component
//!
//! Stores the horizontal range an enemy walks and the bound it last touched.

/// Patrol range around a start position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyPatrolComponent {
    left_bound: f32,
    right_bound: f32,
    at_left_bound: bool,
    at_right_bound: bool,
}

impl EnemyPatrolComponent {
    /// Patrol from `start - left_range` to `start + right_range`
    pub const fn new(start: f32, left_range: f32, right_range: f32) -> Self {
        Self {
            left_bound: start - left_range,
            right_bound: start + right_range,
            at_left_bound: false,
            at_right_bound: false,
        }
    }

    /// Patrol bounds as (left, right)
    pub const fn bounds(&self) -> (f32, f32) {
        (self.left_bound, self.right_bound)
    }

    /// Recompute bound flags from the current X position
    pub fn update(&mut self, position_x: f32) {
        self.at_left_bound = position_x <= self.left_bound;
        self.at_right_bound = !self.at_left_bound && position_x >= self.right_bound;
    }

    /// The left bound was reached; walk right
    pub const fn should_turn_right(&self) -> bool {
        self.at_left_bound
    }

    /// The right bound was reached; walk left
    pub const fn should_turn_left(&self) -> bool {
        self.at_right_bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_flags() {
        let mut patrol = EnemyPatrolComponent::new(100.0, 50.0, 50.0);
        assert_eq!(patrol.bounds(), (50.0, 150.0));

        patrol.update(100.0);
        assert!(!patrol.should_turn_left() && !patrol.should_turn_right());

        patrol.update(150.0);
        assert!(patrol.should_turn_left());

        patrol.update(49.0);
        assert!(patrol.should_turn_right());
        assert!(!patrol.should_turn_left());
    }
}
