//! Time management utilities
//!
//! The simulation advances in fixed physics steps; `FixedTimestep` converts
//! variable frame time into a whole number of those steps.

use std::time::Instant;

/// Fixed-step accumulator for the simulation loop
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    total_time: f32,
    step_count: u64,
}

impl FixedTimestep {
    /// Upper bound on steps produced by one `accumulate` call
    pub const MAX_STEPS_PER_FRAME: u32 = 8;

    /// Create an accumulator running at `steps_per_second`
    pub fn new(steps_per_second: f32) -> Self {
        Self {
            step: 1.0 / steps_per_second.max(1.0),
            accumulator: 0.0,
            total_time: 0.0,
            step_count: 0,
        }
    }

    /// Length of one step in seconds
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Add frame time and return how many fixed steps are due
    ///
    /// Backlog beyond `MAX_STEPS_PER_FRAME` is dropped so a stalled frame
    /// does not snowball.
    pub fn accumulate(&mut self, frame_time: f32) -> u32 {
        self.accumulator += frame_time.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step && steps < Self::MAX_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == Self::MAX_STEPS_PER_FRAME {
            self.accumulator = 0.0;
        }
        self.total_time += self.step * steps as f32;
        self.step_count += u64::from(steps);
        steps
    }

    /// Simulated time in seconds
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of steps produced so far
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }
}

/// Wall-clock frame timer
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_whole_steps() {
        let mut timestep = FixedTimestep::new(4.0);
        assert_eq!(timestep.accumulate(0.125), 0);
        assert_eq!(timestep.accumulate(0.125), 1);
        assert_eq!(timestep.accumulate(0.625), 2);
        assert_eq!(timestep.step_count(), 3);
    }

    #[test]
    fn test_accumulate_drops_backlog() {
        let mut timestep = FixedTimestep::new(10.0);
        assert_eq!(timestep.accumulate(10.0), FixedTimestep::MAX_STEPS_PER_FRAME);
        assert_eq!(timestep.accumulate(0.0), 0);
    }
}
