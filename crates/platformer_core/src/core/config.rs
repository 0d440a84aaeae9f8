//! # Game Configuration
//!
//! Every tunable constant of the simulation lives here, grouped by subsystem.
//! Defaults reproduce the shipped game feel; any section may be overridden
//! from a TOML or RON file through the [`Config`] trait.
//!
//! ## Configuration Categories
//!
//! - **Engine**: logging
//! - **Screen**: logical view size, which also bounds the level
//! - **Physics**: gravity, jump/walk speeds, stomp bounce, step rate
//! - **Animation**: default playback rate for sprite strips
//! - **Levels**: level rotation, obstacle layer names, lifecycle timings
//! - **Input**: key bindings for the player

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::input::KeyBindings;

/// # Engine Settings
///
/// Logging behavior of the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Default log filter, used when `RUST_LOG` is not set
    pub log_level: String,
}

impl EngineSettings {
    /// Create engine settings with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// # Screen Configuration
///
/// The logical view. Its height is also the kill plane: anything falling
/// past it reloads the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// View width in pixels
    pub width: u32,
    /// View height in pixels
    pub height: u32,
}

impl ScreenConfig {
    /// Create the default 640x368 view
    pub const fn new() -> Self {
        Self { width: 640, height: 368 }
    }

    /// Set the view size
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Validate the view size
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("Screen size must be non-zero, got {}x{}", self.width, self.height));
        }
        Ok(())
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Physics Configuration
///
/// Kinematic constants in pixels and seconds. Negative Y is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration applied while airborne
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative, upward)
    pub jump_speed: f32,
    /// Horizontal walk speed and airborne horizontal clamp
    pub walk_speed: f32,
    /// Horizontal bounce after a stomp, multiplied by facing
    pub stomp_bounce_x: f32,
    /// Upward bounce after a stomp
    pub stomp_bounce_y: f32,
    /// Fixed simulation rate
    pub steps_per_second: f32,
}

impl PhysicsConfig {
    /// Create physics constants with defaults
    pub const fn new() -> Self {
        Self {
            gravity: 2000.0,
            jump_speed: -500.0,
            walk_speed: 100.0,
            stomp_bounce_x: -50.0,
            stomp_bounce_y: 300.0,
            steps_per_second: 60.0,
        }
    }

    /// Set gravity
    pub const fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set jump and walk speeds
    pub const fn with_speeds(mut self, jump_speed: f32, walk_speed: f32) -> Self {
        self.jump_speed = jump_speed;
        self.walk_speed = walk_speed;
        self
    }

    /// Validate physics constants
    pub fn validate(&self) -> Result<(), String> {
        if self.gravity <= 0.0 {
            return Err(format!("Gravity must be positive, got {}", self.gravity));
        }
        if self.jump_speed >= 0.0 {
            return Err(format!("Jump speed must be negative (upward), got {}", self.jump_speed));
        }
        if self.walk_speed <= 0.0 {
            return Err(format!("Walk speed must be positive, got {}", self.walk_speed));
        }
        if self.steps_per_second < 1.0 {
            return Err(format!("Step rate must be at least 1, got {}", self.steps_per_second));
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Animation Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frames per second for every sprite strip created by the factories
    pub frames_per_second: f32,
}

impl AnimationConfig {
    /// Create animation settings with defaults
    pub const fn new() -> Self {
        Self { frames_per_second: 20.0 }
    }

    /// Validate animation settings
    pub fn validate(&self) -> Result<(), String> {
        if self.frames_per_second <= 0.0 {
            return Err(format!("Animation rate must be positive, got {}", self.frames_per_second));
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Level Configuration
///
/// Level rotation plus the lifecycle timings applied to spawned entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Level identifiers in play order; transitions wrap around
    pub levels: Vec<String>,
    /// Obstacle layer that blocks from every side
    pub solid_layer: String,
    /// Obstacle layer that only blocks from above
    pub float_layer: String,
    /// Seconds a respawnable entity stays gone after its death animation
    pub respawn_delay: f32,
    /// Countdown used by timer entities when a level does not override it
    pub timer_duration: f32,
}

impl LevelConfig {
    /// Create level settings with defaults
    pub fn new() -> Self {
        Self {
            levels: vec!["Level1".to_string(), "Level2".to_string()],
            solid_layer: "solid".to_string(),
            float_layer: "float".to_string(),
            respawn_delay: 5.0,
            timer_duration: 10.0,
        }
    }

    /// Replace the level rotation
    pub fn with_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = levels.into_iter().map(Into::into).collect();
        self
    }

    /// Set respawn delay
    pub fn with_respawn_delay(mut self, seconds: f32) -> Self {
        self.respawn_delay = seconds;
        self
    }

    /// Obstacle layer names in resolution order
    pub fn obstacle_layers(&self) -> [&str; 2] {
        [self.solid_layer.as_str(), self.float_layer.as_str()]
    }

    /// Validate level settings
    pub fn validate(&self) -> Result<(), String> {
        if self.levels.is_empty() {
            return Err("At least one level must be configured".to_string());
        }
        if self.solid_layer == self.float_layer {
            return Err(format!("Solid and float layers share the name '{}'", self.solid_layer));
        }
        if self.respawn_delay < 0.0 {
            return Err(format!("Respawn delay must not be negative, got {}", self.respawn_delay));
        }
        Ok(())
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Game Configuration
///
/// Top-level configuration handed to the world and every system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Engine settings
    pub engine: EngineSettings,
    /// View configuration
    pub screen: ScreenConfig,
    /// Physics constants
    pub physics: PhysicsConfig,
    /// Animation settings
    pub animation: AnimationConfig,
    /// Level rotation and lifecycle timings
    pub levels: LevelConfig,
    /// Player key bindings
    pub input: KeyBindings,
}

impl GameConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the physics section
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Replace the level section
    pub fn with_levels(mut self, levels: LevelConfig) -> Self {
        self.levels = levels;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.screen.validate()?;
        self.physics.validate()?;
        self.animation.validate()?;
        self.levels.validate()?;
        Ok(())
    }

    /// Load and validate a configuration file
    pub fn load_validated(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Bottom of the playable area in world units
    pub fn level_bottom(&self) -> f32 {
        self.screen.height as f32
    }
}

impl Config for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_validate() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.screen.width, 640);
        assert_eq!(config.screen.height, 368);
        assert_eq!(config.physics.gravity, 2000.0);
        assert_eq!(config.physics.jump_speed, -500.0);
        assert_eq!(config.levels.obstacle_layers(), ["solid", "float"]);
    }

    #[test]
    fn test_invalid_sections_rejected() {
        let config = GameConfig::default().with_physics(PhysicsConfig::new().with_gravity(0.0));
        assert!(config.validate().is_err());

        let config = GameConfig::default().with_levels(LevelConfig::new().with_levels(Vec::<String>::new()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = "[physics]\ngravity = 1500.0\n";
        let config = GameConfig::from_text(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.physics.gravity, 1500.0);
        assert_eq!(config.physics.walk_speed, 100.0);
        assert_eq!(config.screen, ScreenConfig::default());
    }
}
