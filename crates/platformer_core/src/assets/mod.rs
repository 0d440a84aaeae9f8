//! Asset boundary
//!
//! Level geometry, texture metadata and level contents come from
//! collaborators behind three small traits. [`LevelCatalog`] implements all
//! three from a serde document, so a whole game can be described in one RON
//! or TOML file and loaded through the [`Config`] trait.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::CoreError;
use crate::ecs::factory::EntityFactory;
use crate::foundation::math::{Rect, Vec2};

/// Obstacle rectangles grouped by layer name
pub type ObstacleLayers = BTreeMap<String, Vec<Rect>>;

/// Static collision geometry provider
pub trait ObstacleSource {
    /// Obstacle layers of `level`
    fn obstacle_layers(&self, level: &str) -> Result<ObstacleLayers, CoreError>;
}

/// Texture metadata provider
pub trait TextureSource {
    /// Pixel size of `texture`
    fn texture_size(&self, texture: &str) -> Result<(u32, u32), CoreError>;
}

/// Level content provider
pub trait LevelPopulator {
    /// Create the entities of `level` through `factory`
    fn populate(&self, level: &str, factory: &mut EntityFactory<'_>) -> Result<(), CoreError>;

    /// Track to loop while `level` is played
    fn background_music(&self, _level: &str) -> Option<String> {
        None
    }
}

/// Obstacles and contents of every level, as one collaborator
pub trait LevelSource: ObstacleSource + LevelPopulator {}

impl<T: ObstacleSource + LevelPopulator> LevelSource for T {}

/// One entity placement in a level document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Spawn {
    /// The controlled character
    Player {
        /// Start position
        position: Vec2,
    },
    /// A respawning collectible
    Fruit {
        /// Resting position
        position: Vec2,
        /// Idle strip texture, which picks the fruit
        texture: String,
    },
    /// A patrolling enemy
    RegularEnemy {
        /// Start position
        position: Vec2,
        /// Initial walking direction
        faces_left: bool,
        /// Patrol distance left of the start
        left_range: f32,
        /// Patrol distance right of the start
        right_range: f32,
    },
    /// Exit to the next level
    Portal {
        /// Position
        position: Vec2,
    },
    /// Scrolling background
    Background {
        /// Texture key
        texture: String,
        /// Scroll velocity in pixels per second
        velocity: Vec2,
    },
    /// Level countdown
    Timer {
        /// Label position
        position: Vec2,
        /// Countdown, configuration default when omitted
        duration: Option<f32>,
        /// Whether the countdown runs
        active: bool,
    },
}

/// Everything one level needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    /// Background track
    pub music: Option<String>,
    /// Obstacle rectangles by layer
    pub obstacles: ObstacleLayers,
    /// Entity placements
    pub spawns: Vec<Spawn>,
}

/// In-memory level and texture catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCatalog {
    /// Levels by identifier
    pub levels: BTreeMap<String, LevelData>,
    /// Texture sizes by key
    pub textures: BTreeMap<String, (u32, u32)>,
}

impl LevelCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a level (builder form)
    #[must_use]
    pub fn with_level(mut self, name: impl Into<String>, level: LevelData) -> Self {
        self.levels.insert(name.into(), level);
        self
    }

    /// Add a texture size (builder form)
    #[must_use]
    pub fn with_texture(mut self, key: impl Into<String>, width: u32, height: u32) -> Self {
        self.textures.insert(key.into(), (width, height));
        self
    }

    fn level(&self, level: &str) -> Result<&LevelData, CoreError> {
        self.levels.get(level).ok_or_else(|| CoreError::UnknownLevel(level.to_string()))
    }
}

impl Config for LevelCatalog {}

impl ObstacleSource for LevelCatalog {
    fn obstacle_layers(&self, level: &str) -> Result<ObstacleLayers, CoreError> {
        Ok(self.level(level)?.obstacles.clone())
    }
}

impl TextureSource for LevelCatalog {
    fn texture_size(&self, texture: &str) -> Result<(u32, u32), CoreError> {
        self.textures
            .get(texture)
            .copied()
            .ok_or_else(|| CoreError::resource(texture, "texture is not in the catalog"))
    }
}

impl LevelPopulator for LevelCatalog {
    fn populate(&self, level: &str, factory: &mut EntityFactory<'_>) -> Result<(), CoreError> {
        let data = self.level(level)?;
        log::debug!("populating '{level}' with {} spawn(s)", data.spawns.len());
        for spawn in &data.spawns {
            match spawn {
                Spawn::Player { position } => {
                    factory.create_player(*position)?;
                }
                Spawn::Fruit { position, texture } => {
                    factory.create_fruit(*position, texture)?;
                }
                Spawn::RegularEnemy {
                    position,
                    faces_left,
                    left_range,
                    right_range,
                } => {
                    factory.create_regular_enemy(*position, *faces_left, *left_range, *right_range)?;
                }
                Spawn::Portal { position } => {
                    factory.create_portal(*position)?;
                }
                Spawn::Background { texture, velocity } => {
                    factory.create_parallax_background(self, texture, *velocity)?;
                }
                Spawn::Timer {
                    position,
                    duration,
                    active,
                } => {
                    factory.create_timer(*position, *duration, *active)?;
                }
            }
        }
        Ok(())
    }

    fn background_music(&self, level: &str) -> Option<String> {
        self.levels.get(level).and_then(|data| data.music.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    fn sample() -> LevelCatalog {
        let mut obstacles = ObstacleLayers::new();
        obstacles.insert("solid".to_string(), vec![Rect::new(0, 128, 640, 32)]);
        LevelCatalog::new()
            .with_level(
                "Level1",
                LevelData {
                    music: Some("theme".to_string()),
                    obstacles,
                    spawns: vec![Spawn::Player { position: Vec2::new(10.0, 20.0) }],
                },
            )
            .with_texture("sky", 64, 64)
    }

    #[test]
    fn test_obstacles_by_level() {
        let catalog = sample();
        let layers = catalog.obstacle_layers("Level1").unwrap();
        assert_eq!(layers["solid"], vec![Rect::new(0, 128, 640, 32)]);
        assert!(matches!(catalog.obstacle_layers("Nope"), Err(CoreError::UnknownLevel(_))));
    }

    #[test]
    fn test_texture_lookup() {
        let catalog = sample();
        assert_eq!(catalog.texture_size("sky").unwrap(), (64, 64));
        assert!(matches!(catalog.texture_size("sea"), Err(CoreError::ResourceLoad { .. })));
    }

    #[test]
    fn test_background_music() {
        let catalog = sample();
        assert_eq!(catalog.background_music("Level1").as_deref(), Some("theme"));
        assert_eq!(catalog.background_music("Level2"), None);
    }

    #[test]
    fn test_catalog_ron_round_trip() {
        let catalog = sample();
        let text = catalog.to_text(ConfigFormat::Ron).unwrap();
        assert_eq!(LevelCatalog::from_text(&text, ConfigFormat::Ron).unwrap(), catalog);
    }
}
