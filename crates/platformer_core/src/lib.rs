//! # Platformer Core
//!
//! Simulation core of a 2D tile-based platformer, written around an
//! Entity-Component-System.
//!
//! ## Features
//!
//! - **ECS Architecture**: slot-map entities, typed component columns and a
//!   fixed-order system scheduler
//! - **Message Bus**: synchronous publish/subscribe with deferred structural
//!   changes
//! - **Level Lifecycle**: load, reload, next and previous level with rollback
//!   on a failed load
//! - **Headless Boundaries**: input, rendering, audio and level data sit
//!   behind small traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platformer_core::prelude::*;
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = GameConfig::default();
//!     let levels = LevelCatalog::load_from_file("levels.ron")?;
//!     let mut world = World::new(config, levels);
//!     world.load_level(0)?;
//!
//!     let mut timestep = FixedTimestep::new(60.0);
//!     for _ in 0..timestep.accumulate(1.0 / 30.0) {
//!         world.advance(timestep.step())?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc
)]

pub mod assets;
pub mod audio;
pub mod config;
pub mod core;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod input;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{LevelCatalog, LevelData, LevelSource, Spawn},
        audio::{AudioSink, SilentAudio},
        config::Config,
        core::{CoreError, GameConfig},
        ecs::{Entity, EntityFactory, EntityRegistry, LevelRequest, System, World},
        events::{EventBus, Message, MessageKind},
        foundation::{
            math::{Rect, Vec2},
            time::FixedTimestep,
        },
        input::{InputSource, KeyCode, KeyboardState},
        render::{DrawCommand, RecordingSurface, RenderSurface},
    };
}
