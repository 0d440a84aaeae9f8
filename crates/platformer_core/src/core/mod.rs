//! # Core Module
//!
//! Shared abstractions every subsystem depends on.
//!
//! ## Organization
//!
//! - **Config**: Game configuration grouped by subsystem
//! - **Error**: The crate-wide error type

pub mod config;
pub mod error;

pub use config::{
    AnimationConfig, Config, ConfigError, EngineSettings, GameConfig, LevelConfig, PhysicsConfig,
    ScreenConfig,
};
pub use error::CoreError;
