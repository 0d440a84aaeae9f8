//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Fixed-step time management
//! - Logging setup

pub mod logging;
pub mod math;
pub mod time;
