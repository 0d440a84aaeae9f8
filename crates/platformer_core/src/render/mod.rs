//! Render boundary
//!
//! Systems describe what to draw; a [`RenderSurface`] decides how. The core
//! ships [`RecordingSurface`], which stores the draw calls instead of
//! rasterizing them, for headless hosts and tests.

use std::collections::HashMap;

use crate::foundation::math::{Rect, Vec2};

/// Destination for draw requests
pub trait RenderSurface {
    /// Pixel size of a loaded texture, `None` if the key is unknown
    fn texture_size(&self, texture: &str) -> Option<(u32, u32)>;

    /// Draw `source` of `texture` with its top-left corner at `position`
    fn draw_sprite(&mut self, texture: &str, source: Rect, position: Vec2, flip_horizontal: bool);

    /// Draw a text label
    fn draw_text(&mut self, text: &str, position: Vec2);

    /// Draw every tile layer of `level`
    fn draw_level(&mut self, level: &str);
}

/// One recorded draw request
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// See [`RenderSurface::draw_sprite`]
    Sprite {
        /// Texture key
        texture: String,
        /// Source rectangle on the sheet
        source: Rect,
        /// Destination top-left corner
        position: Vec2,
        /// Mirrored horizontally
        flip_horizontal: bool,
    },
    /// See [`RenderSurface::draw_text`]
    Text {
        /// Label
        text: String,
        /// Destination top-left corner
        position: Vec2,
    },
    /// See [`RenderSurface::draw_level`]
    Level(String),
}

/// Surface that records draw requests
#[derive(Debug, Default)]
pub struct RecordingSurface {
    textures: HashMap<String, (u32, u32)>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create a surface with no known textures
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture size (builder form)
    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>, width: u32, height: u32) -> Self {
        self.textures.insert(texture.into(), (width, height));
        self
    }

    /// Commands recorded since the last `clear`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget recorded commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn texture_size(&self, texture: &str) -> Option<(u32, u32)> {
        self.textures.get(texture).copied()
    }

    fn draw_sprite(&mut self, texture: &str, source: Rect, position: Vec2, flip_horizontal: bool) {
        self.commands.push(DrawCommand::Sprite {
            texture: texture.to_string(),
            source,
            position,
            flip_horizontal,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
        });
    }

    fn draw_level(&mut self, level: &str) {
        self.commands.push(DrawCommand::Level(level.to_string()));
    }
}
