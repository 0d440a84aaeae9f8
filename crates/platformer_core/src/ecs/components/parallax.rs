//! Parallax background component
//!
//! Two copies of a texture leap-frog each other along the scroll direction.
//! Whenever one copy scrolls a full texture length off screen it jumps to the
//! far side of the other, so the background never shows a gap.

use crate::foundation::math::Vec2;

/// Scrolling background layer
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxComponent {
    texture: String,
    size: Vec2,
    velocity: Vec2,
    position: Vec2,
    trailing: Vec2,
    tiles_x: i32,
    tiles_y: i32,
}

impl ParallaxComponent {
    /// Create a layer for a `texture_size` texture covering a `view` sized window
    pub fn new(
        texture: impl Into<String>,
        texture_size: (u32, u32),
        velocity: Vec2,
        position: Vec2,
        view: (u32, u32),
    ) -> Self {
        let size = Vec2::new(texture_size.0.max(1) as f32, texture_size.1.max(1) as f32);
        let tiles = |view: u32, extent: f32| {
            #[allow(clippy::cast_possible_truncation)]
            let count = (view as f32 / extent).ceil() as i32;
            count + 1
        };

        let mut trailing = position;
        trailing.x += sign(velocity.x) * size.x;
        trailing.y -= sign(velocity.y) * size.y;

        Self {
            texture: texture.into(),
            size,
            velocity,
            position,
            trailing,
            tiles_x: tiles(view.0, size.x),
            tiles_y: tiles(view.1, size.y),
        }
    }

    /// Texture key
    pub fn texture(&self) -> &str {
        &self.texture
    }

    /// Texture size in pixels
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Leading copy position
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Trailing copy position
    pub const fn trailing_position(&self) -> Vec2 {
        self.trailing
    }

    /// Tiles needed per axis to cover the view
    pub const fn tile_counts(&self) -> (i32, i32) {
        (self.tiles_x, self.tiles_y)
    }

    /// Scroll both copies and wrap them around each other
    pub fn scroll(&mut self, delta_time: f32) {
        let displacement = self.velocity * delta_time;
        self.position += displacement;
        self.trailing += displacement;

        let (width, height) = (self.size.x, self.size.y);
        if self.velocity.x != 0.0 {
            if self.position.x <= -width {
                self.position.x = self.trailing.x + width;
            }
            if self.trailing.x <= -width {
                self.trailing.x = self.position.x + width;
            }
            if self.position.x >= width {
                self.position.x = self.trailing.x - width;
            }
            if self.trailing.x >= width {
                self.trailing.x = self.position.x - width;
            }
        }
        if self.velocity.y != 0.0 {
            if self.position.y >= height {
                self.position.y = self.trailing.y - height;
            }
            if self.trailing.y >= height {
                self.trailing.y = self.position.y - height;
            }
            if self.position.y <= -height {
                self.position.y = self.trailing.y + height;
            }
            if self.trailing.y <= -height {
                self.trailing.y = self.position.y + height;
            }
        }
    }

    /// Top-left corners of every tile needed to cover the view
    pub fn tile_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        (-1..self.tiles_x).flat_map(move |x| {
            (-1..self.tiles_y).map(move |y| {
                self.position + Vec2::new(x as f32 * self.size.x, y as f32 * self.size.y)
            })
        })
    }
}

fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_counts_cover_view() {
        let layer = ParallaxComponent::new("bg", (64, 64), Vec2::zeros(), Vec2::zeros(), (640, 368));
        assert_eq!(layer.tile_counts(), (11, 7));
        assert_eq!(layer.tile_positions().count(), 12 * 8);
    }

    #[test]
    fn test_trailing_copy_offset() {
        let layer = ParallaxComponent::new("bg", (64, 32), Vec2::new(-10.0, 5.0), Vec2::zeros(), (640, 368));
        assert_eq!(layer.trailing_position(), Vec2::new(-64.0, -32.0));
    }

    #[test]
    fn test_horizontal_wrap() {
        let mut layer = ParallaxComponent::new("bg", (64, 64), Vec2::new(-32.0, 0.0), Vec2::zeros(), (640, 368));
        layer.scroll(1.0);
        assert_eq!(layer.position(), Vec2::new(-32.0, 0.0));
        // the trailing copy crossed -64 and jumped ahead of the leading one
        assert_eq!(layer.trailing_position(), Vec2::new(32.0, 0.0));
    }
}
