//! Collision box component
//!
//! A sprite cell is usually larger than the character drawn in it. The box
//! keeps the original cell size plus four offsets that shrink it to the
//! logical hitbox, and caches the platform (or wall) the entity last touched.

use crate::core::ScreenConfig;
use crate::foundation::math::{truncate, Rect, Vec2};

/// Offsets trimmed from each side of the sprite cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoxOffsets {
    /// Trimmed from the top edge
    pub top: i32,
    /// Trimmed from the bottom edge
    pub bottom: i32,
    /// Trimmed from the left edge when facing right
    pub left: i32,
    /// Trimmed from the right edge when facing right
    pub right: i32,
}

impl BoxOffsets {
    /// Create offsets
    pub const fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self { top, bottom, left, right }
    }
}

/// Hitbox of an entity plus its cached ground/slide bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionBoxComponent {
    original_width: i32,
    original_height: i32,
    offsets: BoxOffsets,
    bounds: Rect,
    ground_left: i32,
    ground_right: i32,
    ground_bottom: i32,
}

impl CollisionBoxComponent {
    /// Create a box for a `width` x `height` sprite cell
    ///
    /// The ground cache starts at the full screen so a fresh entity is never
    /// considered to have walked off a platform.
    pub fn new(width: i32, height: i32, offsets: BoxOffsets, screen: &ScreenConfig) -> Self {
        let mut collision_box = Self {
            original_width: width,
            original_height: height,
            offsets,
            bounds: Rect::default(),
            ground_left: 0,
            ground_right: i32::try_from(screen.width).unwrap_or(i32::MAX),
            ground_bottom: i32::try_from(screen.height).unwrap_or(i32::MAX),
        };
        collision_box.bounds = Rect::new(0, 0, collision_box.width(), collision_box.height());
        collision_box
    }

    /// Sprite cell width
    pub const fn original_width(&self) -> i32 {
        self.original_width
    }

    /// Sprite cell height
    pub const fn original_height(&self) -> i32 {
        self.original_height
    }

    /// Side offsets
    pub const fn offsets(&self) -> BoxOffsets {
        self.offsets
    }

    /// Hitbox width, never negative
    pub fn width(&self) -> i32 {
        (self.original_width - self.offsets.left - self.offsets.right).max(0)
    }

    /// Hitbox height, never negative
    pub fn height(&self) -> i32 {
        (self.original_height - self.offsets.bottom - self.offsets.top).max(0)
    }

    /// Current on-screen hitbox
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Move the hitbox to follow the sprite at `position`
    ///
    /// Facing left mirrors the sprite, so the horizontal offsets swap.
    pub fn update_position(&mut self, position: Vec2, direction: i32) {
        let horizontal = if direction == -1 { self.offsets.right } else { self.offsets.left };
        self.bounds = Rect::new(
            truncate(position.x) + horizontal,
            truncate(position.y) + self.offsets.top,
            self.width(),
            self.height(),
        );
    }

    /// Remember the platform span the entity stands on
    pub fn set_ground_location(&mut self, left: i32, right: i32) {
        self.ground_left = left;
        self.ground_right = right;
    }

    /// Remember the bottom of the wall the entity slides along
    pub fn set_sliding_location(&mut self, bottom: i32) {
        self.ground_bottom = bottom;
    }

    /// Cached platform span
    pub const fn ground_span(&self) -> (i32, i32) {
        (self.ground_left, self.ground_right)
    }

    /// Cached slide floor
    pub const fn ground_bottom(&self) -> i32 {
        self.ground_bottom
    }

    /// Whether a box at `position_x` has left the cached platform span
    pub fn is_off_ground(&self, position_x: f32, direction: i32) -> bool {
        let width = self.original_width as f32;
        let (left, right) = if direction == -1 {
            (
                position_x + self.offsets.right as f32,
                position_x - self.offsets.left as f32 + width,
            )
        } else {
            (
                position_x + self.offsets.left as f32,
                position_x - self.offsets.right as f32 + width,
            )
        };
        right < self.ground_left as f32 || left > self.ground_right as f32
    }

    /// Whether a sprite at `position_y` has slid past the cached wall bottom
    pub fn is_below_slide_floor(&self, position_y: f32) -> bool {
        position_y + self.offsets.top as f32 + 5.0 > self.ground_bottom as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_box() -> CollisionBoxComponent {
        CollisionBoxComponent::new(32, 32, BoxOffsets::new(8, 0, 4, 6), &ScreenConfig::default())
    }

    #[test]
    fn test_derived_size() {
        let collision_box = player_box();
        assert_eq!(collision_box.width(), 22);
        assert_eq!(collision_box.height(), 24);
    }

    #[test]
    fn test_size_never_negative() {
        let collision_box =
            CollisionBoxComponent::new(4, 4, BoxOffsets::new(3, 3, 3, 3), &ScreenConfig::default());
        assert_eq!(collision_box.width(), 0);
        assert_eq!(collision_box.height(), 0);
    }

    #[test]
    fn test_update_position_mirrors_offsets() {
        let mut collision_box = player_box();
        collision_box.update_position(Vec2::new(100.7, 50.2), 1);
        assert_eq!(collision_box.bounds(), Rect::new(104, 58, 22, 24));

        collision_box.update_position(Vec2::new(100.7, 50.2), -1);
        assert_eq!(collision_box.bounds(), Rect::new(106, 58, 22, 24));
    }

    #[test]
    fn test_ground_defaults_cover_screen() {
        let collision_box = player_box();
        assert_eq!(collision_box.ground_span(), (0, 640));
        assert_eq!(collision_box.ground_bottom(), 368);
        assert!(!collision_box.is_off_ground(300.0, 1));
    }

    #[test]
    fn test_off_ground_detection() {
        let mut collision_box = player_box();
        collision_box.set_ground_location(100, 200);
        assert!(!collision_box.is_off_ground(150.0, 1));
        // right edge = x - 6 + 32 must reach 100
        assert!(collision_box.is_off_ground(73.0, 1));
        assert!(!collision_box.is_off_ground(74.0, 1));
        // left edge = x + 4 must stay within 200
        assert!(collision_box.is_off_ground(197.0, 1));
        assert!(!collision_box.is_off_ground(196.0, 1));
    }

    #[test]
    fn test_slide_floor() {
        let mut collision_box = player_box();
        collision_box.set_sliding_location(100);
        assert!(!collision_box.is_below_slide_floor(87.0));
        assert!(collision_box.is_below_slide_floor(88.0));
    }
}
