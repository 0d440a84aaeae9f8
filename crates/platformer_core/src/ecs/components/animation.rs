//! Sprite-strip animation component
//!
//! Each animation intent maps to one strip: a grid of equally sized frames
//! on a sprite sheet, played left to right, top to bottom, looping. Every
//! strip keeps its own playhead, so the lifecycle systems can ask whether a
//! particular strip (death, appear) has reached its last frame.

use std::collections::BTreeMap;

use crate::ecs::components::state::AnimationId;
use crate::foundation::math::Rect;

/// One looping strip of frames on a sprite sheet
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStrip {
    texture: String,
    rows: u32,
    columns: u32,
    frame_time: f32,
    frame: u32,
    elapsed: f32,
}

impl FrameStrip {
    /// Create a strip of `rows` x `columns` frames played at `frames_per_second`
    pub fn new(texture: impl Into<String>, rows: u32, columns: u32, frames_per_second: f32) -> Self {
        Self {
            texture: texture.into(),
            rows: rows.max(1),
            columns: columns.max(1),
            frame_time: 1.0 / frames_per_second.max(f32::EPSILON),
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Sprite sheet key
    pub fn texture(&self) -> &str {
        &self.texture
    }

    /// Number of frames in the strip
    pub const fn total_frames(&self) -> u32 {
        self.rows * self.columns
    }

    /// Index of the frame on screen
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// True exactly when the playhead sits on the last frame
    pub const fn is_finished(&self) -> bool {
        self.frame + 1 >= self.total_frames()
    }

    /// Rewind to the first frame
    pub fn reset(&mut self) {
        self.frame = 0;
        self.elapsed = 0.0;
    }

    /// Advance the playhead; at most one frame per call, wrapping at the end
    pub fn advance(&mut self, delta_time: f32) {
        if self.total_frames() == 1 {
            return;
        }
        self.elapsed += delta_time;
        if self.elapsed >= self.frame_time {
            self.frame += 1;
            if self.frame >= self.total_frames() {
                self.frame = 0;
            }
            self.elapsed = 0.0;
        }
    }

    /// Source rectangle of the current frame on a `sheet_width` x `sheet_height` sheet
    pub fn frame_rect(&self, sheet_width: u32, sheet_height: u32) -> Rect {
        let frame_width = i32::try_from(sheet_width / self.columns).unwrap_or(i32::MAX);
        let frame_height = i32::try_from(sheet_height / self.rows).unwrap_or(i32::MAX);
        let column = i32::try_from(self.frame % self.columns).unwrap_or(0);
        let row = i32::try_from(self.frame / self.columns).unwrap_or(0);
        Rect::new(column * frame_width, row * frame_height, frame_width, frame_height)
    }
}

/// Strips keyed by animation intent plus the one currently playing
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationComponent {
    strips: BTreeMap<AnimationId, FrameStrip>,
    default_action: AnimationId,
    current_action: AnimationId,
}

impl AnimationComponent {
    /// Create an empty animation set that falls back to `default_action`
    pub const fn new(default_action: AnimationId) -> Self {
        Self {
            strips: BTreeMap::new(),
            default_action,
            current_action: default_action,
        }
    }

    /// Add a strip (builder form)
    #[must_use]
    pub fn with_strip(mut self, action: AnimationId, strip: FrameStrip) -> Self {
        self.add_strip(action, strip);
        self
    }

    /// Add or replace the strip for `action`
    pub fn add_strip(&mut self, action: AnimationId, strip: FrameStrip) {
        self.strips.insert(action, strip);
    }

    /// Whether a strip exists for `action`
    pub fn has_strip(&self, action: AnimationId) -> bool {
        self.strips.contains_key(&action)
    }

    /// Strip for `action`, if any
    pub fn strip(&self, action: AnimationId) -> Option<&FrameStrip> {
        self.strips.get(&action)
    }

    /// The action actually playing, falling back to the default when the
    /// requested one has no strip
    pub fn current_action(&self) -> AnimationId {
        if self.strips.contains_key(&self.current_action) {
            self.current_action
        } else {
            self.default_action
        }
    }

    /// Strip currently on screen
    pub fn current_strip(&self) -> Option<&FrameStrip> {
        self.strips.get(&self.current_action())
    }

    /// Switch to `action`; both the outgoing and incoming strips rewind
    pub fn set_current_action(&mut self, action: AnimationId) {
        if self.current_action == action {
            return;
        }
        log::trace!("animation {:?} -> {:?}", self.current_action, action);
        self.reset(self.current_action());
        self.current_action = action;
        self.reset(self.current_action());
    }

    /// Rewind the strip for `action`
    pub fn reset(&mut self, action: AnimationId) {
        if let Some(strip) = self.strips.get_mut(&action) {
            strip.reset();
        }
    }

    /// Advance the strip currently on screen
    pub fn update(&mut self, delta_time: f32) {
        let action = self.current_action();
        if let Some(strip) = self.strips.get_mut(&action) {
            strip.advance(delta_time);
        }
    }

    /// Whether the strip for `action` sits on its last frame
    ///
    /// An entity without that strip has nothing to wait for, so a missing
    /// strip counts as finished.
    pub fn is_finished(&self, action: AnimationId) -> bool {
        self.strips.get(&action).map_or(true, FrameStrip::is_finished)
    }
}

impl Default for AnimationComponent {
    fn default() -> Self {
        Self::new(AnimationId::Idle)
    }
}
