//! Audio boundary
//!
//! The world starts a level's background track after loading it and stops
//! playback before tearing the level down. Nothing else reaches audio.

/// Music playback collaborator
pub trait AudioSink {
    /// Start looping `track`, replacing whatever plays
    fn play_music(&mut self, track: &str);

    /// Stop all playback
    fn stop(&mut self);
}

/// Sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_music(&mut self, track: &str) {
        log::debug!("music '{track}' requested on silent audio");
    }

    fn stop(&mut self) {}
}
