use std::time::Duration;

use crate::easing::{self, Easing};

/// Side length of the square rasters every morph works on.
pub const DEFAULT_SIDE: u32 = 256;

#[derive(Debug, Clone)]
pub struct MorphConfig {
    pub side: u32,
    /// Duration of an A→B morph.
    pub one_shot_duration: Duration,
    /// Duration of each re-match transition in live mode.
    pub live_duration: Duration,
    pub easing: Easing,
    pub fps: u32,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            side: DEFAULT_SIDE,
            one_shot_duration: Duration::from_millis(4000),
            live_duration: Duration::from_millis(2000),
            easing: easing::ease_in_out,
            fps: 60,
        }
    }
}

impl MorphConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}
