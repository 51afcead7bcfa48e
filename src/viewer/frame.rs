//! Frame pacing

use macroquad::time::get_time;
use serde::{Deserialize, Serialize};

/// FPS limit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FpsLimit {
    Fps30,
    #[default]
    Fps60,
    /// As fast as the swap interval allows
    Unlocked,
}

impl FpsLimit {
    /// Get the target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            FpsLimit::Fps30 => Some(1.0 / 30.0),
            FpsLimit::Fps60 => Some(1.0 / 60.0),
            FpsLimit::Unlocked => None,
        }
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            FpsLimit::Fps30 => "30",
            FpsLimit::Fps60 => "60",
            FpsLimit::Unlocked => "Unlocked",
        }
    }
}

/// Holds each frame to the configured target time.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    limit: FpsLimit,
}

impl FrameLimiter {
    /// Native sleep stops this far ahead of the deadline; the rest is spun
    const SPIN_MARGIN: f64 = 0.002;

    pub fn new(limit: FpsLimit) -> Self {
        Self { limit }
    }

    /// Seconds left in the frame after `elapsed` seconds of work, or None
    /// when there is nothing to wait for.
    pub fn remaining(&self, elapsed: f64) -> Option<f64> {
        let target = self.limit.frame_time()?;
        let remaining = target - elapsed;
        (remaining > 0.0).then_some(remaining)
    }

    /// Block until the frame that began at `frame_start` (from `get_time()`)
    /// has used its full budget.
    pub fn wait(&self, frame_start: f64) {
        let Some(target) = self.limit.frame_time() else {
            return;
        };
        if self.remaining(get_time() - frame_start).is_none() {
            return;
        }

        // Native: use sleep for bulk, then spin-wait for precision
        #[cfg(not(target_arch = "wasm32"))]
        {
            while get_time() - frame_start + Self::SPIN_MARGIN < target {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            while get_time() - frame_start < target {
                std::hint::spin_loop();
            }
        }
        // WASM: no thread::sleep, the browser paces frames anyway
        #[cfg(target_arch = "wasm32")]
        {
            while get_time() - frame_start < target {
                std::hint::spin_loop();
            }
        }
    }
}
