// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved configuration for a tile view (server, refresh cadence, camera).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Config key under which [`ViewPrefs`] are stored.
pub const VIEW_PREFS_KEY: &str = "view_prefs";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_REFRESH_INTERVAL_MS: u64 = 200;
const DEFAULT_PAN_TRANSITION_MS: u64 = 250;
const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
const DEFAULT_MAX_RESPONSES_PER_TICK: usize = 16;

/// Saved preferences for a tile view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPrefs {
    /// Base URL of the tile server (`<server_url>/tiles/<bounds>`).
    pub server_url: String,
    /// Minimum time between refresh attempts.
    pub refresh_interval_ms: u64,
    /// Duration of the animated group translation on pan.
    pub pan_transition_ms: u64,
    /// Frame period of the built-in async driver.
    pub frame_interval_ms: u64,
    /// Upper bound on responses applied per frame.
    pub max_responses_per_tick: usize,
    /// Camera parameters.
    pub camera: CameraPrefs,
}

impl Default for ViewPrefs {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            pan_transition_ms: DEFAULT_PAN_TRANSITION_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            max_responses_per_tick: DEFAULT_MAX_RESPONSES_PER_TICK,
            camera: CameraPrefs::default(),
        }
    }
}

impl ViewPrefs {
    /// Replace nonsensical zero values with defaults.
    pub fn validated(mut self) -> Self {
        if self.refresh_interval_ms == 0 {
            self.refresh_interval_ms = DEFAULT_REFRESH_INTERVAL_MS;
        }
        if self.frame_interval_ms == 0 {
            self.frame_interval_ms = DEFAULT_FRAME_INTERVAL_MS;
        }
        if self.max_responses_per_tick == 0 {
            self.max_responses_per_tick = DEFAULT_MAX_RESPONSES_PER_TICK;
        }
        if self.server_url.trim().is_empty() {
            self.server_url = DEFAULT_SERVER_URL.to_string();
        }
        self.camera = self.camera.validated();
        self
    }

    /// Refresh throttle window.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Pan transition duration.
    pub fn pan_transition(&self) -> Duration {
        Duration::from_millis(self.pan_transition_ms)
    }

    /// Frame period.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Isometric camera parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPrefs {
    /// Unzoomed tile size `[width, height]`.
    pub base_tile: [f32; 2],
    /// Zoom factor applied to `base_tile`.
    pub zoom: f32,
    /// Extra tiles requested beyond each viewport edge.
    pub cull_margin_tiles: i64,
}

impl Default for CameraPrefs {
    fn default() -> Self {
        Self {
            base_tile: [64.0, 32.0],
            zoom: 1.0,
            cull_margin_tiles: 1,
        }
    }
}

impl CameraPrefs {
    fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            self.zoom = defaults.zoom;
        }
        if !self.base_tile.iter().all(|v| v.is_finite() && *v > 0.0) {
            self.base_tile = defaults.base_tile;
        }
        self.cull_margin_tiles = self.cull_margin_tiles.max(0);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let prefs: ViewPrefs =
            serde_json::from_str(r#"{"server_url":"http://tiles.local"}"#).unwrap();
        assert_eq!(prefs.server_url, "http://tiles.local");
        assert_eq!(prefs.refresh_interval(), Duration::from_millis(200));
        assert_eq!(prefs.camera, CameraPrefs::default());
    }

    #[test]
    fn validated_repairs_zeroes() {
        let prefs = ViewPrefs {
            refresh_interval_ms: 0,
            frame_interval_ms: 0,
            max_responses_per_tick: 0,
            server_url: "  ".into(),
            camera: CameraPrefs {
                zoom: 0.0,
                base_tile: [f32::NAN, 32.0],
                cull_margin_tiles: -4,
            },
            ..ViewPrefs::default()
        }
        .validated();
        let defaults = ViewPrefs::default();
        assert_eq!(prefs.refresh_interval_ms, defaults.refresh_interval_ms);
        assert_eq!(prefs.frame_interval_ms, defaults.frame_interval_ms);
        assert_eq!(prefs.max_responses_per_tick, defaults.max_responses_per_tick);
        assert_eq!(prefs.server_url, defaults.server_url);
        assert_eq!(prefs.camera.zoom, 1.0);
        assert_eq!(prefs.camera.base_tile, [64.0, 32.0]);
        assert_eq!(prefs.camera.cull_margin_tiles, 0);
    }
}
