// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Isometric camera math.

use isotile_app_core::prefs::CameraPrefs;
use isotile_port::{
    LogicalPosition, OuterBounds, ScreenCenter, TileSize, ViewportSize, ViewportTransform,
};

/// Reference [`ViewportTransform`] for 2:1 diamond tiles.
///
/// Tile `(x, y)` is centered at `((x - y) * w/2, (x + y) * h/2)` in scene
/// space. The visible window starts at `origin` and spans the viewport size;
/// panning moves `origin`.
#[derive(Clone, Debug, PartialEq)]
pub struct IsoCamera {
    viewport: ViewportSize,
    origin: (f32, f32),
    tile: TileSize,
    margin: i64,
}

impl IsoCamera {
    /// Camera for `viewport` with logical `(0, 0)` at the top center.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(viewport: ViewportSize, prefs: &CameraPrefs) -> Self {
        let [w, h] = prefs.base_tile;
        Self {
            viewport,
            origin: (-(viewport.width as f32) / 2.0, 0.0),
            tile: TileSize::new(w, h).scaled(prefs.zoom),
            margin: prefs.cull_margin_tiles,
        }
    }

    /// Scene-space top-left corner of the visible window.
    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    /// Current viewport size.
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Logical (fractional) grid coordinates under a scene-space point.
    pub fn logical_at(&self, sx: f32, sy: f32) -> (f32, f32) {
        let u = sx / (self.tile.width / 2.0);
        let v = sy / (self.tile.height / 2.0);
        ((u + v) / 2.0, (v - u) / 2.0)
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
impl ViewportTransform for IsoCamera {
    fn isometric_coordinates(&self, position: LogicalPosition) -> ScreenCenter {
        // f64 so extreme grid coordinates cannot overflow.
        let (x, y) = (position.x as f64, position.y as f64);
        let half_w = f64::from(self.tile.width) / 2.0;
        let half_h = f64::from(self.tile.height) / 2.0;
        ScreenCenter::new(((x - y) * half_w) as f32, ((x + y) * half_h) as f32)
    }

    fn tile_size(&self) -> TileSize {
        self.tile
    }

    fn show_tile(&self, center: ScreenCenter, size: TileSize) -> bool {
        let (left, top) = self.origin;
        let right = left + self.viewport.width as f32;
        let bottom = top + self.viewport.height as f32;
        let half_w = size.width / 2.0;
        let half_h = size.height / 2.0;
        center.x - half_w < right
            && center.x + half_w > left
            && center.y - half_h < bottom
            && center.y + half_h > top
    }

    fn screen_outer_bounds(&self) -> OuterBounds {
        let (left, top) = self.origin;
        let right = left + self.viewport.width as f32;
        let bottom = top + self.viewport.height as f32;
        let corners = [
            self.logical_at(left, top),
            self.logical_at(right, top),
            self.logical_at(left, bottom),
            self.logical_at(right, bottom),
        ];
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        OuterBounds::new(
            (min_x.floor() as i64).saturating_sub(self.margin),
            (min_y.floor() as i64).saturating_sub(self.margin),
            (max_x.ceil() as i64).saturating_add(self.margin),
            (max_y.ceil() as i64).saturating_add(self.margin),
        )
    }

    fn resize_viewport(&mut self, size: ViewportSize) {
        self.viewport = size;
    }

    fn pan(&mut self, dx: f32, dy: f32) {
        self.origin.0 += dx;
        self.origin.1 += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> IsoCamera {
        IsoCamera::new(ViewportSize::new(640, 480), &CameraPrefs::default())
    }

    #[test]
    fn diamond_projection() {
        let cam = camera();
        assert_eq!(
            cam.isometric_coordinates(LogicalPosition::new(0, 0)),
            ScreenCenter::new(0.0, 0.0)
        );
        assert_eq!(
            cam.isometric_coordinates(LogicalPosition::new(1, 0)),
            ScreenCenter::new(32.0, 16.0)
        );
        assert_eq!(
            cam.isometric_coordinates(LogicalPosition::new(0, 1)),
            ScreenCenter::new(-32.0, 16.0)
        );
    }

    #[test]
    fn outer_bounds_cover_viewport_corners_plus_margin() {
        assert_eq!(camera().screen_outer_bounds(), OuterBounds::new(-6, -6, 21, 21));
    }

    #[test]
    fn far_tiles_are_not_shown() {
        let cam = camera();
        let size = cam.tile_size();
        let origin = cam.isometric_coordinates(LogicalPosition::new(0, 0));
        let far = cam.isometric_coordinates(LogicalPosition::new(-20, 20));
        assert!(cam.show_tile(origin, size));
        assert!(!cam.show_tile(far, size));
    }

    #[test]
    fn pan_moves_the_window_not_the_tiles() {
        let mut cam = camera();
        let before = cam.isometric_coordinates(LogicalPosition::new(3, 4));
        cam.pan(1000.0, 0.0);
        assert_eq!(cam.isometric_coordinates(LogicalPosition::new(3, 4)), before);
        assert!(!cam.show_tile(ScreenCenter::new(0.0, 0.0), cam.tile_size()));
        assert_eq!(cam.origin(), (680.0, 0.0));
    }

    #[test]
    fn extreme_positions_project_without_overflow() {
        let cam = camera();
        for position in [
            LogicalPosition::new(i64::MAX, -1),
            LogicalPosition::new(i64::MIN, 1),
            LogicalPosition::new(i64::MAX, i64::MAX),
            LogicalPosition::new(i64::MIN, i64::MAX),
        ] {
            let center = cam.isometric_coordinates(position);
            assert!(center.x.is_finite() && center.y.is_finite(), "{position:?}");
            assert!(!cam.show_tile(center, cam.tile_size()));
        }
    }

    #[test]
    fn outer_bounds_saturate_far_from_the_origin() {
        let mut cam = camera();
        cam.pan(1.0e30, 0.0);
        let bounds = cam.screen_outer_bounds();
        assert_eq!(bounds.max_x, i64::MAX);
        assert_eq!(bounds.min_y, i64::MIN);
    }

    #[test]
    fn zoom_scales_tile_size() {
        let prefs = CameraPrefs {
            zoom: 2.0,
            ..CameraPrefs::default()
        };
        let cam = IsoCamera::new(ViewportSize::new(100, 100), &prefs);
        assert_eq!(cam.tile_size(), TileSize::new(128.0, 64.0));
    }
}
