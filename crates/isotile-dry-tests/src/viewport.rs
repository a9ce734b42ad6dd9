// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Orthogonal grid viewport for predictable visibility in tests.

use std::cell::Cell;

use isotile_port::{
    LogicalPosition, OuterBounds, ScreenCenter, TileSize, ViewportSize, ViewportTransform,
};

/// Viewport where tile `(x, y)` is centered at `(x * spacing, y * spacing)`.
///
/// The visible window is `[pan, pan + size]` in scene space. `tile_size`
/// calls are counted so tests can check how often the engine asks.
#[derive(Debug)]
pub struct GridViewport {
    spacing: f32,
    tile: TileSize,
    size: ViewportSize,
    pan: (f32, f32),
    tile_size_calls: Cell<usize>,
}

impl GridViewport {
    /// Viewport of `size` with 100-unit spacing and 50x50 tiles.
    pub fn new(size: ViewportSize) -> Self {
        Self {
            spacing: 100.0,
            tile: TileSize::new(50.0, 50.0),
            size,
            pan: (0.0, 0.0),
            tile_size_calls: Cell::new(0),
        }
    }

    /// Override the tile size.
    pub fn with_tile(mut self, tile: TileSize) -> Self {
        self.tile = tile;
        self
    }

    /// How many times `tile_size` was called.
    pub fn tile_size_calls(&self) -> usize {
        self.tile_size_calls.get()
    }

    /// Current pan offset.
    pub fn pan_offset(&self) -> (f32, f32) {
        self.pan
    }

    /// Current viewport size.
    pub fn size(&self) -> ViewportSize {
        self.size
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
impl ViewportTransform for GridViewport {
    fn isometric_coordinates(&self, position: LogicalPosition) -> ScreenCenter {
        ScreenCenter::new(
            position.x as f32 * self.spacing,
            position.y as f32 * self.spacing,
        )
    }

    fn tile_size(&self) -> TileSize {
        self.tile_size_calls.set(self.tile_size_calls.get() + 1);
        self.tile
    }

    fn show_tile(&self, center: ScreenCenter, size: TileSize) -> bool {
        let (left, top) = self.pan;
        let right = left + self.size.width as f32;
        let bottom = top + self.size.height as f32;
        let half_w = size.width / 2.0;
        let half_h = size.height / 2.0;
        center.x - half_w < right
            && center.x + half_w > left
            && center.y - half_h < bottom
            && center.y + half_h > top
    }

    fn screen_outer_bounds(&self) -> OuterBounds {
        let (left, top) = self.pan;
        let to_cell = |v: f32| (v / self.spacing).floor() as i64;
        OuterBounds::new(
            to_cell(left),
            to_cell(top),
            to_cell(left + self.size.width as f32),
            to_cell(top + self.size.height as f32),
        )
    }

    fn resize_viewport(&mut self, size: ViewportSize) {
        self.size = size;
    }

    fn pan(&mut self, dx: f32, dy: f32) {
        self.pan.0 += dx;
        self.pan.1 += dy;
    }
}
