// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Screen-space geometry shared between the engine and its collaborators.

use core::fmt;

/// Screen-space center of a tile, independent of tile size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenCenter {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate (grows downward).
    pub y: f32,
}

impl ScreenCenter {
    /// Construct a center point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Top-left corner of a tile of `size` centered here.
    pub fn top_left(self, size: TileSize) -> ScreenPoint {
        ScreenPoint {
            x: self.x - size.width / 2.0,
            y: self.y - size.height / 2.0,
        }
    }
}

/// Arbitrary screen-space point (e.g. a drawable's top-left placement).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl ScreenPoint {
    /// Construct a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Center of a tile of `size` whose top-left corner is here.
    pub fn center_for(self, size: TileSize) -> ScreenCenter {
        ScreenCenter {
            x: self.x + size.width / 2.0,
            y: self.y + size.height / 2.0,
        }
    }
}

/// Size of a drawn tile in screen units. Shared by all tiles of one redraw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSize {
    /// Width of the tile's bounding box.
    pub width: f32,
    /// Height of the tile's bounding box.
    pub height: f32,
}

impl TileSize {
    /// Construct a tile size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Uniformly scaled copy.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

impl Default for TileSize {
    fn default() -> Self {
        // 2:1 diamond
        Self {
            width: 64.0,
            height: 32.0,
        }
    }
}

/// Pixel size of the hosting container / rendering surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ViewportSize {
    /// Construct a viewport size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Logical region covering everything currently visible, inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OuterBounds {
    /// Smallest visible column.
    pub min_x: i64,
    /// Smallest visible row.
    pub min_y: i64,
    /// Largest visible column.
    pub max_x: i64,
    /// Largest visible row.
    pub max_y: i64,
}

impl OuterBounds {
    /// Construct bounds from their corners.
    pub const fn new(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The bounds as the four numbers sent to the tile source.
    pub const fn to_array(self) -> [i64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Comma-joined form used as a URL path segment.
    pub fn to_path_segment(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OuterBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
