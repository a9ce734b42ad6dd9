// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port traits the view engine consumes.
//!
//! # Design
//!
//! These traits are hexagonal ports. The engine decides *what* to draw and
//! *when* to fetch; adapters (egui painter, HTTP client, test doubles)
//! implement the traits to actually draw and fetch.

use std::time::{Duration, Instant};

use crate::{
    CacheEntry, LogicalPosition, OuterBounds, RequestSeq, ScreenCenter, ScreenPoint,
    SourceResponse, TileClick, TileSize, ViewportSize,
};

/// Logical <-> screen coordinate math and visibility testing ("camera").
///
/// Screen coordinates are in scene space: the local frame of the tile group.
/// Panning changes which part of scene space is visible, never the scene
/// coordinates of a tile.
pub trait ViewportTransform {
    /// Screen-space center of the tile at `position`.
    fn isometric_coordinates(&self, position: LogicalPosition) -> ScreenCenter;

    /// Size of one tile at the current zoom.
    fn tile_size(&self) -> TileSize;

    /// True when a tile of `size` centered at `center` intersects the viewport.
    fn show_tile(&self, center: ScreenCenter, size: TileSize) -> bool;

    /// Logical region covering the visible viewport (plus any margin).
    fn screen_outer_bounds(&self) -> OuterBounds;

    /// Adopt a new viewport size.
    fn resize_viewport(&mut self, size: ViewportSize);

    /// Shift the visible window by a screen-space delta.
    fn pan(&mut self, dx: f32, dy: f32);
}

/// Last-known `(content, drawable)` per logical position.
pub trait TileCache<C, D> {
    /// Entry for `position`, if one was ever stored.
    fn get(&self, position: LogicalPosition) -> Option<&CacheEntry<C, D>>;

    /// Mutable entry for `position`.
    fn get_mut(&mut self, position: LogicalPosition) -> Option<&mut CacheEntry<C, D>>;

    /// Create or overwrite the entry for `position`.
    ///
    /// Callers must have removed any previous drawable first.
    fn set(&mut self, position: LogicalPosition, content: C, drawable: Option<D>);

    /// All positions currently cached, in ascending order.
    fn positions(&self) -> Vec<LogicalPosition>;

    /// Number of cached positions.
    fn len(&self) -> usize;

    /// True when nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Opaque handle to one on-screen tile.
pub trait Drawable {
    /// Current screen-space center.
    fn center(&self) -> ScreenCenter;

    /// Re-center the drawable.
    fn set_center(&mut self, center: ScreenCenter);

    /// Place the drawable's top-left corner.
    fn move_to(&mut self, top_left: ScreenPoint);

    /// Take the drawable off screen. Further calls are no-ops.
    fn remove(&mut self);

    /// Route clicks on this drawable to the host as `position`.
    fn bind_click(&mut self, position: LogicalPosition);
}

/// Canvas-like surface holding the tile group.
pub trait RenderSurface {
    /// Handle type produced for tiles on this surface.
    type Drawable: Drawable;

    /// Whether the hosting environment can render at all.
    fn is_supported(&self) -> bool;

    /// Match the surface to a new container size.
    fn resize(&mut self, size: ViewportSize);

    /// Translate the whole tile group, animated over `transition`.
    fn translate_group(&mut self, dx: f32, dy: f32, transition: Duration);

    /// Drain up to `max` clicks recorded since the last call.
    fn drain_clicks(&mut self, max: usize) -> Vec<TileClick>;

    /// Replace the surface content with a static, user-visible notice.
    fn show_notice(&mut self, text: &str);
}

/// Host-supplied controller: tile factory, click handling and UI chrome.
pub trait TileHost<C, S: RenderSurface> {
    /// Create a drawable for `content` on `surface`.
    fn create_tile(&mut self, surface: &mut S, content: &C, size: TileSize) -> S::Drawable;

    /// React to a click on a drawn tile.
    fn on_click(&mut self, click: &TileClick);

    /// Build any chrome around the tile view. Called once at construction.
    fn create_ui(&mut self, surface: &mut S);

    /// Base URL of the tile server.
    fn server_url(&self) -> &str;
}

/// Anything that can report the size the surface should fill.
pub trait HostContainer {
    /// Current client size of the container.
    fn client_size(&self) -> ViewportSize;
}

impl HostContainer for ViewportSize {
    fn client_size(&self) -> ViewportSize {
        *self
    }
}

/// Asynchronous supplier of tile chunks.
///
/// `request` must not block; completions are collected by `drain_responses`
/// on the frame thread.
pub trait TileSource<C> {
    /// Start fetching the tiles covering `bounds`.
    fn request(&mut self, seq: RequestSeq, bounds: OuterBounds);

    /// Drain up to `max` completed requests.
    fn drain_responses(&mut self, max: usize) -> Vec<SourceResponse<C>>;
}

/// Decorative animation advanced on frames without a refresh.
pub trait Animator {
    /// Step animation state to `now`.
    fn advance(&mut self, now: Instant);
}

impl<F> Animator for F
where
    F: FnMut(Instant),
{
    fn advance(&mut self, now: Instant) {
        self(now);
    }
}

/// Animator that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn advance(&mut self, _now: Instant) {}
}
