// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Viewport controller: resize and pan, plus dirty-region bookkeeping.

use std::time::Duration;

use isotile_port::{HostContainer, RenderSurface, ViewportTransform};
use tracing::debug;

/// Viewport changes not yet reconciled by an applied refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DirtyRegion {
    /// Accumulated pan since the last applied refresh.
    pub pan: (f32, f32),
    /// Whether the viewport was resized.
    pub resized: bool,
}

/// Keeps the viewport transform and the on-screen tile group in sync.
///
/// Neither operation evicts cache entries or draws newly revealed tiles;
/// both are left to the next applied refresh, which consults the
/// [`DirtyRegion`].
#[derive(Debug)]
pub struct ViewportController {
    pan_transition: Duration,
    dirty: Option<DirtyRegion>,
}

impl ViewportController {
    /// Controller animating pans over `pan_transition`.
    pub fn new(pan_transition: Duration) -> Self {
        Self {
            pan_transition,
            dirty: None,
        }
    }

    /// Match viewport and surface to the container's current size.
    pub fn resize<V, S>(&mut self, container: &impl HostContainer, viewport: &mut V, surface: &mut S)
    where
        V: ViewportTransform,
        S: RenderSurface,
    {
        let size = container.client_size();
        debug!(width = size.width, height = size.height, "resize");
        viewport.resize_viewport(size);
        surface.resize(size);
        self.dirty.get_or_insert_with(DirtyRegion::default).resized = true;
    }

    /// Pan by `(dx, dy)`: the tile group slides by `(-dx, -dy)`.
    pub fn move_by<V, S>(&mut self, dx: f32, dy: f32, viewport: &mut V, surface: &mut S)
    where
        V: ViewportTransform,
        S: RenderSurface,
    {
        debug!(dx, dy, "move");
        surface.translate_group(-dx, -dy, self.pan_transition);
        viewport.pan(dx, dy);
        let dirty = self.dirty.get_or_insert_with(DirtyRegion::default);
        dirty.pan.0 += dx;
        dirty.pan.1 += dy;
    }

    /// Pending dirty region, if any.
    pub fn dirty(&self) -> Option<DirtyRegion> {
        self.dirty
    }

    /// Hand the dirty region to a refresh and reset it.
    pub fn take_dirty(&mut self) -> Option<DirtyRegion> {
        self.dirty.take()
    }
}
