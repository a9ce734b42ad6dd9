// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Diff-and-draw: decide per tile whether anything has to change on screen.

use core::marker::PhantomData;
use core::ops::AddAssign;

use isotile_port::{
    Chunk, Drawable, RenderSurface, TileCache, TileData, TileHost, TileSize, ViewportTransform,
};
use tracing::{debug, trace};

/// Borrowed collaborators for one draw pass over content type `C`.
///
/// The viewport is only read; surface, host and cache are mutated.
pub struct DrawContext<'a, C, V, S, H, K> {
    /// Coordinate and visibility provider.
    pub viewport: &'a V,
    /// Scene graph the drawables live on.
    pub surface: &'a mut S,
    /// Tile factory.
    pub host: &'a mut H,
    /// Last-known state per position.
    pub cache: &'a mut K,
    content: PhantomData<fn(&C)>,
}

impl<'a, C, V, S, H, K> DrawContext<'a, C, V, S, H, K> {
    /// Bundle the collaborators of one pass.
    pub fn new(viewport: &'a V, surface: &'a mut S, host: &'a mut H, cache: &'a mut K) -> Self {
        Self {
            viewport,
            surface,
            host,
            cache,
            content: PhantomData,
        }
    }
}

/// What `update_tile` did for one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileOutcome {
    /// Content unchanged and already drawn; nothing touched.
    Unchanged,
    /// First drawable for the position.
    Drawn,
    /// Old drawable removed and a new one drawn.
    Redrawn,
    /// Not visible; cached without a drawable.
    Culled {
        /// Whether an old drawable had to be removed.
        removed: bool,
    },
}

/// Counters for one or more draw passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Tiles skipped because nothing changed.
    pub unchanged: usize,
    /// Drawables created.
    pub drawn: usize,
    /// Drawables removed.
    pub removed: usize,
    /// Tiles cached without a drawable.
    pub culled: usize,
}

impl DrawStats {
    /// Fold one tile outcome into the counters.
    pub fn record(&mut self, outcome: TileOutcome) {
        match outcome {
            TileOutcome::Unchanged => self.unchanged += 1,
            TileOutcome::Drawn => self.drawn += 1,
            TileOutcome::Redrawn => {
                self.drawn += 1;
                self.removed += 1;
            }
            TileOutcome::Culled { removed } => {
                self.culled += 1;
                if removed {
                    self.removed += 1;
                }
            }
        }
    }

    /// True when no drawable was created or removed.
    pub fn is_quiet(&self) -> bool {
        self.drawn == 0 && self.removed == 0
    }
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.unchanged += rhs.unchanged;
        self.drawn += rhs.drawn;
        self.removed += rhs.removed;
        self.culled += rhs.culled;
    }
}

/// Diffs incoming tiles against the cache and redraws only what changed.
#[derive(Debug, Default)]
pub struct DiffDrawEngine {
    totals: DrawStats,
}

impl DiffDrawEngine {
    /// Fresh engine with zeroed totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters accumulated over every pass so far.
    pub fn totals(&self) -> DrawStats {
        self.totals
    }

    /// Apply one chunk.
    ///
    /// The tile size is computed once and shared by every tile of the pass.
    pub fn redraw<C, V, S, H, K>(
        &mut self,
        ctx: &mut DrawContext<'_, C, V, S, H, K>,
        chunk: &Chunk<C>,
    ) -> DrawStats
    where
        C: Clone + PartialEq,
        V: ViewportTransform,
        S: RenderSurface,
        H: TileHost<C, S>,
        K: TileCache<C, S::Drawable>,
    {
        let (rows, cols) = chunk.dimensions();
        let size = ctx.viewport.tile_size();
        let mut stats = DrawStats::default();
        for tile in chunk.iter() {
            stats.record(self.draw_tile(ctx, tile, size));
        }
        debug!(rows, cols, ?stats, "redraw");
        stats
    }

    /// Bring one tile up to date.
    ///
    /// `tile_size` is asked from the viewport when not supplied.
    pub fn update_tile<C, V, S, H, K>(
        &mut self,
        ctx: &mut DrawContext<'_, C, V, S, H, K>,
        tile: &TileData<C>,
        tile_size: Option<TileSize>,
    ) -> TileOutcome
    where
        C: Clone + PartialEq,
        V: ViewportTransform,
        S: RenderSurface,
        H: TileHost<C, S>,
        K: TileCache<C, S::Drawable>,
    {
        let size = tile_size.unwrap_or_else(|| ctx.viewport.tile_size());
        self.draw_tile(ctx, tile, size)
    }

    fn draw_tile<C, V, S, H, K>(
        &mut self,
        ctx: &mut DrawContext<'_, C, V, S, H, K>,
        tile: &TileData<C>,
        size: TileSize,
    ) -> TileOutcome
    where
        C: Clone + PartialEq,
        V: ViewportTransform,
        S: RenderSurface,
        H: TileHost<C, S>,
        K: TileCache<C, S::Drawable>,
    {
        let position = tile.position;
        let mut old = None;
        if let Some(entry) = ctx.cache.get_mut(position) {
            if entry.drawable.is_some() && entry.content == tile.content {
                trace!(%position, "unchanged");
                self.totals.record(TileOutcome::Unchanged);
                return TileOutcome::Unchanged;
            }
            old = entry.drawable.take();
        }

        // Reuse the on-screen center so a re-render lands where the old tile was.
        let removed = old.is_some();
        let center = match old {
            Some(mut drawable) => {
                let center = drawable.center();
                drawable.remove();
                center
            }
            None => ctx.viewport.isometric_coordinates(position),
        };

        let drawable = if ctx.viewport.show_tile(center, size) {
            let mut drawable = ctx.host.create_tile(&mut *ctx.surface, &tile.content, size);
            drawable.bind_click(position);
            drawable.move_to(center.top_left(size));
            Some(drawable)
        } else {
            None
        };

        let outcome = match (removed, drawable.is_some()) {
            (removed, false) => TileOutcome::Culled { removed },
            (false, true) => TileOutcome::Drawn,
            (true, true) => TileOutcome::Redrawn,
        };
        trace!(%position, ?outcome, "tile updated");
        ctx.cache.set(position, tile.content.clone(), drawable);
        self.totals.record(outcome);
        outcome
    }

    /// Remove drawables whose tiles are no longer visible.
    ///
    /// Content stays cached; only the drawable is dropped. Returns how many
    /// drawables were removed.
    pub fn cull_offscreen<C, V, S, H, K>(
        &mut self,
        ctx: &mut DrawContext<'_, C, V, S, H, K>,
    ) -> usize
    where
        V: ViewportTransform,
        S: RenderSurface,
        K: TileCache<C, S::Drawable>,
    {
        let size = ctx.viewport.tile_size();
        let mut culled = 0;
        for position in ctx.cache.positions() {
            let Some(entry) = ctx.cache.get_mut(position) else {
                continue;
            };
            let visible = match entry.drawable.as_ref() {
                Some(drawable) => ctx.viewport.show_tile(drawable.center(), size),
                None => continue,
            };
            if visible {
                continue;
            }
            if let Some(mut drawable) = entry.drawable.take() {
                drawable.remove();
                culled += 1;
            }
        }
        if culled > 0 {
            debug!(culled, "culled off-screen drawables");
            self.totals.removed += culled;
        }
        culled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_fold_outcomes() {
        let mut stats = DrawStats::default();
        for outcome in [
            TileOutcome::Unchanged,
            TileOutcome::Drawn,
            TileOutcome::Redrawn,
            TileOutcome::Culled { removed: true },
            TileOutcome::Culled { removed: false },
        ] {
            stats.record(outcome);
        }
        assert_eq!(
            stats,
            DrawStats {
                unchanged: 1,
                drawn: 2,
                removed: 2,
                culled: 2,
            }
        );
        assert!(!stats.is_quiet());
        assert!(DrawStats::default().is_quiet());
    }
}
