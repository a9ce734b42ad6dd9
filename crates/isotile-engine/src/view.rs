// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `TileView`: owns the collaborators and drives the update loop.

use core::marker::PhantomData;
use std::time::{Duration, Instant};

use isotile_app_core::prefs::ViewPrefs;
use isotile_port::{
    Animator, Chunk, HostContainer, NullAnimator, RenderSurface, TileCache, TileData, TileHost,
    TileSize, TileSource, ViewportTransform,
};
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::controller::ViewportController;
use crate::diff::{DrawContext, DrawStats, TileOutcome};
use crate::update_loop::{FrameParts, TickReport, UpdateLoop};

/// Text shown when the rendering surface is unusable.
pub const UNSUPPORTED_NOTICE: &str =
    "This environment does not support the rendering surface needed to display the tile view.";

/// Clicks routed to the host per frame.
const MAX_CLICKS_PER_FRAME: usize = 64;

/// Lifecycle of a [`TileView`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewState {
    /// Surface supported; operations run.
    Active,
    /// Surface unsupported; every operation is a no-op.
    Disabled,
}

/// Isometric tile view over content type `C`.
///
/// Generic over every collaborator: viewport transform `V`, render surface
/// `S`, host `H`, tile source `Src`, cache `K` and animator `A`.
pub struct TileView<C, V, S, H, Src, K, A = NullAnimator> {
    viewport: V,
    surface: S,
    host: H,
    source: Src,
    cache: K,
    animator: A,
    update: UpdateLoop,
    controller: ViewportController,
    frame_interval: Duration,
    state: ViewState,
    content: PhantomData<fn(&C)>,
}

impl<C, V, S, H, Src, K> TileView<C, V, S, H, Src, K>
where
    C: Clone + PartialEq,
    V: ViewportTransform,
    S: RenderSurface,
    H: TileHost<C, S>,
    Src: TileSource<C>,
    K: TileCache<C, S::Drawable>,
{
    /// Build a view and check the surface.
    ///
    /// On an unsupported surface the notice is shown and the view starts
    /// [`ViewState::Disabled`]; otherwise the host builds its UI.
    pub fn new(viewport: V, surface: S, host: H, source: Src, cache: K, prefs: &ViewPrefs) -> Self {
        let mut view = Self {
            viewport,
            surface,
            host,
            source,
            cache,
            animator: NullAnimator,
            update: UpdateLoop::from_prefs(prefs),
            controller: ViewportController::new(prefs.pan_transition()),
            frame_interval: prefs.frame_interval(),
            state: ViewState::Active,
            content: PhantomData,
        };
        view.init();
        view
    }
}

impl<C, V, S, H, Src, K, A> TileView<C, V, S, H, Src, K, A>
where
    C: Clone + PartialEq,
    V: ViewportTransform,
    S: RenderSurface,
    H: TileHost<C, S>,
    Src: TileSource<C>,
    K: TileCache<C, S::Drawable>,
    A: Animator,
{
    fn init(&mut self) {
        if self.surface.is_supported() {
            self.host.create_ui(&mut self.surface);
            info!(server = self.host.server_url(), "tile view ready");
        } else {
            warn!("rendering surface unsupported; tile view disabled");
            self.surface.show_notice(UNSUPPORTED_NOTICE);
            self.state = ViewState::Disabled;
        }
    }

    /// Swap in the per-frame animation hook.
    pub fn with_animator<B: Animator>(self, animator: B) -> TileView<C, V, S, H, Src, K, B> {
        TileView {
            viewport: self.viewport,
            surface: self.surface,
            host: self.host,
            source: self.source,
            cache: self.cache,
            animator,
            update: self.update,
            controller: self.controller,
            frame_interval: self.frame_interval,
            state: self.state,
            content: PhantomData,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// True when the surface was unsupported.
    pub fn is_disabled(&self) -> bool {
        self.state == ViewState::Disabled
    }

    /// Run one frame: route clicks, then apply responses and either refresh
    /// or animate.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        if self.is_disabled() {
            return TickReport::disabled();
        }
        self.dispatch_clicks();
        let mut parts = FrameParts {
            draw: DrawContext::new(
                &self.viewport,
                &mut self.surface,
                &mut self.host,
                &mut self.cache,
            ),
            source: &mut self.source,
            animator: &mut self.animator,
            controller: &mut self.controller,
        };
        self.update.tick(now, &mut parts)
    }

    /// Forward pending tile clicks to the host. Returns how many were routed.
    pub fn dispatch_clicks(&mut self) -> usize {
        if self.is_disabled() {
            return 0;
        }
        let clicks = self.surface.drain_clicks(MAX_CLICKS_PER_FRAME);
        for click in &clicks {
            debug!(position = %click.position, "tile clicked");
            self.host.on_click(click);
        }
        clicks.len()
    }

    /// Match the viewport to the container's size.
    ///
    /// Nothing is evicted here; drawables that fell outside are removed
    /// when the next refresh is applied.
    pub fn resize(&mut self, container: &impl HostContainer) {
        if self.is_disabled() {
            return;
        }
        self.controller
            .resize(container, &mut self.viewport, &mut self.surface);
    }

    /// Pan the view by `(dx, dy)` screen units.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        if self.is_disabled() {
            return;
        }
        self.controller
            .move_by(dx, dy, &mut self.viewport, &mut self.surface);
    }

    /// Apply a chunk directly, outside the refresh cycle.
    pub fn redraw(&mut self, chunk: &Chunk<C>) -> DrawStats {
        if self.is_disabled() {
            return DrawStats::default();
        }
        let mut ctx = DrawContext::new(
            &self.viewport,
            &mut self.surface,
            &mut self.host,
            &mut self.cache,
        );
        self.update.engine_mut().redraw(&mut ctx, chunk)
    }

    /// Bring a single tile up to date. `None` when the view is disabled.
    pub fn update_tile(
        &mut self,
        tile: &TileData<C>,
        tile_size: Option<TileSize>,
    ) -> Option<TileOutcome> {
        if self.is_disabled() {
            return None;
        }
        let mut ctx = DrawContext::new(
            &self.viewport,
            &mut self.surface,
            &mut self.host,
            &mut self.cache,
        );
        Some(self.update.engine_mut().update_tile(&mut ctx, tile, tile_size))
    }

    /// Tick every frame interval until `stop` turns `true` or its sender
    /// is dropped. Returns the number of ticks run.
    ///
    /// The future borrows the view and is polled on the thread that owns
    /// the surface.
    #[allow(clippy::future_not_send)]
    pub async fn start(&mut self, stop: watch::Receiver<bool>) -> u64 {
        let frame_interval = self.frame_interval;
        self.run(frame_interval, stop).await
    }

    /// Like [`Self::start`] with an explicit frame interval.
    #[allow(clippy::future_not_send)]
    pub async fn run(&mut self, frame_interval: Duration, mut stop: watch::Receiver<bool>) -> u64 {
        if self.is_disabled() {
            return 0;
        }
        let mut interval = time::interval(frame_interval.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(?frame_interval, "update loop started");
        let mut ticks = 0;
        while !*stop.borrow() {
            tokio::select! {
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                at = interval.tick() => {
                    self.tick(at.into_std());
                    ticks += 1;
                }
            }
        }
        info!(ticks, "update loop stopped");
        ticks
    }

    /// Viewport transform.
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Render surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable render surface, e.g. to paint it from a UI callback.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Host callbacks.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Tile cache.
    pub fn cache(&self) -> &K {
        &self.cache
    }

    /// Refresh scheduling state.
    pub fn update_loop(&self) -> &UpdateLoop {
        &self.update
    }

    /// Resize/pan bookkeeping.
    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    /// Configured frame interval.
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}
