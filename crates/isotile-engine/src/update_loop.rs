// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-frame update loop: apply responses, throttle refreshes, animate.

use std::time::{Duration, Instant};

use isotile_app_core::prefs::ViewPrefs;
use isotile_port::{
    Animator, RenderSurface, RequestSeq, SourceResponse, TileCache, TileHost, TileSource,
    ViewportTransform,
};
use tracing::{debug, warn};

use crate::controller::ViewportController;
use crate::diff::{DiffDrawEngine, DrawContext, DrawStats};

/// Everything one tick needs besides the loop's own state.
pub struct FrameParts<'a, C, V, S, H, K, Src, A> {
    /// Draw collaborators.
    pub draw: DrawContext<'a, C, V, S, H, K>,
    /// Where refreshes are requested and completions drained.
    pub source: &'a mut Src,
    /// Advanced on frames that issue no refresh.
    pub animator: &'a mut A,
    /// Holds the dirty region consumed by the next applied refresh.
    pub controller: &'a mut ViewportController,
}

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Sequence number of the refresh issued this tick.
    pub refreshed: Option<RequestSeq>,
    /// Responses applied to the cache and surface.
    pub applied: usize,
    /// Responses dropped because a newer one had already been applied.
    pub stale: usize,
    /// Failed fetches.
    pub failed: usize,
    /// Drawables removed by dirty-region culling.
    pub culled: usize,
    /// Draw counters of every applied response.
    pub stats: DrawStats,
    /// Whether the animator was advanced.
    pub animated: bool,
    /// The view is disabled and did nothing.
    pub disabled: bool,
}

impl TickReport {
    /// Report of a tick skipped because the view is disabled.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }
}

/// Throttled refresh scheduling plus response sequencing.
///
/// At most one refresh is issued per `refresh_interval`; the marker is
/// taken when the request goes out, not when it completes. A response is
/// applied only if its sequence number is newer than the last applied one.
#[derive(Debug)]
pub struct UpdateLoop {
    engine: DiffDrawEngine,
    refresh_interval: Duration,
    max_responses_per_tick: usize,
    last_refresh: Option<Instant>,
    last_issued: Option<RequestSeq>,
    last_applied: Option<RequestSeq>,
}

impl UpdateLoop {
    /// Loop refreshing at most once per `refresh_interval`.
    pub fn new(refresh_interval: Duration, max_responses_per_tick: usize) -> Self {
        Self {
            engine: DiffDrawEngine::new(),
            refresh_interval,
            max_responses_per_tick: max_responses_per_tick.max(1),
            last_refresh: None,
            last_issued: None,
            last_applied: None,
        }
    }

    /// Loop configured from persisted preferences.
    pub fn from_prefs(prefs: &ViewPrefs) -> Self {
        Self::new(prefs.refresh_interval(), prefs.max_responses_per_tick)
    }

    /// Draw engine used for applied responses.
    pub fn engine(&self) -> &DiffDrawEngine {
        &self.engine
    }

    /// Mutable draw engine, for direct redraws outside a tick.
    pub fn engine_mut(&mut self) -> &mut DiffDrawEngine {
        &mut self.engine
    }

    /// Configured throttle interval.
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// When the last refresh was issued.
    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    /// Sequence number of the last issued refresh.
    pub fn last_issued(&self) -> Option<RequestSeq> {
        self.last_issued
    }

    /// Sequence number of the last applied response.
    pub fn last_applied(&self) -> Option<RequestSeq> {
        self.last_applied
    }

    /// True when strictly more than `refresh_interval` has passed since the
    /// last refresh, or none was ever issued.
    pub fn refresh_due(&self, now: Instant) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.refresh_interval,
        }
    }

    /// Run one frame.
    ///
    /// Pending responses are applied first. Then either a refresh is issued
    /// (when due) or the animator advances; never both.
    pub fn tick<C, V, S, H, K, Src, A>(
        &mut self,
        now: Instant,
        parts: &mut FrameParts<'_, C, V, S, H, K, Src, A>,
    ) -> TickReport
    where
        C: Clone + PartialEq,
        V: ViewportTransform,
        S: RenderSurface,
        H: TileHost<C, S>,
        K: TileCache<C, S::Drawable>,
        Src: TileSource<C>,
        A: Animator,
    {
        let mut report = TickReport::default();
        self.apply_responses(parts, &mut report);

        if self.refresh_due(now) {
            let seq = self.issue_refresh::<C, _, _>(now, parts.draw.viewport, parts.source);
            report.refreshed = Some(seq);
        } else {
            parts.animator.advance(now);
            report.animated = true;
        }
        report
    }

    fn issue_refresh<C, V, Src>(
        &mut self,
        now: Instant,
        viewport: &V,
        source: &mut Src,
    ) -> RequestSeq
    where
        V: ViewportTransform,
        Src: TileSource<C>,
    {
        let bounds = viewport.screen_outer_bounds();
        let seq = self.last_issued.map_or(RequestSeq(1), RequestSeq::next);
        self.last_refresh = Some(now);
        self.last_issued = Some(seq);
        debug!(%seq, %bounds, "refresh");
        source.request(seq, bounds);
        seq
    }

    fn apply_responses<C, V, S, H, K, Src, A>(
        &mut self,
        parts: &mut FrameParts<'_, C, V, S, H, K, Src, A>,
        report: &mut TickReport,
    ) where
        C: Clone + PartialEq,
        V: ViewportTransform,
        S: RenderSurface,
        H: TileHost<C, S>,
        K: TileCache<C, S::Drawable>,
        Src: TileSource<C>,
    {
        let responses = parts.source.drain_responses(self.max_responses_per_tick);
        for SourceResponse { seq, result } in responses {
            let chunk = match result {
                Ok(chunk) => chunk,
                Err(err) => {
                    warn!(%seq, error = %err, "tile refresh failed");
                    report.failed += 1;
                    continue;
                }
            };
            if self.last_applied.is_some_and(|last| seq <= last) {
                debug!(%seq, last_applied = ?self.last_applied, "dropping stale response");
                report.stale += 1;
                continue;
            }
            if let Some(dirty) = parts.controller.take_dirty() {
                debug!(?dirty, "reconciling dirty region");
                report.culled += self.engine.cull_offscreen(&mut parts.draw);
            }
            report.stats += self.engine.redraw(&mut parts.draw, &chunk);
            self.last_applied = Some(seq);
            report.applied += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isotile_dry_tests::{
        ChunkBuilder, GridViewport, RecordingDrawable, RecordingHost, RecordingSurface,
        ScriptedSource, SourceHandle,
    };
    use isotile_port::{NullAnimator, SourceError, ViewportSize};

    use crate::cache::MemoryTileCache;

    struct Rig {
        viewport: GridViewport,
        surface: RecordingSurface,
        host: RecordingHost,
        cache: MemoryTileCache<String, RecordingDrawable>,
        source: ScriptedSource<String>,
        controller: ViewportController,
    }

    impl Rig {
        fn new() -> (Self, SourceHandle<String>) {
            let (source, handle) = ScriptedSource::new();
            (
                Self {
                    viewport: GridViewport::new(ViewportSize::new(400, 400)),
                    surface: RecordingSurface::new(),
                    host: RecordingHost::default(),
                    cache: MemoryTileCache::new(),
                    source,
                    controller: ViewportController::new(Duration::ZERO),
                },
                handle,
            )
        }

        fn tick(&mut self, update: &mut UpdateLoop, now: Instant) -> TickReport {
            let mut animator = NullAnimator;
            let mut parts = FrameParts {
                draw: DrawContext::new(
                    &self.viewport,
                    &mut self.surface,
                    &mut self.host,
                    &mut self.cache,
                ),
                source: &mut self.source,
                animator: &mut animator,
                controller: &mut self.controller,
            };
            update.tick(now, &mut parts)
        }
    }

    #[test]
    fn throttle_is_strictly_greater_than_interval() {
        let mut update = UpdateLoop::new(Duration::from_millis(200), 16);
        let t0 = Instant::now();
        assert!(update.refresh_due(t0));
        let (mut rig, handle) = Rig::new();
        assert_eq!(rig.tick(&mut update, t0).refreshed, Some(RequestSeq(1)));
        assert!(!update.refresh_due(t0 + Duration::from_millis(200)));
        assert!(update.refresh_due(t0 + Duration::from_millis(201)));
        assert_eq!(handle.request_count(), 1);
    }

    #[test]
    fn idle_frames_animate_instead_of_refreshing() {
        let mut update = UpdateLoop::new(Duration::from_millis(200), 16);
        let (mut rig, handle) = Rig::new();
        let t0 = Instant::now();
        let first = rig.tick(&mut update, t0);
        assert!(!first.animated);
        let second = rig.tick(&mut update, t0 + Duration::from_millis(16));
        assert!(second.animated);
        assert_eq!(second.refreshed, None);
        assert_eq!(handle.request_count(), 1);
    }

    #[test]
    fn older_response_after_newer_is_dropped() {
        let mut update = UpdateLoop::new(Duration::ZERO, 16);
        let (mut rig, handle) = Rig::new();
        let t0 = Instant::now();
        rig.tick(&mut update, t0);
        rig.tick(&mut update, t0 + Duration::from_millis(1));
        handle.respond(RequestSeq(2), ChunkBuilder::at(0, 0).row(&["water"]).build());
        handle.respond(RequestSeq(1), ChunkBuilder::at(0, 0).row(&["grass"]).build());
        let report = rig.tick(&mut update, t0 + Duration::from_millis(2));
        assert_eq!((report.applied, report.stale), (1, 1));
        assert_eq!(update.last_applied(), Some(RequestSeq(2)));
        assert_eq!(rig.host.log().borrow().created, ["water"]);
    }

    #[test]
    fn older_success_lands_when_the_newer_request_failed() {
        let mut update = UpdateLoop::new(Duration::ZERO, 16);
        let (mut rig, handle) = Rig::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(1);
        rig.tick(&mut update, t0);
        rig.tick(&mut update, t1);
        assert_eq!(update.last_issued(), Some(RequestSeq(2)));

        handle.fail(RequestSeq(2), SourceError::Transport("reset".into()));
        let report = rig.tick(&mut update, t1);
        assert_eq!((report.failed, report.applied), (1, 0));

        // Staleness is judged against the last applied response, not the last issued.
        handle.respond(RequestSeq(1), ChunkBuilder::at(0, 0).row(&["grass"]).build());
        let report = rig.tick(&mut update, t1);
        assert_eq!((report.applied, report.stale), (1, 0));
        assert_eq!(update.last_applied(), Some(RequestSeq(1)));
        assert_eq!(rig.host.log().borrow().created, ["grass"]);
    }

    #[test]
    fn failure_is_counted_and_leaves_sequence_untouched() {
        let mut update = UpdateLoop::new(Duration::ZERO, 16);
        let (mut rig, handle) = Rig::new();
        let t0 = Instant::now();
        rig.tick(&mut update, t0);
        handle.fail(RequestSeq(1), SourceError::Status(503));
        let report = rig.tick(&mut update, t0 + Duration::from_millis(1));
        assert_eq!(report.failed, 1);
        assert_eq!(update.last_applied(), None);
        assert!(rig.surface.snapshot().live.is_empty());
    }

    #[test]
    fn response_budget_caps_drain() {
        let mut update = UpdateLoop::new(Duration::from_secs(60), 1);
        let (mut rig, handle) = Rig::new();
        let t0 = Instant::now();
        rig.tick(&mut update, t0);
        handle.respond(RequestSeq(1), ChunkBuilder::at(0, 0).row(&["a"]).build());
        handle.respond(RequestSeq(2), ChunkBuilder::at(0, 0).row(&["b"]).build());
        assert_eq!(rig.tick(&mut update, t0).applied, 1);
        assert_eq!(handle.pending(), 1);
        assert_eq!(rig.tick(&mut update, t0).applied, 1);
    }
}
