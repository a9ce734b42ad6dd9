// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]

mod common;

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use isotile_app_core::prefs::ViewPrefs;
use isotile_dry_tests::{ChunkBuilder, RecordingSurface};
use isotile_engine::{ViewState, UNSUPPORTED_NOTICE};
use isotile_port::{
    LogicalPosition, OuterBounds, RequestSeq, SourceError, TileCache, ViewportSize,
};
use tokio::sync::watch;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn ticks_50ms_apart_fetch_once() {
    let (mut view, handle) = common::view();
    let t0 = Instant::now();
    view.tick(t0);
    view.tick(t0 + ms(50));
    assert_eq!(handle.request_count(), 1);
}

#[test]
fn ticks_250ms_apart_fetch_twice() {
    let (mut view, handle) = common::view();
    let t0 = Instant::now();
    view.tick(t0);
    view.tick(t0 + ms(250));
    assert_eq!(handle.request_count(), 2);
    let seqs: Vec<_> = handle.requests().into_iter().map(|(seq, _)| seq).collect();
    assert_eq!(seqs, [RequestSeq(1), RequestSeq(2)]);
}

#[test]
fn refresh_requests_current_outer_bounds() {
    let (mut view, handle) = common::view();
    view.move_by(250.0, 0.0);
    view.tick(Instant::now());
    assert_eq!(handle.requests()[0].1, OuterBounds::new(2, 0, 6, 4));
}

#[test]
fn throttle_gates_attempts_not_responses() {
    let (mut view, handle) = common::view();
    let t0 = Instant::now();
    view.tick(t0);
    // The response takes longer than the interval; the marker was already set.
    view.tick(t0 + ms(150));
    handle.respond_latest(ChunkBuilder::at(0, 0).row(&["grass"]).build());
    let report = view.tick(t0 + ms(190));
    assert_eq!(report.applied, 1);
    assert_eq!(report.refreshed, None);
    assert!(view.tick(t0 + ms(201)).refreshed.is_some());
}

#[test]
fn idle_ticks_advance_the_animator() {
    let frames = Rc::new(Cell::new(0));
    let counter = Rc::clone(&frames);
    let (view, _handle) = common::view();
    let mut view = view.with_animator(move |_now: Instant| counter.set(counter.get() + 1));
    let t0 = Instant::now();
    view.tick(t0);
    view.tick(t0 + ms(16));
    view.tick(t0 + ms(32));
    assert_eq!(frames.get(), 2);
}

#[test]
fn failed_fetch_leaves_state_untouched() {
    let (mut view, handle) = common::view();
    let t0 = Instant::now();
    view.tick(t0);
    handle.respond_latest(ChunkBuilder::at(0, 0).filled(2, 2, "grass").build());
    view.tick(t0 + ms(10));
    let ops = view.surface().snapshot().ops.len();

    view.tick(t0 + ms(300));
    if let Some(seq) = handle.last_seq() {
        handle.fail(seq, SourceError::Transport("connection reset".into()));
    }
    let report = view.tick(t0 + ms(310));
    assert_eq!((report.failed, report.applied), (1, 0));
    assert_eq!(view.surface().snapshot().ops.len(), ops);
    assert_eq!(view.cache().len(), 4);

    // The loop keeps going on the next window.
    assert!(view.tick(t0 + ms(600)).refreshed.is_some());
}

#[test]
fn decode_failure_is_treated_like_transport_failure() {
    let (mut view, handle) = common::view();
    let t0 = Instant::now();
    view.tick(t0);
    handle.fail(RequestSeq(1), SourceError::Decode("expected array".into()));
    let report = view.tick(t0 + ms(10));
    assert_eq!(report.failed, 1);
    assert!(view.cache().is_empty());
}

#[test]
fn stale_response_is_discarded() {
    let (mut view, handle) = common::view();
    let t0 = Instant::now();
    view.tick(t0);
    view.tick(t0 + ms(250));
    handle.respond(RequestSeq(2), ChunkBuilder::at(0, 0).row(&["water"]).build());
    handle.respond(RequestSeq(1), ChunkBuilder::at(0, 0).row(&["grass"]).build());
    let report = view.tick(t0 + ms(260));
    assert_eq!((report.applied, report.stale), (1, 1));
    assert_eq!(
        view.cache().get(LogicalPosition::new(0, 0)).map(|e| e.content.as_str()),
        Some("water")
    );
}

#[test]
fn resize_smaller_then_refresh_culls_stale_drawables() {
    let (mut view, handle) = common::view();
    let t0 = Instant::now();
    view.tick(t0);
    handle.respond_latest(ChunkBuilder::at(0, 0).filled(5, 5, "grass").build());
    view.tick(t0 + ms(10));
    assert_eq!(view.surface().snapshot().live.len(), 25);

    view.resize(&ViewportSize::new(150, 150));
    // Nothing is evicted until a refresh lands.
    assert_eq!(view.surface().snapshot().live.len(), 25);
    assert!(view.controller().dirty().is_some());

    view.tick(t0 + ms(300));
    assert_eq!(handle.requests()[1].1, OuterBounds::new(0, 0, 1, 1));
    handle.respond_latest(ChunkBuilder::at(0, 0).filled(2, 2, "grass").build());
    let report = view.tick(t0 + ms(310));

    assert_eq!(report.culled, 21);
    assert_eq!(report.stats.unchanged, 4);
    let log = view.surface().snapshot();
    assert_eq!(log.live.len(), 4);
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(log.live_count_at(LogicalPosition::new(x, y)), 1);
    }
    drop(log);
    assert_eq!(view.cache().len(), 25);
    let far = view.cache().get(LogicalPosition::new(4, 4));
    assert!(far.is_some_and(|e| !e.is_drawn()));
    assert!(view.controller().dirty().is_none());
}

#[test]
fn pan_defers_revealed_tiles_to_next_refresh() {
    let (mut view, handle) = common::view();
    let t0 = Instant::now();
    view.tick(t0);
    handle.respond_latest(ChunkBuilder::at(0, 0).filled(8, 1, "grass").build());
    view.tick(t0 + ms(10));
    assert_eq!(view.surface().snapshot().live.len(), 5);

    view.move_by(300.0, 0.0);
    assert_eq!(view.surface().snapshot().group_offset, (-300.0, 0.0));
    assert_eq!(view.surface().snapshot().live.len(), 5);
    assert_eq!(view.tick(t0 + ms(20)).stats, Default::default());

    view.tick(t0 + ms(300));
    handle.respond_latest(ChunkBuilder::at(0, 0).filled(8, 1, "grass").build());
    let report = view.tick(t0 + ms(310));
    // Window is now [300, 700]: cells 0..=2 fall out, 5..=7 come in.
    assert_eq!(report.culled, 3);
    assert_eq!(report.stats.drawn, 3);
    assert_eq!(report.stats.unchanged, 2);
    let log = view.surface().snapshot();
    assert!(log.live_at(LogicalPosition::new(7, 0)).is_some());
    assert!(log.live_at(LogicalPosition::new(1, 0)).is_none());
}

#[test]
fn clicks_reach_the_host() {
    let (mut view, handle) = common::view();
    let t0 = Instant::now();
    view.tick(t0);
    handle.respond_latest(ChunkBuilder::at(0, 0).filled(2, 2, "grass").build());
    view.tick(t0 + ms(10));

    let log = view.surface().log();
    assert!(RecordingSurface::click(&log, LogicalPosition::new(1, 0)));
    view.tick(t0 + ms(20));
    let clicks = view.host().log().borrow().clicks.clone();
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].position, LogicalPosition::new(1, 0));
}

#[test]
fn unsupported_surface_shows_notice_and_stays_inert() {
    let (mut view, handle) =
        common::view_with(RecordingSurface::unsupported(), &ViewPrefs::default());
    assert_eq!(view.state(), ViewState::Disabled);
    assert_eq!(view.surface().snapshot().notice.as_deref(), Some(UNSUPPORTED_NOTICE));
    let report = view.tick(Instant::now());
    assert!(report.disabled);
    assert_eq!(handle.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn start_runs_until_stopped() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let (mut view, handle) = common::view();
    let (stop_tx, stop_rx) = watch::channel(false);
    let stopper = async move {
        tokio::time::sleep(ms(500)).await;
        let _ = stop_tx.send(true);
    };
    let (ticks, ()) = tokio::join!(view.start(stop_rx), stopper);
    assert!(ticks >= 20, "ran {ticks} ticks");
    // 500ms of frames at the default 200ms throttle.
    assert!((2..=3).contains(&handle.request_count()));
}

#[tokio::test(start_paused = true)]
async fn start_returns_immediately_when_already_stopped() {
    let (mut view, handle) = common::view();
    let (_stop_tx, stop_rx) = watch::channel(true);
    assert_eq!(view.start(stop_rx).await, 0);
    assert_eq!(handle.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropped_stop_sender_ends_the_loop() {
    let (mut view, _handle) = common::view();
    let (stop_tx, stop_rx) = watch::channel(false);
    drop(stop_tx);
    let ticks = view.start(stop_rx).await;
    assert!(ticks <= 1);
}
