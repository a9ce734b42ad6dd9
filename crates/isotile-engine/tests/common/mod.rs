// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code, missing_docs)]

use isotile_app_core::prefs::ViewPrefs;
use isotile_dry_tests::{
    GridViewport, RecordingDrawable, RecordingHost, RecordingSurface, ScriptedSource,
    SourceHandle,
};
use isotile_engine::{MemoryTileCache, TileView};
use isotile_port::ViewportSize;

pub type TestView = TileView<
    String,
    GridViewport,
    RecordingSurface,
    RecordingHost,
    ScriptedSource<String>,
    MemoryTileCache<String, RecordingDrawable>,
>;

/// 400x400 view over a 100-unit grid with 50x50 tiles: cells 0..=4 visible.
pub fn view() -> (TestView, SourceHandle<String>) {
    view_with(RecordingSurface::new(), &ViewPrefs::default())
}

pub fn view_with(surface: RecordingSurface, prefs: &ViewPrefs) -> (TestView, SourceHandle<String>) {
    let (source, handle) = ScriptedSource::new();
    let view = TileView::new(
        GridViewport::new(ViewportSize::new(400, 400)),
        surface,
        RecordingHost::default(),
        source,
        MemoryTileCache::new(),
        prefs,
    );
    (view, handle)
}
