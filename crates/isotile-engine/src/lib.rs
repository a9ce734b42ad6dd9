// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Update/redraw engine for streamed isometric tile views.
//!
//! The engine decides, frame by frame, which tiles changed, which are
//! visible and what must be redrawn:
//!
//! - [`DiffDrawEngine`] diffs a fetched [`Chunk`](isotile_port::Chunk)
//!   against the [`TileCache`](isotile_port::TileCache), culls off-screen
//!   tiles and creates/removes drawables.
//! - [`UpdateLoop`] throttles refresh requests, sequences them, applies
//!   responses and advances animation on idle frames.
//! - [`ViewportController`] handles resize and pan, recording a
//!   [`DirtyRegion`] for the next applied refresh.
//! - [`TileView`] owns every collaborator and drives the loop.
//!
//! Everything runs on one thread; the only asynchronous boundary is the
//! [`TileSource`](isotile_port::TileSource), whose completions are drained at
//! the start of each tick.

mod cache;
mod camera;
mod controller;
mod diff;
mod update_loop;
mod view;

pub use cache::MemoryTileCache;
pub use camera::IsoCamera;
pub use controller::{DirtyRegion, ViewportController};
pub use diff::{DiffDrawEngine, DrawContext, DrawStats, TileOutcome};
pub use update_loop::{FrameParts, TickReport, UpdateLoop};
pub use view::{TileView, ViewState, UNSUPPORTED_NOTICE};
