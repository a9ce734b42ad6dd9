// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port contract for the isotile view engine.
//!
//! This crate defines the domain types (logical positions, tile data, chunks)
//! and the traits the engine consumes from its collaborators: the viewport
//! transform, the tile cache, the rendering surface, the host controller and
//! the tile source. It contains NO serialization logic; that lives in
//! isotile-codec.
//!
//! # Design Principles
//!
//! - **Surfaces are dumb**: they create, move and remove drawables. No diffing.
//! - **No time ownership**: timestamps are passed in by the frame driver.
//! - **Sequenced requests**: every refresh carries a [`RequestSeq`] so late
//!   responses can be recognised and dropped.

use thiserror::Error;

/// Error raised when a chunk is not rectangular.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// A row's length differs from the first row's length.
    #[error("ragged chunk: row {row} has {found} tiles, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
}

/// Error reported by a [`TileSource`] for a failed refresh.
///
/// Variants carry rendered messages so responses can cross thread boundaries
/// without dragging transport types into the port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The request never produced a response (connect, timeout, I/O).
    #[error("transport error: {0}")]
    Transport(String),
    /// The remote answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),
    /// The body could not be decoded into a chunk.
    #[error("decode error: {0}")]
    Decode(String),
}

mod geometry;
mod port;
mod types;

pub use geometry::{OuterBounds, ScreenCenter, ScreenPoint, TileSize, ViewportSize};
pub use port::{
    Animator, Drawable, HostContainer, NullAnimator, RenderSurface, TileCache, TileHost,
    TileSource, ViewportTransform,
};
pub use types::{CacheEntry, Chunk, LogicalPosition, RequestSeq, SourceResponse, TileClick, TileData};
