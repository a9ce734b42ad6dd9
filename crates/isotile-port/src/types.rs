// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core tile types for the view engine contract.
//!
//! These types are pure domain objects with no serialization logic.
//! JSON encoding is handled by isotile-codec.

use core::fmt;

use crate::{ChunkError, SourceError};

/// Integer coordinate of a tile on the unbounded logical grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalPosition {
    /// Grid column.
    pub x: i64,
    /// Grid row.
    pub y: i64,
}

impl LogicalPosition {
    /// Construct a position from its grid coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for LogicalPosition {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for LogicalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One tile as reported by the tile source.
///
/// `content` is opaque to the engine; it is only compared with `PartialEq`
/// to decide whether the tile changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileData<C> {
    /// Where the tile lives.
    pub position: LogicalPosition,
    /// What the tile shows.
    pub content: C,
}

impl<C> TileData<C> {
    /// Construct a tile.
    pub fn new(position: impl Into<LogicalPosition>, content: C) -> Self {
        Self {
            position: position.into(),
            content,
        }
    }
}

/// Rectangular batch of tiles covering one viewport-aligned region.
///
/// Rows are guaranteed to share one length; construct through
/// [`Chunk::from_rows`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk<C> {
    rows: Vec<Vec<TileData<C>>>,
}

impl<C> Chunk<C> {
    /// Build a chunk, rejecting ragged rows.
    pub fn from_rows(rows: Vec<Vec<TileData<C>>>) -> Result<Self, ChunkError> {
        if let Some(first) = rows.first() {
            let expected = first.len();
            if let Some((row, found)) = rows
                .iter()
                .map(Vec::len)
                .enumerate()
                .find(|(_, len)| *len != expected)
            {
                return Err(ChunkError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
        }
        Ok(Self { rows })
    }

    /// An empty chunk.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// `(rows, row_len)` derived from the chunk's own shape.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }

    /// Number of tiles in the chunk.
    pub fn len(&self) -> usize {
        let (rows, cols) = self.dimensions();
        rows * cols
    }

    /// True when the chunk holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &TileData<C>> + '_ {
        self.rows.iter().flatten()
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Vec<TileData<C>>] {
        &self.rows
    }

    /// Consume the chunk and return its rows.
    pub fn into_rows(self) -> Vec<Vec<TileData<C>>> {
        self.rows
    }
}

/// Last known state of one logical position.
///
/// `drawable` is `None` when the tile exists logically but was culled at the
/// last draw.
#[derive(Debug)]
pub struct CacheEntry<C, D> {
    /// Most recently received content for the position.
    pub content: C,
    /// On-screen handle, if the tile was visible when last drawn.
    pub drawable: Option<D>,
}

impl<C, D> CacheEntry<C, D> {
    /// True when the entry owns a drawable.
    pub fn is_drawn(&self) -> bool {
        self.drawable.is_some()
    }
}

/// Click on a drawn tile, forwarded to the host controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileClick {
    /// Logical position bound to the clicked drawable.
    pub position: LogicalPosition,
}

/// Monotonically increasing identifier of a refresh request.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

impl RequestSeq {
    /// The sequence number following this one.
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completed refresh request as delivered by a [`crate::TileSource`].
#[derive(Debug)]
pub struct SourceResponse<C> {
    /// The request this response answers.
    pub seq: RequestSeq,
    /// Decoded chunk, or why there is none.
    pub result: Result<Chunk<C>, SourceError>,
}
