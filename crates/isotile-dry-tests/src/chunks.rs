// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Chunk builders for terrain fixtures.

use isotile_port::{Chunk, LogicalPosition, TileData};

/// Builds rectangular `Chunk<String>` fixtures row by row.
///
/// # Example
///
/// ```
/// use isotile_dry_tests::ChunkBuilder;
///
/// let chunk = ChunkBuilder::at(0, 0)
///     .row(&["grass", "grass"])
///     .row(&["water", "grass"])
///     .build();
///
/// assert_eq!(chunk.dimensions(), (2, 2));
/// ```
pub struct ChunkBuilder {
    origin: LogicalPosition,
    rows: Vec<Vec<TileData<String>>>,
}

impl ChunkBuilder {
    /// Start a chunk whose first tile sits at `(x, y)`.
    pub fn at(x: i64, y: i64) -> Self {
        Self {
            origin: LogicalPosition::new(x, y),
            rows: Vec::new(),
        }
    }

    /// Append a row; tile `i` of row `r` lands at `origin + (i, r)`.
    pub fn row(mut self, contents: &[&str]) -> Self {
        let y = self.origin.y + i64::try_from(self.rows.len()).unwrap_or(i64::MAX);
        let row = contents
            .iter()
            .zip(self.origin.x..)
            .map(|(content, x)| TileData::new((x, y), (*content).to_string()))
            .collect();
        self.rows.push(row);
        self
    }

    /// Fill a `width` x `height` block with one content value.
    pub fn filled(mut self, width: usize, height: usize, content: &str) -> Self {
        let contents = vec![content; width];
        for _ in 0..height {
            self = self.row(&contents);
        }
        self
    }

    /// Finish the chunk.
    ///
    /// # Panics
    ///
    /// Panics on ragged rows; fixtures are expected to be rectangular.
    #[allow(clippy::expect_used)]
    pub fn build(self) -> Chunk<String> {
        Chunk::from_rows(self.rows).expect("fixture rows must be rectangular")
    }
}
