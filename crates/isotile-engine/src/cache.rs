// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory tile cache.

use std::collections::BTreeMap;

use isotile_port::{CacheEntry, LogicalPosition, TileCache};

/// `BTreeMap`-backed [`TileCache`]; positions iterate in sorted order.
#[derive(Debug)]
pub struct MemoryTileCache<C, D> {
    entries: BTreeMap<LogicalPosition, CacheEntry<C, D>>,
}

impl<C, D> Default for MemoryTileCache<C, D> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<C, D> MemoryTileCache<C, D> {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries that currently own a drawable.
    pub fn drawn_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_drawn()).count()
    }
}

impl<C, D> TileCache<C, D> for MemoryTileCache<C, D> {
    fn get(&self, position: LogicalPosition) -> Option<&CacheEntry<C, D>> {
        self.entries.get(&position)
    }

    fn get_mut(&mut self, position: LogicalPosition) -> Option<&mut CacheEntry<C, D>> {
        self.entries.get_mut(&position)
    }

    fn set(&mut self, position: LogicalPosition, content: C, drawable: Option<D>) {
        self.entries
            .insert(position, CacheEntry { content, drawable });
    }

    fn positions(&self) -> Vec<LogicalPosition> {
        self.entries.keys().copied().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
