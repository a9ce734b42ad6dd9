// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for isotile crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`chunks`] - Chunk builders for terrain fixtures
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`host`] - Recording host controller (tile factory + click sink)
//! - [`source`] - Scripted tile source with manual response delivery
//! - [`surface`] - Recording render surface and drawables
//! - [`viewport`] - Grid viewport with an explicit visible window

pub mod chunks;
pub mod config;
pub mod host;
pub mod source;
pub mod surface;
pub mod viewport;

pub use chunks::ChunkBuilder;
pub use config::InMemoryConfigStore;
pub use host::{HostLog, RecordingHost};
pub use source::{ScriptedSource, SourceHandle};
pub use surface::{RecordingDrawable, RecordingSurface, SurfaceLog, SurfaceOp};
pub use viewport::GridViewport;
