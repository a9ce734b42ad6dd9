// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! egui adapter for the isotile rendering surface.
//!
//! [`EguiSurface`] keeps a retained list of painted tiles and repaints them
//! every frame with an [`egui::Painter`]. Drawables are handles into that
//! list. Pointer clicks are hit-tested against the tile diamonds and queued
//! until the engine drains them.

mod host;
mod scene;
mod surface;

pub use host::PaletteHost;
pub use scene::PaintedTile;
pub use surface::{EguiDrawable, EguiSurface};
