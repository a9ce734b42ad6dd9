// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host that paints string content with a fixed palette.

use std::collections::BTreeMap;

use egui::Color32;
use isotile_port::{TileClick, TileHost, TileSize};
use tracing::info;

use crate::surface::{EguiDrawable, EguiSurface};

/// [`TileHost`] for `String` content.
///
/// Known terrain names get fixed colors; anything else gets a stable color
/// derived from the text.
#[derive(Debug)]
pub struct PaletteHost {
    server_url: String,
    palette: BTreeMap<String, Color32>,
    selected: Option<TileClick>,
}

impl PaletteHost {
    /// Host fetching from `server_url` with the default terrain palette.
    pub fn new(server_url: impl Into<String>) -> Self {
        let palette = [
            ("grass", Color32::from_rgb(96, 160, 72)),
            ("water", Color32::from_rgb(64, 112, 200)),
            ("sand", Color32::from_rgb(220, 200, 140)),
            ("dirt", Color32::from_rgb(128, 92, 60)),
            ("stone", Color32::from_rgb(140, 140, 150)),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_owned(), color))
        .collect();
        Self {
            server_url: server_url.into(),
            palette,
            selected: None,
        }
    }

    /// Add or override a palette entry.
    pub fn with_color(mut self, name: impl Into<String>, color: Color32) -> Self {
        self.palette.insert(name.into(), color);
        self
    }

    /// Fill used for `content`.
    pub fn color_for(&self, content: &str) -> Color32 {
        if let Some(color) = self.palette.get(content) {
            return *color;
        }
        // FNV-1a
        let hash = content
            .bytes()
            .fold(0x811c_9dc5_u32, |h, b| (h ^ u32::from(b)).wrapping_mul(0x0100_0193));
        let [r, g, b, _] = hash.to_le_bytes();
        Color32::from_rgb(r, g, b)
    }

    /// Most recently clicked tile.
    pub fn selected(&self) -> Option<TileClick> {
        self.selected
    }
}

impl TileHost<String, EguiSurface> for PaletteHost {
    fn create_tile(
        &mut self,
        surface: &mut EguiSurface,
        content: &String,
        size: TileSize,
    ) -> EguiDrawable {
        surface.spawn(content.as_str(), self.color_for(content), size)
    }

    fn on_click(&mut self, click: &TileClick) {
        info!(position = %click.position, "tile selected");
        self.selected = Some(*click);
    }

    fn create_ui(&mut self, surface: &mut EguiSurface) {
        surface.set_caption(format!("tiles: {}", self.server_url));
    }

    fn server_url(&self) -> &str {
        &self.server_url
    }
}
