// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording host controller.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use isotile_port::{TileClick, TileHost, TileSize};

use crate::surface::{RecordingDrawable, RecordingSurface};

/// What the host was asked to do.
#[derive(Debug, Default)]
pub struct HostLog {
    /// Labels of every tile created, in order.
    pub created: Vec<String>,
    /// Clicks forwarded by the view.
    pub clicks: Vec<TileClick>,
    /// Number of `create_ui` calls.
    pub ui_builds: usize,
}

/// Host that labels drawables with the content's `Display` form.
pub struct RecordingHost {
    log: Rc<RefCell<HostLog>>,
    server_url: String,
}

impl RecordingHost {
    /// Host pointing at `server_url`.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            log: Rc::default(),
            server_url: server_url.into(),
        }
    }

    /// Shared handle to the log.
    pub fn log(&self) -> Rc<RefCell<HostLog>> {
        Rc::clone(&self.log)
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new("http://tiles.test")
    }
}

impl<C: Display> TileHost<C, RecordingSurface> for RecordingHost {
    fn create_tile(
        &mut self,
        surface: &mut RecordingSurface,
        content: &C,
        size: TileSize,
    ) -> RecordingDrawable {
        let label = content.to_string();
        self.log.borrow_mut().created.push(label.clone());
        surface.spawn(label, size)
    }

    fn on_click(&mut self, click: &TileClick) {
        self.log.borrow_mut().clicks.push(*click);
    }

    fn create_ui(&mut self, _surface: &mut RecordingSurface) {
        self.log.borrow_mut().ui_builds += 1;
    }

    fn server_url(&self) -> &str {
        &self.server_url
    }
}
