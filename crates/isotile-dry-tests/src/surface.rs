// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording render surface for headless tests.
//!
//! `RecordingSurface` keeps the scene in a shared [`SurfaceLog`] instead of
//! painting it. Use it to verify draw/remove sequences, group translation and
//! click routing without a window.

use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use isotile_port::{
    Drawable, LogicalPosition, RenderSurface, ScreenCenter, ScreenPoint, TileClick, TileSize,
    ViewportSize,
};

/// One recorded scene-graph operation.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// A drawable was created with the given label.
    Create {
        /// Drawable id.
        id: u64,
        /// Label passed by the host (usually the content).
        label: String,
    },
    /// A drawable was placed at a top-left corner.
    Move {
        /// Drawable id.
        id: u64,
        /// New top-left corner.
        top_left: ScreenPoint,
    },
    /// A drawable was removed.
    Remove {
        /// Drawable id.
        id: u64,
    },
}

/// A drawable currently on the recording surface.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveTile {
    /// Label passed at creation.
    pub label: String,
    /// Current top-left corner (if placed).
    pub top_left: Option<ScreenPoint>,
    /// Position bound for clicks.
    pub bound: Option<LogicalPosition>,
}

/// Shared state behind a [`RecordingSurface`].
#[derive(Debug, Default)]
pub struct SurfaceLog {
    /// Every operation in order.
    pub ops: Vec<SurfaceOp>,
    /// Drawables not yet removed, keyed by id.
    pub live: BTreeMap<u64, LiveTile>,
    /// Last size passed to `resize`.
    pub size: Option<ViewportSize>,
    /// Accumulated group translation.
    pub group_offset: (f32, f32),
    /// Every `translate_group` call `(dx, dy, transition)`.
    pub translations: Vec<(f32, f32, Duration)>,
    /// Notice shown instead of the scene, if any.
    pub notice: Option<String>,
    pending_clicks: VecDeque<TileClick>,
}

impl SurfaceLog {
    /// Number of drawables created so far.
    pub fn created(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Create { .. }))
            .count()
    }

    /// Number of drawables removed so far.
    pub fn removed(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Remove { .. }))
            .count()
    }

    /// Live drawable bound to `position`, if any.
    pub fn live_at(&self, position: LogicalPosition) -> Option<&LiveTile> {
        self.live.values().find(|t| t.bound == Some(position))
    }

    /// Number of live drawables bound to `position`.
    pub fn live_count_at(&self, position: LogicalPosition) -> usize {
        self.live
            .values()
            .filter(|t| t.bound == Some(position))
            .count()
    }
}

/// Render surface that records instead of painting.
pub struct RecordingSurface {
    log: Rc<RefCell<SurfaceLog>>,
    supported: bool,
    next_id: u64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// A supported surface with an empty log.
    pub fn new() -> Self {
        Self {
            log: Rc::default(),
            supported: true,
            next_id: 1,
        }
    }

    /// A surface that reports itself unsupported.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Shared handle to the log; stays valid after the surface is moved.
    pub fn log(&self) -> Rc<RefCell<SurfaceLog>> {
        Rc::clone(&self.log)
    }

    /// Borrow the log.
    pub fn snapshot(&self) -> Ref<'_, SurfaceLog> {
        self.log.borrow()
    }

    /// Create a drawable of `size` labelled `label` (the host's tile factory).
    pub fn spawn(&mut self, label: impl Into<String>, size: TileSize) -> RecordingDrawable {
        let id = self.next_id;
        self.next_id += 1;
        let label = label.into();
        let mut log = self.log.borrow_mut();
        log.ops.push(SurfaceOp::Create {
            id,
            label: label.clone(),
        });
        log.live.insert(
            id,
            LiveTile {
                label,
                top_left: None,
                bound: None,
            },
        );
        RecordingDrawable {
            id,
            log: Rc::clone(&self.log),
            size,
            center: ScreenCenter::default(),
            removed: false,
        }
    }

    /// Simulate a user click on the live drawable bound to `position`.
    ///
    /// Returns false when nothing is drawn there.
    pub fn click(log: &Rc<RefCell<SurfaceLog>>, position: LogicalPosition) -> bool {
        let mut log = log.borrow_mut();
        if log.live_at(position).is_none() {
            return false;
        }
        log.pending_clicks.push_back(TileClick { position });
        true
    }
}

impl RenderSurface for RecordingSurface {
    type Drawable = RecordingDrawable;

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn resize(&mut self, size: ViewportSize) {
        self.log.borrow_mut().size = Some(size);
    }

    fn translate_group(&mut self, dx: f32, dy: f32, transition: Duration) {
        let mut log = self.log.borrow_mut();
        log.group_offset.0 += dx;
        log.group_offset.1 += dy;
        log.translations.push((dx, dy, transition));
    }

    fn drain_clicks(&mut self, max: usize) -> Vec<TileClick> {
        let mut log = self.log.borrow_mut();
        let n = max.min(log.pending_clicks.len());
        log.pending_clicks.drain(..n).collect()
    }

    fn show_notice(&mut self, text: &str) {
        self.log.borrow_mut().notice = Some(text.to_string());
    }
}

/// Drawable handle produced by [`RecordingSurface`].
#[derive(Debug)]
pub struct RecordingDrawable {
    id: u64,
    log: Rc<RefCell<SurfaceLog>>,
    size: TileSize,
    center: ScreenCenter,
    removed: bool,
}

impl RecordingDrawable {
    /// Surface-assigned id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True once `remove` was called.
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

impl Drawable for RecordingDrawable {
    fn center(&self) -> ScreenCenter {
        self.center
    }

    fn set_center(&mut self, center: ScreenCenter) {
        self.move_to(center.top_left(self.size));
    }

    fn move_to(&mut self, top_left: ScreenPoint) {
        if self.removed {
            return;
        }
        self.center = top_left.center_for(self.size);
        let mut log = self.log.borrow_mut();
        log.ops.push(SurfaceOp::Move {
            id: self.id,
            top_left,
        });
        if let Some(tile) = log.live.get_mut(&self.id) {
            tile.top_left = Some(top_left);
        }
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        let mut log = self.log.borrow_mut();
        log.ops.push(SurfaceOp::Remove { id: self.id });
        log.live.remove(&self.id);
    }

    fn bind_click(&mut self, position: LogicalPosition) {
        if let Some(tile) = self.log.borrow_mut().live.get_mut(&self.id) {
            tile.bound = Some(position);
        }
    }
}
