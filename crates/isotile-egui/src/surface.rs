// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! [`RenderSurface`] painting through egui.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use egui::{
    pos2, vec2, Align2, Color32, FontId, Id, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2,
};
use isotile_port::{
    Drawable, LogicalPosition, RenderSurface, ScreenCenter, ScreenPoint, TileClick, TileSize,
    ViewportSize,
};
use tracing::trace;

use crate::scene::{PaintedTile, SceneState};

/// egui-backed rendering surface.
///
/// Scene coordinates map to the screen as
/// `widget_min + anchor + group_offset + scene`. The group offset eases
/// towards its target over the last requested transition.
pub struct EguiSurface {
    scene: Rc<RefCell<SceneState>>,
    supported: bool,
    anchor: Vec2,
    id: Id,
}

impl Default for EguiSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl EguiSurface {
    /// Surface ready to paint.
    pub fn new() -> Self {
        Self {
            scene: Rc::default(),
            supported: true,
            anchor: Vec2::ZERO,
            id: Id::new("isotile_surface"),
        }
    }

    /// Surface that reports itself unusable, e.g. when no GPU backend came up.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Where scene `(0, 0)` lands inside the widget before any panning.
    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    /// Distinguish several surfaces in one egui context.
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }

    /// Add a tile to the scene and hand back its drawable.
    pub fn spawn(
        &mut self,
        label: impl Into<String>,
        fill: Color32,
        size: TileSize,
    ) -> EguiDrawable {
        let mut scene = self.scene.borrow_mut();
        scene.next_id += 1;
        let id = scene.next_id;
        scene.tiles.insert(
            id,
            PaintedTile {
                label: label.into(),
                fill,
                rect: Rect::from_min_size(Pos2::ZERO, vec2(size.width, size.height)),
                position: None,
            },
        );
        EguiDrawable {
            id,
            scene: Rc::clone(&self.scene),
            size,
            center: ScreenCenter::default(),
            removed: false,
        }
    }

    /// Text painted in the widget's top-left corner.
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.scene.borrow_mut().caption = Some(caption.into());
    }

    /// Tiles in paint order.
    pub fn tiles(&self) -> Vec<PaintedTile> {
        self.scene
            .borrow()
            .paint_order()
            .into_iter()
            .map(|(_, t)| t.clone())
            .collect()
    }

    /// Number of tiles currently in the scene.
    pub fn tile_count(&self) -> usize {
        self.scene.borrow().tiles.len()
    }

    /// Notice shown instead of the scene, if any.
    pub fn notice(&self) -> Option<String> {
        self.scene.borrow().notice.clone()
    }

    /// Caption set by the host, if any.
    pub fn caption(&self) -> Option<String> {
        self.scene.borrow().caption.clone()
    }

    /// Group offset the animation is heading towards.
    pub fn group_offset(&self) -> Vec2 {
        self.scene.borrow().group_offset
    }

    /// Last size pushed by a resize.
    pub fn size(&self) -> Option<ViewportSize> {
        self.scene.borrow().size
    }

    /// Queue a click at a scene-space point. Returns the tile it resolved to.
    pub fn click_scene(&mut self, point: Pos2) -> Option<LogicalPosition> {
        let mut scene = self.scene.borrow_mut();
        let position = scene.hit_test(point)?;
        scene.clicks.push_back(TileClick { position });
        Some(position)
    }

    /// Paint the scene (or the notice) into `ui` and pick up clicks.
    #[allow(clippy::cast_precision_loss)]
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        if let Some(notice) = self.notice() {
            return ui.label(notice);
        }
        let desired = self
            .size()
            .map_or_else(|| ui.available_size(), |s| vec2(s.width as f32, s.height as f32));
        let (response, painter) = ui.allocate_painter(desired, Sense::click());

        let (target, secs) = {
            let scene = self.scene.borrow();
            (scene.group_offset, scene.transition_secs)
        };
        let ctx = ui.ctx();
        let offset = vec2(
            ctx.animate_value_with_time(self.id.with("dx"), target.x, secs),
            ctx.animate_value_with_time(self.id.with("dy"), target.y, secs),
        );
        let to_screen = response.rect.min.to_vec2() + self.anchor + offset;

        {
            let scene = self.scene.borrow();
            let outline = Stroke::new(1.0, Color32::from_black_alpha(96));
            for (_, tile) in scene.paint_order() {
                let points = tile.diamond().iter().map(|p| *p + to_screen).collect();
                painter.add(Shape::convex_polygon(points, tile.fill, outline));
            }
            if let Some(caption) = &scene.caption {
                painter.text(
                    response.rect.left_top() + vec2(8.0, 8.0),
                    Align2::LEFT_TOP,
                    caption,
                    FontId::proportional(14.0),
                    ui.visuals().text_color(),
                );
            }
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let hit = self.click_scene(pointer - to_screen);
                trace!(?pointer, ?hit, "surface click");
            }
        }
        response
    }
}

impl RenderSurface for EguiSurface {
    type Drawable = EguiDrawable;

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn resize(&mut self, size: ViewportSize) {
        self.scene.borrow_mut().size = Some(size);
    }

    fn translate_group(&mut self, dx: f32, dy: f32, transition: Duration) {
        let mut scene = self.scene.borrow_mut();
        scene.group_offset += vec2(dx, dy);
        scene.transition_secs = transition.as_secs_f32();
    }

    fn drain_clicks(&mut self, max: usize) -> Vec<TileClick> {
        let mut scene = self.scene.borrow_mut();
        let n = max.min(scene.clicks.len());
        scene.clicks.drain(..n).collect()
    }

    fn show_notice(&mut self, text: &str) {
        self.scene.borrow_mut().notice = Some(text.to_owned());
    }
}

/// Handle to one painted tile.
#[derive(Debug)]
pub struct EguiDrawable {
    id: u64,
    scene: Rc<RefCell<SceneState>>,
    size: TileSize,
    center: ScreenCenter,
    removed: bool,
}

impl EguiDrawable {
    /// Whether [`Drawable::remove`] has been called.
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

impl Drawable for EguiDrawable {
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
        if let Some(tile) = self.scene.borrow_mut().tiles.get_mut(&self.id) {
            tile.rect = Rect::from_min_size(
                pos2(top_left.x, top_left.y),
                vec2(self.size.width, self.size.height),
            );
        }
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        self.scene.borrow_mut().tiles.remove(&self.id);
    }

    fn bind_click(&mut self, position: LogicalPosition) {
        if let Some(tile) = self.scene.borrow_mut().tiles.get_mut(&self.id) {
            tile.position = Some(position);
        }
    }
}
