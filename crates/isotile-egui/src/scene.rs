// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Retained scene shared between the surface and its drawables.

use std::collections::{BTreeMap, VecDeque};

use egui::{pos2, Color32, Pos2, Rect, Vec2};
use isotile_port::{LogicalPosition, TileClick, ViewportSize};

/// One tile as it will be painted, in scene space.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintedTile {
    /// Text the host created the tile from.
    pub label: String,
    /// Diamond fill.
    pub fill: Color32,
    /// Bounding box of the diamond.
    pub rect: Rect,
    /// Logical position clicks resolve to, once bound.
    pub position: Option<LogicalPosition>,
}

impl PaintedTile {
    /// Diamond corners: top, right, bottom, left.
    pub fn diamond(&self) -> [Pos2; 4] {
        let r = self.rect;
        let c = r.center();
        [
            pos2(c.x, r.top()),
            pos2(r.right(), c.y),
            pos2(c.x, r.bottom()),
            pos2(r.left(), c.y),
        ]
    }

    /// True if `point` lies inside the diamond (edges included).
    pub fn contains(&self, point: Pos2) -> bool {
        let half = self.rect.size() / 2.0;
        if half.x <= 0.0 || half.y <= 0.0 {
            return false;
        }
        let d = point - self.rect.center();
        d.x.abs() / half.x + d.y.abs() / half.y <= 1.0
    }
}

#[derive(Debug, Default)]
pub(crate) struct SceneState {
    pub(crate) tiles: BTreeMap<u64, PaintedTile>,
    pub(crate) next_id: u64,
    pub(crate) size: Option<ViewportSize>,
    pub(crate) group_offset: Vec2,
    pub(crate) transition_secs: f32,
    pub(crate) notice: Option<String>,
    pub(crate) caption: Option<String>,
    pub(crate) clicks: VecDeque<TileClick>,
}

impl SceneState {
    /// Back-to-front: tiles lower on screen cover the ones behind them.
    pub(crate) fn paint_order(&self) -> Vec<(u64, &PaintedTile)> {
        let mut order: Vec<_> = self.tiles.iter().map(|(id, t)| (*id, t)).collect();
        order.sort_by(|(a_id, a), (b_id, b)| {
            a.rect
                .center()
                .y
                .total_cmp(&b.rect.center().y)
                .then(a_id.cmp(b_id))
        });
        order
    }

    /// Front-most bound tile under `point`.
    pub(crate) fn hit_test(&self, point: Pos2) -> Option<LogicalPosition> {
        self.paint_order()
            .into_iter()
            .rev()
            .filter(|(_, t)| t.contains(point))
            .find_map(|(_, t)| t.position)
    }
}
