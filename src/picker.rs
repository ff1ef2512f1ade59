//! # Color Picker
//!
//! HSV picker state behind the `pick` button on color controls: a
//! saturation/value field on the left and a vertical hue strip on the right.
//! The picker only produces hex strings; the caller feeds them through the
//! matching hex control so picked and typed colors take the same path.
//!
//! While a picker is open it holds the [`PointerCapture`] for the canvas.
//! Dropping the picker releases it, whichever way it was closed.

use crate::color::{self, Hsv};
use crate::graph::NodeId;
use crate::node_types::DecoratorKind;
use crate::properties::Attr;
use egui::{Color32, Mesh, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use std::cell::Cell;
use std::rc::Rc;

pub const FIELD_WIDTH: f32 = 156.0;
pub const FIELD_HEIGHT: f32 = 120.0;
/// Presses right of this x land on the hue strip.
pub const HUE_STRIP_X: f32 = 160.0;
pub const HUE_STRIP_LEFT: f32 = 162.0;
pub const HUE_STRIP_WIDTH: f32 = 18.0;
pub const CANVAS_SIZE: Vec2 = Vec2::new(180.0, 120.0);

/// Hands out exclusive pointer capture. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct PointerRouter {
    owner: Rc<Cell<Option<u64>>>,
    next_token: Rc<Cell<u64>>,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the capture, or `None` while someone else holds it.
    pub fn capture(&self) -> Option<PointerCapture> {
        if self.owner.get().is_some() {
            return None;
        }
        let token = self.next_token.get() + 1;
        self.next_token.set(token);
        self.owner.set(Some(token));
        Some(PointerCapture {
            router: self.clone(),
            token,
        })
    }

    pub fn is_captured(&self) -> bool {
        self.owner.get().is_some()
    }
}

/// Held pointer capture; released on drop.
#[derive(Debug)]
pub struct PointerCapture {
    router: PointerRouter,
    token: u64,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        if self.router.owner.get() == Some(self.token) {
            self.router.owner.set(None);
            log::trace!("pointer capture {} released", self.token);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragTarget {
    Field,
    Hue,
}

#[derive(Debug)]
pub struct ColorPicker {
    pub node: NodeId,
    pub kind: DecoratorKind,
    pub attr: Attr,
    hsv: Hsv,
    drag: Option<DragTarget>,
    _capture: PointerCapture,
}

impl ColorPicker {
    /// Open a picker on `current_hex` (malformed input starts at white).
    /// Returns `None` if the pointer is already captured.
    pub fn open(
        node: NodeId,
        kind: DecoratorKind,
        attr: Attr,
        current_hex: &str,
        router: &PointerRouter,
    ) -> Option<Self> {
        let Some(capture) = router.capture() else {
            log::warn!("color picker for node {node} not opened: pointer is captured");
            return None;
        };
        let hex = color::normalize_hex(current_hex, "#ffffff");
        log::debug!("opening color picker on node {node} at {hex}");
        Some(Self {
            node,
            kind,
            attr,
            hsv: color::rgb_to_hsv(color::hex_to_rgb(&hex)),
            drag: None,
            _capture: capture,
        })
    }

    /// Pointer down at `pos` (picker-local). Starts a drag on whichever area
    /// was hit and returns the new hex.
    pub fn press(&mut self, pos: Pos2) -> String {
        let target = if pos.x > HUE_STRIP_X {
            DragTarget::Hue
        } else {
            DragTarget::Field
        };
        self.drag = Some(target);
        self.apply(target, pos);
        self.hex()
    }

    /// Pointer move; `None` when no drag is in progress.
    pub fn drag(&mut self, pos: Pos2) -> Option<String> {
        let target = self.drag?;
        self.apply(target, pos);
        Some(self.hex())
    }

    pub fn release(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn apply(&mut self, target: DragTarget, pos: Pos2) {
        let fy = (pos.y / FIELD_HEIGHT).clamp(0.0, 1.0);
        match target {
            DragTarget::Hue => self.hsv.h = fy * 360.0,
            DragTarget::Field => {
                self.hsv.s = (pos.x / FIELD_WIDTH).clamp(0.0, 1.0);
                self.hsv.v = 1.0 - fy;
            }
        }
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    pub fn hex(&self) -> String {
        color::rgb_to_hex(color::hsv_to_rgb(self.hsv))
    }

    /// Center of the saturation/value cursor.
    pub fn cursor(&self) -> Pos2 {
        Pos2::new(self.hsv.s * FIELD_WIDTH, (1.0 - self.hsv.v) * FIELD_HEIGHT)
    }

    pub fn hue_marker_y(&self) -> f32 {
        self.hsv.h / 360.0 * FIELD_HEIGHT
    }

    /// Paint the field, hue strip and markers with the top-left at `origin`.
    pub fn paint(&self, painter: &Painter, origin: Pos2) {
        let at = |x: f32, y: f32| origin + Vec2::new(x, y);
        let pure = color::rgb_to_color32(color::hsv_to_rgb(Hsv {
            h: self.hsv.h,
            s: 1.0,
            v: 1.0,
        }));

        let mut field = Mesh::default();
        field.colored_vertex(at(0.0, 0.0), Color32::WHITE);
        field.colored_vertex(at(FIELD_WIDTH, 0.0), pure);
        field.colored_vertex(at(FIELD_WIDTH, FIELD_HEIGHT), Color32::BLACK);
        field.colored_vertex(at(0.0, FIELD_HEIGHT), Color32::BLACK);
        field.add_triangle(0, 1, 2);
        field.add_triangle(0, 2, 3);
        painter.add(Shape::mesh(field));

        for i in 0..FIELD_HEIGHT as u32 {
            let y = i as f32;
            let hue = color::hsv_to_rgb(Hsv {
                h: y / FIELD_HEIGHT * 360.0,
                s: 1.0,
                v: 1.0,
            });
            painter.rect_filled(
                Rect::from_min_size(at(HUE_STRIP_LEFT, y), Vec2::new(HUE_STRIP_WIDTH, 1.0)),
                0.0,
                color::rgb_to_color32(hue),
            );
        }

        let cursor = origin + self.cursor().to_vec2();
        painter.circle_stroke(cursor, 4.0, Stroke::new(1.0, Color32::WHITE));
        painter.circle_stroke(cursor, 5.0, Stroke::new(1.0, Color32::BLACK));

        let hy = self.hue_marker_y();
        painter.rect_stroke(
            Rect::from_min_size(at(HUE_STRIP_LEFT - 1.0, hy - 2.0), Vec2::new(20.0, 4.0)),
            0.0,
            Stroke::new(1.0, Color32::WHITE),
            egui::StrokeKind::Middle,
        );
    }
}
