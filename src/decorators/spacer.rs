//! Vertical spacer widget.

use super::style::SpacerStyle;
use super::{DEFAULT_WIDGET_WIDTH, Decorator, WidgetCx};
use crate::node_types::DecoratorKind;
use crate::surface::Surface;
use egui::{Color32, Pos2, Stroke};

pub struct SpacerDecorator;

const GLYPH_COLOR: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);

impl Decorator for SpacerDecorator {
    /// Only the inner node shows a bracket marking the reserved space; on a
    /// container face the spacer is blank.
    fn draw(&self, cx: &WidgetCx<'_>, surface: &mut dyn Surface, _width: f32, y: f32) {
        if !cx.node.is_decorator() {
            return;
        }
        let measured = cx.widget().map(|w| w.measured_height.get()).unwrap_or(0.0);
        let h = if measured > 0.0 {
            measured
        } else {
            SpacerStyle::DEFAULT_HEIGHT
        };
        let stroke = Stroke::new(1.0, GLYPH_COLOR);
        surface.dashed_path(&[Pos2::new(8.0, y), Pos2::new(4.0, y)], 2.0, 4.0, stroke);
        surface.dashed_path(
            &[Pos2::new(4.0, y), Pos2::new(4.0, y + h), Pos2::new(8.0, y + h)],
            2.0,
            4.0,
            stroke,
        );
    }

    fn compute_size(&self, cx: &WidgetCx<'_>, _width: f32) -> (f32, f32) {
        let height = cx
            .resolve(DecoratorKind::Spacer)
            .node()
            .map(|n| SpacerStyle::read(&n.properties))
            .unwrap_or_default()
            .height;
        if let Some(widget) = cx.widget() {
            widget.measured_height.set(height);
        }
        (DEFAULT_WIDGET_WIDTH, height)
    }
}
