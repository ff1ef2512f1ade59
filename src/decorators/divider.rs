//! Horizontal divider widget.
//!
//! The hidden variant is the divider socket attached to a title node: it
//! never draws and takes no vertical space.

use super::style::DividerStyle;
use super::{DEFAULT_WIDGET_WIDTH, Decorator, WidgetCx};
use crate::color;
use crate::node_types::DecoratorKind;
use crate::surface::Surface;
use egui::{Color32, Pos2, Stroke};

pub struct DividerDecorator {
    pub hidden: bool,
}

impl DividerDecorator {
    /// Line color. Resolution is restricted to divider nodes so a title's
    /// color can never leak onto a divider.
    fn color(cx: &WidgetCx<'_>) -> String {
        cx.resolve(DecoratorKind::Divider)
            .node()
            .map(|n| DividerStyle::read(&n.properties))
            .unwrap_or_default()
            .color
    }
}

impl Decorator for DividerDecorator {
    fn draw(&self, cx: &WidgetCx<'_>, surface: &mut dyn Surface, width: f32, y: f32) {
        if self.hidden {
            return;
        }
        let hex = Self::color(cx);
        let color = color::hex_to_color32(&hex, Color32::from_gray(0x66));
        let line_y = y + cx.config.divider_pad_top;
        let margin = cx.config.divider_margin;
        surface.line(
            Pos2::new(margin, line_y),
            Pos2::new(width - margin, line_y),
            Stroke::new(1.0, color),
        );
    }

    fn compute_size(&self, cx: &WidgetCx<'_>, _width: f32) -> (f32, f32) {
        if self.hidden {
            return (DEFAULT_WIDGET_WIDTH, 0.0);
        }
        (
            DEFAULT_WIDGET_WIDTH,
            cx.config.divider_pad_top + 1.0 + cx.config.divider_pad_bottom,
        )
    }
}
