//! Note box widget.
//!
//! The box grows with its wrapped text. Drawing measures the text; when the
//! needed height moves by more than [`RESIZE_TOLERANCE`] the widget caches
//! the new height and asks the host (through the idle queue) to re-layout the
//! node on the next tick. The height is a pure function of text, font and
//! width, so the loop settles after one resize.

use super::style::{DecoratorConfig, NoteStyle};
use super::text::wrap_lines;
use super::{DEFAULT_WIDGET_WIDTH, Decorator, WidgetCx};
use crate::color;
use crate::graph::Widget;
use crate::layout::ResizeRequest;
use crate::node_types::DecoratorKind;
use crate::properties::{Attr, PropKey};
use crate::resolver::Resolution;
use crate::surface::{FontSpec, Surface};
use egui::{Color32, Pos2, Rect, Vec2};

/// Height drift (px) tolerated before a re-layout is requested.
pub const RESIZE_TOLERANCE: f32 = 2.0;
/// Height reported before the first draw has measured anything.
pub const INITIAL_HEIGHT: f32 = 60.0;
const MIN_USABLE_WIDTH: f32 = 50.0;

pub struct NoteDecorator;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteMetrics {
    pub line_height: f32,
    /// Extra space above each line so the leading is centered.
    pub line_offset: f32,
    pub box_height: f32,
    /// Box plus outer padding: the widget's full height.
    pub total_height: f32,
}

impl NoteMetrics {
    pub fn new(line_count: usize, font_size: f32, config: &DecoratorConfig) -> Self {
        let line_height = font_size * config.note_line_height_mult;
        let leading = (line_height - font_size).max(0.0);
        let box_height = line_count as f32 * line_height
            + config.note_inner_pad_top
            + config.note_inner_pad_bottom;
        Self {
            line_height,
            line_offset: leading * 0.5,
            box_height,
            total_height: box_height + config.note_pad_top + config.note_pad_bottom,
        }
    }
}

/// Width left for text once the box margin and inner padding are removed.
pub fn text_width(width: f32, config: &DecoratorConfig) -> f32 {
    width - config.note_margin * 2.0 - config.note_inner_pad_x * 2.0
}

/// Full widget height needed to show `text` at `width`.
pub fn required_height(
    surface: &dyn Surface,
    text: &str,
    width: f32,
    font: FontSpec,
    config: &DecoratorConfig,
) -> f32 {
    let text = if text.is_empty() { " " } else { text };
    let lines = wrap_lines(surface, text, text_width(width, config), font);
    NoteMetrics::new(lines.len(), font.size, config).total_height
}

impl NoteDecorator {
    /// Style plus the text to show. A matched inner node supplies its own
    /// stored text; otherwise the widget's value is shown.
    fn content(cx: &WidgetCx<'_>, widget: &Widget) -> (NoteStyle, String) {
        match cx.resolve(DecoratorKind::Note) {
            Resolution::Own(node) => (NoteStyle::read(&node.properties), widget.value_text()),
            Resolution::Matched { node, .. } => {
                let style =
                    NoteStyle::read_with_text(&node.properties, NoteStyle::MATCHED_FALLBACK_TEXT);
                let text = style.text.clone();
                (style, text)
            }
            Resolution::Unmatched => (NoteStyle::default(), widget.value_text()),
        }
    }
}

impl Decorator for NoteDecorator {
    fn draw(&self, cx: &WidgetCx<'_>, surface: &mut dyn Surface, width: f32, y: f32) {
        let Some(widget) = cx.widget() else {
            return;
        };
        let config = cx.config;
        let (style, mut text) = Self::content(cx, widget);
        if text.is_empty() {
            text = " ".to_string();
        }

        let font = FontSpec::new(style.font_size, style.bold);
        let lines = wrap_lines(surface, &text, text_width(width, config), font);
        let metrics = NoteMetrics::new(lines.len(), style.font_size, config);

        if (widget.measured_height.get() - metrics.total_height).abs() > RESIZE_TOLERANCE {
            log::debug!(
                "note on node {} needs {}px (had {}px), scheduling re-layout",
                cx.node.id,
                metrics.total_height,
                widget.measured_height.get()
            );
            widget.measured_height.set(metrics.total_height);
            cx.idle.request(ResizeRequest { node: cx.node.id });
        }

        let margin = config.note_margin;
        let draw_y = y + config.note_pad_top;
        let rect = Rect::from_min_size(
            Pos2::new(margin, draw_y),
            Vec2::new(width - margin * 2.0, metrics.box_height),
        );
        let radius = surface
            .supports_rounded_rect()
            .then_some(config.note_corner_radius);
        surface.fill_rect(
            rect,
            radius,
            color::hex_to_color32(&style.bg_color, Color32::from_gray(0x22)),
        );

        let text_color = color::hex_to_color32(&style.color, Color32::from_gray(0xaa));
        let text_x = margin + config.note_inner_pad_x;
        let first_y = draw_y + config.note_inner_pad_top + metrics.line_offset;
        for (i, line) in lines.iter().enumerate() {
            surface.text(
                Pos2::new(text_x, first_y + i as f32 * metrics.line_height),
                line,
                font,
                text_color,
            );
        }
    }

    fn compute_size(&self, cx: &WidgetCx<'_>, width: f32) -> (f32, f32) {
        let mut width = width;
        if !(width >= MIN_USABLE_WIDTH) && cx.node.size.0 > 0.0 {
            width = cx.node.size.0;
        }
        if !(width > 0.0) {
            width = DEFAULT_WIDGET_WIDTH;
        }

        let measured = cx.widget().map(|w| w.measured_height.get()).unwrap_or(0.0);
        let height = if measured > 0.0 {
            measured
        } else {
            INITIAL_HEIGHT
        };
        (width, height)
    }

    fn serialize_value(&self, cx: &WidgetCx<'_>) -> serde_json::Value {
        serde_json::Value::String(cx.node.properties.text(
            &PropKey::style(DecoratorKind::Note, Attr::Text),
            NoteStyle::DEFAULT_TEXT,
        ))
    }
}
