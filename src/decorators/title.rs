//! Section title widget.

use super::style::TitleStyle;
use super::{DEFAULT_WIDGET_WIDTH, Decorator, WidgetCx};
use crate::color;
use crate::node_types::DecoratorKind;
use crate::properties::{Attr, PropKey};
use crate::surface::{FontSpec, Surface};
use egui::{Color32, Pos2};

pub struct TitleDecorator;

impl TitleDecorator {
    fn style(cx: &WidgetCx<'_>) -> TitleStyle {
        cx.resolve(DecoratorKind::Title)
            .node()
            .map(|n| TitleStyle::read(&n.properties))
            .unwrap_or_default()
    }
}

impl Decorator for TitleDecorator {
    fn draw(&self, cx: &WidgetCx<'_>, surface: &mut dyn Surface, _width: f32, y: f32) {
        let Some(widget) = cx.widget() else {
            return;
        };
        let style = Self::style(cx);
        let color = color::hex_to_color32(&style.color, Color32::WHITE);
        surface.text(
            Pos2::new(cx.config.title_inset, y + cx.config.title_pad_top),
            &widget.value_text(),
            FontSpec::new(style.font_size, style.bold),
            color,
        );
    }

    fn compute_size(&self, cx: &WidgetCx<'_>, _width: f32) -> (f32, f32) {
        let font_size = Self::style(cx).font_size;
        let height = cx.config.title_pad_top + cx.config.title_pad_bottom + font_size + 4.0;
        (DEFAULT_WIDGET_WIDTH, height)
    }

    fn serialize_value(&self, cx: &WidgetCx<'_>) -> serde_json::Value {
        let text = cx.node.properties.text(
            &PropKey::style(DecoratorKind::Title, Attr::Text),
            TitleStyle::DEFAULT_TEXT,
        );
        serde_json::Value::String(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorators::fixtures::{Inner, container, cx, node_at};
    use crate::decorators::DecoratorConfig;
    use crate::graph::{Widget, WidgetKind};
    use crate::layout::IdleQueue;
    use crate::node_types::NodeKind;
    use crate::surface::recording::{DrawCall, RecordingSurface};

    fn styled_title(id: i64, y: f32, text: &str, size: f64, color: &str) -> crate::graph::GraphNode {
        let mut node = node_at(id, NodeKind::Title, y);
        let p = &mut node.properties;
        p.set(&PropKey::style(DecoratorKind::Title, Attr::Text), text);
        p.set(&PropKey::style(DecoratorKind::Title, Attr::FontSize), size);
        p.set(&PropKey::style(DecoratorKind::Title, Attr::Color), color);
        node
    }

    #[test]
    fn test_height_tracks_font_size() {
        let config = DecoratorConfig::default();
        let idle = IdleQueue::default();
        let src = Inner(vec![]);
        let mut own = styled_title(1, 0.0, "Inputs", 20.0, "#ff0000");
        own.widgets.push(Widget::new("title", WidgetKind::Title, "Inputs"));

        let size = TitleDecorator.compute_size(&cx(&src, &own, 0, &config, &idle), 300.0);
        assert_eq!(size, (200.0, 3.0 + 1.0 + 20.0 + 4.0));
    }

    #[test]
    fn test_outer_title_draws_with_matched_style() {
        let config = DecoratorConfig::default();
        let idle = IdleQueue::default();
        let src = Inner(vec![
            styled_title(1, 0.0, "Inputs", 18.0, "#ff0000"),
            styled_title(2, 40.0, "Outputs", 22.0, "#00ff00"),
        ]);
        let host = container(vec![Widget::new("title", WidgetKind::Title, "Outputs")]);
        let mut surface = RecordingSurface::default();

        TitleDecorator.draw(&cx(&src, &host, 0, &config, &idle), &mut surface, 300.0, 10.0);
        assert_eq!(
            surface.calls,
            vec![DrawCall::Text {
                pos: Pos2::new(12.0, 13.0),
                text: "Outputs".into(),
                font: FontSpec::new(22.0, false),
                color: Color32::from_rgb(0, 255, 0),
            }]
        );
    }

    #[test]
    fn test_unmatched_title_uses_defaults() {
        let config = DecoratorConfig::default();
        let idle = IdleQueue::default();
        let src = Inner(vec![]);
        let host = container(vec![Widget::new("title", WidgetKind::Title, "Lonely")]);
        let c = cx(&src, &host, 0, &config, &idle);
        assert_eq!(TitleDecorator.compute_size(&c, 0.0).1, 3.0 + 1.0 + 14.0 + 4.0);
    }

    #[test]
    fn test_serialize_value_reads_stored_text() {
        let config = DecoratorConfig::default();
        let idle = IdleQueue::default();
        let src = Inner(vec![]);
        let mut own = styled_title(1, 0.0, "Stored", 14.0, "#fff");
        own.widgets.push(Widget::new("title", WidgetKind::Title, "Stored"));
        let c = cx(&src, &own, 0, &config, &idle);
        assert_eq!(TitleDecorator.serialize_value(&c), serde_json::json!("Stored"));
    }
}
