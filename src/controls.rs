//! # Node-Face Controls
//!
//! Widgets attached to decorator nodes when they are created: the factory
//! widget for each declared input, plus per-kind styling controls (font size,
//! bold, color). Controls always write to the node they sit on; they never go
//! through the resolver.
//!
//! Link state of the decorator's input sockets is mirrored into
//! `linked_{input}` flags before every configure and foreground draw.

use crate::color;
use crate::decorators::style::{DividerStyle, NoteStyle, SpacerStyle, TitleStyle};
use crate::graph::{GraphNode, Widget, WidgetKind};
use crate::node_types::{DecoratorKind, NodeKind, WidgetFactory};
use crate::properties::{Attr, PropKey, PropValue};
use serde::{Deserialize, Serialize};

pub const TITLE_FONT_RANGE: (f64, f64) = (8.0, 64.0);
pub const SPACER_HEIGHT_RANGE: (f64, f64) = SpacerStyle::HEIGHT_RANGE;

/// What a control widget edits.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub enum Control {
    FontSize(DecoratorKind),
    Bold(DecoratorKind),
    /// Hex text field bound to a color attribute.
    ColorHex(DecoratorKind, Attr),
    /// Button opening the color picker for the matching `ColorHex` control.
    PickColor(DecoratorKind, Attr),
    SpacerHeight,
}

/// Install factory widgets and styling controls on a freshly created node.
pub fn on_node_created(node: &mut GraphNode) {
    add_factory_widgets(node);
    match node.kind {
        NodeKind::Title => add_title_controls(node),
        NodeKind::Divider => add_divider_controls(node),
        NodeKind::Spacer => add_spacer_controls(node),
        NodeKind::Note => add_note_controls(node),
        NodeKind::Container => {}
    }
    mirror_link_state(node);
    log::debug!(
        "node {} ({:?}) created with {} widgets",
        node.id,
        node.kind,
        node.widgets.len()
    );
}

fn add_factory_widgets(node: &mut GraphNode) {
    for def in node.kind.inputs() {
        let widget = match def.factory {
            WidgetFactory::SubTitle => {
                let default = def.default.unwrap_or(TitleStyle::DEFAULT_TEXT);
                let key = PropKey::style(DecoratorKind::Title, Attr::Text);
                Widget::new(def.name, WidgetKind::Title, node.properties.text(&key, default))
            }
            WidgetFactory::SubDivider if def.name == "divider_in" => {
                Widget::new(def.name, WidgetKind::DividerHidden, PropValue::default())
            }
            WidgetFactory::SubDivider => {
                Widget::new(def.name, WidgetKind::Divider, PropValue::default())
            }
            WidgetFactory::Spacer => Widget::new(def.name, WidgetKind::Spacer, PropValue::default()),
            WidgetFactory::Note => {
                let default = def.default.unwrap_or(NoteStyle::DEFAULT_TEXT);
                let key = PropKey::style(DecoratorKind::Note, Attr::Text);
                Widget::new(def.name, WidgetKind::Note, node.properties.text(&key, default))
            }
        };
        node.widgets.push(widget);
    }
}

fn add_title_controls(node: &mut GraphNode) {
    let kind = DecoratorKind::Title;
    let size = node.properties.number(
        &PropKey::style(kind, Attr::FontSize),
        TitleStyle::DEFAULT_FONT_SIZE as f64,
    );
    let bold = node.properties.flag(&PropKey::style(kind, Attr::Bold), false);
    node.widgets
        .push(Widget::control("font_size", Control::FontSize(kind), size));
    node.widgets
        .push(Widget::control("bold", Control::Bold(kind), bold));
    add_color_controls(node, kind, Attr::Color, TitleStyle::DEFAULT_COLOR, "color");
}

fn add_divider_controls(node: &mut GraphNode) {
    add_color_controls(
        node,
        DecoratorKind::Divider,
        Attr::Color,
        DividerStyle::CONTROL_DEFAULT_COLOR,
        "color",
    );
}

fn add_spacer_controls(node: &mut GraphNode) {
    let height = node.properties.number(
        &PropKey::style(DecoratorKind::Spacer, Attr::Height),
        SpacerStyle::DEFAULT_HEIGHT as f64,
    );
    node.widgets
        .push(Widget::control("height_px", Control::SpacerHeight, height));
}

fn add_note_controls(node: &mut GraphNode) {
    let kind = DecoratorKind::Note;
    let size = node.properties.number(
        &PropKey::style(kind, Attr::FontSize),
        NoteStyle::DEFAULT_FONT_SIZE as f64,
    );
    let bold = node.properties.flag(&PropKey::style(kind, Attr::Bold), false);
    node.widgets
        .push(Widget::control("font_size", Control::FontSize(kind), size));
    node.widgets
        .push(Widget::control("bold", Control::Bold(kind), bold));
    add_color_controls(node, kind, Attr::Color, NoteStyle::DEFAULT_COLOR, "text_color");
    add_color_controls(node, kind, Attr::BgColor, NoteStyle::DEFAULT_BG_COLOR, "bg_color");
}

/// Hex field + picker button. The normalized initial color is written back so
/// the node always persists an explicit value.
fn add_color_controls(
    node: &mut GraphNode,
    kind: DecoratorKind,
    attr: Attr,
    default_hex: &str,
    label: &str,
) {
    let key = PropKey::style(kind, attr);
    let initial = node.properties.hex(&key, default_hex);
    node.widgets.push(Widget::control(
        label,
        Control::ColorHex(kind, attr),
        initial.as_str(),
    ));
    node.widgets
        .push(Widget::control("pick", Control::PickColor(kind, attr), "pick"));
    node.properties.set(&key, initial);
}

fn clamp_rounded(value: &PropValue, fallback: f64, (lo, hi): (f64, f64)) -> f64 {
    value.as_number().unwrap_or(fallback).round().clamp(lo, hi)
}

/// Apply a user edit to control widget `index`. Returns whether anything
/// changed; rejected input (unparseable hex, non-control widget) is ignored.
pub fn apply_control(node: &mut GraphNode, index: usize, value: PropValue) -> bool {
    let Some(WidgetKind::Control(control)) = node.widgets.get(index).map(|w| w.kind) else {
        return false;
    };

    let stored: PropValue = match control {
        Control::FontSize(DecoratorKind::Title) => clamp_rounded(
            &value,
            TitleStyle::DEFAULT_FONT_SIZE as f64,
            TITLE_FONT_RANGE,
        )
        .into(),
        Control::FontSize(kind) => value
            .as_number()
            .unwrap_or(default_font_size(kind))
            .into(),
        Control::Bold(_) => value.truthy().into(),
        Control::SpacerHeight => clamp_rounded(&value, 0.0, SPACER_HEIGHT_RANGE).into(),
        Control::ColorHex(..) => match color::parse_hex(&value.as_text()) {
            Some(hex) => hex.into(),
            None => {
                log::warn!("ignoring invalid color {:?} on node {}", value.as_text(), node.id);
                return false;
            }
        },
        Control::PickColor(..) => return false,
    };

    let key = match control {
        Control::FontSize(kind) => PropKey::style(kind, Attr::FontSize),
        Control::Bold(kind) => PropKey::style(kind, Attr::Bold),
        Control::SpacerHeight => PropKey::style(DecoratorKind::Spacer, Attr::Height),
        Control::ColorHex(kind, attr) | Control::PickColor(kind, attr) => PropKey::style(kind, attr),
    };
    log::debug!("node {}: {} = {}", node.id, key.storage_key(), stored);
    node.properties.set(&key, stored.clone());
    node.widgets[index].value = stored;
    true
}

fn default_font_size(kind: DecoratorKind) -> f64 {
    match kind {
        DecoratorKind::Note => NoteStyle::DEFAULT_FONT_SIZE as f64,
        _ => TitleStyle::DEFAULT_FONT_SIZE as f64,
    }
}

/// Index of the hex field a picker button edits.
pub fn color_field_for(node: &GraphNode, kind: DecoratorKind, attr: Attr) -> Option<usize> {
    node.widgets
        .iter()
        .position(|w| w.kind == WidgetKind::Control(Control::ColorHex(kind, attr)))
}

/// Edit the text of a title or note factory widget, storing it as
/// `{input}_text`.
pub fn edit_text(node: &mut GraphNode, index: usize, value: &str) -> bool {
    let Some(widget) = node.widgets.get_mut(index) else {
        return false;
    };
    let kind = match widget.kind {
        WidgetKind::Title => DecoratorKind::Title,
        WidgetKind::Note => DecoratorKind::Note,
        _ => return false,
    };
    widget.value = PropValue::Text(value.to_string());
    node.properties
        .set(&PropKey::style(kind, Attr::Text), value.to_string());
    true
}

/// Record whether each mirrored input currently has a link.
pub fn mirror_link_state(node: &mut GraphNode) {
    let Some(kind) = node.kind.decorator() else {
        return;
    };
    for input in kind.mirrored_inputs() {
        let linked = node.input(input).is_some_and(|i| i.link.is_some());
        node.properties.set(&PropKey::linked(input), linked);
    }
}

/// Hook run when the host restores a node from saved state.
pub fn on_configure(node: &mut GraphNode) {
    mirror_link_state(node);
}

/// Hook run before the host draws a node's foreground.
pub fn before_draw(node: &mut GraphNode) {
    mirror_link_state(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn created(kind: NodeKind) -> GraphNode {
        let mut node = GraphNode::new(1, kind, (0.0, 0.0));
        on_node_created(&mut node);
        node
    }

    fn names(node: &GraphNode) -> Vec<&str> {
        node.widgets.iter().map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn test_title_widgets() {
        let node = created(NodeKind::Title);
        assert_eq!(
            names(&node),
            vec!["title", "divider_in", "font_size", "bold", "color", "pick"]
        );
        assert_eq!(node.widgets[1].kind, WidgetKind::DividerHidden);
        assert_eq!(node.widgets[0].value_text(), "Section Title");
        assert_eq!(
            node.properties
                .get(&PropKey::style(DecoratorKind::Title, Attr::Color)),
            Some(&PropValue::Text("#ffffff".into()))
        );
    }

    #[test]
    fn test_note_widgets() {
        let node = created(NodeKind::Note);
        assert_eq!(
            names(&node),
            vec!["note", "font_size", "bold", "text_color", "pick", "bg_color", "pick"]
        );
        assert_eq!(node.widgets[0].value_text(), "Note text here...");
    }

    #[test]
    fn test_restored_values_seed_controls() {
        let mut node = GraphNode::new(1, NodeKind::Spacer, (0.0, 0.0));
        node.properties
            .set(&PropKey::style(DecoratorKind::Spacer, Attr::Height), 55.0);
        on_node_created(&mut node);
        assert_eq!(node.widgets[1].value, PropValue::Number(55.0));
    }

    #[test]
    fn test_title_font_size_clamped_and_rounded() {
        let mut node = created(NodeKind::Title);
        let idx = node.widget_index("font_size").unwrap();
        let key = PropKey::style(DecoratorKind::Title, Attr::FontSize);

        assert!(apply_control(&mut node, idx, 100.0.into()));
        assert_eq!(node.properties.number(&key, 0.0), 64.0);
        apply_control(&mut node, idx, 3.0.into());
        assert_eq!(node.properties.number(&key, 0.0), 8.0);
        apply_control(&mut node, idx, "17.6".into());
        assert_eq!(node.properties.number(&key, 0.0), 18.0);
        apply_control(&mut node, idx, "big".into());
        assert_eq!(node.properties.number(&key, 0.0), 14.0);
        assert_eq!(node.widgets[idx].value, PropValue::Number(14.0));
    }

    #[test]
    fn test_spacer_height_clamped() {
        let mut node = created(NodeKind::Spacer);
        let idx = node.widget_index("height_px").unwrap();
        let key = PropKey::style(DecoratorKind::Spacer, Attr::Height);
        apply_control(&mut node, idx, 5000.0.into());
        assert_eq!(node.properties.number(&key, 0.0), 1000.0);
        apply_control(&mut node, idx, (-3.0).into());
        assert_eq!(node.properties.number(&key, 0.0), 0.0);
        apply_control(&mut node, idx, "nope".into());
        assert_eq!(node.properties.number(&key, 20.0), 0.0);
    }

    #[test]
    fn test_invalid_hex_is_ignored() {
        let mut node = created(NodeKind::Divider);
        let idx = color_field_for(&node, DecoratorKind::Divider, Attr::Color).unwrap();
        let key = PropKey::style(DecoratorKind::Divider, Attr::Color);

        assert!(apply_control(&mut node, idx, "#0F0".into()));
        assert_eq!(node.properties.hex(&key, ""), "#00ff00");
        assert!(!apply_control(&mut node, idx, "green".into()));
        assert_eq!(node.properties.hex(&key, ""), "#00ff00");
        assert_eq!(node.widgets[idx].value_text(), "#00ff00");
    }

    #[test]
    fn test_bold_and_note_font() {
        let mut node = created(NodeKind::Note);
        let bold = node.widget_index("bold").unwrap();
        let size = node.widget_index("font_size").unwrap();
        apply_control(&mut node, bold, PropValue::Number(1.0));
        apply_control(&mut node, size, 9.5.into());
        let style = NoteStyle::read(&node.properties);
        assert!(style.bold);
        assert_eq!(style.font_size, 9.5);
    }

    #[test]
    fn test_non_controls_are_not_applied() {
        let mut node = created(NodeKind::Title);
        assert!(!apply_control(&mut node, 0, "x".into()));
        let pick = node.widget_index("pick").unwrap();
        assert!(!apply_control(&mut node, pick, "#fff".into()));
        assert!(!apply_control(&mut node, 99, "x".into()));
    }

    #[test]
    fn test_edit_text_persists() {
        let mut node = created(NodeKind::Title);
        assert!(edit_text(&mut node, 0, "Inputs"));
        assert_eq!(node.widgets[0].value_text(), "Inputs");
        assert_eq!(TitleStyle::read(&node.properties).text, "Inputs");
        assert!(!edit_text(&mut node, 2, "nope"));
    }

    #[test]
    fn test_link_state_mirrored() {
        let mut node = created(NodeKind::Title);
        assert!(!node.properties.flag(&PropKey::linked("title"), true));
        node.inputs[1].link = Some(4);
        before_draw(&mut node);
        assert!(!node.properties.flag(&PropKey::linked("title"), true));
        assert!(node.properties.flag(&PropKey::linked("divider_in"), false));

        node.inputs[1].link = None;
        on_configure(&mut node);
        assert!(!node.properties.flag(&PropKey::linked("divider_in"), true));
    }

    #[test]
    fn test_containers_get_no_controls() {
        let node = created(NodeKind::Container);
        assert!(node.widgets.is_empty());
        assert!(node.properties.is_empty());
    }
}
