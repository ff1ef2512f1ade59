//! Decorator styling and layout constants.
//!
//! Contains [`DecoratorConfig`] (tunable paddings, persisted with the app
//! settings) and the typed per-kind style views read from a node's
//! [`PropertyBag`].

use crate::node_types::DecoratorKind;
use crate::properties::{Attr, PropKey, PropertyBag};
use serde::{Deserialize, Serialize};

/// Vertical spacing and box metrics shared by all decorator renderers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DecoratorConfig {
    /// Space above/below title text.
    #[serde(default = "default_pad_top")]
    pub title_pad_top: f32,
    #[serde(default = "default_pad_bottom")]
    pub title_pad_bottom: f32,
    #[serde(default = "default_title_inset")]
    pub title_inset: f32,
    /// Space above/below the divider line.
    #[serde(default = "default_pad_top")]
    pub divider_pad_top: f32,
    #[serde(default = "default_pad_bottom")]
    pub divider_pad_bottom: f32,
    #[serde(default = "default_divider_margin")]
    pub divider_margin: f32,
    /// Space above/below the note box.
    #[serde(default = "default_pad_top")]
    pub note_pad_top: f32,
    #[serde(default = "default_note_pad_bottom")]
    pub note_pad_bottom: f32,
    /// Horizontal gap between the node edge and the note box.
    #[serde(default = "default_note_margin")]
    pub note_margin: f32,
    #[serde(default = "default_note_inner_pad_x")]
    pub note_inner_pad_x: f32,
    #[serde(default = "default_note_inner_pad_top")]
    pub note_inner_pad_top: f32,
    #[serde(default = "default_note_inner_pad_bottom")]
    pub note_inner_pad_bottom: f32,
    #[serde(default = "default_line_height_mult")]
    pub note_line_height_mult: f32,
    #[serde(default = "default_note_radius")]
    pub note_corner_radius: f32,
}

fn default_pad_top() -> f32 {
    3.0
}

fn default_pad_bottom() -> f32 {
    1.0
}

fn default_title_inset() -> f32 {
    12.0
}

fn default_divider_margin() -> f32 {
    8.0
}

fn default_note_pad_bottom() -> f32 {
    4.0
}

fn default_note_margin() -> f32 {
    10.0
}

fn default_note_inner_pad_x() -> f32 {
    5.0
}

fn default_note_inner_pad_top() -> f32 {
    4.0
}

fn default_note_inner_pad_bottom() -> f32 {
    5.0
}

fn default_line_height_mult() -> f32 {
    1.4
}

fn default_note_radius() -> f32 {
    4.0
}

impl Default for DecoratorConfig {
    fn default() -> Self {
        Self {
            title_pad_top: default_pad_top(),
            title_pad_bottom: default_pad_bottom(),
            title_inset: default_title_inset(),
            divider_pad_top: default_pad_top(),
            divider_pad_bottom: default_pad_bottom(),
            divider_margin: default_divider_margin(),
            note_pad_top: default_pad_top(),
            note_pad_bottom: default_note_pad_bottom(),
            note_margin: default_note_margin(),
            note_inner_pad_x: default_note_inner_pad_x(),
            note_inner_pad_top: default_note_inner_pad_top(),
            note_inner_pad_bottom: default_note_inner_pad_bottom(),
            note_line_height_mult: default_line_height_mult(),
            note_corner_radius: default_note_radius(),
        }
    }
}

fn key(kind: DecoratorKind, attr: Attr) -> PropKey {
    PropKey::style(kind, attr)
}

#[derive(Clone, Debug, PartialEq)]
pub struct TitleStyle {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
    pub color: String,
}

impl TitleStyle {
    pub const DEFAULT_TEXT: &'static str = "Section Title";
    pub const DEFAULT_FONT_SIZE: f32 = 14.0;
    pub const DEFAULT_COLOR: &'static str = "#ffffff";

    pub fn read(props: &PropertyBag) -> Self {
        let kind = DecoratorKind::Title;
        Self {
            text: props.text(&key(kind, Attr::Text), Self::DEFAULT_TEXT),
            font_size: props.number(&key(kind, Attr::FontSize), Self::DEFAULT_FONT_SIZE as f64)
                as f32,
            bold: props.flag(&key(kind, Attr::Bold), false),
            color: props.hex(&key(kind, Attr::Color), Self::DEFAULT_COLOR),
        }
    }
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self::read(&PropertyBag::new())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DividerStyle {
    pub color: String,
}

impl DividerStyle {
    /// Line color when nothing is stored or nothing matched.
    pub const DEFAULT_COLOR: &'static str = "#666666";
    /// Initial value written by the color control on a fresh divider node.
    pub const CONTROL_DEFAULT_COLOR: &'static str = "#ffffff";

    pub fn read(props: &PropertyBag) -> Self {
        Self {
            color: props.hex(
                &key(DecoratorKind::Divider, Attr::Color),
                Self::DEFAULT_COLOR,
            ),
        }
    }
}

impl Default for DividerStyle {
    fn default() -> Self {
        Self::read(&PropertyBag::new())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpacerStyle {
    pub height: f32,
}

impl SpacerStyle {
    pub const DEFAULT_HEIGHT: f32 = 20.0;
    /// Heights outside this range are pinned on read, whatever was stored.
    pub const HEIGHT_RANGE: (f64, f64) = (0.0, 1000.0);

    pub fn read(props: &PropertyBag) -> Self {
        let (lo, hi) = Self::HEIGHT_RANGE;
        let height = props
            .number(
                &key(DecoratorKind::Spacer, Attr::Height),
                Self::DEFAULT_HEIGHT as f64,
            )
            .clamp(lo, hi);
        Self {
            height: height as f32,
        }
    }
}

impl Default for SpacerStyle {
    fn default() -> Self {
        Self::read(&PropertyBag::new())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoteStyle {
    pub text: String,
    pub color: String,
    pub bg_color: String,
    pub font_size: f32,
    pub bold: bool,
}

impl NoteStyle {
    /// Placeholder of a fresh note widget.
    pub const DEFAULT_TEXT: &'static str = "Note text here...";
    /// Text shown on a container face when the matched node stores none.
    pub const MATCHED_FALLBACK_TEXT: &'static str = "Enter note text...";
    pub const DEFAULT_COLOR: &'static str = "#aaaaaa";
    pub const DEFAULT_BG_COLOR: &'static str = "#222222";
    pub const DEFAULT_FONT_SIZE: f32 = 12.0;

    pub fn read(props: &PropertyBag) -> Self {
        Self::read_with_text(props, Self::DEFAULT_TEXT)
    }

    pub fn read_with_text(props: &PropertyBag, default_text: &str) -> Self {
        let kind = DecoratorKind::Note;
        Self {
            text: props.text(&key(kind, Attr::Text), default_text),
            color: props.hex(&key(kind, Attr::Color), Self::DEFAULT_COLOR),
            bg_color: props.hex(&key(kind, Attr::BgColor), Self::DEFAULT_BG_COLOR),
            font_size: props.number(&key(kind, Attr::FontSize), Self::DEFAULT_FONT_SIZE as f64)
                as f32,
            bold: props.flag(&key(kind, Attr::Bold), false),
        }
    }
}

impl Default for NoteStyle {
    fn default() -> Self {
        Self::read(&PropertyBag::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_fills_missing_fields() {
        let config: DecoratorConfig =
            serde_json::from_str(r#"{ "title_pad_top": 6.0 }"#).unwrap();
        assert_eq!(config.title_pad_top, 6.0);
        assert_eq!(config.note_line_height_mult, 1.4);
        assert_eq!(
            DecoratorConfig {
                title_pad_top: 3.0,
                ..config
            },
            DecoratorConfig::default()
        );
    }

    #[test]
    fn test_style_defaults() {
        assert_eq!(TitleStyle::default().font_size, 14.0);
        assert_eq!(TitleStyle::default().color, "#ffffff");
        assert_eq!(DividerStyle::default().color, "#666666");
        assert_eq!(SpacerStyle::default().height, 20.0);
        let note = NoteStyle::default();
        assert_eq!(
            (note.color.as_str(), note.bg_color.as_str(), note.font_size),
            ("#aaaaaa", "#222222", 12.0)
        );
    }

    #[test]
    fn test_spacer_height_read_is_clamped() {
        let mut bag = PropertyBag::new();
        let k = key(DecoratorKind::Spacer, Attr::Height);
        bag.set(&k, 5000.0);
        assert_eq!(SpacerStyle::read(&bag).height, 1000.0);
        bag.set(&k, -40.0);
        assert_eq!(SpacerStyle::read(&bag).height, 0.0);
        bag.set(&k, "35");
        assert_eq!(SpacerStyle::read(&bag).height, 35.0);
    }

    #[test]
    fn test_title_style_reads_bag() {
        let mut bag = PropertyBag::new();
        bag.set(&key(DecoratorKind::Title, Attr::FontSize), 20.0);
        bag.set(&key(DecoratorKind::Title, Attr::Bold), true);
        bag.set(&key(DecoratorKind::Title, Attr::Color), "#F00");
        let style = TitleStyle::read(&bag);
        assert_eq!(style.font_size, 20.0);
        assert!(style.bold);
        assert_eq!(style.color, "#ff0000");
    }
}
