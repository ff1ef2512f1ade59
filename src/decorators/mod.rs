//! # Decorator Renderers
//!
//! Draw and size routines for the four decorator widget kinds.
//!
//! ## Submodules
//! - [`title`], [`divider`], [`spacer`], [`note`]: one renderer per kind
//! - [`style`]: layout config and typed style views
//! - [`text`]: word wrapping for note boxes
//!
//! Every renderer asks the [`resolver`](crate::resolver) for the node that
//! owns its styling, then reads that node's properties. Nothing here fails:
//! an unmatched widget renders with defaults.

pub mod divider;
pub mod note;
pub mod spacer;
pub mod style;
pub mod text;
pub mod title;

pub use style::{DecoratorConfig, DividerStyle, NoteStyle, SpacerStyle, TitleStyle};

use crate::graph::{GraphNode, Widget, WidgetKind};
use crate::layout::IdleQueue;
use crate::node_types::DecoratorKind;
use crate::resolver::{self, InnerGraphSource, Resolution};
use crate::surface::Surface;

/// Width reported by fixed-width decorators.
pub const DEFAULT_WIDGET_WIDTH: f32 = 200.0;

/// Everything a renderer needs to know about the widget it is drawing.
#[derive(Clone, Copy)]
pub struct WidgetCx<'a> {
    pub source: &'a dyn InnerGraphSource,
    /// Node whose face the widget is on.
    pub node: &'a GraphNode,
    pub index: usize,
    pub config: &'a DecoratorConfig,
    pub idle: &'a IdleQueue,
}

impl<'a> WidgetCx<'a> {
    pub fn widget(&self) -> Option<&'a Widget> {
        self.node.widgets.get(self.index)
    }

    pub fn resolve(&self, kind: DecoratorKind) -> Resolution<'a> {
        resolver::resolve(self.source, self.node, self.index, kind)
    }
}

pub trait Decorator {
    fn draw(&self, cx: &WidgetCx<'_>, surface: &mut dyn Surface, width: f32, y: f32);

    /// `(width, height)` the widget occupies on the node face.
    fn compute_size(&self, cx: &WidgetCx<'_>, width: f32) -> (f32, f32);

    fn serialize_value(&self, _cx: &WidgetCx<'_>) -> serde_json::Value {
        serde_json::Value::Null
    }
}

static TITLE: title::TitleDecorator = title::TitleDecorator;
static DIVIDER: divider::DividerDecorator = divider::DividerDecorator { hidden: false };
static DIVIDER_HIDDEN: divider::DividerDecorator = divider::DividerDecorator { hidden: true };
static SPACER: spacer::SpacerDecorator = spacer::SpacerDecorator;
static NOTE: note::NoteDecorator = note::NoteDecorator;

/// Renderer for a widget kind; `None` for plain controls.
pub fn decorator_for(kind: WidgetKind) -> Option<&'static dyn Decorator> {
    match kind {
        WidgetKind::Title => Some(&TITLE),
        WidgetKind::Divider => Some(&DIVIDER),
        WidgetKind::DividerHidden => Some(&DIVIDER_HIDDEN),
        WidgetKind::Spacer => Some(&SPACER),
        WidgetKind::Note => Some(&NOTE),
        WidgetKind::Control(_) => None,
    }
}
