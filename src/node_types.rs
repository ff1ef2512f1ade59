use serde::{Deserialize, Serialize};

/// Every node kind the decorator extension knows about.
///
/// `Container` is the outer node that shows a collapsed subgraph; the other
/// four are the decorator nodes that live inside it.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Title,
    Divider,
    Spacer,
    Note,
    #[default]
    Container,
}

impl NodeKind {
    pub fn decorator(self) -> Option<DecoratorKind> {
        match self {
            NodeKind::Title => Some(DecoratorKind::Title),
            NodeKind::Divider => Some(DecoratorKind::Divider),
            NodeKind::Spacer => Some(DecoratorKind::Spacer),
            NodeKind::Note => Some(DecoratorKind::Note),
            NodeKind::Container => None,
        }
    }

    pub fn is_decorator(self) -> bool {
        self.decorator().is_some()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::Title => "UI Title",
            NodeKind::Divider => "UI Divider",
            NodeKind::Spacer => "UI Spacer",
            NodeKind::Note => "UI Note",
            NodeKind::Container => "Subgraph",
        }
    }

    /// Input sockets declared by the node definition.
    pub fn inputs(self) -> &'static [InputDef] {
        match self {
            NodeKind::Title => TITLE_INPUTS,
            NodeKind::Divider => DIVIDER_INPUTS,
            NodeKind::Spacer => SPACER_INPUTS,
            NodeKind::Note => NOTE_INPUTS,
            NodeKind::Container => &[],
        }
    }
}

/// The four decorator kinds. Doubles as the property namespace.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecoratorKind {
    Title,
    Divider,
    Spacer,
    Note,
}

impl DecoratorKind {
    pub const ALL: [DecoratorKind; 4] = [
        DecoratorKind::Title,
        DecoratorKind::Divider,
        DecoratorKind::Spacer,
        DecoratorKind::Note,
    ];

    /// Prefix used for persisted property keys (`{prefix}_{attr}`).
    pub fn prefix(self) -> &'static str {
        match self {
            DecoratorKind::Title => "title",
            DecoratorKind::Divider => "divider",
            DecoratorKind::Spacer => "spacer",
            DecoratorKind::Note => "note",
        }
    }

    pub fn node_kind(self) -> NodeKind {
        match self {
            DecoratorKind::Title => NodeKind::Title,
            DecoratorKind::Divider => NodeKind::Divider,
            DecoratorKind::Spacer => NodeKind::Spacer,
            DecoratorKind::Note => NodeKind::Note,
        }
    }

    /// Inputs whose link state is mirrored into `linked_{input}` flags.
    pub fn mirrored_inputs(self) -> &'static [&'static str] {
        match self {
            DecoratorKind::Title => &["title", "divider_in"],
            DecoratorKind::Divider => &["divider"],
            DecoratorKind::Spacer => &["spacer"],
            DecoratorKind::Note => &["note"],
        }
    }
}

/// Custom widget types a node input can ask for.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum WidgetFactory {
    SubTitle,
    SubDivider,
    Spacer,
    Note,
}

impl WidgetFactory {
    pub fn type_name(self) -> &'static str {
        match self {
            WidgetFactory::SubTitle => "UI_SUB_TITLE",
            WidgetFactory::SubDivider => "UI_SUB_DIVIDER",
            WidgetFactory::Spacer => "UI_SPACER",
            WidgetFactory::Note => "UI_NOTE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputDef {
    pub name: &'static str,
    pub factory: WidgetFactory,
    pub default: Option<&'static str>,
}

pub const CATEGORY: &str = "Custom/UI Decorators";

const TITLE_INPUTS: &[InputDef] = &[
    InputDef {
        name: "title",
        factory: WidgetFactory::SubTitle,
        default: Some("Section Title"),
    },
    InputDef {
        name: "divider_in",
        factory: WidgetFactory::SubDivider,
        default: None,
    },
];

const DIVIDER_INPUTS: &[InputDef] = &[InputDef {
    name: "divider",
    factory: WidgetFactory::SubDivider,
    default: None,
}];

const SPACER_INPUTS: &[InputDef] = &[InputDef {
    name: "spacer",
    factory: WidgetFactory::Spacer,
    default: None,
}];

const NOTE_INPUTS: &[InputDef] = &[InputDef {
    name: "note",
    factory: WidgetFactory::Note,
    default: None,
}];
