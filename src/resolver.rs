//! # Inner/Outer Resolver
//!
//! Decides which node's properties style a decorator widget.
//!
//! A widget drawn on its own decorator node reads that node. A widget shown on
//! a container face (promoted or linked out of a subgraph) is matched to one
//! inner node of the same kind, trying in order:
//!
//! 1. **Identity**: the widget name starts with `"<id>:"` and a candidate has
//!    that id.
//! 2. **Content** (titles and notes only): a candidate's stored text equals
//!    the widget's current value. First match in canonical order wins.
//! 3. **Positional**: the widget's index among same-kind siblings on the
//!    face selects the candidate at that index in canonical order.
//!
//! Candidates are always restricted to the requested kind. A divider must
//! never pick up a title's color, so no step widens the search to other kinds.
//! Resolution never fails; `Unmatched` means "use built-in defaults".

use crate::graph::{GraphNode, NodeId};
use crate::node_types::DecoratorKind;
use crate::properties::{Attr, PropKey};

/// Access to the nodes inside a container's subgraph.
pub trait InnerGraphSource {
    /// Nodes of the subgraph `container` points at, or `None` when it has none
    /// or the reference can't be followed.
    fn inner_nodes(&self, container: &GraphNode) -> Option<&[GraphNode]>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStrategy {
    Identity,
    Content,
    Positional,
}

#[derive(Clone, Copy, Debug)]
pub enum Resolution<'a> {
    /// The host is itself a decorator node of the requested kind.
    Own(&'a GraphNode),
    Matched {
        node: &'a GraphNode,
        strategy: MatchStrategy,
    },
    Unmatched,
}

impl<'a> Resolution<'a> {
    pub fn node(&self) -> Option<&'a GraphNode> {
        match *self {
            Resolution::Own(node) | Resolution::Matched { node, .. } => Some(node),
            Resolution::Unmatched => None,
        }
    }

    pub fn is_own(&self) -> bool {
        matches!(self, Resolution::Own(_))
    }

    pub fn strategy(&self) -> Option<MatchStrategy> {
        match self {
            Resolution::Matched { strategy, .. } => Some(*strategy),
            _ => None,
        }
    }
}

/// Default stored text used when comparing a candidate's content.
fn default_text(kind: DecoratorKind) -> Option<&'static str> {
    match kind {
        DecoratorKind::Title => Some(crate::decorators::style::TitleStyle::DEFAULT_TEXT),
        DecoratorKind::Note => Some(crate::decorators::style::NoteStyle::DEFAULT_TEXT),
        DecoratorKind::Divider | DecoratorKind::Spacer => None,
    }
}

/// Resolve the authoritative node for widget `widget_index` on `host`.
pub fn resolve<'a, S>(
    source: &'a S,
    host: &'a GraphNode,
    widget_index: usize,
    kind: DecoratorKind,
) -> Resolution<'a>
where
    S: InnerGraphSource + ?Sized,
{
    if host.kind.decorator() == Some(kind) {
        return Resolution::Own(host);
    }

    let Some(inner) = source.inner_nodes(host) else {
        log::trace!("node {} has no reachable inner graph", host.id);
        return Resolution::Unmatched;
    };
    let Some(widget) = host.widgets.get(widget_index) else {
        return Resolution::Unmatched;
    };

    let candidates = candidates(inner, kind);

    if let Some(id) = parse_id_prefix(&widget.name) {
        if let Some(node) = candidates.iter().copied().find(|n| n.id == id) {
            log::trace!("widget {:?} matched node {} by id", widget.name, node.id);
            return Resolution::Matched {
                node,
                strategy: MatchStrategy::Identity,
            };
        }
    }

    if let Some(default) = default_text(kind) {
        let key = PropKey::style(kind, Attr::Text);
        let value = widget.value_text();
        if let Some(node) = candidates
            .iter()
            .copied()
            .find(|n| n.properties.text(&key, default) == value)
        {
            log::trace!("widget {:?} matched node {} by content", widget.name, node.id);
            return Resolution::Matched {
                node,
                strategy: MatchStrategy::Content,
            };
        }
    }

    if let Some(index) = sibling_index(host, widget_index, kind) {
        if let Some(node) = candidates.get(index).copied() {
            log::trace!(
                "widget {:?} matched node {} by position {}",
                widget.name,
                node.id,
                index
            );
            return Resolution::Matched {
                node,
                strategy: MatchStrategy::Positional,
            };
        }
    }

    log::trace!("widget {:?} on node {} left unmatched", widget.name, host.id);
    Resolution::Unmatched
}

/// Inner nodes of `kind` in canonical order: ascending y, ties kept in
/// enumeration order.
pub fn candidates(inner: &[GraphNode], kind: DecoratorKind) -> Vec<&GraphNode> {
    let mut found: Vec<&GraphNode> = inner
        .iter()
        .filter(|n| n.kind.decorator() == Some(kind))
        .collect();
    found.sort_by(|a, b| a.position.1.total_cmp(&b.position.1));
    found
}

/// Leading `"<digits>:"` of a promoted widget name.
pub fn parse_id_prefix(name: &str) -> Option<NodeId> {
    let (digits, _) = name.split_once(':')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Index of the widget among same-kind decorator widgets on `host`.
fn sibling_index(host: &GraphNode, widget_index: usize, kind: DecoratorKind) -> Option<usize> {
    let widget = host.widgets.get(widget_index)?;
    if widget.kind.decorator_tag() != Some(kind) {
        return None;
    }
    Some(
        host.widgets[..widget_index]
            .iter()
            .filter(|w| w.kind.decorator_tag() == Some(kind))
            .count(),
    )
}
