use super::controls::Control;
use super::node_types::{DecoratorKind, NodeKind};
use super::properties::{PropValue, PropertyBag};
use super::resolver::InnerGraphSource;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::HashMap;

pub type NodeId = i64;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct SubgraphId(pub u32);

/// A whole editor session: the root graph plus every subgraph a container
/// can point at. Containers reference subgraphs by id and never own them.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Workspace {
    pub root: Graph,
    pub subgraphs: HashMap<SubgraphId, Graph>,
    #[serde(default)]
    next_node_id: NodeId,
    #[serde(default)]
    next_subgraph_id: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub title: String,
    pub position: (f32, f32),
    pub size: (f32, f32),
    #[serde(default)]
    pub properties: PropertyBag,
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(default)]
    pub subgraph: Option<SubgraphId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Input {
    pub name: String,
    #[serde(default)]
    pub link: Option<u64>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub enum WidgetKind {
    Title,
    Divider,
    /// Divider attached to a title control; never drawn, zero height.
    DividerHidden,
    Spacer,
    Note,
    Control(Control),
}

impl WidgetKind {
    /// Decorator tag used when counting same-kind siblings on a node face.
    pub fn decorator_tag(self) -> Option<DecoratorKind> {
        match self {
            WidgetKind::Title => Some(DecoratorKind::Title),
            WidgetKind::Divider => Some(DecoratorKind::Divider),
            WidgetKind::Spacer => Some(DecoratorKind::Spacer),
            WidgetKind::Note => Some(DecoratorKind::Note),
            WidgetKind::DividerHidden | WidgetKind::Control(_) => None,
        }
    }

    pub fn is_decorator(self) -> bool {
        !matches!(self, WidgetKind::Control(_))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Widget {
    pub name: String,
    pub kind: WidgetKind,
    #[serde(default)]
    pub value: PropValue,
    #[serde(default = "default_serialize")]
    pub serialize: bool,
    /// Last height measured while drawing (note box, spacer glyph).
    #[serde(skip)]
    pub measured_height: Cell<f32>,
}

fn default_serialize() -> bool {
    true
}

impl Widget {
    pub fn new(name: impl Into<String>, kind: WidgetKind, value: impl Into<PropValue>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
            serialize: true,
            measured_height: Cell::new(0.0),
        }
    }

    pub fn control(name: impl Into<String>, control: Control, value: impl Into<PropValue>) -> Self {
        Self {
            serialize: false,
            ..Self::new(name, WidgetKind::Control(control), value)
        }
    }

    pub fn value_text(&self) -> String {
        self.value.as_text()
    }
}

impl GraphNode {
    pub fn new(id: NodeId, kind: NodeKind, position: (f32, f32)) -> Self {
        Self {
            id,
            kind,
            title: kind.display_name().to_string(),
            position,
            size: (200.0, 60.0),
            properties: PropertyBag::new(),
            widgets: Vec::new(),
            inputs: kind
                .inputs()
                .iter()
                .map(|def| Input {
                    name: def.name.to_string(),
                    link: None,
                })
                .collect(),
            subgraph: None,
        }
    }

    pub fn is_decorator(&self) -> bool {
        self.kind.is_decorator()
    }

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.name == name)
    }

    pub fn widget_index(&self, name: &str) -> Option<usize> {
        self.widgets.iter().position(|w| w.name == name)
    }
}

impl Graph {
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            next_node_id: 1,
            ..Default::default()
        }
    }

    pub fn alloc_node_id(&mut self) -> NodeId {
        let id = self.next_node_id.max(1);
        self.next_node_id = id + 1;
        id
    }

    pub fn add_subgraph(&mut self) -> SubgraphId {
        let id = SubgraphId(self.next_subgraph_id);
        self.next_subgraph_id += 1;
        self.subgraphs.insert(id, Graph::default());
        id
    }

    /// Graph that `subgraph` names, or the root graph for `None`.
    pub fn graph(&self, subgraph: Option<SubgraphId>) -> Option<&Graph> {
        match subgraph {
            Some(id) => self.subgraphs.get(&id),
            None => Some(&self.root),
        }
    }

    pub fn graph_mut(&mut self, subgraph: Option<SubgraphId>) -> Option<&mut Graph> {
        match subgraph {
            Some(id) => self.subgraphs.get_mut(&id),
            None => Some(&mut self.root),
        }
    }

    /// Find a node by id anywhere in the workspace.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.root
            .node(id)
            .or_else(|| self.subgraphs.values().find_map(|g| g.node(id)))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        if self.root.node(id).is_some() {
            return self.root.node_mut(id);
        }
        self.subgraphs.values_mut().find_map(|g| g.node_mut(id))
    }

    /// Copy an inner node's decorator widget onto a container's face.
    ///
    /// With `by_reference` the copy is named `"<inner id>:<name>"` (promotion);
    /// otherwise it keeps the plain input name (linking).
    pub fn expose_widget(
        &mut self,
        container: NodeId,
        inner: NodeId,
        widget_name: &str,
        by_reference: bool,
    ) -> Option<usize> {
        let outer = self.node(container)?;
        let subgraph = outer.subgraph?;
        let source = self.subgraphs.get(&subgraph)?.node(inner)?;
        let widget = &source.widgets[source.widget_index(widget_name)?];
        let mut copy = widget.clone();
        copy.measured_height.set(0.0);
        if by_reference {
            copy.name = format!("{}:{}", inner, widget.name);
        }
        let outer = self.node_mut(container)?;
        outer.widgets.push(copy);
        log::debug!(
            "exposed widget {widget_name} of node {inner} on container {container} (by_reference={by_reference})"
        );
        Some(outer.widgets.len() - 1)
    }
}

impl InnerGraphSource for Workspace {
    fn inner_nodes(&self, container: &GraphNode) -> Option<&[GraphNode]> {
        let id = container.subgraph?;
        self.subgraphs.get(&id).map(|g| g.nodes.as_slice())
    }
}
