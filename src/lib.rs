//! Decorator widgets for a node-graph editor: section titles, dividers,
//! spacers and note boxes that style a node face, and stay in sync when their
//! subgraph is collapsed into a container node.

pub mod color;
pub mod controls;
pub mod decorators;
pub mod graph;
pub mod layout;
pub mod node_types;
pub mod picker;
pub mod properties;
pub mod resolver;
pub mod surface;
