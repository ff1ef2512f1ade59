//! Node face layout and deferred re-layout.
//!
//! Renderers never resize nodes while drawing. They push a [`ResizeRequest`]
//! onto the [`IdleQueue`]; the host drains it at the start of the next frame
//! and calls [`apply_resize`], which recomputes the node's height from the
//! current widget sizes while keeping its width.

use crate::decorators::{self, DecoratorConfig, WidgetCx};
use crate::graph::{GraphNode, NodeId, Workspace};
use crate::resolver::InnerGraphSource;
use std::cell::RefCell;

/// Height of the node title bar.
pub const HEADER_HEIGHT: f32 = 26.0;
/// Height of a plain control widget (number, toggle, text, button).
pub const CONTROL_HEIGHT: f32 = 20.0;
/// Vertical gap after each widget.
pub const WIDGET_SPACING: f32 = 4.0;
pub const MIN_NODE_WIDTH: f32 = 200.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeRequest {
    pub node: NodeId,
}

/// Work to run on the next idle tick. Requests for the same node coalesce.
#[derive(Debug, Default)]
pub struct IdleQueue {
    pending: RefCell<Vec<ResizeRequest>>,
}

impl IdleQueue {
    pub fn request(&self, request: ResizeRequest) {
        let mut pending = self.pending.borrow_mut();
        if !pending.contains(&request) {
            pending.push(request);
        }
    }

    pub fn drain(&self) -> Vec<ResizeRequest> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }
}

/// Height of widget `index` on `node`, laid out at `width`.
pub fn widget_height(
    source: &dyn InnerGraphSource,
    node: &GraphNode,
    index: usize,
    width: f32,
    config: &DecoratorConfig,
    idle: &IdleQueue,
) -> f32 {
    let Some(widget) = node.widgets.get(index) else {
        return 0.0;
    };
    match decorators::decorator_for(widget.kind) {
        Some(decorator) => {
            let cx = WidgetCx {
                source,
                node,
                index,
                config,
                idle,
            };
            decorator.compute_size(&cx, width).1
        }
        None => CONTROL_HEIGHT,
    }
}

/// Size the node wants: header plus every widget, at least `MIN_NODE_WIDTH` wide.
pub fn compute_node_size(
    source: &dyn InnerGraphSource,
    node: &GraphNode,
    config: &DecoratorConfig,
    idle: &IdleQueue,
) -> (f32, f32) {
    let width = node.size.0.max(MIN_NODE_WIDTH);
    let widgets: f32 = (0..node.widgets.len())
        .map(|i| {
            let h = widget_height(source, node, i, width, config, idle);
            if h > 0.0 { h + WIDGET_SPACING } else { 0.0 }
        })
        .sum();
    (width, HEADER_HEIGHT + widgets + WIDGET_SPACING)
}

/// Apply a queued resize: recompute the height, keep the current width.
/// Returns `false` when the node no longer exists.
pub fn apply_resize(workspace: &mut Workspace, config: &DecoratorConfig, request: ResizeRequest) -> bool {
    let scratch = IdleQueue::default();
    let Some(node) = workspace.node(request.node) else {
        log::debug!("dropping resize for missing node {}", request.node);
        return false;
    };
    let (_, height) = compute_node_size(&*workspace, node, config, &scratch);
    if let Some(node) = workspace.node_mut(request.node) {
        log::debug!(
            "resizing node {} to {}x{}",
            request.node,
            node.size.0,
            height
        );
        node.size.1 = height;
    }
    true
}

/// Drain the queue and apply every request. Returns how many were applied.
pub fn run_idle(workspace: &mut Workspace, config: &DecoratorConfig, idle: &IdleQueue) -> usize {
    idle.drain()
        .into_iter()
        .filter(|req| apply_resize(workspace, config, *req))
        .count()
}
