use crate::settings::{self, AppSettings};
use eframe::egui;
use egui::{Align2, Color32, FontId, Painter, Rect, Sense, Stroke, Vec2};
use std::collections::HashMap;
use ui_decorators::controls::{self, Control};
use ui_decorators::decorators::{self, WidgetCx};
use ui_decorators::graph::{GraphNode, NodeId, SubgraphId, WidgetKind, Workspace};
use ui_decorators::layout::{self, HEADER_HEIGHT, IdleQueue, ResizeRequest, WIDGET_SPACING};
use ui_decorators::node_types::{DecoratorKind, NodeKind};
use ui_decorators::picker::{self, ColorPicker, PointerRouter};
use ui_decorators::properties::{Attr, PropKey, PropValue};
use ui_decorators::surface::PainterSurface;

pub struct DecoratorApp {
    workspace: Workspace,
    settings: AppSettings,
    workspace_name: String,
    idle: IdleQueue,
    router: PointerRouter,
    picker: Option<ColorPicker>,
    /// Set on the frame a picker opens so the opening click doesn't close it.
    picker_fresh: bool,
    selected: Option<NodeId>,
    /// Graph shown on the canvas; `None` is the root graph.
    view: Option<SubgraphId>,
    pan: Vec2,
    /// In-progress hex text per (node, widget) until it parses.
    hex_drafts: HashMap<(NodeId, usize), String>,
    next_link: u64,
    config_open: bool,
    logs: Vec<String>,
}

impl DecoratorApp {
    pub fn new() -> Self {
        let settings = AppSettings::load_or_default(settings::SETTINGS_PATH);
        let mut logs = Vec::new();
        let workspace = match settings.last_workspace.as_deref() {
            Some(path) => match settings::load_workspace(path) {
                Ok(ws) => {
                    logs.push(format!("[System] Loaded {path}"));
                    ws
                }
                Err(e) => {
                    log::warn!("falling back to demo workspace: {e:#}");
                    logs.push(format!("[System] Could not load {path}"));
                    demo_workspace()
                }
            },
            None => demo_workspace(),
        };
        let workspace_name = settings
            .last_workspace
            .clone()
            .unwrap_or_else(|| settings::DEFAULT_WORKSPACE.to_string());

        let mut app = Self {
            workspace,
            settings,
            workspace_name,
            idle: IdleQueue::default(),
            router: PointerRouter::new(),
            picker: None,
            picker_fresh: false,
            selected: None,
            view: None,
            pan: Vec2::new(40.0, 40.0),
            hex_drafts: HashMap::new(),
            next_link: 1,
            config_open: false,
            logs,
        };
        app.configure_all();
        app
    }

    /// Restore hooks plus a relayout of every node.
    fn configure_all(&mut self) {
        let mut ids = Vec::new();
        let graphs = std::iter::once(&mut self.workspace.root).chain(self.workspace.subgraphs.values_mut());
        for graph in graphs {
            for node in &mut graph.nodes {
                controls::on_configure(node);
                ids.push(node.id);
            }
        }
        for node in ids {
            self.idle.request(ResizeRequest { node });
        }
    }

    fn save(&mut self) {
        let result = settings::save_workspace(&self.workspace, &self.workspace_name).and_then(|()| {
            self.settings.last_workspace = Some(self.workspace_name.clone());
            self.settings.save(settings::SETTINGS_PATH)
        });
        match result {
            Ok(()) => self.logs.push(format!("[System] Saved {}", self.workspace_name)),
            Err(e) => {
                log::error!("save failed: {e:#}");
                self.logs.push(format!("[Error] {e:#}"));
            }
        }
    }

    fn load(&mut self) {
        match settings::load_workspace(&self.workspace_name) {
            Ok(ws) => {
                self.workspace = ws;
                self.picker = None;
                self.selected = None;
                self.view = None;
                self.hex_drafts.clear();
                self.configure_all();
                self.logs.push(format!("[System] Loaded {}", self.workspace_name));
            }
            Err(e) => {
                log::warn!("load failed: {e:#}");
                self.logs.push(format!("[Error] {e:#}"));
            }
        }
    }

    fn show_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("UI Decorators");
                ui.separator();
                if ui.selectable_label(self.view.is_none(), "Root graph").clicked() {
                    self.view = None;
                }
                let mut subgraphs: Vec<SubgraphId> = self.workspace.subgraphs.keys().copied().collect();
                subgraphs.sort_by_key(|id| id.0);
                for id in subgraphs {
                    let label = format!("Subgraph {}", id.0);
                    if ui.selectable_label(self.view == Some(id), label).clicked() {
                        self.view = Some(id);
                    }
                }
                ui.separator();
                ui.label("Workspace:");
                ui.add(egui::TextEdit::singleline(&mut self.workspace_name).desired_width(140.0));
                if ui.button("Save").clicked() {
                    self.save();
                }
                if ui.button("Load").clicked() {
                    self.load();
                }
                if ui.button("Demo").clicked() {
                    self.workspace = demo_workspace();
                    self.hex_drafts.clear();
                    self.picker = None;
                    self.selected = None;
                    self.view = None;
                    self.configure_all();
                }
                ui.separator();
                if ui.button("Layout").clicked() {
                    self.config_open = !self.config_open;
                }
            });
        });
    }

    fn show_logs(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(90.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.logs {
                            ui.monospace(line);
                        }
                    });
            });
    }

    fn show_inspector(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("inspector")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.inspector_body(ui));
            });
    }

    fn inspector_body(&mut self, ui: &mut egui::Ui) {
        let Some(id) = self.selected else {
            ui.label("Select a node to edit its widgets.");
            return;
        };
        let Some(node) = self.workspace.node_mut(id) else {
            self.selected = None;
            return;
        };
        ui.heading(format!("{} #{}", node.title, node.id));
        ui.separator();

        let mut changed = false;
        let mut open_picker = None;
        for index in 0..node.widgets.len() {
            let widget = &node.widgets[index];
            let (kind, name, value) = (widget.kind, widget.name.clone(), widget.value.clone());
            match kind {
                WidgetKind::Title => {
                    let mut text = value.as_text();
                    ui.label(&name);
                    if ui.text_edit_singleline(&mut text).changed() {
                        changed |= controls::edit_text(node, index, &text);
                    }
                }
                WidgetKind::Note => {
                    let mut text = value.as_text();
                    ui.label(&name);
                    let edit = egui::TextEdit::multiline(&mut text).desired_rows(4);
                    if ui.add(edit).changed() {
                        changed |= controls::edit_text(node, index, &text);
                    }
                }
                WidgetKind::Divider | WidgetKind::DividerHidden | WidgetKind::Spacer => {
                    ui.weak(format!("{name} ({kind:?})"));
                }
                WidgetKind::Control(Control::FontSize(_) | Control::SpacerHeight) => {
                    let mut number = value.as_number().unwrap_or(0.0);
                    let drag = egui::DragValue::new(&mut number).speed(0.5).prefix(format!("{name}: "));
                    if ui.add(drag).changed() {
                        changed |= controls::apply_control(node, index, number.into());
                    }
                }
                WidgetKind::Control(Control::Bold(_)) => {
                    let mut bold = value.truthy();
                    if ui.checkbox(&mut bold, name.as_str()).changed() {
                        changed |= controls::apply_control(node, index, bold.into());
                    }
                }
                WidgetKind::Control(Control::ColorHex(..)) => {
                    let draft = self
                        .hex_drafts
                        .entry((id, index))
                        .or_insert_with(|| value.as_text());
                    ui.horizontal(|ui| {
                        ui.label(&name);
                        if ui.text_edit_singleline(draft).changed()
                            && controls::apply_control(node, index, PropValue::Text(draft.clone()))
                        {
                            changed = true;
                        }
                    });
                }
                WidgetKind::Control(Control::PickColor(dk, attr)) => {
                    if ui.button(name.as_str()).clicked() {
                        let hex = node.properties.hex(&PropKey::style(dk, attr), "#ffffff");
                        open_picker = Some((dk, attr, hex));
                    }
                }
            }
        }

        if !node.inputs.is_empty() {
            ui.separator();
            ui.label("Inputs");
            for input in &mut node.inputs {
                let mut linked = input.link.is_some();
                if ui.checkbox(&mut linked, format!("{} linked", input.name)).changed() {
                    input.link = linked.then(|| {
                        self.next_link += 1;
                        self.next_link
                    });
                }
            }
        }

        if changed {
            self.idle.request(ResizeRequest { node: id });
        }
        if let Some((kind, attr, hex)) = open_picker {
            self.open_picker(id, kind, attr, &hex);
        }
    }

    fn open_picker(&mut self, node: NodeId, kind: DecoratorKind, attr: Attr, hex: &str) {
        // Release any previous capture before asking for a new one.
        self.picker = None;
        self.picker = ColorPicker::open(node, kind, attr, hex, &self.router);
        self.picker_fresh = self.picker.is_some();
    }

    fn show_picker(&mut self, ctx: &egui::Context) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let mut open = true;
        let mut close = false;
        let mut picked = None;
        let window = egui::Window::new("Color")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(picker::CANVAS_SIZE, Sense::click_and_drag());
                let origin = response.rect.min;
                if let Some(pos) = response.interact_pointer_pos() {
                    let local = (pos - origin).to_pos2();
                    if response.drag_started() || response.clicked() {
                        picked = Some(picker.press(local));
                    } else if response.dragged() {
                        picked = picker.drag(local);
                    }
                }
                if response.drag_stopped() || response.clicked() {
                    picker.release();
                }
                picker.paint(&painter, origin);
                ui.horizontal(|ui| {
                    ui.monospace(picker.hex());
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            });
        if let Some(window) = window {
            if window.response.clicked_elsewhere() && !self.picker_fresh {
                close = true;
            }
        }
        self.picker_fresh = false;

        let (target, kind, attr) = (picker.node, picker.kind, picker.attr);
        if let Some(hex) = picked {
            match self.workspace.node_mut(target) {
                Some(node) => {
                    if let Some(index) = controls::color_field_for(node, kind, attr) {
                        controls::apply_control(node, index, hex.into());
                        self.hex_drafts.remove(&(target, index));
                    }
                }
                None => close = true,
            }
        }
        if !open || close {
            self.picker = None;
        }
    }

    fn show_config(&mut self, ctx: &egui::Context) {
        if !self.config_open {
            return;
        }
        let mut open = true;
        let mut changed = false;
        let mut save = false;
        egui::Window::new("Layout").open(&mut open).show(ctx, |ui| {
            let c = &mut self.settings.config;
            let fields: [(&str, &mut f32); 14] = [
                ("title pad top", &mut c.title_pad_top),
                ("title pad bottom", &mut c.title_pad_bottom),
                ("title inset", &mut c.title_inset),
                ("divider pad top", &mut c.divider_pad_top),
                ("divider pad bottom", &mut c.divider_pad_bottom),
                ("divider margin", &mut c.divider_margin),
                ("note pad top", &mut c.note_pad_top),
                ("note pad bottom", &mut c.note_pad_bottom),
                ("note margin", &mut c.note_margin),
                ("note inner pad x", &mut c.note_inner_pad_x),
                ("note inner pad top", &mut c.note_inner_pad_top),
                ("note inner pad bottom", &mut c.note_inner_pad_bottom),
                ("note line height", &mut c.note_line_height_mult),
                ("note corner radius", &mut c.note_corner_radius),
            ];
            egui::Grid::new("layout_grid").num_columns(2).show(ui, |ui| {
                for (label, value) in fields {
                    ui.label(label);
                    changed |= ui.add(egui::DragValue::new(value).speed(0.1)).changed();
                    ui.end_row();
                }
            });
            save = ui.button("Save settings").clicked();
        });
        self.config_open = open;
        if changed {
            self.configure_all();
        }
        if save {
            match self.settings.save(settings::SETTINGS_PATH) {
                Ok(()) => self.logs.push("[System] Settings saved".to_string()),
                Err(e) => self.logs.push(format!("[Error] {e:#}")),
            }
        }
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        painter.rect_filled(response.rect, 0.0, Color32::from_gray(32));
        if response.dragged_by(egui::PointerButton::Middle) || response.dragged_by(egui::PointerButton::Secondary) {
            self.pan += response.drag_delta();
        }
        if response.clicked() {
            self.selected = None;
        }
        let origin = response.rect.min + self.pan;

        let Some(graph) = self.workspace.graph(self.view) else {
            self.view = None;
            return;
        };
        let mut moved = Vec::new();
        let mut select = None;
        let mut enter = None;
        for node in &graph.nodes {
            let rect = Rect::from_min_size(
                origin + Vec2::new(node.position.0, node.position.1),
                Vec2::new(node.size.0, node.size.1),
            );
            let header = Rect::from_min_size(rect.min, Vec2::new(rect.width(), HEADER_HEIGHT));
            let handle = ui.interact(header, egui::Id::new(("node", node.id)), Sense::click_and_drag());
            if handle.clicked() || handle.drag_started() {
                select = Some(node.id);
            }
            if handle.dragged() {
                moved.push((node.id, handle.drag_delta()));
            }
            if handle.double_clicked() {
                enter = node.subgraph;
            }
            self.paint_node(&painter, node, rect);
        }

        for (id, delta) in moved {
            if let Some(node) = self.workspace.node_mut(id) {
                node.position.0 += delta.x;
                node.position.1 += delta.y;
            }
        }
        if select.is_some() {
            self.selected = select;
        }
        if enter.is_some() {
            self.view = enter;
        }
    }

    fn paint_node(&self, painter: &Painter, node: &GraphNode, rect: Rect) {
        painter.rect_filled(rect, 5.0, Color32::from_gray(45));
        let header = Rect::from_min_size(rect.min, Vec2::new(rect.width(), HEADER_HEIGHT));
        painter.rect_filled(header, 5.0, header_color(node.kind));
        painter.text(
            header.left_center() + Vec2::new(8.0, 0.0),
            Align2::LEFT_CENTER,
            &node.title,
            FontId::proportional(13.0),
            Color32::WHITE,
        );
        if self.selected == Some(node.id) {
            painter.rect_stroke(
                rect.expand(2.0),
                3.0,
                Stroke::new(2.0, Color32::YELLOW),
                egui::StrokeKind::Middle,
            );
        }

        let config = &self.settings.config;
        let mut surface = PainterSurface::new(painter, rect.min);
        let mut y = HEADER_HEIGHT;
        for (index, widget) in node.widgets.iter().enumerate() {
            let height = layout::widget_height(&self.workspace, node, index, node.size.0, config, &self.idle);
            if height <= 0.0 {
                continue;
            }
            match decorators::decorator_for(widget.kind) {
                Some(decorator) => {
                    let cx = WidgetCx {
                        source: &self.workspace,
                        node,
                        index,
                        config,
                        idle: &self.idle,
                    };
                    decorator.draw(&cx, &mut surface, node.size.0, y);
                }
                None => {
                    painter.text(
                        rect.min + Vec2::new(10.0, y + height / 2.0),
                        Align2::LEFT_CENTER,
                        format!("{}: {}", widget.name, widget.value),
                        FontId::proportional(11.0),
                        Color32::from_gray(170),
                    );
                }
            }
            y += height + WIDGET_SPACING;
        }
    }
}

impl eframe::App for DecoratorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let applied = layout::run_idle(&mut self.workspace, &self.settings.config, &self.idle);
        if applied > 0 {
            log::trace!("applied {applied} deferred resizes");
        }
        if let Some(graph) = self.workspace.graph_mut(self.view) {
            for node in &mut graph.nodes {
                controls::before_draw(node);
            }
        }

        self.show_top_panel(ctx);
        self.show_logs(ctx);
        self.show_inspector(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.show_canvas(ui));
        self.show_picker(ctx);
        self.show_config(ctx);

        if !self.idle.is_empty() {
            ctx.request_repaint();
        }
    }
}

fn header_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Title => Color32::from_rgb(60, 90, 140),
        NodeKind::Divider => Color32::from_rgb(80, 80, 80),
        NodeKind::Spacer => Color32::from_rgb(70, 70, 90),
        NodeKind::Note => Color32::from_rgb(120, 100, 50),
        NodeKind::Container => Color32::from_rgb(60, 110, 70),
    }
}

fn add_node(ws: &mut Workspace, graph: Option<SubgraphId>, kind: NodeKind, pos: (f32, f32)) -> NodeId {
    let id = ws.alloc_node_id();
    let mut node = GraphNode::new(id, kind, pos);
    controls::on_node_created(&mut node);
    if let Some(graph) = ws.graph_mut(graph) {
        graph.nodes.push(node);
    }
    id
}

fn set_text(ws: &mut Workspace, id: NodeId, text: &str) {
    if let Some(node) = ws.node_mut(id) {
        controls::edit_text(node, 0, text);
    }
}

fn set_color(ws: &mut Workspace, id: NodeId, kind: DecoratorKind, attr: Attr, hex: &str) {
    if let Some(node) = ws.node_mut(id) {
        if let Some(index) = controls::color_field_for(node, kind, attr) {
            controls::apply_control(node, index, hex.into());
        }
    }
}

/// A container whose face shows the decorators of its subgraph, plus a
/// stand-alone note on the root graph.
pub fn demo_workspace() -> Workspace {
    let mut ws = Workspace::new();
    let sub = ws.add_subgraph();
    let inner = Some(sub);

    let inputs = add_node(&mut ws, inner, NodeKind::Title, (0.0, 0.0));
    set_text(&mut ws, inputs, "Inputs");
    set_color(&mut ws, inputs, DecoratorKind::Title, Attr::Color, "#8fd3ff");
    if let Some(node) = ws.node_mut(inputs) {
        if let Some(input) = node.inputs.iter_mut().find(|i| i.name == "divider_in") {
            input.link = Some(1);
        }
    }

    let divider = add_node(&mut ws, inner, NodeKind::Divider, (0.0, 90.0));
    set_color(&mut ws, divider, DecoratorKind::Divider, Attr::Color, "#4488ff");

    let note = add_node(&mut ws, inner, NodeKind::Note, (0.0, 160.0));
    set_text(
        &mut ws,
        note,
        "Notes follow their inner node.\nEdit the text in the subgraph and the container face grows to fit.",
    );
    set_color(&mut ws, note, DecoratorKind::Note, Attr::BgColor, "#2b2b3a");

    let spacer = add_node(&mut ws, inner, NodeKind::Spacer, (0.0, 330.0));
    if let Some(node) = ws.node_mut(spacer) {
        if let Some(index) = node.widget_index("height_px") {
            controls::apply_control(node, index, 32.0.into());
        }
    }

    let outputs = add_node(&mut ws, inner, NodeKind::Title, (0.0, 420.0));
    set_text(&mut ws, outputs, "Outputs");
    set_color(&mut ws, outputs, DecoratorKind::Title, Attr::Color, "#ffb86c");

    let container = add_node(&mut ws, None, NodeKind::Container, (0.0, 0.0));
    if let Some(node) = ws.node_mut(container) {
        node.subgraph = Some(sub);
        node.size.0 = 260.0;
    }
    // Promoted widgets carry the inner id; linked ones are matched by content
    // or position.
    ws.expose_widget(container, inputs, "title", true);
    ws.expose_widget(container, divider, "divider", false);
    ws.expose_widget(container, note, "note", true);
    ws.expose_widget(container, spacer, "spacer", false);
    ws.expose_widget(container, outputs, "title", false);

    let loose = add_node(&mut ws, None, NodeKind::Note, (320.0, 0.0));
    set_text(
        &mut ws,
        loose,
        "Double-click the container header to open its subgraph.",
    );
    ws
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui_decorators::decorators::{NoteStyle, TitleStyle};
    use ui_decorators::resolver::{self, MatchStrategy};

    fn container(ws: &Workspace) -> &GraphNode {
        ws.root
            .nodes
            .iter()
            .find(|n| n.kind == NodeKind::Container)
            .unwrap()
    }

    #[test]
    fn test_demo_container_resolves_every_widget() {
        let ws = demo_workspace();
        let host = container(&ws);
        let expected = [
            (DecoratorKind::Title, MatchStrategy::Identity),
            (DecoratorKind::Divider, MatchStrategy::Positional),
            (DecoratorKind::Note, MatchStrategy::Identity),
            (DecoratorKind::Spacer, MatchStrategy::Positional),
            (DecoratorKind::Title, MatchStrategy::Content),
        ];
        for (index, (kind, strategy)) in expected.into_iter().enumerate() {
            let res = resolver::resolve(&ws, host, index, kind);
            assert_eq!(res.strategy(), Some(strategy), "widget {index}");
        }

        let outputs = resolver::resolve(&ws, host, 4, DecoratorKind::Title);
        assert_eq!(TitleStyle::read(&outputs.node().unwrap().properties).color, "#ffb86c");
        let note = resolver::resolve(&ws, host, 2, DecoratorKind::Note);
        assert_eq!(NoteStyle::read(&note.node().unwrap().properties).bg_color, "#2b2b3a");
    }

    #[test]
    fn test_demo_links_are_mirrored() {
        let mut ws = demo_workspace();
        let title = ws
            .subgraphs
            .values_mut()
            .flat_map(|g| g.nodes.iter_mut())
            .find(|n| n.kind == NodeKind::Title)
            .unwrap();
        controls::before_draw(title);
        assert!(title.properties.flag(&PropKey::linked("divider_in"), false));
        assert!(!title.properties.flag(&PropKey::linked("title"), true));
    }

    #[test]
    fn test_demo_survives_json_round_trip() {
        let ws = demo_workspace();
        let json = serde_json::to_string(&ws).unwrap();
        let back: Workspace = serde_json::from_str(&json).unwrap();
        let host = container(&back);
        assert_eq!(host.widgets.len(), 5);
        assert!(resolver::resolve(&back, host, 0, DecoratorKind::Title)
            .node()
            .is_some());
    }
}
