//! The `eframe::App` implementation: owns the live scene, undo history,
//! viewport, and current interaction mode, and wires pointer/keyboard/
//! wheel events to `roomcraft_engine`.

use eframe::egui::{self, Key, PointerButton};

use roomcraft_engine::config::Config;
use roomcraft_engine::furniture_library;
use roomcraft_engine::geometry::Pt;
use roomcraft_engine::history::{Clock, History};
use roomcraft_engine::scene::mutations::{self, AlignEdge, Axis};
use roomcraft_engine::scene::validate;
use roomcraft_engine::scene::Scene;
use roomcraft_engine::snap;
use roomcraft_engine::spatial_hash::SpatialHash;
use roomcraft_engine::templates;

use crate::interaction::{
    self, DispatchContext, InteractionMode, MouseButton, Tool,
};
use crate::render::{self, RenderOverlays, Viewport as RenderViewport};

pub struct App {
    config: Config,
    history: History,
    scene: Scene,
    selection: Vec<String>,
    mode: InteractionMode,
    tool: Tool,
    pan: Pt,
    zoom: f64,
    fullscreen: bool,
    space_held: bool,
    last_pointer_screen: Option<egui::Pos2>,
    library_pick: &'static str,
    template_pick: &'static str,
}

impl App {
    pub fn new(initial_scene: Option<Scene>, config: Config, fullscreen: bool) -> Self {
        let scene = initial_scene.unwrap_or_else(|| {
            let template = templates::find_template("Living Room — Compact").unwrap();
            Scene::new(template.build())
        });
        let history = History::with_capacity(
            Clock::default(),
            scene.snapshot(),
            config.history_capacity,
            config.nudge_debounce(),
        );

        Self {
            config,
            history,
            scene,
            selection: Vec::new(),
            mode: InteractionMode::Idle,
            tool: Tool::Select,
            pan: Pt::ZERO,
            zoom: 1.0,
            fullscreen,
            space_held: false,
            last_pointer_screen: None,
            library_pick: furniture_library::CATALOG[0].id,
            template_pick: templates::CATALOG[0].name,
        }
    }

    /// "Add from library" (spec §4.9): instantiates a catalog product at
    /// the room's centroid with a fresh id.
    fn add_from_library(&mut self, product_id: &str) {
        let Some(product) = furniture_library::find_product(product_id) else {
            return;
        };
        let center = roomcraft_engine::geometry::polygon_bounds(&self.scene.room.points())
            .map(|b| b.center())
            .unwrap_or(Pt::ZERO);
        let item = furniture_library::place(product, center.x, center.y);
        let id = item.id.clone();
        self.scene.furniture.push(item);
        self.selection = vec![id];
        self.maybe_commit();
    }

    fn spatial_hash(&self) -> SpatialHash {
        SpatialHash::new(&self.scene.furniture)
    }

    fn snap_threshold(&self) -> f64 {
        snap::screen_to_world_threshold(self.config.snap_px, self.config.px_per_ft, self.zoom)
    }

    fn screen_to_world(&self, p: egui::Pos2, origin: egui::Pos2) -> Pt {
        let cursor = Pt::new((p.x - origin.x) as f64, (p.y - origin.y) as f64);
        crate::hit_test::screen_to_world(cursor, self.pan, self.config.px_per_ft, self.zoom)
    }

    /// Commits the live scene to history if it actually changed, and
    /// re-validates structural invariants (non-simple polygon after a
    /// vertex drag is refused by simply not advancing history).
    fn maybe_commit(&mut self) {
        if self.scene.room.is_simple() {
            self.history.push(self.scene.snapshot());
        } else {
            tracing::warn!("refusing to commit: room polygon is self-intersecting");
            self.scene = self.scene.restore(self.history.current());
        }
    }

    fn undo(&mut self) {
        if let Some(snap) = self.history.undo() {
            self.scene = self.scene.restore(snap);
        }
    }

    fn redo(&mut self) {
        if let Some(snap) = self.history.redo() {
            self.scene = self.scene.restore(snap);
        }
    }

    fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.scene = mutations::delete_many(&self.scene, &self.selection);
        self.selection.clear();
        self.maybe_commit();
    }

    fn nudge_selection(&mut self, dx: f64, dy: f64) {
        if self.selection.is_empty() {
            return;
        }
        self.scene = mutations::move_many(&self.scene, &self.selection, dx, dy);
        self.history.note_nudge();
    }

    fn apply_template(&mut self, name: &str) {
        if let Some(t) = templates::find_template(name) {
            self.scene.room = t.build();
            self.scene = self.scene.prune_orphaned_openings();
            self.maybe_commit();
        }
    }

    fn fit_to_viewport(&mut self, viewport_size: egui::Vec2) {
        let Some(bounds) = roomcraft_engine::geometry::polygon_bounds(&self.scene.room.points())
        else {
            return;
        };
        let world_w = bounds.width().max(1.0);
        let world_h = bounds.height().max(1.0);
        let zoom_x = viewport_size.x as f64 / (world_w * self.config.px_per_ft);
        let zoom_y = viewport_size.y as f64 / (world_h * self.config.px_per_ft);
        self.zoom = zoom_x
            .min(zoom_y)
            .clamp(self.config.min_zoom, self.config.max_zoom);
        let center = bounds.center();
        self.pan = Pt::new(
            viewport_size.x as f64 / 2.0 - center.x * self.config.px_per_ft * self.zoom,
            viewport_size.y as f64 / 2.0 - center.y * self.config.px_per_ft * self.zoom,
        );
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let input = ctx.input(|i| i.clone());
        let cmd = input.modifiers.command;
        let shift = input.modifiers.shift;

        if input.key_pressed(Key::Escape) {
            self.selection.clear();
            self.mode = InteractionMode::Idle;
        }
        if input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace) {
            self.delete_selection();
        }
        if input.key_pressed(Key::R) && !cmd {
            if !self.selection.is_empty() {
                self.scene = mutations::rotate_many(&self.scene, &self.selection, 90.0);
                self.maybe_commit();
            }
        }
        if cmd && shift && input.key_pressed(Key::Z) {
            self.redo();
        } else if cmd && input.key_pressed(Key::Z) {
            self.undo();
        }
        if cmd && input.key_pressed(Key::D) {
            self.scene = mutations::duplicate_many(&self.scene, &self.selection);
            self.maybe_commit();
        }
        if cmd && input.key_pressed(Key::A) {
            self.selection = self.scene.furniture.iter().map(|f| f.id.clone()).collect();
        }
        if cmd && input.key_pressed(Key::Num0) {
            self.fit_to_viewport(input.screen_rect.size());
        }
        if input.key_pressed(Key::G) && !cmd {
            self.scene.overlays.show_grid = !self.scene.overlays.show_grid;
        }
        for (key, ch) in [
            (Key::V, 'v'),
            (Key::H, 'h'),
            (Key::D, 'd'),
            (Key::W, 'w'),
            (Key::M, 'm'),
            (Key::X, 'x'),
        ] {
            if input.key_pressed(key) && !cmd {
                if let Some(tool) = Tool::from_shortcut(ch) {
                    self.tool = tool;
                }
            }
        }
        if input.key_pressed(Key::Plus) || input.key_pressed(Key::Equals) {
            self.zoom_at_center(input.screen_rect.size(), 1.1);
        }
        if input.key_pressed(Key::Minus) {
            self.zoom_at_center(input.screen_rect.size(), 1.0 / 1.1);
        }

        let step = if shift { 0.1 } else { 0.5 };
        if input.key_pressed(Key::ArrowLeft) {
            self.nudge_selection(-step, 0.0);
        }
        if input.key_pressed(Key::ArrowRight) {
            self.nudge_selection(step, 0.0);
        }
        if input.key_pressed(Key::ArrowUp) {
            self.nudge_selection(0.0, -step);
        }
        if input.key_pressed(Key::ArrowDown) {
            self.nudge_selection(0.0, step);
        }

        self.space_held = input.key_down(Key::Space);

        if self.history.nudge_commit_due() {
            let snapshot = self.scene.snapshot();
            self.history.commit_nudge(snapshot);
        }
    }

    fn zoom_at_center(&mut self, viewport_size: egui::Vec2, factor: f64) {
        let center = Pt::new(viewport_size.x as f64 / 2.0, viewport_size.y as f64 / 2.0);
        let (zoom, pan) = interaction::zoom_toward_cursor(
            center,
            self.pan,
            self.zoom,
            self.config.px_per_ft,
            factor,
            self.config.min_zoom,
            self.config.max_zoom,
        );
        self.zoom = zoom;
        self.pan = pan;
    }

    fn handle_wheel(&mut self, ctx: &egui::Context, origin: egui::Pos2) {
        let (scroll, modifiers, cursor) = ctx.input(|i| {
            (
                i.smooth_scroll_delta,
                i.modifiers,
                i.pointer.hover_pos(),
            )
        });
        if scroll == egui::Vec2::ZERO {
            return;
        }
        let Some(cursor) = cursor else { return };
        let cursor_screen = Pt::new((cursor.x - origin.x) as f64, (cursor.y - origin.y) as f64);

        if modifiers.ctrl || modifiers.command {
            let factor = if scroll.y > 0.0 { 1.04 } else { 0.96 };
            let (zoom, pan) = interaction::zoom_toward_cursor(
                cursor_screen,
                self.pan,
                self.zoom,
                self.config.px_per_ft,
                factor,
                self.config.min_zoom,
                self.config.max_zoom,
            );
            self.zoom = zoom;
            self.pan = pan;
        } else if scroll.x.abs() > 0.0 || scroll.y.abs() < 50.0 {
            self.pan += Pt::new(-scroll.x as f64, -scroll.y as f64);
        } else {
            let factor = if scroll.y > 0.0 { 1.08 } else { 0.92 };
            let (zoom, pan) = interaction::zoom_toward_cursor(
                cursor_screen,
                self.pan,
                self.zoom,
                self.config.px_per_ft,
                factor,
                self.config.min_zoom,
                self.config.max_zoom,
            );
            self.zoom = zoom;
            self.pan = pan;
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, origin: egui::Pos2) {
        let pointer = ctx.input(|i| i.pointer.clone());

        if pointer.button_pressed(PointerButton::Primary)
            || pointer.button_pressed(PointerButton::Middle)
            || pointer.button_pressed(PointerButton::Secondary)
        {
            let Some(pos) = pointer.interact_pos() else { return };
            let world = self.screen_to_world(pos, origin);
            let button = if pointer.button_pressed(PointerButton::Middle) {
                MouseButton::Middle
            } else if pointer.button_pressed(PointerButton::Secondary) {
                MouseButton::Right
            } else {
                MouseButton::Left
            };
            let shift = ctx.input(|i| i.modifiers.shift);
            let hash = self.spatial_hash();
            let dctx = DispatchContext {
                scene: &self.scene,
                spatial_hash: &hash,
                tool: self.tool,
                selection: &self.selection,
                space_held: self.space_held,
                shift_held: shift,
                fullscreen: self.fullscreen,
            };
            let outcome = interaction::on_pointer_down(
                &dctx,
                button,
                world,
                self.zoom,
                self.config.px_per_ft,
            );
            self.mode = outcome.mode;
            self.scene = outcome.scene;
            self.selection = outcome.selection;
            if outcome.commit {
                self.maybe_commit();
            }
            self.last_pointer_screen = Some(pos);
        }

        if pointer.is_decidedly_dragging() || matches!(self.mode, InteractionMode::Pan { .. }) {
            if let Some(pos) = pointer.interact_pos() {
                let world = self.screen_to_world(pos, origin);
                let threshold = self.snap_threshold();
                let shift = ctx.input(|i| i.modifiers.shift);
                let (mode, scene) = interaction::on_pointer_move(
                    &self.mode,
                    &self.scene,
                    world,
                    &mut self.pan,
                    threshold,
                    shift,
                );
                self.mode = mode;
                self.scene = scene;
                self.last_pointer_screen = Some(pos);
            }
        }

        // A pointer leaving the canvas is treated exactly like pointer-up
        // (spec §5 "Cancellation"): commit if the in-progress edit was
        // dirty, without rolling anything back.
        let left_canvas = self.last_pointer_screen.is_some()
            && pointer.interact_pos().is_none()
            && pointer.hover_pos().is_none();

        if pointer.any_released() || left_canvas {
            let (mode, selected) = interaction::on_pointer_up(&self.mode, &self.scene);
            if !selected.is_empty() {
                self.selection = selected;
            }
            if interaction::is_mutating(&self.mode) {
                self.maybe_commit();
            }
            self.mode = mode;
            if left_canvas {
                self.last_pointer_screen = None;
            }
        }
    }
    /// Toolbar for the multi-select, z-order, template and furniture-
    /// library operations that spec.md §4.2/§4.9 define as pure engine
    /// functions but that need some host surface to be reachable at all
    /// (pointer/keyboard dispatch in §4.6 only covers move/resize/rotate).
    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if ui.button("Undo").clicked() {
                    self.undo();
                }
                if ui.button("Redo").clicked() {
                    self.redo();
                }
                ui.separator();

                egui::ComboBox::from_label("Template")
                    .selected_text(self.template_pick)
                    .show_ui(ui, |ui| {
                        for t in templates::CATALOG {
                            ui.selectable_value(&mut self.template_pick, t.name, t.name);
                        }
                    });
                if ui.button("Apply template").clicked() {
                    self.apply_template(self.template_pick);
                }
                ui.separator();

                egui::ComboBox::from_label("Add furniture")
                    .selected_text(self.library_pick)
                    .show_ui(ui, |ui| {
                        for p in furniture_library::CATALOG {
                            ui.selectable_value(&mut self.library_pick, p.id, p.label);
                        }
                    });
                if ui.button("Add").clicked() {
                    self.add_from_library(self.library_pick);
                }
                ui.separator();

                let has_selection = !self.selection.is_empty();
                let has_multi = self.selection.len() > 1;
                ui.add_enabled_ui(has_multi, |ui| {
                    if ui.button("Align left").clicked() {
                        self.align(AlignEdge::Left);
                    }
                    if ui.button("Align right").clicked() {
                        self.align(AlignEdge::Right);
                    }
                    if ui.button("Align top").clicked() {
                        self.align(AlignEdge::Top);
                    }
                    if ui.button("Align bottom").clicked() {
                        self.align(AlignEdge::Bottom);
                    }
                    if ui.button("Distribute H").clicked() {
                        self.distribute(Axis::Horizontal);
                    }
                    if ui.button("Distribute V").clicked() {
                        self.distribute(Axis::Vertical);
                    }
                });
                ui.separator();

                ui.add_enabled_ui(has_selection, |ui| {
                    if ui.button("Flip H").clicked() {
                        self.scene = mutations::flip_h(&self.scene, &self.selection);
                        self.maybe_commit();
                    }
                    if ui.button("Flip V").clicked() {
                        self.scene = mutations::flip_v(&self.scene, &self.selection);
                        self.maybe_commit();
                    }
                    if ui.button("To front").clicked() {
                        self.z_order(mutations::bring_to_front);
                    }
                    if ui.button("To back").clicked() {
                        self.z_order(mutations::send_to_back);
                    }
                    if ui.button("Forward").clicked() {
                        self.z_order(mutations::bring_forward);
                    }
                    if ui.button("Backward").clicked() {
                        self.z_order(mutations::send_backward);
                    }
                    if ui.button("Toggle lock").clicked() {
                        for id in self.selection.clone() {
                            self.scene = mutations::toggle_lock(&self.scene, &id);
                        }
                        self.maybe_commit();
                    }
                });
            });
        });
    }

    fn align(&mut self, edge: AlignEdge) {
        self.scene = mutations::align(&self.scene, &self.selection, edge);
        self.maybe_commit();
    }

    fn distribute(&mut self, axis: Axis) {
        self.scene = mutations::distribute(&self.scene, &self.selection, axis);
        self.maybe_commit();
    }

    fn z_order(&mut self, op: fn(&Scene, &str) -> Scene) {
        for id in self.selection.clone() {
            self.scene = op(&self.scene, &id);
        }
        self.maybe_commit();
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard(ctx);
        self.toolbar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let origin = response.rect.min;

            self.handle_wheel(ctx, origin);
            self.handle_pointer(ctx, origin);

            let vp = RenderViewport {
                pan: self.pan,
                zoom: self.zoom,
                px_per_ft: self.config.px_per_ft,
                origin,
            };
            let overlays = RenderOverlays {
                mode: &self.mode,
                selection: &self.selection,
                show_grid: self.scene.overlays.show_grid,
                show_clearances: self.scene.overlays.show_clearances,
                show_traffic_flow: self.scene.overlays.show_traffic_flow,
                show_dimensions: self.scene.overlays.show_dimensions,
            };
            render::paint(&painter, &vp, &self.scene, &overlays);
        });

        egui::SidePanel::right("validation_sidebar").show(ctx, |ui| {
            ui.heading("Validation");
            for issue in validate::validate_placement(&self.scene) {
                ui.colored_label(egui::Color32::from_rgb(200, 80, 40), format!("{:?}", issue));
            }
        });

        ctx.request_repaint();
    }
}
