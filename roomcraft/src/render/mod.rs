//! The ordered render pipeline: one `egui::Painter` pass per repaint,
//! walking the scene back-to-front per spec's 16-step ordering.
//!
//! Every length here is computed in world feet, then converted to screen
//! pixels via the viewport transform immediately before drawing, except
//! overlay stroke widths and handle sizes, which are defined in screen
//! pixels and divided by zoom so they read as pixel-constant regardless
//! of zoom level.

use eframe::egui::{self, Color32, Painter, Pos2, Rect as EguiRect, Stroke};

use roomcraft_engine::geometry::Pt;
use roomcraft_engine::scene::{Door, Furniture, Room, Scene, Shape, Window};
use roomcraft_engine::snap::{Guide, GuideAxis};

use crate::hit_test;
use crate::interaction::InteractionMode;

pub struct Viewport {
    pub pan: Pt,
    pub zoom: f64,
    pub px_per_ft: f64,
    pub origin: Pos2,
}

impl Viewport {
    pub fn to_screen(&self, world: Pt) -> Pos2 {
        let screen = hit_test::world_to_screen(world, self.pan, self.px_per_ft, self.zoom);
        Pos2::new(self.origin.x + screen.x as f32, self.origin.y + screen.y as f32)
    }

    /// Converts a screen-pixel stroke/handle size to a size that stays
    /// visually constant across zoom levels.
    pub fn constant_px(&self, px: f32) -> f32 {
        px / self.zoom as f32
    }
}

pub struct RenderOverlays<'a> {
    pub mode: &'a InteractionMode,
    pub selection: &'a [String],
    pub show_grid: bool,
    pub show_clearances: bool,
    pub show_traffic_flow: bool,
    pub show_dimensions: bool,
}

/// Draws the full scene in spec order. Each numbered step corresponds to
/// the editor's fixed compositing order; nothing here reorders steps
/// based on content, only on the toggles in `overlays`.
pub fn paint(painter: &Painter, vp: &Viewport, scene: &Scene, overlays: &RenderOverlays) {
    // 1. Canvas clear is the caller's responsibility (egui clears the
    // panel background before we're invoked).

    // 3. Grid.
    if overlays.show_grid {
        paint_grid(painter, vp, &scene.room);
    }

    // 4. Room fill + floor pattern.
    paint_room_fill(painter, vp, &scene.room);

    // 5. Walls.
    paint_walls(painter, vp, &scene.room);

    // 6. Windows and doors.
    for d in &scene.doors {
        paint_door(painter, vp, &scene.room, d);
    }
    for w in &scene.windows {
        paint_window(painter, vp, &scene.room, w);
    }

    // 7. Traffic paths.
    if overlays.show_traffic_flow {
        let paths = roomcraft_engine::scene::traffic::compute_traffic_paths(
            &scene.furniture,
            &scene.doors,
            &scene.room,
        );
        for path in &paths {
            paint_traffic_path(painter, vp, &path.points);
        }
    }

    // 8. Clearance zones.
    if overlays.show_clearances {
        let zones = roomcraft_engine::scene::clearance::compute_clearances(&scene.furniture);
        for zone in &zones {
            paint_clearance_zone(painter, vp, &zone.corners);
        }
    }

    // 9. Furniture.
    let dragging_collision = matches!(
        overlays.mode,
        InteractionMode::DragSingle { collision: true, .. }
    );
    for f in &scene.furniture {
        let selected = overlays.selection.contains(&f.id);
        paint_furniture(painter, vp, f, selected);
        if selected && dragging_collision {
            painter.rect_stroke(
                EguiRect::from_center_size(
                    vp.to_screen(f.center()),
                    egui::vec2(
                        (f.w * vp.px_per_ft * vp.zoom) as f32,
                        (f.h * vp.px_per_ft * vp.zoom) as f32,
                    ),
                ),
                2.0,
                Stroke::new(2.0, Color32::from_rgb(220, 40, 40)),
            );
        }
    }

    // 10-11. Selection overlay(s).
    if overlays.selection.len() == 1 {
        if let Some(f) = scene.find_furniture(&overlays.selection[0]) {
            paint_single_selection(painter, vp, f);
        }
    } else if overlays.selection.len() > 1 {
        if let Some(bounds) = hit_test::selection_bounds(scene, overlays.selection) {
            for id in overlays.selection {
                if let Some(f) = scene.find_furniture(id) {
                    paint_dashed_rect(painter, vp, f.rect(), Color32::from_rgb(90, 140, 255));
                }
            }
            paint_dashed_rect(painter, vp, bounds, Color32::from_rgb(40, 90, 220));
        }
    }

    // 12. Rubber-band rectangle.
    if let InteractionMode::RubberBand { start, current } = overlays.mode {
        let rect = roomcraft_engine::geometry::Rect::new(
            Pt::new(start.x.min(current.x), start.y.min(current.y)),
            Pt::new(start.x.max(current.x), start.y.max(current.y)),
        );
        paint_dashed_rect(painter, vp, rect, Color32::from_rgba_unmultiplied(60, 120, 255, 160));
    }

    // 13. Vertex handles.
    for v in &scene.room.vertices {
        let p = vp.to_screen(v.as_pt());
        painter.circle_filled(p, vp.constant_px(4.0), Color32::from_rgb(255, 200, 0));
    }

    // 14. Snap guides: thin dashed lines spanning the room bounds along
    // whichever axis the active drag is currently aligned to.
    if let InteractionMode::DragSingle { guides, .. } = overlays.mode {
        if let Some(bounds) = roomcraft_engine::geometry::polygon_bounds(&scene.room.points()) {
            for guide in guides {
                paint_guide(painter, vp, *guide, bounds);
            }
        }
    }

    // 15. Dimension labels.
    if overlays.show_dimensions {
        paint_dimensions(painter, vp, &scene.room);
    }

    // 16. Active measurement ruler.
    if let InteractionMode::Measure { start, end } = overlays.mode {
        paint_measurement(painter, vp, *start, *end);
    }
}

fn paint_grid(painter: &Painter, vp: &Viewport, room: &Room) {
    let Some(bounds) = roomcraft_engine::geometry::polygon_bounds(&room.points()) else {
        return;
    };
    let minor = vp.zoom > 1.0;
    let step = if minor { 0.5 } else { 1.0 };
    let stroke = Stroke::new(vp.constant_px(1.0), Color32::from_gray(220));

    let mut x = (bounds.min.x / step).floor() * step;
    while x <= bounds.max.x {
        painter.line_segment(
            [vp.to_screen(Pt::new(x, bounds.min.y)), vp.to_screen(Pt::new(x, bounds.max.y))],
            stroke,
        );
        x += step;
    }
    let mut y = (bounds.min.y / step).floor() * step;
    while y <= bounds.max.y {
        painter.line_segment(
            [vp.to_screen(Pt::new(bounds.min.x, y)), vp.to_screen(Pt::new(bounds.max.x, y))],
            stroke,
        );
        y += step;
    }
}

fn room_polygon_screen(vp: &Viewport, room: &Room) -> Vec<Pos2> {
    room.points().iter().map(|p| vp.to_screen(*p)).collect()
}

fn paint_room_fill(painter: &Painter, vp: &Viewport, room: &Room) {
    let points = room_polygon_screen(vp, room);
    painter.add(egui::Shape::convex_polygon(
        points,
        Color32::from_rgb(245, 240, 230),
        Stroke::NONE,
    ));
}

fn paint_walls(painter: &Painter, vp: &Viewport, room: &Room) {
    let points = room_polygon_screen(vp, room);
    // Width compensated for zoom so walls stay visually consistent:
    // width ∝ sqrt(1/zoom), clamped to a sane screen-pixel range.
    let outer_w = (6.0 / vp.zoom.sqrt() as f32).clamp(2.0, 10.0);
    let inner_w = (outer_w * 0.5).max(1.0);
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        painter.line_segment([a, b], Stroke::new(outer_w, Color32::from_gray(60)));
        painter.line_segment([a, b], Stroke::new(inner_w, Color32::from_gray(235)));
    }
}

fn paint_door(painter: &Painter, vp: &Viewport, room: &Room, door: &Door) {
    let segments = room.segments();
    let Some(seg) = segments.iter().find(|s| s.id == door.wall_id) else {
        return;
    };
    let p = roomcraft_engine::geometry::point_at(seg, door.position);
    let screen = vp.to_screen(p);
    painter.circle_stroke(screen, vp.constant_px(6.0), Stroke::new(2.0, Color32::from_rgb(120, 80, 40)));
    // Swing arc approximated as a short dashed stroke; a full dashed-arc
    // primitive isn't in egui's painter, so we draw a chord.
    let swing_len = door.width as f32 * vp.px_per_ft as f32 * vp.zoom as f32;
    painter.line_segment(
        [screen, Pos2::new(screen.x + swing_len * 0.3, screen.y - swing_len * 0.3)],
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 80, 40, 160)),
    );
}

fn paint_window(painter: &Painter, vp: &Viewport, room: &Room, window: &Window) {
    let segments = room.segments();
    let Some(seg) = segments.iter().find(|s| s.id == window.wall_id) else {
        return;
    };
    let p = roomcraft_engine::geometry::point_at(seg, window.position);
    let screen = vp.to_screen(p);
    painter.rect_filled(
        EguiRect::from_center_size(screen, egui::vec2(vp.constant_px(14.0), vp.constant_px(4.0))),
        0.0,
        Color32::from_rgb(150, 200, 230),
    );
}

fn paint_furniture(painter: &Painter, vp: &Viewport, f: &Furniture, selected: bool) {
    let center = vp.to_screen(f.center());
    let color: Color32 = parse_hex_color(&f.color);
    let size = egui::vec2(
        (f.w * vp.px_per_ft * vp.zoom) as f32,
        (f.h * vp.px_per_ft * vp.zoom) as f32,
    );
    let rect = EguiRect::from_center_size(center, size);

    match f.shape {
        Shape::Rect | Shape::Bed | Shape::L => {
            painter.rect_filled(rect, 2.0, color);
        }
        Shape::Round | Shape::Oval => {
            painter.circle_filled(center, size.x.max(size.y) / 2.0, color);
        }
    }

    if selected {
        painter.rect_stroke(rect, 2.0, Stroke::new(2.0, Color32::from_rgb(40, 120, 255)));
    }
}

fn parse_hex_color(hex: &str) -> Color32 {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color32::GRAY;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(128);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(128);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(128);
    Color32::from_rgb(r, g, b)
}

fn paint_single_selection(painter: &Painter, vp: &Viewport, f: &Furniture) {
    paint_dashed_rect(painter, vp, f.rect(), Color32::from_rgb(40, 120, 255));
    for handle in hit_test::resize_handle_positions(f.rect()) {
        let p = vp.to_screen(handle);
        painter.rect_filled(
            EguiRect::from_center_size(p, egui::vec2(vp.constant_px(8.0), vp.constant_px(8.0))),
            0.0,
            Color32::WHITE,
        );
        painter.rect_stroke(
            EguiRect::from_center_size(p, egui::vec2(vp.constant_px(8.0), vp.constant_px(8.0))),
            0.0,
            Stroke::new(1.0, Color32::from_rgb(40, 120, 255)),
        );
    }
    let rotation_handle = hit_test::rotation_handle_position(f.rect(), 0.6);
    let p = vp.to_screen(rotation_handle);
    painter.circle_filled(p, vp.constant_px(5.0), Color32::from_rgb(40, 120, 255));
}

fn paint_dashed_rect(painter: &Painter, vp: &Viewport, rect: roomcraft_engine::geometry::Rect, color: Color32) {
    let corners = [
        Pt::new(rect.min.x, rect.min.y),
        Pt::new(rect.max.x, rect.min.y),
        Pt::new(rect.max.x, rect.max.y),
        Pt::new(rect.min.x, rect.max.y),
    ];
    let screen: Vec<Pos2> = corners.iter().map(|p| vp.to_screen(*p)).collect();
    let stroke = Stroke::new(1.5, color);
    for i in 0..4 {
        draw_dashed_segment(painter, screen[i], screen[(i + 1) % 4], stroke);
    }
}

fn draw_dashed_segment(painter: &Painter, a: Pos2, b: Pos2, stroke: Stroke) {
    let dash_len = 6.0;
    let gap_len = 4.0;
    let total = a.distance(b);
    let dir = (b - a) / total.max(1.0);
    let mut t = 0.0;
    while t < total {
        let seg_end = (t + dash_len).min(total);
        painter.line_segment([a + dir * t, a + dir * seg_end], stroke);
        t += dash_len + gap_len;
    }
}

fn paint_guide(painter: &Painter, vp: &Viewport, guide: Guide, room_bounds: roomcraft_engine::geometry::Rect) {
    let stroke = Stroke::new(1.0, Color32::from_rgb(255, 80, 200));
    let (a, b) = match guide.axis {
        GuideAxis::Vertical => (
            Pt::new(guide.at, room_bounds.min.y),
            Pt::new(guide.at, room_bounds.max.y),
        ),
        GuideAxis::Horizontal => (
            Pt::new(room_bounds.min.x, guide.at),
            Pt::new(room_bounds.max.x, guide.at),
        ),
    };
    draw_dashed_segment(painter, vp.to_screen(a), vp.to_screen(b), stroke);
}

fn paint_traffic_path(painter: &Painter, vp: &Viewport, points: &[Pt]) {
    let screen: Vec<Pos2> = points.iter().map(|p| vp.to_screen(*p)).collect();
    for pair in screen.windows(2) {
        draw_dashed_segment(
            painter,
            pair[0],
            pair[1],
            Stroke::new(1.5, Color32::from_rgb(120, 170, 255)),
        );
    }
}

fn paint_clearance_zone(painter: &Painter, vp: &Viewport, corners: &[Pt; 4]) {
    let screen: Vec<Pos2> = corners.iter().map(|p| vp.to_screen(*p)).collect();
    painter.add(egui::Shape::convex_polygon(
        screen.clone(),
        Color32::from_rgba_unmultiplied(255, 200, 0, 40),
        Stroke::NONE,
    ));
    let stroke = Stroke::new(1.0, Color32::from_rgb(220, 170, 0));
    for i in 0..4 {
        draw_dashed_segment(painter, screen[i], screen[(i + 1) % 4], stroke);
    }
}

fn paint_dimensions(painter: &Painter, vp: &Viewport, room: &Room) {
    let Some(bounds) = roomcraft_engine::geometry::polygon_bounds(&room.points()) else {
        return;
    };
    let width_label = format!("{:.1} ft", bounds.width());
    let height_label = format!("{:.1} ft", bounds.height());
    let top_mid = vp.to_screen(Pt::new((bounds.min.x + bounds.max.x) / 2.0, bounds.min.y));
    let left_mid = vp.to_screen(Pt::new(bounds.min.x, (bounds.min.y + bounds.max.y) / 2.0));
    painter.text(
        top_mid,
        egui::Align2::CENTER_BOTTOM,
        width_label,
        egui::FontId::proportional(12.0),
        Color32::DARK_GRAY,
    );
    painter.text(
        left_mid,
        egui::Align2::RIGHT_CENTER,
        height_label,
        egui::FontId::proportional(12.0),
        Color32::DARK_GRAY,
    );
}

fn paint_measurement(painter: &Painter, vp: &Viewport, start: Pt, end: Pt) {
    let a = vp.to_screen(start);
    let b = vp.to_screen(end);
    painter.line_segment([a, b], Stroke::new(1.5, Color32::from_rgb(220, 40, 40)));
    let dist = (end - start).length();
    painter.text(
        Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0 - 10.0),
        egui::Align2::CENTER_BOTTOM,
        format!("{dist:.2} ft"),
        egui::FontId::proportional(12.0),
        Color32::from_rgb(220, 40, 40),
    );
}
