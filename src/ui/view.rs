use crate::scene::palette::PALETTE;
use crate::scene::population::Population;
use egui::epaint::TextShape;
use egui::{Color32, FontId, Painter};

/// Paint the whole population: black clear, then every curve's glyph
/// chain. One galley per curve, re-used for each rotated placement.
pub fn paint_scene(painter: &Painter, population: &Population, glyph_size: f32) {
    painter.rect_filled(painter.clip_rect(), egui::CornerRadius::ZERO, Color32::BLACK);

    for curve in population.curves() {
        let (r, g, b) = PALETTE[curve.color];
        let color = Color32::from_rgb(r, g, b);
        let galley = painter.layout_no_wrap(
            curve.glyph.to_string(),
            FontId::monospace(glyph_size),
            color,
        );
        let half = galley.size() / 2.0;

        for placement in curve.glyph_placements() {
            let (sin, cos) = placement.angle.sin_cos();
            // Rotate the half-size offset so the glyph is centered on
            // its chain point after TextShape rotates about `pos`.
            let offset = egui::vec2(-half.x * cos + half.y * sin, -half.x * sin - half.y * cos);
            let pos = egui::pos2(placement.pos.x, placement.pos.y) + offset;
            painter.add(TextShape::new(pos, galley.clone(), color).with_angle(placement.angle));
        }
    }
}
