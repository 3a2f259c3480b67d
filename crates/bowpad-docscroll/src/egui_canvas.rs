//! [`OverviewCanvas`] on top of an `egui::Painter`.
use anyhow::ensure;
use bowpad_config::Rgb;
use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2};

use crate::canvas::{OverviewCanvas, PixelPoint, PixelRect, ThumbStroke};

/// Paints into an egui layer. Pixel coordinates are offset by `origin`
/// and divided by `pixels_per_point`.
pub struct EguiCanvas<'a> {
    painter: &'a Painter,
    origin: Pos2,
    pixels_per_point: f32,
}

impl<'a> EguiCanvas<'a> {
    /// Wraps `painter`; rects are given relative to `origin`.
    pub fn new(painter: &'a Painter, origin: Pos2) -> Self {
        let pixels_per_point = painter.pixels_per_point();
        Self {
            painter,
            origin,
            pixels_per_point,
        }
    }

    fn pos(&self, x: i32, y: i32) -> Pos2 {
        self.origin + Vec2::new(x as f32, y as f32) / self.pixels_per_point
    }

    fn rect(&self, r: PixelRect) -> Rect {
        Rect::from_min_max(self.pos(r.left, r.top), self.pos(r.right, r.bottom))
    }

    fn check_visible(&self) -> anyhow::Result<()> {
        ensure!(self.painter.is_visible(), "overview painter is not visible");
        Ok(())
    }
}

fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

impl OverviewCanvas for EguiCanvas<'_> {
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) -> anyhow::Result<()> {
        self.check_visible()?;
        self.painter.rect_filled(self.rect(rect), 0.0, to_color32(color));
        Ok(())
    }

    fn fill_triangle(&mut self, points: [PixelPoint; 3], color: Rgb) -> anyhow::Result<()> {
        self.check_visible()?;
        let points = points.iter().map(|p| self.pos(p.x, p.y)).collect();
        self.painter
            .add(Shape::convex_polygon(points, to_color32(color), Stroke::NONE));
        Ok(())
    }

    fn draw_thumb(&mut self, rect: PixelRect, color: Rgb, stroke: ThumbStroke) -> anyhow::Result<()> {
        self.check_visible()?;
        let rect = self.rect(rect);
        let radius = stroke.corner_radius / self.pixels_per_point;
        let fill = Color32::from_rgba_unmultiplied(color.r, color.g, color.b, stroke.fill_alpha);
        self.painter.rect_filled(rect, radius, fill);
        self.painter.rect_stroke(
            rect,
            radius,
            Stroke::new(stroke.outline_width / self.pixels_per_point, to_color32(color)),
            StrokeKind::Inside,
        );
        Ok(())
    }
}
