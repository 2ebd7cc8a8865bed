use egui::{Color32, Painter, Pos2, Rect, Stroke};
use glam::{Vec2, Vec4};
use nightsky_platform::{Surface, ViewportSize};

/// egui has no gradient strokes; streaks are split into this many segments.
const GRADIENT_SEGMENTS: usize = 12;

/// [`Surface`] backed by an egui painter on the background layer.
pub struct EguiSurface {
    painter: Painter,
    origin: Pos2,
    background: Color32,
}

impl EguiSurface {
    pub fn new(painter: Painter, origin: Pos2, background: Vec4) -> Self {
        Self {
            painter,
            origin,
            background: to_color32(background),
        }
    }

    fn to_pos(&self, point: Vec2) -> Pos2 {
        Pos2::new(self.origin.x + point.x, self.origin.y + point.y)
    }
}

pub(crate) fn to_color32(color: Vec4) -> Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(
        channel(color.x),
        channel(color.y),
        channel(color.z),
        channel(color.w),
    )
}

impl Surface for EguiSurface {
    fn clear(&mut self, size: ViewportSize) {
        let rect = Rect::from_min_size(self.origin, egui::vec2(size.width, size.height));
        self.painter.rect_filled(rect, 0.0, self.background);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.painter
            .circle_filled(self.to_pos(center), radius, to_color32(color));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        self.painter.line_segment(
            [self.to_pos(from), self.to_pos(to)],
            Stroke::new(width, to_color32(color)),
        );
    }

    fn stroke_gradient_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        from_color: Vec4,
        to_color: Vec4,
    ) {
        for i in 0..GRADIENT_SEGMENTS {
            let t0 = i as f32 / GRADIENT_SEGMENTS as f32;
            let t1 = (i + 1) as f32 / GRADIENT_SEGMENTS as f32;
            let color = from_color.lerp(to_color, (t0 + t1) * 0.5);
            self.painter.line_segment(
                [self.to_pos(from.lerp(to, t0)), self.to_pos(from.lerp(to, t1))],
                Stroke::new(width, to_color32(color)),
            );
        }
        // round cap on the bright end
        self.painter
            .circle_filled(self.to_pos(from), width * 0.5, to_color32(from_color));
    }
}
