//! Constellation lines between dust motes and the pointer.

use glam::Vec2;
use nightsky_platform::Surface;

use crate::config::LinkConfig;
use crate::with_alpha;

/// Linear falloff: 1 at the pointer, 0 at (and beyond) the threshold.
pub fn link_opacity(distance: f32, threshold: f32) -> f32 {
    if distance >= threshold {
        0.0
    } else {
        (1.0 - distance / threshold).clamp(0.0, 1.0)
    }
}

/// Draws a line from every point closer than the threshold to the pointer.
/// Returns the number of lines drawn.
pub fn draw_links(
    points: impl IntoIterator<Item = Vec2>,
    pointer: Option<Vec2>,
    config: &LinkConfig,
    surface: &mut dyn Surface,
) -> usize {
    let Some(pointer) = pointer else {
        return 0;
    };
    let mut drawn = 0;
    for point in points {
        let opacity = link_opacity(point.distance(pointer), config.threshold);
        if opacity <= 0.0 {
            continue;
        }
        surface.stroke_line(point, pointer, config.width, with_alpha(config.color, opacity));
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightsky_platform::{DrawCommand, RecordingSurface};

    #[test]
    fn opacity_endpoints() {
        assert_eq!(link_opacity(0.0, 120.0), 1.0);
        assert_eq!(link_opacity(120.0, 120.0), 0.0);
        assert_eq!(link_opacity(500.0, 120.0), 0.0);
        assert!((link_opacity(60.0, 120.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn opacity_decreases_with_distance() {
        let mut previous = f32::INFINITY;
        for step in 0..=240 {
            let opacity = link_opacity(step as f32 * 0.5, 120.0);
            assert!(opacity <= previous);
            previous = opacity;
        }
    }

    #[test]
    fn links_only_nearby_points() {
        let config = LinkConfig::default();
        let pointer = Vec2::new(100.0, 100.0);
        let points = [
            Vec2::new(100.0, 130.0),
            Vec2::new(400.0, 400.0),
            Vec2::new(220.0, 100.0),
            Vec2::new(40.0, 100.0),
        ];
        let mut surface = RecordingSurface::new();
        let drawn = draw_links(points, Some(pointer), &config, &mut surface);
        assert_eq!(drawn, 2);
        assert_eq!(surface.lines(), 2);
        match &surface.commands[0] {
            DrawCommand::Line { from, to, color, .. } => {
                assert_eq!(*from, points[0]);
                assert_eq!(*to, pointer);
                assert!((color.w - 0.75).abs() < 1e-6);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn no_pointer_no_links() {
        let mut surface = RecordingSurface::new();
        let drawn = draw_links([Vec2::ZERO], None, &LinkConfig::default(), &mut surface);
        assert_eq!(drawn, 0);
        assert!(surface.commands.is_empty());
    }
}
