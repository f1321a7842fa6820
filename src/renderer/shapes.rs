//! Shape generation for 2D primitives
//!
//! Everything here works in field coordinates (origin top-left, y down).
//! The pipeline maps to NDC afterwards.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::scene::{DrawCmd, Scene, SpriteKind};
use crate::sim::{AsteroidVariant, Rect};

/// Width of scene lines (pixels)
const LINE_WIDTH: f32 = 2.0;

fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners;
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(d.x, d.y, color));
    out.push(Vertex::new(a.x, a.y, color));
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_rect(&mut vertices, r, color);
    vertices
}

fn push_rect(out: &mut Vec<Vertex>, r: &Rect, color: [f32; 4]) {
    quad(
        out,
        [
            Vec2::new(r.x(), r.y()),
            Vec2::new(r.right(), r.y()),
            Vec2::new(r.right(), r.bottom()),
            Vec2::new(r.x(), r.bottom()),
        ],
        color,
    );
}

/// Generate vertices for a thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        [from + perp, to + perp, to - perp, from - perp],
        color,
    );
    vertices
}

/// Generate vertices for a filled polygon whose corner `i` sits at
/// `radius * profile(i)` from the center, rotated clockwise by `angle`
/// radians
pub fn polygon(
    center: Vec2,
    radius: f32,
    sides: u32,
    angle: f32,
    color: [f32; 4],
    profile: impl Fn(u32) -> f32,
) -> Vec<Vertex> {
    let sides = sides.max(3);
    let corner = |i: u32| {
        let theta = angle + (i % sides) as f32 / sides as f32 * 2.0 * PI;
        center + Vec2::new(theta.cos(), theta.sin()) * radius * profile(i % sides)
    };

    let mut vertices = Vec::with_capacity((sides * 3) as usize);
    for i in 0..sides {
        let a = corner(i);
        let b = corner(i + 1);
        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Lumpy outline for an asteroid: corner count and radius profile depend on
/// the variant
pub fn asteroid(
    r: &Rect,
    variant: AsteroidVariant,
    angle_deg: f32,
    flip: bool,
    alpha: f32,
) -> Vec<Vertex> {
    let v = variant.index() as u32;
    let sides = 7 + v % 4;
    // Mirroring on both axes is a half turn
    let angle = angle_deg.to_radians() + if flip { PI } else { 0.0 };
    let color = with_alpha(colors::asteroid(variant), alpha);

    polygon(r.center(), r.size.x / 2.0, sides, angle, color, |i| {
        0.8 + 0.2 * ((i * 7 + v * 3) % 5) as f32 / 4.0
    })
}

/// Player ship: hull triangle, cockpit and engine glow
pub fn ship(r: &Rect, alpha: f32) -> Vec<Vertex> {
    let hull = with_alpha(colors::SHIP_HULL, alpha);
    let w = r.size.x;
    let h = r.size.y;

    let mut vertices = Vec::with_capacity(15);
    let nose = Vec2::new(r.x() + w / 2.0, r.y());
    vertices.push(Vertex::new(nose.x, nose.y, hull));
    vertices.push(Vertex::new(r.right(), r.bottom() - h * 0.15, hull));
    vertices.push(Vertex::new(r.x(), r.bottom() - h * 0.15, hull));

    let cockpit = Rect::new(r.x() + w * 0.42, r.y() + h * 0.35, w * 0.16, h * 0.2);
    push_rect(&mut vertices, &cockpit, with_alpha(colors::SHIP_COCKPIT, alpha));

    let engine = Rect::new(r.x() + w * 0.35, r.bottom() - h * 0.15, w * 0.3, h * 0.15);
    push_rect(&mut vertices, &engine, with_alpha(colors::SHIP_ENGINE, alpha));
    vertices
}

/// Supply crate with a cross strap
pub fn package(r: &Rect, alpha: f32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(18);
    push_rect(&mut vertices, r, with_alpha(colors::PACKAGE, alpha));

    let strap = with_alpha(colors::PACKAGE_STRAP, alpha);
    let t = r.size.x * 0.12;
    let c = r.center();
    push_rect(&mut vertices, &Rect::new(c.x - t / 2.0, r.y(), t, r.size.y), strap);
    push_rect(&mut vertices, &Rect::new(r.x(), c.y - t / 2.0, r.size.x, t), strap);
    vertices
}

/// Tessellate a whole scene. Text is drawn by the DOM overlay, not here.
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for cmd in &scene.commands {
        match cmd {
            DrawCmd::Clear(color) => {
                push_rect(
                    &mut vertices,
                    &Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT),
                    *color,
                );
            }
            DrawCmd::FillRect { rect: r, color } => push_rect(&mut vertices, r, *color),
            DrawCmd::Sprite {
                kind,
                rect: r,
                angle_deg,
                flip,
                alpha,
            } => match kind {
                SpriteKind::Player => vertices.extend(ship(r, *alpha)),
                SpriteKind::Asteroid(variant) => {
                    vertices.extend(asteroid(r, *variant, *angle_deg, *flip, *alpha))
                }
                SpriteKind::Bullet => {
                    push_rect(&mut vertices, r, with_alpha(colors::BULLET, *alpha))
                }
                SpriteKind::Package => vertices.extend(package(r, *alpha)),
            },
            DrawCmd::Line { from, to, color } => {
                vertices.extend(line(*from, *to, LINE_WIDTH, *color))
            }
            DrawCmd::Text { .. } => {}
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::TextRole;

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(&Rect::new(10.0, 20.0, 30.0, 40.0), [1.0; 4]);
        assert_eq!(verts.len(), 6);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_line_has_requested_width() {
        let verts = line(Vec2::new(0.0, 400.0), Vec2::new(800.0, 400.0), 2.0, [1.0; 4]);
        assert_eq!(verts.len(), 6);
        for v in &verts {
            assert!((v.position[1] - 400.0).abs() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_asteroid_stays_within_its_rect() {
        let r = Rect::square(100.0, 100.0, 80.0);
        for variant in AsteroidVariant::ALL {
            let verts = asteroid(&r, variant, 37.0, true, 1.0);
            assert_eq!(verts.len() % 3, 0);
            let c = r.center();
            for v in &verts {
                let d = Vec2::from(v.position).distance(c);
                assert!(d <= 40.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_alpha_scales_sprite_color() {
        let r = Rect::square(0.0, 0.0, 50.0);
        let verts = asteroid(&r, AsteroidVariant::Icy, 0.0, false, 0.5);
        assert!(verts.iter().all(|v| (v.color[3] - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_scene_skips_text() {
        let scene = Scene {
            commands: vec![
                DrawCmd::Clear([0.0; 4]),
                DrawCmd::Text {
                    role: TextRole::Status,
                    text: "Time: 0".into(),
                    color: [1.0; 4],
                    selected: false,
                    highlighted: false,
                },
            ],
        };
        assert_eq!(scene_vertices(&scene).len(), 6);
    }
}
