//! Drawing module - renders a composed `DialScene` with nannou's Draw API
//!
//! The scene lives in y-down screen space; nannou's world has its origin at the
//! window centre with y pointing up, so every point goes through `ScreenSpace`.

use nannou::prelude::*;
use shared::Rgb;

use crate::dial::{DialLayout, DialScene, STROKE_WIDTH};
use crate::geometry::DialPoint;

const ARC_SEGMENTS: usize = 96;
const RING_SEGMENTS: usize = 180;

/// Colours that sit outside the configurable palette
pub mod colors {
    use nannou::prelude::*;

    pub const ERROR_BACKGROUND: Srgb<u8> = Srgb {
        red: 80,
        green: 20,
        blue: 20,
        standard: std::marker::PhantomData,
    };
    pub const TEXT_PRIMARY: Srgb<u8> = Srgb {
        red: 240,
        green: 240,
        blue: 240,
        standard: std::marker::PhantomData,
    };
}

/// Converts between window screen pixels (y down) and nannou world points (y up)
#[derive(Debug, Clone, Copy)]
pub struct ScreenSpace {
    window_rect: Rect,
}

impl ScreenSpace {
    pub fn new(window_rect: Rect) -> Self {
        Self { window_rect }
    }

    pub fn to_world(&self, screen: DialPoint) -> Point2 {
        pt2(
            self.window_rect.left() + screen.x as f32,
            self.window_rect.top() - screen.y as f32,
        )
    }

    pub fn to_screen(&self, world: Point2) -> DialPoint {
        DialPoint::new(
            (world.x - self.window_rect.left()) as f64,
            (self.window_rect.top() - world.y) as f64,
        )
    }
}

pub fn color(rgb: Rgb) -> Srgb<u8> {
    srgb(rgb.red, rgb.green, rgb.blue)
}

/// Draw the dial: outline, sun bands, pips, hand and top marker
pub fn draw_dial(draw: &Draw, scene: &DialScene, layout: &DialLayout, space: &ScreenSpace) {
    let world = |local: DialPoint| space.to_world(layout.to_screen(local));

    draw_ring(
        draw,
        world(scene.center),
        scene.radius as f32,
        STROKE_WIDTH as f32,
        color(scene.outline_color),
    );

    for band in &scene.bands {
        let points: Vec<Point2> = band
            .arc
            .flatten(ARC_SEGMENTS)
            .into_iter()
            .map(world)
            .collect();
        draw.polyline()
            .weight(STROKE_WIDTH as f32)
            .color(color(band.color))
            .points(points);
    }

    for pip in &scene.pips {
        draw.line()
            .start(world(pip.outer))
            .end(world(pip.inner))
            .color(color(pip.color))
            .weight(if pip.highlighted { 3.0 } else { 2.0 });
    }

    if let Some(now_pip) = scene.pips.get(scene.highlighted_pip) {
        draw.ellipse()
            .xy(world(now_pip.outer))
            .radius(2.5)
            .color(color(now_pip.color));
    }

    draw.line()
        .start(world(scene.hand.from))
        .end(world(scene.hand.to))
        .color(color(scene.hand.color))
        .weight(2.0);

    draw.ellipse()
        .xy(world(scene.center))
        .radius(3.0)
        .color(color(scene.hand.color));

    draw.ellipse()
        .xy(world(scene.top_marker))
        .radius(4.0)
        .color(color(scene.outline_color));
}

/// Draw a ring (circle outline) using line segments
fn draw_ring(draw: &Draw, center: Point2, radius: f32, weight: f32, color: Srgb<u8>) {
    let points: Vec<Point2> = (0..=RING_SEGMENTS)
        .map(|i| {
            let angle = (i as f32 / RING_SEGMENTS as f32) * TAU;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect();

    draw.polyline().weight(weight).color(color).points(points);
}

/// Draw the error banner along the top of the dial area
pub fn draw_error_banner(draw: &Draw, message: &str, rect: Rect) {
    let banner_height = 40.0;
    let banner_rect = Rect::from_x_y_w_h(
        rect.x(),
        rect.top() - banner_height / 2.0,
        rect.w(),
        banner_height,
    );

    draw.rect()
        .xy(banner_rect.xy())
        .wh(banner_rect.wh())
        .color(colors::ERROR_BACKGROUND);

    draw.text(message)
        .xy(banner_rect.xy())
        .color(colors::TEXT_PRIMARY)
        .font_size(14)
        .w(banner_rect.w() - 20.0);
}
