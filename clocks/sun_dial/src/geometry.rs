//! Geometry module - polar/cartesian conversion and arc path descriptors
//!
//! Everything here works in screen space: x grows to the right, y grows downward,
//! angle 0° points straight up and angles grow clockwise.

use std::f64::consts::PI;
use std::fmt;

/// SVG sweep flag for every band. The path runs from the end angle back to the
/// start angle counter-clockwise, which traces start → end clockwise.
pub const SWEEP_FLAG: bool = false;

/// A point in dial-local or window screen space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DialPoint {
    pub x: f64,
    pub y: f64,
}

impl DialPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: DialPoint) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    pub fn distance(self, other: DialPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Point on the circle at `angle_deg`, measured clockwise from 12 o'clock
pub fn polar_to_cartesian(center: DialPoint, radius: f64, angle_deg: f64) -> DialPoint {
    let angle_rad = (angle_deg - 90.0) * PI / 180.0;
    DialPoint::new(
        center.x + radius * angle_rad.cos(),
        center.y + radius * angle_rad.sin(),
    )
}

/// Angle in [0, 360) of `point` around `center`, the inverse of [`polar_to_cartesian`].
///
/// Screen y grows downward, so the vertical delta is taken upward before
/// `atan2(x, y)`. A pointer sitting exactly on the centre reads as 0°.
pub fn angle_from_screen_point(point: DialPoint, center: DialPoint) -> f64 {
    let dx = point.x - center.x;
    let dy_up = center.y - point.y;
    if dx == 0.0 && dy_up == 0.0 {
        return 0.0;
    }

    let degrees = dx.atan2(dy_up).to_degrees();
    if degrees.is_nan() {
        0.0
    } else if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

/// Circular arc descriptor, consumable as an SVG path or as a polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    pub center: DialPoint,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Where the path begins: the point at `end_angle`
    pub from: DialPoint,
    /// Where the path finishes: the point at `start_angle`
    pub to: DialPoint,
    pub large_arc: bool,
    pub sweep: bool,
}

/// Describe the clockwise arc from `start_angle` to `end_angle`
///
/// Callers pass `start_angle <= end_angle`, adding 360 to an end past midnight;
/// `large_arc` is taken from the raw difference.
pub fn describe_arc(center: DialPoint, radius: f64, start_angle: f64, end_angle: f64) -> ArcPath {
    ArcPath {
        center,
        radius,
        start_angle,
        end_angle,
        from: polar_to_cartesian(center, radius, end_angle),
        to: polar_to_cartesian(center, radius, start_angle),
        large_arc: end_angle - start_angle > 180.0,
        sweep: SWEEP_FLAG,
    }
}

impl ArcPath {
    /// Clockwise angular span, reduced into [0, 360)
    pub fn span(&self) -> f64 {
        (self.end_angle - self.start_angle).rem_euclid(360.0)
    }

    /// Sample `segments + 1` points clockwise from the start angle to the end angle
    pub fn flatten(&self, segments: usize) -> Vec<DialPoint> {
        let segments = segments.max(1);
        let span = self.span();
        (0..=segments)
            .map(|i| {
                let angle = self.start_angle + span * i as f64 / segments as f64;
                polar_to_cartesian(self.center, self.radius, angle)
            })
            .collect()
    }
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {:.3} {:.3} A {:.3} {:.3} 0 {} {} {:.3} {:.3}",
            self.from.x,
            self.from.y,
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            u8::from(self.sweep),
            self.to.x,
            self.to.y
        )
    }
}
