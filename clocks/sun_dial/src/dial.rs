//! Dial module - pips, layout measurement and the composed scene
//!
//! `DialScene` is the whole visual tree as plain data in dial-local screen
//! space. The drawing module only maps it onto nannou.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use shared::{angle_for_time, time_for_angle, Palette, Rgb, SunTimings, TimeSpan};

use crate::geometry::{describe_arc, polar_to_cartesian, ArcPath, DialPoint};
use crate::gesture::RotationState;

/// Ten minute pips around the 24h face
pub const PIP_COUNT: usize = 24 * 6;
/// Space left around the dial inside its viewport
pub const DIAL_MARGIN: f64 = 64.0;
pub const STROKE_WIDTH: f64 = 2.0;

// Distances from the top edge of the dial, as in a y-down viewBox
const PIP_OUTER_INSET: f64 = 6.0;
const PIP_INNER_INSET: f64 = 10.0;
const HAND_INSET: f64 = 16.0;

/// Widest band drawn; a full turn would start and end on the same point
const FULL_BAND_SPAN: f64 = 359.9;

/// Angle of pip `index`, with pip 0 at midnight (bottom)
pub fn pip_angle(index: usize) -> f64 {
    (360.0 / PIP_COUNT as f64) * index as f64 - 180.0
}

pub fn pip_angles() -> Vec<f64> {
    (0..PIP_COUNT).map(pip_angle).collect()
}

/// Distance between two angles going the short way round
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Index of the pip nearest `angle`; the lowest index wins a tie
pub fn closest_pip(angle: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for index in 0..PIP_COUNT {
        let distance = angular_distance(pip_angle(index), angle);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

/// Dial size and placement for one layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialLayout {
    /// Pixel diameter of the dial viewport
    pub size: f64,
    /// Centre in dial-local coordinates
    pub center: DialPoint,
    pub radius: f64,
    /// Top-left corner of the dial in window screen coordinates
    pub screen_origin: DialPoint,
}

impl DialLayout {
    /// Fit a square dial into the area at `area_origin`, centred
    pub fn measure(area_origin: DialPoint, area_width: f64, area_height: f64) -> Self {
        let size = (area_width.min(area_height) - DIAL_MARGIN).max(0.0);
        let screen_origin = DialPoint::new(
            area_origin.x + (area_width - size) / 2.0,
            area_origin.y + (area_height - size) / 2.0,
        );
        Self {
            size,
            center: DialPoint::new(size / 2.0, size / 2.0),
            radius: ((size - STROKE_WIDTH) / 2.0).max(0.0),
            screen_origin,
        }
    }

    pub fn screen_center(&self) -> DialPoint {
        self.screen_origin.offset(self.center)
    }

    pub fn to_screen(&self, local: DialPoint) -> DialPoint {
        self.screen_origin.offset(local)
    }

    /// Whether a screen point falls on the dial face
    pub fn contains(&self, screen: DialPoint) -> bool {
        screen.distance(self.screen_center()) <= self.size / 2.0
    }

    /// Radius `inset` pixels in from the top of the viewport
    fn inset_radius(&self, inset: f64) -> f64 {
        (self.center.y - inset).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    Twilight,
    GoldenHour,
    Daylight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub kind: BandKind,
    pub arc: ArcPath,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pip {
    pub inner: DialPoint,
    pub outer: DialPoint,
    pub highlighted: bool,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: DialPoint,
    pub to: DialPoint,
    pub color: Rgb,
}

/// Numbers behind the dial's current orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationReadout {
    /// Unbounded rotation, as stored
    pub rotation: f64,
    /// What the transform uses, in [0, 360)
    pub visual: f64,
    /// Wall-clock time under the top marker
    pub time_at_top: NaiveTime,
}

impl RotationReadout {
    pub fn of(rotation: &RotationState) -> Self {
        let rendered = rotation.rendered_rotation();
        Self {
            rotation: rendered,
            visual: rotation.visual_rotation(),
            time_at_top: time_for_angle(rendered),
        }
    }
}

/// Everything needed to draw one frame of the dial
#[derive(Debug, Clone, PartialEq)]
pub struct DialScene {
    pub center: DialPoint,
    pub radius: f64,
    pub outline_color: Rgb,
    /// Twilight, golden hour then daylight, so narrower bands draw on top
    pub bands: Vec<Band>,
    pub pips: Vec<Pip>,
    pub highlighted_pip: usize,
    /// Points from just inside the pips to the centre, at "now"
    pub hand: Segment,
    /// Fixed reading position at 12 o'clock
    pub top_marker: DialPoint,
    pub readout: RotationReadout,
}

impl DialScene {
    /// Derive the scene from the current inputs.
    ///
    /// Face content is turned by minus the visual rotation, so the angle equal
    /// to the rotation sits at the top marker.
    pub fn compose(
        layout: &DialLayout,
        timings: Option<&SunTimings>,
        tz: Tz,
        now: DateTime<Utc>,
        rotation: &RotationState,
        palette: &Palette,
    ) -> Self {
        let center = layout.center;
        let radius = layout.radius;
        let visual = rotation.visual_rotation();
        let face = |angle: f64| angle - visual;
        let angle_of = |instant: DateTime<Utc>| angle_for_time(&instant.with_timezone(&tz));

        let bands: Vec<Band> = timings
            .map(|t| {
                [
                    (
                        BandKind::Twilight,
                        TimeSpan::new(t.twilight_am.start, t.twilight_pm.end),
                        palette.arc_twilight,
                    ),
                    (
                        BandKind::GoldenHour,
                        TimeSpan::new(t.golden_hour_am.start, t.golden_hour_pm.end),
                        palette.arc_golden_hour,
                    ),
                    (
                        BandKind::Daylight,
                        TimeSpan::new(t.golden_hour_am.end, t.golden_hour_pm.start),
                        palette.arc_daylight,
                    ),
                ]
                .into_iter()
                .filter_map(|(kind, span, color)| {
                    let length = span.duration();
                    // Collapsed crossings near the poles leave nothing to draw
                    if length <= Duration::zero() {
                        return None;
                    }
                    let start = face(angle_of(span.start));
                    let sweep = (face(angle_of(span.end)) - start).rem_euclid(360.0);
                    let sweep = if length >= Duration::days(1) || sweep == 0.0 {
                        FULL_BAND_SPAN
                    } else {
                        sweep.min(FULL_BAND_SPAN)
                    };
                    Some(Band {
                        kind,
                        arc: describe_arc(center, radius, start, start + sweep),
                        color,
                    })
                })
                .collect()
            })
            .unwrap_or_default();

        let now_angle = angle_of(now);
        let highlighted_pip = closest_pip(now_angle);
        let outer = layout.inset_radius(PIP_OUTER_INSET);
        let inner = layout.inset_radius(PIP_INNER_INSET);
        let pips = pip_angles()
            .into_iter()
            .enumerate()
            .map(|(index, angle)| {
                let angle = face(angle);
                let highlighted = index == highlighted_pip;
                Pip {
                    inner: polar_to_cartesian(center, inner, angle),
                    outer: polar_to_cartesian(center, outer, angle),
                    highlighted,
                    color: if highlighted {
                        palette.tick_highlight
                    } else {
                        palette.tick_default
                    },
                }
            })
            .collect();

        let hand = Segment {
            from: polar_to_cartesian(center, layout.inset_radius(HAND_INSET), face(now_angle)),
            to: center,
            color: palette.tick_highlight,
        };

        Self {
            center,
            radius,
            outline_color: palette.tick_default,
            bands,
            pips,
            highlighted_pip,
            hand,
            top_marker: polar_to_cartesian(center, radius, 0.0),
            readout: RotationReadout::of(rotation),
        }
    }

    #[cfg(test)]
    pub fn band(&self, kind: BandKind) -> Option<&Band> {
        self.bands.iter().find(|band| band.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureEvent;
    use crate::ticker::LiveClock;
    use chrono::{Duration, TimeZone, Timelike};
    use shared::TimeSpan;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, h, m, 0).unwrap()
    }

    fn span(a: (u32, u32), b: (u32, u32)) -> TimeSpan {
        TimeSpan::new(at(a.0, a.1), at(b.0, b.1))
    }

    fn timings() -> SunTimings {
        SunTimings {
            twilight_am: span((5, 0), (5, 30)),
            golden_hour_am: span((5, 30), (6, 30)),
            sunrise: span((5, 50), (5, 55)),
            solar_noon: at(12, 0),
            sunset: span((18, 5), (18, 10)),
            golden_hour_pm: span((17, 30), (18, 30)),
            twilight_pm: span((18, 30), (19, 0)),
        }
    }

    fn layout() -> DialLayout {
        DialLayout::measure(DialPoint::new(0.0, 0.0), 400.0, 400.0)
    }

    #[test]
    fn test_pip_angles() {
        let angles = pip_angles();
        assert_eq!(angles.len(), PIP_COUNT);
        assert_eq!(angles[0], -180.0);
        assert_eq!(angles[PIP_COUNT / 2], 0.0);
    }

    #[test]
    fn test_closest_pip() {
        assert_eq!(closest_pip(0.0), 72);
        assert_eq!(closest_pip(-180.0), 0);
        // Just short of midnight wraps to pip 0, not pip 143
        assert_eq!(closest_pip(179.9), 0);
        // Halfway between pip 0 and pip 1
        assert_eq!(closest_pip(-178.75), 0);
    }

    #[test]
    fn test_highlight_advances_one_pip_at_a_time() {
        let start = at(0, 0);
        let mut clock = LiveClock::new(start);
        let mut previous = closest_pip(angle_for_time(&clock.now()));
        let mut instant = start;
        while instant < start + Duration::days(2) {
            instant += Duration::seconds(20);
            clock.poll(instant);
            let current = closest_pip(angle_for_time(&clock.now()));
            let step = (current + PIP_COUNT - previous) % PIP_COUNT;
            assert!(step <= 1, "jumped from {previous} to {current}");
            previous = current;
        }
    }

    #[test]
    fn test_layout_measure() {
        let layout = DialLayout::measure(DialPoint::new(10.0, 0.0), 800.0, 600.0);
        assert_eq!(layout.size, 536.0);
        assert_eq!(layout.radius, 267.0);
        assert_eq!(layout.center, DialPoint::new(268.0, 268.0));
        assert_eq!(layout.screen_origin, DialPoint::new(142.0, 32.0));
        assert_eq!(layout.screen_center(), DialPoint::new(410.0, 300.0));

        assert!(layout.contains(DialPoint::new(410.0, 40.0)));
        assert!(!layout.contains(DialPoint::new(150.0, 40.0)));

        let tiny = DialLayout::measure(DialPoint::default(), 20.0, 20.0);
        assert_eq!(tiny.size, 0.0);
        assert_eq!(tiny.radius, 0.0);
    }

    #[test]
    fn test_scene_bands() {
        let rotation = RotationState::new(0.0);
        let t = timings();
        let scene = DialScene::compose(
            &layout(),
            Some(&t),
            Tz::UTC,
            at(12, 0),
            &rotation,
            &Palette::default(),
        );
        assert_eq!(scene.bands.len(), 3);

        let twilight = scene.band(BandKind::Twilight).unwrap();
        assert!(twilight.arc.large_arc);
        assert!((twilight.arc.start_angle - (-105.0)).abs() < 1e-9);
        assert!((twilight.arc.end_angle - 105.0).abs() < 1e-9);

        let daylight = scene.band(BandKind::Daylight).unwrap();
        assert!(!daylight.arc.large_arc);
        assert_eq!(daylight.color, Palette::default().arc_daylight);

        let no_bands = DialScene::compose(
            &layout(),
            None,
            Tz::UTC,
            at(12, 0),
            &rotation,
            &Palette::default(),
        );
        assert!(no_bands.bands.is_empty());
    }

    #[test]
    fn test_golden_hour_only_band_is_short() {
        let mut t = timings();
        // Shrink to a single hour
        t.golden_hour_am = span((17, 0), (17, 30));
        t.golden_hour_pm = span((17, 30), (18, 0));
        let scene = DialScene::compose(
            &layout(),
            Some(&t),
            Tz::UTC,
            at(12, 0),
            &RotationState::new(0.0),
            &Palette::default(),
        );
        assert!(!scene.band(BandKind::GoldenHour).unwrap().arc.large_arc);
    }

    #[test]
    fn test_one_pip_highlighted() {
        let scene = DialScene::compose(
            &layout(),
            None,
            Tz::UTC,
            at(18, 0),
            &RotationState::new(0.0),
            &Palette::default(),
        );
        assert_eq!(scene.pips.len(), PIP_COUNT);
        assert_eq!(scene.pips.iter().filter(|p| p.highlighted).count(), 1);
        assert_eq!(scene.highlighted_pip, 108);
        assert!(scene.pips[108].highlighted);
    }

    #[test]
    fn test_now_starts_at_top() {
        let now = at(19, 21);
        let rotation = RotationState::new(angle_for_time(&now));
        let layout = layout();
        let scene = DialScene::compose(&layout, None, Tz::UTC, now, &rotation, &Palette::default());

        assert!((scene.hand.from.x - layout.center.x).abs() < 1e-9);
        assert!(scene.hand.from.y < layout.center.y);
        assert_eq!(
            (scene.readout.time_at_top.hour(), scene.readout.time_at_top.minute()),
            (19, 21)
        );
    }

    #[test]
    fn test_dragging_does_not_move_now_pip() {
        let now = at(9, 0);
        let center = layout().screen_center();
        let rotation = RotationState::new(angle_for_time(&now))
            .transition(GestureEvent::Start {
                pointer: polar_to_cartesian(center, 100.0, 0.0),
                center: Some(center),
            })
            .transition(GestureEvent::Move {
                pointer: polar_to_cartesian(center, 100.0, -40.0),
            });
        let idle = DialScene::compose(
            &layout(),
            None,
            Tz::UTC,
            now,
            &RotationState::new(angle_for_time(&now)),
            &Palette::default(),
        );
        let dragged = DialScene::compose(&layout(), None, Tz::UTC, now, &rotation, &Palette::default());

        assert_eq!(idle.highlighted_pip, dragged.highlighted_pip);
        assert!((dragged.readout.rotation - idle.readout.rotation - 40.0).abs() < 1e-6);
        // Forty degrees is 2h40m on a 24h face
        let top = dragged.readout.time_at_top;
        assert_eq!((top.hour(), top.minute()), (11, 40));
    }

    #[test]
    fn test_local_zone_shifts_bands() {
        let t = timings();
        let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
        let scene = DialScene::compose(
            &layout(),
            Some(&t),
            tokyo,
            at(3, 0),
            &RotationState::new(0.0),
            &Palette::default(),
        );
        // 05:00 UTC is 14:00 in Tokyo
        let twilight = scene.band(BandKind::Twilight).unwrap();
        assert!((twilight.arc.start_angle - 30.0).abs() < 1e-9);
        // Ends at 04:00 the next morning, past local midnight
        assert!((twilight.arc.end_angle - 240.0).abs() < 1e-9);
        assert!(twilight.arc.large_arc);
        assert!((twilight.arc.span() - 210.0).abs() < 1e-9);
        assert_eq!(scene.highlighted_pip, 72);
    }

    #[test]
    fn test_white_night_keeps_golden_hour_and_daylight() {
        let noon = at(12, 0);
        let t = shared::compute_sun_timings(noon, 64.1466, -21.9426).unwrap();
        let reykjavik: Tz = "Atlantic/Reykjavik".parse().unwrap();
        let scene = DialScene::compose(
            &layout(),
            Some(&t),
            reykjavik,
            noon,
            &RotationState::new(0.0),
            &Palette::default(),
        );

        // Never darker than -4°, so twilight and golden hour wrap the whole day
        for kind in [BandKind::Twilight, BandKind::GoldenHour] {
            let band = scene.band(kind).unwrap();
            assert!((band.arc.span() - FULL_BAND_SPAN).abs() < 1e-9);
        }
        let daylight = scene.band(BandKind::Daylight).unwrap();
        assert!(daylight.arc.large_arc);
        assert!(daylight.arc.span() < FULL_BAND_SPAN);
    }

    #[test]
    fn test_collapsed_band_is_skipped() {
        let mut t = timings();
        t.golden_hour_am.end = at(12, 0);
        t.golden_hour_pm.start = at(12, 0);
        let scene = DialScene::compose(
            &layout(),
            Some(&t),
            Tz::UTC,
            at(12, 0),
            &RotationState::new(0.0),
            &Palette::default(),
        );
        assert!(scene.band(BandKind::Daylight).is_none());
        assert_eq!(scene.bands.len(), 2);
    }
}
