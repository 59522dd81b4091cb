//! Sun timings - when the sun crosses the altitudes that bound twilight,
//! golden hour and daylight for a given day and place.
//!
//! Uses the low-precision solar position model (mean anomaly, ecliptic longitude,
//! declination, transit) which is good to about a minute away from the poles.
//!
//! Near the poles some altitudes are never crossed. Each one degrades on its
//! own: a sun that stays above an altitude all day crosses it at solar
//! midnight either side of noon, and a sun that never climbs to it collapses
//! the crossing onto solar noon.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::f64::consts::PI;
use thiserror::Error;

const RAD: f64 = PI / 180.0;
const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
const J0: f64 = 0.0009;
/// Obliquity of the ecliptic
const OBLIQUITY: f64 = RAD * 23.4397;

/// Sun altitude (degrees) where morning twilight starts and evening twilight ends
pub const TWILIGHT_OUTER_ALTITUDE: f64 = -12.0;
/// Sun altitude where twilight hands over to golden hour
pub const TWILIGHT_INNER_ALTITUDE: f64 = -4.0;
/// Upper limb touches the horizon, with refraction
pub const SUNRISE_ALTITUDE: f64 = -0.833;
/// Lower limb clears the horizon
pub const SUNRISE_END_ALTITUDE: f64 = -0.3;
/// Sun altitude where golden hour gives way to daylight
pub const GOLDEN_HOUR_UPPER_ALTITUDE: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SunError {
    #[error("Coordinates out of range: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("Computed time is out of range")]
    OutOfRange,
}

/// A start/end pair of instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// The sun's schedule for one day, in chronological order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimings {
    pub twilight_am: TimeSpan,
    pub golden_hour_am: TimeSpan,
    pub sunrise: TimeSpan,
    pub solar_noon: DateTime<Utc>,
    pub sunset: TimeSpan,
    pub golden_hour_pm: TimeSpan,
    pub twilight_pm: TimeSpan,
}

impl SunTimings {
    /// The golden hour in progress at `now`, or the next one later that day
    pub fn next_golden_hour(&self, now: DateTime<Utc>) -> Option<&TimeSpan> {
        if now <= self.golden_hour_am.end {
            Some(&self.golden_hour_am)
        } else if now <= self.golden_hour_pm.end {
            Some(&self.golden_hour_pm)
        } else {
            None
        }
    }
}

/// Compute the sun timings for the day containing `instant` at the given position
pub fn compute_sun_timings(
    instant: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
) -> Result<SunTimings, SunError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(SunError::InvalidCoordinates {
            latitude,
            longitude,
        });
    }

    let day = SolarDay::new(instant, latitude, longitude);

    let (twilight_start, twilight_end) = day.bounds(TWILIGHT_OUTER_ALTITUDE)?;
    let (golden_start, golden_end) = day.bounds(TWILIGHT_INNER_ALTITUDE)?;
    let (sunrise, sunset) = day.bounds(SUNRISE_ALTITUDE)?;
    let (sunrise_end, sunset_start) = day.bounds(SUNRISE_END_ALTITUDE)?;
    let (daylight_start, daylight_end) = day.bounds(GOLDEN_HOUR_UPPER_ALTITUDE)?;

    Ok(SunTimings {
        twilight_am: TimeSpan::new(twilight_start, golden_start),
        golden_hour_am: TimeSpan::new(golden_start, daylight_start),
        sunrise: TimeSpan::new(sunrise, sunrise_end),
        solar_noon: from_julian(day.j_noon)?,
        sunset: TimeSpan::new(sunset_start, sunset),
        golden_hour_pm: TimeSpan::new(daylight_end, golden_end),
        twilight_pm: TimeSpan::new(golden_end, twilight_end),
    })
}

/// How the sun meets one altitude over a day, as Julian dates
#[derive(Debug, Clone, Copy, PartialEq)]
enum Crossing {
    RiseSet(f64, f64),
    AlwaysAbove,
    AlwaysBelow,
}

/// Orbital quantities for one solar day, shared by every altitude crossing
struct SolarDay {
    lw: f64,
    phi: f64,
    n: f64,
    mean_anomaly: f64,
    ecliptic_longitude: f64,
    declination: f64,
    j_noon: f64,
}

impl SolarDay {
    fn new(instant: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        let lw = -longitude * RAD;
        let phi = latitude * RAD;
        let d = to_julian(instant) - J2000;

        let n = (d - J0 - lw / (2.0 * PI)).round();
        let ds = approx_transit(0.0, lw, n);

        let mean_anomaly = RAD * (357.5291 + 0.985_600_28 * ds);
        let ecliptic_longitude = ecliptic_longitude(mean_anomaly);
        let declination = (ecliptic_longitude.sin() * OBLIQUITY.sin()).asin();
        let j_noon = solar_transit(ds, mean_anomaly, ecliptic_longitude);

        Self {
            lw,
            phi,
            n,
            mean_anomaly,
            ecliptic_longitude,
            declination,
            j_noon,
        }
    }

    fn crossing(&self, altitude_deg: f64) -> Crossing {
        let h = altitude_deg * RAD;
        let cos_w = (h.sin() - self.phi.sin() * self.declination.sin())
            / (self.phi.cos() * self.declination.cos());
        if cos_w < -1.0 {
            return Crossing::AlwaysAbove;
        }
        if cos_w > 1.0 {
            return Crossing::AlwaysBelow;
        }

        let a = approx_transit(cos_w.acos(), self.lw, self.n);
        let j_set = solar_transit(a, self.mean_anomaly, self.ecliptic_longitude);
        let j_rise = self.j_noon - (j_set - self.j_noon);
        Crossing::RiseSet(j_rise, j_set)
    }

    /// Rising and setting instants for the given sun altitude, clamped to
    /// solar midnight or noon when the sun never crosses it
    fn bounds(&self, altitude_deg: f64) -> Result<(DateTime<Utc>, DateTime<Utc>), SunError> {
        let noon = from_julian(self.j_noon)?;
        match self.crossing(altitude_deg) {
            Crossing::RiseSet(rise, set) => Ok((from_julian(rise)?, from_julian(set)?)),
            Crossing::AlwaysAbove => Ok((noon - Duration::hours(12), noon + Duration::hours(12))),
            Crossing::AlwaysBelow => Ok((noon, noon)),
        }
    }
}

fn to_julian(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / DAY_MS - 0.5 + J1970
}

fn from_julian(j: f64) -> Result<DateTime<Utc>, SunError> {
    let ms = ((j + 0.5 - J1970) * DAY_MS).round() as i64;
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or(SunError::OutOfRange)
}

fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    let center = RAD * (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin());
    let perihelion = RAD * 102.9372;
    m + center + perihelion + PI
}

fn approx_transit(hour_angle: f64, lw: f64, n: f64) -> f64 {
    J0 + (hour_angle + lw) / (2.0 * PI) + n
}

fn solar_transit(ds: f64, mean_anomaly: f64, ecliptic_longitude: f64) -> f64 {
    J2000 + ds + 0.0053 * mean_anomaly.sin() - 0.0069 * (2.0 * ecliptic_longitude).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
        (a - b).num_minutes().abs()
    }

    #[test]
    fn test_london_midsummer() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        let timings = compute_sun_timings(instant, 51.5074, -0.1278).unwrap();

        let sunrise = Utc.with_ymd_and_hms(2024, 6, 21, 3, 43, 0).unwrap();
        let sunset = Utc.with_ymd_and_hms(2024, 6, 21, 20, 21, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 6, 21, 12, 2, 0).unwrap();

        assert!(minutes_between(timings.sunrise.start, sunrise) <= 3);
        assert!(minutes_between(timings.sunset.end, sunset) <= 3);
        assert!(minutes_between(timings.solar_noon, noon) <= 2);
    }

    #[test]
    fn test_timings_are_chronological() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let t = compute_sun_timings(instant, 51.239007, -0.580074).unwrap();
        let ordered = [
            t.twilight_am.start,
            t.twilight_am.end,
            t.golden_hour_am.start,
            t.sunrise.start,
            t.sunrise.end,
            t.golden_hour_am.end,
            t.solar_noon,
            t.golden_hour_pm.start,
            t.sunset.start,
            t.sunset.end,
            t.golden_hour_pm.end,
            t.twilight_pm.start,
            t.twilight_pm.end,
        ];
        assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(t.twilight_am.end, t.golden_hour_am.start);
        assert_eq!(t.golden_hour_pm.end, t.twilight_pm.start);
    }

    #[test]
    fn test_golden_hour_length_is_plausible() {
        let instant = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
        let t = compute_sun_timings(instant, 35.6762, 139.6503).unwrap();
        let minutes = t.golden_hour_pm.duration().num_minutes();
        assert!((30..=120).contains(&minutes), "golden hour was {minutes}m");
    }

    #[test]
    fn test_reykjavik_midsummer_keeps_golden_hour_and_daylight() {
        // The sun bottoms out around -2.4° so neither twilight altitude is crossed
        let instant = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        let t = compute_sun_timings(instant, 64.1466, -21.9426).unwrap();

        assert_eq!(t.twilight_am.duration(), Duration::zero());
        assert_eq!(t.twilight_pm.duration(), Duration::zero());
        assert_eq!(t.golden_hour_am.start - t.solar_noon, Duration::hours(-12));
        assert_eq!(t.golden_hour_pm.end - t.solar_noon, Duration::hours(12));

        // Sunrise and the +6° crossing still exist
        assert!(t.golden_hour_am.start < t.sunrise.start);
        assert!(t.sunrise.end < t.golden_hour_am.end);
        assert!(t.golden_hour_am.end < t.solar_noon);
        assert!(t.solar_noon < t.golden_hour_pm.start);
        assert!(t.golden_hour_pm.start < t.sunset.start);
    }

    #[test]
    fn test_polar_night_collapses_sunrise_onto_noon() {
        // Tromsø: the sun peaks around -3° so twilight and golden hour survive
        let instant = Utc.with_ymd_and_hms(2024, 12, 21, 12, 0, 0).unwrap();
        let t = compute_sun_timings(instant, 69.6492, 18.9553).unwrap();

        assert_eq!(t.sunrise.duration(), Duration::zero());
        assert_eq!(t.sunrise.start, t.solar_noon);
        assert_eq!(t.sunset.end, t.solar_noon);
        assert_eq!(t.golden_hour_am.end, t.solar_noon);
        assert_eq!(t.golden_hour_pm.start, t.solar_noon);
        assert!(t.twilight_am.start < t.golden_hour_am.start);
        assert!(t.golden_hour_am.start < t.solar_noon);
    }

    #[test]
    fn test_invalid_coordinates() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        assert!(matches!(
            compute_sun_timings(instant, 91.0, 0.0),
            Err(SunError::InvalidCoordinates { .. })
        ));
        assert!(matches!(
            compute_sun_timings(instant, f64::NAN, 0.0),
            Err(SunError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_next_golden_hour() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        let t = compute_sun_timings(instant, 51.5074, -0.1278).unwrap();

        let dawn = Utc.with_ymd_and_hms(2024, 6, 21, 1, 0, 0).unwrap();
        assert_eq!(t.next_golden_hour(dawn), Some(&t.golden_hour_am));
        assert_eq!(t.next_golden_hour(instant), Some(&t.golden_hour_pm));
        assert!(t.golden_hour_pm.contains(t.golden_hour_pm.start));

        let late = Utc.with_ymd_and_hms(2024, 6, 21, 23, 30, 0).unwrap();
        assert_eq!(t.next_golden_hour(late), None);
    }
}
