//! Time Engine - wall-clock time to dial angle mapping and readout formatting
//!
//! The dial is a 24 hour face: midnight sits at the bottom, noon at the top,
//! and angles grow clockwise.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// Seconds in one civil day
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// am/pm indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    AM,
    PM,
}

impl Meridiem {
    pub fn from_hour(hour24: u32) -> Self {
        if hour24 < 12 {
            Meridiem::AM
        } else {
            Meridiem::PM
        }
    }
}

impl std::fmt::Display for Meridiem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Meridiem::AM => write!(f, "am"),
            Meridiem::PM => write!(f, "pm"),
        }
    }
}

/// Angle on the dial (degrees) for the wall-clock time of `local`.
///
/// The raw day fraction puts midnight at 0°, which is the top of the circle;
/// subtracting 180 moves midnight to the bottom so noon points up.
pub fn angle_for_time<Z: TimeZone>(local: &DateTime<Z>) -> f64 {
    let total_seconds = local.hour() * 3600 + local.minute() * 60 + local.second();
    let fraction = total_seconds as f64 / SECONDS_PER_DAY as f64;
    360.0 * fraction - 180.0
}

/// Wall-clock time that sits under `angle`, to the nearest second
pub fn time_for_angle(angle: f64) -> NaiveTime {
    let fraction = (angle + 180.0).rem_euclid(360.0) / 360.0;
    let seconds = (fraction * SECONDS_PER_DAY as f64).round() as u32 % SECONDS_PER_DAY;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or_default()
}

/// Format as "6:45pm"
pub fn format_clock_time<T: Timelike>(time: &T) -> String {
    let hour24 = time.hour();
    let hour12 = match hour24 {
        0 => 12,
        1..=12 => hour24,
        _ => hour24 - 12,
    };
    format!("{}:{:02}{}", hour12, time.minute(), Meridiem::from_hour(hour24))
}

/// Format as "19:21"
pub fn format_clock_time_24h<T: Timelike>(time: &T) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Format a span length as "1hr 7m" (or "45m" under an hour)
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().abs();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}hr {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format as "24 Jun, 2018"
pub fn format_date(local: &DateTime<Tz>) -> String {
    local.format("%-d %b, %Y").to_string()
}

/// Format as "Thursday"
pub fn format_weekday(local: &DateTime<Tz>) -> String {
    local.format("%A").to_string()
}

/// Format as "37.78°N 122.41°W"
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    let ns = if latitude >= 0.0 { 'N' } else { 'S' };
    let ew = if longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.2}°{} {:.2}°{}",
        latitude.abs(),
        ns,
        longitude.abs(),
        ew
    )
}

/// Parse a timezone string into a Tz
pub fn parse_timezone(tz_str: &str) -> Result<Tz, String> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}
