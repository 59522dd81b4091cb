//! Saved locations and the current sun settings selection

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::time_engine::parse_timezone;

/// A named place on Earth the dial can show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone used for the wall-clock reading
    pub timezone: String,
}

impl Location {
    pub fn new(name: &str, latitude: f64, longitude: f64, timezone: &str) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            timezone: timezone.to_string(),
        }
    }

    pub fn try_tz(&self) -> Result<Tz, String> {
        parse_timezone(&self.timezone)
    }

    /// Resolve the location's timezone, falling back to UTC
    pub fn tz(&self) -> Tz {
        self.try_tz().unwrap_or(Tz::UTC)
    }
}

/// Saved locations keyed by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedLocations {
    locations: BTreeMap<String, Location>,
}

impl Default for SavedLocations {
    fn default() -> Self {
        let locations = [
            ("1", Location::new("Guildford", 51.239007, -0.580074, "Europe/London")),
            ("2", Location::new("Tokyo", 35.6762, 139.6503, "Asia/Tokyo")),
            ("3", Location::new("Reykjavik", 64.1466, -21.9426, "Atlantic/Reykjavik")),
        ]
        .into_iter()
        .map(|(id, location)| (id.to_string(), location))
        .collect();
        Self { locations }
    }
}

impl SavedLocations {
    pub fn by_id(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Locations with their ids, in id order
    pub fn list(&self) -> impl Iterator<Item = (&str, &Location)> {
        self.locations.iter().map(|(id, loc)| (id.as_str(), loc))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Log every location whose timezone does not resolve
    pub fn warn_unknown_timezones(&self) {
        for (id, location) in self.list() {
            if let Err(e) = location.try_tz() {
                log::warn!("Location {} ({}): {}, showing UTC", id, location.name, e);
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Which location and day the dial is showing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunSettings {
    pub selected_location_id: String,
    /// Days relative to today (0 = today)
    #[serde(default)]
    pub date_offset_days: i64,
}

impl Default for SunSettings {
    fn default() -> Self {
        Self {
            selected_location_id: "1".to_string(),
            date_offset_days: 0,
        }
    }
}

impl SunSettings {
    /// The selected location, or the first saved one if the selection went stale
    pub fn resolve<'a>(&self, saved: &'a SavedLocations) -> Option<(&'a str, &'a Location)> {
        saved
            .locations
            .get_key_value(&self.selected_location_id)
            .map(|(id, loc)| (id.as_str(), loc))
            .or_else(|| saved.list().next())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
