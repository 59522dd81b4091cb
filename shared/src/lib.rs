//! Shared sun dial logic: time to angle mapping, sun timings, saved locations,
//! palette and configuration persistence.

pub mod config;
pub mod locations;
pub mod palette;
pub mod sun;
pub mod time_engine;

pub use config::{
    config_dir, config_path, load_config, parse_config, render_config,
    save_config, ConfigError,
};
pub use locations::{Location, SavedLocations, SunSettings};
pub use palette::{Palette, PaletteError, Rgb};
pub use sun::{compute_sun_timings, SunError, SunTimings, TimeSpan};
pub use time_engine::{
    angle_for_time, format_clock_time, format_clock_time_24h, format_coordinates, format_date,
    format_duration, format_weekday, parse_timezone, time_for_angle, Meridiem, SECONDS_PER_DAY,
};
