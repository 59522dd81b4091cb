//! UI module - egui side panel with the day's readout, location and date controls
//!
//! Provides the interactive UI components using nannou_egui.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use nannou_egui::egui;
use shared::{
    format_clock_time, format_clock_time_24h, format_coordinates, format_date, format_duration,
    format_weekday, Location, SavedLocations, SunTimings,
};

use crate::dial::RotationReadout;

pub const PANEL_WIDTH: f32 = 280.0;

/// Everything the panel shows, gathered before the egui frame
pub struct PanelInfo<'a> {
    pub location_id: &'a str,
    pub location: &'a Location,
    pub tz: Tz,
    pub now: DateTime<Utc>,
    /// The day the dial is showing, in the location's zone
    pub shown_day: DateTime<Tz>,
    pub date_offset_days: i64,
    pub timings: Option<&'a SunTimings>,
    pub readout: RotationReadout,
    pub show_readout: bool,
}

/// Result of UI interactions
#[derive(Debug, Default, PartialEq)]
pub struct UiResult {
    /// If Some, the user picked another saved location
    pub select_location: Option<String>,
    /// Days to move the shown date by
    pub step_days: i64,
    /// Jump back to today
    pub today: bool,
    /// Toggle the numeric rotation readout
    pub toggle_readout: bool,
    /// Restore the default saved locations
    pub reset_locations: bool,
}

/// Golden hour headline text: span, length and how far away it is
pub fn golden_hour_lines(
    timings: &SunTimings,
    tz: Tz,
    now: DateTime<Utc>,
) -> Option<(String, String, Option<String>)> {
    let span = timings.next_golden_hour(now)?;
    let range = format!(
        "{} – {}",
        format_clock_time(&span.start.with_timezone(&tz)),
        format_clock_time(&span.end.with_timezone(&tz))
    );
    let length = format_duration(span.duration());
    let until = (now < span.start).then(|| format!("in {}", format_duration(span.start - now)));
    Some((range, length, until))
}

/// Draw the right-hand panel
pub fn draw_side_panel(
    ctx: &egui::Context,
    info: &PanelInfo,
    saved: &SavedLocations,
) -> UiResult {
    let mut result = UiResult::default();

    egui::SidePanel::right("sun_panel")
        .resizable(false)
        .default_width(PANEL_WIDTH)
        .show(ctx, |ui| {
            ui.add_space(10.0);

            // === LOCATION ===
            ui.label(
                egui::RichText::new(&info.location.name)
                    .size(28.0)
                    .color(egui::Color32::from_rgb(255, 255, 255)),
            );
            ui.label(
                egui::RichText::new(format_coordinates(
                    info.location.latitude,
                    info.location.longitude,
                ))
                .color(egui::Color32::from_rgba_unmultiplied(255, 255, 255, 163)),
            );

            ui.add_space(15.0);

            // === TIME ===
            let local_now = info.now.with_timezone(&info.tz);
            ui.horizontal(|ui| {
                ui.heading(format_weekday(&info.shown_day));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.heading(format_clock_time_24h(&local_now));
                });
            });
            ui.label(format_date(&info.shown_day));

            ui.add_space(15.0);

            // === GOLDEN HOUR ===
            let accent = egui::Color32::from_rgb(255, 71, 0);
            ui.label(egui::RichText::new("Golden hour").size(20.0).color(accent));
            match info.timings {
                Some(timings) => match golden_hour_lines(timings, info.tz, info.now) {
                    Some((range, length, until)) => {
                        ui.label(range);
                        ui.label(length);
                        if let Some(until) = until {
                            ui.label(until);
                        }
                    }
                    None => {
                        ui.label("Done for the day");
                    }
                },
                None => {
                    ui.label("Not available here on this date");
                }
            }

            ui.add_space(10.0);
            ui.separator();

            // === DATE ===
            ui.horizontal(|ui| {
                if ui.button("◀").clicked() {
                    result.step_days -= 1;
                }
                let label = if info.date_offset_days == 0 {
                    "Today".to_string()
                } else {
                    format!("{:+} days", info.date_offset_days)
                };
                if ui
                    .add_enabled(info.date_offset_days != 0, egui::Button::new(label))
                    .clicked()
                {
                    result.today = true;
                }
                if ui.button("▶").clicked() {
                    result.step_days += 1;
                }
            });

            ui.add_space(10.0);
            ui.separator();

            // === LOCATIONS ===
            ui.label("Saved locations");
            for (id, location) in saved.list() {
                let is_current = id == info.location_id;
                if ui.selectable_label(is_current, &location.name).clicked() && !is_current {
                    result.select_location = Some(id.to_string());
                }
            }
            if ui.small_button("Reset locations").clicked() {
                result.reset_locations = true;
            }

            ui.add_space(10.0);
            ui.separator();

            let mut show_readout = info.show_readout;
            if ui.checkbox(&mut show_readout, "Show rotation").changed() {
                result.toggle_readout = true;
            }
            if info.show_readout {
                ui.label(format!(
                    "Top of dial: {}",
                    format_clock_time_24h(&info.readout.time_at_top)
                ));
                ui.label(
                    egui::RichText::new(format!(
                        "{:.1}° ({:.1}° on screen)",
                        info.readout.rotation, info.readout.visual
                    ))
                    .size(11.0)
                    .color(egui::Color32::from_rgb(160, 160, 160)),
                );
            }
        });

    result
}
