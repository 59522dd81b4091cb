//! Sun Dial
//!
//! A 24 hour dial showing where the day's twilight, golden hour and daylight
//! fall for a saved location. Drag the face to spin it; the readout tracks
//! which time sits under the top marker.

mod dial;
mod drawing;
mod geometry;
mod gesture;
mod ticker;
mod ui;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use nannou::event::TouchEvent;
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use serde::{Deserialize, Serialize};
use shared::{angle_for_time, compute_sun_timings, Palette, SavedLocations, SunSettings, SunTimings};

use crate::dial::{DialLayout, DialScene, RotationReadout};
use crate::drawing::{color, draw_dial, draw_error_banner, ScreenSpace};
use crate::geometry::DialPoint;
use crate::gesture::{GestureEvent, RotationState};
use crate::ticker::{LiveClock, DEFAULT_REFRESH_SECS};
use crate::ui::{draw_side_panel, PanelInfo, UiResult, PANEL_WIDTH};

const CLOCK_NAME: &str = "sun_dial";
/// How far from today the shown date may be stepped, either way
const MAX_DATE_OFFSET_DAYS: i64 = 36_500;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    nannou::app(model).update(update).run();
}

/// Persisted configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Config {
    /// How often the highlighted "now" pip refreshes
    refresh_interval_secs: i64,
    show_rotation_readout: bool,
    sun_settings: SunSettings,
    palette: Palette,
    locations: SavedLocations,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            show_rotation_readout: false,
            sun_settings: SunSettings::default(),
            palette: Palette::default(),
            locations: SavedLocations::default(),
        }
    }
}

/// Application state
struct Model {
    config: Config,
    /// Dial rotation and any drag in progress
    rotation: RotationState,
    /// The "now" the dial highlights
    live: LiveClock,
    /// Sun timings for the shown location and day, if the sun cooperates
    timings: Option<SunTimings>,
    /// Location id and local date `timings` were computed for
    timings_key: Option<(String, NaiveDate)>,
    /// Measured on every update; None until the first layout pass
    layout: Option<DialLayout>,
    /// Touch id driving the current drag
    active_touch: Option<u64>,
    /// Error message to display (if any)
    error_message: Option<String>,
    /// egui integration
    egui: Egui,
}

impl Model {
    fn selected_tz(&self) -> Tz {
        self.config
            .sun_settings
            .resolve(&self.config.locations)
            .map(|(_, location)| location.tz())
            .unwrap_or(Tz::UTC)
    }

    fn feed(&mut self, event: GestureEvent) {
        self.rotation = self.rotation.transition(event);
    }

    /// Start a drag if `pointer` lands on the dial (or layout is still pending)
    fn begin_drag(&mut self, pointer: DialPoint) -> bool {
        let center = match self.layout {
            Some(layout) if !layout.contains(pointer) => return false,
            Some(layout) => Some(layout.screen_center()),
            None => None,
        };
        self.feed(GestureEvent::Start { pointer, center });
        self.rotation.is_dragging()
    }

    /// Recompute sun timings when the location or shown day changes
    fn refresh_timings(&mut self, now: DateTime<Utc>) {
        let Some((id, location)) = self.config.sun_settings.resolve(&self.config.locations)
        else {
            self.timings = None;
            self.timings_key = None;
            self.error_message = Some("No saved locations".to_string());
            return;
        };

        let day = shown_day(now, location.tz(), self.config.sun_settings.date_offset_days);
        let key = (id.to_string(), day.date_naive());
        if self.timings_key.as_ref() == Some(&key) {
            return;
        }

        match compute_sun_timings(local_noon(&day), location.latitude, location.longitude) {
            Ok(timings) => {
                log::info!("Sun timings for {} on {}", location.name, key.1);
                self.timings = Some(timings);
                self.error_message = None;
            }
            Err(e) => {
                log::warn!("No sun timings for {} on {}: {}", location.name, key.1, e);
                self.timings = None;
                self.error_message = Some(format!("{}: {}", location.name, e));
            }
        }
        self.timings_key = Some(key);
    }

    fn apply_ui(&mut self, result: UiResult) {
        if result == UiResult::default() {
            return;
        }

        let settings = &mut self.config.sun_settings;
        if let Some(id) = result.select_location {
            settings.selected_location_id = id;
        }
        settings.date_offset_days = settings
            .date_offset_days
            .saturating_add(result.step_days)
            .clamp(-MAX_DATE_OFFSET_DAYS, MAX_DATE_OFFSET_DAYS);
        if result.today {
            settings.date_offset_days = 0;
        }
        if result.toggle_readout {
            self.config.show_rotation_readout = !self.config.show_rotation_readout;
        }
        if result.reset_locations {
            self.config.locations.reset();
            self.config.sun_settings.reset();
        }

        self.timings_key = None;
        save_config(&self.config);
    }
}

/// The wall-clock day shown, `offset_days` from today in `tz`
///
/// Offsets are clamped to `MAX_DATE_OFFSET_DAYS`; today is shown if the date
/// still falls outside chrono's range.
fn shown_day(now: DateTime<Utc>, tz: Tz, offset_days: i64) -> DateTime<Tz> {
    let today = now.with_timezone(&tz);
    let offset = offset_days.clamp(-MAX_DATE_OFFSET_DAYS, MAX_DATE_OFFSET_DAYS);
    Duration::try_days(offset)
        .and_then(|offset| today.checked_add_signed(offset))
        .unwrap_or(today)
}

/// Live-time refresh interval from the config, or the default if out of range
fn refresh_interval(secs: i64) -> Duration {
    Duration::try_seconds(secs).unwrap_or_else(|| {
        log::warn!(
            "refresh_interval_secs {} is out of range, using {}",
            secs,
            DEFAULT_REFRESH_SECS
        );
        Duration::seconds(DEFAULT_REFRESH_SECS)
    })
}

/// Local noon of `day`, the instant the sun model is seeded with
fn local_noon(day: &DateTime<Tz>) -> DateTime<Utc> {
    day.date_naive()
        .and_hms_opt(12, 0, 0)
        .and_then(|noon| day.timezone().from_local_datetime(&noon).earliest())
        .map(|noon| noon.with_timezone(&Utc))
        .unwrap_or_else(|| day.with_timezone(&Utc))
}

/// Lay the dial out in the window area left of the side panel
fn measure_layout(window_rect: Rect) -> DialLayout {
    let width = (window_rect.w() - PANEL_WIDTH).max(0.0);
    DialLayout::measure(DialPoint::new(0.0, 0.0), width as f64, window_rect.h() as f64)
}

fn dial_area(window_rect: Rect) -> Rect {
    let width = (window_rect.w() - PANEL_WIDTH).max(0.0);
    Rect::from_x_y_w_h(
        window_rect.left() + width / 2.0,
        window_rect.y(),
        width,
        window_rect.h(),
    )
}

fn load_config() -> Config {
    match shared::load_config(CLOCK_NAME) {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            log::warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

fn save_config(config: &Config) {
    if let Err(e) = shared::save_config(CLOCK_NAME, config) {
        log::error!("Failed to save config: {}", e);
    }
}

fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Sun Dial")
        .size(900, 620)
        .min_size(560, 420)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_moved(mouse_moved)
        .mouse_released(mouse_released)
        .touch(touch)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build window");

    let window = app.window(window_id).expect("window was just created");
    let egui = Egui::from_window(&window);

    let config = load_config();
    config.locations.warn_unknown_timezones();

    let now = Utc::now();
    let live = LiveClock::with_interval(now, refresh_interval(config.refresh_interval_secs));
    log::info!("Refreshing the live time every {}s", live.interval().num_seconds());

    let mut model = Model {
        config,
        rotation: RotationState::new(0.0),
        live,
        timings: None,
        timings_key: None,
        layout: None,
        active_touch: None,
        error_message: None,
        egui,
    };
    // Start with the current time under the top marker
    model.rotation = RotationState::new(angle_for_time(&now.with_timezone(&model.selected_tz())));
    model.refresh_timings(now);
    model
}

fn update(app: &App, model: &mut Model, update: Update) {
    let now = Utc::now();
    if model.live.poll(now) {
        log::debug!("Live time advanced to {}", now);
    }

    model.layout = Some(measure_layout(app.window_rect()));
    model.refresh_timings(model.live.now());

    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let result = match model.config.sun_settings.resolve(&model.config.locations) {
        Some((location_id, location)) => {
            let tz = location.tz();
            let info = PanelInfo {
                location_id,
                location,
                tz,
                now: model.live.now(),
                shown_day: shown_day(
                    model.live.now(),
                    tz,
                    model.config.sun_settings.date_offset_days,
                ),
                date_offset_days: model.config.sun_settings.date_offset_days,
                timings: model.timings.as_ref(),
                readout: RotationReadout::of(&model.rotation),
                show_readout: model.config.show_rotation_readout,
            };
            draw_side_panel(&ctx, &info, &model.config.locations)
        }
        None => UiResult {
            reset_locations: true,
            ..UiResult::default()
        },
    };

    drop(ctx);

    model.apply_ui(result);
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    draw.background().color(color(model.config.palette.background));

    if let Some(layout) = model.layout {
        let scene = DialScene::compose(
            &layout,
            model.timings.as_ref(),
            model.selected_tz(),
            model.live.now(),
            &model.rotation,
            &model.config.palette,
        );
        draw_dial(&draw, &scene, &layout, &ScreenSpace::new(window_rect));
    }

    if let Some(ref message) = model.error_message {
        draw_error_banner(&draw, message, dial_area(window_rect));
    }

    if let Err(e) = draw.to_frame(app, &frame) {
        log::error!("Failed to draw frame: {:?}", e);
    }
    if let Err(e) = model.egui.draw_to_frame(&frame) {
        log::error!("Failed to draw egui: {}", e);
    }
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    let result = match key {
        Key::Left => UiResult {
            step_days: -1,
            ..UiResult::default()
        },
        Key::Right => UiResult {
            step_days: 1,
            ..UiResult::default()
        },
        Key::T => UiResult {
            today: true,
            ..UiResult::default()
        },
        _ => return,
    };
    model.apply_ui(result);
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        let pointer = ScreenSpace::new(app.window_rect()).to_screen(app.mouse.position());
        model.begin_drag(pointer);
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    if model.active_touch.is_none() {
        let pointer = ScreenSpace::new(app.window_rect()).to_screen(pos);
        model.feed(GestureEvent::Move { pointer });
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left && model.active_touch.is_none() {
        model.feed(GestureEvent::End);
    }
}

fn touch(app: &App, model: &mut Model, event: TouchEvent) {
    let pointer = ScreenSpace::new(app.window_rect()).to_screen(event.position);
    match event.phase {
        TouchPhase::Started => {
            if model.active_touch.is_none() && model.begin_drag(pointer) {
                model.active_touch = Some(event.id);
            }
        }
        TouchPhase::Moved if model.active_touch == Some(event.id) => {
            model.feed(GestureEvent::Move { pointer });
        }
        TouchPhase::Ended | TouchPhase::Cancelled if model.active_touch == Some(event.id) => {
            model.feed(GestureEvent::End);
            model.active_touch = None;
        }
        _ => {}
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
