use serde::Serialize;

use crate::{
    app::state::{AppState, LoadState},
    cli::IconMode,
    domain::{
        activities::ActivitySuggestion,
        weather::{Units, WeatherSnapshot, condition_glyph, uv_label},
    },
    resilience::freshness::FreshnessState,
};

fn unit_symbol(units: Units) -> &'static str {
    match units {
        Units::Celsius => "°C",
        Units::Fahrenheit => "°F",
    }
}

/// Plain-text dashboard for one snapshot.
#[must_use]
pub fn render_report(
    snapshot: &WeatherSnapshot,
    suggestions: &[ActivitySuggestion],
    units: Units,
    icons: IconMode,
) -> String {
    let symbol = unit_symbol(units);
    let current = &snapshot.current;
    let pin = snapshot.map_pin();
    let mut lines = vec![
        format!(
            "{}  (local time {})",
            pin.display_name, snapshot.location.local_time
        ),
        format!("Map: {:.2}, {:.2}", pin.latitude, pin.longitude),
        format!(
            "{} {}  {}{symbol}  (feels like {}{symbol})",
            condition_glyph(current.condition.code, icons),
            current.condition.text,
            current.temp.rounded(units),
            current.feels_like.rounded(units),
        ),
    ];

    if let Some((high, low)) = snapshot.high_low(units) {
        lines.push(format!("H {high}{symbol} / L {low}{symbol}"));
    }
    lines.push(format!(
        "Humidity {}%  Wind {:.0} km/h {}  Precip {:.1} mm  UV {:.1} ({})",
        current.humidity,
        current.wind_kph,
        current.wind_dir,
        current.precip_mm,
        current.uv,
        uv_label(current.uv),
    ));

    if !snapshot.forecast.is_empty() {
        lines.push(String::new());
        lines.push("Forecast".to_string());
        for day in &snapshot.forecast {
            lines.push(format!(
                "  {}  {} {:<14} {:>4}{symbol} / {:>4}{symbol}  rain {:>3}%",
                day.date,
                condition_glyph(day.condition.code, icons),
                day.condition.text,
                day.min_temp.rounded(units),
                day.max_temp.rounded(units),
                day.daily_chance_of_rain,
            ));
        }
    }

    if !suggestions.is_empty() {
        lines.push(String::new());
        lines.push("Things to do".to_string());
        for suggestion in suggestions {
            let icon = match icons {
                IconMode::Emoji => suggestion.icon,
                IconMode::Ascii => "-",
            };
            lines.push(format!(
                "  {icon} {}: {}",
                suggestion.activity, suggestion.description
            ));
        }
    }

    lines.join("\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    snapshot: &'a WeatherSnapshot,
    suggestions: &'a [ActivitySuggestion],
}

/// Machine-readable form of [`render_report`]; temperatures carry both scales.
pub fn render_json(
    snapshot: &WeatherSnapshot,
    suggestions: &[ActivitySuggestion],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        snapshot,
        suggestions,
    })
}

/// One line describing load progress, failures and data age.
#[must_use]
pub fn status_line(state: &AppState) -> String {
    match state.mode() {
        LoadState::Idle => "Enter a location to get started.".to_string(),
        LoadState::Loading => match state.active_query() {
            Some(query) => format!("Loading weather for {query}..."),
            None => "Loading weather...".to_string(),
        },
        LoadState::Failed => {
            let message = state
                .error_message()
                .unwrap_or_else(|| "Failed to load weather data.".to_string());
            if state.snapshot().is_some() {
                format!("{message} Showing last known weather.")
            } else {
                message
            }
        }
        LoadState::Ready => match state.freshness() {
            FreshnessState::Fresh => "Up to date.".to_string(),
            FreshnessState::Stale => "Data may be out of date.".to_string(),
            FreshnessState::Offline => "Offline: showing cached data.".to_string(),
        },
    }
}

/// Snapshot (when any) followed by the status line.
#[must_use]
pub fn render_state(state: &AppState, icons: IconMode) -> String {
    let status = status_line(state);
    match state.snapshot() {
        Some(snapshot) => format!(
            "{}\n\n{status}",
            render_report(snapshot, &state.suggestions(), state.units, icons)
        ),
        None => status,
    }
}
