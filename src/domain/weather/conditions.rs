use crate::cli::IconMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCategory {
    Thunder,
    Drizzle,
    Rain,
    Snow,
    Fog,
    Clear,
    Cloudy,
    Unknown,
}

/// Groups OpenWeather condition ids (`2xx` thunder, `3xx` drizzle, ...).
#[must_use]
pub fn condition_category(code: u32) -> WeatherCategory {
    match code {
        200..=232 => WeatherCategory::Thunder,
        300..=321 => WeatherCategory::Drizzle,
        500..=531 => WeatherCategory::Rain,
        600..=622 => WeatherCategory::Snow,
        701..=781 => WeatherCategory::Fog,
        800 => WeatherCategory::Clear,
        801..=804 => WeatherCategory::Cloudy,
        _ => WeatherCategory::Unknown,
    }
}

#[must_use]
pub fn condition_glyph(code: u32, mode: IconMode) -> &'static str {
    let (ascii, emoji) = glyph_tokens(condition_category(code));
    match mode {
        IconMode::Ascii => ascii,
        IconMode::Emoji => emoji,
    }
}

fn glyph_tokens(category: WeatherCategory) -> (&'static str, &'static str) {
    match category {
        WeatherCategory::Thunder => ("THN", "⛈️"),
        WeatherCategory::Drizzle => ("DRZ", "🌦️"),
        WeatherCategory::Rain => ("RAN", "🌧️"),
        WeatherCategory::Snow => ("SNW", "🌨️"),
        WeatherCategory::Fog => ("FOG", "🌫️"),
        WeatherCategory::Clear => ("SUN", "☀️"),
        WeatherCategory::Cloudy => ("CLD", "☁️"),
        WeatherCategory::Unknown => ("---", "☁️"),
    }
}

#[must_use]
pub fn icon_url(icon_key: &str) -> String {
    if icon_key.is_empty() {
        return String::new();
    }
    format!("https://openweathermap.org/img/wn/{icon_key}@2x.png")
}

#[must_use]
pub fn uv_label(uv: f64) -> &'static str {
    if uv < 3.0 {
        "Low"
    } else if uv < 6.0 {
        "Moderate"
    } else if uv < 8.0 {
        "High"
    } else if uv < 11.0 {
        "Very High"
    } else {
        "Extreme"
    }
}
