use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod conditions;
mod conversions;

pub use conditions::{WeatherCategory, condition_category, condition_glyph, icon_url, uv_label};
pub use conversions::{
    celsius_to_fahrenheit, compass_label, meters_per_second_to_kph,
    percent_from_probability, round_temp,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    Celsius,
    Fahrenheit,
}

/// A temperature reading that always carries both scales.
///
/// Only constructible from Celsius, so the Fahrenheit value can never drift
/// from `celsius * 9/5 + 32`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Temperature {
    celsius: f64,
    fahrenheit: f64,
}

impl Temperature {
    #[must_use]
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius_to_fahrenheit(celsius),
        }
    }

    #[must_use]
    pub fn celsius(self) -> f64 {
        self.celsius
    }

    #[must_use]
    pub fn fahrenheit(self) -> f64 {
        self.fahrenheit
    }

    #[must_use]
    pub fn in_units(self, units: Units) -> f64 {
        match units {
            Units::Celsius => self.celsius,
            Units::Fahrenheit => self.fahrenheit,
        }
    }

    #[must_use]
    pub fn rounded(self, units: Units) -> i32 {
        round_temp(self.in_units(units))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub local_time: String,
}

impl Location {
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionLabel {
    pub text: String,
    pub code: u32,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temp: Temperature,
    pub condition: ConditionLabel,
    pub wind_kph: f64,
    pub wind_dir: &'static str,
    pub precip_mm: f64,
    pub humidity: u8,
    pub feels_like: Temperature,
    pub uv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourSample {
    pub time: String,
    pub temp: Temperature,
    pub condition: ConditionLabel,
    pub chance_of_rain: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    /// ISO `YYYY-MM-DD`, taken verbatim from the provider's local timestamps.
    pub date: String,
    pub min_temp: Temperature,
    pub max_temp: Temperature,
    pub avg_temp: Temperature,
    pub condition: ConditionLabel,
    pub daily_chance_of_rain: u8,
    pub hours: Vec<HourSample>,
}

/// Location, current conditions and forecast from one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
    pub fetched_at: DateTime<Utc>,
}

/// What the map widget needs to place a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPin {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl WeatherSnapshot {
    #[must_use]
    pub fn map_pin(&self) -> MapPin {
        MapPin {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            display_name: self.location.display_name(),
        }
    }

    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.first()
    }

    pub fn high_low(&self, units: Units) -> Option<(i32, i32)> {
        let today = self.today()?;
        Some((today.max_temp.rounded(units), today.min_temp.rounded(units)))
    }
}
