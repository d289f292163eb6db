use std::time::Duration;

use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{
    error::{FetchError, FetchStage},
    get_json, http_client,
};
use crate::domain::{
    forecast::RawSample,
    weather::{
        ConditionLabel, CurrentConditions, Temperature, compass_label, icon_url,
        meters_per_second_to_kph,
    },
};

pub const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Current conditions as the provider reports them (metric units, wind in m/s).
#[derive(Debug, Clone, PartialEq)]
pub struct RawCurrent {
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity: f64,
    pub condition_id: u32,
    pub condition_description: String,
    pub condition_icon: String,
    pub wind_speed_ms: f64,
    pub wind_deg: f64,
    pub rain_1h_mm: f64,
    pub uv_index: f64,
    /// Observation time, unix seconds.
    pub observed_at: i64,
    /// Location's offset from UTC in seconds.
    pub utc_offset_secs: i64,
}

impl RawCurrent {
    #[must_use]
    pub fn to_conditions(&self) -> CurrentConditions {
        CurrentConditions {
            temp: Temperature::from_celsius(self.temp_c),
            condition: ConditionLabel {
                text: capitalize(&self.condition_description),
                code: self.condition_id,
                icon: icon_url(&self.condition_icon),
            },
            wind_kph: meters_per_second_to_kph(self.wind_speed_ms),
            wind_dir: compass_label(self.wind_deg),
            precip_mm: self.rain_1h_mm,
            humidity: self.humidity.round().clamp(0.0, 100.0) as u8,
            feels_like: Temperature::from_celsius(self.feels_like_c),
            uv: self.uv_index.max(0.0),
        }
    }

    /// Wall-clock time at the location, `YYYY-MM-DD HH:MM`.
    #[must_use]
    pub fn local_time(&self) -> String {
        DateTime::from_timestamp(self.observed_at + self.utc_offset_secs, 0)
            .map(|ts| ts.naive_utc().format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ForecastClient {
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<RawCurrent, FetchError> {
        debug!(latitude, longitude, "fetching current conditions");
        let stage = FetchStage::CurrentConditions;
        let payload: CurrentResponse =
            get_json(self.request("weather", latitude, longitude), stage).await?;
        parse_current(payload)
    }

    /// Flat, time-ordered samples exactly as the provider lists them.
    pub async fn fetch_samples(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<RawSample>, FetchError> {
        debug!(latitude, longitude, "fetching forecast samples");
        let stage = FetchStage::ForecastSamples;
        let payload: ForecastResponse =
            get_json(self.request("forecast", latitude, longitude), stage).await?;
        parse_samples(payload)
    }

    fn request(&self, endpoint: &str, latitude: f64, longitude: f64) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
            ])
    }
}

fn parse_current(payload: CurrentResponse) -> Result<RawCurrent, FetchError> {
    let condition = payload
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::MalformedResponse {
            stage: FetchStage::CurrentConditions,
            detail: "missing weather condition".to_string(),
        })?;

    Ok(RawCurrent {
        temp_c: payload.main.temp,
        feels_like_c: payload.main.feels_like,
        humidity: payload.main.humidity,
        condition_id: condition.id,
        condition_description: condition.description,
        condition_icon: condition.icon,
        wind_speed_ms: payload.wind.speed,
        wind_deg: payload.wind.deg.unwrap_or_default(),
        rain_1h_mm: payload.rain.and_then(|rain| rain.one_hour).unwrap_or_default(),
        uv_index: payload.uvi.unwrap_or_default(),
        observed_at: payload.dt,
        utc_offset_secs: payload.timezone,
    })
}

fn parse_samples(payload: ForecastResponse) -> Result<Vec<RawSample>, FetchError> {
    payload
        .list
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let condition =
                entry
                    .weather
                    .into_iter()
                    .next()
                    .ok_or_else(|| FetchError::MalformedResponse {
                        stage: FetchStage::ForecastSamples,
                        detail: format!("sample {idx} has no weather condition"),
                    })?;
            Ok(RawSample {
                timestamp: entry.dt_txt,
                temp_c: entry.main.temp,
                condition_id: condition.id,
                condition_main: condition.main,
                condition_icon: condition.icon,
                precip_probability: entry.pop.unwrap_or_default(),
            })
        })
        .collect()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    weather: Vec<ConditionBlock>,
    main: CurrentMain,
    wind: WindBlock,
    #[serde(default)]
    rain: Option<RainBlock>,
    #[serde(default)]
    uvi: Option<f64>,
    dt: i64,
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    id: u32,
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f64,
    #[serde(default)]
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RainBlock {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt_txt: String,
    main: SampleMain,
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SampleMain {
    temp: f64,
}
