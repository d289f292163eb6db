use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use futures::{FutureExt, future::BoxFuture};
use tracing::debug;

use super::{
    error::FetchError,
    forecast::{ForecastClient, RawCurrent, WEATHER_URL},
    geocode::{GEOCODE_URL, GeocodeClient, ResolvedPlace},
};
use crate::{
    cli::Cli,
    domain::{
        forecast::{RawSample, normalize_forecast},
        weather::{Location, WeatherSnapshot},
    },
};

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Everything the provider needs from the outside world.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub geocode_url: String,
    pub weather_url: String,
    pub country_code: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("geocode_url", &self.geocode_url)
            .field("weather_url", &self.weather_url)
            .field("country_code", &self.country_code)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            geocode_url: GEOCODE_URL.to_string(),
            weather_url: WEATHER_URL.to_string(),
            country_code: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// `--api-key` wins over the environment.
    pub fn from_cli(cli: &Cli) -> Self {
        let api_key = cli
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .unwrap_or_default();
        let mut config = Self::new(api_key.trim());
        if let Some(url) = &cli.geocode_url {
            config.geocode_url.clone_from(url);
        }
        if let Some(url) = &cli.weather_url {
            config.weather_url.clone_from(url);
        }
        config.country_code.clone_from(&cli.country_code);
        config
    }
}

/// Raw provider output for one location query.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWeather {
    pub place: ResolvedPlace,
    pub current: RawCurrent,
    pub samples: Vec<RawSample>,
}

/// Source of raw weather for a free-text location query.
///
/// Implementations run their stages in order and stop at the first failure.
pub trait WeatherProvider: Send + Sync + fmt::Debug {
    fn fetch_raw_weather<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<RawWeather, FetchError>>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    geocoder: GeocodeClient,
    forecast: ForecastClient,
    country_code: Option<String>,
    has_api_key: bool,
}

impl OpenWeatherProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            geocoder: GeocodeClient::with_base_url(
                config.geocode_url.clone(),
                config.api_key.clone(),
                config.timeout,
            ),
            forecast: ForecastClient::with_base_url(
                config.weather_url.clone(),
                config.api_key.clone(),
                config.timeout,
            ),
            country_code: config.country_code.clone(),
            has_api_key: !config.api_key.is_empty(),
        }
    }

    pub async fn fetch(&self, query: &str) -> Result<RawWeather, FetchError> {
        if !self.has_api_key {
            return Err(FetchError::MissingApiKey);
        }

        let place = self
            .geocoder
            .resolve(query, self.country_code.as_deref())
            .await?;
        debug!(name = %place.name, country = %place.country, "location resolved");

        let current = self
            .forecast
            .fetch_current(place.latitude, place.longitude)
            .await?;
        let samples = self
            .forecast
            .fetch_samples(place.latitude, place.longitude)
            .await?;

        Ok(RawWeather {
            place,
            current,
            samples,
        })
    }
}

impl WeatherProvider for OpenWeatherProvider {
    fn fetch_raw_weather<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<RawWeather, FetchError>> {
        self.fetch(query).boxed()
    }
}

/// Normalizes a raw fetch into the snapshot the rest of the app reads.
#[must_use]
pub fn build_snapshot(raw: &RawWeather, fetched_at: DateTime<Utc>) -> WeatherSnapshot {
    WeatherSnapshot {
        location: Location {
            name: raw.place.name.clone(),
            country: raw.place.country.clone(),
            latitude: raw.place.latitude,
            longitude: raw.place.longitude,
            local_time: raw.current.local_time(),
        },
        current: raw.current.to_conditions(),
        forecast: normalize_forecast(&raw.samples),
        fetched_at,
    }
}
