use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{
    error::{FetchError, FetchStage},
    get_json, http_client,
};

pub const GEOCODE_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";

/// A geocoding hit, before the weather calls fill in local time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Resolves a free-text query to the single best match.
    pub async fn resolve(
        &self,
        query: &str,
        country_code: Option<&str>,
    ) -> Result<ResolvedPlace, FetchError> {
        debug!(query, ?country_code, "geocoding location");

        let request = self.client.get(&self.base_url).query(&[
            ("q", query),
            ("limit", "5"),
            ("appid", self.api_key.as_str()),
        ]);
        let results: Vec<GeocodeResult> = get_json(request, FetchStage::Geocode).await?;

        rank_places(results, query, country_code)
            .into_iter()
            .next()
            .map(|scored| scored.place)
            .ok_or_else(|| FetchError::GeocodeNotFound {
                query: query.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Clone)]
struct ScoredPlace {
    place: ResolvedPlace,
    exact_name_match: bool,
    country_match: bool,
    api_order: usize,
}

fn rank_places(
    results: Vec<GeocodeResult>,
    query: &str,
    country_code: Option<&str>,
) -> Vec<ScoredPlace> {
    let normalized_query = normalize(query);

    let mut scored: Vec<ScoredPlace> = results
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let country = entry.country.unwrap_or_default();
            let exact_name_match = normalize(&entry.name) == normalized_query;
            let country_match =
                country_code.is_some_and(|code| country.eq_ignore_ascii_case(code));

            ScoredPlace {
                place: ResolvedPlace {
                    name: entry.name,
                    country,
                    state: entry.state,
                    latitude: entry.lat,
                    longitude: entry.lon,
                },
                exact_name_match,
                country_match,
                api_order: idx,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.exact_name_match
            .cmp(&a.exact_name_match)
            .then_with(|| b.country_match.cmp(&a.country_match))
            .then_with(|| a.api_order.cmp(&b.api_order))
    });

    scored
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
