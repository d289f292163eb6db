#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use futures::{FutureExt, future::BoxFuture};
use tokio::sync::Notify;
use weatherwise::{
    data::{
        error::{FetchError, FetchStage},
        forecast::RawCurrent,
        geocode::ResolvedPlace,
        provider::{RawWeather, WeatherProvider},
    },
    domain::forecast::RawSample,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    NotFound,
    ServerError,
    Offline,
}

/// Provider double: per-query scripted outcomes and optional gates that hold
/// a fetch open until the test releases it.
#[derive(Debug, Default)]
pub struct FakeProvider {
    scripts: Mutex<HashMap<String, VecDeque<Outcome>>>,
    gates: HashMap<String, Arc<Notify>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcomes are consumed in order; once exhausted the query succeeds.
    pub fn script(self, query: &str, outcomes: &[Outcome]) -> Self {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(query.to_string(), outcomes.iter().copied().collect());
        }
        self
    }

    pub fn gated(mut self, query: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gates.insert(query.to_string(), Arc::clone(&gate));
        (self, gate)
    }

    fn next_outcome(&self, query: &str) -> Outcome {
        self.scripts
            .lock()
            .ok()
            .and_then(|mut scripts| scripts.get_mut(query).and_then(VecDeque::pop_front))
            .unwrap_or(Outcome::Ok)
    }
}

impl WeatherProvider for FakeProvider {
    fn fetch_raw_weather<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<RawWeather, FetchError>> {
        async move {
            if let Some(gate) = self.gates.get(query) {
                gate.notified().await;
            }
            match self.next_outcome(query) {
                Outcome::Ok => Ok(raw_weather(query, 18.0)),
                Outcome::NotFound => Err(FetchError::GeocodeNotFound {
                    query: query.to_string(),
                }),
                Outcome::ServerError => Err(FetchError::Upstream {
                    stage: FetchStage::ForecastSamples,
                    status: 502,
                }),
                Outcome::Offline => Err(offline_error().await),
            }
        }
        .boxed()
    }
}

/// A real transport error without touching the network.
pub async fn offline_error() -> FetchError {
    match reqwest::Client::new().get("not a url").send().await {
        Err(source) => FetchError::Transport {
            stage: FetchStage::CurrentConditions,
            source,
        },
        Ok(_) => panic!("invalid url unexpectedly produced a response"),
    }
}

pub fn raw_weather(name: &str, temp_c: f64) -> RawWeather {
    RawWeather {
        place: ResolvedPlace {
            name: name.to_string(),
            country: "GB".to_string(),
            state: None,
            latitude: 51.5074,
            longitude: -0.1278,
        },
        current: RawCurrent {
            temp_c,
            feels_like_c: temp_c - 1.0,
            humidity: 55.0,
            condition_id: 803,
            condition_description: "broken clouds".to_string(),
            condition_icon: "04d".to_string(),
            wind_speed_ms: 4.0,
            wind_deg: 200.0,
            rain_1h_mm: 0.0,
            uv_index: 0.0,
            observed_at: 1_707_732_000,
            utc_offset_secs: 0,
        },
        samples: vec![
            sample("2024-02-12 12:00:00", temp_c - 2.0, 803, "Clouds", 0.1),
            sample("2024-02-12 15:00:00", temp_c + 2.0, 803, "Clouds", 0.3),
            sample("2024-02-13 12:00:00", temp_c, 500, "Rain", 0.9),
        ],
    }
}

pub fn sample(timestamp: &str, temp_c: f64, id: u32, main: &str, pop: f64) -> RawSample {
    RawSample {
        timestamp: timestamp.to_string(),
        temp_c,
        condition_id: id,
        condition_main: main.to_string(),
        condition_icon: String::new(),
        precip_probability: pop,
    }
}
