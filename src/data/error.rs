use std::fmt;

use thiserror::Error;

/// The three sequential provider calls behind one location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Geocode,
    CurrentConditions,
    ForecastSamples,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Geocode => "geocode",
            Self::CurrentConditions => "current conditions",
            Self::ForecastSamples => "forecast samples",
        })
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("location not found: {query}")]
    GeocodeNotFound { query: String },

    #[error("{stage} request returned HTTP {status}")]
    Upstream { stage: FetchStage, status: u16 },

    #[error("{stage} request failed")]
    Transport {
        stage: FetchStage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} response was malformed: {detail}")]
    MalformedResponse { stage: FetchStage, detail: String },

    #[error("no weather provider API key configured")]
    MissingApiKey,
}

impl FetchError {
    #[must_use]
    pub fn stage(&self) -> Option<FetchStage> {
        match self {
            Self::GeocodeNotFound { .. } => Some(FetchStage::Geocode),
            Self::Upstream { stage, .. }
            | Self::Transport { stage, .. }
            | Self::MalformedResponse { stage, .. } => Some(*stage),
            Self::MissingApiKey => None,
        }
    }

    /// Network-level failures (connect, timeout, body read). HTTP error
    /// statuses are surfaced to the caller and never retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Short text for the presentation layer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::GeocodeNotFound { query } => format!("Location not found: {query}"),
            Self::MissingApiKey => {
                "Weather service is not configured (missing API key)".to_string()
            }
            Self::Upstream { status: 401, .. } => {
                "Weather service rejected the API key".to_string()
            }
            Self::Upstream { .. } | Self::Transport { .. } | Self::MalformedResponse { .. } => {
                "Failed to load weather data. Please try again.".to_string()
            }
        }
    }
}
