pub mod error;
pub mod forecast;
pub mod geocode;
pub mod provider;

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::warn;

use self::error::{FetchError, FetchStage};

/// Client with a per-request timeout. If the TLS backend cannot be set up the
/// plain default client is used instead, and that client has no timeout.
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|err| {
        warn!(
            error = %err,
            ?timeout,
            "http client build failed; falling back to a client without a timeout"
        );
        Client::new()
    })
}

/// Sends one provider request and decodes its JSON body, tagging every
/// failure with the stage it happened in.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    stage: FetchStage,
) -> Result<T, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|source| FetchError::Transport { stage, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Upstream {
            stage,
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| FetchError::Transport { stage, source })?;

    serde_json::from_slice(&body).map_err(|err| FetchError::MalformedResponse {
        stage,
        detail: err.to_string(),
    })
}
