use std::time::Duration;

use rand::Rng;
use tokio::{sync::mpsc, time::sleep};

use crate::{data::error::FetchError, domain::weather::WeatherSnapshot};

#[derive(Debug)]
pub enum AppEvent {
    RequestLocation(String),
    FetchSucceeded {
        generation: u64,
        snapshot: Box<WeatherSnapshot>,
    },
    FetchFailed {
        generation: u64,
        error: FetchError,
    },
    TickRefresh,
    RetryDue {
        generation: u64,
    },
    Quit,
}

/// Periodic refresh ticks with +/-10% jitter.
pub fn start_refresh_task(tx: mpsc::Sender<AppEvent>, refresh_secs: u64) {
    tokio::spawn(async move {
        let base = refresh_secs.max(10);
        loop {
            let wait_secs = {
                let mut rng = rand::rng();
                let jitter = rng.random_range(-0.1f64..0.1f64);
                ((base as f64) * (1.0 + jitter)).max(1.0)
            };
            sleep(Duration::from_secs_f64(wait_secs)).await;
            if tx.send(AppEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    });
}

pub fn schedule_retry(tx: mpsc::Sender<AppEvent>, delay: Duration, generation: u64) {
    tokio::spawn(async move {
        sleep(delay).await;
        let _ = tx.send(AppEvent::RetryDue { generation }).await;
    });
}
