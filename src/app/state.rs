use std::{path::PathBuf, sync::Arc};

use chrono::Utc;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    app::{
        events::{AppEvent, schedule_retry},
        settings::{RuntimeSettings, save_runtime_settings},
    },
    data::{
        error::FetchError,
        provider::{WeatherProvider, build_snapshot},
    },
    domain::{
        activities::{ActivitySuggestion, suggest},
        weather::{Units, WeatherSnapshot},
    },
    resilience::{
        backoff::Backoff,
        freshness::{FreshnessState, RefreshMetadata},
    },
};

mod methods_fetch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// What happened to a fetch result when it reached the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// A newer request had started; the result was dropped.
    Superseded,
}

/// Owner of the single weather snapshot slot.
///
/// Every request bumps `generation`; a result is only committed when it
/// carries the current generation, so completion order on the network never
/// decides what the user sees. A failure keeps the last good snapshot.
#[derive(Debug)]
pub struct AppState {
    pub running: bool,
    pub units: Units,
    pub settings: RuntimeSettings,
    pub refresh_meta: RefreshMetadata,
    mode: LoadState,
    snapshot: Option<WeatherSnapshot>,
    last_error: Option<FetchError>,
    generation: u64,
    active_query: Option<String>,
    committed_query: Option<String>,
    in_flight: Option<JoinHandle<()>>,
    backoff: Backoff,
    provider: Arc<dyn WeatherProvider>,
    settings_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        settings: RuntimeSettings,
        settings_path: Option<PathBuf>,
    ) -> Self {
        Self {
            running: true,
            units: settings.units,
            settings,
            refresh_meta: RefreshMetadata::default(),
            mode: LoadState::Idle,
            snapshot: None,
            last_error: None,
            generation: 0,
            active_query: None,
            committed_query: None,
            in_flight: None,
            backoff: Backoff::default(),
            provider,
            settings_path,
        }
    }

    /// Applies one event. Fetch results report whether they were committed.
    pub fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Option<CommitOutcome> {
        match event {
            AppEvent::RequestLocation(query) => {
                self.request_location(query, tx);
                None
            }
            AppEvent::FetchSucceeded {
                generation,
                snapshot,
            } => Some(self.commit_success(generation, *snapshot)),
            AppEvent::FetchFailed { generation, error } => {
                Some(self.commit_failure(generation, error, tx))
            }
            AppEvent::TickRefresh => {
                self.handle_tick_refresh(tx);
                None
            }
            AppEvent::RetryDue { generation } => {
                self.handle_retry_due(generation, tx);
                None
            }
            AppEvent::Quit => {
                self.running = false;
                None
            }
        }
    }

    #[must_use]
    pub fn mode(&self) -> LoadState {
        self.mode
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(FetchError::user_message)
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn active_query(&self) -> Option<&str> {
        self.active_query.as_deref()
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self.mode, LoadState::Ready | LoadState::Failed)
    }

    /// Recomputed on every call from the current snapshot.
    #[must_use]
    pub fn suggestions(&self) -> Vec<ActivitySuggestion> {
        self.snapshot
            .as_ref()
            .map(|snapshot| suggest(&snapshot.current))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn freshness(&self) -> FreshnessState {
        self.refresh_meta.state()
    }

    pub fn set_units(&mut self, units: Units) {
        if self.units == units {
            return;
        }
        self.units = units;
        self.settings.units = units;
        self.persist_settings();
    }

    fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(err) = save_runtime_settings(path, &self.settings) {
            warn!(path = %path.display(), error = %err, "failed to persist settings");
        }
    }
}
