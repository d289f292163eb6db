use super::*;

impl AppState {
    /// Starts a user-initiated fetch, superseding anything in flight.
    pub fn request_location(
        &mut self,
        query: impl Into<String>,
        tx: &mpsc::Sender<AppEvent>,
    ) -> u64 {
        self.backoff.reset();
        self.issue_request(query.into(), tx)
    }

    pub(crate) fn issue_request(&mut self, query: String, tx: &mpsc::Sender<AppEvent>) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        self.mode = LoadState::Loading;
        self.active_query = Some(query.clone());
        self.refresh_meta.mark_attempt();
        debug!(generation, query = %query, "weather requested");

        let provider = Arc::clone(&self.provider);
        let tx = tx.clone();
        let handle = tokio::spawn(async move {
            let event = match provider.fetch_raw_weather(&query).await {
                Ok(raw) => AppEvent::FetchSucceeded {
                    generation,
                    snapshot: Box::new(build_snapshot(&raw, Utc::now())),
                },
                Err(error) => AppEvent::FetchFailed { generation, error },
            };
            let _ = tx.send(event).await;
        });

        if let Some(previous) = self.in_flight.replace(handle) {
            previous.abort();
        }
        generation
    }

    pub(crate) fn commit_success(
        &mut self,
        generation: u64,
        snapshot: WeatherSnapshot,
    ) -> CommitOutcome {
        if self.is_superseded(generation) {
            return CommitOutcome::Superseded;
        }

        info!(
            generation,
            location = %snapshot.location.display_name(),
            days = snapshot.forecast.len(),
            "weather ready"
        );
        self.settings.push_recent_location(&snapshot.location.name);
        self.persist_settings();

        self.snapshot = Some(snapshot);
        self.mode = LoadState::Ready;
        self.last_error = None;
        self.in_flight = None;
        self.committed_query.clone_from(&self.active_query);
        self.refresh_meta.mark_success();
        self.backoff.reset();
        CommitOutcome::Committed
    }

    pub(crate) fn commit_failure(
        &mut self,
        generation: u64,
        error: FetchError,
        tx: &mpsc::Sender<AppEvent>,
    ) -> CommitOutcome {
        if self.is_superseded(generation) {
            return CommitOutcome::Superseded;
        }

        warn!(generation, stage = ?error.stage(), error = %error, "weather fetch failed");
        self.mode = LoadState::Failed;
        self.in_flight = None;
        self.refresh_meta.mark_failure();

        if error.is_transient()
            && let Some(delay) = self.backoff.next_delay()
        {
            debug!(generation, delay_secs = delay.as_secs(), "retry scheduled");
            schedule_retry(tx.clone(), delay, generation);
        }
        self.last_error = Some(error);
        CommitOutcome::Committed
    }

    pub(crate) fn handle_retry_due(&mut self, generation: u64, tx: &mpsc::Sender<AppEvent>) {
        if generation != self.generation || self.mode != LoadState::Failed {
            debug!(generation, current = self.generation, "dropping stale retry");
            return;
        }
        if let Some(query) = self.active_query.clone() {
            self.issue_request(query, tx);
        }
    }

    /// Refreshes whatever is on screen; failures are left to the retry path.
    pub(crate) fn handle_tick_refresh(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if !self.settings.refresh_enabled() || self.mode != LoadState::Ready {
            return;
        }
        if let Some(query) = self.committed_query.clone() {
            self.issue_request(query, tx);
        }
    }

    fn is_superseded(&self, generation: u64) -> bool {
        if generation == self.generation {
            return false;
        }
        debug!(
            generation,
            current = self.generation,
            "discarding superseded result"
        );
        true
    }
}
