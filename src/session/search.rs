use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::config::Settings;
use crate::core::{Criteria, CriteriaUpdate};
use crate::models::{Candidate, DegreeLevel, SearchFilters};
use crate::services::{BackendClient, BackendError};

/// Where the candidate collection comes from.
///
/// The orchestrator only needs the two search entry points; keeping them
/// behind a trait lets tests drive it with scripted responses and delays.
#[async_trait]
pub trait CandidateSource: Send + Sync + 'static {
    /// Full, unfiltered collection (`GET candidates`).
    async fn fetch_all(&self) -> Result<Vec<Candidate>, BackendError>;

    /// Faceted search (`POST candidates/search`).
    async fn search(&self, filters: &SearchFilters) -> Result<Vec<Candidate>, BackendError>;
}

#[async_trait]
impl CandidateSource for BackendClient {
    async fn fetch_all(&self) -> Result<Vec<Candidate>, BackendError> {
        self.fetch_candidates().await
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<Candidate>, BackendError> {
        self.search_candidates(filters).await
    }
}

/// Lifecycle of the visible candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Initial load in flight, nothing to show yet.
    Loading,
    /// At least one search has succeeded; the list is authoritative.
    Ready,
    /// No search has ever succeeded; terminal until a manual retry.
    Disconnected,
}

/// An applied search result, tagged with what produced it.
#[derive(Debug, Clone)]
pub struct SearchResultSet {
    /// Issuance sequence number of the request that produced this set.
    pub sequence: u64,
    /// The criteria snapshot the backend evaluated.
    pub criteria: Criteria,
    pub candidates: Arc<Vec<Candidate>>,
}

/// Immutable view of the orchestrator's state, published on every change.
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    /// Current (possibly not-yet-searched) criteria.
    pub criteria: Criteria,
    pub status: SearchStatus,
    /// A request is in flight whose outcome has not been observed yet.
    pub pending: bool,
    /// Transient failure message; the previous result stays visible.
    pub error: Option<String>,
    /// Most recent applied result, if any search has succeeded.
    pub result: Option<SearchResultSet>,
}

impl SearchSnapshot {
    pub fn candidates(&self) -> &[Candidate] {
        self.result
            .as_ref()
            .map(|r| r.candidates.as_slice())
            .unwrap_or(&[])
    }
}

enum Command {
    Apply(CriteriaUpdate),
    Reset,
    Retry,
}

#[derive(Debug, Clone, Copy)]
enum SearchKind {
    FullReload,
    Filtered,
}

struct SearchResponse {
    sequence: u64,
    criteria: Criteria,
    outcome: Result<Vec<Candidate>, BackendError>,
}

/// Cloneable front end to a running orchestrator.
#[derive(Clone)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SearchSnapshot>,
}

impl SearchHandle {
    pub fn apply(&self, update: CriteriaUpdate) {
        let _ = self.commands.send(Command::Apply(update));
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.apply(CriteriaUpdate::SearchTerm(term.into()));
    }

    pub fn toggle_skill(&self, name: impl Into<String>) {
        self.apply(CriteriaUpdate::ToggleSkill(name.into()));
    }

    pub fn set_min_experience(&self, years: u32) {
        self.apply(CriteriaUpdate::MinExperience(years));
    }

    pub fn set_min_degree_level(&self, level: Option<DegreeLevel>) {
        self.apply(CriteriaUpdate::MinDegreeLevel(level));
    }

    pub fn set_profile(&self, profile: Option<String>) {
        self.apply(CriteriaUpdate::Profile(profile));
    }

    /// Restore default criteria and reload the full collection immediately.
    pub fn reset(&self) {
        let _ = self.commands.send(Command::Reset);
    }

    /// Manual recovery from the disconnected state.
    pub fn retry(&self) {
        let _ = self.commands.send(Command::Retry);
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn watch(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.clone()
    }
}

/// Owns the authoritative criteria and candidate list.
///
/// All mutations funnel through one event loop: criteria edits restart a
/// debounce timer; expiry issues a sequence-numbered request; responses are
/// reconciled last-issued-wins. Superseded requests are not cancelled
/// remotely, their responses are discarded on arrival.
pub struct SearchOrchestrator<S> {
    source: Arc<S>,
    debounce: Duration,
    criteria: Criteria,
    status: SearchStatus,
    error: Option<String>,
    result: Option<SearchResultSet>,
    next_sequence: u64,
    highest_issued: u64,
    latest_seen: u64,
    deadline: Option<Instant>,
    commands: mpsc::UnboundedReceiver<Command>,
    responses_tx: mpsc::UnboundedSender<SearchResponse>,
    responses: mpsc::UnboundedReceiver<SearchResponse>,
    state_tx: watch::Sender<SearchSnapshot>,
}

impl<S: CandidateSource> SearchOrchestrator<S> {
    /// Spawn the orchestrator event loop and return its handle.
    ///
    /// The initial unfiltered load is issued immediately, not debounced.
    pub fn spawn(source: Arc<S>, debounce: Duration) -> SearchHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        let initial = SearchSnapshot {
            criteria: Criteria::default(),
            status: SearchStatus::Loading,
            pending: true,
            error: None,
            result: None,
        };
        let (state_tx, state_rx) = watch::channel(initial);

        let orchestrator = Self {
            source,
            debounce,
            criteria: Criteria::default(),
            status: SearchStatus::Loading,
            error: None,
            result: None,
            next_sequence: 0,
            highest_issued: 0,
            latest_seen: 0,
            deadline: None,
            commands: command_rx,
            responses_tx: response_tx,
            responses: response_rx,
            state_tx,
        };
        tokio::spawn(orchestrator.run());

        SearchHandle {
            commands: command_tx,
            state: state_rx,
        }
    }

    /// Spawn with the configured debounce window.
    pub fn spawn_with_settings(source: Arc<S>, settings: &Settings) -> SearchHandle {
        Self::spawn(source, Duration::from_millis(settings.search.debounce_ms))
    }

    async fn run(mut self) {
        self.issue(SearchKind::FullReload);

        loop {
            let wake = self.deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Apply(update)) => {
                        self.criteria.apply(update);
                        self.deadline = Some(Instant::now() + self.debounce);
                        self.publish();
                    }
                    Some(Command::Reset) => {
                        self.criteria.reset();
                        self.deadline = None;
                        self.issue(SearchKind::FullReload);
                    }
                    Some(Command::Retry) => {
                        self.deadline = None;
                        self.issue(SearchKind::FullReload);
                    }
                    // All handles dropped; nothing can observe us anymore.
                    None => break,
                },
                response = self.responses.recv() => {
                    if let Some(response) = response {
                        self.reconcile(response);
                    }
                }
                _ = tokio::time::sleep_until(wake), if self.deadline.is_some() => {
                    self.deadline = None;
                    self.issue(SearchKind::Filtered);
                }
            }
        }
    }

    /// Send one request, tagged with the next sequence number.
    fn issue(&mut self, kind: SearchKind) {
        self.next_sequence += 1;
        let sequence = self.next_sequence;
        self.highest_issued = sequence;

        let source = Arc::clone(&self.source);
        let responses = self.responses_tx.clone();
        let criteria = self.criteria.clone();

        tracing::debug!("Issuing search #{} ({:?})", sequence, kind);
        tokio::spawn(async move {
            let outcome = match kind {
                SearchKind::FullReload => source.fetch_all().await,
                SearchKind::Filtered => source.search(&criteria.to_filters()).await,
            };
            let _ = responses.send(SearchResponse {
                sequence,
                criteria,
                outcome,
            });
        });

        self.publish();
    }

    /// Apply a response unless a newer one has already been observed.
    fn reconcile(&mut self, response: SearchResponse) {
        if response.sequence <= self.latest_seen {
            tracing::debug!(
                "Discarding stale response #{} (latest seen #{})",
                response.sequence,
                self.latest_seen
            );
            return;
        }
        self.latest_seen = response.sequence;

        match response.outcome {
            Ok(candidates) => {
                tracing::debug!(
                    "Applying response #{} ({} candidates)",
                    response.sequence,
                    candidates.len()
                );
                self.result = Some(SearchResultSet {
                    sequence: response.sequence,
                    criteria: response.criteria,
                    candidates: Arc::new(candidates),
                });
                self.status = SearchStatus::Ready;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Search #{} failed: {}", response.sequence, e);
                self.error = Some(e.to_string());
                if self.status != SearchStatus::Ready {
                    // Nothing was ever shown; only a manual retry recovers.
                    self.status = SearchStatus::Disconnected;
                }
            }
        }

        self.publish();
    }

    fn publish(&self) {
        let snapshot = SearchSnapshot {
            criteria: self.criteria.clone(),
            status: self.status,
            pending: self.highest_issued > self.latest_seen,
            error: self.error.clone(),
            result: self.result.clone(),
        };
        let _ = self.state_tx.send(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    #[derive(Debug, Clone, PartialEq)]
    enum LoggedRequest {
        FullReload,
        Filtered(SearchFilters),
    }

    struct ScriptedCall {
        delay: Duration,
        outcome: Result<Vec<Candidate>, BackendError>,
    }

    /// Candidate source that pops pre-scripted outcomes, recording every
    /// request it receives.
    struct ScriptedSource {
        plan: Mutex<VecDeque<ScriptedCall>>,
        log: Mutex<Vec<LoggedRequest>>,
    }

    impl ScriptedSource {
        fn new(plan: Vec<ScriptedCall>) -> Arc<Self> {
            Arc::new(Self {
                plan: Mutex::new(plan.into()),
                log: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<LoggedRequest> {
            self.log.lock().unwrap().clone()
        }

        async fn next(&self, request: LoggedRequest) -> Result<Vec<Candidate>, BackendError> {
            let call = {
                let mut plan = self.plan.lock().unwrap();
                self.log.lock().unwrap().push(request);
                plan.pop_front().expect("unplanned request")
            };
            tokio::time::sleep(call.delay).await;
            call.outcome
        }
    }

    #[async_trait]
    impl CandidateSource for ScriptedSource {
        async fn fetch_all(&self) -> Result<Vec<Candidate>, BackendError> {
            self.next(LoggedRequest::FullReload).await
        }

        async fn search(&self, filters: &SearchFilters) -> Result<Vec<Candidate>, BackendError> {
            self.next(LoggedRequest::Filtered(filters.clone())).await
        }
    }

    fn candidate(id: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("Candidate {}", id),
            email: format!("{}@example.com", id),
            years_of_experience: 3,
            profile: None,
            skills: vec![],
            degree: None,
            experiences: vec![],
        }
    }

    fn ok(ids: &[&str]) -> Result<Vec<Candidate>, BackendError> {
        Ok(ids.iter().map(|id| candidate(id)).collect())
    }

    fn immediate(outcome: Result<Vec<Candidate>, BackendError>) -> ScriptedCall {
        ScriptedCall {
            delay: Duration::ZERO,
            outcome,
        }
    }

    fn delayed(ms: u64, outcome: Result<Vec<Candidate>, BackendError>) -> ScriptedCall {
        ScriptedCall {
            delay: Duration::from_millis(ms),
            outcome,
        }
    }

    async fn wait_for(
        rx: &mut watch::Receiver<SearchSnapshot>,
        mut predicate: impl FnMut(&SearchSnapshot) -> bool,
    ) -> SearchSnapshot {
        tokio::time::timeout(Duration::from_secs(60), async {
            loop {
                {
                    let snapshot = rx.borrow();
                    if predicate(&snapshot) {
                        return snapshot.clone();
                    }
                }
                rx.changed().await.expect("orchestrator stopped");
            }
        })
        .await
        .expect("condition never reached")
    }

    fn ids(snapshot: &SearchSnapshot) -> Vec<String> {
        snapshot.candidates().iter().map(|c| c.id.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_load_is_immediate_and_unfiltered() {
        let source = ScriptedSource::new(vec![immediate(ok(&["1", "2", "3"]))]);
        let handle = SearchOrchestrator::spawn(Arc::clone(&source), DEBOUNCE);
        let mut rx = handle.watch();

        let snapshot = wait_for(&mut rx, |s| s.status == SearchStatus::Ready).await;
        assert_eq!(ids(&snapshot), vec!["1", "2", "3"]);
        assert!(!snapshot.pending);
        assert_eq!(source.requests(), vec![LoggedRequest::FullReload]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_a_burst_into_one_request() {
        let source = ScriptedSource::new(vec![
            immediate(ok(&["1", "2", "3"])),
            immediate(ok(&["2"])),
        ]);
        let handle = SearchOrchestrator::spawn(Arc::clone(&source), DEBOUNCE);
        let mut rx = handle.watch();
        wait_for(&mut rx, |s| s.status == SearchStatus::Ready).await;

        // A rapid burst of edits within one debounce window.
        handle.set_search_term("al");
        handle.toggle_skill("SQL");
        handle.set_min_experience(5);

        let snapshot = wait_for(&mut rx, |s| !s.pending && s.result.is_some() && ids(s) == ["2"]).await;
        assert_eq!(snapshot.criteria.min_experience, 5);

        let requests = source.requests();
        assert_eq!(requests.len(), 2, "burst must produce exactly one search");
        match &requests[1] {
            LoggedRequest::Filtered(filters) => {
                assert_eq!(filters.search_term, "al");
                assert_eq!(filters.skills, vec!["SQL"]);
                assert_eq!(filters.min_experience, 5);
            }
            other => panic!("expected filtered search, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        // Request #2 outlives request #3; the slower, earlier-issued
        // response must not overwrite the newer one.
        let source = ScriptedSource::new(vec![
            immediate(ok(&["1", "2", "3"])),
            delayed(500, ok(&["old"])),
            delayed(10, ok(&["new"])),
        ]);
        let handle = SearchOrchestrator::spawn(Arc::clone(&source), DEBOUNCE);
        let mut rx = handle.watch();
        wait_for(&mut rx, |s| s.status == SearchStatus::Ready).await;

        handle.set_search_term("a");
        // Once the first debounce fires the slow request is in flight;
        // supersede it right away so both overlap.
        wait_for(&mut rx, |s| s.pending).await;
        handle.set_search_term("ab");

        let snapshot = wait_for(&mut rx, |s| !s.pending && !ids(s).is_empty() && ids(s) != ["1", "2", "3"]).await;
        assert_eq!(ids(&snapshot), vec!["new"]);

        // The superseded response arrives later and must still be ignored.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(ids(&handle.snapshot()), vec!["new"]);
        assert_eq!(source.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_bypasses_debounce_and_reloads() {
        let source = ScriptedSource::new(vec![
            immediate(ok(&["1", "2"])),
            immediate(ok(&["1", "2"])),
        ]);
        let handle = SearchOrchestrator::spawn(Arc::clone(&source), DEBOUNCE);
        let mut rx = handle.watch();
        wait_for(&mut rx, |s| s.status == SearchStatus::Ready).await;

        handle.toggle_skill("Python");
        handle.reset();

        let snapshot = wait_for(&mut rx, |s| !s.pending && s.criteria.is_unfiltered()).await;
        assert_eq!(ids(&snapshot), vec!["1", "2"]);

        // The pending debounce was cancelled: no filtered search ever ran.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(
            source.requests(),
            vec![LoggedRequest::FullReload, LoggedRequest::FullReload]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_success_keeps_previous_result() {
        let source = ScriptedSource::new(vec![
            immediate(ok(&["1", "2"])),
            immediate(Err(BackendError::Api("boom".to_string()))),
        ]);
        let handle = SearchOrchestrator::spawn(Arc::clone(&source), DEBOUNCE);
        let mut rx = handle.watch();
        wait_for(&mut rx, |s| s.status == SearchStatus::Ready).await;

        handle.set_search_term("x");
        let snapshot = wait_for(&mut rx, |s| s.error.is_some() && !s.pending).await;

        assert_eq!(snapshot.status, SearchStatus::Ready);
        assert_eq!(ids(&snapshot), vec!["1", "2"]);
        assert!(snapshot.error.as_deref().unwrap().contains("boom"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_failure_is_terminal_until_retry() {
        let source = ScriptedSource::new(vec![
            immediate(Err(BackendError::Api("offline".to_string()))),
            immediate(ok(&["1"])),
        ]);
        let handle = SearchOrchestrator::spawn(Arc::clone(&source), DEBOUNCE);
        let mut rx = handle.watch();

        let snapshot = wait_for(&mut rx, |s| s.status == SearchStatus::Disconnected).await;
        assert!(snapshot.result.is_none());
        assert!(snapshot.error.is_some());

        handle.retry();
        let snapshot = wait_for(&mut rx, |s| s.status == SearchStatus::Ready).await;
        assert_eq!(ids(&snapshot), vec!["1"]);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reflects_edits_before_the_search_runs() {
        let source = ScriptedSource::new(vec![immediate(ok(&["1"])), immediate(ok(&[]))]);
        let handle = SearchOrchestrator::spawn(Arc::clone(&source), DEBOUNCE);
        let mut rx = handle.watch();
        wait_for(&mut rx, |s| s.status == SearchStatus::Ready).await;

        handle.toggle_skill("Rust");
        let snapshot = wait_for(&mut rx, |s| !s.criteria.required_skills.is_empty()).await;
        assert!(snapshot.criteria.required_skills.contains("Rust"));
        // The applied result still describes the unfiltered request.
        assert!(snapshot.result.as_ref().unwrap().criteria.is_unfiltered());
    }
}
