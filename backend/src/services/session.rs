//! Chart session: the caller-side scheduling layer around the pipeline.
//!
//! A session owns the current [`SelectionState`] and the last accepted
//! observations, fetches new observations from an injected source when the
//! team set changes, and recomputes [`ChartData`] on demand.
//!
//! Fetches are gated by a [`RequestGate`]: each fetch takes a generation
//! token, and a completed fetch may update the session only if no newer
//! fetch (or selection change) has started since. Slow, stale responses are
//! dropped instead of overwriting newer data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::db::repository::RatingRecordSource;
use crate::db::services::fetch_observations_or_empty;
use crate::models::{ChartData, DateBounds, RatingObservation, SelectionState};

use super::trends::compute_chart_data;

/// Generation token handed out by a [`RequestGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Monotonic request-generation counter.
#[derive(Debug, Default)]
pub struct RequestGate {
    latest: AtomicU64,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier token.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Supersede every outstanding token without starting a request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

/// Consumer of computed chart data, such as a plotting front end.
pub trait ChartRenderer {
    fn render(&mut self, chart: &ChartData);
}

/// Result of a session refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh observations were stored.
    Applied { observations: usize },
    /// The source failed; the session now holds no observations and an error message.
    Degraded { message: String },
    /// A newer request started while this one was in flight; nothing changed.
    Stale,
    /// The selection change did not require new data.
    Unchanged,
}

#[derive(Default)]
struct SessionState {
    selection: SelectionState,
    bounds: DateBounds,
    observations: Vec<RatingObservation>,
    error: Option<String>,
}

/// Per-viewer chart state bound to a rating source.
pub struct ChartSession {
    source: Arc<dyn RatingRecordSource>,
    gate: RequestGate,
    state: RwLock<SessionState>,
}

impl ChartSession {
    pub fn new(source: Arc<dyn RatingRecordSource>) -> Self {
        Self {
            source,
            gate: RequestGate::new(),
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn selection(&self) -> SelectionState {
        self.state.read().selection.clone()
    }

    pub fn bounds(&self) -> DateBounds {
        self.state.read().bounds
    }

    /// Message from the last failed fetch, if the current data is degraded.
    pub fn last_error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Replace the selection. Returns `true` when the team set changed and
    /// the session needs a refresh; in-flight fetches are then invalidated.
    pub fn set_selection(&self, selection: SelectionState) -> bool {
        let mut state = self.state.write();
        let teams_changed = state.selection.teams != selection.teams;
        state.selection = selection;
        if teams_changed {
            self.gate.invalidate();
        }
        teams_changed
    }

    /// Replace the date bounds. Returns `true` when they changed.
    pub fn set_bounds(&self, bounds: DateBounds) -> bool {
        let mut state = self.state.write();
        let changed = state.bounds != bounds;
        state.bounds = bounds;
        if changed {
            self.gate.invalidate();
        }
        changed
    }

    /// Replace the selection and refresh only if the team set changed.
    pub async fn update_selection(&self, selection: SelectionState) -> RefreshOutcome {
        if self.set_selection(selection) {
            self.refresh().await
        } else {
            RefreshOutcome::Unchanged
        }
    }

    /// Fetch observations for the current selection.
    pub async fn refresh(&self) -> RefreshOutcome {
        // Selection changes invalidate under the write lock, so the token
        // must be taken while the snapshot's read lock is still held.
        let (teams, bounds, token) = {
            let state = self.state.read();
            (state.selection.teams.clone(), state.bounds, self.gate.begin())
        };

        let (observations, error) =
            fetch_observations_or_empty(self.source.as_ref(), &teams, bounds).await;

        let mut state = self.state.write();
        if !self.gate.is_current(token) {
            log::debug!("Discarding stale fetch result ({:?})", token);
            return RefreshOutcome::Stale;
        }

        let count = observations.len();
        state.observations = observations;
        state.error = error.clone();
        match error {
            Some(message) => RefreshOutcome::Degraded { message },
            None => RefreshOutcome::Applied {
                observations: count,
            },
        }
    }

    /// Chart data for the current selection and observations.
    pub fn chart(&self) -> ChartData {
        let state = self.state.read();
        compute_chart_data(&state.observations, &state.selection)
    }

    /// Compute the chart and hand it to `renderer`.
    pub fn render_to<R: ChartRenderer + ?Sized>(&self, renderer: &mut R) {
        let chart = self.chart();
        renderer.render(&chart);
    }
}
