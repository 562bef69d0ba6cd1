//! Query session controller: the single owner of the request lifecycle.
//!
//! Transitions are synchronous `&mut self` calls. The network round trip
//! lives in a [`PendingQuery`] that the caller awaits (or spawns) and hands
//! back through [`QuerySession::apply`], so the state machine itself never
//! blocks and never knows what UI drives it.

use std::{future::IntoFuture, sync::Arc};

use futures::future::BoxFuture;
use shared::domain::{QueryRequest, QueryResult};
use tracing::{debug, info, warn};

use crate::{error::QueryError, QueryBackend};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle { draft_text: String },
    Submitting { draft_text: String },
    Succeeded { result: QueryResult },
    Failed { message: String, draft_text: String },
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle {
            draft_text: String::new(),
        }
    }
}

/// A submitted request that has not been sent yet. Awaiting it performs
/// exactly one backend call.
///
/// The session stays in `Submitting` until the resulting completion is
/// passed to [`QuerySession::apply`]. Dropping a `PendingQuery` unawaited
/// leaves the session busy until [`QuerySession::reset`].
#[must_use = "the query is only sent when awaited, and the session stays busy until its completion is applied"]
pub struct PendingQuery {
    generation: u64,
    request: QueryRequest,
    backend: Arc<dyn QueryBackend>,
}

impl PendingQuery {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }
}

impl IntoFuture for PendingQuery {
    type Output = QueryCompletion;
    type IntoFuture = BoxFuture<'static, QueryCompletion>;

    fn into_future(self) -> Self::IntoFuture {
        let PendingQuery {
            generation,
            request,
            backend,
        } = self;
        Box::pin(async move {
            let outcome = backend.query(request).await;
            QueryCompletion {
                generation,
                outcome,
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct QueryCompletion {
    pub generation: u64,
    pub outcome: Result<QueryResult, QueryError>,
}

pub struct QuerySession {
    backend: Arc<dyn QueryBackend>,
    state: SessionState,
    generation: u64,
}

impl QuerySession {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            backend,
            state: SessionState::default(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The text the user is editing, if the current state carries one.
    pub fn draft_text(&self) -> Option<&str> {
        match &self.state {
            SessionState::Idle { draft_text }
            | SessionState::Submitting { draft_text }
            | SessionState::Failed { draft_text, .. } => Some(draft_text),
            SessionState::Succeeded { .. } => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SessionState::Submitting { .. })
    }

    /// Whether `submit` would issue a request right now.
    pub fn can_submit(&self) -> bool {
        match &self.state {
            SessionState::Idle { draft_text } | SessionState::Failed { draft_text, .. } => {
                !draft_text.trim().is_empty()
            }
            SessionState::Submitting { .. } | SessionState::Succeeded { .. } => false,
        }
    }

    /// Replaces the draft. Ignored while a query is in flight; otherwise any
    /// failure or displayed result is dismissed.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        if self.is_submitting() {
            debug!(
                generation = self.generation,
                "draft edit ignored while a query is in flight"
            );
            return;
        }
        self.state = SessionState::Idle {
            draft_text: text.into(),
        };
    }

    /// Moves to `Submitting` and returns the request to run, or `None` if the
    /// session is busy, showing a result, or the draft is blank.
    ///
    /// The caller owns the returned query: await it and `apply` the
    /// completion, or `reset` the session if it is abandoned.
    #[must_use = "the session stays in Submitting until the pending query is awaited and applied"]
    pub fn submit(&mut self) -> Option<PendingQuery> {
        let draft_text = match &self.state {
            SessionState::Idle { draft_text } | SessionState::Failed { draft_text, .. } => {
                draft_text.clone()
            }
            SessionState::Submitting { .. } => {
                debug!(
                    generation = self.generation,
                    "submit ignored while a query is in flight"
                );
                return None;
            }
            SessionState::Succeeded { .. } => return None,
        };
        let Some(request) = QueryRequest::from_draft(&draft_text) else {
            debug!("submit ignored for blank draft");
            return None;
        };

        self.generation += 1;
        self.state = SessionState::Submitting { draft_text };
        info!(
            generation = self.generation,
            question_chars = request.question.chars().count(),
            "submitting legal query"
        );

        Some(PendingQuery {
            generation: self.generation,
            request,
            backend: Arc::clone(&self.backend),
        })
    }

    /// Applies a finished request. Returns `false` when the completion is
    /// stale and was dropped.
    pub fn apply(&mut self, completion: QueryCompletion) -> bool {
        if completion.generation != self.generation {
            debug!(
                completion_generation = completion.generation,
                generation = self.generation,
                "discarding stale query completion"
            );
            return false;
        }
        let SessionState::Submitting { draft_text } = &mut self.state else {
            debug!(
                generation = self.generation,
                "discarding completion for a session that is not submitting"
            );
            return false;
        };
        let draft_text = std::mem::take(draft_text);

        self.state = match completion.outcome {
            Ok(result) => {
                info!(
                    generation = self.generation,
                    sources = result.sources.len(),
                    total_sources = result.total_sources,
                    "legal query resolved"
                );
                SessionState::Succeeded { result }
            }
            Err(error) => {
                warn!(generation = self.generation, %error, "legal query failed");
                SessionState::Failed {
                    message: error.user_message(),
                    draft_text,
                }
            }
        };
        true
    }

    /// Submits, waits for the backend and applies the outcome. Returns
    /// `false` if nothing was submitted.
    pub async fn submit_and_wait(&mut self) -> bool {
        let Some(pending) = self.submit() else {
            return false;
        };
        let completion = pending.await;
        self.apply(completion)
    }

    /// Back to an empty `Idle`. Any request still in flight is orphaned and
    /// its completion will be discarded.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = SessionState::default();
        debug!(generation = self.generation, "query session reset");
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
