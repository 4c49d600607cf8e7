//! The interview controller state machine.
//!
//! Drives the client side of the elicitation loop: fetch the pair sequence
//! once, then present one pair at a time, round-trip each answer, and track
//! completion. All transitions are explicit so the controller is testable
//! against any [`ElicitationApi`] implementation, independent of display.

use crate::api::{ElicitationApi, FinalizeResponse};
use crate::error::SdkError;
use depmap_domain::{Pair, SessionId};

/// Controller state.
///
/// `Asking` holds the index of the pair currently presented; it mirrors the
/// server cursor and is re-synchronized from the server after every answer
/// and on resume, never trusted across reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Variables accepted server-side, sequence not yet fetched
    Idle,
    /// Pair sequence fetch in flight
    AwaitingPairs,
    /// Presenting the pair at this index
    Asking(usize),
    /// Every pair answered; no further questions
    Complete,
}

/// Outcome of a single answered pair
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    /// Whether a "yes" inserted a new edge (always false for "no")
    pub newly_added: bool,
    /// Render failure reported by the server; the answer itself succeeded
    pub render_error: Option<String>,
    /// Whether the interview is now complete
    pub complete: bool,
}

/// Drives one elicitation interview over an [`ElicitationApi`]
pub struct InterviewController<A: ElicitationApi> {
    api: A,
    session: SessionId,
    pairs: Vec<Pair>,
    state: ControllerState,
    latest_render: Option<String>,
}

impl<A: ElicitationApi> InterviewController<A> {
    /// Create a controller for a session whose variables have been accepted
    pub fn new(api: A, session: SessionId) -> Self {
        Self {
            api,
            session,
            pairs: Vec::new(),
            state: ControllerState::Idle,
            latest_render: None,
        }
    }

    /// The session this controller drives
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Current controller state
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The pair currently awaiting an answer
    pub fn current_question(&self) -> Option<&Pair> {
        match self.state {
            ControllerState::Asking(index) => self.pairs.get(index),
            _ => None,
        }
    }

    /// (answered, total) progress through the pair sequence
    pub fn progress(&self) -> (usize, usize) {
        let answered = match self.state {
            ControllerState::Asking(index) => index,
            ControllerState::Complete => self.pairs.len(),
            _ => 0,
        };
        (answered, self.pairs.len())
    }

    /// The most recent render artifact received from the server
    pub fn latest_render(&self) -> Option<&str> {
        self.latest_render.as_deref()
    }

    /// Whether the interview is complete
    pub fn is_complete(&self) -> bool {
        self.state == ControllerState::Complete
    }

    /// Fetch the pair sequence and the initial render, then enter `Asking`
    /// (or `Complete` directly if the sequence is already exhausted or,
    /// guarded but unreachable for N ≥ 2, empty).
    pub async fn start(&mut self) -> Result<(), SdkError> {
        self.state = ControllerState::AwaitingPairs;
        self.sync().await
    }

    /// Re-fetch authoritative cursor and graph state from the server.
    ///
    /// Used after a reload or a reported desync; local memory of the cursor
    /// is discarded entirely.
    pub async fn resume(&mut self) -> Result<(), SdkError> {
        self.sync().await
    }

    async fn sync(&mut self) -> Result<(), SdkError> {
        let options = self.api.get_dependency_options(self.session).await?;
        let graph = self.api.get_current_graph(self.session).await?;

        self.pairs = options.pairs;
        self.latest_render = graph.image;
        self.enter(options.cursor, options.complete);
        Ok(())
    }

    /// Answer the current pair: `true` confirms the dependency, `false`
    /// declines it.
    ///
    /// On any error the controller stays on the same pair, so the caller
    /// re-presents the question and may retry.
    pub async fn answer(&mut self, confirmed: bool) -> Result<AnswerOutcome, SdkError> {
        let index = match self.state {
            ControllerState::Asking(index) => index,
            _ => return Err(SdkError::NoPendingQuestion),
        };
        let pair = self.pairs[index].clone();

        if confirmed {
            let response = self.api.add_dependency(self.session, &pair).await?;
            if let Some(image) = response.image {
                self.latest_render = Some(image);
            }
            self.enter(response.cursor, response.complete);
            Ok(AnswerOutcome {
                newly_added: response.newly_added,
                render_error: response.render_error,
                complete: self.is_complete(),
            })
        } else {
            let response = self.api.decline_dependency(self.session, &pair).await?;
            self.enter(response.cursor, response.complete);
            Ok(AnswerOutcome {
                newly_added: false,
                render_error: None,
                complete: self.is_complete(),
            })
        }
    }

    /// Commit the interview's edge set to durable storage
    pub async fn finish(&self) -> Result<FinalizeResponse, SdkError> {
        self.api.finalize(self.session).await
    }

    fn enter(&mut self, cursor: usize, complete: bool) {
        self.state = if complete || cursor >= self.pairs.len() {
            ControllerState::Complete
        } else {
            ControllerState::Asking(cursor)
        };
    }
}
