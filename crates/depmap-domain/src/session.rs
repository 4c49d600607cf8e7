//! Session lifecycle state machine.
//!
//! A session is one respondent's end-to-end interview. It is created once
//! identity has been collected, accumulates variables and confirmed edges,
//! and moves strictly forward through its lifecycle phases except for
//! explicit backward navigation (resubmitting variables), which regenerates
//! the pair sequence from scratch.

use crate::error::ElicitError;
use crate::graph::EdgeSet;
use crate::pair::{enumerate_pairs, Pair, PairCursor};
use crate::traits::ElicitationRecord;
use crate::variable::validate_variables;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-assigned session identifier (UUID v4).
///
/// Immutable once assigned; every protocol call after identity submission
/// must carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("invalid session id: {}", e))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the person being interviewed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Respondent {
    /// Full name
    pub name: String,
    /// Role or position
    pub position: String,
    /// Contact email
    pub email: String,
}

/// Lifecycle phase of a session.
///
/// `CollectingIdentity` is the client-side phase before a session record
/// exists server-side; a constructed [`Session`] starts at
/// `CollectingVariables`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Gathering respondent identity (pre-session)
    CollectingIdentity,
    /// Waiting for the variable list
    CollectingVariables,
    /// Walking the pair sequence
    ElicitingDependencies,
    /// Edge set committed to durable storage
    Finalized,
}

impl Phase {
    /// Kebab-case name, matching the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::CollectingIdentity => "collecting-identity",
            Phase::CollectingVariables => "collecting-variables",
            Phase::ElicitingDependencies => "eliciting-dependencies",
            Phase::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One respondent's interview state.
///
/// Edges are mutated only through [`confirm`](Session::confirm), the cursor
/// only through answers, and both are discarded together whenever variables
/// are resubmitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    respondent: Respondent,
    variables: Vec<String>,
    cursor: Option<PairCursor>,
    edges: EdgeSet,
    phase: Phase,
}

impl Session {
    /// Create a session for a respondent whose identity has been accepted
    pub fn new(respondent: Respondent) -> Self {
        Self {
            id: SessionId::new(),
            respondent,
            variables: Vec::new(),
            cursor: None,
            edges: EdgeSet::new(),
            phase: Phase::CollectingVariables,
        }
    }

    /// The immutable session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The respondent this session belongs to
    pub fn respondent(&self) -> &Respondent {
        &self.respondent
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The submitted variable list, in submission order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Confirmed dependencies so far
    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    /// The fixed pair sequence, if variables have been submitted
    pub fn pair_sequence(&self) -> Option<&[Pair]> {
        self.cursor.as_ref().map(|c| c.pairs())
    }

    /// Number of pairs answered so far (zero before variables are submitted)
    pub fn cursor_position(&self) -> usize {
        self.cursor.as_ref().map(|c| c.position()).unwrap_or(0)
    }

    /// The pair currently awaiting an answer
    pub fn current_pair(&self) -> Option<&Pair> {
        self.cursor.as_ref().and_then(|c| c.current())
    }

    /// Whether every pair has been answered
    pub fn interview_complete(&self) -> bool {
        self.cursor.as_ref().map(|c| c.is_complete()).unwrap_or(false)
    }

    /// Accept the variable list and enter `eliciting-dependencies`.
    ///
    /// Validates the names, generates the full pair sequence, and resets the
    /// cursor. Resubmission (backward navigation) is allowed until the
    /// session is finalized and discards any previously confirmed edges:
    /// editing the variable set changes the pair universe, so elicitation
    /// restarts as a fresh pass.
    pub fn submit_variables(&mut self, names: Vec<String>) -> Result<(), ElicitError> {
        if self.phase == Phase::Finalized {
            return Err(ElicitError::PhaseViolation {
                expected: Phase::CollectingVariables,
                actual: self.phase,
            });
        }

        validate_variables(&names)?;
        let pairs = enumerate_pairs(&names)?;

        self.variables = names;
        self.cursor = Some(PairCursor::new(pairs));
        self.edges = EdgeSet::new();
        self.phase = Phase::ElicitingDependencies;
        Ok(())
    }

    /// Apply a "yes" answer for the pair under the cursor.
    ///
    /// Inserts the edge if absent (idempotent on retry) and always advances
    /// the cursor. Returns whether the edge was newly inserted. Fails with
    /// [`ElicitError::PairMismatch`] if the answered pair is not the one
    /// under the cursor, leaving the edge set unchanged.
    pub fn confirm(&mut self, source: &str, target: &str) -> Result<bool, ElicitError> {
        let pair = self.match_current(source, target)?;
        let newly_added = self.edges.insert(pair);
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.advance()?;
        }
        Ok(newly_added)
    }

    /// Apply a "no" answer for the pair under the cursor.
    ///
    /// The same transition as [`confirm`](Session::confirm) with an implicit
    /// skip: no edge mutation, but the cursor still advances and the same
    /// pair-equality guard applies.
    pub fn decline(&mut self, source: &str, target: &str) -> Result<(), ElicitError> {
        self.match_current(source, target)?;
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.advance()?;
        }
        Ok(())
    }

    /// Commit the session. Idempotent: finalizing an already finalized
    /// session succeeds without further effect.
    pub fn finalize(&mut self) -> Result<(), ElicitError> {
        match self.phase {
            Phase::ElicitingDependencies => {
                self.phase = Phase::Finalized;
                Ok(())
            }
            Phase::Finalized => Ok(()),
            other => Err(ElicitError::PhaseViolation {
                expected: Phase::ElicitingDependencies,
                actual: other,
            }),
        }
    }

    /// Snapshot the session for durable storage
    pub fn record(&self, saved_at: u64) -> ElicitationRecord {
        ElicitationRecord {
            session_id: self.id,
            respondent: self.respondent.clone(),
            variables: self.variables.clone(),
            dependencies: self.edges.as_slice().to_vec(),
            saved_at,
        }
    }

    /// Verify the answered pair equals the one under the cursor
    fn match_current(&self, source: &str, target: &str) -> Result<Pair, ElicitError> {
        if self.phase != Phase::ElicitingDependencies {
            return Err(ElicitError::PhaseViolation {
                expected: Phase::ElicitingDependencies,
                actual: self.phase,
            });
        }

        let current = self
            .cursor
            .as_ref()
            .and_then(|c| c.current())
            .ok_or(ElicitError::CursorExhausted)?;

        if current.source != source || current.target != target {
            return Err(ElicitError::PairMismatch {
                expected: current.clone(),
                got: Pair::new(source, target),
            });
        }

        Ok(current.clone())
    }
}
