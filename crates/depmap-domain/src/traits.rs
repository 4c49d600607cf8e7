//! Trait definitions for external interactions
//!
//! These traits define the boundaries between interview logic and
//! infrastructure. Implementations live in other crates: graph rendering in
//! the server (Render Bridge) and durable results storage in depmap-store.

use crate::graph::EdgeSet;
use crate::pair::Pair;
use crate::session::{Respondent, SessionId};
use serde::{Deserialize, Serialize};

/// An opaque visual representation of current graph state.
///
/// Produced by a [`GraphRenderer`] after every mutation and on resume;
/// consumers display it, they never interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderArtifact(String);

impl RenderArtifact {
    /// Wrap an encoded artifact (typically a `data:` URI)
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded artifact
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trait for producing a display artifact from current graph state
///
/// Implemented by the rendering layer. Rendering is deliberately not
/// transactional with edge mutation: a failed render never rolls back a
/// confirmed edge.
pub trait GraphRenderer {
    /// Error type for render operations
    type Error;

    /// Render the graph over the given variables and confirmed edges
    fn render(&self, variables: &[String], edges: &EdgeSet) -> Result<RenderArtifact, Self::Error>;
}

/// Final elicitation result committed to durable storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElicitationRecord {
    /// Session the record was produced by
    pub session_id: SessionId,
    /// Who answered the interview
    pub respondent: Respondent,
    /// The variable set, in submission order
    pub variables: Vec<String>,
    /// Confirmed dependencies, in confirmation order
    pub dependencies: Vec<Pair>,
    /// Commit timestamp (Unix epoch seconds)
    pub saved_at: u64,
}

/// Trait for committing finalized sessions to durable storage
///
/// Implemented by the infrastructure layer (depmap-store). `save` must be
/// repeat-safe: committing the same session twice returns the record that
/// was committed first.
pub trait ResultsStore {
    /// Error type for store operations
    type Error;

    /// Commit a record, or return the already-committed record for the
    /// same session
    fn save(&self, record: &ElicitationRecord) -> Result<ElicitationRecord, Self::Error>;

    /// Load the committed record for a session, if any
    fn load(&self, session_id: SessionId) -> Result<Option<ElicitationRecord>, Self::Error>;
}
