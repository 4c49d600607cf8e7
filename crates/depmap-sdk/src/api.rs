//! Wire types and HTTP transport for the elicitation protocol.
//!
//! The protocol surface is abstracted behind [`ElicitationApi`] so the
//! interview controller can be driven against a scripted transport in
//! tests; [`HttpApi`] is the production reqwest implementation.

use crate::error::SdkError;
use async_trait::async_trait;
use depmap_domain::{ElicitationRecord, Pair, Phase, Respondent, SessionId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Pair sequence plus the server's authoritative cursor
#[derive(Debug, Clone, Deserialize)]
pub struct PairsResponse {
    /// The full enumerated sequence for the session's variables
    pub pairs: Vec<Pair>,
    /// Number of answers the server has already applied
    pub cursor: usize,
    /// Whether every pair has been answered
    pub complete: bool,
}

/// Result of a "yes" answer
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmResponse {
    /// Whether the edge was newly inserted
    pub newly_added: bool,
    /// Cursor position after the answer
    pub cursor: usize,
    /// Whether the interview is now complete
    pub complete: bool,
    /// Updated render artifact, when rendering succeeded
    pub image: Option<String>,
    /// Render failure detail; the edge is committed regardless
    pub render_error: Option<String>,
}

/// Result of a "no" answer
#[derive(Debug, Clone, Deserialize)]
pub struct DeclineResponse {
    /// Cursor position after the answer
    pub cursor: usize,
    /// Whether the interview is now complete
    pub complete: bool,
}

/// Current graph state, for display and resume
#[derive(Debug, Clone, Deserialize)]
pub struct GraphResponse {
    /// Render artifact, when rendering succeeded
    pub image: Option<String>,
    /// Render failure detail
    pub render_error: Option<String>,
    /// Confirmed dependencies
    pub edges: Vec<Pair>,
    /// Authoritative cursor position
    pub cursor: usize,
    /// Whether every pair has been answered
    pub complete: bool,
    /// Session lifecycle phase
    pub phase: Phase,
}

/// Result of finalization
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeResponse {
    /// The committed record
    pub record: ElicitationRecord,
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    source: &'a str,
    target: &'a str,
}

#[derive(Debug, Serialize)]
struct SubmitVariablesRequest<'a> {
    variables: &'a [String],
}

#[derive(Debug, Deserialize)]
struct SubmitIdentityResponse {
    session_id: SessionId,
}

#[derive(Debug, Deserialize)]
struct SubmitVariablesResponse {
    pair_count: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    kind: String,
}

/// Transport abstraction over the elicitation protocol
#[async_trait]
pub trait ElicitationApi {
    /// Submit respondent identity; returns the new session id
    async fn submit_identity(&self, respondent: &Respondent) -> Result<SessionId, SdkError>;

    /// Submit the variable list; returns the generated pair count
    async fn submit_variables(
        &self,
        session: SessionId,
        variables: &[String],
    ) -> Result<usize, SdkError>;

    /// Fetch the pair sequence and authoritative cursor
    async fn get_dependency_options(&self, session: SessionId)
        -> Result<PairsResponse, SdkError>;

    /// Apply a "yes" answer for the given pair
    async fn add_dependency(
        &self,
        session: SessionId,
        pair: &Pair,
    ) -> Result<ConfirmResponse, SdkError>;

    /// Apply a "no" answer for the given pair
    async fn decline_dependency(
        &self,
        session: SessionId,
        pair: &Pair,
    ) -> Result<DeclineResponse, SdkError>;

    /// Fetch current graph state
    async fn get_current_graph(&self, session: SessionId) -> Result<GraphResponse, SdkError>;

    /// Commit the session's edge set to durable storage
    async fn finalize(&self, session: SessionId) -> Result<FinalizeResponse, SdkError>;
}

/// reqwest-backed implementation of the protocol
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for a server base URL (e.g. `http://localhost:8080`)
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SdkError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => Err(classify(body)),
            Err(_) => Err(SdkError::Server(format!("HTTP {}: {}", status, text))),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SdkError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn put_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SdkError> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }
}

fn classify(body: ErrorResponse) -> SdkError {
    match body.kind.as_str() {
        "validation" => SdkError::Validation(body.error),
        "unknown_session" => SdkError::UnknownSession,
        "pair_mismatch" => SdkError::PairMismatch(body.error),
        _ => SdkError::Rejected {
            kind: body.kind,
            message: body.error,
        },
    }
}

#[async_trait]
impl ElicitationApi for HttpApi {
    async fn submit_identity(&self, respondent: &Respondent) -> Result<SessionId, SdkError> {
        let response: SubmitIdentityResponse = self.post_json("/sessions", respondent).await?;
        Ok(response.session_id)
    }

    async fn submit_variables(
        &self,
        session: SessionId,
        variables: &[String],
    ) -> Result<usize, SdkError> {
        let response: SubmitVariablesResponse = self
            .put_json(
                &format!("/sessions/{}/variables", session),
                &SubmitVariablesRequest { variables },
            )
            .await?;
        Ok(response.pair_count)
    }

    async fn get_dependency_options(
        &self,
        session: SessionId,
    ) -> Result<PairsResponse, SdkError> {
        self.get_json(&format!("/sessions/{}/pairs", session)).await
    }

    async fn add_dependency(
        &self,
        session: SessionId,
        pair: &Pair,
    ) -> Result<ConfirmResponse, SdkError> {
        self.post_json(
            &format!("/sessions/{}/dependencies", session),
            &AnswerRequest {
                source: &pair.source,
                target: &pair.target,
            },
        )
        .await
    }

    async fn decline_dependency(
        &self,
        session: SessionId,
        pair: &Pair,
    ) -> Result<DeclineResponse, SdkError> {
        self.post_json(
            &format!("/sessions/{}/declines", session),
            &AnswerRequest {
                source: &pair.source,
                target: &pair.target,
            },
        )
        .await
    }

    async fn get_current_graph(&self, session: SessionId) -> Result<GraphResponse, SdkError> {
        self.get_json(&format!("/sessions/{}/graph", session)).await
    }

    async fn finalize(&self, session: SessionId) -> Result<FinalizeResponse, SdkError> {
        self.post_json(&format!("/sessions/{}/finalize", session), &serde_json::json!({}))
            .await
    }
}
