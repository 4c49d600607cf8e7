//! HTTP request handlers for the elicitation protocol.
//!
//! Implements the full interview surface using axum: identity and variable
//! submission, pair-sequence fetch, per-pair confirm/decline, graph reads,
//! and finalization.

use crate::render::SharedRenderer;
use crate::sessions::{SessionStore, SessionStoreError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router as AxumRouter,
};
use depmap_domain::traits::ResultsStore;
use depmap_domain::{ElicitError, ElicitationRecord, Pair, Phase, Respondent, SessionId};
use depmap_store::{JsonResultsStore, StoreError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Active sessions
    pub sessions: Arc<SessionStore>,
    /// Render Bridge for graph display artifacts
    pub renderer: SharedRenderer,
    /// Durable storage for finalized sessions
    pub results: Arc<JsonResultsStore>,
}

/// Identity submission request
#[derive(Debug, Deserialize)]
pub struct SubmitIdentityRequest {
    /// Respondent's full name
    pub name: String,
    /// Respondent's role or position
    pub position: String,
    /// Respondent's contact email
    pub email: String,
}

/// Identity submission response
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitIdentityResponse {
    /// Opaque identifier for the newly created session
    pub session_id: SessionId,
}

/// Variable submission request
#[derive(Debug, Deserialize)]
pub struct SubmitVariablesRequest {
    /// Variable names, in the order pairs will be enumerated
    pub variables: Vec<String>,
}

/// Variable submission response
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitVariablesResponse {
    /// Length of the generated pair sequence (N·(N−1))
    pub pair_count: usize,
}

/// Pair sequence response
#[derive(Debug, Serialize, Deserialize)]
pub struct PairsResponse {
    /// The full enumerated sequence for this session's variables
    pub pairs: Vec<Pair>,
    /// Authoritative cursor position (number of answers given)
    pub cursor: usize,
    /// Whether every pair has been answered
    pub complete: bool,
}

/// A per-pair answer ("yes" to `/dependencies`, "no" to `/declines`)
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    /// Influencing variable
    pub source: String,
    /// Influenced variable
    pub target: String,
}

/// Confirmation ("yes") response
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmResponse {
    /// Whether the edge was newly inserted (false on an idempotent retry)
    pub newly_added: bool,
    /// Cursor position after the answer
    pub cursor: usize,
    /// Whether the interview is now complete
    pub complete: bool,
    /// Updated render artifact, when rendering succeeded
    pub image: Option<String>,
    /// Render failure detail; the edge itself is committed regardless
    pub render_error: Option<String>,
}

/// Decline ("no") response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeclineResponse {
    /// Cursor position after the answer
    pub cursor: usize,
    /// Whether the interview is now complete
    pub complete: bool,
}

/// Current graph state, for display and resume
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphResponse {
    /// Render artifact, when rendering succeeded
    pub image: Option<String>,
    /// Render failure detail
    pub render_error: Option<String>,
    /// Confirmed dependencies, in confirmation order
    pub edges: Vec<Pair>,
    /// Authoritative cursor position
    pub cursor: usize,
    /// Whether every pair has been answered
    pub complete: bool,
    /// Session lifecycle phase
    pub phase: Phase,
}

/// Finalization response
#[derive(Debug, Serialize, Deserialize)]
pub struct FinalizeResponse {
    /// The committed record; repeated finalize returns the same record
    pub record: ElicitationRecord,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of active sessions
    pub active_sessions: usize,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable error kind
    pub kind: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed identity fields or rejected variable submission
    Validation(String),
    /// No session exists for the supplied identifier
    UnknownSession(SessionId),
    /// Interview state machine rejected the operation
    Elicit(ElicitError),
    /// Durable storage failed
    Store(StoreError),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::UnknownSession(_) => "unknown_session",
            AppError::Elicit(e) if e.is_validation() => "validation",
            AppError::Elicit(ElicitError::PairMismatch { .. }) => "pair_mismatch",
            AppError::Elicit(ElicitError::CursorExhausted) => "cursor_exhausted",
            AppError::Elicit(_) => "phase_violation",
            AppError::Store(_) => "storage",
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            "validation" => StatusCode::UNPROCESSABLE_ENTITY,
            "unknown_session" => StatusCode::NOT_FOUND,
            "storage" => StatusCode::INTERNAL_SERVER_ERROR,
            // Cursor desyncs are retryable conflicts
            _ => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::UnknownSession(id) => format!("Unknown session: {}", id),
            AppError::Elicit(e) => e.to_string(),
            AppError::Store(e) => e.to_string(),
        };

        let body = Json(ErrorResponse {
            error: message,
            kind: self.kind().to_string(),
        });
        (self.status(), body).into_response()
    }
}

impl From<SessionStoreError> for AppError {
    fn from(e: SessionStoreError) -> Self {
        match e {
            SessionStoreError::UnknownSession(id) => AppError::UnknownSession(id),
        }
    }
}

impl From<ElicitError> for AppError {
    fn from(e: ElicitError) -> Self {
        AppError::Elicit(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn validate_identity(request: SubmitIdentityRequest) -> Result<Respondent, AppError> {
    let name = request.name.trim().to_string();
    let position = request.position.trim().to_string();
    let email = request.email.trim().to_string();

    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if position.is_empty() {
        return Err(AppError::Validation(
            "position must not be empty".to_string(),
        ));
    }
    if !email_pattern().is_match(&email) {
        return Err(AppError::Validation(format!(
            "invalid email address: {}",
            email
        )));
    }

    Ok(Respondent {
        name,
        position,
        email,
    })
}

fn now_epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// POST /sessions - Accept respondent identity and create a session
async fn submit_identity(
    State(state): State<AppState>,
    Json(request): Json<SubmitIdentityRequest>,
) -> Result<Json<SubmitIdentityResponse>, AppError> {
    let respondent = validate_identity(request)?;
    let session_id = state.sessions.create(respondent);
    Ok(Json(SubmitIdentityResponse { session_id }))
}

/// PUT /sessions/:id/variables - Accept the variable list
///
/// Generates the pair sequence and resets cursor and edge set; resubmission
/// restarts elicitation as a fresh pass.
async fn submit_variables(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(request): Json<SubmitVariablesRequest>,
) -> Result<Json<SubmitVariablesResponse>, AppError> {
    let pair_count = state.sessions.with_session(session_id, |session| {
        session.submit_variables(request.variables)?;
        Ok::<_, ElicitError>(session.pair_sequence().map(|p| p.len()).unwrap_or(0))
    })??;

    Ok(Json(SubmitVariablesResponse { pair_count }))
}

/// GET /sessions/:id/pairs - The full pair sequence and authoritative cursor
async fn get_dependency_options(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<PairsResponse>, AppError> {
    let session = state.sessions.snapshot(session_id)?;
    let pairs = session
        .pair_sequence()
        .ok_or(ElicitError::PhaseViolation {
            expected: Phase::ElicitingDependencies,
            actual: session.phase(),
        })?
        .to_vec();

    Ok(Json(PairsResponse {
        pairs,
        cursor: session.cursor_position(),
        complete: session.interview_complete(),
    }))
}

/// POST /sessions/:id/dependencies - Graph Mutator entry point ("yes")
///
/// Validates the answered pair against the cursor, inserts the edge
/// (idempotent), advances the cursor, and re-renders. A render failure is
/// reported in the response body; the confirmed edge is never rolled back.
async fn add_dependency(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<ConfirmResponse>, AppError> {
    let (newly_added, cursor, complete, variables, edges) =
        state.sessions.with_session(session_id, |session| {
            let newly_added = session.confirm(&request.source, &request.target)?;
            Ok::<_, ElicitError>((
                newly_added,
                session.cursor_position(),
                session.interview_complete(),
                session.variables().to_vec(),
                session.edges().clone(),
            ))
        })??;

    let (image, render_error) = match state.renderer.render(&variables, &edges) {
        Ok(artifact) => (Some(artifact.as_str().to_string()), None),
        Err(e) => {
            warn!(session = %session_id, "render failed after confirm: {}", e);
            (None, Some(e.to_string()))
        }
    };

    Ok(Json(ConfirmResponse {
        newly_added,
        cursor,
        complete,
        image,
        render_error,
    }))
}

/// POST /sessions/:id/declines - "No" answer
///
/// The same guarded transition as a confirmation, minus the edge insertion.
async fn decline_dependency(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<DeclineResponse>, AppError> {
    let (cursor, complete) = state.sessions.with_session(session_id, |session| {
        session.decline(&request.source, &request.target)?;
        Ok::<_, ElicitError>((session.cursor_position(), session.interview_complete()))
    })??;

    Ok(Json(DeclineResponse { cursor, complete }))
}

/// GET /sessions/:id/graph - Idempotent read of current graph state
async fn get_current_graph(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<GraphResponse>, AppError> {
    let session = state.sessions.snapshot(session_id)?;

    let (image, render_error) = match state.renderer.render(session.variables(), session.edges()) {
        Ok(artifact) => (Some(artifact.as_str().to_string()), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(Json(GraphResponse {
        image,
        render_error,
        edges: session.edges().as_slice().to_vec(),
        cursor: session.cursor_position(),
        complete: session.interview_complete(),
        phase: session.phase(),
    }))
}

/// POST /sessions/:id/finalize - Commit the edge set to durable storage
///
/// Safe to call repeatedly: the response always carries the record that was
/// committed first.
async fn finalize_session(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<FinalizeResponse>, AppError> {
    let record = state.sessions.with_session(session_id, |session| {
        session.finalize()?;
        Ok::<_, ElicitError>(session.record(now_epoch_secs()))
    })??;

    let committed = state.results.save(&record)?;
    Ok(Json(FinalizeResponse { record: committed }))
}

/// GET /health - Liveness check
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        active_sessions: state.sessions.session_count(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/sessions", post(submit_identity))
        .route("/sessions/:id/variables", put(submit_variables))
        .route("/sessions/:id/pairs", get(get_dependency_options))
        .route("/sessions/:id/dependencies", post(add_dependency))
        .route("/sessions/:id/declines", post(decline_dependency))
        .route("/sessions/:id/graph", get(get_current_graph))
        .route("/sessions/:id/finalize", post(finalize_session))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DotRenderer, RenderError};
    use axum::body::Body;
    use axum::http::Request;
    use depmap_domain::traits::GraphRenderer;
    use depmap_domain::{EdgeSet, RenderArtifact};
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    struct FailingRenderer;

    impl GraphRenderer for FailingRenderer {
        type Error = RenderError;

        fn render(&self, _: &[String], _: &EdgeSet) -> Result<RenderArtifact, RenderError> {
            Err(RenderError::Unavailable("renderer offline".to_string()))
        }
    }

    fn create_test_state() -> (AppState, tempfile::TempDir) {
        create_state_with(Arc::new(DotRenderer::new()))
    }

    fn create_state_with(renderer: SharedRenderer) -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            sessions: Arc::new(SessionStore::new()),
            renderer,
            results: Arc::new(JsonResultsStore::new(dir.path()).unwrap()),
        };
        (state, dir)
    }

    async fn send(
        app: &AxumRouter,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn identity() -> Value {
        json!({
            "name": "Ada Lovelace",
            "position": "Analyst",
            "email": "ada@example.com"
        })
    }

    async fn create_session(app: &AxumRouter) -> String {
        let (status, body) = send(app, "POST", "/sessions", Some(identity())).await;
        assert_eq!(status, StatusCode::OK);
        body["session_id"].as_str().unwrap().to_string()
    }

    async fn create_session_with_variables(app: &AxumRouter, variables: &[&str]) -> String {
        let id = create_session(app).await;
        let (status, _) = send(
            app,
            "PUT",
            &format!("/sessions/{}/variables", id),
            Some(json!({ "variables": variables })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    #[tokio::test]
    async fn test_health_check() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn test_submit_identity_creates_session() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);

        let id = create_session(&app).await;
        assert!(SessionId::parse(&id).is_ok());
    }

    #[tokio::test]
    async fn test_identity_validation() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);

        let (status, body) = send(
            &app,
            "POST",
            "/sessions",
            Some(json!({ "name": "", "position": "Analyst", "email": "a@b.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "validation");

        let (status, body) = send(
            &app,
            "POST",
            "/sessions",
            Some(json!({ "name": "Ada", "position": "Analyst", "email": "not-an-email" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_duplicate_variables_rejected() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/sessions/{}/variables", id),
            Some(json!({ "variables": ["X", "X"] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "validation");
        assert!(body["error"].as_str().unwrap().contains("duplicate"));

        // No pair sequence may exist after the rejection
        let (status, body) = send(&app, "GET", &format!("/sessions/{}/pairs", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "phase_violation");
    }

    #[tokio::test]
    async fn test_insufficient_variables_rejected() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/sessions/{}/variables", id),
            Some(json!({ "variables": ["Only"] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("at least 2"));
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);
        let missing = SessionId::new();

        let (status, body) =
            send(&app, "GET", &format!("/sessions/{}/pairs", missing), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "unknown_session");
    }

    #[tokio::test]
    async fn test_pair_sequence_matches_enumerator() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);
        let id = create_session_with_variables(&app, &["A", "B", "C"]).await;

        let (status, body) = send(&app, "GET", &format!("/sessions/{}/pairs", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cursor"], 0);
        assert_eq!(body["complete"], false);

        let pairs: Vec<Pair> = serde_json::from_value(body["pairs"].clone()).unwrap();
        assert_eq!(
            pairs,
            vec![
                Pair::new("A", "B"),
                Pair::new("A", "C"),
                Pair::new("B", "A"),
                Pair::new("B", "C"),
                Pair::new("C", "A"),
                Pair::new("C", "B"),
            ]
        );
    }

    #[tokio::test]
    async fn test_price_demand_end_to_end() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);
        let id = create_session_with_variables(&app, &["Price", "Demand"]).await;

        // Yes: Price influences Demand
        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{}/dependencies", id),
            Some(json!({ "source": "Price", "target": "Demand" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["newly_added"], true);
        assert_eq!(body["cursor"], 1);
        assert_eq!(body["complete"], false);
        assert!(body["image"]
            .as_str()
            .unwrap()
            .starts_with("data:text/vnd.graphviz;base64,"));

        // No: Demand does not influence Price
        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{}/declines", id),
            Some(json!({ "source": "Demand", "target": "Price" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cursor"], 2);
        assert_eq!(body["complete"], true);

        // Final edge set is exactly {Price -> Demand}
        let (status, body) = send(&app, "GET", &format!("/sessions/{}/graph", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let edges: Vec<Pair> = serde_json::from_value(body["edges"].clone()).unwrap();
        assert_eq!(edges, vec![Pair::new("Price", "Demand")]);
        assert_eq!(body["complete"], true);
    }

    #[tokio::test]
    async fn test_out_of_cursor_confirm_fails() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);
        let id = create_session_with_variables(&app, &["A", "B", "C"]).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{}/dependencies", id),
            Some(json!({ "source": "C", "target": "A" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "pair_mismatch");

        // Edge set unchanged, cursor did not move
        let (_, body) = send(&app, "GET", &format!("/sessions/{}/graph", id), None).await;
        assert_eq!(body["edges"].as_array().unwrap().len(), 0);
        assert_eq!(body["cursor"], 0);
    }

    #[tokio::test]
    async fn test_replayed_confirm_after_advance_fails() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);
        let id = create_session_with_variables(&app, &["A", "B"]).await;

        let answer = json!({ "source": "A", "target": "B" });
        let (status, _) = send(
            &app,
            "POST",
            &format!("/sessions/{}/dependencies", id),
            Some(answer.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // A retried request that arrives after the cursor moved is rejected
        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{}/dependencies", id),
            Some(answer),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "pair_mismatch");

        let (_, body) = send(&app, "GET", &format!("/sessions/{}/graph", id), None).await;
        assert_eq!(body["edges"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_render_failure_keeps_confirmed_edge() {
        let (state, _dir) = create_state_with(Arc::new(FailingRenderer));
        let app = create_router(state);
        let id = create_session_with_variables(&app, &["A", "B"]).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{}/dependencies", id),
            Some(json!({ "source": "A", "target": "B" })),
        )
        .await;
        // Mutation and render are not transactional: the answer succeeds
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["newly_added"], true);
        assert_eq!(body["cursor"], 1);
        assert!(body["image"].is_null());
        assert!(body["render_error"]
            .as_str()
            .unwrap()
            .contains("renderer offline"));

        let (_, body) = send(&app, "GET", &format!("/sessions/{}/graph", id), None).await;
        let edges: Vec<Pair> = serde_json::from_value(body["edges"].clone()).unwrap();
        assert_eq!(edges, vec![Pair::new("A", "B")]);
    }

    #[tokio::test]
    async fn test_resubmitting_variables_restarts_elicitation() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);
        let id = create_session_with_variables(&app, &["A", "B"]).await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/sessions/{}/dependencies", id),
            Some(json!({ "source": "A", "target": "B" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Backward navigation: edit variables and resubmit
        let (status, body) = send(
            &app,
            "PUT",
            &format!("/sessions/{}/variables", id),
            Some(json!({ "variables": ["A", "B", "C"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pair_count"], 6);

        let (_, body) = send(&app, "GET", &format!("/sessions/{}/graph", id), None).await;
        assert_eq!(body["edges"].as_array().unwrap().len(), 0);
        assert_eq!(body["cursor"], 0);
    }

    #[tokio::test]
    async fn test_finalize_is_repeat_safe() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);
        let id = create_session_with_variables(&app, &["Price", "Demand"]).await;

        send(
            &app,
            "POST",
            &format!("/sessions/{}/dependencies", id),
            Some(json!({ "source": "Price", "target": "Demand" })),
        )
        .await;
        send(
            &app,
            "POST",
            &format!("/sessions/{}/declines", id),
            Some(json!({ "source": "Demand", "target": "Price" })),
        )
        .await;

        let (status, first) =
            send(&app, "POST", &format!("/sessions/{}/finalize", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let record: ElicitationRecord =
            serde_json::from_value(first["record"].clone()).unwrap();
        assert_eq!(record.dependencies, vec![Pair::new("Price", "Demand")]);

        let (status, second) =
            send(&app, "POST", &format!("/sessions/{}/finalize", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, second);

        // Answers after finalization are rejected
        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{}/dependencies", id),
            Some(json!({ "source": "Price", "target": "Demand" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "phase_violation");
    }
}
