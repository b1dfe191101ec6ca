//! REST endpoints for the interview front-end contract.
//!
//! Each session owns its `InterviewState` exclusively; the session map is the
//! only point of synchronization. The front end drives transitions, and when
//! `advance` reports finalize it fetches the completed document exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::explain::Explainer;
use crate::interview::state::{InterviewState, Transition};
use crate::pdf::FormRenderer;
use crate::schema::{Question, QuestionSchema};

/// One live interview session.
struct Session {
    state: InterviewState,
    created_at: DateTime<Utc>,
}

/// Shared state for the interview routes.
#[derive(Clone)]
pub struct InterviewRouteState {
    pub schema: Arc<QuestionSchema>,
    pub renderer: Arc<FormRenderer>,
    pub explainer: Arc<Explainer>,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl InterviewRouteState {
    pub fn new(
        schema: Arc<QuestionSchema>,
        renderer: Arc<FormRenderer>,
        explainer: Arc<Explainer>,
    ) -> Self {
        Self {
            schema,
            renderer,
            explainer,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// The current question, rendered for display.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub session_id: Uuid,
    pub index: usize,
    pub total: usize,
    /// e.g. "Question 3 of 17"
    pub progress: String,
    pub question: Question,
    /// Stored answer for re-display when revisiting a question.
    pub value: String,
    pub can_go_back: bool,
    pub at_last: bool,
    /// True when the terminal forward transition fired: the front end should
    /// now fetch the completed document (exactly once).
    pub finalize: bool,
}

impl QuestionView {
    fn from_state(session_id: Uuid, state: &InterviewState, finalize: bool) -> Self {
        let (question, value) = state.current();
        Self {
            session_id,
            index: state.step(),
            total: state.total(),
            progress: format!("Question {} of {}", state.step() + 1, state.total()),
            question: question.clone(),
            value: value.to_string(),
            can_go_back: state.step() > 0,
            at_last: state.step() + 1 == state.total(),
            finalize,
        }
    }
}

/// Raw value passed back from the front end on every transition.
#[derive(Debug, Deserialize, Default)]
pub struct TransitionRequest {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

fn session_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Unknown interview session"})),
    )
        .into_response()
}

/// POST /api/interview
///
/// Start a new interview session and return the first question.
async fn create_session(State(state): State<InterviewRouteState>) -> impl IntoResponse {
    let session_id = Uuid::new_v4();
    let interview = InterviewState::new(Arc::clone(&state.schema));
    let view = QuestionView::from_state(session_id, &interview, false);

    state.sessions.write().await.insert(
        session_id,
        Session {
            state: interview,
            created_at: Utc::now(),
        },
    );
    tracing::info!(%session_id, "Interview session started");
    (StatusCode::CREATED, Json(view))
}

/// GET /api/interview/{id}
///
/// Current question and its stored answer.
async fn get_current(
    State(state): State<InterviewRouteState>,
    Path(session_id): Path<Uuid>,
) -> axum::response::Response {
    let sessions = state.sessions.read().await;
    match sessions.get(&session_id) {
        Some(session) => {
            Json(QuestionView::from_state(session_id, &session.state, false)).into_response()
        }
        None => session_not_found(),
    }
}

/// POST /api/interview/{id}/advance
///
/// Save the displayed value and move forward. At the last question the
/// response re-displays it with `finalize: true`.
async fn advance(
    State(state): State<InterviewRouteState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> axum::response::Response {
    let mut sessions = state.sessions.write().await;
    match sessions.get_mut(&session_id) {
        Some(session) => {
            let transition = session.state.advance(request.value.as_ref());
            let finalize = transition == Transition::Finalize;
            if finalize {
                tracing::info!(%session_id, "Interview complete, finalize requested");
            }
            Json(QuestionView::from_state(session_id, &session.state, finalize)).into_response()
        }
        None => session_not_found(),
    }
}

/// POST /api/interview/{id}/retreat
///
/// Save the displayed value and move back one question (floored at the
/// first).
async fn retreat(
    State(state): State<InterviewRouteState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> axum::response::Response {
    let mut sessions = state.sessions.write().await;
    match sessions.get_mut(&session_id) {
        Some(session) => {
            session.state.retreat(request.value.as_ref());
            Json(QuestionView::from_state(session_id, &session.state, false)).into_response()
        }
        None => session_not_found(),
    }
}

/// GET /api/interview/{id}/explain
///
/// Plain-language explanation of the current question. Always 200 with some
/// string — explanation failures degrade to a fallback sentence.
async fn explain(
    State(state): State<InterviewRouteState>,
    Path(session_id): Path<Uuid>,
) -> axum::response::Response {
    let label = {
        let sessions = state.sessions.read().await;
        match sessions.get(&session_id) {
            Some(session) => session.state.current().0.label.clone(),
            None => return session_not_found(),
        }
    };
    let explanation = state.explainer.explain(&label).await;
    Json(serde_json::json!({ "explanation": explanation })).into_response()
}

/// GET /api/interview/{id}/document
///
/// Run the compositor over the session's answers and return the completed
/// form as a downloadable PDF. A template failure surfaces as a failed-
/// generation status with the error text verbatim.
async fn document(
    State(state): State<InterviewRouteState>,
    Path(session_id): Path<Uuid>,
) -> axum::response::Response {
    let answers = {
        let sessions = state.sessions.read().await;
        match sessions.get(&session_id) {
            Some(session) => {
                tracing::debug!(
                    %session_id,
                    started_at = %session.created_at,
                    "Generating completed form"
                );
                session.state.answers().clone()
            }
            None => return session_not_found(),
        }
    };

    match state.renderer.render(&answers) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"ifp-completed.pdf\"".to_string(),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(%session_id, error = %e, "Form generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Could not generate PDF: {e}"),
                })),
            )
                .into_response()
        }
    }
}

/// Build the interview REST routes.
pub fn interview_routes(state: InterviewRouteState) -> Router {
    Router::new()
        .route("/api/interview", post(create_session))
        .route("/api/interview/{id}", get(get_current))
        .route("/api/interview/{id}/advance", post(advance))
        .route("/api/interview/{id}/retreat", post(retreat))
        .route("/api/interview/{id}/explain", get(explain))
        .route("/api/interview/{id}/document", get(document))
        .with_state(state)
}
