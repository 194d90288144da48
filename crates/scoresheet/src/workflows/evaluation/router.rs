use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::MutexGuard;

use super::collaborators::{Notice, Prompter, RecordSink};
use super::domain::{InfoField, InterviewCriterion, NCR_DIVISIONS};
use super::payload::format_total;
use super::rubric::Rubric;
use super::session::{
    EvaluationSession, Prepared, SubmissionError, SubmissionFlag, SubmissionOutcome,
};
use super::state::{ScoringState, SelectionChange};

/// Session shared with the HTTP handlers.
///
/// The in-flight flag lives outside the lock so a second submit can be turned away while
/// the first one still holds the session.
pub struct SharedSession<S> {
    session: tokio::sync::Mutex<EvaluationSession<S>>,
    submitting: SubmissionFlag,
    rubric: Arc<Rubric>,
}

impl<S> SharedSession<S>
where
    S: RecordSink + 'static,
{
    pub fn new(sink: Arc<S>, rubric: Arc<Rubric>) -> Self {
        let session = EvaluationSession::new(sink, Arc::clone(&rubric));
        Self {
            submitting: session.submission_flag(),
            session: tokio::sync::Mutex::new(session),
            rubric,
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, EvaluationSession<S>> {
        self.session.lock().await
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_set()
    }

    /// Runs a submit without holding the session while the store call is outstanding, so
    /// the sheet stays readable and editable during the save.
    pub async fn submit<P>(&self, prompter: &P) -> Result<SubmissionOutcome, SubmissionError>
    where
        P: Prompter + ?Sized,
    {
        let prepared = self.lock().await.prepare_submission(prompter).await?;
        let pending = match prepared {
            Prepared::Ready(pending) => pending,
            Prepared::Declined(key) => return Ok(SubmissionOutcome::DuplicateDeclined { key }),
        };
        let persisted = pending.persist(prompter).await?;
        Ok(self.lock().await.complete_submission(persisted, prompter))
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }
}

/// Snapshot of the sheet returned by every session endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub state: ScoringState,
    pub category_total: u32,
    pub interview_total: f64,
    pub grand_total: String,
    pub submitted_count: usize,
    pub submitting: bool,
}

impl SessionView {
    pub fn capture<S>(session: &EvaluationSession<S>) -> Self
    where
        S: RecordSink + 'static,
    {
        let state = session.state().clone();
        Self {
            category_total: state.category_total(),
            interview_total: state.interview_total(),
            grand_total: format_total(state.grand_total()),
            submitted_count: session.submitted_count(),
            submitting: session.is_submitting(),
            state,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InfoUpdate {
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewUpdate {
    pub criterion: InterviewCriterion,
    pub value: InterviewInput,
}

/// Interview values arrive either as typed numbers or as raw field text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InterviewInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub confirm_duplicate: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// Answers confirmations with the choice sent in the request and keeps the notices for
/// the response body.
struct RequestPrompter {
    answer: bool,
    notices: Mutex<Vec<Notice>>,
}

impl RequestPrompter {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            notices: Mutex::new(Vec::new()),
        }
    }

    fn into_notices(self) -> Vec<Notice> {
        self.notices
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Prompter for RequestPrompter {
    async fn confirm(&self, _title: &str, _message: &str) -> bool {
        self.answer
    }

    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

/// Router builder exposing the score sheet over HTTP.
pub fn scoring_router<S>(shared: Arc<SharedSession<S>>) -> Router
where
    S: RecordSink + 'static,
{
    Router::new()
        .route("/api/v1/rubric", get(rubric_handler::<S>))
        .route("/api/v1/session", get(session_handler::<S>))
        .route("/api/v1/session/info", put(info_handler::<S>))
        .route("/api/v1/session/selections", post(selection_handler::<S>))
        .route("/api/v1/session/interview", put(interview_handler::<S>))
        .route("/api/v1/session/submit", post(submit_handler::<S>))
        .route("/api/v1/session/reset", post(reset_handler::<S>))
        .with_state(shared)
}

pub(crate) async fn rubric_handler<S>(State(shared): State<Arc<SharedSession<S>>>) -> Response
where
    S: RecordSink + 'static,
{
    let payload = json!({
        "rubric": shared.rubric(),
        "divisions": NCR_DIVISIONS,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn session_handler<S>(State(shared): State<Arc<SharedSession<S>>>) -> Response
where
    S: RecordSink + 'static,
{
    let session = shared.lock().await;
    (StatusCode::OK, axum::Json(SessionView::capture(&*session))).into_response()
}

pub(crate) async fn info_handler<S>(
    State(shared): State<Arc<SharedSession<S>>>,
    axum::Json(update): axum::Json<InfoUpdate>,
) -> Response
where
    S: RecordSink + 'static,
{
    let mut session = shared.lock().await;
    let state = session.state_mut();
    if let Some(division) = update.division {
        state.set_info(InfoField::Division, division);
    }
    if let Some(school) = update.school {
        state.set_info(InfoField::School, school);
    }
    if let Some(name) = update.name {
        state.set_info(InfoField::Name, name);
    }
    (StatusCode::OK, axum::Json(SessionView::capture(&*session))).into_response()
}

pub(crate) async fn selection_handler<S>(
    State(shared): State<Arc<SharedSession<S>>>,
    axum::Json(change): axum::Json<SelectionChange>,
) -> Response
where
    S: RecordSink + 'static,
{
    let mut session = shared.lock().await;
    session.state_mut().apply(change);
    (StatusCode::OK, axum::Json(SessionView::capture(&*session))).into_response()
}

pub(crate) async fn interview_handler<S>(
    State(shared): State<Arc<SharedSession<S>>>,
    axum::Json(update): axum::Json<InterviewUpdate>,
) -> Response
where
    S: RecordSink + 'static,
{
    let mut session = shared.lock().await;
    let state = session.state_mut();
    match update.value {
        InterviewInput::Number(value) => state.set_interview_value(update.criterion, value),
        InterviewInput::Text(raw) => state.set_interview(update.criterion, &raw),
    };
    (StatusCode::OK, axum::Json(SessionView::capture(&*session))).into_response()
}

pub(crate) async fn submit_handler<S>(
    State(shared): State<Arc<SharedSession<S>>>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    S: RecordSink + 'static,
{
    if shared.is_submitting() {
        return in_flight_response();
    }

    let prompter = RequestPrompter::answering(request.confirm_duplicate);
    let result = shared.submit(&prompter).await;
    let view = SessionView::capture(&*shared.lock().await);
    let notices = prompter.into_notices();

    match result {
        Ok(outcome) => {
            let payload = json!({
                "outcome": outcome,
                "notices": notices,
                "session": view,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(SubmissionError::InFlight) => in_flight_response(),
        Err(SubmissionError::MissingFields(fields)) => {
            let missing: Vec<&str> = fields.iter().map(|field| field.label()).collect();
            let payload = json!({
                "error": SubmissionError::MissingFields(fields.clone()).to_string(),
                "missing": missing,
                "notices": notices,
                "session": view,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(err @ SubmissionError::Persistence(_)) => {
            let payload = json!({
                "error": err.to_string(),
                "notices": notices,
                "session": view,
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn reset_handler<S>(
    State(shared): State<Arc<SharedSession<S>>>,
    axum::Json(request): axum::Json<ResetRequest>,
) -> Response
where
    S: RecordSink + 'static,
{
    let prompter = RequestPrompter::answering(request.confirm);
    let mut session = shared.lock().await;
    let cleared = session.reset(&prompter).await;
    let view = SessionView::capture(&*session);
    drop(session);

    let payload = json!({
        "cleared": cleared,
        "notices": prompter.into_notices(),
        "session": view,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn in_flight_response() -> Response {
    let payload = json!({
        "error": SubmissionError::InFlight.to_string(),
    });
    (StatusCode::CONFLICT, axum::Json(payload)).into_response()
}
