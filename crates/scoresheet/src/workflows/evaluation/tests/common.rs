use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::evaluation::collaborators::{
    Notice, PersistError, Prompter, RecordSink,
};
use crate::workflows::evaluation::domain::InfoField;
use crate::workflows::evaluation::payload::SubmissionPayload;
use crate::workflows::evaluation::rubric::Rubric;
use crate::workflows::evaluation::session::EvaluationSession;
use crate::workflows::evaluation::state::ScoringState;

pub(super) fn rubric() -> Arc<Rubric> {
    Arc::new(Rubric::standard())
}

pub(super) fn blank_state() -> ScoringState {
    ScoringState::new(rubric())
}

pub(super) fn fill_info(state: &mut ScoringState, name: &str, school: &str, division: &str) {
    state.set_info(InfoField::Name, name);
    state.set_info(InfoField::School, school);
    state.set_info(InfoField::Division, division);
}

pub(super) fn memory_session() -> (Arc<MemorySink>, EvaluationSession<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let session = EvaluationSession::new(sink.clone(), rubric());
    (sink, session)
}

#[derive(Default)]
pub(super) struct MemorySink {
    records: Mutex<Vec<SubmissionPayload>>,
}

impl MemorySink {
    pub(super) fn records(&self) -> Vec<SubmissionPayload> {
        self.records.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn persist(&self, payload: &SubmissionPayload) -> Result<(), PersistError> {
        self.records
            .lock()
            .expect("sink mutex poisoned")
            .push(payload.clone());
        Ok(())
    }
}

/// Fails the first `failures` calls with a transport error, then stores records.
pub(super) struct FlakySink {
    failures: AtomicUsize,
    inner: MemorySink,
}

impl FlakySink {
    pub(super) fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            inner: MemorySink::default(),
        }
    }

    pub(super) fn records(&self) -> Vec<SubmissionPayload> {
        self.inner.records()
    }
}

#[async_trait]
impl RecordSink for FlakySink {
    async fn persist(&self, payload: &SubmissionPayload) -> Result<(), PersistError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(PersistError::Transport("connection reset".to_string()));
        }
        self.inner.persist(payload).await
    }
}

/// Holds every persist call until the test releases it.
#[derive(Default)]
pub(super) struct GatedSink {
    pub(super) entered: Notify,
    pub(super) release: Notify,
    inner: MemorySink,
}

impl GatedSink {
    pub(super) fn records(&self) -> Vec<SubmissionPayload> {
        self.inner.records()
    }
}

#[async_trait]
impl RecordSink for GatedSink {
    async fn persist(&self, payload: &SubmissionPayload) -> Result<(), PersistError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.persist(payload).await
    }
}

/// Answers every confirmation the same way and records what was shown.
pub(super) struct ScriptedPrompter {
    answer: bool,
    confirmations: Mutex<Vec<(String, String)>>,
    notices: Mutex<Vec<Notice>>,
}

impl ScriptedPrompter {
    pub(super) fn answering(answer: bool) -> Self {
        Self {
            answer,
            confirmations: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn confirmations(&self) -> Vec<(String, String)> {
        self.confirmations
            .lock()
            .expect("prompter mutex poisoned")
            .clone()
    }

    pub(super) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("prompter mutex poisoned").clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        self.confirmations
            .lock()
            .expect("prompter mutex poisoned")
            .push((title.to_string(), message.to_string()));
        self.answer
    }

    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .expect("prompter mutex poisoned")
            .push(notice);
    }
}

pub(super) async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
