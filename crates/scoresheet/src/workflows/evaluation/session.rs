use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::collaborators::{Notice, NoticeKind, PersistError, Prompter, RecordSink};
use super::domain::{InfoField, SubmittedKey};
use super::payload::SubmissionPayload;
use super::rubric::Rubric;
use super::state::ScoringState;

const SAVED_NOTICE_DURATION: Duration = Duration::from_millis(2000);
const CLEARED_NOTICE_DURATION: Duration = Duration::from_millis(1000);

/// One evaluator's working session: the sheet being filled in plus the candidates already
/// saved since the session started.
pub struct EvaluationSession<S> {
    sink: Arc<S>,
    state: ScoringState,
    submitted: HashSet<SubmittedKey>,
    submitting: SubmissionFlag,
}

impl<S> EvaluationSession<S>
where
    S: RecordSink + 'static,
{
    pub fn new(sink: Arc<S>, rubric: Arc<Rubric>) -> Self {
        Self {
            sink,
            state: ScoringState::new(rubric),
            submitted: HashSet::new(),
            submitting: SubmissionFlag::default(),
        }
    }

    pub fn state(&self) -> &ScoringState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ScoringState {
        &mut self.state
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.len()
    }

    pub fn has_submitted(&self, key: &SubmittedKey) -> bool {
        self.submitted.contains(key)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_set()
    }

    /// Handle for checking the in-flight state without borrowing the session.
    pub fn submission_flag(&self) -> SubmissionFlag {
        self.submitting.clone()
    }

    /// Validate, check for a repeat candidate, and hand the record to the store.
    ///
    /// The sheet is cleared and the candidate remembered only when the store accepts the
    /// record; every other path leaves the sheet untouched.
    pub async fn submit<P>(&mut self, prompter: &P) -> Result<SubmissionOutcome, SubmissionError>
    where
        P: Prompter + ?Sized,
    {
        let pending = match self.prepare_submission(prompter).await? {
            Prepared::Ready(pending) => pending,
            Prepared::Declined(key) => return Ok(SubmissionOutcome::DuplicateDeclined { key }),
        };
        let persisted = pending.persist(prompter).await?;
        Ok(self.complete_submission(persisted, prompter))
    }

    /// First half of a submit: marks the session in flight, validates the candidate
    /// information, and asks about repeat candidates.
    ///
    /// The returned submission carries everything the store call needs, so callers sharing
    /// the session can release it while the record is saved.
    pub async fn prepare_submission<P>(
        &mut self,
        prompter: &P,
    ) -> Result<Prepared<S>, SubmissionError>
    where
        P: Prompter + ?Sized,
    {
        let in_flight = self
            .submitting
            .acquire()
            .ok_or(SubmissionError::InFlight)?;

        let missing = self.state.info().missing_fields();
        if !missing.is_empty() {
            let labels = field_labels(&missing);
            info!(missing = %labels, "submission blocked by missing candidate information");
            prompter.notify(Notice::new(
                NoticeKind::Warning,
                "Required Information",
                format!("Please provide: {labels} before saving."),
            ));
            return Err(SubmissionError::MissingFields(missing));
        }

        let key = SubmittedKey::for_candidate(self.state.info());
        let payload = SubmissionPayload::from_state(&self.state);

        if self.submitted.contains(&key) {
            info!(%key, "candidate already saved this session");
            let message = format!(
                "The candidate \"{}\" from this school and division has already been saved in this session. Do you want to save it again?",
                payload.name
            );
            if !prompter.confirm("Duplicate Detected", &message).await {
                return Ok(Prepared::Declined(key));
            }
        }

        Ok(Prepared::Ready(PendingSubmission {
            sink: Arc::clone(&self.sink),
            key,
            payload,
            in_flight,
        }))
    }

    /// Last half of a submit: remembers the candidate and starts a fresh sheet.
    ///
    /// The sheet is cleared even if it was edited while the record was being saved.
    pub fn complete_submission<P>(
        &mut self,
        persisted: PersistedSubmission,
        prompter: &P,
    ) -> SubmissionOutcome
    where
        P: Prompter + ?Sized,
    {
        let PersistedSubmission {
            key,
            payload,
            in_flight,
        } = persisted;

        info!(%key, grand_total = %payload.grand_total, "score record saved");
        prompter.notify(
            Notice::new(
                NoticeKind::Success,
                "Saved!",
                format!("Scores for {} have been recorded.", payload.name),
            )
            .dismiss_after(SAVED_NOTICE_DURATION),
        );

        self.submitted.insert(key.clone());
        self.state = self.state.blank();
        drop(in_flight);

        SubmissionOutcome::Saved(SubmissionReceipt {
            key,
            payload,
            submitted_at: Utc::now(),
        })
    }

    /// Clears the sheet after confirmation. Saved candidates stay remembered.
    pub async fn reset<P>(&mut self, prompter: &P) -> bool
    where
        P: Prompter + ?Sized,
    {
        let confirmed = prompter
            .confirm(
                "Are you sure?",
                "This will clear all current scores and information.",
            )
            .await;
        if !confirmed {
            return false;
        }

        self.state = self.state.blank();
        prompter.notify(
            Notice::new(NoticeKind::Success, "Cleared!", "")
                .dismiss_after(CLEARED_NOTICE_DURATION),
        );
        true
    }
}

/// Result of the first half of a submit.
pub enum Prepared<S> {
    Ready(PendingSubmission<S>),
    /// The evaluator chose not to save a repeat candidate.
    Declined(SubmittedKey),
}

/// A validated record waiting on the store. The session stays in flight until this value
/// or the [`PersistedSubmission`] it turns into is dropped.
pub struct PendingSubmission<S> {
    sink: Arc<S>,
    key: SubmittedKey,
    payload: SubmissionPayload,
    in_flight: InFlight,
}

impl<S> PendingSubmission<S>
where
    S: RecordSink + 'static,
{
    pub fn key(&self) -> &SubmittedKey {
        &self.key
    }

    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    /// Hands the record to the store without touching the session.
    pub async fn persist<P>(self, prompter: &P) -> Result<PersistedSubmission, SubmissionError>
    where
        P: Prompter + ?Sized,
    {
        if let Err(err) = self.sink.persist(&self.payload).await {
            warn!(key = %self.key, error = %err, "score record was not saved");
            prompter.notify(Notice::new(
                NoticeKind::Error,
                "Sync Failed",
                "There was an error saving the data. Please check your connection.",
            ));
            return Err(SubmissionError::Persistence(err));
        }

        Ok(PersistedSubmission {
            key: self.key,
            payload: self.payload,
            in_flight: self.in_flight,
        })
    }
}

/// A record the store accepted, ready for [`EvaluationSession::complete_submission`].
pub struct PersistedSubmission {
    key: SubmittedKey,
    payload: SubmissionPayload,
    in_flight: InFlight,
}

/// Shared view of whether a submission is outstanding.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFlag(Arc<AtomicBool>);

impl SubmissionFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Option<InFlight> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(Arc::clone(&self.0)))
    }
}

/// Clears the flag when the submission finishes or its future is dropped.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Saved(SubmissionReceipt),
    DuplicateDeclined { key: SubmittedKey },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub key: SubmittedKey,
    pub payload: SubmissionPayload,
    pub submitted_at: DateTime<Utc>,
}

/// Error raised by the submission workflow.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("a submission is already in progress")]
    InFlight,
    #[error("missing required information: {}", field_labels(.0))]
    MissingFields(Vec<InfoField>),
    #[error(transparent)]
    Persistence(#[from] PersistError),
}

fn field_labels(fields: &[InfoField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}
