//! Candidate evaluation: rubric tables, the scoring sheet, and the submission workflow.
//!
//! Category points are looked up from the [`Rubric`] whenever a selection changes, so the
//! sheet never holds a point value that disagrees with its selections. Saving goes through
//! [`EvaluationSession::submit`], which talks to the outside world only through the
//! [`RecordSink`] and [`Prompter`] collaborators.

pub mod collaborators;
pub mod domain;
pub mod payload;
pub mod router;
pub mod rubric;
pub mod session;
pub mod state;

#[cfg(test)]
mod tests;

pub use collaborators::{Notice, NoticeKind, PersistError, Prompter, RecordSink};
pub use domain::{
    AcademicRank, CandidateInfo, Category, CommunityRole, GuildPosition, InfoField,
    InnovationLevel, InterviewCriterion, Level, PublicationPosition, Rank, SubmittedKey,
    TrainingLevel, NCR_DIVISIONS,
};
pub use payload::{format_total, SubmissionPayload};
pub use router::{scoring_router, SessionView, SharedSession};
pub use rubric::{Rubric, RubricError};
pub use session::{
    EvaluationSession, PendingSubmission, PersistedSubmission, Prepared, SubmissionError,
    SubmissionFlag, SubmissionOutcome, SubmissionReceipt,
};
pub use state::{
    CommunityAssignment, GuildRole, InterviewScore, Placement, Scored, ScoringState,
    SelectionChange,
};
