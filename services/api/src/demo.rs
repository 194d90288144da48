use crate::infra::{load_rubric, InMemoryRecordSink};
use async_trait::async_trait;
use clap::Args;
use scoresheet::error::AppError;
use scoresheet::workflows::evaluation::{
    format_total, AcademicRank, Category, EvaluationSession, InfoField, InterviewCriterion,
    Level, Notice, Prompter, PublicationPosition, Rank, ScoringState, SelectionChange,
    SubmissionError, SubmissionOutcome, TrainingLevel,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Answer "no" when asked to save the same candidate twice.
    #[arg(long)]
    pub(crate) decline_duplicate: bool,
    /// Score with this rubric file instead of the standard tables.
    #[arg(long)]
    pub(crate) rubric: Option<PathBuf>,
}

/// Answers every dialog with a fixed choice and echoes it to the terminal.
struct ConsolePrompter {
    answer: bool,
}

#[async_trait]
impl Prompter for ConsolePrompter {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        println!("  ? {title}: {message}");
        println!("    -> {}", if self.answer { "yes" } else { "no" });
        self.answer
    }

    fn notify(&self, notice: Notice) {
        if notice.message.is_empty() {
            println!("  [{:?}] {}", notice.kind, notice.title);
        } else {
            println!("  [{:?}] {} {}", notice.kind, notice.title, notice.message);
        }
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let rubric = load_rubric(args.rubric.as_deref())?;
    let sink = Arc::new(InMemoryRecordSink::default());
    let mut session = EvaluationSession::new(sink.clone(), rubric);
    let agree = ConsolePrompter { answer: true };

    println!("Campus journalist scoring demo");

    println!("\n1. Saving an empty sheet");
    if let Err(err) = session.submit(&agree).await {
        println!("  refused: {err}");
    }

    println!("\n2. Scoring Ana Reyes");
    score_candidate(session.state_mut());
    render_sheet(session.state());

    println!("\n3. Saving");
    report(session.submit(&agree).await);

    println!("\n4. Entering Ana Reyes again");
    score_candidate(session.state_mut());
    let duplicate = ConsolePrompter {
        answer: !args.decline_duplicate,
    };
    report(session.submit(&duplicate).await);

    println!("\n5. Clearing the sheet");
    session.reset(&agree).await;
    render_sheet(session.state());

    println!(
        "\nSession saved {} candidate(s); record store holds {} record(s).",
        session.submitted_count(),
        sink.records().len()
    );
    Ok(())
}

fn score_candidate(state: &mut ScoringState) {
    state.set_info(InfoField::Division, "Marikina City");
    state.set_info(InfoField::School, "Marikina High School");
    state.set_info(InfoField::Name, "Ana Reyes");
    for change in [
        SelectionChange::AcademicRank(Some(AcademicRank::HighestHonors)),
        SelectionChange::IndividualContestLevel(Some(Level::National)),
        SelectionChange::IndividualContestRank(Some(Rank::First)),
        SelectionChange::PublicationPosition(Some(PublicationPosition::SectionEditor)),
        SelectionChange::TrainingLevel(Some(TrainingLevel::Regional)),
    ] {
        state.apply(change);
    }
    for (criterion, raw) in InterviewCriterion::ALL
        .into_iter()
        .zip(["2", "1.5", "2", "1.75", "5"])
    {
        state.set_interview(criterion, raw);
    }
}

fn render_sheet(state: &ScoringState) {
    for category in Category::ALL {
        println!("  {:<28} {:>3}", category.label(), state.points(category));
    }
    println!("  {:<28} {:>6.2}", "Interview", state.interview_total());
    println!("  {:<28} {:>6}", "Grand total", format_total(state.grand_total()));
}

fn report(result: Result<SubmissionOutcome, SubmissionError>) {
    match result {
        Ok(SubmissionOutcome::Saved(receipt)) => println!(
            "  saved {} at {} with grand total {}",
            receipt.key, receipt.submitted_at, receipt.payload.grand_total
        ),
        Ok(SubmissionOutcome::DuplicateDeclined { key }) => {
            println!("  kept {key} on the sheet without saving")
        }
        Err(err) => println!("  not saved: {err}"),
    }
}
