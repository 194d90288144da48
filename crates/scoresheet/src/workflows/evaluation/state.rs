use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{
    AcademicRank, CandidateInfo, Category, CommunityRole, GuildPosition, InfoField,
    InnovationLevel, InterviewCriterion, Level, PublicationPosition, Rank, TrainingLevel,
};
use super::rubric::Rubric;

/// A category selection together with the points the rubric assigns to it.
///
/// Only [`ScoringState`] builds these, so the points always match the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scored<S> {
    selection: S,
    points: u32,
}

impl<S: Copy> Scored<S> {
    fn new(selection: S, points: u32) -> Self {
        Self { selection, points }
    }

    pub fn selection(&self) -> S {
        self.selection
    }

    pub fn points(&self) -> u32 {
        self.points
    }
}

/// Level and placement for contests and special awards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub level: Option<Level>,
    pub rank: Option<Rank>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRole {
    pub position: Option<GuildPosition>,
    pub level: Option<Level>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityAssignment {
    pub role: Option<CommunityRole>,
    pub level: Option<Level>,
}

/// One field of the score sheet changing. `None` clears the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SelectionChange {
    AcademicRank(Option<AcademicRank>),
    IndividualContestLevel(Option<Level>),
    IndividualContestRank(Option<Rank>),
    GroupContestLevel(Option<Level>),
    GroupContestRank(Option<Rank>),
    SpecialAwardLevel(Option<Level>),
    SpecialAwardRank(Option<Rank>),
    PublicationPosition(Option<PublicationPosition>),
    GuildPosition(Option<GuildPosition>),
    GuildLevel(Option<Level>),
    InnovationLevel(Option<InnovationLevel>),
    CommunityRole(Option<CommunityRole>),
    CommunityLevel(Option<Level>),
    PublishedWorksLevel(Option<Level>),
    TrainingLevel(Option<TrainingLevel>),
}

impl SelectionChange {
    pub const fn category(self) -> Category {
        match self {
            SelectionChange::AcademicRank(_) => Category::Academic,
            SelectionChange::IndividualContestLevel(_) | SelectionChange::IndividualContestRank(_) => {
                Category::IndividualContests
            }
            SelectionChange::GroupContestLevel(_) | SelectionChange::GroupContestRank(_) => {
                Category::GroupContests
            }
            SelectionChange::SpecialAwardLevel(_) | SelectionChange::SpecialAwardRank(_) => {
                Category::SpecialAwards
            }
            SelectionChange::PublicationPosition(_) => Category::PublicationLeadership,
            SelectionChange::GuildPosition(_) | SelectionChange::GuildLevel(_) => {
                Category::GuildLeadership
            }
            SelectionChange::InnovationLevel(_) => Category::Innovation,
            SelectionChange::CommunityRole(_) | SelectionChange::CommunityLevel(_) => {
                Category::CommunityService
            }
            SelectionChange::PublishedWorksLevel(_) => Category::PublishedWorks,
            SelectionChange::TrainingLevel(_) => Category::Trainings,
        }
    }
}

/// Panel interview sub-scores, each held in `[0, 2]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InterviewScore {
    journalism_principles: f64,
    leadership_potential: f64,
    experience_engagement: f64,
    commitment_growth: f64,
    communication_skills: f64,
}

impl InterviewScore {
    pub const MAX_PER_CRITERION: f64 = 2.0;

    pub fn get(&self, criterion: InterviewCriterion) -> f64 {
        match criterion {
            InterviewCriterion::JournalismPrinciples => self.journalism_principles,
            InterviewCriterion::LeadershipPotential => self.leadership_potential,
            InterviewCriterion::ExperienceEngagement => self.experience_engagement,
            InterviewCriterion::CommitmentGrowth => self.commitment_growth,
            InterviewCriterion::CommunicationSkills => self.communication_skills,
        }
    }

    /// Stores the clamped value and returns it.
    pub fn set(&mut self, criterion: InterviewCriterion, value: f64) -> f64 {
        let value = clamp_sub_score(value);
        let slot = match criterion {
            InterviewCriterion::JournalismPrinciples => &mut self.journalism_principles,
            InterviewCriterion::LeadershipPotential => &mut self.leadership_potential,
            InterviewCriterion::ExperienceEngagement => &mut self.experience_engagement,
            InterviewCriterion::CommitmentGrowth => &mut self.commitment_growth,
            InterviewCriterion::CommunicationSkills => &mut self.communication_skills,
        };
        *slot = value;
        value
    }

    /// Reads the leading number of the typed text; text without one counts as zero.
    pub fn set_raw(&mut self, criterion: InterviewCriterion, raw: &str) -> f64 {
        let value = leading_number(raw).unwrap_or(0.0);
        self.set(criterion, value)
    }

    pub fn total(&self) -> f64 {
        InterviewCriterion::ALL
            .iter()
            .map(|criterion| self.get(*criterion))
            .sum()
    }
}

/// Longest decimal prefix of `raw` after leading whitespace, as number inputs report it:
/// `"1.5abc"` reads as `1.5`, while `"inf"` and `"nan"` are not numbers. Only the spelled-out
/// `Infinity` is accepted as infinite.
fn leading_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if text[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let whole = count_digits(&bytes[end..]);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = count_digits(&bytes[end + 1..]);
        end += 1 + fraction;
    }
    if whole == 0 && fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent = count_digits(&bytes[exponent_end..]);
        if exponent > 0 {
            end = exponent_end + exponent;
        }
    }

    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

fn clamp_sub_score(value: f64) -> f64 {
    if value.is_nan() || value <= 0.0 {
        0.0
    } else {
        value.min(InterviewScore::MAX_PER_CRITERION)
    }
}

/// Everything entered for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringState {
    #[serde(skip)]
    rubric: Arc<Rubric>,
    info: CandidateInfo,
    academic: Scored<Option<AcademicRank>>,
    individual_contests: Scored<Placement>,
    group_contests: Scored<Placement>,
    special_awards: Scored<Placement>,
    publication_leadership: Scored<Option<PublicationPosition>>,
    guild_leadership: Scored<GuildRole>,
    innovation: Scored<Option<InnovationLevel>>,
    community_service: Scored<CommunityAssignment>,
    published_works: Scored<Option<Level>>,
    trainings: Scored<Option<TrainingLevel>>,
    interview: InterviewScore,
}

impl ScoringState {
    /// Blank sheet: empty candidate info, every category unselected.
    pub fn new(rubric: Arc<Rubric>) -> Self {
        Self {
            rubric,
            info: CandidateInfo::default(),
            academic: Scored::new(None, 0),
            individual_contests: Scored::new(Placement::default(), 0),
            group_contests: Scored::new(Placement::default(), 0),
            special_awards: Scored::new(Placement::default(), 0),
            publication_leadership: Scored::new(None, 0),
            guild_leadership: Scored::new(GuildRole::default(), 0),
            innovation: Scored::new(None, 0),
            community_service: Scored::new(CommunityAssignment::default(), 0),
            published_works: Scored::new(None, 0),
            trainings: Scored::new(None, 0),
            interview: InterviewScore::default(),
        }
    }

    /// Fresh sheet sharing this sheet's rubric.
    pub fn blank(&self) -> Self {
        Self::new(Arc::clone(&self.rubric))
    }

    pub fn info(&self) -> &CandidateInfo {
        &self.info
    }

    pub fn set_info(&mut self, field: InfoField, value: impl Into<String>) {
        self.info.set(field, value);
    }

    pub fn apply(&mut self, change: SelectionChange) {
        let rubric = Arc::clone(&self.rubric);
        match change {
            SelectionChange::AcademicRank(rank) => {
                self.academic = Scored::new(rank, rubric.academic_points(rank));
            }
            SelectionChange::IndividualContestLevel(level) => {
                let placement = Placement {
                    level,
                    ..self.individual_contests.selection
                };
                self.individual_contests = contest(&rubric, placement);
            }
            SelectionChange::IndividualContestRank(rank) => {
                let placement = Placement {
                    rank,
                    ..self.individual_contests.selection
                };
                self.individual_contests = contest(&rubric, placement);
            }
            SelectionChange::GroupContestLevel(level) => {
                let placement = Placement {
                    level,
                    ..self.group_contests.selection
                };
                self.group_contests = contest(&rubric, placement);
            }
            SelectionChange::GroupContestRank(rank) => {
                let placement = Placement {
                    rank,
                    ..self.group_contests.selection
                };
                self.group_contests = contest(&rubric, placement);
            }
            SelectionChange::SpecialAwardLevel(level) => {
                let placement = Placement {
                    level,
                    ..self.special_awards.selection
                };
                self.special_awards = special_award(&rubric, placement);
            }
            SelectionChange::SpecialAwardRank(rank) => {
                let placement = Placement {
                    rank,
                    ..self.special_awards.selection
                };
                self.special_awards = special_award(&rubric, placement);
            }
            SelectionChange::PublicationPosition(position) => {
                self.publication_leadership =
                    Scored::new(position, rubric.publication_points(position));
            }
            SelectionChange::GuildPosition(position) => {
                let role = GuildRole {
                    position,
                    ..self.guild_leadership.selection
                };
                self.guild_leadership =
                    Scored::new(role, rubric.guild_points(role.position, role.level));
            }
            SelectionChange::GuildLevel(level) => {
                let role = GuildRole {
                    level,
                    ..self.guild_leadership.selection
                };
                self.guild_leadership =
                    Scored::new(role, rubric.guild_points(role.position, role.level));
            }
            SelectionChange::InnovationLevel(level) => {
                self.innovation = Scored::new(level, rubric.innovation_points(level));
            }
            SelectionChange::CommunityRole(role) => {
                let assignment = CommunityAssignment {
                    role,
                    ..self.community_service.selection
                };
                self.community_service = community(&rubric, assignment);
            }
            SelectionChange::CommunityLevel(level) => {
                let assignment = CommunityAssignment {
                    level,
                    ..self.community_service.selection
                };
                self.community_service = community(&rubric, assignment);
            }
            SelectionChange::PublishedWorksLevel(level) => {
                self.published_works = Scored::new(level, rubric.published_works_points(level));
            }
            SelectionChange::TrainingLevel(level) => {
                self.trainings = Scored::new(level, rubric.training_points(level));
            }
        }

        let category = change.category();
        debug!(?category, points = self.points(category), "selection rescored");
    }

    /// Coerces and clamps the typed interview value, returning what was stored.
    pub fn set_interview(&mut self, criterion: InterviewCriterion, raw: &str) -> f64 {
        self.interview.set_raw(criterion, raw)
    }

    pub fn set_interview_value(&mut self, criterion: InterviewCriterion, value: f64) -> f64 {
        self.interview.set(criterion, value)
    }

    pub fn academic(&self) -> Scored<Option<AcademicRank>> {
        self.academic
    }

    pub fn individual_contests(&self) -> Scored<Placement> {
        self.individual_contests
    }

    pub fn group_contests(&self) -> Scored<Placement> {
        self.group_contests
    }

    pub fn special_awards(&self) -> Scored<Placement> {
        self.special_awards
    }

    pub fn publication_leadership(&self) -> Scored<Option<PublicationPosition>> {
        self.publication_leadership
    }

    pub fn guild_leadership(&self) -> Scored<GuildRole> {
        self.guild_leadership
    }

    pub fn innovation(&self) -> Scored<Option<InnovationLevel>> {
        self.innovation
    }

    pub fn community_service(&self) -> Scored<CommunityAssignment> {
        self.community_service
    }

    pub fn published_works(&self) -> Scored<Option<Level>> {
        self.published_works
    }

    pub fn trainings(&self) -> Scored<Option<TrainingLevel>> {
        self.trainings
    }

    pub fn interview(&self) -> &InterviewScore {
        &self.interview
    }

    pub fn points(&self, category: Category) -> u32 {
        match category {
            Category::Academic => self.academic.points,
            Category::IndividualContests => self.individual_contests.points,
            Category::GroupContests => self.group_contests.points,
            Category::SpecialAwards => self.special_awards.points,
            Category::PublicationLeadership => self.publication_leadership.points,
            Category::GuildLeadership => self.guild_leadership.points,
            Category::Innovation => self.innovation.points,
            Category::CommunityService => self.community_service.points,
            Category::PublishedWorks => self.published_works.points,
            Category::Trainings => self.trainings.points,
        }
    }

    pub fn category_total(&self) -> u32 {
        Category::ALL
            .iter()
            .map(|category| self.points(*category))
            .sum()
    }

    pub fn interview_total(&self) -> f64 {
        self.interview.total()
    }

    pub fn grand_total(&self) -> f64 {
        f64::from(self.category_total()) + self.interview_total()
    }
}

fn contest(rubric: &Rubric, placement: Placement) -> Scored<Placement> {
    Scored::new(
        placement,
        rubric.contest_points(placement.level, placement.rank),
    )
}

fn special_award(rubric: &Rubric, placement: Placement) -> Scored<Placement> {
    Scored::new(
        placement,
        rubric.special_award_points(placement.level, placement.rank),
    )
}

fn community(rubric: &Rubric, assignment: CommunityAssignment) -> Scored<CommunityAssignment> {
    Scored::new(
        assignment,
        rubric.community_points(assignment.role, assignment.level),
    )
}
