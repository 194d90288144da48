use serde::{Deserialize, Serialize};

use super::domain::Category;
use super::state::ScoringState;

/// Flat record handed to the score store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub name: String,
    pub school: String,
    pub division: String,
    pub academic: u32,
    pub individual: u32,
    pub group: u32,
    pub special: u32,
    pub pub_lead: u32,
    pub guild_lead: u32,
    pub innovation: u32,
    pub community: u32,
    pub published: u32,
    pub trainings: u32,
    pub interview_total: f64,
    /// Two decimal places, e.g. `"50.00"`.
    pub grand_total: String,
}

impl SubmissionPayload {
    pub fn from_state(state: &ScoringState) -> Self {
        let info = state.info().trimmed();
        Self {
            name: info.name,
            school: info.school,
            division: info.division,
            academic: state.points(Category::Academic),
            individual: state.points(Category::IndividualContests),
            group: state.points(Category::GroupContests),
            special: state.points(Category::SpecialAwards),
            pub_lead: state.points(Category::PublicationLeadership),
            guild_lead: state.points(Category::GuildLeadership),
            innovation: state.points(Category::Innovation),
            community: state.points(Category::CommunityService),
            published: state.points(Category::PublishedWorks),
            trainings: state.points(Category::Trainings),
            interview_total: state.interview_total(),
            grand_total: format_total(state.grand_total()),
        }
    }
}

/// Two decimal places with exact halves rounded up, e.g. `50.125` becomes `"50.13"`.
pub fn format_total(total: f64) -> String {
    format!("{:.2}", (total * 100.0).round() / 100.0)
}
