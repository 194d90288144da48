use std::fmt;

use serde::{Deserialize, Serialize};

/// Schools division offices of the National Capital Region offered as division choices.
pub const NCR_DIVISIONS: [&str; 16] = [
    "Caloocan City",
    "Las Piñas City",
    "Makati City",
    "Malabon City",
    "Mandaluyong City",
    "Manila",
    "Marikina City",
    "Muntinlupa City",
    "Navotas City",
    "Parañaque City",
    "Pasay City",
    "Pasig City",
    "Quezon City",
    "San Juan City",
    "Taguig City-Pateros",
    "Valenzuela City",
];

/// Identifying information typed in for the candidate under evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub division: String,
    pub school: String,
    pub name: String,
}

impl CandidateInfo {
    pub fn set(&mut self, field: InfoField, value: impl Into<String>) {
        let value = value.into();
        match field {
            InfoField::Division => self.division = value,
            InfoField::School => self.school = value,
            InfoField::Name => self.name = value,
        }
    }

    /// Required fields that are blank after trimming, in form order.
    pub fn missing_fields(&self) -> Vec<InfoField> {
        [
            (InfoField::Division, &self.division),
            (InfoField::School, &self.school),
            (InfoField::Name, &self.name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn trimmed(&self) -> CandidateInfo {
        CandidateInfo {
            division: self.division.trim().to_string(),
            school: self.school.trim().to_string(),
            name: self.name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoField {
    Division,
    School,
    Name,
}

impl InfoField {
    pub const fn label(self) -> &'static str {
        match self {
            InfoField::Division => "Division",
            InfoField::School => "School",
            InfoField::Name => "Candidate Name",
        }
    }
}

/// Session identity of a candidate used to flag repeat submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmittedKey(pub String);

impl SubmittedKey {
    pub fn for_candidate(info: &CandidateInfo) -> Self {
        let info = info.trimmed();
        SubmittedKey(
            format!("{}|{}|{}", info.name, info.school, info.division).to_lowercase(),
        )
    }
}

impl fmt::Display for SubmittedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Competition tier shared by contests, awards, guild posts, community work, and publications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    National,
    Regional,
    Division,
}

/// Placement within a contest or special award, 1st through 5th.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "1ST")]
    First,
    #[serde(rename = "2ND")]
    Second,
    #[serde(rename = "3RD")]
    Third,
    #[serde(rename = "4TH")]
    Fourth,
    #[serde(rename = "5TH")]
    Fifth,
}

impl Rank {
    pub const ALL: [Rank; 5] = [
        Rank::First,
        Rank::Second,
        Rank::Third,
        Rank::Fourth,
        Rank::Fifth,
    ];

    /// Zero-based column in a level-by-rank table.
    pub const fn index(self) -> usize {
        match self {
            Rank::First => 0,
            Rank::Second => 1,
            Rank::Third => 2,
            Rank::Fourth => 3,
            Rank::Fifth => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AcademicRank {
    #[serde(rename = "Highest Honors")]
    HighestHonors,
    #[serde(rename = "High Honors")]
    HighHonors,
    Honors,
    #[serde(rename = "85-89 Average")]
    Average85To89,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PublicationPosition {
    #[serde(rename = "Editor in Chief")]
    EditorInChief,
    #[serde(rename = "Associate Editor")]
    AssociateEditor,
    #[serde(rename = "Section Editor")]
    SectionEditor,
    #[serde(rename = "Writer/Contributor/Others")]
    WriterContributor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GuildPosition {
    President,
    #[serde(rename = "Vice President")]
    VicePresident,
    #[serde(rename = "Other positions recognized by DepEd")]
    OtherRecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InnovationLevel {
    National,
    Regional,
    Division,
    District,
    School,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CommunityRole {
    #[serde(rename = "COMMITTEE CHAIRPERSON")]
    CommitteeChairperson,
    #[serde(rename = "FACILITATOR")]
    Facilitator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrainingLevel {
    National,
    Regional,
    Division,
    #[serde(rename = "School/District")]
    SchoolDistrict,
}

/// The ten table-driven rubric categories, in score sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Academic,
    IndividualContests,
    GroupContests,
    SpecialAwards,
    PublicationLeadership,
    GuildLeadership,
    Innovation,
    CommunityService,
    PublishedWorks,
    Trainings,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Academic,
        Category::IndividualContests,
        Category::GroupContests,
        Category::SpecialAwards,
        Category::PublicationLeadership,
        Category::GuildLeadership,
        Category::Innovation,
        Category::CommunityService,
        Category::PublishedWorks,
        Category::Trainings,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Category::Academic => "Academic Standing",
            Category::IndividualContests => "Individual Contests",
            Category::GroupContests => "Group Contests",
            Category::SpecialAwards => "Special Awards",
            Category::PublicationLeadership => "Publication Leadership",
            Category::GuildLeadership => "Guild Leadership",
            Category::Innovation => "Innovations",
            Category::CommunityService => "Community Service",
            Category::PublishedWorks => "Published Works",
            Category::Trainings => "Trainings",
        }
    }
}

/// Panel interview criteria, each worth up to two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewCriterion {
    JournalismPrinciples,
    LeadershipPotential,
    ExperienceEngagement,
    CommitmentGrowth,
    CommunicationSkills,
}

impl InterviewCriterion {
    pub const ALL: [InterviewCriterion; 5] = [
        InterviewCriterion::JournalismPrinciples,
        InterviewCriterion::LeadershipPotential,
        InterviewCriterion::ExperienceEngagement,
        InterviewCriterion::CommitmentGrowth,
        InterviewCriterion::CommunicationSkills,
    ];
}
