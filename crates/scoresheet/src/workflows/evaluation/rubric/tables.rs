use std::collections::BTreeMap;

use super::super::domain::{
    AcademicRank, CommunityRole, GuildPosition, InnovationLevel, Level, PublicationPosition,
    TrainingLevel,
};
use super::Rubric;

pub(super) fn standard() -> Rubric {
    Rubric {
        academic: BTreeMap::from([
            (AcademicRank::HighestHonors, 15),
            (AcademicRank::HighHonors, 10),
            (AcademicRank::Honors, 5),
            (AcademicRank::Average85To89, 3),
        ]),
        contests: BTreeMap::from([
            (Level::National, [25, 24, 23, 22, 21]),
            (Level::Regional, [20, 19, 18, 17, 16]),
            (Level::Division, [15, 14, 13, 12, 11]),
        ]),
        special_awards: BTreeMap::from([
            (Level::National, [15, 14, 13, 12, 11]),
            (Level::Regional, [10, 9, 8, 0, 0]),
            (Level::Division, [7, 6, 5, 0, 0]),
        ]),
        publication_leadership: BTreeMap::from([
            (PublicationPosition::EditorInChief, 10),
            (PublicationPosition::AssociateEditor, 8),
            (PublicationPosition::SectionEditor, 5),
            (PublicationPosition::WriterContributor, 3),
        ]),
        guild_leadership: BTreeMap::from([
            (GuildPosition::President, by_level(10, 7, 4)),
            (GuildPosition::VicePresident, by_level(9, 6, 3)),
            (GuildPosition::OtherRecognized, by_level(8, 5, 2)),
        ]),
        innovation: BTreeMap::from([
            (InnovationLevel::National, 30),
            (InnovationLevel::Regional, 25),
            (InnovationLevel::Division, 20),
            (InnovationLevel::District, 15),
            (InnovationLevel::School, 10),
        ]),
        community_service: BTreeMap::from([
            (CommunityRole::CommitteeChairperson, by_level(10, 8, 6)),
            (CommunityRole::Facilitator, by_level(8, 6, 4)),
        ]),
        published_works: BTreeMap::from([
            (Level::National, 5),
            (Level::Regional, 3),
            (Level::Division, 1),
        ]),
        trainings: BTreeMap::from([
            (TrainingLevel::National, 5),
            (TrainingLevel::Regional, 4),
            (TrainingLevel::Division, 3),
            (TrainingLevel::SchoolDistrict, 2),
        ]),
    }
}

fn by_level(national: u32, regional: u32, division: u32) -> BTreeMap<Level, u32> {
    BTreeMap::from([
        (Level::National, national),
        (Level::Regional, regional),
        (Level::Division, division),
    ])
}
