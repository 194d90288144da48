mod tables;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    AcademicRank, CommunityRole, GuildPosition, InnovationLevel, Level, PublicationPosition,
    Rank, TrainingLevel,
};

/// Point tables for every rubric category.
///
/// Lookups never fail: an unselected axis or a cell missing from the table is worth zero.
/// Special awards below the national level stop paying out after third place no matter
/// what the table holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rubric {
    #[serde(default)]
    academic: BTreeMap<AcademicRank, u32>,
    #[serde(default)]
    contests: BTreeMap<Level, [u32; 5]>,
    #[serde(default)]
    special_awards: BTreeMap<Level, [u32; 5]>,
    #[serde(default)]
    publication_leadership: BTreeMap<PublicationPosition, u32>,
    #[serde(default)]
    guild_leadership: BTreeMap<GuildPosition, BTreeMap<Level, u32>>,
    #[serde(default)]
    innovation: BTreeMap<InnovationLevel, u32>,
    #[serde(default)]
    community_service: BTreeMap<CommunityRole, BTreeMap<Level, u32>>,
    #[serde(default)]
    published_works: BTreeMap<Level, u32>,
    #[serde(default)]
    trainings: BTreeMap<TrainingLevel, u32>,
}

impl Default for Rubric {
    fn default() -> Self {
        Self::standard()
    }
}

impl Rubric {
    /// Tables used by the campus journalist search.
    pub fn standard() -> Self {
        tables::standard()
    }

    pub fn from_json(raw: &str) -> Result<Self, RubricError> {
        let rubric: Rubric = serde_json::from_str(raw)?;
        rubric.warn_on_unreachable_cells();
        Ok(rubric)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RubricError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RubricError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn academic_points(&self, rank: Option<AcademicRank>) -> u32 {
        single(&self.academic, rank)
    }

    pub fn contest_points(&self, level: Option<Level>, rank: Option<Rank>) -> u32 {
        placement(&self.contests, level, rank)
    }

    pub fn special_award_points(&self, level: Option<Level>, rank: Option<Rank>) -> u32 {
        match (level, rank) {
            (Some(level), Some(rank)) if !special_award_pays(level, rank) => 0,
            _ => placement(&self.special_awards, level, rank),
        }
    }

    pub fn publication_points(&self, position: Option<PublicationPosition>) -> u32 {
        single(&self.publication_leadership, position)
    }

    pub fn guild_points(&self, position: Option<GuildPosition>, level: Option<Level>) -> u32 {
        nested(&self.guild_leadership, position, level)
    }

    pub fn innovation_points(&self, level: Option<InnovationLevel>) -> u32 {
        single(&self.innovation, level)
    }

    pub fn community_points(&self, role: Option<CommunityRole>, level: Option<Level>) -> u32 {
        nested(&self.community_service, role, level)
    }

    pub fn published_works_points(&self, level: Option<Level>) -> u32 {
        single(&self.published_works, level)
    }

    pub fn training_points(&self, level: Option<TrainingLevel>) -> u32 {
        single(&self.trainings, level)
    }

    fn warn_on_unreachable_cells(&self) {
        for (level, row) in &self.special_awards {
            for rank in Rank::ALL {
                if !special_award_pays(*level, rank) && row[rank.index()] != 0 {
                    warn!(
                        ?level,
                        ?rank,
                        points = row[rank.index()],
                        "special award cell ignored; only national awards score past third place"
                    );
                }
            }
        }
    }
}

fn special_award_pays(level: Level, rank: Rank) -> bool {
    level == Level::National || rank.index() < Rank::Fourth.index()
}

fn single<K: Ord>(table: &BTreeMap<K, u32>, key: Option<K>) -> u32 {
    key.and_then(|key| table.get(&key).copied()).unwrap_or(0)
}

fn placement(table: &BTreeMap<Level, [u32; 5]>, level: Option<Level>, rank: Option<Rank>) -> u32 {
    match (level, rank) {
        (Some(level), Some(rank)) => table
            .get(&level)
            .map(|row| row[rank.index()])
            .unwrap_or(0),
        _ => 0,
    }
}

fn nested<A: Ord, B: Ord>(
    table: &BTreeMap<A, BTreeMap<B, u32>>,
    outer: Option<A>,
    inner: Option<B>,
) -> u32 {
    match (outer, inner) {
        (Some(outer), Some(inner)) => table
            .get(&outer)
            .and_then(|row| row.get(&inner).copied())
            .unwrap_or(0),
        _ => 0,
    }
}

/// Failure to load a rubric document.
#[derive(Debug, thiserror::Error)]
pub enum RubricError {
    #[error("failed to read rubric {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid rubric document: {0}")]
    Parse(#[from] serde_json::Error),
}
