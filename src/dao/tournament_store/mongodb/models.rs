use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::dao::models::{
    GroupStageDetails, MatchEntity, MatchPhase, MatchStatus, TeamEntity, TeamStats, TeamStatsWrite,
};

pub const TEAM_COLLECTION_NAME: &str = "teams";
pub const MATCH_COLLECTION_NAME: &str = "matches";

/// Team document; field names follow the camelCase layout of the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    group: String,
    #[serde(default)]
    captain_name: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    wins: u32,
    #[serde(default)]
    draws: u32,
    #[serde(default)]
    losses: u32,
    #[serde(default)]
    goals_scored: u32,
    #[serde(default)]
    goals_accepted: u32,
    #[serde(default)]
    group_stage_details: GroupStageDetails,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            group: value.group,
            captain_name: value.captain_name,
            image: value.image,
            wins: value.stats.wins,
            draws: value.stats.draws,
            losses: value.stats.losses,
            goals_scored: value.stats.goals_scored,
            goals_accepted: value.stats.goals_accepted,
            group_stage_details: value.group_stage,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoTeamDocument> for TeamEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoTeamDocument) -> MongoResult<Self> {
        let id = parse_id(TEAM_COLLECTION_NAME, &value.id)?;
        Ok(Self {
            id,
            name: value.name,
            group: value.group,
            captain_name: value.captain_name,
            image: value.image,
            stats: TeamStats {
                wins: value.wins,
                draws: value.draws,
                losses: value.losses,
                goals_scored: value.goals_scored,
                goals_accepted: value.goals_accepted,
            },
            group_stage: value.group_stage_details,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

/// Match document; team references are stored as hyphenated UUID strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoMatchDocument {
    #[serde(rename = "_id")]
    id: String,
    date: String,
    time: String,
    team_a: String,
    team_b: String,
    #[serde(default)]
    team_a_score: u32,
    #[serde(default)]
    team_b_score: u32,
    #[serde(default)]
    team_a_player_goals: Vec<String>,
    #[serde(default)]
    team_b_player_goals: Vec<String>,
    status: MatchStatus,
    phase: MatchPhase,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<MatchEntity> for MongoMatchDocument {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id.to_string(),
            date: value.date,
            time: value.time,
            team_a: value.team_a.to_string(),
            team_b: value.team_b.to_string(),
            team_a_score: value.team_a_score,
            team_b_score: value.team_b_score,
            team_a_player_goals: value.team_a_player_goals,
            team_b_player_goals: value.team_b_player_goals,
            status: value.status,
            phase: value.phase,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoMatchDocument> for MatchEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoMatchDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(MATCH_COLLECTION_NAME, &value.id)?,
            date: value.date,
            time: value.time,
            team_a: parse_id(MATCH_COLLECTION_NAME, &value.team_a)?,
            team_b: parse_id(MATCH_COLLECTION_NAME, &value.team_b)?,
            team_a_score: value.team_a_score,
            team_b_score: value.team_b_score,
            team_a_player_goals: value.team_a_player_goals,
            team_b_player_goals: value.team_b_player_goals,
            status: value.status,
            phase: value.phase,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

fn parse_id(collection: &'static str, value: &str) -> MongoResult<Uuid> {
    Uuid::parse_str(value).map_err(|source| MongoDaoError::InvalidIdentifier {
        collection,
        value: value.to_owned(),
        source,
    })
}

/// Filter selecting a document by primary key.
pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}

/// `$set` update touching the statistics of a team and nothing else.
pub fn stats_update(write: &TeamStatsWrite) -> Document {
    let stats = write.stats;
    let group = write.group_stage;
    doc! {
        "$set": {
            "wins": i64::from(stats.wins),
            "draws": i64::from(stats.draws),
            "losses": i64::from(stats.losses),
            "goalsScored": i64::from(stats.goals_scored),
            "goalsAccepted": i64::from(stats.goals_accepted),
            "groupStageDetails.points": i64::from(group.points),
            "groupStageDetails.playedMatches": i64::from(group.played_matches),
            "groupStageDetails.wins": i64::from(group.wins),
            "groupStageDetails.draws": i64::from(group.draws),
            "groupStageDetails.losses": i64::from(group.losses),
            "groupStageDetails.goalsFor": i64::from(group.goals_for),
            "groupStageDetails.goalsAgainst": i64::from(group.goals_against),
            "updatedAt": DateTime::from_system_time(write.updated_at),
        }
    }
}
