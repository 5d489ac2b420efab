//! DTO definitions for the match endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{MatchEntity, MatchPhase, MatchStatus},
    dto::{
        format_system_time,
        team::{TeamBrief, TeamView},
        validation::{validate_match_date, validate_match_time, validate_scorers},
    },
};

/// Payload scheduling a new match.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    /// Calendar day, `YYYY-MM-DD`.
    #[validate(custom(function = "validate_match_date"))]
    pub date: String,
    /// Kick-off time, `HH:MM`.
    #[validate(custom(function = "validate_match_time"))]
    pub time: String,
    /// Team listed first.
    pub team_a: Uuid,
    /// Team listed second; must differ from `teamA`.
    pub team_b: Uuid,
    /// Storage code or display name of the phase.
    pub phase: MatchPhase,
}

/// Partial update of a match: a status transition and/or a reschedule.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchRequest {
    /// Target status; statuses only move forward.
    #[serde(default)]
    pub status: Option<MatchStatus>,
    /// New calendar day, `YYYY-MM-DD`.
    #[serde(default)]
    #[validate(custom(function = "validate_match_date"))]
    pub date: Option<String>,
    /// New kick-off time, `HH:MM`.
    #[serde(default)]
    #[validate(custom(function = "validate_match_time"))]
    pub time: Option<String>,
}

fn default_result_status() -> MatchStatus {
    MatchStatus::Finished
}

/// Score submission for a match.
///
/// Scores are signed on the wire so that negative values are reported as
/// validation errors instead of body decoding failures.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordResultRequest {
    /// Goals of team A.
    #[validate(range(min = 0))]
    pub team_a_score: i64,
    /// Goals of team B.
    #[validate(range(min = 0))]
    pub team_b_score: i64,
    /// One scorer name per goal of team A.
    #[serde(default)]
    #[validate(custom(function = "validate_scorers"))]
    pub team_a_player_goals: Vec<String>,
    /// One scorer name per goal of team B.
    #[serde(default)]
    #[validate(custom(function = "validate_scorers"))]
    pub team_b_player_goals: Vec<String>,
    /// Status after recording; `finished` (the default) reconciles team statistics.
    #[serde(default = "default_result_status")]
    pub status: MatchStatus,
}

/// Query string accepted by `GET /matches`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MatchesQuery {
    /// Exact calendar day, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Phase display name or storage code.
    pub stage: Option<String>,
}

/// Match projection used by listings, with team name and image.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    /// Match identifier.
    pub id: Uuid,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Kick-off time, `HH:MM`.
    pub time: String,
    /// `null` when the team was deleted.
    pub team_a: Option<TeamBrief>,
    /// `null` when the team was deleted.
    pub team_b: Option<TeamBrief>,
    /// Goals of team A.
    pub team_a_score: u32,
    /// Goals of team B.
    pub team_b_score: u32,
    /// One scorer name per goal of team A.
    pub team_a_player_goals: Vec<String>,
    /// One scorer name per goal of team B.
    pub team_b_player_goals: Vec<String>,
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Storage code of the phase.
    pub phase: MatchPhase,
    /// Display name of the phase.
    pub phase_name: String,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Last update time, RFC 3339.
    pub updated_at: String,
}

impl MatchSummary {
    /// Build the summary from a match and its resolved teams.
    pub fn new(entity: MatchEntity, team_a: Option<TeamBrief>, team_b: Option<TeamBrief>) -> Self {
        Self {
            id: entity.id,
            date: entity.date,
            time: entity.time,
            team_a,
            team_b,
            team_a_score: entity.team_a_score,
            team_b_score: entity.team_b_score,
            team_a_player_goals: entity.team_a_player_goals,
            team_b_player_goals: entity.team_b_player_goals,
            status: entity.status,
            phase: entity.phase,
            phase_name: entity.phase.display_name().to_owned(),
            created_at: format_system_time(entity.created_at),
            updated_at: format_system_time(entity.updated_at),
        }
    }
}

/// Match projection with fully populated teams.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    /// Match identifier.
    pub id: Uuid,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Kick-off time, `HH:MM`.
    pub time: String,
    /// `null` when the team was deleted.
    pub team_a: Option<TeamView>,
    /// `null` when the team was deleted.
    pub team_b: Option<TeamView>,
    /// Goals of team A.
    pub team_a_score: u32,
    /// Goals of team B.
    pub team_b_score: u32,
    /// One scorer name per goal of team A.
    pub team_a_player_goals: Vec<String>,
    /// One scorer name per goal of team B.
    pub team_b_player_goals: Vec<String>,
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Storage code of the phase.
    pub phase: MatchPhase,
    /// Display name of the phase.
    pub phase_name: String,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Last update time, RFC 3339.
    pub updated_at: String,
}

impl MatchDetail {
    /// Build the detail view from a match and its resolved teams.
    pub fn new(entity: MatchEntity, team_a: Option<TeamView>, team_b: Option<TeamView>) -> Self {
        Self {
            id: entity.id,
            date: entity.date,
            time: entity.time,
            team_a,
            team_b,
            team_a_score: entity.team_a_score,
            team_b_score: entity.team_b_score,
            team_a_player_goals: entity.team_a_player_goals,
            team_b_player_goals: entity.team_b_player_goals,
            status: entity.status,
            phase: entity.phase,
            phase_name: entity.phase.display_name().to_owned(),
            created_at: format_system_time(entity.created_at),
            updated_at: format_system_time(entity.updated_at),
        }
    }
}
