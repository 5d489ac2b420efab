//! Display-shaped projection of finished matches.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::dao::models::{MatchEntity, MatchPhase};

/// Query string accepted by `GET /results`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResultsQuery {
    /// Phase display name or storage code.
    pub stage: Option<String>,
}

/// Side of the pitch a goal was scored for.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
pub enum GoalSide {
    /// Goal credited to team A.
    #[serde(rename = "A")]
    TeamA,
    /// Goal credited to team B.
    #[serde(rename = "B")]
    TeamB,
}

/// One goal in a finished match.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct GoalEntry {
    /// Scorer name.
    pub player: String,
    /// Name of the scoring team, `null` when the team was deleted.
    pub team: Option<String>,
    /// Side the goal counts for.
    pub side: GoalSide,
}

/// Finished match flattened for display.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Match identifier.
    pub id: Uuid,
    /// Calendar day.
    pub date: String,
    /// Kick-off time.
    pub time: String,
    /// Storage code of the phase.
    pub phase: MatchPhase,
    /// Display name of the phase.
    pub stage: String,
    /// Name of team A, `null` when deleted.
    pub team_a: Option<String>,
    /// Name of team B, `null` when deleted.
    pub team_b: Option<String>,
    /// Final goals of team A.
    pub team_a_score: u32,
    /// Final goals of team B.
    pub team_b_score: u32,
    /// Team A goals in order, then team B goals in order.
    pub goals: Vec<GoalEntry>,
}

impl MatchResult {
    /// Flatten `entity` using the resolved team names.
    pub fn new(entity: MatchEntity, team_a: Option<String>, team_b: Option<String>) -> Self {
        let goals = entity
            .team_a_player_goals
            .into_iter()
            .map(|player| GoalEntry {
                player,
                team: team_a.clone(),
                side: GoalSide::TeamA,
            })
            .chain(
                entity
                    .team_b_player_goals
                    .into_iter()
                    .map(|player| GoalEntry {
                        player,
                        team: team_b.clone(),
                        side: GoalSide::TeamB,
                    }),
            )
            .collect();

        Self {
            id: entity.id,
            date: entity.date,
            time: entity.time,
            phase: entity.phase,
            stage: entity.phase.display_name().to_owned(),
            team_a,
            team_b,
            team_a_score: entity.team_a_score,
            team_b_score: entity.team_b_score,
            goals,
        }
    }
}
