//! DTO definitions for the team endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{TeamEntity, TeamProfileUpdate},
    dto::{
        format_system_time,
        validation::{validate_not_blank, validate_optional_url},
    },
};

/// Payload registering a team into a group.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    /// Unique display name.
    #[validate(length(max = 80), custom(function = "validate_not_blank"))]
    pub name: String,
    /// Group label; must be one of the configured groups (case-insensitive).
    #[validate(custom(function = "validate_not_blank"))]
    pub group: String,
    /// Optional captain name.
    #[serde(default)]
    pub captain_name: Option<String>,
    /// Logo or picture URL.
    #[serde(default)]
    #[validate(url)]
    pub image: Option<String>,
}

/// Partial update of a team's descriptive fields.
///
/// Statistics are not part of this payload and unknown fields are ignored,
/// so they can never be written through it.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New group label.
    #[serde(default)]
    pub group: Option<String>,
    /// If not specified, does not change it.
    /// If null is specified, removes the captain.
    #[serde(default, with = "serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub captain_name: Option<Option<String>>,
    /// If not specified, does not change it.
    /// If null is specified, removes the image.
    #[serde(default, with = "serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

impl Validate for UpdateTeamRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = &self.name {
            if let Err(e) = validate_not_blank(name) {
                errors.add("name", e);
            }
        }
        if let Some(group) = &self.group {
            if let Err(e) = validate_not_blank(group) {
                errors.add("group", e);
            }
        }
        if let Some(Some(image)) = &self.image {
            if let Err(e) = validate_optional_url(image) {
                errors.add("image", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateTeamRequest {
    /// Convert into a profile update, with `group` already resolved to its canonical label.
    pub fn into_profile_update(self, group: Option<String>) -> TeamProfileUpdate {
        TeamProfileUpdate {
            name: self.name.map(|name| name.trim().to_owned()),
            group,
            captain_name: self.captain_name,
            image: self.image,
        }
    }
}

/// Query string accepted by `GET /teams`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeamsQuery {
    /// Only list the teams of this group.
    pub group: Option<String>,
}

/// Cumulative counters of a team across all phases.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatsView {
    /// Matches won.
    pub wins: u32,
    /// Matches drawn.
    pub draws: u32,
    /// Matches lost.
    pub losses: u32,
    /// Goals scored.
    pub goals_scored: u32,
    /// Goals conceded.
    pub goals_accepted: u32,
}

/// Group-stage counters of a team, the basis of the standings.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupStageView {
    /// 3 per win, 1 per draw.
    pub points: u32,
    /// Finished group-stage matches.
    pub played_matches: u32,
    /// Group-stage wins.
    pub wins: u32,
    /// Group-stage draws.
    pub draws: u32,
    /// Group-stage losses.
    pub losses: u32,
    /// Goals scored in the group stage.
    pub goals_for: u32,
    /// Goals conceded in the group stage.
    pub goals_against: u32,
}

/// Full projection of a team.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    /// Team identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Group label.
    pub group: String,
    /// Captain name, if any.
    pub captain_name: Option<String>,
    /// Logo or picture URL, if any.
    pub image: Option<String>,
    /// Counters over every phase, flattened into the team object.
    #[serde(flatten)]
    pub stats: TeamStatsView,
    /// Group-stage counters.
    pub group_stage_details: GroupStageView,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Last update time, RFC 3339.
    pub updated_at: String,
}

impl From<TeamEntity> for TeamView {
    fn from(team: TeamEntity) -> Self {
        Self {
            id: team.id,
            name: team.name,
            group: team.group,
            captain_name: team.captain_name,
            image: team.image,
            stats: TeamStatsView {
                wins: team.stats.wins,
                draws: team.stats.draws,
                losses: team.stats.losses,
                goals_scored: team.stats.goals_scored,
                goals_accepted: team.stats.goals_accepted,
            },
            group_stage_details: GroupStageView {
                points: team.group_stage.points,
                played_matches: team.group_stage.played_matches,
                wins: team.group_stage.wins,
                draws: team.group_stage.draws,
                losses: team.group_stage.losses,
                goals_for: team.group_stage.goals_for,
                goals_against: team.group_stage.goals_against,
            },
            created_at: format_system_time(team.created_at),
            updated_at: format_system_time(team.updated_at),
        }
    }
}

/// Minimal team projection embedded in match listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamBrief {
    /// Team identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Logo or picture URL, if any.
    pub image: Option<String>,
}

impl From<&TeamEntity> for TeamBrief {
    fn from(team: &TeamEntity) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            image: team.image.clone(),
        }
    }
}

/// Outcome of the rebuild for a single team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamResetStatus {
    /// Statistics were recomputed and stored.
    Success,
    /// The team kept its previous statistics.
    Error,
}

/// Per-team entry of the rebuild report.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamResetResult {
    /// Team identifier.
    pub team_id: Uuid,
    /// Team name at rebuild time.
    pub team_name: String,
    /// Whether the rebuild succeeded for this team.
    pub status: TeamResetStatus,
    /// Failure reason when `status` is `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Report returned by `POST /teams/reset-stats`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetStatsResponse {
    /// True when every team was rebuilt.
    pub success: bool,
    /// Teams rebuilt.
    pub succeeded: usize,
    /// Teams left untouched after an error.
    pub failed: usize,
    /// One entry per team.
    pub results: Vec<TeamResetResult>,
}
