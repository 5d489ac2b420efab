use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Progress of a match through its lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum MatchStatus {
    /// Scheduled, not started yet.
    #[serde(rename = "coming", alias = "COMING")]
    Coming,
    /// Currently being played.
    #[serde(rename = "live", alias = "LIVE")]
    Live,
    /// Final score recorded; team statistics reconciled.
    #[serde(rename = "finished", alias = "FINISHED")]
    Finished,
}

impl MatchStatus {
    /// Storage code of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Coming => "coming",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        }
    }
}

/// Tournament stage a match belongs to.
///
/// Serialized with the storage codes; the display names used by the admin UI
/// are accepted as aliases when deserializing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum MatchPhase {
    /// Group stage, the only phase feeding group standings.
    #[serde(rename = "group", alias = "Group Stage")]
    Group,
    /// Round of 16.
    #[serde(rename = "1/8", alias = "Round of 16")]
    RoundOf16,
    /// Quarter finals.
    #[serde(rename = "quarter", alias = "Quarter Finals", alias = "Quarterfinals")]
    Quarter,
    /// Semi finals.
    #[serde(rename = "semi", alias = "Semi Finals", alias = "Semifinals")]
    Semi,
    /// Final.
    #[serde(rename = "final", alias = "Final")]
    Final,
}

impl MatchPhase {
    /// Every phase in tournament order.
    pub const ALL: [MatchPhase; 5] = [
        MatchPhase::Group,
        MatchPhase::RoundOf16,
        MatchPhase::Quarter,
        MatchPhase::Semi,
        MatchPhase::Final,
    ];

    /// Storage code of the phase.
    pub fn as_code(self) -> &'static str {
        match self {
            MatchPhase::Group => "group",
            MatchPhase::RoundOf16 => "1/8",
            MatchPhase::Quarter => "quarter",
            MatchPhase::Semi => "semi",
            MatchPhase::Final => "final",
        }
    }
}

/// Counters accumulated over every finished match of a team, whatever the phase.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    /// Matches won.
    pub wins: u32,
    /// Matches drawn.
    pub draws: u32,
    /// Matches lost.
    pub losses: u32,
    /// Goals scored by the team.
    pub goals_scored: u32,
    /// Goals conceded by the team.
    pub goals_accepted: u32,
}

/// Counters accumulated over finished group-stage matches only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupStageDetails {
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

/// Representation of a team stored in persistence and shared across layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Unique display name, also used as natural key by organizers.
    pub name: String,
    /// Group label the team was drawn into.
    pub group: String,
    /// Optional captain name.
    pub captain_name: Option<String>,
    /// Logo or picture location.
    pub image: Option<String>,
    /// Statistics over all phases.
    pub stats: TeamStats,
    /// Statistics restricted to the group stage.
    pub group_stage: GroupStageDetails,
    /// Creation time.
    pub created_at: SystemTime,
    /// Last time this team was updated.
    pub updated_at: SystemTime,
}

impl TeamEntity {
    /// Build a team with zeroed statistics.
    pub fn new(
        name: String,
        group: String,
        captain_name: Option<String>,
        image: Option<String>,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            name,
            group,
            captain_name,
            image,
            stats: TeamStats::default(),
            group_stage: GroupStageDetails::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Zero every cumulative and group-stage counter.
    pub fn reset_stats(&mut self) {
        self.stats = TeamStats::default();
        self.group_stage = GroupStageDetails::default();
    }

    /// Statistics-only write for this team, used inside store transactions.
    pub fn stats_write(&self) -> TeamStatsWrite {
        TeamStatsWrite {
            team_id: self.id,
            stats: self.stats,
            group_stage: self.group_stage,
            updated_at: self.updated_at,
        }
    }
}

/// Descriptive fields of a team, editable by organizers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New group label, already canonical.
    pub group: Option<String>,
    /// `Some(None)` clears the captain.
    pub captain_name: Option<Option<String>>,
    /// `Some(None)` clears the image.
    pub image: Option<Option<String>>,
}

impl TeamProfileUpdate {
    /// Apply the provided fields onto `team`.
    pub fn apply_to(&self, team: &mut TeamEntity) {
        if let Some(name) = &self.name {
            team.name = name.clone();
        }
        if let Some(group) = &self.group {
            team.group = group.clone();
        }
        if let Some(captain_name) = &self.captain_name {
            team.captain_name = captain_name.clone();
        }
        if let Some(image) = &self.image {
            team.image = image.clone();
        }
    }
}

/// Representation of a scheduled or played match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEntity {
    /// Generated identifier.
    pub id: Uuid,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Kick-off time, `HH:MM`.
    pub time: String,
    /// Team listed first.
    pub team_a: Uuid,
    /// Team listed second.
    pub team_b: Uuid,
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
    /// Tournament phase the match belongs to.
    pub phase: MatchPhase,
    /// Creation time.
    pub created_at: SystemTime,
    /// Last time this match was updated.
    pub updated_at: SystemTime,
}

impl MatchEntity {
    /// Schedule a new match in the `coming` status with a blank score.
    pub fn scheduled(
        date: String,
        time: String,
        team_a: Uuid,
        team_b: Uuid,
        phase: MatchPhase,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            date,
            time,
            team_a,
            team_b,
            team_a_score: 0,
            team_b_score: 0,
            team_a_player_goals: Vec::new(),
            team_b_player_goals: Vec::new(),
            status: MatchStatus::Coming,
            phase,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `team_id` plays on either side.
    pub fn involves(&self, team_id: Uuid) -> bool {
        self.team_a == team_id || self.team_b == team_id
    }

    /// Sort key ordering matches chronologically.
    pub fn schedule_key(&self) -> (&str, &str) {
        (self.date.as_str(), self.time.as_str())
    }
}

/// Replacement of a match document, optionally guarded by the status it had when read.
#[derive(Debug, Clone)]
pub struct MatchWrite {
    /// Full replacement document.
    pub entity: MatchEntity,
    /// When set, the write only applies if the stored match still has this status.
    pub expected_status: Option<MatchStatus>,
}

/// Statistics-only update of a team; descriptive fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamStatsWrite {
    /// Team to update.
    pub team_id: Uuid,
    /// New cumulative counters.
    pub stats: TeamStats,
    /// New group-stage counters.
    pub group_stage: GroupStageDetails,
    /// Timestamp stored alongside the counters.
    pub updated_at: SystemTime,
}

/// Set of writes a store applies all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    /// Match replacements.
    pub matches: Vec<MatchWrite>,
    /// Team statistics updates.
    pub team_stats: Vec<TeamStatsWrite>,
}

impl WriteBatch {
    /// Add a match replacement guarded by `expected_status`.
    pub fn with_match(mut self, entity: MatchEntity, expected_status: Option<MatchStatus>) -> Self {
        self.matches.push(MatchWrite {
            entity,
            expected_status,
        });
        self
    }

    /// Add a statistics update for `team`.
    pub fn with_team_stats(mut self, team: &TeamEntity) -> Self {
        self.team_stats.push(team.stats_write());
        self
    }
}

/// Filter applied when listing matches; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    /// Exact calendar day.
    pub date: Option<String>,
    /// Tournament phase.
    pub phase: Option<MatchPhase>,
    /// Lifecycle status.
    pub status: Option<MatchStatus>,
    /// Matches where this team plays on either side.
    pub team: Option<Uuid>,
}

impl MatchFilter {
    /// Finished matches of one team, the replay set of the stats rebuild.
    pub fn finished_for_team(team_id: Uuid) -> Self {
        Self {
            status: Some(MatchStatus::Finished),
            team: Some(team_id),
            ..Self::default()
        }
    }

    /// Whether `entity` satisfies every set criterion.
    pub fn matches(&self, entity: &MatchEntity) -> bool {
        self.date.as_deref().is_none_or(|date| entity.date == date)
            && self.phase.is_none_or(|phase| entity.phase == phase)
            && self.status.is_none_or(|status| entity.status == status)
            && self.team.is_none_or(|team| entity.involves(team))
    }
}
