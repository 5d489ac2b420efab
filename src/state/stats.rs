//! Single-match statistics delta shared by result reconciliation and the
//! full rebuild. Applying deltas is plain addition, so replay order never
//! changes the outcome.

use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{MatchEntity, MatchPhase, TeamEntity};

/// Result of a match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// More goals than the opponent.
    Win,
    /// Same number of goals.
    Draw,
    /// Fewer goals than the opponent.
    Loss,
}

impl Outcome {
    /// Equal scores are always a draw; there is no extra time or penalty modeling.
    pub fn from_goals(goals_for: u32, goals_against: u32) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// Group-stage points awarded for this outcome.
    pub fn points(self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }
}

/// Why a stored match cannot be replayed for a team.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// Both sides reference the same team.
    #[error("match `{match_id}` references team `{team_id}` on both sides")]
    SelfMatch {
        /// Offending match.
        match_id: Uuid,
        /// Team found on both sides.
        team_id: Uuid,
    },
    /// The team plays on neither side.
    #[error("match `{match_id}` does not involve team `{team_id}`")]
    NotParticipant {
        /// Offending match.
        match_id: Uuid,
        /// Team the replay was run for.
        team_id: Uuid,
    },
}

/// Contribution of one finished match to one team's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatDelta {
    /// Goals scored by the team.
    pub goals_for: u32,
    /// Goals conceded by the team.
    pub goals_against: u32,
    /// Phase of the match.
    pub phase: MatchPhase,
}

impl StatDelta {
    /// Delta for a team that scored `goals_for` and conceded `goals_against`.
    pub fn new(goals_for: u32, goals_against: u32, phase: MatchPhase) -> Self {
        Self {
            goals_for,
            goals_against,
            phase,
        }
    }

    /// Deltas for team A and team B of `entity`, in that order.
    pub fn for_match(entity: &MatchEntity) -> (Self, Self) {
        (
            Self::new(entity.team_a_score, entity.team_b_score, entity.phase),
            Self::new(entity.team_b_score, entity.team_a_score, entity.phase),
        )
    }

    /// Delta for `team_id`, derived from the side it played on.
    pub fn for_team(entity: &MatchEntity, team_id: Uuid) -> Result<Self, ReplayError> {
        if entity.team_a == entity.team_b {
            return Err(ReplayError::SelfMatch {
                match_id: entity.id,
                team_id: entity.team_a,
            });
        }

        let (delta_a, delta_b) = Self::for_match(entity);
        if entity.team_a == team_id {
            Ok(delta_a)
        } else if entity.team_b == team_id {
            Ok(delta_b)
        } else {
            Err(ReplayError::NotParticipant {
                match_id: entity.id,
                team_id,
            })
        }
    }

    /// Win, draw or loss from the team's point of view.
    pub fn outcome(&self) -> Outcome {
        Outcome::from_goals(self.goals_for, self.goals_against)
    }

    /// Add this delta to `team`. Group-stage counters only move for group matches.
    pub fn apply(&self, team: &mut TeamEntity) {
        let outcome = self.outcome();

        let stats = &mut team.stats;
        stats.goals_scored = stats.goals_scored.saturating_add(self.goals_for);
        stats.goals_accepted = stats.goals_accepted.saturating_add(self.goals_against);
        match outcome {
            Outcome::Win => stats.wins += 1,
            Outcome::Draw => stats.draws += 1,
            Outcome::Loss => stats.losses += 1,
        }

        if self.phase != MatchPhase::Group {
            return;
        }

        let group = &mut team.group_stage;
        group.played_matches += 1;
        group.goals_for = group.goals_for.saturating_add(self.goals_for);
        group.goals_against = group.goals_against.saturating_add(self.goals_against);
        group.points += outcome.points();
        match outcome {
            Outcome::Win => group.wins += 1,
            Outcome::Draw => group.draws += 1,
            Outcome::Loss => group.losses += 1,
        }
    }
}
