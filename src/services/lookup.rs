//! Explicit resolution of the team references carried by matches.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    dao::{
        models::{MatchEntity, TeamEntity},
        storage::StorageResult,
        tournament_store::TournamentStore,
    },
    dto::{
        matches::{MatchDetail, MatchSummary},
        results::MatchResult,
        team::{TeamBrief, TeamView},
    },
};

/// Teams referenced by a set of matches, loaded in one store round trip.
///
/// References to deleted teams simply resolve to `None`.
#[derive(Debug, Default)]
pub struct TeamLookup {
    teams: HashMap<Uuid, TeamEntity>,
}

impl TeamLookup {
    /// Load every team referenced by `matches`.
    pub async fn load(store: &dyn TournamentStore, matches: &[MatchEntity]) -> StorageResult<Self> {
        let mut ids: Vec<Uuid> = matches
            .iter()
            .flat_map(|entity| [entity.team_a, entity.team_b])
            .collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(Self::default());
        }

        let teams = store.find_teams(ids).await?;
        Ok(Self::from_teams(teams))
    }

    /// Build a lookup from already loaded teams.
    pub fn from_teams(teams: impl IntoIterator<Item = TeamEntity>) -> Self {
        Self {
            teams: teams.into_iter().map(|team| (team.id, team)).collect(),
        }
    }

    /// Resolved team, `None` when it was deleted.
    pub fn get(&self, id: Uuid) -> Option<&TeamEntity> {
        self.teams.get(&id)
    }

    /// Name of the resolved team.
    pub fn name(&self, id: Uuid) -> Option<String> {
        self.get(id).map(|team| team.name.clone())
    }

    /// Listing projection with team briefs.
    pub fn summary(&self, entity: MatchEntity) -> MatchSummary {
        let team_a = self.get(entity.team_a).map(TeamBrief::from);
        let team_b = self.get(entity.team_b).map(TeamBrief::from);
        MatchSummary::new(entity, team_a, team_b)
    }

    /// Detail projection with full team views.
    pub fn detail(&self, entity: MatchEntity) -> MatchDetail {
        let team_a = self.get(entity.team_a).cloned().map(TeamView::from);
        let team_b = self.get(entity.team_b).cloned().map(TeamView::from);
        MatchDetail::new(entity, team_a, team_b)
    }

    /// Display-shaped finished result.
    pub fn result(&self, entity: MatchEntity) -> MatchResult {
        let team_a = self.name(entity.team_a);
        let team_b = self.name(entity.team_b);
        MatchResult::new(entity, team_a, team_b)
    }
}

/// Order matches by date then time, earliest first.
pub fn sort_chronologically(matches: &mut [MatchEntity]) {
    matches.sort_by(|left, right| left.schedule_key().cmp(&right.schedule_key()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{
        models::MatchPhase, tournament_store::memory::MemoryTournamentStore,
    };

    #[tokio::test]
    async fn dangling_references_resolve_to_none() {
        let store = MemoryTournamentStore::new();
        let lions = TeamEntity::new("Lions".into(), "A".into(), None, None);
        store.insert_team(lions.clone()).await.unwrap();

        let entity = MatchEntity::scheduled(
            "2026-06-14".into(),
            "18:00".into(),
            lions.id,
            Uuid::new_v4(),
            MatchPhase::Group,
        );
        let lookup = TeamLookup::load(&store, std::slice::from_ref(&entity))
            .await
            .unwrap();

        let summary = lookup.summary(entity);
        assert_eq!(summary.team_a.map(|team| team.name), Some("Lions".into()));
        assert!(summary.team_b.is_none());
    }

    #[test]
    fn chronological_sort_uses_date_then_time() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut matches = vec![
            MatchEntity::scheduled("2026-06-15".into(), "12:00".into(), a, b, MatchPhase::Group),
            MatchEntity::scheduled("2026-06-14".into(), "20:00".into(), a, b, MatchPhase::Group),
            MatchEntity::scheduled("2026-06-14".into(), "18:00".into(), a, b, MatchPhase::Group),
        ];
        sort_chronologically(&mut matches);
        let keys: Vec<_> = matches
            .iter()
            .map(|entity| format!("{} {}", entity.date, entity.time))
            .collect();
        assert_eq!(keys, ["2026-06-14 18:00", "2026-06-14 20:00", "2026-06-15 12:00"]);
    }
}
