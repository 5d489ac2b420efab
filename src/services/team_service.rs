//! Team registration, standings and profile maintenance.

use std::cmp::Reverse;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{MatchFilter, TeamEntity},
    dto::{
        common::ActionResponse,
        matches::MatchSummary,
        team::{CreateTeamRequest, ResetStatsResponse, TeamView, TeamsQuery, UpdateTeamRequest},
    },
    error::ServiceError,
    services::{
        lookup::{TeamLookup, sort_chronologically},
        rebuild,
    },
    state::SharedState,
};

fn resolve_group(state: &SharedState, input: &str) -> Result<String, ServiceError> {
    state
        .config()
        .canonical_group(input)
        .map(str::to_owned)
        .ok_or_else(|| {
            ServiceError::InvalidInput(format!(
                "unknown group `{input}`; expected one of {}",
                state.config().groups().join(", ")
            ))
        })
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Standings order: group points descending, then name ascending.
fn sort_standings(teams: &mut [TeamEntity]) {
    teams.sort_by(|left, right| {
        (Reverse(left.group_stage.points), &left.name)
            .cmp(&(Reverse(right.group_stage.points), &right.name))
    });
}

/// Register a team in one of the configured groups.
pub async fn create_team(
    state: &SharedState,
    payload: CreateTeamRequest,
) -> Result<TeamView, ServiceError> {
    let group = resolve_group(state, &payload.group)?;
    let store = state.require_store().await?;

    let team = TeamEntity::new(
        payload.name.trim().to_owned(),
        group,
        trim_optional(payload.captain_name),
        trim_optional(payload.image),
    );
    store.insert_team(team.clone()).await?;
    info!(team_id = %team.id, name = %team.name, group = %team.group, "team created");

    Ok(team.into())
}

/// List teams as standings, optionally for one group.
pub async fn list_teams(
    state: &SharedState,
    query: TeamsQuery,
) -> Result<Vec<TeamView>, ServiceError> {
    let group = query
        .group
        .as_deref()
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(|group| resolve_group(state, group))
        .transpose()?;

    let store = state.require_store().await?;
    let mut teams = store.list_teams().await?;
    if let Some(group) = group {
        teams.retain(|team| team.group == group);
    }
    sort_standings(&mut teams);

    Ok(teams.into_iter().map(TeamView::from).collect())
}

/// Fetch a team.
pub async fn get_team(state: &SharedState, id: Uuid) -> Result<TeamView, ServiceError> {
    let store = state.require_store().await?;
    let Some(team) = store.find_team(id).await? else {
        return Err(ServiceError::NotFound(format!("team `{id}` not found")));
    };
    Ok(team.into())
}

/// Update descriptive fields; statistics are never touched here.
pub async fn update_team(
    state: &SharedState,
    id: Uuid,
    payload: UpdateTeamRequest,
) -> Result<TeamView, ServiceError> {
    let group = payload
        .group
        .as_deref()
        .map(|group| resolve_group(state, group))
        .transpose()?;
    let store = state.require_store().await?;

    let update = payload.into_profile_update(group);
    let Some(team) = store.update_team_profile(id, update).await? else {
        return Err(ServiceError::NotFound(format!("team `{id}` not found")));
    };
    info!(team_id = %team.id, name = %team.name, "team updated");

    Ok(team.into())
}

/// Delete a team. Matches referencing it are kept and show the team as missing.
pub async fn delete_team(state: &SharedState, id: Uuid) -> Result<ActionResponse, ServiceError> {
    let store = state.require_store().await?;
    if !store.delete_team(id).await? {
        return Err(ServiceError::NotFound(format!("team `{id}` not found")));
    }
    info!(team_id = %id, "team deleted");
    Ok(ActionResponse::new(format!("team `{id}` deleted")))
}

/// Reset every team and replay the finished matches.
pub async fn reset_stats(state: &SharedState) -> Result<ResetStatsResponse, ServiceError> {
    let store = state.require_store().await?;
    rebuild::rebuild_all_stats(store.as_ref()).await
}

/// Every match of one team, earliest first.
pub async fn team_matches(
    state: &SharedState,
    id: Uuid,
) -> Result<Vec<MatchSummary>, ServiceError> {
    let store = state.require_store().await?;
    if store.find_team(id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("team `{id}` not found")));
    }

    let mut matches = store
        .list_matches(MatchFilter {
            team: Some(id),
            ..MatchFilter::default()
        })
        .await?;
    sort_chronologically(&mut matches);

    let lookup = TeamLookup::load(store.as_ref(), &matches).await?;
    Ok(matches
        .into_iter()
        .map(|entity| lookup.summary(entity))
        .collect())
}
