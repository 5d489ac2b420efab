use crate::{
    dao::models::{MatchFilter, MatchStatus},
    dto::{
        phase::parse_stage_filter,
        results::{MatchResult, ResultsQuery},
    },
    error::ServiceError,
    services::lookup::{TeamLookup, sort_chronologically},
    state::SharedState,
};

/// Finished matches of a phase, latest first.
pub async fn list_results(
    state: &SharedState,
    query: ResultsQuery,
) -> Result<Vec<MatchResult>, ServiceError> {
    let phase = parse_stage_filter(query.stage.as_deref())
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let store = state.require_store().await?;
    let mut matches = store
        .list_matches(MatchFilter {
            phase,
            status: Some(MatchStatus::Finished),
            ..MatchFilter::default()
        })
        .await?;
    sort_chronologically(&mut matches);
    matches.reverse();

    let lookup = TeamLookup::load(store.as_ref(), &matches).await?;
    Ok(matches
        .into_iter()
        .map(|entity| lookup.result(entity))
        .collect())
}
