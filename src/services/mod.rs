/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Resolution of team references for match projections.
pub mod lookup;
/// Match scheduling, transitions and score entry.
pub mod match_service;
/// Full team statistics rebuild from match history.
pub mod rebuild;
/// Finishing a match and updating both teams atomically.
pub mod reconciliation;
/// Display-shaped listing of finished matches.
pub mod results_service;
/// Background storage connection supervisor.
pub mod storage_supervisor;
/// Team registration, standings and profile updates.
pub mod team_service;
