//! Mapping between the phase display names shown to organizers and the storage codes.

use std::str::FromStr;

use thiserror::Error;

use crate::dao::models::MatchPhase;

/// Stage label that matches no known phase.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown stage `{0}`")]
pub struct UnknownStage(pub String);

impl MatchPhase {
    /// Canonical display name of the phase.
    pub fn display_name(self) -> &'static str {
        match self {
            MatchPhase::Group => "Group Stage",
            MatchPhase::RoundOf16 => "Round of 16",
            MatchPhase::Quarter => "Quarter Finals",
            MatchPhase::Semi => "Semi Finals",
            MatchPhase::Final => "Final",
        }
    }
}

impl FromStr for MatchPhase {
    type Err = UnknownStage;

    /// Accepts storage codes and display names, including the single-word
    /// spellings ("Quarterfinals", "Semifinals"), ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let phase = match normalized.as_str() {
            "group" | "group stage" => MatchPhase::Group,
            "1/8" | "round of 16" => MatchPhase::RoundOf16,
            "quarter" | "quarter finals" | "quarterfinals" => MatchPhase::Quarter,
            "semi" | "semi finals" | "semifinals" => MatchPhase::Semi,
            "final" => MatchPhase::Final,
            _ => return Err(UnknownStage(value.to_owned())),
        };
        Ok(phase)
    }
}

/// Parse an optional `stage` query parameter; blank values mean "no filter".
pub fn parse_stage_filter(stage: Option<&str>) -> Result<Option<MatchPhase>, UnknownStage> {
    match stage.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}
