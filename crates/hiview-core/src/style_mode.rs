use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Node coloring modes offered by the property panel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum StyleMode {
    /// Colors come from group membership (`data(color)`).
    #[default]
    Membership,
    BaitPrey,
    DominantEvidence,
    Pleiotropy,
    Curation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown style mode: {0}")]
pub struct UnknownStyleMode(pub String);

impl StyleMode {
    pub const ALL: [StyleMode; 5] = [
        StyleMode::Membership,
        StyleMode::BaitPrey,
        StyleMode::DominantEvidence,
        StyleMode::Pleiotropy,
        StyleMode::Curation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StyleMode::Membership => "membership",
            StyleMode::BaitPrey => "bait_prey",
            StyleMode::DominantEvidence => "dominant_evidence",
            StyleMode::Pleiotropy => "pleiotropy",
            StyleMode::Curation => "curation",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StyleMode::Membership => "Proteins colored by their assembly membership",
            StyleMode::BaitPrey => "Whether a protein is an AP-MS bait or prey",
            StyleMode::DominantEvidence => {
                "Evidence class with the highest cumulative score for a protein"
            }
            StyleMode::Pleiotropy => "Proteins associated with more than one assembly",
            StyleMode::Curation => "Proteins found in curated systematic lists",
        }
    }
}

impl FromStr for StyleMode {
    type Err = UnknownStyleMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleMode::ALL
            .into_iter()
            .find(|mode| mode.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStyleMode(s.to_string()))
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_mode_keys_round_trip() {
        for mode in StyleMode::ALL {
            assert_eq!(mode.key().parse::<StyleMode>().unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.key()));
        }
    }

    #[test]
    fn test_unknown_style_mode() {
        assert_eq!(
            "rainbow".parse::<StyleMode>(),
            Err(UnknownStyleMode("rainbow".into()))
        );
    }
}
