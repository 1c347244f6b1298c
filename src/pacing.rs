use crate::error::PlannerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How quickly the class moves through its topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Pacing {
    pub const ALL: [Pacing; 3] = [Pacing::Slow, Pacing::Normal, Pacing::Fast];

    /// Lessons-per-topic factor: Slow 2, Normal 1, Fast 0.5.
    pub fn factor(self) -> f64 {
        match self {
            Pacing::Slow => 2.0,
            Pacing::Normal => 1.0,
            Pacing::Fast => 0.5,
        }
    }

    /// Whole number of consecutive lessons each topic receives.
    ///
    /// Ties round to even, so Fast (0.5) rounds to 0 and is then lifted to the
    /// minimum of one lesson per topic.
    pub fn repeat_count(self) -> usize {
        (self.factor().round_ties_even() as usize).max(1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pacing::Slow => "Slow",
            Pacing::Normal => "Normal",
            Pacing::Fast => "Fast",
        }
    }
}

impl fmt::Display for Pacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pacing {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(Pacing::Slow),
            "normal" => Ok(Pacing::Normal),
            "fast" => Ok(Pacing::Fast),
            other => Err(PlannerError::invalid(format!(
                "unknown pacing '{other}' (expected slow, normal or fast)"
            ))),
        }
    }
}
