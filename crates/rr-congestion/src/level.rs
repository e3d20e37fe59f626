//! Discrete congestion levels and their cost multipliers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Density at or above which a segment is `Medium`.
pub const MEDIUM_THRESHOLD: f64 = 0.3;
/// Density at or above which a segment is `High`.
pub const HIGH_THRESHOLD: f64 = 0.7;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    /// Open road.  Also the level of any segment without a sample.
    #[default]
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    /// Factor applied to a segment's base distance to approximate its
    /// travel-time cost.  Never below `1.0`.
    #[inline]
    pub const fn multiplier(self) -> f64 {
        match self {
            CongestionLevel::Low    => 1.0,
            CongestionLevel::Medium => 1.5,
            CongestionLevel::High   => 3.0,
        }
    }

    /// The highest level whose multiplier does not exceed `multiplier`.
    /// Used to report a cached edge weight as a level.
    pub fn from_multiplier(multiplier: f64) -> CongestionLevel {
        if multiplier >= CongestionLevel::High.multiplier() {
            CongestionLevel::High
        } else if multiplier >= CongestionLevel::Medium.multiplier() {
            CongestionLevel::Medium
        } else {
            CongestionLevel::Low
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CongestionLevel::Low    => "low",
            CongestionLevel::Medium => "medium",
            CongestionLevel::High   => "high",
        })
    }
}

/// Classify a traffic density in `[0, 1]`.
#[inline]
pub fn classify(density: f64) -> CongestionLevel {
    if density >= HIGH_THRESHOLD {
        CongestionLevel::High
    } else if density >= MEDIUM_THRESHOLD {
        CongestionLevel::Medium
    } else {
        CongestionLevel::Low
    }
}

#[inline]
pub fn multiplier_for(level: CongestionLevel) -> f64 {
    level.multiplier()
}
