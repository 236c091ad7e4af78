//! Per-entrant standing counters and the ranking policies that order them.

use crate::models::entrant::EntrantId;
use serde::{Deserialize, Serialize};

/// How a pool table is ordered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Matches won, sets %, games %, tie-break point difference.
    #[default]
    Standard,
    /// Games balance, games won, fewest defeats.
    Super8,
}

/// Accumulated counters for one entrant, derived from its final pool matches.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub entrant: EntrantId,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    /// Match tie-break points.
    pub points_won: u32,
    pub points_lost: u32,
    pub matches_played: u32,
    pub defeats: u32,
}

impl Standing {
    pub fn new(entrant: EntrantId) -> Self {
        Self {
            entrant,
            ..Self::default()
        }
    }

    /// Sets won over sets played; 0 before any set.
    pub fn sets_percentage(&self) -> f64 {
        ratio(self.sets_won, self.sets_won + self.sets_lost)
    }

    /// Games won over games played; 0 before any game.
    pub fn games_percentage(&self) -> f64 {
        ratio(self.games_won, self.games_won + self.games_lost)
    }

    pub fn points_diff(&self) -> i64 {
        i64::from(self.points_won) - i64::from(self.points_lost)
    }

    pub fn games_balance(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }
}

fn ratio(won: u32, played: u32) -> f64 {
    if played == 0 {
        0.0
    } else {
        f64::from(won) / f64::from(played)
    }
}
