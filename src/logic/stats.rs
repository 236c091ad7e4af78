//! Match statistics derived from a validated score.

use crate::logic::score::ParsedScore;
use crate::models::Side;
use serde::{Deserialize, Serialize};

/// Winner and per-side tallies of one match. Arrays are indexed by [`Side::index`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub winner: Side,
    pub sets_won: [u32; 2],
    pub games_won: [u32; 2],
    /// Match tie-break points; zero when no tie-break was played.
    pub tie_break_points: [u32; 2],
}

impl MatchStats {
    pub fn loser(&self) -> Side {
        self.winner.opponent()
    }

    /// (for, against) sets from one side's point of view.
    pub fn sets(&self, side: Side) -> (u32, u32) {
        view(self.sets_won, side)
    }

    pub fn games(&self, side: Side) -> (u32, u32) {
        view(self.games_won, side)
    }

    pub fn points(&self, side: Side) -> (u32, u32) {
        view(self.tie_break_points, side)
    }
}

fn view(values: [u32; 2], side: Side) -> (u32, u32) {
    (values[side.index()], values[side.opponent().index()])
}

/// Compute winner, sets, games and tie-break points for a validated score.
///
/// Sets are counted from the played sets; a match tie-break counts as the deciding
/// set for its winner (so a tie-break match ends 2-1). Tie-break points are never games.
pub fn compute_match_stats(score: &ParsedScore) -> MatchStats {
    let mut sets_won = [0u32; 2];
    let mut games_won = [0u32; 2];
    for set in &score.sets {
        sets_won[set.winner().index()] += 1;
        games_won[0] += set.games_1;
        games_won[1] += set.games_2;
    }

    let mut tie_break_points = [0u32; 2];
    if let Some(tb) = &score.match_tie_break {
        sets_won[tb.winner().index()] += 1;
        tie_break_points = [tb.points_1, tb.points_2];
    }

    MatchStats {
        winner: score.winner,
        sets_won,
        games_won,
        tie_break_points,
    }
}
