//! Match (game), sides, phases and round labels.

use crate::models::entrant::EntrantId;
use crate::models::group::GroupId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two opposing sides of a match. Scores are always written from side one's view.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// 0 for side one, 1 for side two (index into per-side arrays).
    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }
}

/// Stage of the tournament a match belongs to. SUPER8 rotations count as pool play.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Group,
    Elimination,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Final,
}

/// Named elimination rounds, from the widest bracket down to the final.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationRound {
    RoundOf64,
    RoundOf32,
    RoundOf16,
    Quarterfinal,
    Semifinal,
    Final,
}

/// Bracket ladder: round name and the number of entrants it is built for.
const ROUND_LADDER: [(EliminationRound, usize); 6] = [
    (EliminationRound::Final, 2),
    (EliminationRound::Semifinal, 4),
    (EliminationRound::Quarterfinal, 8),
    (EliminationRound::RoundOf16, 16),
    (EliminationRound::RoundOf32, 32),
    (EliminationRound::RoundOf64, 64),
];

impl EliminationRound {
    /// Opening round and target bracket size for `qualifiers` entrants: the smallest
    /// ladder size that fits them. None below 2 or above 64.
    pub fn for_qualifiers(qualifiers: usize) -> Option<(Self, usize)> {
        if qualifiers < 2 {
            return None;
        }
        ROUND_LADDER
            .iter()
            .copied()
            .find(|&(_, size)| size >= qualifiers)
    }

    /// Number of entrants a full round of this name holds.
    pub fn size(self) -> usize {
        ROUND_LADDER
            .iter()
            .find(|(round, _)| *round == self)
            .map(|&(_, size)| size)
            .unwrap_or(2)
    }

    /// The round played after this one; None after the final.
    pub fn next(self) -> Option<Self> {
        let half = self.size() / 2;
        ROUND_LADDER
            .iter()
            .find(|&&(_, size)| size == half)
            .map(|&(round, _)| round)
    }
}

/// Round label carried by a match: a bracket round, or a SUPER8 rotation number (1-based).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundLabel {
    Elimination(EliminationRound),
    Rotation(u32),
}

/// One side of a match: the entrant and, in SUPER8, the partner for this match only.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSide {
    pub entrant: EntrantId,
    pub partner: Option<EntrantId>,
}

impl MatchSide {
    pub fn single(entrant: EntrantId) -> Self {
        Self {
            entrant,
            partner: None,
        }
    }

    pub fn pair(entrant: EntrantId, partner: EntrantId) -> Self {
        Self {
            entrant,
            partner: Some(partner),
        }
    }

    /// Everyone on this side whose standing is affected by the result.
    pub fn members(&self) -> impl Iterator<Item = EntrantId> + '_ {
        std::iter::once(self.entrant).chain(self.partner)
    }

    pub fn contains(&self, id: EntrantId) -> bool {
        self.entrant == id || self.partner == Some(id)
    }
}

/// A single match between two sides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub side_1: MatchSide,
    pub side_2: MatchSide,
    pub phase: Phase,
    /// None for fixed-doubles pool matches.
    pub round: Option<RoundLabel>,
    /// Pool the match counts for (group letter, or the SUPER8 pool).
    pub group_id: Option<GroupId>,
    pub status: MatchStatus,
    /// Raw score as entered, set once the match is final.
    pub score: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameMatch {
    fn new(
        tournament_id: TournamentId,
        side_1: MatchSide,
        side_2: MatchSide,
        phase: Phase,
        round: Option<RoundLabel>,
        group_id: Option<GroupId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            side_1,
            side_2,
            phase,
            round,
            group_id,
            status: MatchStatus::Pending,
            score: None,
            completed_at: None,
        }
    }

    /// Round-robin match inside a group.
    pub fn group(
        tournament_id: TournamentId,
        group_id: GroupId,
        entrant_1: EntrantId,
        entrant_2: EntrantId,
    ) -> Self {
        Self::new(
            tournament_id,
            MatchSide::single(entrant_1),
            MatchSide::single(entrant_2),
            Phase::Group,
            None,
            Some(group_id),
        )
    }

    /// Bracket match for the given round.
    pub fn elimination(
        tournament_id: TournamentId,
        round: EliminationRound,
        entrant_1: EntrantId,
        entrant_2: EntrantId,
    ) -> Self {
        Self::new(
            tournament_id,
            MatchSide::single(entrant_1),
            MatchSide::single(entrant_2),
            Phase::Elimination,
            Some(RoundLabel::Elimination(round)),
            None,
        )
    }

    /// SUPER8 rotation match (2v2 with partners for this round only).
    pub fn rotation(
        tournament_id: TournamentId,
        group_id: GroupId,
        round: u32,
        side_1: MatchSide,
        side_2: MatchSide,
    ) -> Self {
        Self::new(
            tournament_id,
            side_1,
            side_2,
            Phase::Group,
            Some(RoundLabel::Rotation(round)),
            Some(group_id),
        )
    }

    pub fn is_final(&self) -> bool {
        self.status == MatchStatus::Final
    }

    pub fn side(&self, side: Side) -> &MatchSide {
        match side {
            Side::One => &self.side_1,
            Side::Two => &self.side_2,
        }
    }

    pub fn involves(&self, id: EntrantId) -> bool {
        self.side_1.contains(id) || self.side_2.contains(id)
    }

    /// Bracket round of this match, if it is an elimination match.
    pub fn elimination_round(&self) -> Option<EliminationRound> {
        match self.round {
            Some(RoundLabel::Elimination(round)) => Some(round),
            _ => None,
        }
    }
}
