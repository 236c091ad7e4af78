//! Data structures for the tournament: entrants, groups, matches, standings, tournament state.

mod entrant;
mod game;
mod group;
mod standing;
mod tournament;

pub use entrant::{Entrant, EntrantId};
pub use game::{EliminationRound, GameMatch, MatchId, MatchSide, MatchStatus, Phase, RoundLabel, Side};
pub use group::{Group, GroupId, SUPER8_GROUP_ID};
pub use standing::{RankingPolicy, Standing};
pub use tournament::{
    BracketState, ErrorKind, Podium, Qualifier, Tournament, TournamentError, TournamentId,
    TournamentKind, TournamentState,
};
