//! Beach tennis tournament organizer: library with models and business logic.
//!
//! ITF score grammar, group stage, elimination bracket and the SUPER8 rotating-partner format.

pub mod logic;
pub mod models;
pub mod roster;
pub mod store;

pub use logic::{
    compute_match_stats, correct_group_result, generate_bracket, group_ranking, parse_score, rank,
    record_result, start_tournament, MatchStats, ParsedScore, ScoreError,
};
pub use models::{
    BracketState, EliminationRound, Entrant, EntrantId, ErrorKind, GameMatch, Group, GroupId,
    MatchId, MatchSide, MatchStatus, Phase, Podium, RankingPolicy, RoundLabel, Side, Standing,
    Tournament, TournamentError, TournamentId, TournamentKind, TournamentState,
};
pub use roster::{parse_roster, RosterError};
pub use store::TournamentStore;
