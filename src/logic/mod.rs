//! Tournament engine: score grammar, match stats, groups, standings, bracket, SUPER8.

mod bracket;
mod groups;
mod results;
mod score;
mod setup;
mod standings;
mod stats;
mod super8;

pub use bracket::{
    advance_bracket, generate_bracket, plan_next_round, qualify, seed_bracket, BracketSeeding,
    RoundAdvance, QUALIFYING_POSITIONS,
};
pub use groups::{distribute_groups, generate_group_stage, round_robin, MAX_GROUP_SIZE, MIN_GROUP_SIZE};
pub use results::{correct_group_result, record_result};
pub use score::{
    parse_score, validate_match_tie_break, validate_set, ParsedScore, ScoreError, SetScore,
    TieBreakScore, MAX_SCORE_VALUE,
};
pub use setup::start_tournament;
pub use standings::{apply_match_to_group, apply_result, group_ranking, rank, recompute_group_standings};
pub use stats::{compute_match_stats, MatchStats};
pub use super8::{
    generate_super8_pairings, partnership_coverage, round_budget, start_super8,
    validate_super8_entrants, Pairing, Super8Schedule, SUPER8_MAX_ENTRANTS, SUPER8_MIN_ENTRANTS,
};
