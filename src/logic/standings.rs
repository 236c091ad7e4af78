//! Pool standings: applying match results and ranking under a policy.

use crate::logic::score::parse_score;
use crate::logic::stats::{compute_match_stats, MatchStats};
use crate::models::{
    GameMatch, Group, RankingPolicy, Side, Standing, Tournament, TournamentError,
};
use std::cmp::Ordering;

/// Add one match to a standing, seen from `side`.
pub fn apply_result(standing: &mut Standing, stats: &MatchStats, side: Side) {
    let (sets_for, sets_against) = stats.sets(side);
    let (games_for, games_against) = stats.games(side);
    let (points_for, points_against) = stats.points(side);

    if stats.winner == side {
        standing.matches_won += 1;
    } else {
        standing.matches_lost += 1;
        standing.defeats += 1;
    }
    standing.matches_played += 1;
    standing.sets_won += sets_for;
    standing.sets_lost += sets_against;
    standing.games_won += games_for;
    standing.games_lost += games_against;
    standing.points_won += points_for;
    standing.points_lost += points_against;
}

/// Apply a final pool match to its group: every member of each side gets the side's tallies
/// (in SUPER8 both partners receive the same team games).
pub fn apply_match_to_group(group: &mut Group, game: &GameMatch, stats: &MatchStats) {
    for side in [Side::One, Side::Two] {
        for member in game.side(side).members() {
            match group.standing_mut(member) {
                Some(standing) => apply_result(standing, stats, side),
                None => log::warn!("Entrant {} is not in group {}", member, group.id),
            }
        }
    }
}

/// Order standings under `policy`, best first. Sorting is stable: full ties keep input order.
pub fn rank(standings: &[Standing], policy: RankingPolicy) -> Vec<Standing> {
    let mut ranked = standings.to_vec();
    match policy {
        RankingPolicy::Standard => ranked.sort_by(compare_standard),
        RankingPolicy::Super8 => ranked.sort_by(compare_super8),
    }
    ranked
}

/// Matches won, then sets %, games %, tie-break point difference (all descending).
fn compare_standard(a: &Standing, b: &Standing) -> Ordering {
    b.matches_won
        .cmp(&a.matches_won)
        .then_with(|| desc_f64(a.sets_percentage(), b.sets_percentage()))
        .then_with(|| desc_f64(a.games_percentage(), b.games_percentage()))
        .then_with(|| b.points_diff().cmp(&a.points_diff()))
}

/// Games balance, games won (descending), then fewest defeats.
fn compare_super8(a: &Standing, b: &Standing) -> Ordering {
    b.games_balance()
        .cmp(&a.games_balance())
        .then_with(|| b.games_won.cmp(&a.games_won))
        .then_with(|| a.defeats.cmp(&b.defeats))
}

fn desc_f64(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Rank one of the tournament's pools with the tournament's policy.
pub fn group_ranking(tournament: &Tournament, group_id: &str) -> Result<Vec<Standing>, TournamentError> {
    let group = tournament
        .group(group_id)
        .ok_or_else(|| TournamentError::GroupNotFound(group_id.to_string()))?;
    Ok(rank(&group.standings, tournament.ranking_policy()))
}

/// Rebuild a pool's standings from scratch out of its final matches.
pub fn recompute_group_standings(tournament: &mut Tournament, group_id: &str) -> Result<(), TournamentError> {
    let finals: Vec<(GameMatch, MatchStats)> = tournament
        .matches
        .iter()
        .filter(|m| m.is_final() && m.group_id.as_deref() == Some(group_id))
        .filter_map(|m| {
            let parsed = parse_score(m.score.as_deref()?).ok()?;
            Some((m.clone(), compute_match_stats(&parsed)))
        })
        .collect();

    let group = tournament
        .group_mut(group_id)
        .ok_or_else(|| TournamentError::GroupNotFound(group_id.to_string()))?;
    group.reset_standings();
    for (game, stats) in &finals {
        apply_match_to_group(group, game, stats);
    }
    log::debug!("Group {}: standings recomputed from {} matches", group_id, finals.len());
    Ok(())
}
