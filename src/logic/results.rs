//! Score submission: validate, finalize the match, update standings or the bracket.

use crate::logic::bracket::advance_bracket;
use crate::logic::score::parse_score;
use crate::logic::standings::{apply_match_to_group, rank, recompute_group_standings};
use crate::logic::stats::{compute_match_stats, MatchStats};
use crate::models::{
    EliminationRound, GameMatch, MatchId, MatchStatus, Phase, Podium, RankingPolicy,
    Tournament, TournamentError, TournamentState,
};
use chrono::Utc;
use rand::Rng;

/// Record the result of a pending match.
///
/// The score must pass the ITF grammar. Pool matches update their group's standings
/// (and finish a SUPER8 tournament once its last match is in); bracket matches eliminate
/// the loser, schedule the next round when the current one is complete, and decide the
/// podium when the final is played. A match with a result is never overwritten here.
pub fn record_result<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    match_id: MatchId,
    raw_score: &str,
    rng: &mut R,
) -> Result<MatchStats, TournamentError> {
    let game = tournament
        .match_by_id(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game.is_final() {
        return Err(TournamentError::MatchAlreadyFinal(match_id));
    }
    let phase_open = match game.phase {
        Phase::Group => matches!(
            tournament.state,
            TournamentState::GroupStage | TournamentState::Super8Rounds
        ),
        Phase::Elimination => tournament.state == TournamentState::Elimination,
    };
    if !phase_open {
        return Err(TournamentError::InvalidState);
    }
    let parsed = parse_score(raw_score)?;
    let stats = compute_match_stats(&parsed);

    let mut staged = tournament.clone();
    let game = finalize(&mut staged, match_id, raw_score)?;
    log::debug!("Match {} final: {} ({:?} wins)", match_id, raw_score, stats.winner);

    match game.phase {
        Phase::Group => {
            if let Some(group_id) = &game.group_id {
                let group = staged
                    .group_mut(group_id)
                    .ok_or_else(|| TournamentError::GroupNotFound(group_id.clone()))?;
                apply_match_to_group(group, &game, &stats);
            }
            if staged.state == TournamentState::Super8Rounds && staged.matches.iter().all(|m| m.is_final()) {
                complete_super8(&mut staged)?;
            }
        }
        Phase::Elimination => {
            let winner = game.side(stats.winner).entrant;
            let loser = game.side(stats.loser()).entrant;
            if let Some(bracket) = staged.bracket.as_mut() {
                bracket.eliminated.push(loser);
            }
            if game.elimination_round() == Some(EliminationRound::Final) {
                staged.podium = Some(Podium {
                    champion: winner,
                    runner_up: loser,
                });
                staged.state = TournamentState::Completed;
                log::info!("Tournament {}: champion {}, runner-up {}", staged.id, winner, loser);
            } else {
                advance_bracket(&mut staged, rng)?;
            }
        }
    }

    *tournament = staged;
    Ok(stats)
}

/// Replace the score of a final pool match and rebuild that pool's standings.
///
/// Only while pools are still being played (before the bracket is drawn or the SUPER8
/// podium is decided).
pub fn correct_group_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    raw_score: &str,
) -> Result<MatchStats, TournamentError> {
    if !matches!(
        tournament.state,
        TournamentState::GroupStage | TournamentState::Super8Rounds
    ) {
        return Err(TournamentError::InvalidState);
    }
    let game = tournament
        .match_by_id(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game.phase != Phase::Group {
        return Err(TournamentError::InvalidState);
    }
    if !game.is_final() {
        return Err(TournamentError::MatchNotFinal(match_id));
    }
    let parsed = parse_score(raw_score)?;
    let stats = compute_match_stats(&parsed);

    let mut staged = tournament.clone();
    let game = finalize(&mut staged, match_id, raw_score)?;
    if let Some(group_id) = &game.group_id {
        recompute_group_standings(&mut staged, group_id)?;
    }
    log::info!("Match {} corrected to {}", match_id, raw_score);

    *tournament = staged;
    Ok(stats)
}

/// Mark a match final with `raw_score`; returns a copy of the updated match.
fn finalize(
    tournament: &mut Tournament,
    match_id: MatchId,
    raw_score: &str,
) -> Result<GameMatch, TournamentError> {
    let game = tournament
        .match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    game.status = MatchStatus::Final;
    game.score = Some(raw_score.to_string());
    game.completed_at = Some(Utc::now());
    Ok(game.clone())
}

/// Every SUPER8 match played: the top two of the pool take the podium.
fn complete_super8(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let group = tournament.groups.first().ok_or(TournamentError::InvalidState)?;
    let ranked = rank(&group.standings, RankingPolicy::Super8);
    let (champion, runner_up) = match ranked.as_slice() {
        [first, second, ..] => (first.entrant, second.entrant),
        _ => return Err(TournamentError::InvalidState),
    };
    tournament.podium = Some(Podium {
        champion,
        runner_up,
    });
    tournament.state = TournamentState::Completed;
    log::info!(
        "Tournament {}: SUPER8 complete, champion {}, runner-up {}",
        tournament.id,
        champion,
        runner_up
    );
    Ok(())
}
