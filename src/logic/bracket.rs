//! Elimination bracket: qualification, byes, opening round and round advancement.

use crate::logic::score::parse_score;
use crate::logic::standings::rank;
use crate::models::{
    BracketState, EliminationRound, EntrantId, GameMatch, Phase, Qualifier, RankingPolicy,
    Tournament, TournamentError, TournamentState,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Group positions that qualify for the bracket.
pub const QUALIFYING_POSITIONS: usize = 2;

/// Opening round of a bracket, before any match exists.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BracketSeeding {
    pub round: EliminationRound,
    /// Target bracket size (power of two).
    pub size: usize,
    /// Entrants skipping the opening round.
    pub byes: Vec<EntrantId>,
    /// Opening-round matches.
    pub pairs: Vec<(EntrantId, EntrantId)>,
}

/// What follows a completed round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoundAdvance {
    /// Exactly two entrants left: the one and only final.
    Final(EntrantId, EntrantId),
    Next {
        round: EliminationRound,
        pairs: Vec<(EntrantId, EntrantId)>,
        /// Odd entrant out, carried into the following round.
        byes: Vec<EntrantId>,
    },
}

/// Rank every group (standard policy) and split entrants into qualifiers (top two) and eliminated.
pub fn qualify(tournament: &Tournament) -> (Vec<Qualifier>, Vec<EntrantId>) {
    let mut qualified = Vec::new();
    let mut eliminated = Vec::new();
    for group in &tournament.groups {
        for (index, standing) in rank(&group.standings, RankingPolicy::Standard)
            .into_iter()
            .enumerate()
        {
            let position = index + 1;
            if position <= QUALIFYING_POSITIONS {
                qualified.push(Qualifier {
                    entrant: standing.entrant,
                    group_id: group.id.clone(),
                    position,
                    standing,
                });
            } else {
                eliminated.push(standing.entrant);
            }
        }
    }
    (qualified, eliminated)
}

/// Size the bracket and draw its opening round.
///
/// Byes (target size minus qualifiers) go to the best group winners by
/// (matches won, sets won, game difference); everyone else is shuffled and paired.
pub fn seed_bracket<R: Rng + ?Sized>(
    qualifiers: &[Qualifier],
    rng: &mut R,
) -> Result<BracketSeeding, TournamentError> {
    let found = qualifiers.len();
    if found < 2 {
        return Err(TournamentError::NotEnoughQualifiers { found });
    }
    let (round, size) =
        EliminationRound::for_qualifiers(found).ok_or(TournamentError::TooManyQualifiers { found })?;
    let byes_needed = size - found;

    let mut winners: Vec<&Qualifier> = qualifiers.iter().filter(|q| q.position == 1).collect();
    winners.sort_by(|a, b| {
        let (a, b) = (&a.standing, &b.standing);
        b.matches_won
            .cmp(&a.matches_won)
            .then_with(|| b.sets_won.cmp(&a.sets_won))
            .then_with(|| b.games_balance().cmp(&a.games_balance()))
    });
    let bye_count = byes_needed.min(winners.len());
    let mut byes: Vec<EntrantId> = winners[..bye_count].iter().map(|q| q.entrant).collect();

    let mut to_play: Vec<EntrantId> = winners[bye_count..]
        .iter()
        .map(|q| q.entrant)
        .chain(qualifiers.iter().filter(|q| q.position != 1).map(|q| q.entrant))
        .collect();
    to_play.shuffle(rng);
    let (pairs, leftover) = pair_up(&to_play);
    if let Some(odd) = leftover {
        log::warn!("Odd number of entrants in the opening round; {} gets a bye", odd);
        byes.push(odd);
    }

    Ok(BracketSeeding {
        round,
        size,
        byes,
        pairs,
    })
}

/// Decide the round after `current` for the entrants advancing out of it (winners plus byes).
pub fn plan_next_round<R: Rng + ?Sized>(
    current: EliminationRound,
    mut advancing: Vec<EntrantId>,
    rng: &mut R,
) -> Result<RoundAdvance, TournamentError> {
    let count = advancing.len();
    if count == 2 {
        return Ok(RoundAdvance::Final(advancing[0], advancing[1]));
    }
    let next = current
        .next()
        .filter(|&round| count > 2 && round != EliminationRound::Final);
    let Some(round) = next else {
        log::error!(
            "Bracket invariant broken: {} entrants advance out of {:?}",
            count,
            current
        );
        return Err(TournamentError::BracketStalled {
            round: current,
            advancing: count,
        });
    };
    if count != round.size() {
        log::warn!("{} entrants advance into {:?} (built for {})", count, round, round.size());
    }

    advancing.shuffle(rng);
    let (pairs, leftover) = pair_up(&advancing);
    if let Some(odd) = leftover {
        log::warn!("Odd number of entrants advancing into {:?}; {} gets a bye", round, odd);
    }
    Ok(RoundAdvance::Next {
        round,
        pairs,
        byes: leftover.into_iter().collect(),
    })
}

/// Close the group stage and draw the bracket (GroupStage -> Elimination).
pub fn generate_bracket<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::GroupStage {
        return Err(TournamentError::InvalidState);
    }
    let remaining = tournament
        .matches
        .iter()
        .filter(|m| m.phase == Phase::Group && !m.is_final())
        .count();
    if remaining > 0 {
        return Err(TournamentError::PendingGroupMatches { remaining });
    }

    let (qualified, eliminated) = qualify(tournament);
    let seeding = seed_bracket(&qualified, rng)?;

    let tournament_id = tournament.id;
    tournament.matches.extend(
        seeding
            .pairs
            .iter()
            .map(|&(a, b)| GameMatch::elimination(tournament_id, seeding.round, a, b)),
    );
    log::info!(
        "Tournament {}: bracket of {} drawn for {} qualifiers, {} bye(s), {} {:?} match(es)",
        tournament.id,
        seeding.size,
        qualified.len(),
        seeding.byes.len(),
        seeding.pairs.len(),
        seeding.round
    );

    tournament.bracket = Some(BracketState {
        qualified,
        eliminated,
        byes: seeding.byes,
        current_round: seeding.round,
    });
    tournament.state = TournamentState::Elimination;
    Ok(())
}

/// Schedule the next round once every match of the current one is final.
/// Returns whether a round was generated. Never creates a second final.
pub fn advance_bracket<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<bool, TournamentError> {
    if tournament.state != TournamentState::Elimination {
        return Err(TournamentError::InvalidState);
    }
    let bracket = tournament.bracket.as_ref().ok_or(TournamentError::InvalidState)?;
    let current = bracket.current_round;
    if current == EliminationRound::Final {
        return Ok(false);
    }

    let round_matches: Vec<&GameMatch> = tournament
        .matches
        .iter()
        .filter(|m| m.elimination_round() == Some(current))
        .collect();
    if round_matches.iter().any(|m| !m.is_final()) {
        return Ok(false);
    }

    let mut advancing = Vec::with_capacity(round_matches.len() + bracket.byes.len());
    for game in &round_matches {
        let (winner, _) = decided(game).ok_or(TournamentError::InvalidState)?;
        advancing.push(winner);
    }
    advancing.extend(bracket.byes.iter().copied());

    let tournament_id = tournament.id;
    let (round, new_matches, byes) = match plan_next_round(current, advancing, rng)? {
        RoundAdvance::Final(a, b) => {
            let has_final = tournament
                .matches
                .iter()
                .any(|m| m.elimination_round() == Some(EliminationRound::Final));
            if has_final {
                log::warn!("Tournament {}: final already scheduled", tournament_id);
                return Ok(false);
            }
            let final_match = GameMatch::elimination(tournament_id, EliminationRound::Final, a, b);
            (EliminationRound::Final, vec![final_match], Vec::new())
        }
        RoundAdvance::Next { round, pairs, byes } => {
            let matches = pairs
                .into_iter()
                .map(|(a, b)| GameMatch::elimination(tournament_id, round, a, b))
                .collect();
            (round, matches, byes)
        }
    };

    log::info!(
        "Tournament {}: {:?} complete, {} {:?} match(es) scheduled",
        tournament_id,
        current,
        new_matches.len(),
        round
    );
    tournament.matches.extend(new_matches);
    if let Some(bracket) = tournament.bracket.as_mut() {
        bracket.current_round = round;
        bracket.byes = byes;
    }
    Ok(true)
}

/// (winner, loser) of a final match, from its stored score.
pub(crate) fn decided(game: &GameMatch) -> Option<(EntrantId, EntrantId)> {
    if !game.is_final() {
        return None;
    }
    let parsed = parse_score(game.score.as_deref()?).ok()?;
    let winner = game.side(parsed.winner).entrant;
    let loser = game.side(parsed.winner.opponent()).entrant;
    Some((winner, loser))
}

fn pair_up(entrants: &[EntrantId]) -> (Vec<(EntrantId, EntrantId)>, Option<EntrantId>) {
    let chunks = entrants.chunks_exact(2);
    let leftover = chunks.remainder().first().copied();
    let pairs = chunks.map(|c| (c[0], c[1])).collect();
    (pairs, leftover)
}
