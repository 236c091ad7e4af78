//! Group stage: ITF pool sizing, draw and round-robin schedule.

use crate::models::{
    EntrantId, GameMatch, Group, Tournament, TournamentError, TournamentKind, TournamentState,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Smallest pool the format allows.
pub const MIN_GROUP_SIZE: usize = 3;
/// Largest pool the format allows.
pub const MAX_GROUP_SIZE: usize = 5;

/// Split `n` entrants into ITF pool sizes.
///
/// - 3..=5: one pool.
/// - otherwise pools of 3, with the remainder `r = n % 3` spread as `r` pools of 4
///   when there are at least `r` pools; failing that the remainder is poured into
///   the pools left to right (at most +2 each) and any rest forms a short final pool.
pub fn distribute_groups(n: usize) -> Result<Vec<usize>, TournamentError> {
    if n < MIN_GROUP_SIZE {
        return Err(TournamentError::NotEnoughEntrants {
            required: MIN_GROUP_SIZE,
            found: n,
        });
    }
    if n <= MAX_GROUP_SIZE {
        return Ok(vec![n]);
    }

    let base_groups = n / 3;
    let r = n % 3;
    if r == 0 {
        return Ok(vec![3; base_groups]);
    }
    if r <= base_groups {
        let mut sizes = vec![4; r];
        sizes.extend(std::iter::repeat(3).take(base_groups - r));
        return Ok(sizes);
    }

    // Unreachable for n >= 6 (base_groups >= 2 >= r), kept for completeness.
    let mut sizes = vec![3; base_groups];
    let mut rem = r;
    for size in sizes.iter_mut() {
        if rem == 0 {
            break;
        }
        let add = rem.min(MAX_GROUP_SIZE - 3);
        *size += add;
        rem -= add;
    }
    if rem > 0 {
        sizes.push(rem);
    }
    Ok(sizes)
}

/// Every unordered pair of `members` once, in draw order: g * (g - 1) / 2 pairs.
pub fn round_robin(members: &[EntrantId]) -> Vec<(EntrantId, EntrantId)> {
    members
        .iter()
        .enumerate()
        .flat_map(|(i, &a)| members[i + 1..].iter().map(move |&b| (a, b)))
        .collect()
}

/// Draw the pools and schedule every group's round robin (Setup -> GroupStage).
///
/// 1. Size the pools with [`distribute_groups`].
/// 2. Shuffle the roster and slice it into pools in size order, named A, B, C, ...
/// 3. One pending match per pair inside each pool.
pub fn generate_group_stage<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Setup || tournament.kind == TournamentKind::Super8 {
        return Err(TournamentError::InvalidState);
    }
    let sizes = distribute_groups(tournament.entrants.len())?;

    let mut drawn: Vec<EntrantId> = tournament.entrants.iter().map(|e| e.id).collect();
    drawn.shuffle(rng);

    let mut groups = Vec::with_capacity(sizes.len());
    let mut rest = drawn.as_slice();
    for (index, &size) in sizes.iter().enumerate() {
        let (members, tail) = rest.split_at(size);
        groups.push(Group::lettered(index, members.to_vec()));
        rest = tail;
    }

    let tournament_id = tournament.id;
    let matches: Vec<GameMatch> = groups
        .iter()
        .flat_map(|g| {
            round_robin(&g.members)
                .into_iter()
                .map(move |(a, b)| GameMatch::group(tournament_id, g.id.clone(), a, b))
        })
        .collect();

    let summary: Vec<String> = groups
        .iter()
        .map(|g| format!("{}: {}", g.id, g.members.len()))
        .collect();
    log::info!(
        "Tournament {}: {} groups drawn ({}), {} group matches",
        tournament.id,
        groups.len(),
        summary.join(", "),
        matches.len()
    );

    tournament.groups = groups;
    tournament.matches = matches;
    tournament.bracket = None;
    tournament.podium = None;
    tournament.state = TournamentState::GroupStage;
    Ok(())
}
