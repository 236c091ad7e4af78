//! SUPER8: rotating-partner doubles schedule for 5..=12 individual entrants.
//!
//! Rounds are built greedily: each round is reshuffled, then 4-entrant games are
//! picked one at a time by a novelty score. There is no backtracking, so the
//! schedule is not guaranteed to have every pair partner at least once;
//! [`Super8Schedule::full_coverage`] reports whether it did.

use crate::models::{
    EntrantId, GameMatch, Group, MatchSide, Tournament, TournamentError, TournamentKind,
    TournamentState, SUPER8_GROUP_ID,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const SUPER8_MIN_ENTRANTS: usize = 5;
pub const SUPER8_MAX_ENTRANTS: usize = 12;

const NEW_PARTNERSHIP_SCORE: u32 = 2;
const NEW_CROSS_PAIR_SCORE: u32 = 1;

/// One 2v2 game: `player_1` partners `partner_1` against `player_2` partnering `partner_2`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub player_1: EntrantId,
    pub partner_1: EntrantId,
    pub player_2: EntrantId,
    pub partner_2: EntrantId,
}

impl Pairing {
    pub fn entrants(&self) -> [EntrantId; 4] {
        [self.player_1, self.partner_1, self.player_2, self.partner_2]
    }
}

/// Generated rounds plus how far they got towards everyone partnering everyone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Super8Schedule {
    pub rounds: Vec<Vec<Pairing>>,
    /// Cumulative fraction of entrant pairs that have partnered, after each round.
    pub coverage_by_round: Vec<f64>,
    pub full_coverage: bool,
}

/// Check the SUPER8 entrant count.
pub fn validate_super8_entrants(count: usize) -> Result<(), TournamentError> {
    if count < SUPER8_MIN_ENTRANTS {
        return Err(TournamentError::NotEnoughEntrants {
            required: SUPER8_MIN_ENTRANTS,
            found: count,
        });
    }
    if count > SUPER8_MAX_ENTRANTS {
        return Err(TournamentError::TooManyEntrants {
            max: SUPER8_MAX_ENTRANTS,
            found: count,
        });
    }
    Ok(())
}

/// Round budget: all possible partnerships over partnerships per round (n / 2), doubled.
pub fn round_budget(n: usize) -> usize {
    let total_pairs = n * n.saturating_sub(1) / 2;
    let pairs_per_round = (n / 2).max(1);
    total_pairs.div_ceil(pairs_per_round) * 2
}

/// Symmetric "have partnered" table over entrant indices.
struct PartnerTable {
    n: usize,
    partnered: Vec<bool>,
}

impl PartnerTable {
    fn new(n: usize) -> Self {
        Self {
            n,
            partnered: vec![false; n * n],
        }
    }

    fn have_partnered(&self, a: usize, b: usize) -> bool {
        self.partnered[a * self.n + b]
    }

    fn mark(&mut self, a: usize, b: usize) {
        self.partnered[a * self.n + b] = true;
        self.partnered[b * self.n + a] = true;
    }

    fn covered_pairs(&self) -> usize {
        (0..self.n)
            .flat_map(|a| (a + 1..self.n).map(move |b| (a, b)))
            .filter(|&(a, b)| self.have_partnered(a, b))
            .count()
    }

    fn coverage(&self) -> f64 {
        let total = self.n * (self.n - 1) / 2;
        self.covered_pairs() as f64 / total as f64
    }

    fn complete(&self) -> bool {
        self.covered_pairs() == self.n * (self.n - 1) / 2
    }

    /// New partnerships A-B and C-D score 2 each; each of the four cross pairs that
    /// has never partnered scores 1.
    fn score(&self, [a, b, c, d]: [usize; 4]) -> u32 {
        let novel = |x: usize, y: usize, weight: u32| {
            if self.have_partnered(x, y) {
                0
            } else {
                weight
            }
        };
        novel(a, b, NEW_PARTNERSHIP_SCORE)
            + novel(c, d, NEW_PARTNERSHIP_SCORE)
            + novel(a, c, NEW_CROSS_PAIR_SCORE)
            + novel(a, d, NEW_CROSS_PAIR_SCORE)
            + novel(b, c, NEW_CROSS_PAIR_SCORE)
            + novel(b, d, NEW_CROSS_PAIR_SCORE)
    }
}

/// Best-scoring 4-combination of `available` (first found wins ties).
fn best_game(available: &[usize], table: &PartnerTable) -> Option<[usize; 4]> {
    let len = available.len();
    let mut best: Option<([usize; 4], u32)> = None;
    for i in 0..len {
        for j in i + 1..len {
            for k in j + 1..len {
                for l in k + 1..len {
                    let game = [available[i], available[j], available[k], available[l]];
                    let score = table.score(game);
                    if best.map_or(true, |(_, top)| score > top) {
                        best = Some((game, score));
                    }
                }
            }
        }
    }
    best.map(|(game, _)| game)
}

/// Generate the rotating-partner schedule.
///
/// Stops once every pair has partnered and at least ceil(n / 2) rounds exist, or when
/// the [`round_budget`] runs out. Entrants beyond a multiple of four sit out each round.
pub fn generate_super8_pairings<R: Rng + ?Sized>(
    entrants: &[EntrantId],
    rng: &mut R,
) -> Result<Super8Schedule, TournamentError> {
    let n = entrants.len();
    validate_super8_entrants(n)?;

    let mut table = PartnerTable::new(n);
    let mut rounds = Vec::new();
    let mut coverage_by_round = Vec::new();
    let min_rounds = n.div_ceil(2);

    for _ in 0..round_budget(n) {
        let mut available: Vec<usize> = (0..n).collect();
        available.shuffle(rng);

        let mut round = Vec::new();
        while available.len() >= 4 {
            let Some(game) = best_game(&available, &table) else {
                break;
            };
            let [a, b, c, d] = game;
            table.mark(a, b);
            table.mark(c, d);
            available.retain(|x| !game.contains(x));
            round.push(Pairing {
                player_1: entrants[a],
                partner_1: entrants[b],
                player_2: entrants[c],
                partner_2: entrants[d],
            });
        }

        if !round.is_empty() {
            rounds.push(round);
            coverage_by_round.push(table.coverage());
        }
        if table.complete() && rounds.len() >= min_rounds {
            break;
        }
    }

    let full_coverage = table.complete();
    if !full_coverage {
        log::warn!(
            "SUPER8 schedule for {} entrants ends at {:.0}% partner coverage after {} rounds",
            n,
            table.coverage() * 100.0,
            rounds.len()
        );
    }
    Ok(Super8Schedule {
        rounds,
        coverage_by_round,
        full_coverage,
    })
}

/// Fraction of entrant pairs that partnered at least once in `rounds`.
pub fn partnership_coverage(entrants: &[EntrantId], rounds: &[Vec<Pairing>]) -> f64 {
    let n = entrants.len();
    if n < 2 {
        return 0.0;
    }
    let index = |id: EntrantId| entrants.iter().position(|&e| e == id);
    let mut table = PartnerTable::new(n);
    for pairing in rounds.iter().flatten() {
        for (x, y) in [
            (pairing.player_1, pairing.partner_1),
            (pairing.player_2, pairing.partner_2),
        ] {
            if let (Some(a), Some(b)) = (index(x), index(y)) {
                table.mark(a, b);
            }
        }
    }
    table.coverage()
}

/// Start a SUPER8 tournament (Setup -> Super8Rounds): one pool with every entrant and one
/// pending match per pairing, tagged with its round number.
pub fn start_super8<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<Super8Schedule, TournamentError> {
    if tournament.state != TournamentState::Setup || tournament.kind != TournamentKind::Super8 {
        return Err(TournamentError::InvalidState);
    }
    let ids: Vec<EntrantId> = tournament.entrants.iter().map(|e| e.id).collect();
    let schedule = generate_super8_pairings(&ids, rng)?;

    let tournament_id = tournament.id;
    let matches: Vec<GameMatch> = schedule
        .rounds
        .iter()
        .zip(1u32..)
        .flat_map(|(round, number)| {
            round.iter().map(move |p| {
                GameMatch::rotation(
                    tournament_id,
                    SUPER8_GROUP_ID.to_string(),
                    number,
                    MatchSide::pair(p.player_1, p.partner_1),
                    MatchSide::pair(p.player_2, p.partner_2),
                )
            })
        })
        .collect();

    log::info!(
        "Tournament {}: SUPER8 schedule with {} matches in {} rounds",
        tournament_id,
        matches.len(),
        schedule.rounds.len()
    );

    tournament.groups = vec![Group::new(SUPER8_GROUP_ID, "SUPER8", ids)];
    tournament.matches = matches;
    tournament.bracket = None;
    tournament.podium = None;
    tournament.state = TournamentState::Super8Rounds;
    Ok(schedule)
}
