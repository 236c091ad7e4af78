//! Integration tests for SUPER8: pairing schedule, individual standings and completion.

use beach_tournament_web::logic::{
    generate_super8_pairings, partnership_coverage, round_budget, validate_super8_entrants,
};
use beach_tournament_web::models::SUPER8_GROUP_ID;
use beach_tournament_web::{
    record_result, start_tournament, Entrant, EntrantId, RoundLabel, Tournament, TournamentError,
    TournamentKind, TournamentState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use uuid::Uuid;

fn ids(n: usize) -> Vec<EntrantId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

fn super8(n: usize) -> Tournament {
    let entrants: Vec<Entrant> = (0..n).map(|i| Entrant::new(format!("S{i}"))).collect();
    Tournament::with_entrants("Rotation", TournamentKind::Super8, entrants)
}

#[test]
fn entrant_count_limits() {
    assert!(matches!(
        validate_super8_entrants(4),
        Err(TournamentError::NotEnoughEntrants { required: 5, found: 4 })
    ));
    assert!(matches!(
        validate_super8_entrants(13),
        Err(TournamentError::TooManyEntrants { max: 12, found: 13 })
    ));
    for n in 5..=12 {
        assert!(validate_super8_entrants(n).is_ok());
    }
    let mut rng = StdRng::seed_from_u64(0);
    assert!(generate_super8_pairings(&ids(4), &mut rng).is_err());
}

#[test]
fn eight_players_never_repeat_within_a_round() {
    let players = ids(8);
    let schedule = generate_super8_pairings(&players, &mut StdRng::seed_from_u64(8)).unwrap();
    assert!(!schedule.rounds.is_empty());
    for round in &schedule.rounds {
        assert_eq!(round.len(), 2);
        let seen: HashSet<EntrantId> = round.iter().flat_map(|p| p.entrants()).collect();
        assert_eq!(seen.len(), 8);
    }
}

#[test]
fn coverage_is_reported_and_never_decreases() {
    let players = ids(8);
    let schedule = generate_super8_pairings(&players, &mut StdRng::seed_from_u64(21)).unwrap();
    assert_eq!(schedule.coverage_by_round.len(), schedule.rounds.len());
    assert!(schedule
        .coverage_by_round
        .windows(2)
        .all(|w| w[0] <= w[1]));
    let last = *schedule.coverage_by_round.last().unwrap();
    assert!((last - partnership_coverage(&players, &schedule.rounds)).abs() < 1e-12);
    assert!(last > 0.0 && last <= 1.0);
    assert_eq!(schedule.full_coverage, (last - 1.0).abs() < 1e-12);
}

#[test]
fn every_size_stays_within_budget() {
    for n in 5..=12 {
        let players = ids(n);
        let schedule = generate_super8_pairings(&players, &mut StdRng::seed_from_u64(n as u64)).unwrap();
        assert!(schedule.rounds.len() <= round_budget(n), "n = {n}");
        for round in &schedule.rounds {
            assert_eq!(round.len(), n / 4, "n = {n}");
            let seen: HashSet<EntrantId> = round.iter().flat_map(|p| p.entrants()).collect();
            assert_eq!(seen.len(), round.len() * 4, "n = {n}");
            assert!(seen.iter().all(|id| players.contains(id)));
        }
    }
}

#[test]
fn round_budget_doubles_the_estimate() {
    // 8 players: 28 pairs over 4 per round = 7, doubled
    assert_eq!(round_budget(8), 14);
    // 5 players: 10 pairs over 2 per round = 5, doubled
    assert_eq!(round_budget(5), 10);
}

#[test]
fn start_builds_single_pool_and_numbered_rounds() {
    let mut t = super8(8);
    start_tournament(&mut t, &mut StdRng::seed_from_u64(1)).unwrap();

    assert_eq!(t.state, TournamentState::Super8Rounds);
    assert_eq!(t.groups.len(), 1);
    assert_eq!(t.groups[0].id, SUPER8_GROUP_ID);
    assert_eq!(t.groups[0].standings.len(), 8);
    for m in &t.matches {
        assert!(matches!(m.round, Some(RoundLabel::Rotation(r)) if r >= 1));
        assert!(m.side_1.partner.is_some() && m.side_2.partner.is_some());
    }
}

#[test]
fn partners_share_team_games() {
    let mut t = super8(6);
    let mut rng = StdRng::seed_from_u64(2);
    start_tournament(&mut t, &mut rng).unwrap();
    let game = t.matches[0].clone();
    record_result(&mut t, game.id, "6-4 4-6 [10-7]", &mut rng).unwrap();

    let group = &t.groups[0];
    for id in game.side_1.members() {
        let s = group.standing(id).unwrap();
        assert_eq!((s.games_won, s.games_lost, s.defeats, s.matches_played), (10, 10, 0, 1));
    }
    for id in game.side_2.members() {
        let s = group.standing(id).unwrap();
        assert_eq!((s.games_won, s.games_lost, s.defeats, s.matches_played), (10, 10, 1, 1));
    }
}

#[test]
fn last_result_completes_the_tournament() {
    let mut t = super8(8);
    let mut rng = StdRng::seed_from_u64(3);
    start_tournament(&mut t, &mut rng).unwrap();
    let ids: Vec<_> = t.matches.iter().map(|m| m.id).collect();
    let (last, rest) = ids.split_last().unwrap();
    for (i, id) in rest.iter().enumerate() {
        let score = if i % 3 == 0 { "6-2" } else { "5-7" };
        record_result(&mut t, *id, score, &mut rng).unwrap();
    }
    assert_eq!(t.state, TournamentState::Super8Rounds);
    assert!(t.podium.is_none());
    record_result(&mut t, *last, "6-3", &mut rng).unwrap();

    assert_eq!(t.state, TournamentState::Completed);
    let podium = t.podium.unwrap();
    assert_ne!(podium.champion, podium.runner_up);

    let group = &t.groups[0];
    let balance: i64 = group.standings.iter().map(|s| s.games_balance()).sum();
    assert_eq!(balance, 0);
    for s in &group.standings {
        let appearances = t.matches.iter().filter(|m| m.involves(s.entrant)).count() as u32;
        assert_eq!(s.matches_played, appearances);
    }
    let champion = group.standing(podium.champion).unwrap();
    assert!(group
        .standings
        .iter()
        .all(|s| s.games_balance() <= champion.games_balance()));
}

#[test]
fn start_rejects_wrong_sizes_without_changes() {
    let mut t = super8(13);
    assert!(matches!(
        start_tournament(&mut t, &mut StdRng::seed_from_u64(0)),
        Err(TournamentError::TooManyEntrants { .. })
    ));
    assert_eq!(t.state, TournamentState::Setup);
    assert!(t.matches.is_empty());
}
