//! Integration tests for group stage: pool sizing, draw and round-robin schedule.

use beach_tournament_web::logic::{distribute_groups, round_robin};
use beach_tournament_web::{
    group_ranking, record_result, start_tournament, Entrant, ErrorKind, Phase, Tournament,
    TournamentError, TournamentKind, TournamentState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use uuid::Uuid;

fn tournament_with_pairs(n: usize) -> Tournament {
    let entrants: Vec<Entrant> = (0..n)
        .map(|i| Entrant::with_partner(format!("P{i}"), format!("Q{i}")))
        .collect();
    Tournament::with_entrants("Open", TournamentKind::Doubles, entrants)
}

#[test]
fn distribution_rejects_fewer_than_three() {
    for n in 0..3 {
        assert!(matches!(
            distribute_groups(n),
            Err(TournamentError::NotEnoughEntrants { required: 3, .. })
        ));
    }
}

#[test]
fn distribution_sizes_are_valid_for_every_count() {
    for n in 3..=200 {
        let sizes = distribute_groups(n).unwrap();
        assert_eq!(sizes.iter().sum::<usize>(), n, "n = {n}");
        assert!(sizes.iter().all(|s| (3..=5).contains(s)), "n = {n}: {sizes:?}");
    }
}

#[test]
fn distribution_matches_itf_table() {
    assert_eq!(distribute_groups(3).unwrap(), vec![3]);
    assert_eq!(distribute_groups(5).unwrap(), vec![5]);
    assert_eq!(distribute_groups(6).unwrap(), vec![3, 3]);
    assert_eq!(distribute_groups(7).unwrap(), vec![4, 3]);
    assert_eq!(distribute_groups(8).unwrap(), vec![4, 4]);
    assert_eq!(distribute_groups(10).unwrap(), vec![4, 3, 3]);
    assert_eq!(distribute_groups(11).unwrap(), vec![4, 4, 3]);
    assert_eq!(distribute_groups(24).unwrap(), vec![3; 8]);
}

#[test]
fn round_robin_covers_every_pair_once() {
    for g in 3..=5 {
        let members: Vec<Uuid> = (0..g).map(|_| Uuid::new_v4()).collect();
        let pairs = round_robin(&members);
        assert_eq!(pairs.len(), g * (g - 1) / 2);
        let unique: HashSet<(Uuid, Uuid)> = pairs
            .iter()
            .map(|&(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        assert_eq!(unique.len(), pairs.len());
        assert!(pairs.iter().all(|(a, b)| a != b));
    }
}

#[test]
fn start_draws_groups_and_schedules_matches() {
    let mut t = tournament_with_pairs(10);
    let mut rng = StdRng::seed_from_u64(7);
    start_tournament(&mut t, &mut rng).unwrap();

    assert_eq!(t.state, TournamentState::GroupStage);
    let names: Vec<&str> = t.groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    let sizes: Vec<usize> = t.groups.iter().map(|g| g.members.len()).collect();
    assert_eq!(sizes, vec![4, 3, 3]);

    // 6 + 3 + 3 round-robin matches, all pending pool matches inside their group
    assert_eq!(t.matches.len(), 12);
    for m in &t.matches {
        assert_eq!(m.phase, Phase::Group);
        assert!(!m.is_final());
        let group = t.group(m.group_id.as_deref().unwrap()).unwrap();
        assert!(group.contains(m.side_1.entrant));
        assert!(group.contains(m.side_2.entrant));
    }

    // every entrant drawn exactly once
    let drawn: HashSet<Uuid> = t.groups.iter().flat_map(|g| g.members.iter().copied()).collect();
    assert_eq!(drawn.len(), 10);
}

#[test]
fn start_requires_three_entrants_and_leaves_setup_untouched() {
    let mut t = tournament_with_pairs(2);
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        start_tournament(&mut t, &mut rng),
        Err(TournamentError::NotEnoughEntrants { .. })
    ));
    assert_eq!(t.state, TournamentState::Setup);
    assert!(t.groups.is_empty());
    assert!(t.matches.is_empty());
}

#[test]
fn same_seed_same_draw() {
    let base = tournament_with_pairs(9);
    let mut a = base.clone();
    let mut b = base;
    start_tournament(&mut a, &mut StdRng::seed_from_u64(42)).unwrap();
    start_tournament(&mut b, &mut StdRng::seed_from_u64(42)).unwrap();
    let members = |t: &Tournament| t.groups.iter().map(|g| g.members.clone()).collect::<Vec<_>>();
    assert_eq!(members(&a), members(&b));
}

#[test]
fn roster_rules_apply_in_setup() {
    let mut t = Tournament::new("Open", TournamentKind::Doubles);
    assert_eq!(
        t.add_entrant("Ana", None),
        Err(TournamentError::PartnerRequired)
    );
    t.add_entrant(" Ana ", Some("Bia".to_string())).unwrap();
    assert_eq!(
        t.add_entrant("ana", Some("Carla".to_string())),
        Err(TournamentError::DuplicateEntrantName)
    );
    assert_eq!(t.add_entrant("  ", Some("X".to_string())), Err(TournamentError::EmptyName));
    assert_eq!(t.entrants[0].display_name(), "Ana & Bia");

    let mut s8 = Tournament::new("Rotation", TournamentKind::Super8);
    assert_eq!(
        s8.add_entrant("Ana", Some("Bia".to_string())),
        Err(TournamentError::PartnerNotAllowed)
    );
}

#[test]
fn roster_is_frozen_after_start_and_restart_keeps_it() {
    let mut t = tournament_with_pairs(6);
    start_tournament(&mut t, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(
        t.add_entrant("Late", Some("Comer".to_string())),
        Err(TournamentError::InvalidState)
    );
    let id = t.entrants[0].id;
    assert_eq!(t.remove_entrant(id), Err(TournamentError::InvalidState));

    t.restart().unwrap();
    assert_eq!(t.state, TournamentState::Setup);
    assert_eq!(t.entrants.len(), 6);
    assert!(t.groups.is_empty() && t.matches.is_empty());
    t.remove_entrant(id).unwrap();
    assert_eq!(t.entrants.len(), 5);
}

#[test]
fn unknown_ids_are_reported_as_not_found() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut t = tournament_with_pairs(6);

    let missing = Uuid::new_v4();
    let err = t.remove_entrant(missing).unwrap_err();
    assert_eq!(err, TournamentError::EntrantNotFound(missing));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    start_tournament(&mut t, &mut rng).unwrap();
    let err = record_result(&mut t, missing, "6-4", &mut rng).unwrap_err();
    assert_eq!(err, TournamentError::MatchNotFound(missing));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = group_ranking(&t, "ZZZ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(TournamentError::InvalidState.kind(), ErrorKind::State);
    assert_eq!(TournamentError::EmptyName.kind(), ErrorKind::Input);
}
