//! Integration tests for standings: applying results and ranking policies.

use beach_tournament_web::logic::apply_result;
use beach_tournament_web::{
    compute_match_stats, correct_group_result, group_ranking, parse_score, rank, record_result,
    start_tournament, Entrant, Phase, RankingPolicy, Side, Standing, Tournament, TournamentError,
    TournamentKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn standing(matches_won: u32, sets_won: u32, sets_lost: u32) -> Standing {
    Standing {
        matches_won,
        sets_won,
        sets_lost,
        ..Standing::new(Uuid::new_v4())
    }
}

#[test]
fn apply_result_credits_both_perspectives() {
    let stats = compute_match_stats(&parse_score("6-4 4-6 [10-8]").unwrap());
    let mut winner = Standing::new(Uuid::new_v4());
    let mut loser = Standing::new(Uuid::new_v4());
    apply_result(&mut winner, &stats, Side::One);
    apply_result(&mut loser, &stats, Side::Two);

    assert_eq!((winner.matches_won, winner.matches_lost), (1, 0));
    assert_eq!((winner.sets_won, winner.sets_lost), (2, 1));
    assert_eq!((winner.games_won, winner.games_lost), (10, 10));
    assert_eq!((winner.points_won, winner.points_lost), (10, 8));
    assert_eq!((loser.matches_won, loser.matches_lost, loser.defeats), (0, 1, 1));
    assert_eq!((loser.sets_won, loser.sets_lost), (1, 2));
    assert_eq!(loser.points_diff(), -2);
    assert_eq!(winner.matches_played + loser.matches_played, 2);
}

#[test]
fn standard_policy_breaks_ties_on_sets_percentage() {
    let weaker = standing(2, 4, 3);
    let stronger = standing(2, 4, 1);
    let ranked = rank(&[weaker.clone(), stronger.clone()], RankingPolicy::Standard);
    assert_eq!(ranked[0].entrant, stronger.entrant);
    assert_eq!(ranked[1].entrant, weaker.entrant);
}

#[test]
fn standard_policy_orders_by_wins_first() {
    let many_sets = standing(1, 6, 0);
    let more_wins = standing(2, 4, 4);
    let ranked = rank(&[many_sets.clone(), more_wins.clone()], RankingPolicy::Standard);
    assert_eq!(ranked[0].entrant, more_wins.entrant);
}

#[test]
fn standard_policy_then_games_then_points() {
    let mut a = standing(1, 2, 2);
    a.games_won = 20;
    a.games_lost = 20;
    let mut b = standing(1, 2, 2);
    b.games_won = 21;
    b.games_lost = 19;
    let ranked = rank(&[a.clone(), b.clone()], RankingPolicy::Standard);
    assert_eq!(ranked[0].entrant, b.entrant);

    let mut c = a.clone();
    c.entrant = Uuid::new_v4();
    c.points_won = 10;
    c.points_lost = 5;
    let ranked = rank(&[a.clone(), c.clone()], RankingPolicy::Standard);
    assert_eq!(ranked[0].entrant, c.entrant);
}

#[test]
fn full_ties_keep_input_order() {
    let first = standing(1, 2, 1);
    let mut second = first.clone();
    second.entrant = Uuid::new_v4();
    let ranked = rank(&[first.clone(), second.clone()], RankingPolicy::Standard);
    assert_eq!(ranked[0].entrant, first.entrant);
    let ranked = rank(&[second.clone(), first.clone()], RankingPolicy::Super8);
    assert_eq!(ranked[0].entrant, second.entrant);
}

#[test]
fn super8_policy_uses_games_only() {
    let mk = |won: u32, lost: u32, defeats: u32| Standing {
        games_won: won,
        games_lost: lost,
        defeats,
        matches_won: 10,
        ..Standing::new(Uuid::new_v4())
    };
    let balance_plus_4 = mk(20, 16, 3);
    let balance_plus_4_more_games = mk(24, 20, 3);
    let balance_plus_4_fewer_defeats = mk(24, 20, 1);
    let balance_plus_6 = Standing {
        matches_won: 0,
        ..mk(10, 4, 5)
    };
    let ranked = rank(
        &[
            balance_plus_4.clone(),
            balance_plus_4_more_games.clone(),
            balance_plus_4_fewer_defeats.clone(),
            balance_plus_6.clone(),
        ],
        RankingPolicy::Super8,
    );
    let order: Vec<Uuid> = ranked.iter().map(|s| s.entrant).collect();
    assert_eq!(
        order,
        vec![
            balance_plus_6.entrant,
            balance_plus_4_fewer_defeats.entrant,
            balance_plus_4_more_games.entrant,
            balance_plus_4.entrant,
        ]
    );
}

fn started_doubles(n: usize, seed: u64) -> Tournament {
    let entrants: Vec<Entrant> = (0..n)
        .map(|i| Entrant::with_partner(format!("P{i}"), format!("Q{i}")))
        .collect();
    let mut t = Tournament::with_entrants("Open", TournamentKind::Doubles, entrants);
    start_tournament(&mut t, &mut StdRng::seed_from_u64(seed)).unwrap();
    t
}

#[test]
fn group_wins_equal_final_matches() {
    let mut t = started_doubles(7, 11);
    let mut rng = StdRng::seed_from_u64(5);
    let ids: Vec<_> = t.matches.iter().map(|m| m.id).collect();
    for (i, id) in ids.iter().enumerate() {
        let score = if i % 2 == 0 { "6-4 6-2" } else { "4-6 6-3 [7-10]" };
        record_result(&mut t, *id, score, &mut rng).unwrap();

        for group in &t.groups {
            let finals = t
                .matches
                .iter()
                .filter(|m| m.is_final() && m.group_id.as_deref() == Some(group.id.as_str()))
                .count() as u32;
            let wins: u32 = group.standings.iter().map(|s| s.matches_won).sum();
            assert_eq!(wins, finals);
        }
    }
}

#[test]
fn rejected_score_changes_nothing() {
    let mut t = started_doubles(4, 2);
    let id = t.matches[0].id;
    let before = t.groups.clone();
    let err = record_result(&mut t, id, "6-4 4-6", &mut StdRng::seed_from_u64(0)).unwrap_err();
    assert!(matches!(err, TournamentError::InvalidScore(_)));
    assert!(!t.matches[0].is_final());
    assert_eq!(t.groups, before);
}

#[test]
fn results_are_not_overwritten_but_can_be_corrected() {
    let mut t = started_doubles(4, 9);
    let mut rng = StdRng::seed_from_u64(0);
    let game = t.matches[0].clone();
    assert_eq!(game.phase, Phase::Group);
    let group_id = game.group_id.clone().unwrap();

    assert_eq!(
        correct_group_result(&mut t, game.id, "6-0"),
        Err(TournamentError::MatchNotFinal(game.id))
    );
    record_result(&mut t, game.id, "6-0", &mut rng).unwrap();
    assert_eq!(
        record_result(&mut t, game.id, "0-6", &mut rng),
        Err(TournamentError::MatchAlreadyFinal(game.id))
    );
    let s1 = t.group(&group_id).unwrap().standing(game.side_1.entrant).unwrap().clone();
    assert_eq!((s1.matches_won, s1.games_won, s1.games_lost), (1, 6, 0));

    correct_group_result(&mut t, game.id, "0-6").unwrap();
    assert_eq!(t.match_by_id(game.id).unwrap().score.as_deref(), Some("0-6"));
    let group = t.group(&group_id).unwrap();
    let s1 = group.standing(game.side_1.entrant).unwrap();
    let s2 = group.standing(game.side_2.entrant).unwrap();
    assert_eq!((s1.matches_won, s1.matches_lost, s1.games_won), (0, 1, 0));
    assert_eq!((s2.matches_won, s2.games_won, s2.games_lost), (1, 6, 0));
}

#[test]
fn group_ranking_uses_tournament_policy() {
    let mut t = started_doubles(3, 4);
    let mut rng = StdRng::seed_from_u64(0);
    let ids: Vec<_> = t.matches.iter().map(|m| m.id).collect();
    for id in ids {
        record_result(&mut t, id, "6-1", &mut rng).unwrap();
    }
    let ranked = group_ranking(&t, "A").unwrap();
    assert_eq!(ranked.len(), 3);
    assert!(ranked.windows(2).all(|w| w[0].matches_won >= w[1].matches_won));
    assert_eq!(
        group_ranking(&t, "Z"),
        Err(TournamentError::GroupNotFound("Z".to_string()))
    );
}
