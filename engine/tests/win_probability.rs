use arena_engine::{
    compute_win_probability, compute_win_probability_with, ArenaError, Doubling, Side,
    StallPolicy, MAX_TABLE_CELLS,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn certain_hit_against_harmless_enemy_wins() {
    let p = compute_win_probability(1, 1, 100, 1, 0, 1, Doubling::None).unwrap();
    assert_eq!(p, 1.0);
}

#[test]
fn certain_miss_against_certain_hit_loses() {
    let p = compute_win_probability(1, 1, 0, 1, 100, 1, Doubling::None).unwrap();
    assert_eq!(p, 0.0);
}

#[test]
fn even_one_hp_fight_is_a_coin_flip() {
    let p = compute_win_probability(1, 1, 50, 1, 50, 1, Doubling::None).unwrap();
    assert!(approx(p, 0.5), "p={p}");
}

#[test]
fn mutual_kill_counts_as_win() {
    // Both always hit for lethal damage: every fight ends at (0, 0).
    let p = compute_win_probability(5, 5, 100, 5, 100, 5, Doubling::Enemy).unwrap();
    assert_eq!(p, 1.0);
}

#[test]
fn unknown_doubling_matches_enemy_doubling() {
    let enemy = compute_win_probability(20, 24, 75, 6, 60, 4, Doubling::Enemy).unwrap();
    let unknown = compute_win_probability(20, 24, 75, 6, 60, 4, Doubling::Unknown).unwrap();
    assert_eq!(enemy.to_bits(), unknown.to_bits());
}

#[test]
fn unrecognized_doubling_text_means_none() {
    let none = compute_win_probability(20, 24, 75, 6, 60, 4, Doubling::None).unwrap();
    let odd = compute_win_probability(20, 24, 75, 6, 60, 4, Doubling::parse("twice?")).unwrap();
    assert_eq!(none.to_bits(), odd.to_bits());
}

#[test]
fn doubling_helps_whoever_doubles() {
    let none = compute_win_probability(30, 30, 70, 5, 70, 5, Doubling::None).unwrap();
    let player = compute_win_probability(30, 30, 70, 5, 70, 5, Doubling::Player).unwrap();
    let enemy = compute_win_probability(30, 30, 70, 5, 70, 5, Doubling::Enemy).unwrap();
    assert!(player > none);
    assert!(enemy < none);
}

#[test]
fn player_dealing_no_damage_never_wins() {
    for policy in [StallPolicy::Forfeit, StallPolicy::Replay] {
        let p = compute_win_probability_with(25, 20, 80, 0, 40, 3, Doubling::Player, policy)
            .unwrap();
        assert_eq!(p, 0.0, "{policy:?}");
    }
}

#[test]
fn harmless_enemy_is_a_sure_win_when_stalls_replay() {
    let p = compute_win_probability_with(10, 30, 35, 2, 90, 0, Doubling::Enemy, StallPolicy::Replay)
        .unwrap();
    assert!(approx(p, 1.0), "p={p}");
}

#[test]
fn harmless_enemy_is_a_sure_win_for_a_certain_hitter() {
    let p = compute_win_probability(10, 30, 100, 2, 90, 0, Doubling::None).unwrap();
    assert_eq!(p, 1.0);
}

#[test]
fn forfeit_scores_stalled_rounds_as_no_win() {
    // Player never misses, so no round can stall and both policies agree.
    let f = compute_win_probability(3, 4, 100, 1, 0, 1, Doubling::None).unwrap();
    let r = compute_win_probability_with(3, 4, 100, 1, 0, 1, Doubling::None, StallPolicy::Replay)
        .unwrap();
    assert_eq!(f, r);

    // With misses possible, forfeiting stalls can only lower the result.
    let f = compute_win_probability(3, 4, 60, 1, 30, 1, Doubling::None).unwrap();
    let r = compute_win_probability_with(3, 4, 60, 1, 30, 1, Doubling::None, StallPolicy::Replay)
        .unwrap();
    assert!(f < r);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let a = compute_win_probability(37, 41, 83, 7, 64, 9, Doubling::Unknown).unwrap();
    let b = compute_win_probability(37, 41, 83, 7, 64, 9, Doubling::Unknown).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());
}

#[test]
fn invalid_inputs_are_rejected() {
    assert_eq!(
        compute_win_probability(0, 1, 50, 1, 50, 1, Doubling::None),
        Err(ArenaError::InvalidHp { side: Side::Player, hp: 0 })
    );
    assert_eq!(
        compute_win_probability(1, 1, 50, 1, 150, 1, Doubling::None),
        Err(ArenaError::InvalidHitChance { side: Side::Enemy, hit: 150 })
    );
    assert_eq!(
        compute_win_probability(1, 1, 50, -1, 50, 1, Doubling::None),
        Err(ArenaError::InvalidDamage { side: Side::Player, damage: -1 })
    );
}

#[test]
fn error_messages_name_the_side() {
    let err = compute_win_probability(1, -4, 50, 1, 50, 1, Doubling::None).unwrap_err();
    assert_eq!(err.to_string(), "invalid enemy HP -4: must be at least 1");
}

#[test]
fn oversized_tables_are_rejected_not_allocated() {
    for (player_hp, enemy_hp) in [(i32::MAX, i32::MAX), (200_000, 200_000), (1, 20_000_000)] {
        let err = compute_win_probability(player_hp, enemy_hp, 50, 1, 50, 1, Doubling::None)
            .unwrap_err();
        assert_eq!(
            err,
            ArenaError::TableTooLarge {
                player_hp: player_hp as u32,
                enemy_hp: enemy_hp as u32,
                max_cells: MAX_TABLE_CELLS,
            }
        );
    }
}

#[test]
fn largest_allowed_table_still_solves() {
    let p = compute_win_probability(4095, 1, 100, 1, 0, 1, Doubling::None).unwrap();
    assert_eq!(p, 1.0);
}
