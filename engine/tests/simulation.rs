use arena_engine::sim::{simulate_many, DEFAULT_MAX_ROUNDS};
use arena_engine::{win_probability, CombatParameters, Doubling, StallPolicy};

#[test]
fn monte_carlo_tracks_replayed_stalls() {
    for doubling in [Doubling::None, Doubling::Player, Doubling::Enemy] {
        let params = CombatParameters::new(20, 22, 70, 5, 60, 4, doubling).unwrap();
        let exact = win_probability(&params, StallPolicy::Replay).unwrap();
        let sim = simulate_many(&params, 4000, 2025, DEFAULT_MAX_ROUNDS);
        assert_eq!(sim.unresolved, 0);
        assert!(
            (sim.win_rate() - exact).abs() < 0.04,
            "{doubling}: sim={} exact={exact}",
            sim.win_rate()
        );
    }
}

#[test]
fn summary_counts_add_up() {
    let params = CombatParameters::new(4, 4, 50, 2, 50, 2, Doubling::None).unwrap();
    let sim = simulate_many(&params, 300, 11, DEFAULT_MAX_ROUNDS);
    assert_eq!(sim.samples, 300);
    assert_eq!(sim.player_wins + sim.enemy_wins + sim.unresolved, 300);
    assert!(sim.mutual_defeats <= sim.player_wins);
    assert!(sim.avg_rounds >= 2.0);
}

#[test]
fn hopeless_fight_never_resolves() {
    let params = CombatParameters::new(10, 10, 0, 5, 0, 5, Doubling::None).unwrap();
    let sim = simulate_many(&params, 20, 3, 40);
    assert_eq!(sim.unresolved, 20);
    assert_eq!(sim.win_rate(), 0.0);
    assert_eq!(sim.avg_rounds, 0.0);
}
