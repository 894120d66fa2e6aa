use serde::Serialize;

use crate::params::{CombatParameters, Doubling};

/// One realization of a combat round and its probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub damage_to_enemy: u32,
    pub damage_to_player: u32,
    pub probability: f64,
}

impl RoundOutcome {
    fn new(damage_to_enemy: u32, damage_to_player: u32, probability: f64) -> Self {
        Self {
            damage_to_enemy,
            damage_to_player,
            probability,
        }
    }
}

/// Enumerate every distinct per-round result for the given hit chances,
/// damages and doubling mode. Probabilities sum to 1.
///
/// A doubling side's two attacks are weighted binomially (2 hits, 1 hit, 0
/// hits). `Unknown` produces the same set as `Enemy`.
pub fn enumerate_outcomes(
    player_hit: u32,
    player_damage: u32,
    enemy_hit: u32,
    enemy_damage: u32,
    doubling: Doubling,
) -> Vec<RoundOutcome> {
    let ph = player_hit as f64 / 100.0;
    let eh = enemy_hit as f64 / 100.0;
    let pm = 1.0 - ph;
    let em = 1.0 - eh;
    let (dp, de) = (player_damage, enemy_damage);

    match doubling {
        Doubling::Player => vec![
            RoundOutcome::new(2 * dp, de, ph * ph * eh),
            RoundOutcome::new(dp, de, 2.0 * ph * pm * eh),
            RoundOutcome::new(0, de, pm * pm * eh),
            RoundOutcome::new(2 * dp, 0, ph * ph * em),
            RoundOutcome::new(dp, 0, 2.0 * ph * pm * em),
            RoundOutcome::new(0, 0, pm * pm * em),
        ],
        Doubling::Enemy | Doubling::Unknown => vec![
            RoundOutcome::new(dp, 2 * de, ph * eh * eh),
            RoundOutcome::new(dp, de, ph * (2.0 * eh * em)),
            RoundOutcome::new(dp, 0, ph * em * em),
            RoundOutcome::new(0, 2 * de, pm * eh * eh),
            RoundOutcome::new(0, de, pm * (2.0 * eh * em)),
            RoundOutcome::new(0, 0, pm * em * em),
        ],
        Doubling::None => vec![
            RoundOutcome::new(dp, de, ph * eh),
            RoundOutcome::new(dp, 0, ph * em),
            RoundOutcome::new(0, de, pm * eh),
            RoundOutcome::new(0, 0, pm * em),
        ],
    }
}

/// Outcome set for already-validated parameters.
pub fn outcomes_for(params: &CombatParameters) -> Vec<RoundOutcome> {
    enumerate_outcomes(
        params.player.hit,
        params.player.damage,
        params.enemy.hit,
        params.enemy.damage,
        params.doubling,
    )
}
