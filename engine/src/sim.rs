use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::params::CombatParameters;

pub const DEFAULT_MAX_ROUNDS: u32 = 500;

/// Seeded percentile roller.
pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// One attack against a `hit` percent chance.
    pub fn lands(&mut self, hit: u32) -> bool {
        self.rng.gen_range(0..100) < hit
    }

    /// How many of `attacks` land.
    pub fn hits(&mut self, attacks: u32, hit: u32) -> u32 {
        (0..attacks).filter(|_| self.lands(hit)).count() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player,
    Enemy,
    /// Round cap reached with both sides standing.
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FightResult {
    pub winner: Winner,
    pub rounds: u32,
    pub player_hp_end: u32,
    pub enemy_hp_end: u32,
}

impl FightResult {
    pub fn mutual_defeat(&self) -> bool {
        self.player_hp_end == 0 && self.enemy_hp_end == 0
    }
}

/// Play one fight round by round. All attacks of a round land together, so
/// both sides can drop in the same round; that counts as a player win.
pub fn simulate_fight(params: &CombatParameters, dice: &mut Dice, max_rounds: u32) -> FightResult {
    let (player_attacks, enemy_attacks) = params.doubling.attacks();
    let mut player_hp = params.player.hp;
    let mut enemy_hp = params.enemy.hp;
    let mut rounds = 0u32;

    while rounds < max_rounds {
        rounds += 1;
        let player_hits = dice.hits(player_attacks, params.player.hit);
        let enemy_hits = dice.hits(enemy_attacks, params.enemy.hit);
        enemy_hp = enemy_hp.saturating_sub(player_hits * params.player.damage);
        player_hp = player_hp.saturating_sub(enemy_hits * params.enemy.damage);

        if enemy_hp == 0 || player_hp == 0 {
            break;
        }
    }

    let winner = if enemy_hp == 0 {
        Winner::Player
    } else if player_hp == 0 {
        Winner::Enemy
    } else {
        Winner::Unresolved
    };
    FightResult {
        winner,
        rounds,
        player_hp_end: player_hp,
        enemy_hp_end: enemy_hp,
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimSummary {
    pub samples: u32,
    pub player_wins: u32,
    pub enemy_wins: u32,
    pub unresolved: u32,
    pub mutual_defeats: u32,
    /// Mean rounds over resolved fights.
    pub avg_rounds: f64,
}

impl SimSummary {
    pub fn win_rate(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.player_wins as f64 / self.samples as f64
        }
    }
}

/// Run `samples` fights; trial `i` rolls with seed `seed + i`.
pub fn simulate_many(
    params: &CombatParameters,
    samples: u32,
    seed: u64,
    max_rounds: u32,
) -> SimSummary {
    let mut summary = SimSummary {
        samples,
        ..SimSummary::default()
    };
    let mut resolved_rounds = 0u64;

    for i in 0..samples {
        let mut dice = Dice::from_seed(seed.wrapping_add(i as u64));
        let fight = simulate_fight(params, &mut dice, max_rounds);
        match fight.winner {
            Winner::Player => summary.player_wins += 1,
            Winner::Enemy => summary.enemy_wins += 1,
            Winner::Unresolved => summary.unresolved += 1,
        }
        if fight.mutual_defeat() {
            summary.mutual_defeats += 1;
        }
        if fight.winner != Winner::Unresolved {
            resolved_rounds += fight.rounds as u64;
        }
    }

    let resolved = summary.player_wins + summary.enemy_wins;
    if resolved > 0 {
        summary.avg_rounds = resolved_rounds as f64 / resolved as f64;
    }
    tracing::info!(
        samples,
        player_wins = summary.player_wins,
        enemy_wins = summary.enemy_wins,
        unresolved = summary.unresolved,
        "simulation finished"
    );
    summary
}
