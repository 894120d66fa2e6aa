use serde::{Deserialize, Serialize};

use crate::error::ArenaError;
use crate::outcomes::{outcomes_for, RoundOutcome};
use crate::params::{CombatParameters, Doubling};

/// How a round in which neither side loses HP is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StallPolicy {
    /// The stalled round reads the cell currently being filled, which is
    /// still 0, so it contributes nothing to the win probability.
    #[default]
    Forfeit,
    /// The stalled round is re-rolled until something happens. A fight
    /// that can only stall is never won.
    Replay,
}

/// Largest table the solver will allocate: 128 MiB of `f64`, enough for
/// 4095 HP on each side.
pub const MAX_TABLE_CELLS: usize = 1 << 24;

/// Cell count of the table for the given starting HP, or `TableTooLarge`.
pub fn table_cells(player_hp: u32, enemy_hp: u32) -> Result<usize, ArenaError> {
    let too_large = ArenaError::TableTooLarge {
        player_hp,
        enemy_hp,
        max_cells: MAX_TABLE_CELLS,
    };
    let rows = (player_hp as usize).checked_add(1).ok_or(too_large)?;
    let cols = (enemy_hp as usize).checked_add(1).ok_or(too_large)?;
    match rows.checked_mul(cols) {
        Some(cells) if cells <= MAX_TABLE_CELLS => Ok(cells),
        _ => Err(too_large),
    }
}

/// Win probability for every `(player HP, enemy HP)` pair up to the
/// starting values. Row-major by player HP.
#[derive(Debug, Clone)]
pub struct WinTable {
    player_hp: usize,
    enemy_hp: usize,
    cells: Vec<f64>,
}

impl WinTable {
    fn zeroed(player_hp: u32, enemy_hp: u32) -> Result<Self, ArenaError> {
        let cells = table_cells(player_hp, enemy_hp)?;
        Ok(Self {
            player_hp: player_hp as usize,
            enemy_hp: enemy_hp as usize,
            cells: vec![0.0; cells],
        })
    }

    #[inline]
    fn idx(&self, p: usize, e: usize) -> usize {
        p * (self.enemy_hp + 1) + e
    }

    /// Win probability starting from `p` player HP and `e` enemy HP.
    /// Indices past the starting HP are clamped.
    pub fn get(&self, p: usize, e: usize) -> f64 {
        self.cells[self.idx(p.min(self.player_hp), e.min(self.enemy_hp))]
    }

    fn set(&mut self, p: usize, e: usize, value: f64) {
        let i = self.idx(p, e);
        self.cells[i] = value;
    }

    pub fn player_hp(&self) -> usize {
        self.player_hp
    }

    pub fn enemy_hp(&self) -> usize {
        self.enemy_hp
    }

    /// Answer for the starting HP pair, clamped to [0, 1].
    pub fn win_probability(&self) -> f64 {
        self.get(self.player_hp, self.enemy_hp).clamp(0.0, 1.0)
    }
}

/// Fill the table with the default stall policy.
pub fn solve(
    player_hp: u32,
    enemy_hp: u32,
    outcomes: &[RoundOutcome],
) -> Result<WinTable, ArenaError> {
    solve_with(player_hp, enemy_hp, outcomes, StallPolicy::Forfeit)
}

pub fn solve_with(
    player_hp: u32,
    enemy_hp: u32,
    outcomes: &[RoundOutcome],
    policy: StallPolicy,
) -> Result<WinTable, ArenaError> {
    let mut table = WinTable::zeroed(player_hp, enemy_hp)?;
    let (ph, eh) = (table.player_hp, table.enemy_hp);
    tracing::debug!(
        player_hp = ph,
        enemy_hp = eh,
        outcomes = outcomes.len(),
        ?policy,
        "filling win table"
    );

    // Player at 0 loses, then enemy at 0 wins. The second pass overwrites
    // (0, 0): mutual defeat counts as a player win.
    for e in 0..=eh {
        table.set(0, e, 0.0);
    }
    for p in 0..=ph {
        table.set(p, 0, 1.0);
    }

    for p in 1..=ph {
        for e in 1..=eh {
            let mut acc = 0.0;
            let mut stall = 0.0;
            for o in outcomes {
                let next_p = p.saturating_sub(o.damage_to_player as usize);
                let next_e = e.saturating_sub(o.damage_to_enemy as usize);
                if next_p == p && next_e == e {
                    stall += o.probability;
                    continue;
                }
                acc += o.probability * table.get(next_p, next_e);
            }
            let value = match policy {
                StallPolicy::Forfeit => acc,
                StallPolicy::Replay => {
                    let resolving = 1.0 - stall;
                    if resolving > f64::EPSILON {
                        acc / resolving
                    } else {
                        0.0
                    }
                }
            };
            table.set(p, e, value);
        }
    }
    Ok(table)
}

/// Probability that the player wins the duel, with a stalled round scored
/// as no win. Inputs are validated before anything is allocated.
pub fn compute_win_probability(
    player_hp: i32,
    enemy_hp: i32,
    player_hit: i32,
    player_damage: i32,
    enemy_hit: i32,
    enemy_damage: i32,
    doubling: Doubling,
) -> Result<f64, ArenaError> {
    compute_win_probability_with(
        player_hp,
        enemy_hp,
        player_hit,
        player_damage,
        enemy_hit,
        enemy_damage,
        doubling,
        StallPolicy::Forfeit,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn compute_win_probability_with(
    player_hp: i32,
    enemy_hp: i32,
    player_hit: i32,
    player_damage: i32,
    enemy_hit: i32,
    enemy_damage: i32,
    doubling: Doubling,
    policy: StallPolicy,
) -> Result<f64, ArenaError> {
    let params = CombatParameters::new(
        player_hp,
        enemy_hp,
        player_hit,
        player_damage,
        enemy_hit,
        enemy_damage,
        doubling,
    )?;
    win_probability(&params, policy)
}

/// Same as [`compute_win_probability`] for already-validated parameters and
/// an explicit stall policy. Fails only when the table would be too large.
pub fn win_probability(params: &CombatParameters, policy: StallPolicy) -> Result<f64, ArenaError> {
    let outcomes = outcomes_for(params);
    Ok(solve_with(params.player.hp, params.enemy.hp, &outcomes, policy)?.win_probability())
}
