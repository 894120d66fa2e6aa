//! Arena duel win-probability engine.
//!
//! The core is [`compute_win_probability`]: a table over `(player HP, enemy HP)`
//! filled from the per-round outcome set. Stat derivation, the JSON record
//! store and the Monte Carlo cross-check sit around it.

pub mod api;
pub mod error;
pub mod outcomes;
pub mod params;
pub mod records;
pub mod sim;
pub mod solver;
pub mod stats;
pub mod store;

pub use error::{ArenaError, Side};
pub use outcomes::{enumerate_outcomes, RoundOutcome};
pub use params::{Combatant, CombatParameters, Doubling};
pub use records::{Character, DamageType, Opponent, OpponentType, Weapon};
pub use solver::{
    compute_win_probability, compute_win_probability_with, solve, solve_with, table_cells,
    win_probability, StallPolicy, WinTable, MAX_TABLE_CELLS,
};
pub use store::RecordStore;
