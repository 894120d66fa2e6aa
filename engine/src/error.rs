use thiserror::Error;

/// Rejected combat inputs. Raised before any table is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("invalid {side} HP {hp}: must be at least 1")]
    InvalidHp { side: Side, hp: i32 },

    #[error("invalid {side} hit chance {hit}: must be within 0..=100")]
    InvalidHitChance { side: Side, hit: i32 },

    #[error("invalid {side} damage {damage}: must not be negative")]
    InvalidDamage { side: Side, damage: i32 },

    #[error("win table for {player_hp} x {enemy_hp} HP exceeds {max_cells} cells")]
    TableTooLarge {
        player_hp: u32,
        enemy_hp: u32,
        max_cells: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Enemy => f.write_str("enemy"),
        }
    }
}
