use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Side};

/// Which combatant attacks twice per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Doubling {
    Player,
    Enemy,
    #[default]
    None,
    /// Resolved exactly like `Enemy`: an undecided matchup is scored as if
    /// the opponent doubles.
    Unknown,
}

impl Doubling {
    /// Lenient parse. Anything that is not `player`, `enemy` or `unknown`
    /// falls back to `None` rather than failing.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "player" => Doubling::Player,
            "enemy" => Doubling::Enemy,
            "unknown" => Doubling::Unknown,
            "none" => Doubling::None,
            other => {
                tracing::warn!("unrecognized doubling mode '{}', treating as none", other);
                Doubling::None
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Doubling::Player => "player",
            Doubling::Enemy => "enemy",
            Doubling::None => "none",
            Doubling::Unknown => "unknown",
        }
    }

    /// Attacks per round as `(player, enemy)`.
    pub fn attacks(self) -> (u32, u32) {
        match self {
            Doubling::Player => (2, 1),
            Doubling::Enemy | Doubling::Unknown => (1, 2),
            Doubling::None => (1, 1),
        }
    }
}

impl From<&str> for Doubling {
    fn from(s: &str) -> Self {
        Doubling::parse(s)
    }
}

impl From<String> for Doubling {
    fn from(s: String) -> Self {
        Doubling::parse(&s)
    }
}

impl From<Doubling> for String {
    fn from(d: Doubling) -> Self {
        d.as_str().to_string()
    }
}

impl std::fmt::Display for Doubling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of the duel, already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Combatant {
    pub hp: u32,
    /// Percent, 0..=100.
    pub hit: u32,
    pub damage: u32,
}

/// The six scalars plus doubling mode the solver consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatParameters {
    pub player: Combatant,
    pub enemy: Combatant,
    pub doubling: Doubling,
}

impl CombatParameters {
    pub fn new(
        player_hp: i32,
        enemy_hp: i32,
        player_hit: i32,
        player_damage: i32,
        enemy_hit: i32,
        enemy_damage: i32,
        doubling: Doubling,
    ) -> Result<Self, ArenaError> {
        Ok(Self {
            player: combatant(Side::Player, player_hp, player_hit, player_damage)?,
            enemy: combatant(Side::Enemy, enemy_hp, enemy_hit, enemy_damage)?,
            doubling,
        })
    }
}

fn combatant(side: Side, hp: i32, hit: i32, damage: i32) -> Result<Combatant, ArenaError> {
    if hp <= 0 {
        return Err(ArenaError::InvalidHp { side, hp });
    }
    if !(0..=100).contains(&hit) {
        return Err(ArenaError::InvalidHitChance { side, hit });
    }
    if damage < 0 {
        return Err(ArenaError::InvalidDamage { side, damage });
    }
    Ok(Combatant {
        hp: hp as u32,
        hit: hit as u32,
        damage: damage as u32,
    })
}
