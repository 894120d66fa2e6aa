use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::params::{CombatParameters, Doubling};
use crate::records::{character_key, opponent_key, weapon_key, Character, Opponent, Weapon};
use crate::solver::{win_probability, StallPolicy};
use crate::stats::derive_matchup;
use crate::store::RecordStore;

/// Values read off the arena screen before a fight.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ArenaScreen {
    /// Displayed hit; derived from stats when absent.
    #[serde(default)]
    pub player_hit: Option<i32>,
    /// Displayed enemy hit; the opponent record's Hit when absent.
    #[serde(default)]
    pub enemy_hit: Option<i32>,
    #[serde(default)]
    pub doubling: Doubling,
    #[serde(default)]
    pub stall_policy: StallPolicy,
}

/// Which stored records to pit against each other.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PreviewRequest {
    pub character: String,
    pub weapon: String,
    pub chapter: u32,
    /// Arena level, 1 through 7.
    pub arena: u32,
    #[serde(flatten)]
    pub screen: ArenaScreen,
}

/// Resolved records, each with the name it is reported under.
#[derive(Debug, Clone, Copy)]
pub struct Entrants<'a> {
    pub character: (&'a str, &'a Character),
    pub weapon: (&'a str, &'a Weapon),
    pub opponent: (&'a str, &'a Opponent),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Preview {
    pub character: String,
    pub weapon: String,
    pub opponent: String,
    pub player_hit: i32,
    pub player_damage: i32,
    pub attack_speed: i32,
    pub enemy_hit: i32,
    pub enemy_damage: i32,
    pub player_hp: i32,
    pub enemy_hp: i32,
    pub doubling: Doubling,
    pub win_probability: f64,
}

impl Preview {
    /// Console report shown after a preview.
    pub fn render(&self) -> String {
        let mut doubling = self.doubling.as_str().to_string();
        if let Some(first) = doubling.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        format!(
            "=== Combat Preview with {} ===\n\
             Your Hit: {}, Dmg: {}, AS: {}\n\
             Enemy Hit: {}, Dmg: {}\n\
             Your HP: {}, Enemy HP: {}\n\
             Doubling: {}\n\
             Win Chance: {}",
            self.weapon,
            self.player_hit,
            self.player_damage,
            self.attack_speed,
            self.enemy_hit,
            self.enemy_damage,
            self.player_hp,
            self.enemy_hp,
            doubling,
            format_percent(self.win_probability),
        )
    }
}

/// `0.12345` → `12.35%`.
pub fn format_percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

pub fn preview(store: &RecordStore, req: &PreviewRequest) -> Result<Preview> {
    let character_name = character_key(&req.character);
    let character = store
        .character(&character_name)
        .ok_or_else(|| anyhow!("character '{}' not found", character_name))?;
    let weapon_name = weapon_key(&req.weapon);
    let weapon = store
        .weapon(&weapon_name)
        .ok_or_else(|| anyhow!("weapon '{}' not found", weapon_name))?;
    let key = opponent_key(weapon.opponent_type, req.chapter, req.arena);
    let opponent = store
        .opponent(&key)
        .ok_or_else(|| anyhow!("opponent '{}' not found", key))?;

    evaluate(
        &Entrants {
            character: (&character_name, character),
            weapon: (&weapon_name, weapon),
            opponent: (&key, opponent),
        },
        &req.screen,
    )
}

/// Derive the matchup for already-resolved records and run the solver.
pub fn evaluate(entrants: &Entrants<'_>, screen: &ArenaScreen) -> Result<Preview> {
    let (character_name, character) = entrants.character;
    let (weapon_name, weapon) = entrants.weapon;
    let (opponent_name, opponent) = entrants.opponent;

    let matchup = derive_matchup(character, weapon, opponent);
    let player_hit = screen.player_hit.unwrap_or(matchup.player_hit);
    let enemy_hit = screen.enemy_hit.unwrap_or(opponent.hit.min(100));

    let params = CombatParameters::new(
        character.hp,
        opponent.hp,
        player_hit,
        matchup.player_damage,
        enemy_hit,
        matchup.enemy_damage,
        screen.doubling,
    )
    .with_context(|| format!("invalid matchup {} vs {}", character_name, opponent_name))?;
    let win = win_probability(&params, screen.stall_policy)
        .with_context(|| format!("cannot solve {} vs {}", character_name, opponent_name))?;
    tracing::debug!(opponent = opponent_name, win, "preview computed");

    Ok(Preview {
        character: character_name.to_string(),
        weapon: weapon_name.to_string(),
        opponent: opponent_name.to_string(),
        player_hit,
        player_damage: matchup.player_damage,
        attack_speed: matchup.attack_speed,
        enemy_hit,
        enemy_damage: matchup.enemy_damage,
        player_hp: character.hp,
        enemy_hp: opponent.hp,
        doubling: screen.doubling,
        win_probability: win,
    })
}

/// Read a preview request from JSON, or YAML for `.yaml`/`.yml` files.
/// A leading UTF-8 or UTF-16 byte order mark selects the decoding.
pub fn load_request(path: &Path) -> Result<PreviewRequest> {
    let text = read_text_auto(path)?;
    parse_request(&text, path)
}

fn read_text_auto(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read request: {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        String::from_utf8(bytes)
            .with_context(|| format!("request is not valid UTF-8: {}", path.display()))
    }
}

pub fn parse_request(text: &str, path: &Path) -> Result<PreviewRequest> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(text)
            .with_context(|| format!("failed to parse request YAML: {}", path.display()))
    } else {
        serde_json::from_str(text)
            .with_context(|| format!("failed to parse request JSON: {}", path.display()))
    }
}
