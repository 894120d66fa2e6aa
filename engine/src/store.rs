use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};

use crate::records::{character_key, weapon_key, Character, Opponent, Weapon};

pub const CHARACTERS_FILE: &str = "characters.json";
pub const WEAPONS_FILE: &str = "weapons.json";
pub const OPPONENTS_FILE: &str = "opponents.json";

/// Characters, weapons and arena opponents backed by three JSON files in one
/// directory. Entries keep the order they were written in.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    dir: PathBuf,
    pub characters: IndexMap<String, Character>,
    pub weapons: IndexMap<String, Weapon>,
    pub opponents: IndexMap<String, Opponent>,
}

impl RecordStore {
    /// An empty store that will save into `dir`.
    pub fn empty(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Load every table found in `dir`. Missing files are empty tables.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let characters = load_table(&dir.join(CHARACTERS_FILE))?;
        let weapons = load_table(&dir.join(WEAPONS_FILE))?;
        let opponents = load_table(&dir.join(OPPONENTS_FILE))?;
        Ok(Self {
            dir,
            characters,
            weapons,
            opponents,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.get(&character_key(name))
    }

    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.get(&weapon_key(name))
    }

    pub fn opponent(&self, key: &str) -> Option<&Opponent> {
        self.opponents.get(key)
    }

    /// Insert (or replace) a character and persist the characters table.
    pub fn put_character(&mut self, name: &str, character: Character) -> Result<()> {
        self.characters.insert(character_key(name), character);
        save_table(&self.dir.join(CHARACTERS_FILE), &self.characters)
    }

    pub fn put_weapon(&mut self, name: &str, weapon: Weapon) -> Result<()> {
        self.weapons.insert(weapon_key(name), weapon);
        save_table(&self.dir.join(WEAPONS_FILE), &self.weapons)
    }

    pub fn put_opponent(&mut self, key: &str, opponent: Opponent) -> Result<()> {
        self.opponents.insert(key.to_string(), opponent);
        save_table(&self.dir.join(OPPONENTS_FILE), &self.opponents)
    }
}

fn load_table<T: DeserializeOwned>(path: &Path) -> Result<IndexMap<String, T>> {
    if !path.exists() {
        tracing::debug!("no table at {}, starting empty", path.display());
        return Ok(IndexMap::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read records JSON: {}", path.display()))?;
    let table: IndexMap<String, T> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse records JSON: {}", path.display()))?;
    tracing::debug!("loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

fn save_table<T: Serialize>(path: &Path, table: &IndexMap<String, T>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data dir: {}", parent.display()))?;
        }
    }
    let text = serde_json::to_string_pretty(table)?;
    fs::write(path, text)
        .with_context(|| format!("failed to write records JSON: {}", path.display()))?;
    tracing::debug!("saved {} records to {}", table.len(), path.display());
    Ok(())
}
