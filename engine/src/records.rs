use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Physical,
    Magic,
}

impl DamageType {
    pub fn parse(s: &str) -> Option<DamageType> {
        match s.trim().to_lowercase().as_str() {
            "physical" | "phys" => Some(DamageType::Physical),
            "magic" | "magical" => Some(DamageType::Magic),
            _ => None,
        }
    }
}

/// Arena opponents differ for 2-range weapons, so bows look up a separate
/// opponent table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentType {
    #[default]
    Normal,
    Ranged,
}

impl OpponentType {
    /// `bow` (and `ranged`) map to `Ranged`; anything else is `Normal`.
    pub fn from_weapon_kind(s: &str) -> OpponentType {
        match s.trim().to_lowercase().as_str() {
            "bow" | "ranged" => OpponentType::Ranged,
            _ => OpponentType::Normal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OpponentType::Normal => "normal",
            OpponentType::Ranged => "ranged",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    #[serde(rename = "Str")]
    pub str_: i32,
    #[serde(rename = "Mag")]
    pub mag: i32,
    #[serde(rename = "Skill")]
    pub skill: i32,
    #[serde(rename = "Speed")]
    pub speed: i32,
    #[serde(rename = "Luck")]
    pub luck: i32,
    #[serde(rename = "Def")]
    pub def: i32,
    #[serde(rename = "Res")]
    pub res: i32,
    #[serde(rename = "HP")]
    pub hp: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    #[serde(rename = "Might")]
    pub might: i32,
    #[serde(rename = "Hit")]
    pub hit: i32,
    #[serde(rename = "Weight")]
    pub weight: i32,
    #[serde(rename = "DamageType")]
    pub damage_type: DamageType,
    #[serde(rename = "OpponentType", default)]
    pub opponent_type: OpponentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    #[serde(rename = "Hit")]
    pub hit: i32,
    #[serde(rename = "Def")]
    pub def: i32,
    /// Older records carry no resistance.
    #[serde(rename = "Res", default)]
    pub res: i32,
    #[serde(rename = "Atc")]
    pub atc: i32,
    #[serde(rename = "HP")]
    pub hp: i32,
    #[serde(rename = "DamageType")]
    pub damage_type: DamageType,
}

/// Key under which an arena opponent is stored, e.g. `ranged_ch3_lvl5`.
pub fn opponent_key(opponent_type: OpponentType, chapter: u32, arena: u32) -> String {
    format!("{}_ch{}_lvl{}", opponent_type.as_str(), chapter, arena)
}

/// Character names are stored capitalized: `dEW` → `Dew`.
pub fn character_key(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Weapon names are stored lowercased.
pub fn weapon_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One `  Key: value` line per field, in record order.
pub fn format_stats<T: Serialize>(record: &T) -> serde_json::Result<String> {
    // Round-trip through text so the map keeps declaration order.
    let text = serde_json::to_string(record)?;
    let fields: IndexMap<String, serde_json::Value> = serde_json::from_str(&text)?;
    let lines: Vec<String> = fields
        .iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => format!("  {}: {}", k, s),
            other => format!("  {}: {}", k, other),
        })
        .collect();
    Ok(lines.join("\n"))
}
