use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use arena_engine::api::{evaluate, ArenaScreen, Entrants};
use arena_engine::records::{character_key, format_stats, opponent_key, weapon_key};
use arena_engine::{
    Character, DamageType, Doubling, Opponent, OpponentType, RecordStore, StallPolicy, Weapon,
};

const CHARACTER_FIELDS: [&str; 8] = ["Str", "Mag", "Skill", "Speed", "Luck", "Def", "Res", "HP"];

struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for: {}", prompt.trim());
        }
        Ok(line.trim().to_string())
    }

    fn ask_int(&mut self, prompt: &str) -> Result<i32> {
        loop {
            let answer = self.ask(prompt)?;
            match answer.parse() {
                Ok(n) => return Ok(n),
                Err(_) => self.say("  please enter a whole number")?,
            }
        }
    }

    fn ask_positive(&mut self, prompt: &str) -> Result<u32> {
        loop {
            let n = self.ask_int(prompt)?;
            if n > 0 {
                return Ok(n as u32);
            }
            self.say("  please enter a number above 0")?;
        }
    }

    fn ask_hit(&mut self, prompt: &str) -> Result<i32> {
        loop {
            let n = self.ask_int(prompt)?;
            if (0..=100).contains(&n) {
                return Ok(n);
            }
            self.say("  please enter a hit chance from 0 to 100")?;
        }
    }

    fn ask_ints(&mut self, heading: &str, fields: &[&str]) -> Result<Vec<i32>> {
        self.say(&format!("\n{}", heading))?;
        fields
            .iter()
            .map(|f| self.ask_int(&format!("  {}: ", f)))
            .collect()
    }

    fn ask_damage_type(&mut self, prompt: &str) -> Result<DamageType> {
        loop {
            if let Some(t) = DamageType::parse(&self.ask(prompt)?) {
                return Ok(t);
            }
            self.say("  expected physical or magic")?;
        }
    }
}

enum CharacterMode {
    Stored,
    Manual,
}

/// Prompt-driven preview. Characters, weapons and opponents that are not in
/// the store yet are entered once and saved.
pub fn run<R: BufRead, W: Write>(store: &mut RecordStore, input: R, out: W) -> Result<()> {
    let mut p = Prompter { input, out };
    p.say("=== Arena Win Calculator ===")?;

    let (character_name, character) = match choose_mode(&mut p)? {
        CharacterMode::Stored => stored_character(&mut p, store)?,
        CharacterMode::Manual => {
            let v = p.ask_ints(
                "Enter character stats (manual mode, not saved)",
                &CHARACTER_FIELDS,
            )?;
            ("Manual".to_string(), character_from(&v))
        }
    };

    let (weapon_name, weapon) = stored_weapon(&mut p, store)?;

    let chapter = p.ask_positive("Chapter number: ")?;
    let arena = p.ask_positive("Arena level (1-7): ")?;

    p.say("\nEnter Arena displayed combat stats:")?;
    let player_hit = p.ask_hit("  Your displayed hit (e.g. 64): ")?;
    let enemy_hit = p.ask_hit("  Enemy displayed hit (e.g. 53): ")?;
    let doubling = Doubling::parse(&p.ask("Who doubles? (player/enemy/none/unknown): ")?);

    let key = opponent_key(weapon.opponent_type, chapter, arena);
    let opponent = match store.opponent(&key) {
        Some(o) => *o,
        None => {
            p.say(&format!("Opponent data for {} not found. Please enter it:", key))?;
            let v = p.ask_ints(
                &format!("Enter arena stats for opponent {}", key),
                &["Hit", "Def", "Res", "Atc", "HP"],
            )?;
            let damage_type = p.ask_damage_type("  Damage Type (physical/magic): ")?;
            let opponent = Opponent {
                hit: v[0],
                def: v[1],
                res: v[2],
                atc: v[3],
                hp: v[4],
                damage_type,
            };
            store.put_opponent(&key, opponent)?;
            opponent
        }
    };

    let preview = evaluate(
        &Entrants {
            character: (&character_name, &character),
            weapon: (&weapon_name, &weapon),
            opponent: (&key, &opponent),
        },
        &ArenaScreen {
            player_hit: Some(player_hit),
            enemy_hit: Some(enemy_hit),
            doubling,
            stall_policy: StallPolicy::Forfeit,
        },
    )?;
    p.say(&format!("\n{}", preview.render()))?;
    Ok(())
}

fn choose_mode<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<CharacterMode> {
    p.say("\nChoose character stat input mode:")?;
    p.say("  1. Use stored characters.json (name lookup, save/update behavior)")?;
    p.say("  2. Enter stats manually (do not store or load)")?;
    loop {
        match p.ask("Enter choice (1 or 2): ")?.as_str() {
            "1" => return Ok(CharacterMode::Stored),
            "2" => return Ok(CharacterMode::Manual),
            _ => p.say("  please enter 1 or 2")?,
        }
    }
}

fn stored_character<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    store: &mut RecordStore,
) -> Result<(String, Character)> {
    let name = character_key(&p.ask("Enter character name: ")?);
    if let Some(found) = store.character(&name).copied() {
        p.say(&format!("Loaded existing character: {}", name))?;
        p.say("Character stats:")?;
        p.say(&format_stats(&found)?)?;
        return Ok((name, found));
    }
    let v = p.ask_ints(
        &format!("Enter stats for new character '{}'", name),
        &CHARACTER_FIELDS,
    )?;
    let character = character_from(&v);
    store.put_character(&name, character)?;
    Ok((name, character))
}

fn stored_weapon<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    store: &mut RecordStore,
) -> Result<(String, Weapon)> {
    let name = weapon_key(&p.ask("Enter weapon name: ")?);
    if let Some(found) = store.weapon(&name).copied() {
        p.say(&format!("Loaded existing weapon: {}", name))?;
        p.say("Weapon stats:")?;
        p.say(&format_stats(&found)?)?;
        return Ok((name, found));
    }
    let v = p.ask_ints(
        &format!("Enter stats for new weapon '{}'", name),
        &["Might", "Hit", "Weight"],
    )?;
    let damage_type = p.ask_damage_type("  Type (physical/magic): ")?;
    let opponent_type = OpponentType::from_weapon_kind(&p.ask("  Weapon type (normal/bow): ")?);
    let weapon = Weapon {
        might: v[0],
        hit: v[1],
        weight: v[2],
        damage_type,
        opponent_type,
    };
    store.put_weapon(&name, weapon)?;
    Ok((name, weapon))
}

fn character_from(v: &[i32]) -> Character {
    Character {
        str_: v[0],
        mag: v[1],
        skill: v[2],
        speed: v[3],
        luck: v[4],
        def: v[5],
        res: v[6],
        hp: v[7],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(name: &str) -> RecordStore {
        let dir = std::env::temp_dir().join(format!("arena-cli-{}-{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&dir);
        RecordStore::empty(dir)
    }

    #[test]
    fn manual_mode_saves_weapon_and_opponent_only() {
        let mut store = scratch_store("manual");
        let script = "2\n7\n0\n9\n12\n7\n4\n1\n26\nIron Sword\n5\n70\n3\nphysical\nsword\n1\n1\n100\n0\nnone\n60\n5\n0\n11\n22\nphysical\n";
        let mut out = Vec::new();
        run(&mut store, script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Win Chance: 100.00%"), "{text}");
        assert!(store.characters.is_empty());
        assert!(store.weapon("iron sword").is_some());
        assert!(store.opponent("normal_ch1_lvl1").is_some());
    }

    #[test]
    fn bad_answers_are_asked_again() {
        let mut store = scratch_store("retry");
        store.characters.insert(
            "Dew".into(),
            Character {
                str_: 7,
                mag: 0,
                skill: 9,
                speed: 12,
                luck: 7,
                def: 4,
                res: 1,
                hp: 26,
            },
        );
        store.weapons.insert(
            "iron bow".into(),
            Weapon {
                might: 6,
                hit: 70,
                weight: 4,
                damage_type: DamageType::Physical,
                opponent_type: OpponentType::Ranged,
            },
        );
        store.opponents.insert(
            "ranged_ch2_lvl3".into(),
            Opponent {
                hit: 50,
                def: 3,
                res: 0,
                atc: 10,
                hp: 18,
                damage_type: DamageType::Physical,
            },
        );
        let script = "3\n1\ndew\niron bow\nx\n2\n3\n0\n100\nplayer\n";
        let mut out = Vec::new();
        run(&mut store, script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("please enter 1 or 2"));
        assert!(text.contains("please enter a whole number"));
        assert!(text.contains("Loaded existing weapon: iron bow"));
        assert!(text.contains("Doubling: Player"));
        assert!(text.contains("Win Chance: 0.00%"));
    }

    #[test]
    fn displayed_hit_out_of_range_is_asked_again() {
        let mut store = scratch_store("hit-range");
        let script = "2\n7\n0\n9\n12\n7\n4\n1\n26\nIron Sword\n5\n70\n3\nphysical\nsword\n1\n1\n150\n100\n-5\n0\nnone\n60\n5\n0\n11\n22\nphysical\n";
        let mut out = Vec::new();
        run(&mut store, script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("please enter a hit chance from 0 to 100").count(), 2);
        assert!(text.contains("Your Hit: 100,"), "{text}");
        assert!(text.contains("Enemy Hit: 0,"), "{text}");
        assert!(text.contains("Win Chance: 100.00%"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut store = scratch_store("eof");
        let err = run(&mut store, "1\n".as_bytes(), Vec::new()).unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }
}
