use serde::Serialize;

use crate::records::{Character, DamageType, Opponent, Weapon};

/// Hit rate shown before a fight, capped at 100.
pub fn hit_rate(skill: i32, luck: i32, weapon_hit: i32) -> i32 {
    (weapon_hit + skill * 2 + luck.div_euclid(2)).min(100)
}

pub fn attack(base: i32, might: i32) -> i32 {
    base + might
}

/// Only displayed: it tells the user who is likely to double.
pub fn attack_speed(speed: i32, weight: i32) -> i32 {
    speed - weight
}

pub fn damage(attack: i32, defense: i32) -> i32 {
    (attack - defense).max(0)
}

/// Derived numbers for one character/weapon/opponent pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Matchup {
    pub player_attack: i32,
    pub player_damage: i32,
    pub player_hit: i32,
    pub attack_speed: i32,
    pub enemy_damage: i32,
}

pub fn derive_matchup(character: &Character, weapon: &Weapon, opponent: &Opponent) -> Matchup {
    let (base, defense) = match weapon.damage_type {
        DamageType::Physical => (character.str_, opponent.def),
        DamageType::Magic => (character.mag, opponent.res),
    };
    let player_attack = attack(base, weapon.might);
    let enemy_defense = match opponent.damage_type {
        DamageType::Physical => character.def,
        DamageType::Magic => character.res,
    };
    Matchup {
        player_attack,
        player_damage: damage(player_attack, defense),
        player_hit: hit_rate(character.skill, character.luck, weapon.hit),
        attack_speed: attack_speed(character.speed, weapon.weight),
        enemy_damage: damage(opponent.atc, enemy_defense),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::OpponentType;

    fn dew() -> Character {
        Character {
            str_: 7,
            mag: 2,
            skill: 9,
            speed: 12,
            luck: 7,
            def: 4,
            res: 1,
            hp: 26,
        }
    }

    #[test]
    fn hit_rate_floors_luck_and_caps() {
        assert_eq!(hit_rate(9, 7, 70), 70 + 18 + 3);
        assert_eq!(hit_rate(15, 10, 90), 100);
    }

    #[test]
    fn damage_never_negative() {
        assert_eq!(damage(5, 9), 0);
        assert_eq!(damage(12, 9), 3);
    }

    #[test]
    fn physical_matchup_uses_def() {
        let sword = Weapon {
            might: 5,
            hit: 70,
            weight: 3,
            damage_type: DamageType::Physical,
            opponent_type: OpponentType::Normal,
        };
        let opp = Opponent {
            hit: 60,
            def: 5,
            res: 0,
            atc: 11,
            hp: 22,
            damage_type: DamageType::Physical,
        };
        let m = derive_matchup(&dew(), &sword, &opp);
        assert_eq!(m.player_attack, 12);
        assert_eq!(m.player_damage, 7);
        assert_eq!(m.attack_speed, 9);
        assert_eq!(m.enemy_damage, 7);
        assert_eq!(m.player_hit, 91);
    }

    #[test]
    fn magic_matchup_uses_res_on_both_sides() {
        let tome = Weapon {
            might: 10,
            hit: 80,
            weight: 4,
            damage_type: DamageType::Magic,
            opponent_type: OpponentType::Normal,
        };
        let mage = Opponent {
            hit: 70,
            def: 9,
            res: 3,
            atc: 14,
            hp: 20,
            damage_type: DamageType::Magic,
        };
        let m = derive_matchup(&dew(), &tome, &mage);
        assert_eq!(m.player_damage, 12 - 3);
        assert_eq!(m.enemy_damage, 14 - 1);
    }
}
