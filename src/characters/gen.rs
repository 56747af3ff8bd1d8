//! Character generation
//!
//! Ability-score generation and level-derived hit points.

use rand::Rng;
use serde::Deserialize;

use super::Abilities;
use crate::tabletop::ability_modifier;

/// The fixed standard array, assigned str through cha
pub const STANDARD_ARRAY: [i32; 6] = [15, 14, 13, 12, 10, 8];

/// How ability scores are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenMethod {
    /// 4d6 drop lowest, per ability
    #[default]
    Roll,
    /// The standard array in listed order
    StandardArray,
}

/// Roll one ability score: 4d6, drop the lowest die
pub fn roll_ability_score() -> i32 {
    let mut rng = rand::rng();
    let mut dice: [i32; 4] = [0; 4];
    for d in &mut dice {
        *d = rng.random_range(1..=6);
    }
    let lowest: i32 = dice.iter().copied().min().unwrap_or(1);
    dice.iter().sum::<i32>() - lowest
}

/// Generate a full ability block
pub fn generate_abilities(method: GenMethod) -> Abilities {
    match method {
        GenMethod::Roll => Abilities {
            strength: roll_ability_score(),
            dexterity: roll_ability_score(),
            constitution: roll_ability_score(),
            intelligence: roll_ability_score(),
            wisdom: roll_ability_score(),
            charisma: roll_ability_score(),
        },
        GenMethod::StandardArray => Abilities {
            strength: STANDARD_ARRAY[0],
            dexterity: STANDARD_ARRAY[1],
            constitution: STANDARD_ARRAY[2],
            intelligence: STANDARD_ARRAY[3],
            wisdom: STANDARD_ARRAY[4],
            charisma: STANDARD_ARRAY[5],
        },
    }
}

/// Max HP for a level: full hit die plus con modifier at level 1, the
/// average roll plus con modifier for each level after. Never below 1.
pub fn max_hp_for(level: i32, hit_die: i32, constitution: i32) -> i32 {
    let con_mod = ability_modifier(constitution);
    let first = hit_die + con_mod;
    let avg_roll = hit_die / 2 + 1;
    let rest = (level - 1).max(0) * (avg_roll + con_mod);
    (first + rest).max(1)
}
