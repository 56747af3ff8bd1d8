//! Dice rolling
//!
//! Parses and rolls dice notation like "2d6+3", "1d20", "4d6-2".
//! Also home to the d20 helper and ability-modifier arithmetic used by
//! initiative rolls and character generation.

use rand::Rng;
use std::str::FromStr;

/// A parsed dice roll specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Flat modifier added to the total
    pub modifier: i32,
}

impl DiceRoll {
    /// Create a new dice roll
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self { count, sides, modifier }
    }

    /// Roll the dice and return the total
    pub fn roll(&self) -> i32 {
        let (_, total) = self.roll_detailed();
        total
    }

    /// Roll and return individual die results plus total
    pub fn roll_detailed(&self) -> (Vec<u32>, i32) {
        let mut rng = rand::rng();
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.random_range(1..=self.sides))
            .collect();

        let sum: u32 = rolls.iter().sum();
        (rolls, sum as i32 + self.modifier)
    }

    /// Minimum possible result
    pub fn min(&self) -> i32 {
        self.count as i32 + self.modifier
    }

    /// Maximum possible result
    pub fn max(&self) -> i32 {
        (self.count * self.sides) as i32 + self.modifier
    }
}

impl FromStr for DiceRoll {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dice(s)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Parse a dice notation string like "2d6+3"
pub fn parse_dice(notation: &str) -> Result<DiceRoll, String> {
    let notation = notation.trim().to_lowercase();

    let (count_str, rest) = notation
        .split_once('d')
        .ok_or("Missing 'd' in dice notation")?;

    let count: u32 = if count_str.is_empty() {
        1 // "d20" means "1d20"
    } else {
        count_str
            .parse()
            .map_err(|_| format!("Invalid dice count: {}", count_str))?
    };

    if count == 0 {
        return Err("Dice count must be at least 1".to_string());
    }

    // Split off a trailing +N/-N modifier if present
    let (sides_str, modifier) = if let Some((sides, mod_str)) = rest.split_once('+') {
        let modifier: i32 = mod_str
            .parse()
            .map_err(|_| format!("Invalid modifier: {}", mod_str))?;
        (sides, modifier)
    } else if let Some((sides, mod_str)) = rest.split_once('-') {
        let modifier: i32 = mod_str
            .parse()
            .map_err(|_| format!("Invalid modifier: {}", mod_str))?;
        (sides, -modifier)
    } else {
        (rest, 0)
    };

    let sides: u32 = sides_str
        .parse()
        .map_err(|_| format!("Invalid die sides: {}", sides_str))?;

    if sides == 0 {
        return Err("Die sides must be at least 1".to_string());
    }

    Ok(DiceRoll { count, sides, modifier })
}

/// Roll a single d20
pub fn roll_d20() -> u32 {
    rand::rng().random_range(1..=20)
}

/// Ability modifier for a score: floor((score - 10) / 2)
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Roll initiative: 1d20 plus the dexterity modifier
pub fn roll_initiative(dexterity: i32) -> i32 {
    roll_d20() as i32 + ability_modifier(dexterity)
}
