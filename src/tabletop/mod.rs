//! Tabletop core
//!
//! The in-memory state a room's virtual tabletop operates on:
//! - Dice rolling and modifier arithmetic
//! - The static condition catalog
//! - Tokens with HP/condition bookkeeping
//! - Initiative ordering and turn advancement
//! - Scene state tying it together

mod conditions;
mod dice;
mod initiative;
mod scene;
mod token;

pub use conditions::{condition_by_id, is_known_condition, Condition, CONDITIONS};
pub use dice::{ability_modifier, parse_dice, roll_d20, roll_initiative, DiceRoll};
pub use initiative::{advance, clear_all_initiatives, with_initiative, TurnAdvance};
pub use scene::Scene;
pub use token::{DamageOutcome, Token};
