//! Tokens and HP bookkeeping
//!
//! A token is a movable marker on the tabletop. Tokens may carry HP
//! tracking (current, temporary, max), an initiative score, and a set of
//! status conditions. Damage consumes temporary HP before base HP;
//! healing is capped at max HP and never restores the temporary buffer.

use serde::{Deserialize, Serialize};

/// Clamp a percentage coordinate into [0, 100]
fn clamp_percent(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// A combatant or prop marker on a scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Horizontal position, percent of map width (0-100)
    pub x: f64,
    /// Vertical position, percent of map height (0-100)
    pub y: f64,
    /// Display color (hex)
    pub color: String,
    /// Linked character record, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    /// Current hit points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_hp: Option<i32>,
    /// Temporary hit point buffer, consumed before current HP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_hp: Option<i32>,
    /// Maximum hit points (linked characters supply their own)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,
    /// Initiative score for the current encounter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<i32>,
    /// Active condition ids (insertion order preserved)
    #[serde(default)]
    pub conditions: Vec<String>,
}

/// How a damage application was absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DamageOutcome {
    /// Damage soaked by temporary HP
    pub absorbed: i32,
    /// Damage taken from current HP
    pub taken: i32,
}

impl Token {
    /// Create a new token at the given position
    pub fn new(name: &str, x: f64, y: f64, color: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            x: clamp_percent(x),
            y: clamp_percent(y),
            color: color.to_string(),
            character_id: None,
            current_hp: None,
            temp_hp: None,
            max_hp: None,
            initiative: None,
            conditions: Vec::new(),
        }
    }

    /// Move the token, clamping to the map bounds
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = clamp_percent(x);
        self.y = clamp_percent(y);
    }

    /// Apply damage: temporary HP is consumed 1:1 first, the remainder
    /// reduces current HP floored at 0
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        let mut remaining = amount as i32;
        let mut absorbed = 0;

        if let Some(temp) = self.temp_hp {
            absorbed = remaining.min(temp.max(0));
            self.temp_hp = Some(temp - absorbed);
            remaining -= absorbed;
        }

        let mut taken = 0;
        if remaining > 0 {
            if let Some(hp) = self.current_hp {
                let after = (hp - remaining).max(0);
                taken = hp - after;
                self.current_hp = Some(after);
            }
        }

        DamageOutcome { absorbed, taken }
    }

    /// Heal current HP, capped at max HP. Temporary HP is untouched.
    ///
    /// `max_override` supplies a linked character's max HP; otherwise the
    /// token's own max applies. With no max known at all the heal is
    /// uncapped.
    pub fn heal(&mut self, amount: u32, max_override: Option<i32>) -> i32 {
        let Some(hp) = self.current_hp else {
            return 0;
        };

        let raised = hp + amount as i32;
        let after = match max_override.or(self.max_hp) {
            Some(max) => raised.min(max),
            None => raised,
        };

        self.current_hp = Some(after);
        after - hp
    }

    /// Adjust current HP by a signed delta, clamped to [0, max].
    /// Bypasses the temporary HP buffer entirely.
    pub fn quick_adjust(&mut self, delta: i32, max_override: Option<i32>) {
        let Some(hp) = self.current_hp else {
            return;
        };

        let mut after = (hp + delta).max(0);
        if let Some(max) = max_override.or(self.max_hp) {
            after = after.min(max);
        }
        self.current_hp = Some(after);
    }

    /// Set the temporary HP buffer directly (not additive), clamped >= 0
    pub fn set_temp_hp(&mut self, value: i32) {
        self.temp_hp = Some(value.max(0));
    }

    /// Set max HP directly. The HTTP layer only permits this for tokens
    /// without a linked character.
    pub fn set_max_hp(&mut self, value: i32) {
        self.max_hp = Some(value.max(0));
    }

    /// Toggle a condition: added if absent, removed if present
    pub fn toggle_condition(&mut self, condition_id: &str) -> bool {
        if let Some(pos) = self.conditions.iter().position(|c| c == condition_id) {
            self.conditions.remove(pos);
            false
        } else {
            self.conditions.push(condition_id.to_string());
            true
        }
    }

    /// Whether the token participates in initiative order
    pub fn has_initiative(&self) -> bool {
        self.initiative.is_some()
    }
}
