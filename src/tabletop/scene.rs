//! Scene state
//!
//! A scene is the tabletop a room displays: background, GM notes, and the
//! ordered token list, plus the encounter state (round counter and
//! current-turn pointer). Scenes are serialized wholesale when a room is
//! saved.
//!
//! The current-turn pointer is never allowed to dangle: every mutation
//! that can invalidate it (removing the current token, clearing its
//! initiative, ending the encounter) clears it, and the next advance
//! restarts at the top of the order without counting a round.

use serde::{Deserialize, Serialize};

use super::initiative::{self, TurnAdvance};
use super::token::Token;

/// A room's tabletop state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Background map image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_url: Option<String>,
    /// Free-form GM notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Ordered token list
    #[serde(default)]
    pub tokens: Vec<Token>,
    /// Encounter round, 0 while no encounter is running
    #[serde(default)]
    pub round: u32,
    /// Token whose turn it is, if an encounter is running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_turn: Option<String>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a token by id
    pub fn token(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Look up a token mutably by id
    pub fn token_mut(&mut self, id: &str) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.id == id)
    }

    /// Add a token, returning its id
    pub fn add_token(&mut self, token: Token) -> String {
        let id = token.id.clone();
        self.tokens.push(token);
        id
    }

    /// Remove a token. Clears the turn pointer if it referenced the
    /// removed token.
    pub fn remove_token(&mut self, id: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t.id != id);
        let removed = self.tokens.len() != before;

        if removed && self.current_turn.as_deref() == Some(id) {
            self.current_turn = None;
        }
        removed
    }

    /// Set or clear a token's initiative. Clearing the current-turn
    /// token's initiative drops the pointer.
    pub fn set_initiative(&mut self, id: &str, initiative: Option<i32>) -> bool {
        let Some(token) = self.token_mut(id) else {
            return false;
        };
        token.initiative = initiative;

        if initiative.is_none() && self.current_turn.as_deref() == Some(id) {
            self.current_turn = None;
        }
        true
    }

    /// Advance the turn pointer and keep the round counter in step:
    /// the first turn of an encounter starts round 1, and each wrap of
    /// the order increments it.
    pub fn next_turn(&mut self) -> Option<TurnAdvance> {
        let result = initiative::advance(&self.tokens, self.current_turn.as_deref())?;

        if result.round_complete {
            self.round += 1;
        } else if self.round == 0 {
            self.round = 1;
        }
        self.current_turn = Some(result.token_id.clone());

        Some(result)
    }

    /// End the encounter: unset every initiative, drop the pointer,
    /// reset the round counter.
    pub fn clear_initiatives(&mut self) {
        self.tokens = initiative::clear_all_initiatives(&self.tokens);
        self.current_turn = None;
        self.round = 0;
    }
}
