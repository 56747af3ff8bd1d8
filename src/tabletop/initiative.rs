//! Initiative sequencing
//!
//! Pure functions deriving turn order from a token list. Only tokens with
//! an initiative score participate; order is descending with ties keeping
//! their relative position in the token list. An empty order means no
//! active encounter.

use serde::Serialize;

use super::token::Token;

/// Result of advancing the turn pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnAdvance {
    /// Token whose turn it now is
    pub token_id: String,
    /// True when the pointer wrapped back to the top of the order,
    /// completing a round
    pub round_complete: bool,
}

/// Tokens participating in initiative, sorted descending by score.
/// The sort is stable: tied scores keep token-list order.
pub fn with_initiative(tokens: &[Token]) -> Vec<&Token> {
    let mut order: Vec<&Token> = tokens.iter().filter(|t| t.has_initiative()).collect();
    order.sort_by(|a, b| b.initiative.cmp(&a.initiative));
    order
}

/// Advance the turn pointer.
///
/// With no current turn the first token in the order is up and no round
/// completes. Otherwise the pointer moves one step, wrapping to the top of
/// the order with `round_complete` set. A current id that no longer
/// resolves into the order (token removed or initiative cleared) is
/// treated as unset: the encounter restarts at the top without counting a
/// round. Returns `None` when no tokens carry initiative.
pub fn advance(tokens: &[Token], current: Option<&str>) -> Option<TurnAdvance> {
    let order = with_initiative(tokens);
    if order.is_empty() {
        return None;
    }

    let current_index = current.and_then(|id| order.iter().position(|t| t.id == id));

    match current_index {
        None => Some(TurnAdvance {
            token_id: order[0].id.clone(),
            round_complete: false,
        }),
        Some(i) => {
            let next = (i + 1) % order.len();
            Some(TurnAdvance {
                token_id: order[next].id.clone(),
                round_complete: next == 0,
            })
        }
    }
}

/// Copy of the token list with every initiative unset. Does not mutate
/// the input.
pub fn clear_all_initiatives(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .cloned()
        .map(|mut t| {
            t.initiative = None;
            t
        })
        .collect()
}
