//! Scenario tests for vttd
//!
//! End-to-end play flows through the HTTP API:
//! - Accounts: registration, login, characters
//! - Campaigns: creation, membership, rooms
//! - Encounter: tokens, HP, conditions, initiative
//! - Chat: table talk and dice rolls

pub mod campaign;
pub mod chat;
pub mod encounter;
