//! Condition catalog
//!
//! Static reference data for token status conditions (poisoned, prone,
//! stunned, ...). Entries are bundled with the server and looked up by id;
//! an unknown id resolves to `None` and callers skip it.

use serde::Serialize;

/// A catalog entry describing one status condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Condition {
    /// Stable identifier used in token condition sets
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Rules summary shown in tooltips
    pub description: &'static str,
    /// Display color (hex)
    pub color: &'static str,
}

/// The built-in condition catalog
pub const CONDITIONS: &[Condition] = &[
    Condition {
        id: "blinded",
        name: "Blinded",
        description: "Can't see; attack rolls against have advantage, own attacks have disadvantage.",
        color: "#6b7280",
    },
    Condition {
        id: "charmed",
        name: "Charmed",
        description: "Can't attack the charmer or target them with harmful effects.",
        color: "#ec4899",
    },
    Condition {
        id: "deafened",
        name: "Deafened",
        description: "Can't hear; automatically fails hearing-based checks.",
        color: "#a8a29e",
    },
    Condition {
        id: "frightened",
        name: "Frightened",
        description: "Disadvantage while the source of fear is in sight; can't willingly approach it.",
        color: "#7c3aed",
    },
    Condition {
        id: "grappled",
        name: "Grappled",
        description: "Speed is 0 and can't benefit from bonuses to speed.",
        color: "#b45309",
    },
    Condition {
        id: "incapacitated",
        name: "Incapacitated",
        description: "Can't take actions or reactions.",
        color: "#f59e0b",
    },
    Condition {
        id: "invisible",
        name: "Invisible",
        description: "Impossible to see without special senses; attacks against have disadvantage.",
        color: "#93c5fd",
    },
    Condition {
        id: "paralyzed",
        name: "Paralyzed",
        description: "Incapacitated, can't move or speak; melee hits within 5 ft are criticals.",
        color: "#dc2626",
    },
    Condition {
        id: "petrified",
        name: "Petrified",
        description: "Transformed to stone; incapacitated and resistant to all damage.",
        color: "#78716c",
    },
    Condition {
        id: "poisoned",
        name: "Poisoned",
        description: "Disadvantage on attack rolls and ability checks.",
        color: "#16a34a",
    },
    Condition {
        id: "prone",
        name: "Prone",
        description: "Can only crawl; melee attacks against have advantage, ranged have disadvantage.",
        color: "#ca8a04",
    },
    Condition {
        id: "restrained",
        name: "Restrained",
        description: "Speed 0; attacks against have advantage, own attacks have disadvantage.",
        color: "#9a3412",
    },
    Condition {
        id: "stunned",
        name: "Stunned",
        description: "Incapacitated, can't move; attack rolls against have advantage.",
        color: "#eab308",
    },
    Condition {
        id: "unconscious",
        name: "Unconscious",
        description: "Incapacitated, prone, unaware; melee hits within 5 ft are criticals.",
        color: "#1e3a8a",
    },
    Condition {
        id: "concentrating",
        name: "Concentrating",
        description: "Maintaining a spell; taking damage forces a save to keep it.",
        color: "#0ea5e9",
    },
];

/// Look up a condition by id
pub fn condition_by_id(id: &str) -> Option<&'static Condition> {
    CONDITIONS.iter().find(|c| c.id == id)
}

/// Whether an id names a known condition
pub fn is_known_condition(id: &str) -> bool {
    condition_by_id(id).is_some()
}
