//! Catalog of bundled alert cues.
//!
//! A cue plays on start, stop, and completion; which one is a preference.
//! Playback itself is an external collaborator -- the catalog only names
//! the bundled files.

use serde::Serialize;

/// One selectable alert cue.
#[derive(Debug, Clone, Serialize)]
pub struct AlertSound {
    pub id: &'static str,
    pub name: &'static str,
}

const CATALOG: &[AlertSound] = &[
    AlertSound {
        id: "bell_burma",
        name: "Burmese Bell",
    },
    AlertSound {
        id: "bell_burma_three",
        name: "Burmese Bell (triple)",
    },
    AlertSound {
        id: "bell_indian",
        name: "Indian Bell",
    },
    AlertSound {
        id: "bell_meditation",
        name: "Meditation Bell",
    },
    AlertSound {
        id: "bell_singing",
        name: "Singing Bell",
    },
    AlertSound {
        id: "bowl_singing",
        name: "Singing Bowl",
    },
    AlertSound {
        id: "bowl_singing_big",
        name: "Singing Bowl (deep)",
    },
    AlertSound {
        id: "gong_bodhi",
        name: "Bodhi Gong",
    },
    AlertSound {
        id: "gong_generated",
        name: "Synthesized Gong",
    },
    AlertSound {
        id: "gong_watts",
        name: "Watts Gong",
    },
];

impl AlertSound {
    pub fn all() -> &'static [AlertSound] {
        CATALOG
    }

    pub fn default_id() -> &'static str {
        "bowl_singing"
    }

    pub fn by_id(id: &str) -> Option<&'static AlertSound> {
        CATALOG.iter().find(|s| s.id == id)
    }

    /// Look up a cue, falling back to the default for unknown ids.
    pub fn resolve(id: &str) -> &'static AlertSound {
        Self::by_id(id).unwrap_or_else(|| {
            Self::by_id(Self::default_id()).unwrap_or(&CATALOG[0])
        })
    }
}
