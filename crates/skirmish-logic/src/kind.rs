//! NPC kinds and the per-kind constants that drive movement and detection.
//!
//! Tags are the integers written to snapshots; they must never be renumbered.

use serde::{Deserialize, Serialize};

/// The closed set of NPC kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcKind {
    Slaver,
    Orc,
    Druid,
}

impl NpcKind {
    /// All kinds, in tag order.
    pub const ALL: [NpcKind; 3] = [NpcKind::Slaver, NpcKind::Orc, NpcKind::Druid];

    /// Snapshot tag for this kind.
    pub fn tag(self) -> i64 {
        match self {
            NpcKind::Slaver => 0,
            NpcKind::Orc => 1,
            NpcKind::Druid => 2,
        }
    }

    /// Inverse of [`NpcKind::tag`]. Unknown tags yield `None`.
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(NpcKind::Slaver),
            1 => Some(NpcKind::Orc),
            2 => Some(NpcKind::Druid),
            _ => None,
        }
    }

    /// Maximum displacement per axis per tick.
    pub fn step(self) -> i32 {
        match self {
            NpcKind::Slaver => 10,
            NpcKind::Orc => 20,
            NpcKind::Druid => 10,
        }
    }

    /// Radius within which this kind notices another NPC.
    pub fn detection_radius(self) -> i32 {
        match self {
            NpcKind::Slaver | NpcKind::Orc | NpcKind::Druid => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NpcKind::Slaver => "Slaver",
            NpcKind::Orc => "Orc",
            NpcKind::Druid => "Druid",
        }
    }

    /// Single-character map glyph.
    pub fn glyph(self) -> char {
        match self {
            NpcKind::Slaver => 'S',
            NpcKind::Orc => 'O',
            NpcKind::Druid => 'D',
        }
    }
}

impl std::fmt::Display for NpcKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
