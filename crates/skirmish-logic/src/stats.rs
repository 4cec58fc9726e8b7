//! Population tallies used for before/after statistics.

use crate::kind::NpcKind;
use serde::{Deserialize, Serialize};

/// Alive NPCs per kind, plus everything that has died.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub druids: usize,
    pub orcs: usize,
    pub slavers: usize,
    pub dead: usize,
}

impl PopulationCounts {
    /// Tally `(kind, alive)` pairs.
    pub fn tally<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (NpcKind, bool)>,
    {
        let mut counts = Self::default();
        for (kind, alive) in entries {
            counts.record(kind, alive);
        }
        counts
    }

    pub fn record(&mut self, kind: NpcKind, alive: bool) {
        if !alive {
            self.dead += 1;
            return;
        }
        match kind {
            NpcKind::Druid => self.druids += 1,
            NpcKind::Orc => self.orcs += 1,
            NpcKind::Slaver => self.slavers += 1,
        }
    }

    pub fn alive(&self) -> usize {
        self.druids + self.orcs + self.slavers
    }

    pub fn total(&self) -> usize {
        self.alive() + self.dead
    }

    pub fn of_kind(&self, kind: NpcKind) -> usize {
        match kind {
            NpcKind::Druid => self.druids,
            NpcKind::Orc => self.orcs,
            NpcKind::Slaver => self.slavers,
        }
    }
}
