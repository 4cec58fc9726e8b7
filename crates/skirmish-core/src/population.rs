//! The population store: every NPC of a run, keyed by id.
//!
//! Membership only grows. Dead NPCs stay in place so handles taken before a
//! death remain valid; the alive subset is always derived on demand.

use std::collections::HashMap;
use std::sync::Arc;

use skirmish_logic::PopulationCounts;

use crate::npc::Npc;

/// Stable index of an NPC inside a [`Population`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NpcHandle(pub usize);

#[derive(Debug, Default)]
pub struct Population {
    npcs: Vec<Arc<Npc>>,
    by_id: HashMap<u32, usize>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `npc`, keeping insertion order. An NPC whose id is already taken
    /// is rejected and `false` is returned.
    pub fn insert(&mut self, npc: Arc<Npc>) -> bool {
        if let Some(&existing) = self.by_id.get(&npc.id()) {
            log::warn!(
                "NPC id {} already taken by {}; rejecting {}",
                npc.id(),
                self.npcs[existing],
                npc
            );
            return false;
        }
        self.by_id.insert(npc.id(), self.npcs.len());
        self.npcs.push(npc);
        true
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Npc>> {
        self.npcs.iter()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Arc<Npc>> {
        self.npcs.iter().filter(|npc| npc.is_alive())
    }

    pub fn handles(&self) -> impl Iterator<Item = NpcHandle> {
        (0..self.npcs.len()).map(NpcHandle)
    }

    pub fn npc(&self, handle: NpcHandle) -> Option<&Arc<Npc>> {
        self.npcs.get(handle.0)
    }

    pub fn get(&self, id: u32) -> Option<&Arc<Npc>> {
        self.by_id.get(&id).map(|&index| &self.npcs[index])
    }

    pub fn handle_of(&self, id: u32) -> Option<NpcHandle> {
        self.by_id.get(&id).copied().map(NpcHandle)
    }

    /// Alive NPCs per kind and the number of dead.
    pub fn counts(&self) -> PopulationCounts {
        PopulationCounts::tally(self.npcs.iter().map(|npc| (npc.kind(), npc.is_alive())))
    }
}
