//! NPC factory

use std::io::BufRead;
use std::sync::Arc;

use skirmish_logic::{NpcKind, Position};

use crate::error::RecordError;
use crate::npc::Npc;
use crate::observer::FightObserver;
use crate::persistence::{NpcRecord, RecordReader};

/// Builds NPCs and subscribes each one to the shared default observer.
pub struct NpcFactory {
    default_observer: Arc<dyn FightObserver>,
}

impl NpcFactory {
    pub fn new(default_observer: Arc<dyn FightObserver>) -> Self {
        Self { default_observer }
    }

    pub fn default_observer(&self) -> &Arc<dyn FightObserver> {
        &self.default_observer
    }

    /// Fresh NPC of `kind` at `(x, y)`.
    pub fn create(&self, kind: NpcKind, x: i32, y: i32) -> Arc<Npc> {
        self.attach(Npc::new(kind, x, y))
    }

    /// Like [`NpcFactory::create`], for a raw tag. Unknown tags yield `None`.
    pub fn create_from_tag(&self, tag: i64, x: i32, y: i32) -> Option<Arc<Npc>> {
        NpcKind::from_tag(tag).map(|kind| self.create(kind, x, y))
    }

    /// Read one `<tag> <x> <y>` record.
    ///
    /// A missing or unknown tag is not an error: it is logged and `None` is
    /// returned. Once a known tag is read, missing coordinates are.
    pub fn from_record<R: BufRead>(
        &self,
        reader: &mut RecordReader<R>,
    ) -> Result<Option<Arc<Npc>>, RecordError> {
        let Some(token) = reader.next_token()? else {
            log::warn!("Unexpected NPC type: end of input");
            return Ok(None);
        };
        let Ok(tag) = token.parse::<i64>() else {
            log::warn!("Unexpected NPC type: {:?}", token);
            return Ok(None);
        };
        let Some(kind) = NpcKind::from_tag(tag) else {
            log::warn!("Unknown NPC kind tag {}, skipping record", tag);
            reader.skip_integers(2)?;
            return Ok(None);
        };
        let npc = Npc::from_record(kind, reader)?;
        Ok(Some(self.attach(npc)))
    }

    /// Rebuild an NPC from a decoded binary record.
    pub fn restore(&self, record: NpcRecord) -> Option<Arc<Npc>> {
        let Some(kind) = NpcKind::from_tag(record.tag) else {
            log::warn!("Unknown NPC kind tag {}, skipping record", record.tag);
            return None;
        };
        Some(self.attach(Npc::restore(kind, Position::new(record.x, record.y))))
    }

    fn attach(&self, npc: Npc) -> Arc<Npc> {
        npc.subscribe(Arc::clone(&self.default_observer));
        Arc::new(npc)
    }
}
