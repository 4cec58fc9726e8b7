//! Save/Load functionality for population snapshots
//!
//! Two formats are supported:
//! - a line-oriented text format (`<count>` then `<tag> <x> <y>` per NPC),
//!   which is the durable interchange format;
//! - a compact bincode format carrying the same records plus a version.
//!
//! Only kinds and positions are persisted. Identity, liveness and observers
//! are assigned afresh on load.

use std::collections::VecDeque;
use std::io::{BufRead, Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{RecordError, SnapshotError};
use crate::generation::NpcFactory;
use crate::population::Population;

/// Version number for the binary snapshot format (increment when it changes)
const SNAPSHOT_VERSION: u32 = 1;

/// One persisted NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcRecord {
    pub tag: i64,
    pub x: i32,
    pub y: i32,
}

/// Serializable binary snapshot
#[derive(Serialize, Deserialize)]
pub struct SnapshotData {
    /// Save format version
    pub version: u32,
    pub records: Vec<NpcRecord>,
}

/// Whitespace-separated token reader over a text snapshot.
///
/// Records may span lines; only token order matters.
pub struct RecordReader<R> {
    inner: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
        }
    }

    fn fill(&mut self) -> std::io::Result<bool> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.inner.read_line(&mut line)? == 0 {
                return Ok(false);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(true)
    }

    pub fn next_token(&mut self) -> std::io::Result<Option<String>> {
        if !self.fill()? {
            return Ok(None);
        }
        Ok(self.pending.pop_front())
    }

    fn peek_token(&mut self) -> std::io::Result<Option<&str>> {
        if !self.fill()? {
            return Ok(None);
        }
        Ok(self.pending.front().map(String::as_str))
    }

    /// True once every token has been consumed.
    pub fn is_exhausted(&mut self) -> std::io::Result<bool> {
        Ok(!self.fill()?)
    }

    /// Read a required coordinate.
    pub fn read_coordinate(&mut self, field: &'static str) -> Result<i32, RecordError> {
        let token = self
            .next_token()?
            .ok_or_else(|| RecordError::missing(field))?;
        token
            .parse::<i32>()
            .map_err(|_| RecordError::malformed(field, &token))
    }

    /// Drop up to `max` integer tokens that follow an unusable tag, so the
    /// next record starts on its own tag.
    pub fn skip_integers(&mut self, max: usize) -> std::io::Result<()> {
        for _ in 0..max {
            let is_int = matches!(self.peek_token()?, Some(t) if t.parse::<i64>().is_ok());
            if !is_int {
                break;
            }
            self.pending.pop_front();
        }
        Ok(())
    }

    fn read_count(&mut self) -> Result<u64, RecordError> {
        let token = self
            .next_token()?
            .ok_or_else(|| RecordError::missing("count"))?;
        token
            .parse::<u64>()
            .map_err(|_| RecordError::malformed("count", &token))
    }
}

/// Write the population as a text snapshot, in iteration order.
pub fn save_text<W: Write>(population: &Population, mut writer: W) -> Result<(), SnapshotError> {
    writeln!(writer, "{}", population.len())?;
    for npc in population.iter() {
        npc.save(&mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load a text snapshot.
///
/// Records with unknown kinds are dropped, so the result may be smaller than
/// the stored count. A truncated or malformed record fails the whole load.
pub fn load_text<R: BufRead>(reader: R, factory: &NpcFactory) -> Result<Population, SnapshotError> {
    let mut records = RecordReader::new(reader);
    let count = records.read_count()?;

    let mut population = Population::new();
    for _ in 0..count {
        if records.is_exhausted()? {
            log::warn!(
                "Snapshot declares {} NPCs but ends after {} were read",
                count,
                population.len()
            );
            break;
        }
        if let Some(npc) = factory.from_record(&mut records)? {
            population.insert(npc);
        }
    }

    log::info!("Loaded {} of {} NPC records", population.len(), count);
    Ok(population)
}

/// Save the population in the binary format.
pub fn save_binary<W: Write>(population: &Population, writer: W) -> Result<(), SnapshotError> {
    let data = SnapshotData {
        version: SNAPSHOT_VERSION,
        records: population.iter().map(|npc| npc.record()).collect(),
    };
    bincode::serialize_into(writer, &data)?;
    Ok(())
}

/// Load a binary snapshot. Unknown kinds are dropped as in [`load_text`].
pub fn load_binary<R: Read>(reader: R, factory: &NpcFactory) -> Result<Population, SnapshotError> {
    let data: SnapshotData = bincode::deserialize_from(reader)?;

    if data.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: data.version,
        });
    }

    let mut population = Population::new();
    for record in &data.records {
        if let Some(npc) = factory.restore(*record) {
            population.insert(npc);
        }
    }
    log::info!(
        "Loaded {} of {} NPC records (binary)",
        population.len(),
        data.records.len()
    );
    Ok(population)
}
