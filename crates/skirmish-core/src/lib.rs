//! Skirmish Core - threaded NPC combat simulation
//!
//! A population of Druids, Orcs and Slavers wanders a bounded field. When one
//! NPC comes within detection range of another a fight is queued; a second
//! thread resolves queued fights with dice and a fixed dominance table, and
//! every resolved fight is reported to the defender's observers.
//!
//! # Architecture
//!
//! - **NPCs**: shared between threads; only liveness and position mutate
//! - **Population**: append-only store keyed by id, addressed by handle
//! - **Systems**: the mover and fighter actors and the queue between them
//! - **Engine**: owns config, RNG, factory, queue and population for one run
//!
//! Rules themselves (table, movement clamp, tallies) live in `skirmish-logic`.
//!
//! # Example
//!
//! ```rust,no_run
//! use skirmish_core::prelude::*;
//!
//! let mut sim = Simulation::from_config(SimConfig::default()).unwrap();
//! sim.generate().unwrap();
//! let report = sim.run().unwrap();
//! println!("{} kills", report.kills);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod npc;
pub mod observer;
pub mod persistence;
pub mod population;
pub mod systems;

pub use skirmish_logic::{FieldBounds, NpcKind, PopulationCounts, Position};

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::engine::{RunReport, SimPhase, Simulation};
    pub use crate::error::{ObserverError, RecordError, SimError, SnapshotError};
    pub use crate::generation::NpcFactory;
    pub use crate::npc::{IdOrigin, Npc};
    pub use crate::observer::{FightObserver, TextObserver};
    pub use crate::population::{NpcHandle, Population};
    pub use skirmish_logic::{FieldBounds, NpcKind, PopulationCounts, Position};
}
