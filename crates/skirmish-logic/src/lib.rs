//! Pure combat rules for Skirmish.
//!
//! Everything in this crate is a plain function over plain data: which kinds
//! exist, who beats whom, how a step is clamped to the field, and how a
//! population is tallied. The threaded engine in `skirmish-core` and the
//! headless harness both build on these.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`kind`] | NPC kinds, serialized tags, step and detection radii |
//! | [`combat`] | Dominance table and power-roll comparison |
//! | [`movement`] | Field bounds, per-axis bounded steps, proximity |
//! | [`stats`] | Alive-per-kind and dead tallies |

pub mod combat;
pub mod kind;
pub mod movement;
pub mod stats;

pub use combat::{attack_lands, attacker_wins};
pub use kind::NpcKind;
pub use movement::{FieldBounds, Position};
pub use stats::PopulationCounts;
