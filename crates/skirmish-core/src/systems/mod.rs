//! Systems - the two actors of a run and the queue between them

mod queue;
mod mover;
mod fighter;

pub use queue::*;
pub use mover::*;
pub use fighter::*;
