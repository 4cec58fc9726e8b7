//! Generation - construction of NPCs and starting populations

mod factory;
mod population;

pub use factory::*;
pub use population::*;
