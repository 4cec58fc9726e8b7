//! Dominance rules: who beats whom, and whether an attack lands at all.
//!
//! Combat is decided in two stages. First both sides roll power; only a
//! strictly higher attacker roll gets to the dominance table. The table
//! itself is fixed per kind pair and ignores rolls entirely:
//!
//! | Attacker \ Defender | Druid | Orc | Slaver |
//! |---|---|---|---|
//! | Druid  | lose | lose | lose |
//! | Orc    | win  | win  | win  |
//! | Slaver | win  | lose | lose |

use crate::kind::NpcKind;

/// Default power die: rolls are uniform on `1..=6`.
pub const DEFAULT_POWER_DIE: u32 = 6;

/// Whether `attacker` defeats `defender` according to the dominance table.
pub fn attacker_wins(attacker: NpcKind, defender: NpcKind) -> bool {
    use NpcKind::*;
    match (attacker, defender) {
        (Druid, Druid) | (Druid, Orc) | (Druid, Slaver) => false,
        (Orc, Druid) | (Orc, Orc) | (Orc, Slaver) => true,
        (Slaver, Druid) => true,
        (Slaver, Orc) | (Slaver, Slaver) => false,
    }
}

/// An attack only reaches the dominance table on a strictly higher roll.
pub fn attack_lands(attacker_roll: u32, defender_roll: u32) -> bool {
    attacker_roll > defender_roll
}
