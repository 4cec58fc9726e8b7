//! Mover - random walk for every live NPC, then proximity scan

use rand::Rng;
use skirmish_logic::FieldBounds;

use super::{FightEvent, FightQueue};
use crate::population::Population;

/// Give every live NPC one random step of up to its step radius per axis.
pub fn move_population(population: &Population, bounds: FieldBounds, rng: &mut impl Rng) {
    for npc in population.alive() {
        let step = npc.step();
        let dx = rng.gen_range(-step..=step);
        let dy = rng.gen_range(-step..=step);
        npc.move_by(dx, dy, bounds);
    }
}

/// Queue a fight for every ordered pair of live NPCs where the first one can
/// see the second. Both `(a, b)` and `(b, a)` may be queued.
///
/// Returns the number of events queued.
pub fn detect_fights(population: &Population, queue: &FightQueue) -> usize {
    let mut queued = 0;
    for attacker in population.handles() {
        for defender in population.handles() {
            if attacker == defender {
                continue;
            }
            let (Some(a), Some(d)) = (population.npc(attacker), population.npc(defender)) else {
                continue;
            };
            if a.is_alive() && d.is_alive() && a.is_close(d) {
                queue.push(FightEvent { attacker, defender });
                queued += 1;
            }
        }
    }
    queued
}

/// One mover tick: move everyone, then scan. Returns events queued.
pub fn mover_tick(
    population: &Population,
    queue: &FightQueue,
    bounds: FieldBounds,
    rng: &mut impl Rng,
) -> usize {
    move_population(population, bounds, rng);
    detect_fights(population, queue)
}
