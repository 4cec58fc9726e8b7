//! Fighter - adjudicates queued fight events

use rand::Rng;
use skirmish_logic::attack_lands;

use super::{FightEvent, FightQueue};
use crate::population::Population;

/// What happened to one dequeued event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightOutcome {
    /// Nothing was queued.
    Idle,
    /// One side was already dead (or unknown); the event was dropped.
    Stale,
    /// The attacker did not out-roll the defender.
    Missed,
    /// The fight was resolved in the defender's favour.
    Survived,
    /// The fight was resolved against the defender, who is now dead.
    Killed,
}

/// Roll a power die with `sides` faces.
pub fn roll_power(rng: &mut impl Rng, sides: u32) -> u32 {
    rng.gen_range(1..=sides.max(1))
}

/// Resolve one event against the current state of the population.
pub fn adjudicate(
    population: &Population,
    event: FightEvent,
    power_die: u32,
    rng: &mut impl Rng,
) -> FightOutcome {
    let (Some(attacker), Some(defender)) =
        (population.npc(event.attacker), population.npc(event.defender))
    else {
        return FightOutcome::Stale;
    };
    if !attacker.is_alive() || !defender.is_alive() {
        return FightOutcome::Stale;
    }

    let attack = roll_power(rng, power_die);
    let defence = roll_power(rng, power_die);
    if !attack_lands(attack, defence) {
        return FightOutcome::Missed;
    }

    if defender.fight(attacker) {
        defender.must_die();
        log::debug!("{} killed {}", attacker, defender);
        FightOutcome::Killed
    } else {
        FightOutcome::Survived
    }
}

/// Take one event off the queue and resolve it.
pub fn fighter_step(
    population: &Population,
    queue: &FightQueue,
    power_die: u32,
    rng: &mut impl Rng,
) -> FightOutcome {
    match queue.pop() {
        Some(event) => adjudicate(population, event, power_die, rng),
        None => FightOutcome::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObserverError;
    use crate::npc::Npc;
    use crate::observer::FightObserver;
    use crate::population::NpcHandle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use skirmish_logic::NpcKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Tally(AtomicUsize);

    impl FightObserver for Tally {
        fn on_fight(&self, _: &Npc, _: &Npc, _: bool) -> Result<(), ObserverError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn pair(attacker: NpcKind, defender: NpcKind, tally: &Arc<Tally>) -> Population {
        let mut population = Population::new();
        for kind in [attacker, defender] {
            let npc = Npc::new(kind, 0, 0);
            npc.subscribe(tally.clone());
            population.insert(Arc::new(npc));
        }
        population
    }

    const FORWARD: FightEvent = FightEvent {
        attacker: NpcHandle(0),
        defender: NpcHandle(1),
    };

    #[test]
    fn test_empty_queue_is_idle() {
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = fighter_step(&Population::new(), &FightQueue::new(), 6, &mut rng);
        assert_eq!(outcome, FightOutcome::Idle);
    }

    #[test]
    fn test_one_sided_die_never_lands() {
        // Both roll 1, and a tie never reaches the table.
        let tally = Arc::new(Tally::default());
        let population = pair(NpcKind::Orc, NpcKind::Druid, &tally);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            assert_eq!(adjudicate(&population, FORWARD, 1, &mut rng), FightOutcome::Missed);
        }
        assert_eq!(tally.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_orc_eventually_kills_druid() {
        let tally = Arc::new(Tally::default());
        let population = pair(NpcKind::Orc, NpcKind::Druid, &tally);
        let mut rng = StdRng::seed_from_u64(3);
        let mut outcome = FightOutcome::Missed;
        for _ in 0..200 {
            outcome = adjudicate(&population, FORWARD, 6, &mut rng);
            if outcome != FightOutcome::Missed {
                break;
            }
        }
        assert_eq!(outcome, FightOutcome::Killed);
        assert!(!population.npc(NpcHandle(1)).unwrap().is_alive());
        assert!(population.npc(NpcHandle(0)).unwrap().is_alive());
        assert_eq!(tally.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_druid_never_kills() {
        let tally = Arc::new(Tally::default());
        let population = pair(NpcKind::Druid, NpcKind::Orc, &tally);
        let mut rng = StdRng::seed_from_u64(4);
        let mut survived = 0;
        for _ in 0..200 {
            match adjudicate(&population, FORWARD, 6, &mut rng) {
                FightOutcome::Survived => survived += 1,
                FightOutcome::Missed => {}
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(survived > 0);
        assert!(population.iter().all(|n| n.is_alive()));
        // Every resolved fight notified, misses did not.
        assert_eq!(tally.0.load(Ordering::SeqCst), survived);
    }

    #[test]
    fn test_events_against_the_dead_are_stale() {
        let tally = Arc::new(Tally::default());
        let population = pair(NpcKind::Orc, NpcKind::Slaver, &tally);
        population.npc(NpcHandle(1)).unwrap().must_die();

        let queue = FightQueue::new();
        queue.push(FORWARD);
        queue.push(FightEvent { attacker: NpcHandle(1), defender: NpcHandle(0) });
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(fighter_step(&population, &queue, 6, &mut rng), FightOutcome::Stale);
        assert_eq!(fighter_step(&population, &queue, 6, &mut rng), FightOutcome::Stale);
        assert_eq!(tally.0.load(Ordering::SeqCst), 0);
        assert!(!population.npc(NpcHandle(1)).unwrap().is_alive());
    }

    #[test]
    fn test_unknown_handle_is_stale() {
        let tally = Arc::new(Tally::default());
        let population = pair(NpcKind::Orc, NpcKind::Slaver, &tally);
        let event = FightEvent { attacker: NpcHandle(0), defender: NpcHandle(9) };
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(adjudicate(&population, event, 6, &mut rng), FightOutcome::Stale);
    }

    #[test]
    fn test_rolls_cover_die() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut seen = [false; 6];
        for _ in 0..500 {
            let r = roll_power(&mut rng, 6);
            assert!((1..=6).contains(&r));
            seen[(r - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
