//! Simulation engine - main entry point for running a skirmish
//!
//! A run goes `Idle → Generating → Running → Draining → Stopped`. While
//! running, a mover thread walks the population and queues fights and a
//! fighter thread resolves them; the calling thread keeps time and hands the
//! population to an optional frame callback once per tick.

use std::io::{BufRead, Read, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skirmish_logic::{FieldBounds, NpcKind, PopulationCounts};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::generation::{generate_population, NpcFactory};
use crate::npc::Npc;
use crate::observer::{FightObserver, TextObserver};
use crate::persistence;
use crate::population::Population;
use crate::systems::{fighter_step, mover_tick, FightOutcome, FightQueue};

/// Longest single sleep an actor takes before rechecking the stop flag.
const STOP_POLL: Duration = Duration::from_millis(10);

/// Lifecycle of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Nothing generated or loaded yet.
    Idle,
    /// A population has been generated or loaded and is ready to run.
    Generating,
    /// Mover and fighter are active.
    Running,
    /// Stop requested; actors are finishing their current unit of work.
    Draining,
    /// Terminal.
    Stopped,
}

/// Summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub ticks: u64,
    pub events_queued: u64,
    pub stale_events: u64,
    pub missed: u64,
    pub fights_resolved: u64,
    pub kills: u64,
    /// Events still queued when the fighter stopped.
    pub events_unprocessed: u64,
    pub before: PopulationCounts,
    pub after: PopulationCounts,
}

#[derive(Default)]
struct RunCounters {
    ticks: AtomicU64,
    events_queued: AtomicU64,
    stale_events: AtomicU64,
    missed: AtomicU64,
    fights_resolved: AtomicU64,
    kills: AtomicU64,
}

impl RunCounters {
    fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}

/// Everything a run needs, passed explicitly instead of through globals.
pub struct Simulation {
    config: SimConfig,
    factory: NpcFactory,
    population: Population,
    queue: FightQueue,
    phase: SimPhase,
    rng: StdRng,
}

impl Simulation {
    /// Create an idle simulation with an explicit default observer and RNG.
    pub fn new(
        config: SimConfig,
        default_observer: Arc<dyn FightObserver>,
        rng: StdRng,
    ) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            config,
            factory: NpcFactory::new(default_observer),
            population: Population::new(),
            queue: FightQueue::new(),
            phase: SimPhase::Idle,
            rng,
        })
    }

    /// Create a simulation that logs kills to `config.log_path` and seeds its
    /// RNG from `config.rng_seed` (or entropy when unset).
    pub fn from_config(config: SimConfig) -> Result<Self, SimError> {
        let observer = Arc::new(TextObserver::open(&config.log_path));
        Self::with_observer(config, observer)
    }

    /// Like [`Simulation::from_config`] but with a caller-supplied observer.
    pub fn with_observer(
        config: SimConfig,
        default_observer: Arc<dyn FightObserver>,
    ) -> Result<Self, SimError> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, default_observer, rng)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn factory(&self) -> &NpcFactory {
        &self.factory
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Alive NPCs per kind and the number of dead.
    pub fn counts(&self) -> PopulationCounts {
        self.population.counts()
    }

    fn require(&self, action: &'static str, allowed: &[SimPhase]) -> Result<(), SimError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SimError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }

    /// Replace the population with `config.population` random NPCs.
    pub fn generate(&mut self) -> Result<(), SimError> {
        self.require("generate", &[SimPhase::Idle, SimPhase::Generating])?;
        self.phase = SimPhase::Generating;
        self.population = generate_population(
            &self.factory,
            self.config.population,
            self.config.bounds(),
            &mut self.rng,
        );
        log::info!(
            "Generated {} NPCs on a {}x{} field",
            self.population.len(),
            self.config.field_width,
            self.config.field_height
        );
        Ok(())
    }

    /// Add a single NPC to the population.
    pub fn spawn(&mut self, kind: NpcKind, x: i32, y: i32) -> Result<Arc<Npc>, SimError> {
        self.require("spawn", &[SimPhase::Idle, SimPhase::Generating])?;
        self.phase = SimPhase::Generating;
        let npc = self.factory.create(kind, x, y);
        self.population.insert(Arc::clone(&npc));
        Ok(npc)
    }

    /// Write the current population as a text snapshot.
    pub fn save_snapshot<W: Write>(&self, writer: W) -> Result<(), SimError> {
        persistence::save_text(&self.population, writer)?;
        log::info!("Saved snapshot of {} NPCs", self.population.len());
        Ok(())
    }

    /// Replace the population with a text snapshot.
    pub fn load_snapshot<R: BufRead>(&mut self, reader: R) -> Result<usize, SimError> {
        self.require("load a snapshot", &[SimPhase::Idle, SimPhase::Generating])?;
        self.population = persistence::load_text(reader, &self.factory)?;
        self.phase = SimPhase::Generating;
        Ok(self.population.len())
    }

    pub fn save_binary<W: Write>(&self, writer: W) -> Result<(), SimError> {
        persistence::save_binary(&self.population, writer)?;
        Ok(())
    }

    pub fn load_binary<R: Read>(&mut self, reader: R) -> Result<usize, SimError> {
        self.require("load a snapshot", &[SimPhase::Idle, SimPhase::Generating])?;
        self.population = persistence::load_binary(reader, &self.factory)?;
        self.phase = SimPhase::Generating;
        Ok(self.population.len())
    }

    /// Run for the configured duration without a frame callback.
    pub fn run(&mut self) -> Result<RunReport, SimError> {
        self.run_with(|_| {})
    }

    /// Run for the configured duration, calling `on_frame` once per tick.
    ///
    /// Returns once both actors have been joined. The simulation is
    /// `Stopped` afterwards, whatever the result.
    pub fn run_with<F>(&mut self, mut on_frame: F) -> Result<RunReport, SimError>
    where
        F: FnMut(&Population),
    {
        self.require("run", &[SimPhase::Idle, SimPhase::Generating])?;

        let before = self.population.counts();
        let budget = self.config.duration();
        let tick = self.config.tick_interval();
        let bounds = self.config.bounds();
        let power_die = self.config.power_die;
        let mut mover_rng = StdRng::seed_from_u64(self.rng.gen());
        let mut fighter_rng = StdRng::seed_from_u64(self.rng.gen());

        let stop = AtomicBool::new(false);
        let counters = RunCounters::default();
        let population = &self.population;
        let queue = &self.queue;
        let phase = &mut self.phase;

        *phase = SimPhase::Running;
        log::info!(
            "Running {} NPCs for {:.1}s (tick {}ms)",
            population.len(),
            budget.as_secs_f64(),
            tick.as_millis()
        );

        let joined = thread::scope(|scope| -> Result<(), SimError> {
            let mover = thread::Builder::new()
                .name("mover".into())
                .spawn_scoped(scope, || {
                    run_mover(population, queue, bounds, tick, &stop, &counters, &mut mover_rng)
                })
                .map_err(|source| SimError::Spawn {
                    actor: "mover",
                    source,
                })?;

            let fighter = match thread::Builder::new()
                .name("fighter".into())
                .spawn_scoped(scope, || {
                    run_fighter(population, queue, power_die, &stop, &counters, &mut fighter_rng)
                }) {
                Ok(handle) => handle,
                Err(source) => {
                    stop.store(true, Ordering::Release);
                    return Err(SimError::Spawn {
                        actor: "fighter",
                        source,
                    });
                }
            };

            let started = Instant::now();
            while started.elapsed() < budget {
                on_frame(population);
                let remaining = budget.saturating_sub(started.elapsed());
                thread::sleep(tick.min(remaining));
            }

            *phase = SimPhase::Draining;
            log::info!("Time budget spent, draining actors");
            stop.store(true, Ordering::Release);

            let mover_ok = mover.join().is_ok();
            let fighter_ok = fighter.join().is_ok();
            if !mover_ok {
                return Err(SimError::ActorPanicked("mover"));
            }
            if !fighter_ok {
                return Err(SimError::ActorPanicked("fighter"));
            }
            Ok(())
        });

        self.phase = SimPhase::Stopped;
        let events_unprocessed = self.queue.clear() as u64;
        joined?;

        let report = RunReport {
            ticks: RunCounters::get(&counters.ticks),
            events_queued: RunCounters::get(&counters.events_queued),
            stale_events: RunCounters::get(&counters.stale_events),
            missed: RunCounters::get(&counters.missed),
            fights_resolved: RunCounters::get(&counters.fights_resolved),
            kills: RunCounters::get(&counters.kills),
            events_unprocessed,
            before,
            after: self.population.counts(),
        };
        log::info!(
            "Stopped after {} ticks: {} fights resolved, {} kills, {} alive",
            report.ticks,
            report.fights_resolved,
            report.kills,
            report.after.alive()
        );
        Ok(report)
    }
}

fn run_mover(
    population: &Population,
    queue: &FightQueue,
    bounds: FieldBounds,
    tick: Duration,
    stop: &AtomicBool,
    counters: &RunCounters,
    rng: &mut StdRng,
) {
    while !stop.load(Ordering::Acquire) {
        let queued = mover_tick(population, queue, bounds, rng);
        RunCounters::bump(&counters.ticks, 1);
        RunCounters::bump(&counters.events_queued, queued as u64);
        sleep_unless_stopped(tick, stop);
    }
}

fn run_fighter(
    population: &Population,
    queue: &FightQueue,
    power_die: u32,
    stop: &AtomicBool,
    counters: &RunCounters,
    rng: &mut StdRng,
) {
    while !stop.load(Ordering::Acquire) {
        match fighter_step(population, queue, power_die, rng) {
            FightOutcome::Idle => thread::yield_now(),
            FightOutcome::Stale => RunCounters::bump(&counters.stale_events, 1),
            FightOutcome::Missed => RunCounters::bump(&counters.missed, 1),
            FightOutcome::Survived => RunCounters::bump(&counters.fights_resolved, 1),
            FightOutcome::Killed => {
                RunCounters::bump(&counters.fights_resolved, 1);
                RunCounters::bump(&counters.kills, 1);
            }
        }
    }
}

fn sleep_unless_stopped(total: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + total;
    loop {
        if stop.load(Ordering::Acquire) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(STOP_POLL));
    }
}
