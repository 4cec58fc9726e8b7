//! NPCs - the agents that roam the field and fight.
//!
//! An `Npc` is shared between the mover and fighter threads, so the two
//! fields that change during a run carry their own synchronization:
//! liveness is an atomic flag, position is a mutex-guarded pair. Everything
//! else is fixed at construction.

use std::fmt;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use skirmish_logic::movement::{apply_step, within_radius};
use skirmish_logic::{attacker_wins, FieldBounds, NpcKind, Position};

use crate::error::RecordError;
use crate::observer::FightObserver;
use crate::persistence::{NpcRecord, RecordReader};

static NEXT_FRESH_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_LOADED_ID: AtomicU32 = AtomicU32::new(1);

/// Which identity stream produced an NPC.
///
/// The two streams count independently, so a fresh NPC and a loaded NPC can
/// share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdOrigin {
    /// Built from attributes.
    Fresh,
    /// Reconstructed from a snapshot record.
    Loaded,
}

impl IdOrigin {
    fn next_id(self) -> u32 {
        let counter = match self {
            IdOrigin::Fresh => &NEXT_FRESH_ID,
            IdOrigin::Loaded => &NEXT_LOADED_ID,
        };
        counter.fetch_add(1, Ordering::Relaxed)
    }
}

pub struct Npc {
    id: u32,
    kind: NpcKind,
    origin: IdOrigin,
    position: Mutex<Position>,
    alive: AtomicBool,
    observers: RwLock<Vec<Arc<dyn FightObserver>>>,
}

impl Npc {
    /// Create a fresh NPC at `(x, y)`. No observers are attached.
    pub fn new(kind: NpcKind, x: i32, y: i32) -> Self {
        Self::with_origin(kind, Position::new(x, y), IdOrigin::Fresh)
    }

    /// Read `x y` for an NPC of `kind` whose tag has already been consumed.
    pub fn from_record<R: BufRead>(
        kind: NpcKind,
        reader: &mut RecordReader<R>,
    ) -> Result<Self, RecordError> {
        let x = reader.read_coordinate("x")?;
        let y = reader.read_coordinate("y")?;
        Ok(Self::restore(kind, Position::new(x, y)))
    }

    /// Rebuild an NPC from already-decoded record fields.
    pub(crate) fn restore(kind: NpcKind, position: Position) -> Self {
        Self::with_origin(kind, position, IdOrigin::Loaded)
    }

    fn with_origin(kind: NpcKind, position: Position, origin: IdOrigin) -> Self {
        Self {
            id: origin.next_id(),
            kind,
            origin,
            position: Mutex::new(position),
            alive: AtomicBool::new(true),
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> NpcKind {
        self.kind
    }

    pub fn origin(&self) -> IdOrigin {
        self.origin
    }

    pub fn position(&self) -> Position {
        *self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn step(&self) -> i32 {
        self.kind.step()
    }

    pub fn detection_radius(&self) -> i32 {
        self.kind.detection_radius()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Mark this NPC dead. There is no way back.
    pub fn must_die(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Shift by `(dx, dy)`; each axis is applied only if it stays on the field.
    pub fn move_by(&self, dx: i32, dy: i32, bounds: FieldBounds) {
        let mut pos = self.position.lock().unwrap_or_else(PoisonError::into_inner);
        *pos = apply_step(*pos, dx, dy, bounds);
    }

    /// Whether `other` is inside *this* NPC's detection radius.
    pub fn is_close(&self, other: &Npc) -> bool {
        within_radius(self.position(), other.position(), self.detection_radius())
    }

    /// Resolve `attacker` striking this NPC.
    ///
    /// Returns whether the attacker prevails and notifies this NPC's observers
    /// exactly once either way. Liveness is left to the caller.
    pub fn fight(&self, attacker: &Npc) -> bool {
        let win = attacker_wins(attacker.kind, self.kind);
        self.notify(attacker, win);
        win
    }

    pub fn subscribe(&self, observer: Arc<dyn FightObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver a fight outcome to every subscriber, in subscription order.
    /// A failing observer is logged and skipped.
    pub fn notify(&self, attacker: &Npc, win: bool) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            if let Err(e) = observer.on_fight(attacker, self, win) {
                log::error!(
                    "Fight observer failed for {} vs {}: {}",
                    attacker,
                    self,
                    e
                );
            }
        }
    }

    /// Write the durable `<tag> <x> <y>` record.
    pub fn save<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let pos = self.position();
        writeln!(writer, "{} {} {}", self.kind.tag(), pos.x, pos.y)
    }

    pub fn record(&self) -> NpcRecord {
        let pos = self.position();
        NpcRecord {
            tag: self.kind.tag(),
            x: pos.x,
            y: pos.y,
        }
    }
}

impl fmt::Display for Npc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.position();
        write!(f, "{}[{}] {{ x: {}, y: {} }}", self.kind, self.id, pos.x, pos.y)
    }
}

impl fmt::Debug for Npc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Npc")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("origin", &self.origin)
            .field("position", &self.position())
            .field("alive", &self.is_alive())
            .field("observers", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObserverError;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(u32, u32, bool)>>,
    }

    impl FightObserver for Recorder {
        fn on_fight(&self, attacker: &Npc, defender: &Npc, win: bool) -> Result<(), ObserverError> {
            self.seen.lock().unwrap().push((attacker.id(), defender.id(), win));
            Ok(())
        }
    }

    struct Broken;

    impl FightObserver for Broken {
        fn on_fight(&self, _: &Npc, _: &Npc, _: bool) -> Result<(), ObserverError> {
            Err(ObserverError::Sink(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let ids: Vec<u32> = (0..100).map(|_| Npc::new(NpcKind::Orc, 0, 0).id()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_origin_is_recorded() {
        assert_eq!(Npc::new(NpcKind::Orc, 0, 0).origin(), IdOrigin::Fresh);
        assert_eq!(
            Npc::restore(NpcKind::Orc, Position::new(0, 0)).origin(),
            IdOrigin::Loaded
        );
    }

    #[test]
    fn test_move_respects_field() {
        let npc = Npc::new(NpcKind::Orc, 95, 5);
        let bounds = FieldBounds::new(100, 100);
        npc.move_by(10, -3, bounds);
        assert_eq!(npc.position(), Position::new(95, 2));
        npc.move_by(-20, -3, bounds);
        assert_eq!(npc.position(), Position::new(75, 2));
    }

    #[test]
    fn test_is_close_is_asymmetric_in_radius() {
        let a = Npc::new(NpcKind::Slaver, 0, 0);
        let b = Npc::new(NpcKind::Orc, 6, 8);
        let c = Npc::new(NpcKind::Orc, 11, 0);
        assert!(a.is_close(&b));
        assert!(b.is_close(&a));
        assert!(!a.is_close(&c));
    }

    #[test]
    fn test_must_die_is_idempotent() {
        let npc = Npc::new(NpcKind::Druid, 1, 1);
        assert!(npc.is_alive());
        npc.must_die();
        npc.must_die();
        assert!(!npc.is_alive());
    }

    #[test]
    fn test_fight_notifies_defender_observers_once() {
        let attacker = Npc::new(NpcKind::Orc, 0, 0);
        let defender = Npc::new(NpcKind::Druid, 1, 1);
        let attacker_log = Arc::new(Recorder::default());
        let defender_log = Arc::new(Recorder::default());
        attacker.subscribe(attacker_log.clone());
        defender.subscribe(defender_log.clone());

        assert!(defender.fight(&attacker));
        assert!(!attacker.fight(&defender));

        let seen = defender_log.seen.lock().unwrap();
        assert_eq!(*seen, vec![(attacker.id(), defender.id(), true)]);
        let seen = attacker_log.seen.lock().unwrap();
        assert_eq!(*seen, vec![(defender.id(), attacker.id(), false)]);
    }

    #[test]
    fn test_fight_does_not_kill() {
        let attacker = Npc::new(NpcKind::Orc, 0, 0);
        let defender = Npc::new(NpcKind::Slaver, 0, 0);
        assert!(defender.fight(&attacker));
        assert!(defender.is_alive());
    }

    #[test]
    fn test_duplicate_subscriptions_fire_twice() {
        let attacker = Npc::new(NpcKind::Slaver, 0, 0);
        let defender = Npc::new(NpcKind::Druid, 0, 0);
        let log = Arc::new(Recorder::default());
        defender.subscribe(log.clone());
        defender.subscribe(log.clone());
        assert_eq!(defender.observer_count(), 2);
        defender.fight(&attacker);
        assert_eq!(log.seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_broken_observer_does_not_stop_the_rest() {
        let attacker = Npc::new(NpcKind::Orc, 0, 0);
        let defender = Npc::new(NpcKind::Orc, 0, 0);
        let log = Arc::new(Recorder::default());
        defender.subscribe(Arc::new(Broken));
        defender.subscribe(log.clone());
        assert!(defender.fight(&attacker));
        assert_eq!(log.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_save_writes_single_line_record() {
        let npc = Npc::new(NpcKind::Druid, 12, 34);
        let mut out = Vec::new();
        npc.save(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 12 34\n");
    }

    #[test]
    fn test_display_shows_kind_id_and_position() {
        let npc = Npc::new(NpcKind::Slaver, 3, 4);
        assert_eq!(npc.to_string(), format!("Slaver[{}] {{ x: 3, y: 4 }}", npc.id()));
    }
}
