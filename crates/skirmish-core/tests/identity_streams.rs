//! Fresh and loaded NPCs draw ids from separate counters.
//!
//! Kept in its own test binary so no other test advances the counters.

use std::sync::Arc;

use skirmish_core::persistence::RecordReader;
use skirmish_core::prelude::*;

#[test]
fn fresh_and_loaded_ids_collide() {
    let factory = NpcFactory::new(Arc::new(TextObserver::detached()));

    let fresh = factory.create(NpcKind::Orc, 1, 1);
    let mut reader = RecordReader::new("2 5 5\n".as_bytes());
    let loaded = factory.from_record(&mut reader).unwrap().unwrap();

    assert_eq!(fresh.origin(), IdOrigin::Fresh);
    assert_eq!(loaded.origin(), IdOrigin::Loaded);
    assert_eq!(fresh.id(), 1);
    assert_eq!(loaded.id(), 1);

    // Mixing both streams in one store: the second NPC with id 1 is refused.
    let mut population = Population::new();
    assert!(population.insert(fresh));
    assert!(!population.insert(loaded));
    assert_eq!(population.len(), 1);

    // Within a stream ids keep climbing.
    let next_fresh = factory.create(NpcKind::Druid, 0, 0);
    let next_loaded = factory
        .restore(skirmish_core::persistence::NpcRecord { tag: 0, x: 0, y: 0 })
        .unwrap();
    assert_eq!(next_fresh.id(), 2);
    assert_eq!(next_loaded.id(), 2);
}
