//! Fight event queue shared by the mover (producer) and fighter (consumer).

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::population::NpcHandle;

/// A candidate fight: `attacker` noticed `defender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FightEvent {
    pub attacker: NpcHandle,
    pub defender: NpcHandle,
}

/// Unbounded FIFO behind a single lock.
#[derive(Debug, Default)]
pub struct FightQueue {
    events: Mutex<VecDeque<FightEvent>>,
}

impl FightQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: FightEvent) {
        self.lock().push_back(event);
    }

    pub fn pop(&self) -> Option<FightEvent> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop everything still queued; returns how many events were discarded.
    pub fn clear(&self) -> usize {
        let mut events = self.lock();
        let dropped = events.len();
        events.clear();
        dropped
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<FightEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn event(a: usize, d: usize) -> FightEvent {
        FightEvent {
            attacker: NpcHandle(a),
            defender: NpcHandle(d),
        }
    }

    #[test]
    fn test_fifo_order() {
        let queue = FightQueue::new();
        queue.push(event(0, 1));
        queue.push(event(1, 0));
        queue.push(event(2, 3));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(event(0, 1)));
        assert_eq!(queue.pop(), Some(event(1, 0)));
        assert_eq!(queue.pop(), Some(event(2, 3)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_concurrent_producer_consumer() {
        let queue = Arc::new(FightQueue::new());
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..1000 {
                    queue.push(event(i, i + 1));
                }
            })
        };

        let mut received = Vec::new();
        while received.len() < 1000 {
            if let Some(e) = queue.pop() {
                received.push(e.attacker.0);
            } else {
                thread::yield_now();
            }
        }
        producer.join().unwrap();

        // Single producer: consumption order is production order.
        assert_eq!(received, (0..1000).collect::<Vec<_>>());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_reports_dropped() {
        let queue = FightQueue::new();
        queue.push(event(0, 1));
        queue.push(event(0, 2));
        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }
}
