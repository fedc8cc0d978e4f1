//! Monotonic id allocation for users, rooms, and messages.

use std::sync::atomic::{AtomicU64, Ordering};

use parlor_proto::{MessageId, RoomId, UserId};

/// Hands out ids from three independent counters, one per entity type.
///
/// Counters start at zero and never repeat or skip under concurrent
/// allocation. Ids are allocated only after a request has passed validation,
/// so a rejected operation consumes nothing.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next_user: AtomicU64,
    next_room: AtomicU64,
    next_message: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_user(&self) -> UserId {
        UserId(self.next_user.fetch_add(1, Ordering::Relaxed))
    }

    pub fn next_room(&self) -> RoomId {
        RoomId(self.next_room.fetch_add(1, Ordering::Relaxed))
    }

    pub fn next_message(&self) -> MessageId {
        MessageId(self.next_message.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_counters_start_at_zero() {
        let ids = IdAllocator::new();
        assert_eq!(ids.next_user(), UserId(0));
        assert_eq!(ids.next_room(), RoomId(0));
        assert_eq!(ids.next_message(), MessageId(0));
    }

    #[test]
    fn test_counters_are_independent() {
        let ids = IdAllocator::new();
        ids.next_user();
        ids.next_user();
        ids.next_message();
        assert_eq!(ids.next_user(), UserId(2));
        assert_eq!(ids.next_room(), RoomId(0));
        assert_eq!(ids.next_message(), MessageId(1));
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let ids = Arc::new(IdAllocator::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let ids = Arc::clone(&ids);
            handles.push(std::thread::spawn(move || {
                (0..100).map(|_| ids.next_room()).collect::<Vec<_>>()
            }));
        }
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate room id {id}");
            }
        }
        assert_eq!(seen.len(), 800);
    }
}
