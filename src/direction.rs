//! In-memory store of each user's selected translation direction.

use crate::language::Direction;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// Opaque chat user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// User → direction mapping shared across concurrently handled updates.
///
/// Entries live for the lifetime of the process; nothing is persisted.
#[derive(Default)]
pub struct DirectionStore {
    entries: RwLock<HashMap<UserId, Direction>>,
}

impl DirectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any previous selection for `user`.
    pub fn set(&self, user: UserId, direction: Direction) {
        // A poisoned lock still holds a consistent map: writers only insert.
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(user, direction);
    }

    pub fn get(&self, user: UserId) -> Option<Direction> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&user).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{Language, DIRECTIONS};
    use std::sync::Arc;

    #[test]
    fn absent_until_set_then_overwritten() {
        let store = DirectionStore::new();
        let user = UserId(42);
        assert_eq!(store.get(user), None);

        store.set(user, DIRECTIONS[0]);
        assert_eq!(store.get(user), Some(DIRECTIONS[0]));

        let en_ru = Direction::new(Language::En, Language::Ru);
        store.set(user, en_ru);
        assert_eq!(store.get(user), Some(en_ru));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_writers_do_not_lose_entries() {
        let store = Arc::new(DirectionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        store.set(UserId(i * 1000 + j), DIRECTIONS[(j % 6) as usize]);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 800);
        assert_eq!(store.get(UserId(7005)), Some(DIRECTIONS[5]));
    }
}
