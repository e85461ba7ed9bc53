use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::core::{FieldErrors, InputProfile, RawRecord, validate};

/// A stored record together with the outcome of validating it again on read.
#[derive(Debug, Clone)]
pub struct Recalled {
    pub record: RawRecord,
    pub profile: Result<InputProfile, FieldErrors>,
}

/// Sessions kept before the least recently used one is evicted.
pub const DEFAULT_SESSION_CAPACITY: usize = 1_024;

#[derive(Debug)]
struct Entry {
    record: RawRecord,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    entries: HashMap<String, Entry>,
    clock: u64,
}

impl Sessions {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(session, _)| session.clone());
        if let Some(session) = oldest {
            self.entries.remove(&session);
        }
    }
}

/// Last accepted raw record per session, kept verbatim. Stored records are
/// treated as untrusted and re-validated every time they are recalled.
/// Holds at most `capacity` sessions; the least recently used one goes first.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<Sessions>,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SESSION_CAPACITY)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stores `record` only if it validates.
    pub fn remember(&self, session: &str, record: RawRecord) -> Result<InputProfile, FieldErrors> {
        let profile = validate(&record)?;
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if !sessions.entries.contains_key(session) && sessions.entries.len() >= self.capacity {
            sessions.evict_least_recent();
        }
        let last_used = sessions.tick();
        sessions
            .entries
            .insert(session.to_string(), Entry { record, last_used });
        Ok(profile)
    }

    pub fn recall(&self, session: &str) -> Option<Recalled> {
        let record = {
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            let last_used = sessions.tick();
            let entry = sessions.entries.get_mut(session)?;
            entry.last_used = last_used;
            entry.record.clone()
        };
        let profile = validate(&record);
        Some(Recalled { record, profile })
    }

    pub fn forget(&self, session: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .remove(session)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
