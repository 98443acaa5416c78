//! Session Store
//!
//! In-memory registry of active sessions with a primary index by session id
//! and a secondary index by account id. Both indexes sit behind one
//! reader/writer lock, so every mutation is a single critical section and
//! lookups only contend with writers.

use super::{Session, SessionId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct Indexes {
    by_id: HashMap<SessionId, Session>,
    by_account: HashMap<String, HashSet<SessionId>>, // account_id -> session ids
}

/// Thread-safe registry of active sessions
#[derive(Debug, Default)]
pub struct SessionStore {
    indexes: RwLock<Indexes>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for `account_id` and register it in both indexes
    pub fn create(&self, account_id: &str) -> Session {
        let mut indexes = self.indexes.write();

        let mut id = SessionId::generate();
        while indexes.by_id.contains_key(&id) {
            id = SessionId::generate();
        }

        let session = Session::new(id, account_id.to_string());
        indexes.by_id.insert(id, session.clone());
        indexes
            .by_account
            .entry(account_id.to_string())
            .or_default()
            .insert(id);

        session
    }

    /// Look up a session by id
    pub fn find(&self, id: &SessionId) -> Option<Session> {
        self.indexes.read().by_id.get(id).cloned()
    }

    /// Remove a session; returns whether it existed
    pub fn remove(&self, id: &SessionId) -> bool {
        let mut indexes = self.indexes.write();

        let Some(session) = indexes.by_id.remove(id) else {
            return false;
        };

        if let Some(ids) = indexes.by_account.get_mut(session.account_id()) {
            ids.remove(id);
            if ids.is_empty() {
                indexes.by_account.remove(session.account_id());
            }
        }
        true
    }

    /// Remove every session belonging to `account_id`; returns how many went away
    pub fn remove_all_for_account(&self, account_id: &str) -> usize {
        let mut indexes = self.indexes.write();

        let Some(ids) = indexes.by_account.remove(account_id) else {
            return 0;
        };

        let mut removed = 0;
        for id in &ids {
            if indexes.by_id.remove(id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Snapshot of the sessions currently held by `account_id`
    pub fn sessions_for_account(&self, account_id: &str) -> Vec<Session> {
        let indexes = self.indexes.read();
        let mut sessions: Vec<Session> = indexes
            .by_account
            .get(account_id)
            .map(|ids| ids.iter().filter_map(|id| indexes.by_id.get(id).cloned()).collect())
            .unwrap_or_default();
        sessions.sort_by_key(|s| s.created_at());
        sessions
    }

    pub fn active_count(&self) -> usize {
        self.indexes.read().by_id.len()
    }

    /// Whether both indexes agree on membership.
    ///
    /// Every session must be listed under its own account, every listed id
    /// must resolve to a session of that account, and no account keeps an
    /// empty entry.
    pub fn is_consistent(&self) -> bool {
        let indexes = self.indexes.read();

        let forward = indexes.by_id.iter().all(|(id, session)| {
            session.id() == *id
                && indexes
                    .by_account
                    .get(session.account_id())
                    .is_some_and(|ids| ids.contains(id))
        });

        let backward = indexes.by_account.iter().all(|(account_id, ids)| {
            !ids.is_empty()
                && ids.iter().all(|id| {
                    indexes
                        .by_id
                        .get(id)
                        .is_some_and(|s| s.account_id() == account_id.as_str())
                })
        });

        let listed: usize = indexes.by_account.values().map(HashSet::len).sum();
        forward && backward && listed == indexes.by_id.len()
    }
}
