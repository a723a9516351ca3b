//! In-memory session store correlating a generate call with later refines.
//!
//! Backed by a moka cache so entries expire (time-to-live since the last
//! write) and the total number of sessions stays bounded. Every
//! read-modify-write goes through `and_compute_with`, which serializes
//! updates per key: concurrent refines on one session never lose a
//! version bump.

use moka::ops::compute::{CompResult, Op};
use moka::sync::Cache;
use std::time::Duration;
use tracing::debug;

use crate::config::SessionConfig;

/// The artifact a session currently points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub code: String,
    /// Starts at 1 on generate, +1 per successful refine
    pub version: u32,
    pub original_prompt: String,
}

#[derive(Clone)]
pub struct SessionStore {
    entries: Cache<String, SessionEntry>,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_limits(Duration::from_secs(config.ttl_secs), config.max_entries)
    }

    pub fn with_limits(ttl: Duration, max_entries: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Start (or restart) a session at version 1.
    pub fn start(&self, session_id: &str, code: String, original_prompt: String) -> SessionEntry {
        let entry = SessionEntry {
            code,
            version: 1,
            original_prompt,
        };
        self.entries.insert(session_id.to_string(), entry.clone());
        debug!("Session {} started", session_id);
        entry
    }

    /// Replace the code of a known session and bump its version.
    /// Unknown (or expired) sessions are left alone and `None` is returned.
    pub fn record_refinement(&self, session_id: &str, code: String) -> Option<SessionEntry> {
        let result = self
            .entries
            .entry(session_id.to_string())
            .and_compute_with(|existing| match existing {
                Some(existing) => {
                    let mut entry = existing.into_value();
                    entry.code = code;
                    entry.version += 1;
                    Op::Put(entry)
                }
                None => Op::Nop,
            });

        match result {
            CompResult::ReplacedWith(entry) => {
                let entry = entry.into_value();
                debug!("Session {} now at version {}", session_id, entry.version);
                Some(entry)
            }
            _ => {
                debug!("Refinement for unknown session {}", session_id);
                None
            }
        }
    }

    pub fn get(&self, session_id: &str) -> Option<SessionEntry> {
        self.entries.get(session_id)
    }

    /// Drop every session; called on shutdown.
    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }

    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store() -> SessionStore {
        SessionStore::new(&SessionConfig::default())
    }

    #[test]
    fn test_start_then_refine_bumps_version() {
        let store = store();
        store.start("s1", "<p>v1</p>".into(), "dashboard".into());

        let entry = store.record_refinement("s1", "<p>v2</p>".into()).unwrap();
        assert_eq!(entry.version, 2);
        assert_eq!(entry.code, "<p>v2</p>");
        assert_eq!(entry.original_prompt, "dashboard");

        store.record_refinement("s1", "<p>v3</p>".into());
        assert_eq!(store.get("s1").unwrap().version, 3);
    }

    #[test]
    fn test_refine_unknown_session_creates_nothing() {
        let store = store();
        assert!(store.record_refinement("ghost", "<p>x</p>".into()).is_none());
        assert!(store.get("ghost").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_start_resets_existing_session() {
        let store = store();
        store.start("s1", "a".into(), "first".into());
        store.record_refinement("s1", "b".into());
        let entry = store.start("s1", "c".into(), "second".into());
        assert_eq!(entry.version, 1);
        assert_eq!(store.get("s1").unwrap().original_prompt, "second");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_entries_expire() {
        let store = SessionStore::with_limits(Duration::from_millis(50), 100);
        store.start("s1", "a".into(), "p".into());
        std::thread::sleep(Duration::from_millis(120));
        assert!(store.get("s1").is_none());
        assert!(store.record_refinement("s1", "b".into()).is_none());
    }

    #[test]
    fn test_concurrent_refinements_never_lose_updates() {
        let store = Arc::new(store());
        store.start("shared", "v1".into(), "p".into());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.record_refinement("shared", format!("t{t}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("shared").unwrap().version, 1 + 8 * 25);
    }

    #[test]
    fn test_clear_drops_everything() {
        let store = store();
        store.start("a", "x".into(), "p".into());
        store.start("b", "y".into(), "p".into());
        store.clear();
        assert!(store.get("a").is_none());
        assert!(store.is_empty());
    }
}
