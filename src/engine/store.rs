// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::model::DeclaredChain;

/// Declared chains keyed by id, shared by every clone of an engine.
///
/// All access goes through one mutex; `take` performs lookup and removal as a
/// single critical section, which is what makes consumption at-most-once.
#[derive(Debug, Clone, Default)]
pub struct ChainStore {
    chains: Arc<Mutex<HashMap<String, DeclaredChain>>>,
}

impl ChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, DeclaredChain>> {
        self.chains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a chain under its id. Returns true if an earlier declaration was replaced.
    pub fn insert(&self, chain: DeclaredChain) -> bool {
        self.lock().insert(chain.id.clone(), chain).is_some()
    }

    /// Remove and return a chain.
    pub fn take(&self, id: &str) -> Option<DeclaredChain> {
        self.lock().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Copy of every declared chain.
    pub fn snapshot(&self) -> HashMap<String, DeclaredChain> {
        self.lock().clone()
    }

    /// Remove one chain, or all of them when `id` is `None`. Returns how many were removed.
    pub fn clear(&self, id: Option<&str>) -> usize {
        let mut chains = self.lock();
        match id {
            Some(id) => usize::from(chains.remove(id).is_some()),
            None => {
                let removed = chains.len();
                chains.clear();
                removed
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Context;
    use chrono::Utc;

    fn chain(id: &str) -> DeclaredChain {
        DeclaredChain {
            id: id.to_string(),
            steps: vec![],
            created_at: Utc::now(),
            metadata: Context::new(),
        }
    }

    #[test]
    fn take_removes_exactly_once() {
        let store = ChainStore::new();
        store.insert(chain("a"));

        assert!(store.contains("a"));
        assert!(store.take("a").is_some());
        assert!(store.take("a").is_none());
        assert!(!store.contains("a"));
    }

    #[test]
    fn insert_reports_replacement() {
        let store = ChainStore::new();
        assert!(!store.insert(chain("a")));
        assert!(store.insert(chain("a")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshot_is_detached() {
        let store = ChainStore::new();
        store.insert(chain("a"));

        let mut snapshot = store.snapshot();
        snapshot.remove("a");
        snapshot.insert("b".into(), chain("b"));

        assert!(store.contains("a"));
        assert!(!store.contains("b"));
    }

    #[test]
    fn clear_one_or_all() {
        let store = ChainStore::new();
        store.insert(chain("a"));
        store.insert(chain("b"));
        store.insert(chain("c"));

        assert_eq!(store.clear(Some("missing")), 0);
        assert_eq!(store.clear(Some("a")), 1);
        assert_eq!(store.clear(None), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn clones_share_state() {
        let store = ChainStore::new();
        let other = store.clone();
        store.insert(chain("a"));
        assert!(other.take("a").is_some());
        assert!(store.is_empty());
    }
}
