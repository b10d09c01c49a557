// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Broadcasts named state blobs to interested listeners.
//!
//! A sibling of the chain engine: applications can publish context (a filter
//! selection, the row a user is looking at) that other components, or an
//! agent, want to observe. The chain engine does not use it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use uuid::Uuid;

use crate::observability::messages::{broadcast::ContextChanged, StructuredLog};

/// One published piece of context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextEntry {
    pub id: String,
    pub data: Value,
    pub keep_alive: bool,
    pub updated_at: DateTime<Utc>,
}

type ChangeCallback = Arc<dyn Fn(&[ContextEntry]) + Send + Sync>;

#[derive(Default)]
struct BroadcastState {
    entries: Vec<ContextEntry>,
    subscribers: Vec<(u64, ChangeCallback)>,
}

/// Holds context entries and notifies subscribers whenever they change.
///
/// Subscribers receive the full list of entries after every change. Entries
/// added with `keep_alive = false` are part of exactly one notification and
/// are dropped afterwards; `keep_alive = true` entries stay until removed.
#[derive(Clone, Default)]
pub struct ContextBroadcaster {
    state: Arc<Mutex<BroadcastState>>,
    next_subscriber: Arc<AtomicU64>,
}

impl ContextBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BroadcastState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Publish new context and return its id.
    pub fn add_context(&self, data: Value, keep_alive: bool) -> String {
        let id = Uuid::new_v4().to_string();
        {
            let mut state = self.lock();
            state.entries.push(ContextEntry {
                id: id.clone(),
                data,
                keep_alive,
                updated_at: Utc::now(),
            });
        }
        self.notify("added", &id);
        id
    }

    /// Replace the data of an existing entry. Returns `None` if `id` is unknown.
    ///
    /// `keep_alive` is left as it was when `None`.
    pub fn update_context(&self, id: &str, data: Value, keep_alive: Option<bool>) -> Option<String> {
        {
            let mut state = self.lock();
            let entry = state.entries.iter_mut().find(|e| e.id == id)?;
            entry.data = data;
            entry.updated_at = Utc::now();
            if let Some(keep_alive) = keep_alive {
                entry.keep_alive = keep_alive;
            }
        }
        self.notify("updated", id);
        Some(id.to_string())
    }

    /// Remove an entry. Returns false if it did not exist.
    pub fn remove_context(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.lock();
            let before = state.entries.len();
            state.entries.retain(|e| e.id != id);
            state.entries.len() != before
        };
        if removed {
            self.notify("removed", id);
        }
        removed
    }

    /// Current entries.
    pub fn contexts(&self) -> Vec<ContextEntry> {
        self.lock().entries.clone()
    }

    /// Call `callback` with the full entry list after every change.
    pub fn on_context_change<F>(&self, callback: F) -> ContextSubscription
    where
        F: Fn(&[ContextEntry]) + Send + Sync + 'static,
    {
        let id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let callback: ChangeCallback = Arc::new(callback);
        self.lock().subscribers.push((id, callback));
        ContextSubscription {
            id,
            state: Arc::downgrade(&self.state),
        }
    }

    fn notify(&self, action: &str, context_id: &str) {
        // Callbacks run outside the lock so they may call back into the broadcaster.
        let (entries, subscribers) = {
            let mut state = self.lock();
            let entries = state.entries.clone();
            state.entries.retain(|e| e.keep_alive);
            let subscribers: Vec<ChangeCallback> =
                state.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect();
            (entries, subscribers)
        };

        ContextChanged {
            action,
            context_id,
            entry_count: entries.len(),
            subscriber_count: subscribers.len(),
        }
        .log();

        for callback in subscribers {
            callback(&entries);
        }
    }
}

/// Handle returned by [`ContextBroadcaster::on_context_change`].
pub struct ContextSubscription {
    id: u64,
    state: Weak<Mutex<BroadcastState>>,
}

impl ContextSubscription {
    /// Stop receiving notifications. Returns false if already unsubscribed.
    pub fn unsubscribe(self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = state.subscribers.len();
        state.subscribers.retain(|(id, _)| *id != self.id);
        state.subscribers.len() != before
    }
}
