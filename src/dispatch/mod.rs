// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Named-topic publish/subscribe substrate.
//!
//! An [`EventBus`] keeps an ordered list of listeners per event name and
//! delivers a payload to every one of them. Each dispatch carries a shared
//! [`Continuation`]; whichever listener resumes it first decides the reply.

mod continuation;

pub use continuation::Continuation;

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};
use tracing::Instrument;

/// Something that reacts to a dispatched event.
#[async_trait]
pub trait Listener<P, R>: Send + Sync {
    async fn on_event(&self, payload: P, continuation: Continuation<R>);
}

type ListenerTable<P, R> = HashMap<String, Vec<(u64, Arc<dyn Listener<P, R>>)>>;

struct BusInner<P, R> {
    listeners: RwLock<ListenerTable<P, R>>,
    next_id: AtomicU64,
}

/// Multi-subscriber event bus. Cloning shares the same listener table.
pub struct EventBus<P, R> {
    inner: Arc<BusInner<P, R>>,
}

impl<P, R> Clone for EventBus<P, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, R> Default for EventBus<P, R>
where
    P: Clone + Send + 'static,
    R: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> EventBus<P, R>
where
    P: Clone + Send + 'static,
    R: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                listeners: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a listener for `event`. Listeners are polled in registration order.
    pub fn subscribe(&self, event: &str, listener: Arc<dyn Listener<P, R>>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(event.to_string())
            .or_default()
            .push((id, listener));

        let weak: Weak<BusInner<P, R>> = Arc::downgrade(&self.inner);
        let event_name = event.to_string();
        Subscription {
            event: event.to_string(),
            remove: Box::new(move || match weak.upgrade() {
                Some(inner) => remove_listener(&inner, &event_name, id),
                None => false,
            }),
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(event)
            .map_or(0, Vec::len)
    }

    /// Deliver `payload` to every listener currently registered for `event`.
    ///
    /// The listener set is snapshotted before delivery, so subscribing or
    /// unsubscribing afterwards does not affect this dispatch. All listeners of
    /// one dispatch are driven by a single tokio task that polls them in
    /// registration order, so a listener that resumes without suspending beats
    /// every listener registered after it. The task runs inside the caller's
    /// span. Returns the number of listeners invoked; when it is zero the
    /// continuation is dropped without being resumed.
    pub fn dispatch(&self, event: &str, payload: P, continuation: Continuation<R>) -> usize {
        let snapshot: Vec<Arc<dyn Listener<P, R>>> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(event)
            .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        let count = snapshot.len();
        if count == 0 {
            return 0;
        }

        let deliveries: Vec<_> = snapshot
            .into_iter()
            .map(|listener| {
                let payload = payload.clone();
                let continuation = continuation.clone();
                async move { listener.on_event(payload, continuation).await }
            })
            .collect();
        tokio::spawn(join_all(deliveries).in_current_span());

        count
    }
}

fn remove_listener<P, R>(inner: &BusInner<P, R>, event: &str, id: u64) -> bool {
    let mut table = inner
        .listeners
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let Some(entries) = table.get_mut(event) else {
        return false;
    };
    let before = entries.len();
    entries.retain(|(entry_id, _)| *entry_id != id);
    let removed = entries.len() != before;
    if entries.is_empty() {
        table.remove(event);
    }
    removed
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping it leaves the listener registered; call [`Subscription::unsubscribe`]
/// to remove it.
pub struct Subscription {
    event: String,
    remove: Box<dyn FnOnce() -> bool + Send + Sync>,
}

impl Subscription {
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Remove the listener. Returns false if it was already gone.
    pub fn unsubscribe(self) -> bool {
        (self.remove)()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        tag: &'static str,
        seen: Arc<Mutex<Vec<(&'static str, u32)>>>,
    }

    #[async_trait]
    impl Listener<u32, u32> for Recorder {
        async fn on_event(&self, payload: u32, continuation: Continuation<u32>) {
            self.seen.lock().unwrap().push((self.tag, payload));
            continuation.resume(payload * 10);
        }
    }

    fn recorder(tag: &'static str, seen: &Arc<Mutex<Vec<(&'static str, u32)>>>) -> Arc<dyn Listener<u32, u32>> {
        Arc::new(Recorder {
            tag,
            seen: Arc::clone(seen),
        })
    }

    #[tokio::test]
    async fn dispatch_reaches_every_listener() {
        let bus: EventBus<u32, u32> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _a = bus.subscribe("tick", recorder("a", &seen));
        let _b = bus.subscribe("tick", recorder("b", &seen));

        let (continuation, reply) = Continuation::channel();
        assert_eq!(bus.dispatch("tick", 4, continuation), 2);
        assert_eq!(reply.await.unwrap(), 40);

        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec![("a", 4), ("b", 4)]);
    }

    struct Immediate(u32);

    #[async_trait]
    impl Listener<u32, u32> for Immediate {
        async fn on_event(&self, _payload: u32, continuation: Continuation<u32>) {
            continuation.resume(self.0);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn earlier_listener_resumes_first() {
        let bus: EventBus<u32, u32> = EventBus::new();
        let _first = bus.subscribe("tick", Arc::new(Immediate(1)));
        let _second = bus.subscribe("tick", Arc::new(Immediate(2)));

        for _ in 0..200 {
            let (continuation, reply) = Continuation::channel();
            bus.dispatch("tick", 0, continuation);
            assert_eq!(reply.await.unwrap(), 1);
        }
    }

    struct SpanName(Arc<Mutex<Option<String>>>);

    #[async_trait]
    impl Listener<u32, u32> for SpanName {
        async fn on_event(&self, payload: u32, continuation: Continuation<u32>) {
            let current = tracing::Span::current();
            *self.0.lock().unwrap() = current.metadata().map(|m| m.name().to_string());
            continuation.resume(payload);
        }
    }

    #[tokio::test]
    async fn listeners_run_inside_the_dispatching_span() {
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry());
        let bus: EventBus<u32, u32> = EventBus::new();
        let seen = Arc::new(Mutex::new(None));
        let _sub = bus.subscribe("tick", Arc::new(SpanName(Arc::clone(&seen))));

        let (continuation, reply) = Continuation::channel();
        tracing::info_span!("consume").in_scope(|| bus.dispatch("tick", 1, continuation));
        assert_eq!(reply.await.unwrap(), 1);
        assert_eq!(seen.lock().unwrap().as_deref(), Some("consume"));
    }

    #[tokio::test]
    async fn dispatch_without_listeners_is_a_no_op() {
        let bus: EventBus<u32, u32> = EventBus::new();
        let (continuation, reply) = Continuation::channel();
        assert_eq!(bus.dispatch("nobody", 1, continuation), 0);
        assert!(reply.await.is_err());
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let bus: EventBus<u32, u32> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let a = bus.subscribe("tick", recorder("a", &seen));
        let _b = bus.subscribe("tick", recorder("b", &seen));
        assert_eq!(bus.listener_count("tick"), 2);

        assert_eq!(a.event(), "tick");
        assert!(a.unsubscribe());
        assert_eq!(bus.listener_count("tick"), 1);
    }

    #[test]
    fn dropping_subscription_keeps_listener() {
        let bus: EventBus<u32, u32> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        drop(bus.subscribe("tick", recorder("a", &seen)));
        assert_eq!(bus.listener_count("tick"), 1);
    }

    #[test]
    fn unsubscribe_after_bus_dropped_reports_false() {
        let bus: EventBus<u32, u32> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sub = bus.subscribe("tick", recorder("a", &seen));
        drop(bus);
        assert!(!sub.unsubscribe());
    }
}
