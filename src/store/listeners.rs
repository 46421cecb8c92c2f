//! Listener registry and subscription handles.

use super::{Changes, FetchState};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

pub(crate) type Listener<P, T> = Arc<dyn Fn(&FetchState<P, T>, Changes) + Send + Sync>;

struct Entry<P, T> {
    fields: Changes,
    listener: Listener<P, T>,
}

/// Registered listeners for one store, keyed by registration order.
pub(crate) struct Listeners<P, T> {
    next_id: u64,
    entries: BTreeMap<u64, Entry<P, T>>,
}

impl<P, T> Listeners<P, T>
where
    P: Send + 'static,
    T: Send + Sync + 'static,
{
    pub(crate) fn new() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }))
    }

    pub(crate) fn insert(
        registry: &Arc<Mutex<Self>>,
        fields: Changes,
        listener: Listener<P, T>,
    ) -> Subscription {
        let id = {
            let mut this = lock(registry);
            let id = this.next_id;
            this.next_id += 1;
            this.entries.insert(id, Entry { fields, listener });
            id
        };

        let weak: Weak<Mutex<Self>> = Arc::downgrade(registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    lock(&registry).entries.remove(&id);
                }
            })),
        }
    }

    /// Listeners interested in at least one of `changes`, in registration order.
    pub(crate) fn matching(registry: &Arc<Mutex<Self>>, changes: Changes) -> Vec<Listener<P, T>> {
        lock(registry)
            .entries
            .values()
            .filter(|e| e.fields.intersects(changes))
            .map(|e| e.listener.clone())
            .collect()
    }

    pub(crate) fn len(registry: &Arc<Mutex<Self>>) -> usize {
        lock(registry).entries.len()
    }
}

fn lock<L>(registry: &Mutex<L>) -> MutexGuard<'_, L> {
    registry.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("Listener registry mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Handle returned by `subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
