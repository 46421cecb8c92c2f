//! Observable fetch-state stores.
//!
//! One [`Store`] per resource owns that resource's request parameters and
//! fetch lifecycle (`loading` / `error` / `data`). Every store exposes the same
//! three-part interface:
//!
//! - [`Store::state`] — snapshot of the current [`FetchState`]
//! - [`Store::subscribe`] / [`Store::subscribe_fields`] — synchronous listeners
//!   called after each state transition
//! - [`Store::refresh`] — run the resource's fetch against the current
//!   parameters
//!
//! The store is the only place fetch errors are caught; they are kept as a
//! display string in `FetchState::error` and never returned to callers.
//!
//! Resource-specific behaviour (which upstream call, fetch-once policy) lives
//! in a [`Resource`] implementation in the matching `domain/<name>/state.rs`.

mod listeners;

pub use listeners::Subscription;

use crate::error::ExplorerError;
use crate::source::MarketDataSource;
use async_trait::async_trait;
use listeners::{Listener, Listeners};
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};

// ─── FetchState ──────────────────────────────────────────────────────────────

/// Lifecycle of one remotely-fetched resource.
///
/// Invariant: `loading` and `error.is_some()` are never both true.
#[derive(Debug)]
pub struct FetchState<P, T> {
    pub parameters: P,
    pub data: Option<Arc<T>>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped every time `data` is written. Drives memoized projections.
    pub data_version: u64,
    /// Parameters the current `data` was fetched with.
    pub fetched_with: Option<P>,
}

impl<P, T> FetchState<P, T> {
    pub fn new(parameters: P) -> Self {
        Self {
            parameters,
            data: None,
            loading: false,
            error: None,
            data_version: 0,
            fetched_with: None,
        }
    }
}

impl<P: PartialEq, T> FetchState<P, T> {
    /// True when data is present but was fetched for different parameters
    /// than the current ones (e.g. a page change whose refresh was dropped
    /// because another request was in flight).
    pub fn is_stale(&self) -> bool {
        match &self.fetched_with {
            Some(fetched) => self.data.is_some() && *fetched != self.parameters,
            None => false,
        }
    }
}

impl<P: Clone, T> Clone for FetchState<P, T> {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
            data_version: self.data_version,
            fetched_with: self.fetched_with.clone(),
        }
    }
}

// ─── Changes ─────────────────────────────────────────────────────────────────

/// Which `FetchState` fields a transition touched.
///
/// Also used as a subscription mask: a listener registered with
/// [`Store::subscribe_fields`] only runs when the transition touched one of
/// its fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub parameters: bool,
    pub data: bool,
    pub loading: bool,
    pub error: bool,
}

impl Changes {
    pub const ALL: Changes = Changes {
        parameters: true,
        data: true,
        loading: true,
        error: true,
    };

    pub const PARAMETERS: Changes = Changes {
        parameters: true,
        data: false,
        loading: false,
        error: false,
    };

    pub const DATA: Changes = Changes {
        parameters: false,
        data: true,
        loading: false,
        error: false,
    };

    pub const LOADING: Changes = Changes {
        parameters: false,
        data: false,
        loading: true,
        error: false,
    };

    pub const ERROR: Changes = Changes {
        parameters: false,
        data: false,
        loading: false,
        error: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.parameters || self.data || self.loading || self.error)
    }

    pub fn intersects(&self, other: Changes) -> bool {
        (self.parameters && other.parameters)
            || (self.data && other.data)
            || (self.loading && other.loading)
            || (self.error && other.error)
    }

    pub fn union(self, other: Changes) -> Changes {
        Changes {
            parameters: self.parameters || other.parameters,
            data: self.data || other.data,
            loading: self.loading || other.loading,
            error: self.error || other.error,
        }
    }
}

impl std::ops::BitOr for Changes {
    type Output = Changes;

    fn bitor(self, rhs: Changes) -> Changes {
        self.union(rhs)
    }
}

// ─── Resource ────────────────────────────────────────────────────────────────

/// One logical unit of remote data: its parameter type, its data type, and
/// the upstream call that produces the data.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Params: Clone + PartialEq + Debug + Send + Sync + 'static;
    type Data: Send + Sync + 'static;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// When true, `refresh` is a no-op once data has been populated.
    fn fetch_once(&self) -> bool {
        false
    }

    async fn fetch(
        &self,
        source: &dyn MarketDataSource,
        params: &Self::Params,
    ) -> Result<Self::Data, ExplorerError>;
}

/// What a call to [`Store::refresh`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A request was already in flight; nothing happened.
    InFlight,
    /// Fetch-once resource with data already present; nothing happened.
    AlreadyLoaded,
    /// The fetch succeeded and `data` was replaced.
    Fetched,
    /// The fetch failed and `error` was set.
    Failed,
    /// The store was reset while the request was in flight; the result was
    /// dropped.
    Discarded,
}

impl RefreshOutcome {
    /// Whether this call performed an upstream request.
    pub fn requested(&self) -> bool {
        matches!(
            self,
            RefreshOutcome::Fetched | RefreshOutcome::Failed | RefreshOutcome::Discarded
        )
    }
}

// ─── Store ───────────────────────────────────────────────────────────────────

struct Inner<P, T> {
    state: FetchState<P, T>,
    /// Bumped by `reset`; a refresh that started under an older epoch is
    /// discarded when it settles.
    epoch: u64,
}

/// Observable state for one resource.
pub struct Store<R: Resource> {
    resource: R,
    source: Arc<dyn MarketDataSource>,
    inner: Mutex<Inner<R::Params, R::Data>>,
    listeners: Arc<Mutex<Listeners<R::Params, R::Data>>>,
}

impl<R: Resource> Store<R> {
    pub fn new(resource: R, source: Arc<dyn MarketDataSource>, parameters: R::Params) -> Self {
        Self {
            resource,
            source,
            inner: Mutex::new(Inner {
                state: FetchState::new(parameters),
                epoch: 0,
            }),
            listeners: Listeners::new(),
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// Snapshot of the current state. Data is shared, not copied.
    pub fn state(&self) -> FetchState<R::Params, R::Data> {
        self.lock().state.clone()
    }

    pub fn parameters(&self) -> R::Params {
        self.lock().state.parameters.clone()
    }

    pub fn data(&self) -> Option<Arc<R::Data>> {
        self.lock().state.data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error.clone()
    }

    // ── Subscriptions ────────────────────────────────────────────────────

    /// Register a listener for every state transition.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&FetchState<R::Params, R::Data>, Changes) + Send + Sync + 'static,
    {
        self.subscribe_fields(Changes::ALL, listener)
    }

    /// Register a listener that only runs when a transition touches one of
    /// `fields`.
    pub fn subscribe_fields<F>(&self, fields: Changes, listener: F) -> Subscription
    where
        F: Fn(&FetchState<R::Params, R::Data>, Changes) + Send + Sync + 'static,
    {
        let listener: Listener<R::Params, R::Data> = Arc::new(listener);
        Listeners::insert(&self.listeners, fields, listener)
    }

    pub fn listener_count(&self) -> usize {
        Listeners::len(&self.listeners)
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Apply `update` to a copy of the parameters and commit it if it
    /// succeeds. Never fetches; callers decide when to refresh.
    pub fn update_parameters<F>(&self, update: F) -> Result<(), ExplorerError>
    where
        F: FnOnce(&mut R::Params) -> Result<(), ExplorerError>,
    {
        let changed = {
            let mut inner = self.lock();
            let mut next = inner.state.parameters.clone();
            update(&mut next)?;
            if next == inner.state.parameters {
                false
            } else {
                inner.state.parameters = next;
                true
            }
        };

        if changed {
            tracing::debug!(resource = self.resource.name(), "Parameters updated");
            self.notify(Changes::PARAMETERS);
        }
        Ok(())
    }

    /// Replace the whole state with a fresh one over `parameters`.
    ///
    /// Any in-flight request is orphaned: its result is discarded when it
    /// settles.
    pub fn reset_to(&self, parameters: R::Params) {
        {
            let mut inner = self.lock();
            inner.epoch += 1;
            let version = inner.state.data_version;
            inner.state = FetchState::new(parameters);
            // Keep the version monotonic so memoized projections never see
            // an old version number paired with new data.
            inner.state.data_version = version + 1;
        }
        tracing::debug!(resource = self.resource.name(), "State reset");
        self.notify(Changes::ALL);
    }

    /// Fetch the resource with the current parameters.
    ///
    /// No-op while a request is in flight, or (for fetch-once resources) once
    /// data is present. The loading flag is checked and set before the first
    /// suspension point, so concurrent calls collapse into one request.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (params, epoch, began) = {
            let mut inner = self.lock();
            if inner.state.loading {
                tracing::debug!(resource = self.resource.name(), "Refresh skipped: in flight");
                return RefreshOutcome::InFlight;
            }
            if self.resource.fetch_once() && inner.state.data.is_some() {
                tracing::debug!(resource = self.resource.name(), "Refresh skipped: already loaded");
                return RefreshOutcome::AlreadyLoaded;
            }

            let began = Changes {
                loading: true,
                error: inner.state.error.is_some(),
                ..Changes::default()
            };
            inner.state.loading = true;
            inner.state.error = None;
            (inner.state.parameters.clone(), inner.epoch, began)
        };
        self.notify(began);

        let mut guard = LoadingGuard {
            store: self,
            epoch,
            armed: true,
        };
        let result = self.resource.fetch(self.source.as_ref(), &params).await;
        guard.armed = false;

        let (outcome, settled) = {
            let mut inner = self.lock();
            if inner.epoch != epoch {
                tracing::debug!(resource = self.resource.name(), "Response discarded after reset");
                return RefreshOutcome::Discarded;
            }

            inner.state.loading = false;
            match result {
                Ok(data) => {
                    inner.state.data = Some(Arc::new(data));
                    inner.state.data_version += 1;
                    inner.state.fetched_with = Some(params);
                    (RefreshOutcome::Fetched, Changes::DATA | Changes::LOADING)
                }
                Err(e) => {
                    tracing::warn!(resource = self.resource.name(), error = %e, "Refresh failed");
                    inner.state.error = Some(e.to_string());
                    (RefreshOutcome::Failed, Changes::ERROR | Changes::LOADING)
                }
            }
        };
        self.notify(settled);
        outcome
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, Inner<R::Params, R::Data>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!(resource = self.resource.name(), "Store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Call matching listeners with a fresh snapshot. Runs with no lock held,
    /// so listeners may read from or mutate the store.
    fn notify(&self, changes: Changes) {
        if changes.is_empty() {
            return;
        }
        let listeners = Listeners::matching(&self.listeners, changes);
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.state();
        for listener in listeners {
            listener(&snapshot, changes);
        }
    }
}

/// Clears `loading` if a refresh future is dropped before it settles, so an
/// abandoned request never wedges the store.
struct LoadingGuard<'a, R: Resource> {
    store: &'a Store<R>,
    epoch: u64,
    armed: bool,
}

impl<R: Resource> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let cleared = {
            let mut inner = self.store.lock();
            if inner.epoch == self.epoch && inner.state.loading {
                inner.state.loading = false;
                true
            } else {
                false
            }
        };
        if cleared {
            tracing::debug!(resource = self.store.resource.name(), "Refresh abandoned");
            self.store.notify(Changes::LOADING);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing;
