//! ResetGateway owns the live snapshot and serializes mutation requests.
//!
//! The engine only computes `snapshot -> snapshot`; the gateway is the seam
//! to the rest of the application:
//! - holds the live state behind a write lock, so requests commit one at a time
//! - turns rejected requests into a `tracing` warning (plus an optional
//!   [`WarnSink`]) and leaves state untouched
//! - notifies an optional commit hook with every committed snapshot
//! - captures the boot-time baseline once startup is done

use crate::config::{ResetConfig, ResetSource};
use crate::walk::read_at;
use crate::{default_tree, NodeId, Registry, ResetEngine, ResetOp};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;

/// Receives diagnostics for rejected requests.
pub trait WarnSink: Send + Sync {
    /// Called once per rejected request with a message naming the
    /// operation kind and the offending targets.
    fn warn(&self, message: &str);
}

impl<F> WarnSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn warn(&self, message: &str) {
        self(message)
    }
}

/// Callback invoked with each newly committed snapshot.
pub type CommitHook = Arc<dyn Fn(&Value) + Send + Sync>;

/// What happened to a dispatched request.
///
/// Rejection is reported here for observability only; the warning has
/// already been logged and the state is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new snapshot was committed.
    Committed,
    /// A target was invalid; nothing was applied.
    Rejected,
    /// The request had nothing to do (an empty Reset).
    Unchanged,
}

/// Live store in front of the [`ResetEngine`].
///
/// # Example
///
/// ```ignore
/// let gateway = ResetGateway::new(Arc::new(registry));
/// gateway.update(|state| state["app"]["todos"]["list"] = json!(["milk"])).await;
/// gateway.capture_baseline().await;
///
/// gateway.dispatch(ResetOp::reset([todos])).await;
/// assert_eq!(gateway.select(todos).await, Some(json!({"list": []})));
/// ```
pub struct ResetGateway {
    registry: Arc<Registry>,
    config: ResetConfig,
    state: RwLock<Value>,
    baseline: OnceLock<Value>,
    warn_sink: Option<Arc<dyn WarnSink>>,
    on_commit: Option<CommitHook>,
}

impl ResetGateway {
    /// Create a gateway whose live state starts at the registry's default tree.
    pub fn new(registry: Arc<Registry>) -> Self {
        let initial = default_tree(&registry);
        Self {
            registry,
            config: ResetConfig::default(),
            state: RwLock::new(initial),
            baseline: OnceLock::new(),
            warn_sink: None,
            on_commit: None,
        }
    }

    /// Start from an explicit snapshot instead of the default tree.
    pub fn with_initial(mut self, initial: Value) -> Self {
        self.state = RwLock::new(initial);
        self
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ResetConfig) -> Self {
        self.config = config;
        self
    }

    /// Also report rejected requests to `sink`.
    pub fn with_warn_sink(mut self, sink: Arc<dyn WarnSink>) -> Self {
        self.warn_sink = Some(sink);
        self
    }

    /// Call `hook` with every committed snapshot.
    pub fn on_commit(mut self, hook: CommitHook) -> Self {
        self.on_commit = Some(hook);
        self
    }

    /// Get a snapshot of the current state.
    pub async fn snapshot(&self) -> Value {
        self.state.read().await.clone()
    }

    /// Current value of one node, or `None` if it is absent or unknown.
    pub async fn select(&self, id: NodeId) -> Option<Value> {
        let address = self.registry.address_of(id).ok()?;
        let state = self.state.read().await;
        read_at(&state, &address).cloned()
    }

    /// Run a mutation that is not a reset (another reducer) and commit it.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Value),
    {
        let mut state = self.state.write().await;
        f(&mut *state);
        self.commit(&state);
    }

    /// Store the current snapshot as the boot baseline.
    ///
    /// Only the first call has an effect; it returns `false` afterwards.
    pub async fn capture_baseline(&self) -> bool {
        let snapshot = self.snapshot().await;
        let captured = self.baseline.set(snapshot).is_ok();
        if captured {
            tracing::debug!("state reset baseline captured");
        } else {
            tracing::debug!("state reset baseline already captured; ignoring");
        }
        captured
    }

    /// The boot baseline, once captured.
    pub fn baseline(&self) -> Option<&Value> {
        self.baseline.get()
    }

    /// Apply a request to the live state.
    ///
    /// The write lock is held from reading the current snapshot until the
    /// result is committed, so concurrent requests apply one after another.
    pub async fn dispatch(&self, op: ResetOp) -> DispatchOutcome {
        if matches!(&op, ResetOp::Reset { targets } if targets.is_empty()) {
            tracing::debug!(kind = %op.kind(), "empty reset request ignored");
            return DispatchOutcome::Unchanged;
        }

        let mut state = self.state.write().await;
        match self.engine().apply(&state, &op) {
            Ok(next) => {
                *state = next;
                tracing::debug!(
                    kind = %op.kind(),
                    targets = op.targets().len(),
                    "state reset committed"
                );
                self.commit(&state);
                DispatchOutcome::Committed
            }
            Err(rejection) => {
                tracing::warn!(
                    kind = %rejection.kind,
                    targets = ?rejection.targets,
                    "state reset request rejected; nothing applied"
                );
                if let Some(sink) = &self.warn_sink {
                    sink.warn(&rejection.to_string());
                }
                DispatchOutcome::Rejected
            }
        }
    }

    fn engine(&self) -> ResetEngine<'_> {
        let engine = ResetEngine::new(&self.registry);
        match (self.config.reset_source, self.baseline.get()) {
            (ResetSource::Baseline, Some(baseline)) => engine.with_baseline(baseline),
            (ResetSource::Baseline, None) => {
                tracing::debug!("no baseline captured; resetting to declared defaults");
                engine
            }
            (ResetSource::Declared, _) => engine,
        }
    }

    fn commit(&self, state: &Value) {
        if let Some(hook) = &self.on_commit {
            hook(state);
        }
    }
}

impl fmt::Debug for ResetGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetGateway")
            .field("nodes", &self.registry.len())
            .field("config", &self.config)
            .field("baseline_captured", &self.baseline.get().is_some())
            .finish_non_exhaustive()
    }
}
