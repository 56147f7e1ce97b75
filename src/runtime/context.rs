use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use tracing::{trace, warn};

/// Identifier of a source or observer inside one runtime.
pub type NodeId = usize;

type Observer = Rc<dyn Fn()>;

/// Flush rounds allowed before a self-scheduling effect chain is cut off.
const MAX_FLUSH_ROUNDS: usize = 100;

/// Reactive context for tracking dependencies.
#[derive(Default)]
struct ReactiveContext {
    // Active read trackers, innermost last. `None` marks an untracked section.
    trackers: Vec<Option<BTreeSet<NodeId>>>,
    // Map from source ID to its current version
    versions: HashMap<NodeId, u64>,
    // Map from source ID to the observers that read it on their last run
    dependents: HashMap<NodeId, HashSet<NodeId>>,
    // Map from observer ID to the sources it read on its last run
    observer_deps: HashMap<NodeId, BTreeSet<NodeId>>,
    // Map from observer ID to the effect function
    observers: HashMap<NodeId, Observer>,
    batch_depth: usize,
    // Ordered by ID so effects run in creation order
    pending: BTreeSet<NodeId>,
    flushing: bool,
}

impl ReactiveContext {
    fn unlink(&mut self, observer_id: NodeId) {
        if let Some(old_deps) = self.observer_deps.remove(&observer_id) {
            for source_id in old_deps {
                if let Some(deps) = self.dependents.get_mut(&source_id) {
                    deps.remove(&observer_id);
                }
            }
        }
    }
}

/// Single-threaded reactive runtime.
///
/// The runtime hands out IDs, keeps a version counter per source, records
/// which observers read which sources and re-runs those observers after a
/// write. Writes made inside [`ReactiveRuntime::batch`] are coalesced so
/// every affected observer runs exactly once when the outermost batch ends.
///
/// Each thread has a default runtime; [`ReactiveRuntime::scope`] installs a
/// fresh one for isolation.
///
/// # Examples
///
/// ```
/// use todostore::runtime::ReactiveRuntime;
/// use todostore::Signal;
///
/// ReactiveRuntime::scope(|| {
///     let signal = Signal::new(0);
///     assert_eq!(signal.get(), 0);
/// });
/// // Runtime and all its state is dropped here
/// ```
pub struct ReactiveRuntime {
    next_id: Cell<NodeId>,
    context: RefCell<ReactiveContext>,
}

thread_local! {
    static RUNTIME_STACK: RefCell<Vec<Rc<ReactiveRuntime>>> = const { RefCell::new(Vec::new()) };
    static THREAD_RUNTIME: Rc<ReactiveRuntime> = ReactiveRuntime::new();
}

/// Pops the scoped runtime even if the scoped closure unwinds.
struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

impl ReactiveRuntime {
    /// Create a new isolated runtime with its own dependency graph.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            next_id: Cell::new(0),
            context: RefCell::new(ReactiveContext::default()),
        })
    }

    /// Run a function with a fresh isolated runtime.
    ///
    /// Reactive primitives created inside `f` belong to that runtime. The
    /// runtime lives as long as anything created in it does.
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        Self::with_runtime(Self::new(), f)
    }

    /// The default runtime of the calling thread.
    pub fn thread_default() -> Rc<Self> {
        THREAD_RUNTIME.with(Rc::clone)
    }

    /// Get the current reactive runtime (innermost scope, or the thread default).
    pub fn current() -> Rc<Self> {
        RUNTIME_STACK
            .with(|stack| stack.borrow().last().cloned())
            .unwrap_or_else(Self::thread_default)
    }

    /// Run a function with a specific runtime as the current context.
    pub fn with_runtime<F, R>(runtime: Rc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().push(runtime);
        });
        let _guard = ScopeGuard;
        f()
    }

    /// Clear all observers, dependencies and pending work from this runtime.
    ///
    /// Source versions survive so live memos keep revalidating correctly.
    pub fn clear(&self) {
        let dropped = {
            let mut ctx = self.context.borrow_mut();
            ctx.dependents.clear();
            ctx.observer_deps.clear();
            ctx.pending.clear();
            std::mem::take(&mut ctx.observers)
        };
        // Observer closures may own signals whose drop re-enters the runtime.
        drop(dropped);
    }

    /// Generate the next unique ID for a reactive primitive.
    pub fn next_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Register a new source at version zero.
    pub fn register_source(&self, source_id: NodeId) {
        self.context.borrow_mut().versions.insert(source_id, 0);
    }

    /// Forget a source that no longer exists.
    pub fn release_source(&self, source_id: NodeId) {
        // Skipped when the context is busy; a stale entry is harmless.
        if let Ok(mut ctx) = self.context.try_borrow_mut() {
            ctx.versions.remove(&source_id);
            ctx.dependents.remove(&source_id);
        }
    }

    /// Current version of a source. Unknown sources report zero.
    pub fn version(&self, source_id: NodeId) -> u64 {
        self.context
            .borrow()
            .versions
            .get(&source_id)
            .copied()
            .unwrap_or(0)
    }

    /// Track a read of a source by the current observer.
    pub fn track_read(&self, source_id: NodeId) {
        let mut ctx = self.context.borrow_mut();
        if let Some(Some(reads)) = ctx.trackers.last_mut() {
            reads.insert(source_id);
        }
    }

    /// Track reads of several sources at once.
    pub fn track_reads<I>(&self, source_ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut ctx = self.context.borrow_mut();
        if let Some(Some(reads)) = ctx.trackers.last_mut() {
            reads.extend(source_ids);
        }
    }

    /// Run `f`, returning its result and every source it read.
    pub fn track<F, R>(&self, f: F) -> (R, BTreeSet<NodeId>)
    where
        F: FnOnce() -> R,
    {
        self.context.borrow_mut().trackers.push(Some(BTreeSet::new()));
        let result = f();
        let reads = self
            .context
            .borrow_mut()
            .trackers
            .pop()
            .flatten()
            .unwrap_or_default();
        (result, reads)
    }

    /// Run `f` without registering any of its reads on the current observer.
    pub fn untrack<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.context.borrow_mut().trackers.push(None);
        let result = f();
        self.context.borrow_mut().trackers.pop();
        result
    }

    /// Record a write: bump the source version and schedule its observers.
    pub fn notify_write(&self, source_id: NodeId) {
        let run_now = {
            let mut ctx = self.context.borrow_mut();
            *ctx.versions.entry(source_id).or_insert(0) += 1;
            let observers = ctx
                .dependents
                .get(&source_id)
                .map(|obs| obs.iter().copied().collect::<Vec<_>>())
                .unwrap_or_default();
            ctx.pending.extend(observers);
            ctx.batch_depth == 0 && !ctx.flushing
        };

        if run_now {
            self.flush();
        }
    }

    /// Run `f` with observer execution deferred until the outermost batch ends.
    pub fn batch<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.context.borrow_mut().batch_depth += 1;
        let result = f();
        let run_now = {
            let mut ctx = self.context.borrow_mut();
            ctx.batch_depth -= 1;
            ctx.batch_depth == 0 && !ctx.flushing
        };

        if run_now {
            self.flush();
        }
        result
    }

    /// Register an observer and run it once to collect its dependencies.
    pub fn create_observer<F>(&self, observer_id: NodeId, f: F)
    where
        F: Fn() + 'static,
    {
        {
            let mut ctx = self.context.borrow_mut();
            ctx.unlink(observer_id);
            ctx.observers.insert(observer_id, Rc::new(f));
        }
        self.run_observer(observer_id);
    }

    /// Run a registered observer, replacing its dependency set.
    pub fn run_observer(&self, observer_id: NodeId) {
        let observer = self.context.borrow().observers.get(&observer_id).cloned();
        let Some(observer) = observer else {
            return;
        };

        trace!(observer_id, "running observer");
        let ((), reads) = self.track(|| observer());

        let mut ctx = self.context.borrow_mut();
        // Disposed while running
        if !ctx.observers.contains_key(&observer_id) {
            return;
        }
        ctx.unlink(observer_id);
        for source_id in &reads {
            ctx.dependents
                .entry(*source_id)
                .or_default()
                .insert(observer_id);
        }
        ctx.observer_deps.insert(observer_id, reads);
    }

    /// Remove an observer and all of its dependency edges.
    pub fn remove_observer(&self, observer_id: NodeId) {
        let removed = {
            let mut ctx = self.context.borrow_mut();
            ctx.unlink(observer_id);
            ctx.pending.remove(&observer_id);
            ctx.observers.remove(&observer_id)
        };
        drop(removed);
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.context.borrow().observers.len()
    }

    /// Run every pending observer until nothing is left to run.
    fn flush(&self) {
        self.context.borrow_mut().flushing = true;

        let mut rounds = 0;
        loop {
            let pending = std::mem::take(&mut self.context.borrow_mut().pending);
            if pending.is_empty() {
                break;
            }

            rounds += 1;
            if rounds > MAX_FLUSH_ROUNDS {
                warn!(
                    rounds = MAX_FLUSH_ROUNDS,
                    dropped = pending.len(),
                    "observers kept rescheduling themselves; dropping pending runs"
                );
                break;
            }

            for observer_id in pending {
                self.run_observer(observer_id);
            }
        }

        self.context.borrow_mut().flushing = false;
    }
}
