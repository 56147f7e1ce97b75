use crate::runtime::{NodeId, ReactiveRuntime};
use std::rc::{Rc, Weak};

/// A side effect that re-runs when anything it read changes.
///
/// The effect runs immediately on creation to establish its dependencies and
/// re-collects them on every run. Dropping the handle unsubscribes it.
///
/// # Examples
///
/// ```
/// use todostore::{Effect, Signal};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let count = Signal::new(0);
/// let seen = Rc::new(Cell::new(0));
///
/// let effect = Effect::new({
///     let count = count.clone();
///     let seen = Rc::clone(&seen);
///     move || seen.set(count.get())
/// });
///
/// count.set(5);
/// assert_eq!(seen.get(), 5);
///
/// drop(effect);
/// count.set(6);
/// assert_eq!(seen.get(), 5);
/// ```
#[must_use = "an effect is unsubscribed as soon as it is dropped"]
pub struct Effect {
    id: NodeId,
    runtime: Weak<ReactiveRuntime>,
}

impl Effect {
    /// Create an effect in the current runtime.
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::in_runtime(&ReactiveRuntime::current(), effect)
    }

    pub(crate) fn in_runtime<F>(runtime: &Rc<ReactiveRuntime>, effect: F) -> Self
    where
        F: Fn() + 'static,
    {
        let id = runtime.next_id();
        runtime.create_observer(id, effect);

        Self {
            id,
            runtime: Rc::downgrade(runtime),
        }
    }

    /// Manually re-run the effect, refreshing its dependencies.
    pub fn run(&self) {
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.run_observer(self.id);
        }
    }

    /// Unsubscribe the effect.
    pub fn dispose(self) {}
}

impl Drop for Effect {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.remove_observer(self.id);
        }
    }
}

/// Create a new effect that runs when dependencies change.
///
/// The effect runs immediately and then again whenever any source
/// it reads changes.
pub fn create_effect<F>(effect: F) -> Effect
where
    F: Fn() + 'static,
{
    Effect::new(effect)
}

/// Run `f` with effect execution deferred until it returns.
///
/// Every effect affected by writes inside `f` runs exactly once afterwards.
pub fn batch<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    ReactiveRuntime::current().batch(f)
}

/// Run `f` without registering its reads on the surrounding observer.
pub fn untrack<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    ReactiveRuntime::current().untrack(f)
}
