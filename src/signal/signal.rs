use crate::runtime::{NodeId, ReactiveRuntime};
use crate::signal::{Effect, Memo};
use std::cell::RefCell;
use std::rc::Rc;

struct SignalInner<T> {
    value: RefCell<T>,
    id: NodeId,
    runtime: Rc<ReactiveRuntime>,
}

impl<T> Drop for SignalInner<T> {
    fn drop(&mut self) {
        self.runtime.release_source(self.id);
    }
}

/// A reactive cell that holds a value and notifies observers when changed.
///
/// Clones share the same cell. Every write bumps the cell's version in its
/// runtime, which is what [`Memo`] revalidates against.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Signal<T> {
    /// Create a new signal in the current runtime.
    pub fn new(initial: T) -> Self {
        let runtime = ReactiveRuntime::current();
        let id = runtime.next_id();
        runtime.register_source(id);

        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(initial),
                id,
                runtime,
            }),
        }
    }

    /// Get the current value of the signal.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.runtime.track_read(self.inner.id);
        self.with_untracked(f)
    }

    /// Read the value without registering a dependency.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.inner.value.borrow();
        f(&value)
    }

    /// Set a new value for the signal.
    pub fn set(&self, new_value: T) {
        *self.inner.value.borrow_mut() = new_value;
        self.inner.runtime.notify_write(self.inner.id);
    }

    /// Update the value in place and notify observers.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = {
            let mut value = self.inner.value.borrow_mut();
            f(&mut value)
        };
        // Borrow released before observers run
        self.inner.runtime.notify_write(self.inner.id);
        result
    }

    /// Update the value in place, notifying only when `f` reports a change.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = {
            let mut value = self.inner.value.borrow_mut();
            f(&mut value)
        };
        if changed {
            self.inner.runtime.notify_write(self.inner.id);
        }
        changed
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Current version; bumped on every write.
    pub fn version(&self) -> u64 {
        self.inner.runtime.version(self.inner.id)
    }

    pub(crate) fn runtime(&self) -> &Rc<ReactiveRuntime> {
        &self.inner.runtime
    }

    /// Watch this signal for changes.
    ///
    /// The callback runs immediately with the current value and again after
    /// every write, until the returned [`Effect`] is dropped.
    pub fn watch<F>(&self, callback: F) -> Effect
    where
        F: Fn(&T) + 'static,
    {
        let signal = self.clone();
        Effect::in_runtime(&self.inner.runtime, move || signal.with(|value| callback(value)))
    }

    /// Create a derived value by applying a function to this signal's value.
    pub fn map<U, F>(&self, f: F) -> Memo<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let source = self.clone();
        Memo::in_runtime(&self.inner.runtime, move || source.with(|value| f(value)))
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("value", &self.inner.value.try_borrow().ok())
            .finish()
    }
}
