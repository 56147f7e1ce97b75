use crate::signal::{Effect, Signal};
use crate::store::{Subscribers, Subscription};

/// A single-threaded container for application state.
///
/// Stores wrap a [`Signal`] so reads inside effects and memos are tracked,
/// and add whole-state subscribers that are called exactly once after each
/// `update`/`set`, once the change is complete.
pub struct Store<T> {
    state: Signal<T>,
    subscribers: Subscribers<T>,
}

impl<T: Clone + 'static> Store<T> {
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        Self {
            state: Signal::new(initial),
            subscribers: Subscribers::new(),
        }
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> T {
        self.state.get()
    }

    /// Update the state using a function.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = self.state.update(f);
        self.notify();
        result
    }

    /// Set a new state value.
    pub fn set(&self, new_state: T) {
        self.state.set(new_state);
        self.notify();
    }

    /// Subscribe to state changes.
    ///
    /// The callback will be called whenever the state is updated, until the
    /// returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Run `f` now and again after every write to the state.
    ///
    /// The state is a single signal, so any `update`/`set` re-runs `f`
    /// whichever fields it looks at.
    pub fn observe<F>(&self, f: F) -> Effect
    where
        F: Fn(&T) + 'static,
    {
        self.state.watch(f)
    }

    /// Notify all subscribers of a state change.
    fn notify(&self) {
        if self.subscribers.is_empty() {
            return;
        }
        // Subscribers may write back into the store
        let snapshot = self.state.with_untracked(T::clone);
        self.subscribers.notify(&snapshot);
    }

    /// Read state through a function, tracked by the surrounding observer.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.state.with(f)
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}
