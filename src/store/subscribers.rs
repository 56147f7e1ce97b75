use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct SubscriberList<T: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Subscriber<T>)>,
}

/// An ordered list of change callbacks.
///
/// Callbacks are invoked in subscription order. A callback added or removed
/// while a notification is in progress takes effect from the next one.
pub struct Subscribers<T: ?Sized> {
    list: Rc<RefCell<SubscriberList<T>>>,
}

impl<T: ?Sized> Clone for Subscribers<T> {
    fn clone(&self) -> Self {
        Self {
            list: Rc::clone(&self.list),
        }
    }
}

impl<T: ?Sized> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            list: Rc::new(RefCell::new(SubscriberList {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<T: ?Sized + 'static> Subscribers<T> {
    /// Create an empty subscriber list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback. It stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = {
            let mut list = self.list.borrow_mut();
            let id = list.next_id;
            list.next_id += 1;
            list.entries.push((id, Rc::new(callback)));
            id
        };

        let list: Weak<RefCell<SubscriberList<T>>> = Rc::downgrade(&self.list);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(list) = list.upgrade() {
                    let removed = {
                        let mut list = list.borrow_mut();
                        let index = list.entries.iter().position(|(entry, _)| *entry == id);
                        index.map(|index| list.entries.remove(index))
                    };
                    drop(removed);
                }
            })),
        }
    }

    /// Invoke every current callback once with `value`.
    pub fn notify(&self, value: &T) {
        let subscribers: Vec<Subscriber<T>> = self
            .list
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for subscriber in subscribers {
            subscriber(value);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.list.borrow().entries.len()
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unsubscribe handle returned by `subscribe`.
///
/// Dropping it removes the callback.
#[must_use = "the callback is removed as soon as the subscription is dropped"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the callback now.
    pub fn unsubscribe(self) {}

    /// Keep the callback registered for as long as its source lives.
    pub fn forget(mut self) {
        self.detach = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}
