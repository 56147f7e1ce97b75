use crate::runtime::{NodeId, ReactiveRuntime};
use std::cell::RefCell;
use std::rc::Rc;

struct Cached<T> {
    value: T,
    // Sources read by the last computation and the versions seen then
    deps: Vec<(NodeId, u64)>,
}

struct MemoInner<T> {
    compute: Box<dyn Fn() -> T>,
    cached: RefCell<Option<Cached<T>>>,
    runtime: Rc<ReactiveRuntime>,
}

/// A derived value recomputed on read when any source it read has changed.
///
/// Memos are pull-based: a write never recomputes anything, it only bumps
/// a source version. The next read compares the versions recorded at the
/// last computation against the current ones and recomputes on mismatch.
///
/// Reading a memo inside an observer registers the memo's underlying
/// sources on that observer, so effects see through chains of memos.
pub struct Memo<T> {
    inner: Rc<MemoInner<T>>,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Memo<T> {
    /// Create a new memo in the current runtime.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self::in_runtime(&ReactiveRuntime::current(), compute)
    }

    pub(crate) fn in_runtime<F>(runtime: &Rc<ReactiveRuntime>, compute: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self {
            inner: Rc::new(MemoInner {
                compute: Box::new(compute),
                cached: RefCell::new(None),
                runtime: Rc::clone(runtime),
            }),
        }
    }

    /// Get the current value, recomputing if necessary.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Read the memoized value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.refresh();

        let cached = self.inner.cached.borrow();
        match cached.as_ref() {
            Some(cached) => {
                self.inner
                    .runtime
                    .track_reads(cached.deps.iter().map(|(id, _)| *id));
                f(&cached.value)
            }
            // refresh() always fills the cache
            None => {
                drop(cached);
                let value = (self.inner.compute)();
                f(&value)
            }
        }
    }

    /// Whether the cached value is missing or out of date.
    pub fn is_stale(&self) -> bool {
        let cached = self.inner.cached.borrow();
        match cached.as_ref() {
            Some(cached) => cached
                .deps
                .iter()
                .any(|(id, version)| self.inner.runtime.version(*id) != *version),
            None => true,
        }
    }

    fn refresh(&self) {
        if !self.is_stale() {
            return;
        }

        let (value, reads) = self.inner.runtime.track(|| (self.inner.compute)());
        let deps = reads
            .into_iter()
            .map(|id| (id, self.inner.runtime.version(id)))
            .collect();
        *self.inner.cached.borrow_mut() = Some(Cached { value, deps });
    }
}

/// Create a new memoized computation.
///
/// # Example
///
/// ```
/// use todostore::{create_memo, Signal};
///
/// let count = Signal::new(5);
/// let doubled = create_memo({
///     let count = count.clone();
///     move || count.get() * 2
/// });
/// assert_eq!(doubled.get(), 10);
/// ```
pub fn create_memo<T, F>(compute: F) -> Memo<T>
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    Memo::new(compute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signal;
    use std::cell::Cell;

    #[test]
    fn memo_basic() {
        let count = Signal::new(5);
        let doubled = create_memo({
            let count = count.clone();
            move || count.get() * 2
        });

        assert_eq!(doubled.get(), 10);

        count.set(10);
        assert_eq!(doubled.get(), 20);
    }

    #[test]
    fn memo_recomputes_only_after_a_write() {
        let count = Signal::new(1);
        let computations = Rc::new(Cell::new(0));
        let squared = Memo::new({
            let count = count.clone();
            let computations = Rc::clone(&computations);
            move || {
                computations.set(computations.get() + 1);
                count.get() * count.get()
            }
        });

        assert!(squared.is_stale());
        assert_eq!(squared.get(), 1);
        assert_eq!(squared.get(), 1);
        assert_eq!(computations.get(), 1);

        count.set(3);
        assert!(squared.is_stale());
        assert_eq!(squared.get(), 9);
        assert_eq!(computations.get(), 2);
    }

    #[test]
    fn chained_memos_follow_their_sources() {
        let input = Signal::new(2);
        let doubled = input.map(|n| n * 2);
        let quadrupled = Memo::new({
            let doubled = doubled.clone();
            move || doubled.get() * 2
        });

        assert_eq!(quadrupled.get(), 8);
        input.set(5);
        assert_eq!(quadrupled.get(), 20);
        assert_eq!(doubled.get(), 10);
    }
}
