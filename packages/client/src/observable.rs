//! Observable value: a value plus a set of synchronous subscribers.
//!
//! Used for the unread counter and the connection status. Every mutation
//! notifies all subscribers with the new value, after the guard on the value
//! has been released, so subscribers may read or mutate the observable again.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, Weak,
    atomic::{AtomicU64, Ordering},
};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Inner<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
}

/// A shared, observable value.
///
/// Cloning an `Observable` yields another handle to the same value.
pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Observable<T> {
    /// Create a new observable holding `value`
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(value),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        lock(&self.inner.value).clone()
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        self.update(|current| *current = value);
    }

    /// Mutate the value in place and notify subscribers
    pub fn update(&self, mutate: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut value = lock(&self.inner.value);
            mutate(&mut value);
            value.clone()
        };
        self.notify(&snapshot);
    }

    /// Register a subscriber. It is removed when the returned handle is
    /// dropped or [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.subscribers).push((id, Arc::new(callback)));

        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner.subscribers).retain(|(sub_id, _)| *sub_id != id);
                }
            })),
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }

    fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = lock(&self.inner.subscribers)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }
}

/// Handle returned by [`Observable::subscribe`]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the subscriber
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_notifies_subscribers_with_new_value() {
        // テスト項目: 値の変更後、購読者に新しい値が同期的に通知される
        // given (前提条件):
        let observable = Observable::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let _sub = observable.subscribe(move |value| seen_clone.lock().unwrap().push(*value));

        // when (操作):
        observable.set(2);
        observable.update(|value| *value += 10);

        // then (期待する結果):
        assert_eq!(*seen.lock().unwrap(), vec![2, 12]);
        assert_eq!(observable.get(), 12);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        // テスト項目: 購読解除後は通知されない
        // given (前提条件):
        let observable = Observable::new(0);
        let seen = Arc::new(Mutex::new(0));
        let seen_clone = Arc::clone(&seen);
        let sub = observable.subscribe(move |_| *seen_clone.lock().unwrap() += 1);

        // when (操作):
        observable.set(1);
        sub.unsubscribe();
        observable.set(2);

        // then (期待する結果):
        assert_eq!(*seen.lock().unwrap(), 1);
        assert_eq!(observable.subscriber_count(), 0);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        // テスト項目: Subscription を drop すると購読が解除される
        // given (前提条件):
        let observable = Observable::new("a".to_string());

        // when (操作):
        {
            let _sub = observable.subscribe(|_| {});
            assert_eq!(observable.subscriber_count(), 1);
        }

        // then (期待する結果):
        assert_eq!(observable.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_may_read_observable_during_notification() {
        // テスト項目: 通知中に購読者が値を読み出してもデッドロックしない
        // given (前提条件):
        let observable = Observable::new(0);
        let reader = observable.clone();
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        let _sub = observable.subscribe(move |_| {
            *seen_clone.lock().unwrap() = Some(reader.get());
        });

        // when (操作):
        observable.set(7);

        // then (期待する結果):
        assert_eq!(*seen.lock().unwrap(), Some(7));
    }
}
