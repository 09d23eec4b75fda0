//! Change-notification registry.
//!
//! Managers expose list-changed and updated hooks through [`Subscribers`].
//! The server never watches the filesystem, so no internal code path calls
//! [`Subscribers::notify`]; embedders that change files out of band may.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<T>)>,
}

/// Set of callbacks interested in events of type `T`.
///
/// # Examples
///
/// ```
/// use mcp_file_server::Subscribers;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let subscribers = Subscribers::<String>::new();
/// let hits = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&hits);
/// let subscription = subscribers.subscribe(move |_uri: &String| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// subscribers.notify(&"file://resources/a.txt".to_string());
/// subscription.cancel();
/// subscribers.notify(&"file://resources/a.txt".to_string());
///
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
pub struct Subscribers<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: 'static> Subscribers<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }

    /// Registers `callback` and returns the handle that removes it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.callbacks.push((id, Arc::new(callback)));
            id
        };

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        Subscription {
            id,
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .callbacks
                        .retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Invokes every registered callback with `event`.
    ///
    /// Callbacks run outside the registry lock, so they may subscribe or
    /// cancel without deadlocking.
    pub fn notify(&self, event: &T) {
        let callbacks: Vec<Callback<T>> = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .len()
    }

    /// Returns `true` if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("subscriptions", &self.len())
            .finish()
    }
}

/// Handle returned by [`Subscribers::subscribe`].
///
/// Dropping the handle keeps the callback registered; call
/// [`Subscription::cancel`] to remove it.
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Returns the registry-unique id of this subscription.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// De-registers the callback.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cancel_removes_only_its_callback() {
        let subscribers = Subscribers::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let first = {
            let hits = Arc::clone(&hits);
            subscribers.subscribe(move |()| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _second = {
            let hits = Arc::clone(&hits);
            subscribers.subscribe(move |()| {
                hits.fetch_add(10, Ordering::SeqCst);
            })
        };
        assert_eq!(subscribers.len(), 2);

        first.cancel();
        subscribers.notify(&());

        assert_eq!(subscribers.len(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_cancel_after_registry_dropped_is_noop() {
        let subscribers = Subscribers::<()>::new();
        let subscription = subscribers.subscribe(|()| {});
        drop(subscribers);
        subscription.cancel();
    }

    #[test]
    fn test_ids_are_unique() {
        let subscribers = Subscribers::<()>::new();
        let a = subscribers.subscribe(|()| {});
        let b = subscribers.subscribe(|()| {});
        assert_ne!(a.id(), b.id());
        assert!(!subscribers.is_empty());
    }
}
