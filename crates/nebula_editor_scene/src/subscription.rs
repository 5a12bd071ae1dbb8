// SPDX-License-Identifier: MIT OR Apache-2.0
//! Snapshot subscriptions.
//!
//! Stores publish a borrowed snapshot after every mutation. Subscribers
//! copy what they need; they never hold a reference into the store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Create a new random subscription ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

type Callback<T> = Box<dyn FnMut(&T)>;

/// Ordered set of snapshot callbacks
pub struct Subscribers<T: ?Sized> {
    callbacks: IndexMap<SubscriptionId, Callback<T>>,
}

impl<T: ?Sized> Subscribers<T> {
    /// Create an empty subscriber table
    pub fn new() -> Self {
        Self {
            callbacks: IndexMap::new(),
        }
    }

    /// Register a callback; it runs on every later publish
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.callbacks.insert(id, Box::new(callback));
        id
    }

    /// Remove a callback. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.shift_remove(&id).is_some()
    }

    /// Run every callback in subscription order
    pub fn publish(&mut self, snapshot: &T) {
        for callback in self.callbacks.values_mut() {
            callback(snapshot);
        }
    }

    /// Check if an id is registered here
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.callbacks.contains_key(&id)
    }

    /// Number of subscribers
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Check if nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Drop every callback
    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}

impl<T: ?Sized> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_publish_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers: Subscribers<u32> = Subscribers::new();

        let first = Rc::clone(&log);
        subscribers.subscribe(move |v| first.borrow_mut().push(("first", *v)));
        let second = Rc::clone(&log);
        subscribers.subscribe(move |v| second.borrow_mut().push(("second", *v)));

        subscribers.publish(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut subscribers: Subscribers<str> = Subscribers::new();

        let counter = Rc::clone(&count);
        let id = subscribers.subscribe(move |_| *counter.borrow_mut() += 1);
        subscribers.publish("a");
        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.publish("b");

        assert_eq!(*count.borrow(), 1);
        assert!(subscribers.is_empty());
    }
}
