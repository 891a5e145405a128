//! Stream - discrete-event values.
//!
//! A [`Stream`] is a sequence of occurrences over time. Unlike a
//! [`Signal`](spark_signals::Signal) it has no current value: subscribers only
//! see occurrences pushed after they subscribed.
//!
//! # Example
//!
//! ```ignore
//! use spark_dom::Stream;
//!
//! let clicks: Stream<u32> = Stream::new();
//! let unsubscribe = clicks.subscribe(|n| println!("click #{n}"));
//!
//! clicks.push(1); // prints "click #1"
//! unsubscribe();
//! clicks.push(2); // nobody listening
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::{get_current_scope, on_scope_dispose, signal, Signal};

use crate::primitives::Cleanup;

// =============================================================================
// TYPES
// =============================================================================

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct StreamInner<T> {
    subscribers: Vec<(usize, Subscriber<T>)>,
    next_id: usize,
    /// Subscriptions this stream holds on the streams it is derived from.
    upstream: Vec<Cleanup>,
}

impl<T> Drop for StreamInner<T> {
    fn drop(&mut self) {
        for unsubscribe in self.upstream.drain(..) {
            unsubscribe();
        }
    }
}

impl<T> StreamInner<T> {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// A discrete-event value. Clones share the same subscriber list.
pub struct Stream<T: 'static>(Rc<RefCell<StreamInner<T>>>);

impl<T: 'static> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Stream(self.0.clone())
    }
}

impl<T: 'static> Default for Stream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Stream<T> {
    /// Create a stream with no occurrences and no subscribers.
    pub fn new() -> Self {
        Stream(Rc::new(RefCell::new(StreamInner {
            subscribers: Vec::new(),
            next_id: 0,
            upstream: Vec::new(),
        })))
    }

    /// Deliver an occurrence to every current subscriber, in subscription order.
    pub fn push(&self, value: T) {
        // Snapshot first: a subscriber may subscribe or unsubscribe while we iterate.
        let subscribers: Vec<Subscriber<T>> = self
            .0
            .borrow()
            .subscribers
            .iter()
            .map(|(_, s)| s.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&value);
        }
    }

    /// Subscribe to future occurrences. Returns the unsubscribe function.
    pub fn subscribe<F>(&self, subscriber: F) -> impl FnOnce() + 'static
    where
        F: Fn(&T) + 'static,
    {
        let id = {
            let mut inner = self.0.borrow_mut();
            let id = inner.next_id();
            inner.subscribers.push((id, Rc::new(subscriber)));
            id
        };

        let inner = self.0.clone();
        move || {
            inner.borrow_mut().subscribers.retain(|(sub_id, _)| *sub_id != id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subscribers.len()
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Stream<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // =========================================================================
    // Combinators
    // =========================================================================
    //
    // A derived stream owns its upstream subscription and the source only
    // sees it weakly: once the last clone of the derived stream drops, it
    // unsubscribes and releases the source.

    fn follow<S: 'static>(&self, source: &Stream<S>, forward: impl Fn(&Stream<T>, &S) + 'static) {
        let target: Weak<RefCell<StreamInner<T>>> = Rc::downgrade(&self.0);
        let unsubscribe = source.subscribe(move |value| {
            if let Some(inner) = target.upgrade() {
                forward(&Stream(inner), value);
            }
        });
        self.0.borrow_mut().upstream.push(Box::new(unsubscribe));
    }

    /// A stream that occurs with `f(value)` whenever this one occurs.
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Stream<U> {
        let mapped = Stream::new();
        mapped.follow(self, move |out, value| out.push(f(value)));
        mapped
    }

    /// A stream that keeps only occurrences matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Stream<T>
    where
        T: Clone,
    {
        let filtered = Stream::new();
        filtered.follow(self, move |out, value| {
            if predicate(value) {
                out.push(value.clone());
            }
        });
        filtered
    }

    /// A stream that occurs whenever either input occurs.
    pub fn merge(&self, other: &Stream<T>) -> Stream<T>
    where
        T: Clone,
    {
        let merged = Stream::new();
        merged.follow(self, |out, value: &T| out.push(value.clone()));
        merged.follow(other, |out, value: &T| out.push(value.clone()));
        merged
    }

    /// A signal that starts at `initial` and takes each occurrence's value.
    ///
    /// Inside an active scope the subscription ends when the scope is
    /// disposed; otherwise it lasts as long as this stream.
    pub fn hold(&self, initial: T) -> Signal<T>
    where
        T: Clone + PartialEq,
    {
        let held = signal(initial);
        let target = held.clone();
        let unsubscribe = self.subscribe(move |value| {
            target.set(value.clone());
        });
        if get_current_scope().is_some() {
            on_scope_dispose(unsubscribe);
        }
        held
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_replay_for_late_subscribers() {
        let stream: Stream<i32> = Stream::new();
        stream.push(1);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _unsub = stream.subscribe(move |v| s.borrow_mut().push(*v));

        stream.push(2);
        stream.push(3);
        assert_eq!(*seen.borrow(), vec![2, 3]);
    }

    #[test]
    fn test_unsubscribe() {
        let stream: Stream<i32> = Stream::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let unsub = stream.subscribe(move |v| s.borrow_mut().push(*v));

        stream.push(1);
        unsub();
        stream.push(2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(stream.subscriber_count(), 0);
    }

    #[test]
    fn test_map_filter_merge() {
        let a: Stream<i32> = Stream::new();
        let b: Stream<i32> = Stream::new();
        let evens = a.merge(&b).filter(|v| v % 2 == 0).map(|v| v * 10);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _unsub = evens.subscribe(move |v| s.borrow_mut().push(*v));

        a.push(1);
        a.push(2);
        b.push(4);
        b.push(5);
        assert_eq!(*seen.borrow(), vec![20, 40]);
    }

    #[test]
    fn test_hold() {
        let stream: Stream<String> = Stream::new();
        let held = stream.hold("initial".to_string());
        assert_eq!(held.get(), "initial");

        stream.push("next".to_string());
        assert_eq!(held.get(), "next");
    }

    #[test]
    fn test_dropped_derived_streams_unsubscribe() {
        let source: Stream<i32> = Stream::new();
        for _ in 0..100 {
            let _ = source.map(|v| v + 1);
        }
        assert_eq!(source.subscriber_count(), 0);

        let doubled = source.map(|v| v * 2);
        let copy = doubled.clone();
        assert_eq!(source.subscriber_count(), 1);
        drop(doubled);
        assert_eq!(source.subscriber_count(), 1);
        drop(copy);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_chain_keeps_intermediate_streams_alive() {
        let a: Stream<i32> = Stream::new();
        let b: Stream<i32> = Stream::new();
        let tail = a.merge(&b).filter(|v| *v > 0).map(|v| v + 1);
        assert_eq!(a.subscriber_count(), 1);
        assert_eq!(b.subscriber_count(), 1);

        drop(tail);
        assert_eq!(a.subscriber_count(), 0);
        assert_eq!(b.subscriber_count(), 0);
    }

    #[test]
    fn test_hold_released_with_scope() {
        let stream: Stream<i32> = Stream::new();
        let scope = crate::primitives::Scope::new();
        let held = scope.run(|| stream.hold(0)).unwrap();

        stream.push(1);
        assert_eq!(held.get(), 1);

        scope.dispose();
        assert_eq!(stream.subscriber_count(), 0);
        stream.push(2);
        assert_eq!(held.get(), 1);
    }
}
