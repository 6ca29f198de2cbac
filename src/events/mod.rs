//! Synchronous publish/subscribe fan-out.
//!
//! A [`Notifier`] maps event names to ordered listener lists. Components
//! compose a notifier and expose only subscribe/unsubscribe; fan-out stays
//! crate-internal.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

type Callback<P> = dyn Fn(&P) -> anyhow::Result<()>;

/// A subscriber callback with pointer identity.
///
/// Clones share identity, so the handle passed to [`Notifier::subscribe`]
/// can later be used to unsubscribe.
pub struct Listener<P> {
    callback: Rc<Callback<P>>,
}

impl<P> Listener<P> {
    /// Wrap a fallible callback.
    pub fn new(callback: impl Fn(&P) -> anyhow::Result<()> + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Wrap a callback that cannot fail.
    pub fn infallible(callback: impl Fn(&P) + 'static) -> Self {
        Self::new(move |payload| {
            callback(payload);
            Ok(())
        })
    }

    /// Whether two handles refer to the same registered callback.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }

    fn call(&self, payload: &P) -> anyhow::Result<()> {
        (self.callback)(payload)
    }
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<P> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("ptr", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners that returned `Ok`.
    pub delivered: usize,
    /// Listeners that returned an error. Delivery continued past them.
    pub failed: usize,
}

impl Delivery {
    /// Total listeners invoked.
    pub const fn invoked(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Subscription registry keyed by event name.
pub struct Notifier<P> {
    events: HashMap<String, Vec<Listener<P>>>,
}

impl<P> Notifier<P> {
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
        }
    }

    /// Register `listener` under `event`, after any existing listeners.
    pub fn subscribe(&mut self, event: impl Into<String>, listener: Listener<P>) {
        self.events.entry(event.into()).or_default().push(listener);
    }

    /// Remove the first registration of `listener` under `event`.
    ///
    /// Unknown events and listeners are ignored.
    pub fn unsubscribe(&mut self, event: &str, listener: &Listener<P>) {
        let Some(listeners) = self.events.get_mut(event) else {
            return;
        };
        if let Some(index) = listeners.iter().position(|l| l.same(listener)) {
            listeners.remove(index);
        }
        if listeners.is_empty() {
            self.events.remove(event);
        }
    }

    /// Invoke every listener registered for `event`, in registration order.
    ///
    /// A listener error is logged and does not stop delivery to the rest.
    pub(crate) fn notify(&self, event: &str, payload: &P) -> Delivery {
        let mut delivery = Delivery::default();
        let Some(listeners) = self.events.get(event) else {
            return delivery;
        };
        // Snapshot so the registry is never observed mid-iteration.
        let snapshot: Vec<Listener<P>> = listeners.clone();
        for (index, listener) in snapshot.iter().enumerate() {
            match listener.call(payload) {
                Ok(()) => delivery.delivered += 1,
                Err(err) => {
                    delivery.failed += 1;
                    tracing::warn!(event, index, error = %err, "listener failed");
                }
            }
        }
        delivery
    }

    /// Drop every registration.
    pub(crate) fn clear_all(&mut self) {
        self.events.clear();
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, Vec::len)
    }

    /// Number of listeners across all events.
    pub fn total_listeners(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_listeners() == 0
    }
}

impl<P> Default for Notifier<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Notifier<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(&str, usize)> = self
            .events
            .iter()
            .map(|(name, listeners)| (name.as_str(), listeners.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("Notifier").field("events", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> Listener<String> {
        let log = Rc::clone(log);
        Listener::infallible(move |payload: &String| {
            log.borrow_mut().push(format!("{tag}:{payload}"));
        })
    }

    #[test]
    fn test_notify_fans_out_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.subscribe("change", recorder(&log, "a"));
        notifier.subscribe("change", recorder(&log, "b"));
        notifier.subscribe("other", recorder(&log, "c"));

        let delivery = notifier.notify("change", &"x".to_string());

        assert_eq!(delivery.delivered, 2);
        assert_eq!(*log.borrow(), vec!["a:x", "b:x"]);
    }

    #[test]
    fn test_notify_unknown_event_invokes_nothing() {
        let notifier: Notifier<String> = Notifier::new();
        let delivery = notifier.notify("missing", &String::new());
        assert_eq!(delivery.invoked(), 0);
    }

    #[test]
    fn test_unsubscribe_removes_by_identity() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        notifier.subscribe("change", a.clone());
        notifier.subscribe("change", b);

        notifier.unsubscribe("change", &a);
        notifier.notify("change", &"y".to_string());

        assert_eq!(*log.borrow(), vec!["b:y"]);
    }

    #[test]
    fn test_unsubscribe_removes_only_first_duplicate() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        let a = recorder(&log, "a");
        notifier.subscribe("change", a.clone());
        notifier.subscribe("change", a.clone());

        notifier.unsubscribe("change", &a);

        assert_eq!(notifier.listener_count("change"), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_is_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        let registered = recorder(&log, "a");
        let stranger = recorder(&log, "z");
        notifier.subscribe("change", registered);

        notifier.unsubscribe("change", &stranger);
        notifier.unsubscribe("nope", &stranger);

        assert_eq!(notifier.listener_count("change"), 1);
    }

    #[test]
    fn test_failing_listener_does_not_stop_delivery() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.subscribe(
            "change",
            Listener::new(|_: &String| Err(anyhow::anyhow!("boom"))),
        );
        notifier.subscribe("change", recorder(&log, "after"));

        let delivery = notifier.notify("change", &"v".to_string());

        assert_eq!(delivery, Delivery { delivered: 1, failed: 1 });
        assert_eq!(*log.borrow(), vec!["after:v"]);
        assert_eq!(notifier.listener_count("change"), 2);
    }

    #[test]
    fn test_clear_all_empties_registry() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.subscribe("change", recorder(&log, "a"));
        notifier.subscribe("keydown", recorder(&log, "b"));

        notifier.clear_all();

        assert!(notifier.is_empty());
        assert_eq!(notifier.total_listeners(), 0);
    }

    #[test]
    fn test_clones_share_identity() {
        let listener: Listener<String> = Listener::infallible(|_| {});
        let other: Listener<String> = Listener::infallible(|_| {});
        assert!(listener.same(&listener.clone()));
        assert!(!listener.same(&other));
    }
}
