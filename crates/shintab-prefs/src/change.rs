//! Change notification for the configuration store.
//!
//! Every mutation emits a [`PrefChange`] carrying the key and its old and
//! new values. Consumers register a watched key set and get a broadcast
//! receiver delivering only matching changes; stale subscribers (all
//! receivers dropped) are pruned on the next route.

use std::sync::RwLock;

use serde_json::Value;
use tokio::sync::broadcast;

/// Capacity of per-subscriber broadcast channels.
const CHANNEL_CAPACITY: usize = 64;

/// One observed mutation of the configuration store.
#[derive(Clone, Debug, PartialEq)]
pub struct PrefChange {
    /// The mutated key.
    pub key: String,
    /// Value before the mutation; `None` if the key was absent.
    pub old: Option<Value>,
    /// Value after the mutation; `None` if the key was removed.
    pub new: Option<Value>,
}

/// A subscription stream of configuration changes.
pub type ChangeStream = broadcast::Receiver<PrefChange>;

struct Subscriber {
    /// Watched keys; empty means "all keys".
    keys: Vec<String>,
    sender: broadcast::Sender<PrefChange>,
}

impl Subscriber {
    fn matches(&self, change: &PrefChange) -> bool {
        self.keys.is_empty() || self.keys.iter().any(|k| k == &change.key)
    }
}

/// Fan-out router delivering changes to matching subscribers.
pub struct ChangeRouter {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl ChangeRouter {
    /// Create a router with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Register a subscriber for the given keys (empty slice = all keys).
    pub fn subscribe(&self, keys: &[&str]) -> ChangeStream {
        let (tx, rx) = broadcast::channel(CHANNEL_CAPACITY);
        let sub = Subscriber {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            sender: tx,
        };
        self.subscribers
            .write()
            .expect("router lock poisoned")
            .push(sub);
        rx
    }

    /// Deliver a change to every matching subscriber, pruning dead ones.
    pub fn route(&self, change: PrefChange) {
        let mut subs = self.subscribers.write().expect("router lock poisoned");
        subs.retain(|sub| {
            if sub.matches(&change) {
                // Send fails only when every receiver is gone.
                sub.sender.send(change.clone()).is_ok()
            } else {
                sub.sender.receiver_count() > 0
            }
        });
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("router lock poisoned").len()
    }
}

impl Default for ChangeRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeRouter")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn change(key: &str, old: Option<Value>, new: Option<Value>) -> PrefChange {
        PrefChange {
            key: key.to_string(),
            old,
            new,
        }
    }

    #[test]
    fn watched_key_receives_change() {
        let router = ChangeRouter::new();
        let mut rx = router.subscribe(&["settings"]);

        router.route(change("settings", None, Some(json!({"blur": 2}))));

        let got = rx.try_recv().unwrap();
        assert_eq!(got.key, "settings");
        assert_eq!(got.new, Some(json!({"blur": 2})));
    }

    #[test]
    fn unwatched_key_is_filtered_out() {
        let router = ChangeRouter::new();
        let mut rx = router.subscribe(&["settings"]);

        router.route(change("todos", None, Some(json!([]))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn empty_key_set_watches_everything() {
        let router = ChangeRouter::new();
        let mut rx = router.subscribe(&[]);

        router.route(change("anything", None, Some(json!(1))));
        assert_eq!(rx.try_recv().unwrap().key, "anything");
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let router = ChangeRouter::new();
        let rx = router.subscribe(&["settings"]);
        assert_eq!(router.subscriber_count(), 1);

        drop(rx);
        router.route(change("settings", None, Some(json!(true))));
        assert_eq!(router.subscriber_count(), 0);
    }

    #[test]
    fn multiple_subscribers_each_get_a_copy() {
        let router = ChangeRouter::new();
        let mut a = router.subscribe(&["quickLinks"]);
        let mut b = router.subscribe(&[]);

        router.route(change("quickLinks", Some(json!([])), Some(json!([1]))));
        assert!(a.try_recv().is_ok());
        assert!(b.try_recv().is_ok());
    }
}
