//! Topic registry and fan-out broadcaster
//!
//! Maps each topic to the outbound channels of the connections subscribed to
//! it. Topics are opaque strings; a hierarchical-looking name like
//! `uromed/ph` carries no hierarchy semantics, and the empty string is a
//! legal topic.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use uuid::Uuid;

/// Identifier a connection is registered under
pub type SubscriberId = Uuid;

/// Outbound channel of a subscribed connection
///
/// A closed channel is the delivery-failure signal: the receiving side is
/// gone, so the subscriber gets pruned on the next broadcast touching it.
pub type Subscriber = UnboundedSender<String>;

/// Registry of topic subscriptions
///
/// Not shared: a single owner mutates it, so plain `HashMap`s suffice and
/// broadcast never observes concurrent mutation.
#[derive(Default)]
pub struct TopicRegistry {
    topics: HashMap<String, HashMap<SubscriberId, Subscriber>>,
}

impl TopicRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber under a topic, creating the topic entry lazily
    pub fn register(&mut self, topic: &str, id: SubscriberId, sender: Subscriber) {
        self.topics
            .entry(topic.to_string())
            .or_default()
            .insert(id, sender);
    }

    /// Remove a subscriber from a topic
    ///
    /// Removing a non-member or an unknown topic is a no-op. A topic whose
    /// last subscriber leaves is dropped entirely, so the registry does not
    /// grow with the set of topics ever seen.
    pub fn unregister(&mut self, topic: &str, id: SubscriberId) {
        if let Some(subscribers) = self.topics.get_mut(topic) {
            subscribers.remove(&id);
            if subscribers.is_empty() {
                self.topics.remove(topic);
            }
        }
    }

    /// Current subscriber ids of a topic
    pub fn subscribers(&self, topic: &str) -> Vec<SubscriberId> {
        self.topics
            .get(topic)
            .map(|subscribers| subscribers.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of topics with at least one subscriber
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Deliver a message to every subscriber of a topic
    ///
    /// Every subscriber gets its own delivery attempt; one failure never
    /// aborts delivery to the rest. Failed subscribers are unregistered
    /// after the pass completes, never mid-iteration. A topic with zero
    /// subscribers is a silent no-op.
    ///
    /// Returns the number of successful deliveries.
    pub fn broadcast(&mut self, topic: &str, message: &str) -> usize {
        let mut delivered = 0;
        let mut failed = Vec::new();

        if let Some(subscribers) = self.topics.get(topic) {
            for (id, sender) in subscribers {
                if sender.send(message.to_string()).is_ok() {
                    delivered += 1;
                } else {
                    failed.push(*id);
                }
            }
        }

        for id in failed {
            debug!("pruning unreachable subscriber {} from '{}'", id, topic);
            self.unregister(topic, id);
        }

        delivered
    }
}
