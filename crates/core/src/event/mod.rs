use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::object::ObjectId;

/// A named event with an optional timestamp in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ms: Option<f32>,
}

impl EventMessage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_ms: None,
        }
    }

    pub fn at(name: impl Into<String>, time_ms: f32) -> Self {
        Self {
            name: name.into(),
            time_ms: Some(time_ms),
        }
    }
}

/// Queue of pending events plus the objects subscribed to each name.
///
/// Events sent while a frame is being processed are delivered on the next
/// call to [`crate::scene::Scene::dispatch_events`].
#[derive(Debug, Default)]
pub struct EventBus {
    pending: VecDeque<EventMessage>,
    subscriptions: HashMap<String, Vec<ObjectId>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, name: impl Into<String>) {
        self.post(EventMessage::new(name));
    }

    pub fn post(&mut self, message: EventMessage) {
        tracing::trace!(event = %message.name, "event queued");
        self.pending.push_back(message);
    }

    pub fn subscribe(&mut self, event: impl Into<String>, id: ObjectId) {
        let ids = self.subscriptions.entry(event.into()).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    pub fn unsubscribe_all(&mut self, id: ObjectId) {
        for ids in self.subscriptions.values_mut() {
            ids.retain(|other| *other != id);
        }
        self.subscriptions.retain(|_, ids| !ids.is_empty());
    }

    pub fn subscribers(&self, event: &str) -> &[ObjectId] {
        self.subscriptions
            .get(event)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_subscribed(&self, event: &str, id: ObjectId) -> bool {
        self.subscribers(event).contains(&id)
    }

    /// Takes every pending event in send order.
    pub fn drain(&mut self) -> Vec<EventMessage> {
        self.pending.drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
