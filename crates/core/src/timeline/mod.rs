use serde::{Deserialize, Serialize};

/// Scene-local clock in milliseconds, driven by the per-frame delta.
#[derive(Debug, Default, Clone)]
pub struct SceneClock {
    pub time_ms: f32,
}

impl SceneClock {
    pub fn reset(&mut self) {
        self.time_ms = 0.0;
    }

    pub fn advance(&mut self, delta: f32) {
        self.time_ms = (self.time_ms + delta).max(0.0);
    }
}

/// Event scheduled to fire once the queue's own clock reaches `fire_at_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub fire_at_ms: f32,
    pub name: String,
}

impl ScheduledEvent {
    pub fn new(fire_at_ms: f32, name: impl Into<String>) -> Self {
        Self {
            fire_at_ms,
            name: name.into(),
        }
    }
}

/// Delayed scene events (scene timeout, scene change after a fade-out, ...).
#[derive(Debug, Default)]
pub struct EventQueue {
    clock: SceneClock,
    events: Vec<ScheduledEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `name` to fire `delay_ms` from now.
    pub fn queue_event(&mut self, name: impl Into<String>, delay_ms: f32) {
        let event = ScheduledEvent::new(self.clock.time_ms + delay_ms.max(0.0), name);
        let index = self
            .events
            .partition_point(|queued| queued.fire_at_ms <= event.fire_at_ms);
        self.events.insert(index, event);
    }

    /// Advances the clock and returns due events in firing order.
    pub fn update(&mut self, delta: f32) -> Vec<ScheduledEvent> {
        self.clock.advance(delta);
        let due = self
            .events
            .partition_point(|queued| queued.fire_at_ms <= self.clock.time_ms);
        self.events.drain(..due).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.clock.reset();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_events_in_time_order() {
        let mut queue = EventQueue::new();
        queue.queue_event("Late", 300.0);
        queue.queue_event("Early", 100.0);
        queue.queue_event("Tie", 100.0);

        assert!(queue.update(50.0).is_empty());
        let names: Vec<_> = queue.update(60.0).into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["Early", "Tie"]);
        assert_eq!(queue.len(), 1);

        let names: Vec<_> = queue.update(500.0).into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["Late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn delays_count_from_the_current_time() {
        let mut queue = EventQueue::new();
        queue.update(1000.0);
        queue.queue_event("Timeout", 10.0);
        assert_eq!(queue.update(10.0).len(), 1);
    }

    #[test]
    fn clock_never_goes_negative() {
        let mut clock = SceneClock::default();
        clock.advance(-5.0);
        assert_eq!(clock.time_ms, 0.0);
    }
}
