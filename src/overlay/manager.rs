use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::{
    foundation::{core::FrameTick, error::HuploResult},
    overlay::{Drawable, command::Command, message::MessageId, queue::Queue},
    render::text::TextPainter,
};

/// Named queues plus the per-frame draw entry point.
///
/// Commands naming an unknown queue are ignored. Drawing never fails as a whole: a queue
/// that reports an error is logged and the remaining queues still draw.
#[derive(Clone, Debug, Default)]
pub struct QueueManager {
    queues: BTreeMap<String, Queue>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `queue` under `name`, returning whatever it replaced.
    pub fn add_queue(&mut self, name: &str, mut queue: Queue) -> Option<Queue> {
        queue.set_name(name);
        self.queues.insert(name.to_string(), queue)
    }

    pub fn add_message(&mut self, name: &str, text: impl Into<String>) -> Option<MessageId> {
        let Some(queue) = self.queues.get_mut(name) else {
            tracing::debug!(queue = name, "add_message for unknown queue ignored");
            return None;
        };
        queue.add(text)
    }

    pub fn remove_queue(&mut self, name: &str) -> Option<Queue> {
        let removed = self.queues.remove(name);
        if removed.is_none() {
            tracing::debug!(queue = name, "remove_queue for unknown queue ignored");
        }
        removed
    }

    pub fn clear_queue(&mut self, name: &str) -> bool {
        match self.queues.get_mut(name) {
            Some(queue) => {
                queue.clear();
                true
            }
            None => {
                tracing::debug!(queue = name, "clear_queue for unknown queue ignored");
                false
            }
        }
    }

    pub fn clear_all_queues(&mut self) {
        self.queues.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Queue> {
        self.queues.get(name)
    }

    pub fn queue_names(&self) -> impl Iterator<Item = &str> {
        self.queues.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    #[tracing::instrument(level = "trace", skip(self, painter), fields(queues = self.queues.len()))]
    pub fn on_draw_at(
        &mut self,
        painter: &mut dyn TextPainter,
        tick: FrameTick,
        now: DateTime<Utc>,
    ) {
        for (name, queue) in &mut self.queues {
            if let Err(err) = queue.on_draw_at(painter, tick, now) {
                tracing::warn!(queue = %name, error = %err, "queue draw failed");
            }
        }
    }
}

impl Drawable for QueueManager {
    fn on_draw(&mut self, painter: &mut dyn TextPainter, tick: FrameTick) -> HuploResult<()> {
        self.on_draw_at(painter, tick, Utc::now());
        Ok(())
    }
}

/// Clonable handle shared by the command channel and the frame pipeline.
///
/// Every command and every frame pass holds the lock for its whole duration.
#[derive(Clone, Debug, Default)]
pub struct SharedQueueManager {
    inner: Arc<Mutex<QueueManager>>,
}

impl SharedQueueManager {
    pub fn new(manager: QueueManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub fn apply(&self, cmd: Command) -> HuploResult<()> {
        cmd.apply_to(&mut self.inner.lock())
    }

    pub fn on_draw(&self, painter: &mut dyn TextPainter, tick: FrameTick) {
        self.inner.lock().on_draw_at(painter, tick, Utc::now());
    }

    /// Run `f` with exclusive access to the manager.
    pub fn with<R>(&self, f: impl FnOnce(&mut QueueManager) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/manager.rs"]
mod tests;
