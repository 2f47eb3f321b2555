use chrono::{DateTime, Utc};

use crate::{
    foundation::{
        core::{Canvas, FrameTick, Point},
        error::{HuploError, HuploResult},
    },
    overlay::{
        Drawable,
        message::{DEFAULT_ENTER_S, Message, MessageId},
    },
    render::text::{TextPainter, TextStyle},
};

// New messages are created here and immediately moved by `slide_in`.
const SPAWN_X: f64 = -900.0;

/// Settings for one named queue; this is the serialized form the command channel accepts.
///
/// `speed` and `pause_s` are carried for compatibility but do not drive timing: messages
/// leave when their time-to-live runs out.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    #[serde(alias = "size")]
    pub capacity: usize,
    #[serde(alias = "y")]
    pub baseline_y: f64,
    pub speed: f64,
    #[serde(alias = "pause_in_seconds")]
    pub pause_s: f64,
    pub enter_s: f64,
    pub style: TextStyle,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            baseline_y: 550.0,
            speed: 200.0,
            pause_s: 3.0,
            enter_s: DEFAULT_ENTER_S,
            style: TextStyle::default(),
        }
    }
}

impl QueueConfig {
    pub fn from_json(s: &str) -> HuploResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| HuploError::config(format!("invalid queue config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> HuploResult<()> {
        if !self.baseline_y.is_finite() {
            return Err(HuploError::config("baseline_y must be finite"));
        }
        for (field, v) in [
            ("speed", self.speed),
            ("pause_s", self.pause_s),
            ("enter_s", self.enter_s),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(HuploError::config(format!(
                    "{field} must be finite and >= 0"
                )));
            }
        }
        self.style
            .validate()
            .map_err(|e| HuploError::config(format!("style: {e}")))
    }
}

/// Ordered, capacity-bounded set of messages for one channel.
#[derive(Clone, Debug)]
pub struct Queue {
    name: String,
    config: QueueConfig,
    messages: Vec<Message>,
    next_id: u64,
    canvas: Canvas,
}

impl Queue {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            name: String::new(),
            config,
            messages: Vec::new(),
            next_id: 0,
            canvas: Canvas::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    /// Nudge every viable message up one row, then slide `text` in if there is room.
    ///
    /// The reflow happens even when the new message is dropped for lack of capacity.
    pub fn add(&mut self, text: impl Into<String>) -> Option<MessageId> {
        for msg in &mut self.messages {
            if msg.is_viable() {
                msg.slide_up();
            }
        }

        if self.messages.len() >= self.config.capacity {
            tracing::debug!(
                queue = %self.name,
                capacity = self.config.capacity,
                "queue full; message dropped"
            );
            return None;
        }

        let id = MessageId(self.next_id);
        self.next_id += 1;
        let baseline = self.config.baseline_y;
        let mut msg = Message::new(
            id,
            text,
            self.config.style.clone(),
            Point::new(SPAWN_X, baseline),
        )
        .with_enter_duration(self.config.enter_s);
        msg.slide_in(baseline, self.canvas);
        self.messages.push(msg);
        Some(id)
    }

    /// Remove the message with `id`; returns false when it is already gone.
    pub fn remove(&mut self, id: MessageId) -> bool {
        match self.messages.iter().position(|m| m.id() == id) {
            Some(idx) => {
                self.messages.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Drop every message; their pending animations are discarded without running.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Advance every message, then detach those whose exit finished.
    pub fn update(&mut self, dt_s: f64) {
        for msg in &mut self.messages {
            msg.do_update(dt_s);
        }

        let detached: Vec<MessageId> = self
            .messages
            .iter()
            .filter(|m| m.is_removed())
            .map(Message::id)
            .collect();
        for id in detached {
            self.remove(id);
        }
    }

    /// Update pass followed by a draw pass over the survivors.
    ///
    /// A message that fails to draw is skipped; the remaining messages still draw and
    /// the failure count is reported afterwards.
    pub fn on_draw_at(
        &mut self,
        painter: &mut dyn TextPainter,
        tick: FrameTick,
        now: DateTime<Utc>,
    ) -> HuploResult<()> {
        self.canvas = tick.canvas;
        self.update(tick.dt_s);

        let mut failed = 0usize;
        for msg in &self.messages {
            if let Err(err) = msg.draw_at(painter, tick.canvas, now) {
                failed += 1;
                tracing::debug!(
                    queue = %self.name,
                    id = msg.id().0,
                    error = %err,
                    "message draw failed; skipped this frame"
                );
            }
        }

        if failed > 0 {
            return Err(HuploError::render(format!(
                "{failed} of {} messages in queue '{}' failed to draw",
                self.messages.len(),
                self.name
            )));
        }
        Ok(())
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl Drawable for Queue {
    fn on_draw(&mut self, painter: &mut dyn TextPainter, tick: FrameTick) -> HuploResult<()> {
        self.on_draw_at(painter, tick, Utc::now())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/queue.rs"]
mod tests;
