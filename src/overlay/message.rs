use chrono::{DateTime, Utc};

use crate::{
    animation::{
        ease::Ease,
        tween::{Animatable, Animation, Attr, advance_chain},
    },
    foundation::{
        core::{Canvas, FrameTick, Point},
        error::HuploResult,
    },
    overlay::{Drawable, live_date::resolve_live_dates},
    render::text::{TextPainter, TextStyle},
};

/// Seconds a message stays viable before it slides out.
pub const MESSAGE_TTL_S: f64 = 10.0;

pub const DEFAULT_ENTER_S: f64 = 2.5;
const ENTER_X: f64 = 50.0;
const OFFSCREEN_MARGIN: f64 = 20.0;
const REFLOW_DY: f64 = -30.0;
const REFLOW_S: f64 = 1.0;
const EXIT_DX: f64 = 1200.0;
const EXIT_S: f64 = 1.0;

const ENTER: &str = "enter";
const REFLOW: &str = "reflow";
const EXIT: &str = "exit";
const REMOVE: &str = "remove";

/// Handle of a message within its owning queue.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MessageId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageState {
    Entering,
    Idle,
    ReflowingUp,
    Exiting,
    Removed,
}

/// One on-screen notification.
#[derive(Clone, Debug)]
pub struct Message {
    id: MessageId,
    text: String,
    style: TextStyle,
    pos: Point,
    enter_s: f64,
    time_alive_s: f64,
    animation: Option<Animation>,
    entered: bool,
    exiting: bool,
    removed: bool,
}

impl Message {
    pub fn new(id: MessageId, text: impl Into<String>, style: TextStyle, pos: Point) -> Self {
        Self {
            id,
            text: text.into(),
            style,
            pos,
            enter_s: DEFAULT_ENTER_S,
            time_alive_s: 0.0,
            animation: None,
            entered: false,
            exiting: false,
            removed: false,
        }
    }

    pub fn with_enter_duration(mut self, enter_s: f64) -> Self {
        self.enter_s = enter_s;
        self
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn time_alive_s(&self) -> f64 {
        self.time_alive_s
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    pub fn is_viable(&self) -> bool {
        self.time_alive_s < MESSAGE_TTL_S
    }

    /// True once the exit has been queued, including after removal.
    pub fn exit_started(&self) -> bool {
        self.exiting
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn state(&self) -> MessageState {
        if self.removed {
            return MessageState::Removed;
        }
        if self.exiting {
            return MessageState::Exiting;
        }
        match self.animation.as_ref().and_then(Animation::label) {
            Some(ENTER) => MessageState::Entering,
            Some(REFLOW) => MessageState::ReflowingUp,
            _ => MessageState::Idle,
        }
    }

    /// Place the message just past the right edge at row `y` and bounce it in to `x = 50`.
    ///
    /// Only the first call has an effect.
    pub fn slide_in(&mut self, y: f64, canvas: Canvas) {
        if self.entered {
            tracing::warn!(id = self.id.0, "slide_in ignored for a message that already entered");
            return;
        }
        self.entered = true;
        self.pos = Point::new(f64::from(canvas.width) + OFFSCREEN_MARGIN, y);
        let enter = |duration_s| {
            Animation::to(&[(Attr::Y, y), (Attr::X, ENTER_X)], duration_s, Ease::OutBounce)
                .with_label(ENTER)
        };
        let mut anim = enter(self.enter_s);
        if let Err(err) = anim.validate() {
            tracing::warn!(id = self.id.0, error = %err, "invalid entrance; using the default");
            anim = enter(DEFAULT_ENTER_S);
        }
        self.animation = Some(anim);
    }

    /// Queue a move one row up behind whatever is already running.
    pub fn slide_up(&mut self) {
        if self.exiting || self.removed {
            return;
        }
        let up = Animation::to_relative(&*self, 0.0, REFLOW_DY, REFLOW_S, Ease::Linear)
            .with_label(REFLOW);
        self.chain(up);
    }

    /// Queue the exit: fly off to the right, then detach from the queue.
    pub fn slide_out(&mut self) {
        if self.exiting || self.removed {
            return;
        }
        self.exiting = true;
        let out = Animation::to_relative(&*self, EXIT_DX, 0.0, EXIT_S, Ease::InCubic)
            .with_label(EXIT)
            .then(Animation::detach().with_label(REMOVE));
        self.chain(out);
    }

    fn chain(&mut self, next: Animation) {
        if let Err(err) = next.validate() {
            tracing::warn!(id = self.id.0, error = %err, "animation step dropped");
            return;
        }
        if let Some(anim) = self.animation.as_mut() {
            anim.append(next);
        } else {
            self.animation = Some(next);
        }
    }

    pub fn do_update(&mut self, dt_s: f64) {
        let dt_s = if dt_s.is_finite() { dt_s.max(0.0) } else { 0.0 };
        self.time_alive_s += dt_s;

        if !self.is_viable() {
            self.slide_out();
        }

        let chain = self.animation.take();
        self.animation = advance_chain(chain, self, dt_s);
    }

    /// Text with every live-date token resolved against `now`.
    pub fn resolved_text(&self, now: DateTime<Utc>) -> String {
        resolve_live_dates(&self.text, now).into_owned()
    }

    pub fn draw_at(
        &self,
        painter: &mut dyn TextPainter,
        canvas: Canvas,
        now: DateTime<Utc>,
    ) -> HuploResult<()> {
        if self.removed {
            return Ok(());
        }
        let text = self.resolved_text(now);
        painter.paint_text(canvas, self.pos, &text, &self.style)
    }
}

impl Animatable for Message {
    fn attr(&self, attr: Attr) -> f64 {
        match attr {
            Attr::X => self.pos.x,
            Attr::Y => self.pos.y,
        }
    }

    fn set_attr(&mut self, attr: Attr, value: f64) {
        match attr {
            Attr::X => self.pos.x = value,
            Attr::Y => self.pos.y = value,
        }
    }

    fn detach(&mut self) {
        self.removed = true;
    }
}

impl Drawable for Message {
    fn on_draw(&mut self, painter: &mut dyn TextPainter, tick: FrameTick) -> HuploResult<()> {
        self.draw_at(painter, tick.canvas, Utc::now())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/message.rs"]
mod tests;
