//! Animated text overlays for live video frames.
//!
//! Named queues of short messages slide in, reflow upward as newer ones arrive, expire,
//! and slide out. A [`SharedQueueManager`] receives [`Command`]s from any thread while an
//! [`OverlayPipeline`] draws the current state onto each frame.
#![forbid(unsafe_code)]

pub mod animation;
pub mod config;
pub mod foundation;
pub mod overlay;
pub mod pipeline;
pub mod render;

pub use animation::{
    ease::Ease,
    tween::{Advance, Animatable, Animation, Attr, Link},
};
pub use config::OverlayConfig;
pub use foundation::{
    core::{Canvas, FrameTick, Point, Rgba8},
    error::{HuploError, HuploResult},
};
pub use overlay::{
    Drawable,
    command::{Command, QueueSpec},
    live_date::resolve_live_dates,
    manager::{QueueManager, SharedQueueManager},
    message::{MESSAGE_TTL_S, Message, MessageId, MessageState},
    queue::{Queue, QueueConfig},
};
pub use pipeline::{FrameRgba, OverlayPipeline};
pub use render::{
    composite::over_in_place,
    text::{CpuTextPainter, LayerPainter, TextLayoutEngine, TextPainter, TextStyle},
};
