pub mod command;
pub mod live_date;
pub mod manager;
pub mod message;
pub mod queue;

use crate::{
    foundation::{core::FrameTick, error::HuploResult},
    render::text::TextPainter,
};

/// Anything the frame pipeline can ask to draw itself once per frame.
pub trait Drawable {
    fn on_draw(&mut self, painter: &mut dyn TextPainter, tick: FrameTick) -> HuploResult<()>;
}
