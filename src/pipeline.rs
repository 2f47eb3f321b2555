use crate::{
    foundation::{
        core::{Canvas, FrameTick, Point, Rgba8},
        error::{HuploError, HuploResult},
    },
    overlay::manager::SharedQueueManager,
    render::{
        composite::over_in_place,
        text::{LayerPainter, TextPainter, TextStyle},
    },
};

/// One video frame as premultiplied RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRgba {
    pub fn solid(canvas: Canvas, color: Rgba8) -> Self {
        let px = color.to_premul();
        let data = px.repeat(canvas.pixel_len() / 4);
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    pub fn canvas(&self) -> HuploResult<Canvas> {
        let canvas = Canvas::new(self.width, self.height)?;
        if self.data.len() != canvas.pixel_len() {
            return Err(HuploError::render(format!(
                "frame buffer is {} bytes, expected {} for {}x{}",
                self.data.len(),
                canvas.pixel_len(),
                self.width,
                self.height
            )));
        }
        Ok(canvas)
    }
}

/// Frame-stream hook: turns buffer timestamps into frame ticks and composites the
/// overlay onto each frame.
pub struct OverlayPipeline<P: LayerPainter> {
    manager: SharedQueueManager,
    painter: P,
    last_timestamp_s: Option<f64>,
}

impl<P: LayerPainter> OverlayPipeline<P> {
    pub fn new(manager: SharedQueueManager, painter: P) -> Self {
        Self {
            manager,
            painter,
            last_timestamp_s: None,
        }
    }

    pub fn manager(&self) -> &SharedQueueManager {
        &self.manager
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    /// Seconds since the previous frame; 0 for the first frame and for timestamps that go
    /// backwards.
    fn next_dt(&mut self, timestamp_s: f64) -> f64 {
        let dt = match self.last_timestamp_s {
            Some(prev) => timestamp_s - prev,
            None => 0.0,
        };
        if timestamp_s.is_finite() {
            self.last_timestamp_s = Some(timestamp_s);
        }
        if dt.is_finite() { dt.max(0.0) } else { 0.0 }
    }

    /// Draw the overlay onto `frame`. Failures are logged and leave the frame untouched;
    /// the stream never stops because of the overlay.
    ///
    /// Messages advance by the frame's dt even when no layer can be drawn, so their age
    /// keeps following stream time.
    #[tracing::instrument(level = "trace", skip(self, frame), fields(w = frame.width, h = frame.height))]
    pub fn process_frame(&mut self, frame: &mut FrameRgba, timestamp_s: f64) {
        let dt_s = self.next_dt(timestamp_s);
        let canvas = Canvas::new(frame.width, frame.height).unwrap_or_default();
        let tick = FrameTick::new(canvas, timestamp_s, dt_s);

        if let Err(err) = self.begin_layer(frame) {
            tracing::warn!(error = %err, timestamp_s, "overlay layer unavailable; advancing only");
            self.manager.on_draw(&mut SkipPainter, tick);
            return;
        }

        self.manager.on_draw(&mut self.painter, tick);
        if let Err(err) = self.composite_layer(frame) {
            tracing::warn!(error = %err, timestamp_s, "overlay draw failed; frame passed through");
        }
    }

    fn begin_layer(&mut self, frame: &FrameRgba) -> HuploResult<()> {
        let canvas = frame.canvas()?;
        self.painter.begin_frame(canvas)
    }

    fn composite_layer(&mut self, frame: &mut FrameRgba) -> HuploResult<()> {
        let layer = self.painter.finish_frame()?;
        over_in_place(&mut frame.data, &layer)
    }
}

// Stands in for the real painter on frames that cannot carry an overlay.
struct SkipPainter;

impl TextPainter for SkipPainter {
    fn paint_text(&mut self, _: Canvas, _: Point, _: &str, _: &TextStyle) -> HuploResult<()> {
        Ok(())
    }
}

