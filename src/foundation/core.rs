use crate::foundation::error::{HuploError, HuploResult};

pub use kurbo::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> HuploResult<Self> {
        if width == 0 || height == 0 {
            return Err(HuploError::validation("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

impl Default for Canvas {
    // Used for slide-in placement before the first frame reports its real size.
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
        }
    }
}

/// Per-frame timing handed down from the frame pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    pub canvas: Canvas,
    pub timestamp_s: f64,
    pub dt_s: f64, // seconds since the previous frame, >= 0
}

impl FrameTick {
    pub fn new(canvas: Canvas, timestamp_s: f64, dt_s: f64) -> Self {
        Self {
            canvas,
            timestamp_s,
            dt_s: if dt_s.is_finite() { dt_s.max(0.0) } else { 0.0 },
        }
    }
}

/// Straight (non-premultiplied) RGBA8; also the brush type for text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const YELLOW: Self = Self {
        r: 255,
        g: 255,
        b: 0,
        a: 255,
    };

    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
