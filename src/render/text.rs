use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{Canvas, Point, Rgba8},
        error::{HuploError, HuploResult},
    },
    render::markup::parse_markup,
};

/// How a message's text is laid out and painted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub size_px: f32,
    pub color: Rgba8,
    /// Wrap width; `None` wraps at the canvas width.
    pub max_width_px: Option<f32>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size_px: 16.0,
            color: Rgba8::YELLOW,
            max_width_px: None,
        }
    }
}

impl TextStyle {
    pub fn validate(&self) -> HuploResult<()> {
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(HuploError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        if let Some(w) = self.max_width_px
            && (!w.is_finite() || w <= 0.0)
        {
            return Err(HuploError::validation(
                "text max_width_px must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Rendering collaborator: lays out word-wrapped text and paints it with its top-left
/// corner at `origin`.
///
/// `text` may carry inline markup (see [`crate::render::markup`]); malformed markup is a
/// [`HuploError::Render`].
pub trait TextPainter {
    fn paint_text(
        &mut self,
        canvas: Canvas,
        origin: Point,
        text: &str,
        style: &TextStyle,
    ) -> HuploResult<()>;
}

/// Painter that collects one frame's text into a premultiplied RGBA8 layer.
pub trait LayerPainter: TextPainter {
    fn begin_frame(&mut self, canvas: Canvas) -> HuploResult<()>;
    /// Rasterize everything painted since `begin_frame`.
    fn finish_frame(&mut self) -> HuploResult<Arc<Vec<u8>>>;
}

/// Stateful helper for building Parley text layouts from one registered font.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    pub fn new(font_bytes: &[u8]) -> HuploResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            HuploError::validation("no font families registered from font bytes")
        })?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| HuploError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn layout(
        &mut self,
        text: &str,
        style: &TextStyle,
        max_width_px: Option<f32>,
    ) -> HuploResult<parley::Layout<Rgba8>> {
        style.validate()?;
        let markup = parse_markup(text)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &markup.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(style.color));

        for span in &markup.spans {
            let range = span.range.clone();
            if let Some(weight) = span.style.weight {
                builder.push(
                    parley::style::StyleProperty::FontWeight(parley::style::FontWeight::new(
                        weight,
                    )),
                    range.clone(),
                );
            }
            if let Some(italic) = span.style.italic {
                let font_style = if italic {
                    parley::style::FontStyle::Italic
                } else {
                    parley::style::FontStyle::Normal
                };
                builder.push(parley::style::StyleProperty::FontStyle(font_style), range.clone());
            }
            if let Some(color) = span.style.color {
                builder.push(parley::style::StyleProperty::Brush(color), range);
            }
        }

        let mut layout: parley::Layout<Rgba8> = builder.build(&markup.text);
        match style.max_width_px.or(max_width_px) {
            Some(w) => {
                layout.break_all_lines(Some(w));
                layout.align(
                    Some(w),
                    parley::Alignment::Start,
                    parley::AlignmentOptions::default(),
                );
            }
            None => layout.break_all_lines(None),
        }

        Ok(layout)
    }
}

/// CPU text painter backed by `vello_cpu`.
///
/// Paint calls between [`LayerPainter::begin_frame`] and [`LayerPainter::finish_frame`]
/// accumulate into one transparent overlay layer.
pub struct CpuTextPainter {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    frame: Option<FrameLayer>,
}

struct FrameLayer {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
}

impl CpuTextPainter {
    pub fn new(font_bytes: Vec<u8>) -> HuploResult<Self> {
        let engine = TextLayoutEngine::new(&font_bytes)?;
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            engine,
            font,
            frame: None,
        })
    }

    pub fn from_font_file(path: &Path) -> HuploResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::new(bytes)
    }

    pub fn family_name(&self) -> &str {
        self.engine.family_name()
    }
}

impl TextPainter for CpuTextPainter {
    fn paint_text(
        &mut self,
        canvas: Canvas,
        origin: Point,
        text: &str,
        style: &TextStyle,
    ) -> HuploResult<()> {
        let layer = self
            .frame
            .as_mut()
            .ok_or_else(|| HuploError::render("paint_text called outside a frame"))?;
        if layer.canvas != canvas {
            return Err(HuploError::render(format!(
                "paint canvas {}x{} does not match frame canvas {}x{}",
                canvas.width, canvas.height, layer.canvas.width, layer.canvas.height
            )));
        }

        let layout = self
            .engine
            .layout(text, style, Some(canvas.width as f32))?;

        let ctx = &mut layer.ctx;
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

impl LayerPainter for CpuTextPainter {
    fn begin_frame(&mut self, canvas: Canvas) -> HuploResult<()> {
        let (width, height) = canvas_u16(canvas)?;
        self.frame = Some(FrameLayer {
            canvas,
            ctx: vello_cpu::RenderContext::new(width, height),
        });
        Ok(())
    }

    fn finish_frame(&mut self) -> HuploResult<Arc<Vec<u8>>> {
        let mut layer = self
            .frame
            .take()
            .ok_or_else(|| HuploError::render("finish_frame called without begin_frame"))?;
        let (width, height) = canvas_u16(layer.canvas)?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        layer.ctx.flush();
        layer.ctx.render_to_pixmap(&mut pixmap);
        Ok(Arc::new(pixmap.data_as_u8_slice().to_vec()))
    }
}

fn canvas_u16(canvas: Canvas) -> HuploResult<(u16, u16)> {
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| HuploError::render("canvas width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| HuploError::render("canvas height exceeds u16"))?;
    Ok((width, height))
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
