//! Inline message markup.
//!
//! A small Pango-compatible subset: `<b>`, `<i>` and `<span>` with `foreground`
//! (alias `fgcolor`, `color`), `weight` and `style` attributes, plus the XML entities
//! `&lt; &gt; &amp; &quot; &apos;` and numeric character references.

use std::ops::Range;

use crate::foundation::{
    core::Rgba8,
    error::{HuploError, HuploResult},
};

const WEIGHT_NORMAL: f32 = 400.0;
const WEIGHT_BOLD: f32 = 700.0;

/// Style overrides carried by one tag; `None` inherits from the enclosing text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpanStyle {
    pub weight: Option<f32>,
    pub italic: Option<bool>,
    pub color: Option<Rgba8>,
}

/// A styled byte range of [`Markup::text`].
#[derive(Clone, Debug, PartialEq)]
pub struct StyledSpan {
    pub range: Range<usize>,
    pub style: SpanStyle,
}

/// Plain text plus its styled ranges.
///
/// Spans are ordered by where their tags open, so an inner tag follows the tag that
/// encloses it and wins where both set the same property.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Markup {
    pub text: String,
    pub spans: Vec<StyledSpan>,
}

/// Parse `src`; unbalanced or unknown tags, bad attribute values and unknown entities
/// are render errors.
pub fn parse_markup(src: &str) -> HuploResult<Markup> {
    let mut out = Markup::default();
    let mut open: Vec<(&str, usize)> = Vec::new();
    let mut rest = src;

    while let Some(idx) = rest.find(['<', '&']) {
        out.text.push_str(&rest[..idx]);
        rest = &rest[idx..];

        if let Some(after) = rest.strip_prefix('&') {
            let end = after
                .find(';')
                .ok_or_else(|| malformed("unterminated entity"))?;
            out.text.push(entity(&after[..end])?);
            rest = &after[end + 1..];
            continue;
        }

        let end = rest.find('>').ok_or_else(|| malformed("unterminated tag"))?;
        let tag = rest[1..end].trim();
        rest = &rest[end + 1..];

        if let Some(name) = tag.strip_prefix('/') {
            let name = name.trim();
            let Some((open_name, span_idx)) = open.pop() else {
                return Err(malformed(format!("</{name}> closes nothing")));
            };
            if open_name != name {
                return Err(malformed(format!("expected </{open_name}>, found </{name}>")));
            }
            out.spans[span_idx].range.end = out.text.len();
        } else {
            let (name, attrs) = tag.split_once(char::is_whitespace).unwrap_or((tag, ""));
            let style = tag_style(name, attrs)?;
            open.push((name, out.spans.len()));
            let at = out.text.len();
            out.spans.push(StyledSpan {
                range: at..at,
                style,
            });
        }
    }
    out.text.push_str(rest);

    if let Some((name, _)) = open.last() {
        return Err(malformed(format!("<{name}> is never closed")));
    }
    out.spans.retain(|span| !span.range.is_empty());
    Ok(out)
}

fn malformed(msg: impl std::fmt::Display) -> HuploError {
    HuploError::render(format!("malformed markup: {msg}"))
}

fn tag_style(name: &str, attrs: &str) -> HuploResult<SpanStyle> {
    let mut style = SpanStyle::default();
    match name {
        "b" => style.weight = Some(WEIGHT_BOLD),
        "i" => style.italic = Some(true),
        "span" => {
            for (key, value) in attributes(attrs)? {
                match key {
                    "foreground" | "fgcolor" | "color" => style.color = Some(color(value)?),
                    "weight" => style.weight = Some(weight(value)?),
                    "style" => style.italic = Some(italic(value)?),
                    _ => return Err(malformed(format!("unknown span attribute '{key}'"))),
                }
            }
            return Ok(style);
        }
        "" => return Err(malformed("empty tag")),
        _ => return Err(malformed(format!("unknown tag <{name}>"))),
    }
    if !attrs.trim().is_empty() {
        return Err(malformed(format!("<{name}> takes no attributes")));
    }
    Ok(style)
}

fn attributes(mut src: &str) -> HuploResult<Vec<(&str, &str)>> {
    let mut out = Vec::new();
    loop {
        src = src.trim_start();
        if src.is_empty() {
            return Ok(out);
        }
        let (key, after) = src
            .split_once('=')
            .ok_or_else(|| malformed(format!("attribute without value in '{src}'")))?;
        let after = after.trim_start();
        let quote = after
            .chars()
            .next()
            .filter(|c| *c == '"' || *c == '\'')
            .ok_or_else(|| malformed(format!("unquoted value for '{}'", key.trim())))?;
        let body = &after[1..];
        let end = body
            .find(quote)
            .ok_or_else(|| malformed(format!("unterminated value for '{}'", key.trim())))?;
        out.push((key.trim(), &body[..end]));
        src = &body[end + 1..];
    }
}

fn entity(name: &str) -> HuploResult<char> {
    let c = match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => match name.strip_prefix('#') {
            Some(num) => match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse().ok(),
            }
            .and_then(char::from_u32),
            None => None,
        },
    };
    c.ok_or_else(|| malformed(format!("unknown entity '&{name};'")))
}

fn color(value: &str) -> HuploResult<Rgba8> {
    let named = |r, g, b| Ok(Rgba8 { r, g, b, a: 255 });
    match value.to_ascii_lowercase().as_str() {
        "black" => return named(0, 0, 0),
        "white" => return named(255, 255, 255),
        "red" => return named(255, 0, 0),
        "green" => return named(0, 255, 0),
        "blue" => return named(0, 0, 255),
        "yellow" => return named(255, 255, 0),
        "cyan" => return named(0, 255, 255),
        "magenta" => return named(255, 0, 255),
        "gray" | "grey" => return named(190, 190, 190),
        _ => {}
    }

    let bad = || malformed(format!("bad color '{value}'"));
    let hex = value.strip_prefix('#').ok_or_else(bad)?;
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return Err(bad());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
    Ok(Rgba8 {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
        a: if hex.len() == 8 { channel(6)? } else { 255 },
    })
}

fn weight(value: &str) -> HuploResult<f32> {
    match value {
        "light" => Ok(300.0),
        "normal" => Ok(WEIGHT_NORMAL),
        "bold" => Ok(WEIGHT_BOLD),
        "heavy" => Ok(900.0),
        _ => value
            .parse::<f32>()
            .ok()
            .filter(|w| (1.0..=1000.0).contains(w))
            .ok_or_else(|| malformed(format!("bad weight '{value}'"))),
    }
}

fn italic(value: &str) -> HuploResult<bool> {
    match value {
        "normal" => Ok(false),
        "italic" | "oblique" => Ok(true),
        _ => Err(malformed(format!("bad style '{value}'"))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/markup.rs"]
mod tests;
