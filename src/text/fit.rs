//! Font-size search and word wrapping.
//!
//! Each template family has its own fitting routine. Both walk the font size
//! down from a ceiling one pixel at a time, re-wrap the headline at every
//! size, and stop at the first size whose wrapped block satisfies the line
//! and height budget. If no size qualifies the floor size is used anyway, so
//! the search always terminates with a usable layout.
//!
//! ## Standard overlay
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | Sizes | 18px → 9px, floor 8px |
//! | Max width | 0.95 × (canvas width − 10) |
//! | Line height | 1.1 × size |
//! | Budget | ≤ 3 lines, block ≤ 30 − 8 px |
//!
//! ## Branded overlay
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | Sizes | 32px → 13px, floor 12px |
//! | Max width | 0.8 × canvas width × variant factor (1.0 / 0.85 / 0.9) |
//! | Line height | 1.2 × size |
//! | Budget | ≤ 4 lines, block ≤ 35% of canvas height |

use serde::Serialize;

use super::font::FontSpec;
use super::MeasureText;
use crate::template::Variant;

/// Height of the standard template's text plaque.
pub const STANDARD_PLAQUE_HEIGHT: f32 = 30.0;
const STANDARD_MAX_SIZE: f32 = 18.0;
const STANDARD_MIN_SIZE: f32 = 8.0;
const STANDARD_MAX_LINES: usize = 3;
const STANDARD_LINE_HEIGHT: f32 = 1.1;
/// Vertical breathing room inside the plaque.
const STANDARD_PLAQUE_PADDING: f32 = 8.0;
/// Horizontal inset of the plaque text.
const STANDARD_SIDE_INSET: f32 = 10.0;
const STANDARD_WIDTH_RATIO: f32 = 0.95;

pub const BRANDED_MAX_SIZE: f32 = 32.0;
pub const BRANDED_MIN_SIZE: f32 = 12.0;
const BRANDED_MAX_LINES: usize = 4;
pub const BRANDED_LINE_HEIGHT: f32 = 1.2;
const BRANDED_HEIGHT_RATIO: f32 = 0.35;
const BRANDED_WIDTH_RATIO: f32 = 0.8;
/// Lookahead tolerance of the variant 2 wrapper.
pub const LOOKAHEAD_TOLERANCE: f32 = 1.05;

/// Result of fitting a headline into a text area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub lines: Vec<String>,
    pub font_size_px: f32,
    pub line_height_px: f32,
    /// Wrap width the lines were fitted against.
    pub max_width_px: f32,
}

impl LayoutResult {
    /// Total height of the wrapped block.
    pub fn block_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height_px
    }
}

/// Greedy wrap: a word joins the current line while the line still fits in
/// `max_width`. A word wider than `max_width` gets a line of its own.
pub fn wrap_greedy<M: MeasureText + ?Sized>(
    measurer: &M,
    words: &[&str],
    font: &FontSpec,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in words {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measurer.measure_text(&candidate, font) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, (*word).to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Greedy wrap with one-word lookahead.
///
/// When a word fits, the wrapper also tries the following word: if the line
/// with both stays within `tolerance × max_width` the two are merged and the
/// wrapper skips past them. Keeps short trailing words from being orphaned.
pub fn wrap_lookahead<M: MeasureText + ?Sized>(
    measurer: &M,
    words: &[&str],
    font: &FontSpec,
    max_width: f32,
    tolerance: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < words.len() {
        let word = words[i];
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if !current.is_empty() && measurer.measure_text(&candidate, font) > max_width {
            lines.push(std::mem::take(&mut current));
            continue;
        }

        if let Some(next) = words.get(i + 1) {
            let merged = format!("{} {}", candidate, next);
            if measurer.measure_text(&merged, font) <= max_width * tolerance {
                current = merged;
                i += 2;
                continue;
            }
        }

        current = candidate;
        i += 1;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Fit a headline into the 30px plaque of the standard templates.
pub fn fit_standard<M: MeasureText + ?Sized>(
    measurer: &M,
    headline: &str,
    canvas_width: f32,
    font: &FontSpec,
) -> LayoutResult {
    let words: Vec<&str> = headline.split_whitespace().collect();
    let max_width = STANDARD_WIDTH_RATIO * (canvas_width - STANDARD_SIDE_INSET).max(0.0);
    let max_height = STANDARD_PLAQUE_HEIGHT - STANDARD_PLAQUE_PADDING;

    let mut size = STANDARD_MAX_SIZE;
    while size > STANDARD_MIN_SIZE {
        let spec = font.with_size(size);
        let lines = wrap_greedy(measurer, &words, &spec, max_width);
        let line_height = size * STANDARD_LINE_HEIGHT;
        if lines.len() <= STANDARD_MAX_LINES && lines.len() as f32 * line_height <= max_height {
            return LayoutResult {
                lines,
                font_size_px: size,
                line_height_px: line_height,
                max_width_px: max_width,
            };
        }
        size -= 1.0;
    }

    let spec = font.with_size(STANDARD_MIN_SIZE);
    tracing::debug!(words = words.len(), "Standard headline hit the size floor");
    LayoutResult {
        lines: wrap_greedy(measurer, &words, &spec, max_width),
        font_size_px: STANDARD_MIN_SIZE,
        line_height_px: STANDARD_MIN_SIZE * STANDARD_LINE_HEIGHT,
        max_width_px: max_width,
    }
}

/// Effective wrap width for a branded variant.
pub fn branded_max_width(canvas_width: f32, variant: Variant) -> f32 {
    canvas_width * BRANDED_WIDTH_RATIO * variant.width_factor()
}

/// Fit a headline into the branded text area (35% of the canvas height).
pub fn fit_branded<M: MeasureText + ?Sized>(
    measurer: &M,
    headline: &str,
    canvas_width: f32,
    canvas_height: f32,
    variant: Variant,
    font: &FontSpec,
) -> LayoutResult {
    let words: Vec<&str> = headline.split_whitespace().collect();
    let max_width = branded_max_width(canvas_width, variant);
    let max_height = canvas_height * BRANDED_HEIGHT_RATIO;

    let wrap = |spec: &FontSpec| match variant {
        Variant::StructuredPlaque => {
            wrap_lookahead(measurer, &words, spec, max_width, LOOKAHEAD_TOLERANCE)
        }
        _ => wrap_greedy(measurer, &words, spec, max_width),
    };

    let mut size = BRANDED_MAX_SIZE;
    while size > BRANDED_MIN_SIZE {
        let spec = font.with_size(size);
        let lines = wrap(&spec);
        let line_height = size * BRANDED_LINE_HEIGHT;
        if lines.len() <= BRANDED_MAX_LINES && lines.len() as f32 * line_height <= max_height {
            return LayoutResult {
                lines,
                font_size_px: size,
                line_height_px: line_height,
                max_width_px: max_width,
            };
        }
        size -= 1.0;
    }

    let spec = font.with_size(BRANDED_MIN_SIZE);
    tracing::debug!(?variant, words = words.len(), "Branded headline hit the size floor");
    LayoutResult {
        lines: wrap(&spec),
        font_size_px: BRANDED_MIN_SIZE,
        line_height_px: BRANDED_MIN_SIZE * BRANDED_LINE_HEIGHT,
        max_width_px: max_width,
    }
}
