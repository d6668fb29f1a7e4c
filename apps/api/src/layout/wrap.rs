//! Greedy word-wrap against measured glyph widths.

use crate::layout::font_metrics::FontMetricTable;

/// Wraps `text` into lines no wider than `max_width_pt` at `size_pt`.
///
/// Words are packed greedily and a line breaks at the last word boundary that
/// fits. A single word wider than the column is split at character boundaries,
/// keeping at least one character per line. Whitespace-only input yields no lines.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;
    let space_w = metrics.space_width * size_pt;

    for word in text.split_whitespace() {
        let word_w = metrics.measure_pt(word, size_pt);

        if current.is_empty() {
            if word_w <= max_width_pt {
                current.push_str(word);
                current_width = word_w;
            } else {
                current_width = push_broken_word(
                    word,
                    metrics,
                    size_pt,
                    max_width_pt,
                    &mut lines,
                    &mut current,
                );
            }
        } else if current_width + space_w + word_w <= max_width_pt {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        } else {
            lines.push(std::mem::take(&mut current));
            if word_w <= max_width_pt {
                current.push_str(word);
                current_width = word_w;
            } else {
                current_width = push_broken_word(
                    word,
                    metrics,
                    size_pt,
                    max_width_pt,
                    &mut lines,
                    &mut current,
                );
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits an over-wide word into full lines pushed onto `lines`; the trailing
/// fragment is left in `current` so following words can join it. Returns the
/// fragment's width.
fn push_broken_word(
    word: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_pt: f32,
    lines: &mut Vec<String>,
    current: &mut String,
) -> f32 {
    let mut width = 0.0_f32;
    for c in word.chars() {
        let char_w = metrics.char_width(c) * size_pt;
        if !current.is_empty() && width + char_w > max_width_pt {
            lines.push(std::mem::take(current));
            width = 0.0;
        }
        current.push(c);
        width += char_w;
    }
    width
}
