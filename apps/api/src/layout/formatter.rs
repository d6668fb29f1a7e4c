//! Paginated document formatter: lays a [`ResumeRecord`] out into positioned runs.
//!
//! Coordinates are in points with the origin at the top-left corner of the page;
//! a run's `y` is its baseline. A cursor walks down the page and moves to the next
//! page whenever the next run would start below the bottom margin, so content is
//! never clipped. The PDF encoder flips `y` into PDF's bottom-up space.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::font_metrics::{get_metrics, FontWeight};
use crate::layout::wrap::wrap_text;
use crate::models::resume::ResumeRecord;

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// ISO A4 in points.
pub const A4_SIZE_PT: (f32, f32) = (595.28, 841.89);
/// US letter in points.
pub const LETTER_SIZE_PT: (f32, f32) = (612.0, 792.0);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Invalid page geometry (width={width}, height={height}, margin={margin}): {reason}")]
    InvalidGeometry {
        width: f32,
        height: f32,
        margin: f32,
        reason: &'static str,
    },
}

/// Validated page size and uniform margin, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    width: f32,
    height: f32,
    margin: f32,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32, margin: f32) -> Result<Self, LayoutError> {
        let invalid = |reason| LayoutError::InvalidGeometry {
            width,
            height,
            margin,
            reason,
        };

        if !(width.is_finite() && height.is_finite() && margin.is_finite()) {
            return Err(invalid("dimensions must be finite"));
        }
        if width <= 0.0 || height <= 0.0 || margin <= 0.0 {
            return Err(invalid("dimensions must be positive"));
        }
        if 2.0 * margin >= width || 2.0 * margin >= height {
            return Err(invalid("margins leave no content area"));
        }

        Ok(Self {
            width,
            height,
            margin,
        })
    }

    pub fn a4(margin: f32) -> Result<Self, LayoutError> {
        Self::new(A4_SIZE_PT.0, A4_SIZE_PT.1, margin)
    }

    pub fn letter(margin: f32) -> Result<Self, LayoutError> {
        Self::new(LETTER_SIZE_PT.0, LETTER_SIZE_PT.1, margin)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Lowest baseline a run may occupy.
    pub fn bottom(&self) -> f32 {
        self.height - self.margin
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStyle {
    pub weight: FontWeight,
    pub size: f32,
}

/// A single positioned, styled text fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub style: RunStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub pages: Vec<Page>,
}

impl DocumentLayout {
    pub fn run_count(&self) -> usize {
        self.runs().count()
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.pages.iter().flat_map(|p| p.runs.iter())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Typography
// ────────────────────────────────────────────────────────────────────────────

pub const NAME_STYLE: RunStyle = RunStyle {
    weight: FontWeight::Bold,
    size: 20.0,
};
pub const EMAIL_STYLE: RunStyle = RunStyle {
    weight: FontWeight::Normal,
    size: 11.0,
};
pub const TITLE_STYLE: RunStyle = RunStyle {
    weight: FontWeight::Bold,
    size: 13.0,
};
pub const BODY_STYLE: RunStyle = RunStyle {
    weight: FontWeight::Normal,
    size: 11.0,
};

pub const BULLET: char = '\u{2022}';

pub const SUMMARY_TITLE: &str = "Summary";
pub const SKILLS_TITLE: &str = "Skills";
pub const EXPERIENCE_TITLE: &str = "Experience";

const LINE_HEIGHT_FACTOR: f32 = 1.2;
const LINE_GAP: f32 = 2.0;
const SECTION_GAP: f32 = 10.0;
const COLUMN_GUTTER: f32 = 16.0;

/// Leading glyphs treated as bullets regardless of what follows them.
const GLYPH_MARKERS: &[char] = &['•', '·', '▪', '◦', '●', '‣', '∙'];
/// Leading characters treated as bullets only when followed by whitespace.
const DASH_MARKERS: &[char] = &['-', '*', '–', '—'];

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Validates the geometry and lays out the record.
pub fn layout(
    record: &ResumeRecord,
    page_width: f32,
    page_height: f32,
    margin: f32,
) -> Result<DocumentLayout, LayoutError> {
    let geometry = PageGeometry::new(page_width, page_height, margin)?;
    Ok(layout_document(record, &geometry))
}

/// Lays out the record on already-validated geometry. Infallible and deterministic.
pub fn layout_document(record: &ResumeRecord, geometry: &PageGeometry) -> DocumentLayout {
    let mut builder = LayoutBuilder::new(geometry);
    let mut cursor = Cursor {
        page: 0,
        y: geometry.margin(),
    };
    let left = geometry.margin();
    let full_width = geometry.content_width();

    // Header
    if !record.name.is_empty() {
        builder.paragraph(&mut cursor, &record.name, left, full_width, NAME_STYLE);
    }
    if !record.email.is_empty() {
        builder.paragraph(&mut cursor, &record.email, left, full_width, EMAIL_STYLE);
    }

    // Summary
    builder.section_title(&mut cursor, SUMMARY_TITLE);
    builder.paragraph(&mut cursor, &record.summary, left, full_width, BODY_STYLE);

    // Skills, two columns by index parity
    builder.section_title(&mut cursor, SKILLS_TITLE);
    let gutter = COLUMN_GUTTER.min(full_width / 4.0);
    let column_width = (full_width - gutter) / 2.0;
    let mut left_cursor = cursor;
    let mut right_cursor = cursor;
    for (index, skill) in record.skills.iter().enumerate() {
        if index % 2 == 0 {
            builder.bullet_item(&mut left_cursor, skill, left, column_width, BODY_STYLE);
        } else {
            let right = left + column_width + gutter;
            builder.bullet_item(&mut right_cursor, skill, right, column_width, BODY_STYLE);
        }
    }
    cursor = left_cursor.later(right_cursor);

    // Experience
    builder.section_title(&mut cursor, EXPERIENCE_TITLE);
    for entry in &record.experience {
        let text = strip_bullet_marker(entry);
        builder.bullet_item(&mut cursor, text, left, full_width, BODY_STYLE);
    }

    builder.finish()
}

/// Removes leading bullet markers so a uniform marker can be added.
pub fn strip_bullet_marker(entry: &str) -> &str {
    let mut rest = entry.trim_start();
    loop {
        let mut chars = rest.chars();
        let Some(first) = chars.next() else {
            return rest;
        };
        let after = chars.as_str();

        if GLYPH_MARKERS.contains(&first) {
            rest = after.trim_start();
        } else if DASH_MARKERS.contains(&first) && after.starts_with(char::is_whitespace) {
            rest = after.trim_start();
        } else {
            return rest;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cursor {
    page: usize,
    y: f32,
}

impl Cursor {
    /// The cursor further down the document.
    fn later(self, other: Cursor) -> Cursor {
        if (other.page, other.y) > (self.page, self.y) {
            other
        } else {
            self
        }
    }
}

struct LayoutBuilder<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<Page>,
}

impl<'a> LayoutBuilder<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page {
                number: 1,
                runs: Vec::new(),
            }],
        }
    }

    /// Places one run at the cursor, breaking to the next page first if the
    /// cursor has passed the bottom margin.
    fn emit(&mut self, cursor: &mut Cursor, text: String, x: f32, style: RunStyle) {
        if cursor.y > self.geometry.bottom() {
            cursor.page += 1;
            cursor.y = self.geometry.margin();
        }
        while self.pages.len() <= cursor.page {
            let number = self.pages.len() + 1;
            self.pages.push(Page {
                number,
                runs: Vec::new(),
            });
        }
        self.pages[cursor.page].runs.push(Run {
            text,
            x,
            y: cursor.y,
            style,
        });
        cursor.y += style.size * LINE_HEIGHT_FACTOR + LINE_GAP;
    }

    fn section_title(&mut self, cursor: &mut Cursor, title: &str) {
        cursor.y += SECTION_GAP;
        self.emit(cursor, title.to_string(), self.geometry.margin(), TITLE_STYLE);
    }

    fn paragraph(
        &mut self,
        cursor: &mut Cursor,
        text: &str,
        x: f32,
        width: f32,
        style: RunStyle,
    ) {
        let metrics = get_metrics(style.weight);
        for line in wrap_text(text, metrics, style.size, width) {
            self.emit(cursor, line, x, style);
        }
    }

    /// A wrapped paragraph whose first line carries the bullet marker and
    /// whose continuation lines are indented past it.
    fn bullet_item(
        &mut self,
        cursor: &mut Cursor,
        text: &str,
        x: f32,
        width: f32,
        style: RunStyle,
    ) {
        let metrics = get_metrics(style.weight);
        let prefix = format!("{BULLET} ");
        let indent = metrics.measure_pt(&prefix, style.size);
        let lines = wrap_text(text, metrics, style.size, width - indent);

        for (i, line) in lines.into_iter().enumerate() {
            if i == 0 {
                self.emit(cursor, format!("{prefix}{line}"), x, style);
            } else {
                self.emit(cursor, line, x + indent, style);
            }
        }
    }

    fn finish(self) -> DocumentLayout {
        DocumentLayout {
            page_width: self.geometry.width(),
            page_height: self.geometry.height(),
            margin: self.geometry.margin(),
            pages: self.pages,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::normalizer::build_summary;

    fn record(name: &str, email: &str, skills: &[&str], experience: &[&str]) -> ResumeRecord {
        let skills: Vec<String> = skills.iter().map(|s| s.to_string()).collect();
        let experience: Vec<String> = experience.iter().map(|s| s.to_string()).collect();
        ResumeRecord {
            name: name.to_string(),
            email: email.to_string(),
            summary: build_summary(name, &skills, &experience),
            skills,
            experience,
        }
    }

    fn a4() -> PageGeometry {
        PageGeometry::a4(40.0).unwrap()
    }

    fn texts(layout: &DocumentLayout) -> Vec<&str> {
        layout.runs().map(|r| r.text.as_str()).collect()
    }

    fn assert_runs_within_margins(layout: &DocumentLayout) {
        for run in layout.runs() {
            assert!(
                run.y >= layout.margin && run.y <= layout.page_height - layout.margin,
                "run {:?} at y={} outside [{}, {}]",
                run.text,
                run.y,
                layout.margin,
                layout.page_height - layout.margin
            );
        }
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        assert!(layout(&record("", "", &[], &[]), 0.0, 800.0, 40.0).is_err());
        assert!(layout(&record("", "", &[], &[]), 600.0, -1.0, 40.0).is_err());
        assert!(layout(&record("", "", &[], &[]), 600.0, 800.0, 0.0).is_err());
        assert!(layout(&record("", "", &[], &[]), f32::NAN, 800.0, 40.0).is_err());
        assert!(layout(&record("", "", &[], &[]), 600.0, f32::INFINITY, 40.0).is_err());
        assert!(matches!(
            PageGeometry::new(100.0, 800.0, 50.0),
            Err(LayoutError::InvalidGeometry {
                reason: "margins leave no content area",
                ..
            })
        ));
    }

    #[test]
    fn test_valid_geometry_accessors() {
        let g = PageGeometry::letter(72.0).unwrap();
        assert_eq!(g.width(), 612.0);
        assert_eq!(g.height(), 792.0);
        assert_eq!(g.content_width(), 468.0);
        assert_eq!(g.bottom(), 720.0);
    }

    #[test]
    fn test_empty_record_emits_titles_and_summary() {
        let doc = layout_document(&record("", "", &[], &[]), &a4());
        assert_eq!(doc.pages.len(), 1);
        let texts = texts(&doc);
        assert_eq!(texts.first(), Some(&SUMMARY_TITLE));
        assert_eq!(texts[texts.len() - 2], SKILLS_TITLE);
        assert_eq!(texts[texts.len() - 1], EXPERIENCE_TITLE);
        assert!(texts.iter().all(|t| !t.starts_with(BULLET)));
    }

    #[test]
    fn test_header_styles() {
        let doc = layout_document(&record("Jane Doe", "jane@example.com", &[], &[]), &a4());
        let runs: Vec<&Run> = doc.runs().collect();
        assert_eq!(runs[0].text, "Jane Doe");
        assert_eq!(runs[0].style, NAME_STYLE);
        assert_eq!(runs[0].y, 40.0);
        assert_eq!(runs[1].text, "jane@example.com");
        assert_eq!(runs[1].style, EMAIL_STYLE);
        assert!(runs[1].y > runs[0].y);
    }

    #[test]
    fn test_skills_alternate_between_columns() {
        let doc = layout_document(&record("A", "", &["Rust", "Go", "SQL"], &[]), &a4());
        let bullets: Vec<&Run> = doc
            .runs()
            .filter(|r| r.text.starts_with(BULLET))
            .collect();
        assert_eq!(bullets.len(), 3);
        assert_eq!(bullets[0].text, "• Rust");
        assert_eq!(bullets[1].text, "• Go");
        assert_eq!(bullets[2].text, "• SQL");
        assert_eq!(bullets[0].x, 40.0);
        assert!(bullets[1].x > 40.0);
        assert_eq!(bullets[2].x, 40.0);
        // Right column starts level with the left one.
        assert_eq!(bullets[0].y, bullets[1].y);
        assert!(bullets[2].y > bullets[0].y);
    }

    #[test]
    fn test_skills_section_ends_at_longer_column() {
        let doc = layout_document(&record("A", "", &["a", "b", "c", "d", "e"], &[]), &a4());
        let last_skill = doc
            .runs()
            .filter(|r| r.text.starts_with(BULLET))
            .map(|r| r.y)
            .fold(f32::MIN, f32::max);
        let experience_title = doc
            .runs()
            .find(|r| r.text == EXPERIENCE_TITLE)
            .unwrap();
        assert!(experience_title.y > last_skill);
    }

    #[test]
    fn test_empty_skills_keeps_title_without_bullets() {
        let doc = layout_document(&record("A", "", &[], &["Did work"]), &a4());
        let texts = texts(&doc);
        let skills_at = texts.iter().position(|t| *t == SKILLS_TITLE).unwrap();
        assert_eq!(texts[skills_at + 1], EXPERIENCE_TITLE);
        assert_eq!(texts.last(), Some(&"• Did work"));
    }

    #[test]
    fn test_existing_bullet_markers_replaced() {
        let doc = layout_document(
            &record("A", "", &[], &["• Led team", "- Shipped v2", "-5% churn", "*  Cut costs"]),
            &a4(),
        );
        let bullets: Vec<&str> = doc
            .runs()
            .filter(|r| r.text.starts_with(BULLET))
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(
            bullets,
            vec!["• Led team", "• Shipped v2", "• -5% churn", "• Cut costs"]
        );
    }

    #[test]
    fn test_strip_bullet_marker_cases() {
        assert_eq!(strip_bullet_marker("•Built"), "Built");
        assert_eq!(strip_bullet_marker("  ◦ • Built"), "Built");
        assert_eq!(strip_bullet_marker("— Led"), "Led");
        assert_eq!(strip_bullet_marker("*bold*"), "*bold*");
        assert_eq!(strip_bullet_marker("•"), "");
    }

    #[test]
    fn test_marker_only_entry_emits_nothing() {
        let doc = layout_document(&record("A", "", &[], &["•"]), &a4());
        assert_eq!(texts(&doc).last(), Some(&EXPERIENCE_TITLE));
    }

    #[test]
    fn test_long_experience_overflows_without_dropping_runs() {
        let entry = "Delivered measurable improvements across the platform ".repeat(400);
        let rec = record("", "", &[], &[entry.as_str()]);
        let geometry = a4();
        let doc = layout_document(&rec, &geometry);

        assert!(doc.pages.len() > 1, "expected overflow onto new pages");
        assert_runs_within_margins(&doc);

        let body = get_metrics(BODY_STYLE.weight);
        let indent = body.measure_pt("• ", BODY_STYLE.size);
        let summary_lines =
            wrap_text(&rec.summary, body, BODY_STYLE.size, geometry.content_width()).len();
        let entry_lines =
            wrap_text(&entry, body, BODY_STYLE.size, geometry.content_width() - indent).len();
        assert_eq!(doc.run_count(), 3 + summary_lines + entry_lines);

        // Every word survives, in order.
        let emitted: Vec<&str> = doc
            .runs()
            .skip_while(|r| r.text != EXPERIENCE_TITLE)
            .skip(1)
            .flat_map(|r| r.text.trim_start_matches("• ").split_whitespace())
            .collect();
        let expected: Vec<&str> = entry.split_whitespace().collect();
        assert_eq!(emitted, expected);
    }

    #[test]
    fn test_pages_numbered_sequentially() {
        let entries: Vec<String> = (0..120).map(|i| format!("Entry number {i}")).collect();
        let refs: Vec<&str> = entries.iter().map(String::as_str).collect();
        let doc = layout_document(&record("A", "a@b.c", &[], &refs), &a4());
        for (i, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            assert!(!page.runs.is_empty());
        }
    }

    #[test]
    fn test_many_skills_overflow_both_columns() {
        let skills: Vec<String> = (0..300).map(|i| format!("Skill {i}")).collect();
        let refs: Vec<&str> = skills.iter().map(String::as_str).collect();
        let doc = layout_document(&record("A", "", &refs, &[]), &a4());
        assert!(doc.pages.len() > 1);
        assert_runs_within_margins(&doc);
        let bullet_count = doc.runs().filter(|r| r.text.starts_with(BULLET)).count();
        assert_eq!(bullet_count, 300);
        let second_page_right = doc.pages[1].runs.iter().any(|r| r.x > 40.0);
        assert!(second_page_right, "right column should continue on page 2");
    }

    #[test]
    fn test_runs_never_wider_than_column() {
        let long_word = "Supercalifragilistic".repeat(20);
        let doc = layout_document(
            &record(&long_word, "", &[long_word.as_str()], &[long_word.as_str()]),
            &a4(),
        );
        let right_edge = doc.page_width - doc.margin + 1e-2;
        for run in doc.runs() {
            let w = get_metrics(run.style.weight).measure_pt(&run.text, run.style.size);
            assert!(run.x + w <= right_edge, "run {:?} overflows horizontally", run.text);
        }
    }

    #[test]
    fn test_wide_accented_capitals_wrap_inside_margins() {
        let name = "ÆÖÉ".repeat(70);
        let doc = layout_document(&record(&name, "", &["ÆÆÆÆ ÖÖÖÖ"], &[name.as_str()]), &a4());
        let right_edge = doc.page_width - doc.margin + 1e-2;

        let name_lines = doc.runs().filter(|r| r.style == NAME_STYLE).count();
        assert!(name_lines > 1, "name should wrap, got {name_lines} line(s)");
        for run in doc.runs() {
            let w = get_metrics(run.style.weight).measure_pt(&run.text, run.style.size);
            assert!(run.x + w <= right_edge, "run {:?} overflows horizontally", run.text);
        }
    }

    #[test]
    fn test_small_page_still_within_margins() {
        let doc = layout(
            &record("Jane", "j@e.com", &["a", "b", "c"], &["x", "y", "z"]),
            200.0,
            120.0,
            20.0,
        )
        .unwrap();
        assert!(doc.pages.len() > 1);
        assert_runs_within_margins(&doc);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let rec = record("Jane", "jane@example.com", &["Rust", "Go"], &["Built X", "Led Y"]);
        let first = layout(&rec, 612.0, 792.0, 54.0).unwrap();
        let second = layout(&rec, 612.0, 792.0, 54.0).unwrap();
        assert_eq!(first, second);
    }
}
