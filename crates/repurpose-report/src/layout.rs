//! Cursor-based page layout over raw PDF content operations.
//!
//! A [`PageComposer`] walks a y-cursor down an A4 page, wrapping text at
//! the margins and starting a fresh page when the cursor reaches the
//! bottom. Type metrics follow the report stylesheet: bold 18pt title,
//! bold 14pt headings, 10pt body, 9pt small print, 36pt margins.

use lopdf::content::Operation;
use lopdf::Object;

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 36.0;

const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const BULLET_INDENT: f32 = 16.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const SMALL_SIZE: f32 = 9.0;

#[derive(Debug, Clone, Copy)]
pub enum Face {
    Regular,
    Bold,
}

impl Face {
    /// Name under which the font is registered in the page resources.
    pub fn resource(&self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }
}

pub struct PageComposer {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PageComposer {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Centered bold title line(s).
    pub fn title(&mut self, text: &str) {
        let text = sanitize(text);
        for line in wrap(&text, TITLE_SIZE, TEXT_WIDTH) {
            let x = MARGIN + (TEXT_WIDTH - text_width(&line, TITLE_SIZE)).max(0.0) / 2.0;
            self.show_line(Face::Bold, TITLE_SIZE, x, &line);
        }
        self.space(20.0);
    }

    /// Section heading, bold 14pt with space above and below.
    pub fn heading(&mut self, text: &str) {
        self.space(14.0);
        for line in wrap(&sanitize(text), HEADING_SIZE, TEXT_WIDTH) {
            self.show_line(Face::Bold, HEADING_SIZE, MARGIN, &line);
        }
        self.space(8.0);
    }

    /// Sub-block heading, bold at body size.
    pub fn subheading(&mut self, text: &str) {
        self.space(4.0);
        for line in wrap(&sanitize(text), BODY_SIZE, TEXT_WIDTH) {
            self.show_line(Face::Bold, BODY_SIZE, MARGIN, &line);
        }
        self.space(2.0);
    }

    /// Body paragraph, wrapped at the margins.
    pub fn body(&mut self, text: &str) {
        for line in wrap(&sanitize(text), BODY_SIZE, TEXT_WIDTH) {
            self.show_line(Face::Regular, BODY_SIZE, MARGIN, &line);
        }
        self.space(6.0);
    }

    /// Small print, 9pt.
    pub fn small(&mut self, text: &str) {
        for line in wrap(&sanitize(text), SMALL_SIZE, TEXT_WIDTH) {
            self.show_line(Face::Regular, SMALL_SIZE, MARGIN, &line);
        }
        self.space(4.0);
    }

    /// Bold label and regular value on one baseline.
    pub fn labeled(&mut self, label: &str, value: &str) {
        let label = sanitize(label);
        let value = sanitize(value);
        let leading = BODY_SIZE * 1.2;
        self.advance(leading);
        let value_x = MARGIN + text_width(&label, BODY_SIZE) + 4.0;
        self.text_at(Face::Bold, BODY_SIZE, MARGIN, &label);
        self.text_at(Face::Regular, BODY_SIZE, value_x, &value);
        self.space(6.0);
    }

    /// Dashed bullet item with a hanging indent.
    pub fn bullet(&mut self, text: &str) {
        let text_x = MARGIN + BULLET_INDENT;
        let available = PAGE_WIDTH - MARGIN - text_x;
        let lines = wrap(&sanitize(text), BODY_SIZE, available);
        for (index, line) in lines.iter().enumerate() {
            if index == 0 {
                let leading = BODY_SIZE * 1.2;
                self.advance(leading);
                self.text_at(Face::Regular, BODY_SIZE, MARGIN + 6.0, "-");
                self.text_at(Face::Regular, BODY_SIZE, text_x, line);
            } else {
                self.show_line(Face::Regular, BODY_SIZE, text_x, line);
            }
        }
        self.space(2.0);
    }

    /// Vertical whitespace. Page breaks happen on the next line draw.
    pub fn space(&mut self, points: f32) {
        self.y -= points;
    }

    /// Finished pages as raw operation lists; always at least one page.
    pub fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            let ops = std::mem::take(&mut self.ops);
            self.pages.push(ops);
        }
        self.pages
    }

    fn show_line(&mut self, face: Face, size: f32, x: f32, text: &str) {
        self.advance(size * 1.2);
        self.text_at(face, size, x, text);
    }

    /// Moves the cursor down one line, breaking the page if needed.
    fn advance(&mut self, leading: f32) {
        if self.y - leading < MARGIN {
            let ops = std::mem::take(&mut self.ops);
            self.pages.push(ops);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= leading;
    }

    fn text_at(&mut self, face: Face, size: f32, x: f32, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![face.resource().into(), (size as i64).into()],
        ));
        self.ops.push(Operation::new(
            "Td",
            vec![Object::Real(x.into()), Object::Real(self.y.into())],
        ));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(text.to_string())],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }
}

/// Maps text onto the glyphs the built-in faces can show: typographic
/// punctuation becomes its ASCII cousin, anything else non-ASCII a `?`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2022}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' => out.push(' '),
            c if c.is_ascii_graphic() || c == ' ' => out.push(c),
            c if c.is_whitespace() => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

/// Approximate Helvetica advance width in points.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: f32 = text.chars().map(char_width_units).sum();
    units * size / 1000.0
}

/// Class-based approximation of Helvetica advance widths (1/1000 em).
fn char_width_units(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '!' | '|' | '\'' | '.' | ',' | ':' | ';' => 280.0,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '{' | '}' | '/' | '"' => 333.0,
        ' ' => 278.0,
        'm' | 'w' => 833.0,
        'M' | 'W' => 944.0,
        c if c.is_ascii_uppercase() => 700.0,
        c if c.is_ascii_digit() => 556.0,
        _ => 556.0,
    }
}

/// Greedy word wrap against the width approximation. A single word wider
/// than `max_width` gets its own overflowing line rather than being cut.
pub fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || text_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let text = "Reduced flare frequency was observed in diabetic IBD patients across three cohorts";
        let lines = wrap(text, BODY_SIZE, 200.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, BODY_SIZE) <= 200.0, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_overlong_word_is_not_cut() {
        let lines = wrap("pharmacokineticallyunpronounceable", BODY_SIZE, 30.0);
        assert_eq!(lines, vec!["pharmacokineticallyunpronounceable".to_string()]);
    }

    #[test]
    fn test_wrap_empty_is_empty() {
        assert!(wrap("", BODY_SIZE, 200.0).is_empty());
        assert!(wrap("   ", BODY_SIZE, 200.0).is_empty());
    }

    #[test]
    fn test_sanitize_maps_typographic_punctuation() {
        assert_eq!(sanitize("“smart” – dash… naïve"), "\"smart\" - dash... na?ve");
        assert_eq!(sanitize("plain ASCII stays"), "plain ASCII stays");
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let narrow = text_width("illill", 10.0);
        let wide = text_width("MMM", 10.0);
        assert!(narrow < wide);
        assert!((text_width("abc", 20.0) - 2.0 * text_width("abc", 10.0)).abs() < 0.001);
    }

    #[test]
    fn test_composer_breaks_pages() {
        let mut composer = PageComposer::new();
        for i in 0..120 {
            composer.body(&format!("line {i}"));
        }
        let pages = composer.finish();
        assert!(pages.len() >= 2, "120 spaced body lines cannot fit one A4 page");
        for page in &pages {
            assert!(!page.is_empty());
        }
    }

    #[test]
    fn test_composer_always_yields_a_page() {
        let pages = PageComposer::new().finish();
        assert_eq!(pages.len(), 1);
    }
}
