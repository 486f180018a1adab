//! Markdown → ratatui `Text` renderer.
//!
//! Answers are first split into prose and fenced code by
//! [`crate::core::document::split_blocks`]. Prose goes through a thin wrapper
//! around `pulldown_cmark` that converts markdown events into styled
//! `Line`/`Span` values: headings, bold, italic, strikethrough, inline code,
//! lists, blockquotes, rules and links. Code never gets styled here; it comes
//! back as a `Segment::Code` so the code display can decide how to draw it.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::core::document::{Block, split_blocks, strip_trailing_newline};

/// Style for inline `code` spans and code rendered without a language.
pub const INLINE_CODE_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Prose(Text<'static>),
    Code {
        /// Language from the fence, if it had one.
        language: Option<String>,
        code: String,
    },
}

/// Parse an answer into styled prose and raw code segments, in order.
///
/// Returns owned text (`'static`) so callers aren't constrained by input lifetime.
pub fn render(content: &str, base_fg: Color) -> Vec<Segment> {
    let mut segments = Vec::new();
    for block in split_blocks(content) {
        match block {
            Block::Prose(prose) => segments.extend(render_prose(&prose, base_fg)),
            Block::Code { language, code } => segments.push(Segment::Code { language, code }),
        }
    }
    segments
}

fn render_prose(content: &str, base_fg: Color) -> Vec<Segment> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let events: Vec<Event<'_>> = Parser::new_ext(content, opts).collect();
    let mut w = Writer::new(base_fg);
    for event in events {
        w.handle(event);
    }
    w.finish()
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct PendingCode {
    language: Option<String>,
    body: String,
}

struct Writer {
    segments: Vec<Segment>,
    text: Text<'static>,
    base_fg: Color,
    /// Inline style stack (bold, italic, heading text, etc.). Styles compose
    /// via `patch` so nested bold+italic works.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote `│`).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    /// Code block being collected (indented blocks, or fences nested in lists).
    code: Option<PendingCode>,
    /// Stored link URL, appended after the link text closes.
    link_url: Option<String>,
    /// Whether the next block element should be preceded by a blank line.
    needs_newline: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            segments: vec![],
            text: Text::default(),
            base_fg,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            code: None,
            link_url: None,
            needs_newline: false,
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        self.flush_text();
        self.segments
    }

    fn flush_text(&mut self) {
        if !self.text.lines.is_empty() {
            self.segments
                .push(Segment::Prose(std::mem::take(&mut self.text)));
        }
        self.needs_newline = false;
    }

    // ── Style helpers ───────────────────────────────────────────────────

    /// Current effective style: top of stack, or base foreground color.
    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    /// Push a style that composes with the current one (inherits parent modifiers).
    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    // ── Line/span helpers ───────────────────────────────────────────────

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.inline_code(c),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
                self.needs_newline = true;
            }
            _ => {} // HTML, footnotes and math are skipped
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            // ── Block elements ──────────────────────────────────────────
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let hs = heading_style(self.base_fg, level);
                let depth = level as usize;
                self.push_line(Line::from(Span::styled(
                    format!("{} ", "#".repeat(depth)),
                    hs,
                )));
                self.push_style(hs);
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes.push(Span::styled(
                    "│ ",
                    Style::default().fg(Color::DarkGray),
                ));
                self.push_style(
                    Style::default()
                        .fg(self.base_fg)
                        .add_modifier(Modifier::DIM | Modifier::ITALIC),
                );
            }
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(l) => l.split_whitespace().next().map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(PendingCode {
                    language,
                    body: String::new(),
                });
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let depth = self.list_indices.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => format!("{indent}- "),
                        Some(n) => {
                            let s = format!("{indent}{}. ", n);
                            *n += 1;
                            s
                        }
                    };
                    self.push_span(Span::styled(
                        marker,
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }

            // ── Inline elements ─────────────────────────────────────────
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {} // Images keep only their alt text
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                if let Some(pending) = self.code.take() {
                    self.flush_text();
                    self.segments.push(Segment::Code {
                        language: pending.language,
                        code: strip_trailing_newline(&pending.body).to_string(),
                    });
                }
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::Item => {}
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(Span::raw(" ("));
                    self.push_span(Span::styled(
                        url,
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::UNDERLINED),
                    ));
                    self.push_span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    // ── Content handlers ────────────────────────────────────────────────

    fn text(&mut self, cow: CowStr<'_>) {
        // Code is kept verbatim; the code display owns its presentation.
        if let Some(pending) = self.code.as_mut() {
            pending.body.push_str(&cow);
            return;
        }

        // Expand tabs → 4 spaces (ratatui renders \t as zero-width)
        let raw = cow.to_string();
        let text = if raw.contains('\t') {
            raw.replace('\t', "    ")
        } else {
            raw
        };

        // Normal text inherits the current style
        let style = self.style();
        self.push_span(Span::styled(text, style));
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        self.push_span(Span::styled(cow.to_string(), INLINE_CODE_STYLE));
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

/// Flatten text into one string per line; handy in tests and hit-testing.
pub fn plain_lines(text: &Text<'_>) -> Vec<String> {
    text.lines
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prose(segment: &Segment) -> &Text<'static> {
        match segment {
            Segment::Prose(text) => text,
            other => panic!("expected prose, got {:?}", other),
        }
    }

    #[test]
    fn fenced_block_between_prose() {
        let segments = render("Text ```js\nconst x=1;\n``` more", Color::White);
        assert_eq!(segments.len(), 3);
        assert_eq!(plain_lines(prose(&segments[0])), vec!["Text"]);
        assert_eq!(
            segments[1],
            Segment::Code {
                language: Some("js".to_string()),
                code: "const x=1;".to_string()
            }
        );
        assert_eq!(plain_lines(prose(&segments[2])), vec!["more"]);
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let segments = render("## Hello", Color::Blue);
        // Line 0 should contain "## " and "Hello", both with bold + blue
        let line = &prose(&segments[0]).lines[0];
        assert!(line.spans.len() >= 2, "expected >= 2 spans, got {:?}", line);
        let prefix_style = line.spans[0].style;
        let text_style = line.spans[1].style;
        assert!(prefix_style.add_modifier.contains(Modifier::BOLD));
        assert!(text_style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(text_style.fg, Some(Color::Blue));
    }

    #[test]
    fn bold_text_is_bold() {
        let segments = render("Some **bold** text", Color::Blue);
        let line = &prose(&segments[0]).lines[0];
        let bold_span = line.spans.iter().find(|s| s.content == "bold").unwrap();
        assert!(bold_span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn inline_code_styled() {
        let segments = render("Use `foo()` here", Color::Blue);
        let line = &prose(&segments[0]).lines[0];
        let code_span = line.spans.iter().find(|s| s.content == "foo()").unwrap();
        assert_eq!(code_span.style, INLINE_CODE_STYLE);
    }

    #[test]
    fn indented_code_block_has_no_language() {
        let segments = render("Example:\n\n    let x = 1;\n    let y = 2;\n", Color::White);
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[1],
            Segment::Code {
                language: None,
                code: "let x = 1;\nlet y = 2;".to_string()
            }
        );
    }

    #[test]
    fn paragraphs_separated_by_blank_line() {
        let segments = render("One.\n\nTwo.", Color::White);
        assert_eq!(plain_lines(prose(&segments[0])), vec!["One.", "", "Two."]);
    }

    #[test]
    fn ordered_list_markers() {
        let segments = render("1. first\n2. second", Color::White);
        let lines = plain_lines(prose(&segments[0]));
        assert_eq!(lines, vec!["1. first", "2. second"]);
    }

    #[test]
    fn link_url_appended() {
        let segments = render("[docs](https://react.dev)", Color::White);
        let lines = plain_lines(prose(&segments[0]));
        assert_eq!(lines, vec!["docs (https://react.dev)"]);
    }

    #[test]
    fn plain_text_uses_base_color() {
        let segments = render("hello", Color::Green);
        let span = &prose(&segments[0]).lines[0].spans[0];
        assert_eq!(span.style.fg, Some(Color::Green));
    }

    #[test]
    fn tabs_expanded_to_spaces() {
        let segments = render("a\tb", Color::White);
        let lines = plain_lines(prose(&segments[0]));
        assert_eq!(lines, vec!["a    b"]);
    }

    #[test]
    fn rule_is_separated_from_paragraphs() {
        let segments = render("Above\n\n---\n\nBelow", Color::White);
        let lines = plain_lines(prose(&segments[0]));
        let rule = "─".repeat(40);
        assert_eq!(lines, vec!["Above", "", rule.as_str(), "", "Below"]);
    }

    #[test]
    fn blockquote_lines_are_prefixed() {
        let segments = render("> props are read-only", Color::White);
        let text = prose(&segments[0]);
        assert_eq!(plain_lines(text), vec!["│ props are read-only"]);
        let quoted = &text.lines[0].spans[1];
        assert!(quoted.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn nested_list_is_indented() {
        let segments = render("- hooks\n  - useState", Color::White);
        let lines = plain_lines(prose(&segments[0]));
        assert_eq!(lines, vec!["- hooks", "  - useState"]);
    }

    #[test]
    fn strikethrough_is_crossed_out() {
        let segments = render("~~class~~ className", Color::White);
        let line = &prose(&segments[0]).lines[0];
        let struck = line.spans.iter().find(|s| s.content == "class").unwrap();
        assert!(struck.style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn image_renders_alt_text() {
        let segments = render("![React logo](logo.png)", Color::White);
        assert_eq!(plain_lines(prose(&segments[0])), vec!["React logo"]);
    }

    #[test]
    fn code_only_answer_has_no_prose() {
        let segments = render("```rust\nfn main() {}\n```", Color::White);
        assert_eq!(segments.len(), 1);
        assert!(matches!(&segments[0], Segment::Code { language: Some(l), .. } if l == "rust"));
    }
}
