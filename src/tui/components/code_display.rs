//! # CodeDisplay Component
//!
//! Renders a card's answer: prose through the markdown writer, code through
//! the highlighting engine. Every code block goes through one decision:
//!
//! ```text
//! no language ────────────────────────────▶ inline code
//! highlighting unavailable / engine failed ▶ plain panel + retry control
//! engine not loaded yet ──────────────────▶ skeleton panel (requests load)
//! engine ready ──────────▶ highlight ──ok──▶ coloured panel
//!                                    └─err─▶ plain panel, mark unavailable
//! ```
//!
//! Once any block fails, `highlighter_failed` stays set for this display
//! instance and every later render uses the plain panel, until `retry()`.
//!
//! ## Memoization
//!
//! Two caches sit in `CodeDisplayState`:
//!
//! - `RenderRules`, keyed on `(default_language, unavailable)`
//! - the rendered output, keyed on the answer text, the rules key and the
//!   engine phase/generation
//!
//! Navigator changes that don't touch these (flip state of another card,
//! progress, transitions) reuse the previous output untouched. `retry()`
//! drops both caches.

use std::rc::Rc;

use log::{info, warn};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::memo::Memo;
use crate::highlight::{EnginePhase, EngineSlot, EngineState, Fragment, HighlightedLine};
use crate::tui::component::Component;
use crate::tui::markdown::{self, INLINE_CODE_STYLE, Segment};

pub const RETRY_LABEL: &str = "↻ Retry syntax highlighting [r]";

/// Widths of the placeholder bars drawn while the engine loads.
const SKELETON_BARS: [usize; 4] = [18, 26, 22, 12];

const PROSE_FG: Color = Color::White;
const BORDER_STYLE: Style = Style::new().fg(Color::DarkGray);
const RETRY_STYLE: Style = Style::new().fg(Color::LightBlue).add_modifier(Modifier::BOLD);

/// How a single code block gets drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRender {
    Inline,
    Fallback,
    Loading,
    Highlight,
}

/// The mapping from code nodes to render paths for one display instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRules {
    pub default_language: Option<String>,
    pub unavailable: bool,
}

impl RenderRules {
    /// Fence language if it has one, otherwise the card's language.
    pub fn resolve_language(&self, fence: Option<&str>) -> Option<String> {
        fence
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_language.clone())
    }

    pub fn decide(&self, language: Option<&str>, engine: EnginePhase) -> CodeRender {
        if language.is_none() {
            return CodeRender::Inline;
        }
        if self.unavailable {
            return CodeRender::Fallback;
        }
        match engine {
            EnginePhase::Failed => CodeRender::Fallback,
            EnginePhase::Uninitialized | EnginePhase::Loading => CodeRender::Loading,
            EnginePhase::Ready => CodeRender::Highlight,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBlock {
    Prose(Text<'static>),
    InlineCode(String),
    Highlighted {
        language: String,
        lines: Vec<Line<'static>>,
    },
    Fallback {
        language: String,
        code: String,
    },
    Loading {
        language: String,
    },
}

#[derive(Debug, Default)]
pub struct Rendered {
    pub blocks: Vec<RenderedBlock>,
    /// First engine error hit while rendering, if any.
    pub engine_error: Option<String>,
    /// A skeleton is showing and the engine should be loaded.
    pub wants_engine: bool,
}

impl Rendered {
    pub fn has_fallback(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| matches!(b, RenderedBlock::Fallback { .. }))
    }

    pub fn is_loading(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| matches!(b, RenderedBlock::Loading { .. }))
    }

    /// Flatten into one `Text`, blocks separated by a blank line.
    /// `pulse` (0.0..=1.0) animates skeleton bars.
    pub fn to_text(&self, pulse: f32) -> Text<'static> {
        let mut out: Vec<Line<'static>> = Vec::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push(Line::default());
            }
            match block {
                RenderedBlock::Prose(text) => out.extend(text.lines.iter().cloned()),
                RenderedBlock::InlineCode(code) => out.extend(
                    code.split('\n')
                        .map(|l| Line::from(Span::styled(l.to_string(), INLINE_CODE_STYLE))),
                ),
                RenderedBlock::Highlighted { language, lines } => {
                    out.push(panel_top(language));
                    out.extend(lines.iter().map(|l| panel_row(l.spans.clone())));
                    out.push(panel_bottom());
                }
                RenderedBlock::Fallback { language, code } => {
                    out.push(panel_top(language));
                    out.extend(code.split('\n').map(|l| {
                        panel_row(vec![Span::styled(
                            l.replace('\t', "    "),
                            Style::default().fg(Color::Gray),
                        )])
                    }));
                    out.push(Line::from(Span::styled("├──", BORDER_STYLE)));
                    out.push(panel_row(vec![Span::styled(RETRY_LABEL, RETRY_STYLE)]));
                    out.push(panel_bottom());
                }
                RenderedBlock::Loading { language } => {
                    out.push(panel_top(language));
                    let style = if pulse > 0.5 {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
                    };
                    out.extend(
                        SKELETON_BARS
                            .iter()
                            .map(|w| panel_row(vec![Span::styled("▆".repeat(*w), style)])),
                    );
                    out.push(panel_bottom());
                }
            }
        }
        Text::from(out)
    }
}

fn panel_top(language: &str) -> Line<'static> {
    Line::from(Span::styled(format!("╭── {} ──", language), BORDER_STYLE))
}

fn panel_row(mut spans: Vec<Span<'static>>) -> Line<'static> {
    spans.insert(0, Span::styled("│ ", BORDER_STYLE));
    Line::from(spans)
}

fn panel_bottom() -> Line<'static> {
    Line::from(Span::styled("╰──", BORDER_STYLE))
}

fn fragment_span(fragment: &Fragment) -> Span<'static> {
    let mut style = Style::default();
    if let Some(c) = fragment.color {
        style = style.fg(Color::Rgb(c.0, c.1, c.2));
    }
    if fragment.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if fragment.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    Span::styled(fragment.text.clone(), style)
}

fn highlighted_line(line: HighlightedLine) -> Line<'static> {
    Line::from(line.iter().map(fragment_span).collect::<Vec<_>>())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RulesKey {
    default_language: Option<String>,
    unavailable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputKey {
    markdown: String,
    rules: RulesKey,
    engine: EnginePhase,
    generation: u64,
}

fn build_rules(key: &RulesKey) -> RenderRules {
    RenderRules {
        default_language: key.default_language.clone(),
        unavailable: key.unavailable,
    }
}

fn build_output(markdown: &str, rules: &RenderRules, engine: &EngineSlot) -> Rendered {
    let mut out = Rendered::default();
    for segment in markdown::render(markdown, PROSE_FG) {
        match segment {
            Segment::Prose(text) => out.blocks.push(RenderedBlock::Prose(text)),
            Segment::Code { language, code } => {
                let language = rules.resolve_language(language.as_deref());
                let block = render_code(rules, language, code, engine, &mut out);
                out.blocks.push(block);
            }
        }
    }
    out
}

fn render_code(
    rules: &RenderRules,
    language: Option<String>,
    code: String,
    engine: &EngineSlot,
    out: &mut Rendered,
) -> RenderedBlock {
    let Some(language) = language else {
        return RenderedBlock::InlineCode(code);
    };
    match rules.decide(Some(&language), engine.phase()) {
        CodeRender::Inline => RenderedBlock::InlineCode(code),
        CodeRender::Fallback => {
            if let EngineState::Failed(reason) = engine.state()
                && out.engine_error.is_none()
            {
                out.engine_error = Some(reason.clone());
            }
            RenderedBlock::Fallback { language, code }
        }
        CodeRender::Loading => {
            out.wants_engine = true;
            RenderedBlock::Loading { language }
        }
        CodeRender::Highlight => {
            let EngineState::Ready(highlighter) = engine.state() else {
                return RenderedBlock::Loading { language };
            };
            match highlighter.highlight(&language, &code) {
                Ok(lines) => RenderedBlock::Highlighted {
                    language,
                    lines: lines.into_iter().map(highlighted_line).collect(),
                },
                Err(e) => {
                    if out.engine_error.is_none() {
                        out.engine_error = Some(e.to_string());
                    }
                    RenderedBlock::Fallback { language, code }
                }
            }
        }
    }
}

/// Persistent state for one code display instance. Lives in `TuiState` and is
/// dropped on reload.
#[derive(Default)]
pub struct CodeDisplayState {
    highlighter_failed: bool,
    rules: Memo<RulesKey, RenderRules>,
    output: Memo<OutputKey, Rendered>,
    /// Last render showed a skeleton; the host should request the engine.
    pub wants_engine: bool,
    showing_fallback: bool,
}

impl CodeDisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unavailable(&self) -> bool {
        self.highlighter_failed
    }

    /// Switch this instance to plain rendering. Idempotent.
    pub fn mark_unavailable(&mut self, reason: &str) {
        if !self.highlighter_failed {
            warn!("Syntax highlighting unavailable: {}", reason);
            self.highlighter_failed = true;
        }
    }

    /// Clear the unavailable flag. The host follows up with a reload.
    pub fn retry(&mut self) {
        info!("Retrying syntax highlighting");
        self.highlighter_failed = false;
        self.showing_fallback = false;
        // A cached failure would otherwise be replayed and re-mark the flag
        self.rules.invalidate();
        self.output.invalidate();
    }

    /// Whether the last render showed a plain panel (and so a retry control).
    pub fn is_showing_fallback(&self) -> bool {
        self.showing_fallback
    }

    pub fn rules(&mut self, default_language: Option<&str>) -> Rc<RenderRules> {
        let key = RulesKey {
            default_language: default_language.map(str::to_string),
            unavailable: self.highlighter_failed,
        };
        self.rules.get_or_compute(key, build_rules)
    }

    pub fn render_markdown(
        &mut self,
        markdown: &str,
        default_language: Option<&str>,
        engine: &EngineSlot,
    ) -> Rc<Rendered> {
        let rules = self.rules(default_language);
        let key = OutputKey {
            markdown: markdown.to_string(),
            rules: RulesKey {
                default_language: rules.default_language.clone(),
                unavailable: rules.unavailable,
            },
            engine: engine.phase(),
            generation: engine.generation(),
        };
        let rendered = self
            .output
            .get_or_compute(key, |_| build_output(markdown, &rules, engine));

        if let Some(reason) = &rendered.engine_error {
            self.mark_unavailable(reason);
        }
        self.wants_engine = rendered.wants_engine;
        self.showing_fallback = rendered.has_fallback();
        rendered
    }

    pub fn rules_computations(&self) -> usize {
        self.rules.computations()
    }

    pub fn output_computations(&self) -> usize {
        self.output.computations()
    }
}

/// Transient render wrapper, created each frame with borrowed state.
pub struct CodeDisplay<'a> {
    state: &'a mut CodeDisplayState,
    markdown: &'a str,
    default_language: Option<&'a str>,
    engine: &'a EngineSlot,
    pulse: f32,
}

impl<'a> CodeDisplay<'a> {
    pub fn new(
        state: &'a mut CodeDisplayState,
        markdown: &'a str,
        default_language: Option<&'a str>,
        engine: &'a EngineSlot,
        pulse: f32,
    ) -> Self {
        Self {
            state,
            markdown,
            default_language,
            engine,
            pulse,
        }
    }

    pub fn text(&mut self) -> Text<'static> {
        self.state
            .render_markdown(self.markdown, self.default_language, self.engine)
            .to_text(self.pulse)
    }
}

impl Component for CodeDisplay<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.text()).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
