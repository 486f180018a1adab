//! # CardView Component
//!
//! The card frame in the middle of the screen. The front shows the question
//! wrapped and centred; the back hands the answer to [`CodeDisplay`].
//! Content taller than the frame scrolls inside a `ScrollView`.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `CardViewState` lives in `TuiState` (scroll offset, renderer caches)
//! - `CardView` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::core::card::Card;
use crate::highlight::EngineSlot;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::code_display::{CodeDisplay, CodeDisplayState};
use crate::tui::event::TuiEvent;

const FLIP_TO_BACK: &str = " ⇄ Show answer ";
const FLIP_TO_FRONT: &str = " ⇄ Show question ";

pub fn flip_label(flipped: bool) -> &'static str {
    if flipped { FLIP_TO_FRONT } else { FLIP_TO_BACK }
}

/// Where the flip control sits on the card frame's bottom border.
pub fn flip_button_area(card: Rect, flipped: bool) -> Rect {
    if card.height == 0 {
        return Rect::default();
    }
    let width = (flip_label(flipped).width() as u16).min(card.width);
    let x = card.x + (card.width - width) / 2;
    Rect::new(x, card.bottom() - 1, width, 1)
}

/// Wrap the question to `width` and centre every line.
pub fn front_text(front: &str, width: u16) -> Text<'static> {
    let width = usize::from(width.max(1));
    let lines: Vec<Line<'static>> = front
        .lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![Line::default()]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|l| Line::from(l.into_owned()).centered())
                    .collect()
            }
        })
        .collect();
    Text::from(lines).style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
}

/// Persistent state for the card frame. Must be kept in the parent TuiState.
#[derive(Default)]
pub struct CardViewState {
    pub scroll_state: ScrollViewState,
    pub code: CodeDisplayState,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    pub content_height: u16,
    /// (index, flipped) drawn last frame; a change resets the scroll.
    shown: Option<(usize, bool)>,
}

impl CardViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for CardViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            TuiEvent::ScrollToTop => self.scroll_state.scroll_to_top(),
            _ => return None,
        }
        self.clamp_scroll();
        None
    }
}

/// Transient render wrapper for the card frame.
pub struct CardView<'a> {
    state: &'a mut CardViewState,
    card: &'a Card,
    index: usize,
    flipped: bool,
    transitioning: bool,
    engine: &'a EngineSlot,
    pulse: f32,
}

impl<'a> CardView<'a> {
    pub fn new(
        state: &'a mut CardViewState,
        card: &'a Card,
        index: usize,
        flipped: bool,
        transitioning: bool,
        engine: &'a EngineSlot,
        pulse: f32,
    ) -> Self {
        Self {
            state,
            card,
            index,
            flipped,
            transitioning,
            engine,
            pulse,
        }
    }
}

impl Component for CardView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut border_style = Style::default().fg(Color::DarkGray);
        let mut content_style = Style::default();
        if self.transitioning {
            border_style = border_style.add_modifier(Modifier::DIM);
            content_style = content_style.add_modifier(Modifier::DIM);
        }

        let face = if self.flipped { " BACK " } else { " FRONT " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(face, Style::default().fg(Color::Gray)))
            .title_bottom(
                Line::from(Span::styled(
                    flip_label(self.flipped),
                    Style::default().fg(Color::Rgb(129, 140, 248)),
                ))
                .centered(),
            )
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let key = (self.index, self.flipped);
        if self.state.shown != Some(key) {
            self.state.scroll_state.scroll_to_top();
            self.state.shown = Some(key);
        }

        let content_width = inner.width.saturating_sub(1); // -1 for scrollbar safe area
        let text = if self.flipped {
            CodeDisplay::new(
                &mut self.state.code,
                &self.card.back,
                self.card.language.as_deref(),
                self.engine,
                self.pulse,
            )
            .text()
        } else {
            front_text(&self.card.front, content_width)
        };
        let paragraph = Paragraph::new(text)
            .style(content_style)
            .wrap(Wrap { trim: false });
        let height = u16::try_from(paragraph.line_count(content_width)).unwrap_or(u16::MAX);

        self.state.viewport_height = inner.height;
        self.state.content_height = height;

        if height <= inner.height {
            // Questions sit in the middle of the card, answers start at the top.
            let top = if self.flipped {
                0
            } else {
                (inner.height - height) / 2
            };
            let rect = Rect::new(inner.x, inner.y + top, content_width, height);
            frame.render_widget(paragraph, rect);
            return;
        }

        self.state.clamp_scroll();
        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, height));
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::markdown::plain_lines;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &mut CardViewState, card: &Card, flipped: bool, w: u16, h: u16) -> String {
        let backend = TestBackend::new(w, h);
        let mut terminal = Terminal::new(backend).unwrap();
        let engine = EngineSlot::new();
        terminal
            .draw(|f| {
                CardView::new(state, card, 0, flipped, false, &engine, 0.0).render(f, f.area())
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_front_shows_question() {
        let card = Card::new("1", "What is JSX?", "A syntax extension.");
        let mut state = CardViewState::new();
        let text = draw(&mut state, &card, false, 40, 10);
        assert!(text.contains("FRONT"));
        assert!(text.contains("What is JSX?"));
        assert!(!text.contains("A syntax extension."));
        assert!(text.contains("Show answer"));
    }

    #[test]
    fn test_back_shows_answer() {
        let card = Card::new("1", "What is JSX?", "A **syntax** extension.");
        let mut state = CardViewState::new();
        let text = draw(&mut state, &card, true, 40, 10);
        assert!(text.contains("BACK"));
        assert!(text.contains("A syntax extension."));
        assert!(text.contains("Show question"));
    }

    #[test]
    fn test_front_text_wraps_and_centres() {
        let text = front_text("one two three four", 9);
        assert_eq!(plain_lines(&text), vec!["one two", "three", "four"]);
        assert!(text.lines.iter().all(|l| l.alignment == Some(ratatui::layout::Alignment::Center)));
    }

    #[test]
    fn test_long_answer_scrolls_and_clamps() {
        let back = (1..=30).map(|i| format!("line {i}\n")).collect::<Vec<_>>().join("\n");
        let card = Card::new("1", "Q", back);
        let mut state = CardViewState::new();
        draw(&mut state, &card, true, 30, 10);
        assert!(state.content_height > state.viewport_height);

        for _ in 0..200 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        let max_y = state.content_height - state.viewport_height;
        assert_eq!(state.scroll_state.offset().y, max_y);

        state.handle_event(&TuiEvent::ScrollToTop);
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    #[test]
    fn test_flip_resets_scroll() {
        let back = (1..=30).map(|i| format!("line {i}\n")).collect::<Vec<_>>().join("\n");
        let card = Card::new("1", "Q", back);
        let mut state = CardViewState::new();
        draw(&mut state, &card, true, 30, 10);
        for _ in 0..3 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        assert_eq!(state.scroll_state.offset().y, 3);

        draw(&mut state, &card, false, 30, 10);
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    #[test]
    fn test_flip_button_area_on_bottom_border() {
        let card = Rect::new(0, 3, 40, 10);
        let button = flip_button_area(card, false);
        assert_eq!(button.y, 12);
        assert_eq!(button.width as usize, FLIP_TO_BACK.width());
        assert_eq!(button.x, (40 - button.width) / 2);
    }
}
