//! # Completion Notice
//!
//! Blocking modal shown when the deck wraps. While it is open the event loop
//! routes every key to it, so nothing reaches the navigator until it is
//! dismissed.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};

use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionNotice {
    pub deck_title: String,
    pub completions: u32,
}

/// Events emitted by the notice.
#[derive(Debug, PartialEq, Eq)]
pub enum NoticeEvent {
    Dismiss,
}

impl CompletionNotice {
    pub fn new(deck_title: impl Into<String>, completions: u32) -> Self {
        Self {
            deck_title: deck_title.into(),
            completions,
        }
    }

    pub fn handle_event(&self, event: &TuiEvent) -> Option<NoticeEvent> {
        match event {
            TuiEvent::Enter
            | TuiEvent::Escape
            | TuiEvent::Char(' ')
            | TuiEvent::MouseClick(..) => Some(NoticeEvent::Dismiss),
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(50, 30, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(99, 102, 241)))
            .title(" Deck completed! ")
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(" Enter OK ").centered())
            .padding(Padding::horizontal(1));

        let times = if self.completions == 1 {
            "once".to_string()
        } else {
            format!("{} times", self.completions)
        };
        let body = vec![
            Line::default(),
            Line::from(Span::styled(
                self.deck_title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("You've been through every card {}.", times)),
            Line::from(Span::styled(
                "Starting again from the first card.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, overlay);
    }
}

/// Create a centered rect using percentage of the outer area.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}
