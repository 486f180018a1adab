//! # Footer Component
//!
//! The three self-assessment buttons, each a third of the width.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::core::action::Assessment;
use crate::tui::component::Component;

pub fn footer_layout(area: Rect) -> [Rect; 3] {
    Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(area)
}

fn glyph(assessment: Assessment) -> (&'static str, Color) {
    match assessment {
        Assessment::DontKnow => ("✗", Color::Red),
        Assessment::Familiar => ("~", Color::Yellow),
        Assessment::Mastered => ("✓", Color::Green),
    }
}

pub struct Footer {
    /// Buttons are dimmed while a card transition is pending.
    pub dimmed: bool,
}

impl Footer {
    pub fn new(dimmed: bool) -> Self {
        Self { dimmed }
    }
}

impl Component for Footer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        for (i, (assessment, rect)) in Assessment::ALL
            .iter()
            .zip(footer_layout(area))
            .enumerate()
        {
            let (icon, color) = glyph(*assessment);
            let mut style = Style::default().fg(color);
            if self.dimmed {
                style = style.add_modifier(Modifier::DIM);
            }
            let line = Line::from(vec![
                Span::styled(format!("{} ", icon), style.add_modifier(Modifier::BOLD)),
                Span::styled(assessment.label().to_uppercase(), style),
                Span::styled(format!(" [{}]", i + 1), Style::default().fg(Color::DarkGray)),
            ]);
            let button = Paragraph::new(line).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(button, rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_footer_labels() {
        let backend = TestBackend::new(90, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| Footer::new(false).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("DON'T KNOW [1]"));
        assert!(text.contains("FAMILIAR [2]"));
        assert!(text.contains("MASTERED [3]"));
    }

    #[test]
    fn test_layout_splits_evenly() {
        let areas = footer_layout(Rect::new(0, 0, 90, 3));
        assert_eq!(areas.map(|r| r.width), [30, 30, 30]);
        assert_eq!(areas[2].right(), 90);
    }
}
