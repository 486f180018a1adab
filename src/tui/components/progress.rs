//! # Progress Component
//!
//! Two rows under the header: a filled bar and the `position | total` label.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

const FILLED: Color = Color::Rgb(99, 102, 241);

pub struct Progress {
    pub position: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(position: usize, total: usize) -> Self {
        Self { position, total }
    }

    pub fn label(&self) -> String {
        format!("{} | {}", self.position, self.total)
    }

    /// Columns of the bar that are filled at `width`.
    pub fn filled_width(&self, width: u16) -> u16 {
        if self.total == 0 {
            return 0;
        }
        let filled = (self.position.min(self.total) * width as usize) / self.total;
        filled as u16
    }
}

impl Component for Progress {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let filled = self.filled_width(area.width);
        let bar = Line::from(vec![
            Span::styled("━".repeat(filled as usize), Style::default().fg(FILLED)),
            Span::styled(
                "━".repeat(area.width.saturating_sub(filled) as usize),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let label = Line::from(Span::styled(self.label(), Style::default().fg(Color::Gray)))
            .alignment(Alignment::Right);

        frame.render_widget(Paragraph::new(vec![bar, label]), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_label_format() {
        assert_eq!(Progress::new(1, 20).label(), "1 | 20");
    }

    #[test]
    fn test_filled_width() {
        assert_eq!(Progress::new(1, 4).filled_width(40), 10);
        assert_eq!(Progress::new(4, 4).filled_width(40), 40);
        assert_eq!(Progress::new(0, 0).filled_width(40), 0);
    }

    #[test]
    fn test_render_shows_label() {
        let backend = TestBackend::new(30, 2);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| Progress::new(3, 20).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("━"));
        assert!(text.trim_end().ends_with("3 | 20"));
    }
}
