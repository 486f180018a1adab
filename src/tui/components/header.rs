//! # Header Component
//!
//! Top bar of the study screen:
//!
//! ```text
//! ‹ Back              React Beginner              Delete  Edit  Settings
//! ```
//!
//! Stateless. Button positions come from [`header_layout`], which the
//! renderer and the mouse hit-test share so a click always lands on what was
//! drawn.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use crate::core::action::HeaderButton;
use crate::tui::component::Component;

pub const BACK_LABEL: &str = "‹ Back";
const BUTTON_GAP: u16 = 2;

/// Screen positions of the header's clickable parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderLayout {
    pub back: Rect,
    pub buttons: [Rect; 3],
    pub title: Rect,
}

pub fn header_layout(area: Rect) -> HeaderLayout {
    let row = |x: u16, width: u16| Rect::new(x, area.y, width, area.height.min(1));

    let back_width = (BACK_LABEL.width() as u16).min(area.width);
    let back = row(area.x, back_width);

    let widths = HeaderButton::ALL.map(|b| b.label().width() as u16);
    let total: u16 = widths.iter().sum::<u16>() + BUTTON_GAP * (widths.len() as u16 - 1);
    let mut x = area.right().saturating_sub(total).max(back.right());
    let mut buttons = [Rect::default(); 3];
    for (slot, width) in buttons.iter_mut().zip(widths) {
        let width = width.min(area.right().saturating_sub(x));
        *slot = row(x, width);
        x = x.saturating_add(width + BUTTON_GAP).min(area.right());
    }

    let title_x = back.right() + BUTTON_GAP;
    let title_end = buttons[0].x.saturating_sub(BUTTON_GAP);
    let title = row(title_x.min(title_end), title_end.saturating_sub(title_x));

    HeaderLayout {
        back,
        buttons,
        title,
    }
}

/// Fit `s` into `max_width` columns, ending in "…" when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub struct Header<'a> {
    pub title: &'a str,
    /// Back is dimmed on the first card, where it does nothing.
    pub can_go_back: bool,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, can_go_back: bool) -> Self {
        Self { title, can_go_back }
    }
}

impl Component for Header<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let layout = header_layout(area);

        let back_style = if self.can_go_back {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(Span::styled(BACK_LABEL, back_style), layout.back);

        let title = truncate_to_width(self.title, layout.title.width as usize);
        let pad = (layout.title.width as usize).saturating_sub(title.width()) / 2;
        frame.render_widget(
            Span::styled(
                format!("{}{}", " ".repeat(pad), title),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            layout.title,
        );

        for (button, rect) in HeaderButton::ALL.iter().zip(layout.buttons) {
            frame.render_widget(
                Span::styled(button.label(), Style::default().fg(Color::DarkGray)),
                rect,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title: &str, width: u16) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| Header::new(title, true).render(f, f.area()))
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
    fn test_header_shows_all_parts() {
        let text = rendered("React Beginner", 80);
        assert!(text.starts_with("‹ Back"));
        assert!(text.contains("React Beginner"));
        assert!(text.contains("Delete"));
        assert!(text.contains("Edit"));
        assert!(text.trim_end().ends_with("Settings"));
    }

    #[test]
    fn test_long_title_is_truncated() {
        let text = rendered("An Extremely Long Deck Title That Will Not Fit", 40);
        assert!(text.contains('…'));
        assert!(text.contains("Settings"));
    }

    #[test]
    fn test_layout_buttons_do_not_overlap() {
        let layout = header_layout(Rect::new(0, 0, 80, 1));
        assert_eq!(layout.back, Rect::new(0, 0, 6, 1));
        assert_eq!(layout.buttons[2].right(), 80);
        assert!(layout.buttons[0].right() < layout.buttons[1].x);
        assert!(layout.buttons[1].right() < layout.buttons[2].x);
        assert!(layout.title.right() <= layout.buttons[0].x);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
