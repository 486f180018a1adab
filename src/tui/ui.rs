use crate::core::action::{Action, Assessment, HeaderButton};
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::card_view::flip_button_area;
use crate::tui::components::footer::footer_layout;
use crate::tui::components::header::{HeaderLayout, header_layout};
use crate::tui::components::{CardView, Footer, Header, Progress};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// Clickable regions from the last drawn frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: HeaderLayout,
    pub flip_button: Rect,
    pub footer: [Rect; 3],
}

/// Split the screen into header, progress, card, footer and key hints.
pub fn screen_areas(area: Rect) -> [Rect; 5] {
    use Constraint::{Length, Min};
    let area = area.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    Layout::vertical([Length(1), Length(2), Min(5), Length(3), Length(1)]).areas(area)
}

/// Whether a plain fallback panel is on screen (and so `r` means retry).
pub fn fallback_visible(app: &App, tui: &TuiState) -> bool {
    app.is_flipped() && tui.card.code.is_showing_fallback()
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let [header_area, progress_area, card_area, footer_area, hints_area] =
        screen_areas(frame.area());

    Header::new(app.deck.title(), app.index() > 0).render(frame, header_area);
    Progress::new(app.position(), app.total()).render(frame, progress_area);
    CardView::new(
        &mut tui.card,
        app.current_card(),
        app.index(),
        app.is_flipped(),
        app.is_transitioning(),
        &app.engine,
        tui.pulse_value,
    )
    .render(frame, card_area);
    Footer::new(app.is_transitioning()).render(frame, footer_area);
    draw_hints(frame, hints_area, &app.status_message, fallback_visible(app, tui));

    tui.layout = ScreenLayout {
        header: header_layout(header_area),
        flip_button: flip_button_area(card_area, app.is_flipped()),
        footer: footer_layout(footer_area),
    };

    // Modal last so it sits on top of everything
    if let Some(notice) = &tui.notice {
        notice.render(frame, frame.area());
    }
}

fn draw_hints(frame: &mut Frame, area: Rect, status: &str, show_retry: bool) {
    let key = Style::default().fg(Color::Gray);
    let desc = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled("Space", key),
        Span::styled(" flip  ", desc),
        Span::styled("←/→", key),
        Span::styled(" cards  ", desc),
        Span::styled("1-3", key),
        Span::styled(" assess  ", desc),
        Span::styled("q", key),
        Span::styled(" quit", desc),
    ];
    if show_retry {
        spans.push(Span::styled("  r", key));
        spans.push(Span::styled(" retry highlighting", desc));
    }

    let status_width = (status.width() as u16).min(area.width / 2);
    let [hints_area, status_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width)]).areas(area);
    frame.render_widget(Paragraph::new(Line::from(spans)), hints_area);
    frame.render_widget(
        Paragraph::new(Line::from(status.to_string()).right_aligned())
            .style(Style::default().fg(Color::DarkGray)),
        status_area,
    );
}

/// Hit test: map a left click to the action of the control under it.
pub fn hit_test(layout: &ScreenLayout, column: u16, row: u16) -> Option<Action> {
    let pos = Position::new(column, row);
    if layout.header.back.contains(pos) {
        return Some(Action::Retreat);
    }
    if let Some((button, _)) = HeaderButton::ALL
        .iter()
        .zip(layout.header.buttons)
        .find(|(_, rect)| rect.contains(pos))
    {
        return Some(Action::Header(*button));
    }
    if layout.flip_button.contains(pos) {
        return Some(Action::Flip);
    }
    Assessment::ALL
        .iter()
        .zip(layout.footer)
        .find(|(_, rect)| rect.contains(pos))
        .map(|(assessment, _)| Action::Assess(*assessment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::update;
    use crate::core::card::{Card, Deck};
    use crate::test_support::{FailingEngine, StaticEngine, test_app};
    use crate::tui::component::EventHandler;
    use crate::tui::components::CompletionNotice;
    use crate::tui::event::TuiEvent;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_front() {
        let app = test_app(3);
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);

        assert!(text.contains("‹ Back"));
        assert!(text.contains("Test Deck"));
        assert!(text.contains("Settings"));
        assert!(text.contains("1 | 3"));
        assert!(text.contains("FRONT"));
        assert!(text.contains("Question 1"));
        assert!(text.contains("DON'T KNOW"));
        assert!(text.contains("MASTERED"));
        assert!(!text.contains("retry highlighting"));
    }

    #[test]
    fn test_draw_ui_back_after_flip() {
        let mut app = test_app(3);
        update(&mut app, Action::Flip);
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);

        assert!(text.contains("BACK"));
        assert!(text.contains("Answer 1"));
    }

    #[test]
    fn test_fallback_shows_retry_control() {
        let card = Card::new("1", "Q", "```js\nconst x = 1;\n```");
        let mut app = App::new(Deck::new("Code", vec![card]).unwrap());
        let generation = app.engine.begin().unwrap();
        app.engine.resolve(generation, Ok(Arc::new(FailingEngine)));
        update(&mut app, Action::Flip);

        let mut tui = TuiState::new();
        draw(&app, &mut tui);
        let text = draw(&app, &mut tui);

        assert!(text.contains("const x = 1;"));
        assert!(text.contains("Retry syntax highlighting"));
        assert!(text.contains("retry highlighting"));
        assert!(fallback_visible(&app, &tui));
    }

    #[test]
    fn test_unrelated_redraws_reuse_rendered_answer() {
        let back = (1..=40)
            .map(|i| format!("Line {i}\n"))
            .collect::<Vec<_>>()
            .join("\n");
        let card = Card::new("1", "Q", format!("{back}\n```js\nconst x = 1;\n```"));
        let mut app = App::new(Deck::new("Code", vec![card]).unwrap());
        let generation = app.engine.begin().unwrap();
        app.engine.resolve(generation, Ok(Arc::new(StaticEngine)));
        update(&mut app, Action::Flip);

        let mut tui = TuiState::new();
        tui.pulse_value = 0.1;
        draw(&app, &mut tui);

        tui.pulse_value = 0.9;
        draw(&app, &mut tui);
        tui.card.handle_event(&TuiEvent::ScrollDown);
        tui.card.handle_event(&TuiEvent::ScrollDown);
        draw(&app, &mut tui);

        assert_eq!(tui.card.scroll_state.offset().y, 2);
        assert_eq!(tui.card.code.output_computations(), 1);
        assert_eq!(tui.card.code.rules_computations(), 1);
    }

    #[test]
    fn test_fallback_hidden_on_front() {
        let card = Card::new("1", "Q", "```js\nconst x = 1;\n```");
        let mut app = App::new(Deck::new("Code", vec![card]).unwrap());
        let generation = app.engine.begin().unwrap();
        app.engine.resolve(generation, Ok(Arc::new(FailingEngine)));
        update(&mut app, Action::Flip);
        let mut tui = TuiState::new();
        draw(&app, &mut tui);

        update(&mut app, Action::Flip);
        draw(&app, &mut tui);
        assert!(!fallback_visible(&app, &tui));
    }

    #[test]
    fn test_notice_overlay_drawn() {
        let app = test_app(2);
        let mut tui = TuiState::new();
        tui.notice = Some(CompletionNotice::new("Test Deck", 1));
        let text = draw(&app, &mut tui);
        assert!(text.contains("Deck completed!"));
    }

    #[test]
    fn test_hit_test_controls() {
        let mut app = test_app(3);
        update(&mut app, Action::Flip);
        let mut tui = TuiState::new();
        draw(&app, &mut tui);
        let layout = tui.layout;

        let back = layout.header.back;
        assert!(matches!(hit_test(&layout, back.x, back.y), Some(Action::Retreat)));

        let edit = layout.header.buttons[1];
        assert!(matches!(
            hit_test(&layout, edit.x + 1, edit.y),
            Some(Action::Header(HeaderButton::Edit))
        ));

        let flip = layout.flip_button;
        assert!(matches!(hit_test(&layout, flip.x + 2, flip.y), Some(Action::Flip)));

        let mastered = layout.footer[2];
        assert!(matches!(
            hit_test(&layout, mastered.x + 3, mastered.y + 1),
            Some(Action::Assess(Assessment::Mastered))
        ));

        // Card body is not a control.
        assert!(hit_test(&layout, 40, 10).is_none());
    }
}
