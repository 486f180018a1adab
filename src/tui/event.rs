use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use crate::core::action::{Action, Assessment, HeaderButton};

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    ForceQuit, // Ctrl+C, quits from anywhere including the notice
    Escape,
    Enter,
    Backspace,
    Char(char),
    Left,
    Right,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToTop,
    MouseClick(u16, u16),
    Resize,
}

/// What a key press asks the event loop to do.
#[derive(Debug)]
pub enum Command {
    /// Forward to `core::update`.
    Core(Action),
    /// Retry highlighting on the visible fallback panel.
    Retry,
}

/// Keyboard mapping for the study screen. Scroll events and clicks are
/// routed elsewhere and map to nothing here.
pub fn command_for(event: &TuiEvent) -> Option<Command> {
    let action = match event {
        TuiEvent::Enter | TuiEvent::Char(' ') | TuiEvent::Char('f') => Action::Flip,
        TuiEvent::Right | TuiEvent::Char('l') | TuiEvent::Char('n') => Action::Advance,
        TuiEvent::Left | TuiEvent::Backspace | TuiEvent::Char('h') | TuiEvent::Char('b') => {
            Action::Retreat
        }
        TuiEvent::Char('1') => Action::Assess(Assessment::DontKnow),
        TuiEvent::Char('2') => Action::Assess(Assessment::Familiar),
        TuiEvent::Char('3') => Action::Assess(Assessment::Mastered),
        TuiEvent::Char('d') => Action::Header(HeaderButton::Delete),
        TuiEvent::Char('e') => Action::Header(HeaderButton::Edit),
        TuiEvent::Char('s') => Action::Header(HeaderButton::Settings),
        TuiEvent::Char('q') | TuiEvent::Escape | TuiEvent::ForceQuit => Action::Quit,
        TuiEvent::Char('r') => return Some(Command::Retry),
        _ => return None,
    };
    Some(Command::Core(action))
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> std::io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> std::io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(translate(event::read()?))
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Releases and repeats arrive on terminals with enhanced keyboard reporting.
            if key_event.kind != KeyEventKind::Press {
                return None;
            }
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (_, KeyCode::Char(c)) => Some(TuiEvent::Char(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Enter) => Some(TuiEvent::Enter),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Left) => Some(TuiEvent::Left),
                (_, KeyCode::Right) => Some(TuiEvent::Right),
                (_, KeyCode::Up) => Some(TuiEvent::ScrollUp),
                (_, KeyCode::Down) => Some(TuiEvent::ScrollDown),
                (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
                (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
                (_, KeyCode::Home) => Some(TuiEvent::ScrollToTop),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
            }
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Resize(..) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_ctrl_c_is_force_quit() {
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(TuiEvent::ForceQuit)
        );
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::NONE)),
            Some(TuiEvent::Char('c'))
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Right,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(translate(release), None);
    }

    #[test]
    fn test_left_click_and_wheel() {
        let mouse = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 4,
                row: 7,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(
            translate(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(TuiEvent::MouseClick(4, 7))
        );
        assert_eq!(translate(mouse(MouseEventKind::ScrollDown)), Some(TuiEvent::ScrollDown));
        assert_eq!(translate(mouse(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_command_mapping() {
        assert!(matches!(command_for(&TuiEvent::Char(' ')), Some(Command::Core(Action::Flip))));
        assert!(matches!(command_for(&TuiEvent::Enter), Some(Command::Core(Action::Flip))));
        assert!(matches!(command_for(&TuiEvent::Right), Some(Command::Core(Action::Advance))));
        assert!(matches!(command_for(&TuiEvent::Backspace), Some(Command::Core(Action::Retreat))));
        assert!(matches!(
            command_for(&TuiEvent::Char('2')),
            Some(Command::Core(Action::Assess(Assessment::Familiar)))
        ));
        assert!(matches!(
            command_for(&TuiEvent::Char('s')),
            Some(Command::Core(Action::Header(HeaderButton::Settings)))
        ));
        assert!(matches!(command_for(&TuiEvent::Escape), Some(Command::Core(Action::Quit))));
        assert!(matches!(command_for(&TuiEvent::Char('r')), Some(Command::Retry)));
        assert!(command_for(&TuiEvent::ScrollDown).is_none());
        assert!(command_for(&TuiEvent::Char('z')).is_none());
    }
}
