use crate::recycler_view::ScrollCommand;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEventKind;

/// Maps a crossterm event to the list command it stands for, if any.
pub fn scroll_command_from_crossterm(ev: Event) -> Option<ScrollCommand> {
    match ev {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return None;
            }
            scroll_command_from_key(key)
        }
        Event::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(ScrollCommand::LineUp),
            MouseEventKind::ScrollDown => Some(ScrollCommand::LineDown),
            _ => None,
        },
        _ => None,
    }
}

pub fn scroll_command_from_key(key: KeyEvent) -> Option<ScrollCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('d') => Some(ScrollCommand::PageDown),
            KeyCode::Char('u') => Some(ScrollCommand::PageUp),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(ScrollCommand::LineUp),
        KeyCode::Down | KeyCode::Char('j') => Some(ScrollCommand::LineDown),
        KeyCode::PageUp => Some(ScrollCommand::PageUp),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(ScrollCommand::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(ScrollCommand::Top),
        KeyCode::End | KeyCode::Char('G') => Some(ScrollCommand::Bottom),
        KeyCode::Char('[') => Some(ScrollCommand::PrevItem),
        KeyCode::Char(']') | KeyCode::Tab => Some(ScrollCommand::NextItem),
        _ => None,
    }
}
