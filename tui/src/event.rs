use crate::app::InputEvent;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

pub fn map_crossterm_event_to_input_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return None;
            }
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(InputEvent::AttemptQuit)
                }
                KeyCode::Char(c) => Some(InputEvent::InputChanged(c)),
                KeyCode::Backspace => Some(InputEvent::InputBackspace),
                KeyCode::Enter => Some(InputEvent::InputSubmitted),
                KeyCode::Esc => Some(InputEvent::HandleEsc),
                KeyCode::Left => Some(InputEvent::CursorLeft),
                KeyCode::Right => Some(InputEvent::CursorRight),
                _ => None,
            }
        }
        Event::Resize(width, height) => Some(InputEvent::Resized(width, height)),
        _ => None,
    }
}
