use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Message;
use crate::toolbar::Command;

/// Translate a terminal event into a message, if it means anything here.
pub fn message_for_event(event: Event) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => Some(message_for_key(key)),
        Event::Paste(text) => Some(Message::Paste(text)),
        _ => None,
    }
}

/// Host shortcuts first; every other key goes to the text widget.
pub fn message_for_key(key: KeyEvent) -> Message {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => Message::Save,
        KeyCode::Char('q') if ctrl => Message::Quit,
        KeyCode::Char('b') if ctrl => Message::Toolbar(Command::Bold),
        KeyCode::F(n) => toolbar_for_function_key(n).map_or(Message::Key(key), Message::Toolbar),
        _ => Message::Key(key),
    }
}

const fn toolbar_for_function_key(n: u8) -> Option<Command> {
    match n {
        2 => Some(Command::Bold),
        3 => Some(Command::Italic),
        4 => Some(Command::Heading),
        5 => Some(Command::Link),
        6 => Some(Command::List),
        _ => None,
    }
}
