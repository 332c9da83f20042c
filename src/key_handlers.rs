use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppScreen, Outbound};

/// Key dispatch for the chat screen. Returns the outbound request when the
/// key triggered a send.
///
/// While a request is pending the editing keys are inert, matching the
/// disabled input field; scrolling and quitting stay available.
pub fn handle_chat_key(key: KeyEvent, app: &mut App) -> Option<Outbound> {
    match key.code {
        // Shift+Enter inserts a line break and never sends. Needs a
        // terminal that reports the modifier on Enter.
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            if !app.pending {
                app.input.push('\n');
            }
            None
        }
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => {
            if !app.pending {
                app.input.pop();
            }
            None
        }
        KeyCode::PageUp => {
            app.scroll_up();
            None
        }
        KeyCode::PageDown => {
            app.scroll_down();
            None
        }
        KeyCode::Esc => {
            app.screen = AppScreen::QuitConfirm;
            None
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'u' => app.scroll_up(),
                    'd' => app.scroll_down(),
                    _ => {}
                }
            } else if !app.pending {
                app.input.push(c);
            }
            None
        }
        _ => None,
    }
}

pub fn handle_quit_confirm_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.screen = AppScreen::Quit;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.screen = AppScreen::Chat;
        }
        _ => {}
    }
}
