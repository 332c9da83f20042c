use log::error;
use ratatui::layout::Rect;

use crate::api::ChatResponse;
use crate::errors::ParleyResult;
use crate::session::Session;
use crate::status_indicator::StatusIndicator;
use crate::transcript::{ChatMessage, Sender, Transcript};

/// Shown in place of a reply when a send fails for any reason.
pub const FALLBACK_REPLY: &str = "Oops, something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Chat,
    QuitConfirm,
    Quit,
}

/// Snapshot handed to the request task when a submit goes through. The
/// session is captured at submit time; with sends serialized it cannot
/// change while the request is in flight.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub message: String,
    pub session: Session,
}

/// Owns the conversation state and the send-cycle state machine: idle until
/// a submit, pending until the outcome arrives, then idle again.
pub struct App {
    pub screen: AppScreen,
    pub transcript: Transcript,
    pub input: String,
    pub session: Session,
    pub pending: bool,
    pub status: StatusIndicator,
    pub scroll: u16,
    pub follow: bool,
    /// Where the send affordance was drawn last frame, for mouse hits.
    pub send_area: Rect,
}

impl App {
    pub fn new() -> App {
        App {
            screen: AppScreen::Chat,
            transcript: Transcript::new(),
            input: String::new(),
            session: Session::new(),
            pending: false,
            status: StatusIndicator::new(),
            scroll: 0,
            follow: true,
            send_area: Rect::default(),
        }
    }

    /// Starts a send cycle. Returns the request snapshot, or `None` when
    /// the trimmed input is empty or another request is still in flight;
    /// both cases leave the app untouched.
    pub fn submit(&mut self) -> Option<Outbound> {
        if self.pending {
            return None;
        }

        let message = self.input.trim().to_string();
        if message.is_empty() {
            return None;
        }

        // The user message is rendered optimistically and never retracted,
        // even if the request later fails.
        self.transcript
            .push(ChatMessage::new(message.clone(), Sender::User));
        self.input.clear();
        self.pending = true;
        self.status.set_thinking(true);
        self.follow = true;

        Some(Outbound {
            message,
            session: self.session.clone(),
        })
    }

    /// Finishes a send cycle with the request outcome. Every exit path
    /// drops back to idle with the input re-enabled.
    pub fn complete(&mut self, outcome: ParleyResult<ChatResponse>) {
        match outcome {
            Ok(response) => {
                self.session.absorb(response.session_id);
                self.transcript
                    .push(ChatMessage::new(response.reply, Sender::Bot));
            }
            Err(err) => {
                error!("Send failed: {}", err);
                self.transcript
                    .push(ChatMessage::new(FALLBACK_REPLY, Sender::Bot));
            }
        }

        self.pending = false;
        self.status.set_thinking(false);
        self.follow = true;
    }

    pub fn scroll_up(&mut self) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParleyError;
    use crate::status_indicator::{SEND_LABEL, THINKING_LABEL};

    fn reply(text: &str, session_id: Option<&str>) -> ParleyResult<ChatResponse> {
        Ok(ChatResponse {
            reply: text.to_string(),
            session_id: session_id.map(str::to_string),
        })
    }

    #[test]
    fn whitespace_only_input_is_a_no_op() {
        let mut app = App::new();
        app.input = "   \n  ".to_string();

        assert!(app.submit().is_none());
        assert!(app.transcript.is_empty());
        assert!(!app.pending);
        assert_eq!(app.input, "   \n  ");
    }

    #[test]
    fn submit_appends_user_message_and_enters_pending() {
        let mut app = App::new();
        app.input = "  Hello  ".to_string();

        let outbound = app.submit().unwrap();
        assert_eq!(outbound.message, "Hello");
        assert_eq!(outbound.session.token(), None);

        assert_eq!(app.transcript.len(), 1);
        let first = app.transcript.last().unwrap();
        assert_eq!(first.content, "Hello");
        assert_eq!(first.sender, Sender::User);

        assert!(app.input.is_empty());
        assert!(app.pending);
        assert_eq!(app.status.label(), THINKING_LABEL);
    }

    #[test]
    fn submit_is_refused_while_pending() {
        let mut app = App::new();
        app.input = "Hello".to_string();
        app.submit().unwrap();

        app.input = "Another".to_string();
        assert!(app.submit().is_none());
        assert_eq!(app.transcript.len(), 1);
    }

    #[test]
    fn successful_outcome_appends_reply_and_restores_idle() {
        let mut app = App::new();
        app.input = "Hello".to_string();
        app.submit().unwrap();

        app.complete(reply("Hi!", Some("abc123")));

        assert_eq!(app.transcript.len(), 2);
        let last = app.transcript.last().unwrap();
        assert_eq!(last.content, "Hi!");
        assert_eq!(last.sender, Sender::Bot);

        assert_eq!(app.session.token(), Some("abc123"));
        assert!(!app.pending);
        assert!(app.input.is_empty());
        assert_eq!(app.status.label(), SEND_LABEL);
    }

    #[test]
    fn reply_without_token_preserves_the_held_one() {
        let mut app = App::new();
        app.session.absorb(Some("abc123".to_string()));

        app.input = "Hello".to_string();
        app.submit().unwrap();
        app.complete(reply("Hi!", None));

        assert_eq!(app.session.token(), Some("abc123"));
    }

    #[test]
    fn returned_token_replaces_the_held_one() {
        let mut app = App::new();
        app.session.absorb(Some("abc123".to_string()));

        app.input = "Hello".to_string();
        app.submit().unwrap();
        app.complete(reply("Hi!", Some("def456")));

        assert_eq!(app.session.token(), Some("def456"));
    }

    #[test]
    fn failed_outcome_appends_fallback_and_leaves_token_alone() {
        let mut app = App::new();
        app.session.absorb(Some("abc123".to_string()));

        app.input = "Hello".to_string();
        app.submit().unwrap();
        app.complete(Err(ParleyError::server_error(500)));

        assert_eq!(app.transcript.len(), 2);
        let last = app.transcript.last().unwrap();
        assert_eq!(last.content, FALLBACK_REPLY);
        assert_eq!(last.sender, Sender::Bot);

        assert_eq!(app.session.token(), Some("abc123"));
        assert!(!app.pending);
        assert_eq!(app.status.label(), SEND_LABEL);
    }

    #[test]
    fn next_submit_carries_the_token_from_the_previous_reply() {
        let mut app = App::new();

        app.input = "Hello".to_string();
        let first = app.submit().unwrap();
        assert_eq!(first.session.token(), None);
        app.complete(reply("Hi!", Some("abc123")));

        app.input = "Again".to_string();
        let second = app.submit().unwrap();
        assert_eq!(second.message, "Again");
        assert_eq!(second.session.token(), Some("abc123"));
    }
}
