use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub const SEND_LABEL: &str = "Send";
pub const THINKING_LABEL: &str = "Thinking...";

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// The send affordance: a one-line status between the transcript and the
/// input box. Shows "Send" while idle and an animated "Thinking..." while a
/// request is in flight.
#[derive(Debug)]
pub struct StatusIndicator {
    thinking: bool,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self {
            thinking: false,
            spinner_idx: 0,
        }
    }

    pub fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
        if !thinking {
            self.spinner_idx = 0;
        }
    }

    pub fn label(&self) -> &'static str {
        if self.thinking {
            THINKING_LABEL
        } else {
            SEND_LABEL
        }
    }

    /// Advances the spinner one frame; a no-op while idle.
    pub fn tick(&mut self) {
        if self.thinking {
            self.spinner_idx = self.spinner_idx.wrapping_add(1);
        }
    }

    pub fn spinner_frame(&self) -> &'static str {
        if self.thinking {
            SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
        } else {
            " "
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let label_style = if self.thinking {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Yellow)
        };

        let status = Line::from(vec![
            Span::styled(self.spinner_frame(), Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(self.label(), label_style),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }
}
