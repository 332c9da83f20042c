use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppScreen};
use crate::transcript::{ChatMessage, Sender};

pub fn draw_chat(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Min(1),    // transcript
                Constraint::Length(1), // status / send affordance
                Constraint::Length(4), // input box
            ]
            .as_ref(),
        )
        .split(f.area());

    draw_messages(f, app, chunks[0]);
    app.send_area = chunks[1];
    app.status.render(f, chunks[1]);
    draw_input(f, app, chunks[2]);

    if app.screen == AppScreen::QuitConfirm {
        draw_quit_confirm(f, f.area());
    }
}

fn draw_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for message in app.transcript.iter() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(render_message(message, area));
    }

    let total_lines = lines.len() as u16;
    let max_scroll = total_lines.saturating_sub(area.height);

    // Pin to the newest entry while following; otherwise clamp the manual
    // scroll to the content height.
    if app.follow {
        app.scroll = max_scroll;
    } else if app.scroll >= max_scroll {
        app.scroll = max_scroll;
        app.follow = true;
    }

    let messages = Paragraph::new(lines).scroll((app.scroll, 0));
    f.render_widget(messages, area);
}

fn render_message(message: &ChatMessage, area: Rect) -> Vec<Line<'static>> {
    let (name, color) = match message.sender {
        Sender::User => ("You", Color::Yellow),
        Sender::Bot => ("Bot", Color::Green),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{} ", name),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            message.timestamp.format("%H:%M").to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    let wrap_width = (area.width as usize).saturating_sub(2).max(1);
    for wrapped in wrap(&message.content, wrap_width) {
        lines.push(Line::from(Span::styled(
            format!("  {}", wrapped),
            Style::default().fg(Color::White),
        )));
    }

    lines
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Message");
    let inner = block.inner(area);

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::White))
        .block(block);
    f.render_widget(input, area);

    // Cursor sits after the last character of the last input line.
    let last_line = app.input.rsplit('\n').next().unwrap_or("");
    let row = (app.input.matches('\n').count() as u16).min(inner.height.saturating_sub(1));
    let col = (last_line.width() as u16).min(inner.width.saturating_sub(1));
    f.set_cursor_position((inner.x + col, inner.y + row));
}

fn draw_quit_confirm(f: &mut Frame, area: Rect) {
    let width = 40.min(area.width);
    let height = 3.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    f.render_widget(Clear, popup);

    let confirm = Paragraph::new("Leave the chat? (y/n)")
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Quit")
                .style(Style::default().fg(Color::LightYellow)),
        );
    f.render_widget(confirm, popup);
}
