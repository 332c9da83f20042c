// src/ui.rs

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Position,
    Terminal,
};
use tokio::sync::mpsc;

use crate::api::{ChatClient, ChatResponse};
use crate::app::{App, AppScreen, Outbound};
use crate::chat_view::draw_chat;
use crate::errors::ParleyResult;
use crate::key_handlers::{handle_chat_key, handle_quit_confirm_key};

/// Everything the UI task reacts to: terminal input, the animation tick,
/// and request outcomes coming back from the spawned send task.
enum Event {
    Input(CrosstermEvent),
    Tick,
    Outcome(ParleyResult<ChatResponse>),
}

/// Sets up the terminal, runs the chat until the user quits, and restores
/// the terminal on the way out.
pub async fn run_ui(client: ChatClient) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, App::new(), client).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    client: ChatClient,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // Forward terminal events and a periodic tick into the channel.
    let input_tx = tx.clone();
    tokio::spawn(async move {
        let mut last_tick = Instant::now();
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    if input_tx.send(Event::Input(ev)).await.is_err() {
                        return;
                    }
                }
            }

            if last_tick.elapsed() >= Duration::from_millis(250) {
                if input_tx.send(Event::Tick).await.is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    loop {
        terminal.draw(|f| draw_chat(f, &mut app))?;

        match rx.recv().await {
            Some(Event::Input(CrosstermEvent::Key(key))) => match app.screen {
                AppScreen::Chat => {
                    if let Some(outbound) = handle_chat_key(key, &mut app) {
                        spawn_send(&client, &tx, outbound);
                    }
                }
                AppScreen::QuitConfirm => handle_quit_confirm_key(key, &mut app),
                AppScreen::Quit => {}
            },
            Some(Event::Input(CrosstermEvent::Mouse(mouse))) => {
                // Clicking the send affordance submits, same as Enter.
                if app.screen == AppScreen::Chat
                    && mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    && app
                        .send_area
                        .contains(Position::new(mouse.column, mouse.row))
                {
                    if let Some(outbound) = app.submit() {
                        spawn_send(&client, &tx, outbound);
                    }
                }
            }
            Some(Event::Input(_)) => {}
            Some(Event::Tick) => app.status.tick(),
            Some(Event::Outcome(outcome)) => {
                debug!("Request outcome delivered");
                app.complete(outcome);
            }
            None => break,
        }

        if app.screen == AppScreen::Quit {
            break;
        }
    }

    Ok(())
}

/// One request task per send; the pending flag keeps a second one from
/// starting until this outcome is back.
fn spawn_send(client: &ChatClient, tx: &mpsc::Sender<Event>, outbound: Outbound) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.send(&outbound.message, &outbound.session).await;
        let _ = tx.send(Event::Outcome(outcome)).await;
    });
}
