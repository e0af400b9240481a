pub mod app;
pub mod render;

use crate::leads::LeadSink;
use crate::session::ChatSession;
use anyhow::Result;
use crossterm::event::{Event, EventStream};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::{Terminal, TerminalOptions, Viewport};
use std::io::{self, Stdout};
use std::time::Duration;

pub async fn run_tui(session: ChatSession, leads: LeadSink) -> Result<()> {
    let mut events_rx = session.subscribe();
    let mut terminal = setup_terminal()?;
    let mut app = app::App::new(session, leads);

    let tick_rate = Duration::from_millis(50);
    let mut event_stream = EventStream::new();

    loop {
        app.poll_background();
        app.refresh().await;
        terminal.draw(|f| app.render(f))?;

        // Wait for terminal input, a session event, or a tick — whichever
        // comes first. No mouse capture: the terminal scrollbar keeps
        // working natively; ↑/↓/PgUp/PgDn scroll internally.
        tokio::select! {
            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    if app.handle_key(key)? {
                        restore_terminal(terminal)?;
                        return Ok(());
                    }
                }
            }
            Ok(event) = events_rx.recv() => {
                app.handle_event(event);
            }
            _ = tokio::time::sleep(tick_rate) => {}
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let (_, rows) = crossterm::terminal::size()?;
    let terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(rows),
        },
    )?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.show_cursor()?;
    Ok(())
}
