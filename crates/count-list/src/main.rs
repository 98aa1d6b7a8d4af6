use anyhow::Result;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::time::Duration;

mod actions;
mod app;
mod logger;
mod middleware;
mod reducer;
mod state;
mod views;

use app::App;
use count_list_config::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::load();
    let log_file = logger::init(&config.log_level)?;

    log::info!("Starting count-list, logging to {}", log_file.display());

    // Build the app before touching the terminal so setup errors print normally
    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &mut app,
        Duration::from_millis(config.tick_rate_ms),
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        log::error!("count-list failed: {}", err);
    }

    log::info!("Exiting count-list");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut drawn = None;

    while app.is_running() {
        // Only redraw when a connected view or the status line changed
        let frame_key = app.frame_key();
        if drawn.as_ref() != Some(&frame_key) {
            terminal.draw(|frame| views::render(app, frame))?;
            drawn = Some(frame_key);
        }

        if event::poll(tick_rate)? {
            match event::read()? {
                // Only process key press events (ignore key release)
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(_, _) => drawn = None,
                _ => {}
            }
        }
    }

    Ok(())
}
