mod app;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use std::time::Duration;
use tracing::{info, warn};
use tui_globe::config::{CliArgs, GlobeConfig};
use tui_globe::logging::init_logging;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let mut config = GlobeConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.apply_cli_overrides(&args);
    init_logging(&config.debug).context("setting up logging")?;

    match GlobeConfig::write_default_if_missing(&args.config) {
        Ok(true) => info!(path = %args.config.display(), "wrote default config"),
        Ok(false) => {}
        Err(e) => warn!(path = %args.config.display(), error = %e, "could not write default config"),
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = run(&mut terminal, &config);

    ratatui::restore();
    result
}

/// Drag rotates, wheel zooms
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(),
        MouseEventKind::ScrollDown => app.scroll_down(),
        MouseEventKind::Down(MouseButton::Left) => app.drag_start(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.drag_move(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.drag_end(),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: &GlobeConfig) -> Result<()> {
    let size = terminal.size()?;
    // Initializing the globe captures the mouse; destroying it releases it.
    let mut app = App::new(config, size.width as usize, size.height as usize, true)?;
    info!(width = size.width, height = size.height, "terminal ready");

    let frame_interval = Duration::from_millis(config.frame_interval_ms.max(1));
    let result = event_loop(terminal, &mut app, frame_interval);

    // Release the mouse before the terminal is restored.
    app.globe.destroy();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App, frame_interval: Duration) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events at the configured frame rate
        if event::poll(frame_interval)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),
                            KeyCode::Char('0') => app.snap_zoom(),
                            KeyCode::Char('r') => app.reset_view(),

                            // Blocks
                            KeyCode::Char('c') => app.center_on_newest(),
                            KeyCode::Char('x') => app.clear_blocks(),
                            KeyCode::Char('s') => app.pin_center(),
                            KeyCode::Char(' ') => app.toggle_feed(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        // Advance easing and levitation
        app.update();

        if app.should_quit {
            return Ok(());
        }
    }
}
