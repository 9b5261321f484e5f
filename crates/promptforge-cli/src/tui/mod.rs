//! Interactive prompt editor.

pub mod app;
mod ui;

use std::io;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::warn;

use promptforge_store::SnippetStore;

use crate::config::ForgeConfig;
use app::{App, Focus};

/// Launch the interactive editor.
pub async fn run_editor(config: ForgeConfig) -> Result<()> {
    let store = SnippetStore::open(&config.store)
        .with_context(|| format!("failed to open snippet store {}", config.store.path.display()))?;
    let generator = match config.generator() {
        Ok(generator) => Some(generator),
        Err(e) => {
            warn!(error = %e, "forge disabled");
            None
        }
    };

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, generator);

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = app.tick_rate;

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with a timeout matching the tick rate.
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        app.poll_generation();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Clear status message on any keypress, except while a forge is running.
    if !app.is_generating() {
        app.status_message = None;
    }

    match key.code {
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('y') if ctrl => {
            app.copy_markup();
            return;
        }
        KeyCode::Char('d') if ctrl => {
            app.delete_focused();
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Editing(_) => match key.code {
            KeyCode::Esc => app.stop_editing(),
            KeyCode::Enter => app.edit_char('\n'),
            KeyCode::Backspace => app.edit_backspace(),
            KeyCode::Char(c) if !ctrl => app.edit_char(c),
            _ => {}
        },
        Focus::CommandBar => {
            let suggesting = !app.session.suggestions().is_empty();
            match key.code {
                KeyCode::Enter if app.input.is_empty() => app.start_editing(),
                KeyCode::Enter => app.submit(),
                KeyCode::Tab if suggesting => app.accept_suggestion(),
                KeyCode::Up if suggesting => app.suggestion_up(),
                KeyCode::Down if suggesting => app.suggestion_down(),
                KeyCode::Up => app.focus_prev(),
                KeyCode::Down => app.focus_next(),
                KeyCode::Esc => {
                    app.input.clear();
                    app.session.clear_suggestions();
                }
                KeyCode::Backspace => app.input_backspace(),
                KeyCode::Char(c) if !ctrl => app.input_char(c),
                _ => {}
            }
        }
    }
}
