pub mod app;
pub mod event;
pub mod form;
pub mod theme;
pub mod ui;

pub use app::App;
pub use form::{Field, Worksheet};
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

/// Run the interactive worksheet until the user quits.
///
/// Returns the app so the caller can report on the finished session.
pub async fn run_tui(mut app: App) -> anyhow::Result<App> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    log::debug!("{} worksheet started", app.worksheet.title());

    let result: anyhow::Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Some(Event::Key(key)) => handle_key_event(&mut app, key),
            Some(Event::Tick) => app.update_flash(),
            None => break Err(anyhow::anyhow!("Terminal input closed")),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result.map(|()| app)
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Editing => {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                // Quit
                KeyCode::Esc => app.should_quit = true,
                KeyCode::Char('c') if ctrl => app.should_quit = true,

                // Actions
                KeyCode::Char('e') if ctrl => app.export(),
                KeyCode::Char('o') if ctrl => app.open_focused_tool(),
                KeyCode::Enter => app.add_entry(),
                KeyCode::F(1) => app.show_help(),

                // Field focus
                KeyCode::Tab | KeyCode::Down => app.focus_next(),
                KeyCode::BackTab | KeyCode::Up => app.focus_previous(),

                // Slider / answer
                KeyCode::Left => app.adjust(-1),
                KeyCode::Right => app.adjust(1),

                // Table selection
                KeyCode::PageDown => app.next_row(),
                KeyCode::PageUp => app.previous_row(),

                // Text input
                KeyCode::Backspace => app.backspace(),
                KeyCode::Char(c) if !ctrl => app.type_char(c),

                _ => {}
            }
        }
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
