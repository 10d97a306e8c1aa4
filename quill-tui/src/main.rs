//! quill-tui - Terminal UI for Quill
//!
//! Browse topics, read posts and write new ones from the terminal.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::Utc;
use clap::Parser;

use libquill::logging::config_from_env;
use libquill::{Config, Route, Store};
use quill_tui::{
    app::{enter, event::EventHandler, event::TuiEvent, handle, map_key, Action, AppState},
    error::Result,
    services::ServiceHandle,
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui,
};

#[derive(Parser, Debug)]
#[command(name = "quill-tui")]
#[command(version)]
#[command(about = "Terminal UI for Quill")]
struct Cli {
    /// View to open first, e.g. /all or /topic/rust
    #[arg(value_name = "PATH", default_value = "/")]
    path: String,

    /// Where to write logs (the terminal itself is taken)
    #[arg(long, env = "QUILL_TUI_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let mut logging = config_from_env("info");
    if let Some(path) = cli.log_file.clone().or_else(default_log_file) {
        logging = logging.with_file(path);
    }
    logging.init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("quill").join("quill-tui.log"))
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default()?;
    let services = ServiceHandle::from_config(&config)?;

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, &services, Route::parse(&cli.path));

    restore_terminal(terminal)?;

    result
}

fn run_app(terminal: &mut Tui, services: &ServiceHandle, initial: Route) -> Result<()> {
    let mut ui = AppState::at(initial);
    let mut store = Store::new();

    // Any store change means the screen is stale
    let dirty = Rc::new(Cell::new(true));
    let flag = Rc::clone(&dirty);
    let subscription = store.subscribe(move |_| flag.set(true));

    let event_handler = EventHandler::new(ui.config.tick_rate_ms);

    tracing::info!(route = %ui.route.path(), "starting");

    services.restore_session();
    for effect in enter(&ui.route, store.state(), false) {
        services.run(effect, &mut store);
    }

    loop {
        if dirty.replace(false) {
            terminal.draw(|frame| ui::render(frame, &ui, store.state()))?;
        }

        let mut actions: Vec<Action> = match event_handler.next()? {
            TuiEvent::Key(key) => {
                dirty.set(true);
                map_key(&ui, store.state(), key).into_iter().collect()
            }
            TuiEvent::Resize(width, height) => {
                dirty.set(true);
                vec![Action::Resize(width, height)]
            }
            TuiEvent::Tick => vec![Action::Tick(Utc::now())],
        };

        // Results from background tasks
        actions.extend(services.receiver().try_iter());

        for action in actions {
            if !matches!(action, Action::Tick(_) | Action::Store(_)) {
                dirty.set(true);
            }

            let (next, effects) = handle(ui, &mut store, action);
            ui = next;
            for effect in effects {
                services.run(effect, &mut store);
            }
        }

        if ui.should_quit {
            break;
        }
    }

    store.unsubscribe(subscription);
    tracing::info!("exiting");
    Ok(())
}
