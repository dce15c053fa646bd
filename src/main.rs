//! content-cards — browse a paginated JSON feed of content cards.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ status (watch) ┌──────────┐  draw()  ┌──────────┐
//! │  Loader  │ ─────────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (lib)    │ ◄───────────── │ (state)  │ ◄─────── │ (render) │
//! └──────────┘ notify_visible └──────────┘ viewport └──────────┘
//!                                  ▲
//!                                  │ handle_key_event()
//!                             ┌──────────┐
//!                             │ input.rs │
//!                             └──────────┘
//! ```
//!
//! * **`app`** — UI state: selection, status text, which cards are visible.
//! * **`ui`** — pure rendering, plus measuring the visible card range.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: parse args, set up logging
//!   and the terminal, and run the event loop.

mod app;
mod input;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tracing::info;

use app::App;
use content_cards::config::{BrowseArgs, Cli, Command, GenerateArgs};
use content_cards::{generate, logging, HttpPageSource, Loader, Record, RecordId};

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = Runtime::new().context("starting tokio runtime")?;

    match &cli.command {
        Some(Command::Generate(args)) => run_generate(&runtime, args),
        None => run_browser(&runtime, &cli.browse),
    }
}

fn run_generate(runtime: &Runtime, args: &GenerateArgs) -> Result<()> {
    logging::init_stderr()?;

    let report = runtime.block_on(generate::run(&args.generate_config()))?;
    println!(
        "Wrote {} records to {} files in {} ({} image URLs fetched{})",
        report.records,
        report.files.len(),
        args.out_dir.display(),
        report.images_fetched,
        if report.used_cache { ", cache used" } else { "" },
    );
    Ok(())
}

fn run_browser(runtime: &Runtime, args: &BrowseArgs) -> Result<()> {
    let log_path = args.log_path();
    let _log_guard = logging::init_file(&log_path)?;
    info!(url_base = %args.url_base, log = %log_path.display(), "starting");

    install_panic_hook();

    // -- start loading (the first page is requested right away) --------------
    let mut loader = Loader::new(
        args.store_config(),
        HttpPageSource::new(&args.url_base),
        runtime.handle().clone(),
    );
    let mut status = loader.subscribe();

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();
    app.apply_status(&status.borrow_and_update());

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply finished page loads and pick up the new status.
    //   2. Render the UI.
    //   3. Report cards that scrolled into view.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Completions
        loader.pump();
        if status.has_changed().unwrap_or(false) {
            let snapshot = status.borrow_and_update().clone();
            app.apply_status(&snapshot);
        }

        // 2. Render
        guard
            .terminal
            .draw(|f| ui::draw(&mut app, loader.store().items(), f))?;

        // 3. Visibility triggers
        let visible: Vec<RecordId> = app
            .newly_visible()
            .into_iter()
            .filter_map(|i| loader.store().items().get(i).map(Record::id))
            .collect();
        for id in visible {
            loader.notify_visible(id);
        }

        // 4. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    info!(cards = loader.store().items().len(), "exiting");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
