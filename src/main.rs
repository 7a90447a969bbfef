use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use invoice_workspace::{
    app::App,
    cli::Cli,
    config,
    db::{Database, MemoryStorage, Storage},
    history::HistoryStore,
    logging,
    ui::render_workspace,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init(&cli)?;
    logging::init(config.log_file())?;
    println!("Initializing invoice workspace...");

    let result = if cli.ephemeral {
        info!("running with in-memory history");
        run(MemoryStorage::new()).await
    } else {
        let db = Database::new(&config).await?;
        println!("Database connection established");
        run(db).await
    };

    // Show any error message
    if let Err(err) = &result {
        error!(error = %err, "invoice workspace stopped with an error");
        println!("Error: {}", err);
    }

    println!("Thanks for using Invoice Workspace!");

    Ok(())
}

async fn run<S: Storage>(storage: S) -> Result<()> {
    let history = HistoryStore::load(storage).await;
    let mut app = App::new(history);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend, S: Storage>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<()> {
    loop {
        terminal.draw(|f| render_workspace(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Windows reports releases too
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key).await {
                break;
            }
        }
    }

    Ok(())
}
