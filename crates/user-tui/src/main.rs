use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

mod api;
mod app;
mod cli;
mod form;
mod markup;
mod ui;

#[cfg(test)]
mod test_support;

use api::ApiClient;
use app::{App, AppEvent};

const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Manage users from the terminal. Without a subcommand, opens the interactive UI.
#[derive(Debug, Parser)]
#[command(name = "users", version)]
struct Cli {
    /// Base URL of the user API server
    #[arg(long, env = "USERS_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    #[command(subcommand)]
    command: Option<cli::Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    let api = ApiClient::new(&args.server_url);

    if let Some(command) = args.command {
        // Logs go to stderr so command output stays pipeable.
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_writer(io::stderr)
            .init();

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stdout = io::stdout();
        if let Err(e) = cli::run(command, &api, &mut stdout, &mut input).await {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let app = App::new(api);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<()> {
    // Create event channel
    let (tx, mut rx) = mpsc::channel::<AppEvent>(100);

    // Spawn input handler
    let tx_input = tx.clone();
    tokio::spawn(async move {
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press
                        && tx_input.send(AppEvent::Key(key)).await.is_err()
                    {
                        break;
                    }
                }
            }
            // Send tick events so transient messages expire
            if tx_input.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    // Initial load
    tx.send(AppEvent::LoadUsers).await?;

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if let Some(event) = rx.recv().await {
            match event {
                AppEvent::Key(key) => {
                    if app.handle_key(key).await? {
                        return Ok(());
                    }
                }
                AppEvent::Tick => app.on_tick(),
                AppEvent::LoadUsers => app.load_users().await,
            }
        }
    }
}
