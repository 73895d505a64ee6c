//! Basava Chat Entry Point
//!
//! Launches the terminal chatbot about Basavanna.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (needs API_KEY or GEMINI_API_KEY)
//! basava-chat
//!
//! # Another model or endpoint
//! basava-chat --model gemini-2.0-flash --base-url http://localhost:8080/v1beta
//!
//! # Verbose logging to a file
//! basava-chat --log-level debug 2> basava.log
//! ```

use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use basava_core::{
    default_config_path, load_config_from_path, ChatbotConfig, ConfigOverrides, GeminiProvider,
};
use basava_tui::App;

/// Basava Chat - ask about the life and teachings of Basavanna
#[derive(Parser, Debug)]
#[command(name = "basava-chat")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "BASAVA_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Model identifier
    #[arg(short = 'm', long, value_name = "ID")]
    model: Option<String>,

    /// Provider API root
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "BASAVA_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

/// Log to stderr; `RUST_LOG` wins over `--log-level`
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "basava_chat={level},basava_tui={level},basava_core={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn resolve_config(args: &Args) -> Result<ChatbotConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(path).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ref model) = args.model {
        overrides = overrides.with_model(model);
    }
    if let Some(ref url) = args.base_url {
        overrides = overrides.with_base_url(url);
    }
    overrides.apply(&mut config);

    config.validate().context("Invalid configuration")?;

    info!(
        model = %config.session.chat.model,
        base_url = %config.base_url,
        source = %config.source(),
        "Configuration resolved"
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    let config = resolve_config(&args)?;

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: basava-chat requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    let provider = GeminiProvider::from_env()
        .with_base_url(config.base_url.clone())
        .with_timeout(config.request_timeout);
    if !provider.has_credential() {
        tracing::warn!("No API key in API_KEY or GEMINI_API_KEY; chat will not initialize");
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(Arc::new(provider), config.session);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}
