use anyhow::{Context, Result};
use chatpane_core::{Config, LoggingConfig, init_logging};
use chatpane_providers::{ChatBackend, HttpBackend, MockBackend};
use chatpane_ui::{App, ChatView, Page, Renderer, Segment, Sender, SyntaxHighlighter, Transcript, TranscriptEntry};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// chatpane - a chat widget for a remote message endpoint
#[derive(Parser, Debug)]
#[command(name = "chatpane")]
#[command(about = "Chat with a remote endpoint and render replies as safe, highlighted markup", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to chatpane.toml (default: ./chatpane.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat on stdin (`:q` quits)
    Chat {
        /// Rewrite this HTML document after every exchange
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,

        /// Replay scripted replies from a TOML file instead of calling the endpoint
        #[arg(long, value_name = "TOML")]
        mock: Option<PathBuf>,
    },
    /// Render a message from a file (or stdin) and print its markup
    Render {
        /// Message file (default: stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Who the message is from: user or assistant
        #[arg(long, default_value = "assistant")]
        sender: Sender,

        /// Print a standalone HTML document instead of the entry alone
        #[arg(long)]
        document: bool,
    },
    /// Print the highlight stylesheet for the configured theme
    Css,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from("chatpane.toml"));
    let config = load_or_create_config(&config_path)?;

    let mut logging = LoggingConfig::from(config.logging.clone());
    if cli.verbose {
        logging = logging.with_level("debug");
        eprintln!("{} Using config: {}", "Info:".blue().bold(), config_path.display());
    }
    let _guard = init_logging(Some(logging)).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Chat { html, mock } => cmd_chat(config, html, mock, cli.verbose).await?,
        Commands::Render { file, sender, document } => cmd_render(&config, file.as_deref(), sender, document)?,
        Commands::Css => cmd_css(&config)?,
    }

    Ok(())
}

/// Load config from file or create from example
fn load_or_create_config(path: &Path) -> Result<Config> {
    if path.exists() {
        eprintln!("{} Loading config from {}", "Info:".green().bold(), path.display());
        Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    } else {
        eprintln!("{} Config not found at {}", "Warning:".yellow().bold(), path.display());
        eprintln!("{} Creating config from example...", "Info:".blue().bold());

        std::fs::write(path, Config::example()).context("Failed to create config")?;

        eprintln!(
            "{} Created config at {}. Please edit it with your settings.",
            "Success:".green().bold(),
            path.display()
        );

        anyhow::bail!("Please edit {} with your settings and run again", path.display())
    }
}

fn build_backend(config: &Config, mock: Option<&Path>) -> Result<Arc<dyn ChatBackend>> {
    let backend: Arc<dyn ChatBackend> = match mock {
        Some(path) => Arc::new(
            MockBackend::from_file(path)
                .with_context(|| format!("Failed to load mock responses from {}", path.display()))?,
        ),
        None => Arc::new(HttpBackend::from_config(&config.endpoint).context("Failed to create HTTP client")?),
    };
    Ok(backend)
}

/// Interactive chat over stdin
async fn cmd_chat(config: Config, html: Option<PathBuf>, mock: Option<PathBuf>, verbose: bool) -> Result<()> {
    let backend = build_backend(&config, mock.as_deref())?;
    tracing::info!(endpoint = backend.endpoint(), html = ?html, "starting chat");
    if verbose {
        eprintln!("{} Endpoint: {}", "Info:".blue().bold(), backend.endpoint().cyan());
    }

    let mut app = App::new(&config, backend).context("Failed to initialize chat")?;
    let assistant_name = config.display.assistant_name.clone();

    if let Some(modal) = app.page().modal().filter(|m| m.is_visible()) {
        println!("{}", modal.text().dimmed());
        println!();
    }
    if let Some(banner) = app.page().banner() {
        println!("{}", banner.greeting().bold());
    }

    let mut printed = app.page().transcript().len();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", ">".cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        if line.trim() == ":q" {
            break;
        }

        if !line.trim().is_empty() {
            println!("{}", config.messages.thinking.dimmed());
        }
        app.send_line(&line).await;

        let transcript = app.page().transcript();
        for entry in &transcript.entries()[printed..] {
            print_entry(entry, &assistant_name, app.highlighter());
        }
        printed = transcript.len();

        if let Some(path) = &html {
            write_document(&app, path)?;
        }
    }

    Ok(())
}

fn write_document(app: &App, path: &Path) -> Result<()> {
    std::fs::write(path, app.document()).with_context(|| format!("Failed to write {}", path.display()))
}

/// Print an entry to the terminal, highlighting code segments
fn print_entry(entry: &TranscriptEntry, assistant_name: &str, highlighter: &SyntaxHighlighter) {
    match entry.sender {
        Sender::User => println!("{}", "You".blue().bold()),
        Sender::Assistant => println!("{}", assistant_name.green().bold()),
    }

    for segment in &entry.segments {
        match segment {
            Segment::Prose { text } => println!("{}", text.trim_matches('\n')),
            Segment::Code { language, content } => {
                println!("{}", format!("[{}]", language).dimmed());
                println!("{}", highlighter.highlight_terminal(content, language).trim_end_matches('\n'));
            }
        }
    }
    println!();
}

/// Render one message and print its markup
fn cmd_render(config: &Config, file: Option<&Path>, sender: Sender, document: bool) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            buf
        }
    };

    println!("{}", render_markup(config, &raw, sender, document)?);
    Ok(())
}

fn render_markup(config: &Config, raw: &str, sender: Sender, document: bool) -> Result<String> {
    let highlighter = Arc::new(SyntaxHighlighter::with_theme(&config.display.theme)?);
    let renderer = Renderer::new(Arc::clone(&highlighter), config.display.prose_markup);

    if document {
        let mut page = Page::new(config.display.assistant_name.as_str());
        renderer.render(page.transcript_mut(), sender, raw);
        Ok(page.to_document(&highlighter.stylesheet()))
    } else {
        let mut transcript = Transcript::new();
        renderer.render(&mut transcript, sender, raw);
        Ok(transcript.to_html())
    }
}

/// Print the highlight stylesheet
fn cmd_css(config: &Config) -> Result<()> {
    let highlighter = SyntaxHighlighter::with_theme(&config.display.theme)?;
    println!("{}", highlighter.stylesheet());
    Ok(())
}
