//! musicbot CLI — bot mode, local chat, onboarding, and status.
//!
//! Usage:
//!   musicbot bot       — Serve Telegram chats
//!   musicbot chat      — Talk to the bot in this terminal
//!   musicbot onboard   — Create a default configuration
//!   musicbot status    — Show configuration and dictionary health

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use musicbot_core::bus::events::InboundMessage;
use musicbot_core::bus::MessageBus;
use musicbot_core::catalog::recommend::Recommender;
use musicbot_core::catalog::spotify::SpotifyCatalog;
use musicbot_core::config::Config;
use musicbot_core::dialogue::classifier::Classifier;
use musicbot_core::dialogue::entities::EntityRecognizer;
use musicbot_core::dialogue::memory::UserMemory;
use musicbot_core::dialogue::phrases::PhraseBank;
use musicbot_core::dialogue::{DialogueEngine, ReplySink};
#[cfg(feature = "telegram")]
use musicbot_core::gateway::channels::telegram::TelegramTransport;
use musicbot_core::gateway::DialogueBridge;
use musicbot_core::nlp::lexicon::LexiconAnnotator;

#[derive(Parser)]
#[command(
    name = "musicbot",
    version,
    about = "A chat bot that recommends artists you have not heard of yet",
    long_about = "🎵 musicbot — tell it which artists you like and it digs up lesser-known related acts."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the bot in this terminal
    Chat {
        /// Name the bot greets you with
        #[arg(short, long, default_value = "friend")]
        name: String,
    },

    /// Serve Telegram chats until Ctrl+C
    Bot,

    /// Create or reset the default configuration
    Onboard,

    /// Show configuration status and health
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat { name }) => cmd_chat(&name).await?,
        Some(Commands::Bot) => cmd_bot().await?,
        Some(Commands::Onboard) => cmd_onboard()?,
        Some(Commands::Status) => cmd_status()?,
        None => cmd_chat("friend").await?,
    }

    Ok(())
}

// ── Shared Setup ────────────────────────────────────────────────────

fn validate_config(config: &Config) -> Result<()> {
    if let Err(errors) = config.validate() {
        eprintln!("\n  \x1b[31m❌ Configuration errors:\x1b[0m");
        for e in &errors {
            eprintln!("     • {}", e);
        }
        eprintln!();
        anyhow::bail!("Fix the above {} error(s) in config.json", errors.len());
    }
    Ok(())
}

/// Build a fully wired engine: dictionary, catalog client, phrase bank
/// and user memory, all from configuration.
fn setup_engine(config: &Config) -> Result<DialogueEngine> {
    let artists_path = config.artists_path();
    let recognizer = EntityRecognizer::from_file(&artists_path)
        .with_context(|| format!("Cannot start without the artist dictionary at {}", artists_path.display()))?;

    let client = reqwest_client(config.catalog.timeout_seconds)?;
    let catalog = SpotifyCatalog::new(client, &config.catalog);
    let recommender = Recommender::new(
        Arc::new(catalog),
        config.dialogue.related_limit,
        config.dialogue.recommendation_limit,
    );

    let phrases = match config.dialogue.seed {
        Some(seed) => PhraseBank::seeded(seed),
        None => PhraseBank::from_entropy(),
    };
    let users = match config.dialogue.known_users_capacity {
        Some(cap) => UserMemory::with_capacity(cap),
        None => UserMemory::new(),
    };

    Ok(DialogueEngine::new(
        Box::new(LexiconAnnotator::new()),
        Classifier::new(recognizer),
        recommender,
        phrases,
        users,
    ))
}

fn reqwest_client(timeout_seconds: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .context("Failed to build HTTP client")
}

// ── Bot Command ─────────────────────────────────────────────────────

async fn cmd_bot() -> Result<()> {
    let config = Config::load()?;
    validate_config(&config)?;
    let engine = setup_engine(&config)?;

    let (bus, receivers) = MessageBus::new(100);
    let bus = Arc::new(bus);
    let mut tasks = Vec::new();

    // 1. Transports first, so their outbound handlers exist before replies flow.
    #[cfg(feature = "telegram")]
    {
        if let Some(ref tel_config) = config.channels.telegram {
            if tel_config.enabled && !tel_config.token.is_empty() {
                let transport = TelegramTransport::new(
                    tel_config.token.clone(),
                    Arc::clone(&bus),
                    tel_config.allow_from.clone(),
                );
                tasks.push(tokio::spawn(async move {
                    if let Err(e) = transport.run().await {
                        tracing::error!("Telegram transport failed: {}", e);
                    }
                }));
            }
        }
    }

    if tasks.is_empty() {
        println!("  ⚠️ No bot channels enabled. Please check your config.");
        return Ok(());
    }

    // 2. Outbound dispatcher.
    tasks.push(tokio::spawn(musicbot_core::bus::dispatch_outbound(
        bus.handlers(),
        receivers.outbound_rx,
    )));

    // 3. Dialogue bridge, the single consumer of inbound messages.
    let cancel = CancellationToken::new();
    let bridge = DialogueBridge::new(engine, bus.outbound_sender(), cancel.clone());
    tasks.push(tokio::spawn(async move {
        if let Err(e) = bridge.run(receivers.inbound_rx).await {
            tracing::error!("Dialogue bridge failed: {}", e);
        }
    }));

    println!("  🎵 musicbot bot mode starting...");
    println!("  Dictionary: {}", config.artists_path().display());
    println!("  Press Ctrl+C for graceful shutdown.");
    println!("  ─────────────────────────────────────");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!("\n  ⏳ Shutting down gracefully...");
            cancel.cancel();
        }
        _ = futures::future::join_all(tasks) => {}
    }

    println!("  ✅ Shutdown complete.");
    Ok(())
}

// ── Chat Command ────────────────────────────────────────────────────

/// Prints each reply as soon as the engine sends it.
struct Terminal;

#[async_trait]
impl ReplySink for Terminal {
    async fn send(&mut self, reply: String) {
        for line in reply.lines() {
            println!("  \x1b[32m{}\x1b[0m", line);
        }
    }
}

async fn cmd_chat(name: &str) -> Result<()> {
    let config = Config::load()?;
    let mut engine = setup_engine(&config)?;

    println!();
    println!("  🎵 musicbot v{}", env!("CARGO_PKG_VERSION"));
    println!("  Dictionary: {}", config.artists_path().display());
    println!();
    println!("  Say hi, or tell me which artists you like. /quit to exit.");
    println!("  ─────────────────────────────────────");
    println!();

    let stdin = io::stdin();
    loop {
        print!("  \x1b[36m>\x1b[0m ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if matches!(input, "/quit" | "/exit" | "/q") {
            println!("  Goodbye! 👋");
            break;
        }

        let mut msg = InboundMessage::local(input);
        msg.user_name = name.to_owned();
        if let Err(e) = engine
            .respond(&msg.content, &msg.user_id, &msg.user_name, &mut Terminal)
            .await
        {
            eprintln!("  \x1b[31mError: {}\x1b[0m", e);
        }
        println!();
    }

    Ok(())
}

// ── Onboard Command ─────────────────────────────────────────────────

fn cmd_onboard() -> Result<()> {
    let path = Config::write_default_template()?;
    println!();
    println!("  ✅ Configuration created at:");
    println!("     {}", path.display());
    println!();
    println!("  Next steps:");
    println!("  1. Add your Telegram bot token and Spotify client credentials");
    println!("  2. Put one artist name per line in ~/.musicbot/artists.txt");
    println!("  3. Run `musicbot chat` to try it, or `musicbot bot` to go live");
    println!();
    Ok(())
}

// ── Status Command ──────────────────────────────────────────────────

fn cmd_status() -> Result<()> {
    let config_path = Config::default_path();
    let config = Config::load()?;

    println!();
    println!("  🎵 musicbot status");
    println!("  ─────────────────────────────────────");

    if config_path.exists() {
        println!("  Config:     {}", config_path.display());
    } else {
        println!("  Config:     ❌ Not found (run `musicbot onboard`)");
        return Ok(());
    }

    let artists = config.artists_path();
    match EntityRecognizer::from_file(&artists) {
        Ok(r) => println!("  Dictionary: ✅ {} artists ({})", r.len(), artists.display()),
        Err(e) => println!("  Dictionary: ❌ {}", e),
    }

    let catalog_ready = !config.catalog.client_id.is_empty() && !config.catalog.client_secret.is_empty();
    println!(
        "  Catalog:    {} {}",
        if catalog_ready { "✅" } else { "❌ credentials missing," },
        config.catalog.api_base
    );

    let telegram = config
        .channels
        .telegram
        .as_ref()
        .map_or(false, |t| t.enabled && !t.token.is_empty());
    println!("  Telegram:   {}", if telegram { "✅ enabled" } else { "⏸️  disabled" });

    match config.validate() {
        Ok(()) => println!("  Validation: ✅ ok"),
        Err(errors) => println!("  Validation: ⚠️  {} problem(s)", errors.len()),
    }

    println!();
    Ok(())
}
