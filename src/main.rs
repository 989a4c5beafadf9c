use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

mod domain;
mod application;
mod infrastructure;

use infrastructure::config::Config;
use infrastructure::nasa::NasaClient;
use infrastructure::adapters::telegram::TelegramAdapter;
use infrastructure::adapters::console::ConsoleAdapter;
use application::errors::BotError;
use application::messaging::MessageParser;
use application::services::{CommandService, DetailPanels, MessageService, PhotoService};
use domain::traits::Bot;

/// Long-poll timeout for getUpdates; also bounds how late expired buttons are removed
const POLL_TIMEOUT_SECONDS: i64 = 10;

#[derive(Parser)]
#[command(name = "mars-bot")]
#[command(about = "Chat bot that posts random Mars rover photos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(cli.config, cli.token),
        Commands::Version => {
            println!("mars-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn run_bot(config_path: String, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(&config_path);
    tracing::info!("Starting mars-bot: {}", config.bot.name);

    let api_key = config.nasa_api_key()?;
    let client = NasaClient::new(api_key, &config.nasa.base_url, config.request_timeout())
        .map_err(|e| BotError::Internal(format!("Failed to build HTTP client: {}", e)))?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(async {
        let photos = PhotoService::new(client, config.cooldown());
        let updated = photos.refresh_sol_cache().await;
        tracing::info!("Sol cache ready ({} rovers refreshed)", updated);

        let mut commands = CommandService::new(&config.bot.prefix, photos, &config.nasa.combinations_image);
        commands.register_defaults();
        let panels = DetailPanels::new(config.detail_timeout());

        let token = token_override.or_else(|| config.telegram_token().map(String::from));
        match token {
            Some(token) => {
                let mut bot = TelegramAdapter::new(token);
                bot.fetch_bot_info().await?;

                // Register bot commands with Telegram
                if let Err(e) = bot.register_commands(commands.commands()).await {
                    tracing::warn!("Failed to register commands: {}", e);
                }

                let parser = MessageParser::new(commands.prefix())
                    .with_bot_username(bot.bot_info().username);
                run_telegram_bot(MessageService::new(bot, commands, panels), parser).await
            }
            None => {
                // Run console bot (dev mode)
                let parser = MessageParser::new(commands.prefix());
                run_console_bot(MessageService::new(ConsoleAdapter::new(), commands, panels), parser).await
            }
        }
    })
}

async fn run_telegram_bot(service: MessageService<TelegramAdapter, NasaClient>, parser: MessageParser) -> Result<(), BotError> {
    service.bot().start().await?;
    tracing::info!("Bot started: @{}", service.bot().bot_info().username);

    let mut offset: i64 = 0;
    tracing::info!("Starting message loop...");

    loop {
        match service.bot().get_updates(offset, POLL_TIMEOUT_SECONDS).await {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                }

                if let Some(next) = TelegramAdapter::get_next_offset(&updates) {
                    offset = next;
                }

                for update in updates {
                    let Some(message) = update.into_message(&parser) else {
                        continue;
                    };
                    if let Err(e) = service.process(message).await {
                        tracing::error!("Failed to handle update: {}", e);
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }

        let expired = service.expire_panels().await;
        if expired > 0 {
            tracing::debug!("Expired {} detail panels", expired);
        }
    }
}

async fn run_console_bot(service: MessageService<ConsoleAdapter, NasaClient>, parser: MessageParser) -> Result<(), BotError> {
    service.bot().start().await?;
    println!("Type /help, or `press <data>` to tap a button. Ctrl-D quits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(BotError::Internal(format!("Failed to read stdin: {}", e))),
        };

        service.expire_panels().await;

        let Some(message) = ConsoleAdapter::to_message(&parser, &line) else {
            continue;
        };
        if let Err(e) = service.process(message).await {
            tracing::error!("Failed to handle input: {}", e);
        }
    }

    tracing::info!("Console closed");
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
