// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};
use std::io::Write;
use std::path::Path;

use postlingo::app_config::{self, Config};
use postlingo::{Controller, OutputFormat};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Json,
    Text,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Text => OutputFormat::Text,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a published post (default command)
    Translate(TranslateArgs),

    /// List the supported target languages
    Languages {
        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for postlingo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Publication host (e.g. 'blog.example.com')
    #[arg(long)]
    host: String,

    /// Post slug within the publication
    #[arg(long)]
    slug: String,

    /// Target language code (e.g. 'es', 'pt-BR')
    #[arg(short, long)]
    target: String,

    #[command(flatten)]
    common: CommonArgs,
}

/// Options shared by the explicit and the implicit translate command
#[derive(clap::Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: CliOutputFormat,

    /// Detect and translate title and body concurrently
    #[arg(long)]
    concurrent: bool,

    /// Content host API token
    #[arg(long, env = "HASHNODE_API_TOKEN", hide_env_values = true)]
    hashnode_token: Option<String>,

    /// Localization engine API key
    #[arg(long, env = "LINGODOTDEV_API_KEY", hide_env_values = true)]
    lingo_api_key: Option<String>,
}

/// postlingo - translate published blog posts
///
/// Fetches a post from its publication, detects the language of its title
/// and body, and translates both into the requested language.
#[derive(Parser, Debug)]
#[command(name = "postlingo")]
#[command(version)]
#[command(about = "Blog post translation tool")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "postlingo fetches a published post and translates its title and markdown body.

EXAMPLES:
    postlingo --host blog.example.com --slug hello-world -t es
    postlingo translate --host blog.example.com --slug hello-world -t pt-BR --format json
    postlingo --host blog.example.com --slug hello-world -t fr --concurrent
    postlingo languages                      # List supported target languages
    postlingo completions bash > postlingo.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. Credentials may also be supplied through the
    HASHNODE_API_TOKEN and LINGODOTDEV_API_KEY environment variables.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Publication host (e.g. 'blog.example.com')
    #[arg(long)]
    host: Option<String>,

    /// Post slug within the publication
    #[arg(long)]
    slug: Option<String>,

    /// Target language code (e.g. 'es', 'pt-BR')
    #[arg(short, long)]
    target: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and colour code for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is lowered once config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "postlingo", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Languages { config_path }) => run_languages(&config_path),
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args
            let missing = |name: &str| anyhow!("--{} is required when no subcommand is specified", name);
            let args = TranslateArgs {
                host: cli.host.ok_or_else(|| missing("host"))?,
                slug: cli.slug.ok_or_else(|| missing("slug"))?,
                target: cli.target.ok_or_else(|| missing("target"))?,
                common: cli.common,
            };
            run_translate(args).await
        }
    }
}

/// Load the config file and apply command line overrides
fn load_config(common: &CommonArgs) -> Result<Config> {
    let mut config = Config::load_or_create(Path::new(&common.config_path))?;

    if let Some(token) = &common.hashnode_token {
        config.content_source.api_token = token.clone();
    }
    if let Some(key) = &common.lingo_api_key {
        config.engine.api_key = key.clone();
    }
    if common.concurrent {
        config.concurrent_detection = true;
    }
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }

    log::set_max_level(config.log_level.to_level_filter());
    Ok(config)
}

fn run_languages(config_path: &str) -> Result<()> {
    let config = Config::load_or_create(Path::new(config_path))?;
    let mut stdout = std::io::stdout();
    for line in Controller::supported_languages_listing(&config) {
        writeln!(stdout, "{}", line)?;
    }
    Ok(())
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    config
        .validate()
        .context("Configuration validation failed")?;
    debug!("Using configuration from '{}'", args.common.config_path);

    let controller = Controller::with_config(config)?;
    let output = controller
        .run_with_progress(&args.host, &args.slug, &args.target, interrupted())
        .await?;

    let rendered = Controller::render(&output, args.common.format.into())?;
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", rendered)?;
    Ok(())
}

/// Completes on Ctrl-C; never completes if the signal cannot be watched
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
