//! CLI commands.

mod check_digit;
mod mint;
mod resolve;

use std::path::PathBuf;

use anyhow::Result;
use arkr_id::{parse_flag, Settings, DEFAULT_DIALECT_VERSION};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// ark - resolve, validate, and mint ARK identifiers.
#[derive(Debug, Parser)]
#[command(name = "ark")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Name Assigning Authority Number.
    #[arg(long, global = true, env = "ARK_NAAN", default_value = "00000")]
    naan: String,

    /// Host under which ARK URLs are served.
    #[arg(
        long,
        global = true,
        env = "ARK_EXTERNAL_HOST",
        default_value = "ark.example.org"
    )]
    external_host: String,

    /// Whether minted ARK URLs use https.
    #[arg(
        long,
        global = true,
        env = "ARK_HTTPS_PROXY",
        default_value = "true",
        action = clap::ArgAction::Set,
        value_parser = parse_bool_flag
    )]
    https_proxy: bool,

    /// Current dialect version.
    #[arg(long, global = true, env = "ARK_DIALECT_VERSION", default_value_t = DEFAULT_DIALECT_VERSION)]
    dialect_version: u32,

    /// Project registry (TOML).
    #[arg(long, global = true, env = "ARK_REGISTRY", value_name = "PATH")]
    registry: Option<PathBuf>,

    /// Log level or filter directive; RUST_LOG takes precedence.
    #[arg(long, global = true, env = "ARK_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse an ARK ID or URL and show its parts.
    Parse(resolve::ParseArgs),

    /// Show the URL an ARK ID or URL redirects to.
    Redirect(resolve::RedirectArgs),

    /// Show the resource IRI an ARK ID refers to.
    ResourceIri(resolve::ResourceIriArgs),

    /// Convert an ARK ID to the current dialect.
    Convert(resolve::ConvertArgs),

    /// Mint an ARK ID or URL for a resource IRI.
    Mint(mint::MintArgs),

    /// Calculate or validate check digits.
    CheckDigit(check_digit::CheckDigitCommand),
}

impl Cli {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Run the CLI command.
    pub fn run(self) -> Result<()> {
        let ctx = CommandContext {
            config: Config {
                naan: self.naan,
                external_host: self.external_host,
                https_proxy: self.https_proxy,
                dialect_version: self.dialect_version,
                registry: self.registry,
            },
            format: self.format,
        };

        match self.command {
            Commands::Parse(args) => resolve::parse(&ctx, args),
            Commands::Redirect(args) => resolve::redirect(&ctx, args),
            Commands::ResourceIri(args) => resolve::resource_iri(&ctx, args),
            Commands::Convert(args) => resolve::convert(&ctx, args),
            Commands::Mint(args) => mint::mint(&ctx, args),
            Commands::CheckDigit(cmd) => cmd.run(&ctx),
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Load the settings, reading the registry if configured.
    pub fn settings(&self) -> Result<Settings> {
        self.config.load_settings()
    }
}

fn parse_bool_flag(value: &str) -> Result<bool, String> {
    parse_flag(value).ok_or_else(|| format!("expected true/false, yes/no, on/off, or 1/0, got '{value}'"))
}
