//! hostcache: inspect and verify the per-host changelog cache.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;

use hostcache_store::{ChangelogStore, HostCache};
use hostcache_store_lmdb::{check_integrity, LmdbEnvironment};
use hostcache_types::Meta;
use hostcache_utils::{init_logging, init_logging_at, render_bytes, truncate, LogFormat};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "hostcache", about = "Inspect the per-host changelog cache")]
struct Cli {
    /// Path to the cache file.
    #[arg(long, env = "HOSTCACHE_PATH")]
    path: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "HOSTCACHE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "HOSTCACHE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create the cache file if it does not exist yet.
    Init,
    /// List hosts with cached metadata.
    Hosts,
    /// Print a host's cached metadata as JSON.
    Show { host: String },
    /// List a host's changelog entries.
    Entries { host: String },
    /// Log a host's metadata and changelog entries at debug level.
    /// Always logs at debug, whatever `--log-level` or RUST_LOG say.
    Dump { host: String },
    /// Check every host record and bucket; exits non-zero on problems.
    Check,
}

/// Longest value printed by `entries`.
const ENTRY_VALUE_CHARS: usize = 100;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(path) = cli.path {
        config.path = path;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    // `dump` output is debug-level logging, so neither the configured level
    // nor RUST_LOG may filter it out.
    match cli.command {
        Command::Dump { .. } => init_logging_at(config.log_format, "debug"),
        _ => init_logging(config.log_format, &config.log_level),
    }

    let cache = LmdbEnvironment::open(&config.path, &config.lmdb)
        .with_context(|| format!("failed to open cache at {}", config.path.display()))?;
    let outcome = run(&cache, &cli.command);
    let closed = cache.close().context("failed to close cache");
    let code = outcome?;
    closed?;
    Ok(code)
}

fn run(cache: &LmdbEnvironment, command: &Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Init => {
            info!(path = %cache.path().display(), "cache is ready");
        }
        Command::Hosts => {
            for host in cache.hosts()? {
                println!("{host}");
            }
        }
        Command::Show { host } => {
            let meta = cache
                .get_meta(host)?
                .ok_or_else(|| anyhow!("no metadata cached for host '{host}'"))?;
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }
        Command::Entries { host } => {
            for (key, value) in cache.changelog_entries(host)? {
                let value = render_bytes(&value);
                println!(
                    "{}\t{}",
                    render_bytes(&key),
                    truncate(&value, ENTRY_VALUE_CHARS)
                );
            }
        }
        Command::Dump { host } => {
            let meta = cache.get_meta(host)?.unwrap_or_else(|| Meta {
                name: host.clone(),
                ..Meta::default()
            });
            cache.pretty_print(&meta)?;
        }
        Command::Check => {
            let report = check_integrity(cache)?;
            println!(
                "hosts: {}, changelog entries: {}, problems: {}",
                report.hosts_checked,
                report.total_entries,
                report.errors.len()
            );
            for error in &report.errors {
                println!("  {error}");
            }
            if !report.is_healthy() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
