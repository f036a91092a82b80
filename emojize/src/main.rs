use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use emojize::logging::{init_logging, LogConfig};
use emojize::{Action, ConsoleHost, Outgoing, Settings};

/// emojize - turn :) and :smile: into real emoji before a chat line is sent
#[derive(Parser)]
#[command(name = "emojize")]
#[command(about = "Rewrites emoticons and emoji shortcodes in outgoing chat lines")]
#[command(version)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, short, env = "EMOJIZE_CONFIG")]
    config: Option<PathBuf>,

    /// Only expand :shortcodes:, leave emoticons as typed
    #[arg(long)]
    no_emoticons: bool,

    /// Action /em re-issues its text through (say or me)
    #[arg(long, value_parser = parse_action)]
    em_target: Option<Action>,

    /// Print JSON records instead of chat lines
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    /// Log file, logging is off unless this or --verbose is given
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Message to emojize; chat lines are read from stdin when omitted
    text: Vec<String>,
}

fn parse_action(s: &str) -> Result<Action, String> {
    Action::parse(s).ok_or_else(|| format!("unknown action {:?}, expected say or me", s))
}

// Load environment variables from .env file
// This allows EMOJIZE_* settings to be set without command-line args
fn load_env() {
    let _ = dotenv::dotenv();
}

fn log_config(cli: &Cli) -> LogConfig {
    let mut config = if cli.verbose {
        LogConfig::verbose()
    } else if cli.log_file.is_some() {
        LogConfig::default()
    } else {
        LogConfig::disabled()
    };
    if let Some(path) = &cli.log_file {
        config.log_file = path.clone();
    }
    config
}

fn main() -> Result<()> {
    load_env();
    let cli = Cli::parse();

    init_logging(&log_config(&cli)).context("Failed to initialize logging")?;

    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if cli.no_emoticons {
        settings.emoticon_to_emoji = false;
    }
    if let Some(target) = cli.em_target {
        settings.em_target = target;
    }
    log::debug!("Settings: {:?}", settings);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !cli.text.is_empty() {
        let emojizer = settings
            .build_emojizer()
            .context("Failed to build emoticon matcher")?;
        let rewrite = emojizer.rewrite(&cli.text.join(" "))?;
        if cli.json {
            writeln!(out, "{}", serde_json::to_string(&rewrite)?)?;
        } else {
            writeln!(out, "{}", rewrite.transformed)?;
        }
        return Ok(());
    }

    let mut host = ConsoleHost::new();
    emojize::load(&mut host, &settings).context("Failed to load emoji filter")?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read input")?;
        match host.input(&line) {
            Ok(records) => print_records(&mut out, &records, cli.json)?,
            Err(e) => {
                log::warn!("Nothing sent for {:?}: {}", line, e);
                eprintln!("error: {}", e);
            }
        }
    }

    host.unload();
    Ok(())
}

fn print_records(out: &mut impl Write, records: &[Outgoing], json: bool) -> Result<()> {
    for record in records {
        if json {
            writeln!(out, "{}", serde_json::to_string(record)?)?;
        } else {
            writeln!(out, "{}", record)?;
        }
    }
    Ok(())
}
