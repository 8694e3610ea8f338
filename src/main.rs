//! SweetKit - command-line front end
//!
//! Exposes the library helpers as subcommands:
//! - `validate` - check input against a fixed validation rule
//! - `date` - parse, format and compare dates in the reference timezone
//! - `string` - grapheme-aware string shaping
//! - `color` - hex color conversion and blending
//! - `config` - show or initialize the configuration file
//!
//! Results go to stdout, as plain text or as JSON with `--json`.
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to adjust.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::path::PathBuf;
use sweetkit::logbook::default_filename;
use sweetkit::utils::{dates, strings};
use sweetkit::{
    matches, Carrier, DateKit, KitConfig, LogBook, Rgba, StdFileStore, ValidationRule,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the platform default
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Save the session log to the configured log directory
    #[arg(long, global = true)]
    save_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check input against a validation rule
    Validate {
        #[arg(value_enum)]
        rule: RuleArg,
        input: String,
    },
    /// Date parsing and formatting
    Date {
        #[command(subcommand)]
        command: DateCommand,
    },
    /// String shaping
    #[command(name = "string")]
    Text {
        #[command(subcommand)]
        command: TextCommand,
    },
    /// Parse a hex color, optionally blending towards another
    Color {
        hex: String,
        #[arg(long, default_value_t = 1.0)]
        alpha: f64,
        /// Second color to blend towards
        #[arg(long)]
        blend: Option<String>,
        /// Blend position between 0 and 1
        #[arg(long, default_value_t = 0.5)]
        percentage: f64,
    },
    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RuleArg {
    Email,
    Phone,
    Mobile,
    ChinaMobile,
    ChinaUnicom,
    ChinaTelecom,
    IdentityCard,
    Password,
    Url,
    Username,
    ColonTriple,
}

impl From<RuleArg> for ValidationRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Email => ValidationRule::Email,
            RuleArg::Phone => ValidationRule::PhoneNumber,
            RuleArg::Mobile => ValidationRule::MobileNumberGeneric,
            RuleArg::ChinaMobile => ValidationRule::MobileNumberCarrierSpecific(Carrier::Mobile),
            RuleArg::ChinaUnicom => ValidationRule::MobileNumberCarrierSpecific(Carrier::Unicom),
            RuleArg::ChinaTelecom => ValidationRule::MobileNumberCarrierSpecific(Carrier::Telecom),
            RuleArg::IdentityCard => ValidationRule::IdentityCard,
            RuleArg::Password => ValidationRule::Password,
            RuleArg::Url => ValidationRule::Url,
            RuleArg::Username => ValidationRule::Username,
            RuleArg::ColonTriple => ValidationRule::ColonTriple,
        }
    }
}

#[derive(Subcommand, Debug)]
enum DateCommand {
    /// Today's date
    Today,
    /// Parse YYYY-MM-DD into its components
    Parse { date: String },
    /// Parse YYYY-MM-DD HH:MM:SS into its components
    ParseTime { datetime: String },
    IsToday { date: String },
    IsYesterday { date: String },
    /// Weekday name of a date
    Weekday { date: String },
    /// Format a Unix timestamp in seconds
    Timestamp { timestamp: String },
    /// Unix timestamp of a date's midnight
    Midnight { date: String },
    /// Format YYYY-MM-DD as MM月dd日
    MonthDay { date: String },
}

#[derive(Subcommand, Debug)]
enum TextCommand {
    Trim { input: String },
    UpperFirst { input: String },
    LowerFirst { input: String },
    /// Grapheme count
    Length { input: String },
    /// Half-open grapheme slice
    Substring {
        input: String,
        start: usize,
        end: usize,
    },
    Reverse {
        input: String,
        /// Re-case words after reversing
        #[arg(long)]
        preserve_format: bool,
    },
    Palindrome { input: String },
    Base64Encode { input: String },
    Base64Decode { input: String },
    /// Random alphanumeric string
    Random { length: usize },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Prints either the plain text or the JSON value
fn emit(json_output: bool, plain: impl std::fmt::Display, value: Value) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", plain);
    }
    Ok(())
}

fn run_validate(args: &Args, rule: RuleArg, input: &str, log: &LogBook) -> Result<()> {
    let valid = matches(input, rule.into());
    log.info(format!("validate {:?} {:?} -> {}", rule, input, valid));
    emit(
        args.json,
        valid,
        json!({ "rule": format!("{:?}", rule), "input": input, "valid": valid }),
    )
}

fn run_date(args: &Args, command: &DateCommand, kit: &DateKit, log: &LogBook) -> Result<()> {
    log.info(format!("date {:?}", command));
    match command {
        DateCommand::Today => {
            let today = kit.today();
            emit(args.json, &today, json!({ "today": today }))
        }
        DateCommand::Parse { date } => {
            let moment = dates::parse_date(date)?;
            emit(
                args.json,
                dates::format_date(&moment),
                serde_json::to_value(moment)?,
            )
        }
        DateCommand::ParseTime { datetime } => {
            let moment = dates::parse_date_time(datetime)?;
            emit(
                args.json,
                dates::format_date_time(&moment),
                serde_json::to_value(moment)?,
            )
        }
        DateCommand::IsToday { date } => {
            let result = kit.is_today(date);
            emit(args.json, result, json!({ "date": date, "is_today": result }))
        }
        DateCommand::IsYesterday { date } => {
            let result = kit.is_yesterday(date);
            emit(
                args.json,
                result,
                json!({ "date": date, "is_yesterday": result }),
            )
        }
        DateCommand::Weekday { date } => {
            let name = kit.weekday_name(date)?;
            emit(args.json, &name, json!({ "date": date, "weekday": name }))
        }
        DateCommand::Timestamp { timestamp } => {
            let formatted = kit.timestamp_to_string(timestamp)?;
            emit(
                args.json,
                &formatted,
                json!({ "timestamp": timestamp, "formatted": formatted }),
            )
        }
        DateCommand::Midnight { date } => {
            let seconds = kit.timestamp_of_date(date)?;
            emit(args.json, seconds, json!({ "date": date, "timestamp": seconds }))
        }
        DateCommand::MonthDay { date } => {
            let label = dates::month_day_label(date)?;
            emit(args.json, &label, json!({ "date": date, "label": label }))
        }
    }
}

fn run_text(args: &Args, command: &TextCommand, log: &LogBook) -> Result<()> {
    log.debug(format!("string {:?}", command));
    let output = match command {
        TextCommand::Trim { input } => strings::trimmed(input),
        TextCommand::UpperFirst { input } => strings::uppercase_first(input),
        TextCommand::LowerFirst { input } => strings::lowercase_first(input),
        TextCommand::Length { input } => strings::length(input).to_string(),
        TextCommand::Substring { input, start, end } => strings::substring(input, *start..*end)?,
        TextCommand::Reverse {
            input,
            preserve_format,
        } => strings::reversed(input, *preserve_format),
        TextCommand::Palindrome { input } => strings::is_palindrome(input).to_string(),
        TextCommand::Base64Encode { input } => strings::base64_encoded(input),
        TextCommand::Base64Decode { input } => match strings::base64_decoded(input) {
            Some(decoded) => decoded,
            None => bail!("Input is not valid base64-encoded UTF-8"),
        },
        TextCommand::Random { length } => strings::random_alphanumeric(*length),
    };
    emit(args.json, &output, json!({ "result": output }))
}

fn run_color(
    args: &Args,
    hex: &str,
    alpha: f64,
    blend: Option<&str>,
    percentage: f64,
) -> Result<()> {
    let mut color = Rgba::from_hex_str(hex, alpha)?;
    if let Some(other) = blend {
        let end = Rgba::from_hex_str(other, alpha)?;
        color = Rgba::between(color, end, percentage);
    }
    let hex_string = color.hex_string();
    emit(
        args.json,
        format!("#{} alpha {:.3}", hex_string, color.alpha),
        json!({ "hex": hex_string, "rgba": color }),
    )
}

fn config_file(args: &Args) -> Result<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => KitConfig::config_path(),
    }
}

/// `config path` and `config init` work on the file itself and never load it
fn run_config_file(args: &Args, command: &ConfigCommand) -> Result<()> {
    let path = config_file(args)?;
    match command {
        ConfigCommand::Init { force } => {
            KitConfig::write_default(&path, *force)?;
            emit(
                args.json,
                format!("Wrote {}", path.display()),
                json!({ "written": path.display().to_string() }),
            )
        }
        _ => emit(
            args.json,
            path.display(),
            json!({ "path": path.display().to_string() }),
        ),
    }
}

fn run_config_show(args: &Args, config: &KitConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(config)?;
    emit(args.json, yaml.trim_end(), serde_json::to_value(config)?)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sweetkit=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Command::Config {
        command: command @ (ConfigCommand::Path | ConfigCommand::Init { .. }),
    } = &args.command
    {
        return run_config_file(&args, command);
    }

    let config = match &args.config {
        Some(path) => KitConfig::load_from(path),
        None => KitConfig::load(),
    }
    .context("Failed to load configuration")?;
    debug!(?config, "configuration loaded");

    let log = config.log_book();
    if args.save_log {
        log.set_active(true);
    }

    let result = match &args.command {
        Command::Validate { rule, input } => run_validate(&args, *rule, input, &log),
        Command::Date { command } => {
            let kit = config.date_kit()?;
            run_date(&args, command, &kit, &log)
        }
        Command::Text { command } => run_text(&args, command, &log),
        Command::Color {
            hex,
            alpha,
            blend,
            percentage,
        } => run_color(&args, hex, *alpha, blend.as_deref(), *percentage),
        Command::Config { .. } => run_config_show(&args, &config),
    };

    if let Err(err) = &result {
        log.error(format!("{:#}", err));
    }

    if args.save_log {
        let dir = config.log_directory()?;
        let now = config.date_kit()?.now();
        let path = log.save(&StdFileStore, &dir, &default_filename(&now))?;
        eprintln!("Log saved to {}", path.display());
    }

    result
}
