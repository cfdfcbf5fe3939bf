mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use housing_guard::config::{self, MissingRolePolicy};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "housing-guard",
    version,
    about = "Permission gate, validators and formatters for the housing admin console"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Role store JSON file (overrides config)")]
    pub store: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "POLICY",
        help = "What to do when no role is stored: deny, full_access"
    )]
    pub missing_role: Option<String>,

    #[arg(long, global = true, help = "Answer yes to confirmation prompts")]
    pub yes: bool,

    #[arg(long, global = true, help = "Verbose output (info logs)")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Debug output (debug logs and effective settings)")]
    pub debug: bool,
}

/// Structured field kinds accepted by `check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Phone,
    Email,
    NationalId,
    Plate,
    Url,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a field value; exits non-zero when invalid
    Check {
        #[arg(value_enum)]
        field: Field,
        value: String,
    },
    /// Escape text for HTML display
    Escape { text: String },
    /// Strip markup tags from text
    Strip { text: String },
    /// Print the URL, or nothing when its scheme is rejected
    Url { url: String },
    /// Format a date (ISO 8601 and similar forms)
    Date {
        value: String,
        #[arg(long, help = "Locale tag: ar or en (default from config)")]
        locale: Option<String>,
    },
    /// Format an amount in riyals
    Currency { amount: Option<String> },
    /// Show a notification toast
    Alert {
        message: String,
        #[arg(long, default_value = "info", help = "success, error, warning or info")]
        kind: String,
    },
    /// Show the current actor's capabilities
    Caps,
    /// Edit an item as the current actor
    Edit { item_type: String, item_id: String },
    /// Delete an item as the current actor
    Delete { item_type: String, item_id: String },
}

fn init_logging(args: &Args) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(&args);

    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load()?
    };

    if let Some(policy_str) = &args.missing_role {
        if let Some(policy) = MissingRolePolicy::from_str(policy_str) {
            cfg.permissions.missing_role = Some(policy);
        } else {
            return Err(anyhow::anyhow!(
                "Invalid missing-role policy: {}. Use: deny, full_access",
                policy_str
            ));
        }
    }
    if let Some(store) = &args.store {
        cfg.permissions.store_path = Some(store.clone());
    }

    if let Err(errors) = cfg.validate() {
        for error in &errors {
            eprintln!("Config error {}", error);
        }
        return Err(anyhow::anyhow!("{} configuration error(s)", errors.len()));
    }

    if args.debug {
        tracing::debug!(
            missing_role = cfg.permissions.missing_role().as_str(),
            store = %cfg.permissions.store_path().display(),
            locale = cfg.display.locale().as_str(),
            "effective settings"
        );
    }

    let ctx = cli::Context::new(cfg, args.yes)?;
    cli::run(&ctx, &args.command)
}
