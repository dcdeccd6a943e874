use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{Ctx, OfflineFiles};

#[derive(Parser)]
#[command(name = "potion")]
#[command(about = "Potion audit reconciliation CLI", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (defaults apply when omitted)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Read audit data from a JSON file instead of the audit service
    #[arg(long = "audit-file", global = true)]
    audit_file: Option<String>,

    /// Read the cauldron list from a JSON file instead of the information service
    #[arg(long = "cauldrons-file", global = true)]
    cauldrons_file: Option<String>,

    /// Read the optimization plan from a JSON file
    #[arg(long = "plan-file", global = true)]
    plan_file: Option<String>,

    /// Emit JSON instead of key=value lines
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> local)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Audit reconciliation views
    Audit {
        #[command(subcommand)]
        cmd: AuditCmd,
    },

    /// Courier routing plan
    Plan {
        #[command(subcommand)]
        cmd: PlanCmd,
    },
}

#[derive(Subcommand)]
enum AuditCmd {
    /// Upstream counters plus a consistency check against the record lists
    Summary,

    /// Reported vs actual liters per cauldron for one day
    Compare {
        /// YYYY-MM-DD (default: today in dashboard.timezone)
        #[arg(long)]
        date: Option<String>,
    },

    /// Unlogged-drain liters per cauldron for one day
    Unlogged {
        /// YYYY-MM-DD (default: today in dashboard.timezone)
        #[arg(long)]
        date: Option<String>,
    },

    /// Distinct dates present in the records
    Dates,
}

#[derive(Subcommand)]
enum PlanCmd {
    /// Print each witch's route steps
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    if let Commands::ConfigHash { paths } = &cli.cmd {
        let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
        let loaded = potion_config::load_layered_yaml(&path_refs)?;
        println!("config_hash={}", loaded.config_hash);
        println!("{}", loaded.canonical_json);
        return Ok(());
    }

    let cfg = commands::load_config(&cli.config_paths)?;
    let files = OfflineFiles {
        audit_file: cli.audit_file,
        cauldrons_file: cli.cauldrons_file,
        plan_file: cli.plan_file,
    };
    let ctx = Ctx {
        source: commands::build_source(&cfg, &files)?,
        timezone: cfg.timezone()?,
        json: cli.json,
    };

    match cli.cmd {
        Commands::ConfigHash { .. } => {}
        Commands::Audit { cmd } => match cmd {
            AuditCmd::Summary => commands::audit::summary(&ctx).await?,
            AuditCmd::Compare { date } => commands::audit::compare(&ctx, date).await?,
            AuditCmd::Unlogged { date } => commands::audit::unlogged(&ctx, date).await?,
            AuditCmd::Dates => commands::audit::dates(&ctx).await?,
        },
        Commands::Plan { cmd } => match cmd {
            PlanCmd::Show => commands::plan::show(&ctx).await?,
        },
    }
    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
