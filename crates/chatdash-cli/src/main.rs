use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod console;
mod logging;
mod repl;

use logging::LogFormat;

#[derive(Parser)]
#[command(name = "chatdash")]
#[command(about = "chatdash - interactive settings dashboards", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a dashboard schema file
    Validate {
        /// Schema file (defaults to ~/.config/chatdash/dashboard.toml)
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
    /// Open a dashboard in the terminal
    Run {
        /// Schema file (defaults to ~/.config/chatdash/dashboard.toml)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Settings file (defaults to ~/.config/chatdash/settings.toml)
        #[arg(long)]
        store: Option<PathBuf>,

        /// User id that owns the dashboard
        #[arg(short, long, default_value = "console")]
        owner: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    match cli.command {
        Commands::Validate { schema } => {
            if !commands::validate::run(schema)? {
                std::process::exit(1);
            }
        }
        Commands::Run {
            schema,
            store,
            owner,
        } => commands::run::run(schema, store, owner).await?,
    }

    Ok(())
}
