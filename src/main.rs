use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use logviz::commands;
use logviz::config::Config;
use logviz::logging::init_logging;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "logviz")]
#[command(about = "Load fixed-layout text logs into SQLite and chart them")]
#[command(version)]
struct Cli {
    /// Database file (overrides config and LOGVIZ_DATABASE)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a log file and insert every record into the logs table
    Insert {
        /// Log file to load
        log_file: PathBuf,
    },
    /// Chart the logs table to an image file
    Report {
        /// Where to write the image, e.g. output.png
        output_file: PathBuf,
    },
    /// Chart the logs table interactively in the terminal
    #[cfg(feature = "live")]
    View {
        /// Chart this log file instead of the logs table
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show level counts from the logs table
    Summary {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = matches!(cli.command, Commands::Summary { json: true });

    if let Err(e) = run(cli) {
        handle_error(e, json);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(database) = cli.database {
        config.database.path = database;
    }
    let _log_guard = init_logging(&config.logging)?;
    config.log_loaded();

    match cli.command {
        Commands::Insert { log_file } => {
            let rows = commands::run_insert(&log_file, &config.database.path)?;
            println!("{} ({} rows)", "Record inserted successfully".green(), rows);
        }
        Commands::Report { output_file } => {
            commands::run_report(&config.database.path, &output_file, &config.chart)?;
            println!("Chart written to {}", output_file.display());
        }
        #[cfg(feature = "live")]
        Commands::View { file } => {
            commands::run_view(&config.database.path, file.as_deref(), &config.chart.title)?;
        }
        Commands::Summary { json } => {
            commands::run_summary(&config.database.path, json)?;
        }
    }

    Ok(())
}

fn handle_error(e: anyhow::Error, json: bool) -> ! {
    if json {
        println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
    } else {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
    }
    process::exit(1);
}
