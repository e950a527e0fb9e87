//! palabras CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::CommonArgs;

#[derive(Parser)]
#[command(
    name = "palabras",
    version,
    about = "Vocabulary eval harness: generate answers, grade them with a judge model, tally accuracy"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send every word through every active model with both prompts
    Generate {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Grade stored responses that have no verdict yet
    Judge {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Tally results per model and write the summary file
    Summarize {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate, judge and summarize in one go
    Run {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print an existing summary file
    Report {
        /// Summary JSON to print (defaults to the configured summary file)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Output format: table, markdown, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load the suite and report problems
    Validate {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// List the models in the model list
    ListModels {
        /// Also query the local Ollama server for installed models
        #[arg(long)]
        installed: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Create a starter config and suite
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "palabras=info,palabras_core=info,palabras_providers=info",
                )
            }),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { common } => commands::generate::execute(common).await.map(|_| ()),
        Commands::Judge { common } => commands::judge::execute(common).await.map(|_| ()),
        Commands::Summarize { common } => commands::summarize::execute(common),
        Commands::Run { common } => commands::run::execute(common).await,
        Commands::Report {
            summary,
            format,
            config,
        } => commands::report::execute(summary, format, config),
        Commands::Validate { common } => commands::validate::execute(common),
        Commands::ListModels { installed, common } => {
            commands::list_models::execute(installed, common).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
