//! cogtrack CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cogtrack", version, about = "Cognitive test scoring and trend analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a completed test submission
    Score {
        /// Test type (e.g. "visual-memory", "stroop"); unrecognized types
        /// are scored with the generic heuristic
        #[arg(long)]
        test_type: String,

        /// Path to a JSON file with the submitted answers
        #[arg(long)]
        answers: PathBuf,

        /// Subject age, for normative adjustment
        #[arg(long)]
        age: Option<u32>,

        /// Time spent on the test, in seconds
        #[arg(long)]
        time_spent: Option<u32>,

        /// Norm table TOML (defaults to the built-in table)
        #[arg(long)]
        norms: Option<PathBuf>,

        /// Save the full result JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Analyze a subject's score history for a trend
    Trend {
        /// Path to a JSON history store
        #[arg(long)]
        history: PathBuf,

        /// Subject identifier
        #[arg(long)]
        user: String,

        /// Restrict the analysis to one test type
        #[arg(long)]
        test_type: Option<String>,

        /// Most-recent results to consider
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate a norm table TOML file
    Validate {
        /// Path to the norm table
        #[arg(long)]
        norms: PathBuf,
    },

    /// List supported test types
    ListTypes,

    /// Create a starter norm table and example answers file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cogtrack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            test_type,
            answers,
            age,
            time_spent,
            norms,
            output,
            format,
        } => commands::score::execute(test_type, answers, age, time_spent, norms, output, format),
        Commands::Trend {
            history,
            user,
            test_type,
            limit,
            format,
        } => commands::trend::execute(history, user, test_type, limit, format).await,
        Commands::Validate { norms } => commands::validate::execute(norms),
        Commands::ListTypes => commands::list_types::execute(),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
