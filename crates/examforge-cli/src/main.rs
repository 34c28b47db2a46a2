//! examforge CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examforge", version, about = "LLM-assisted exam grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess the whole roster in parallel
    Run {
        /// Exam date, selects the document triple (e.g. "2025-06-05")
        #[arg(long)]
        date: String,

        /// Directory holding the exam documents
        #[arg(long)]
        exams_dir: Option<PathBuf>,

        /// Directory holding per-question checklist files
        #[arg(long)]
        solutions_dir: Option<PathBuf>,

        /// Judge backend name from the config
        #[arg(long)]
        provider: Option<String>,

        /// Judge model (aliases accepted, e.g. "llama")
        #[arg(long)]
        model: Option<String>,

        /// Worker tasks
        #[arg(long)]
        workers: Option<usize>,

        /// Judgment temperature
        #[arg(long)]
        temperature: Option<f64>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Assess a single student
    Assess {
        /// Student identity, full or a unique prefix (10+ characters)
        student: String,

        /// Exam date, selects the document triple
        #[arg(long)]
        date: String,

        /// Directory holding the exam documents
        #[arg(long)]
        exams_dir: Option<PathBuf>,

        /// Directory holding per-question checklist files
        #[arg(long)]
        solutions_dir: Option<PathBuf>,

        /// Judge backend name from the config
        #[arg(long)]
        provider: Option<String>,

        /// Judge model
        #[arg(long)]
        model: Option<String>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate exam documents and checklists without judging anything
    Validate {
        /// Exam date, selects the document triple
        #[arg(long)]
        date: String,

        /// Directory holding the exam documents
        #[arg(long)]
        exams_dir: Option<PathBuf>,

        /// Directory holding per-question checklist files
        #[arg(long)]
        solutions_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available judge models
    ListModels {
        /// Filter to a specific backend
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example exam documents
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            date,
            exams_dir,
            solutions_dir,
            provider,
            model,
            workers,
            temperature,
            output,
            config,
        } => {
            commands::run::execute(
                date,
                exams_dir,
                solutions_dir,
                provider,
                model,
                workers,
                temperature,
                output,
                config,
            )
            .await
        }
        Commands::Assess {
            student,
            date,
            exams_dir,
            solutions_dir,
            provider,
            model,
            output,
            config,
        } => {
            commands::assess::execute(
                student,
                date,
                exams_dir,
                solutions_dir,
                provider,
                model,
                output,
                config,
            )
            .await
        }
        Commands::Validate {
            date,
            exams_dir,
            solutions_dir,
            config,
        } => commands::validate::execute(date, exams_dir, solutions_dir, config),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
