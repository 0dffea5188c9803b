use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use barko_reporter::report;

#[derive(Parser)]
#[command(name = "barko-reporter")]
#[command(version = "0.1.0")]
#[command(about = "Generate HTML, JSON and JUnit reports from batch test runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report in a single format
    Render {
        /// Path to batch report summaries JSON
        #[arg(long)]
        reports: PathBuf,

        /// Path to execution records JSON
        #[arg(long)]
        executions: PathBuf,

        /// Project display name
        #[arg(short, long, default_value = "Untitled Project")]
        project: String,

        /// Output format (html, json, junit)
        #[arg(short, long, default_value = "html")]
        format: String,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write HTML and JUnit reports into the standard Reports/ layout
    Publish {
        /// Path to batch report summaries JSON
        #[arg(long)]
        reports: PathBuf,

        /// Path to execution records JSON
        #[arg(long)]
        executions: PathBuf,

        /// Project display name
        #[arg(short, long)]
        project: String,

        /// Base directory for the generated report tree
        #[arg(long, default_value = "Reports")]
        base_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            reports,
            executions,
            project,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report for {}",
                "📊".to_string().blue(),
                format.cyan(),
                project.cyan()
            );
            report::generate_report(&reports, &executions, &project, &format, output.as_deref())?;
        }

        Commands::Publish {
            reports,
            executions,
            project,
            base_dir,
        } => {
            println!(
                "{} Publishing reports for {}",
                "📊".to_string().blue(),
                project.cyan()
            );
            println!("  Output: {}", base_dir.display().to_string().cyan());
            report::publish_reports(&reports, &executions, &project, &base_dir)?;
        }
    }

    Ok(())
}
