//! search-arena CLI
//!
//! Compare two ranked search result lists with an LLM relevance judge.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use search_arena::{
    BatchConfig, BatchRunner, Config, EvalOptions, EvaluationReport, Evaluator, LlmClient,
    evaluator::DatasetReport,
    persistence::{load_case, load_cases, load_report, save_report},
};
use std::path::PathBuf;

/// search-arena - head-to-head search relevance evaluation
#[derive(Parser)]
#[command(name = "search-arena")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single comparison case
    Compare {
        /// Path to the case file (JSON with query, results_a, results_b)
        case: PathBuf,

        /// Save the report to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Judge both result lists concurrently
        #[arg(long)]
        concurrent: bool,
    },

    /// Evaluate every case file in a directory
    Batch {
        /// Directory containing case files
        dir: PathBuf,

        /// Save all results to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Judge both result lists of each case concurrently
        #[arg(long)]
        concurrent: bool,

        /// Maximum number of cases to evaluate
        #[arg(long)]
        max_cases: Option<usize>,

        /// Log each case as it completes
        #[arg(short, long)]
        verbose: bool,
    },

    /// Display a saved evaluation report
    Show {
        /// Path to the report file
        report: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Test LLM connection
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            case,
            output,
            concurrent,
        } => cmd_compare(case, output, concurrent).await,
        Commands::Batch {
            dir,
            output,
            concurrent,
            max_cases,
            verbose,
        } => cmd_batch(dir, output, concurrent, max_cases, verbose).await,
        Commands::Show { report, json } => cmd_show(report, json),
        Commands::Test => cmd_test().await,
    }
}

fn build_evaluator(concurrent: bool) -> Result<Evaluator<LlmClient>> {
    let config = Config::load().context("Failed to load configuration")?;
    let evaluator = Evaluator::from_config(&config)
        .context("Failed to create LLM client")?
        .with_options(EvalOptions {
            concurrent_datasets: concurrent,
        });

    if evaluator.has_judge() {
        println!("Using model: {}", config.llm.model);
    }
    Ok(evaluator)
}

async fn cmd_compare(case_path: PathBuf, output: Option<PathBuf>, concurrent: bool) -> Result<()> {
    let case = load_case(&case_path).context("Failed to load comparison case")?;
    let evaluator = build_evaluator(concurrent)?;

    println!("Query: \"{}\"", case.query);
    println!(
        "  A: {} results, B: {} results",
        case.results_a.len(),
        case.results_b.len()
    );

    let report = evaluator
        .evaluate(&case.query, &case.results_a, &case.results_b)
        .await;

    print_report(&report);

    if let Some(output) = output {
        save_report(&report, &output).context("Failed to save report")?;
        println!("\nReport saved to: {}", output.display());
    }

    Ok(())
}

async fn cmd_batch(
    dir: PathBuf,
    output: Option<PathBuf>,
    concurrent: bool,
    max_cases: Option<usize>,
    verbose: bool,
) -> Result<()> {
    let cases = load_cases(&dir).context("Failed to load comparison cases")?;
    println!("Loaded {} cases from {}", cases.len(), dir.display());

    let evaluator = build_evaluator(concurrent)?;
    let runner = BatchRunner::new(BatchConfig { max_cases, verbose });
    let results = runner.run(&evaluator, &cases).await;

    results.print_summary();

    if let Some(output) = output {
        save_report(&results, &output).context("Failed to save results")?;
        println!("Results saved to: {}", output.display());
    }

    Ok(())
}

fn cmd_show(report_path: PathBuf, json: bool) -> Result<()> {
    let report = load_report(&report_path).context("Failed to load report")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!("{}", "─".repeat(60));
    if !report.is_available() {
        println!("Judging unavailable: configure LLM_API_BASE and LLM_API_KEY.");
    }
    print_side("A", &report.dataset_a);
    print_side("B", &report.dataset_b);
    println!("{}", "─".repeat(60));
    println!("Judge time: {}ms", report.overall_duration_ms);
}

fn print_side(label: &str, side: &DatasetReport) {
    println!("{}: {}", label, side.score);
    if let Some(metrics) = &side.metrics {
        println!(
            "    nDCG@5: {:.3}  nDCG@10: {:.3}",
            metrics.ndcg_at_5, metrics.ndcg_at_10
        );
    }
    if !side.feedback.is_empty() {
        println!("    {}", side.feedback);
    }
}

async fn cmd_test() -> Result<()> {
    println!("Testing LLM connection...\n");

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  API Base:  {}", config.llm.api_base);
    println!("  Model:     {}", config.llm.model);
    println!(
        "  API Key:   {}...",
        config.llm.api_key.chars().take(8).collect::<String>()
    );
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = LlmClient::new(config.llm).context("Failed to create LLM client")?;

    println!("Sending test request...");
    match client.test_connection().await {
        Ok(()) => println!("Connection successful!"),
        Err(e) => println!("Connection failed: {}", e),
    }

    Ok(())
}
