//! seomancer is a CLI tool that rates the on-page SEO of a URL and asks an LLM
//! for improved title, meta description and heading tags.
//!
//! The tool has four commands:
//! 1. `analyze` - Runs the full analysis for a URL and stores the report
//! 2. `audit` - Fetches and scores a URL without calling the model
//! 3. `reports` - Lists stored reports
//! 4. `serve` - Exposes `analyze` and `reports` over HTTP

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{LevelFilter, info};
use url::Url;

use seomancer::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_DB_PATH, DEFAULT_MODEL_TIMEOUT_SECS, DEFAULT_MODEL_URL,
    MODEL_API_KEY_ENV_NAME,
};
use seomancer::fetch::HttpFetcher;
use seomancer::pipeline::audit;
use seomancer::score::{MAX_SCORE, rubric_checks};
use seomancer::{Pipeline, Report, ScoreResult, Storage, SuggestionClient, server};

/// A CLI tool to score on-page SEO and get LLM improvement suggestions
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, action = clap::ArgAction::Count, help = "More output per occurrence: info (default), debug (-v), trace (-vv)", global = true)]
    verbose: u8,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Less output per occurrence: warn (-q), error (-qq)", global = true)]
    quiet: u8,
}

/// Options shared by the commands that talk to the model.
#[derive(clap::Args)]
struct ModelArgs {
    /// URL of the LLM model to use, e.g. ollama://llama3 or ollama://8b@llama3.1
    #[arg(long, short, default_value = DEFAULT_MODEL_URL)]
    model: String,
    /// Endpoint of the model backend, when not the backend default
    #[arg(long)]
    model_base_url: Option<String>,
    /// Seconds to wait for the model to answer
    #[arg(long, default_value_t = DEFAULT_MODEL_TIMEOUT_SECS)]
    model_timeout: u64,
    /// Path to the file with a prompt template ({url} and {seo_data} placeholders)
    #[arg(long, short = 'p')]
    prompt_file: Option<String>,
    /// Remove <think> blocks of reasoning models from the suggestions
    #[arg(long)]
    strip_thinking: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a URL, ask the model for suggestions and store the report
    Analyze {
        /// The page URL to analyze
        url: String,
        /// Path to database file to store reports
        #[arg(long, default_value = DEFAULT_DB_PATH)]
        db: String,
        #[command(flatten)]
        model_args: ModelArgs,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch and score a URL without calling the model or storing anything
    Audit {
        /// The page URL to audit
        url: String,
        /// Print signals and score as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stored reports
    Reports {
        /// Path to database file to read reports from
        #[arg(long, default_value = DEFAULT_DB_PATH)]
        db: String,
        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the analysis API over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, short, default_value = DEFAULT_BIND_ADDR)]
        bind: String,
        /// Path to database file to store reports
        #[arg(long, default_value = DEFAULT_DB_PATH)]
        db: String,
        #[command(flatten)]
        model_args: ModelArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(log_level(cli.verbose, cli.quiet))
        .init();

    match cli.command {
        Command::Analyze {
            url,
            db,
            model_args,
            json,
        } => handle_analyze_command(&url, &db, model_args, json).await,
        Command::Audit { url, json } => handle_audit_command(&url, json).await,
        Command::Reports { db, json } => handle_reports_command(&db, json),
        Command::Serve {
            bind,
            db,
            model_args,
        } => {
            let pipeline = build_pipeline(&db, model_args)?;
            server::serve(&bind, Arc::new(pipeline)).await
        }
    }
}

/// Log level starting from `Info`, raised by each `-v` and lowered by each `-q`.
fn log_level(verbose: u8, quiet: u8) -> LevelFilter {
    match i16::from(verbose) - i16::from(quiet) {
        ..=-2 => LevelFilter::Error,
        -1 => LevelFilter::Warn,
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn build_pipeline(db: &str, model_args: ModelArgs) -> Result<Pipeline> {
    let model_url =
        Url::parse(&model_args.model).map_err(|e| anyhow::anyhow!("Invalid model URL: {}", e))?;

    let api_key = match std::env::var(MODEL_API_KEY_ENV_NAME) {
        Ok(model_key) => Some(model_key),
        Err(err) => {
            info!("{err} while providing api key");
            None
        }
    };

    let suggester =
        SuggestionClient::from_model_url(&model_url, model_args.model_base_url.as_deref(), api_key)?
            .with_timeout(Duration::from_secs(model_args.model_timeout))
            .with_thinking_stripped(model_args.strip_thinking);

    let prompt_template = match model_args.prompt_file {
        Some(file) => {
            let content =
                fs::read_to_string(&file).context(format!("Failed to read prompt file: {file}"))?;
            Some(content)
        }
        None => None,
    };

    Ok(Pipeline::new(
        Box::new(HttpFetcher::new()?),
        suggester,
        Storage::new(db)?,
    )
    .with_prompt_template(prompt_template))
}

async fn handle_analyze_command(
    url: &str,
    db: &str,
    model_args: ModelArgs,
    json: bool,
) -> Result<()> {
    let pipeline = build_pipeline(db, model_args)?;
    let report = pipeline.analyze_and_suggest(url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

async fn handle_audit_command(url: &str, json: bool) -> Result<()> {
    let result = audit(&HttpFetcher::new()?, url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_audit(&result);
    }

    Ok(())
}

fn handle_reports_command(db: &str, json: bool) -> Result<()> {
    let reports = Storage::new(db)?.list_reports()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        info!("No reports in {db}");
    }
    for report in &reports {
        print_report(report);
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!(
        "## #{} {} ({}/{MAX_SCORE}, {})\n{}\n",
        report.id,
        report.url,
        report.score,
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.suggestions.trim()
    );
}

fn print_audit(result: &ScoreResult) {
    let signals = &result.signals;
    println!("URL: {}", signals.url);
    println!("Title: {}", signals.title);
    println!("Meta Description: {}", signals.meta_description);
    for (level, texts) in &signals.headings {
        println!("{}: {}", level.to_uppercase(), texts.join(" | "));
    }
    println!();
    for check in rubric_checks(signals) {
        println!(
            "[{}] {:<16} {:>3}",
            if check.passed { "x" } else { " " },
            check.criterion,
            if check.passed { check.points } else { 0 }
        );
    }
    println!("Score: {}/{MAX_SCORE}", result.score);
}
