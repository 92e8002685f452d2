#![warn(missing_docs)]
//! # fakecheck binary
//!
//! Command-line entry point: submits one artifact, URL, or text for
//! authenticity analysis and prints the verdict.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fakecheck_analysis_contract::{DEFAULT_DANGER_THRESHOLD, DEFAULT_SUSPECT_THRESHOLD};
use fakecheck_app::{APP_VERSION, AnalysisSession, AppConfig, AppError, DEFAULT_API_BASE_URL};
use fakecheck_core::{Artifact, SubmissionPayload};
use fakecheck_ui::{DashboardKpis, ErrorView, ResultView, ViewState};
use tracing_subscriber::EnvFilter;

/// Exit code used when the user interrupts a pending analysis.
const EXIT_INTERRUPTED: u8 = 130;
/// Exit code used when the analysis service reports a failure.
const EXIT_ANALYSIS_FAILED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "fakecheck",
    version = APP_VERSION,
    about = "Submit an image, URL, or text for authenticity analysis"
)]
struct Cli {
    /// Image file to analyze
    #[arg(long)]
    file: Option<PathBuf>,

    /// Article or image URL to analyze
    #[arg(long)]
    url: Option<String>,

    /// Free text to analyze
    #[arg(long)]
    text: Option<String>,

    /// Analysis service base address
    #[arg(long, env = "FAKECHECK_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Lower bound of the Suspect bucket, in [0, 1]
    #[arg(long, env = "FAKECHECK_SUSPECT_THRESHOLD", default_value_t = DEFAULT_SUSPECT_THRESHOLD)]
    suspect_threshold: f64,

    /// Lower bound of the Danger bucket, in [0, 1]
    #[arg(long, env = "FAKECHECK_DANGER_THRESHOLD", default_value_t = DEFAULT_DANGER_THRESHOLD)]
    danger_threshold: f64,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// CLI entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(%error, "fakecheck failed");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let config = AppConfig::new(&cli.api_base_url, cli.suspect_threshold, cli.danger_threshold)?;
    tracing::info!(version = APP_VERSION, api_base_url = %config.api_base_url, "config loaded");

    let payload = SubmissionPayload {
        url: cli.url,
        text: cli.text,
        file: cli.file.map(Artifact::from_path).transpose()?,
    };

    let mut session = AnalysisSession::from_config(&config)?;
    tracing::debug!(
        suspect_threshold = session.policy().suspect_threshold(),
        danger_threshold = session.policy().danger_threshold(),
        "verdict policy in use"
    );
    let job_id = session.submit(payload)?;
    println!("analyzing ({job_id})... press Ctrl-C to cancel");

    let interrupted = tokio::select! {
        outcome = session.next_outcome() => {
            outcome?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        session.cancel();
        println!("cancelled");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }

    let code = match session.view() {
        ViewState::Result(view) => {
            print_result(view);
            ExitCode::SUCCESS
        }
        ViewState::Error(view) => {
            print_error(view);
            ExitCode::from(EXIT_ANALYSIS_FAILED)
        }
        ViewState::Init | ViewState::Loading { .. } => ExitCode::FAILURE,
    };
    print_dashboard(&session.dashboard());
    Ok(code)
}

fn print_result(view: &ResultView) {
    println!();
    println!("{}  [{}]", view.title, view.verdict.label);
    println!("  {}", view.description);
    println!("  real probability: {}", view.real_percent());
    println!("  AI signal:        {}", view.ai_percent());
    println!("  rationale: {}", view.verdict.rationale);
    if !view.evidences.is_empty() {
        println!("  evidence:");
        for evidence in &view.evidences {
            println!("    - {evidence}");
        }
    }
    if let Some(image_url) = &view.image_url {
        println!("  preview: {image_url}");
    }
}

fn print_error(view: &ErrorView) {
    println!();
    println!("{}", view.category.title());
    println!("  {}", view.category.description());
    println!("  detail: {}", view.error);
    if view.offers_retry() {
        println!("  this failure may succeed if retried");
    }
}

fn print_dashboard(kpis: &DashboardKpis) {
    println!();
    println!(
        "session: {} scans, {} fake detected, fake rate {}, suspected rate {}",
        kpis.total_scans, kpis.fake_detected, kpis.fake_rate, kpis.suspected_rate
    );
}
