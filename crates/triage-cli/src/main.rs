//! Ticket Triage CLI
//!
//! The `triage` command classifies issue-tracker tickets and runs the
//! verification gate used before handing work to an automation agent.
//!
//! ## Commands
//!
//! - `analyze`: Classify a ticket and attach files, eligibility or indices
//! - `followup`: Detect replies since your latest comment
//! - `verify`: Run the configured test/build commands
//! - `config`: Show the merged repository config

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, Level};

use triage_core::{
    find_repo_root, format_for_analysis, load_config, parse_comments, ClassificationResult,
    Comment, CommentThread, TicketAnalyzer, TicketSpan, TriageConfig,
};
use triage_verify::{VerificationReport, Verifier, VerifyStage};

#[derive(Parser)]
#[command(name = "triage")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Classify issue-tracker tickets and gate automated changes", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a ticket and suggest files, eligibility or search indices
    Analyze(AnalyzeArgs),

    /// Check whether others replied after your latest comment
    Followup {
        /// JSON file with the ticket's comments (array or {"comments": [...]})
        #[arg(long)]
        comments_file: PathBuf,

        /// Your tracker account ID
        #[arg(long, env = "TRIAGE_ACCOUNT_ID")]
        account_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run verification tests and build
    Verify {
        /// Run tests only
        #[arg(long, conflicts_with_all = ["build", "all"])]
        tests: bool,

        /// Run build only
        #[arg(long, conflicts_with = "all")]
        build: bool,

        /// Run tests and build (default)
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the merged repository configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Ticket summary/title
    #[arg(long)]
    summary: String,

    /// Ticket description
    #[arg(long, default_value = "")]
    description: String,

    /// Formatted comments from the ticket
    #[arg(long, default_value = "")]
    comments: String,

    /// JSON file with raw ticket comments, formatted and appended to --comments
    #[arg(long)]
    comments_file: Option<PathBuf>,

    /// Ticket key, attached to log lines
    #[arg(long)]
    key: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    triage_core::init_tracing(cli.log_json, level);

    match cli.command {
        Commands::Analyze(args) => cmd_analyze(&load_triage_config()?, args),
        Commands::Followup {
            comments_file,
            account_id,
            json,
        } => cmd_followup(&comments_file, &account_id, json),
        Commands::Verify {
            tests,
            build,
            all: _,
            json,
        } => {
            let stages: &[VerifyStage] = if tests {
                &[VerifyStage::Tests]
            } else if build {
                &[VerifyStage::Build]
            } else {
                &[VerifyStage::Tests, VerifyStage::Build]
            };
            cmd_verify(&load_triage_config()?, stages, json).await
        }
        Commands::Config { json } => cmd_config(&load_triage_config()?, json),
    }
}

/// Classify a ticket and print the result
fn cmd_analyze(config: &TriageConfig, args: AnalyzeArgs) -> Result<ExitCode> {
    let _span = args.key.as_deref().map(TicketSpan::enter);

    let mut comments = args.comments;
    if let Some(path) = &args.comments_file {
        let formatted = format_for_analysis(&read_comments(path)?);
        if !formatted.is_empty() {
            if !comments.is_empty() {
                comments.push('\n');
            }
            comments.push_str(&formatted);
        }
    }

    let analyzer = TicketAnalyzer::from_config(config);
    let result = analyzer.analyze(&args.summary, &args.description, &comments);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_analysis(&result);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_analysis(result: &ClassificationResult) {
    println!("Type: {}", result.ticket_type);
    println!("Confidence: {:.2}", result.confidence);
    println!("Reason: {}", result.reason);

    if !result.extracted_data.isbns.is_empty() {
        println!("ISBNs found: {}", result.extracted_data.isbns.join(", "));
    }

    if let Some(details) = result.code_change_details() {
        if !details.suggested_files.is_empty() {
            println!("Suggested files: {}", details.suggested_files.join(", "));
        }
        let ralph = &details.ralph_eligibility;
        println!("Ralph-eligible: {}", ralph.eligible);
        println!("Ralph confidence: {:.2}", ralph.confidence);
        if !ralph.criteria_met.is_empty() {
            println!("Criteria met: {}", ralph.criteria_met.join(", "));
        }
        if !ralph.disqualifiers.is_empty() {
            println!("Disqualifiers: {}", ralph.disqualifiers.join(", "));
        }
    }

    if let Some(details) = result.investigation_details() {
        if !details.suggested_indices.is_empty() {
            println!("Suggested indices: {}", details.suggested_indices.join(", "));
        }
    }
}

/// Report own comments and replies since the latest one
fn cmd_followup(comments_file: &Path, account_id: &str, json: bool) -> Result<ExitCode> {
    let comments = read_comments(comments_file)?;
    let context = CommentThread::new(&comments).followup_context(account_id);

    if json {
        println!("{}", serde_json::to_string_pretty(&context)?);
    } else {
        println!("Follow-up from others: {}", context.has_followup);
        if !context.user_comments.is_empty() {
            println!("Your comments:\n{}", context.user_comments);
        }
        if !context.new_comments.is_empty() {
            println!("New comments:\n{}", context.new_comments);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Run verification stages; exit code 1 when any stage fails
async fn cmd_verify(config: &TriageConfig, stages: &[VerifyStage], json: bool) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let workdir = find_repo_root(&cwd).unwrap_or(cwd);
    debug!(workdir = %workdir.display(), "verification workdir");

    let verifier = Verifier::new(config.verification.clone(), workdir);
    let report = verifier.verify(stages).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_verification(&report);
    }

    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_verification(report: &VerificationReport) {
    println!("Success: {}", report.success);
    if let Some(passed) = report.tests_passed {
        println!("Tests passed: {passed}");
    }
    if let Some(passed) = report.build_passed {
        println!("Build passed: {passed}");
    }
    if !report.failures.is_empty() {
        println!("Failures: {}", report.failures.len());
        for failure in report.failures.iter().take(5) {
            println!("  - {}", failure.label());
        }
    }
}

/// Print the merged configuration
fn cmd_config(config: &TriageConfig, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", config.to_json_pretty()?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("Jira statuses: {}", config.jira.statuses.join(", "));
    println!("Max tickets per run: {}", config.jira.max_tickets_per_run);
    println!("Base branch: {}", config.github.base_branch);
    println!("Branch prefix: {}", config.github.branch_prefix);
    println!("Test command: {}", config.verification.test_command);
    println!("Build command: {}", config.verification.build_command);
    println!("Timeout: {}s", config.verification.timeout_seconds);
    println!("Mapping rules: {}", config.code_mapping.patterns.len());
    println!("Index URL mappings: {}", config.index_url_mapping.len());
    Ok(ExitCode::SUCCESS)
}

fn load_triage_config() -> Result<TriageConfig> {
    load_config().context("Failed to load triage config")
}

fn read_comments(path: &Path) -> Result<Vec<Comment>> {
    let raw = std::fs::read_to_string(path)
        .context(format!("Failed to read comments file: {:?}", path))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).context("Failed to parse comments as JSON")?;
    Ok(parse_comments(&value))
}
