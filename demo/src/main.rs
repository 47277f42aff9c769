//! ClaimStream Dental Claims Review — Demo CLI
//!
//! Runs the reference review scenarios, or drives a single claim through an
//! arbitrary event script.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- crown-approval
//!   cargo run -p demo -- review --claim CLM004 --events open_case,verify,approve
//!   cargo run -p demo -- review --claim CLM003 --events open,verify,approve \
//!       --policy crates/claimstream-policy/policies/reviewer_override.toml --json

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use claimstream_contracts::{
    error::{ClaimStreamError, ClaimStreamResult},
    review::{ReviewEvent, ReviewSnapshot},
};
use claimstream_policy::TomlDecisionPolicy;
use claimstream_ref_dental::{
    mock_data, pas,
    scenarios::{crown_approval, crown_denial, reset_cycle, uncovered_procedure},
    settlement::{self, usd},
    wiring,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// ClaimStream — dental claims review demo.
///
/// Each subcommand runs one or all of the reference scenarios, or reviews one
/// claim by replaying a list of reviewer events.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "ClaimStream dental claims review demo",
    long_about = "Runs ClaimStream review scenarios showing PAS verification,\n\
                  record checks, decision policy gating and reset handling."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four review scenarios in sequence.
    RunAll,
    /// Scenario 1: Crown Approval (every check passes).
    CrownApproval,
    /// Scenario 2: Crown Denial (insufficient benefits).
    CrownDenial,
    /// Scenario 3: Uncovered Procedure (approval blocked by policy).
    UncoveredProcedure,
    /// Scenario 4: Reset Cycle (late verification result discarded).
    ResetCycle,
    /// List the claims known to the reference PAS.
    Claims,
    /// Review one claim by replaying reviewer events.
    Review {
        /// Claim to load, e.g. CLM001.
        #[arg(long, default_value = "CLM001")]
        claim: String,
        /// Comma-separated events: open_case, verify, approve, deny, reset.
        #[arg(long, value_delimiter = ',', default_value = "open_case,verify,approve")]
        events: Vec<String>,
        /// Decision policy TOML file; the standard policy when omitted.
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Print every snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => {
            print_banner();
            run_all()
        }
        Command::CrownApproval => crown_approval::run_scenario(),
        Command::CrownDenial => crown_denial::run_scenario(),
        Command::UncoveredProcedure => uncovered_procedure::run_scenario(),
        Command::ResetCycle => reset_cycle::run_scenario(),
        Command::Claims => list_claims(),
        Command::Review {
            claim,
            events,
            policy,
            json,
        } => review(&claim, &events, policy, json),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> ClaimStreamResult<()> {
    crown_approval::run_scenario()?;
    crown_denial::run_scenario()?;
    uncovered_procedure::run_scenario()?;
    reset_cycle::run_scenario()?;
    println!("All scenarios completed successfully.");
    Ok(())
}

fn list_claims() -> ClaimStreamResult<()> {
    println!("{:<8} {:<16} {:<32} {:<6} {:>8}", "Claim", "Member", "Provider", "Code", "Amount");
    for id in mock_data::known_claim_ids() {
        let claim = pas::load_claim(id)?;
        println!(
            "{:<8} {:<16} {:<32} {:<6} {:>8}",
            claim.claim_id.as_str(),
            claim.member_name,
            claim.provider_name,
            claim.procedure_code,
            usd(claim.amount)
        );
    }
    Ok(())
}

// ── Event script ──────────────────────────────────────────────────────────────

fn review(
    claim_id: &str,
    events: &[String],
    policy: Option<PathBuf>,
    json: bool,
) -> ClaimStreamResult<()> {
    // Reject the whole script before touching the session if any name is bad.
    let events = events
        .iter()
        .map(|name| name.trim().parse::<ReviewEvent>())
        .collect::<ClaimStreamResult<Vec<_>>>()?;

    let mut session = match policy {
        Some(path) => {
            info!(policy = %path.display(), "loading decision policy");
            wiring::session_with_policy(claim_id, Box::new(TomlDecisionPolicy::from_file(&path)?))?
        }
        None => wiring::standard_session(claim_id)?,
    };

    print_snapshot("load", &session.snapshot(), json)?;
    for event in events {
        match session.dispatch(event) {
            Ok(snapshot) => print_snapshot(event.as_str(), &snapshot, json)?,
            Err(e) => println!("[{}] rejected: {}", event, e),
        }
    }

    if let Some(summary) = settlement::summarize(&session.snapshot()) {
        println!();
        println!("{}", summary);
    }
    Ok(())
}

fn print_snapshot(label: &str, snapshot: &ReviewSnapshot, json: bool) -> ClaimStreamResult<()> {
    if json {
        let rendered = serde_json::to_string_pretty(snapshot).map_err(|e| {
            ClaimStreamError::PreconditionViolation {
                reason: format!("snapshot could not be serialized: {}", e),
            }
        })?;
        println!("[{}]\n{}", label, rendered);
        return Ok(());
    }

    let status = snapshot
        .claim_status()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let recommendation = snapshot
        .verification
        .as_ref()
        .map(|r| r.recommendation.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "[{}] step {}/4 {:<8} status {:<8} recommendation {}",
        label,
        snapshot.step.ordinal(),
        snapshot.step.to_string(),
        status,
        recommendation
    );
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("ClaimStream — Dental Claims Review");
    println!("Claims Management Center Demo");
    println!("==================================");
    println!();
    println!("Review pipeline per claim:");
    println!("  [1] VIEW      claim loaded, case closed");
    println!("  [2] DETAIL    case opened, claim details shown");
    println!("  [3] VERIFIED  PAS record fetched and checked (JSON Schema + benefit rules)");
    println!("  [4] DECIDED   decision policy consulted, claim APPROVED or DENIED");
    println!();
}
