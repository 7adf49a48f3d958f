//! Command implementations.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use triage_client::{ClientConfig, PagePolicy, PatientApi};
use triage_score::{Assessment, ExactOrNearest, ScoringVariant, assess};

use crate::cli::AssessArgs;
use crate::logging::redact_value;

/// Everything the `assess` command produced.
#[derive(Debug)]
pub struct AssessOutcome {
    pub patients: usize,
    pub expected_high_risk: usize,
    pub assessment: Assessment,
    pub submission: Option<Value>,
    pub output: Option<PathBuf>,
}

/// Build the client configuration from environment variables plus CLI flags.
pub fn build_config(
    args: &AssessArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_lookup(lookup)?;
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url)?;
    }
    config.request_timeout = Duration::from_secs(args.request_timeout_secs);
    config.paging = PagePolicy {
        page_limit: args.page_limit,
        ..config.paging
    };
    Ok(config)
}

/// Run the `assess` command on a single-threaded runtime.
pub fn run_assess(args: &AssessArgs) -> Result<AssessOutcome> {
    if dotenvy::dotenv().is_ok() {
        debug!("loaded environment from .env");
    }
    let config = build_config(args, |var| std::env::var(var).ok())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(assess_patients(args, config))
}

async fn assess_patients(args: &AssessArgs, config: ClientConfig) -> Result<AssessOutcome> {
    info!(base_url = %config.base_url(), "fetching patients");
    let api = PatientApi::connect(config)?;

    let patients = api
        .fetch_patients()
        .await
        .context("failed to fetch patients")?;
    let assessment = assess(
        &patients,
        ScoringVariant::standard_set(),
        ExactOrNearest::new(args.expected_high_risk),
    )?;

    let results = &assessment.results;
    info!(
        patients = patients.len(),
        high_risk = results.high_risk_patients.len(),
        fever = results.fever_patients.len(),
        data_quality = results.data_quality_issues.len(),
        variant = %assessment.selected_variant(),
        "assessment complete"
    );
    for id in &results.high_risk_patients {
        debug!(patient = redact_value(id.as_str()), "high-risk patient");
    }

    let submission = if args.submit {
        let reply = api
            .submit(results)
            .await
            .context("failed to submit assessment")?;
        Some(reply)
    } else {
        None
    };

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(results)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write payload to {}", path.display()))?;
        info!(path = %path.display(), "wrote submission payload");
    }

    Ok(AssessOutcome {
        patients: patients.len(),
        expected_high_risk: args.expected_high_risk,
        assessment,
        submission,
        output: args.output.clone(),
    })
}
