// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod config;
mod jobs;

use std::env;
use std::process::ExitCode;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::BatchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    AnomalyDetection,
    LogSummary,
}

impl Job {
    fn parse(name: &str) -> Option<Job> {
        match name {
            "anomaly-detection" => Some(Job::AnomalyDetection),
            "log-summary" => Some(Job::LogSummary),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let job = match env::args().nth(1).as_deref().and_then(Job::parse) {
        Some(job) => job,
        None => {
            eprintln!("usage: auditwatch-batch <anomaly-detection|log-summary>");
            return ExitCode::FAILURE;
        }
    };

    let config = match BatchConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if init_logging(&config.log_level).is_err() {
        eprintln!("could not initialize logging");
        return ExitCode::FAILURE;
    }
    debug!("logging subsystem enabled");

    let result = match job {
        Job::AnomalyDetection => jobs::anomaly::run(&config).await,
        Job::LogSummary => jobs::summary::run(&config).await,
    };

    match result {
        Ok(()) => {
            info!(?job, "batch run complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(?job, "batch run failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_level: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let env_filter = format!("hyper=off,reqwest=off,rustls=off,{log_level}");

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
