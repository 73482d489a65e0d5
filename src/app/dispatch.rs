use crate::agent::Mission;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::telemetry::{RiskReport, ScanRequest};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{text}");
    Ok(())
}

/// Read a risk report from a file holding either a bare report or a
/// `/scan` response (`{"risk_data": {...}}`).
pub fn read_risk_file(path: &Path) -> Result<RiskReport> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read risk file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Risk file {} is not JSON", path.display()))?;
    let report = value.get("risk_data").cloned().unwrap_or(value);
    serde_json::from_value(report)
        .with_context(|| format!("Risk file {} is not a risk report", path.display()))
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    if let Commands::Serve { port, host } = &cli.command {
        let port = port.unwrap_or(config.gateway.port);
        let host = host.clone().unwrap_or_else(|| config.gateway.host.clone());
        if port == 0 {
            info!("Starting OrbitWarden gateway on {host} (random port)");
        } else {
            info!("Starting OrbitWarden gateway on {host}:{port}");
        }
        return crate::gateway::run_gateway(&host, port, config).await;
    }

    let mission = Mission::from_config(&config).await;

    match cli.command {
        Commands::Serve { .. } => unreachable!(),

        Commands::Scan { satellite, danger } => {
            let request = ScanRequest::new(satellite).critical(danger);
            print_json(&mission.scan(&request).await?)
        }

        Commands::Act {
            risk_file,
            danger,
            session_id,
        } => {
            let risk = match risk_file {
                Some(path) => read_risk_file(&path)?,
                None => {
                    let request = ScanRequest::new("ISS").critical(danger);
                    mission.scan(&request).await?.risk_data
                }
            };
            let report = mission.act(&risk, session_id.as_deref()).await?;
            info!(
                session_id = report.outcome.session_id(),
                status = report.outcome.status(),
                attempts = report.outcome.attempts_log().len(),
                "decision session finished"
            );
            print_json(&report)
        }

        Commands::State => print_json(&mission.state().await),

        Commands::Restore => print_json(&mission.restore().await?),

        Commands::History => print_json(&mission.history().await),

        Commands::Reset => print_json(&mission.reset().await?),

        Commands::Insights => print_json(&mission.insights().await?),
    }
}
