use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `OrbitWarden` - autonomous collision-avoidance commander with policy validation.
#[derive(Parser, Debug)]
#[command(name = "orbitwarden")]
#[command(version = "0.1.0")]
#[command(
    about = "Autonomous satellite collision-avoidance decision loop.",
    long_about = None
)]
pub struct Cli {
    /// Log at DEBUG instead of INFO
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Assess conjunction risk for a satellite
    Scan {
        /// Satellite NORAD id or name
        #[arg(long, default_value = "ISS")]
        satellite: String,

        /// Inject a synthetic critical debris encounter
        #[arg(long)]
        danger: bool,
    },

    /// Run the decision loop against a risk report
    Act {
        /// JSON risk report to act on (default: run a fresh scan)
        #[arg(long, conflicts_with = "danger")]
        risk_file: Option<PathBuf>,

        /// Scan with a synthetic critical encounter first
        #[arg(long)]
        danger: bool,

        /// Session id for audit correlation (default: random)
        #[arg(long)]
        session_id: Option<String>,
    },

    /// Show the persisted spacecraft state
    State,

    /// Return to the trajectory recorded before the first maneuver
    Restore,

    /// List executed maneuvers
    History,

    /// Reset the spacecraft state to defaults
    Reset,

    /// Summarize recorded scan and act events
    Insights,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn act_accepts_risk_file_and_session() {
        let cli = Cli::try_parse_from([
            "orbitwarden",
            "act",
            "--risk-file",
            "risk.json",
            "--session-id",
            "abc",
        ])
        .unwrap();
        match cli.command {
            Commands::Act {
                risk_file,
                danger,
                session_id,
            } => {
                assert_eq!(risk_file, Some(PathBuf::from("risk.json")));
                assert!(!danger);
                assert_eq!(session_id.as_deref(), Some("abc"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn act_rejects_file_with_danger() {
        let parsed = Cli::try_parse_from([
            "orbitwarden",
            "act",
            "--risk-file",
            "risk.json",
            "--danger",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn scan_defaults_to_iss() {
        let cli = Cli::try_parse_from(["orbitwarden", "-v", "scan"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Scan { ref satellite, danger: false } if satellite == "ISS"
        ));
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["orbitwarden", "serve", "--port", "0"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: Some(0),
                host: None
            }
        ));
    }
}
