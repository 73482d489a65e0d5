use super::maneuver::{apply_maneuver, restore_original_trajectory};
use super::types::SpacecraftState;
use crate::agent::ActionProposal;
use crate::error::StateError;
use crate::telemetry::RiskReport;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Durable spacecraft state.
///
/// One async mutex guards the in-memory copy and spans every
/// read-modify-persist, so concurrent maneuvers serialize. The in-memory copy
/// only changes after the file write succeeds.
pub struct StateStore {
    path: PathBuf,
    state: Mutex<SpacecraftState>,
}

impl StateStore {
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = load(&path).await;
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> SpacecraftState {
        self.state.lock().await.clone()
    }

    pub async fn apply_and_persist(
        &self,
        risk: &RiskReport,
        proposal: &ActionProposal,
    ) -> Result<SpacecraftState, StateError> {
        let mut guard = self.state.lock().await;
        let next = apply_maneuver(&guard, risk, proposal);
        persist(&self.path, &next).await?;
        *guard = next.clone();
        tracing::info!(
            action = %proposal.action,
            maneuvers = next.maneuver_count(),
            "maneuver applied"
        );
        Ok(next)
    }

    /// Returns the resulting state and whether a baseline existed.
    pub async fn restore(&self) -> Result<(SpacecraftState, bool), StateError> {
        let mut guard = self.state.lock().await;
        let (next, restored) = restore_original_trajectory(&guard);
        if restored {
            persist(&self.path, &next).await?;
            *guard = next.clone();
            tracing::info!("original trajectory restored");
        }
        Ok((next, restored))
    }

    pub async fn reset(&self) -> Result<SpacecraftState, StateError> {
        let mut guard = self.state.lock().await;
        let next = SpacecraftState {
            updated_at: Some(Utc::now()),
            ..SpacecraftState::default()
        };
        persist(&self.path, &next).await?;
        *guard = next.clone();
        tracing::info!("spacecraft state reset to defaults");
        Ok(next)
    }
}

/// Read the state file; absent, unreadable or corrupt files all yield
/// `SpacecraftState::default()` (never stamped).
pub async fn load(path: &Path) -> SpacecraftState {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return SpacecraftState::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "state file unreadable ({e}), using defaults");
            return SpacecraftState::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), "state file corrupt ({e}), using defaults");
        SpacecraftState::default()
    })
}

/// Write `state` as pretty JSON via a sibling temp file and rename.
pub async fn persist(path: &Path, state: &SpacecraftState) -> Result<(), StateError> {
    let to_persist_err = |source: std::io::Error| StateError::Persist {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(to_persist_err)?;
    }

    let body = serde_json::to_string_pretty(state)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, body).await.map_err(to_persist_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(to_persist_err)?;
    Ok(())
}
