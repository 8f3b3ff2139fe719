//! JSON files passed between the pipeline stages.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::analysis::ShotRecord;
use crate::error::{InputError, Result};

/// A loosely typed edit event as read back from an edit map
pub type EventRecord = Map<String, Value>;

async fn read_input(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InputError::NotFound { path: path.display().to_string() }.into()
        } else {
            InputError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        }
    })
}

fn malformed(path: &Path, e: serde_json::Error) -> crate::error::DirectorError {
    InputError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
    .into()
}

/// Load a shots file written by the analyze stage
pub async fn load_shots<P: AsRef<Path>>(path: P) -> Result<Vec<ShotRecord>> {
    let path = path.as_ref();
    let content = read_input(path).await?;
    let shots: Vec<ShotRecord> = serde_json::from_str(&content).map_err(|e| malformed(path, e))?;

    debug!("Loaded {} shots from {}", shots.len(), path.display());
    Ok(shots)
}

/// Load an edit map without insisting on the exact event schema
///
/// Every entry must be a JSON object; fields inside it are left for the
/// consumer to interpret.
pub async fn load_event_records<P: AsRef<Path>>(path: P) -> Result<Vec<EventRecord>> {
    let path = path.as_ref();
    let content = read_input(path).await?;
    let events: Vec<EventRecord> = serde_json::from_str(&content).map_err(|e| malformed(path, e))?;

    debug!("Loaded {} edit events from {}", events.len(), path.display());
    Ok(events)
}

/// Write `value` as pretty-printed JSON, creating parent directories as needed
pub async fn write_json<P, T>(path: P, value: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let body = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, body).await?;

    debug!("Wrote {}", path.display());
    Ok(())
}
