use anyhow::{Context, Result};

use crate::engine::{EngineError, SearchEngine};

/// Delete `index`. An index that is already gone, or a request the engine
/// rejects as malformed, is not an error.
pub fn delete_index(engine: &dyn SearchEngine, index: &str) -> Result<()> {
    match engine.delete_index(index) {
        Ok(()) => {
            tracing::info!("Deleted index {index}");
            Ok(())
        }
        Err(EngineError::IndexNotFound(_)) => {
            tracing::debug!("Index {index} already absent");
            Ok(())
        }
        Err(EngineError::BadRequest(reason)) => {
            tracing::debug!("Ignoring rejected delete of {index}: {reason}");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to delete index {index}")),
    }
}
