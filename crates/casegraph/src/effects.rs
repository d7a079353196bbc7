use crate::store::Store;
use std::path::PathBuf;
use tracing::error;

/// Deferred effects that must run outside the reducer (file IO)
#[derive(Debug, Clone)]
pub enum Effect {
    /// Load a dataset from disk, replacing the current one
    LoadDataset { path: PathBuf },
    /// Write the current dataset to disk
    SaveDataset { path: PathBuf },
}

/// Execute a single effect against the store
pub fn run(store: &mut Store, effect: Effect) {
    let result = match &effect {
        Effect::LoadDataset { path } => store.load_dataset(path),
        Effect::SaveDataset { path } => store.save_dataset(path),
    };
    if let Err(e) = result {
        error!(error = %e, ?effect, "effect failed");
        store.error_message = Some(e.to_string());
    }
}
