use thiserror::Error;

/// Failure to parse one of the bundled content documents.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("YAML error in {source_name}: {error}")]
    Yaml {
        source_name: &'static str,
        #[source]
        error: serde_yaml::Error,
    },

    #[error("JSON error in {source_name}: {error}")]
    Json {
        source_name: &'static str,
        #[source]
        error: serde_json::Error,
    },
}

/// Failure of the key-value store backing persisted state.
///
/// Callers in this crate never surface these to the user; they log and
/// carry on with in-memory state.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
