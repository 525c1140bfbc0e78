use filehash_core::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("reading content of {source_name}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
}
