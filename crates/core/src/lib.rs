pub mod action;
pub mod digest;
pub mod error;
pub mod record;

pub use action::{Action, HashAction, HashActionState};
pub use digest::{DigestState, DigestValue, HashAlgorithm, HashState};
pub use error::ConfigurationError;
pub use record::{FieldIndex, FieldType, FieldValue, ResultsRecord, ResultsSchema};
