mod context;
pub mod dispatcher;
pub mod error;
mod report;
mod results;

pub use context::{ActionArgs, ActionKind, FileAnalysis, FileId};
pub use dispatcher::StreamDispatcher;
pub use error::AnalysisError;
pub use report::AnalysisReport;
pub use results::ResultsContext;
