use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::context::{FileAnalysis, FileId};

/// Summary of one file's analysis, suitable for printing as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub file_id: FileId,
    pub source: String,
    pub analyzed_at: DateTime<Utc>,
    pub bytes_seen: u64,
    pub missing_bytes: u64,
    pub results: BTreeMap<String, String>,
}

impl AnalysisReport {
    pub(crate) fn new(analysis: &FileAnalysis) -> Self {
        Self {
            file_id: analysis.id(),
            source: analysis.source().to_owned(),
            analyzed_at: Utc::now(),
            bytes_seen: analysis.seen_bytes(),
            missing_bytes: analysis.missing_bytes(),
            results: analysis.results().assigned(),
        }
    }
}
