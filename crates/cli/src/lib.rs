pub mod args;
pub mod config;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use filehash_analysis::{AnalysisReport, FileAnalysis, StreamDispatcher};
use filehash_core::ResultsSchema;
use tracing::debug;

use crate::config::Settings;

/// Streams the file at `path` through every configured action.
pub fn analyze_file(path: &Path, settings: &Settings) -> Result<AnalysisReport> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut analysis = FileAnalysis::new(
        path.display().to_string(),
        Arc::new(ResultsSchema::action_results()),
    );
    for kind in &settings.actions {
        analysis
            .add_action((*kind).into())
            .with_context(|| format!("attaching {kind} action"))?;
    }

    let dispatcher = StreamDispatcher::new(settings.chunk_size);
    let read = dispatcher.run(BufReader::new(file), &mut analysis)?;
    debug!(path = %path.display(), read, "file streamed");
    Ok(analysis.report())
}

pub fn render_report(report: &AnalysisReport, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    rendered.context("serializing analysis report")
}
