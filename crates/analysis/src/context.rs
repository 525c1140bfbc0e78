use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use filehash_core::{Action, ConfigurationError, HashAction, HashAlgorithm, ResultsSchema};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::report::AnalysisReport;
use crate::results::ResultsContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Md5,
    Sha1,
    Sha256,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [Self::Md5, Self::Sha1, Self::Sha256];

    pub fn name(self) -> &'static str {
        self.algorithm().name()
    }

    pub fn algorithm(self) -> HashAlgorithm {
        match self {
            Self::Md5 => HashAlgorithm::Md5,
            Self::Sha1 => HashAlgorithm::Sha1,
            Self::Sha256 => HashAlgorithm::Sha256,
        }
    }

    fn instantiate(self, schema: &ResultsSchema) -> Result<Box<dyn Action>, ConfigurationError> {
        let action = HashAction::for_algorithm(schema, self.algorithm())?;
        Ok(Box::new(action))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AnalysisError::UnknownAction(s.to_owned()))
    }
}

/// Configuration record identifying one attached action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionArgs {
    pub kind: ActionKind,
}

impl From<ActionKind> for ActionArgs {
    fn from(kind: ActionKind) -> Self {
        Self { kind }
    }
}

#[derive(Debug, Clone, Copy)]
struct Interest {
    chunks: bool,
    gaps: bool,
    eof: bool,
}

impl Interest {
    fn all() -> Self {
        Self {
            chunks: true,
            gaps: true,
            eof: true,
        }
    }
}

struct AttachedAction {
    args: ActionArgs,
    action: Box<dyn Action>,
    interest: Interest,
}

/// Analysis state of one file: its attached actions and their results.
///
/// Content must be delivered in order. Reassembly happens upstream; a forward
/// jump in offsets is reported to actions as a gap.
pub struct FileAnalysis {
    id: FileId,
    source: String,
    actions: Vec<AttachedAction>,
    results: ResultsContext,
    seen_bytes: u64,
    missing_bytes: u64,
    done: bool,
}

impl FileAnalysis {
    pub fn new(source: impl Into<String>, schema: Arc<ResultsSchema>) -> Self {
        Self {
            id: FileId::new(),
            source: source.into(),
            actions: Vec::new(),
            results: ResultsContext::new(schema),
            seen_bytes: 0,
            missing_bytes: 0,
            done: false,
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn seen_bytes(&self) -> u64 {
        self.seen_bytes
    }

    pub fn missing_bytes(&self) -> u64 {
        self.missing_bytes
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn results(&self) -> &ResultsContext {
        &self.results
    }

    pub fn has_action(&self, args: &ActionArgs) -> bool {
        self.actions.iter().any(|attached| attached.args == *args)
    }

    /// Attaches an action. Returns `Ok(false)` if one with the same args is
    /// already attached.
    pub fn add_action(&mut self, args: ActionArgs) -> Result<bool, ConfigurationError> {
        if self.has_action(&args) {
            return Ok(false);
        }
        let action = args.kind.instantiate(self.results.schema())?;
        debug!(file_id = %self.id, action = %args.kind, offset = self.seen_bytes, "action attached");
        self.actions.push(AttachedAction {
            args,
            action,
            interest: Interest::all(),
        });
        Ok(true)
    }

    /// Detaches an action, dropping it together with its hash state.
    pub fn remove_action(&mut self, args: &ActionArgs) -> bool {
        let before = self.actions.len();
        self.actions.retain(|attached| attached.args != *args);
        let removed = self.actions.len() != before;
        if removed {
            debug!(file_id = %self.id, action = %args.kind, "action removed");
        }
        removed
    }

    /// Delivers `data` found at `offset`.
    pub fn data_in(&mut self, offset: u64, data: &[u8]) {
        if self.done {
            warn!(file_id = %self.id, offset, "content after end of file dropped");
            return;
        }
        let Some(end) = offset.checked_add(data.len() as u64) else {
            warn!(file_id = %self.id, offset, len = data.len(), "content beyond addressable range dropped");
            return;
        };
        if offset < self.seen_bytes {
            warn!(
                file_id = %self.id,
                offset,
                seen = self.seen_bytes,
                "overlapping content dropped"
            );
            return;
        }
        if offset > self.seen_bytes {
            self.notify_gap(self.seen_bytes, offset);
        }

        for attached in self.actions.iter_mut().filter(|a| a.interest.chunks) {
            attached.interest.chunks = attached.action.deliver_stream(data);
            if !attached.interest.chunks {
                debug!(file_id = %self.id, action = %attached.args.kind, "action declined further content");
            }
        }
        self.seen_bytes = end;
    }

    /// Reports `len` bytes at `offset` as never to be delivered.
    ///
    /// Only the part past already seen content counts. A gap starting beyond
    /// the seen bytes also covers the bytes in between.
    pub fn gap(&mut self, offset: u64, len: u64) {
        if self.done || len == 0 {
            return;
        }
        let Some(end) = offset.checked_add(len) else {
            warn!(file_id = %self.id, offset, len, "gap beyond addressable range dropped");
            return;
        };
        if end <= self.seen_bytes {
            debug!(file_id = %self.id, offset, len, "gap over seen content ignored");
            return;
        }
        self.notify_gap(self.seen_bytes, end);
    }

    /// Marks `[start, end)` missing. `start` must equal `seen_bytes`.
    fn notify_gap(&mut self, start: u64, end: u64) {
        let len = end - start;
        for attached in self.actions.iter_mut().filter(|a| a.interest.gaps) {
            attached.interest.gaps = attached.action.undelivered(start, len);
        }
        self.missing_bytes += len;
        self.seen_bytes = end;
    }

    /// Signals the end of content. Further calls are ignored.
    pub fn end_of_file(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        for attached in self.actions.iter_mut().filter(|a| a.interest.eof) {
            let record = self.results.get_results(&attached.args);
            attached.interest.eof = attached.action.end_of_file(record);
        }
        info!(
            file_id = %self.id,
            source = %self.source,
            bytes = self.seen_bytes,
            missing = self.missing_bytes,
            "file analysis finished"
        );
    }

    pub fn report(&self) -> AnalysisReport {
        AnalysisReport::new(self)
    }
}
