use tracing::{debug, trace, warn};

use crate::digest::{DigestState, HashAlgorithm, HashState};
use crate::error::ConfigurationError;
use crate::record::{FieldIndex, FieldType, FieldValue, ResultsRecord, ResultsSchema};

/// A pluggable consumer of one file's content notifications.
///
/// Each callback returns whether the action wants further notifications of
/// the same kind. Once an action returns `false` for a kind, the host stops
/// sending it that kind.
pub trait Action {
    fn deliver_stream(&mut self, data: &[u8]) -> bool;

    /// A byte range that exists in the file but will never be delivered.
    fn undelivered(&mut self, offset: u64, len: u64) -> bool;

    /// `results` is the record the host keeps for this action.
    fn end_of_file(&mut self, results: &mut ResultsRecord) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashActionState {
    Active,
    Invalidated,
    Finalized,
}

impl HashActionState {
    pub fn wants_chunks(self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn wants_gaps(self) -> bool {
        false
    }

    pub fn wants_eof(self) -> bool {
        !matches!(self, Self::Finalized)
    }
}

/// Streams a file's content into an owned [`HashState`] and publishes the
/// digest into one results field at end of file.
///
/// The field is assigned at most once, and only if at least one non-empty
/// chunk was fed and the hash state is still valid when the stream ends.
pub struct HashAction<H> {
    result_field: FieldIndex,
    hash: H,
    fed: bool,
    state: HashActionState,
}

impl<H: HashState> HashAction<H> {
    /// Binds `hash` to `result_field`. The field is resolved before the hash
    /// state is touched; on failure the state is dropped uninitialized.
    pub fn new(schema: &ResultsSchema, result_field: &str, mut hash: H) -> Result<Self, ConfigurationError> {
        let result_field = schema.resolve(result_field, FieldType::Digest)?;
        hash.init();
        Ok(Self {
            result_field,
            hash,
            fed: false,
            state: HashActionState::Active,
        })
    }

    pub fn state(&self) -> HashActionState {
        self.state
    }

    pub fn is_fed(&self) -> bool {
        self.fed
    }

    pub fn result_field(&self) -> FieldIndex {
        self.result_field
    }

    fn finalize(&mut self, results: &mut ResultsRecord) {
        if self.state == HashActionState::Invalidated || !self.hash.is_valid() {
            debug!(field = self.result_field.offset(), "hash state invalid, digest withheld");
            return;
        }
        if !self.fed {
            debug!(field = self.result_field.offset(), "no content fed, digest withheld");
            return;
        }
        if let Some(digest) = self.hash.get() {
            debug!(field = self.result_field.offset(), %digest, "publishing digest");
            if !results.assign(self.result_field, FieldValue::Digest(digest)) {
                warn!(field = self.result_field.offset(), "results record rejected digest");
            }
        }
    }
}

impl HashAction<Box<dyn HashState>> {
    /// Action writing `algorithm`'s digest to its default results field.
    pub fn for_algorithm(schema: &ResultsSchema, algorithm: HashAlgorithm) -> Result<Self, ConfigurationError> {
        Self::new(schema, algorithm.field_name(), algorithm.new_state())
    }
}

impl HashAction<DigestState<sha2::Sha256>> {
    pub fn sha256(schema: &ResultsSchema) -> Result<Self, ConfigurationError> {
        Self::new(schema, HashAlgorithm::Sha256.field_name(), DigestState::new())
    }
}

impl<H: HashState> Action for HashAction<H> {
    fn deliver_stream(&mut self, data: &[u8]) -> bool {
        if self.state == HashActionState::Active && !self.hash.is_valid() {
            debug!(field = self.result_field.offset(), "hash state became invalid");
            self.state = HashActionState::Invalidated;
        }
        if self.state != HashActionState::Active {
            return self.state.wants_chunks();
        }

        self.hash.feed(data);
        if !data.is_empty() {
            self.fed = true;
        }
        self.state.wants_chunks()
    }

    fn undelivered(&mut self, offset: u64, len: u64) -> bool {
        trace!(offset, len, "content gap ignored by hash action");
        self.state.wants_gaps()
    }

    fn end_of_file(&mut self, results: &mut ResultsRecord) -> bool {
        if self.state != HashActionState::Finalized {
            self.finalize(results);
            self.state = HashActionState::Finalized;
        }
        self.state.wants_eof()
    }
}
