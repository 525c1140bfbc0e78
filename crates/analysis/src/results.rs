use std::collections::BTreeMap;
use std::sync::Arc;

use filehash_core::{ResultsRecord, ResultsSchema};

use crate::context::{ActionArgs, ActionKind};

/// Results records of one file, one per attached action.
#[derive(Debug, Clone)]
pub struct ResultsContext {
    schema: Arc<ResultsSchema>,
    records: BTreeMap<ActionKind, ResultsRecord>,
}

impl ResultsContext {
    pub fn new(schema: Arc<ResultsSchema>) -> Self {
        Self {
            schema,
            records: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &Arc<ResultsSchema> {
        &self.schema
    }

    /// Record for `args`, created empty on first use.
    pub fn get_results(&mut self, args: &ActionArgs) -> &mut ResultsRecord {
        let schema = &self.schema;
        self.records
            .entry(args.kind)
            .or_insert_with(|| ResultsRecord::new(Arc::clone(schema)))
    }

    pub fn results(&self, args: &ActionArgs) -> Option<&ResultsRecord> {
        self.records.get(&args.kind)
    }

    /// Every assigned field across all records, rendered as text.
    pub fn assigned(&self) -> BTreeMap<String, String> {
        self.records
            .values()
            .flat_map(|record| record.assigned())
            .map(|(name, value)| (name.to_owned(), value.to_string()))
            .collect()
    }
}
