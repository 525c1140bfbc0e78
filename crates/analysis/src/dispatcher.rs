use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::context::FileAnalysis;
use crate::error::AnalysisError;

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Reads content sequentially and pushes it through a [`FileAnalysis`].
#[derive(Debug, Clone, Copy)]
pub struct StreamDispatcher {
    chunk_size: usize,
}

impl Default for StreamDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl StreamDispatcher {
    /// A `chunk_size` of zero falls back to [`DEFAULT_CHUNK_SIZE`].
    pub fn new(chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Streams `reader` to its end, then signals end of file. Returns the
    /// number of bytes read. On a read error the analysis is left unfinished.
    pub fn run<R: Read>(&self, mut reader: R, analysis: &mut FileAnalysis) -> Result<u64, AnalysisError> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut offset = analysis.seen_bytes();
        let start = offset;

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(AnalysisError::Io {
                        source_name: analysis.source().to_owned(),
                        source,
                    })
                }
            };
            trace!(offset, len = read, "delivering chunk");
            analysis.data_in(offset, &buffer[..read]);
            offset += read as u64;
        }

        analysis.end_of_file();
        Ok(offset - start)
    }
}
