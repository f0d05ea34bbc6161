//! Per-record entry point: filter, flatten, partition and materialize.

use crate::error::{ChunkError, RejectReason};
use crate::flatten::{TraceEntry, flatten};
use crate::materialize::{DerivedRecord, materialize};
use crate::partition::WindowCursor;
use crate::record::{AlignmentCategory, AlignmentRecord, MappingStatus};
use bstr::ByteSlice;
use noodles::sam::alignment::record::Flags;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

pub const DEFAULT_CHUNK_SIZE: usize = 400;

pub const DEFAULT_THRESHOLD: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CHUNK_SIZE) {
    Some(n) => n,
    None => panic!("default chunk size must be non-zero"),
};

/// Which non-primary alignments are dropped before chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondaryFilter {
    /// Flags exactly 256 or 272 (secondary, possibly reversed).
    #[default]
    Exact,
    /// Any record with the secondary bit set.
    Secondary,
    /// Secondary and supplementary records.
    NonPrimary,
}

impl SecondaryFilter {
    pub fn rejects(self, record: &AlignmentRecord<'_>) -> bool {
        match self {
            SecondaryFilter::Exact => {
                record.flags == Flags::SECONDARY
                    || record.flags == Flags::SECONDARY | Flags::REVERSE_COMPLEMENTED
            }
            SecondaryFilter::Secondary => record.category() == AlignmentCategory::Secondary,
            SecondaryFilter::NonPrimary => record.category() != AlignmentCategory::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Query bases per chunk; only the last chunk of a record may hold fewer.
    pub threshold: NonZeroUsize,
    pub secondary_filter: SecondaryFilter,
}

impl ChunkConfig {
    pub fn new(threshold: usize) -> Result<Self, ChunkError> {
        let threshold = NonZeroUsize::new(threshold).ok_or(ChunkError::InvalidThreshold)?;
        Ok(Self { threshold, secondary_filter: SecondaryFilter::default() })
    }

    pub fn with_secondary_filter(mut self, secondary_filter: SecondaryFilter) -> Self {
        self.secondary_filter = secondary_filter;
        self
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD, secondary_filter: SecondaryFilter::default() }
    }
}

/// Decide whether `record` takes part in chunking at all.
pub fn check_record(record: &AlignmentRecord<'_>, config: &ChunkConfig) -> Result<(), ChunkError> {
    if record.mapping_status() == MappingStatus::Unmapped {
        return Err(ChunkError::UnsupportedRecord(RejectReason::Unmapped));
    }
    if config.secondary_filter.rejects(record) {
        return Err(ChunkError::UnsupportedRecord(RejectReason::Secondary));
    }
    Ok(())
}

/// Split `record` into chunks, reporting why nothing would be produced.
///
/// On success at least one chunk is guaranteed.
pub fn try_split_record<'r>(
    record: &'r AlignmentRecord<'_>,
    config: &ChunkConfig,
) -> Result<Chunks<'r>, ChunkError> {
    check_record(record, config)?;
    let trace = flatten(record)?;
    if !trace.iter().any(TraceEntry::consumes_query) {
        return Err(ChunkError::EmptyTrace);
    }
    let cursor = WindowCursor::new(&trace, config.threshold);
    Ok(Chunks { record: Some(record), trace, cursor, ordinal: 0 })
}

/// Split `record` into chunks. Rejected or malformed records yield nothing.
pub fn split_record<'r>(record: &'r AlignmentRecord<'_>, config: &ChunkConfig) -> Chunks<'r> {
    match try_split_record(record, config) {
        Ok(chunks) => chunks,
        Err(e) => {
            log_rejection(record.name, &e);
            Chunks::empty(config.threshold)
        }
    }
}

/// Log why a record produced no chunks, at a level matching its severity.
pub fn log_rejection(name: &[u8], error: &ChunkError) {
    if error.is_silent() {
        tracing::trace!(read = %name.as_bstr(), reason = %error, "record not chunked");
    } else {
        tracing::warn!(read = %name.as_bstr(), error = %error, "skipping malformed record");
    }
}

/// Lazily materialized chunks of one record, in reference order.
#[derive(Debug, Clone)]
pub struct Chunks<'r> {
    record: Option<&'r AlignmentRecord<'r>>,
    trace: Vec<TraceEntry>,
    cursor: WindowCursor,
    ordinal: usize,
}

impl Chunks<'_> {
    fn empty(threshold: NonZeroUsize) -> Self {
        Self {
            record: None,
            trace: Vec::new(),
            cursor: WindowCursor::exhausted(threshold),
            ordinal: 0,
        }
    }
}

impl Iterator for Chunks<'_> {
    type Item = DerivedRecord;

    fn next(&mut self) -> Option<DerivedRecord> {
        let record = self.record?;
        let window = self.cursor.advance(&self.trace)?;
        self.ordinal += 1;
        match materialize(&window, record, self.ordinal) {
            Ok(chunk) => Some(chunk),
            Err(e) => {
                log_rejection(record.name, &e);
                self.record = None;
                self.cursor = WindowCursor::exhausted(self.cursor.threshold());
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.cursor.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

impl FusedIterator for Chunks<'_> {}
