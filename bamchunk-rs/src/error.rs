//! Per-record errors raised while chunking an alignment.

use thiserror::Error;

/// Why a record was filtered before flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Unmapped,
    Secondary,
    /// Flagged as mapped but carries no alignment start.
    MissingStart,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RejectReason::Unmapped => "unmapped",
            RejectReason::Secondary => "secondary alignment",
            RejectReason::MissingStart => "missing alignment start",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// The CIGAR walks past the end of the stored sequence.
    #[error("CIGAR consumes {query_end} query bases but the sequence has {sequence_len}")]
    MalformedEncoding { query_end: usize, sequence_len: usize },

    /// The alignment reaches past the 32-bit coordinate range of a trace.
    #[error("alignment does not fit 32-bit coordinates (reference end {reference_end}, sequence length {sequence_len})")]
    CoordinateOverflow { reference_end: usize, sequence_len: usize },

    /// Quality scores are present but not parallel to the sequence.
    #[error("quality length {quality_len} does not match sequence length {sequence_len}")]
    QualityLength { quality_len: usize, sequence_len: usize },

    #[error("alignment has no query-consuming bases to chunk")]
    EmptyTrace,

    #[error("record rejected: {0}")]
    UnsupportedRecord(RejectReason),

    #[error("chunk size must be at least 1")]
    InvalidThreshold,
}

impl ChunkError {
    /// Filter outcomes and empty traces are expected; everything else points
    /// at a broken input record.
    pub fn is_silent(&self) -> bool {
        matches!(self, ChunkError::EmptyTrace | ChunkError::UnsupportedRecord(_))
    }
}
