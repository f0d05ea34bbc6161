//! Expansion of a run-length CIGAR into one trace entry per aligned base.

use crate::cigar::OpKind;
use crate::error::{ChunkError, RejectReason};
use crate::record::AlignmentRecord;

/// Largest coordinate a trace entry can hold. BAM positions are 32-bit, so
/// records read from BAM always fit.
pub const MAX_COORDINATE: usize = u32::MAX as usize;

const NO_QUERY: u32 = u32::MAX;

/// One aligned base (or deleted reference base) of a record.
///
/// Soft clips, skips and hard clips never appear in a trace. Positions are
/// stored as `u32` since a trace holds one entry per aligned base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    pub kind: OpKind,
    anchor: u32,
    query_pos: u32,
}

impl TraceEntry {
    /// Reference position of this entry, if its kind consumes reference.
    pub fn reference_pos(&self) -> Option<usize> {
        self.kind.consumes_reference().then_some(self.anchor as usize)
    }

    /// Reference position for reference-consuming kinds; for an insertion,
    /// the position the next reference base takes (the insertion point).
    pub fn anchor(&self) -> usize {
        self.anchor as usize
    }

    /// Index into the stored sequence/quality, if this entry consumes query.
    pub fn query_pos(&self) -> Option<usize> {
        self.consumes_query().then_some(self.query_pos as usize)
    }

    pub fn consumes_query(&self) -> bool {
        self.query_pos != NO_QUERY
    }
}

/// Flatten `record` into its per-base trace.
///
/// All bounds are checked before any entry is produced, so a malformed record
/// yields an error and nothing else.
pub fn flatten(record: &AlignmentRecord<'_>) -> Result<Vec<TraceEntry>, ChunkError> {
    let start = record
        .reference_start
        .ok_or(ChunkError::UnsupportedRecord(RejectReason::MissingStart))?;

    let sequence_len = record.sequence.len();
    if !record.quality.is_empty() && record.quality.len() != sequence_len {
        return Err(ChunkError::QualityLength {
            quality_len: record.quality.len(),
            sequence_len,
        });
    }
    let query_end = record.cigar.query_len();
    if query_end > sequence_len {
        return Err(ChunkError::MalformedEncoding { query_end, sequence_len });
    }
    let reference_end = start.saturating_add(record.cigar.reference_len());
    if reference_end > MAX_COORDINATE || sequence_len > MAX_COORDINATE {
        return Err(ChunkError::CoordinateOverflow { reference_end, sequence_len });
    }

    let capacity = record
        .cigar
        .iter()
        .filter(|(_, op)| op.is_traced())
        .map(|(len, _)| len)
        .sum();
    let mut trace = Vec::with_capacity(capacity);

    // both fit in u32 after the checks above
    let mut ref_pos = start as u32;
    let mut query_pos = 0u32;
    for (len, op) in record.cigar.iter() {
        let len = len as u32;
        match op {
            OpKind::Match | OpKind::SeqMatch | OpKind::SeqMismatch => {
                trace.extend((0..len).map(|i| TraceEntry {
                    kind: op,
                    anchor: ref_pos + i,
                    query_pos: query_pos + i,
                }));
                ref_pos += len;
                query_pos += len;
            }
            OpKind::Insertion => {
                trace.extend((0..len).map(|i| TraceEntry {
                    kind: op,
                    anchor: ref_pos,
                    query_pos: query_pos + i,
                }));
                query_pos += len;
            }
            OpKind::Deletion => {
                trace.extend((0..len).map(|i| TraceEntry {
                    kind: op,
                    anchor: ref_pos + i,
                    query_pos: NO_QUERY,
                }));
                ref_pos += len;
            }
            OpKind::SoftClip => query_pos += len,
            OpKind::Skip => ref_pos += len,
            OpKind::HardClip => {}
        }
    }

    Ok(trace)
}
