//! Re-encoding of one window as an independent alignment.

use crate::cigar::Cigar;
use crate::error::ChunkError;
use crate::flatten::TraceEntry;
use crate::partition::Window;
use crate::record::AlignmentRecord;

/// Suffix appended to the source name, followed by the 1-based ordinal.
pub const CHUNK_SUFFIX: &str = "_chunk";

/// A chunk of a source alignment, owning all of its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedRecord {
    pub name: Vec<u8>,
    pub sequence: Vec<u8>,
    /// Empty when the source record had no qualities.
    pub quality: Vec<u8>,
    /// 0-based reference start.
    pub reference_start: usize,
    pub cigar: Cigar,
    /// 1-based position of this chunk among its siblings.
    pub ordinal: usize,
}

impl DerivedRecord {
    pub fn query_len(&self) -> usize {
        self.cigar.query_len()
    }
}

/// Build the derived record for `window`, the `ordinal`-th window of `record`.
///
/// Fails with the same errors as flattening if `window` indexes past the
/// sequence or qualities of `record`, as happens with a window taken from
/// another record's trace.
pub fn materialize(
    window: &Window<'_>,
    record: &AlignmentRecord<'_>,
    ordinal: usize,
) -> Result<DerivedRecord, ChunkError> {
    let entries = window.entries();
    let has_quality = !record.quality.is_empty();

    let mut sequence = Vec::with_capacity(window.query_len());
    let mut quality = Vec::with_capacity(if has_quality { window.query_len() } else { 0 });
    let mut cigar = Cigar::default();

    for entry in entries {
        if let Some(q) = entry.query_pos() {
            let base = record.sequence.get(q).ok_or(ChunkError::MalformedEncoding {
                query_end: q + 1,
                sequence_len: record.sequence.len(),
            })?;
            sequence.push(*base);
            if has_quality {
                let score = record.quality.get(q).ok_or(ChunkError::QualityLength {
                    quality_len: record.quality.len(),
                    sequence_len: record.sequence.len(),
                })?;
                quality.push(*score);
            }
        }
        cigar.add_operation(1, entry.kind.generic());
    }

    let reference_start = match entries.iter().find_map(TraceEntry::reference_pos) {
        Some(pos) => pos,
        // insertion-only window: anchor at the insertion point
        None => entries.first().map_or(0, TraceEntry::anchor),
    };

    let mut name = Vec::with_capacity(record.name.len() + CHUNK_SUFFIX.len() + 4);
    name.extend_from_slice(record.name);
    name.extend_from_slice(format!("{CHUNK_SUFFIX}{ordinal}").as_bytes());

    Ok(DerivedRecord {
        name,
        sequence,
        quality,
        reference_start,
        cigar,
        ordinal,
    })
}
