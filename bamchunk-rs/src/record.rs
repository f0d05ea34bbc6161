use crate::cigar::{Cigar, OpKind};
use bstr::ByteSlice;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::Flags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingStatus {
    Mapped,
    Unmapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentCategory {
    Primary,
    Secondary,
    Supplementary,
}

/// Borrowed view of the alignment fields the chunker reads.
///
/// Everything else on the source record (mate fields, MAPQ, tags) is carried
/// over by the writer, not by this type.
#[derive(Debug, Clone)]
pub struct AlignmentRecord<'a> {
    pub name: &'a [u8],
    /// Bases as stored, including soft-clipped ones.
    pub sequence: &'a [u8],
    /// Raw Phred scores; empty when the record has no qualities (`*`).
    pub quality: &'a [u8],
    /// 0-based reference start, `None` when the record has no position.
    pub reference_start: Option<usize>,
    pub cigar: Cigar,
    pub flags: Flags,
}

impl<'a> AlignmentRecord<'a> {
    /// A mapped, primary alignment.
    pub fn new(
        name: &'a [u8],
        sequence: &'a [u8],
        quality: &'a [u8],
        reference_start: usize,
        cigar: Cigar,
    ) -> Self {
        Self {
            name,
            sequence,
            quality,
            reference_start: Some(reference_start),
            cigar,
            flags: Flags::empty(),
        }
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn from_record_buf(record: &'a RecordBuf) -> Self {
        let cigar: Cigar = record
            .cigar()
            .as_ref()
            .iter()
            .filter_map(|op| OpKind::from_sam(op.kind()).map(|kind| (op.len(), kind)))
            .collect();

        Self {
            name: record_name(record),
            sequence: record.sequence().as_ref(),
            quality: record.quality_scores().as_ref(),
            // noodles positions are 1-based
            reference_start: record.alignment_start().map(|pos| pos.get() - 1),
            cigar,
            flags: record.flags(),
        }
    }

    pub fn mapping_status(&self) -> MappingStatus {
        if self.flags.is_unmapped() {
            MappingStatus::Unmapped
        } else {
            MappingStatus::Mapped
        }
    }

    pub fn category(&self) -> AlignmentCategory {
        if self.flags.is_secondary() {
            AlignmentCategory::Secondary
        } else if self.flags.is_supplementary() {
            AlignmentCategory::Supplementary
        } else {
            AlignmentCategory::Primary
        }
    }
}

fn record_name(record: &RecordBuf) -> &[u8] {
    record.name().map(|name| name.as_bytes()).unwrap_or_default()
}
