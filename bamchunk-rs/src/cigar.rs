use noodles::sam::alignment::record::cigar::{op::Kind as CigarKind, Op as SamCigarOp};
use noodles::sam::alignment::record_buf::Cigar as SamCigar;
use std::fmt;

/// Alignment operation kinds understood by the chunker.
///
/// SAM `P` (padding) has no variant here: it consumes neither query nor
/// reference and is dropped when a record is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    SeqMatch,
    SeqMismatch,
}

impl OpKind {
    pub fn consumes_query(self) -> bool {
        matches!(
            self,
            OpKind::Match | OpKind::SeqMatch | OpKind::SeqMismatch | OpKind::Insertion | OpKind::SoftClip
        )
    }

    pub fn consumes_reference(self) -> bool {
        matches!(
            self,
            OpKind::Match | OpKind::SeqMatch | OpKind::SeqMismatch | OpKind::Deletion | OpKind::Skip
        )
    }

    /// True for kinds whose bases are re-emitted in a chunk's sequence.
    pub fn is_payload_bearing(self) -> bool {
        matches!(
            self,
            OpKind::Match | OpKind::SeqMatch | OpKind::SeqMismatch | OpKind::Insertion
        )
    }

    /// Kinds that produce one trace entry per base when flattened.
    pub fn is_traced(self) -> bool {
        self.is_payload_bearing() || self == OpKind::Deletion
    }

    /// Collapse `=`/`X` back to the generic `M` used in re-encoded chunks.
    pub fn generic(self) -> OpKind {
        match self {
            OpKind::SeqMatch | OpKind::SeqMismatch => OpKind::Match,
            other => other,
        }
    }

    pub fn from_sam(kind: CigarKind) -> Option<OpKind> {
        match kind {
            CigarKind::Match => Some(OpKind::Match),
            CigarKind::Insertion => Some(OpKind::Insertion),
            CigarKind::Deletion => Some(OpKind::Deletion),
            CigarKind::Skip => Some(OpKind::Skip),
            CigarKind::SoftClip => Some(OpKind::SoftClip),
            CigarKind::HardClip => Some(OpKind::HardClip),
            CigarKind::Pad => None,
            CigarKind::SequenceMatch => Some(OpKind::SeqMatch),
            CigarKind::SequenceMismatch => Some(OpKind::SeqMismatch),
        }
    }

    pub fn to_sam(self) -> CigarKind {
        match self {
            OpKind::Match => CigarKind::Match,
            OpKind::Insertion => CigarKind::Insertion,
            OpKind::Deletion => CigarKind::Deletion,
            OpKind::Skip => CigarKind::Skip,
            OpKind::SoftClip => CigarKind::SoftClip,
            OpKind::HardClip => CigarKind::HardClip,
            OpKind::SeqMatch => CigarKind::SequenceMatch,
            OpKind::SeqMismatch => CigarKind::SequenceMismatch,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OpKind::Match => 'M',
            OpKind::Insertion => 'I',
            OpKind::Deletion => 'D',
            OpKind::Skip => 'N',
            OpKind::SoftClip => 'S',
            OpKind::HardClip => 'H',
            OpKind::SeqMatch => '=',
            OpKind::SeqMismatch => 'X',
        }
    }
}

/// Run-length alignment encoding as `(length, kind)` runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cigar {
    pub ops: Vec<(usize, OpKind)>,
}

impl Cigar {
    /// Append a run, extending the last run when the kinds match.
    pub fn add_operation(&mut self, len: usize, op: OpKind) {
        if len == 0 {
            return;
        }
        if let Some((prev_len, prev_op)) = self.ops.last_mut()
            && *prev_op == op
        {
            *prev_len += len;
            return;
        }
        self.ops.push((len, op));
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, OpKind)> + '_ {
        self.ops.iter().copied()
    }

    /// Number of query bases the encoding consumes.
    pub fn query_len(&self) -> usize {
        self.iter().filter(|(_, op)| op.consumes_query()).map(|(len, _)| len).sum()
    }

    pub fn reference_len(&self) -> usize {
        self.iter().filter(|(_, op)| op.consumes_reference()).map(|(len, _)| len).sum()
    }

    pub fn to_sam_cigar(&self) -> SamCigar {
        self.iter().map(|(len, op)| SamCigarOp::new(op.to_sam(), len)).collect()
    }
}

impl FromIterator<(usize, OpKind)> for Cigar {
    fn from_iter<I: IntoIterator<Item = (usize, OpKind)>>(iter: I) -> Self {
        let mut cigar = Cigar::default();
        for (len, op) in iter {
            cigar.add_operation(len, op);
        }
        cigar
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("*");
        }
        for (len, op) in self.iter() {
            write!(f, "{len}{}", op.as_char())?;
        }
        Ok(())
    }
}
