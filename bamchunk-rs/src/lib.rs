//! bamchunk-rs: split aligned reads into fixed-size chunks that keep their
//! genomic alignment.
//!
//! A record's CIGAR is flattened into one trace entry per aligned base, the
//! trace is cut into windows holding a fixed number of query bases, and each
//! window is re-encoded as an alignment of its own with a fresh CIGAR, start
//! position and sequence/quality slice.
//!
//! # Library usage
//!
//! ```
//! use bamchunk_rs::{AlignmentRecord, ChunkConfig, Cigar, OpKind, split_record};
//!
//! let seq = vec![b'A'; 800];
//! let qual = vec![30; 800];
//! let cigar: Cigar = [(800, OpKind::Match)].into_iter().collect();
//! let record = AlignmentRecord::new(b"read1", &seq, &qual, 1000, cigar);
//!
//! let chunks: Vec<_> = split_record(&record, &ChunkConfig::default()).collect();
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[1].reference_start, 1400);
//! assert_eq!(chunks[1].name, b"read1_chunk2");
//! ```

pub mod chunk;
pub mod cigar;
pub mod error;
pub mod flatten;
pub mod materialize;
pub mod partition;
pub mod record;

pub use chunk::{
    ChunkConfig, Chunks, DEFAULT_CHUNK_SIZE, DEFAULT_THRESHOLD, SecondaryFilter, check_record,
    log_rejection, split_record, try_split_record,
};
pub use cigar::{Cigar, OpKind};
pub use error::{ChunkError, RejectReason};
pub use flatten::{MAX_COORDINATE, TraceEntry, flatten};
pub use materialize::{CHUNK_SUFFIX, DerivedRecord, materialize};
pub use partition::{Window, WindowCursor, Windows, partition};
pub use record::{AlignmentCategory, AlignmentRecord, MappingStatus};
