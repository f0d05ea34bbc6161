use bamchunk_rs::{AlignmentRecord, Cigar, OpKind, TraceEntry, flatten, partition};
use std::num::NonZeroUsize;

fn trace_of(ops: &[(usize, OpKind)]) -> Vec<TraceEntry> {
    let cigar: Cigar = ops.iter().copied().collect();
    let seq = vec![b'A'; cigar.query_len()];
    let record = AlignmentRecord::new(b"r", &seq, &[], 0, cigar);
    flatten(&record).unwrap()
}

fn threshold(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn shapes(trace: &[TraceEntry], t: usize) -> Vec<(usize, usize)> {
    partition(trace, threshold(t)).map(|w| (w.len(), w.query_len())).collect()
}

#[test]
fn full_windows_then_remainder() {
    let trace = trace_of(&[(10, OpKind::Match)]);
    assert_eq!(shapes(&trace, 4), vec![(4, 4), (4, 4), (2, 2)]);
}

#[test]
fn exact_multiple_has_no_trailing_window() {
    let trace = trace_of(&[(8, OpKind::Match)]);
    assert_eq!(shapes(&trace, 4), vec![(4, 4), (4, 4)]);
}

/// Deletions count toward a window's length but never toward its query length.
#[test]
fn deletions_ride_along_with_query_bases() {
    let trace = trace_of(&[(10, OpKind::Match), (5, OpKind::Deletion), (10, OpKind::Match)]);
    assert_eq!(shapes(&trace, 15), vec![(20, 15), (5, 5)]);
}

/// A deletion run right after a full window stays in that window instead of
/// opening a window of its own.
#[test]
fn deletion_after_full_window_does_not_force_boundary() {
    let trace = trace_of(&[(4, OpKind::Match), (2, OpKind::Deletion), (4, OpKind::Match)]);
    assert_eq!(shapes(&trace, 4), vec![(6, 4), (4, 4)]);

    let trailing = trace_of(&[(4, OpKind::Match), (3, OpKind::Deletion)]);
    assert_eq!(shapes(&trailing, 4), vec![(7, 4)]);
}

#[test]
fn trace_without_query_bases_has_no_windows() {
    let trace = trace_of(&[(5, OpKind::Deletion)]);
    assert_eq!(partition(&trace, threshold(3)).count(), 0);
    assert_eq!(partition(&[], threshold(3)).count(), 0);
}

#[test]
fn windows_partition_the_trace_in_order() {
    let trace = trace_of(&[
        (3, OpKind::Match),
        (2, OpKind::Insertion),
        (4, OpKind::Deletion),
        (7, OpKind::Match),
    ]);
    let rebuilt: Vec<TraceEntry> = partition(&trace, threshold(3))
        .flat_map(|w| w.entries().iter().copied())
        .collect();
    assert_eq!(rebuilt, trace);
}

#[test]
fn window_count_is_known_up_front() {
    let trace = trace_of(&[(10, OpKind::Match), (3, OpKind::Insertion)]);
    let mut windows = partition(&trace, threshold(4));
    assert_eq!(windows.len(), 4);
    windows.next();
    assert_eq!(windows.len(), 3);
    assert_eq!(windows.by_ref().count(), 3);
    assert_eq!(windows.len(), 0);
    assert!(windows.next().is_none());
}

#[test]
fn threshold_of_one_gives_one_base_windows() {
    let trace = trace_of(&[(2, OpKind::Match), (1, OpKind::Deletion), (1, OpKind::Match)]);
    assert_eq!(shapes(&trace, 1), vec![(1, 1), (2, 1), (1, 1)]);
}
