//! Grouping of a flattened trace into windows of bounded query length.
//!
//! A boundary is only ever placed in front of a query-consuming entry, once
//! the open window already holds `threshold` query bases. Deletions that
//! follow a full window stay in it, so no window is made of deletions alone.

use crate::flatten::TraceEntry;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;
use std::ops::Range;

/// A contiguous, non-empty slice of the trace.
#[derive(Debug, Clone, Copy)]
pub struct Window<'t> {
    entries: &'t [TraceEntry],
    query_len: usize,
}

impl<'t> Window<'t> {
    pub fn entries(&self) -> &'t [TraceEntry] {
        self.entries
    }

    /// Number of entries that consume query.
    pub fn query_len(&self) -> usize {
        self.query_len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Locate the window starting at `start`, returning its range and query length.
///
/// Returns `None` once no query-consuming entry is left at or after `start`.
pub fn next_window(
    trace: &[TraceEntry],
    start: usize,
    threshold: NonZeroUsize,
) -> Option<(Range<usize>, usize)> {
    let threshold = threshold.get();
    let mut query_len = 0usize;
    for (i, entry) in trace.iter().enumerate().skip(start) {
        if entry.consumes_query() {
            if query_len >= threshold {
                return Some((start..i, query_len));
            }
            query_len += 1;
        }
    }
    (query_len > 0).then_some((start..trace.len(), query_len))
}

/// Position of a window scan over a trace.
///
/// Kept apart from the trace so that owners of a trace can advance it while
/// handing out borrowed windows.
#[derive(Debug, Clone, Copy)]
pub struct WindowCursor {
    pos: usize,
    remaining_query: usize,
    threshold: NonZeroUsize,
}

impl WindowCursor {
    pub fn new(trace: &[TraceEntry], threshold: NonZeroUsize) -> Self {
        let remaining_query = trace.iter().filter(|entry| entry.consumes_query()).count();
        Self { pos: 0, remaining_query, threshold }
    }

    /// A cursor that yields nothing.
    pub fn exhausted(threshold: NonZeroUsize) -> Self {
        Self { pos: usize::MAX, remaining_query: 0, threshold }
    }

    pub fn advance<'t>(&mut self, trace: &'t [TraceEntry]) -> Option<Window<'t>> {
        let Some((range, query_len)) = next_window(trace, self.pos, self.threshold) else {
            self.pos = usize::MAX;
            self.remaining_query = 0;
            return None;
        };
        self.pos = range.end;
        self.remaining_query -= query_len;
        Some(Window { entries: &trace[range], query_len })
    }

    pub fn threshold(&self) -> NonZeroUsize {
        self.threshold
    }

    /// Number of windows still to come.
    pub fn remaining(&self) -> usize {
        self.remaining_query.div_ceil(self.threshold.get())
    }
}

/// Lazy iterator over the windows of a trace.
#[derive(Debug, Clone)]
pub struct Windows<'t> {
    trace: &'t [TraceEntry],
    cursor: WindowCursor,
}

pub fn partition(trace: &[TraceEntry], threshold: NonZeroUsize) -> Windows<'_> {
    Windows { trace, cursor: WindowCursor::new(trace, threshold) }
}

impl<'t> Iterator for Windows<'t> {
    type Item = Window<'t>;

    fn next(&mut self) -> Option<Window<'t>> {
        self.cursor.advance(self.trace)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.cursor.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Windows<'_> {}

impl FusedIterator for Windows<'_> {}
