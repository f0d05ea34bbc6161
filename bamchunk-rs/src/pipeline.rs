use crate::bam_io::{self, BamWriter};
use crate::cli::Args;
use crate::header;
use anyhow::{Context, Result};
use bamchunk_rs::{AlignmentRecord, ChunkConfig, ChunkError, RejectReason, log_rejection, try_split_record};
use crossfire::mpmc;
use noodles::sam;
use noodles::sam::alignment::RecordBuf;
use std::collections::BTreeMap;
use std::io;
use std::thread;

const BATCH_SIZE: usize = 1024;
const PROGRESS_INTERVAL: u64 = 1_000_000;

#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub total_reads: u64,
    pub unmapped_reads: u64,
    pub secondary_reads: u64,
    pub missing_start_reads: u64,
    pub malformed_reads: u64,
    pub empty_reads: u64,
    pub chunked_reads: u64,
    pub chunks_written: u64,
}

impl Stats {
    fn merge(&mut self, other: &Stats) {
        self.total_reads += other.total_reads;
        self.unmapped_reads += other.unmapped_reads;
        self.secondary_reads += other.secondary_reads;
        self.missing_start_reads += other.missing_start_reads;
        self.malformed_reads += other.malformed_reads;
        self.empty_reads += other.empty_reads;
        self.chunked_reads += other.chunked_reads;
        self.chunks_written += other.chunks_written;
    }

    fn record_rejection(&mut self, error: &ChunkError) {
        match error {
            ChunkError::UnsupportedRecord(RejectReason::Unmapped) => self.unmapped_reads += 1,
            ChunkError::UnsupportedRecord(RejectReason::Secondary) => self.secondary_reads += 1,
            ChunkError::UnsupportedRecord(RejectReason::MissingStart) => self.missing_start_reads += 1,
            ChunkError::EmptyTrace => self.empty_reads += 1,
            ChunkError::MalformedEncoding { .. }
            | ChunkError::CoordinateOverflow { .. }
            | ChunkError::QualityLength { .. }
            | ChunkError::InvalidThreshold => self.malformed_reads += 1,
        }
    }
}

struct WorkItem {
    idx: usize,
    records: Vec<RecordBuf>,
}

struct ResultItem {
    idx: usize,
    result: Result<(Vec<RecordBuf>, Stats)>,
}

pub fn run(args: &Args, command_line: &str) -> Result<Stats> {
    let config = args.chunk_config();
    let (mut reader, in_header) = bam_io::open_bam(&args.in_bam)?;
    let out_header = header::build_header(&in_header, command_line)?;
    let mut writer = bam_io::create_bam(&args.out_bam, &out_header)?;

    tracing::info!(
        chunk_size = config.threshold.get(),
        threads = args.threads,
        secondary_filter = ?config.secondary_filter,
        "chunking alignments"
    );

    let records = reader.record_bufs(&in_header);
    let stats = if args.threads > 1 {
        run_parallel(records, &out_header, &mut writer, &config, args.threads as usize)?
    } else {
        run_serial(records, &out_header, &mut writer, &config)?
    };

    bam_io::finish(writer)?;
    Ok(stats)
}

fn run_serial<I>(
    records: I,
    header: &sam::Header,
    writer: &mut BamWriter,
    config: &ChunkConfig,
) -> Result<Stats>
where
    I: Iterator<Item = io::Result<RecordBuf>>,
{
    let mut stats = Stats::default();
    let mut out: Vec<RecordBuf> = Vec::new();

    for result in records {
        let record = result.context("failed to read BAM record")?;
        process_record(&record, config, &mut stats, &mut out)?;
        bam_io::write_records(writer, header, &out)?;
        out.clear();
        log_progress(&stats);
    }

    Ok(stats)
}

fn run_parallel<I>(
    records: I,
    header: &sam::Header,
    writer: &mut BamWriter,
    config: &ChunkConfig,
    worker_count: usize,
) -> Result<Stats>
where
    I: Iterator<Item = io::Result<RecordBuf>>,
{
    crossfire::detect_backoff_cfg();
    let cap = worker_count.saturating_mul(4).max(8);
    let config = *config;

    thread::scope(|scope| -> Result<Stats> {
        let (tx_work, rx_work) = mpmc::bounded_blocking::<WorkItem>(cap);
        let (tx_res, rx_res) = mpmc::unbounded_blocking::<ResultItem>();

        for _ in 0..worker_count {
            let rx_work = rx_work.clone();
            let tx_res = tx_res.clone();
            scope.spawn(move || {
                while let Ok(item) = rx_work.recv() {
                    let result = process_batch(&item.records, &config);
                    let _ = tx_res.send(ResultItem { idx: item.idx, result });
                }
            });
        }
        drop(tx_res);
        drop(rx_work);

        let mut reorder = Reorder::default();
        let mut batch: Vec<RecordBuf> = Vec::with_capacity(BATCH_SIZE);
        let mut total_batches = 0usize;

        for result in records {
            batch.push(result.context("failed to read BAM record")?);
            if batch.len() == BATCH_SIZE {
                let records = std::mem::replace(&mut batch, Vec::with_capacity(BATCH_SIZE));
                tx_work
                    .send(WorkItem { idx: total_batches, records })
                    .map_err(|_| anyhow::anyhow!("worker channel closed"))?;
                total_batches += 1;

                while let Ok(res) = rx_res.try_recv() {
                    reorder.push(res, header, writer)?;
                }
            }
        }
        if !batch.is_empty() {
            tx_work
                .send(WorkItem { idx: total_batches, records: batch })
                .map_err(|_| anyhow::anyhow!("worker channel closed"))?;
            total_batches += 1;
        }
        drop(tx_work);

        while reorder.next_idx < total_batches {
            let res = rx_res
                .recv()
                .map_err(|_| anyhow::anyhow!("worker result channel closed"))?;
            reorder.push(res, header, writer)?;
        }

        Ok(reorder.stats)
    })
}

/// Writes batch results strictly in input order.
#[derive(Default)]
struct Reorder {
    pending: BTreeMap<usize, Result<(Vec<RecordBuf>, Stats)>>,
    next_idx: usize,
    stats: Stats,
}

impl Reorder {
    fn push(&mut self, item: ResultItem, header: &sam::Header, writer: &mut BamWriter) -> Result<()> {
        self.pending.insert(item.idx, item.result);
        while let Some(result) = self.pending.remove(&self.next_idx) {
            let (records, stats) = result?;
            bam_io::write_records(writer, header, &records)?;
            let before = self.stats.total_reads;
            self.stats.merge(&stats);
            if before / PROGRESS_INTERVAL != self.stats.total_reads / PROGRESS_INTERVAL {
                log_progress_line(&self.stats);
            }
            self.next_idx += 1;
        }
        Ok(())
    }
}

fn process_batch(records: &[RecordBuf], config: &ChunkConfig) -> Result<(Vec<RecordBuf>, Stats)> {
    let mut stats = Stats::default();
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        process_record(record, config, &mut stats, &mut out)?;
    }
    Ok((out, stats))
}

fn process_record(
    record: &RecordBuf,
    config: &ChunkConfig,
    stats: &mut Stats,
    out: &mut Vec<RecordBuf>,
) -> Result<()> {
    stats.total_reads += 1;
    let view = AlignmentRecord::from_record_buf(record);
    match try_split_record(&view, config) {
        Ok(chunks) => {
            stats.chunked_reads += 1;
            for chunk in chunks {
                out.push(bam_io::to_record_buf(record, chunk)?);
                stats.chunks_written += 1;
            }
        }
        Err(e) => {
            stats.record_rejection(&e);
            log_rejection(view.name, &e);
        }
    }
    Ok(())
}

fn log_progress(stats: &Stats) {
    if stats.total_reads % PROGRESS_INTERVAL == 0 {
        log_progress_line(stats);
    }
}

fn log_progress_line(stats: &Stats) {
    tracing::info!(
        records = stats.total_reads,
        chunks = stats.chunks_written,
        "processed records"
    );
}
