use bamchunk_rs::{ChunkConfig, DEFAULT_THRESHOLD, SecondaryFilter};
use clap::{Parser, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Command-line names for [`SecondaryFilter`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    /// Drop records whose flags are exactly 256 or 272 (secondary, possibly reversed)
    Exact,
    /// Drop every record with the secondary bit set
    Secondary,
    /// Drop secondary and supplementary records
    NonPrimary,
}

impl From<FilterArg> for SecondaryFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Exact => SecondaryFilter::Exact,
            FilterArg::Secondary => SecondaryFilter::Secondary,
            FilterArg::NonPrimary => SecondaryFilter::NonPrimary,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "bamchunk-rs",
    about = "Split aligned reads into fixed-size chunks that keep their genomic alignment",
    version
)]
pub struct Args {
    /// Input BAM with aligned reads
    pub in_bam: PathBuf,

    /// Output BAM path
    pub out_bam: PathBuf,

    /// Query bases per chunk (the last chunk of a read may be shorter)
    #[arg(short = 'c', long = "chunk-size", default_value_t = DEFAULT_THRESHOLD)]
    pub chunk_size: NonZeroUsize,

    /// Number of threads (CPUs) to use
    #[arg(short = 'p', long = "threads", default_value_t = 1)]
    pub threads: u8,

    /// Which secondary/supplementary alignments to drop instead of chunking
    #[arg(long, value_enum, default_value_t = FilterArg::Exact)]
    pub secondary_filter: FilterArg,

    /// Suppress progress logging and set logging level to WARN
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Args {
    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            threshold: self.chunk_size,
            secondary_filter: self.secondary_filter.into(),
        }
    }
}
