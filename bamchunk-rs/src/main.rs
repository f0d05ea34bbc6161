mod bam_io;
mod cli;
mod header;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    // Usage errors exit with 1; --help and --version still exit with 0.
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            if args.quiet {
                EnvFilter::new("warn")
            } else {
                EnvFilter::new("info")
            }
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command_line = std::env::args().collect::<Vec<_>>().join(" ");
    let stats = pipeline::run(&args, &command_line)?;
    tracing::info!(
        total_reads = stats.total_reads,
        chunked_reads = stats.chunked_reads,
        chunks_written = stats.chunks_written,
        unmapped_reads = stats.unmapped_reads,
        secondary_reads = stats.secondary_reads,
        missing_start_reads = stats.missing_start_reads,
        malformed_reads = stats.malformed_reads,
        empty_reads = stats.empty_reads,
        "bamchunk-rs: processing complete"
    );
    Ok(())
}
