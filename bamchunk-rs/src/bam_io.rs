use anyhow::{Context, Result};
use bamchunk_rs::DerivedRecord;
use noodles::core::Position;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::io::Write as _;
use noodles::sam::alignment::record_buf::{QualityScores, Sequence};
use noodles::{bam, bgzf, sam};
use std::fs::File;
use std::path::Path;

pub type BamReader = bam::io::Reader<bgzf::io::Reader<File>>;
pub type BamWriter = bam::io::Writer<bgzf::io::Writer<File>>;

pub fn open_bam(path: &Path) -> Result<(BamReader, sam::Header)> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = bam::io::Reader::new(file);
    let header = reader
        .read_header()
        .with_context(|| format!("failed to read BAM header from {}", path.display()))?;
    Ok((reader, header))
}

pub fn create_bam(path: &Path, header: &sam::Header) -> Result<BamWriter> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = bam::io::Writer::new(file);
    writer.write_header(header)?;
    Ok(writer)
}

/// Copy `original` and replace the fields a chunk redefines. Flags, MAPQ,
/// mate fields and tags are inherited unchanged.
pub fn to_record_buf(original: &RecordBuf, chunk: DerivedRecord) -> Result<RecordBuf> {
    let mut out = original.clone();

    let pos1 = chunk.reference_start.saturating_add(1);
    let alignment_start = Position::try_from(pos1)
        .map_err(|_| anyhow::anyhow!("alignment start out of range: {pos1}"))?;

    *out.name_mut() = Some(chunk.name.into());
    *out.cigar_mut() = chunk.cigar.to_sam_cigar();
    *out.sequence_mut() = Sequence::from(chunk.sequence);
    *out.quality_scores_mut() = QualityScores::from(chunk.quality);
    *out.alignment_start_mut() = Some(alignment_start);

    Ok(out)
}

/// Flush the writer and append the BGZF EOF block.
pub fn finish(mut writer: BamWriter) -> Result<()> {
    writer.try_finish().context("failed to finalize output BAM")?;
    Ok(())
}

pub fn write_records(writer: &mut BamWriter, header: &sam::Header, records: &[RecordBuf]) -> Result<()> {
    for record in records {
        writer.write_alignment_record(header, record)?;
    }
    Ok(())
}
