pub mod common;
pub mod domain;
pub mod error;
pub mod rewriter;

use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;
use std::{num::NonZeroUsize, path::PathBuf};

use crate::{
    common::{encoding::TextEncoding, output_path::derive_output_path},
    error::RewriteError,
    rewriter::{
        DelimiterRewriter, RewriteSummary, streaming::StreamingRewriter,
        whole_file::WholeFileRewriter,
    },
};

/// 16MiB
const DEFAULT_CHUNK_SIZE_KB: u32 = 16 * 1024;
/// 1GiB
pub const MAX_CHUNK_SIZE_KB: u32 = 1024 * 1024;

/// How the input is read
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RewriteMode {
    /// Load the whole file in memory, then write the result
    WholeFile,
    /// Read and write fixed size chunks, the output only appears once complete
    Streaming,
}

serde_plain::derive_display_from_serialize!(RewriteMode);

/// Input for the excel_csv program
#[derive(Parser)]
#[command(version, about = "Rewrites a comma separated file with semicolons")]
pub struct ExcelCsvInput {
    /// The path of the csv file, the result is written next to it as <file minus its last 4
    /// characters>_excel.csv
    pub file: PathBuf,
    #[clap(flatten)]
    pub rewrite_options: RewriteOptions,
}

#[derive(Clone, Debug, Parser)]
pub struct RewriteOptions {
    /// How the input is read
    #[arg(long, default_value_t = RewriteMode::WholeFile)]
    pub mode: RewriteMode,
    /// Encoding of the input, the output uses the same one
    #[arg(long, default_value_t = TextEncoding::Utf8)]
    pub encoding: TextEncoding,
    /// Size of each read in streaming mode, at most 1GiB
    #[arg(
        long,
        default_value_t = DEFAULT_CHUNK_SIZE_KB,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_CHUNK_SIZE_KB))
    )]
    pub chunk_size_kb: u32,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            mode: RewriteMode::WholeFile,
            encoding: TextEncoding::Utf8,
            chunk_size_kb: DEFAULT_CHUNK_SIZE_KB,
        }
    }
}

impl RewriteOptions {
    /// Out of range values set through the library are clamped to 1KiB..=1GiB
    fn chunk_size_bytes(&self) -> NonZeroUsize {
        let kb = self.chunk_size_kb.clamp(1, MAX_CHUNK_SIZE_KB) as usize;
        NonZeroUsize::new(kb * 1024).unwrap_or(NonZeroUsize::MIN)
    }
}

/// Rewrites `input.file` into its `_excel.csv` sibling. Nothing is written when the input can't
/// be read or decoded.
///
/// # Errors
///
/// Any io or decoding failure, see [`RewriteError`]
pub fn process_csv(input: &ExcelCsvInput) -> Result<RewriteSummary, RewriteError> {
    let options = &input.rewrite_options;
    let output = derive_output_path(&input.file)?;
    info!(
        "rewriting {} into {} ({} mode, {})",
        input.file.display(),
        output.display(),
        options.mode,
        options.encoding
    );

    let summary = match options.mode {
        RewriteMode::WholeFile => {
            WholeFileRewriter.rewrite(options.encoding, &input.file, &output)
        }
        RewriteMode::Streaming => StreamingRewriter::new(options.chunk_size_bytes()).rewrite(
            options.encoding,
            &input.file,
            &output,
        ),
    }?;

    info!(
        "replaced {} delimiters, wrote {} bytes",
        summary.delimiters_replaced, summary.bytes_written
    );

    Ok(summary)
}
