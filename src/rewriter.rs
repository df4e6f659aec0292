use std::path::{Path, PathBuf};

use crate::common::encoding::TextEncoding;
use crate::error::RewriteError;

pub mod streaming;
pub mod whole_file;

/// What a successful rewrite produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSummary {
    pub output_path: PathBuf,
    pub bytes_written: u64,
    pub delimiters_replaced: usize,
}

pub trait DelimiterRewriter {
    /// Reads `input`, replaces its delimiters and writes the result to `output`, creating or
    /// truncating it. `input` is never modified.
    fn rewrite(
        &mut self,
        encoding: TextEncoding,
        input: &Path,
        output: &Path,
    ) -> Result<RewriteSummary, RewriteError>;
}
