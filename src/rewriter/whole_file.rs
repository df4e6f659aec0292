use std::path::Path;

use log::debug;

use crate::{
    common::encoding::TextEncoding,
    domain::delimiter::{count_delimiters, replace_delimiter},
    error::RewriteError,
    rewriter::{DelimiterRewriter, RewriteSummary},
};

/// Loads the whole input in memory as one string before writing anything. The output is only
/// created once the input was read and decoded.
#[derive(Debug, Default)]
pub struct WholeFileRewriter;

impl DelimiterRewriter for WholeFileRewriter {
    fn rewrite(
        &mut self,
        encoding: TextEncoding,
        input: &Path,
        output: &Path,
    ) -> Result<RewriteSummary, RewriteError> {
        let bytes = std::fs::read(input).map_err(|err| RewriteError::on_read(input, err))?;
        debug!("read {} bytes from {}", bytes.len(), input.display());

        let text = encoding
            .decode(bytes)
            .map_err(|failure| RewriteError::Decode {
                path: input.to_path_buf(),
                offset: failure.offset as u64,
            })?;

        let delimiters_replaced = count_delimiters(&text);
        let rewritten = replace_delimiter(&text);
        let encoded = encoding.encode(&rewritten);

        std::fs::write(output, &encoded).map_err(|err| RewriteError::on_write(output, err))?;
        debug!("wrote {} bytes to {}", encoded.len(), output.display());

        Ok(RewriteSummary {
            output_path: output.to_path_buf(),
            bytes_written: encoded.len() as u64,
            delimiters_replaced,
        })
    }
}
