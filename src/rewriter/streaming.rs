use std::{
    io::{ErrorKind, Read, Write},
    num::NonZeroUsize,
    path::Path,
};

use log::debug;

use crate::{
    common::encoding::TextEncoding,
    domain::delimiter::replace_delimiter_bytes,
    error::RewriteError,
    rewriter::{DelimiterRewriter, RewriteSummary},
};

/// Longest UTF-8 sequence that can be left incomplete at the end of a chunk
const MAX_CARRIED_BYTES: usize = 3;

/// Rewrites the input chunk by chunk so memory stays bounded by `chunk_size`. Output goes to a
/// temporary file next to the destination which only replaces it once everything was written,
/// so a failure never leaves a partial output behind.
#[derive(Debug)]
pub struct StreamingRewriter {
    chunk_size: NonZeroUsize,
}

#[derive(Debug)]
pub enum StreamError {
    Read(std::io::Error),
    Write(std::io::Error),
    /// Absolute offset of the invalid sequence in the input
    Decode(u64),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub bytes: u64,
    pub delimiters_replaced: usize,
}

impl StreamingRewriter {
    pub fn new(chunk_size: NonZeroUsize) -> Self {
        Self { chunk_size }
    }
}

/// Copies `reader` into `writer` replacing delimiters on the way. The bytes written always equal
/// the bytes read, only commas change.
///
/// # Errors
///
/// Reading, writing, or validating the encoding failed. Whatever was written before that point
/// stays in `writer`.
pub fn rewrite_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    encoding: TextEncoding,
    chunk_size: NonZeroUsize,
) -> Result<StreamStats, StreamError> {
    let chunk_size = chunk_size.get().min(usize::MAX - MAX_CARRIED_BYTES);
    let buf = &mut vec![0; chunk_size + MAX_CARRIED_BYTES];
    // bytes from the end of the previous chunk that are the start of an incomplete sequence
    let mut carried = 0;
    let mut stats = StreamStats::default();

    loop {
        let size = match reader.read(&mut buf[carried..carried + chunk_size]) {
            Ok(x) => x,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(StreamError::Read(err)),
        };
        let filled = carried + size;
        let at_eof = size == 0;

        let valid = encoding
            .valid_prefix(&buf[..filled], at_eof)
            .map_err(|failure| StreamError::Decode(stats.bytes + failure.offset as u64))?;

        stats.delimiters_replaced += replace_delimiter_bytes(&mut buf[..valid]);
        writer
            .write_all(&buf[..valid])
            .map_err(StreamError::Write)?;
        stats.bytes += valid as u64;

        if at_eof {
            break;
        }

        buf.copy_within(valid..filled, 0);
        carried = filled - valid;
    }

    writer.flush().map_err(StreamError::Write)?;

    Ok(stats)
}

impl DelimiterRewriter for StreamingRewriter {
    fn rewrite(
        &mut self,
        encoding: TextEncoding,
        input: &Path,
        output: &Path,
    ) -> Result<RewriteSummary, RewriteError> {
        let file = std::fs::File::open(input).map_err(|err| RewriteError::on_read(input, err))?;

        // no point holding a buffer bigger than the whole input
        let chunk_size = match file.metadata().map(|meta| usize::try_from(meta.len())) {
            Ok(Ok(len)) => {
                NonZeroUsize::new(len).map_or(NonZeroUsize::MIN, |len| len.min(self.chunk_size))
            }
            _ => self.chunk_size,
        };

        // a symlinked output is written through and an existing output keeps its permissions
        let target = std::fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf());
        let existing_permissions = std::fs::metadata(&target).ok().map(|meta| meta.permissions());

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut builder = tempfile::Builder::new();
        // same mode a plain create would get, the umask still applies
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder
            .tempfile_in(dir)
            .map_err(|err| RewriteError::on_write(output, err))?;
        if let Some(permissions) = existing_permissions {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(|err| RewriteError::on_write(output, err))?;
        }
        debug!(
            "streaming {} through {} in chunks of {} bytes",
            input.display(),
            tmp.path().display(),
            chunk_size
        );

        // on error `tmp` is dropped here and removed
        let stats = rewrite_stream(&file, tmp.as_file_mut(), encoding, chunk_size).map_err(
            |err| match err {
                StreamError::Read(err) => RewriteError::on_read(input, err),
                StreamError::Write(err) => RewriteError::on_write(output, err),
                StreamError::Decode(offset) => RewriteError::Decode {
                    path: input.to_path_buf(),
                    offset,
                },
            },
        )?;

        tmp.persist(&target)
            .map_err(|err| RewriteError::on_write(output, err.error))?;
        debug!("wrote {} bytes to {}", stats.bytes, target.display());

        Ok(RewriteSummary {
            output_path: output.to_path_buf(),
            bytes_written: stats.bytes,
            delimiters_replaced: stats.delimiters_replaced,
        })
    }
}
