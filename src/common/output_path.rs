use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

use crate::error::RewriteError;

/// Appended to the truncated input path
pub const EXCEL_SUFFIX: &str = "_excel.csv";
/// How many trailing characters of the input path are dropped, meant to be `.csv` but never
/// checked
pub const STRIPPED_SUFFIX_LEN: usize = 4;

/// Builds the output path from the input path: the last 4 characters are removed, whatever they
/// are, and `_excel.csv` is appended. Inputs shorter than 4 characters are dropped entirely.
///
/// On unix a path that isn't valid UTF-8 is still accepted, every byte that doesn't decode
/// counts as one character.
///
/// # Errors
///
/// On other platforms, the path is not valid unicode so it can't be sliced by characters
pub fn derive_output_path(input: &Path) -> Result<PathBuf, RewriteError> {
    let mut output = OsString::from(truncate(input)?);
    output.push(EXCEL_SUFFIX);

    Ok(PathBuf::from(output))
}

#[cfg(unix)]
fn truncate(input: &Path) -> Result<&OsStr, RewriteError> {
    use std::os::unix::ffi::OsStrExt;

    let bytes = input.as_os_str().as_bytes();
    Ok(OsStr::from_bytes(&bytes[..kept_len(bytes)]))
}

#[cfg(not(unix))]
fn truncate(input: &Path) -> Result<&OsStr, RewriteError> {
    let Some(raw) = input.to_str() else {
        return Err(RewriteError::InvalidPath {
            path: input.to_path_buf(),
        });
    };

    Ok(OsStr::new(&raw[..kept_len(raw.as_bytes())]))
}

/// Byte length of everything but the last 4 characters. Valid UTF-8 is counted by character,
/// anything else byte by byte.
fn kept_len(bytes: &[u8]) -> usize {
    // byte offset right after each character
    let mut ends = Vec::with_capacity(bytes.len());
    let mut offset = 0;
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            offset += c.len_utf8();
            ends.push(offset);
        }
        for _ in chunk.invalid() {
            offset += 1;
            ends.push(offset);
        }
    }

    match ends.len().saturating_sub(STRIPPED_SUFFIX_LEN) {
        0 => 0,
        keep => ends[keep - 1],
    }
}
