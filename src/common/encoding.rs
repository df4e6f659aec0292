use clap::ValueEnum;
use serde::Serialize;

use std::borrow::Cow;

/// The text encoding used to read the input and write the output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// Input must be valid UTF-8
    Utf8,
    /// ISO-8859-1, every byte is a character so decoding never fails
    Latin1,
}

serde_plain::derive_display_from_serialize!(TextEncoding);

/// Byte offset of the first sequence that isn't valid in the encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeFailure {
    pub offset: usize,
}

impl TextEncoding {
    /// Decodes the whole content into text
    ///
    /// # Errors
    ///
    /// The bytes aren't valid in this encoding
    pub fn decode(&self, bytes: Vec<u8>) -> Result<String, DecodeFailure> {
        match self {
            Self::Utf8 => String::from_utf8(bytes).map_err(|err| DecodeFailure {
                offset: err.utf8_error().valid_up_to(),
            }),
            Self::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    /// Encodes text that was produced by [`TextEncoding::decode`] with the same encoding. For
    /// latin1 every character is below U+0100 and maps back to its byte.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        match self {
            Self::Utf8 => Cow::Borrowed(text.as_bytes()),
            Self::Latin1 => Cow::Owned(
                text.chars()
                    .map(|c| u8::try_from(c).unwrap_or(b'?'))
                    .collect(),
            ),
        }
    }

    /// Returns how many leading bytes of `chunk` can be written out now. For UTF-8 a multi-byte
    /// sequence cut by the end of the chunk is held back so the next read can complete it, unless
    /// `at_eof` in which case it's an error.
    ///
    /// # Errors
    ///
    /// The chunk contains an invalid sequence, the offset is relative to the chunk
    pub fn valid_prefix(&self, chunk: &[u8], at_eof: bool) -> Result<usize, DecodeFailure> {
        match self {
            Self::Latin1 => Ok(chunk.len()),
            Self::Utf8 => match std::str::from_utf8(chunk) {
                Ok(_) => Ok(chunk.len()),
                Err(err) if err.error_len().is_none() && !at_eof => Ok(err.valid_up_to()),
                Err(err) => Err(DecodeFailure {
                    offset: err.valid_up_to(),
                }),
            },
        }
    }
}
