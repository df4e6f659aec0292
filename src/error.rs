use serde::Serialize;
use strum::{EnumDiscriminants, IntoDiscriminant};

use std::{io, path::PathBuf};

/// Everything that can abort a rewrite. None of these are recoverable, the
/// first one encountered ends the run.
#[derive(Debug, EnumDiscriminants)]
#[strum_discriminants(
    name(RewriteErrorKind),
    derive(Serialize),
    serde(rename_all = "kebab-case")
)]
pub enum RewriteError {
    /// The input file doesn't exist
    InputNotFound { path: PathBuf, source: io::Error },
    /// Either the input can't be read or the output can't be written because of permissions
    PermissionDenied { path: PathBuf, source: io::Error },
    /// Any other failure while reading the input
    ReadFailed { path: PathBuf, source: io::Error },
    /// The input is not valid text in the chosen encoding. `offset` is the byte offset of the
    /// first invalid sequence
    Decode { path: PathBuf, offset: u64 },
    /// The input path can't be turned into an output path (not valid unicode)
    InvalidPath { path: PathBuf },
    /// Any other failure while creating or writing the output
    WriteFailed { path: PathBuf, source: io::Error },
}

serde_plain::derive_display_from_serialize!(RewriteErrorKind);

impl RewriteError {
    pub fn kind(&self) -> RewriteErrorKind {
        self.discriminant()
    }

    /// Classifies an io error raised while opening or reading `path`
    pub fn on_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::InputNotFound { path, source },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::ReadFailed { path, source },
        }
    }

    /// Classifies an io error raised while creating or writing `path`
    pub fn on_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::WriteFailed { path, source },
        }
    }
}

impl std::fmt::Display for RewriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputNotFound { path, .. } => {
                write!(f, "input file {} not found", path.display())
            }
            Self::PermissionDenied { path, .. } => {
                write!(f, "permission denied for {}", path.display())
            }
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Decode { path, offset } => write!(
                f,
                "{} is not valid text, invalid byte sequence at offset {offset}",
                path.display()
            ),
            Self::InvalidPath { path } => {
                write!(f, "path {} is not valid unicode", path.display())
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RewriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InputNotFound { source, .. }
            | Self::PermissionDenied { source, .. }
            | Self::ReadFailed { source, .. }
            | Self::WriteFailed { source, .. } => Some(source),
            Self::Decode { .. } | Self::InvalidPath { .. } => None,
        }
    }
}
