use std::path::PathBuf;

use thiserror::Error;

use crate::{Kind, Point};

/// Input rejected at the boundary of the core. Numeric edge cases inside the
/// evaluator are never errors; they produce sentinel values instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} {index} is not a finite complex number: {value}")]
    NonFinitePoint { kind: Kind, index: usize, value: Point },

    #[error("pointer position {0} is not finite")]
    NonFinitePosition(Point),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, Error>;
