//! Error types shared by the native loader and the node API

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FastNoiseError>;

#[derive(Debug, Error)]
pub enum FastNoiseError {
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("FastNoise native library not found, tried: {tried}")]
    LibraryNotFound { tried: String },

    #[error("Unable to load FastNoise native library {}: {source}", path.display())]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("FastNoise native symbol {name} is missing")]
    MissingSymbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("FastNoise library unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to find metadata name: {0}")]
    UnknownNode(String),

    #[error("Failed to find member name: {0}")]
    UnknownMember(String),

    #[error("Failed to find enum value: {0}")]
    UnknownEnumValue(String),

    #[error("{member} cannot be set to {expected}")]
    TypeMismatch { member: String, expected: &'static str },

    /// 原生调用返回了 false 或者 null
    #[error("{0}")]
    NativeCall(&'static str),

    #[error("Encoded node tree could not be decoded: {0}")]
    InvalidNodeTree(String),

    #[error("Output buffer too small: required {required}, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Node lookup belongs to a different FastNoise library instance")]
    LibraryMismatch,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] serde_json::Error),
}

impl FastNoiseError {
    /// 调用方传错了参数（而不是原生库出了问题）
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            FastNoiseError::UnknownNode(_)
                | FastNoiseError::UnknownMember(_)
                | FastNoiseError::UnknownEnumValue(_)
                | FastNoiseError::TypeMismatch { .. }
                | FastNoiseError::InvalidArgument(_)
                | FastNoiseError::InvalidNodeTree(_)
                | FastNoiseError::LibraryMismatch
        )
    }
}
