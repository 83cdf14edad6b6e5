//! Error types for huffpack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    #[error("invalid magic number: {}", describe_magic(.found))]
    InvalidMagic { found: Option<u32> },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("compressed stream truncated after {decoded} bytes, end-of-stream code not found")]
    TruncatedStream { decoded: u64 },

    #[error("symbol {0} has no code in the code table")]
    UnencodableSymbol(u16),

    #[error("input changed while compressing: counted {counted} bytes, encoded {encoded}")]
    InputChanged { counted: u64, encoded: u64 },

    #[error("input too large: {size} bytes exceeds limit of {limit}")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HuffError>;

fn describe_magic(found: &Option<u32>) -> String {
    match found {
        Some(v) => format!("{v:#010x}"),
        None => "missing".to_string(),
    }
}
