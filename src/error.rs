use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JitterError {
    #[error("invalid parameter {name} = {value}: {constraint}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        constraint: &'static str,
    },
    #[error("unsupported audio format: {channels} channels (expected 1 or 2)")]
    UnsupportedFormat { channels: usize },
    #[error("unsupported interpolation method: {0}")]
    UnsupportedMethod(String),
    #[error("unknown hardware preset: {0} (expected high-end-dac, consumer-grade or vintage-gear)")]
    UnknownPreset(String),
    #[error("degenerate input: {len} samples (at least 2 required)")]
    DegenerateInput { len: usize },
    #[error("{context} length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("nominal times must be strictly increasing (violated at index {index})")]
    UnsortedTimes { index: usize },
}

pub type Result<T> = std::result::Result<T, JitterError>;

pub(crate) fn ensure_len(context: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        return Ok(());
    }

    Err(JitterError::LengthMismatch {
        context,
        expected,
        got,
    })
}
