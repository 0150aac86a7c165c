//! Buffer error type.

/// Errors from buffer operations.
///
/// Offsets are only ever rejected, never silently clamped: a rejected call
/// leaves the buffer, caret, selection and history untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// An offset (or range end) lies outside `[0, len]`, or a range starts
    /// after it ends.
    OutOfRange {
        /// The rejected offset.
        offset: usize,
        /// Buffer length in characters at the time of the call.
        len: usize,
    },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { offset, len } => {
                write!(f, "offset {offset} out of range for buffer of length {len}")
            }
        }
    }
}

impl std::error::Error for BufferError {}

/// Convenience alias for buffer results.
pub type Result<T> = std::result::Result<T, BufferError>;
