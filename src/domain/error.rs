// Error taxonomy shared by the parser, the merge store and the session
use super::value::Kind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or truncated binary snapshot. `offset` is where decoding stopped.
    #[error("parse error at byte {offset}: {reason}")]
    Parse { offset: usize, reason: String },

    /// Malformed XML fragment.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: Kind, actual: Kind },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Transport failure; the caller decides whether to retry.
    #[error("connection error: {0}")]
    Connection(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl Error {
    pub fn parse(offset: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            offset,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = Error::parse(12, "unexpected end of buffer");
        assert_eq!(error.to_string(), "parse error at byte 12: unexpected end of buffer");

        let error = Error::TypeMismatch {
            expected: Kind::Number,
            actual: Kind::Text,
        };
        assert_eq!(error.to_string(), "type mismatch: expected number, got text");
    }
}
