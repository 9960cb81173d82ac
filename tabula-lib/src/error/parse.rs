//! Parse error types

/// Errors raised when parsing textual grid configuration, such as the
/// `column:direction` and `column:operator:value` forms the CLI accepts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Column type name not recognized.
    #[error("unknown column type: {0}")]
    UnknownColumnType(String),

    /// Filter operator name not recognized.
    #[error("unknown filter operator: {0}")]
    UnknownOperator(String),

    /// Sort direction not recognized.
    #[error("unknown sort direction: {0}")]
    UnknownDirection(String),

    /// Input did not have the expected shape.
    #[error("invalid {what}: {input:?}")]
    Malformed {
        /// What was being parsed.
        what: &'static str,
        /// The offending input.
        input: String,
    },
}

impl ParseError {
    /// Creates a malformed-input error.
    pub fn malformed(what: &'static str, input: impl Into<String>) -> Self {
        Self::Malformed {
            what,
            input: input.into(),
        }
    }
}
