/// A simulation parameter violated one of the input invariants.
///
/// Returned before any month is simulated; offending values are never clamped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid input: {field} {message}")]
pub struct InvalidInputError {
    pub field: &'static str,
    pub message: String,
}

impl InvalidInputError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
