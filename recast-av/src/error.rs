/// Status text reported by the media engine for one failed operation.
///
/// Carried by value on the failure result; never process-wide state.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct EngineError(String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Prefix the status text with the operation that failed.
    pub fn context(self, operation: &str) -> Self {
        Self(format!("{}: {}", operation, self.0))
    }
}
