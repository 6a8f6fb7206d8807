use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SandboxError {
    #[error("no script sandbox is available")]
    Unavailable,
    #[error("script failed: {0}")]
    Failed(String),
}

/// External collaborator that evaluates scripted code blocks in isolation
/// and returns markup to show in their place.
pub trait ScriptSandbox {
    fn evaluate(&self, payload: &str) -> Result<String, SandboxError>;
}

/// The default sandbox: evaluates nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSandbox;

impl ScriptSandbox for NoSandbox {
    fn evaluate(&self, _payload: &str) -> Result<String, SandboxError> {
        Err(SandboxError::Unavailable)
    }
}
