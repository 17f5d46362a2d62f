use thiserror::Error;

/// Failure reported by an external collaborator (music player, file manager,
/// page host). The keyboard core never propagates these; they end up as
/// error notifications.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("{0} is not available")]
    Unavailable(String),
    #[error("{0}")]
    Failed(String),
}

impl CapabilityError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key name")]
    Empty,
    #[error("unknown key name: {0:?}")]
    Unknown(String),
}
