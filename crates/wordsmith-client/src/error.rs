use std::fmt;
use std::io;

use wordsmith_platformer::level::LevelError;

/// Failures that stop the client.
#[derive(Debug)]
pub enum ClientError {
    /// The level cannot host a session.
    Level(LevelError),
    /// Terminal setup, drawing or input failed.
    Terminal(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(e) => write!(f, "invalid level: {e}"),
            Self::Terminal(e) => write!(f, "terminal error: {e}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Level(e) => Some(e),
            Self::Terminal(e) => Some(e),
        }
    }
}

impl From<LevelError> for ClientError {
    fn from(e: LevelError) -> Self {
        Self::Level(e)
    }
}

impl From<io::Error> for ClientError {
    fn from(e: io::Error) -> Self {
        Self::Terminal(e)
    }
}
