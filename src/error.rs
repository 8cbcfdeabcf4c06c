use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Fatal failures surfaced across the engine boundary.
///
/// Recoverable conditions (a missing redirect target, a dangling
/// `incoming` reference, a persistence file that fails to load) are never
/// represented here — they are absorbed internally as logged counters.
#[derive(Debug)]
pub enum EngineError {
    /// I/O failure while writing or reading a persisted snapshot.
    Io(std::io::Error),
    /// A persisted file decoded to bytes that don't form a valid snapshot.
    Decode(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io(err) => write!(f, "i/o failure: {}", err),
            EngineError::Decode(msg) => write!(f, "malformed persisted payload: {}", msg),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineError::Io(err) => Some(err),
            EngineError::Decode(_) => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err)
    }
}

impl From<Box<bincode::ErrorKind>> for EngineError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        EngineError::Decode(err.to_string())
    }
}
