use thiserror::Error;

/// An error produced by compiling or running Peach source.
///
/// The payload is the fully formatted diagnostic text: compile errors are
/// one `[line N] Error at 'token': message` line per reported error,
/// runtime errors are the message followed by a stack trace. Hosts print
/// the error verbatim to stderr.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Compile(String),

    #[error("{0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, Error>;
