//! Infrastructure error type.

use std::fmt;
use std::net::SocketAddr;

/// The error type returned by the server's fallible operations.
///
/// Application-level failures (unknown contact, malformed body) become HTTP
/// responses through [`ApiError`](crate::api::ApiError), never an `Error`.
/// This type only covers getting a listening socket.
#[derive(Debug)]
pub enum Error {
    /// The configured address could not be bound.
    Bind { addr: SocketAddr, source: std::io::Error },
    /// Any other socket failure, e.g. adopting a pre-bound listener.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "cannot bind {addr}: {source}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } => Some(source),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
