use thiserror::Error;

/// Failures surfaced by network construction, routing and export.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("the network is not fully connected")]
    NotConnected,
    #[error("could not find a connected network after {0} tries")]
    CouldNotConstruct(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
