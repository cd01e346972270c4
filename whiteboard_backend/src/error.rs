use std::{io, net::AddrParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to bind listener: {0}")]
    Bind(#[source] io::Error),

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
