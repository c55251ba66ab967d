use std::{io, net::SocketAddr};

/// Failures while setting up the single connection. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("failed to listen on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept a connection: {source}")]
    Accept {
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("{host}:{port} did not resolve to any address")]
    NoAddress { host: String, port: u16 },

    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Failures in the middle of a session. Each one ends only the loop it
/// happened in.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("error receiving message: {0}")]
    Receive(#[source] io::Error),

    #[error("error writing received message: {0}")]
    Output(#[source] io::Error),

    #[error("error reading input: {0}")]
    Input(#[source] io::Error),

    #[error("error sending message: {0}")]
    Send(#[source] io::Error),
}
