//! Establishes the one TCP connection a run works with.
//!
//! A listener binds, accepts a single peer and then drops its listening
//! socket. An initiator resolves the target and dials it. Neither side
//! retries or times out.

use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::{
    TcpListener, TcpSocket, TcpStream,
    tcp::{OwnedReadHalf, OwnedWriteHalf},
};
use tracing::{debug, info};

use crate::error::ConnectionError;

/// Host dialed when the initiator is not given an address.
pub const DEFAULT_ADDRESS: &str = "localhost";

/// Which side of the connection this process plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Bind `port` on every interface and wait for one peer.
    Listener { port: u16 },
    /// Dial `address:port`.
    Initiator { address: String, port: u16 },
}

/// The single bidirectional byte stream shared by both forwarding loops.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection {
    fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Splits into independently owned read and write halves.
    pub fn into_split(self) -> (OwnedReadHalf, OwnedWriteHalf) {
        self.stream.into_split()
    }
}

pub async fn establish(role: &Role) -> Result<Connection, ConnectionError> {
    match role {
        Role::Listener { port } => bind(*port)?.accept().await,
        Role::Initiator { address, port } => dial(address, *port).await,
    }
}

/// A listening socket that hands out exactly one connection.
#[derive(Debug)]
pub struct OneShotListener {
    listener: TcpListener,
    port: u16,
}

/// Binds the wildcard address on `port` with address reuse enabled and a
/// backlog of one. Port 0 asks the OS for a free port.
pub fn bind(port: u16) -> Result<OneShotListener, ConnectionError> {
    let to_bind_error = |source| ConnectionError::Bind { port, source };

    let socket = TcpSocket::new_v4().map_err(to_bind_error)?;
    socket.set_reuseaddr(true).map_err(to_bind_error)?;
    socket
        .bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
        .map_err(to_bind_error)?;
    let listener = socket.listen(1).map_err(to_bind_error)?;

    let port = listener.local_addr().map_err(to_bind_error)?.port();
    info!("listening on port {port}");

    Ok(OneShotListener { listener, port })
}

impl OneShotListener {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for one peer, then closes the listening socket.
    pub async fn accept(self) -> Result<Connection, ConnectionError> {
        let OneShotListener { listener, port } = self;
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|source| ConnectionError::Accept { source })?;
        info!("connection established with {peer}");

        drop(listener);
        debug!(port, "stopped listening");

        Ok(Connection::new(stream, peer))
    }
}

/// Resolves `address:port` and connects to the first address that answers.
pub async fn dial(address: &str, port: u16) -> Result<Connection, ConnectionError> {
    let targets: Vec<SocketAddr> = tokio::net::lookup_host((address, port))
        .await
        .map_err(|source| ConnectionError::Resolve {
            host: address.to_string(),
            port,
            source,
        })?
        .collect();

    let mut last_error = None;
    for target in targets {
        debug!(%target, "connecting");
        match TcpStream::connect(target).await {
            Ok(stream) => {
                let peer = stream.peer_addr().unwrap_or(target);
                info!("connected to {peer}");
                return Ok(Connection::new(stream, peer));
            }
            Err(source) => last_error = Some(ConnectionError::Connect { target, source }),
        }
    }

    Err(last_error.unwrap_or_else(|| ConnectionError::NoAddress {
        host: address.to_string(),
        port,
    }))
}
