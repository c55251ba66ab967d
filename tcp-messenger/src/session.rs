//! Runs both forwarding loops over one connection and decides how the run
//! ends.
//!
//! The receive loop runs as a spawned task; the send loop runs on the task
//! that calls [`Session::run`]. Whichever finishes first settles the outcome:
//!
//! - the peer closing its side ends the session right away, even while the
//!   send loop is still waiting for input;
//! - local input running out half-closes the connection and the receive task
//!   is cancelled;
//! - a failed receive loop is logged and the send loop keeps going. A failed
//!   send loop ends the session.

use std::net::SocketAddr;

use tokio::{
    io::{AsyncRead, AsyncWrite, BufReader},
    net::tcp::{OwnedReadHalf, OwnedWriteHalf},
    select,
};
use tracing::warn;

use crate::{
    connector::Connection,
    forwarder::{CHUNK_SIZE, LoopExit, receive_loop, send_loop},
};

pub struct Session {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
    peer: SocketAddr,
    chunk_size: usize,
}

impl Session {
    pub fn new(connection: Connection) -> Self {
        let peer = connection.peer_addr();
        let (reader, writer) = connection.into_split();
        Self {
            reader,
            writer,
            peer,
            chunk_size: CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Forwards `input` to the peer and the peer's bytes to `output` until one
    /// of the loops ends the session. Returns how it ended.
    pub async fn run<I, O>(self, input: I, output: O) -> LoopExit
    where
        I: AsyncRead + Unpin,
        O: AsyncWrite + Unpin + Send + 'static,
    {
        let Session {
            reader,
            writer,
            peer,
            chunk_size,
        } = self;

        drive(reader, writer, input, output, chunk_size, peer).await
    }
}

async fn drive<R, W, I, O>(
    reader: R,
    writer: W,
    input: I,
    output: O,
    chunk_size: usize,
    peer: SocketAddr,
) -> LoopExit
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin + Send + 'static,
{
    let mut receiver = tokio::spawn(receive_loop(reader, output, chunk_size));
    let mut receiver_running = true;

    let sender = send_loop(BufReader::new(input), writer);
    tokio::pin!(sender);

    let exit = loop {
        select! {
            exit = &mut sender => {
                if let LoopExit::Failed(err) = &exit {
                    warn!(%peer, "{err}");
                }
                break exit;
            }
            joined = &mut receiver, if receiver_running => {
                receiver_running = false;
                match joined {
                    Ok(LoopExit::Failed(err)) => warn!(%peer, "{err}"),
                    Ok(exit) => break exit,
                    Err(err) => warn!(%peer, error = ?err, "receive task stopped"),
                }
            }
        }
    };

    if receiver_running {
        receiver.abort();
    }
    exit
}
