//! The two forwarding loops that run over an established connection.
//!
//! Both loops pass bytes through untouched. The receive loop hands chunks to
//! the output as they arrive, so a line typed on one side may show up on the
//! other side split across several reads.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt,
};
use tracing::{debug, info};

use crate::error::TransferError;

/// Largest chunk the receive loop reads from the peer at once.
pub const CHUNK_SIZE: usize = 1024;

/// Terminal state of a forwarding loop.
#[derive(Debug)]
pub enum LoopExit {
    /// The peer sent end-of-stream.
    ClosedByPeer,
    /// Local input ran out and the write half was shut down.
    ClosedLocally,
    Failed(TransferError),
}

/// Copies chunks from the peer to `output` until end-of-stream or an error.
pub async fn receive_loop<R, W>(mut reader: R, mut output: W, chunk_size: usize) -> LoopExit
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; chunk_size.max(1)];
    loop {
        let read = match reader.read(&mut buffer).await {
            Ok(0) => {
                info!("connection closed by the other side");
                return LoopExit::ClosedByPeer;
            }
            Ok(read) => read,
            Err(err) => return LoopExit::Failed(TransferError::Receive(err)),
        };
        debug!(bytes = read, "received chunk");

        if let Err(err) = write_chunk(&mut output, &buffer[..read]).await {
            return LoopExit::Failed(TransferError::Output(err));
        }
    }
}

async fn write_chunk<W>(output: &mut W, chunk: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(chunk).await?;
    output.flush().await
}

/// Sends `input` to the peer one line at a time. On end of input the write
/// half is shut down so the peer observes end-of-stream.
pub async fn send_loop<R, W>(mut input: R, mut writer: W) -> LoopExit
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        match input.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => return LoopExit::Failed(TransferError::Input(err)),
        }

        if let Err(err) = writer.write_all(&line).await {
            return LoopExit::Failed(TransferError::Send(err));
        }
        debug!(bytes = line.len(), "sent line");
    }

    if let Err(err) = writer.shutdown().await {
        return LoopExit::Failed(TransferError::Send(err));
    }
    drop(writer);
    info!("input closed, connection shut down");

    LoopExit::ClosedLocally
}
