//! Bidirectional text messaging over a single TCP connection.
//!
//! One process listens for exactly one peer, the other dials it. Once
//! connected, both sides copy standard input to the peer and the peer's bytes
//! to standard output until either side closes.
//!
//! - [`cli`] parses `[-l] <port> [<address>]` into a [`connector::Role`].
//! - [`connector`] binds and accepts once, or resolves and dials.
//! - [`forwarder`] holds the receive and send loops. Bytes pass through
//!   unframed.
//! - [`session`] runs both loops over one connection and reports how the run
//!   ended.
//! - [`error`] defines the connection and transfer error kinds.

pub mod cli;
pub mod connector;
pub mod error;
pub mod forwarder;
pub mod session;

pub use connector::{Connection, Role, establish};
pub use error::{ConnectionError, TransferError};
pub use forwarder::LoopExit;
pub use session::Session;
