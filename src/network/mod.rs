//! Network layer - fetch dispatch and HTTP execution
//!
//! The fetch manager accepts one request at a time and runs it on a worker
//! thread through a [`Transport`]; the render loop polls it for the result.

pub mod client;
pub mod fetch;

pub use client::{FetchError, HttpReply, HttpTransport, Transport, TransportInitError};
pub use fetch::{FetchManager, StartError};
