//! A network abstraction layer for embedded systems
//!
//! This module provides the small set of traits the MQTT-SN engine needs from
//! a byte transport. A UART, a radio modem bridge or a TCP socket on a host
//! can all drive the engine once they implement [`Connection`].
//!
//! The engine only ever asks four things of a link: how many bytes are
//! waiting, read some of them, write a buffer, and flush.

#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Application layer protocol implementations
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Available, Connection, Read, Write};
}

/// Byte source half of a duplex stream.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection.
    ///
    /// Returns the number of bytes copied into `buf`, which may be zero when
    /// nothing is buffered.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Byte sink half of a duplex stream.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Non-blocking check for buffered inbound bytes.
pub trait Available {
    /// Number of bytes that can be read right now without blocking.
    fn available(&mut self) -> usize;
}

/// A synchronous, half-duplex byte stream usable by the MQTT-SN client.
pub trait Connection: Read + Write + Available {}
