//! Common error types for network operations

use core::fmt;

/// A common error type for network and protocol operations.
///
/// This enum defines the errors that can surface from the transport and from
/// the MQTT-SN engine. It is designed to be simple and portable for `no_std`
/// environments: every variant is `Copy` and carries at most one byte of
/// context.
///
/// Protocol noise such as stale acknowledgements is never reported through
/// this type; the engine logs and drops it instead.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// The transport accepted zero bytes of a pending write.
    ConnectionClosed,
    /// The encoded message does not fit the frame budget or output buffer.
    BufferOverflow,
    /// The declared frame length is inconsistent with the bytes supplied.
    MalformedFrame,
    /// The type tag at offset 1 is not a known message type.
    UnknownMessageType(u8),
    /// A field carries a value the protocol does not define.
    ProtocolError,
    /// The client options failed validation or could not be parsed.
    InvalidConfig,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WriteError => write!(f, "write error"),
            Error::ReadError => write!(f, "read error"),
            Error::ConnectionClosed => write!(f, "connection closed"),
            Error::BufferOverflow => write!(f, "message exceeds frame budget"),
            Error::MalformedFrame => write!(f, "malformed frame"),
            Error::UnknownMessageType(t) => write!(f, "unknown message type: 0x{:02x}", t),
            Error::ProtocolError => write!(f, "protocol error"),
            Error::InvalidConfig => write!(f, "invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::MalformedFrame => defmt::write!(f, "MalformedFrame"),
            Error::UnknownMessageType(t) => defmt::write!(f, "UnknownMessageType({=u8:#x})", t),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
            Error::InvalidConfig => defmt::write!(f, "InvalidConfig"),
        }
    }
}
