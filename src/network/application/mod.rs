//! # Application Layer Network Protocols
//!
//! This module contains the application layer (OSI Layer 7) protocol spoken
//! over the byte links described by the core network traits.
//!
//! ## Available Protocols
//!
//! - **[`mqttsn`]**: MQTT-SN v1.2 client for publish-subscribe messaging
//!   through a gateway on serial and radio links
//!
//! ## Design Principles
//!
//! - **Connection Agnostic**: Work with any type implementing [`Connection`](crate::network::Connection)
//! - **No-std Compatible**: No heap allocation, fixed-size buffers throughout
//! - **Poll Driven**: The caller owns the loop; nothing blocks waiting for the gateway
//!
//! ## Usage Pattern
//!
//! 1. Create a connection using your transport layer
//! 2. Wrap it with the protocol client, a clock and a handler
//! 3. Issue commands and call `poll` from the main loop
//!
//! ```rust,no_run
//! use libmqttsn::network::application::mqttsn::{Client, NoopHandler, Options};
//! use libmqttsn::system::clock::Clock;
//! # use libmqttsn::network::Connection;
//! # struct Uart;
//! # impl Connection for Uart {}
//! # impl libmqttsn::network::Read for Uart {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl libmqttsn::network::Write for Uart {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl libmqttsn::network::Available for Uart {
//! #     fn available(&mut self) -> usize { 0 }
//! # }
//! # struct Ticks;
//! # impl Clock for Ticks { fn now_millis(&self) -> u32 { 0 } }
//!
//! let options = Options { client_id: "sensor-7", ..Options::default() };
//! let mut client = Client::new(Uart, Ticks, NoopHandler, &options).unwrap();
//! client.connect().unwrap();
//! loop {
//!     client.poll().unwrap();
//! #   break;
//! }
//! ```

/// MQTT-SN client implementation.
///
/// Provides the codec, topic registry, retry tracking and the polled client
/// that ties them to a [`Connection`](crate::network::Connection).
pub mod mqttsn;
