//! # libmqttsn - MQTT-SN client for constrained devices
//!
//! A `no_std` MQTT-SN v1.2 client engine. It lets a microcontroller publish
//! and subscribe through an MQTT-SN gateway over any byte link: a UART, a
//! radio modem bridge, or a socket on a host.
//!
//! ## Features
//!
//! ### Protocol Engine
//! - **Wire codec** for every MQTT-SN message type, big-endian, bounded by a
//!   66-byte frame budget
//! - **Topic table** mapping names to gateway-assigned ids
//! - **Retry state machine** with a single outstanding request
//! - **Dispatcher** routing gateway traffic to application callbacks
//!
//! ### System Utilities
//! - A millisecond [`Clock`](system::clock::Clock) abstraction
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libmqttsn = "0.1.0"
//! ```
//!
//! ### Basic Client Example
//!
//! ```rust,no_run
//! use libmqttsn::network::application::mqttsn::{Client, NoopHandler, Options, QoS};
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
//! let options = Options { client_id: "my_device", ..Options::default() };
//! let mut client = Client::new(Uart, Ticks, NoopHandler, &options).unwrap();
//!
//! client.connect().unwrap();
//! // Poll until the CONNACK arrives, then register and publish:
//! // client.register_topic("sensors/temperature")?;
//! // client.publish(topic_id, b"23.5", QoS::AtMostOnce)?;
//! # let _ = QoS::AtMostOnce;
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based gateways and test hosts
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: `std::error::Error` for the error type and a wall-clock `SystemClock`
//! - `defmt`: `defmt::Format` for public enums and the error type

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Network abstraction layer and the MQTT-SN protocol engine.
///
/// Contains the transport traits a link must implement and the
/// application layer client built on them.
pub mod network;

/// System utilities for embedded devices.
///
/// Contains the time source the engine uses for retries and frame timeouts.
pub mod system;
