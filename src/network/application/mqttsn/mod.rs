//! MQTT-SN v1.2 protocol implementation for embedded systems.
//!
//! MQTT-SN is the sensor-network variant of MQTT. A client never talks to the
//! broker directly: it exchanges small binary frames with a gateway over
//! whatever link is at hand (UART, ZigBee, LoRa) and the gateway bridges to
//! MQTT. Topic names are swapped for two-byte ids to keep frames short.
//!
//! # Frame layout
//!
//! ```text
//! +--------+------+----------------------+
//! | length | type | message fields ...   |
//! +--------+------+----------------------+
//!    1 B     1 B    length - 2 bytes
//! ```
//!
//! Multi-byte integers are big-endian. No frame ever exceeds
//! [`MAX_FRAME_SIZE`] bytes.
//!
//! # Flow
//!
//! The [`Client`] allows a single outstanding request. A command that expects
//! an acknowledgement records the awaited type and a copy of the frame; if the
//! acknowledgement does not arrive within the retry interval the frame is
//! sent again, and after the last retry the client reports a timeout through
//! [`Handler::on_disconnect`].
//!
//! Unsolicited traffic from the gateway (PUBLISH, REGISTER, PINGREQ, ...) is
//! always processed, whatever the client is waiting for.
//!
//! ```rust,no_run
//! use libmqttsn::network::application::mqttsn::{Client, Flags, Handler, Options, QoS};
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
//! struct Printer;
//!
//! impl Handler for Printer {
//!     fn on_publish(&mut self, topic_id: u16, topic: Option<&str>, _flags: Flags, data: &[u8]) {
//!         let _ = (topic_id, topic, data);
//!     }
//! }
//!
//! let options = Options { client_id: "sensor-7", ..Options::default() };
//! let mut client = Client::new(Uart, Ticks, Printer, &options).unwrap();
//!
//! client.connect().unwrap();
//! // ... poll until on_connack fires, then:
//! // client.register_topic("sensors/temp")?;
//! // client.publish(topic_id, b"21.5", QoS::AtLeastOnce)?;
//! # let _ = QoS::AtMostOnce;
//! ```

mod client;
pub mod codec;
pub mod frame;
mod handler;
mod options;
pub mod pending;
pub mod topic;
mod types;

pub use client::Client;
pub use codec::{Message, TopicRef};
pub use handler::{DisconnectReason, Handler, NoopHandler};
pub use options::Options;
pub use topic::{Topic, TopicTable};
pub use types::*;
