//! Poll-driven MQTT-SN client.
//!
//! The [`Client`] owns the connection, a clock and the application's
//! [`Handler`]. Commands encode one frame into the send buffer and write it
//! out immediately; commands that expect an acknowledgement also arm the
//! response wait state. Inbound traffic and retries are processed by
//! [`Client::poll`], which the application calls from its main loop.

use heapless::String;

use super::codec::{self, Message, TopicRef};
use super::frame::FrameReader;
use super::handler::{DisconnectReason, Handler};
use super::options::Options;
use super::pending::{ResponseWait, RetryAction, WaitState};
use super::topic::{MAX_TOPIC_NAME_LEN, TopicTable};
use super::types::{
    Flags, INVALID_TOPIC_ID, MAX_CLIENT_ID_LEN, MAX_FRAME_SIZE, MsgType, PROTOCOL_ID, QoS,
    ReturnCode, TopicIdType,
};
use crate::network::Connection;
use crate::network::error::Error;
use crate::system::clock::Clock;

/// Topic request whose acknowledgement updates the topic table.
#[derive(Debug, Clone)]
enum PendingTopic {
    /// REGISTER for the tentative entry at `slot`.
    Register { slot: usize },
    /// SUBSCRIBE by name; the SUBACK carries the id.
    Subscribe { name: String<MAX_TOPIC_NAME_LEN> },
}

/// An MQTT-SN client bound to one gateway link.
///
/// # Type Parameters
///
/// * `C` - The link, implementing [`Connection`]
/// * `K` - The time source, implementing [`Clock`]
/// * `H` - Application callbacks, implementing [`Handler`]
///
/// # Examples
///
/// ```rust,no_run
/// use libmqttsn::network::application::mqttsn::{Client, Handler, Options, QoS, ReturnCode};
/// use libmqttsn::system::clock::Clock;
/// # use libmqttsn::network::Connection;
/// # struct Uart;
/// # impl Connection for Uart {}
/// # impl libmqttsn::network::Read for Uart {
/// #     type Error = ();
/// #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
/// # }
/// # impl libmqttsn::network::Write for Uart {
/// #     type Error = ();
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
/// #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl libmqttsn::network::Available for Uart {
/// #     fn available(&mut self) -> usize { 0 }
/// # }
/// # struct Ticks;
/// # impl Clock for Ticks { fn now_millis(&self) -> u32 { 0 } }
///
/// #[derive(Default)]
/// struct App {
///     connected: bool,
/// }
///
/// impl Handler for App {
///     fn on_connack(&mut self, return_code: ReturnCode) {
///         self.connected = return_code.is_accepted();
///     }
/// }
///
/// let options = Options { client_id: "weather_station", ..Options::default() };
/// let mut client = Client::new(Uart, Ticks, App::default(), &options).unwrap();
///
/// client.connect().unwrap();
/// while !client.handler().connected && !client.is_timeout() {
///     client.poll().unwrap();
/// }
/// if client.register_topic("weather/rain").unwrap() {
///     // poll until on_regack, then publish with the assigned id
/// }
/// # let _ = QoS::AtMostOnce;
/// ```
#[derive(Debug)]
pub struct Client<C: Connection, K: Clock, H: Handler> {
    connection: C,
    clock: K,
    handler: H,
    topics: TopicTable,
    wait: ResponseWait,
    reader: FrameReader,
    send_buffer: [u8; MAX_FRAME_SIZE],
    message_id: u16,
    pending_topic: Option<PendingTopic>,
    gateway_id: Option<u8>,
    client_id: String<MAX_CLIENT_ID_LEN>,
    keep_alive_seconds: u16,
    connect_flags: Flags,
}

impl<C: Connection, K: Clock, H: Handler> Client<C, K, H> {
    /// Build a client. Nothing is sent until a command is issued.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidConfig`] - `options` failed [`Options::validate`]
    pub fn new(connection: C, clock: K, handler: H, options: &Options<'_>) -> Result<Self, Error> {
        options.validate()?;
        let mut client_id = String::new();
        client_id
            .push_str(options.client_id)
            .map_err(|_| Error::InvalidConfig)?;

        Ok(Self {
            connection,
            clock,
            handler,
            topics: TopicTable::new(),
            wait: ResponseWait::new(options.retry_interval_ms, options.max_retries),
            reader: FrameReader::new(options.frame_timeout_ms),
            send_buffer: [0u8; MAX_FRAME_SIZE],
            message_id: 0,
            pending_topic: None,
            gateway_id: None,
            client_id,
            keep_alive_seconds: options.keep_alive_seconds,
            connect_flags: options.connect_flags(),
        })
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Broadcast SEARCHGW and wait for GWINFO.
    pub fn search_gateway(&mut self, radius: u8) -> Result<(), Error> {
        self.send(&Message::SearchGw { radius }, true)
    }

    /// Send CONNECT and wait for CONNACK.
    pub fn connect(&mut self) -> Result<(), Error> {
        let client_id = self.client_id.clone();
        let message = Message::Connect {
            flags: self.connect_flags,
            protocol_id: PROTOCOL_ID,
            duration: self.keep_alive_seconds,
            client_id: client_id.as_bytes(),
        };
        self.send(&message, true)
    }

    /// Answer WILLTOPICREQ. `None` sends the empty form that clears the will.
    pub fn will_topic(&mut self, topic: Option<&str>, qos: QoS, retain: bool) -> Result<(), Error> {
        let (flags, topic) = will_fields(topic, qos, retain, MsgType::WillTopic);
        self.send(&Message::WillTopic { flags, topic }, false)
    }

    /// Answer WILLMSGREQ.
    pub fn will_msg(&mut self, message: &[u8]) -> Result<(), Error> {
        if message.len() > codec::max_payload(MsgType::WillMsg) {
            return Err(Error::BufferOverflow);
        }
        self.send(&Message::WillMsg { message }, false)
    }

    /// Change the will topic and wait for WILLTOPICRESP.
    pub fn update_will_topic(
        &mut self,
        topic: Option<&str>,
        qos: QoS,
        retain: bool,
    ) -> Result<(), Error> {
        let (flags, topic) = will_fields(topic, qos, retain, MsgType::WillTopicUpd);
        self.send(&Message::WillTopicUpd { flags, topic }, true)
    }

    /// Change the will message and wait for WILLMSGRESP.
    pub fn update_will_msg(&mut self, message: &[u8]) -> Result<(), Error> {
        if message.len() > codec::max_payload(MsgType::WillMsgUpd) {
            return Err(Error::BufferOverflow);
        }
        self.send(&Message::WillMsgUpd { message }, true)
    }

    /// Ask the gateway for a topic id.
    ///
    /// A tentative entry with id `0` is added to the topic table before the
    /// REGISTER goes out; the matching REGACK fills in the id. Names that do
    /// not fit the frame are truncated.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - REGISTER sent, REGACK awaited
    /// * `Ok(false)` - Another request is outstanding, or the table is full;
    ///   nothing was sent
    /// * `Err(error)` - The link failed
    pub fn register_topic(&mut self, name: &str) -> Result<bool, Error> {
        if !self.wait.is_idle() {
            log::debug!("register refused, awaiting {:?}", self.wait.state());
            return Ok(false);
        }

        let name = codec::fit_text(name, MsgType::Register);
        if self.topics.is_full() && self.topics.position(name).is_none() {
            log::warn!("register refused, topic table full");
            return Ok(false);
        }

        let message_id = self.next_message_id();
        let Some(slot) = self.topics.upsert(name, 0) else {
            return Ok(false);
        };
        let message = Message::Register {
            topic_id: 0,
            message_id,
            topic_name: name.as_bytes(),
        };
        self.send(&message, true)?;
        self.pending_topic = Some(PendingTopic::Register { slot });
        Ok(true)
    }

    /// Publish `data` on a registered or predefined topic.
    ///
    /// [`QoS::NoSession`] marks `topic_id` as predefined. Only QoS 1 waits for
    /// PUBACK.
    ///
    /// # Errors
    ///
    /// * [`Error::BufferOverflow`] - `data` does not fit one frame
    /// * [`Error::WriteError`] - The link failed
    pub fn publish(&mut self, topic_id: u16, data: &[u8], qos: QoS) -> Result<(), Error> {
        let kind = match qos {
            QoS::NoSession => TopicIdType::Predefined,
            _ => TopicIdType::Normal,
        };
        self.publish_with_flags(topic_id, data, Flags::new().with_qos(qos).with_topic_id_type(kind))
    }

    /// Publish with an explicit flags byte (RETAIN, topic id type, QoS).
    pub fn publish_with_flags(&mut self, topic_id: u16, data: &[u8], flags: Flags) -> Result<(), Error> {
        if data.len() > codec::max_payload(MsgType::Publish) {
            return Err(Error::BufferOverflow);
        }
        let message_id = self.next_message_id();
        let message = Message::Publish {
            flags,
            topic_id,
            message_id,
            data,
        };
        self.send(&message, flags.qos() == QoS::AtLeastOnce)
    }

    /// Subscribe to a topic name or filter and wait for SUBACK.
    ///
    /// An accepted SUBACK with a topic id records the name in the topic
    /// table; wildcard filters come back with id `0` and are not recorded.
    /// Names are truncated to what the topic table can hold.
    pub fn subscribe_by_name(&mut self, name: &str, qos: QoS) -> Result<(), Error> {
        let name = codec::fit_text(name, MsgType::Register);
        let message_id = self.next_message_id();
        let message = Message::Subscribe {
            flags: Flags::new()
                .with_qos(qos)
                .with_topic_id_type(TopicIdType::Normal),
            message_id,
            topic: TopicRef::Name(name.as_bytes()),
        };
        self.send(&message, true)?;

        let mut stored = String::new();
        let _ = stored.push_str(name);
        self.pending_topic = Some(PendingTopic::Subscribe { name: stored });
        Ok(())
    }

    /// Subscribe to a predefined topic id and wait for SUBACK.
    pub fn subscribe_by_id(&mut self, topic_id: u16, qos: QoS) -> Result<(), Error> {
        let message_id = self.next_message_id();
        let message = Message::Subscribe {
            flags: Flags::new()
                .with_qos(qos)
                .with_topic_id_type(TopicIdType::Predefined),
            message_id,
            topic: TopicRef::Id(topic_id),
        };
        self.send(&message, true)
    }

    /// Unsubscribe from a topic name and wait for UNSUBACK.
    pub fn unsubscribe_by_name(&mut self, name: &str) -> Result<(), Error> {
        let name = codec::fit_text(name, MsgType::Unsubscribe);
        let message_id = self.next_message_id();
        let message = Message::Unsubscribe {
            flags: Flags::new().with_topic_id_type(TopicIdType::Normal),
            message_id,
            topic: TopicRef::Name(name.as_bytes()),
        };
        self.send(&message, true)
    }

    /// Unsubscribe from a predefined topic id and wait for UNSUBACK.
    pub fn unsubscribe_by_id(&mut self, topic_id: u16) -> Result<(), Error> {
        let message_id = self.next_message_id();
        let message = Message::Unsubscribe {
            flags: Flags::new().with_topic_id_type(TopicIdType::Predefined),
            message_id,
            topic: TopicRef::Id(topic_id),
        };
        self.send(&message, true)
    }

    /// Send PINGREQ carrying the client id and wait for PINGRESP.
    pub fn ping_req(&mut self) -> Result<(), Error> {
        let client_id = self.client_id.clone();
        self.send(
            &Message::PingReq {
                client_id: client_id.as_bytes(),
            },
            true,
        )
    }

    /// Send PINGRESP.
    pub fn ping_resp(&mut self) -> Result<(), Error> {
        self.send(&Message::PingResp, false)
    }

    /// Send DISCONNECT and wait for the gateway's DISCONNECT.
    ///
    /// A `duration` asks the gateway to buffer messages while the client
    /// sleeps.
    pub fn disconnect(&mut self, duration: Option<u16>) -> Result<(), Error> {
        self.send(&Message::Disconnect { duration }, true)
    }

    /// Abandon the outstanding request, if any.
    ///
    /// The timeout flag is left as it is; the tentative topic entry of an
    /// abandoned REGISTER stays in the table with id `0`.
    pub fn timeout(&mut self) {
        self.wait.reset();
        self.pending_topic = None;
    }

    // ---------------------------------------------------------------------
    // Polling
    // ---------------------------------------------------------------------

    /// Run the retry timer, then process at most one inbound frame.
    pub fn poll(&mut self) -> Result<Option<MsgType>, Error> {
        self.poll_timer()?;
        self.poll_stream()
    }

    /// Retransmit or abandon the outstanding request if its timer expired.
    ///
    /// Returns `true` when a retransmission or a give-up happened. Giving up
    /// sets [`is_timeout`](Self::is_timeout) and reports
    /// [`DisconnectReason::Timeout`] to the handler.
    pub fn poll_timer(&mut self) -> Result<bool, Error> {
        let now = self.clock.now_millis();
        match self.wait.poll(now) {
            RetryAction::None => Ok(false),
            RetryAction::Retransmit => {
                Self::transmit(&mut self.connection, self.wait.frame())?;
                Ok(true)
            }
            RetryAction::GiveUp => {
                self.pending_topic = None;
                self.handler.on_disconnect(DisconnectReason::Timeout);
                Ok(true)
            }
        }
    }

    /// Read available bytes until one frame completes, then dispatch it.
    ///
    /// Returns the type of the frame that was handled. Frames that are
    /// malformed, unknown, or not expected are dropped and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// * [`Error::ReadError`] - The link failed while reading
    /// * [`Error::WriteError`] - An automatic reply could not be sent
    pub fn poll_stream(&mut self) -> Result<Option<MsgType>, Error> {
        let now = self.clock.now_millis();
        self.reader.expire(now);

        while self.connection.available() > 0 {
            let mut byte = [0u8; 1];
            let n = self
                .connection
                .read(&mut byte)
                .map_err(|_| Error::ReadError)?;
            if n == 0 {
                break;
            }
            if let Some(len) = self.reader.push(byte[0], now) {
                let mut frame = [0u8; MAX_FRAME_SIZE];
                frame[..len].copy_from_slice(self.reader.frame());
                return self.dispatch(&frame[..len]);
            }
        }
        Ok(None)
    }

    fn dispatch(&mut self, frame: &[u8]) -> Result<Option<MsgType>, Error> {
        let message = match Message::decode(frame) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("dropping frame: {}", e);
                return Ok(None);
            }
        };
        let t = message.msg_type();
        log::debug!("received {:?} ({} bytes)", t, frame.len());

        if t.is_correlated_response() {
            if !self.wait.is_awaiting(t) {
                log::debug!("{:?} not awaited, dropped", t);
                return Ok(None);
            }
            if let (Some(expected), Some(got)) = (self.wait.message_id(), message.message_id()) {
                if expected != got {
                    log::warn!("stale {:?}: msg id {} != {}", t, got, expected);
                    return Ok(None);
                }
            }
        } else if !t.is_unsolicited() {
            log::debug!("{:?} not handled by a client, dropped", t);
            return Ok(None);
        }

        self.handle(message)?;

        if self.wait.is_awaiting(t) {
            self.wait.complete();
        }
        Ok(Some(t))
    }

    fn handle(&mut self, message: Message<'_>) -> Result<(), Error> {
        match message {
            Message::Advertise { gw_id, duration } => {
                self.set_gateway(gw_id);
                self.handler.on_advertise(gw_id, duration);
            }
            Message::GwInfo { gw_id, address } => {
                self.set_gateway(gw_id);
                self.handler.on_gwinfo(gw_id, address);
            }
            Message::ConnAck { return_code } => self.handler.on_connack(return_code),
            Message::WillTopicReq => self.handler.on_will_topic_req(),
            Message::WillMsgReq => self.handler.on_will_msg_req(),
            Message::Register {
                topic_id,
                message_id,
                topic_name,
            } => {
                let return_code = match core::str::from_utf8(topic_name) {
                    _ if !is_assignable(topic_id) => {
                        log::warn!("gateway REGISTER with reserved topic id {:#06x}", topic_id);
                        ReturnCode::RejectedInvalidTopicId
                    }
                    Ok(name) => match self.topics.upsert(name, topic_id) {
                        Some(_) => {
                            self.handler.on_register(topic_id, name);
                            ReturnCode::Accepted
                        }
                        None => ReturnCode::RejectedCongestion,
                    },
                    Err(_) => ReturnCode::RejectedNotSupported,
                };
                let reply = Message::RegAck {
                    topic_id,
                    message_id,
                    return_code,
                };
                self.send(&reply, false)?;
            }
            Message::RegAck {
                topic_id,
                return_code,
                ..
            } => {
                if let Some(PendingTopic::Register { slot }) = self.pending_topic.take() {
                    if return_code.is_accepted() && is_assignable(topic_id) {
                        self.topics.set_id(slot, topic_id);
                    } else if return_code.is_accepted() {
                        log::warn!("REGACK with reserved topic id {:#06x} ignored", topic_id);
                    }
                }
                self.handler.on_regack(topic_id, return_code);
            }
            Message::Publish {
                flags,
                topic_id,
                message_id,
                data,
            } => {
                let by_id = flags.topic_id_type() == Some(TopicIdType::Normal);
                let known = !by_id || (topic_id != 0 && self.topics.find_by_id(topic_id).is_some());

                if flags.qos() == QoS::AtLeastOnce {
                    let return_code = if known {
                        ReturnCode::Accepted
                    } else {
                        ReturnCode::RejectedInvalidTopicId
                    };
                    let reply = Message::PubAck {
                        topic_id,
                        message_id,
                        return_code,
                    };
                    self.send(&reply, false)?;
                    if !known {
                        log::warn!("publish on unknown topic id {} rejected", topic_id);
                        return Ok(());
                    }
                }

                let topic = if by_id && topic_id != 0 {
                    self.topics.find_by_id(topic_id).map(|t| t.name.as_str())
                } else {
                    None
                };
                self.handler.on_publish(topic_id, topic, flags, data);
            }
            Message::PubAck {
                topic_id,
                return_code,
                ..
            } => self.handler.on_puback(topic_id, return_code),
            Message::SubAck {
                flags,
                topic_id,
                return_code,
                ..
            } => {
                if let Some(PendingTopic::Subscribe { name }) = self.pending_topic.take() {
                    if return_code.is_accepted() && is_assignable(topic_id) {
                        self.topics.upsert(&name, topic_id);
                    }
                }
                self.handler.on_suback(topic_id, flags, return_code);
            }
            Message::UnsubAck { .. } => self.handler.on_unsuback(),
            Message::PingReq { .. } => {
                self.ping_resp()?;
                self.handler.on_pingreq();
            }
            Message::PingResp => self.handler.on_pingresp(),
            Message::Disconnect { duration } => {
                self.handler
                    .on_disconnect(DisconnectReason::Gateway { duration });
            }
            Message::WillTopicResp { return_code } => self.handler.on_will_topic_resp(return_code),
            Message::WillMsgResp { return_code } => self.handler.on_will_msg_resp(return_code),
            _ => {}
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Sending
    // ---------------------------------------------------------------------

    fn send(&mut self, message: &Message<'_>, correlated: bool) -> Result<(), Error> {
        let len = message.encode(&mut self.send_buffer)?;
        log::debug!("sending {:?} ({} bytes)", message.msg_type(), len);
        Self::transmit(&mut self.connection, &self.send_buffer[..len])?;

        if correlated {
            let response = message
                .msg_type()
                .respond_type()
                .ok_or(Error::ProtocolError)?;
            if !self.wait.is_idle() {
                log::debug!("replacing outstanding {:?}", self.wait.state());
            }
            self.pending_topic = None;
            let now = self.clock.now_millis();
            self.wait
                .arm(response, message.message_id(), &self.send_buffer[..len], now)?;
        }
        Ok(())
    }

    fn transmit(connection: &mut C, frame: &[u8]) -> Result<(), Error> {
        let mut written = 0;
        while written < frame.len() {
            match connection.write(&frame[written..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => written += n,
                Err(_) => return Err(Error::WriteError),
            }
        }
        connection.flush().map_err(|_| Error::WriteError)
    }

    fn next_message_id(&mut self) -> u16 {
        self.message_id = self.message_id.wrapping_add(1);
        if self.message_id == 0 {
            self.message_id = 1;
        }
        self.message_id
    }

    fn set_gateway(&mut self, gw_id: u8) {
        if self.gateway_id != Some(gw_id) {
            log::info!("gateway {} found", gw_id);
        }
        self.gateway_id = Some(gw_id);
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Id assigned to `name`, once its registration was acknowledged.
    ///
    /// `name` is truncated the same way [`register_topic`](Self::register_topic)
    /// and [`subscribe_by_name`](Self::subscribe_by_name) truncate it.
    pub fn topic_id(&self, name: &str) -> Option<u16> {
        self.topics
            .find_by_name(codec::fit_text(name, MsgType::Register))
            .filter(|t| t.is_registered())
            .map(|t| t.id)
    }

    /// The topic table.
    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    /// Last gateway heard from through ADVERTISE or GWINFO.
    pub fn gateway_id(&self) -> Option<u8> {
        self.gateway_id
    }

    /// Message id used by the most recent request.
    pub fn message_id(&self) -> u16 {
        self.message_id
    }

    /// What the client is waiting for.
    pub fn awaiting(&self) -> WaitState {
        self.wait.state()
    }

    /// `true` when the last request ran out of retries.
    pub fn is_timeout(&self) -> bool {
        self.wait.is_timed_out()
    }

    /// The underlying link.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// The underlying link, mutably.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// The time source.
    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// The application handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The application handler, mutably.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}

/// Ids `0` and [`INVALID_TOPIC_ID`] are reserved and never stored.
fn is_assignable(topic_id: u16) -> bool {
    topic_id != 0 && topic_id != INVALID_TOPIC_ID
}

fn will_fields<'t>(topic: Option<&'t str>, qos: QoS, retain: bool, t: MsgType) -> (Flags, &'t [u8]) {
    match topic {
        None => (Flags::new(), <&[u8]>::default()),
        Some(topic) => {
            let mut flags = Flags::new().with_qos(qos);
            if retain {
                flags = flags.with_retain();
            }
            (flags, codec::fit_text(topic, t).as_bytes())
        }
    }
}
