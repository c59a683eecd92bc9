#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use libmqttsn::network::application::mqttsn::{
    Client, DisconnectReason, Flags, Handler, MsgType, Options, ReturnCode,
};
use libmqttsn::network::error::Error;
use libmqttsn::network::*;
use libmqttsn::system::clock::Clock;

/// In-memory link: the test pushes gateway bytes in and inspects what the
/// client wrote.
#[derive(Debug, Default)]
pub struct MockConnection {
    inbound: VecDeque<u8>,
    written: Vec<u8>,
    /// Largest chunk a single `write` accepts; `0` means unlimited.
    pub max_write: usize,
    pub fail_writes: bool,
    pub closed: bool,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Helper for tests to inject gateway bytes into the read side
    pub fn push(&mut self, data: &[u8]) {
        self.inbound.extend(data.iter().copied());
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Split everything written so far into frames and clear the log.
    pub fn take_frames(&mut self) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        let mut rest = &self.written[..];
        while let Some(&len) = rest.first() {
            let len = (len as usize).clamp(1, rest.len());
            frames.push(rest[..len].to_vec());
            rest = &rest[len..];
        }
        self.written.clear();
        frames
    }
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.inbound.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_writes {
            return Err(Error::WriteError);
        }
        if self.closed {
            return Ok(0);
        }
        let len = match self.max_write {
            0 => buf.len(),
            max => buf.len().min(max),
        };
        self.written.extend_from_slice(&buf[..len]);
        Ok(len)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // In this mock, flush does nothing.
        Ok(())
    }
}

impl Available for MockConnection {
    fn available(&mut self) -> usize {
        self.inbound.len()
    }
}

impl Connection for MockConnection {}

/// Hand-cranked clock.
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<u32>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> u32 {
        self.now.get()
    }
}

/// Every callback the client made, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Advertise(u8, u16),
    GwInfo(u8),
    ConnAck(ReturnCode),
    WillTopicReq,
    WillMsgReq,
    Register(u16, String),
    RegAck(u16, ReturnCode),
    Publish(u16, Option<String>, Flags, Vec<u8>),
    PubAck(u16, ReturnCode),
    SubAck(u16, ReturnCode),
    UnsubAck,
    PingReq,
    PingResp,
    Disconnect(DisconnectReason),
    WillTopicResp(ReturnCode),
    WillMsgResp(ReturnCode),
}

#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub events: Vec<Event>,
}

impl Handler for RecordingHandler {
    fn on_advertise(&mut self, gw_id: u8, duration: u16) {
        self.events.push(Event::Advertise(gw_id, duration));
    }

    fn on_gwinfo(&mut self, gw_id: u8, _address: &[u8]) {
        self.events.push(Event::GwInfo(gw_id));
    }

    fn on_connack(&mut self, return_code: ReturnCode) {
        self.events.push(Event::ConnAck(return_code));
    }

    fn on_will_topic_req(&mut self) {
        self.events.push(Event::WillTopicReq);
    }

    fn on_will_msg_req(&mut self) {
        self.events.push(Event::WillMsgReq);
    }

    fn on_register(&mut self, topic_id: u16, topic: &str) {
        self.events.push(Event::Register(topic_id, topic.to_string()));
    }

    fn on_regack(&mut self, topic_id: u16, return_code: ReturnCode) {
        self.events.push(Event::RegAck(topic_id, return_code));
    }

    fn on_publish(&mut self, topic_id: u16, topic: Option<&str>, flags: Flags, data: &[u8]) {
        self.events.push(Event::Publish(
            topic_id,
            topic.map(str::to_string),
            flags,
            data.to_vec(),
        ));
    }

    fn on_puback(&mut self, topic_id: u16, return_code: ReturnCode) {
        self.events.push(Event::PubAck(topic_id, return_code));
    }

    fn on_suback(&mut self, topic_id: u16, _flags: Flags, return_code: ReturnCode) {
        self.events.push(Event::SubAck(topic_id, return_code));
    }

    fn on_unsuback(&mut self) {
        self.events.push(Event::UnsubAck);
    }

    fn on_pingreq(&mut self) {
        self.events.push(Event::PingReq);
    }

    fn on_pingresp(&mut self) {
        self.events.push(Event::PingResp);
    }

    fn on_disconnect(&mut self, reason: DisconnectReason) {
        self.events.push(Event::Disconnect(reason));
    }

    fn on_will_topic_resp(&mut self, return_code: ReturnCode) {
        self.events.push(Event::WillTopicResp(return_code));
    }

    fn on_will_msg_resp(&mut self, return_code: ReturnCode) {
        self.events.push(Event::WillMsgResp(return_code));
    }
}

pub type TestClient<'k> = Client<MockConnection, &'k MockClock, RecordingHandler>;

pub fn options() -> Options<'static> {
    Options {
        client_id: "dev1",
        ..Options::default()
    }
}

pub fn client(clock: &MockClock) -> TestClient<'_> {
    client_with(clock, &options())
}

pub fn client_with<'k>(clock: &'k MockClock, options: &Options<'_>) -> TestClient<'k> {
    Client::new(MockConnection::new(), clock, RecordingHandler::default(), options)
        .expect("valid options")
}

/// Hand `bytes` to the client and process every frame they contain.
pub fn deliver(client: &mut TestClient<'_>, bytes: &[u8]) -> Vec<MsgType> {
    client.connection_mut().push(bytes);
    let mut handled = Vec::new();
    while client.connection_mut().available() > 0 {
        if let Some(t) = client.poll_stream().expect("poll") {
            handled.push(t);
        }
    }
    handled
}
