//! Wire codec.
//!
//! [`Message`] is a borrowed view of one frame: fixed header fields are
//! decoded into plain integers, variable trailing fields (names, payloads)
//! borrow straight from the input buffer. Encoding writes the length byte,
//! the type tag, the fixed fields in declared order and then the trailing
//! bytes. No terminator is ever written; the length byte alone delimits the
//! frame.

use super::types::{Flags, MAX_FRAME_SIZE, MsgType, ReturnCode, TopicIdType};
use crate::network::error::Error;

/// Topic field of SUBSCRIBE and UNSUBSCRIBE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicRef<'a> {
    /// Full topic name (topic id type `Normal`).
    Name(&'a [u8]),
    /// Predefined id or two-byte short name.
    Id(u16),
}

impl TopicRef<'_> {
    fn encoded_len(&self) -> usize {
        match self {
            TopicRef::Name(name) => name.len(),
            TopicRef::Id(_) => 2,
        }
    }

    /// `true` when the topic id type in `flags` selects this form.
    fn agrees_with(&self, flags: Flags) -> bool {
        match (self, flags.topic_id_type()) {
            (TopicRef::Name(_), Some(TopicIdType::Normal)) => true,
            (TopicRef::Id(_), Some(TopicIdType::Predefined | TopicIdType::ShortName)) => true,
            _ => false,
        }
    }
}

/// One decoded MQTT-SN frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Message<'a> {
    Advertise {
        gw_id: u8,
        duration: u16,
    },
    SearchGw {
        radius: u8,
    },
    GwInfo {
        gw_id: u8,
        address: &'a [u8],
    },
    Connect {
        flags: Flags,
        protocol_id: u8,
        duration: u16,
        client_id: &'a [u8],
    },
    ConnAck {
        return_code: ReturnCode,
    },
    WillTopicReq,
    /// An empty topic with no flags is the two-byte "delete will" form.
    WillTopic {
        flags: Flags,
        topic: &'a [u8],
    },
    WillMsgReq,
    WillMsg {
        message: &'a [u8],
    },
    Register {
        topic_id: u16,
        message_id: u16,
        topic_name: &'a [u8],
    },
    RegAck {
        topic_id: u16,
        message_id: u16,
        return_code: ReturnCode,
    },
    Publish {
        flags: Flags,
        topic_id: u16,
        message_id: u16,
        data: &'a [u8],
    },
    PubAck {
        topic_id: u16,
        message_id: u16,
        return_code: ReturnCode,
    },
    PubComp {
        message_id: u16,
    },
    PubRec {
        message_id: u16,
    },
    PubRel {
        message_id: u16,
    },
    Subscribe {
        flags: Flags,
        message_id: u16,
        topic: TopicRef<'a>,
    },
    SubAck {
        flags: Flags,
        topic_id: u16,
        message_id: u16,
        return_code: ReturnCode,
    },
    Unsubscribe {
        flags: Flags,
        message_id: u16,
        topic: TopicRef<'a>,
    },
    UnsubAck {
        message_id: u16,
    },
    /// The client id is empty when the gateway pings.
    PingReq {
        client_id: &'a [u8],
    },
    PingResp,
    /// The duration is only present when a client goes to sleep.
    Disconnect {
        duration: Option<u16>,
    },
    WillTopicUpd {
        flags: Flags,
        topic: &'a [u8],
    },
    WillTopicResp {
        return_code: ReturnCode,
    },
    WillMsgUpd {
        message: &'a [u8],
    },
    WillMsgResp {
        return_code: ReturnCode,
    },
}

/// Size of the fixed part of a frame of type `t`, length and type bytes
/// included.
pub const fn header_size(t: MsgType) -> usize {
    match t {
        MsgType::Advertise => 5,
        MsgType::SearchGw => 3,
        MsgType::GwInfo => 3,
        MsgType::Connect => 6,
        MsgType::ConnAck => 3,
        MsgType::WillTopicReq => 2,
        MsgType::WillTopic => 3,
        MsgType::WillMsgReq => 2,
        MsgType::WillMsg => 2,
        MsgType::Register => 6,
        MsgType::RegAck => 7,
        MsgType::Publish => 7,
        MsgType::PubAck => 7,
        MsgType::PubComp | MsgType::PubRec | MsgType::PubRel => 4,
        MsgType::Subscribe | MsgType::Unsubscribe => 5,
        MsgType::SubAck => 8,
        MsgType::UnsubAck => 4,
        MsgType::PingReq => 2,
        MsgType::PingResp => 2,
        MsgType::Disconnect => 2,
        MsgType::WillTopicUpd => 3,
        MsgType::WillTopicResp => 3,
        MsgType::WillMsgUpd => 2,
        MsgType::WillMsgResp => 3,
    }
}

/// Room left for the trailing name or data of a type `t` frame.
pub const fn max_payload(t: MsgType) -> usize {
    MAX_FRAME_SIZE - header_size(t)
}

/// Truncate `text` so it fits the trailing field of a type `t` frame.
///
/// The cut is moved back to the nearest character boundary, so the result is
/// always valid UTF-8 and may be a few bytes shorter than the budget.
///
/// ```rust
/// use libmqttsn::network::application::mqttsn::{MsgType, codec};
///
/// let long = "a".repeat(100);
/// assert_eq!(codec::fit_text(&long, MsgType::Register).len(), 60);
/// assert_eq!(codec::fit_text("short", MsgType::Register), "short");
/// ```
pub fn fit_text(text: &str, t: MsgType) -> &str {
    let max = max_payload(t);
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

impl<'a> Message<'a> {
    /// Type tag of this message.
    pub fn msg_type(&self) -> MsgType {
        match self {
            Message::Advertise { .. } => MsgType::Advertise,
            Message::SearchGw { .. } => MsgType::SearchGw,
            Message::GwInfo { .. } => MsgType::GwInfo,
            Message::Connect { .. } => MsgType::Connect,
            Message::ConnAck { .. } => MsgType::ConnAck,
            Message::WillTopicReq => MsgType::WillTopicReq,
            Message::WillTopic { .. } => MsgType::WillTopic,
            Message::WillMsgReq => MsgType::WillMsgReq,
            Message::WillMsg { .. } => MsgType::WillMsg,
            Message::Register { .. } => MsgType::Register,
            Message::RegAck { .. } => MsgType::RegAck,
            Message::Publish { .. } => MsgType::Publish,
            Message::PubAck { .. } => MsgType::PubAck,
            Message::PubComp { .. } => MsgType::PubComp,
            Message::PubRec { .. } => MsgType::PubRec,
            Message::PubRel { .. } => MsgType::PubRel,
            Message::Subscribe { .. } => MsgType::Subscribe,
            Message::SubAck { .. } => MsgType::SubAck,
            Message::Unsubscribe { .. } => MsgType::Unsubscribe,
            Message::UnsubAck { .. } => MsgType::UnsubAck,
            Message::PingReq { .. } => MsgType::PingReq,
            Message::PingResp => MsgType::PingResp,
            Message::Disconnect { .. } => MsgType::Disconnect,
            Message::WillTopicUpd { .. } => MsgType::WillTopicUpd,
            Message::WillTopicResp { .. } => MsgType::WillTopicResp,
            Message::WillMsgUpd { .. } => MsgType::WillMsgUpd,
            Message::WillMsgResp { .. } => MsgType::WillMsgResp,
        }
    }

    /// Correlation id, for the types that carry one.
    pub fn message_id(&self) -> Option<u16> {
        match *self {
            Message::Register { message_id, .. }
            | Message::RegAck { message_id, .. }
            | Message::Publish { message_id, .. }
            | Message::PubAck { message_id, .. }
            | Message::PubComp { message_id }
            | Message::PubRec { message_id }
            | Message::PubRel { message_id }
            | Message::Subscribe { message_id, .. }
            | Message::SubAck { message_id, .. }
            | Message::Unsubscribe { message_id, .. }
            | Message::UnsubAck { message_id } => Some(message_id),
            _ => None,
        }
    }

    /// Number of bytes [`encode`](Self::encode) will write.
    pub fn encoded_len(&self) -> usize {
        let fixed = header_size(self.msg_type());
        let tail = match self {
            Message::GwInfo { address, .. } => address.len(),
            Message::Connect { client_id, .. } => client_id.len(),
            Message::WillTopic { flags, topic } | Message::WillTopicUpd { flags, topic } => {
                if flags.bits() == 0 && topic.is_empty() {
                    return 2;
                }
                topic.len()
            }
            Message::WillMsg { message } | Message::WillMsgUpd { message } => message.len(),
            Message::Register { topic_name, .. } => topic_name.len(),
            Message::Publish { data, .. } => data.len(),
            Message::Subscribe { topic, .. } | Message::Unsubscribe { topic, .. } => {
                topic.encoded_len()
            }
            Message::PingReq { client_id } => client_id.len(),
            Message::Disconnect { duration: Some(_) } => 2,
            _ => 0,
        };
        fixed + tail
    }

    /// Serialize into `buf`, returning the frame length.
    ///
    /// Fails with [`Error::BufferOverflow`] when the frame does not fit `buf`
    /// or cannot be described by a one-byte length, and with
    /// [`Error::ProtocolError`] when a SUBSCRIBE or UNSUBSCRIBE topic id type
    /// does not match its [`TopicRef`].
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, Error> {
        if let Message::Subscribe { flags, topic, .. } | Message::Unsubscribe { flags, topic, .. } =
            self
        {
            if !topic.agrees_with(*flags) {
                return Err(Error::ProtocolError);
            }
        }
        let len = self.encoded_len();
        if len > buf.len() || len > u8::MAX as usize {
            return Err(Error::BufferOverflow);
        }

        let mut w = Writer { buf, pos: 0 };
        w.put_u8(len as u8);
        w.put_u8(self.msg_type() as u8);

        match *self {
            Message::Advertise { gw_id, duration } => {
                w.put_u8(gw_id);
                w.put_u16(duration);
            }
            Message::SearchGw { radius } => w.put_u8(radius),
            Message::GwInfo { gw_id, address } => {
                w.put_u8(gw_id);
                w.put_slice(address);
            }
            Message::Connect {
                flags,
                protocol_id,
                duration,
                client_id,
            } => {
                w.put_u8(flags.bits());
                w.put_u8(protocol_id);
                w.put_u16(duration);
                w.put_slice(client_id);
            }
            Message::ConnAck { return_code }
            | Message::WillTopicResp { return_code }
            | Message::WillMsgResp { return_code } => w.put_u8(return_code as u8),
            Message::WillTopicReq | Message::WillMsgReq | Message::PingResp => {}
            Message::WillTopic { flags, topic } | Message::WillTopicUpd { flags, topic } => {
                if len > 2 {
                    w.put_u8(flags.bits());
                    w.put_slice(topic);
                }
            }
            Message::WillMsg { message } | Message::WillMsgUpd { message } => {
                w.put_slice(message)
            }
            Message::Register {
                topic_id,
                message_id,
                topic_name,
            } => {
                w.put_u16(topic_id);
                w.put_u16(message_id);
                w.put_slice(topic_name);
            }
            Message::RegAck {
                topic_id,
                message_id,
                return_code,
            }
            | Message::PubAck {
                topic_id,
                message_id,
                return_code,
            } => {
                w.put_u16(topic_id);
                w.put_u16(message_id);
                w.put_u8(return_code as u8);
            }
            Message::Publish {
                flags,
                topic_id,
                message_id,
                data,
            } => {
                w.put_u8(flags.bits());
                w.put_u16(topic_id);
                w.put_u16(message_id);
                w.put_slice(data);
            }
            Message::PubComp { message_id }
            | Message::PubRec { message_id }
            | Message::PubRel { message_id }
            | Message::UnsubAck { message_id } => w.put_u16(message_id),
            Message::Subscribe {
                flags,
                message_id,
                topic,
            }
            | Message::Unsubscribe {
                flags,
                message_id,
                topic,
            } => {
                w.put_u8(flags.bits());
                w.put_u16(message_id);
                match topic {
                    TopicRef::Name(name) => w.put_slice(name),
                    TopicRef::Id(id) => w.put_u16(id),
                }
            }
            Message::SubAck {
                flags,
                topic_id,
                message_id,
                return_code,
            } => {
                w.put_u8(flags.bits());
                w.put_u16(topic_id);
                w.put_u16(message_id);
                w.put_u8(return_code as u8);
            }
            Message::PingReq { client_id } => w.put_slice(client_id),
            Message::Disconnect { duration } => {
                if let Some(duration) = duration {
                    w.put_u16(duration);
                }
            }
        }

        debug_assert_eq!(w.pos, len);
        Ok(len)
    }

    /// Parse one frame from the start of `buf`.
    ///
    /// `buf[0]` is the declared length; bytes past it are ignored. The
    /// three-byte extended length form is not accepted since no such frame
    /// fits the budget.
    pub fn decode(buf: &'a [u8]) -> Result<Self, Error> {
        if buf.len() < 2 {
            return Err(Error::MalformedFrame);
        }
        let len = buf[0] as usize;
        if len < 2 || buf.len() < len {
            return Err(Error::MalformedFrame);
        }
        let tag = buf[1];
        let t = MsgType::from_u8(tag).ok_or(Error::UnknownMessageType(tag))?;

        let min = match t {
            MsgType::WillTopic | MsgType::WillTopicUpd => 2,
            _ => header_size(t),
        };
        if len < min {
            return Err(Error::MalformedFrame);
        }
        if is_fixed_size(t) && len != header_size(t) {
            return Err(Error::MalformedFrame);
        }

        let mut r = Reader {
            buf: &buf[..len],
            pos: 2,
        };

        let message = match t {
            MsgType::Advertise => Message::Advertise {
                gw_id: r.u8(),
                duration: r.u16(),
            },
            MsgType::SearchGw => Message::SearchGw { radius: r.u8() },
            MsgType::GwInfo => Message::GwInfo {
                gw_id: r.u8(),
                address: r.rest(),
            },
            MsgType::Connect => Message::Connect {
                flags: Flags::from_bits(r.u8()),
                protocol_id: r.u8(),
                duration: r.u16(),
                client_id: r.rest(),
            },
            MsgType::ConnAck => Message::ConnAck {
                return_code: r.return_code()?,
            },
            MsgType::WillTopicReq => Message::WillTopicReq,
            MsgType::WillTopic => {
                let (flags, topic) = r.will_topic();
                Message::WillTopic { flags, topic }
            }
            MsgType::WillMsgReq => Message::WillMsgReq,
            MsgType::WillMsg => Message::WillMsg { message: r.rest() },
            MsgType::Register => Message::Register {
                topic_id: r.u16(),
                message_id: r.u16(),
                topic_name: r.rest(),
            },
            MsgType::RegAck => Message::RegAck {
                topic_id: r.u16(),
                message_id: r.u16(),
                return_code: r.return_code()?,
            },
            MsgType::Publish => {
                let flags = Flags::from_bits(r.u8());
                flags.topic_id_type().ok_or(Error::ProtocolError)?;
                Message::Publish {
                    flags,
                    topic_id: r.u16(),
                    message_id: r.u16(),
                    data: r.rest(),
                }
            }
            MsgType::PubAck => Message::PubAck {
                topic_id: r.u16(),
                message_id: r.u16(),
                return_code: r.return_code()?,
            },
            MsgType::PubComp => Message::PubComp {
                message_id: r.u16(),
            },
            MsgType::PubRec => Message::PubRec {
                message_id: r.u16(),
            },
            MsgType::PubRel => Message::PubRel {
                message_id: r.u16(),
            },
            MsgType::Subscribe => {
                let (flags, message_id, topic) = r.topic_request()?;
                Message::Subscribe {
                    flags,
                    message_id,
                    topic,
                }
            }
            MsgType::SubAck => Message::SubAck {
                flags: Flags::from_bits(r.u8()),
                topic_id: r.u16(),
                message_id: r.u16(),
                return_code: r.return_code()?,
            },
            MsgType::Unsubscribe => {
                let (flags, message_id, topic) = r.topic_request()?;
                Message::Unsubscribe {
                    flags,
                    message_id,
                    topic,
                }
            }
            MsgType::UnsubAck => Message::UnsubAck {
                message_id: r.u16(),
            },
            MsgType::PingReq => Message::PingReq {
                client_id: r.rest(),
            },
            MsgType::PingResp => Message::PingResp,
            MsgType::Disconnect => match len {
                2 => Message::Disconnect { duration: None },
                4 => Message::Disconnect {
                    duration: Some(r.u16()),
                },
                _ => return Err(Error::MalformedFrame),
            },
            MsgType::WillTopicUpd => {
                let (flags, topic) = r.will_topic();
                Message::WillTopicUpd { flags, topic }
            }
            MsgType::WillTopicResp => Message::WillTopicResp {
                return_code: r.return_code()?,
            },
            MsgType::WillMsgUpd => Message::WillMsgUpd { message: r.rest() },
            MsgType::WillMsgResp => Message::WillMsgResp {
                return_code: r.return_code()?,
            },
        };

        Ok(message)
    }
}

fn is_fixed_size(t: MsgType) -> bool {
    matches!(
        t,
        MsgType::Advertise
            | MsgType::SearchGw
            | MsgType::ConnAck
            | MsgType::WillTopicReq
            | MsgType::WillMsgReq
            | MsgType::RegAck
            | MsgType::PubAck
            | MsgType::PubComp
            | MsgType::PubRec
            | MsgType::PubRel
            | MsgType::SubAck
            | MsgType::UnsubAck
            | MsgType::PingResp
            | MsgType::WillTopicResp
            | MsgType::WillMsgResp
    )
}

struct Writer<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl Writer<'_> {
    fn put_u8(&mut self, value: u8) {
        self.buf[self.pos] = value;
        self.pos += 1;
    }

    fn put_u16(&mut self, value: u16) {
        self.buf[self.pos..self.pos + 2].copy_from_slice(&value.to_be_bytes());
        self.pos += 2;
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }
}

// Callers check the frame against `header_size` before reading, so the fixed
// field reads below never run past the end.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn u8(&mut self) -> u8 {
        let value = self.buf[self.pos];
        self.pos += 1;
        value
    }

    fn u16(&mut self) -> u16 {
        let value = u16::from_be_bytes([self.buf[self.pos], self.buf[self.pos + 1]]);
        self.pos += 2;
        value
    }

    fn rest(&mut self) -> &'a [u8] {
        let rest = &self.buf[self.pos..];
        self.pos = self.buf.len();
        rest
    }

    fn return_code(&mut self) -> Result<ReturnCode, Error> {
        ReturnCode::from_u8(self.u8()).ok_or(Error::ProtocolError)
    }

    fn will_topic(&mut self) -> (Flags, &'a [u8]) {
        if self.buf.len() == 2 {
            return (Flags::new(), &self.buf[2..]);
        }
        let flags = Flags::from_bits(self.u8());
        (flags, self.rest())
    }

    fn topic_request(&mut self) -> Result<(Flags, u16, TopicRef<'a>), Error> {
        let flags = Flags::from_bits(self.u8());
        let message_id = self.u16();
        let topic = match flags.topic_id_type() {
            Some(TopicIdType::Normal) => TopicRef::Name(self.rest()),
            Some(_) => {
                if self.buf.len() - self.pos != 2 {
                    return Err(Error::MalformedFrame);
                }
                TopicRef::Id(self.u16())
            }
            None => return Err(Error::ProtocolError),
        };
        Ok((flags, message_id, topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::application::mqttsn::types::QoS;

    fn round_trip(message: Message<'_>) {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = message.encode(&mut buf).unwrap();
        assert_eq!(len, message.encoded_len());
        assert_eq!(buf[0] as usize, len);
        assert_eq!(buf[1], message.msg_type() as u8);
        assert_eq!(Message::decode(&buf[..len]).unwrap(), message);
    }

    #[test]
    fn test_connect_layout() {
        let message = Message::Connect {
            flags: Flags::new().with_clean_session(),
            protocol_id: 0x01,
            duration: 30,
            client_id: b"dev1",
        };
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = message.encode(&mut buf).unwrap();
        assert_eq!(&buf[..len], &[10, 0x04, 0x04, 0x01, 0x00, 0x1E, b'd', b'e', b'v', b'1']);
    }

    #[test]
    fn test_register_layout_is_big_endian() {
        let message = Message::Register {
            topic_id: 0,
            message_id: 0x0102,
            topic_name: b"a/b",
        };
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = message.encode(&mut buf).unwrap();
        assert_eq!(&buf[..len], &[9, 0x0A, 0x00, 0x00, 0x01, 0x02, b'a', b'/', b'b']);
    }

    #[test]
    fn test_round_trip_minimal_and_full() {
        let full = [0x5Au8; MAX_FRAME_SIZE];
        round_trip(Message::Publish {
            flags: Flags::new().with_qos(QoS::AtLeastOnce),
            topic_id: 7,
            message_id: 1,
            data: &[],
        });
        round_trip(Message::Publish {
            flags: Flags::new(),
            topic_id: 7,
            message_id: 1,
            data: &full[..max_payload(MsgType::Publish)],
        });
        round_trip(Message::Register {
            topic_id: 3,
            message_id: 9,
            topic_name: &full[..max_payload(MsgType::Register)],
        });
        round_trip(Message::Subscribe {
            flags: Flags::new().with_topic_id_type(TopicIdType::Predefined),
            message_id: 2,
            topic: TopicRef::Id(0x1234),
        });
        round_trip(Message::Unsubscribe {
            flags: Flags::new(),
            message_id: 2,
            topic: TopicRef::Name(b"x/y"),
        });
        round_trip(Message::Disconnect { duration: None });
        round_trip(Message::Disconnect { duration: Some(600) });
        round_trip(Message::PingReq { client_id: &[] });
        round_trip(Message::WillTopic {
            flags: Flags::new(),
            topic: &[],
        });
        round_trip(Message::SubAck {
            flags: Flags::new(),
            topic_id: 4,
            message_id: 2,
            return_code: ReturnCode::RejectedCongestion,
        });
    }

    #[test]
    fn test_topic_ref_must_match_topic_id_type() {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let by_id_as_name = Message::Subscribe {
            flags: Flags::new().with_topic_id_type(TopicIdType::Normal),
            message_id: 1,
            topic: TopicRef::Id(7),
        };
        assert_eq!(by_id_as_name.encode(&mut buf), Err(Error::ProtocolError));

        let name_as_predefined = Message::Unsubscribe {
            flags: Flags::new().with_topic_id_type(TopicIdType::Predefined),
            message_id: 1,
            topic: TopicRef::Name(b"a/b"),
        };
        assert_eq!(name_as_predefined.encode(&mut buf), Err(Error::ProtocolError));

        let short_name = Message::Subscribe {
            flags: Flags::new().with_topic_id_type(TopicIdType::ShortName),
            message_id: 2,
            topic: TopicRef::Id(u16::from_be_bytes(*b"ab")),
        };
        let len = short_name.encode(&mut buf).unwrap();
        assert_eq!(Message::decode(&buf[..len]), Ok(short_name));
    }

    #[test]
    fn test_empty_will_topic_is_two_bytes() {
        let mut buf = [0u8; 4];
        let len = Message::WillTopic {
            flags: Flags::new(),
            topic: &[],
        }
        .encode(&mut buf)
        .unwrap();
        assert_eq!(&buf[..len], &[2, 0x07]);
    }

    #[test]
    fn test_encode_overflow() {
        let data = [0u8; MAX_FRAME_SIZE];
        let message = Message::Publish {
            flags: Flags::new(),
            topic_id: 1,
            message_id: 1,
            data: &data,
        };
        let mut buf = [0u8; MAX_FRAME_SIZE];
        assert_eq!(message.encode(&mut buf), Err(Error::BufferOverflow));
    }

    #[test]
    fn test_decode_rejects_bad_lengths() {
        assert_eq!(Message::decode(&[]), Err(Error::MalformedFrame));
        assert_eq!(Message::decode(&[1, 0x17]), Err(Error::MalformedFrame));
        // Declared 7 bytes, 3 received.
        assert_eq!(Message::decode(&[7, 0x0B, 0x00]), Err(Error::MalformedFrame));
        // REGACK is fixed at 7 bytes.
        assert_eq!(
            Message::decode(&[8, 0x0B, 0, 1, 0, 1, 0, 0]),
            Err(Error::MalformedFrame)
        );
        assert_eq!(Message::decode(&[3, 0x18, 0]), Err(Error::MalformedFrame));
    }

    #[test]
    fn test_decode_unknown_and_invalid_values() {
        assert_eq!(Message::decode(&[2, 0x03]), Err(Error::UnknownMessageType(0x03)));
        assert_eq!(Message::decode(&[3, 0x05, 0x09]), Err(Error::ProtocolError));
        assert_eq!(
            Message::decode(&[7, 0x0C, 0x03, 0, 1, 0, 1]),
            Err(Error::ProtocolError)
        );
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let message = Message::decode(&[2, 0x17, 0xAA, 0xBB]).unwrap();
        assert_eq!(message, Message::PingResp);
    }

    #[test]
    fn test_message_ids() {
        assert_eq!(Message::UnsubAck { message_id: 4 }.message_id(), Some(4));
        assert_eq!(Message::PingResp.message_id(), None);
    }

    #[test]
    fn test_fit_text_respects_char_boundaries() {
        let text = "é".repeat(40);
        let fitted = fit_text(&text, MsgType::Register);
        assert!(fitted.len() <= max_payload(MsgType::Register));
        assert_eq!(fitted.len(), 60);
        let text = "aé€".repeat(20);
        let fitted = fit_text(&text, MsgType::Subscribe);
        assert!(fitted.len() <= max_payload(MsgType::Subscribe));
        assert!(text.starts_with(fitted));
    }
}
