//! Protocol constants and the closed enumerations of MQTT-SN.
//!
//! Message type values follow MQTT-SN v1.2. Every acknowledgement sits
//! directly after the request it answers, which is what
//! [`MsgType::respond_type`] relies on; the reserved gaps at `0x03`, `0x11`
//! and `0x19` keep that adjacency intact.

/// Protocol identifier carried in every CONNECT.
pub const PROTOCOL_ID: u8 = 0x01;

/// Hard ceiling on the size of one frame, shared by send and receive paths.
///
/// Derived from the link MTU of the small radios and serial bridges the
/// protocol targets. Never negotiated.
pub const MAX_FRAME_SIZE: usize = 66;

/// Capacity of the topic table.
pub const MAX_TOPICS: usize = 10;

/// Longest client identifier MQTT-SN allows.
pub const MAX_CLIENT_ID_LEN: usize = 23;

/// Topic id meaning "invalid / unknown".
pub const INVALID_TOPIC_ID: u16 = 0xFFFF;

// Recommended timer values (seconds) and retry counters.

/// Interval between gateway ADVERTISE broadcasts.
pub const T_ADV: u32 = 960;
/// ADVERTISE periods missed before a gateway is considered lost.
pub const N_ADV: u8 = 3;
/// Upper bound of the random delay before sending SEARCHGW.
pub const T_SEARCH_GW: u32 = 5;
/// Upper bound of the random delay before answering with GWINFO.
pub const T_GW_INFO: u32 = 5;
/// Time a sleeping client may stay unresponsive.
pub const T_WAIT: u32 = 360;
/// Retransmission interval for unacknowledged requests.
pub const T_RETRY: u32 = 15;
/// Number of retransmissions before a request is abandoned.
pub const N_RETRY: u8 = 5;

/// MQTT-SN message type tag (byte 1 of every frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MsgType {
    Advertise = 0x00,
    SearchGw = 0x01,
    GwInfo = 0x02,
    Connect = 0x04,
    ConnAck = 0x05,
    WillTopicReq = 0x06,
    WillTopic = 0x07,
    WillMsgReq = 0x08,
    WillMsg = 0x09,
    Register = 0x0A,
    RegAck = 0x0B,
    Publish = 0x0C,
    PubAck = 0x0D,
    PubComp = 0x0E,
    PubRec = 0x0F,
    PubRel = 0x10,
    Subscribe = 0x12,
    SubAck = 0x13,
    Unsubscribe = 0x14,
    UnsubAck = 0x15,
    PingReq = 0x16,
    PingResp = 0x17,
    Disconnect = 0x18,
    WillTopicUpd = 0x1A,
    WillTopicResp = 0x1B,
    WillMsgUpd = 0x1C,
    WillMsgResp = 0x1D,
}

impl MsgType {
    /// Map a raw type tag to a message type.
    ///
    /// Returns `None` for reserved and out-of-range values.
    pub fn from_u8(value: u8) -> Option<Self> {
        let t = match value {
            0x00 => MsgType::Advertise,
            0x01 => MsgType::SearchGw,
            0x02 => MsgType::GwInfo,
            0x04 => MsgType::Connect,
            0x05 => MsgType::ConnAck,
            0x06 => MsgType::WillTopicReq,
            0x07 => MsgType::WillTopic,
            0x08 => MsgType::WillMsgReq,
            0x09 => MsgType::WillMsg,
            0x0A => MsgType::Register,
            0x0B => MsgType::RegAck,
            0x0C => MsgType::Publish,
            0x0D => MsgType::PubAck,
            0x0E => MsgType::PubComp,
            0x0F => MsgType::PubRec,
            0x10 => MsgType::PubRel,
            0x12 => MsgType::Subscribe,
            0x13 => MsgType::SubAck,
            0x14 => MsgType::Unsubscribe,
            0x15 => MsgType::UnsubAck,
            0x16 => MsgType::PingReq,
            0x17 => MsgType::PingResp,
            0x18 => MsgType::Disconnect,
            0x1A => MsgType::WillTopicUpd,
            0x1B => MsgType::WillTopicResp,
            0x1C => MsgType::WillMsgUpd,
            0x1D => MsgType::WillMsgResp,
            _ => return None,
        };
        Some(t)
    }

    /// The message type that acknowledges a request of this type.
    ///
    /// The acknowledgement is always the next type value, except for
    /// ADVERTISE and DISCONNECT which answer to themselves. Returns `None`
    /// when the next value is reserved or out of range.
    pub fn respond_type(self) -> Option<Self> {
        match self {
            MsgType::Advertise | MsgType::Disconnect => Some(self),
            _ => MsgType::from_u8((self as u8).wrapping_add(1)),
        }
    }

    /// Acknowledgements that are only meaningful while the matching request
    /// is outstanding.
    pub fn is_correlated_response(self) -> bool {
        matches!(
            self,
            MsgType::ConnAck
                | MsgType::RegAck
                | MsgType::PubAck
                | MsgType::SubAck
                | MsgType::UnsubAck
                | MsgType::PingResp
                | MsgType::WillTopicResp
                | MsgType::WillMsgResp
        )
    }

    /// Messages a gateway may send at any time.
    pub fn is_unsolicited(self) -> bool {
        matches!(
            self,
            MsgType::Advertise
                | MsgType::GwInfo
                | MsgType::WillTopicReq
                | MsgType::WillMsgReq
                | MsgType::Register
                | MsgType::Publish
                | MsgType::PingReq
                | MsgType::Disconnect
        )
    }
}

/// Return code carried by acknowledgements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReturnCode {
    /// The request was accepted.
    Accepted = 0x00,
    /// Rejected: the gateway is congested, retry later.
    RejectedCongestion = 0x01,
    /// Rejected: the topic id is unknown to the receiver.
    RejectedInvalidTopicId = 0x02,
    /// Rejected: the request is not supported.
    RejectedNotSupported = 0x03,
}

impl ReturnCode {
    /// Map a raw return code byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(ReturnCode::Accepted),
            0x01 => Some(ReturnCode::RejectedCongestion),
            0x02 => Some(ReturnCode::RejectedInvalidTopicId),
            0x03 => Some(ReturnCode::RejectedNotSupported),
            _ => None,
        }
    }

    /// `true` for [`ReturnCode::Accepted`].
    pub fn is_accepted(self) -> bool {
        self == ReturnCode::Accepted
    }
}

/// Quality of Service levels, stored as their flag bits.
///
/// # Examples
///
/// ```rust
/// use libmqttsn::network::application::mqttsn::QoS;
///
/// assert_eq!(QoS::AtLeastOnce as u8, 0x20);
/// assert_eq!(QoS::from_flags(0x60), QoS::NoSession);
/// assert!(QoS::AtLeastOnce.is_high());
/// assert!(!QoS::NoSession.is_high());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QoS {
    /// **QoS 0**: fire and forget.
    AtMostOnce = 0x00,
    /// **QoS 1**: acknowledged with PUBACK.
    AtLeastOnce = 0x20,
    /// **QoS 2**: four-way handshake. The flag value is carried, the
    /// handshake itself is not implemented.
    ExactlyOnce = 0x40,
    /// **QoS -1**: publish to a predefined topic without a connection.
    NoSession = 0x60,
}

impl QoS {
    /// Extract the QoS bits from a flags byte.
    pub fn from_flags(flags: u8) -> Self {
        match flags & Flags::QOS_MASK {
            0x20 => QoS::AtLeastOnce,
            0x40 => QoS::ExactlyOnce,
            0x60 => QoS::NoSession,
            _ => QoS::AtMostOnce,
        }
    }

    /// Numeric level as the protocol names it (`-1` to `2`).
    pub fn level(self) -> i8 {
        match self {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
            QoS::NoSession => -1,
        }
    }

    /// Levels that expect an acknowledgement from the gateway.
    pub fn is_high(self) -> bool {
        matches!(self, QoS::AtLeastOnce | QoS::ExactlyOnce)
    }
}

/// How the topic field of PUBLISH, SUBSCRIBE and UNSUBSCRIBE is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TopicIdType {
    /// A topic id obtained through REGISTER, or a full topic name.
    Normal = 0x00,
    /// An id both sides agreed on out of band.
    Predefined = 0x01,
    /// A two-byte topic name.
    ShortName = 0x02,
}

impl TopicIdType {
    /// Extract the topic id type bits; `0b11` is reserved.
    pub fn from_flags(flags: u8) -> Option<Self> {
        match flags & Flags::TOPIC_ID_TYPE_MASK {
            0x00 => Some(TopicIdType::Normal),
            0x01 => Some(TopicIdType::Predefined),
            0x02 => Some(TopicIdType::ShortName),
            _ => None,
        }
    }
}

/// The one-byte flags field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    /// Retransmitted message.
    pub const DUP: u8 = 0x80;
    /// QoS bits.
    pub const QOS_MASK: u8 = 0x60;
    /// Gateway keeps the last message published on the topic.
    pub const RETAIN: u8 = 0x10;
    /// Client will send WILLTOPIC / WILLMSG during CONNECT.
    pub const WILL: u8 = 0x08;
    /// Start a clean session.
    pub const CLEAN_SESSION: u8 = 0x04;
    /// Topic id type bits.
    pub const TOPIC_ID_TYPE_MASK: u8 = 0x03;

    /// All flags cleared.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Wrap a raw flags byte.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw flags byte.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Replace the QoS bits.
    pub fn with_qos(mut self, qos: QoS) -> Self {
        self.0 = (self.0 & !Self::QOS_MASK) | qos as u8;
        self
    }

    /// Replace the topic id type bits.
    pub fn with_topic_id_type(mut self, kind: TopicIdType) -> Self {
        self.0 = (self.0 & !Self::TOPIC_ID_TYPE_MASK) | kind as u8;
        self
    }

    /// Set RETAIN.
    pub fn with_retain(mut self) -> Self {
        self.0 |= Self::RETAIN;
        self
    }

    /// Set WILL.
    pub fn with_will(mut self) -> Self {
        self.0 |= Self::WILL;
        self
    }

    /// Set CLEAN_SESSION.
    pub fn with_clean_session(mut self) -> Self {
        self.0 |= Self::CLEAN_SESSION;
        self
    }

    /// QoS encoded in the flags.
    pub fn qos(&self) -> QoS {
        QoS::from_flags(self.0)
    }

    /// Topic id type, `None` for the reserved value.
    pub fn topic_id_type(&self) -> Option<TopicIdType> {
        TopicIdType::from_flags(self.0)
    }

    /// DUP bit.
    pub fn is_dup(&self) -> bool {
        self.0 & Self::DUP != 0
    }

    /// RETAIN bit.
    pub fn is_retain(&self) -> bool {
        self.0 & Self::RETAIN != 0
    }

    /// WILL bit.
    pub fn is_will(&self) -> bool {
        self.0 & Self::WILL != 0
    }

    /// CLEAN_SESSION bit.
    pub fn is_clean_session(&self) -> bool {
        self.0 & Self::CLEAN_SESSION != 0
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Flags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Flags({=u8:#x})", self.0)
    }
}
