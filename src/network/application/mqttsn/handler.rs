//! Application callbacks and disconnect reasons.

use super::types::{Flags, ReturnCode};

/// Why the client considers the session over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisconnectReason {
    /// The gateway sent DISCONNECT (or acknowledged ours).
    Gateway {
        /// Sleep duration echoed by the gateway, if any.
        duration: Option<u16>,
    },
    /// The outstanding request ran out of retries.
    Timeout,
}

/// Application callbacks invoked by [`Client`](super::Client) while polling.
///
/// Every method has an empty default so implementors only override what they
/// care about. Protocol bookkeeping (topic table updates, automatic PINGRESP
/// and PUBACK replies) happens before the callback runs.
#[allow(unused_variables)]
pub trait Handler {
    /// A gateway announced itself.
    fn on_advertise(&mut self, gw_id: u8, duration: u16) {}

    /// Answer to SEARCHGW, or another client's GWINFO overheard.
    fn on_gwinfo(&mut self, gw_id: u8, address: &[u8]) {}

    /// Answer to CONNECT.
    fn on_connack(&mut self, return_code: ReturnCode) {}

    /// The gateway asks for the will topic during CONNECT.
    fn on_will_topic_req(&mut self) {}

    /// The gateway asks for the will message during CONNECT.
    fn on_will_msg_req(&mut self) {}

    /// The gateway assigned `topic_id` to `topic` on its own initiative.
    fn on_register(&mut self, topic_id: u16, topic: &str) {}

    /// Answer to REGISTER.
    fn on_regack(&mut self, topic_id: u16, return_code: ReturnCode) {}

    /// A message arrived on `topic_id`.
    ///
    /// `topic` is the name from the topic table when the id is known there.
    fn on_publish(&mut self, topic_id: u16, topic: Option<&str>, flags: Flags, data: &[u8]) {}

    /// Answer to a QoS 1 PUBLISH.
    fn on_puback(&mut self, topic_id: u16, return_code: ReturnCode) {}

    /// Answer to SUBSCRIBE.
    fn on_suback(&mut self, topic_id: u16, flags: Flags, return_code: ReturnCode) {}

    /// Answer to UNSUBSCRIBE.
    fn on_unsuback(&mut self) {}

    /// The gateway pinged us; PINGRESP has already been sent.
    fn on_pingreq(&mut self) {}

    /// Answer to PINGREQ.
    fn on_pingresp(&mut self) {}

    /// The session ended, either by the gateway or by timeout.
    fn on_disconnect(&mut self, reason: DisconnectReason) {}

    /// Answer to WILLTOPICUPD.
    fn on_will_topic_resp(&mut self, return_code: ReturnCode) {}

    /// Answer to WILLMSGUPD.
    fn on_will_msg_resp(&mut self, return_code: ReturnCode) {}
}

/// A handler that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl Handler for NoopHandler {}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_advertise(&mut self, gw_id: u8, duration: u16) {
        (**self).on_advertise(gw_id, duration)
    }

    fn on_gwinfo(&mut self, gw_id: u8, address: &[u8]) {
        (**self).on_gwinfo(gw_id, address)
    }

    fn on_connack(&mut self, return_code: ReturnCode) {
        (**self).on_connack(return_code)
    }

    fn on_will_topic_req(&mut self) {
        (**self).on_will_topic_req()
    }

    fn on_will_msg_req(&mut self) {
        (**self).on_will_msg_req()
    }

    fn on_register(&mut self, topic_id: u16, topic: &str) {
        (**self).on_register(topic_id, topic)
    }

    fn on_regack(&mut self, topic_id: u16, return_code: ReturnCode) {
        (**self).on_regack(topic_id, return_code)
    }

    fn on_publish(&mut self, topic_id: u16, topic: Option<&str>, flags: Flags, data: &[u8]) {
        (**self).on_publish(topic_id, topic, flags, data)
    }

    fn on_puback(&mut self, topic_id: u16, return_code: ReturnCode) {
        (**self).on_puback(topic_id, return_code)
    }

    fn on_suback(&mut self, topic_id: u16, flags: Flags, return_code: ReturnCode) {
        (**self).on_suback(topic_id, flags, return_code)
    }

    fn on_unsuback(&mut self) {
        (**self).on_unsuback()
    }

    fn on_pingreq(&mut self) {
        (**self).on_pingreq()
    }

    fn on_pingresp(&mut self) {
        (**self).on_pingresp()
    }

    fn on_disconnect(&mut self, reason: DisconnectReason) {
        (**self).on_disconnect(reason)
    }

    fn on_will_topic_resp(&mut self, return_code: ReturnCode) {
        (**self).on_will_topic_resp(return_code)
    }

    fn on_will_msg_resp(&mut self, return_code: ReturnCode) {
        (**self).on_will_msg_resp(return_code)
    }
}
