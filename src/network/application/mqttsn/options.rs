//! Client configuration.

use serde::Deserialize;

use super::types::{Flags, MAX_CLIENT_ID_LEN, N_RETRY, T_RETRY};
use crate::network::error::Error;

/// Configuration for an MQTT-SN client.
///
/// # Examples
///
/// ```rust
/// use libmqttsn::network::application::mqttsn::Options;
///
/// let options = Options {
///     client_id: "greenhouse-3",
///     keep_alive_seconds: 120,
///     ..Options::default()
/// };
/// assert!(options.validate().is_ok());
///
/// let parsed = Options::from_json(r#"{"client_id":"greenhouse-3","max_retries":2}"#).unwrap();
/// assert_eq!(parsed.max_retries, 2);
/// assert_eq!(parsed.retry_interval_ms, 15_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options<'a> {
    /// The client identifier, unique per gateway.
    ///
    /// # Constraints
    /// - Must be 1-23 bytes
    /// - Sent verbatim in CONNECT and PINGREQ
    pub client_id: &'a str,

    /// Keep-alive duration announced in CONNECT, in seconds.
    pub keep_alive_seconds: u16,

    /// Whether the gateway should discard previous session state.
    pub clean_session: bool,

    /// Whether CONNECT announces a will; the gateway then asks for it with
    /// WILLTOPICREQ and WILLMSGREQ.
    pub will: bool,

    /// Time to wait for an acknowledgement before retransmitting.
    pub retry_interval_ms: u32,

    /// Retransmissions before a request is abandoned.
    pub max_retries: u8,

    /// Age at which a partially received frame is discarded, `0` to wait
    /// forever.
    pub frame_timeout_ms: u32,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            client_id: "",
            keep_alive_seconds: 30,
            clean_session: true,
            will: false,
            retry_interval_ms: T_RETRY * 1000,
            max_retries: N_RETRY,
            frame_timeout_ms: 1000,
        }
    }
}

impl<'a> Options<'a> {
    /// Parse options from a JSON object. Missing fields keep their defaults.
    pub fn from_json(json: &'a str) -> Result<Self, Error> {
        let (options, _) =
            serde_json_core::from_str::<Options<'a>>(json).map_err(|_| Error::InvalidConfig)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the options against protocol limits.
    pub fn validate(&self) -> Result<(), Error> {
        if self.client_id.is_empty() || self.client_id.len() > MAX_CLIENT_ID_LEN {
            return Err(Error::InvalidConfig);
        }
        if self.retry_interval_ms == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// Flags byte for CONNECT.
    pub fn connect_flags(&self) -> Flags {
        let mut flags = Flags::new();
        if self.clean_session {
            flags = flags.with_clean_session();
        }
        if self.will {
            flags = flags.with_will();
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.retry_interval_ms, 15_000);
        assert_eq!(options.max_retries, 5);
        assert!(options.clean_session);
        // A client id is mandatory.
        assert_eq!(options.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_validate_client_id_length() {
        let mut options = Options {
            client_id: "abcdefghijklmnopqrstuvw",
            ..Options::default()
        };
        assert!(options.validate().is_ok());
        options.client_id = "abcdefghijklmnopqrstuvwx";
        assert_eq!(options.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_zero_retry_interval_rejected() {
        let options = Options {
            client_id: "dev",
            retry_interval_ms: 0,
            ..Options::default()
        };
        assert_eq!(options.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_from_json() {
        let options = Options::from_json(
            r#"{"client_id":"node-1","keep_alive_seconds":60,"will":true,"frame_timeout_ms":0}"#,
        )
        .unwrap();
        assert_eq!(options.client_id, "node-1");
        assert_eq!(options.keep_alive_seconds, 60);
        assert!(options.will);
        assert_eq!(options.frame_timeout_ms, 0);
        assert_eq!(options.max_retries, 5);

        assert_eq!(Options::from_json("{"), Err(Error::InvalidConfig));
        assert_eq!(Options::from_json(r#"{"will":true}"#), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_connect_flags() {
        let options = Options {
            client_id: "dev",
            will: true,
            ..Options::default()
        };
        let flags = options.connect_flags();
        assert!(flags.is_clean_session());
        assert!(flags.is_will());
    }
}
