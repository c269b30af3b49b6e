//! Call-scoped observation of the traffic generated for one protocol operation.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Transport variant that issued a request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ComProtocol {
    Soap,
}

/// Hook supplied by the caller of a single operation.
///
/// The generated transaction id is reported exactly once per call. Transport
/// ports may additionally report the raw messages they exchange.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait TrafficObserver: Send + Sync {
    fn notify_of_generated_ap_trans_id(&self, ap_trans_id: &str, protocol: ComProtocol);

    fn notify_of_outgoing_request(&self, _request: &str, _protocol: ComProtocol) {}

    fn notify_of_incoming_response(&self, _response: &str, _protocol: ComProtocol) {}
}
