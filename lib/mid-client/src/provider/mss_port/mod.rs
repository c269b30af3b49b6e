//! Boundary to the SOAP/HTTP binding of the MSS signature service.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::proto::traffic_observer::TrafficObserver;

pub mod dto;

/// Stateful client bound to one MSS service endpoint.
///
/// Not required to be safe for concurrent calls: the session pool hands each
/// port to at most one caller at a time.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait MssPort: Send + Sync {
    /// `Ok(None)` when the call completed without a response body.
    async fn mss_signature(
        &self,
        request: dto::MssSignatureReq,
        observer: Option<Arc<dyn TrafficObserver>>,
    ) -> Result<Option<dto::MssSignatureResp>, TransportError>;

    /// Releases the underlying channel of a port that will not be reused.
    async fn close(&self) -> Result<(), TransportError>;
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait MssPortFactory: Send + Sync {
    async fn create_port(&self, endpoint: &str) -> Result<Box<dyn MssPort>, TransportError>;
}

/// Structured fault returned by the remote party at the protocol layer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SoapFault {
    /// e.g. `soapenv:Receiver`
    pub code: Option<String>,
    /// e.g. `mss:_105`
    pub subcode: Option<String>,
    pub reason: Option<String>,
    pub detail: Option<String>,
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code: {}, subcode: {}, reason: {}",
            self.code.as_deref().unwrap_or("<None>"),
            self.subcode.as_deref().unwrap_or("<None>"),
            self.reason.as_deref().unwrap_or("<None>"),
        )
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("SOAP fault: {0}")]
    Fault(SoapFault),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Decoding error: {0}")]
    Decode(String),
    #[error("Other transport error: {0}")]
    Other(#[from] anyhow::Error),
}
