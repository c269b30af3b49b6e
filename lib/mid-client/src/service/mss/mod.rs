//! Orchestration of one MSS operation: build the wire request, run it on a
//! pooled session, then assemble the response or classify the failure.

use std::sync::Arc;

use futures::FutureExt;
use tracing::Instrument;

use crate::config::ClientIdentity;
use crate::error::{MidFlowError, Operation};
use crate::model::profile::{ProfileRequest, ProfileResponse};
use crate::model::receipt::{ReceiptRequest, ReceiptResponse, SignatureTracking};
use crate::model::signature::{SignatureRequest, SignatureResponse};
use crate::proto::clock::Clock;
use crate::proto::json::to_json;
use crate::proto::traffic_observer::ComProtocol;
use crate::provider::session_pool::SessionPool;

pub mod fault;
pub mod request;
pub mod response;

#[cfg(test)]
mod test;

use fault::classify_transport_error;
use request::build_signature_request;
use response::assemble_signature_response;

/// Entry point per transport variant.
///
/// Every remote call is attempted at most once. Operations a variant does not
/// support fail with [`MidFlowError::UnsupportedOperation`] without touching
/// the network.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait ComProtocolHandler: Send + Sync {
    fn implemented_protocol(&self) -> ComProtocol;

    async fn request_sync_signature(
        &self,
        request: &SignatureRequest,
    ) -> Result<SignatureResponse, MidFlowError>;

    async fn request_async_signature(
        &self,
        request: &SignatureRequest,
    ) -> Result<SignatureTracking, MidFlowError>;

    async fn poll_signature_status(
        &self,
        tracking: &SignatureTracking,
    ) -> Result<SignatureResponse, MidFlowError>;

    async fn request_sync_receipt(
        &self,
        tracking: &SignatureTracking,
        request: &ReceiptRequest,
    ) -> Result<ReceiptResponse, MidFlowError>;

    async fn request_profile(
        &self,
        request: &ProfileRequest,
    ) -> Result<ProfileResponse, MidFlowError>;
}

pub struct SoapProtocolHandler {
    identity: ClientIdentity,
    pool: Arc<SessionPool>,
    clock: Arc<dyn Clock>,
}

impl SoapProtocolHandler {
    pub fn new(identity: ClientIdentity, pool: Arc<SessionPool>, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity,
            pool,
            clock,
        }
    }

    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self { clock, ..self }
    }

    pub fn pool(&self) -> &SessionPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl ComProtocolHandler for SoapProtocolHandler {
    fn implemented_protocol(&self) -> ComProtocol {
        ComProtocol::Soap
    }

    async fn request_sync_signature(
        &self,
        request: &SignatureRequest,
    ) -> Result<SignatureResponse, MidFlowError> {
        let wire_request =
            build_signature_request(&self.identity, request, true, self.clock.as_ref())
                .inspect_err(|error| tracing::warn!(%error, "Invalid MSS signature request"))?;

        let ap_trans_id = wire_request.ap_info.ap_trans_id.clone();
        let span = tracing::info_span!("mss_sync_signature", %ap_trans_id);

        async move {
            if let Some(observer) = &request.traffic_observer {
                observer.notify_of_generated_ap_trans_id(&ap_trans_id, ComProtocol::Soap);
            }

            tracing::info!(request = %to_json(request), "Sending MSS signature request");

            let response = self
                .pool
                .with_session(request.traffic_observer.clone(), move |session| {
                    async move {
                        session
                            .mss_signature(wire_request)
                            .await
                            .map_err(classify_transport_error)
                    }
                    .boxed()
                })
                .await
                .inspect_err(|error| {
                    tracing::warn!(
                        %error,
                        reason = %error.failure_reason(),
                        "MSS signature request failed"
                    )
                })?;

            let response = assemble_signature_response(response);
            tracing::info!(response = %to_json(&response), "Received MSS signature response");

            Ok(response)
        }
        .instrument(span)
        .await
    }

    async fn request_async_signature(
        &self,
        _request: &SignatureRequest,
    ) -> Result<SignatureTracking, MidFlowError> {
        Err(MidFlowError::UnsupportedOperation(Operation::AsyncSignature))
    }

    async fn poll_signature_status(
        &self,
        _tracking: &SignatureTracking,
    ) -> Result<SignatureResponse, MidFlowError> {
        Err(MidFlowError::UnsupportedOperation(
            Operation::SignatureStatusPoll,
        ))
    }

    async fn request_sync_receipt(
        &self,
        _tracking: &SignatureTracking,
        _request: &ReceiptRequest,
    ) -> Result<ReceiptResponse, MidFlowError> {
        Err(MidFlowError::UnsupportedOperation(Operation::SyncReceipt))
    }

    async fn request_profile(
        &self,
        _request: &ProfileRequest,
    ) -> Result<ProfileResponse, MidFlowError> {
        Err(MidFlowError::UnsupportedOperation(Operation::ProfileQuery))
    }
}
