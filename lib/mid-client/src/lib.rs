//! Client side of the ETSI TS 102 204 Mobile Signature Service.

use std::sync::Arc;

use config::{ClientConfig, ConfigValidationError};
use error::MidFlowError;
use model::profile::{ProfileRequest, ProfileResponse};
use model::receipt::{ReceiptRequest, ReceiptResponse, SignatureTracking};
use model::signature::{SignatureRequest, SignatureResponse};
use proto::clock::{Clock, DefaultClock};
use provider::mss_port::MssPortFactory;
use provider::session_pool::SessionPool;
use service::mss::{ComProtocolHandler, SoapProtocolHandler};

pub mod config;
pub mod error;
pub mod model;
pub mod proto;
pub mod provider;
pub mod service;


pub struct MidClient {
    handler: SoapProtocolHandler,
}

impl MidClient {
    pub fn new(
        config: ClientConfig,
        port_factory: Arc<dyn MssPortFactory>,
    ) -> Result<Self, ConfigValidationError> {
        config.validate()?;

        let pool = SessionPool::new(
            port_factory,
            config.urls.signature_service.as_str(),
            &config.pool,
        );

        tracing::debug!(
            endpoint = pool.endpoint(),
            max_sessions = config.pool.max_sessions,
            "Created MID client"
        );

        Ok(Self {
            handler: SoapProtocolHandler::new(
                config.identity,
                Arc::new(pool),
                Arc::new(DefaultClock),
            ),
        })
    }

    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self {
            handler: self.handler.with_clock(clock),
        }
    }

    pub fn handler(&self) -> &dyn ComProtocolHandler {
        &self.handler
    }

    pub async fn request_sync_signature(
        &self,
        request: &SignatureRequest,
    ) -> Result<SignatureResponse, MidFlowError> {
        self.handler.request_sync_signature(request).await
    }

    pub async fn request_async_signature(
        &self,
        request: &SignatureRequest,
    ) -> Result<SignatureTracking, MidFlowError> {
        self.handler.request_async_signature(request).await
    }

    pub async fn poll_signature_status(
        &self,
        tracking: &SignatureTracking,
    ) -> Result<SignatureResponse, MidFlowError> {
        self.handler.poll_signature_status(tracking).await
    }

    pub async fn request_sync_receipt(
        &self,
        tracking: &SignatureTracking,
        request: &ReceiptRequest,
    ) -> Result<ReceiptResponse, MidFlowError> {
        self.handler.request_sync_receipt(tracking, request).await
    }

    pub async fn request_profile(
        &self,
        request: &ProfileRequest,
    ) -> Result<ProfileResponse, MidFlowError> {
        self.handler.request_profile(request).await
    }

    /// Closes idle sessions. Later calls fail with a service failure.
    pub async fn close(&self) {
        self.handler.close().await;
    }
}
