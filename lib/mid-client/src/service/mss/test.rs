use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;
use similar_asserts::assert_eq;
use time::macros::datetime;

use super::{ComProtocolHandler, SoapProtocolHandler};
use crate::config::{ClientIdentity, SessionPoolConfig};
use crate::error::{FailureReason, MidFlowError, Operation};
use crate::model::profile::ProfileRequest;
use crate::model::receipt::{ReceiptRequest, SignatureTracking};
use crate::model::signature::{DataToBeSigned, SignatureRequest};
use crate::model::status::StatusCode;
use crate::proto::clock::MockClock;
use crate::proto::traffic_observer::{ComProtocol, MockTrafficObserver};
use crate::provider::mss_port::dto::{
    MessagingMode, MssSignatureResp, SignatureType, StatusCodeType, StatusType,
};
use crate::provider::mss_port::{MockMssPort, MockMssPortFactory, SoapFault, TransportError};
use crate::provider::session_pool::SessionPool;

const ENDPOINT: &str = "https://mid.example.ch/soap/services/MSS_SignaturePort";

fn identity() -> ClientIdentity {
    ClientIdentity {
        ap_id: "mid://dev.example.ch".to_string(),
        ap_password: SecretString::from("disabled"),
        mssp_id: "http://mid.swisscom.ch/".to_string(),
    }
}

fn clock() -> MockClock {
    let mut clock = MockClock::default();
    clock
        .expect_now_utc()
        .returning(|| datetime!(2026-03-01 10:00:00 UTC));
    clock
}

fn handler_with_pool(
    factory: MockMssPortFactory,
    pool_config: SessionPoolConfig,
) -> SoapProtocolHandler {
    let pool = SessionPool::new(Arc::new(factory), ENDPOINT, &pool_config);
    SoapProtocolHandler::new(identity(), Arc::new(pool), Arc::new(clock()))
}

fn handler(factory: MockMssPortFactory) -> SoapProtocolHandler {
    handler_with_pool(factory, SessionPoolConfig::default())
}

fn factory_with_port(port: MockMssPort) -> MockMssPortFactory {
    let mut factory = MockMssPortFactory::default();
    let mut port = Some(port);
    factory
        .expect_create_port()
        .times(1)
        .returning(move |_| match port.take() {
            Some(port) => Ok(Box::new(port)),
            None => Err(TransportError::Connection("no second port".to_string())),
        });
    factory
}

fn no_port_factory() -> MockMssPortFactory {
    let mut factory = MockMssPortFactory::default();
    factory.expect_create_port().never();
    factory
}

fn signature_request() -> SignatureRequest {
    SignatureRequest::new("+41790000000", DataToBeSigned::text("Log in to example.ch?"))
}

fn tracking() -> SignatureTracking {
    SignatureTracking {
        ap_trans_id: "ID-1".to_string(),
        mssp_trans_id: "h29ah1".to_string(),
        msisdn: "+41790000000".to_string(),
        signature_profile: "http://mid.swisscom.ch/MID/v1/AuthProfile1".to_string(),
    }
}

fn signature_response() -> MssSignatureResp {
    MssSignatureResp {
        mssp_trans_id: Some("h29ah1".to_string()),
        signature_profile: Some("http://mid.swisscom.ch/MID/v1/AuthProfile1".into()),
        mss_signature: Some(SignatureType {
            base64_signature: b"MIIFwQYJKoZIhvcNAQcC".to_vec(),
        }),
        status: Some(StatusType {
            status_code: Some(StatusCodeType { value: Some(500) }),
            status_message: Some("SIGNATURE".to_string()),
            status_detail: None,
        }),
    }
}

#[tokio::test]
async fn test_sync_signature_success() {
    let sent_trans_id = Arc::new(Mutex::new(None));
    let notified_trans_id = Arc::new(Mutex::new(None));

    let mut port = MockMssPort::default();
    let sent = sent_trans_id.clone();
    port.expect_mss_signature()
        .times(1)
        .withf(|request, observer| {
            request.messaging_mode == MessagingMode::Synch && observer.is_some()
        })
        .returning(move |request, _| {
            *sent.lock().unwrap() = Some(request.ap_info.ap_trans_id);
            Ok(Some(signature_response()))
        });
    port.expect_close().never();

    let mut observer = MockTrafficObserver::default();
    let notified = notified_trans_id.clone();
    observer
        .expect_notify_of_generated_ap_trans_id()
        .times(1)
        .withf(|_, protocol| *protocol == ComProtocol::Soap)
        .returning(move |id, _| {
            *notified.lock().unwrap() = Some(id.to_string());
        });

    let handler = handler(factory_with_port(port));
    let mut request = signature_request();
    request.traffic_observer = Some(Arc::new(observer));

    let response = handler.request_sync_signature(&request).await.unwrap();

    assert_eq!(response.status.code, StatusCode::Signature);
    assert_eq!(response.base64_signature.as_deref(), Some("MIIFwQYJKoZIhvcNAQcC"));
    assert_eq!(response.mssp_trans_id.as_deref(), Some("h29ah1"));

    let sent = sent_trans_id.lock().unwrap().clone().unwrap();
    let notified = notified_trans_id.lock().unwrap().clone().unwrap();
    assert_eq!(sent, notified);
    assert!(sent.starts_with("ID-"));

    assert_eq!(handler.pool().idle_count(), 1);
    assert_eq!(handler.pool().in_use(), 0);
}

#[tokio::test]
async fn test_sync_signature_without_observer() {
    let mut port = MockMssPort::default();
    port.expect_mss_signature()
        .times(1)
        .withf(|_, observer| observer.is_none())
        .returning(|_, _| Ok(Some(signature_response())));

    let handler = handler(factory_with_port(port));

    let response = handler
        .request_sync_signature(&signature_request())
        .await
        .unwrap();
    assert!(response.status.is_success());
}

#[tokio::test]
async fn test_sync_signature_absent_response_is_internal_error() {
    let mut port = MockMssPort::default();
    port.expect_mss_signature()
        .times(1)
        .returning(|_, _| Ok(None));

    let handler = handler(factory_with_port(port));

    let response = handler
        .request_sync_signature(&signature_request())
        .await
        .unwrap();

    assert_eq!(response.status.code, StatusCode::InternalError);
    assert!(response.status.message.is_some_and(|m| !m.is_empty()));
    assert_eq!(handler.pool().idle_count(), 1);
}

#[tokio::test]
async fn test_sync_signature_fault_discards_session() {
    let mut port = MockMssPort::default();
    port.expect_mss_signature().times(1).returning(|_, _| {
        Err(TransportError::Fault(SoapFault {
            code: Some("soapenv:Receiver".to_string()),
            subcode: Some("mss:_401".to_string()),
            reason: Some("USER_CANCEL".to_string()),
            detail: None,
        }))
    });
    port.expect_close().times(1).returning(|| Ok(()));

    let handler = handler(factory_with_port(port));

    let error = handler
        .request_sync_signature(&signature_request())
        .await
        .unwrap_err();

    assert_eq!(error.failure_reason(), FailureReason::UserCancelled);
    assert_eq!(error.fault_detail().and_then(|d| d.raw_code), Some(401));
    assert!(!error.is_retryable());
    assert_eq!(handler.pool().idle_count(), 0);
    assert_eq!(handler.pool().in_use(), 0);
}

#[tokio::test]
async fn test_sync_signature_transport_failure_is_service_failure() {
    let mut port = MockMssPort::default();
    port.expect_mss_signature()
        .times(1)
        .returning(|_, _| Err(TransportError::Timeout("read timed out".to_string())));
    port.expect_close()
        .times(1)
        .returning(|| Err(TransportError::Connection("already closed".to_string())));

    let handler = handler(factory_with_port(port));

    let error = handler
        .request_sync_signature(&signature_request())
        .await
        .unwrap_err();

    assert_eq!(error.failure_reason(), FailureReason::ServiceFailure);
    assert!(matches!(error, MidFlowError::ServiceFailure { .. }));
    assert_eq!(handler.pool().idle_count(), 0);
}

#[tokio::test]
async fn test_sync_signature_invalid_version_makes_no_call() {
    let mut observer = MockTrafficObserver::default();
    observer.expect_notify_of_generated_ap_trans_id().never();

    let handler = handler(no_port_factory());
    let mut request = signature_request();
    request.major_version = "v1".to_string();
    request.traffic_observer = Some(Arc::new(observer));

    let error = handler.request_sync_signature(&request).await.unwrap_err();

    assert_eq!(error.failure_reason(), FailureReason::InvalidInput);
    assert!(matches!(error, MidFlowError::InvalidInput(_)));
}

#[tokio::test]
async fn test_sync_signature_saturated_pool_is_retryable() {
    let mut port = MockMssPort::default();
    port.expect_mss_signature().never();

    let handler = handler_with_pool(
        factory_with_port(port),
        SessionPoolConfig {
            max_sessions: 1,
            max_wait: Duration::ZERO,
        },
    );

    let _held = handler.pool().borrow().await.unwrap();

    let error = handler
        .request_sync_signature(&signature_request())
        .await
        .unwrap_err();

    assert_eq!(error.failure_reason(), FailureReason::PoolExhausted);
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_unsupported_operations_fail_without_borrow() {
    let handler = handler(no_port_factory());

    let error = handler
        .request_async_signature(&signature_request())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        MidFlowError::UnsupportedOperation(Operation::AsyncSignature)
    ));

    let error = handler
        .poll_signature_status(&tracking())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        MidFlowError::UnsupportedOperation(Operation::SignatureStatusPoll)
    ));

    let receipt = ReceiptRequest {
        message: "Login successful".to_string(),
        mime_type: "text/plain".to_string(),
        encoding: "UTF-8".to_string(),
        user_response_required: false,
    };
    let error = handler
        .request_sync_receipt(&tracking(), &receipt)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        MidFlowError::UnsupportedOperation(Operation::SyncReceipt)
    ));

    let profile = ProfileRequest {
        msisdn: "+41790000000".to_string(),
        extension_params: vec![],
        traffic_observer: None,
    };
    let error = handler.request_profile(&profile).await.unwrap_err();
    assert_eq!(error.failure_reason(), FailureReason::UnsupportedOperation);

    assert_eq!(handler.pool().in_use(), 0);
    assert_eq!(handler.pool().idle_count(), 0);
}

#[test]
fn test_implemented_protocol_is_soap() {
    assert_eq!(handler(no_port_factory()).implemented_protocol(), ComProtocol::Soap);
}
