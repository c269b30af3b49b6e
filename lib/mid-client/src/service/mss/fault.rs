use crate::error::{FailureReason, FaultDetail, MidFlowError};
use crate::model::status::StatusCode;
use crate::provider::mss_port::{SoapFault, TransportError};

/// Classifies a protocol fault by its sub-code, e.g. `mss:_105`.
pub fn classify_soap_fault(fault: &SoapFault) -> FaultDetail {
    let raw_code = fault.subcode.as_deref().and_then(parse_subcode);
    let status = raw_code.and_then(StatusCode::lookup);

    FaultDetail {
        reason: FailureReason::from_fault_status(status),
        status,
        raw_code,
        fault_code: fault.code.clone(),
        fault_subcode: fault.subcode.clone(),
        fault_reason: fault.reason.clone(),
        fault_detail: fault.detail.clone(),
    }
}

fn parse_subcode(subcode: &str) -> Option<u32> {
    subcode.rsplit('_').next()?.trim().parse().ok()
}

pub fn classify_transport_error(error: TransportError) -> MidFlowError {
    match error {
        TransportError::Fault(fault) => MidFlowError::ProtocolFault(classify_soap_fault(&fault)),
        error => MidFlowError::ServiceFailure {
            message: "Failed to call the MSS signature service".to_string(),
            source: error.into(),
        },
    }
}
