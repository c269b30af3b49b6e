//! Wire response to domain response translation.

use thiserror::Error;

use crate::model::profile::{
    CertificateChain, CertificateData, CertificateState, DeviceClass, DeviceInfo, DeviceState,
    ProfileCertificate, ProfileMobileUserInfo, ProfileResponse,
};
use crate::model::signature::{
    ADDITIONAL_SERVICE_GEOFENCING_URI, ADDITIONAL_SERVICE_SUBSCRIBER_INFO_URI,
    AdditionalServiceResponse, GeofencingResponse, SignatureResponse,
};
use crate::model::status::Status;
use crate::provider::mss_port::dto::{
    CertificateElement, CertificateType, MssProfileResp, MssSignatureResp, ProfileMobileUser,
    ProfileQueryExtension, ServiceResponse, Sscd, StatusDetailElement, StatusType,
};

pub const NULL_RESPONSE_MESSAGE: &str = "Invalid MSS Signature response (it was NULL)";
pub const MISSING_STATUS_MESSAGE: &str = "Invalid MSS Signature response status";

#[derive(Debug, Error)]
pub enum ResponseAssemblyError {
    #[error("Unexpected certificate element at index {index}")]
    UnexpectedCertificateElement { index: usize },
}

pub fn assemble_signature_response(response: Option<MssSignatureResp>) -> SignatureResponse {
    let Some(response) = response else {
        return SignatureResponse::with_status(Status::internal_error(NULL_RESPONSE_MESSAGE));
    };

    let additional_service_responses = response
        .status
        .as_ref()
        .map(additional_service_responses)
        .unwrap_or_default();

    SignatureResponse {
        signature_profile: response.signature_profile.map(|profile| profile.mss_uri),
        base64_signature: response
            .mss_signature
            .map(|signature| String::from_utf8_lossy(&signature.base64_signature).into_owned()),
        mssp_trans_id: response.mssp_trans_id,
        status: assemble_status(response.status),
        additional_service_responses,
    }
}

fn assemble_status(status: Option<StatusType>) -> Status {
    match status {
        Some(status) => Status::from_wire(
            status.status_code.and_then(|code| code.value),
            status.status_message,
        ),
        None => Status::internal_error(MISSING_STATUS_MESSAGE),
    }
}

fn additional_service_responses(status: &StatusType) -> Vec<AdditionalServiceResponse> {
    let Some(detail) = &status.status_detail else {
        return vec![];
    };

    detail
        .elements
        .iter()
        .filter_map(|element| match element {
            StatusDetailElement::ServiceResponses(responses) => Some(&responses.service_responses),
            _ => None,
        })
        .flatten()
        .flat_map(service_response)
        .collect()
}

/// A payload counts only when the description names its service.
fn service_response(response: &ServiceResponse) -> Vec<AdditionalServiceResponse> {
    let mut result = vec![];
    let description = response
        .description
        .as_ref()
        .map(|description| description.mss_uri.as_str());

    if let (Some(ADDITIONAL_SERVICE_SUBSCRIBER_INFO_URI), Some(subscriber_info)) =
        (description, &response.subscriber_info)
    {
        result.extend(subscriber_info.details.iter().map(|detail| {
            AdditionalServiceResponse::SubscriberInfo {
                response_id: detail.id.clone(),
                response_value: detail.value.clone(),
            }
        }));
    }

    if let (Some(ADDITIONAL_SERVICE_GEOFENCING_URI), Some(geofencing)) =
        (description, &response.geofencing)
    {
        result.push(AdditionalServiceResponse::Geofencing(GeofencingResponse {
            country: geofencing.country.clone(),
            accuracy: geofencing.accuracy,
            timestamp: geofencing.timestamp,
            device_confidence: geofencing.device_confidence,
            location_confidence: geofencing.location_confidence,
            error_code: geofencing.error_code.clone(),
            error_message: geofencing.error_message.clone(),
        }));
    }

    result
}

pub fn assemble_profile_response(
    response: MssProfileResp,
) -> Result<ProfileResponse, ResponseAssemblyError> {
    let signature_profiles = response
        .signature_profiles
        .into_iter()
        .map(|profile| profile.mss_uri)
        .collect();

    let Some(extension) = response.status.and_then(profile_query_extension) else {
        return Ok(ProfileResponse {
            signature_profiles,
            ..Default::default()
        });
    };

    let devices = extension
        .sscds
        .map(|sscds| {
            let sim = sscds.sim.map(|sim| (DeviceClass::Sim, sim));
            let apps = sscds.app.into_iter().map(|app| (DeviceClass::App, app));

            sim.into_iter()
                .chain(apps)
                .map(|(class, sscd)| device_info(class, sscd))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    Ok(ProfileResponse {
        signature_profiles,
        mobile_user: extension.mobile_user.map(mobile_user_info),
        devices,
    })
}

fn profile_query_extension(status: StatusType) -> Option<ProfileQueryExtension> {
    status
        .status_detail?
        .elements
        .into_iter()
        .find_map(|element| match element {
            StatusDetailElement::ProfileQueryExtension(extension) => Some(extension),
            _ => None,
        })
}

fn mobile_user_info(user: ProfileMobileUser) -> ProfileMobileUserInfo {
    ProfileMobileUserInfo {
        recovery_code_created: user.recovery_code_created.unwrap_or_default(),
        auto_activation: user
            .auto_activation
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true")),
    }
}

fn device_info(class: DeviceClass, sscd: Sscd) -> Result<DeviceInfo, ResponseAssemblyError> {
    let certificates = sscd
        .mobile_user_certificates
        .into_iter()
        .map(profile_certificate)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DeviceInfo {
        class,
        state: DeviceState::from_raw(sscd.state.as_deref()),
        pin_blocked: sscd.pin_status.map(|status| status.blocked),
        certificates,
    })
}

fn profile_certificate(
    certificate: CertificateType,
) -> Result<ProfileCertificate, ResponseAssemblyError> {
    Ok(ProfileCertificate {
        state: CertificateState::from_raw(certificate.state.as_deref()),
        chain: unflatten_certificate_chain(&certificate.elements)?,
        algorithm: certificate.algorithm,
    })
}

enum ChainState {
    ExpectCertificate,
    ExpectSubjectName { certificate: String },
}

/// Rebuilds a certificate chain from its flat wire form
/// `[cert0, subject0, cert1, subject1, ...]`.
///
/// The first pair is the user certificate, every following pair a CA
/// certificate. Only the last subject name may be missing. An empty list yields
/// `Ok(None)`.
pub fn unflatten_certificate_chain(
    elements: &[CertificateElement],
) -> Result<Option<CertificateChain>, ResponseAssemblyError> {
    let mut certificates = Vec::with_capacity(elements.len().div_ceil(2));
    let mut state = ChainState::ExpectCertificate;

    for (index, element) in elements.iter().enumerate() {
        state = match (state, element) {
            (ChainState::ExpectCertificate, CertificateElement::X509Certificate(bytes)) => {
                ChainState::ExpectSubjectName {
                    certificate: String::from_utf8_lossy(bytes).into_owned(),
                }
            }
            (
                ChainState::ExpectSubjectName { certificate },
                CertificateElement::X509SubjectName(subject_name),
            ) => {
                certificates.push(CertificateData {
                    certificate_as_base64: certificate,
                    subject_name: Some(subject_name.clone()),
                });
                ChainState::ExpectCertificate
            }
            _ => return Err(ResponseAssemblyError::UnexpectedCertificateElement { index }),
        };
    }

    if let ChainState::ExpectSubjectName { certificate } = state {
        certificates.push(CertificateData {
            certificate_as_base64: certificate,
            subject_name: None,
        });
    }

    let mut certificates = certificates.into_iter();
    Ok(certificates.next().map(|user_certificate| CertificateChain {
        user_certificate,
        ca_certificates: certificates.collect(),
    }))
}
