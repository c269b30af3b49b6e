//! Domain signature request to wire request translation.

use thiserror::Error;
use uuid::Uuid;

use crate::config::ClientIdentity;
use crate::model::signature::{AdditionalService, SignatureRequest};
use crate::proto::clock::Clock;
use crate::provider::mss_port::dto::{
    AdditionalServiceType, AdditionalServices, ApInfo, DataType, MeshMember, MessagingMode,
    MobileUserType, MsspInfo, MssSignatureReq, MssUri, ServiceParameter,
};

#[derive(Debug, Error)]
pub enum RequestBuildError {
    #[error("Invalid major version `{0}`: not a number")]
    InvalidMajorVersion(String),
    #[error("Invalid minor version `{0}`: not a number")]
    InvalidMinorVersion(String),
}

pub fn generate_ap_trans_id() -> String {
    format!("ID-{}", Uuid::new_v4())
}

pub fn build_signature_request(
    identity: &ClientIdentity,
    request: &SignatureRequest,
    synchronous: bool,
    clock: &dyn Clock,
) -> Result<MssSignatureReq, RequestBuildError> {
    let major_version = request
        .major_version
        .trim()
        .parse()
        .map_err(|_| RequestBuildError::InvalidMajorVersion(request.major_version.clone()))?;
    let minor_version = request
        .minor_version
        .trim()
        .parse()
        .map_err(|_| RequestBuildError::InvalidMinorVersion(request.minor_version.clone()))?;

    let messaging_mode = if synchronous {
        MessagingMode::Synch
    } else {
        MessagingMode::AsynchClientServer
    };

    Ok(MssSignatureReq {
        major_version,
        minor_version,
        time_out: request.user_response_timeout_seconds,
        messaging_mode,
        ap_info: ApInfo {
            ap_id: identity.ap_id.clone(),
            ap_pwd: identity.ap_password.clone(),
            ap_trans_id: generate_ap_trans_id(),
            instant: clock.now_utc(),
        },
        mssp_info: MsspInfo {
            mssp_id: MeshMember {
                uri: identity.mssp_id.clone(),
            },
        },
        mobile_user: MobileUserType {
            msisdn: request.mobile_user.msisdn.clone(),
        },
        data_to_be_signed: DataType {
            mime_type: request.data_to_be_signed.mime_type.clone(),
            encoding: request.data_to_be_signed.encoding.clone(),
            value: request.data_to_be_signed.data.clone(),
        },
        signature_profile: request.signature_profile.as_str().into(),
        additional_services: build_additional_services(&request.additional_services),
    })
}

fn build_additional_services(services: &[AdditionalService]) -> Option<AdditionalServices> {
    if services.is_empty() {
        return None;
    }

    let services = services
        .iter()
        .map(|service| {
            let parameters = match service {
                AdditionalService::UserLanguage { language } => {
                    vec![ServiceParameter::UserLang(language.to_string())]
                }
                AdditionalService::SubscriberInfo
                | AdditionalService::Geofencing
                | AdditionalService::Other { .. } => vec![],
            };

            AdditionalServiceType {
                description: MssUri::from(service.uri()),
                parameters,
            }
        })
        .collect();

    Some(AdditionalServices { services })
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use rstest::rstest;
    use secrecy::{ExposeSecret, SecretString};
    use similar_asserts::assert_eq;
    use time::macros::datetime;

    use super::*;
    use crate::model::signature::{
        ADDITIONAL_SERVICE_SUBSCRIBER_INFO_URI, ADDITIONAL_SERVICE_USER_LANG_URI, DataToBeSigned,
        UserLanguage,
    };
    use crate::proto::clock::MockClock;

    fn identity() -> ClientIdentity {
        ClientIdentity {
            ap_id: "mid://dev.example.ch".to_string(),
            ap_password: SecretString::from("disabled"),
            mssp_id: "http://mid.swisscom.ch/".to_string(),
        }
    }

    fn fixed_clock() -> MockClock {
        let mut clock = MockClock::default();
        clock
            .expect_now_utc()
            .returning(|| datetime!(2026-03-01 10:00:00 UTC));
        clock
    }

    fn request() -> SignatureRequest {
        SignatureRequest::new("+41790000000", DataToBeSigned::text("Log in to example.ch?"))
    }

    #[test]
    fn test_build_maps_fields() {
        let mut request = request();
        request.user_response_timeout_seconds = 120;

        let wire = build_signature_request(&identity(), &request, true, &fixed_clock()).unwrap();

        assert_eq!(wire.major_version, 1);
        assert_eq!(wire.minor_version, 1);
        assert_eq!(wire.time_out, 120);
        assert_eq!(wire.messaging_mode, MessagingMode::Synch);
        assert_eq!(wire.ap_info.ap_id, "mid://dev.example.ch");
        assert_eq!(wire.ap_info.ap_pwd.expose_secret(), "disabled");
        assert_eq!(wire.ap_info.instant, datetime!(2026-03-01 10:00:00 UTC));
        assert_eq!(wire.mssp_info.mssp_id.uri, "http://mid.swisscom.ch/");
        assert_eq!(wire.mobile_user.msisdn, "+41790000000");
        assert_eq!(wire.data_to_be_signed.value, "Log in to example.ch?");
        assert_eq!(wire.data_to_be_signed.mime_type, "text/plain");
        assert_eq!(wire.data_to_be_signed.encoding, "UTF-8");
        assert_eq!(
            wire.signature_profile.mss_uri,
            "http://mid.swisscom.ch/MID/v1/AuthProfile1"
        );
        assert!(wire.ap_info.ap_trans_id.starts_with("ID-"));
    }

    #[test]
    fn test_build_async_messaging_mode() {
        let wire = build_signature_request(&identity(), &request(), false, &fixed_clock()).unwrap();
        assert_eq!(wire.messaging_mode, MessagingMode::AsynchClientServer);
    }

    #[test]
    fn test_build_without_additional_services_omits_field() {
        let wire = build_signature_request(&identity(), &request(), true, &fixed_clock()).unwrap();

        assert!(wire.additional_services.is_none());
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("AdditionalServices").is_none());
    }

    #[test]
    fn test_build_additional_services_in_order() {
        let mut request = request();
        request.additional_services = vec![
            AdditionalService::SubscriberInfo,
            AdditionalService::UserLanguage {
                language: UserLanguage::Fr,
            },
        ];

        let wire = build_signature_request(&identity(), &request, true, &fixed_clock()).unwrap();
        let services = wire.additional_services.unwrap().services;

        assert_eq!(
            services,
            vec![
                AdditionalServiceType {
                    description: ADDITIONAL_SERVICE_SUBSCRIBER_INFO_URI.into(),
                    parameters: vec![],
                },
                AdditionalServiceType {
                    description: ADDITIONAL_SERVICE_USER_LANG_URI.into(),
                    parameters: vec![ServiceParameter::UserLang("fr".to_string())],
                },
            ]
        );
    }

    #[test]
    fn test_build_generates_distinct_trans_ids_and_monotonic_instants() {
        let mut clock = MockClock::default();
        let mut seq = mockall::Sequence::new();
        clock
            .expect_now_utc()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| datetime!(2026-03-01 10:00:00 UTC));
        clock
            .expect_now_utc()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| datetime!(2026-03-01 10:00:01 UTC));

        let request = request();
        let first = build_signature_request(&identity(), &request, true, &clock).unwrap();
        let second = build_signature_request(&identity(), &request, true, &clock).unwrap();

        assert_ne!(first.ap_info.ap_trans_id, second.ap_info.ap_trans_id);
        assert!(first.ap_info.instant <= second.ap_info.instant);
    }

    #[test]
    fn test_generated_trans_ids_are_unique() {
        let ids: HashSet<_> = (0..100).map(|_| generate_ap_trans_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[rstest]
    #[case("one", "1")]
    #[case("", "1")]
    #[case("1.0", "1")]
    fn test_build_rejects_non_numeric_major_version(#[case] major: &str, #[case] minor: &str) {
        let mut request = request();
        request.major_version = major.to_string();
        request.minor_version = minor.to_string();

        let result = build_signature_request(&identity(), &request, true, &fixed_clock());
        assert!(matches!(result, Err(RequestBuildError::InvalidMajorVersion(v)) if v == major));
    }

    #[test]
    fn test_build_rejects_non_numeric_minor_version() {
        let mut request = request();
        request.minor_version = "x".to_string();

        let result = build_signature_request(&identity(), &request, true, &fixed_clock());
        assert!(matches!(result, Err(RequestBuildError::InvalidMinorVersion(v)) if v == "x"));
    }
}
