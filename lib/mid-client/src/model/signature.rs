use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};
use time::OffsetDateTime;

use super::status::Status;
use crate::proto::traffic_observer::TrafficObserver;

pub const ADDITIONAL_SERVICE_USER_LANG_URI: &str = "http://mss.ficom.fi/TS102204/v1.0.0#userLang";
pub const ADDITIONAL_SERVICE_SUBSCRIBER_INFO_URI: &str = "http://mid.swisscom.ch/as#subscriberInfo";
pub const ADDITIONAL_SERVICE_GEOFENCING_URI: &str = "http://mid.swisscom.ch/as#geofencing";

pub const DEFAULT_SIGNATURE_PROFILE: &str = "http://mid.swisscom.ch/MID/v1/AuthProfile1";
pub const DEFAULT_MAJOR_VERSION: &str = "1";
pub const DEFAULT_MINOR_VERSION: &str = "1";
pub const DEFAULT_USER_RESPONSE_TIMEOUT_SECONDS: u32 = 80;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileUser {
    /// International format, e.g. `+41791234567`.
    pub msisdn: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataToBeSigned {
    pub data: String,
    pub mime_type: String,
    pub encoding: String,
}

impl DataToBeSigned {
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: "text/plain".to_string(),
            encoding: "UTF-8".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, AsRefStr, EnumString, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserLanguage {
    En,
    De,
    Fr,
    It,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdditionalService {
    UserLanguage { language: UserLanguage },
    SubscriberInfo,
    Geofencing,
    Other { uri: String },
}

impl AdditionalService {
    pub fn uri(&self) -> &str {
        match self {
            Self::UserLanguage { .. } => ADDITIONAL_SERVICE_USER_LANG_URI,
            Self::SubscriberInfo => ADDITIONAL_SERVICE_SUBSCRIBER_INFO_URI,
            Self::Geofencing => ADDITIONAL_SERVICE_GEOFENCING_URI,
            Self::Other { uri } => uri,
        }
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest {
    pub mobile_user: MobileUser,
    pub data_to_be_signed: DataToBeSigned,
    pub signature_profile: String,
    pub major_version: String,
    pub minor_version: String,
    pub user_response_timeout_seconds: u32,
    pub additional_services: Vec<AdditionalService>,
    #[serde(skip_serializing)]
    pub traffic_observer: Option<Arc<dyn TrafficObserver>>,
}

impl SignatureRequest {
    pub fn new(msisdn: impl Into<String>, data_to_be_signed: DataToBeSigned) -> Self {
        Self {
            mobile_user: MobileUser {
                msisdn: msisdn.into(),
            },
            data_to_be_signed,
            signature_profile: DEFAULT_SIGNATURE_PROFILE.to_string(),
            major_version: DEFAULT_MAJOR_VERSION.to_string(),
            minor_version: DEFAULT_MINOR_VERSION.to_string(),
            user_response_timeout_seconds: DEFAULT_USER_RESPONSE_TIMEOUT_SECONDS,
            additional_services: vec![],
            traffic_observer: None,
        }
    }
}

impl fmt::Debug for SignatureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureRequest")
            .field("mobile_user", &self.mobile_user)
            .field("data_to_be_signed", &self.data_to_be_signed)
            .field("signature_profile", &self.signature_profile)
            .field("major_version", &self.major_version)
            .field("minor_version", &self.minor_version)
            .field(
                "user_response_timeout_seconds",
                &self.user_response_timeout_seconds,
            )
            .field("additional_services", &self.additional_services)
            .field("traffic_observer", &self.traffic_observer.is_some())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdditionalServiceResponse {
    SubscriberInfo {
        response_id: String,
        response_value: String,
    },
    Geofencing(GeofencingResponse),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofencingResponse {
    pub country: Option<String>,
    pub accuracy: Option<i32>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    pub device_confidence: Option<f32>,
    pub location_confidence: Option<f32>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureResponse {
    pub signature_profile: Option<String>,
    pub base64_signature: Option<String>,
    pub mssp_trans_id: Option<String>,
    pub status: Status,
    /// Order as found in the wire payload.
    pub additional_service_responses: Vec<AdditionalServiceResponse>,
}

impl SignatureResponse {
    pub(crate) fn with_status(status: Status) -> Self {
        Self {
            signature_profile: None,
            base64_signature: None,
            mssp_trans_id: None,
            status,
            additional_service_responses: vec![],
        }
    }
}
