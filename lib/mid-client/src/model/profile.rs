use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

use crate::proto::traffic_observer::TrafficObserver;

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub msisdn: String,
    pub extension_params: Vec<ProfileQueryParam>,
    #[serde(skip_serializing)]
    pub traffic_observer: Option<Arc<dyn TrafficObserver>>,
}

impl fmt::Debug for ProfileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileRequest")
            .field("msisdn", &self.msisdn)
            .field("extension_params", &self.extension_params)
            .field("traffic_observer", &self.traffic_observer.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, AsRefStr, Serialize)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ProfileQueryParam {
    Sscds,
    Certificates,
    RecoveryCodeCreated,
    AutoActivation,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub signature_profiles: Vec<String>,
    pub mobile_user: Option<ProfileMobileUserInfo>,
    /// `None` when the response carried no device list at all.
    pub devices: Option<Vec<DeviceInfo>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMobileUserInfo {
    pub recovery_code_created: bool,
    pub auto_activation: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceClass {
    Sim,
    App,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, AsRefStr, EnumString, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DeviceState {
    Active,
    Inactive,
    #[strum(disabled)]
    Unknown,
}

impl DeviceState {
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|state| state.parse().ok())
            .unwrap_or(Self::Unknown)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, AsRefStr, EnumString, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CertificateState {
    Active,
    Inactive,
    #[strum(disabled)]
    Unknown,
}

impl CertificateState {
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|state| state.parse().ok())
            .unwrap_or(Self::Unknown)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub class: DeviceClass,
    pub state: DeviceState,
    /// `None` when the device reported no pin status.
    pub pin_blocked: Option<bool>,
    pub certificates: Vec<ProfileCertificate>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCertificate {
    pub state: CertificateState,
    pub algorithm: Option<String>,
    pub chain: Option<CertificateChain>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateData {
    pub certificate_as_base64: String,
    pub subject_name: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateChain {
    pub user_certificate: CertificateData,
    /// Issuing CA certificates, in the order they appear on the wire.
    pub ca_certificates: Vec<CertificateData>,
}
