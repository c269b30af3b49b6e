//! ETSI TS 102 204 message structures, as exchanged with the MSSP.
//!
//! Encoding onto SOAP/XML belongs to the transport; these types only fix the
//! shape and the element names.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MessagingMode {
    #[serde(rename = "synch")]
    Synch,
    #[serde(rename = "asynchClientServer")]
    AsynchClientServer,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MssUri {
    #[serde(rename = "mssURI")]
    pub mss_uri: String,
}

impl From<&str> for MssUri {
    fn from(uri: &str) -> Self {
        Self {
            mss_uri: uri.to_owned(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ApInfo {
    #[serde(rename = "AP_ID")]
    pub ap_id: String,
    #[serde(rename = "AP_PWD", serialize_with = "serialize_secret")]
    pub ap_pwd: SecretString,
    #[serde(rename = "AP_TransID")]
    pub ap_trans_id: String,
    #[serde(rename = "Instant", with = "time::serde::rfc3339")]
    pub instant: OffsetDateTime,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MsspInfo {
    #[serde(rename = "MSSP_ID")]
    pub mssp_id: MeshMember,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MeshMember {
    #[serde(rename = "URI")]
    pub uri: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MobileUserType {
    #[serde(rename = "MSISDN")]
    pub msisdn: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DataType {
    #[serde(rename = "MimeType")]
    pub mime_type: String,
    #[serde(rename = "Encoding")]
    pub encoding: String,
    #[serde(rename = "$value")]
    pub value: String,
}

/// Typed members of an additional service's parameter choice list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ServiceParameter {
    #[serde(rename = "UserLang")]
    UserLang(String),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdditionalServiceType {
    #[serde(rename = "Description")]
    pub description: MssUri,
    #[serde(rename = "$parameters", default)]
    pub parameters: Vec<ServiceParameter>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdditionalServices {
    #[serde(rename = "Service")]
    pub services: Vec<AdditionalServiceType>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MssSignatureReq {
    #[serde(rename = "MajorVersion")]
    pub major_version: u64,
    #[serde(rename = "MinorVersion")]
    pub minor_version: u64,
    #[serde(rename = "TimeOut")]
    pub time_out: u32,
    #[serde(rename = "MessagingMode")]
    pub messaging_mode: MessagingMode,
    #[serde(rename = "AP_Info")]
    pub ap_info: ApInfo,
    #[serde(rename = "MSSP_Info")]
    pub mssp_info: MsspInfo,
    #[serde(rename = "MobileUser")]
    pub mobile_user: MobileUserType,
    #[serde(rename = "DataToBeSigned")]
    pub data_to_be_signed: DataType,
    #[serde(rename = "SignatureProfile")]
    pub signature_profile: MssUri,
    /// Absent, never empty, when no additional service was requested.
    #[serde(
        rename = "AdditionalServices",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_services: Option<AdditionalServices>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MssSignatureResp {
    #[serde(rename = "MSSP_TransID", default)]
    pub mssp_trans_id: Option<String>,
    #[serde(rename = "SignatureProfile", default)]
    pub signature_profile: Option<MssUri>,
    #[serde(rename = "MSS_Signature", default)]
    pub mss_signature: Option<SignatureType>,
    #[serde(rename = "Status", default)]
    pub status: Option<StatusType>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignatureType {
    #[serde(rename = "Base64Signature")]
    pub base64_signature: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusType {
    #[serde(rename = "StatusCode", default)]
    pub status_code: Option<StatusCodeType>,
    #[serde(rename = "StatusMessage", default)]
    pub status_message: Option<String>,
    #[serde(rename = "StatusDetail", default)]
    pub status_detail: Option<StatusDetail>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatusCodeType {
    #[serde(rename = "Value", default)]
    pub value: Option<u32>,
}

/// Heterogeneous, ordered payload of a status detail.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusDetail {
    #[serde(rename = "$elements", default)]
    pub elements: Vec<StatusDetailElement>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StatusDetailElement {
    #[serde(rename = "ServiceResponses")]
    ServiceResponses(ServiceResponses),
    #[serde(rename = "ProfileQueryExtension")]
    ProfileQueryExtension(ProfileQueryExtension),
    /// Any element this client does not model.
    #[serde(rename = "Unknown")]
    Unknown(serde_json::Value),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponses {
    #[serde(rename = "ServiceResponse", default)]
    pub service_responses: Vec<ServiceResponse>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(rename = "Description", default)]
    pub description: Option<MssUri>,
    #[serde(rename = "SubscriberInfo", default)]
    pub subscriber_info: Option<SubscriberInfo>,
    #[serde(rename = "Geofencing", default)]
    pub geofencing: Option<Geofencing>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubscriberInfo {
    #[serde(rename = "Detail", default)]
    pub details: Vec<SubscriberInfoDetail>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubscriberInfoDetail {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "value")]
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geofencing {
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    #[serde(rename = "Accuracy", default)]
    pub accuracy: Option<i32>,
    #[serde(rename = "Timestamp", default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    #[serde(rename = "DeviceConfidence", default)]
    pub device_confidence: Option<f32>,
    #[serde(rename = "LocationConfidence", default)]
    pub location_confidence: Option<f32>,
    #[serde(rename = "ErrorCode", default)]
    pub error_code: Option<String>,
    #[serde(rename = "ErrorMessage", default)]
    pub error_message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MssProfileResp {
    #[serde(rename = "SignatureProfile", default)]
    pub signature_profiles: Vec<MssUri>,
    #[serde(rename = "Status", default)]
    pub status: Option<StatusType>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileQueryExtension {
    #[serde(rename = "MobileUser", default)]
    pub mobile_user: Option<ProfileMobileUser>,
    #[serde(rename = "Sscds", default)]
    pub sscds: Option<SscdList>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProfileMobileUser {
    #[serde(rename = "RecoveryCodeCreated", default)]
    pub recovery_code_created: Option<bool>,
    #[serde(rename = "AutoActivation", default)]
    pub auto_activation: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SscdList {
    #[serde(rename = "Sim", default)]
    pub sim: Option<Sscd>,
    #[serde(rename = "App", default)]
    pub app: Vec<Sscd>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sscd {
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "PinStatus", default)]
    pub pin_status: Option<PinStatus>,
    #[serde(rename = "MobileUserCertificate", default)]
    pub mobile_user_certificates: Vec<CertificateType>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PinStatus {
    #[serde(rename = "blocked")]
    pub blocked: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CertificateType {
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "Algorithm", default)]
    pub algorithm: Option<String>,
    /// Untyped ordered choice list: certificate bytes and subject names interleaved.
    #[serde(rename = "$elements", default)]
    pub elements: Vec<CertificateElement>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CertificateElement {
    #[serde(rename = "X509Certificate")]
    X509Certificate(Vec<u8>),
    #[serde(rename = "X509SubjectName")]
    X509SubjectName(String),
}

fn serialize_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
