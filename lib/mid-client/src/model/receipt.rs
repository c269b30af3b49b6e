use serde::Serialize;

use super::status::Status;

/// Correlates follow-up operations with an already issued signature request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureTracking {
    pub ap_trans_id: String,
    pub mssp_trans_id: String,
    pub msisdn: String,
    pub signature_profile: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub message: String,
    pub mime_type: String,
    pub encoding: String,
    pub user_response_required: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptMessagingMode {
    Synch,
    AsynchClientServer,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponseExtension {
    pub messaging_mode: ReceiptMessagingMode,
    pub client_ack: bool,
    pub network_ack: bool,
    pub user_ack: bool,
    pub user_response: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub status: Status,
    pub extension: Option<ReceiptResponseExtension>,
}
