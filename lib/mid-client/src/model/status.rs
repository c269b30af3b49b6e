use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Closed set of outcome kinds for a remote MSS operation.
///
/// Every reserved wire code has its own variant. Codes outside the table are
/// represented by [`StatusCode::Unrecognized`].
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Display, AsRefStr, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    RequestOk,
    WrongParam,
    MissingParam,
    WrongDataLength,
    UnauthorizedAccess,
    UnknownClient,
    InappropriateData,
    IncompatibleInterface,
    UnsupportedProfile,
    ExpiredTransaction,
    OtpExpired,
    UserCancel,
    PinNrBlocked,
    CardBlocked,
    NoKeyFound,
    PbSignatureProcess,
    NoCertFound,
    Signature,
    RevokedCertificate,
    ValidSignature,
    InvalidSignature,
    OutstandingTransaction,
    InternalError,
    Unrecognized,
}

impl StatusCode {
    /// Looks up a reserved wire code. Total: unknown codes yield `None`.
    pub const fn lookup(code: u32) -> Option<Self> {
        let status = match code {
            100 => Self::RequestOk,
            101 => Self::WrongParam,
            102 => Self::MissingParam,
            103 => Self::WrongDataLength,
            104 => Self::UnauthorizedAccess,
            105 => Self::UnknownClient,
            107 => Self::InappropriateData,
            108 => Self::IncompatibleInterface,
            109 => Self::UnsupportedProfile,
            208 => Self::ExpiredTransaction,
            209 => Self::OtpExpired,
            401 => Self::UserCancel,
            402 => Self::PinNrBlocked,
            403 => Self::CardBlocked,
            404 => Self::NoKeyFound,
            406 => Self::PbSignatureProcess,
            422 => Self::NoCertFound,
            500 => Self::Signature,
            501 => Self::RevokedCertificate,
            502 => Self::ValidSignature,
            503 => Self::InvalidSignature,
            504 => Self::OutstandingTransaction,
            900 => Self::InternalError,
            _ => return None,
        };
        Some(status)
    }

    /// Reserved wire code of this kind, `None` for [`StatusCode::Unrecognized`].
    pub const fn value(&self) -> Option<u32> {
        let value = match self {
            Self::RequestOk => 100,
            Self::WrongParam => 101,
            Self::MissingParam => 102,
            Self::WrongDataLength => 103,
            Self::UnauthorizedAccess => 104,
            Self::UnknownClient => 105,
            Self::InappropriateData => 107,
            Self::IncompatibleInterface => 108,
            Self::UnsupportedProfile => 109,
            Self::ExpiredTransaction => 208,
            Self::OtpExpired => 209,
            Self::UserCancel => 401,
            Self::PinNrBlocked => 402,
            Self::CardBlocked => 403,
            Self::NoKeyFound => 404,
            Self::PbSignatureProcess => 406,
            Self::NoCertFound => 422,
            Self::Signature => 500,
            Self::RevokedCertificate => 501,
            Self::ValidSignature => 502,
            Self::InvalidSignature => 503,
            Self::OutstandingTransaction => 504,
            Self::InternalError => 900,
            Self::Unrecognized => return None,
        };
        Some(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::RequestOk | Self::Signature | Self::ValidSignature)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub code: StatusCode,
    /// Code as received on the wire, kept for diagnostics of unrecognized values.
    pub raw_code: Option<u32>,
    pub message: Option<String>,
}

impl Status {
    pub fn from_wire(raw_code: Option<u32>, message: Option<String>) -> Self {
        let code = raw_code
            .and_then(StatusCode::lookup)
            .unwrap_or(StatusCode::Unrecognized);

        Self {
            code,
            raw_code,
            message,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::InternalError,
            raw_code: StatusCode::InternalError.value(),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}
