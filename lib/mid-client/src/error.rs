use std::fmt;
use std::time::Duration;

use strum::{AsRefStr, Display};
use thiserror::Error;

use crate::model::status::StatusCode;
use crate::provider::mss_port::TransportError;
use crate::provider::session_pool::error::SessionPoolError;
use crate::service::mss::request::RequestBuildError;

/// Failure of a Mobile ID protocol operation.
#[derive(Debug, Error)]
pub enum MidFlowError {
    #[error("Invalid request: {0}")]
    InvalidInput(#[from] RequestBuildError),
    #[error("No MSS session available within {wait_budget:?}")]
    PoolExhausted { wait_budget: Duration },
    #[error("SOAP fault received: {0}")]
    ProtocolFault(FaultDetail),
    #[error("{message}: {source}")]
    ServiceFailure {
        message: String,
        #[source]
        source: ServiceFailureCause,
    },
    #[error("{0} is not yet supported")]
    UnsupportedOperation(Operation),
}

#[derive(Debug, Error)]
pub enum ServiceFailureCause {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("session pool closed")]
    PoolClosed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
pub enum Operation {
    #[strum(serialize = "Async signature")]
    AsyncSignature,
    #[strum(serialize = "Signature status poll")]
    SignatureStatusPoll,
    #[strum(serialize = "Receipt signature")]
    SyncReceipt,
    #[strum(serialize = "Profile query")]
    ProfileQuery,
}

/// Structured classification of a failure, stable for callers to branch on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    InvalidInput,
    PoolExhausted,
    ServiceFailure,
    UnsupportedOperation,

    WrongParameters,
    UnauthorizedAccess,
    UnknownClient,
    UnsupportedProfile,
    UserTimeout,
    UserCancelled,
    PinBlocked,
    CardBlocked,
    NoKeyFound,
    NoCertificateFound,
    CertificateRevoked,
    SignatureProcessFailure,
    RemoteInternalError,
    UnrecognizedFault,
}

impl FailureReason {
    pub fn from_fault_status(status: Option<StatusCode>) -> Self {
        let Some(status) = status else {
            return Self::UnrecognizedFault;
        };

        match status {
            StatusCode::WrongParam
            | StatusCode::MissingParam
            | StatusCode::WrongDataLength
            | StatusCode::InappropriateData
            | StatusCode::IncompatibleInterface => Self::WrongParameters,
            StatusCode::UnauthorizedAccess => Self::UnauthorizedAccess,
            StatusCode::UnknownClient => Self::UnknownClient,
            StatusCode::UnsupportedProfile => Self::UnsupportedProfile,
            StatusCode::ExpiredTransaction | StatusCode::OtpExpired => Self::UserTimeout,
            StatusCode::UserCancel => Self::UserCancelled,
            StatusCode::PinNrBlocked => Self::PinBlocked,
            StatusCode::CardBlocked => Self::CardBlocked,
            StatusCode::NoKeyFound => Self::NoKeyFound,
            StatusCode::NoCertFound => Self::NoCertificateFound,
            StatusCode::RevokedCertificate => Self::CertificateRevoked,
            StatusCode::PbSignatureProcess | StatusCode::InvalidSignature => {
                Self::SignatureProcessFailure
            }
            StatusCode::InternalError => Self::RemoteInternalError,
            StatusCode::RequestOk
            | StatusCode::Signature
            | StatusCode::ValidSignature
            | StatusCode::OutstandingTransaction
            | StatusCode::Unrecognized => Self::UnrecognizedFault,
        }
    }
}

/// Details extracted from a protocol-level fault.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FaultDetail {
    pub reason: FailureReason,
    pub status: Option<StatusCode>,
    /// Numeric part of the fault sub-code, when it had one.
    pub raw_code: Option<u32>,
    pub fault_code: Option<String>,
    pub fault_subcode: Option<String>,
    pub fault_reason: Option<String>,
    pub fault_detail: Option<String>,
}

impl fmt::Display for FaultDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)?;
        if let Some(raw_code) = self.raw_code {
            write!(f, " (code {raw_code})")?;
        }
        if let Some(reason) = &self.fault_reason {
            write!(f, ": {reason}")?;
        }
        Ok(())
    }
}

impl MidFlowError {
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            Self::InvalidInput(_) => FailureReason::InvalidInput,
            Self::PoolExhausted { .. } => FailureReason::PoolExhausted,
            Self::ProtocolFault(detail) => detail.reason,
            Self::ServiceFailure { .. } => FailureReason::ServiceFailure,
            Self::UnsupportedOperation(_) => FailureReason::UnsupportedOperation,
        }
    }

    pub fn fault_detail(&self) -> Option<&FaultDetail> {
        match self {
            Self::ProtocolFault(detail) => Some(detail),
            _ => None,
        }
    }

    /// Only a lack of free sessions is worth retrying; a signature request that
    /// reached the remote party must not be re-sent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PoolExhausted { .. })
    }
}

impl From<SessionPoolError> for MidFlowError {
    fn from(error: SessionPoolError) -> Self {
        match error {
            SessionPoolError::Exhausted { wait_budget } => Self::PoolExhausted { wait_budget },
            SessionPoolError::Closed => Self::ServiceFailure {
                message: "MSS session pool unavailable".to_string(),
                source: ServiceFailureCause::PoolClosed,
            },
            SessionPoolError::SessionCreation(error) => Self::ServiceFailure {
                message: "Failed to create MSS session".to_string(),
                source: error.into(),
            },
        }
    }
}
