use std::time::Duration;

use thiserror::Error;

use crate::provider::mss_port::TransportError;

#[derive(Debug, Error)]
pub enum SessionPoolError {
    #[error("No MSS session became available within {wait_budget:?}")]
    Exhausted { wait_budget: Duration },
    #[error("MSS session pool is closed")]
    Closed,
    #[error("Failed to create MSS session: {0}")]
    SessionCreation(#[source] TransportError),
}
