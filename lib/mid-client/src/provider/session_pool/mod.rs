//! Bounded pool of MSS ports bound to a single service endpoint.
//!
//! - Ports are created lazily, at most `max_sessions` exist at any time
//! - A checked-out [`PooledSession`] is owned by exactly one caller
//! - Only [`PooledSession::release`] puts a port back into the pool; dropping
//!   a session in any other way discards its port

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{Semaphore, SemaphorePermit, TryAcquireError};

use crate::config::SessionPoolConfig;
use crate::proto::traffic_observer::TrafficObserver;
use crate::provider::mss_port::dto::{MssSignatureReq, MssSignatureResp};
use crate::provider::mss_port::{MssPort, MssPortFactory, TransportError};

pub mod error;


use error::SessionPoolError;

pub type SessionId = u64;

/// One port together with the observer of the call currently using it.
pub struct SessionHandle {
    id: SessionId,
    port: Box<dyn MssPort>,
    observer: Option<Arc<dyn TrafficObserver>>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn observer(&self) -> Option<&Arc<dyn TrafficObserver>> {
        self.observer.as_ref()
    }

    pub async fn mss_signature(
        &self,
        request: MssSignatureReq,
    ) -> Result<Option<MssSignatureResp>, TransportError> {
        self.port.mss_signature(request, self.observer.clone()).await
    }
}

pub struct SessionPool {
    factory: Arc<dyn MssPortFactory>,
    endpoint: String,
    idle: Mutex<Vec<SessionHandle>>,
    permits: Semaphore,
    max_sessions: usize,
    max_wait: Duration,
    next_id: AtomicU64,
}

/// A session checked out of the pool.
pub struct PooledSession<'p> {
    pool: &'p SessionPool,
    handle: SessionHandle,
    _permit: SemaphorePermit<'p>,
}

impl PooledSession<'_> {
    pub fn id(&self) -> SessionId {
        self.handle.id
    }

    pub fn session(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn attach_observer(&mut self, observer: Option<Arc<dyn TrafficObserver>>) {
        self.handle.observer = observer;
    }

    /// Returns the port to the pool for reuse. A port released into a closed
    /// pool is closed instead.
    pub async fn release(self) {
        let Self { pool, handle, .. } = self;
        pool.check_in(handle).await;
    }

    /// Closes the port. A failing close is logged, never reported.
    pub async fn discard(self) {
        let Self { handle, .. } = self;
        close_handle(handle).await;
    }
}

async fn close_handle(mut handle: SessionHandle) {
    handle.observer = None;

    if let Err(error) = handle.port.close().await {
        tracing::warn!(session_id = handle.id, %error, "Failed to close MSS session");
    } else {
        tracing::debug!(session_id = handle.id, "Closed MSS session");
    }
}

impl SessionPool {
    pub fn new(
        factory: Arc<dyn MssPortFactory>,
        endpoint: impl Into<String>,
        config: &SessionPoolConfig,
    ) -> Self {
        let max_sessions = config.max_sessions.min(Semaphore::MAX_PERMITS);

        Self {
            factory,
            endpoint: endpoint.into(),
            idle: Mutex::new(Vec::new()),
            permits: Semaphore::new(max_sessions),
            max_sessions,
            max_wait: config.max_wait,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of ports waiting in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of sessions currently checked out.
    pub fn in_use(&self) -> usize {
        self.max_sessions - self.permits.available_permits()
    }

    /// Checks out a session, waiting at most the configured budget for one to
    /// become available.
    pub async fn borrow(&self) -> Result<PooledSession<'_>, SessionPoolError> {
        let permit = self.acquire_permit().await?;

        let idle = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        let handle = match idle {
            Some(handle) => handle,
            None => self.create_handle().await?,
        };

        Ok(PooledSession {
            pool: self,
            handle,
            _permit: permit,
        })
    }

    /// Runs `f` on a checked-out session carrying `observer`.
    ///
    /// The observer is detached before the session leaves the call. On success
    /// the session goes back to the pool, on any error it is discarded and the
    /// error of `f` is returned unchanged.
    pub async fn with_session<T, E, F>(
        &self,
        observer: Option<Arc<dyn TrafficObserver>>,
        f: F,
    ) -> Result<T, E>
    where
        F: for<'s> FnOnce(&'s SessionHandle) -> BoxFuture<'s, Result<T, E>> + Send,
        T: Send,
        E: From<SessionPoolError> + Display + Send,
    {
        let mut session = self.borrow().await?;
        session.attach_observer(observer);

        match f(session.session()).await {
            Ok(value) => {
                session.release().await;
                Ok(value)
            }
            Err(error) => {
                tracing::debug!(
                    session_id = session.id(),
                    %error,
                    "Call failed, discarding MSS session"
                );
                session.discard().await;
                Err(error)
            }
        }
    }

    /// Refuses further checkouts and closes all idle ports.
    pub async fn close(&self) {
        self.permits.close();

        let idle = std::mem::take(&mut *self.idle.lock().unwrap_or_else(PoisonError::into_inner));
        for handle in idle {
            close_handle(handle).await;
        }
    }

    async fn acquire_permit(&self) -> Result<SemaphorePermit<'_>, SessionPoolError> {
        let exhausted = SessionPoolError::Exhausted {
            wait_budget: self.max_wait,
        };

        if self.max_wait.is_zero() {
            return self.permits.try_acquire().map_err(|error| match error {
                TryAcquireError::NoPermits => exhausted,
                TryAcquireError::Closed => SessionPoolError::Closed,
            });
        }

        match tokio::time::timeout(self.max_wait, self.permits.acquire()).await {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(_)) => Err(SessionPoolError::Closed),
            Err(_) => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    in_use = self.in_use(),
                    "MSS session pool exhausted"
                );
                Err(exhausted)
            }
        }
    }

    async fn create_handle(&self) -> Result<SessionHandle, SessionPoolError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let port = self
            .factory
            .create_port(&self.endpoint)
            .await
            .map_err(SessionPoolError::SessionCreation)?;

        tracing::debug!(session_id = id, endpoint = %self.endpoint, "Created MSS session");

        Ok(SessionHandle {
            id,
            port,
            observer: None,
        })
    }

    async fn check_in(&self, mut handle: SessionHandle) {
        handle.observer = None;

        // `close` shuts the semaphore before draining the idle list, so a check
        // under the lock cannot miss a concurrent drain.
        let rejected = {
            let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
            if self.permits.is_closed() {
                Some(handle)
            } else {
                idle.push(handle);
                None
            }
        };

        if let Some(handle) = rejected {
            tracing::debug!(session_id = handle.id, "Session released into closed pool");
            close_handle(handle).await;
        }
    }
}
