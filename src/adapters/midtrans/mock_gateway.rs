//! Mock payment gateway for testing.
//!
//! Provides a configurable mock implementation of `PaymentGateway` for
//! unit and integration tests. Supports:
//! - Pre-configured checkout sessions
//! - Error injection (one-shot and persistent)
//! - Call recording

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CreateSnapTransactionRequest, GatewayError, PaymentGateway, SnapSession};

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
///
/// // Configure the next session
/// mock.set_session(SnapSession { token: "tok".into(), redirect_url: "...".into() });
///
/// // Inject a one-shot error
/// mock.set_error(GatewayError::network("connection refused"));
///
/// // Assert on recorded calls
/// assert_eq!(mock.call_count(), 1);
/// ```
#[derive(Default)]
pub struct MockPaymentGateway {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Session to return on the next call.
    next_session: Option<SnapSession>,

    /// Error to return on the next call (consumed).
    next_error: Option<GatewayError>,

    /// Error to return on every call.
    persistent_error: Option<GatewayError>,

    /// Recorded requests for assertions.
    call_log: Vec<CreateSnapTransactionRequest>,
}

impl MockPaymentGateway {
    /// Create a new mock gateway that succeeds with generated sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails every call with the given error.
    pub fn failing(error: GatewayError) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().persistent_error = Some(error);
        mock
    }

    /// Set the session to return on the next call.
    pub fn set_session(&self, session: SnapSession) {
        self.inner.lock().unwrap().next_session = Some(session);
    }

    /// Set an error to return on the next call (consumed once).
    pub fn set_error(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.persistent_error = None;
    }

    /// Get all recorded requests.
    pub fn calls(&self) -> Vec<CreateSnapTransactionRequest> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Get the number of recorded requests.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().call_log.clear();
    }
}

impl Clone for MockPaymentGateway {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_transaction(
        &self,
        request: CreateSnapTransactionRequest,
    ) -> Result<SnapSession, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push(request);

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if let Some(error) = &state.persistent_error {
            return Err(error.clone());
        }

        Ok(state.next_session.take().unwrap_or_else(|| {
            let token = format!(
                "snap-mock-{}",
                uuid::Uuid::new_v4().to_string().split('-').next().unwrap()
            );
            let redirect_url =
                format!("https://app.sandbox.midtrans.com/snap/v2/vtweb/{}", token);
            SnapSession {
                token,
                redirect_url,
            }
        }))
    }
}
