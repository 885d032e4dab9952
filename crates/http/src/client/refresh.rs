//! Single-flight token refresh
//!
//! Several requests can observe a 401 at nearly the same instant. Letting
//! each of them exchange the refresh token would issue duplicate network
//! calls and race on which response's tokens get persisted last. The
//! coordinator serializes the exchange and shares one outcome among every
//! caller that observed the stale token.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;

/// Why a refresh attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// No refresh token in the store; the session must end.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The server rejected the exchange; the session must end.
    #[error("refresh token rejected: {0}")]
    Rejected(String),

    /// Transport or server fault; the session should be preserved so the
    /// caller can retry later.
    #[error("refresh attempt failed: {0}")]
    Transient(String),
}

impl RefreshError {
    /// Terminal failures end the session; transient ones keep it.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Transient(_))
    }
}

pub type RefreshOutcome = Result<(), RefreshError>;

#[derive(Default)]
struct RefreshState {
    last: Option<RefreshOutcome>,
}

/// Deduplicates concurrent refresh attempts.
///
/// A caller captures [`generation`](Self::generation) before sending the
/// request it protects, then calls [`run`](Self::run) when a 401 comes
/// back. The first caller through the lock performs the exchange and
/// bumps the generation; callers whose snapshot predates that exchange
/// share its outcome instead of issuing their own call. The mutex guard
/// is the busy flag, so it is released on every path out.
#[derive(Default)]
pub struct RefreshCoordinator {
    generation: AtomicU64,
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation to capture before calling [`run`](Self::run).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Run `perform` unless a refresh already completed since `observed`
    /// was captured, in which case that attempt's outcome is returned
    /// without another call.
    pub async fn run<F, Fut>(&self, observed: u64, perform: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::Acquire) != observed {
            if let Some(outcome) = state.last.clone() {
                return outcome;
            }
        }
        let outcome = perform().await;
        state.last = Some(outcome.clone());
        // Bumped under the lock, after the outcome is recorded.
        self.generation.fetch_add(1, Ordering::Release);
        outcome
    }
}
