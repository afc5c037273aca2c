//! Single-fire signals.
//!
//! A [`Signal`] starts unset, is set at most once, and wakes every waiter
//! when set. The session uses two: Completion ("done") and Interrupt.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::io;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// ============================================================================
// Signal
// ============================================================================

/// Idempotent broadcast-once notification.
///
/// Cloning yields another handle to the same signal.
#[derive(Clone)]
pub struct Signal {
    /// Name used in logs.
    name: &'static str,
    /// Current state; `true` once fired.
    state: Arc<watch::Sender<bool>>,
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("fired", &self.is_fired())
            .finish()
    }
}

impl Signal {
    /// Creates an unset signal.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(false);
        Self {
            name,
            state: Arc::new(state),
        }
    }

    /// Sets the signal.
    ///
    /// Returns `true` for the one caller that actually set it; every later
    /// call is a no-op returning `false`.
    pub fn fire(&self) -> bool {
        let won = self.state.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        });

        if won {
            debug!(signal = self.name, "Signal fired");
        }
        won
    }

    /// Returns `true` once the signal has been set.
    #[inline]
    #[must_use]
    pub fn is_fired(&self) -> bool {
        *self.state.borrow()
    }

    /// Waits until the signal is set. Returns immediately if it already is.
    pub async fn wait(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so this cannot fail
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

// ============================================================================
// OS Interrupts
// ============================================================================

/// Fires `interrupt` on Ctrl-C (and SIGTERM on Unix).
pub fn watch_os_interrupts(interrupt: Signal) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_os_interrupt().await {
            Ok(source) => {
                debug!(source, "Interrupt received");
                interrupt.fire();
            }
            Err(e) => warn!(error = %e, "Failed to install interrupt handler"),
        }
    })
}

#[cfg(unix)]
async fn wait_for_os_interrupt() -> io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_os_interrupt() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::time::timeout;

    #[test]
    fn test_fire_once() {
        let signal = Signal::new("done");
        assert!(!signal.is_fired());
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.is_fired());
    }

    #[test]
    fn test_clones_share_state() {
        let signal = Signal::new("done");
        let other = signal.clone();
        assert!(other.fire());
        assert!(signal.is_fired());
        assert!(!signal.fire());
    }

    #[tokio::test]
    async fn test_wait_after_fire_returns() {
        let signal = Signal::new("done");
        signal.fire();
        timeout(Duration::from_millis(100), signal.wait())
            .await
            .expect("already fired");
    }

    #[tokio::test]
    async fn test_wait_wakes_all_waiters() {
        let signal = Signal::new("done");
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let signal = signal.clone();
                tokio::spawn(async move { signal.wait().await })
            })
            .collect();

        tokio::task::yield_now().await;
        signal.fire();

        for waiter in waiters {
            timeout(Duration::from_secs(1), waiter)
                .await
                .expect("woken")
                .expect("join");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_fire_has_one_winner() {
        let signal = Signal::new("done");
        let winners = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let signal = signal.clone();
                let winners = Arc::clone(&winners);
                tokio::spawn(async move {
                    if signal.fire() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.expect("join");
        }
        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
