//! Coalesce rapid edits into one settled value
//!
//! [`Debouncer`] is the timer state machine; [`debounce`] drives it from a
//! channel using tokio's clock, so tests can run it on a paused runtime.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Quiet period a filter edit must survive before it is emitted
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(800);

/// Delay/cancel timer over a single pending value
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
    last_emitted: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            deadline: None,
            last_emitted: None,
        }
    }

    /// Treat `value` as already emitted, so it is never re-sent
    pub fn with_initial(mut self, value: T) -> Self {
        self.last_emitted = Some(value);
        self
    }

    /// Replace any pending value and restart the quiet period
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.delay);
    }

    /// When the pending value settles, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the settled value once its deadline has passed
    ///
    /// Returns `None` while still waiting, and also when the settled value
    /// equals the last one emitted.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if deadline <= now => {}
            _ => return None,
        }
        self.deadline = None;
        let value = self.pending.take()?;

        if self.last_emitted.as_ref() == Some(&value) {
            debug!("Settled value unchanged, nothing to emit");
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}

/// Forward values from `input` to `output` once each has settled
///
/// Runs until `input` closes (a pending value is still flushed after its
/// quiet period) or `output` is dropped.
pub async fn debounce<T>(
    mut input: mpsc::Receiver<T>,
    output: mpsc::Sender<T>,
    mut debouncer: Debouncer<T>,
) where
    T: Clone + PartialEq + Send + 'static,
{
    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            received = input.recv() => match received {
                Some(value) => debouncer.push(value, Instant::now()),
                None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(value) = debouncer.poll(Instant::now()) {
                    debug!("Emitting settled value");
                    if output.send(value).await.is_err() {
                        return;
                    }
                }
            }
        }
    }

    if let Some(deadline) = debouncer.deadline() {
        sleep_until(deadline).await;
        if let Some(value) = debouncer.poll(Instant::now()) {
            let _ = output.send(value).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn waits_for_full_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(FILTER_DEBOUNCE);

        debouncer.push("a", start);
        assert_eq!(debouncer.poll(start + MS(799)), None);
        assert_eq!(debouncer.poll(start + MS(800)), Some("a"));
        assert_eq!(debouncer.poll(start + MS(5000)), None);
    }

    #[test]
    fn later_edit_replaces_pending_and_restarts_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(FILTER_DEBOUNCE);

        debouncer.push("Ca", start);
        debouncer.push("Casa", start + MS(200));
        assert_eq!(debouncer.poll(start + MS(800)), None);
        assert_eq!(debouncer.deadline(), Some(start + MS(1000)));
        assert_eq!(debouncer.poll(start + MS(1000)), Some("Casa"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn unchanged_value_is_not_reemitted() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(FILTER_DEBOUNCE).with_initial("");

        debouncer.push("x", start);
        debouncer.push("", start + MS(100));
        assert_eq!(debouncer.poll(start + MS(900)), None);

        debouncer.push("Casa", start + MS(1000));
        assert_eq!(debouncer.poll(start + MS(1800)), Some("Casa"));
        debouncer.push("Casa", start + MS(2000));
        assert_eq!(debouncer.poll(start + MS(2800)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn two_quick_edits_emit_once_with_latest_value() {
        let (edits_tx, edits_rx) = mpsc::channel(8);
        let (settled_tx, mut settled_rx) = mpsc::channel(8);
        tokio::spawn(debounce(edits_rx, settled_tx, Debouncer::new(FILTER_DEBOUNCE)));

        let start = Instant::now();
        edits_tx.send("Ca".to_string()).await.unwrap();
        tokio::time::sleep(MS(200)).await;
        edits_tx.send("Casa".to_string()).await.unwrap();

        let settled = settled_rx.recv().await.unwrap();
        assert_eq!(settled, "Casa");
        let elapsed = start.elapsed();
        assert!(elapsed >= MS(1000) && elapsed < MS(1010), "{elapsed:?}");

        drop(edits_tx);
        assert_eq!(settled_rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn edits_further_apart_than_window_each_emit() {
        let (edits_tx, edits_rx) = mpsc::channel(8);
        let (settled_tx, mut settled_rx) = mpsc::channel(8);
        tokio::spawn(debounce(edits_rx, settled_tx, Debouncer::new(FILTER_DEBOUNCE)));

        edits_tx.send(1).await.unwrap();
        tokio::time::sleep(MS(900)).await;
        edits_tx.send(2).await.unwrap();
        drop(edits_tx);

        assert_eq!(settled_rx.recv().await, Some(1));
        assert_eq!(settled_rx.recv().await, Some(2));
        assert_eq!(settled_rx.recv().await, None);
    }
}
