//! Cancellable recurring tick source for the interactive workout player.
//!
//! One `SecondTicker` is live per session. It delivers a caller-supplied
//! event on a channel once per period from a background thread. `cancel`
//! stops the thread and joins it, so once it returns no further tick is
//! sent; dropping the ticker does the same. State mutation stays on the
//! receiving side; the thread only ever sends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

pub struct SecondTicker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SecondTicker {
    /// Spawn a ticker sending `event` once per second
    pub fn spawn<T>(tx: Sender<T>, event: T) -> Self
    where
        T: Clone + Send + 'static,
    {
        Self::with_period(tx, event, Duration::from_secs(1))
    }

    /// Spawn with an explicit period (sub-second periods for tests)
    pub fn with_period<T>(tx: Sender<T>, event: T, period: Duration) -> Self
    where
        T: Clone + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = std::thread::spawn(move || loop {
            std::thread::sleep(period);
            if thread_stop.load(Ordering::SeqCst) {
                break;
            }
            if tx.send(event.clone()).is_err() {
                // Receiver gone; nothing left to tick for
                break;
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop the ticker deterministically.
    ///
    /// Joins the background thread; after this returns no further tick is
    /// sent on the channel.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Ticker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for SecondTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[derive(Clone, Debug, PartialEq)]
    struct Tick;

    #[test]
    fn test_ticker_delivers_repeatedly() {
        let (tx, rx) = mpsc::channel();
        let ticker = SecondTicker::with_period(tx, Tick, Duration::from_millis(5));

        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(2))
                .expect("tick should arrive");
        }

        ticker.cancel();
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let (tx, rx) = mpsc::channel();
        let ticker = SecondTicker::with_period(tx, Tick, Duration::from_millis(5));

        rx.recv_timeout(Duration::from_secs(2))
            .expect("tick should arrive");
        ticker.cancel();

        // Drain whatever was in flight before the join, then verify silence
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_ticker_exits_when_receiver_drops() {
        let (tx, rx) = mpsc::channel();
        let ticker = SecondTicker::with_period(tx, Tick, Duration::from_millis(5));
        drop(rx);

        // cancel() joins the thread; send failure must already have ended it
        ticker.cancel();
    }

    #[test]
    fn test_drop_cancels() {
        let (tx, rx) = mpsc::channel();
        {
            let _ticker = SecondTicker::with_period(tx, Tick, Duration::from_millis(5));
            rx.recv_timeout(Duration::from_secs(2))
                .expect("tick should arrive");
        }

        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
