use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct DebounceInput<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> DebounceInput<T> {
    /// Returns `false` once the debouncer has been dropped.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

#[derive(Debug)]
pub struct Debouncer<T> {
    rx: mpsc::UnboundedReceiver<T>,
    window: Duration,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> (DebounceInput<T>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (DebounceInput { tx }, Self { rx, window })
    }

    pub async fn settled(&mut self) -> Option<T> {
        let mut pending = self.rx.recv().await?;
        loop {
            match timeout(self.window, self.rx.recv()).await {
                Ok(Some(newer)) => pending = newer,
                // Input closed mid-burst: flush what we hold.
                Ok(None) => return Some(pending),
                Err(_elapsed) => return Some(pending),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_only_last_value_of_a_burst() {
        let (input, mut debouncer) = Debouncer::new(Duration::from_millis(500));

        let typing = tokio::spawn(async move {
            for text in ["l", "la", "lam", "lamp"] {
                input.push(text.to_string());
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            tokio::time::sleep(Duration::from_millis(1000)).await;
            input.push("lamps".to_string());
        });

        assert_eq!(debouncer.settled().await.as_deref(), Some("lamp"));
        assert_eq!(debouncer.settled().await.as_deref(), Some("lamps"));
        typing.await.expect("typing task should finish");
        assert_eq!(debouncer.settled().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_full_window_after_last_input() {
        let (input, mut debouncer) = Debouncer::new(Duration::from_millis(500));
        let started = tokio::time::Instant::now();

        input.push(1);
        let waiter = tokio::spawn(async move { debouncer.settled().await });
        tokio::time::sleep(Duration::from_millis(400)).await;
        input.push(2);

        let value = waiter.await.expect("waiter should finish");
        assert_eq!(value, Some(2));
        assert!(started.elapsed() >= Duration::from_millis(900));
    }
}
