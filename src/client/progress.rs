use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const PROGRESS_STEP: u8 = 5;
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    pub fn start(progress: Arc<watch::Sender<u8>>, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut done = false;
                progress.send_modify(|p| {
                    *p = p.saturating_add(PROGRESS_STEP).min(100);
                    done = *p >= 100;
                });
                if done {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ticker_climbs_to_100_and_stops() {
        let (tx, mut rx) = watch::channel(0u8);
        let tx = Arc::new(tx);
        let _ticker = ProgressTicker::start(tx.clone(), Duration::from_millis(1));

        rx.wait_for(|p| *p == 100).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(*rx.borrow(), 100);
    }

    #[tokio::test]
    async fn test_dropping_ticker_stops_updates() {
        let (tx, mut rx) = watch::channel(0u8);
        let tx = Arc::new(tx);
        let ticker = ProgressTicker::start(tx.clone(), Duration::from_millis(1));

        rx.wait_for(|p| *p >= 10).await.unwrap();
        drop(ticker);
        tx.send_replace(0);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*rx.borrow(), 0);
    }
}
