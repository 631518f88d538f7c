use std::{fmt::Display, future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Local};
use tokio::{
    sync::{mpsc, watch, Notify},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum PollEvent<T> {
    Fetched { value: T, at: DateTime<Local> },
    Failed(String),
    /// The poll task has ended and will send nothing more.
    Stopped,
}

/// Handle to a running poll task. Call [`PollHandle::cancel`] to stop it;
/// an in-flight fetch is abandoned.
#[derive(Debug)]
pub struct PollHandle {
    stop: watch::Sender<bool>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn cancel(&self) {
        let _ = self.stop.send(true);
    }

    /// Fetch now instead of waiting for the next tick.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Calls `fetch` right away and then every `interval` until `keep_polling`
/// rejects a fetched value, the handle is cancelled, or `tx` is closed.
///
/// Fetches run one at a time; ticks missed while a fetch is in flight are
/// skipped rather than queued.
pub fn spawn<T, E, F, Fut>(
    interval: Duration,
    mut fetch: F,
    keep_polling: fn(&T) -> bool,
    tx: mpsc::Sender<PollEvent<T>>,
) -> PollHandle
where
    T: Send + 'static,
    E: Display + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let (stop, mut stop_rx) = watch::channel(false);
    let refresh = Arc::new(Notify::new());
    let refresh_rx = refresh.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.changed() => break,
                _ = ticker.tick() => {}
                _ = refresh_rx.notified() => ticker.reset(),
            }

            let result = tokio::select! {
                biased;
                _ = stop_rx.changed() => break,
                result = fetch() => result,
            };

            let event = match result {
                Ok(value) => {
                    let more = keep_polling(&value);
                    let event = PollEvent::Fetched { value, at: Local::now() };
                    if !more {
                        info!("nothing left to poll for");
                        let _ = tx.send(event).await;
                        break;
                    }
                    event
                }
                Err(e) => {
                    warn!(error = %e, "poll failed");
                    PollEvent::Failed(e.to_string())
                }
            };

            if tx.send(event).await.is_err() {
                debug!("poll receiver closed");
                break;
            }
        }

        let _ = tx.send(PollEvent::Stopped).await;
    });

    PollHandle { stop, refresh, task }
}
