//! Background writer for the conversation log.
//!
//! Persistence is best-effort and decoupled from the response path: the
//! request handler enqueues the exchange on a bounded channel and a single
//! worker task drains it in arrival order. A full queue drops the exchange
//! (with a warning) rather than blocking the response; write failures are
//! logged and never reach the caller.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::conversations::store::ConversationStore;
use crate::conversations::types::Exchange;

/// Default capacity of the pending-write queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Handle to the background exchange writer.
pub struct ExchangeRecorder {
    tx: mpsc::Sender<Exchange>,
    worker: JoinHandle<()>,
}

impl ExchangeRecorder {
    /// Spawn the writer task draining into the given store.
    #[must_use]
    pub fn spawn(store: Arc<dyn ConversationStore>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<Exchange>(capacity);

        let worker = tokio::spawn(async move {
            while let Some(exchange) = rx.recv().await {
                if let Err(err) = store.record(&exchange).await {
                    warn!(%err, owner = ?exchange.owner, "failed to persist exchange");
                }
            }
            debug!("exchange recorder drained");
        });

        Self { tx, worker }
    }

    /// Enqueue an exchange without blocking.
    ///
    /// Returns `false` when the exchange was dropped because the queue is
    /// full or the worker is gone.
    pub fn try_record(&self, exchange: Exchange) -> bool {
        match self.tx.try_send(exchange) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("conversation log queue is full, dropping exchange");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("conversation log worker is gone, dropping exchange");
                false
            }
        }
    }

    /// Close the queue and wait for the worker to drain it.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(err) = self.worker.await {
            warn!(%err, "exchange recorder worker failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::answer::types::Mode;
    use crate::conversations::store::{SqliteConversationStore, StoreFuture, StoreResult};

    #[tokio::test]
    async fn test_enqueued_exchange_is_persisted() {
        let store = Arc::new(SqliteConversationStore::in_memory().await.unwrap());
        let recorder = ExchangeRecorder::spawn(
            Arc::clone(&store) as Arc<dyn ConversationStore>,
            DEFAULT_QUEUE_CAPACITY,
        );

        let exchange = Exchange::new("q", "a", Mode::Patient, Some("user-1".to_string()));
        assert!(recorder.try_record(exchange));
        recorder.shutdown().await;

        let listed = store.list_by_owner("user-1", 100).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_closed_worker_drops_without_blocking() {
        let (tx, rx) = mpsc::channel::<Exchange>(1);
        drop(rx);
        let recorder = ExchangeRecorder {
            tx,
            worker: tokio::spawn(async {}),
        };
        assert!(!recorder.try_record(Exchange::new("q", "a", Mode::Patient, None)));
        recorder.shutdown().await;
    }

    struct StallingStore;

    impl ConversationStore for StallingStore {
        fn record(&self, _exchange: &Exchange) -> StoreFuture<'_, StoreResult<()>> {
            Box::pin(std::future::pending())
        }

        fn list_by_owner(
            &self,
            _owner: &str,
            _limit: usize,
        ) -> StoreFuture<'_, StoreResult<Vec<Exchange>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    #[tokio::test]
    async fn test_full_queue_drops_instead_of_blocking() {
        let recorder = ExchangeRecorder::spawn(Arc::new(StallingStore), 1);

        // The worker stalls on the first write, so the queue fills after
        // at most one buffered exchange and the next enqueue is refused.
        let mut accepted = 0;
        loop {
            if !recorder.try_record(Exchange::new("q", "a", Mode::Patient, None)) {
                break;
            }
            accepted += 1;
            assert!(accepted <= 2, "bounded queue accepted too many exchanges");
        }
        assert!(accepted >= 1);
        recorder.worker.abort();
    }
}
