use std::{
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::sync::mpsc::UnboundedSender;

use super::{FetchCursor, FetchError, PageSource};

/// What to do when the reported total changes between two pages of the same
/// traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriftPolicy {
    /// Keep paging with the newest total and stop when no more pages are
    /// available.
    #[default]
    AcceptPartial,
    /// Throw away what was collected and start again at offset 0. After
    /// `max_restarts` restarts the traversal falls back to accepting.
    Restart { max_restarts: u32 },
}

impl FromStr for DriftPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "accept" | "accept-partial" => Ok(DriftPolicy::AcceptPartial),
            "restart" => Ok(DriftPolicy::Restart { max_restarts: 1 }),
            other => match other.strip_prefix("restart:") {
                Some(n) => n
                    .parse::<u32>()
                    .map(|max_restarts| DriftPolicy::Restart { max_restarts })
                    .map_err(|e| format!("invalid restart count '{}': {}", n, e)),
                None => Err(format!("unknown drift policy '{}'", other)),
            },
        }
    }
}

/// Shared flag telling a chain to stop before its next request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Messages sent from a running chain to the aggregator owning the
/// accumulator. Every event carries the epoch of the chain that produced it.
#[derive(Debug)]
pub(crate) enum PageEvent<T> {
    Page {
        key: String,
        epoch: u64,
        offset: u32,
        items: Vec<T>,
        total: u32,
    },
    /// The chain restarted at offset 0; already merged items must go.
    Reset { key: String, epoch: u64 },
    Finished {
        key: String,
        epoch: u64,
        total: u32,
        inconsistent: bool,
    },
    Failed {
        key: String,
        epoch: u64,
        offset: u32,
        error: FetchError,
    },
}

/// One sequential page chain for one key.
pub(crate) struct Chain<T, S> {
    pub cursor: FetchCursor,
    pub epoch: u64,
    pub token: String,
    pub source: Arc<S>,
    pub cancel: CancelToken,
    pub policy: DriftPolicy,
    pub events: UnboundedSender<PageEvent<T>>,
}

impl<T, S> Chain<T, S>
where
    T: Send + 'static,
    S: PageSource<T>,
{
    pub async fn run(self) {
        let Chain {
            mut cursor,
            epoch,
            token,
            source,
            cancel,
            policy,
            events,
        } = self;

        let mut guard = ChainGuard {
            key: cursor.key.clone(),
            epoch,
            offset: cursor.offset,
            events: events.clone(),
            armed: true,
        };

        let mut fetched: u32 = 0;
        let mut restarts: u32 = 0;
        let mut drifted = false;

        loop {
            if cancel.is_cancelled() {
                guard.disarm();
                return;
            }

            let offset = cursor.offset;
            guard.offset = offset;
            let page = match source.fetch_page(&token, offset, cursor.limit).await {
                Ok(page) => page,
                Err(error) => {
                    guard.disarm();
                    let _ = events.send(PageEvent::Failed {
                        key: cursor.key,
                        epoch,
                        offset,
                        error,
                    });
                    return;
                }
            };

            let received = page.len();
            let total = page.total;

            if cursor.total.is_some_and(|known| known != total) {
                drifted = true;
                if let DriftPolicy::Restart { max_restarts } = policy {
                    if restarts < max_restarts {
                        restarts += 1;
                        fetched = 0;
                        drifted = false;
                        cursor.rewind();
                        cursor.total = None;
                        if events
                            .send(PageEvent::Reset {
                                key: cursor.key.clone(),
                                epoch,
                            })
                            .is_err()
                        {
                            guard.disarm();
                            return;
                        }
                        continue;
                    }
                }
            }

            fetched = fetched.saturating_add(received);
            cursor.total = Some(total);

            if events
                .send(PageEvent::Page {
                    key: cursor.key.clone(),
                    epoch,
                    offset,
                    items: page.items,
                    total,
                })
                .is_err()
            {
                guard.disarm();
                return;
            }

            if fetched >= total {
                guard.disarm();
                let _ = events.send(PageEvent::Finished {
                    key: cursor.key,
                    epoch,
                    total,
                    inconsistent: drifted,
                });
                return;
            }

            cursor.advance();

            // short page with nothing left to ask for: the server has fewer
            // items than it claims
            if received < cursor.limit && cursor.exhausted() {
                guard.disarm();
                let _ = events.send(PageEvent::Finished {
                    key: cursor.key,
                    epoch,
                    total,
                    inconsistent: true,
                });
                return;
            }
        }
    }
}

/// Reports the chain as failed when it ends without a terminal event, which
/// happens if the page source panics or the task is aborted.
struct ChainGuard<T> {
    key: String,
    epoch: u64,
    offset: u32,
    events: UnboundedSender<PageEvent<T>>,
    armed: bool,
}

impl<T> ChainGuard<T> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<T> Drop for ChainGuard<T> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.events.send(PageEvent::Failed {
                key: std::mem::take(&mut self.key),
                epoch: self.epoch,
                offset: self.offset,
                error: FetchError::Other("page chain ended unexpectedly".to_string()),
            });
        }
    }
}
