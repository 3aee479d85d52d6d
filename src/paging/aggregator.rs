use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

use super::{
    AggregateError, AuthContext, CancelToken, DriftPolicy, FetchCursor, PageSource,
    traversal::{Chain, PageEvent},
};
use crate::warning;

/// Collected items per collection key, in the order the server returned them.
pub type Accumulator<T> = HashMap<String, Vec<T>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    Idle,
    /// A request for the page at `offset` is outstanding.
    Fetching { offset: u32 },
    Done { total: u32, inconsistent: bool },
    /// The page at `offset` failed. Earlier pages stay in the accumulator.
    Failed { offset: u32 },
}

impl TraversalState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TraversalState::Done { .. } | TraversalState::Failed { .. }
        )
    }
}

/// Observable transitions of the current traversal of a key.
#[derive(Debug)]
pub enum Notice {
    Progress {
        key: String,
        fetched: usize,
        total: u32,
    },
    Completed {
        key: String,
        total: u32,
        inconsistent: bool,
    },
    Failed {
        key: String,
        error: AggregateError,
    },
}

impl Notice {
    pub fn key(&self) -> &str {
        match self {
            Notice::Progress { key, .. }
            | Notice::Completed { key, .. }
            | Notice::Failed { key, .. } => key,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Notice::Progress { .. })
    }
}

struct Traversal {
    epoch: u64,
    limit: u32,
    cancel: CancelToken,
    state: TraversalState,
    total: Option<u32>,
}

/// Drives paginated traversals and merges their pages into an accumulator.
///
/// Each [`begin`](Aggregator::begin) spawns one chain that requests pages
/// strictly one after another. Chains never touch the accumulator themselves,
/// they report page events which are applied when the owner pumps the
/// aggregator through [`next_notice`](Aggregator::next_notice),
/// [`wait_for`](Aggregator::wait_for) or [`settle`](Aggregator::settle).
/// Events of a superseded chain are dropped.
pub struct Aggregator<T> {
    kind: &'static str,
    page_size: u32,
    policy: DriftPolicy,
    accumulator: Accumulator<T>,
    traversals: HashMap<String, Traversal>,
    next_epoch: u64,
    chains: Vec<JoinHandle<()>>,
    pending: VecDeque<Notice>,
    stale: usize,
    events_tx: UnboundedSender<PageEvent<T>>,
    events_rx: UnboundedReceiver<PageEvent<T>>,
}

impl<T> Aggregator<T>
where
    T: Send + 'static,
{
    /// Creates an aggregator for one kind of traversal (e.g. "playlists").
    /// A page size of 0 is treated as 1.
    pub fn new(kind: &'static str, page_size: u32) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            kind,
            page_size: page_size.max(1),
            policy: DriftPolicy::default(),
            accumulator: HashMap::new(),
            traversals: HashMap::new(),
            next_epoch: 0,
            chains: Vec::new(),
            pending: VecDeque::new(),
            stale: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn with_drift_policy(mut self, policy: DriftPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Starts (or restarts) the traversal of `key`.
    ///
    /// Fails without side effects when `auth` holds no usable token. Otherwise
    /// the slot of `key` is emptied, any chain still running for `key` is
    /// cancelled and a new chain is spawned. Returns immediately.
    pub fn begin<S>(
        &mut self,
        key: impl Into<String>,
        source: S,
        auth: &AuthContext,
    ) -> Result<(), AggregateError>
    where
        S: PageSource<T>,
    {
        let key = key.into();
        let token = auth.bearer()?.to_string();

        if let Some(previous) = self.traversals.get(&key) {
            previous.cancel.cancel();
        }

        self.next_epoch += 1;
        let epoch = self.next_epoch;
        let cancel = CancelToken::new();

        self.accumulator.insert(key.clone(), Vec::new());
        self.traversals.insert(
            key.clone(),
            Traversal {
                epoch,
                limit: self.page_size,
                cancel: cancel.clone(),
                state: TraversalState::Fetching { offset: 0 },
                total: None,
            },
        );
        // a restarted key must not report the superseded traversal's outcome
        self.pending.retain(|notice| notice.key() != key);

        let chain = Chain {
            cursor: FetchCursor::start(key, self.page_size),
            epoch,
            token,
            source: Arc::new(source),
            cancel,
            policy: self.policy,
            events: self.events_tx.clone(),
        };

        self.chains.retain(|handle| !handle.is_finished());
        self.chains.push(tokio::spawn(chain.run()));

        Ok(())
    }

    /// Waits for the next notice of any current traversal. Returns `None` once
    /// no traversal is fetching anymore.
    pub async fn next_notice(&mut self) -> Option<Notice> {
        if let Some(notice) = self.pending.pop_front() {
            return Some(notice);
        }

        while self.is_busy() {
            let event = self.events_rx.recv().await?;
            if let Some(notice) = self.apply(event) {
                return Some(notice);
            }
        }

        None
    }

    /// Pumps events until the traversal of `key` terminates and returns its
    /// terminal notice. Notices of other keys are kept for `next_notice`.
    /// Returns `None` if `key` is not being fetched.
    pub async fn wait_for(&mut self, key: &str) -> Option<Notice> {
        if let Some(pos) = self
            .pending
            .iter()
            .position(|n| n.key() == key && n.is_terminal())
        {
            let notice = self.pending.remove(pos);
            self.pending.retain(|n| n.key() != key);
            return notice;
        }

        while self.is_busy_for(key) {
            let event = self.events_rx.recv().await?;
            match self.apply(event) {
                Some(notice) if notice.key() == key && notice.is_terminal() => {
                    return Some(notice);
                }
                Some(notice) if notice.key() == key => {}
                Some(notice) => self.pending.push_back(notice),
                None => {}
            }
        }

        None
    }

    /// Applies every event that is already queued without waiting.
    pub fn poll(&mut self) -> Vec<Notice> {
        let mut notices: Vec<Notice> = self.pending.drain(..).collect();
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(notice) = self.apply(event) {
                notices.push(notice);
            }
        }
        notices
    }

    /// Waits until every spawned chain, superseded ones included, has ended
    /// and applies all of their events. Terminal notices produced on the way
    /// are kept for `next_notice`.
    pub async fn settle(&mut self) {
        for handle in std::mem::take(&mut self.chains) {
            if let Err(e) = handle.await {
                warning!("{} traversal task ended abnormally: {}", self.kind, e);
            }
        }

        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(notice) = self.apply(event) {
                if notice.is_terminal() {
                    self.pending.push_back(notice);
                }
            }
        }
    }

    fn apply(&mut self, event: PageEvent<T>) -> Option<Notice> {
        let (key, epoch) = match &event {
            PageEvent::Page { key, epoch, .. }
            | PageEvent::Reset { key, epoch }
            | PageEvent::Finished { key, epoch, .. }
            | PageEvent::Failed { key, epoch, .. } => (key.clone(), *epoch),
        };

        let current = self
            .traversals
            .get(&key)
            .is_some_and(|t| t.epoch == epoch && !t.state.is_terminal());
        if !current {
            self.stale += 1;
            return None;
        }

        let traversal = self.traversals.get_mut(&key)?;
        let slot = self.accumulator.entry(key.clone()).or_default();

        match event {
            PageEvent::Page {
                offset,
                items,
                total,
                ..
            } => {
                slot.extend(items);
                traversal.total = Some(total);
                traversal.state = TraversalState::Fetching {
                    offset: offset.saturating_add(traversal.limit),
                };
                Some(Notice::Progress {
                    key,
                    fetched: slot.len(),
                    total,
                })
            }
            PageEvent::Reset { .. } => {
                slot.clear();
                traversal.total = None;
                traversal.state = TraversalState::Fetching { offset: 0 };
                None
            }
            PageEvent::Finished {
                total,
                inconsistent,
                ..
            } => {
                traversal.state = TraversalState::Done {
                    total,
                    inconsistent,
                };
                if inconsistent {
                    warning!(
                        "{} '{}' reported {} items but {} were received",
                        self.kind,
                        key,
                        total,
                        slot.len()
                    );
                }
                Some(Notice::Completed {
                    key,
                    total,
                    inconsistent,
                })
            }
            PageEvent::Failed { offset, error, .. } => {
                traversal.state = TraversalState::Failed { offset };
                let error = AggregateError::Transport {
                    key: key.clone(),
                    offset,
                    source: error,
                };
                warning!("Failed to fetch {}: {}", self.kind, error);
                Some(Notice::Failed { key, error })
            }
        }
    }

    /// True while any current traversal is still fetching.
    pub fn is_busy(&self) -> bool {
        self.traversals
            .values()
            .any(|t| matches!(t.state, TraversalState::Fetching { .. }))
    }

    pub fn is_busy_for(&self, key: &str) -> bool {
        matches!(self.state(key), TraversalState::Fetching { .. })
    }

    pub fn state(&self, key: &str) -> TraversalState {
        self.traversals
            .get(key)
            .map_or(TraversalState::Idle, |t| t.state)
    }

    /// Last total the server reported for the current traversal of `key`.
    pub fn total(&self, key: &str) -> Option<u32> {
        self.traversals.get(key).and_then(|t| t.total)
    }

    pub fn items(&self, key: &str) -> &[T] {
        self.accumulator.get(key).map_or(&[], |items| items.as_slice())
    }

    pub fn accumulator(&self) -> &Accumulator<T> {
        &self.accumulator
    }

    /// Removes the items of a finished traversal from the accumulator.
    pub fn take(&mut self, key: &str) -> Option<Vec<T>> {
        if self.is_busy_for(key) {
            return None;
        }
        self.accumulator.remove(key)
    }

    /// Number of page events dropped because their chain had been superseded.
    pub fn stale_responses(&self) -> usize {
        self.stale
    }
}

impl<T> Drop for Aggregator<T> {
    fn drop(&mut self) {
        for traversal in self.traversals.values() {
            traversal.cancel.cancel();
        }
    }
}
