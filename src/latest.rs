//! Latest-request-wins delivery of projection results.
//!
//! A caller that fires a new projection before the previous one finished only
//! ever wants the newest answer. [`LatestSlot`] numbers requests and drops any
//! result whose ticket is no longer the latest; [`ProjectionRunner`] also aborts
//! the superseded task so it stops reading from the store.

use crate::{
    core::projection::{ProjectionReport, ProjectionRequest},
    errors::Result,
    service::ProjectionService,
};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// Identifies one submitted request. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Holds the value of the most recently issued ticket.
#[derive(Debug)]
pub struct LatestSlot<T> {
    issued: AtomicU64,
    tx: watch::Sender<Option<T>>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestSlot<T> {
    /// An empty slot with no ticket issued.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            issued: AtomicU64::new(0),
            tx,
        }
    }

    /// Issues a ticket that supersedes all earlier ones.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the latest issued.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Stores `value` if `ticket` is still current, returning whether it was stored.
    ///
    /// The check runs under the channel lock, so a stale value can never
    /// replace one stored for a newer ticket.
    pub fn apply(&self, ticket: Ticket, value: T) -> bool {
        self.tx.send_if_modified(|slot| {
            if !self.is_current(ticket) {
                return false;
            }
            *slot = Some(value);
            true
        })
    }

    /// Receiver notified every time a value is applied.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

/// Runs projections in the background, keeping only the newest result.
pub struct ProjectionRunner {
    service: ProjectionService,
    slot: Arc<LatestSlot<Result<ProjectionReport>>>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl ProjectionRunner {
    /// Creates a runner over `service`.
    #[must_use]
    pub fn new(service: ProjectionService) -> Self {
        Self {
            service,
            slot: Arc::new(LatestSlot::new()),
            in_flight: Mutex::new(None),
        }
    }

    /// Receiver for applied results.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Result<ProjectionReport>>> {
        self.slot.subscribe()
    }

    /// Submits a projection for the current month, aborting the one in flight.
    pub async fn submit(&self, request: ProjectionRequest) -> Ticket {
        self.spawn(request, None).await
    }

    /// Submits a projection for the window ending at `today`'s month.
    pub async fn submit_at(&self, request: ProjectionRequest, today: NaiveDate) -> Ticket {
        self.spawn(request, Some(today)).await
    }

    /// Waits for the task in flight, if any, to finish or be aborted.
    pub async fn settle(&self) {
        let handle = self.in_flight.lock().await.take();
        if let Some(handle) = handle {
            // Cancellation of a superseded task is expected here
            let _ = handle.await;
        }
    }

    async fn spawn(&self, request: ProjectionRequest, today: Option<NaiveDate>) -> Ticket {
        // Issue, spawn and replace under one lock so the stored handle always
        // belongs to the newest ticket.
        let mut in_flight = self.in_flight.lock().await;
        let ticket = self.slot.issue();
        let service = self.service.clone();
        let slot = Arc::clone(&self.slot);

        let handle = tokio::spawn(async move {
            let result = match today {
                Some(today) => service.project_at(request, today).await,
                None => service.project(request).await,
            };
            if !slot.apply(ticket, result) {
                debug!("Discarded stale projection result {}", ticket);
            }
        });

        if let Some(previous) = in_flight.replace(handle) {
            previous.abort();
            debug!("Aborted projection superseded by {}", ticket);
        }
        ticket
    }
}
