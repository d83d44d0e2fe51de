//! Bounded-concurrency dispatch of domain lookups.
//!
//! Domains arrive on a work queue, each one waits for a slot in a shared
//! semaphore and then runs as its own task. Outcomes are forwarded in
//! completion order on a result channel, which is closed only after every
//! dispatched task has finished.

use crate::types::LookupOutcome;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Something that can classify a single domain.
///
/// Implementations must always produce an outcome; failures are expressed
/// through [`LookupStatus`](crate::LookupStatus), not errors.
pub trait DomainLookup: Send + Sync + 'static {
    fn lookup(&self, domain: String) -> impl Future<Output = LookupOutcome> + Send;
}

/// Create the work queue feeding a [`Dispatcher`].
///
/// The producer closes the queue by dropping the sender.
pub fn work_queue(capacity: usize) -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
    mpsc::channel(capacity.max(1))
}

/// Runs lookups with at most `concurrency` of them in flight.
pub struct Dispatcher<L> {
    lookup: Arc<L>,
    concurrency: usize,
}

impl<L: DomainLookup> Dispatcher<L> {
    /// Create a dispatcher. A concurrency below 1 is raised to 1.
    pub fn new(lookup: L, concurrency: usize) -> Self {
        Self::with_shared(Arc::new(lookup), concurrency)
    }

    /// Create a dispatcher around an already shared lookup implementation.
    pub fn with_shared(lookup: Arc<L>, concurrency: usize) -> Self {
        Self {
            lookup,
            concurrency: concurrency.max(1),
        }
    }

    /// Maximum number of lookups in flight.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Start draining `domains` in the background.
    ///
    /// Returns the result stream: one outcome per domain received, in
    /// completion order. The stream ends once the work queue is closed and
    /// every started lookup has delivered its outcome.
    pub fn spawn(&self, domains: mpsc::Receiver<String>) -> mpsc::Receiver<LookupOutcome> {
        let (results_tx, results_rx) = mpsc::channel(self.concurrency);
        let lookup = Arc::clone(&self.lookup);
        let budget = Arc::new(Semaphore::new(self.concurrency));

        tokio::spawn(async move {
            let dispatched = dispatch(lookup, budget, domains, results_tx).await;
            tracing::debug!(dispatched, "Work queue drained, all lookups finished");
        });

        results_rx
    }

    /// Look up every domain of `domains` and collect the outcomes.
    pub async fn lookup_all(&self, domains: Vec<String>) -> Vec<LookupOutcome> {
        let (work_tx, work_rx) = work_queue(self.concurrency);
        let mut results = self.spawn(work_rx);

        let feeder = tokio::spawn(async move {
            for domain in domains {
                if work_tx.send(domain).await.is_err() {
                    break;
                }
            }
        });

        let mut outcomes = Vec::new();
        while let Some(outcome) = results.recv().await {
            outcomes.push(outcome);
        }

        if let Err(e) = feeder.await {
            tracing::warn!(error = %e, "Domain feeder task failed");
        }

        outcomes
    }
}

/// Dispatch loop. Returns the number of lookups started.
///
/// `results` is dropped only after every task has been joined, and each task
/// holds its own clone until it has sent its outcome, so the stream can
/// never close early.
async fn dispatch<L: DomainLookup>(
    lookup: Arc<L>,
    budget: Arc<Semaphore>,
    mut domains: mpsc::Receiver<String>,
    results: mpsc::Sender<LookupOutcome>,
) -> usize {
    let mut tasks = JoinSet::new();
    let mut dispatched = 0usize;

    while let Some(domain) = domains.recv().await {
        let Ok(permit) = Arc::clone(&budget).acquire_owned().await else {
            // The budget is never closed while we hold it, but keep the
            // one-outcome-per-domain contract regardless.
            let _ = results
                .send(LookupOutcome::transport_error(
                    domain,
                    "concurrency budget closed",
                ))
                .await;
            continue;
        };

        let lookup = Arc::clone(&lookup);
        let results = results.clone();
        tasks.spawn(async move {
            let _permit = permit;
            let outcome = match AssertUnwindSafe(lookup.lookup(domain.clone()))
                .catch_unwind()
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(%domain, "Lookup task panicked");
                    LookupOutcome::transport_error(domain, "lookup task panicked")
                }
            };

            if results.send(outcome).await.is_err() {
                tracing::debug!("Result stream dropped before all outcomes were delivered");
            }
        });
        dispatched += 1;

        // Reap finished tasks so the join set stays bounded by the budget.
        while let Some(joined) = tasks.try_join_next() {
            log_join_error(joined);
        }
    }

    while let Some(joined) = tasks.join_next().await {
        log_join_error(joined);
    }

    dispatched
}

fn log_join_error(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::warn!(error = %e, "Lookup task did not complete");
    }
}
