//! The loader actor: one mailbox, one reducer.
//!
//! Every trigger (initial load, parameter change, manual reload, refresh
//! signal) and every fetch outcome arrives as a [`Command`] and is applied in
//! arrival order. Fetch cycles run on their own tasks and report back through
//! the same mailbox, tagged with the generation they were issued under.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::api::TransportError;
use crate::loader::fetch::Fetcher;
use crate::loader::handle::LoaderHandle;
use crate::loader::state::{Generation, LoadState};
use crate::notifications::NotificationCenter;
use crate::observability::metrics;
use crate::resilience::{retry_until, RetryPolicy};

/// Per-loader behaviour.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    pub retry: RetryPolicy,
    /// Shown as an error notification when a cycle exhausts its retries.
    /// `None` keeps failures silent.
    pub failure_message: Option<String>,
}

impl LoaderOptions {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            retry,
            failure_message: None,
        }
    }

    pub fn notify_on_failure(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }
}

pub(crate) enum Command<P, T> {
    Load {
        params: P,
        ack: Option<oneshot::Sender<Generation>>,
    },
    Reload {
        ack: Option<oneshot::Sender<Generation>>,
    },
    Settled {
        generation: Generation,
        result: Result<T, TransportError>,
        attempts: u32,
    },
}

/// Owns the state of one loaded resource.
pub struct ResourceLoader<F: Fetcher> {
    fetcher: Arc<F>,
    params: F::Params,
    options: LoaderOptions,
    notifications: NotificationCenter,
    generation: Generation,
    state: watch::Sender<LoadState<F::Output>>,
    // Weak so the actor stops once every handle and in-flight cycle is gone.
    mailbox: mpsc::WeakUnboundedSender<Command<F::Params, F::Output>>,
}

impl<F: Fetcher> ResourceLoader<F> {
    /// Start a loader and issue its initial load for `params`.
    ///
    /// The returned handle already reports `is_loading`.
    pub fn spawn(
        fetcher: F,
        params: F::Params,
        options: LoaderOptions,
        notifications: NotificationCenter,
    ) -> LoaderHandle<F::Params, F::Output> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state, state_rx) = watch::channel(LoadState::default());

        let mut actor = Self {
            fetcher: Arc::new(fetcher),
            params,
            options,
            notifications,
            generation: 0,
            state,
            mailbox: tx.downgrade(),
        };

        tracing::debug!(resource = actor.fetcher.resource(), params = ?actor.params, "Loader started");
        actor.begin();
        tokio::spawn(actor.run(rx));

        LoaderHandle::new(tx, state_rx)
    }

    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Command<F::Params, F::Output>>) {
        while let Some(command) = inbox.recv().await {
            self.handle(command);
        }
        tracing::debug!(resource = self.fetcher.resource(), "Loader stopped");
    }

    fn handle(&mut self, command: Command<F::Params, F::Output>) {
        match command {
            Command::Load { params, ack } => {
                self.params = params;
                let generation = self.begin();
                if let Some(ack) = ack {
                    let _ = ack.send(generation);
                }
            }
            Command::Reload { ack } => {
                let generation = self.begin();
                if let Some(ack) = ack {
                    let _ = ack.send(generation);
                }
            }
            Command::Settled {
                generation,
                result,
                attempts,
            } => self.settle(generation, result, attempts),
        }
    }

    /// Open a new fetch cycle, superseding whatever is in flight.
    ///
    /// A superseded cycle finishes its current attempt but schedules no
    /// further retries; whatever it posts is dropped by the generation check.
    fn begin(&mut self) -> Generation {
        self.generation += 1;
        let generation = self.generation;
        let resource = self.fetcher.resource();

        self.state.send_modify(|state| state.begin(generation));

        let Some(mailbox) = self.mailbox.upgrade() else {
            tracing::debug!(resource, generation, "No receivers left, fetch skipped");
            return generation;
        };

        tracing::debug!(resource, generation, params = ?self.params, "Fetch cycle started");

        let fetcher = Arc::clone(&self.fetcher);
        let params = self.params.clone();
        let policy = self.options.retry.clone();
        let mut latest = self.state.subscribe();
        tokio::spawn(async move {
            let superseded = async move {
                let _ = latest.wait_for(|state| state.generation() != generation).await;
            };
            let outcome = retry_until(resource, &policy, |_| fetcher.fetch(&params), superseded).await;
            // The actor may already be gone; nothing left to update then.
            let _ = mailbox.send(Command::Settled {
                generation,
                result: outcome.result,
                attempts: outcome.attempts,
            });
        });

        generation
    }

    fn settle(&mut self, generation: Generation, result: Result<F::Output, TransportError>, attempts: u32) {
        let resource = self.fetcher.resource();

        if generation != self.generation {
            tracing::debug!(
                resource,
                generation,
                latest = self.generation,
                "Discarding superseded fetch result"
            );
            metrics::record_fetch_outcome(resource, "superseded");
            return;
        }

        match result {
            Ok(data) => {
                tracing::debug!(resource, generation, attempts, "Fetch cycle succeeded");
                metrics::record_fetch_outcome(resource, "success");
                self.state.send_modify(|state| state.succeed(data));
            }
            Err(error) => {
                tracing::warn!(
                    resource,
                    generation,
                    attempts,
                    error = %error,
                    "Fetch cycle failed, retries exhausted"
                );
                metrics::record_fetch_outcome(resource, "exhausted");
                self.state.send_modify(|state| state.fail(error));
                if let Some(message) = &self.options.failure_message {
                    self.notifications.show_error(message.clone());
                }
            }
        }
    }
}
