//! Cloneable handle to a running loader.

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::loader::actor::Command;
use crate::loader::state::{Generation, LoadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoaderError {
    #[error("Loader is no longer running")]
    Closed,
}

/// Sends triggers to a loader and observes its state.
pub struct LoaderHandle<P, T> {
    mailbox: mpsc::UnboundedSender<Command<P, T>>,
    state: watch::Receiver<LoadState<T>>,
}

impl<P, T> Clone for LoaderHandle<P, T> {
    fn clone(&self) -> Self {
        Self {
            mailbox: self.mailbox.clone(),
            state: self.state.clone(),
        }
    }
}

impl<P, T> LoaderHandle<P, T>
where
    P: Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(mailbox: mpsc::UnboundedSender<Command<P, T>>, state: watch::Receiver<LoadState<T>>) -> Self {
        Self { mailbox, state }
    }

    /// Replace the parameters and start a new cycle.
    ///
    /// Resolves once the cycle is issued, not once it settles.
    pub async fn load(&self, params: P) -> Result<Generation, LoaderError> {
        let (ack, issued) = oneshot::channel();
        self.send(Command::Load { params, ack: Some(ack) })?;
        issued.await.map_err(|_| LoaderError::Closed)
    }

    /// Re-run the current parameters in a new cycle.
    pub async fn reload(&self) -> Result<Generation, LoaderError> {
        let (ack, issued) = oneshot::channel();
        self.send(Command::Reload { ack: Some(ack) })?;
        issued.await.map_err(|_| LoaderError::Closed)
    }

    /// Fire-and-forget variant of [`load`](Self::load).
    pub fn request_load(&self, params: P) -> Result<(), LoaderError> {
        self.send(Command::Load { params, ack: None })
    }

    /// Fire-and-forget variant of [`reload`](Self::reload).
    pub fn request_reload(&self) -> Result<(), LoaderError> {
        self.send(Command::Reload { ack: None })
    }

    pub fn state(&self) -> LoadState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> T {
        self.state.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn is_error(&self) -> bool {
        self.state.borrow().is_error()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.state.clone()
    }

    /// Wait until no cycle is in flight and return that state.
    pub async fn settled(&self) -> Result<LoadState<T>, LoaderError> {
        let mut state = self.state.clone();
        let settled = state.wait_for(|s| !s.is_loading()).await.map_err(|_| LoaderError::Closed)?;
        Ok(settled.clone())
    }

    /// Reload every time `signal` fires, until the signal source or the
    /// loader goes away.
    pub fn refresh_on<S>(&self, mut signal: broadcast::Receiver<S>) -> JoinHandle<()>
    where
        S: Clone + Send + 'static,
    {
        let handle = self.clone();
        tokio::spawn(async move {
            loop {
                match signal.recv().await {
                    Ok(_) => {
                        if handle.request_reload().is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Refresh signals lagged");
                        if handle.request_reload().is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn send(&self, command: Command<P, T>) -> Result<(), LoaderError> {
        self.mailbox.send(command).map_err(|_| LoaderError::Closed)
    }
}
