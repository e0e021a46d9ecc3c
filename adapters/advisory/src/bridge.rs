//! Non-blocking bridge between the tick loop and the advisor.

use std::sync::Arc;

use tokio::{
    runtime::{Builder, Runtime},
    sync::oneshot::{self, error::TryRecvError},
};
use tracing::{debug, warn};

use crate::{Advisor, AdvisoryError, AdvisoryRequest, REQUEST_FAILED_FALLBACK};

/// Runs at most one advisory request at a time on a background runtime.
///
/// The caller polls for the answer between ticks; nothing on this type ever
/// blocks on the provider.
#[derive(Debug)]
pub struct AdvisoryBridge {
    runtime: Option<Runtime>,
    advisor: Arc<Advisor>,
    pending: Option<oneshot::Receiver<String>>,
}

impl AdvisoryBridge {
    /// Starts the background runtime for the provided advisor.
    pub fn new(advisor: Advisor) -> Result<Self, AdvisoryError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("advisory")
            .build()?;
        Ok(Self {
            runtime: Some(runtime),
            advisor: Arc::new(advisor),
            pending: None,
        })
    }

    /// Starts a request unless one is already in flight. Returns whether the
    /// request was accepted.
    pub fn request(&mut self, request: AdvisoryRequest) -> bool {
        if self.pending.is_some() {
            debug!("advice already in flight");
            return false;
        }
        let Some(runtime) = self.runtime.as_ref() else {
            return false;
        };

        let (sender, receiver) = oneshot::channel();
        let advisor = Arc::clone(&self.advisor);
        let _ = runtime.spawn_blocking(move || {
            let _ = sender.send(advisor.advise(&request));
        });
        self.pending = Some(receiver);
        true
    }

    /// Returns the answer once it is ready. Never blocks.
    pub fn poll(&mut self) -> Option<String> {
        let receiver = self.pending.as_mut()?;
        match receiver.try_recv() {
            Ok(text) => {
                self.pending = None;
                Some(text)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                warn!("advisory task ended without an answer");
                self.pending = None;
                Some(REQUEST_FAILED_FALLBACK.to_owned())
            }
        }
    }

    /// Abandons the in-flight request. A late answer is dropped.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("advice request cancelled");
        }
    }

    /// Reports whether a request is in flight.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for AdvisoryBridge {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
