//! Admission control in front of yt-dlp downloads

use crate::utils::error::ClippersError;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

/// Bounded number of concurrent downloads
///
/// Requests beyond the limit queue for at most `max_wait`, then are turned
/// away with [`ClippersError::CapacityExhausted`].
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    limit: usize,
    max_wait: Duration,
}

impl AdmissionGate {
    pub fn new(limit: usize, max_wait: Duration) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
            max_wait,
        }
    }

    /// Wait for a free slot; the slot is released when the permit drops.
    pub async fn admit(&self) -> Result<OwnedSemaphorePermit> {
        if let Ok(permit) = self.semaphore.clone().try_acquire_owned() {
            return Ok(permit);
        }

        debug!("All {} download slots busy, queueing", self.limit);
        match tokio::time::timeout(self.max_wait, self.semaphore.clone().acquire_owned()).await {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(_closed)) => Err(ClippersError::CapacityExhausted.into()),
            Err(_elapsed) => {
                warn!("No download slot freed within {:?}", self.max_wait);
                Err(ClippersError::CapacityExhausted.into())
            }
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
