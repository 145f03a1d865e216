//! Waiting for a finished download to become visible and stable on disk
//!
//! yt-dlp may still be renaming or merging when its process reports success.
//! Instead of sleeping for a fixed delay, the directory is polled until the
//! media file for a job shows the same size on two consecutive checks.

use crate::downloader::store::{DownloadsDir, StoredFile};
use crate::utils::error::ClippersError;
use anyhow::Result;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// How long and how often to poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl SettlePolicy {
    /// The timeout is raised to two poll intervals so stability can be observed at all.
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout: timeout.max(poll_interval.saturating_mul(2)),
        }
    }
}

/// Poll `store` until the media file for `id` is stable.
///
/// Fails with [`ClippersError::FileNotFound`] when no media file appeared at
/// all, and with [`ClippersError::SettleTimeout`] when one appeared but kept
/// changing until the deadline.
pub async fn wait_for_media(store: &DownloadsDir, id: &str, policy: SettlePolicy) -> Result<StoredFile> {
    // No deadline when the timeout is beyond what `Instant` can represent
    let deadline = Instant::now().checked_add(policy.timeout);
    let mut previous: Option<StoredFile> = None;

    loop {
        let current = store.find_media(id).await?;

        match (&previous, &current) {
            (Some(before), Some(now)) if before == now => {
                debug!("{} settled at {} bytes", now.filename, now.size);
                return Ok(now.clone());
            }
            (_, Some(now)) => debug!("{} seen at {} bytes", now.filename, now.size),
            (_, None) => debug!("No media file for {} yet", id),
        }

        let seen_any = previous.is_some() || current.is_some();
        let out_of_time = match (deadline, Instant::now().checked_add(policy.poll_interval)) {
            (Some(deadline), Some(next_poll)) => next_poll > deadline,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if out_of_time {
            return Err(match (seen_any, current) {
                (true, Some(file)) => ClippersError::SettleTimeout(file.filename),
                (true, None) => ClippersError::SettleTimeout(id.to_string()),
                (false, _) => ClippersError::FileNotFound(id.to_string()),
            }
            .into());
        }

        if current.is_some() {
            previous = current;
        }
        sleep(policy.poll_interval).await;
    }
}
