//! Background removal of uploads older than the retention window.
//!
//! `start_retention_sweeper` is spawned from `main.rs` and wakes up every
//! `period`. Each pass reads `dataRetentionDays` from the live settings, so an
//! admin change takes effect on the next tick without a restart. Expired files
//! go through the same cascade as a user-initiated delete.

use crate::error::ApiResult;
use crate::services::files::remove_file;
use crate::state::AppState;
use chrono::{DateTime, Duration, Utc};
use log::{error, info, warn};
use std::time::Duration as StdDuration;

const MIN_PERIOD: StdDuration = StdDuration::from_secs(1);

pub async fn start_retention_sweeper(state: AppState, period: StdDuration) {
    let mut ticker = tokio::time::interval(period.max(MIN_PERIOD));
    loop {
        ticker.tick().await;
        let settings = state.settings.snapshot().await;
        let Some(cutoff) = retention_cutoff(Utc::now(), settings.data_retention_days) else {
            warn!(
                "retention window of {} days is out of range; skipping sweep",
                settings.data_retention_days
            );
            continue;
        };
        match purge_expired(&state, cutoff) {
            Ok(0) => {}
            Ok(purged) => info!(
                "retention sweep removed {} file(s) uploaded before {}",
                purged, cutoff
            ),
            Err(e) => error!("retention sweep failed: {}", e),
        }
    }
}

/// The oldest upload time still kept, or `None` when `days` reaches past the
/// representable calendar.
pub fn retention_cutoff(now: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    Duration::try_days(i64::from(days)).and_then(|window| now.checked_sub_signed(window))
}

/// Deletes every file uploaded before `cutoff`, with its charts and bytes.
pub fn purge_expired(state: &AppState, cutoff: DateTime<Utc>) -> ApiResult<usize> {
    let expired = state.store.files_uploaded_before(cutoff)?;
    for (file_id, path) in &expired {
        remove_file(state, file_id, path)?;
    }
    Ok(expired.len())
}
