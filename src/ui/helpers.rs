//! Helper functions for UI operations.
//!
//! Background fetch spawning and the shared text formatting used by
//! several widgets.

use crate::app::{App, AppEvent};
use crate::listing::FetchRequest;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Panics inside spawned tasks would otherwise vanish into the runtime; this
/// turns them into `Err(panic_message)` so the UI can report them.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Run `request` on a background task and report back via `AppEvent::ArticlesLoaded`.
///
/// Earlier requests are left to finish; the controller discards their
/// results by sequence number.
pub(super) fn spawn_fetch(app: &App, request: FetchRequest, event_tx: &mpsc::Sender<AppEvent>) {
    let client = app.client.clone();
    let tx = event_tx.clone();
    let FetchRequest { seq, query } = request;

    tokio::spawn(async move {
        match catch_task_panic(client.fetch(&query)).await {
            Ok(result) => {
                if let Err(e) = tx.send(AppEvent::ArticlesLoaded { seq, result }).await {
                    tracing::warn!(error = %e, event = "ArticlesLoaded", "Channel send failed (receiver dropped)");
                }
            }
            Err(panic_msg) => {
                tracing::error!(task = "fetch", seq, error = %panic_msg, "Background task panicked");
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "fetch",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    });
}

/// Format a Unix timestamp as relative time.
pub(super) fn format_relative_time(published_at: Option<i64>) -> String {
    format_relative_time_at(published_at, Utc::now().timestamp())
}

fn format_relative_time_at(published_at: Option<i64>, now: i64) -> String {
    let Some(ts) = published_at else {
        return String::new();
    };

    let diff = now - ts;

    // Clock skew upstream
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }

    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_714_564_800; // 2024-05-01T12:00:00Z

    #[test]
    fn test_relative_time_buckets() {
        assert_eq!(format_relative_time_at(None, NOW), "");
        assert_eq!(format_relative_time_at(Some(NOW + 30), NOW), "now");
        assert_eq!(format_relative_time_at(Some(NOW - 125), NOW), "2m");
        assert_eq!(format_relative_time_at(Some(NOW - 3 * 3600), NOW), "3h");
        assert_eq!(format_relative_time_at(Some(NOW - 2 * 86400), NOW), "2d");
        assert_eq!(format_relative_time_at(Some(NOW - 30 * 86400), NOW), "Apr 01");
    }

    #[tokio::test]
    async fn test_catch_task_panic() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
        let caught = catch_task_panic(async {
            panic!("boom");
        })
        .await;
        assert_eq!(caught, Err::<(), _>("boom".to_string()));
    }
}
