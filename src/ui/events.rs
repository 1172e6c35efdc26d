//! Application event handling.
//!
//! Applies background task results to application state.

use crate::app::{App, AppEvent};
use crate::listing::ApplyOutcome;

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ArticlesLoaded { seq, result } => {
            if app.apply_fetch(seq, result) == ApplyOutcome::Stale {
                tracing::trace!(seq, "Ignored superseded fetch result");
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.set_status(format!("Internal error in {}: {}", task, error));
        }
    }
}
