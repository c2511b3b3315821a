//! Progress session lifecycle
//!
//! At most one progress overlay is open per manager. The session owns the
//! host's native controller and mirrors the last values pushed to it.

use super::{host::ProgressController, types::DialogResult};
use std::fmt;
use tracing::debug;

pub const PROGRESS_MINIMUM: f64 = 0.0;
pub const PROGRESS_MAXIMUM: f64 = 100.0;

/// Lifecycle state of the progress overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressState {
    #[default]
    Closed,
    Open,
}

/// Read-only view of the active session
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub title: String,
    pub message: String,
    pub value: f64,
}

/// An open progress overlay
pub struct ProgressSession {
    snapshot: ProgressSnapshot,
    controller: Box<dyn ProgressController>,
}

impl ProgressSession {
    pub fn open(
        title: impl Into<String>,
        message: impl Into<String>,
        controller: Box<dyn ProgressController>,
    ) -> Self {
        Self {
            snapshot: ProgressSnapshot {
                title: title.into(),
                message: message.into(),
                value: PROGRESS_MINIMUM,
            },
            controller,
        }
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    /// Push a new value, clamped to the progress range. NaN is ignored.
    pub fn set_progress(&mut self, value: f64) {
        if value.is_nan() {
            debug!("Ignoring NaN progress value");
            return;
        }
        let value = value.clamp(PROGRESS_MINIMUM, PROGRESS_MAXIMUM);
        self.snapshot.value = value;
        self.controller.set_progress(value);
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.snapshot.message = message.into();
        self.controller.set_message(&self.snapshot.message);
    }

    /// Close the native overlay
    pub async fn close(self) -> DialogResult<()> {
        debug!("Closing progress dialog '{}'", self.snapshot.title);
        self.controller.close().await
    }
}

impl fmt::Debug for ProgressSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressSession")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}
