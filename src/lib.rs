//! Toolkit-agnostic dialog orchestration for view-models.

pub mod config;
pub mod dialogs;

pub use config::{ManagerConfig, ProgressOverlap};
pub use dialogs::{DialogError, DialogManager, DialogResult, MessageDialogResult};
