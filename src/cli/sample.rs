//! Sample view-models driving the dialog manager

use super::console::ConsoleView;
use anyhow::Result;
use dialog_manager::dialogs::{
    CloseCommandSlot, DialogManager, DialogViewModel, MessageDialogResult, ViewModelId,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// View-model of the demo's "About" custom dialog
pub struct AboutViewModel {
    id: ViewModelId,
    close: CloseCommandSlot,
    pub version: &'static str,
}

impl AboutViewModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ViewModelId::new(),
            close: CloseCommandSlot::new(),
            version: env!("CARGO_PKG_VERSION"),
        })
    }

    /// What the dialog's close button does
    pub fn close(&self) -> bool {
        self.close.execute()
    }
}

impl DialogViewModel for AboutViewModel {
    fn view_model_id(&self) -> ViewModelId {
        self.id
    }

    fn close_command_slot(&self) -> &CloseCommandSlot {
        &self.close
    }
}

/// Register the demo's custom dialog templates
pub async fn register_templates(manager: &DialogManager) {
    manager
        .templates()
        .register::<AboutViewModel, _, _>(|| ConsoleView {
            heading: "About".to_string(),
            lines: vec![
                format!("dialog-manager {}", env!("CARGO_PKG_VERSION")),
                "Toolkit-agnostic dialogs for view-models".to_string(),
            ],
        })
        .await;
}

/// The demo's main window view-model, one command per dialog kind
pub struct MainWindowViewModel {
    manager: DialogManager,
    about: Arc<AboutViewModel>,
}

impl MainWindowViewModel {
    pub fn new(manager: DialogManager) -> Self {
        Self {
            manager,
            about: AboutViewModel::new(),
        }
    }

    pub fn manager(&self) -> &DialogManager {
        &self.manager
    }

    pub async fn show_folder_browser(&mut self, initial: &str, multi: bool) -> Result<()> {
        if self.manager.show_folder_browser("Select a folder", initial, multi).await? {
            let selected = join_paths(self.manager.folder_paths());
            self.manager.show_info_dialog("Folder Selected", &selected).await?;
        }
        Ok(())
    }

    pub async fn show_file_browser(&mut self, initial: &str, filter: &str, multi: bool) -> Result<()> {
        if self.manager.show_file_browser("Select a file", initial, filter, multi).await? {
            let selected = join_paths(self.manager.file_paths());
            self.manager.show_info_dialog("File Selected", &selected).await?;
        }
        Ok(())
    }

    pub async fn show_save_file_dialog(&mut self, file_name: &str, ext: &str, filter: &str) -> Result<()> {
        if self
            .manager
            .show_save_file_dialog("Save", "", file_name, ext, filter)
            .await?
        {
            let saved = self.manager.save_path().display().to_string();
            self.manager.show_info_dialog("Save Target", &saved).await?;
        }
        Ok(())
    }

    pub async fn show_info_dialog(&self) -> Result<()> {
        self.manager
            .show_info_dialog("Info dialog", "This is a info dialog example")
            .await?;
        Ok(())
    }

    pub async fn show_ok_cancel_dialog(&self) -> Result<()> {
        let result = self
            .manager
            .show_ok_cancel_dialog("This is a Ok Cancel Dialog", "Ok Cancel Dialog")
            .await?;
        let text = match result {
            MessageDialogResult::Ok => "You select Ok",
            MessageDialogResult::Cancel => "You select Cancel",
        };
        self.manager.show_info_dialog("Result", text).await?;
        Ok(())
    }

    /// Open a progress dialog and walk it through `steps` updates
    pub async fn show_progress(&mut self, steps: u32, delay: Duration) -> Result<()> {
        self.manager
            .show_progress("Progress", "This is a progress dialog")
            .await?;
        for i in 0..steps {
            tokio::time::sleep(delay).await;
            let value = f64::from(i + 1) * 100.0 / f64::from(steps.max(1));
            self.manager.update_progress(value);
            self.manager
                .update_message_progress(&format!("Step {} done", i + 1));
        }
        self.manager.close_progress().await?;
        Ok(())
    }

    pub async fn show_custom_dialog(&mut self) -> Result<()> {
        if self.manager.show_dialog(self.about.clone()).await? {
            info!("About dialog (version {}) shown", self.about.version);
            self.about.close();
        } else {
            self.manager
                .show_info_dialog("About", "No template registered for the About dialog")
                .await?;
        }
        Ok(())
    }
}

fn join_paths(paths: &[std::path::PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
