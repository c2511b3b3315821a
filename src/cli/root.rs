use anyhow::Result;
use clap::{Parser, Subcommand};
use dialog_manager::{
    dialogs::{ChannelHost, DialogManager, MainWindowSlot, TemplateRegistry, WindowHandle},
    ManagerConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::console::spawn_console_ui;
use super::sample::{register_templates, MainWindowViewModel};

/// Walk through every dialog the manager offers, answered on the terminal
#[derive(Parser)]
#[command(
    name = "dialog-manager",
    version,
    about = "Toolkit-agnostic dialog orchestration, demonstrated on the terminal",
    long_about = r#"Runs the sample view-model commands against a console dialog host.

Examples:
  dialog-manager                         # Run every sample command in turn
  dialog-manager file --filter "*.rs"    # Pick a file
  dialog-manager progress --steps 5      # Show a progress dialog"#
)]
pub struct Cli {
    /// Current working directory
    #[arg(short = 'c', long = "cwd", global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick one or more folders
    Folder {
        /// Initial directory
        #[arg(short, long, default_value = "")]
        initial: String,
        /// Allow selecting several folders
        #[arg(short, long)]
        multi: bool,
    },
    /// Pick one or more files
    File {
        /// Initial directory
        #[arg(short, long, default_value = "")]
        initial: String,
        /// Filter passed to the host, defaults to the configured filter
        #[arg(short, long)]
        filter: Option<String>,
        /// Allow selecting several files
        #[arg(short, long)]
        multi: bool,
    },
    /// Choose a save target
    Save {
        /// Suggested file name
        #[arg(default_value = "report")]
        file_name: String,
        /// Default extension
        #[arg(short, long, default_value = ".txt")]
        ext: String,
        /// Filter passed to the host
        #[arg(short, long, default_value = "Text (*.txt)|*.txt")]
        filter: String,
    },
    /// Ask an OK/Cancel question
    Confirm,
    /// Show an informational message
    Info,
    /// Show a progress dialog
    Progress {
        /// Number of updates
        #[arg(short, long, default_value_t = 10)]
        steps: u32,
        /// Delay between updates in milliseconds
        #[arg(long, default_value_t = 300)]
        delay_ms: u64,
    },
    /// Show the About custom dialog
    Custom,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        if let Some(cwd) = &self.cwd {
            std::env::set_current_dir(cwd)
                .map_err(|e| anyhow::anyhow!("Failed to change directory to {}: {}", cwd.display(), e))?;
            info!("Changed working directory to: {}", cwd.display());
        }

        let config = ManagerConfig::init().await?;
        debug!("Configuration initialized: {:?}", config);
        let default_filter = config.default_filter.clone();

        let (host, requests) = ChannelHost::new();
        let ui = spawn_console_ui(requests);
        let windows = MainWindowSlot::new(Some(WindowHandle::new(1, "dialog-manager")));
        let manager = DialogManager::with_config(
            Arc::new(host),
            Arc::new(windows),
            TemplateRegistry::new(),
            config,
        );
        register_templates(&manager).await;

        let mut view_model = MainWindowViewModel::new(manager);
        match self.command {
            Some(Commands::Folder { initial, multi }) => {
                view_model.show_folder_browser(&initial, multi).await?
            }
            Some(Commands::File { initial, filter, multi }) => {
                let filter = filter.unwrap_or(default_filter);
                view_model.show_file_browser(&initial, &filter, multi).await?
            }
            Some(Commands::Save { file_name, ext, filter }) => {
                view_model.show_save_file_dialog(&file_name, &ext, &filter).await?
            }
            Some(Commands::Confirm) => view_model.show_ok_cancel_dialog().await?,
            Some(Commands::Info) => view_model.show_info_dialog().await?,
            Some(Commands::Progress { steps, delay_ms }) => {
                view_model
                    .show_progress(steps, Duration::from_millis(delay_ms))
                    .await?
            }
            Some(Commands::Custom) => view_model.show_custom_dialog().await?,
            None => {
                info!("Running every sample command");
                view_model.show_folder_browser("", false).await?;
                view_model.show_file_browser("", &default_filter, false).await?;
                view_model.show_info_dialog().await?;
                view_model.show_ok_cancel_dialog().await?;
                view_model.show_progress(10, Duration::from_millis(300)).await?;
                view_model.show_custom_dialog().await?;
            }
        }

        debug!("Custom dialog cache: {:?}", view_model.manager().cache_stats());

        // Dropping the manager closes the request channel and ends the UI loop
        drop(view_model);
        ui.await?;
        Ok(())
    }
}
