//! Channel-backed dialog host
//!
//! [`ChannelHost`] turns every host call into a [`HostRequest`] sent to the
//! application's UI loop. Requests that wait for the user carry a oneshot
//! responder; the calling operation stays suspended until the UI answers,
//! while the UI loop itself keeps running.

use super::{
    host::{
        DataContext, DialogHost, FileBrowserRequest, FolderBrowserRequest, MessageRequest,
        ProgressController, SaveFileRequest, WindowHandle,
    },
    registry::VisualHandle,
    types::{DialogError, DialogResult, MessageDialogResult},
};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tracing::{trace, warn};

/// Identifies one progress overlay across its open, update and close requests
pub type ProgressId = u64;

/// Receiving end handed to the UI loop
pub type HostRequestReceiver = mpsc::UnboundedReceiver<HostRequest>;

/// A request for the UI loop
pub enum HostRequest {
    PickFolders {
        window: WindowHandle,
        request: FolderBrowserRequest,
        respond: oneshot::Sender<Option<Vec<PathBuf>>>,
    },
    PickFiles {
        window: WindowHandle,
        request: FileBrowserRequest,
        respond: oneshot::Sender<Option<Vec<PathBuf>>>,
    },
    PickSaveFile {
        window: WindowHandle,
        request: SaveFileRequest,
        respond: oneshot::Sender<Option<PathBuf>>,
    },
    ShowMessage {
        window: WindowHandle,
        request: MessageRequest,
        respond: oneshot::Sender<MessageDialogResult>,
    },
    OpenProgress {
        progress: ProgressId,
        window: WindowHandle,
        title: String,
        message: String,
        respond: oneshot::Sender<()>,
    },
    UpdateProgress {
        progress: ProgressId,
        value: f64,
    },
    UpdateProgressMessage {
        progress: ProgressId,
        message: String,
    },
    CloseProgress {
        progress: ProgressId,
        respond: oneshot::Sender<()>,
    },
    ShowCustomDialog {
        window: WindowHandle,
        visual: VisualHandle,
        data_context: DataContext,
        respond: oneshot::Sender<()>,
    },
    HideCustomDialog {
        window: WindowHandle,
        visual: VisualHandle,
    },
}

impl HostRequest {
    /// Short name of the request, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PickFolders { .. } => "pick_folders",
            Self::PickFiles { .. } => "pick_files",
            Self::PickSaveFile { .. } => "pick_save_file",
            Self::ShowMessage { .. } => "show_message",
            Self::OpenProgress { .. } => "open_progress",
            Self::UpdateProgress { .. } => "update_progress",
            Self::UpdateProgressMessage { .. } => "update_progress_message",
            Self::CloseProgress { .. } => "close_progress",
            Self::ShowCustomDialog { .. } => "show_custom_dialog",
            Self::HideCustomDialog { .. } => "hide_custom_dialog",
        }
    }
}

/// Dialog host driven by a UI loop on the other end of a channel
pub struct ChannelHost {
    sender: mpsc::UnboundedSender<HostRequest>,
    next_progress: AtomicU64,
}

impl ChannelHost {
    pub fn new() -> (Self, HostRequestReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let host = Self {
            sender,
            next_progress: AtomicU64::new(1),
        };
        (host, receiver)
    }

    async fn ask<T, F>(&self, build: F) -> DialogResult<T>
    where
        T: Send,
        F: FnOnce(oneshot::Sender<T>) -> HostRequest + Send,
    {
        let (respond, answer) = oneshot::channel();
        let request = build(respond);
        trace!("Sending {} request to UI loop", request.kind());
        self.sender
            .send(request)
            .map_err(|_| DialogError::HostDisconnected)?;
        answer.await.map_err(|_| DialogError::HostDisconnected)
    }

    fn notify(&self, request: HostRequest) {
        let kind = request.kind();
        if self.sender.send(request).is_err() {
            warn!("UI loop is gone, dropped {} request", kind);
        }
    }
}

#[async_trait]
impl DialogHost for ChannelHost {
    async fn pick_folders(
        &self,
        window: &WindowHandle,
        request: FolderBrowserRequest,
    ) -> DialogResult<Option<Vec<PathBuf>>> {
        let window = window.clone();
        self.ask(|respond| HostRequest::PickFolders {
            window,
            request,
            respond,
        })
        .await
    }

    async fn pick_files(
        &self,
        window: &WindowHandle,
        request: FileBrowserRequest,
    ) -> DialogResult<Option<Vec<PathBuf>>> {
        let window = window.clone();
        self.ask(|respond| HostRequest::PickFiles {
            window,
            request,
            respond,
        })
        .await
    }

    async fn pick_save_file(
        &self,
        window: &WindowHandle,
        request: SaveFileRequest,
    ) -> DialogResult<Option<PathBuf>> {
        let window = window.clone();
        self.ask(|respond| HostRequest::PickSaveFile {
            window,
            request,
            respond,
        })
        .await
    }

    async fn show_message(
        &self,
        window: &WindowHandle,
        request: MessageRequest,
    ) -> DialogResult<MessageDialogResult> {
        let window = window.clone();
        self.ask(|respond| HostRequest::ShowMessage {
            window,
            request,
            respond,
        })
        .await
    }

    async fn show_progress(
        &self,
        window: &WindowHandle,
        title: &str,
        message: &str,
    ) -> DialogResult<Box<dyn ProgressController>> {
        let progress = self.next_progress.fetch_add(1, Ordering::Relaxed);
        let window = window.clone();
        let title = title.to_string();
        let message = message.to_string();
        self.ask(|respond| HostRequest::OpenProgress {
            progress,
            window,
            title,
            message,
            respond,
        })
        .await?;

        Ok(Box::new(ChannelProgress {
            progress,
            sender: self.sender.clone(),
        }))
    }

    async fn show_custom_dialog(
        &self,
        window: &WindowHandle,
        visual: &VisualHandle,
        data_context: DataContext,
    ) -> DialogResult<()> {
        let window = window.clone();
        let visual = visual.clone();
        self.ask(|respond| HostRequest::ShowCustomDialog {
            window,
            visual,
            data_context,
            respond,
        })
        .await
    }

    fn hide_custom_dialog(&self, window: &WindowHandle, visual: &VisualHandle) {
        self.notify(HostRequest::HideCustomDialog {
            window: window.clone(),
            visual: visual.clone(),
        });
    }
}

/// Progress overlay living in the UI loop
struct ChannelProgress {
    progress: ProgressId,
    sender: mpsc::UnboundedSender<HostRequest>,
}

#[async_trait]
impl ProgressController for ChannelProgress {
    fn set_progress(&self, value: f64) {
        let _ = self.sender.send(HostRequest::UpdateProgress {
            progress: self.progress,
            value,
        });
    }

    fn set_message(&self, message: &str) {
        let _ = self.sender.send(HostRequest::UpdateProgressMessage {
            progress: self.progress,
            message: message.to_string(),
        });
    }

    async fn close(self: Box<Self>) -> DialogResult<()> {
        let (respond, answer) = oneshot::channel();
        self.sender
            .send(HostRequest::CloseProgress {
                progress: self.progress,
                respond,
            })
            .map_err(|_| DialogError::HostDisconnected)?;
        answer.await.map_err(|_| DialogError::HostDisconnected)
    }
}
