//! Seams to the UI toolkit
//!
//! The dialog manager never draws anything. It resolves the current main
//! window through a [`WindowProvider`] and delegates every native interaction
//! to a [`DialogHost`], awaiting the host's answer. This is where a concrete
//! toolkit plugs in.

use super::{
    command::CloseCommandSlot,
    registry::VisualHandle,
    types::{DialogResult, MessageDialogResult, MessageDialogStyle, ViewModelId},
};
use async_trait::async_trait;
use std::any::{Any, TypeId};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Opaque handle of a top-level window owned by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle {
    id: u64,
    title: String,
}

impl WindowHandle {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Supplies the window that anchors modal dialogs.
///
/// Queried on every dialog call, never cached by the manager.
pub trait WindowProvider: Send + Sync {
    fn main_window(&self) -> Option<WindowHandle>;
}

/// Swappable main window shared between the application and the manager
#[derive(Debug, Clone)]
pub struct MainWindowSlot {
    current: Arc<watch::Sender<Option<WindowHandle>>>,
}

impl MainWindowSlot {
    pub fn new(window: Option<WindowHandle>) -> Self {
        let (sender, _) = watch::channel(window);
        Self {
            current: Arc::new(sender),
        }
    }

    /// Replace the main window, returning the previous one
    pub fn set(&self, window: Option<WindowHandle>) -> Option<WindowHandle> {
        self.current.send_replace(window)
    }
}

impl WindowProvider for MainWindowSlot {
    fn main_window(&self) -> Option<WindowHandle> {
        self.current.borrow().clone()
    }
}

/// Application data bound to a custom dialog's visual
pub type DataContext = Arc<dyn Any + Send + Sync>;

/// Runtime type access for view-models behind `dyn DialogViewModel`.
///
/// Implemented for every sized `'static` type; call it on the view-model
/// itself, not on the `Arc` holding it.
pub trait ViewModelAny: Any + Send + Sync {
    /// Concrete type used for template lookup
    fn view_model_type(&self) -> TypeId;

    fn view_model_type_name(&self) -> &'static str;

    fn into_data_context(self: Arc<Self>) -> DataContext;
}

impl<T: Any + Send + Sync> ViewModelAny for T {
    fn view_model_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn view_model_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn into_data_context(self: Arc<Self>) -> DataContext {
        self
    }
}

/// Capability every custom dialog view-model exposes
pub trait DialogViewModel: ViewModelAny {
    /// Identity used as the custom dialog cache key
    fn view_model_id(&self) -> ViewModelId;

    /// Slot the manager fills with a command that hides the dialog
    fn close_command_slot(&self) -> &CloseCommandSlot;
}

/// Folder picker parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderBrowserRequest {
    pub title: String,
    pub initial_path: Option<PathBuf>,
    pub allow_multi_select: bool,
}

/// File picker parameters. `filter` is passed to the host untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBrowserRequest {
    pub title: String,
    pub initial_path: Option<PathBuf>,
    pub filter: String,
    pub allow_multi_select: bool,
}

/// Save target picker parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFileRequest {
    pub title: String,
    pub initial_path: Option<PathBuf>,
    pub file_name: String,
    pub default_ext: String,
    pub filter: String,
}

/// Message dialog parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    pub title: String,
    pub message: String,
    pub style: MessageDialogStyle,
}

/// Native progress overlay opened by the host
#[async_trait]
pub trait ProgressController: Send + Sync {
    fn set_progress(&self, value: f64);

    fn set_message(&self, message: &str);

    /// Close the overlay and release its native resources
    async fn close(self: Box<Self>) -> DialogResult<()>;
}

/// Native dialog primitives of a UI toolkit.
///
/// Pickers answer `None` when the user cancels.
#[async_trait]
pub trait DialogHost: Send + Sync {
    async fn pick_folders(
        &self,
        window: &WindowHandle,
        request: FolderBrowserRequest,
    ) -> DialogResult<Option<Vec<PathBuf>>>;

    async fn pick_files(
        &self,
        window: &WindowHandle,
        request: FileBrowserRequest,
    ) -> DialogResult<Option<Vec<PathBuf>>>;

    async fn pick_save_file(
        &self,
        window: &WindowHandle,
        request: SaveFileRequest,
    ) -> DialogResult<Option<PathBuf>>;

    async fn show_message(
        &self,
        window: &WindowHandle,
        request: MessageRequest,
    ) -> DialogResult<MessageDialogResult>;

    async fn show_progress(
        &self,
        window: &WindowHandle,
        title: &str,
        message: &str,
    ) -> DialogResult<Box<dyn ProgressController>>;

    /// Show `visual` bound to `data_context` inside `window`
    async fn show_custom_dialog(
        &self,
        window: &WindowHandle,
        visual: &VisualHandle,
        data_context: DataContext,
    ) -> DialogResult<()>;

    /// Ask the host to hide a custom dialog. Fire and forget.
    fn hide_custom_dialog(&self, window: &WindowHandle, visual: &VisualHandle);
}
