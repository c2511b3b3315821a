//! Dialog orchestration
//!
//! This module decouples view-models from a UI toolkit's dialog primitives.
//! View-models talk to a [`DialogManager`]; the manager forwards native work
//! to a [`DialogHost`] and keeps the state that outlives a single dialog:
//! the last picker selection, the open progress dialog, and the visual
//! resolved for each custom dialog view-model.

pub mod cache;
pub mod channel;
pub mod command;
pub mod host;
pub mod manager;
pub mod progress;
pub mod registry;
pub mod types;

pub use cache::{CacheStats, CachedDialog, CustomDialogCache};
pub use channel::{ChannelHost, HostRequest, HostRequestReceiver, ProgressId};
pub use command::{CloseCommandSlot, Command};
pub use host::{
    DataContext, DialogHost, DialogViewModel, FileBrowserRequest, FolderBrowserRequest,
    MainWindowSlot, MessageRequest, ProgressController, SaveFileRequest, ViewModelAny,
    WindowHandle, WindowProvider,
};
pub use manager::DialogManager;
pub use progress::{ProgressSession, ProgressSnapshot, ProgressState};
pub use registry::{TemplateRegistry, VisualHandle};
pub use types::*;
