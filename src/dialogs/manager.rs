//! Dialog manager
//!
//! The dialog manager is the single object view-models talk to. It is
//! responsible for:
//! - Forwarding picker, message and progress requests to the dialog host
//! - Keeping the last file/folder/save selection readable after the dialog
//! - Tracking the one progress dialog that may be open
//! - Resolving custom dialog visuals once per view-model instance

use super::{
    cache::{CacheStats, CachedDialog, CustomDialogCache},
    command::Command,
    host::{
        DataContext, DialogHost, DialogViewModel, FileBrowserRequest, FolderBrowserRequest,
        MessageRequest, SaveFileRequest, ViewModelAny, WindowHandle, WindowProvider,
    },
    progress::{ProgressSession, ProgressSnapshot, ProgressState},
    registry::{TemplateRegistry, VisualHandle},
    types::{
        DialogError, DialogResult, MessageDialogResult, MessageDialogStyle, SelectionResult,
        ViewModelId,
    },
};
use crate::config::{ManagerConfig, ProgressOverlap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates dialogs on behalf of view-models
pub struct DialogManager {
    host: Arc<dyn DialogHost>,
    windows: Arc<dyn WindowProvider>,
    templates: TemplateRegistry,
    config: ManagerConfig,

    folder_selection: SelectionResult,
    file_selection: SelectionResult,
    save_path: PathBuf,

    /// Open progress dialog, `None` while closed
    progress: Option<ProgressSession>,

    custom_dialogs: CustomDialogCache,
}

impl DialogManager {
    pub fn new(
        host: Arc<dyn DialogHost>,
        windows: Arc<dyn WindowProvider>,
        templates: TemplateRegistry,
    ) -> Self {
        Self::with_config(host, windows, templates, ManagerConfig::default())
    }

    pub fn with_config(
        host: Arc<dyn DialogHost>,
        windows: Arc<dyn WindowProvider>,
        templates: TemplateRegistry,
        config: ManagerConfig,
    ) -> Self {
        Self {
            host,
            windows,
            templates,
            config,
            folder_selection: SelectionResult::declined(),
            file_selection: SelectionResult::declined(),
            save_path: PathBuf::new(),
            progress: None,
            custom_dialogs: CustomDialogCache::new(),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Resolve the anchor window for this call
    fn main_window(&self) -> DialogResult<WindowHandle> {
        self.windows.main_window().ok_or(DialogError::NoMainWindow)
    }

    /// Show a folder picker. Returns whether a folder was selected.
    pub async fn show_folder_browser(
        &mut self,
        title: &str,
        initial_path: impl AsRef<Path>,
        allow_multi_select: bool,
    ) -> DialogResult<bool> {
        self.folder_selection = SelectionResult::declined();
        let window = self.main_window()?;

        let request = FolderBrowserRequest {
            title: title.to_string(),
            initial_path: existing_directory(initial_path.as_ref()),
            allow_multi_select,
        };
        let picked = self.host.pick_folders(&window, request).await?;

        self.folder_selection = SelectionResult::from_pick(picked, allow_multi_select);
        debug!(
            "Folder browser '{}' confirmed: {}",
            title,
            self.folder_selection.is_confirmed()
        );
        Ok(self.folder_selection.is_confirmed())
    }

    /// Show a file picker. `filter` is handed to the host unchanged.
    pub async fn show_file_browser(
        &mut self,
        title: &str,
        initial_path: impl AsRef<Path>,
        filter: &str,
        allow_multi_select: bool,
    ) -> DialogResult<bool> {
        self.file_selection = SelectionResult::declined();
        let window = self.main_window()?;

        let request = FileBrowserRequest {
            title: title.to_string(),
            initial_path: existing_directory(initial_path.as_ref()),
            filter: filter.to_string(),
            allow_multi_select,
        };
        let picked = self.host.pick_files(&window, request).await?;

        self.file_selection = SelectionResult::from_pick(picked, allow_multi_select);
        debug!(
            "File browser '{}' confirmed: {}",
            title,
            self.file_selection.is_confirmed()
        );
        Ok(self.file_selection.is_confirmed())
    }

    /// Show a save target picker. A declined dialog leaves the empty path.
    pub async fn show_save_file_dialog(
        &mut self,
        title: &str,
        initial_path: impl AsRef<Path>,
        file_name: &str,
        default_ext: &str,
        filter: &str,
    ) -> DialogResult<bool> {
        self.save_path = PathBuf::new();
        let window = self.main_window()?;

        let request = SaveFileRequest {
            title: title.to_string(),
            initial_path: existing_directory(initial_path.as_ref()),
            file_name: file_name.to_string(),
            default_ext: default_ext.to_string(),
            filter: filter.to_string(),
        };

        match self.host.pick_save_file(&window, request).await? {
            Some(path) if !path.as_os_str().is_empty() => {
                debug!("Save dialog '{}' chose {}", title, path.display());
                self.save_path = path;
                Ok(true)
            }
            _ => {
                debug!("Save dialog '{}' declined", title);
                Ok(false)
            }
        }
    }

    /// Ask an OK/Cancel question and wait for the answer
    pub async fn show_ok_cancel_dialog(
        &self,
        text: &str,
        title: &str,
    ) -> DialogResult<MessageDialogResult> {
        let window = self.main_window()?;
        let request = MessageRequest {
            title: title.to_string(),
            message: text.to_string(),
            style: MessageDialogStyle::AffirmativeAndNegative,
        };
        self.host.show_message(&window, request).await
    }

    /// Show an informational message and wait until it is acknowledged
    pub async fn show_info_dialog(&self, title: &str, message: &str) -> DialogResult<()> {
        let window = self.main_window()?;
        let request = MessageRequest {
            title: title.to_string(),
            message: message.to_string(),
            style: MessageDialogStyle::Affirmative,
        };
        self.host.show_message(&window, request).await?;
        Ok(())
    }

    /// Open the progress dialog.
    ///
    /// An already open dialog is closed first, or the call is refused,
    /// depending on [`ProgressOverlap`].
    pub async fn show_progress(&mut self, title: &str, message: &str) -> DialogResult<()> {
        // A failed call must leave the open dialog untouched
        let window = self.main_window()?;

        if self.progress.is_some() {
            match self.config.progress_overlap {
                ProgressOverlap::Reject => return Err(DialogError::ProgressAlreadyActive),
                ProgressOverlap::Replace => {
                    warn!("Replacing open progress dialog with '{}'", title);
                    self.close_progress().await?;
                }
            }
        }

        let controller = self.host.show_progress(&window, title, message).await?;
        debug!("Progress dialog '{}' opened", title);
        self.progress = Some(ProgressSession::open(title, message, controller));
        Ok(())
    }

    /// Set the progress value. No effect while no progress dialog is open.
    pub fn update_progress(&mut self, value: f64) {
        if let Some(session) = self.progress.as_mut() {
            session.set_progress(value);
        }
    }

    /// Set the progress message. No effect while no progress dialog is open.
    pub fn update_message_progress(&mut self, message: &str) {
        if let Some(session) = self.progress.as_mut() {
            session.set_message(message);
        }
    }

    /// Close the progress dialog if one is open
    pub async fn close_progress(&mut self) -> DialogResult<()> {
        match self.progress.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }

    pub fn progress_state(&self) -> ProgressState {
        if self.progress.is_some() {
            ProgressState::Open
        } else {
            ProgressState::Closed
        }
    }

    pub fn progress_session(&self) -> Option<&ProgressSnapshot> {
        self.progress.as_ref().map(ProgressSession::snapshot)
    }

    /// Show the custom dialog registered for the view-model's runtime type.
    ///
    /// Returns `false` without showing anything when no template is
    /// registered. The lookup is repeated on the next call for the same
    /// view-model, so a template registered later is picked up. Neither the
    /// cache nor the view-model's close slot change when the call fails.
    pub async fn show_dialog(
        &mut self,
        view_model: Arc<dyn DialogViewModel>,
    ) -> DialogResult<bool> {
        let window = self.main_window()?;
        let id = view_model.view_model_id();

        let dialog = match self.custom_dialogs.get(&id).cloned() {
            Some(dialog) => dialog,
            None => {
                let view_model_type = ViewModelAny::view_model_type(view_model.as_ref());
                let Some(visual) = self.templates.resolve_template(view_model_type).await else {
                    let type_name = ViewModelAny::view_model_type_name(view_model.as_ref());
                    if self.config.warn_on_missing_template {
                        warn!("No dialog template registered for {}", type_name);
                    } else {
                        debug!("No dialog template registered for {}", type_name);
                    }
                    return Ok(false);
                };
                let close_command = self.close_command(visual.clone());
                self.custom_dialogs
                    .insert(id, CachedDialog { visual, close_command })
                    .clone()
            }
        };

        if view_model
            .close_command_slot()
            .set_if_unset(dialog.close_command.clone())
        {
            debug!("Attached close command to view-model {}", id);
        }

        let data_context: DataContext = ViewModelAny::into_data_context(view_model);
        self.host
            .show_custom_dialog(&window, &dialog.visual, data_context)
            .await?;
        Ok(true)
    }

    /// Command hiding `visual` in whatever window is main when it runs
    fn close_command(&self, visual: VisualHandle) -> Command {
        let host = self.host.clone();
        let windows = self.windows.clone();
        Command::new(move || match windows.main_window() {
            Some(window) => host.hide_custom_dialog(&window, &visual),
            None => warn!("Cannot hide dialog {}: no main window", visual.id()),
        })
    }

    /// Visual cached for a view-model, if it was shown before
    pub fn cached_visual(&self, id: &ViewModelId) -> Option<&VisualHandle> {
        self.custom_dialogs.peek(id).map(|dialog| &dialog.visual)
    }

    /// Drop the cached dialog of a retired view-model.
    ///
    /// This lifts the one-visual-per-instance guarantee for `id`: showing
    /// the same view-model again resolves and caches a new visual. Only call
    /// it once the view-model is no longer displayed.
    pub fn forget_dialog(&mut self, id: &ViewModelId) -> bool {
        self.custom_dialogs.remove(id).is_some()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.custom_dialogs.stats()
    }

    pub fn folder_selection(&self) -> &SelectionResult {
        &self.folder_selection
    }

    /// First selected folder, or the empty path
    pub fn folder_path(&self) -> &Path {
        self.folder_selection.first()
    }

    pub fn folder_paths(&self) -> &[PathBuf] {
        self.folder_selection.paths()
    }

    pub fn set_folder_path(&mut self, path: impl Into<PathBuf>) {
        self.folder_selection = SelectionResult::confirmed(vec![path.into()], false);
    }

    pub fn file_selection(&self) -> &SelectionResult {
        &self.file_selection
    }

    /// First selected file, or the empty path
    pub fn file_path(&self) -> &Path {
        self.file_selection.first()
    }

    pub fn file_paths(&self) -> &[PathBuf] {
        self.file_selection.paths()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_selection = SelectionResult::confirmed(vec![path.into()], false);
    }

    /// Path chosen by the last save dialog, empty if declined
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }
}

/// Keep `path` only if it names an existing directory
fn existing_directory(path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return None;
    }
    if path.is_dir() {
        Some(path.to_path_buf())
    } else {
        debug!("Initial path {} does not exist, using default location", path.display());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::{
        channel::{ChannelHost, HostRequest, HostRequestReceiver},
        command::CloseCommandSlot,
        host::MainWindowSlot,
        types::VisualId,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Answers queued for the scripted UI loop
    #[derive(Default)]
    struct Script {
        picks: VecDeque<Option<Vec<PathBuf>>>,
        saves: VecDeque<Option<PathBuf>>,
        messages: VecDeque<MessageDialogResult>,
    }

    /// What the scripted UI loop observed
    #[derive(Default)]
    struct UiLog {
        events: Vec<String>,
        initial_paths: Vec<Option<PathBuf>>,
        filters: Vec<String>,
        shown: Vec<(u64, VisualId)>,
        hidden: Vec<VisualId>,
        open_progress: usize,
    }

    fn spawn_ui(mut requests: HostRequestReceiver, mut script: Script) -> Arc<Mutex<UiLog>> {
        let log = Arc::new(Mutex::new(UiLog::default()));
        let ui_log = log.clone();

        tokio::spawn(async move {
            while let Some(request) = requests.recv().await {
                let mut log = ui_log.lock().unwrap();
                log.events.push(request.kind().to_string());
                match request {
                    HostRequest::PickFolders { request, respond, .. } => {
                        log.initial_paths.push(request.initial_path);
                        let _ = respond.send(script.picks.pop_front().flatten());
                    }
                    HostRequest::PickFiles { request, respond, .. } => {
                        log.initial_paths.push(request.initial_path);
                        log.filters.push(request.filter);
                        let _ = respond.send(script.picks.pop_front().flatten());
                    }
                    HostRequest::PickSaveFile { request, respond, .. } => {
                        log.filters.push(request.filter);
                        let _ = respond.send(script.saves.pop_front().flatten());
                    }
                    HostRequest::ShowMessage { respond, .. } => {
                        let answer = script
                            .messages
                            .pop_front()
                            .unwrap_or(MessageDialogResult::Ok);
                        let _ = respond.send(answer);
                    }
                    HostRequest::OpenProgress { respond, .. } => {
                        log.open_progress += 1;
                        let _ = respond.send(());
                    }
                    HostRequest::CloseProgress { respond, .. } => {
                        log.open_progress -= 1;
                        let _ = respond.send(());
                    }
                    HostRequest::UpdateProgress { value, .. } => {
                        log.events.push(format!("value={}", value));
                    }
                    HostRequest::UpdateProgressMessage { message, .. } => {
                        log.events.push(format!("message={}", message));
                    }
                    HostRequest::ShowCustomDialog {
                        window,
                        visual,
                        respond,
                        ..
                    } => {
                        log.shown.push((window.id(), visual.id()));
                        let _ = respond.send(());
                    }
                    HostRequest::HideCustomDialog { visual, .. } => {
                        log.hidden.push(visual.id());
                    }
                }
            }
        });

        log
    }

    fn manager_with(script: Script) -> (DialogManager, Arc<Mutex<UiLog>>, MainWindowSlot) {
        manager_with_config(script, ManagerConfig::default())
    }

    fn manager_with_config(
        script: Script,
        config: ManagerConfig,
    ) -> (DialogManager, Arc<Mutex<UiLog>>, MainWindowSlot) {
        let (host, requests) = ChannelHost::new();
        let log = spawn_ui(requests, script);
        let windows = MainWindowSlot::new(Some(WindowHandle::new(1, "Main")));
        let manager = DialogManager::with_config(
            Arc::new(host),
            Arc::new(windows.clone()),
            TemplateRegistry::new(),
            config,
        );
        (manager, log, windows)
    }

    struct AboutViewModel {
        id: ViewModelId,
        close: CloseCommandSlot,
    }

    impl AboutViewModel {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                id: ViewModelId::new(),
                close: CloseCommandSlot::new(),
            })
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

    struct AboutView;

    #[tokio::test]
    async fn test_single_select_returns_first_path() {
        let script = Script {
            picks: VecDeque::from([Some(vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")])]),
            ..Default::default()
        };
        let (mut manager, _, _) = manager_with(script);

        assert!(manager.show_folder_browser("Select a folder", "", false).await.unwrap());
        assert_eq!(manager.folder_path(), Path::new("/data/a"));
        assert_eq!(manager.folder_paths(), &[PathBuf::from("/data/a")]);
    }

    #[tokio::test]
    async fn test_multi_select_keeps_all_paths() {
        let script = Script {
            picks: VecDeque::from([Some(vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")])]),
            ..Default::default()
        };
        let (mut manager, _, _) = manager_with(script);

        assert!(manager.show_file_browser("Select files", "", "*.txt", true).await.unwrap());
        assert_eq!(manager.file_paths().len(), 2);
        assert_eq!(manager.file_path(), Path::new("a.txt"));
    }

    #[tokio::test]
    async fn test_declined_pick_clears_previous_selection() {
        let script = Script {
            picks: VecDeque::from([
                Some(vec![PathBuf::from("/data/a")]),
                None,
                Some(vec![PathBuf::from("report.txt")]),
                None,
            ]),
            ..Default::default()
        };
        let (mut manager, _, _) = manager_with(script);

        assert!(manager.show_folder_browser("Folder", "", false).await.unwrap());
        assert!(!manager.show_folder_browser("Folder", "", false).await.unwrap());
        assert_eq!(manager.folder_path(), Path::new(""));
        assert!(manager.folder_paths().is_empty());

        assert!(manager.show_file_browser("File", "", "*.*", false).await.unwrap());
        assert!(!manager.show_file_browser("File", "", "*.*", false).await.unwrap());
        assert_eq!(manager.file_path(), Path::new(""));
        assert!(!manager.file_selection().is_confirmed());
    }

    #[tokio::test]
    async fn test_missing_initial_directory_is_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let script = Script {
            picks: VecDeque::from([None, None]),
            ..Default::default()
        };
        let (mut manager, log, _) = manager_with(script);

        manager
            .show_file_browser("File", temp_dir.path(), "Text (*.txt)|*.txt", false)
            .await
            .unwrap();
        manager
            .show_file_browser("File", &missing, "Text (*.txt)|*.txt", false)
            .await
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(
            log.initial_paths,
            vec![Some(temp_dir.path().to_path_buf()), None]
        );
        assert!(log.filters.iter().all(|f| f == "Text (*.txt)|*.txt"));
    }

    #[tokio::test]
    async fn test_save_dialog_sets_or_empties_path() {
        let script = Script {
            saves: VecDeque::from([Some(PathBuf::from("report.txt")), None]),
            ..Default::default()
        };
        let (mut manager, _, _) = manager_with(script);

        let saved = manager
            .show_save_file_dialog("Save", "", "report", ".txt", "Text (*.txt)|*.txt")
            .await
            .unwrap();
        assert!(saved);
        assert_eq!(manager.save_path(), Path::new("report.txt"));

        let saved = manager
            .show_save_file_dialog("Save", "", "report", ".txt", "Text (*.txt)|*.txt")
            .await
            .unwrap();
        assert!(!saved);
        assert_eq!(manager.save_path(), Path::new(""));
    }

    #[tokio::test]
    async fn test_ok_cancel_and_info() {
        let script = Script {
            messages: VecDeque::from([MessageDialogResult::Cancel, MessageDialogResult::Ok]),
            ..Default::default()
        };
        let (manager, log, _) = manager_with(script);

        let answer = manager
            .show_ok_cancel_dialog("Ok Cancel Dialog", "This is a Ok Cancel Dialog")
            .await
            .unwrap();
        assert_eq!(answer, MessageDialogResult::Cancel);

        manager.show_info_dialog("Result", "You select Cancel").await.unwrap();
        assert_eq!(log.lock().unwrap().events, vec!["show_message", "show_message"]);
    }

    #[tokio::test]
    async fn test_missing_main_window_is_an_error() {
        let (mut manager, _, windows) = manager_with(Script::default());
        windows.set(None);

        let err = manager.show_info_dialog("Info", "text").await.unwrap_err();
        assert!(matches!(err, DialogError::NoMainWindow));

        let err = manager.show_folder_browser("Folder", "", false).await.unwrap_err();
        assert!(matches!(err, DialogError::NoMainWindow));
        assert!(manager.folder_paths().is_empty());
    }

    #[tokio::test]
    async fn test_progress_lifecycle() {
        let (mut manager, log, _) = manager_with(Script::default());
        assert_eq!(manager.progress_state(), ProgressState::Closed);

        manager.show_progress("Progress", "Working").await.unwrap();
        assert_eq!(manager.progress_state(), ProgressState::Open);

        manager.update_progress(50.0);
        assert_eq!(manager.progress_state(), ProgressState::Open);

        manager.update_message_progress("Halfway");
        let snapshot = manager.progress_session().unwrap();
        assert_eq!(snapshot.title, "Progress");
        assert_eq!(snapshot.message, "Halfway");
        assert_eq!(snapshot.value, 50.0);

        manager.close_progress().await.unwrap();
        assert_eq!(manager.progress_state(), ProgressState::Closed);
        assert!(manager.progress_session().is_none());

        let log = log.lock().unwrap();
        assert_eq!(
            log.events,
            vec![
                "open_progress",
                "update_progress",
                "value=50",
                "update_progress_message",
                "message=Halfway",
                "close_progress",
            ]
        );
        assert_eq!(log.open_progress, 0);
    }

    #[tokio::test]
    async fn test_updates_and_close_without_session_are_noops() {
        let (mut manager, log, _) = manager_with(Script::default());

        manager.update_progress(10.0);
        manager.update_message_progress("ignored");
        manager.close_progress().await.unwrap();
        manager.close_progress().await.unwrap();

        assert_eq!(manager.progress_state(), ProgressState::Closed);
        assert!(manager.progress_session().is_none());

        // Round trip so the UI loop has drained everything sent before
        manager.show_info_dialog("Info", "done").await.unwrap();
        assert_eq!(log.lock().unwrap().events, vec!["show_message"]);
    }

    #[tokio::test]
    async fn test_overlapping_progress_closes_previous_session() {
        let (mut manager, log, _) = manager_with(Script::default());

        manager.show_progress("First", "one").await.unwrap();
        manager.show_progress("Second", "two").await.unwrap();

        assert_eq!(manager.progress_session().unwrap().title, "Second");
        {
            let log = log.lock().unwrap();
            assert_eq!(
                log.events,
                vec!["open_progress", "close_progress", "open_progress"]
            );
            assert_eq!(log.open_progress, 1);
        }

        manager.close_progress().await.unwrap();
        assert_eq!(log.lock().unwrap().open_progress, 0);
    }

    #[tokio::test]
    async fn test_overlapping_progress_can_be_rejected() {
        let config = ManagerConfig {
            progress_overlap: ProgressOverlap::Reject,
            ..Default::default()
        };
        let (mut manager, _, _) = manager_with_config(Script::default(), config);

        manager.show_progress("First", "one").await.unwrap();
        let err = manager.show_progress("Second", "two").await.unwrap_err();

        assert!(matches!(err, DialogError::ProgressAlreadyActive));
        assert_eq!(manager.progress_session().unwrap().title, "First");
    }

    #[tokio::test]
    async fn test_progress_without_window_keeps_open_session() {
        let (mut manager, log, windows) = manager_with(Script::default());
        manager.show_progress("First", "one").await.unwrap();

        let main = windows.set(None);
        let err = manager.show_progress("Second", "two").await.unwrap_err();
        assert!(matches!(err, DialogError::NoMainWindow));
        assert_eq!(manager.progress_state(), ProgressState::Open);
        assert_eq!(manager.progress_session().unwrap().title, "First");

        windows.set(main);
        manager.show_info_dialog("Info", "done").await.unwrap();
        let log = log.lock().unwrap();
        assert_eq!(log.events, vec!["open_progress", "show_message"]);
        assert_eq!(log.open_progress, 1);
    }

    #[tokio::test]
    async fn test_custom_dialog_is_cached_per_instance() {
        let (mut manager, log, _) = manager_with(Script::default());
        manager
            .templates()
            .register::<AboutViewModel, _, _>(|| AboutView)
            .await;

        let first = AboutViewModel::new();
        let second = AboutViewModel::new();

        assert!(manager.show_dialog(first.clone()).await.unwrap());
        assert!(manager.show_dialog(first.clone()).await.unwrap());
        assert!(manager.show_dialog(second.clone()).await.unwrap());

        let first_visual = manager.cached_visual(&first.id).unwrap().id();
        let second_visual = manager.cached_visual(&second.id).unwrap().id();
        assert_ne!(first_visual, second_visual);
        assert!(manager
            .cached_visual(&first.id)
            .unwrap()
            .downcast_ref::<AboutView>()
            .is_some());

        let log = log.lock().unwrap();
        assert_eq!(
            log.shown,
            vec![(1, first_visual), (1, first_visual), (1, second_visual)]
        );

        let stats = manager.cache_stats();
        assert_eq!((stats.size, stats.hits, stats.misses), (2, 1, 2));
    }

    #[tokio::test]
    async fn test_missing_template_shows_nothing() {
        let (mut manager, log, _) = manager_with(Script::default());
        let view_model = AboutViewModel::new();

        assert!(!manager.show_dialog(view_model.clone()).await.unwrap());
        assert!(manager.cached_visual(&view_model.id).is_none());
        assert!(!view_model.close.is_set());

        manager.show_info_dialog("Info", "done").await.unwrap();
        assert!(log.lock().unwrap().shown.is_empty());
    }

    #[tokio::test]
    async fn test_template_registered_after_miss_is_used() {
        let (mut manager, _, _) = manager_with(Script::default());
        let view_model = AboutViewModel::new();

        assert!(!manager.show_dialog(view_model.clone()).await.unwrap());

        manager
            .templates()
            .register::<AboutViewModel, _, _>(|| AboutView)
            .await;
        assert!(manager.show_dialog(view_model.clone()).await.unwrap());
        assert!(manager.cached_visual(&view_model.id).is_some());
    }

    #[tokio::test]
    async fn test_close_command_hides_visual_in_current_window() {
        let (mut manager, log, windows) = manager_with(Script::default());
        manager
            .templates()
            .register::<AboutViewModel, _, _>(|| AboutView)
            .await;

        let view_model = AboutViewModel::new();
        manager.show_dialog(view_model.clone()).await.unwrap();
        assert!(view_model.close.is_set());

        let visual = manager.cached_visual(&view_model.id).unwrap().id();
        windows.set(Some(WindowHandle::new(2, "Second")));
        assert!(view_model.close.execute());

        manager.show_info_dialog("Info", "done").await.unwrap();
        let events = log.lock().unwrap().events.clone();
        assert!(events.contains(&"hide_custom_dialog".to_string()));
        assert_eq!(log.lock().unwrap().hidden, vec![visual]);
    }

    #[tokio::test]
    async fn test_existing_close_command_is_kept() {
        let (mut manager, _, _) = manager_with(Script::default());
        manager
            .templates()
            .register::<AboutViewModel, _, _>(|| AboutView)
            .await;

        let view_model = AboutViewModel::new();
        let own = Command::new(|| {});
        view_model.close.set_if_unset(own.clone());

        manager.show_dialog(view_model.clone()).await.unwrap();
        assert!(view_model.close.get().unwrap().ptr_eq(&own));
    }

    #[tokio::test]
    async fn test_main_window_swap_applies_to_next_dialog() {
        let (mut manager, log, windows) = manager_with(Script::default());
        manager
            .templates()
            .register::<AboutViewModel, _, _>(|| AboutView)
            .await;
        let view_model = AboutViewModel::new();

        manager.show_dialog(view_model.clone()).await.unwrap();
        windows.set(Some(WindowHandle::new(9, "Other")));
        manager.show_dialog(view_model.clone()).await.unwrap();

        let windows_used: Vec<u64> = log.lock().unwrap().shown.iter().map(|(w, _)| *w).collect();
        assert_eq!(windows_used, vec![1, 9]);
    }

    #[tokio::test]
    async fn test_forget_dialog_resolves_again() {
        let (mut manager, _, _) = manager_with(Script::default());
        manager
            .templates()
            .register::<AboutViewModel, _, _>(|| AboutView)
            .await;
        let view_model = AboutViewModel::new();

        manager.show_dialog(view_model.clone()).await.unwrap();
        let before = manager.cached_visual(&view_model.id).unwrap().id();

        assert!(manager.forget_dialog(&view_model.id));
        assert!(!manager.forget_dialog(&view_model.id));

        manager.show_dialog(view_model.clone()).await.unwrap();
        let after = manager.cached_visual(&view_model.id).unwrap().id();
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_custom_dialog_without_window_changes_nothing() {
        let (mut manager, log, windows) = manager_with(Script::default());
        manager
            .templates()
            .register::<AboutViewModel, _, _>(|| AboutView)
            .await;
        let view_model = AboutViewModel::new();

        let main = windows.set(None);
        let err = manager.show_dialog(view_model.clone()).await.unwrap_err();
        assert!(matches!(err, DialogError::NoMainWindow));
        assert!(manager.cached_visual(&view_model.id).is_none());
        assert!(!view_model.close.is_set());
        assert_eq!(manager.cache_stats().size, 0);

        windows.set(main);
        manager.show_info_dialog("Info", "done").await.unwrap();
        assert!(log.lock().unwrap().shown.is_empty());
    }

    #[tokio::test]
    async fn test_type_erased_view_model_resolves_its_template() {
        let (mut manager, log, _) = manager_with(Script::default());
        manager
            .templates()
            .register::<AboutViewModel, _, _>(|| AboutView)
            .await;

        let view_model: Arc<dyn DialogViewModel> = AboutViewModel::new();
        assert!(manager.show_dialog(view_model.clone()).await.unwrap());
        assert!(manager.show_dialog(view_model.clone()).await.unwrap());

        let visual = manager.cached_visual(&view_model.view_model_id()).unwrap();
        assert!(visual.downcast_ref::<AboutView>().is_some());
        assert!(view_model.close_command_slot().is_set());
        assert_eq!(log.lock().unwrap().shown.len(), 2);
        assert_eq!(manager.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_seeded_paths_are_readable() {
        let (mut manager, _, _) = manager_with(Script::default());

        manager.set_folder_path("/srv");
        manager.set_file_path("/srv/a.txt");

        assert_eq!(manager.folder_path(), Path::new("/srv"));
        assert_eq!(manager.file_path(), Path::new("/srv/a.txt"));
        assert!(manager.save_path().as_os_str().is_empty());
    }
}
