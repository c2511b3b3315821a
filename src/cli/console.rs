//! Terminal UI loop answering dialog requests on stdin/stdout

use anyhow::Result;
use dialog_manager::dialogs::{
    HostRequest, HostRequestReceiver, MessageDialogResult, MessageDialogStyle,
};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const PROGRESS_BAR_WIDTH: usize = 30;

/// Visual produced by the demo's custom dialog templates
#[derive(Debug, Clone)]
pub struct ConsoleView {
    pub heading: String,
    pub lines: Vec<String>,
}

/// Run the console UI until the request channel closes
pub fn spawn_console_ui(requests: HostRequestReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ui = ConsoleUi {
            input: BufReader::new(tokio::io::stdin()).lines(),
        };
        if let Err(e) = ui.run(requests).await {
            warn!("Console UI stopped: {}", e);
        }
    })
}

struct ConsoleUi {
    input: Lines<BufReader<Stdin>>,
}

impl ConsoleUi {
    async fn run(&mut self, mut requests: HostRequestReceiver) -> Result<()> {
        while let Some(request) = requests.recv().await {
            debug!("Console UI handling {}", request.kind());
            match request {
                HostRequest::PickFolders { request, respond, .. } => {
                    let prompt = format!(
                        "{}{} - enter folder{} (empty to cancel)",
                        request.title,
                        describe_initial(&request.initial_path),
                        if request.allow_multi_select { "s separated by ';'" } else { "" },
                    );
                    let _ = respond.send(self.ask_paths(&prompt).await?);
                }
                HostRequest::PickFiles { request, respond, .. } => {
                    let prompt = format!(
                        "{}{} [{}] - enter file{} (empty to cancel)",
                        request.title,
                        describe_initial(&request.initial_path),
                        request.filter,
                        if request.allow_multi_select { "s separated by ';'" } else { "" },
                    );
                    let _ = respond.send(self.ask_paths(&prompt).await?);
                }
                HostRequest::PickSaveFile { request, respond, .. } => {
                    let prompt = format!(
                        "{} [{}] - save as (default '{}{}', '-' to cancel)",
                        request.title, request.filter, request.file_name, request.default_ext
                    );
                    let answer = self.read_line(&prompt).await?;
                    let chosen = match answer.trim() {
                        "-" => None,
                        "" if request.file_name.is_empty() => None,
                        "" => Some(with_default_ext(&request.file_name, &request.default_ext)),
                        name => Some(with_default_ext(name, &request.default_ext)),
                    };
                    let _ = respond.send(chosen);
                }
                HostRequest::ShowMessage { request, respond, .. } => {
                    println!("\n== {} ==\n{}", request.title, request.message);
                    let result = match request.style {
                        MessageDialogStyle::Affirmative => {
                            self.read_line("Press Enter to continue").await?;
                            MessageDialogResult::Ok
                        }
                        MessageDialogStyle::AffirmativeAndNegative => {
                            let answer = self.read_line("[o]k / [c]ancel").await?;
                            parse_ok_cancel(&answer)
                        }
                    };
                    let _ = respond.send(result);
                }
                HostRequest::OpenProgress {
                    title,
                    message,
                    respond,
                    ..
                } => {
                    println!("\n== {} ==\n{}", title, message);
                    let _ = respond.send(());
                }
                HostRequest::UpdateProgress { value, .. } => {
                    print!("\r{}", progress_bar(value));
                    let _ = std::io::stdout().flush();
                }
                HostRequest::UpdateProgressMessage { message, .. } => {
                    print!("  {}", message);
                    let _ = std::io::stdout().flush();
                }
                HostRequest::CloseProgress { respond, .. } => {
                    println!();
                    let _ = respond.send(());
                }
                HostRequest::ShowCustomDialog {
                    visual, respond, ..
                } => {
                    match visual.downcast_ref::<ConsoleView>() {
                        Some(view) => {
                            println!("\n== {} ==", view.heading);
                            for line in &view.lines {
                                println!("{}", line);
                            }
                        }
                        None => println!("\n== {} ==", visual.template()),
                    }
                    let _ = respond.send(());
                }
                HostRequest::HideCustomDialog { visual, .. } => {
                    println!("({} closed)", visual.template());
                }
            }
        }
        Ok(())
    }

    async fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{}: ", prompt);
        std::io::stdout().flush()?;
        Ok(self.input.next_line().await?.unwrap_or_default())
    }

    async fn ask_paths(&mut self, prompt: &str) -> Result<Option<Vec<PathBuf>>> {
        let answer = self.read_line(prompt).await?;
        Ok(parse_paths(&answer))
    }
}

fn describe_initial(initial: &Option<PathBuf>) -> String {
    initial
        .as_ref()
        .map(|path| format!(" (in {})", path.display()))
        .unwrap_or_default()
}

/// Split a `;` separated answer. Blank input means cancelled.
fn parse_paths(answer: &str) -> Option<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = answer
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect();
    if paths.is_empty() {
        None
    } else {
        Some(paths)
    }
}

fn parse_ok_cancel(answer: &str) -> MessageDialogResult {
    match answer.trim().to_lowercase().as_str() {
        "o" | "ok" | "y" | "yes" => MessageDialogResult::Ok,
        _ => MessageDialogResult::Cancel,
    }
}

/// Append `default_ext` when the name has no extension
fn with_default_ext(name: &str, default_ext: &str) -> PathBuf {
    let path = PathBuf::from(name);
    if path.extension().is_some() || default_ext.is_empty() {
        return path;
    }
    PathBuf::from(format!("{}.{}", name, default_ext.trim_start_matches('.')))
}

fn progress_bar(value: f64) -> String {
    let filled = ((value / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_BAR_WIDTH);
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        " ".repeat(PROGRESS_BAR_WIDTH - filled),
        value
    )
}
