//! An abstraction layer for opening files in an external editor.

use crate::config::AppConfig;
use crate::core::{CoreError, CoreResult};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Opens a file, optionally positioned at a 1-based line.
///
/// Implemented by the real launchers below and by recording fakes in tests,
/// so nothing in the scan or view logic has to spawn a process.
pub trait EditorLauncher: Send + Sync {
    fn open_at(&self, path: &Path, line: Option<usize>) -> CoreResult<()>;
}

/// Spawns a configured editor executable, e.g. Notepad++ with `-n{line}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEditorLauncher {
    program: String,
    line_arg: String,
}

impl CommandEditorLauncher {
    pub fn new(program: impl Into<String>, line_arg: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            line_arg: line_arg.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments passed to the editor: the line argument (if any) then the path.
    pub fn arguments(&self, path: &Path, line: Option<usize>) -> Vec<OsString> {
        let mut args = Vec::with_capacity(2);
        if let Some(line) = line {
            if !self.line_arg.is_empty() {
                args.push(OsString::from(
                    self.line_arg.replace("{line}", &line.to_string()),
                ));
            }
        }
        args.push(path.as_os_str().to_os_string());
        args
    }
}

impl EditorLauncher for CommandEditorLauncher {
    fn open_at(&self, path: &Path, line: Option<usize>) -> CoreResult<()> {
        let args = self.arguments(path, line);
        tracing::info!("Launching {} {:?}", self.program, args);
        // Not waited on: the editor keeps running after this process exits.
        Command::new(&self.program)
            .args(&args)
            .spawn()
            .map(|_child| ())
            .map_err(|source| CoreError::LaunchFailure {
                program: self.program.clone(),
                source,
            })
    }
}

/// Opens the file with the operating system's default application.
/// The line number cannot be passed on and is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpenLauncher;

impl EditorLauncher for SystemOpenLauncher {
    fn open_at(&self, path: &Path, line: Option<usize>) -> CoreResult<()> {
        if let Some(line) = line {
            tracing::debug!("System opener ignores line {} for {}", line, path.display());
        }
        open::that_detached(path).map_err(|source| CoreError::LaunchFailure {
            program: "system default application".to_string(),
            source,
        })
    }
}

/// The configured editor command, if an editor program is set.
pub fn configured_editor(config: &AppConfig) -> Option<CommandEditorLauncher> {
    config
        .editor_program
        .as_deref()
        .map(str::trim)
        .filter(|program| !program.is_empty())
        .map(|program| CommandEditorLauncher::new(program, config.editor_line_arg.clone()))
}

/// Picks the configured editor, falling back to the system opener.
pub fn launcher_from_config(config: &AppConfig) -> Box<dyn EditorLauncher> {
    match configured_editor(config) {
        Some(editor) => Box::new(editor),
        None => Box::new(SystemOpenLauncher),
    }
}

/// What happened when a result row was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Launched,
    /// The file no longer exists; nothing was launched.
    Missing,
    /// The launcher failed; the error has been logged.
    Failed,
}

/// Opens `path` at `line` if the file still exists.
///
/// Launch failures are logged and reported as [`OpenOutcome::Failed`], never
/// propagated.
pub fn open_file_line<L: EditorLauncher + ?Sized>(
    launcher: &L,
    path: &Path,
    line: Option<usize>,
) -> OpenOutcome {
    if !path.exists() {
        tracing::info!("Not opening {}: file no longer exists", path.display());
        return OpenOutcome::Missing;
    }
    match launcher.open_at(path, line) {
        Ok(()) => OpenOutcome::Launched,
        Err(e) => {
            tracing::error!("Error launching editor: {}", e);
            OpenOutcome::Failed
        }
    }
}
