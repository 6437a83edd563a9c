//! Presentation-side glue: editor hand-off, view models and command handlers.

pub mod commands;
pub mod editor;
pub mod view_model;

pub use commands::{open_row, remember_directory, run_compare_check, run_text_search};
pub use editor::{
    launcher_from_config, open_file_line, CommandEditorLauncher, EditorLauncher, OpenOutcome,
    SystemOpenLauncher,
};
pub use view_model::{ResultRow, ResultView};
