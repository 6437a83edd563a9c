use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use compare_checker::app::{self, ResultView};
use compare_checker::config::{settings, AppConfig};
use compare_checker::core::{
    CompareExtension, CompareRequest, ComparisonClassifier, SearchExtension, SearchRequest,
    StatusFilter, TextSearch,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Text search in SAS, LOG and TXT files, and PROC COMPARE status checks
/// for PDF, LST and TXT reports.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the per-user default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the result view as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search files for a case-insensitive substring.
    Search {
        /// Text to search for.
        term: String,

        /// Folder to search; defaults to the last used folder.
        folder: Option<PathBuf>,

        /// One of .sas, .log, .txt, All.
        #[arg(long = "ext")]
        extension: Option<SearchExtension>,

        /// Open the first match in the editor at its line.
        #[arg(long)]
        open_first: bool,
    },
    /// Classify PROC COMPARE reports as Passed or Failed.
    Compare {
        /// Folder to scan; defaults to the last used folder.
        folder: Option<PathBuf>,

        /// One of .pdf, .lst, .txt, All.
        #[arg(long = "ext")]
        extension: Option<CompareExtension>,

        /// One of All, Passed, Failed. Only changes which rows are listed.
        #[arg(long)]
        status: Option<StatusFilter>,
    },
    /// Open a file in the configured editor.
    Open {
        path: PathBuf,

        /// 1-based line to jump to.
        #[arg(long)]
        line: Option<usize>,
    },
    /// Copy settings to or from another file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write the current settings to PATH.
    Export { path: PathBuf },
    /// Replace the current settings with the ones in PATH.
    Import { path: PathBuf },
}

fn resolve_folder(folder: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    folder
        .or_else(|| config.last_directory.clone())
        .context("No folder given and no previously used folder configured")
}

fn print_view(view: &ResultView, json: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, view)?;
        writeln!(stdout)?;
        return Ok(());
    }
    for row in &view.rows {
        writeln!(stdout, "{}", row.label)?;
    }
    if !view.rows.is_empty() {
        writeln!(stdout)?;
    }
    writeln!(stdout, "{}", view.status_line)?;
    Ok(())
}

fn finish_scan(view: &ResultView, config: &mut AppConfig, folder: &Path, config_path: Option<&Path>) {
    if view.warning.is_none() {
        app::remember_directory(config, folder, config_path);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let mut config = match AppConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Could not load config, using defaults: {:#}", e);
            AppConfig::default()
        }
    };
    let options = config.scan_options();

    match cli.command {
        Command::Search {
            term,
            folder,
            extension,
            open_first,
        } => {
            let folder = resolve_folder(folder, &config)?;
            let extension = extension.unwrap_or(config.search_extension);
            let request = SearchRequest::new(&folder, &term, extension);
            let view = app::run_text_search(&TextSearch::new(options), &request);
            print_view(&view, cli.json)?;
            finish_scan(&view, &mut config, &folder, config_path);

            if open_first {
                if let Some(row) = view.rows.first() {
                    let launcher = app::launcher_from_config(&config);
                    app::open_row(&*launcher, row);
                }
            }
        }
        Command::Compare {
            folder,
            extension,
            status,
        } => {
            let folder = resolve_folder(folder, &config)?;
            let request = CompareRequest::new(
                &folder,
                extension.unwrap_or(config.compare_extension),
                status.unwrap_or(config.status_filter),
            );
            let view = app::run_compare_check(&ComparisonClassifier::new(options), &request);
            print_view(&view, cli.json)?;
            finish_scan(&view, &mut config, &folder, config_path);
        }
        Command::Open { path, line } => {
            let launcher = app::launcher_from_config(&config);
            let outcome = app::open_file_line(&*launcher, &path, line);
            tracing::info!("Open {}: {:?}", path.display(), outcome);
        }
        Command::Config { action } => match action {
            ConfigAction::Export { path } => {
                settings::export_config(&config, &path)
                    .with_context(|| format!("Failed to export config to {:?}", path))?;
            }
            ConfigAction::Import { path } => {
                let imported = settings::import_config(&path)?;
                settings::save_config(&imported, config_path)
                    .context("Failed to store imported config")?;
            }
        },
    }

    Ok(())
}
