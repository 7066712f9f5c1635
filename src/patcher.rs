//! The batch run: back up every HTML file in the input directory, then patch
//! the ones without responsive CSS.
//!
//! A run either stops before touching anything (missing input directory,
//! failed backup) or visits every file. Per-file failures are recorded in the
//! [`RunReport`] and never abort the run.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::backup;
use crate::config::{Config, Symbols};
use crate::css;
use crate::file_status::{FileOutcome, FileStatus, SkipReason};

pub const HTML_EXTENSION: &str = "html";

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("input directory {} not found; run from the project root", .0.display())]
    MissingInputDir(PathBuf),
    #[error("backup failed at {}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug)]
pub struct RunReport {
    pub backup_dir: PathBuf,
    pub backed_up: usize,
    pub files: Vec<FileStatus>,
}

impl RunReport {
    pub fn patched(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Patched))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped(_)))
    }

    pub fn errored(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Errored(_)))
    }

    /// Nothing failed and at least one file changed.
    pub fn is_clean_success(&self) -> bool {
        self.errored() == 0 && self.patched() > 0
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }

    pub fn render(&self, symbols: &Symbols) -> String {
        let mut s = format!(
            "\n{} Finished: {} {} patched, {} {} skipped, {} {} failed\n{} Backup: {}\n",
            symbols.summary,
            symbols.patched,
            self.patched(),
            symbols.skipped,
            self.skipped(),
            symbols.error,
            self.errored(),
            symbols.backup,
            self.backup_dir.display(),
        );
        if self.is_clean_success() {
            s.push_str(symbols.done);
            s.push_str(" All pages patched. Check them on a mobile viewport.\n");
        }
        s
    }
}

/// A `*.html` entry of the input directory.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: PathBuf,
    /// Why the entry could not be resolved, e.g. a dangling symlink.
    pub unreadable: Option<String>,
}

/// Console progress lines. A failed write is logged once and further lines
/// are dropped; the run itself keeps going.
struct Progress<'a, W: Write> {
    out: &'a mut W,
    broken: bool,
}

impl<'a, W: Write> Progress<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Self { out, broken: false }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if self.broken {
            return;
        }
        if let Err(e) = writeln!(self.out, "{args}") {
            warn!(error = %e, "progress output failed, continuing without it");
            self.broken = true;
        }
    }
}

/// Run against `root` using the current local time for the backup name.
pub fn patch_directory(
    root: &Path,
    config: &Config,
    symbols: &Symbols,
    out: &mut impl Write,
) -> Result<RunReport, PatchError> {
    patch_directory_at(root, config, symbols, &Local::now(), out)
}

pub fn patch_directory_at(
    root: &Path,
    config: &Config,
    symbols: &Symbols,
    now: &DateTime<Local>,
    out: &mut impl Write,
) -> Result<RunReport, PatchError> {
    let input_dir = root.join(&config.input_dir);
    if !input_dir.is_dir() {
        return Err(PatchError::MissingInputDir(input_dir));
    }

    let candidates = find_html_files(&input_dir);
    debug!(count = candidates.len(), dir = %input_dir.display(), "discovered html files");

    let backup_dir = backup::create_backup_dir(&input_dir, now).map_err(|source| {
        PatchError::Backup {
            path: input_dir.clone(),
            source,
        }
    })?;
    let mut backed_up = 0;
    for candidate in candidates.iter().filter(|c| c.unreadable.is_none()) {
        backup::copy_preserving(&candidate.path, &backup_dir).map_err(|source| {
            PatchError::Backup {
                path: candidate.path.clone(),
                source,
            }
        })?;
        backed_up += 1;
    }
    info!(count = backed_up, dir = %backup_dir.display(), "backup complete");

    let mut progress = Progress::new(out);
    progress.line(format_args!(
        "{} Backed up {} files",
        symbols.backup, backed_up
    ));

    let mut files = Vec::with_capacity(candidates.len());
    for Candidate { path, unreadable } in candidates {
        let outcome = match unreadable {
            Some(msg) => FileOutcome::Errored(msg),
            None => patch_file(&path),
        };
        let status = FileStatus { path, outcome };
        let name = status.file_name();
        match &status.outcome {
            FileOutcome::Patched => progress.line(format_args!("{} {}", symbols.patched, name)),
            FileOutcome::Skipped(reason) => progress.line(format_args!(
                "{} Skipped {} ({})",
                symbols.skipped, name, reason
            )),
            FileOutcome::Errored(msg) => {
                progress.line(format_args!("{} {}: {}", symbols.error, name, msg))
            }
        }
        files.push(status);
    }

    Ok(RunReport {
        backup_dir,
        backed_up,
        files,
    })
}

/// Patch a single file in place.
pub fn patch_file(path: &Path) -> FileOutcome {
    match try_patch_file(path) {
        Ok(outcome) => {
            debug!(file = %path.display(), ?outcome, "processed");
            outcome
        }
        Err(e) => {
            warn!(file = %path.display(), error = %e, "failed to patch");
            FileOutcome::Errored(e.to_string())
        }
    }
}

fn try_patch_file(path: &Path) -> io::Result<FileOutcome> {
    let content = fs::read_to_string(path)?;

    if css::is_responsive(&content) {
        return Ok(FileOutcome::Skipped(SkipReason::AlreadyResponsive));
    }

    match css::inject(&content) {
        Some(patched) => {
            fs::write(path, patched)?;
            Ok(FileOutcome::Patched)
        }
        None => Ok(FileOutcome::Skipped(SkipReason::NoStyleTag)),
    }
}

fn is_html(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == HTML_EXTENSION)
}

/// `*.html` directly inside `dir`, sorted by file name.
///
/// Entries that cannot be resolved are kept with the error attached so the
/// run can report them. Other unreadable entries are only logged.
pub fn find_html_files(dir: &Path) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() && is_html(entry.path()) => Some(Candidate {
                path: entry.into_path(),
                unreadable: None,
            }),
            Ok(_) => None,
            Err(e) => match e.path().filter(|p| is_html(p)) {
                Some(path) => {
                    warn!(file = %path.display(), error = %e, "cannot resolve html entry");
                    Some(Candidate {
                        path: path.to_path_buf(),
                        unreadable: Some(e.to_string()),
                    })
                }
                None => {
                    warn!(error = %e, "skipping unreadable entry");
                    None
                }
            },
        })
        .collect();
    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    candidates
}
