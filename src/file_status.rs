// src/file_status.rs
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyResponsive,
    NoStyleTag,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyResponsive => write!(f, "already responsive"),
            SkipReason::NoStyleTag => write!(f, "no </style> tag"),
        }
    }
}

/// Terminal state of a single file after one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Patched,
    Skipped(SkipReason),
    Errored(String),
}

#[derive(Debug, Clone)]
pub struct FileStatus {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileStatus {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
