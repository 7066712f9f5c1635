//! Backs up a directory of HTML pages and injects a fixed block of mobile
//! CSS into every page that has no `max-width` media query yet.
//!
//! - [`css`]: the fragment, marker detection and injection. No I/O.
//! - [`backup`]: timestamped backup directory and metadata-preserving copies.
//! - [`patcher`]: the batch run tying both together.

pub mod backup;
pub mod config;
pub mod css;
pub mod file_status;
pub mod logging;
pub mod patcher;

pub use config::{Config, Symbols};
pub use file_status::{FileOutcome, FileStatus, SkipReason};
pub use patcher::{patch_directory, patch_directory_at, PatchError, RunReport};
