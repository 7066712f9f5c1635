use std::fs::File;
use std::io::{BufReader, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "responsive-patch.toml";

#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct Config {
    // Location of the HTML files, relative to the project root.
    // The backup directory is created next to it.
    pub input_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("public/pdf-files"),
        }
    }
}

impl Config {
    /// Resolve the config for a run rooted at `root`.
    ///
    /// An explicit path must exist. Otherwise `<root>/responsive-patch.toml` is
    /// read when present, and the defaults apply when it is not.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let cfg = match explicit {
            Some(path) => Self::load_file(path)?,
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                if path.exists() {
                    Self::load_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let mut reader = BufReader::new(file);

        let mut buffer = String::new();
        reader
            .read_to_string(&mut buffer)
            .with_context(|| format!("read {}", path.display()))?;

        let res = toml::from_str(&buffer).with_context(|| format!("parse {}", path.display()))?;
        Ok(res)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            bail!("input_dir must not be empty");
        }
        if self.input_dir.is_absolute() {
            bail!(
                "input_dir must be relative to the project root, got {}",
                self.input_dir.display()
            );
        }
        Ok(())
    }
}

/// Markers printed in front of console lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    pub banner: &'static str,
    pub patched: &'static str,
    pub skipped: &'static str,
    pub error: &'static str,
    pub backup: &'static str,
    pub summary: &'static str,
    pub done: &'static str,
}

impl Symbols {
    pub const FANCY: Symbols = Symbols {
        banner: "🔧",
        patched: "✅",
        skipped: "⏭️ ",
        error: "❌",
        backup: "💾",
        summary: "📊",
        done: "🎉",
    };

    pub const PLAIN: Symbols = Symbols {
        banner: "*",
        patched: "[OK]",
        skipped: "[SKIP]",
        error: "[X]",
        backup: "[BACKUP]",
        summary: "#",
        done: "[DONE]",
    };

    pub fn detect() -> &'static Symbols {
        let is_set = |key: &str| std::env::var_os(key).is_some();

        let plain = if is_set("RESPATCH_PLAIN_TEXT") {
            true
        } else if is_set("RESPATCH_FANCY") {
            false
        } else {
            !std::io::stdout().is_terminal()
                || is_set("NO_COLOR")
                || std::env::var("TERM").map_or(false, |term| is_limited_term(&term))
        };

        if plain {
            &Self::PLAIN
        } else {
            &Self::FANCY
        }
    }
}

/// Terminals that cannot be trusted to render emoji.
fn is_limited_term(term: &str) -> bool {
    let term = term.to_lowercase();
    term == "dumb" || term == "vt100" || term.contains("linux")
}
