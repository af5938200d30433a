//! Page revisions kept by an external revision control tool
//!
//! Two backends exist: [`NoHistory`] for wikis without version
//! management and [`Rcs`], which runs `rlog` and `rcsdiff` on the page
//! files.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// One checked-in revision of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub revision: String,
    pub date: String,
    /// Wiki user named in the check-in message
    pub user: String,
}

/// Errors from running the revision control tools
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The tool could not be started
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran but reported a failure
    #[error("{command} failed with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Source of page revisions and differences
pub trait RevisionLog: Sync {
    /// Whether revisions can be listed at all
    fn available(&self) -> bool;

    /// Revisions of a page, newest first
    fn log(&self, page: &str) -> Result<Vec<Revision>, HistoryError>;

    /// Context diff between two revisions, one entry per output line
    fn diff(&self, page: &str, rev1: &str, rev2: &str) -> Result<Vec<String>, HistoryError>;
}

/// No version management
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHistory;

impl RevisionLog for NoHistory {
    fn available(&self) -> bool {
        false
    }

    fn log(&self, _page: &str) -> Result<Vec<Revision>, HistoryError> {
        Ok(Vec::new())
    }

    fn diff(&self, _page: &str, _rev1: &str, _rev2: &str) -> Result<Vec<String>, HistoryError> {
        Ok(Vec::new())
    }
}

/// Revisions from RCS files next to the pages
#[derive(Debug, Clone)]
pub struct Rcs {
    pages_dir: PathBuf,
    available: bool,
}

impl Rcs {
    /// Check whether `rlog` and `rcsdiff` can be run
    pub fn detect(pages_dir: &Path) -> Self {
        let available = ["rlog", "rcsdiff"].iter().all(|tool| {
            Command::new(tool)
                .arg("-V")
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        });

        if available {
            log::info!("RCS is available and will be used");
        } else {
            log::info!("RCS not found, no version management");
        }

        Self {
            pages_dir: pages_dir.to_path_buf(),
            available,
        }
    }

    fn page_file(&self, page: &str) -> PathBuf {
        self.pages_dir.join(format!("{}.wik", page))
    }

    fn run(&self, tool: &str, args: &[String]) -> Result<String, HistoryError> {
        let command = format!("{} {}", tool, args.join(" "));
        log::debug!("Running {}", command);

        let output = Command::new(tool)
            .args(args)
            .output()
            .map_err(|source| HistoryError::Spawn {
                command: command.clone(),
                source,
            })?;

        // rcsdiff exits with 1 when the revisions differ
        match output.status.code() {
            Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            _ => Err(HistoryError::Failed {
                command,
                status: output.status,
            }),
        }
    }
}

impl RevisionLog for Rcs {
    fn available(&self) -> bool {
        self.available
    }

    fn log(&self, page: &str) -> Result<Vec<Revision>, HistoryError> {
        let file = self.page_file(page).display().to_string();
        let output = self.run("rlog", &["-zLT".to_string(), file])?;
        Ok(parse_rlog(&output))
    }

    fn diff(&self, page: &str, rev1: &str, rev2: &str) -> Result<Vec<String>, HistoryError> {
        let file = self.page_file(page).display().to_string();
        let args = [
            "-q".to_string(),
            "-c".to_string(),
            "-zLT".to_string(),
            format!("-r{}", rev1),
            format!("-r{}", rev2),
            file,
        ];
        let output = self.run("rcsdiff", &args)?;
        Ok(output.lines().map(str::to_string).collect())
    }
}

/// Read the revisions out of `rlog` output
///
/// Every `revision X` line starts a revision; the following `date:` and
/// `user:` lines fill in when and by whom it was checked in.
pub fn parse_rlog(output: &str) -> Vec<Revision> {
    let mut revisions: Vec<Revision> = Vec::new();

    for line in output.lines() {
        let (token, rest) = line.split_once(' ').unwrap_or((line, ""));
        match token {
            "revision" => {
                let revision = rest
                    .split([' ', '\t'])
                    .find(|part| !part.is_empty())
                    .unwrap_or_default();
                revisions.push(Revision {
                    revision: revision.to_string(),
                    date: String::new(),
                    user: String::new(),
                });
            }
            "date:" => {
                if let Some(current) = revisions.last_mut() {
                    current.date = field(rest, &[';', '+']);
                }
            }
            "user:" => {
                if let Some(current) = revisions.last_mut() {
                    current.user = field(rest, &[';', '+']);
                }
            }
            _ => {}
        }
    }

    revisions
}

/// Text up to the first terminator
fn field(rest: &str, terminators: &[char]) -> String {
    rest.split(terminators)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
