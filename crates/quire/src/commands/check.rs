//! Verify that every config module in a directory round-trips.
//!
//! Each file a loader claims is loaded, the emitted module is evaluated back
//! into a value, and that value is compared with a direct decode of the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

use quire_loader::{evaluate_module, LoaderChain};
use quire_yaml::{decode_with, DecodeOptions};

/// Outcome of checking one file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Module round-trips
    Passed,
    /// No loader claims the file
    Skipped,
    /// Load, evaluation or comparison failed
    Failed(String),
}

/// Summary of a check run.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub passed: usize,
    pub skipped: usize,
    pub failures: Vec<(PathBuf, String)>,
}

/// Run the check command.
pub fn run(chain: &LoaderChain, options: &DecodeOptions, dir: &Path) -> Result<()> {
    let start = Instant::now();
    let report = check_dir(chain, options, dir)?;

    for (path, message) in &report.failures {
        tracing::warn!("{}: {}", path.display(), message);
    }

    tracing::info!(
        "Checked {} modules ({} skipped) in {}ms",
        report.passed + report.failures.len(),
        report.skipped,
        start.elapsed().as_millis()
    );

    if !report.failures.is_empty() {
        bail!("{} module(s) failed the round-trip check", report.failures.len());
    }
    Ok(())
}

/// Check every file under `dir`.
pub fn check_dir(chain: &LoaderChain, options: &DecodeOptions, dir: &Path) -> Result<CheckReport> {
    if !dir.exists() {
        bail!("Directory not found: {}", dir.display());
    }

    let mut report = CheckReport::default();
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => {
                // Unreadable entries count against the run
                let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                report.failures.push((path, format!("could not be walked: {e}")));
            }
        }
    }

    let outcomes: Vec<(PathBuf, Outcome)> = files
        .into_par_iter()
        .map(|path| {
            let outcome = check_file(chain, options, &path);
            (path, outcome)
        })
        .collect();

    for (path, outcome) in outcomes {
        match outcome {
            Outcome::Passed => report.passed += 1,
            Outcome::Skipped => report.skipped += 1,
            Outcome::Failed(message) => report.failures.push((path, message)),
        }
    }
    Ok(report)
}

/// Check a single file.
pub fn check_file(chain: &LoaderChain, options: &DecodeOptions, path: &Path) -> Outcome {
    let id = path.to_string_lossy();

    let claimed = match chain.load(&id) {
        Ok(Some(claimed)) => claimed,
        Ok(None) => return Outcome::Skipped,
        Err(e) => return Outcome::Failed(e.to_string()),
    };

    let evaluated = match evaluate_module(&claimed.result.code) {
        Ok(value) => value,
        Err(e) => return Outcome::Failed(format!("emitted module does not evaluate: {e}")),
    };

    let expected = match fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|source| decode_with(&source, options).map_err(|e| e.to_string()))
    {
        Ok(value) => value,
        Err(e) => return Outcome::Failed(e),
    };

    if evaluated == expected {
        tracing::debug!("{} round-trips", id);
        Outcome::Passed
    } else {
        Outcome::Failed("evaluated module differs from the decoded file".to_string())
    }
}
