use crate::model::Candidate;
use directories::BaseDirs;
use log::{debug, info};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub mod desktop;

pub use desktop::ParseOutcome;

/// Extension of shortcut files.
pub const SHORTCUT_EXTENSION: &str = "desktop";

/// User applications first, then system-wide ones.
pub fn default_paths() -> Vec<PathBuf> {
    let mut data_dirs = Vec::new();
    if let Some(base_dirs) = BaseDirs::new() {
        data_dirs.push(base_dirs.data_dir().join("applications"));
    }
    data_dirs.push(PathBuf::from("/usr/share/applications"));
    data_dirs.push(PathBuf::from("/usr/local/share/applications"));
    data_dirs
}

/// Parses every shortcut file in `paths`, keeping the outcome per file.
///
/// Directories are visited in the given order and files within one
/// directory by file name. Missing or unreadable directories contribute
/// nothing.
pub fn scan(paths: &[PathBuf]) -> Vec<(PathBuf, ParseOutcome)> {
    let mut outcomes = Vec::new();

    for dir in paths {
        if !dir.is_dir() {
            debug!("Skipping missing applications directory {:?}", dir);
            continue;
        }

        debug!("Scanning desktop files in {:?}", dir);
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Cannot read entry in {:?}: {}", dir, err);
                    continue;
                }
            };
            let path = entry.path();
            if is_shortcut_file(path) {
                outcomes.push((path.to_path_buf(), desktop::parse_desktop_file(path)));
            }
        }
    }

    outcomes
}

fn is_shortcut_file(path: &Path) -> bool {
    let visible = path
        .file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| !name.starts_with('.'));
    visible
        && path.extension().and_then(|s| s.to_str()) == Some(SHORTCUT_EXTENSION)
        && path.is_file()
}

/// Loads the candidate set: parsed, deduplicated by case-insensitive name
/// (first directory wins) and sorted by name.
pub fn load(paths: &[PathBuf]) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    let mut skipped = 0;

    for (path, outcome) in scan(paths) {
        match outcome {
            ParseOutcome::Parsed(candidate) => {
                if seen.insert(candidate.sort_key()) {
                    candidates.push(candidate);
                } else {
                    debug!("Dropping duplicate '{}' from {:?}", candidate.name, path);
                }
            }
            ParseOutcome::Skipped(reason) => {
                debug!("Skipping {:?}: {}", path, reason);
                skipped += 1;
            }
        }
    }

    candidates.sort_by_cached_key(|c| c.sort_key());
    info!("DesktopSource: found {} entries, skipped {}", candidates.len(), skipped);
    candidates
}
