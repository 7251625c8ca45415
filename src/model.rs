use serde::Serialize;
use std::path::PathBuf;

/// Fuzzy match cost. Lower is better, `0` is a prefix or exact match.
pub type Score = i64;

/// One launchable application, as read from a shortcut file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub name: String,       // Display name, unique case-insensitively
    pub exec: String,       // Sanitized launch command, never empty
    pub comment: String,
    pub categories: String, // Raw, unsplit
    pub terminal: bool,
    pub path: PathBuf,      // Diagnostics only
}

impl Candidate {
    pub fn new(name: impl Into<String>, exec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exec: exec.into(),
            comment: String::new(),
            categories: String::new(),
            terminal: false,
            path: PathBuf::new(),
        }
    }

    /// Fields consulted by the ranker, in scoring order.
    pub fn search_fields(&self) -> [&str; 4] {
        [&self.name, &self.comment, &self.categories, &self.exec]
    }

    pub fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedMatch {
    pub candidate: Candidate,
    pub score: Score,
}
