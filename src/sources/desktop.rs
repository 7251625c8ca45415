use crate::model::Candidate;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use unicode_general_category::{GeneralCategory, get_general_category};

const SECTION: &str = "Desktop Entry";

static FIELD_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%[a-zA-Z@]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Why a shortcut file did not produce a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("unreadable: {0}")]
    Unreadable(String),
    #[error("no [Desktop Entry] group")]
    MissingSection,
    #[error("malformed line {line}: {detail}")]
    Malformed { line: usize, detail: String },
    #[error("no usable Exec command")]
    MissingExec,
    #[error("hidden by NoDisplay")]
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(Candidate),
    Skipped(SkipReason),
}

pub fn parse_desktop_file(path: &Path) -> ParseOutcome {
    match fs::read(path) {
        Ok(bytes) => parse_desktop_entry(&String::from_utf8_lossy(&bytes), path),
        Err(err) => ParseOutcome::Skipped(SkipReason::Unreadable(err.to_string())),
    }
}

/// Parses the `[Desktop Entry]` group of a shortcut file.
///
/// Only `Name`, `Exec`, `Comment`, `Terminal`, `Categories` and `NoDisplay`
/// are read. Keys are case-insensitive, so localized keys such as
/// `Name[de]` are distinct keys and never shadow the plain ones.
pub fn parse_desktop_entry(content: &str, path: &Path) -> ParseOutcome {
    match parse_section(content) {
        Ok(Some(fields)) => build_candidate(&fields, path),
        Ok(None) => ParseOutcome::Skipped(SkipReason::MissingSection),
        Err(reason) => ParseOutcome::Skipped(reason),
    }
}

fn build_candidate(fields: &HashMap<String, String>, path: &Path) -> ParseOutcome {
    let no_display = match parse_bool(fields, "nodisplay") {
        Ok(v) => v,
        Err(reason) => return ParseOutcome::Skipped(reason),
    };
    let terminal = match parse_bool(fields, "terminal") {
        Ok(v) => v,
        Err(reason) => return ParseOutcome::Skipped(reason),
    };

    let exec = fields.get("exec").map(|e| sanitize_exec(e)).unwrap_or_default();
    if exec.is_empty() {
        return ParseOutcome::Skipped(SkipReason::MissingExec);
    }
    if no_display {
        return ParseOutcome::Skipped(SkipReason::Hidden);
    }

    let name = match fields.get("name") {
        Some(name) if !name.is_empty() => name.clone(),
        _ => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    ParseOutcome::Parsed(Candidate {
        comment: fields.get("comment").map(|c| clean_text(c)).unwrap_or_default(),
        categories: fields.get("categories").cloned().unwrap_or_default(),
        terminal,
        path: path.to_path_buf(),
        ..Candidate::new(name, exec)
    })
}

/// Collects the key/value pairs of the `[Desktop Entry]` group.
///
/// Returns `Ok(None)` when the group is absent. A repeated group, or a
/// repeated key within any group, rejects the whole file.
fn parse_section(content: &str) -> Result<Option<HashMap<String, String>>, SkipReason> {
    let mut fields: Option<HashMap<String, String>> = None;
    let mut in_entry = false;
    let mut seen_header = false;
    let mut last_key: Option<String> = None;
    let mut groups: HashSet<String> = HashSet::new();
    let mut group_keys: HashSet<String> = HashSet::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        // Indented lines continue the previous value.
        if raw.starts_with([' ', '\t']) && last_key.is_some() {
            if let (true, Some(key), Some(map)) = (in_entry, &last_key, fields.as_mut()) {
                if let Some(value) = map.get_mut(key) {
                    value.push('\n');
                    value.push_str(line);
                }
            }
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if !groups.insert(header.to_string()) {
                return Err(malformed(line_no, &format!("duplicate group [{header}]")));
            }
            seen_header = true;
            last_key = None;
            group_keys.clear();
            in_entry = header == SECTION;
            if in_entry {
                fields = Some(HashMap::new());
            }
            continue;
        }

        let Some(split) = line.find(['=', ':']) else {
            return Err(malformed(line_no, "expected key=value"));
        };
        if !seen_header {
            return Err(malformed(line_no, "key outside of any group"));
        }

        let key = line[..split].trim().to_lowercase();
        let value = line[split + 1..].trim().to_string();
        if !group_keys.insert(key.clone()) {
            return Err(malformed(line_no, &format!("duplicate key '{key}'")));
        }
        last_key = Some(key.clone());

        if let (true, Some(map)) = (in_entry, fields.as_mut()) {
            map.insert(key, value);
        }
    }

    Ok(fields)
}

fn malformed(line: usize, detail: &str) -> SkipReason {
    SkipReason::Malformed {
        line,
        detail: detail.to_string(),
    }
}

fn parse_bool(fields: &HashMap<String, String>, key: &str) -> Result<bool, SkipReason> {
    let Some(value) = fields.get(key) else {
        return Ok(false);
    };
    match value.to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        other => Err(SkipReason::Malformed {
            line: 0,
            detail: format!("{key} is not a boolean: '{other}'"),
        }),
    }
}

/// Drops `%f`-style field codes and collapses whitespace.
pub fn sanitize_exec(exec: &str) -> String {
    let without_codes = FIELD_CODE.replace_all(exec, "");
    WHITESPACE.replace_all(&without_codes, " ").trim().to_string()
}

/// Space, or any character outside the control, format, surrogate,
/// private-use, unassigned and separator categories.
pub fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    !matches!(
        get_general_category(ch),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

/// Drops non-printable characters and collapses whitespace.
pub fn clean_text(text: &str) -> String {
    let printable: String = text.chars().filter(|&c| is_printable(c)).collect();
    WHITESPACE.replace_all(&printable, " ").trim().to_string()
}
