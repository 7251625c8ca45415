use crate::model::Candidate;
use log::{info, warn};
use nix::unistd::setsid;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Ordered argv attempts for one launch. The first that spawns wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub attempts: Vec<Vec<String>>,
}

/// First entry of `preferences` found on `PATH` (or given as a path).
pub fn resolve_terminal(preferences: &[String]) -> Option<PathBuf> {
    preferences.iter().find_map(|name| which::which(name).ok())
}

/// Terminal entries go through the terminal emulator when one is available
/// and preferred; direct `sh -c` is always the last resort.
pub fn plan(candidate: &Candidate, terminal: Option<&Path>, prefer_terminal: bool) -> LaunchPlan {
    let exec = candidate.exec.trim().to_string();
    let mut attempts = Vec::new();

    if candidate.terminal && prefer_terminal {
        if let Some(term) = terminal {
            let term = term.to_string_lossy().into_owned();
            attempts.push(vec![
                term.clone(),
                "-e".to_string(),
                "sh".to_string(),
                "-c".to_string(),
                exec.clone(),
            ]);
            attempts.push(vec![term, "-e".to_string(), exec.clone()]);
        } else {
            warn!("No terminal emulator found for '{}', running directly", candidate.name);
        }
    }

    attempts.push(vec!["sh".to_string(), "-c".to_string(), exec]);
    LaunchPlan { attempts }
}

/// Command line of the first attempt, shell-quoted for display.
pub fn describe(plan: &LaunchPlan) -> String {
    plan.attempts
        .first()
        .map(|argv| argv.iter().map(|arg| quote(arg)).collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Spawns the plan fire-and-forget. Failures fall through to the next
/// attempt and are only logged.
pub fn launch(plan: &LaunchPlan) {
    for argv in &plan.attempts {
        match spawn_detached(argv) {
            Ok(()) => {
                info!("Launched {:?}", argv);
                return;
            }
            Err(err) => warn!("Failed to launch {:?}: {}", argv, err),
        }
    }
    warn!("All launch attempts failed");
}

/// New session, standard streams on /dev/null, never waited on.
fn spawn_detached(argv: &[String]) -> io::Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    // SAFETY: setsid is async-signal-safe and touches no parent state.
    unsafe {
        command.pre_exec(|| setsid().map(drop).map_err(io::Error::from));
    }

    command.spawn().map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn terminal_app() -> Candidate {
        let mut candidate = Candidate::new("Htop", "htop --tree");
        candidate.terminal = true;
        candidate
    }

    #[test]
    fn gui_entries_run_directly() {
        let candidate = Candidate::new("Files", "nautilus --new-window");
        let plan = plan(&candidate, Some(Path::new("/usr/bin/xterm")), true);
        assert_eq!(plan.attempts, vec![vec!["sh", "-c", "nautilus --new-window"]]);
    }

    #[test]
    fn terminal_entries_try_the_emulator_first() {
        let plan = plan(&terminal_app(), Some(Path::new("/usr/bin/xterm")), true);
        assert_eq!(
            plan.attempts,
            vec![
                vec!["/usr/bin/xterm", "-e", "sh", "-c", "htop --tree"],
                vec!["/usr/bin/xterm", "-e", "htop --tree"],
                vec!["sh", "-c", "htop --tree"],
            ]
        );
        assert_eq!(describe(&plan), "/usr/bin/xterm -e sh -c 'htop --tree'");
    }

    #[test]
    fn terminal_entries_fall_back_without_emulator_or_preference() {
        let direct = vec![vec!["sh", "-c", "htop --tree"]];
        assert_eq!(plan(&terminal_app(), None, true).attempts, direct);
        assert_eq!(
            plan(&terminal_app(), Some(Path::new("/usr/bin/xterm")), false).attempts,
            direct
        );
    }

    #[test]
    fn quoting_escapes_single_quotes() {
        assert_eq!(quote("it's"), r"'it'\''s'");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("--x=1"), "--x=1");
    }

    #[test]
    fn resolves_first_available_terminal() {
        let prefs = vec!["tlaunch-no-such-terminal".to_string(), "sh".to_string()];
        let resolved = resolve_terminal(&prefs).expect("sh is on PATH");
        assert!(resolved.ends_with("sh"));
        assert_eq!(resolve_terminal(&["tlaunch-no-such-terminal".to_string()]), None);
    }

    #[test]
    fn launch_falls_back_and_detaches() {
        let dir = tempdir().unwrap();
        let marker = dir.path().join("launched");
        let script = format!("echo ok > '{}'", marker.display());
        let plan = LaunchPlan {
            attempts: vec![
                vec!["/nonexistent/tlaunch-terminal".to_string(), "-e".to_string(), script.clone()],
                vec!["sh".to_string(), "-c".to_string(), script],
            ],
        };

        launch(&plan);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !marker.exists() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(fs::read_to_string(&marker).unwrap().trim(), "ok");
    }

    #[test]
    fn empty_argv_is_rejected() {
        assert!(spawn_detached(&[]).is_err());
    }
}
