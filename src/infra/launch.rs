use crate::domain::{LaunchMode, line_requests_terminal};
use std::ffi::CString;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

const DIRECTIVE_SCAN_LINES: usize = 10;
const FALLBACK_SHELL: &str = "bash";

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to launch {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// The command that can open a shell command in a visible interactive
/// terminal. Resolved from the environment instead of being hardcoded,
/// since emulator availability varies by system.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TerminalEmulator {
    program: String,
    args: Vec<String>,
}

impl TerminalEmulator {
    pub fn resolve() -> Self {
        std::env::var("SCRIPTMENU_TERMINAL")
            .ok()
            .and_then(|spec| Self::parse(&spec))
            .unwrap_or_default()
    }

    /// Whitespace-split spec, e.g. `kitty -e` or `xterm -hold -e`.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut words = spec.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

impl Default for TerminalEmulator {
    fn default() -> Self {
        Self {
            program: "gnome-terminal".to_string(),
            args: vec!["--".to_string()],
        }
    }
}

/// Launch policy, evaluated fresh per call: a terminal directive wins,
/// then the executable bit picks direct exec over the shell fallback.
pub fn launch_mode_for(script_path: &Path) -> LaunchMode {
    if wants_terminal(script_path) {
        LaunchMode::VisibleTerminal
    } else if is_executable(script_path) {
        LaunchMode::DirectExec
    } else {
        LaunchMode::InterpreterFallback
    }
}

fn wants_terminal(script_path: &Path) -> bool {
    let Ok(file) = File::open(script_path) else {
        return false;
    };

    let mut reader = BufReader::new(file);
    for _ in 0..DIRECTIVE_SCAN_LINES {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            // Unreadable or non-text content means "not requested".
            Ok(0) | Err(_) => break,
            Ok(_) => {
                if line_requests_terminal(&line) {
                    return true;
                }
            }
        }
    }
    false
}

fn is_executable(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

pub fn build_launch_command(
    mode: LaunchMode,
    script_path: &Path,
    emulator: &TerminalEmulator,
) -> Command {
    let mut command = match mode {
        LaunchMode::VisibleTerminal => {
            let mut command = Command::new(&emulator.program);
            command.args(&emulator.args).arg(FALLBACK_SHELL).arg("-c").arg(format!(
                r#""{}"; exec {FALLBACK_SHELL}"#,
                script_path.display()
            ));
            command
        }
        LaunchMode::DirectExec => Command::new(script_path),
        LaunchMode::InterpreterFallback => {
            let mut command = Command::new(FALLBACK_SHELL);
            command.arg(script_path);
            command
        }
    };
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

/// Decides the launch mode, spawns the script detached, and abandons the
/// child: it runs in its own session, so it outlives this process and any
/// signal sent to our process group. Returns as soon as the spawn call
/// itself has succeeded or failed; nothing waits on the child.
pub fn launch_script(
    script_path: &Path,
    emulator: &TerminalEmulator,
) -> Result<LaunchMode, LaunchError> {
    let mode = launch_mode_for(script_path);
    let mut command = build_launch_command(mode, script_path, emulator);

    unsafe {
        command.pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }

    let child = command.spawn().map_err(|source| LaunchError::Spawn {
        path: script_path.display().to_string(),
        source,
    })?;
    // No handle is kept; the orphaned child belongs to the OS reaper now.
    drop(child);

    Ok(mode)
}
