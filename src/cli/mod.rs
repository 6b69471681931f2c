use crate::domain::{MenuEntry, SubmenuNode};
use crate::infra::{
    LaunchError, ResolveScriptsDirError, ScanError, TerminalEmulator, launch_script,
    resolve_scripts_dir, scan_scripts_dir,
};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Menu { dir: Option<PathBuf> },
    Command(CliCommand),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliCommand {
    Tree { dir: Option<PathBuf>, json: bool },
    Run { script: PathBuf },
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("missing script path for run")]
    MissingScriptPath,

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut iter = args.iter().skip(1).peekable();
    let mut dir: Option<PathBuf> = None;
    while let Some(arg) = iter.peek() {
        match arg.as_str() {
            "--dir" | "-d" => {
                let _ = iter.next();
                let value = iter
                    .next()
                    .ok_or_else(|| CliParseError::MissingFlagValue("--dir".to_string()))?;
                dir = Some(PathBuf::from(value));
            }
            _ => break,
        }
    }

    let Some(subcommand) = iter.next() else {
        return Ok(CliInvocation::Menu { dir });
    };

    match subcommand.as_str() {
        "tree" => {
            let mut json = false;
            for arg in iter {
                match arg.as_str() {
                    "--json" => json = true,
                    flag if flag.starts_with('-') => {
                        return Err(CliParseError::UnknownFlag(flag.to_string()));
                    }
                    other => return Err(CliParseError::UnexpectedArgument(other.to_string())),
                }
            }
            Ok(CliInvocation::Command(CliCommand::Tree { dir, json }))
        }
        "run" => {
            let script = iter.next().ok_or(CliParseError::MissingScriptPath)?;
            if let Some(extra) = iter.next() {
                return Err(CliParseError::UnexpectedArgument(extra.clone()));
            }
            Ok(CliInvocation::Command(CliCommand::Run {
                script: PathBuf::from(script),
            }))
        }
        other => Err(CliParseError::UnknownSubcommand(other.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error(transparent)]
    Resolve(#[from] ResolveScriptsDirError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub fn run(command: CliCommand) -> Result<(), CliRunError> {
    match command {
        CliCommand::Tree { dir, json } => run_tree(dir, json),
        CliCommand::Run { script } => run_script(&script),
    }
}

fn run_tree(dir: Option<PathBuf>, json: bool) -> Result<(), CliRunError> {
    let scripts_dir = match dir {
        Some(dir) => dir,
        None => resolve_scripts_dir()?,
    };
    let output = scan_scripts_dir(&scripts_dir)?;

    if output.warnings.get() > 0 {
        let mut err = io::stderr().lock();
        let _ = writeln!(
            err,
            "warning: {} entries skipped during scan",
            output.warnings.get()
        );
    }

    let mut out = io::stdout().lock();
    if json {
        let payload = submenu_to_json(&output.root);
        let text =
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        writeln!(out, "{text}")?;
    } else {
        write_entries_text(&mut out, &output.root.entries, 0)?;
    }
    Ok(())
}

fn run_script(script: &PathBuf) -> Result<(), CliRunError> {
    let emulator = TerminalEmulator::resolve();
    let mode = launch_script(script, &emulator)?;
    let mut err = io::stderr().lock();
    let _ = writeln!(err, "launched {} ({})", script.display(), mode.label());
    Ok(())
}

fn write_entries_text(
    out: &mut impl Write,
    entries: &[MenuEntry],
    depth: usize,
) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    for entry in entries {
        match entry {
            MenuEntry::Submenu(node) => {
                writeln!(out, "{indent}{}/", node.name)?;
                write_entries_text(out, &node.entries, depth + 1)?;
            }
            MenuEntry::Action(node) => writeln!(out, "{indent}{}", node.display_name)?,
            MenuEntry::Separator => writeln!(out, "{indent}──")?,
        }
    }
    Ok(())
}

fn submenu_to_json(node: &SubmenuNode) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = node.entries.iter().map(entry_to_json).collect();
    serde_json::json!({
        "kind": "submenu",
        "name": node.name,
        "path": node.path.display().to_string(),
        "entries": entries,
    })
}

fn entry_to_json(entry: &MenuEntry) -> serde_json::Value {
    match entry {
        MenuEntry::Submenu(node) => submenu_to_json(node),
        MenuEntry::Action(node) => serde_json::json!({
            "kind": "action",
            "name": node.display_name,
            "path": node.path.display().to_string(),
        }),
        MenuEntry::Separator => serde_json::json!({ "kind": "separator" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActionNode;

    fn args(parts: &[&str]) -> Vec<String> {
        std::iter::once("scriptmenu")
            .chain(parts.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn bare_invocation_opens_the_menu() {
        assert_eq!(
            parse_invocation(&args(&[])).expect("parse"),
            CliInvocation::Menu { dir: None }
        );
    }

    #[test]
    fn dir_flag_applies_to_menu_and_tree() {
        assert_eq!(
            parse_invocation(&args(&["--dir", "/tmp/s"])).expect("parse"),
            CliInvocation::Menu {
                dir: Some(PathBuf::from("/tmp/s"))
            }
        );
        assert_eq!(
            parse_invocation(&args(&["--dir", "/tmp/s", "tree", "--json"])).expect("parse"),
            CliInvocation::Command(CliCommand::Tree {
                dir: Some(PathBuf::from("/tmp/s")),
                json: true,
            })
        );
    }

    #[test]
    fn run_takes_exactly_one_script() {
        assert_eq!(
            parse_invocation(&args(&["run", "/tmp/s/x.sh"])).expect("parse"),
            CliInvocation::Command(CliCommand::Run {
                script: PathBuf::from("/tmp/s/x.sh")
            })
        );
        assert!(matches!(
            parse_invocation(&args(&["run"])),
            Err(CliParseError::MissingScriptPath)
        ));
        assert!(matches!(
            parse_invocation(&args(&["run", "a", "b"])),
            Err(CliParseError::UnexpectedArgument(_))
        ));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            parse_invocation(&args(&["bogus"])),
            Err(CliParseError::UnknownSubcommand(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["tree", "--bogus"])),
            Err(CliParseError::UnknownFlag(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["tree", "extra"])),
            Err(CliParseError::UnexpectedArgument(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["--dir"])),
            Err(CliParseError::MissingFlagValue(_))
        ));
    }

    #[test]
    fn help_and_version_win_anywhere() {
        assert_eq!(
            parse_invocation(&args(&["tree", "--help"])).expect("parse"),
            CliInvocation::PrintHelp
        );
        assert_eq!(
            parse_invocation(&args(&["-V"])).expect("parse"),
            CliInvocation::PrintVersion
        );
    }

    fn sample_root() -> SubmenuNode {
        SubmenuNode {
            name: "scripts".to_string(),
            path: PathBuf::from("/s"),
            entries: vec![
                MenuEntry::Submenu(SubmenuNode {
                    name: "tools".to_string(),
                    path: PathBuf::from("/s/tools"),
                    entries: vec![MenuEntry::Action(ActionNode {
                        display_name: "a".to_string(),
                        path: PathBuf::from("/s/tools/a.sh"),
                    })],
                }),
                MenuEntry::Separator,
                MenuEntry::Action(ActionNode {
                    display_name: "run".to_string(),
                    path: PathBuf::from("/s/run.sh"),
                }),
            ],
        }
    }

    #[test]
    fn text_tree_mirrors_menu_order() {
        let mut out = Vec::new();
        write_entries_text(&mut out, &sample_root().entries, 0).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "tools/\n  a\n──\nrun\n");
    }

    #[test]
    fn json_tree_carries_kinds_and_paths() {
        let payload = submenu_to_json(&sample_root());
        assert_eq!(
            payload,
            serde_json::json!({
                "kind": "submenu",
                "name": "scripts",
                "path": "/s",
                "entries": [
                    {
                        "kind": "submenu",
                        "name": "tools",
                        "path": "/s/tools",
                        "entries": [
                            { "kind": "action", "name": "a", "path": "/s/tools/a.sh" }
                        ]
                    },
                    { "kind": "separator" },
                    { "kind": "action", "name": "run", "path": "/s/run.sh" }
                ]
            })
        );
    }
}
