mod app;
mod cli;
mod domain;
mod infra;
mod ui;

use crate::app::{AppCommand, AppData, AppEvent, AppModel};
use crate::cli::CliInvocation;
use crate::infra::{TerminalEmulator, launch_script, resolve_scripts_dir, scan_scripts_dir};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    App(#[from] crate::app::AppError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),
}

fn main() {
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Menu { dir } => Ok(run_menu(dir)?),
        CliInvocation::Command(command) => Ok(crate::cli::run(command)?),
    }
}

fn print_help() {
    let text = format!(
        "{name} — launch scripts from a folder-structured popup menu\n\nUSAGE:\n  {name} [--dir DIR]                 Open the menu\n  {name} tree [--json]               Print the projected menu tree\n  {name} run SCRIPT                  Launch one script directly\n  {name} --help | --version\n\nFLAGS:\n  --dir DIR, -d DIR  Scripts root for this invocation (before the subcommand)\n  --json             tree: structured JSON instead of indented text\n\nSCRIPTS:\n  Folders become submenus, files become entries; dotfiles stay hidden.\n  Entry names drop one .sh/.bash/.py/.pl/.rb extension and one leading\n  underscore. A script with Terminal=true in its first 10 lines opens in\n  a terminal window; otherwise it runs silently in the background.\n\nENV:\n  SCRIPTMENU_DIR        Scripts root (default: ~/.scriptmenu/scripts)\n  SCRIPTMENU_TERMINAL   Terminal emulator command (default: gnome-terminal --)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}

fn run_menu(dir: Option<PathBuf>) -> Result<(), app::AppError> {
    let scripts_dir = match dir {
        Some(dir) => dir,
        None => resolve_scripts_dir()?,
    };
    let scan = scan_scripts_dir(&scripts_dir)?;
    let notice = (scan.warnings.get() > 0)
        .then(|| format!("{} entries skipped during scan", scan.warnings.get()));
    let data = AppData::from_scan(scripts_dir, scan.root, scan.warnings);
    let model = AppModel::new(data).with_notice(notice);

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, model);
    restore_terminal(&mut terminal)?;

    // The menu session is over either way; a failed spawn is reported, not
    // retried, and does not fail the session.
    if let Some(script_path) = result? {
        let emulator = TerminalEmulator::resolve();
        if let Err(error) = launch_script(&script_path, &emulator) {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, app::AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), app::AppError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut model: AppModel,
) -> Result<Option<PathBuf>, app::AppError> {
    loop {
        terminal.draw(|frame| ui::render(frame, &model))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let (next, command) = app::update(model, AppEvent::Key(key));
                model = next;
                match command {
                    AppCommand::None => {}
                    AppCommand::Quit => return Ok(None),
                    AppCommand::Launch(path) => return Ok(Some(path)),
                }
            }
            _ => {}
        }
    }
}
