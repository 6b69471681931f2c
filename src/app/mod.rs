use crate::domain::{MenuEntry, SubmenuNode};
use crate::infra::ScanWarningCount;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ResolveScriptsDir(#[from] crate::infra::ResolveScriptsDirError),

    #[error(transparent)]
    Scan(#[from] crate::infra::ScanError),
}

#[derive(Clone, Debug)]
pub struct AppData {
    pub scripts_dir: PathBuf,
    pub root: SubmenuNode,
    pub warnings: ScanWarningCount,
}

impl AppData {
    pub fn from_scan(scripts_dir: PathBuf, root: SubmenuNode, warnings: ScanWarningCount) -> Self {
        Self {
            scripts_dir,
            root,
            warnings,
        }
    }
}

/// Menu navigation state over one immutable scan snapshot. `trail` holds one
/// cursor per open level; every element but the last points at the submenu
/// entry the next level was opened from.
#[derive(Clone, Debug)]
pub struct AppModel {
    pub data: AppData,
    pub trail: Vec<usize>,
    pub notice: Option<String>,
}

/// A rendered menu level: the submenu it shows and its cursor position.
pub struct OpenLevel<'a> {
    pub node: &'a SubmenuNode,
    pub cursor: usize,
}

impl AppModel {
    pub fn new(data: AppData) -> Self {
        let cursor = first_selectable(&data.root.entries).unwrap_or(0);
        Self {
            data,
            trail: vec![cursor],
            notice: None,
        }
    }

    pub fn with_notice(&self, notice: Option<String>) -> Self {
        Self {
            notice,
            ..self.clone()
        }
    }

    pub fn open_levels(&self) -> Vec<OpenLevel<'_>> {
        (0..self.trail.len())
            .map(|depth| OpenLevel {
                node: self.submenu_at(depth),
                cursor: self.trail[depth],
            })
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&MenuEntry> {
        let cursor = *self.trail.last()?;
        self.submenu_at(self.trail.len() - 1).entries.get(cursor)
    }

    fn submenu_at(&self, depth: usize) -> &SubmenuNode {
        let mut node = &self.data.root;
        for cursor in &self.trail[..depth] {
            match node.entries.get(*cursor) {
                Some(MenuEntry::Submenu(next)) => node = next,
                _ => break,
            }
        }
        node
    }

    fn move_cursor(&mut self, delta: isize) {
        let Some(&cursor) = self.trail.last() else {
            return;
        };
        let entries = &self.submenu_at(self.trail.len() - 1).entries;
        let mut index = cursor as isize;
        let next = loop {
            index += delta;
            if index < 0 || index as usize >= entries.len() {
                return;
            }
            if entries[index as usize].is_selectable() {
                break index as usize;
            }
        };
        if let Some(slot) = self.trail.last_mut() {
            *slot = next;
        }
    }

    fn open_selected_submenu(&mut self) {
        let child_cursor = match self.selected_entry() {
            Some(MenuEntry::Submenu(submenu)) => first_selectable(&submenu.entries).unwrap_or(0),
            _ => return,
        };
        self.trail.push(child_cursor);
    }

    fn close_submenu(&mut self) -> bool {
        if self.trail.len() > 1 {
            self.trail.pop();
            true
        } else {
            false
        }
    }

    fn activate(&mut self) -> AppCommand {
        if let Some(MenuEntry::Action(action)) = self.selected_entry() {
            return AppCommand::Launch(action.path.clone());
        }
        self.open_selected_submenu();
        AppCommand::None
    }
}

fn first_selectable(entries: &[MenuEntry]) -> Option<usize> {
    entries.iter().position(|entry| entry.is_selectable())
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppCommand {
    None,
    Quit,
    Launch(PathBuf),
}

pub fn update(model: AppModel, event: AppEvent) -> (AppModel, AppCommand) {
    match event {
        AppEvent::Key(key) => update_on_key(model, key),
    }
}

fn update_on_key(mut model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    model.notice = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return (model, AppCommand::Quit);
    }

    match key.code {
        KeyCode::Char('q') => (model, AppCommand::Quit),
        KeyCode::Esc => {
            if model.close_submenu() {
                (model, AppCommand::None)
            } else {
                (model, AppCommand::Quit)
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            model.move_cursor(-1);
            (model, AppCommand::None)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            model.move_cursor(1);
            (model, AppCommand::None)
        }
        KeyCode::Left | KeyCode::Char('h') => {
            model.close_submenu();
            (model, AppCommand::None)
        }
        KeyCode::Right | KeyCode::Char('l') => {
            model.open_selected_submenu();
            (model, AppCommand::None)
        }
        KeyCode::Enter => {
            let command = model.activate();
            (model, command)
        }
        _ => (model, AppCommand::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActionNode;

    fn action(name: &str, path: &str) -> MenuEntry {
        MenuEntry::Action(ActionNode {
            display_name: name.to_string(),
            path: PathBuf::from(path),
        })
    }

    fn sample_model() -> AppModel {
        let tools = SubmenuNode {
            name: "tools".to_string(),
            path: PathBuf::from("/scripts/tools"),
            entries: vec![
                action("a", "/scripts/tools/a.sh"),
                action("b", "/scripts/tools/b.py"),
            ],
        };
        let root = SubmenuNode {
            name: "scripts".to_string(),
            path: PathBuf::from("/scripts"),
            entries: vec![
                MenuEntry::Submenu(tools),
                MenuEntry::Separator,
                action("run", "/scripts/run.sh"),
            ],
        };
        AppModel::new(AppData::from_scan(
            PathBuf::from("/scripts"),
            root,
            ScanWarningCount::from(0usize),
        ))
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn cursor_skips_separators() {
        let model = sample_model();
        let (model, command) = update(model, key(KeyCode::Down));
        assert_eq!(command, AppCommand::None);
        assert_eq!(model.trail, vec![2]);

        let (model, _) = update(model, key(KeyCode::Up));
        assert_eq!(model.trail, vec![0]);
    }

    #[test]
    fn cursor_stays_put_at_the_edges() {
        let model = sample_model();
        let (model, _) = update(model, key(KeyCode::Up));
        assert_eq!(model.trail, vec![0]);

        let (model, _) = update(model, key(KeyCode::Down));
        let (model, _) = update(model, key(KeyCode::Down));
        assert_eq!(model.trail, vec![2]);
    }

    #[test]
    fn submenu_opens_and_closes() {
        let model = sample_model();
        let (model, command) = update(model, key(KeyCode::Right));
        assert_eq!(command, AppCommand::None);
        assert_eq!(model.trail, vec![0, 0]);
        assert_eq!(model.selected_entry().map(|entry| entry.label()), Some("a"));

        let (model, command) = update(model, key(KeyCode::Left));
        assert_eq!(command, AppCommand::None);
        assert_eq!(model.trail, vec![0]);
    }

    #[test]
    fn enter_on_action_launches() {
        let model = sample_model();
        let (model, _) = update(model, key(KeyCode::Down));
        let (_model, command) = update(model, key(KeyCode::Enter));
        assert_eq!(
            command,
            AppCommand::Launch(PathBuf::from("/scripts/run.sh"))
        );
    }

    #[test]
    fn enter_on_submenu_descends_into_it() {
        let model = sample_model();
        let (model, command) = update(model, key(KeyCode::Enter));
        assert_eq!(command, AppCommand::None);
        assert_eq!(model.trail, vec![0, 0]);
    }

    #[test]
    fn escape_pops_levels_then_quits() {
        let model = sample_model();
        let (model, _) = update(model, key(KeyCode::Right));
        let (model, command) = update(model, key(KeyCode::Esc));
        assert_eq!(command, AppCommand::None);
        assert_eq!(model.trail, vec![0]);

        let (_model, command) = update(model, key(KeyCode::Esc));
        assert_eq!(command, AppCommand::Quit);
    }

    #[test]
    fn quit_keys() {
        let (_model, command) = update(sample_model(), key(KeyCode::Char('q')));
        assert_eq!(command, AppCommand::Quit);

        let event = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let (_model, command) = update(sample_model(), event);
        assert_eq!(command, AppCommand::Quit);
    }

    #[test]
    fn empty_submenu_is_still_navigable() {
        let empty = SubmenuNode {
            name: "empty".to_string(),
            path: PathBuf::from("/scripts/empty"),
            entries: Vec::new(),
        };
        let root = SubmenuNode {
            name: "scripts".to_string(),
            path: PathBuf::from("/scripts"),
            entries: vec![MenuEntry::Submenu(empty)],
        };
        let model = AppModel::new(AppData::from_scan(
            PathBuf::from("/scripts"),
            root,
            ScanWarningCount::from(0usize),
        ));

        let (model, _) = update(model, key(KeyCode::Right));
        assert_eq!(model.trail, vec![0, 0]);
        assert!(model.selected_entry().is_none());

        let (model, command) = update(model, key(KeyCode::Down));
        assert_eq!(command, AppCommand::None);

        let (model, command) = update(model, key(KeyCode::Enter));
        assert_eq!(command, AppCommand::None);
        assert_eq!(model.trail, vec![0, 0]);

        let (model, _) = update(model, key(KeyCode::Left));
        assert_eq!(model.trail, vec![0]);
    }
}
