use crate::domain::{ActionNode, MenuEntry, SubmenuNode, clean_display_name};
use dirs::home_dir;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanWarningCount(usize);

impl From<usize> for ScanWarningCount {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl ScanWarningCount {
    pub fn get(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scripts directory does not exist: {0}")]
    ScriptsDirMissing(String),
}

#[derive(Debug, Error)]
pub enum ResolveScriptsDirError {
    #[error("home directory not found")]
    HomeDirNotFound,
}

pub fn resolve_scripts_dir() -> Result<PathBuf, ResolveScriptsDirError> {
    if let Some(override_dir) = std::env::var_os("SCRIPTMENU_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let Some(home) = home_dir() else {
        return Err(ResolveScriptsDirError::HomeDirNotFound);
    };

    Ok(home.join(".scriptmenu").join("scripts"))
}

#[derive(Clone, Debug)]
pub struct MenuScanOutput {
    pub root: SubmenuNode,
    pub warnings: ScanWarningCount,
}

/// Projects the scripts directory into a menu tree. Only a missing root is
/// an error; everything below it degrades per entry and is counted in
/// `warnings` instead of aborting sibling subtrees.
pub fn scan_scripts_dir(scripts_dir: &Path) -> Result<MenuScanOutput, ScanError> {
    let missing = || ScanError::ScriptsDirMissing(scripts_dir.display().to_string());
    if !scripts_dir.is_dir() {
        return Err(missing());
    }
    let scripts_dir = scripts_dir.canonicalize().map_err(|_| missing())?;

    let name = scripts_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| scripts_dir.display().to_string());

    let mut warnings = 0usize;
    let root = build_submenu(name, &scripts_dir, &mut warnings);

    Ok(MenuScanOutput {
        root,
        warnings: ScanWarningCount::from(warnings),
    })
}

fn build_submenu(name: String, dir: &Path, warnings: &mut usize) -> SubmenuNode {
    let mut folders: Vec<(String, PathBuf)> = Vec::new();
    let mut files: Vec<(String, PathBuf)> = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_error) => {
                // Unreadable listings leave the level empty but navigable.
                *warnings += 1;
                continue;
            }
        };

        let raw_name = entry.file_name().to_string_lossy().into_owned();
        if raw_name.starts_with('.') {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            folders.push((raw_name, entry.into_path()));
        } else if file_type.is_file() {
            files.push((raw_name, entry.into_path()));
        }
        // Symlinks and special files fall through both arms: never listed,
        // never followed, so the recursion cannot cycle.
    }

    let separator_needed = !folders.is_empty() && !files.is_empty();
    let mut entries = Vec::with_capacity(folders.len() + files.len() + 1);

    for (folder_name, folder_path) in folders {
        entries.push(MenuEntry::Submenu(build_submenu(
            folder_name,
            &folder_path,
            warnings,
        )));
    }

    if separator_needed {
        entries.push(MenuEntry::Separator);
    }

    for (file_name, file_path) in files {
        entries.push(MenuEntry::Action(ActionNode {
            display_name: clean_display_name(&file_name),
            path: file_path,
        }));
    }

    SubmenuNode {
        name,
        path: dir.to_path_buf(),
        entries,
    }
}
