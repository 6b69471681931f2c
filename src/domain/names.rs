const STRIPPED_EXTENSIONS: [&str; 5] = [".sh", ".bash", ".py", ".pl", ".rb"];

/// Menu label for a script file: drop at most one known extension (first
/// match in `STRIPPED_EXTENSIONS` order), then at most one leading
/// underscore. Purely cosmetic; the stored path is untouched.
pub fn clean_display_name(file_name: &str) -> String {
    let mut name = file_name;
    for ext in STRIPPED_EXTENSIONS {
        if let Some(stripped) = name.strip_suffix(ext) {
            name = stripped;
            break;
        }
    }
    name.strip_prefix('_').unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_extensions() {
        assert_eq!(clean_display_name("deploy.sh"), "deploy");
        assert_eq!(clean_display_name("backup.bash"), "backup");
        assert_eq!(clean_display_name("setup.py"), "setup");
        assert_eq!(clean_display_name("report.pl"), "report");
        assert_eq!(clean_display_name("task.rb"), "task");
    }

    #[test]
    fn keeps_unknown_names_intact() {
        assert_eq!(clean_display_name("README"), "README");
        assert_eq!(clean_display_name("notes.txt"), "notes.txt");
    }

    #[test]
    fn strips_one_leading_underscore() {
        assert_eq!(clean_display_name("_setup.py"), "setup");
        assert_eq!(clean_display_name("__quiet.sh"), "_quiet");
    }

    #[test]
    fn strips_at_most_one_extension() {
        assert_eq!(clean_display_name("archive.sh.sh"), "archive.sh");
        assert_eq!(clean_display_name("_a.b.rb"), "a.b");
    }
}
