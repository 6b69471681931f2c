const TERMINAL_DIRECTIVE: &str = "terminal=true";

/// A script line requests a visible terminal when, with all whitespace
/// removed and case folded, it contains `terminal=true` anywhere.
pub fn line_requests_terminal(line: &str) -> bool {
    let folded = line
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    folded.contains(TERMINAL_DIRECTIVE)
}
