//! Whole-file diff rendering
//!
//! The studio rewrites entire files, so the preview diff is intentionally
//! naive: one hunk that removes every old line and adds every new line.
//! Equal contents render as a header plus a `(no changes)` marker.

/// Render a unified-style preview diff for one target file
pub fn format_file_diff(target_path: &str, before: &str, after: &str) -> String {
    if before == after {
        return format!("--- a/{}\n+++ b/{}\n(no changes)", target_path, target_path);
    }

    let mut lines: Vec<String> = vec![
        format!("--- a/{}", target_path),
        format!("+++ b/{}", target_path),
        "@@".to_string(),
    ];
    // An empty string still contributes one empty line, matching how the
    // file would render in an editor
    for line in before.split('\n') {
        lines.push(format!("-{}", line));
    }
    for line in after.split('\n') {
        lines.push(format!("+{}", line));
    }

    lines.join("\n")
}
