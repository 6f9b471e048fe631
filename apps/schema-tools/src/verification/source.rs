use std::path::Path;

use super::{CheckResult, CheckStatus};

pub const NAME: &str = "Source References";

const SHOWN_PER_FILE: usize = 3;
const MAX_LINE_CHARS: usize = 80;

/// A quoted occurrence of the token on a non-comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub line_no: usize,
    pub text: String,
}

/// Scan `text` for `"token"` or `'token'`, ignoring lines that start with
/// `#` or `//`. Matching is case-insensitive.
pub fn find_references(text: &str, token: &str) -> Vec<Hit> {
    let token = token.to_ascii_lowercase();
    let double = format!("\"{token}\"");
    let single = format!("'{token}'");

    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let trimmed = line.trim();
            if trimmed.starts_with('#') || trimmed.starts_with("//") {
                return None;
            }
            let lower = trimmed.to_ascii_lowercase();
            (lower.contains(&double) || lower.contains(&single)).then(|| Hit {
                line_no: i + 1,
                text: trimmed.chars().take(MAX_LINE_CHARS).collect(),
            })
        })
        .collect()
}

/// WARNING per file with references, ERROR per unreadable file.
pub fn check(root: &Path, files: &[String], token: &str) -> CheckResult {
    let mut result = CheckResult::new(NAME);
    let mut total = 0usize;

    for file in files {
        let path = root.join(file);
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                result.push(CheckStatus::Error, format!("Cannot read {file}: {e}"));
                continue;
            }
        };

        let hits = find_references(&text, token);
        if hits.is_empty() {
            continue;
        }
        total += hits.len();
        result.push(
            CheckStatus::Warning,
            format!("Found {} '{token}' reference(s) in {file}", hits.len()),
        );
        for hit in hits.iter().take(SHOWN_PER_FILE) {
            result.add_note(format!("Line {}: {}", hit.line_no, hit.text));
        }
    }

    if total == 0 && result.status() == CheckStatus::Pass {
        return result.pass(format!(
            "No '{token}' references in {} source file(s)",
            files.len()
        ));
    }
    result
}
