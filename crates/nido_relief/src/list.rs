//! Splitting of comma separated lists such as selector lists.

/// Split `source` on commas that are outside quotes and parentheses.
///
/// Each entry is trimmed. The last entry is always kept, even when empty,
/// so `"a,"` yields `["a", ""]`.
pub fn comma(source: &str) -> Vec<String> {
    split(source, &[','])
}

fn split(source: &str, separators: &[char]) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escape = false;

    for ch in source.chars() {
        let mut at_separator = false;
        if escape {
            escape = false;
        } else if ch == '\\' {
            escape = true;
        } else if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
        } else if ch == '"' || ch == '\'' {
            quote = Some(ch);
        } else if ch == '(' {
            depth += 1;
        } else if ch == ')' {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && separators.contains(&ch) {
            at_separator = true;
        }

        if at_separator {
            if !current.is_empty() {
                entries.push(current.trim().to_string());
            }
            current.clear();
        } else {
            current.push(ch);
        }
    }

    entries.push(current.trim().to_string());
    entries
}
