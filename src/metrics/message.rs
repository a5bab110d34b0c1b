use serde::Serialize;

/// Facts about a commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageMetrics {
    /// Message as git will record it: comments and trailing blank lines removed
    pub message_text: String,
    /// Characters (not bytes) in the first line
    pub subject_length: usize,
    pub has_body: bool,
    /// Size of the staged diff this message describes
    pub staged_lines: u64,
}

impl MessageMetrics {
    pub fn from_message(raw: &str, staged_lines: u64) -> Self {
        let message_text = clean_message(raw);
        let mut lines = message_text.lines();
        let subject = lines.next().unwrap_or("");
        let has_body = lines.any(|line| !line.trim().is_empty());

        Self {
            subject_length: subject.chars().count(),
            has_body,
            message_text,
            staged_lines,
        }
    }

    pub fn subject(&self) -> &str {
        self.message_text.lines().next().unwrap_or("")
    }
}

/// Strip what git's default cleanup strips: `#` comment lines, everything
/// below the scissors line, trailing whitespace and blank edge lines.
pub fn clean_message(raw: &str) -> String {
    let mut lines = Vec::new();
    for line in raw.lines() {
        if line.starts_with("# ") && line.contains(">8") {
            break;
        }
        if line.starts_with('#') {
            continue;
        }
        lines.push(line.trim_end());
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let start = lines
        .iter()
        .position(|line| !line.is_empty())
        .unwrap_or(lines.len());

    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_message() {
        let raw = "\n\nFix parser   \n\nBody line\n\n\n# Please enter the commit message\n#\n   \n";
        assert_eq!(clean_message(raw), "Fix parser\n\nBody line");
    }

    #[test]
    fn test_scissors_cut() {
        let raw = "Subject\n# ------------------------ >8 ------------------------\ndiff --git a/x b/x\n";
        assert_eq!(clean_message(raw), "Subject");
    }

    #[test]
    fn test_subject_and_body() {
        let metrics = MessageMetrics::from_message("Short subject\n", 0);
        assert_eq!(metrics.subject(), "Short subject");
        assert_eq!(metrics.subject_length, 13);
        assert!(!metrics.has_body);

        let metrics = MessageMetrics::from_message("Subject\n\nBody\n", 0);
        assert!(metrics.has_body);
    }

    #[test]
    fn test_empty_message() {
        let metrics = MessageMetrics::from_message("# only comments\n\n   \n", 0);
        assert_eq!(metrics.message_text, "");
        assert_eq!(metrics.subject_length, 0);
        assert!(!metrics.has_body);
    }

    #[test]
    fn test_subject_length_counts_chars() {
        let metrics = MessageMetrics::from_message("Añadir ñandú", 0);
        assert_eq!(metrics.subject_length, 12);
    }
}
