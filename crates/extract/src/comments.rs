// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Doc comment text

/// Strip comment markers from one `comment` node
///
/// `// text` loses the marker and one following space; other indentation
/// is kept so multi-line templates stay readable. Block comments keep
/// their inner lines.
pub fn strip_markers(comment: &str) -> Vec<String> {
    if let Some(line) = comment.strip_prefix("//") {
        return vec![line.strip_prefix(' ').unwrap_or(line).trim_end().to_string()];
    }
    let inner = comment
        .strip_prefix("/*")
        .and_then(|c| c.strip_suffix("*/"))
        .unwrap_or(comment);
    inner
        .lines()
        .map(|l| {
            let l = l.trim();
            l.strip_prefix("* ").or_else(|| l.strip_prefix('*')).unwrap_or(l).to_string()
        })
        .skip_while(|l| l.is_empty())
        .collect()
}

/// Join the comment block into doc text, trimming blank edge lines
pub fn join_doc(lines: &[String]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(s), Some(e)) => lines[s..=e].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment_keeps_indent() {
        assert_eq!(strip_markers("//   {{if x}}"), vec!["  {{if x}}"]);
        assert_eq!(strip_markers("//"), vec![""]);
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(
            strip_markers("/*\n * select *\n * from t\n */"),
            vec!["select *", "from t", ""]
        );
    }

    #[test]
    fn test_join_doc_trims_edges() {
        let lines = vec!["".to_string(), "a".to_string(), "".to_string(), "b".to_string(), "".to_string()];
        assert_eq!(join_doc(&lines), "a\n\nb");
    }
}
