//! Comment grouping and documentation text extraction.
//!
//! Comments are grouped the way the Go toolchain groups them: a comment
//! joins the current group when it starts at most one line after the
//! previous comment ends and no code came in between. A comment that trails
//! code on its first line forms a line-comment group of its own.

use super::facts::{CommentGroup, Span};

/// Builds comment groups from a stream of comment and code tokens.
#[derive(Debug, Default)]
pub struct CommentGrouper {
    groups: Vec<CommentGroup>,
    open: Option<CommentGroup>,
    last_code_line: Option<usize>,
}

impl CommentGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a comment token.
    pub fn comment(&mut self, text: &str, span: Span) {
        if let Some(open) = self.open.as_mut() {
            let joins = if open.line_comment {
                span.start_line == open.end_line()
            } else {
                span.start_line <= open.end_line() + 1
            };
            if joins {
                open.comments.push(text.to_string());
                open.span = open.span.to(&span);
                return;
            }
            if let Some(closed) = self.open.take() {
                self.groups.push(closed);
            }
        }

        self.open = Some(CommentGroup {
            comments: vec![text.to_string()],
            span,
            line_comment: self.last_code_line == Some(span.start_line),
            lead: false,
        });
    }

    /// Feed a non-comment token.
    pub fn code(&mut self, span: Span) {
        if let Some(mut group) = self.open.take() {
            group.lead = !group.line_comment && span.start_line == group.end_line() + 1;
            self.groups.push(group);
        }
        self.last_code_line = Some(span.end_line);
    }

    /// All groups in source order.
    pub fn finish(mut self) -> Vec<CommentGroup> {
        if let Some(group) = self.open.take() {
            self.groups.push(group);
        }
        self.groups
    }
}

/// Documentation text of a comment group.
///
/// Comment markers are removed, `//`-directives are dropped, trailing
/// whitespace is trimmed per line, leading blank lines are removed and runs
/// of blank lines collapse to one. Non-empty text ends with a newline.
pub fn group_text(comments: &[String]) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for raw in comments {
        let body = if let Some(rest) = raw.strip_prefix("//") {
            match rest.strip_prefix(' ') {
                Some(stripped) => stripped,
                None if is_directive(rest) => continue,
                None => rest,
            }
        } else if let Some(rest) = raw.strip_prefix("/*") {
            rest.strip_suffix("*/").unwrap_or(rest)
        } else {
            raw.as_str()
        };

        for line in body.split('\n') {
            lines.push(line.trim_end_matches(&[' ', '\t', '\n', '\r'][..]));
        }
    }

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        let previous_blank = kept.last().map_or(true, |l| l.is_empty());
        if !line.is_empty() || !previous_blank {
            kept.push(line);
        }
    }

    if kept.is_empty() {
        return String::new();
    }
    if kept.last().is_some_and(|l| !l.is_empty()) {
        kept.push("");
    }
    kept.join("\n")
}

/// `//line `, `//extern `, `//export ` and `//[a-z0-9]+:[a-z0-9]` comments.
/// Takes the comment with `//` removed.
fn is_directive(text: &str) -> bool {
    if ["line ", "extern ", "export "]
        .iter()
        .any(|prefix| text.starts_with(prefix))
    {
        return true;
    }

    let bytes = text.as_bytes();
    let colon = match text.find(':') {
        Some(c) if c > 0 && c + 1 < bytes.len() => c,
        _ => return false,
    };

    bytes[..=colon + 1]
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != colon)
        .all(|(_, b)| b.is_ascii_lowercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(comments: &[&str]) -> String {
        let owned: Vec<String> = comments.iter().map(|c| c.to_string()).collect();
        group_text(&owned)
    }

    fn line(n: usize) -> Span {
        Span {
            start_line: n,
            end_line: n,
            start_col: 1,
            end_col: 10,
            ..Span::default()
        }
    }

    #[test]
    fn test_line_comments() {
        assert_eq!(text(&["// aster: hello"]), "aster: hello\n");
        assert_eq!(text(&["// first", "//second"]), "first\nsecond\n");
        assert_eq!(text(&["//"]), "");
    }

    #[test]
    fn test_block_comment() {
        let block = "/*\nPackage aster provides things.\n  More here.   \n*/";
        assert_eq!(
            text(&[block]),
            "Package aster provides things.\n  More here.\n"
        );
    }

    #[test]
    fn test_blank_lines_collapse() {
        assert_eq!(
            text(&["//", "// a", "//", "//", "// b", "//"]),
            "a\n\nb\n"
        );
    }

    #[test]
    fn test_directives_dropped() {
        assert_eq!(text(&["//go:generate stringer", "// Real doc"]), "Real doc\n");
        assert_eq!(text(&["//export Foo", "//line x.go:1"]), "");
        // A space after the slashes means it is ordinary text.
        assert_eq!(text(&["// go:generate"]), "go:generate\n");
        // Directive syntax needs lowercase letters or digits around the colon.
        assert_eq!(text(&["//Note:this"]), "Note:this\n");
    }

    #[test]
    fn test_grouping_adjacent_comments() {
        let mut grouper = CommentGrouper::new();
        grouper.comment("// a", line(1));
        grouper.comment("// b", line(2));
        grouper.comment("// c", line(4));
        grouper.code(line(5));
        let groups = grouper.finish();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].comments, vec!["// a", "// b"]);
        assert_eq!(groups[0].end_line(), 2);
        assert!(!groups[0].lead);
        assert_eq!(groups[1].comments, vec!["// c"]);
        assert!(groups[1].lead);
    }

    #[test]
    fn test_trailing_comment_is_own_group() {
        let mut grouper = CommentGrouper::new();
        grouper.code(line(1));
        grouper.comment("// trailing", line(1));
        grouper.comment("// next", line(2));
        grouper.code(line(3));
        let groups = grouper.finish();

        assert_eq!(groups.len(), 2);
        assert!(groups[0].line_comment);
        assert!(!groups[0].lead);
        assert!(!groups[1].line_comment);
        assert!(groups[1].lead);
    }

    #[test]
    fn test_blank_line_before_code_is_not_lead() {
        let mut grouper = CommentGrouper::new();
        grouper.comment("// detached", line(1));
        grouper.code(line(3));
        let groups = grouper.finish();

        assert_eq!(groups.len(), 1);
        assert!(!groups[0].lead);
    }
}
