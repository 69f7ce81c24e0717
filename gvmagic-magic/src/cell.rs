//! Cell text → magic invocations.
//!
//! A cell whose first non-blank line starts with `%%name` is one cell magic:
//! the rest of that line is its argument line and everything after it is the
//! body, its lines rejoined with `\n` (CRLF endings become LF). Any other
//! cell is a list of line magics, one `%name args` per line; blank lines and
//! `#` comments are skipped.

use crate::error::MagicError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Line { name: String, args: String },
    Cell { name: String, line: String, body: String },
}

pub fn parse_cell(source: &str) -> Vec<Result<Invocation, MagicError>> {
    let mut lines = source.lines().enumerate().skip_while(|(_, l)| l.trim().is_empty());

    let Some((first_idx, first)) = lines.next() else {
        return Vec::new();
    };

    if let Some(rest) = first.trim_start().strip_prefix("%%") {
        let (name, line) = split_name(rest);
        let body: Vec<&str> = lines.map(|(_, l)| l).collect();
        return vec![Ok(Invocation::Cell {
            name,
            line,
            body: body.join("\n"),
        })];
    }

    std::iter::once((first_idx, first))
        .chain(lines)
        .filter_map(|(idx, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            Some(parse_line(idx + 1, trimmed))
        })
        .collect()
}

fn parse_line(line_no: usize, trimmed: &str) -> Result<Invocation, MagicError> {
    match trimmed.strip_prefix('%') {
        Some(rest) if !rest.starts_with('%') => {
            let (name, args) = split_name(rest);
            Ok(Invocation::Line { name, args })
        }
        _ => Err(MagicError::NotAMagic { line: line_no }),
    }
}

fn split_name(rest: &str) -> (String, String) {
    match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name.to_owned(), args.trim().to_owned()),
        None => (rest.trim().to_owned(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_magic_keeps_body_lines() {
        let parsed = parse_cell("%%dot digraph G\n{\n  a -> b\n}");
        assert_eq!(parsed.len(), 1);
        assert_eq!(
            parsed[0].as_ref().unwrap(),
            &Invocation::Cell {
                name: "dot".into(),
                line: "digraph G".into(),
                body: "{\n  a -> b\n}".into(),
            }
        );
    }

    #[test]
    fn line_magics_skip_blanks_and_comments() {
        let parsed = parse_cell("\n# graphs\n%dotstr \"digraph{}\"\n\n%dotobjs graphs\n");
        let names: Vec<_> = parsed
            .iter()
            .map(|p| match p.as_ref().unwrap() {
                Invocation::Line { name, .. } => name.as_str(),
                Invocation::Cell { .. } => "cell",
            })
            .collect();
        assert_eq!(names, vec!["dotstr", "dotobjs"]);
    }

    #[test]
    fn stray_line_reports_its_number() {
        let parsed = parse_cell("%dot graph{}\n\nx = 1\n");
        assert_eq!(parsed.len(), 2);
        match &parsed[1] {
            Err(MagicError::NotAMagic { line }) => assert_eq!(*line, 3),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn crlf_body_is_rejoined_with_lf() {
        let parsed = parse_cell("%%dot\r\ndigraph {\r\n  a -> b\r\n}\r\n");
        match parsed[0].as_ref().unwrap() {
            Invocation::Cell { body, .. } => assert_eq!(body, "digraph {\n  a -> b\n}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_cell_has_no_invocations() {
        assert!(parse_cell("  \n\n").is_empty());
    }
}
