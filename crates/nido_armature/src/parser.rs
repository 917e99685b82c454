//! Stylesheet parser.
//!
//! Splits the source into statements at top-level `{`, `;` and `}` and
//! builds a [`Stylesheet`], recording every piece of whitespace in the node
//! raws so that printing the result reproduces the input.

use memchr::memmem;
use nido_relief::{NodeId, NodeKind, Position, SourceSpan, Stylesheet};

use crate::errors::ParseError;

/// Parser state for a single stylesheet
pub struct Parser<'a> {
    /// Source code
    source: &'a str,
    bytes: &'a [u8],
    /// Current byte offset
    pos: usize,
    /// Byte offsets where lines start, for line/column lookups
    line_starts: Vec<usize>,
    /// Tree being built
    sheet: Stylesheet,
    /// Whether the last non-comment statement ended with `;`
    semicolon: bool,
}

/// Bytes that end an at-rule name
#[inline]
fn ends_at_name(byte: u8) -> bool {
    matches!(
        byte,
        b'\t'
            | b'\n'
            | 0x0C
            | b'\r'
            | b' '
            | b'"'
            | b'#'
            | b'\''
            | b'('
            | b')'
            | b'/'
            | b';'
            | b'['
            | b'\\'
            | b']'
            | b'{'
            | b'}'
    )
}

/// Split `text` into (text without trailing whitespace, trailing whitespace)
#[inline]
fn split_trailing_ws(text: &str) -> (&str, &str) {
    let trimmed = text.trim_end();
    (trimmed, &text[trimmed.len()..])
}

/// Split `text` into (leading whitespace, rest)
#[inline]
fn split_leading_ws(text: &str) -> (&str, &str) {
    let trimmed = text.trim_start();
    (&text[..text.len() - trimmed.len()], trimmed)
}

impl<'a> Parser<'a> {
    /// Create a new parser
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(memchr::memchr_iter(b'\n', source.as_bytes()).map(|i| i + 1))
            .collect();
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line_starts,
            sheet: Stylesheet::new(),
            semicolon: false,
        }
    }

    /// Parse the source and return the tree
    pub fn parse(mut self) -> Result<Stylesheet, ParseError> {
        let root = self.sheet.root();
        self.parse_body(root, None)?;
        let span = self.span(0, self.bytes.len());
        self.sheet.node_mut(root).source = span;
        Ok(self.sheet)
    }

    /// 1-indexed line and column of a byte offset
    fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        Position::new(offset as u32, line as u32, (offset - line_start + 1) as u32)
    }

    fn span(&self, start: usize, end: usize) -> Option<SourceSpan> {
        Some(SourceSpan::new(self.position(start), self.position(end)))
    }

    /// Parse children of `container` until its closing `}` (or the end of
    /// input for the root). `open` is the offset of the container's `{`.
    fn parse_body(&mut self, container: NodeId, open: Option<usize>) -> Result<(), ParseError> {
        let source = self.source;
        loop {
            let before_start = self.pos;
            while let Some(&byte) = self.bytes.get(self.pos) {
                if byte.is_ascii_whitespace() || byte == b';' {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            let before = &source[before_start..self.pos];

            let Some(&byte) = self.bytes.get(self.pos) else {
                if let Some(open) = open {
                    return Err(ParseError::UnclosedBlock {
                        position: self.position(open),
                    });
                }
                self.finish_container(container, before);
                return Ok(());
            };

            match byte {
                b'}' => {
                    if open.is_none() {
                        return Err(ParseError::UnexpectedClose {
                            position: self.position(self.pos),
                        });
                    }
                    self.finish_container(container, before);
                    self.pos += 1;
                    return Ok(());
                }
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'*') => {
                    self.parse_comment(container, before)?
                }
                b'@' => self.parse_at_rule(container, before)?,
                _ => self.parse_statement(container, before)?,
            }
        }
    }

    fn finish_container(&mut self, container: NodeId, after: &str) {
        let has_children = !self.sheet.children(container).is_empty();
        let raws = self.sheet.raws_mut(container);
        if has_children {
            raws.semicolon = Some(self.semicolon);
        }
        raws.after = Some(after.to_string());
        self.semicolon = false;
    }

    fn parse_comment(&mut self, container: NodeId, before: &str) -> Result<(), ParseError> {
        let source = self.source;
        let start = self.pos;
        let Some(close) = memmem::find(&self.bytes[start + 2..], b"*/") else {
            return Err(ParseError::UnclosedComment {
                position: self.position(start),
            });
        };
        let inner = &source[start + 2..start + 2 + close];
        self.pos = start + 2 + close + 2;

        let (left, text, right) = if inner.trim().is_empty() {
            (inner, "", "")
        } else {
            let (left, rest) = split_leading_ws(inner);
            let (text, right) = split_trailing_ws(rest);
            (left, text, right)
        };

        let comment = self.sheet.create_comment(text);
        {
            let node = self.sheet.node_mut(comment);
            node.raws.before = Some(before.to_string());
            node.raws.left = Some(left.to_string());
            node.raws.right = Some(right.to_string());
        }
        let span = self.span(start, self.pos);
        self.sheet.node_mut(comment).source = span;
        self.sheet.append(container, comment);
        Ok(())
    }

    fn parse_at_rule(&mut self, container: NodeId, before: &str) -> Result<(), ParseError> {
        let source = self.source;
        let start = self.pos;
        let mut name_end = start + 1;
        while name_end < self.bytes.len() && !ends_at_name(self.bytes[name_end]) {
            name_end += 1;
        }
        let name = &source[start + 1..name_end];
        let (end, terminator) = self.scan_statement(name_end)?;

        let region = match terminator {
            Some(b'{') | Some(b';') => &source[name_end..end],
            _ => source[name_end..end].trim_end(),
        };
        let (rest, between) = split_trailing_ws(region);
        let (after_name, params) = split_leading_ws(rest);
        let (after_name, between) = if params.is_empty() {
            ("", region)
        } else {
            (after_name, between)
        };

        let has_block = terminator == Some(b'{');
        let at_rule = self.sheet.create(NodeKind::AtRule {
            name: name.to_string(),
            params: params.to_string(),
            has_block,
        });
        {
            let raws = self.sheet.raws_mut(at_rule);
            raws.before = Some(before.to_string());
            raws.after_name = Some(after_name.to_string());
            raws.between = Some(between.to_string());
        }
        self.sheet.append(container, at_rule);
        self.semicolon = false;

        match terminator {
            Some(b'{') => {
                self.pos = end + 1;
                self.parse_body(at_rule, Some(end))?;
            }
            Some(b';') => {
                self.pos = end + 1;
                self.semicolon = true;
            }
            _ => {
                self.pos = name_end + region.len();
            }
        }
        let span = self.span(start, self.pos);
        self.sheet.node_mut(at_rule).source = span;
        Ok(())
    }

    /// A rule (`selector { ... }`) or a declaration (`prop: value;`)
    fn parse_statement(&mut self, container: NodeId, before: &str) -> Result<(), ParseError> {
        let source = self.source;
        let start = self.pos;
        let (end, terminator) = self.scan_statement(start)?;

        if terminator == Some(b'{') {
            let (selector, between) = split_trailing_ws(&source[start..end]);
            let rule = self.sheet.create_rule(selector);
            {
                let raws = self.sheet.raws_mut(rule);
                raws.before = Some(before.to_string());
                raws.between = Some(between.to_string());
            }
            self.sheet.append(container, rule);
            self.semicolon = false;
            self.pos = end + 1;
            self.parse_body(rule, Some(end))?;
            let span = self.span(start, self.pos);
            self.sheet.node_mut(rule).source = span;
            return Ok(());
        }

        let terminated = terminator == Some(b';');
        let region = if terminated {
            &source[start..end]
        } else {
            source[start..end].trim_end()
        };

        let Some(colon) = region.find(':') else {
            let word = region.split_whitespace().next().unwrap_or(region);
            return Err(ParseError::UnknownWord {
                word: word.to_string(),
                position: self.position(start),
            });
        };
        let prop = region[..colon].trim_end();
        if prop.is_empty() {
            return Err(ParseError::UnknownWord {
                word: ":".to_string(),
                position: self.position(start + colon),
            });
        }
        let (colon_ws, value) = split_leading_ws(&region[colon + 1..]);
        let between = format!("{}{}", &region[prop.len()..=colon], colon_ws);

        let (value, important) = split_important(value);
        let decl = self.sheet.create(NodeKind::Decl {
            prop: prop.to_string(),
            value: value.to_string(),
            important: important.is_some(),
        });
        {
            let raws = self.sheet.raws_mut(decl);
            raws.before = Some(before.to_string());
            raws.between = Some(between);
            raws.important = important.map(str::to_string);
        }
        self.sheet.append(container, decl);

        self.pos = if terminated { end + 1 } else { start + region.len() };
        self.semicolon = terminated;
        let span = self.span(start, self.pos);
        self.sheet.node_mut(decl).source = span;
        Ok(())
    }

    /// Find the first top-level `{`, `;` or `}` at or after `from`.
    fn scan_statement(&self, from: usize) -> Result<(usize, Option<u8>), ParseError> {
        let mut i = from;
        let mut parens = 0usize;
        let mut brackets = 0usize;

        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => {
                    i += 2;
                    continue;
                }
                quote @ (b'"' | b'\'') => {
                    i = self.skip_string(i, quote)?;
                    continue;
                }
                b'/' if self.bytes.get(i + 1) == Some(&b'*') => {
                    match memmem::find(&self.bytes[i + 2..], b"*/") {
                        Some(close) => i += 2 + close + 2,
                        None => {
                            return Err(ParseError::UnclosedComment {
                                position: self.position(i),
                            })
                        }
                    }
                    continue;
                }
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                byte @ (b'{' | b';' | b'}') if parens == 0 && brackets == 0 => {
                    return Ok((i, Some(byte)));
                }
                _ => {}
            }
            i += 1;
        }

        Ok((self.bytes.len(), None))
    }

    /// Offset just past the string starting at `open`
    fn skip_string(&self, open: usize, quote: u8) -> Result<usize, ParseError> {
        let mut i = open + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                byte if byte == quote => return Ok(i + 1),
                _ => i += 1,
            }
        }
        Err(ParseError::UnclosedString {
            position: self.position(open),
        })
    }
}

/// Split a trailing `!important` off a declaration value.
///
/// Returns the value and the exact important text (with its leading
/// whitespace) when present.
fn split_important(value: &str) -> (&str, Option<&str>) {
    let trimmed = value.trim_end();
    let Some(bang) = trimmed.rfind('!') else {
        return (value, None);
    };
    if !trimmed[bang + 1..]
        .trim_start()
        .eq_ignore_ascii_case("important")
    {
        return (value, None);
    }
    let value_end = trimmed[..bang].trim_end().len();
    (&value[..value_end], Some(&value[value_end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Stylesheet {
        Parser::new(source)
            .parse()
            .unwrap_or_else(|err| panic!("failed to parse {source:?}: {err}"))
    }

    #[test]
    fn test_parse_rule_with_decls() {
        let sheet = parse(".a { color: red; margin: 0 }");
        let root = sheet.root();
        assert_eq!(sheet.children(root).len(), 1);
        let rule = sheet.children(root)[0];
        assert_eq!(sheet.selector(rule), Some(".a"));
        assert_eq!(sheet.children(rule).len(), 2);
        match sheet.kind(sheet.children(rule)[1]) {
            NodeKind::Decl { prop, value, .. } => {
                assert_eq!(prop, "margin");
                assert_eq!(value, "0");
            }
            other => panic!("Expected decl, got {other:?}"),
        }
        assert_eq!(sheet.raws(rule).semicolon, Some(false));
        assert_eq!(sheet.raws(rule).after.as_deref(), Some(" "));
    }

    #[test]
    fn test_parse_at_rule_block() {
        let sheet = parse("@media (min-width: 1px) { .x { color: blue; } }");
        let media = sheet.children(sheet.root())[0];
        assert_eq!(sheet.node(media).at_rule_name(), Some("media"));
        assert_eq!(sheet.node(media).params(), Some("(min-width: 1px)"));
        let inner = sheet.first_child(media).unwrap_or_else(|| panic!("no child"));
        assert_eq!(sheet.selector(inner), Some(".x"));
    }

    #[test]
    fn test_parse_at_rule_statement() {
        let sheet = parse("@import url(\"a;b.css\");\n.a {}");
        let import = sheet.children(sheet.root())[0];
        assert_eq!(
            sheet.kind(import),
            &NodeKind::AtRule {
                name: "import".into(),
                params: "url(\"a;b.css\")".into(),
                has_block: false,
            }
        );
        assert_eq!(sheet.children(sheet.root()).len(), 2);
    }

    #[test]
    fn test_parse_at_rule_without_params() {
        let sheet = parse("@font-face { font-family: x; }");
        let at_rule = sheet.children(sheet.root())[0];
        assert_eq!(sheet.node(at_rule).params(), Some(""));
        assert_eq!(sheet.raws(at_rule).after_name.as_deref(), Some(""));
        assert_eq!(sheet.raws(at_rule).between.as_deref(), Some(" "));
    }

    #[test]
    fn test_parse_selector_list() {
        let sheet = parse(".a, .b:is(.c, .d) { color: red; }");
        let rule = sheet.children(sheet.root())[0];
        assert_eq!(
            sheet.selectors(rule),
            Some(vec![".a".to_string(), ".b:is(.c, .d)".to_string()])
        );
    }

    #[test]
    fn test_parse_important() {
        let sheet = parse(".a { color: red ! IMPORTANT; }");
        let rule = sheet.children(sheet.root())[0];
        let decl = sheet.children(rule)[0];
        assert_eq!(
            sheet.kind(decl),
            &NodeKind::Decl {
                prop: "color".into(),
                value: "red".into(),
                important: true,
            }
        );
        assert_eq!(sheet.raws(decl).important.as_deref(), Some(" ! IMPORTANT"));
    }

    #[test]
    fn test_parse_comment() {
        let sheet = parse("/*  hello */\n.a { /**/ }");
        let comment = sheet.children(sheet.root())[0];
        assert_eq!(
            sheet.kind(comment),
            &NodeKind::Comment {
                text: "hello".into()
            }
        );
        assert_eq!(sheet.raws(comment).left.as_deref(), Some("  "));
        let rule = sheet.children(sheet.root())[1];
        let empty = sheet.children(rule)[0];
        assert_eq!(sheet.kind(empty), &NodeKind::Comment { text: "".into() });
    }

    #[test]
    fn test_parse_nested_rules() {
        let sheet = parse(".a { color: red; &:hover { color: blue; } .b & { top: 0 } }");
        let rule = sheet.children(sheet.root())[0];
        assert_eq!(sheet.children(rule).len(), 3);
        assert_eq!(sheet.selector(sheet.children(rule)[1]), Some("&:hover"));
        assert_eq!(sheet.selector(sheet.children(rule)[2]), Some(".b &"));
    }

    #[test]
    fn test_source_positions() {
        let sheet = parse(".a {}\n  .b { color: red; }");
        let b = sheet.children(sheet.root())[1];
        let span = sheet.source(b).unwrap_or_else(|| panic!("no source"));
        assert_eq!(span.start, Position::new(8, 2, 3));
        assert_eq!(span.end.offset, 26);
    }

    #[test]
    fn test_roundtrip() {
        let inputs = [
            "",
            "   \n",
            ".a { color: red; }",
            ".a{color:red}",
            ".a {\n  color: red;\n  background: blue\n}\n",
            "/* c */ .a , .b\n{ color : red ; ;  }\n\n",
            "@media screen and (min-width: 1px) {\n  .x { color: blue; }\n}",
            "@import \"a.css\";@charset \"utf-8\";",
            ".a { color: red !important; } .b { color: red!important }",
            ".a { &:hover { color: blue; } & .b { top: 0; } }",
            ".a[title=\"{;}\"] { content: \"}\"; }",
            "@font-face{font-family:x}",
            ".a { background: url(data:image/png;base64,xyz); }",
            ".a { /* first */ color: red; /* last */ }",
            "@media print { }",
        ];
        for input in inputs {
            assert_eq!(parse(input).to_css(), input, "roundtrip of {input:?}");
        }
    }

    #[test]
    fn test_error_unclosed_block() {
        let err = Parser::new(".a { color: red;").parse().unwrap_err();
        assert!(matches!(err, ParseError::UnclosedBlock { .. }));
        assert_eq!(err.position().column, 4);
    }

    #[test]
    fn test_error_unexpected_close() {
        let err = Parser::new(".a {} }").parse().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedClose { .. }));
    }

    #[test]
    fn test_error_unclosed_comment() {
        let err = Parser::new(".a {} /* oops").parse().unwrap_err();
        assert!(matches!(err, ParseError::UnclosedComment { .. }));
    }

    #[test]
    fn test_error_unclosed_string() {
        let err = Parser::new(".a { content: \"x }").parse().unwrap_err();
        assert!(matches!(err, ParseError::UnclosedString { .. }));
    }

    #[test]
    fn test_error_unknown_word() {
        let err = Parser::new("foo bar").parse().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownWord {
                word: "foo".into(),
                position: Position::new(0, 1, 1),
            }
        );
    }
}
