//! Single-pass byte scanner behind [`crate::Lexer`].
//!
//! Template substitutions (`${ ... }`) are tracked on an explicit stack
//! rather than by recursion, so nesting depth is bounded by memory only.

use common::diagnostics::{DiagnosticKind, Finding};
use common::span::SourceSpan;

/// Open `${` substitution and the template it belongs to.
#[derive(Clone, Copy, Debug)]
struct Substitution {
    template_start: usize,
    braces: usize,
}

pub(crate) struct Scanner<'t> {
    text: &'t [u8],
    pos: usize,
    substitutions: Vec<Substitution>,
    findings: Vec<Finding>,
}

impl<'t> Scanner<'t> {
    /// `text` must be addressable with `u32` offsets.
    pub(crate) const fn new(text: &'t [u8]) -> Self {
        Self {
            text,
            pos: 0,
            substitutions: Vec::new(),
            findings: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Vec<Finding> {
        if self.text.starts_with(b"#!") {
            self.skip_line();
        }
        while let Some(byte) = self.peek() {
            self.scan_code(byte);
        }
        for substitution in std::mem::take(&mut self.substitutions) {
            self.report(
                DiagnosticKind::UnclosedTemplate,
                substitution.template_start,
                self.text.len(),
            );
        }
        self.findings.sort_by_key(|finding| finding.span().begin());
        self.findings
    }

    // TODO: tell regular expression literals apart from division so quotes
    // inside `/.../` stop opening strings.
    fn scan_code(&mut self, byte: u8) {
        match byte {
            b'\'' | b'"' => self.string(byte),
            b'`' => {
                let start = self.pos;
                self.pos += 1;
                self.template_body(start);
            }
            b'/' if self.peek_at(1) == Some(b'*') => self.block_comment(),
            b'/' if self.peek_at(1) == Some(b'/') => self.skip_line(),
            b'*' if self.peek_at(1) == Some(b'/') => {
                self.report(
                    DiagnosticKind::UnopenedBlockComment,
                    self.pos,
                    self.pos + 2,
                );
                self.pos += 2;
            }
            b'@' => self.unexpected(DiagnosticKind::UnexpectedAtCharacter),
            b'#' if self.peek_at(1).is_some_and(is_identifier_start) => self.pos += 2,
            b'#' => self.unexpected(DiagnosticKind::UnexpectedHashCharacter),
            b'{' => {
                if let Some(open) = self.substitutions.last_mut() {
                    open.braces += 1;
                }
                self.pos += 1;
            }
            b'}' => {
                self.pos += 1;
                self.close_brace();
            }
            _ => self.pos += 1,
        }
    }

    fn close_brace(&mut self) {
        let Some(open) = self.substitutions.last_mut() else {
            return;
        };
        if open.braces > 0 {
            open.braces -= 1;
            return;
        }
        let template_start = open.template_start;
        self.substitutions.pop();
        self.template_body(template_start);
    }

    /// Scan template characters until the closing backtick, the next `${`,
    /// or the end of the text.
    fn template_body(&mut self, start: usize) {
        loop {
            match self.peek() {
                None => {
                    self.report(DiagnosticKind::UnclosedTemplate, start, self.text.len());
                    return;
                }
                Some(b'\\') => self.advance(2),
                Some(b'`') => {
                    self.pos += 1;
                    return;
                }
                Some(b'$') if self.peek_at(1) == Some(b'{') => {
                    self.pos += 2;
                    self.substitutions.push(Substitution {
                        template_start: start,
                        braces: 0,
                    });
                    return;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn string(&mut self, quote: u8) {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None => {
                    self.report(DiagnosticKind::UnclosedStringLiteral, start, self.text.len());
                    return;
                }
                Some(b'\\') => self.skip_escape(),
                Some(byte) if byte == quote => {
                    self.pos += 1;
                    return;
                }
                Some(b'\n' | b'\r') => {
                    self.unclosed_at_line_end(start, quote);
                    return;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// A string literal ran into a line break at `self.pos`.
    ///
    /// If the following line holds exactly one matching quote, the literal
    /// is taken to close there; otherwise it ends at the line break. The
    /// lookahead reads backslashes as plain bytes and never crosses a
    /// second line break.
    fn unclosed_at_line_end(&mut self, start: usize, quote: u8) {
        let line_end = self.pos;
        let next_line = line_end + line_break_len(self.text.get(line_end..).unwrap_or_default());

        let mut quotes = Vec::new();
        let mut cursor = next_line;
        while let Some(byte) = self.text.get(cursor).copied() {
            match byte {
                b'\n' | b'\r' => break,
                _ if byte == quote => {
                    quotes.push(cursor);
                    cursor += 1;
                }
                _ => cursor += 1,
            }
        }

        let end = match quotes.as_slice() {
            [closing] => closing + 1,
            _ => line_end,
        };
        self.report(DiagnosticKind::UnclosedStringLiteral, start, end);
        self.pos = end;
    }

    fn block_comment(&mut self) {
        let start = self.pos;
        let close = self
            .text
            .get(start + 2..)
            .and_then(|rest| rest.windows(2).position(|pair| pair == b"*/"));
        match close {
            Some(offset) => self.pos = start + 2 + offset + 2,
            None => {
                self.report(DiagnosticKind::UnclosedBlockComment, start, start + 2);
                self.pos = self.text.len();
            }
        }
    }

    fn skip_line(&mut self) {
        let rest = self.text.get(self.pos..).unwrap_or_default();
        let length = rest
            .iter()
            .position(|byte| matches!(byte, b'\n' | b'\r'))
            .unwrap_or(rest.len());
        self.pos += length;
    }

    fn skip_escape(&mut self) {
        self.pos += 1;
        if self.peek() == Some(b'\r') && self.peek_at(1) == Some(b'\n') {
            self.pos += 2;
        } else {
            self.advance(1);
        }
    }

    fn unexpected(&mut self, kind: DiagnosticKind) {
        let span = span(self.pos, self.pos + 1);
        self.findings.push(Finding::new(kind, span).with_arg(span));
        self.pos += 1;
    }

    fn report(&mut self, kind: DiagnosticKind, begin: usize, end: usize) {
        self.findings.push(Finding::new(kind, span(begin, end)));
    }

    fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.text.len());
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.get(self.pos + offset).copied()
    }
}

fn span(begin: usize, end: usize) -> SourceSpan {
    let offset = |position: usize| u32::try_from(position).unwrap_or(u32::MAX);
    SourceSpan::new(offset(begin), offset(end)).unwrap_or_default()
}

fn line_break_len(rest: &[u8]) -> usize {
    match rest {
        [b'\r', b'\n', ..] => 2,
        [b'\n' | b'\r', ..] => 1,
        _ => 0,
    }
}

const fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || matches!(byte, b'_' | b'$' | b'\\') || byte >= 0x80
}
