//! Logical line scanner shared by the geometry and material parsers.

use std::borrow::Cow;

/// A non-blank, non-comment line split into its directive keyword and the
/// remaining text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line<'a> {
    pub number: usize,
    pub raw: &'a str,
    pub keyword: &'a str,
    pub rest: &'a str,
}

pub struct Scanner<'a> {
    lines: std::str::Lines<'a>,
    row: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        return Scanner {
            lines: text.lines(),
            row: 0,
        };
    }

    /// Asset bytes are decoded lossily, stray invalid sequences only ever
    /// show up inside names and paths.
    pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
        return String::from_utf8_lossy(bytes);
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        for raw in self.lines.by_ref() {
            self.row += 1;

            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (keyword, rest) = match line.split_once(|c: char| c.is_ascii_whitespace()) {
                Some((keyword, rest)) => (keyword, rest.trim_start()),
                None => (line, ""),
            };

            return Some(Line {
                number: self.row,
                raw: line,
                keyword,
                rest,
            });
        }

        return None;
    }
}

impl<'a> Line<'a> {
    /// Parses the first `N` whitespace-separated fields of the rest of the
    /// line as floats. Extra trailing fields are ignored.
    pub fn floats<const N: usize>(&self) -> Option<[f32; N]> {
        let mut values = [0.0; N];
        let mut fields = self.rest.split_ascii_whitespace();

        for value in values.iter_mut() {
            *value = fields.next()?.parse().ok()?;
        }

        return Some(values);
    }
}
