//! Tag-level scanning for the inline decoder and the embed reader.
//!
//! Nothing here builds trees; these helpers only recognise a single opening
//! or closing tag at a known position, or locate the close that matches an
//! opener. Malformed input yields `None` and the caller degrades to text.

use std::collections::BTreeMap;

use super::inline::cursor::Cursor;

/// An opening tag recognised at some position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    /// Lower-cased element name.
    pub name: String,
    /// Attributes with lower-cased names and entity-decoded values.
    /// The first occurrence of a repeated attribute wins.
    pub attrs: BTreeMap<String, String>,
    /// Written as `<name ... />`.
    pub self_closing: bool,
    /// Byte index just past the closing `>`.
    pub end: usize,
}

impl OpenTag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Reads an opening tag starting at byte `at` (which must hold `<`).
pub fn read_open_tag(s: &str, at: usize) -> Option<OpenTag> {
    let mut cur = Cursor::at(s, at);
    if cur.bump()? != b'<' || !cur.peek()?.is_ascii_alphabetic() {
        return None;
    }
    let name = read_name(&mut cur).to_ascii_lowercase();
    let mut attrs = BTreeMap::new();

    loop {
        cur.skip_whitespace();
        match cur.peek()? {
            b'>' => {
                cur.bump();
                return Some(OpenTag {
                    name,
                    attrs,
                    self_closing: false,
                    end: cur.i,
                });
            }
            b'/' if cur.peek_at(1) == Some(b'>') => {
                cur.bump_n(2);
                return Some(OpenTag {
                    name,
                    attrs,
                    self_closing: true,
                    end: cur.i,
                });
            }
            _ => {
                let attr_name = read_attr_name(&mut cur);
                if attr_name.is_empty() {
                    // stray `/`, `=` or quote
                    cur.bump();
                    continue;
                }
                cur.skip_whitespace();
                let value = if cur.peek() == Some(b'=') {
                    cur.bump();
                    cur.skip_whitespace();
                    read_attr_value(&mut cur)?
                } else {
                    String::new()
                };
                attrs.entry(attr_name.to_ascii_lowercase()).or_insert(value);
            }
        }
    }
}

/// If a closing tag for `name` starts at `at`, returns the index just past it.
pub fn close_tag_at(s: &str, at: usize, name: &str) -> Option<usize> {
    let after = s.get(at..)?.strip_prefix("</")?;
    if !after.get(..name.len())?.eq_ignore_ascii_case(name) {
        return None;
    }
    let mut cur = Cursor::at(s, at + 2 + name.len());
    cur.skip_whitespace();
    (cur.peek()? == b'>').then(|| cur.i + 1)
}

/// Finds the first closing tag for `name` at or after `from`, ignoring
/// nesting. Returns `(close_start, close_end)`.
pub fn find_first_close(s: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut cur = Cursor::at(s, from);
    while let Some(at) = cur.find("<") {
        if let Some(end) = close_tag_at(s, at, name) {
            return Some((at, end));
        }
        cur.i = at + 1;
    }
    None
}

/// Finds the closing tag that balances an opener of `name` ending at `from`.
///
/// Same-named openers met on the way increase the depth and each close
/// decreases it; the close seen at depth zero is the match. Tags with other
/// names are never counted. Returns `(close_start, close_end)`.
pub fn find_matching_close(s: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut cur = Cursor::at(s, from);
    while let Some(at) = cur.find("<") {
        if let Some(end) = close_tag_at(s, at, name) {
            if depth == 0 {
                return Some((at, end));
            }
            depth -= 1;
            cur.i = end;
            continue;
        }
        if let Some(open) = read_open_tag(s, at)
            && open.name == name
        {
            if !open.self_closing {
                depth += 1;
            }
            cur.i = open.end;
            continue;
        }
        cur.i = at + 1;
    }
    None
}

fn read_name<'a>(cur: &mut Cursor<'a>) -> &'a str {
    let start = cur.i;
    while cur
        .peek()
        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b':')
    {
        cur.bump();
    }
    &cur.s[start..cur.i]
}

fn read_attr_name<'a>(cur: &mut Cursor<'a>) -> &'a str {
    let start = cur.i;
    while cur.peek().is_some_and(|b| {
        !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'')
    }) {
        cur.bump();
    }
    &cur.s[start..cur.i]
}

fn read_attr_value(cur: &mut Cursor<'_>) -> Option<String> {
    let raw = match cur.peek()? {
        q @ (b'"' | b'\'') => {
            cur.bump();
            let start = cur.i;
            let end = cur.find(if q == b'"' { "\"" } else { "'" })?;
            cur.i = end + 1;
            &cur.s[start..end]
        }
        _ => {
            let start = cur.i;
            while cur
                .peek()
                .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
            {
                cur.bump();
            }
            &cur.s[start..cur.i]
        }
    };
    Some(html_escape::decode_html_entities(raw).into_owned())
}
