//! Brace-balanced block spans.
//!
//! Every extraction pass locates a block header with a regex ending in `{`
//! and then asks [`matching_brace`] where the block closes. Double-quoted
//! strings, heredocs and comments are skipped while counting depth, so a `}`
//! inside `"..."` or after `#` does not end the block. Unbalanced input never fails:
//! the block simply runs to the end of the text.

use regex::{Captures, Regex};

/// A block located by its header.
#[derive(Debug)]
pub struct Block<'a> {
    /// Header captures (labels)
    pub captures: Captures<'a>,
    /// Byte offset where the header match starts
    pub start: usize,
    /// Text between the braces
    pub body: &'a str,
    /// Byte offset just past the closing brace (or the text length)
    pub end: usize,
}

/// Iterate over every block whose header matches `header`.
///
/// `header` must end with a literal `\{`. Searching resumes right after each
/// header, so an unclosed block does not hide the blocks that follow it.
pub fn blocks<'a>(text: &'a str, header: &'a Regex) -> impl Iterator<Item = Block<'a>> + 'a {
    header.captures_iter(text).filter_map(move |captures| {
        let whole = captures.get(0)?;
        let open = whole.end().checked_sub(1)?;
        if text.as_bytes().get(open) != Some(&b'{') {
            return None;
        }
        let close = matching_brace(text, open);
        let end = (close + 1).min(text.len());
        Some(Block {
            start: whole.start(),
            body: &text[open + 1..close],
            end,
            captures,
        })
    })
}

/// The first block whose header matches `header`, searching from `from`.
#[must_use]
pub fn first_block<'a>(text: &'a str, header: &'a Regex, from: usize) -> Option<Block<'a>> {
    let tail = text.get(from..)?;
    let mut block = blocks(tail, header).next()?;
    block.start += from;
    block.end += from;
    Some(block)
}

/// Byte offset of the `}` matching the `{` at `open`, or `text.len()` when
/// the block is never closed.
#[must_use]
pub fn matching_brace(text: &str, open: usize) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i;
                }
            }
            b'"' => i = skip_string(bytes, i),
            b'#' => i = skip_line(bytes, i),
            b'<' if bytes.get(i + 1) == Some(&b'<') => {
                if let Some(last) = skip_heredoc(bytes, i) {
                    i = last;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            _ => {}
        }
        i += 1;
    }

    text.len()
}

/// 1-based line number of byte `offset`.
#[must_use]
pub fn line_of(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Index of the closing quote of the string opened at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'"' => return i,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// Index of the last byte of the heredoc (`<<ID` or `<<-ID`) opened at
/// `start`, or `None` when `start` does not open one. An unterminated
/// heredoc runs to the end of the text.
fn skip_heredoc(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 2;
    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    let ident_start = i;
    while bytes
        .get(i)
        .is_some_and(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        i += 1;
    }
    let ident = &bytes[ident_start..i];
    if !ident.first().is_some_and(|&b| b.is_ascii_alphabetic() || b == b'_') {
        return None;
    }
    if bytes.get(i) == Some(&b'\r') {
        i += 1;
    }
    if bytes.get(i) != Some(&b'\n') {
        return None;
    }

    let mut line_start = i + 1;
    while line_start < bytes.len() {
        let line_end = bytes[line_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |p| line_start + p);
        if bytes[line_start..line_end].trim_ascii() == ident {
            return Some(line_end - 1);
        }
        line_start = line_end + 1;
    }
    Some(bytes.len())
}

/// Index of the newline ending the comment at `start`.
fn skip_line(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| start + p)
}

/// Index of the `/` closing the comment at `start`.
fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}
