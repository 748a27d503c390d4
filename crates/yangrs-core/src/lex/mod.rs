//! Lexical primitives shared by the YANG and YIN parsers.
//!
//! Everything here operates on borrowed string slices with a cursor-style
//! `&mut &str` contract: on success the cursor is advanced past the consumed
//! text; when the very first character is rejected the cursor is untouched.
//! The full tokenizers live outside this crate; only the pieces every other
//! subsystem needs to agree on (identifiers, node identifiers, revision
//! dates, keywords) are defined here.

mod keyword;

pub use keyword::{match_keyword, Keyword};

use crate::error::{Error, Result};

/// True for characters that may start an identifier.
///
/// `identifier = (ALPHA / "_") *(ALPHA / DIGIT / "_" / "-" / ".")`
#[must_use]
pub fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

/// True for characters that may continue an identifier.
#[must_use]
pub fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'-' | b'.')
}

/// Consume one identifier from the cursor.
///
/// Consumes the longest identifier-shaped prefix and returns it. The RFC 7950
/// rule that identifiers must not start with "xml" (case-insensitive) is a
/// statement-level restriction enforced by the parser, not here.
///
/// # Errors
///
/// [`Error::InvalidInput`] if the first character cannot start an identifier;
/// the cursor is not advanced in that case.
pub fn parse_identifier<'a>(id: &mut &'a str) -> Result<&'a str> {
    let src = *id;
    let bytes = src.as_bytes();

    if !bytes.first().copied().is_some_and(is_ident_start) {
        return Err(Error::InvalidInput(format!(
            "invalid identifier first character in \"{src}\""
        )));
    }

    let mut end = 1;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }

    *id = &src[end..];
    Ok(&src[..end])
}

/// Split one node identifier, `[prefix:]name`, off the cursor.
///
/// Consumes one identifier; if a `:` follows, that identifier was the prefix
/// and a second identifier is consumed as the name. Returns
/// `(prefix, name)` with the cursor advanced past the consumed text.
///
/// # Errors
///
/// [`Error::InvalidInput`] if an identifier is malformed. On failure the
/// cursor points at the first offending character, which callers use for
/// position-qualified diagnostics.
pub fn parse_nodeid<'a>(id: &mut &'a str) -> Result<(Option<&'a str>, &'a str)> {
    let first = parse_identifier(id)?;

    if let Some(rest) = id.strip_prefix(':') {
        *id = rest;
        let name = parse_identifier(id)?;
        Ok((Some(first), name))
    } else {
        Ok((None, first))
    }
}

/// Validate a revision date.
///
/// The value must be exactly 10 characters of `YYYY-MM-DD` shape and denote a
/// real proleptic-Gregorian date; `2018-02-29` is rejected. `stmt` names the
/// statement the value came from and only feeds the diagnostic.
///
/// # Errors
///
/// [`Error::InvalidInput`] on any shape or calendar violation.
pub fn check_date(date: &str, stmt: &str) -> Result<()> {
    let invalid = || Error::InvalidInput(format!("invalid value \"{date}\" of \"{stmt}\""));

    let bytes = date.as_bytes();
    if bytes.len() != 10 {
        return Err(invalid());
    }
    for (i, &b) in bytes.iter().enumerate() {
        if i == 4 || i == 7 {
            if b != b'-' {
                return Err(invalid());
            }
        } else if !b.is_ascii_digit() {
            return Err(invalid());
        }
    }

    // All-digit groups were just verified, so numeric folding cannot wrap.
    let num = |s: &[u8]| s.iter().fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    let year = num(&bytes[0..4]);
    let month = num(&bytes[5..7]);
    let day = num(&bytes[8..10]);

    if chrono::NaiveDate::from_ymd_opt(year as i32, month, day).is_none() {
        return Err(invalid());
    }

    Ok(())
}
