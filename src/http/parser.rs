//! Raw response parsing
//!
//! Turns the complete byte sequence of one HTTP exchange into a classified
//! [`Outcome`]. The parser is pure: no I/O, no shared state, safe to call
//! concurrently on independent inputs. It also never fails: input that
//! does not match HTTP framing degrades to [`Outcome::Malformed`] with the
//! offending bytes preserved.

use bytes::Bytes;
use tracing::debug;

use super::headers::Headers;
use super::response::Outcome;
use super::MAX_CONTINUATIONS;

/// Parse one complete raw HTTP response.
///
/// The head is split from the body at the first blank line, the status line
/// is matched, and interim `100 Continue` heads are unwrapped until the
/// substantive response surfaces. Structural mismatch at any step returns
/// [`Outcome::Malformed`] rather than an error.
pub fn parse_response(raw: &[u8]) -> Outcome {
    let mut cursor = raw;

    // One initial parse plus up to MAX_CONTINUATIONS unwraps.
    for _ in 0..=MAX_CONTINUATIONS {
        let Some((head_end, body_start)) = split_at_blank_line(cursor) else {
            debug!(bytes = cursor.len(), "no head/body boundary");
            return Outcome::Malformed {
                raw: Bytes::copy_from_slice(cursor),
            };
        };

        let head = String::from_utf8_lossy(&cursor[..head_end]);
        let body = &cursor[body_start..];

        let (status_line, header_block) = match head.split_once('\n') {
            Some((line, block)) => (line, block),
            None => (head.as_ref(), ""),
        };
        let status_line = status_line.strip_suffix('\r').unwrap_or(status_line);

        let Some(code) = parse_status_line(status_line) else {
            debug!(line = status_line, "unparseable status line");
            return Outcome::Malformed {
                raw: Bytes::copy_from_slice(cursor),
            };
        };

        if code == 100 {
            // Interim continuation: the substantive response follows.
            cursor = body;
            continue;
        }

        return Outcome::Http {
            code,
            body: Bytes::copy_from_slice(body),
            headers: Headers::tokenize(header_block),
        };
    }

    debug!(limit = MAX_CONTINUATIONS, "continuation unwrap limit hit");
    Outcome::Malformed {
        raw: Bytes::copy_from_slice(raw),
    }
}

/// Locate the first blank line: a line terminator immediately followed by
/// another, each with optional carriage return. Returns `(head_end,
/// body_start)`, where `head_end` excludes the blank line itself.
fn split_at_blank_line(raw: &[u8]) -> Option<(usize, usize)> {
    for (i, &b) in raw.iter().enumerate() {
        if b != b'\n' {
            continue;
        }
        let rest = &raw[i + 1..];
        if rest.first() == Some(&b'\n') {
            return Some((i, i + 2));
        }
        if rest.starts_with(b"\r\n") {
            return Some((i, i + 3));
        }
    }
    None
}

/// Match `HTTP/<version> <3-digit-code> <reason...>` and extract the code.
/// The reason phrase may be absent.
fn parse_status_line(line: &str) -> Option<u16> {
    let rest = line.strip_prefix("HTTP/")?;
    let (version, rest) = rest.split_once(' ')?;
    if version.is_empty() {
        return None;
    }

    let digits = match rest.split_once(' ') {
        Some((digits, _reason)) => digits,
        None => rest,
    };
    if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}
