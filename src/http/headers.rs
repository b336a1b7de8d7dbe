//! HTTP headers handling
//!
//! This module provides ordered header storage with case-insensitive
//! lookups, plus the tokenizer that splits a raw header block into pairs.

use std::fmt;

/// A single header line.
///
/// `value` is absent when the source line carried no colon separator; the
/// raw line is preserved as `name` so nothing is lost for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPair {
    pub name: String,
    pub value: Option<String>,
}

/// HTTP headers collection
///
/// Headers are stored in insertion order and support:
/// - Case-insensitive header name lookups
/// - Multiple values for the same header name, never deduplicated
/// - Iteration over all pairs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Headers {
    pairs: Vec<HeaderPair>,
}

impl Headers {
    /// Create a new empty headers collection
    pub const fn new() -> Self {
        Headers { pairs: Vec::new() }
    }

    /// Append a header
    ///
    /// Existing entries with the same name (case-insensitive) are kept;
    /// this never overwrites.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push(HeaderPair {
            name: name.into(),
            value: Some(value.into()),
        });
    }

    /// Get the first value for a header (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name))
            .find_map(|p| p.value.as_deref())
    }

    /// Get all values for a header (case-insensitive), in insertion order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name))
            .filter_map(|p| p.value.as_deref())
            .collect()
    }

    /// Get all pairs whose name matches `filter` (case-insensitive),
    /// in insertion order
    pub fn matching(&self, filter: &str) -> Vec<&HeaderPair> {
        self.pairs
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(filter))
            .collect()
    }

    /// Check if a header exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Get the number of headers
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if there are no headers
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over all pairs
    pub fn iter(&self) -> impl Iterator<Item = &HeaderPair> {
        self.pairs.iter()
    }

    /// Tokenize a raw header block into pairs
    ///
    /// Each non-empty line is split at the first colon and the value's
    /// leading whitespace is trimmed. A line with no colon becomes a pair
    /// with an absent value and the full line as its name; malformed lines
    /// are tolerated, not rejected. Line terminators may be CRLF or bare LF.
    pub fn tokenize(block: &str) -> Headers {
        let mut headers = Headers::new();

        for line in block.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }

            match line.split_once(':') {
                Some((name, value)) => headers.pairs.push(HeaderPair {
                    name: name.to_string(),
                    value: Some(value.trim_start().to_string()),
                }),
                None => headers.pairs.push(HeaderPair {
                    name: line.to_string(),
                    value: None,
                }),
            }
        }

        headers
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pair in &self.pairs {
            match &pair.value {
                Some(value) => writeln!(f, "{}: {}", pair.name, value)?,
                None => writeln!(f, "{}", pair.name)?,
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}
