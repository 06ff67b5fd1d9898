//! Hash (URL fragment) values
//!
//! A hash is either empty (top of the document) or starts with `#`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized URL fragment, including the leading `#`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Hash(String);

impl Hash {
    /// Build a hash from a raw fragment string.
    ///
    /// A bare `#` is treated as top of page, the same way `location.hash`
    /// reports it. A non-empty fragment missing its `#` gets one.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() || raw == "#" {
            Self(String::new())
        } else if raw.starts_with('#') {
            Self(raw)
        } else {
            Self(format!("#{raw}"))
        }
    }

    /// The top-of-page sentinel
    pub fn top() -> Self {
        Self(String::new())
    }

    pub fn is_top(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fragment without the leading `#` (element id to scroll to)
    pub fn fragment(&self) -> &str {
        self.0.strip_prefix('#').unwrap_or(&self.0)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top() {
            write!(f, "(top)")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<String> for Hash {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Hash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Hash> for String {
    fn from(h: Hash) -> Self {
        h.0
    }
}

impl PartialEq<str> for Hash {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Hash {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Extract the hash part of a full URL (`hashchange` reports URLs, not hashes)
pub fn extract_hash(url: &str) -> Hash {
    match url.find('#') {
        Some(i) => Hash::new(&url[i..]),
        None => Hash::top(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes() {
        assert!(Hash::new("").is_top());
        assert!(Hash::new("#").is_top());
        assert_eq!(Hash::new("#intro"), "#intro");
        assert_eq!(Hash::new("intro"), "#intro");
    }

    #[test]
    fn test_fragment() {
        assert_eq!(Hash::new("#section-2").fragment(), "section-2");
        assert_eq!(Hash::top().fragment(), "");
    }

    #[test]
    fn test_extract_hash() {
        assert_eq!(extract_hash("https://example.com/doc.html#api"), "#api");
        assert_eq!(extract_hash("https://example.com/doc.html"), "");
        assert_eq!(extract_hash("https://example.com/doc.html#"), "");
        // Only the first '#' starts the fragment
        assert_eq!(extract_hash("https://example.com/#a#b"), "#a#b");
    }

    #[test]
    fn test_serde_as_string() {
        let h: Hash = serde_json::from_str("\"notes\"").unwrap();
        assert_eq!(h, "#notes");
        assert_eq!(serde_json::to_string(&Hash::top()).unwrap(), "\"\"");
    }
}
